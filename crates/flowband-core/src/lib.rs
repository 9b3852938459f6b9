#![forbid(unsafe_code)]

//! Two-column flow ("Sankey") diagram geometry, headless.
//!
//! Given parallel columns of left/right category assignments and optional
//! weights, [`compute_layout`] validates the input, aggregates pair weights,
//! stacks each side's labels with proportional gaps and produces smoothed
//! strip curves as pure coordinate data. Rendering is a separate consumer of
//! that data (see the `flowband-render` crate).

pub mod aggregate;
pub mod error;
pub mod input;
pub mod layout;
pub mod model;
pub mod palette;
mod strip;
mod validate;

pub use error::{Error, Result};
pub use input::{FlowRecord, SankeyInput, Side};
pub use model::{NodeLayout, SankeyLayout, StackPosition, StripLayout};

/// Computes the full diagram layout. Pure: identical inputs yield identical
/// layouts, and nothing is shared across invocations.
pub fn compute_layout(input: &SankeyInput) -> Result<SankeyLayout> {
    let frame = validate::validate_input(input)?;
    let colors = palette::resolve_colors(&frame.all_labels, input.colors.as_ref())?;

    let widths = aggregate::pair_widths(&frame.records, &frame.left_labels, &frame.right_labels);

    let (left_positions, left_top_edge) =
        layout::stack_side(Side::Left, &frame.left_labels, &widths.left_totals);
    let (right_positions, right_top_edge) =
        layout::stack_side(Side::Right, &frame.right_labels, &widths.right_totals);

    // The frame height follows the side laid out last, like the vertical
    // extent a sequential per-side computation leaves behind.
    let top_edge = right_top_edge;
    let x_max = top_edge / input.aspect;

    let strips = strip::build_strips(
        &widths,
        &frame.left_labels,
        &frame.right_labels,
        &left_positions,
        &right_positions,
        &colors,
        input.right_color,
        x_max,
    );

    let left_nodes = nodes_for(&frame.left_labels, &left_positions, &colors);
    let right_nodes = nodes_for(&frame.right_labels, &right_positions, &colors);

    Ok(SankeyLayout {
        x_max,
        top_edge,
        left_top_edge,
        right_top_edge,
        left_nodes,
        right_nodes,
        strips,
        colors,
    })
}

fn nodes_for(
    labels: &[String],
    positions: &[StackPosition],
    colors: &indexmap::IndexMap<String, String>,
) -> Vec<NodeLayout> {
    labels
        .iter()
        .zip(positions)
        .map(|(label, &position)| NodeLayout {
            label: label.clone(),
            position,
            color: colors.get(label).cloned().unwrap_or_default(),
        })
        .collect()
}
