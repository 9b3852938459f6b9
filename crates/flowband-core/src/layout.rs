use crate::input::Side;
use crate::model::StackPosition;

/// Fraction of a side's total weight inserted as spacing between
/// consecutive labels' stacked regions.
pub const STACK_GAP_FRACTION: f64 = 0.02;

/// Stacks one side's labels bottom-up in label order and returns their
/// positions plus the side's top edge (the top of the last label).
///
/// The first label starts at 0; every following label starts one gap above
/// the previous label's top, with `gap = 0.02 * side_total`.
pub fn stack_side(side: Side, labels: &[String], totals: &[f64]) -> (Vec<StackPosition>, f64) {
    let side_total: f64 = totals.iter().sum();
    let gap = STACK_GAP_FRACTION * side_total;

    let mut positions = Vec::with_capacity(labels.len());
    let mut top_edge = 0.0;
    for (i, (label, &extent)) in labels.iter().zip(totals).enumerate() {
        let bottom = if i == 0 { 0.0 } else { top_edge + gap };
        let top = bottom + extent;
        tracing::debug!(%side, %label, bottom, top, "stack position");
        positions.push(StackPosition {
            bottom,
            top,
            extent,
        });
        top_edge = top;
    }

    (positions, top_edge)
}
