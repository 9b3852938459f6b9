use crate::text::TextStyle;
use crate::{Error, RenderOptions, Result};
use flowband_core::{NodeLayout, SankeyLayout, Side, StripLayout};
use std::fmt::Write as _;

// Geometry factors relative to the strip area width: bar thickness, and the
// horizontal offset of the label text from the strip edge.
const BAR_WIDTH_FACTOR: f64 = 0.02;
const LABEL_OFFSET_FACTOR: f64 = 0.05;

const BAR_OPACITY: &str = "0.99";
const STRIP_OPACITY: &str = "0.65";

// Vertical text extents for viewBox sizing, in em.
const ASCENT_EM: f64 = 0.9285714286;
const DESCENT_EM: f64 = 0.262;

/// Renders a computed layout to a standalone SVG document. Only bars, label
/// text and strips are emitted; there is no axis.
pub fn render_svg(layout: &SankeyLayout, options: &RenderOptions) -> Result<String> {
    for strip in &layout.strips {
        if strip.x.len() != strip.y_lower.len() || strip.x.len() != strip.y_upper.len() {
            return Err(Error::InvalidLayout {
                message: format!(
                    "strip {} -> {} has mismatched curve arrays",
                    strip.left_label, strip.right_label
                ),
            });
        }
    }

    let x_max = layout.x_max;
    // Flip to y-down. The taller side sets the flip origin so nothing lands
    // at negative y.
    let top_y = layout.left_top_edge.max(layout.right_top_edge);
    let flip = |y: f64| top_y - y;

    let style = TextStyle {
        font_family: Some(options.font_family.clone()),
        font_size: options.font_size,
    };

    let mut bounds = Bounds::new();
    for (node, side) in nodes_with_sides(layout) {
        let (bar_x0, bar_x1) = bar_x_range(side, x_max);
        bounds.add(bar_x0, flip(node.position.top));
        bounds.add(bar_x1, flip(node.position.bottom));

        let metrics = options.text_measurer.measure(&node.label, &style);
        let (text_x, anchor) = label_anchor(side, x_max);
        let (tx0, tx1) = match anchor {
            "end" => (text_x - metrics.width, text_x),
            _ => (text_x, text_x + metrics.width),
        };
        let baseline = flip(node.position.bottom + node.position.extent / 2.0)
            + 0.35 * options.font_size;
        bounds.add(tx0, baseline - ASCENT_EM * options.font_size);
        bounds.add(tx1, baseline + DESCENT_EM * options.font_size);
    }
    for strip in &layout.strips {
        for (&y_lower, &y_upper) in strip.y_lower.iter().zip(&strip.y_upper) {
            bounds.add(0.0, flip(y_lower));
            bounds.add(x_max, flip(y_upper));
        }
    }

    let (min_x, min_y, vb_w, vb_h) = bounds.viewbox();
    let diagram_id = options.diagram_id.as_deref().unwrap_or("flowband");
    let diagram_id_esc = escape_xml(diagram_id);

    let mut out = String::new();
    let background = match &options.background {
        Some(color) => format!(" background-color: {};", escape_xml(color)),
        None => String::new(),
    };
    let _ = write!(
        &mut out,
        r#"<svg id="{id}" width="100%" xmlns="http://www.w3.org/2000/svg" style="max-width: {w}px;{bg}" viewBox="{min_x} {min_y} {vb_w} {vb_h}" role="graphics-document document" aria-roledescription="flow diagram">"#,
        id = diagram_id_esc,
        w = fmt(vb_w),
        bg = background,
        min_x = fmt(min_x),
        min_y = fmt(min_y),
        vb_w = fmt(vb_w),
        vb_h = fmt(vb_h),
    );
    let _ = write!(
        &mut out,
        r#"<style>#{id}{{font-family:{font};font-size:{fs}px;fill:#333;}}</style>"#,
        id = diagram_id_esc,
        font = escape_xml(&options.font_family),
        fs = fmt(options.font_size),
    );

    out.push_str(r#"<g class="nodes">"#);
    for (node, side) in nodes_with_sides(layout) {
        let (bar_x0, bar_x1) = bar_x_range(side, x_max);
        let _ = write!(
            &mut out,
            r#"<rect class="node" x="{x}" y="{y}" width="{w}" height="{h}" fill="{fill}" fill-opacity="{opacity}"/>"#,
            x = fmt(bar_x0),
            y = fmt(flip(node.position.top)),
            w = fmt(bar_x1 - bar_x0),
            h = fmt(node.position.extent),
            fill = escape_xml(&node.color),
            opacity = BAR_OPACITY,
        );
    }
    out.push_str("</g>");

    let _ = write!(
        &mut out,
        r#"<g class="node-labels" font-size="{fs}">"#,
        fs = fmt(options.font_size)
    );
    for (node, side) in nodes_with_sides(layout) {
        let (text_x, anchor) = label_anchor(side, x_max);
        let center = node.position.bottom + node.position.extent / 2.0;
        let _ = write!(
            &mut out,
            r#"<text x="{x}" y="{y}" dy="0.35em" text-anchor="{anchor}">{text}</text>"#,
            x = fmt(text_x),
            y = fmt(flip(center)),
            anchor = anchor,
            text = escape_xml(&node.label),
        );
    }
    out.push_str("</g>");

    out.push_str(r#"<g class="strips">"#);
    for strip in &layout.strips {
        let _ = write!(
            &mut out,
            r#"<path class="strip" d="{d}" fill="{fill}" fill-opacity="{opacity}"/>"#,
            d = strip_path(strip, flip),
            fill = escape_xml(&strip.color),
            opacity = STRIP_OPACITY,
        );
    }
    out.push_str("</g>");

    out.push_str("</svg>");
    Ok(out)
}

fn nodes_with_sides(layout: &SankeyLayout) -> impl Iterator<Item = (&NodeLayout, Side)> {
    layout
        .left_nodes
        .iter()
        .map(|n| (n, Side::Left))
        .chain(layout.right_nodes.iter().map(|n| (n, Side::Right)))
}

fn bar_x_range(side: Side, x_max: f64) -> (f64, f64) {
    match side {
        Side::Left => (-BAR_WIDTH_FACTOR * x_max, 0.0),
        Side::Right => (x_max, (1.0 + BAR_WIDTH_FACTOR) * x_max),
    }
}

fn label_anchor(side: Side, x_max: f64) -> (f64, &'static str) {
    match side {
        Side::Left => (-LABEL_OFFSET_FACTOR * x_max, "end"),
        Side::Right => ((1.0 + LABEL_OFFSET_FACTOR) * x_max, "start"),
    }
}

/// Closed fill region: lower curve forward, upper curve reversed.
fn strip_path(strip: &StripLayout, flip: impl Fn(f64) -> f64) -> String {
    let mut d = String::new();
    for (i, (&x, &y)) in strip.x.iter().zip(&strip.y_lower).enumerate() {
        let cmd = if i == 0 { 'M' } else { 'L' };
        let _ = write!(&mut d, "{cmd}{},{}", fmt_path(x), fmt_path(flip(y)));
    }
    for (&x, &y) in strip.x.iter().zip(&strip.y_upper).rev() {
        let _ = write!(&mut d, "L{},{}", fmt_path(x), fmt_path(flip(y)));
    }
    d.push('Z');
    d
}

struct Bounds {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Bounds {
    fn new() -> Self {
        Self {
            min_x: f64::INFINITY,
            min_y: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            max_y: f64::NEG_INFINITY,
        }
    }

    fn add(&mut self, x: f64, y: f64) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    fn viewbox(&self) -> (f64, f64, f64, f64) {
        if self.min_x > self.max_x {
            return (0.0, 0.0, 1.0, 1.0);
        }
        let w = (self.max_x - self.min_x).max(1.0);
        let h = (self.max_y - self.min_y).max(1.0);
        (self.min_x, self.min_y, w, h)
    }
}

fn fmt(v: f64) -> String {
    // Round-trippable decimal form, avoiding `-0` and float noise from our
    // own arithmetic.
    if !v.is_finite() {
        return "0".to_string();
    }
    let mut v = if v.abs() < 1e-9 { 0.0 } else { v };
    let nearest = v.round();
    if (v - nearest).abs() < 1e-6 {
        v = nearest;
    }
    let mut buffer = ryu_js::Buffer::new();
    let s = buffer.format_finite(v);
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

fn fmt_path(v: f64) -> String {
    // Path data gets 3 fractional digits, trailing zeros trimmed.
    if !v.is_finite() {
        return "0".to_string();
    }
    let r = (v * 1000.0).round() / 1000.0;
    let mut s = format!("{r:.3}");
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" { "0".to_string() } else { s }
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowband_core::{SankeyInput, compute_layout};

    fn render(input: &SankeyInput) -> String {
        let layout = compute_layout(input).unwrap();
        render_svg(&layout, &RenderOptions::default()).unwrap()
    }

    #[test]
    fn emits_one_path_per_strip_and_one_rect_per_label() {
        let svg = render(&SankeyInput::new(["a", "a", "b"], ["x", "y", "x"]));
        assert_eq!(svg.matches("<path class=\"strip\"").count(), 3);
        assert_eq!(svg.matches("<rect class=\"node\"").count(), 4);
        assert_eq!(svg.matches("<text ").count(), 4);
    }

    #[test]
    fn has_no_axis_elements() {
        let svg = render(&SankeyInput::new(["a"], ["x"]));
        assert!(!svg.contains("<line"));
        assert!(!svg.contains("axis"));
    }

    #[test]
    fn root_svg_carries_viewbox_and_background() {
        let svg = render(&SankeyInput::new(["a"], ["x"]));
        assert!(svg.starts_with("<svg id=\"flowband\""));
        assert!(svg.contains("viewBox=\""));
        assert!(svg.contains("background-color: white;"));

        let layout = compute_layout(&SankeyInput::new(["a"], ["x"])).unwrap();
        let mut options = RenderOptions::default();
        options.background = None;
        options.diagram_id = Some("demo".to_string());
        let svg = render_svg(&layout, &options).unwrap();
        assert!(svg.starts_with("<svg id=\"demo\""));
        assert!(!svg.contains("background-color"));
    }

    #[test]
    fn labels_are_escaped() {
        let svg = render(&SankeyInput::new(["a<b"], ["x&y"]));
        assert!(svg.contains("a&lt;b"));
        assert!(svg.contains("x&amp;y"));
        assert!(!svg.contains("a<b"));
    }

    #[test]
    fn strip_paths_are_closed() {
        let svg = render(&SankeyInput::new(["a"], ["x"]));
        let path_start = svg.find("<path class=\"strip\" d=\"M").unwrap();
        let path = &svg[path_start..svg[path_start..].find("/>").unwrap() + path_start];
        assert!(path.contains("Z\""));
    }

    #[test]
    fn fmt_is_compact_and_stable() {
        assert_eq!(fmt(0.25), "0.25");
        assert_eq!(fmt(1.0000000001), "1");
        assert_eq!(fmt(-0.0), "0");
        assert_eq!(fmt(f64::NAN), "0");
        assert_eq!(fmt_path(1.23456), "1.235");
        assert_eq!(fmt_path(2.0), "2");
    }

    #[test]
    fn mismatched_curve_arrays_are_rejected() {
        let mut layout = compute_layout(&SankeyInput::new(["a"], ["x"])).unwrap();
        layout.strips[0].y_upper.pop();
        assert!(matches!(
            render_svg(&layout, &RenderOptions::default()),
            Err(Error::InvalidLayout { .. })
        ));
    }
}
