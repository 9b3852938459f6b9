use crate::{Error, Result};
use indexmap::IndexMap;

#[derive(Debug, Clone, Copy)]
struct Rgb01 {
    r: f64,
    g: f64,
    b: f64,
}

#[derive(Debug, Clone, Copy)]
struct Hsl {
    h_deg: f64,
    s_pct: f64,
    l_pct: f64,
}

// Default palette parameters: evenly spaced hues with a small offset, at
// fixed lightness/saturation.
const HUE_OFFSET: f64 = 0.01;
const LIGHTNESS_PCT: f64 = 60.0;
const SATURATION_PCT: f64 = 65.0;

fn hsl_to_rgb01(hsl: Hsl) -> Rgb01 {
    let h = (hsl.h_deg / 360.0) % 1.0;
    let s = (hsl.s_pct / 100.0).clamp(0.0, 1.0);
    let l = (hsl.l_pct / 100.0).clamp(0.0, 1.0);

    if s == 0.0 {
        return Rgb01 { r: l, g: l, b: l };
    }

    fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        if t < 1.0 / 6.0 {
            return p + (q - p) * 6.0 * t;
        }
        if t < 1.0 / 2.0 {
            return q;
        }
        if t < 2.0 / 3.0 {
            return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
        }
        p
    }

    let q = if l < 0.5 {
        l * (1.0 + s)
    } else {
        l + s - l * s
    };
    let p = 2.0 * l - q;
    Rgb01 {
        r: hue_to_rgb(p, q, h + 1.0 / 3.0),
        g: hue_to_rgb(p, q, h),
        b: hue_to_rgb(p, q, h - 1.0 / 3.0),
    }
}

fn rgb01_to_hex(rgb: Rgb01) -> String {
    let r = (rgb.r.clamp(0.0, 1.0) * 255.0).round() as i64;
    let g = (rgb.g.clamp(0.0, 1.0) * 255.0).round() as i64;
    let b = (rgb.b.clamp(0.0, 1.0) * 255.0).round() as i64;
    format!(
        "#{:02x}{:02x}{:02x}",
        r.clamp(0, 255),
        g.clamp(0, 255),
        b.clamp(0, 255)
    )
}

/// `n` evenly spaced hues as `#rrggbb` strings.
pub fn hls_palette(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| {
            let hue = (i as f64 / n as f64 + HUE_OFFSET) % 1.0;
            rgb01_to_hex(hsl_to_rgb01(Hsl {
                h_deg: hue * 360.0,
                s_pct: SATURATION_PCT,
                l_pct: LIGHTNESS_PCT,
            }))
        })
        .collect()
}

/// Assigns palette colors in label order, or validates that an explicit
/// mapping covers every label and passes it through unchanged.
pub fn resolve_colors(
    labels: &[String],
    explicit: Option<&IndexMap<String, String>>,
) -> Result<IndexMap<String, String>> {
    let colors = match explicit {
        None => {
            let palette = hls_palette(labels.len());
            labels.iter().cloned().zip(palette).collect()
        }
        Some(mapping) => {
            let missing: Vec<String> = labels
                .iter()
                .filter(|l| !mapping.contains_key(l.as_str()))
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(Error::ColorMappingIncomplete { missing });
            }
            mapping.clone()
        }
    };
    tracing::debug!(?colors, "resolved color assignment");
    Ok(colors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn palette_assigns_distinct_colors_in_label_order() {
        let colors = resolve_colors(&labels(&["a", "b", "c"]), None).unwrap();
        assert_eq!(
            colors.keys().collect::<Vec<_>>(),
            ["a", "b", "c"]
        );
        let values: Vec<_> = colors.values().collect();
        assert_eq!(values.len(), 3);
        assert!(values.iter().all(|c| c.len() == 7 && c.starts_with('#')));
        assert_ne!(values[0], values[1]);
        assert_ne!(values[1], values[2]);
    }

    #[test]
    fn single_label_palette_is_near_red() {
        // hue 0.01 at l=0.6, s=0.65
        assert_eq!(hls_palette(1), ["#db5f57"].map(String::from));
    }

    #[test]
    fn explicit_mapping_passes_through_unchanged() {
        let mapping: IndexMap<String, String> = [
            ("a".to_string(), "#112233".to_string()),
            ("b".to_string(), "orange".to_string()),
            ("unused".to_string(), "#000000".to_string()),
        ]
        .into_iter()
        .collect();
        let resolved = resolve_colors(&labels(&["a", "b"]), Some(&mapping)).unwrap();
        assert_eq!(resolved, mapping);
    }

    #[test]
    fn incomplete_mapping_reports_missing_labels() {
        let mapping: IndexMap<String, String> =
            [("a".to_string(), "#112233".to_string())].into_iter().collect();
        match resolve_colors(&labels(&["a", "b", "c"]), Some(&mapping)) {
            Err(Error::ColorMappingIncomplete { missing }) => {
                assert_eq!(missing, ["b", "c"]);
            }
            other => panic!("expected ColorMappingIncomplete, got {other:?}"),
        }
    }
}
