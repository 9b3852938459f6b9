use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_family: Option<String>,
    pub font_size: f64,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: None,
            font_size: 14.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
}

/// Seam for label extent estimation. The renderer only needs text extents to
/// size the viewBox; swap in a real font shaper here if tighter bounds
/// matter.
pub trait TextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;
}

/// Font-independent measurer: a fixed width factor per character and a fixed
/// line height. Deterministic across platforms.
#[derive(Debug, Clone, Default)]
pub struct DeterministicTextMeasurer {
    pub char_width_factor: f64,
    pub line_height_factor: f64,
}

impl TextMeasurer for DeterministicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let char_width_factor = if self.char_width_factor == 0.0 {
            0.6
        } else {
            self.char_width_factor
        };
        let line_height_factor = if self.line_height_factor == 0.0 {
            1.2
        } else {
            self.line_height_factor
        };

        let font_size = style.font_size.max(1.0);
        TextMetrics {
            width: text.chars().count() as f64 * font_size * char_width_factor,
            height: font_size * line_height_factor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_scales_with_char_count_and_font_size() {
        let measurer = DeterministicTextMeasurer::default();
        let style = TextStyle {
            font_family: None,
            font_size: 10.0,
        };
        let metrics = measurer.measure("abcd", &style);
        assert_eq!(metrics.width, 24.0);
        assert_eq!(metrics.height, 12.0);
    }
}
