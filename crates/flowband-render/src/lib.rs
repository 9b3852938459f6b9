#![forbid(unsafe_code)]

//! SVG renderer for `flowband-core` layouts.
//!
//! The geometry core is y-up; this crate flips to SVG's y-down coordinate
//! space at the emission boundary and nowhere else.

pub mod svg;
pub mod text;

use crate::text::{DeterministicTextMeasurer, TextMeasurer};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid layout: {message}")]
    InvalidLayout { message: String },
}

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone)]
pub struct RenderOptions {
    /// Root `<svg id>`; set this when inlining several diagrams in one page.
    pub diagram_id: Option<String>,
    pub font_size: f64,
    pub font_family: String,
    /// Background color written into the root style; `None` for transparent.
    pub background: Option<String>,
    pub text_measurer: Arc<dyn TextMeasurer + Send + Sync>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            diagram_id: None,
            font_size: 14.0,
            font_family: "serif".to_string(),
            background: Some("white".to_string()),
            text_measurer: Arc::new(DeterministicTextMeasurer::default()),
        }
    }
}

pub use svg::render_svg;
