#![forbid(unsafe_code)]

//! `flowband` renders two-column flow ("Sankey") diagrams headlessly.
//!
//! The geometry lives in `flowband-core` and is always available; rendering
//! is feature-gated:
//!
//! - `render`: SVG output (`flowband::render`)
//! - `raster`: PNG/JPEG output via pure-Rust SVG rasterization

pub use flowband_core::*;

#[cfg(feature = "render")]
pub mod render {
    pub use flowband_render::text::{DeterministicTextMeasurer, TextMeasurer};
    pub use flowband_render::{RenderOptions, render_svg};

    #[cfg(feature = "raster")]
    pub mod raster;

    #[derive(Debug, thiserror::Error)]
    pub enum HeadlessError {
        #[error(transparent)]
        Layout(#[from] flowband_core::Error),
        #[error(transparent)]
        Render(#[from] flowband_render::Error),
    }

    pub type Result<T> = std::result::Result<T, HeadlessError>;

    /// Computes the layout for `input` and renders it as SVG.
    pub fn render_svg_diagram(
        input: &flowband_core::SankeyInput,
        options: &RenderOptions,
    ) -> Result<String> {
        let layout = flowband_core::compute_layout(input)?;
        Ok(flowband_render::render_svg(&layout, options)?)
    }

    /// Convenience wrapper bundling render (and raster) options, for callers
    /// that draw many diagrams with one configuration. All work is CPU-bound
    /// and no state survives a call.
    #[derive(Clone, Default)]
    pub struct SankeyRenderer {
        pub render: RenderOptions,
        #[cfg(feature = "raster")]
        pub raster: raster::RasterOptions,
    }

    impl SankeyRenderer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_diagram_id(mut self, diagram_id: &str) -> Self {
            self.render.diagram_id = Some(diagram_id.to_string());
            self
        }

        pub fn with_font_size(mut self, font_size: f64) -> Self {
            self.render.font_size = font_size;
            self
        }

        pub fn with_font_family(mut self, font_family: &str) -> Self {
            self.render.font_family = font_family.to_string();
            self
        }

        pub fn layout(&self, input: &flowband_core::SankeyInput) -> Result<flowband_core::SankeyLayout> {
            Ok(flowband_core::compute_layout(input)?)
        }

        pub fn render_svg(&self, input: &flowband_core::SankeyInput) -> Result<String> {
            render_svg_diagram(input, &self.render)
        }

        #[cfg(feature = "raster")]
        pub fn render_png(&self, input: &flowband_core::SankeyInput) -> raster::Result<Vec<u8>> {
            let svg = self.render_svg(input)?;
            raster::svg_to_png(&svg, &self.raster)
        }

        #[cfg(feature = "raster")]
        pub fn render_jpeg(&self, input: &flowband_core::SankeyInput) -> raster::Result<Vec<u8>> {
            let svg = self.render_svg(input)?;
            raster::svg_to_jpeg(&svg, &self.raster)
        }
    }
}
