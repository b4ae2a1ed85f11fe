//! Runtime configuration, taken from the command line only.

use crate::raster::MAX_RASTER_EDGE;
use clap::Parser;
use std::path::PathBuf;

/// What the render pipeline does when a page fails to rasterize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderFailurePolicy {
    /// Close the document and report the error.
    #[default]
    CloseDocument,
    /// Keep the document open and show a blank page instead.
    Placeholder,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// Percentage points added or removed per zoom step.
    pub zoom_step: f32,
    /// Degrees per rotation step.
    pub rotation_step: f32,
    /// Viewport units moved per scroll step.
    pub scroll_step: f32,
    pub render_failure: RenderFailurePolicy,
    /// Longest edge, in pixels, of any raster the viewer allocates.
    pub max_raster_edge: u32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            zoom_step: 10.0,
            rotation_step: 90.0,
            scroll_step: 30.0,
            render_failure: RenderFailurePolicy::CloseDocument,
            max_raster_edge: MAX_RASTER_EDGE,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "folio-viewer", version, about = "Keyboard-driven document viewer")]
pub struct Cli {
    /// Document to open on startup
    pub file: Option<PathBuf>,

    /// Page to start on, counting from 1
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Zoom change per key press, in percent
    #[arg(long, default_value_t = 10.0, value_parser = parse_step)]
    pub zoom_step: f32,

    /// Rotation per key press, in degrees
    #[arg(long, default_value_t = 90.0, value_parser = parse_step)]
    pub rotation_step: f32,

    /// Scroll distance per key press
    #[arg(long, default_value_t = 30.0, value_parser = parse_step)]
    pub scroll_step: f32,

    /// Show a blank page instead of closing the document when a page fails to render
    #[arg(long)]
    pub placeholder_on_error: bool,

    /// Refuse to render pages whose width or height would exceed this many pixels
    #[arg(
        long,
        default_value_t = MAX_RASTER_EDGE,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub max_raster_edge: u32,

    /// Directory containing the PDFium library
    #[arg(long, value_name = "DIR")]
    pub pdfium_dir: Option<PathBuf>,
}

impl Cli {
    /// Zero-based start page.
    pub fn start_page(&self) -> usize {
        self.page.saturating_sub(1) as usize
    }

    pub fn viewer_config(&self) -> ViewerConfig {
        ViewerConfig {
            zoom_step: self.zoom_step,
            rotation_step: self.rotation_step,
            scroll_step: self.scroll_step,
            render_failure: if self.placeholder_on_error {
                RenderFailurePolicy::Placeholder
            } else {
                RenderFailurePolicy::CloseDocument
            },
            max_raster_edge: self.max_raster_edge,
        }
    }
}

fn parse_step(value: &str) -> Result<f32, String> {
    let step: f32 = value
        .parse()
        .map_err(|e| format!("`{value}` is not a number: {e}"))?;
    if step.is_finite() && step > 0.0 {
        Ok(step)
    } else {
        Err(format!("step must be a positive number, got {value}"))
    }
}
