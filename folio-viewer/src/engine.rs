//! The rasterization engine consumed by the viewer.
//!
//! An engine hands out one decoding context per opened document. The context
//! owns whatever caches and allocators the engine needs and must outlive every
//! document it opens; [`crate::document::DocumentHandle`] enforces that.

use anyhow::Result;
use image::RgbaImage;
use std::path::Path;

pub trait RasterEngine {
    type Context: DecodeContext;

    /// Allocate a fresh decoding context.
    fn create_context(&self) -> Result<Self::Context>;
}

pub trait DecodeContext {
    type Document;

    /// Install the document format handlers this context understands.
    fn register_handlers(&mut self) -> Result<()>;

    fn open_document(&self, path: &Path) -> Result<Self::Document>;

    fn count_pages(&self, document: &Self::Document) -> Result<usize>;

    /// Page width and height in points.
    fn page_size(&self, document: &Self::Document, index: usize) -> Result<(f32, f32)>;

    /// Rasterize page `index` at `scale` device pixels per point, unrotated.
    fn render_page(&self, document: &Self::Document, index: usize, scale: f32)
        -> Result<RgbaImage>;
}
