use crate::engine::{DecodeContext, RasterEngine};
use crate::raster::pixel_size;
use anyhow::{anyhow, Context, Result};
use image::{imageops::FilterType, RgbaImage};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Document formats the default engine can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Pdf,
    Png,
    Jpeg,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Pdf, Format::Png, Format::Jpeg];

    /// Identify a format from the leading bytes of a file.
    pub fn sniff(bytes: &[u8]) -> Option<Format> {
        const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
        const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];

        if bytes.starts_with(PNG_MAGIC) {
            Some(Format::Png)
        } else if bytes.starts_with(JPEG_MAGIC) {
            Some(Format::Jpeg)
        } else if bytes[..bytes.len().min(1024)]
            .windows(5)
            .any(|window| window == b"%PDF-")
        {
            // PDF readers tolerate junk before the header within the first KiB
            Some(Format::Pdf)
        } else {
            None
        }
    }
}

/// PDF renderer using pdfium-render, with raster images opened as
/// single-page documents.
#[derive(Debug, Clone, Default)]
pub struct PdfRenderer {
    library_dir: Option<PathBuf>,
}

impl PdfRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look for the PDFium library in `dir` only.
    pub fn with_library_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            library_dir: Some(dir.into()),
        }
    }

    fn bind_library(&self) -> Result<Pdfium> {
        if let Some(dir) = &self.library_dir {
            let bindings =
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir))
                    .with_context(|| {
                        format!("Failed to bind to PDFium library in {}", dir.display())
                    })?;
            return Ok(Pdfium::new(bindings));
        }

        let exe_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf));
        if let Some(dir) = exe_dir {
            if let Ok(bindings) =
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir))
            {
                return Ok(Pdfium::new(bindings));
            }
        }

        let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .context("Failed to bind to PDFium library. Please install PDFium or download the library from https://github.com/bblanchon/pdfium-binaries")?;
        Ok(Pdfium::new(bindings))
    }
}

impl RasterEngine for PdfRenderer {
    type Context = RenderContext;

    fn create_context(&self) -> Result<RenderContext> {
        let pdfium = self.bind_library()?;
        debug!("PDFium bound");
        Ok(RenderContext {
            pdfium,
            handlers: Vec::new(),
        })
    }
}

/// Decoding context of the default engine: one PDFium instance plus the
/// registered format handlers.
pub struct RenderContext {
    pdfium: Pdfium,
    handlers: Vec<Format>,
}

// Manual Debug impl since Pdfium does not implement it
impl std::fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderContext")
            .field("handlers", &self.handlers)
            .finish()
    }
}

/// A document as held between calls.
///
/// `PdfDocument` borrows both the PDFium instance and the source bytes, so a
/// PDF is kept as bytes plus the page sizes read while opening it, and is
/// parsed again only to render a page.
pub enum LoadedDocument {
    Pdf {
        bytes: Vec<u8>,
        page_sizes: Vec<(f32, f32)>,
    },
    Image(RgbaImage),
}

impl std::fmt::Debug for LoadedDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadedDocument::Pdf { bytes, page_sizes } => f
                .debug_struct("Pdf")
                .field("bytes", &bytes.len())
                .field("pages", &page_sizes.len())
                .finish(),
            LoadedDocument::Image(image) => f
                .debug_struct("Image")
                .field("dimensions", &image.dimensions())
                .finish(),
        }
    }
}

impl LoadedDocument {
    fn page_count(&self) -> usize {
        match self {
            LoadedDocument::Pdf { page_sizes, .. } => page_sizes.len(),
            LoadedDocument::Image(_) => 1,
        }
    }

    fn page_size(&self, index: usize) -> Result<(f32, f32)> {
        match self {
            LoadedDocument::Pdf { page_sizes, .. } => page_sizes
                .get(index)
                .copied()
                .context("Page index out of bounds"),
            LoadedDocument::Image(image) => {
                single_page(index)?;
                Ok((image.width() as f32, image.height() as f32))
            }
        }
    }
}

impl RenderContext {
    fn load<'a>(&'a self, bytes: &'a [u8]) -> Result<PdfDocument<'a>> {
        self.pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .context("Failed to load PDF document")
    }
}

impl DecodeContext for RenderContext {
    type Document = LoadedDocument;

    fn register_handlers(&mut self) -> Result<()> {
        self.handlers = Format::ALL.to_vec();
        Ok(())
    }

    fn open_document(&self, path: &Path) -> Result<LoadedDocument> {
        let (format, bytes) = read_document(path, &self.handlers)?;
        debug!(?format, path = %path.display(), "opening document");
        match format {
            Format::Pdf => {
                let page_sizes = self
                    .load(&bytes)?
                    .pages()
                    .iter()
                    .map(|page| (page.width().value, page.height().value))
                    .collect();
                Ok(LoadedDocument::Pdf { bytes, page_sizes })
            }
            Format::Png | Format::Jpeg => Ok(LoadedDocument::Image(decode_image(&bytes)?)),
        }
    }

    fn count_pages(&self, document: &LoadedDocument) -> Result<usize> {
        Ok(document.page_count())
    }

    fn page_size(&self, document: &LoadedDocument, index: usize) -> Result<(f32, f32)> {
        document.page_size(index)
    }

    fn render_page(
        &self,
        document: &LoadedDocument,
        index: usize,
        scale: f32,
    ) -> Result<RgbaImage> {
        match document {
            LoadedDocument::Pdf { bytes, .. } => {
                let pdf = self.load(bytes)?;
                let page = pdf
                    .pages()
                    .get(page_number(index)?)
                    .context("Page index out of bounds")?;

                let (width, height) =
                    pixel_size(page.width().value * scale, page.height().value * scale);
                let render_config = PdfRenderConfig::new()
                    .set_target_width(width as i32)
                    .set_target_height(height as i32);

                let bitmap = page
                    .render_with_config(&render_config)
                    .context("Failed to render page")?;

                RgbaImage::from_raw(
                    bitmap.width() as u32,
                    bitmap.height() as u32,
                    bitmap.as_rgba_bytes().to_vec(),
                )
                .context("Failed to create image from bitmap")
            }
            LoadedDocument::Image(image) => {
                single_page(index)?;
                Ok(scale_image(image, scale))
            }
        }
    }
}

/// Read `path` and check it against the registered handlers.
fn read_document(path: &Path, handlers: &[Format]) -> Result<(Format, Vec<u8>)> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let format = Format::sniff(&bytes)
        .filter(|format| handlers.contains(format))
        .ok_or_else(|| anyhow!("Unsupported document format"))?;
    Ok((format, bytes))
}

fn decode_image(bytes: &[u8]) -> Result<RgbaImage> {
    let image = image::load_from_memory(bytes).context("Failed to decode image")?;
    Ok(image.to_rgba8())
}

fn scale_image(image: &RgbaImage, scale: f32) -> RgbaImage {
    let (width, height) = pixel_size(image.width() as f32 * scale, image.height() as f32 * scale);
    if (width, height) == image.dimensions() {
        return image.clone();
    }
    image::imageops::resize(image, width, height, FilterType::Triangle)
}

fn page_number(index: usize) -> Result<u16> {
    u16::try_from(index).context("Page index out of bounds")
}

fn single_page(index: usize) -> Result<()> {
    if index == 0 {
        Ok(())
    } else {
        Err(anyhow!("Page index out of bounds"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        let mut out = Cursor::new(Vec::new());
        image
            .write_to(&mut out, ImageFormat::Png)
            .expect("encode png");
        out.into_inner()
    }

    #[test]
    fn sniffs_known_formats() {
        assert_eq!(Format::sniff(b"%PDF-1.7\n..."), Some(Format::Pdf));
        assert_eq!(Format::sniff(b"\n\n%PDF-1.4"), Some(Format::Pdf));
        assert_eq!(Format::sniff(&png_bytes(1, 1)), Some(Format::Png));
        assert_eq!(Format::sniff(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(Format::Jpeg));
        assert_eq!(Format::sniff(b"GIF89a"), None);
        assert_eq!(Format::sniff(b""), None);
    }

    #[test]
    fn reads_registered_formats_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("page.png");
        std::fs::write(&path, png_bytes(4, 2)).expect("write fixture");

        let (format, bytes) = read_document(&path, &Format::ALL).expect("readable");
        assert_eq!(format, Format::Png);
        assert_eq!(decode_image(&bytes).expect("decodes").dimensions(), (4, 2));
    }

    #[test]
    fn rejects_unregistered_or_unknown_formats() {
        let dir = tempfile::tempdir().expect("tempdir");
        let png = dir.path().join("page.png");
        std::fs::write(&png, png_bytes(1, 1)).expect("write fixture");
        assert!(read_document(&png, &[Format::Pdf]).is_err());

        let text = dir.path().join("notes.txt");
        std::fs::write(&text, "plain text").expect("write fixture");
        let err = read_document(&text, &Format::ALL).unwrap_err();
        assert_eq!(err.to_string(), "Unsupported document format");

        assert!(read_document(&dir.path().join("missing.pdf"), &Format::ALL).is_err());
    }

    #[test]
    fn scales_images_to_zoom() {
        let image = RgbaImage::from_pixel(40, 20, Rgba([0, 0, 0, 255]));
        assert_eq!(scale_image(&image, 1.0), image);
        assert_eq!(scale_image(&image, 0.5).dimensions(), (20, 10));
        assert_eq!(scale_image(&image, 2.5).dimensions(), (100, 50));
    }

    #[test]
    fn pdf_geometry_comes_from_open_time_table() {
        // no PDFium needed: count and size never touch the bytes
        let document = LoadedDocument::Pdf {
            bytes: Vec::new(),
            page_sizes: vec![(612.0, 792.0), (842.0, 595.0)],
        };
        assert_eq!(document.page_count(), 2);
        assert_eq!(document.page_size(1).expect("second page"), (842.0, 595.0));
        assert!(document.page_size(2).is_err());

        let image = LoadedDocument::Image(RgbaImage::new(30, 10));
        assert_eq!(image.page_count(), 1);
        assert_eq!(image.page_size(0).expect("only page"), (30.0, 10.0));
        assert!(image.page_size(1).is_err());
    }

    #[test]
    fn image_documents_have_one_page() {
        assert!(single_page(0).is_ok());
        assert!(single_page(1).is_err());
        assert!(page_number(70_000).is_err());
    }
}
