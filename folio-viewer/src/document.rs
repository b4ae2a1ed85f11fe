use crate::engine::{DecodeContext, RasterEngine};
use crate::error::{OpenError, RenderError};
use crate::raster::{apply_rotation, checked_pixel_size, RenderedFrame, MAX_RASTER_EDGE};
use crate::transform::{Rect, Transform};
use image::RgbaImage;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The single page raster kept between renders, before rotation.
struct CachedPage {
    index: usize,
    scale_bits: u32,
    image: RgbaImage,
    #[cfg(test)]
    release: Option<tests::Tracked>,
}

impl CachedPage {
    fn matches(&self, index: usize, scale: f32) -> bool {
        self.index == index && self.scale_bits == scale.to_bits()
    }
}

/// Owns an opened document together with the decoding context it came from.
///
/// Fields drop in declaration order, so the cached raster is released before
/// the document and the document before its context, whether the handle is
/// closed explicitly or simply dropped.
pub struct DocumentHandle<C: DecodeContext> {
    cache: Option<CachedPage>,
    document: C::Document,
    context: C,
    path: PathBuf,
    page_count: usize,
    max_edge: u32,
}

impl<C: DecodeContext> std::fmt::Debug for DocumentHandle<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentHandle")
            .field("path", &self.path)
            .field("page_count", &self.page_count)
            .field("cached_page", &self.cache.as_ref().map(|c| c.index))
            .finish()
    }
}

impl<C: DecodeContext> DocumentHandle<C> {
    /// Open `path` in a fresh decoding context.
    ///
    /// Whatever was built before a failing step is dropped before the error
    /// is returned, document first, then context.
    pub fn open<E>(engine: &E, path: impl AsRef<Path>) -> Result<Self, OpenError>
    where
        E: RasterEngine<Context = C>,
    {
        let path = path.as_ref();

        let mut context = engine
            .create_context()
            .map_err(OpenError::ContextAllocationFailed)?;

        context
            .register_handlers()
            .map_err(OpenError::HandlerRegistrationFailed)?;

        let document =
            context
                .open_document(path)
                .map_err(|source| OpenError::DocumentOpenFailed {
                    path: path.to_path_buf(),
                    source,
                })?;

        let page_count =
            context
                .count_pages(&document)
                .map_err(|source| OpenError::PageCountFailed {
                    path: path.to_path_buf(),
                    source,
                })?;

        info!(path = %path.display(), page_count, "document opened");
        Ok(Self {
            cache: None,
            document,
            context,
            path: path.to_path_buf(),
            page_count,
            max_edge: MAX_RASTER_EDGE,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("Untitled")
            .to_string()
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    /// Longest raster edge, in pixels, this handle will ask the engine for.
    pub fn max_raster_edge(&self) -> u32 {
        self.max_edge
    }

    pub fn set_max_raster_edge(&mut self, max_edge: u32) {
        self.max_edge = max_edge;
    }

    /// Natural size of a page in points.
    pub fn page_size(&self, index: usize) -> anyhow::Result<(f32, f32)> {
        self.context.page_size(&self.document, index)
    }

    /// Rasterize page `index` under `transform`.
    ///
    /// The page is rendered at the transform's scale and kept; a later call
    /// for the same page and scale only re-applies the rotation. Rasters whose
    /// scaled or rotated edges exceed [`Self::max_raster_edge`] are refused
    /// before anything is allocated.
    pub fn rasterize_page(
        &mut self,
        index: usize,
        transform: &Transform,
    ) -> Result<RenderedFrame, RenderError> {
        if index >= self.page_count {
            return Err(RenderError::PageOutOfRange {
                page: index,
                page_count: self.page_count,
            });
        }

        let scale = transform.expansion();
        self.check_raster_size(index, scale, transform)
            .map_err(|source| RenderError::RenderFailed {
                page: index,
                source,
            })?;

        let page = match self.cache.take().filter(|c| c.matches(index, scale)) {
            Some(cached) => {
                debug!(page = index, scale, "reusing cached page raster");
                cached
            }
            None => {
                let image = self
                    .context
                    .render_page(&self.document, index, scale)
                    .map_err(|source| RenderError::RenderFailed {
                        page: index,
                        source,
                    })?;
                debug!(
                    page = index,
                    scale,
                    width = image.width(),
                    height = image.height(),
                    "page rasterized"
                );
                CachedPage {
                    index,
                    scale_bits: scale.to_bits(),
                    image,
                    #[cfg(test)]
                    release: None,
                }
            }
        };

        let rotated = apply_rotation(&page.image, &transform.normalized());
        self.cache = Some(page);
        Ok(RenderedFrame::from_image(rotated))
    }

    fn check_raster_size(
        &self,
        index: usize,
        scale: f32,
        transform: &Transform,
    ) -> anyhow::Result<()> {
        let (width, height) = self.page_size(index)?;
        checked_pixel_size(width * scale, height * scale, self.max_edge)?;
        let bounds = transform.transform_rect(&Rect::from_size(width, height));
        checked_pixel_size(bounds.width(), bounds.height(), self.max_edge)?;
        Ok(())
    }

    /// Release the cached raster, the document and the context, in that order.
    pub fn close(self) {
        info!(path = %self.path.display(), "closing document");
        let Self {
            cache,
            document,
            context,
            ..
        } = self;
        drop(cache);
        drop(document);
        drop(context);
    }
}
