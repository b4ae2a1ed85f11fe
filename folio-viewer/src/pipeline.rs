use crate::config::RenderFailurePolicy;
use crate::document::DocumentHandle;
use crate::engine::DecodeContext;
use crate::error::RenderError;
use crate::raster::RenderedFrame;
use crate::surface::DisplaySurface;
use crate::transform::Transform;
use crate::view_state::ViewState;
use tracing::{debug, warn};

/// US Letter in points, used for placeholders when the page size is unknown.
const FALLBACK_PAGE_SIZE: (f32, f32) = (612.0, 792.0);

/// Turns the current view state into a frame on the display surface.
///
/// Rendering is synchronous, so at most one render is in flight. Each call
/// starts a new generation; a frame always belongs to the latest one.
#[derive(Debug, Default)]
pub struct RenderPipeline {
    policy: RenderFailurePolicy,
    generation: u64,
}

impl RenderPipeline {
    pub fn new(policy: RenderFailurePolicy) -> Self {
        Self {
            policy,
            generation: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn policy(&self) -> RenderFailurePolicy {
        self.policy
    }

    /// Rasterize the page selected by `view` and hand it to `display`.
    ///
    /// Under [`RenderFailurePolicy::CloseDocument`] a failed page is returned as
    /// an error and the caller is expected to close the document.
    pub fn render<C, D>(
        &mut self,
        view: &ViewState,
        document: &mut DocumentHandle<C>,
        display: &mut D,
    ) -> Result<(), RenderError>
    where
        C: DecodeContext,
        D: DisplaySurface,
    {
        self.generation += 1;
        let transform = Transform::build(view.zoom_percent(), view.rotation_degrees());
        debug!(
            generation = self.generation,
            page = view.page_index(),
            zoom = view.zoom_percent(),
            rotation = view.rotation_degrees(),
            "render"
        );

        match document.rasterize_page(view.page_index(), &transform) {
            Ok(frame) => {
                present(frame, display);
                Ok(())
            }
            Err(err) => match self.policy {
                RenderFailurePolicy::CloseDocument => Err(err),
                RenderFailurePolicy::Placeholder => {
                    warn!(error = %err, page = view.page_index(), "showing placeholder page");
                    let size = document
                        .page_size(view.page_index())
                        .unwrap_or(FALLBACK_PAGE_SIZE);
                    let frame =
                        RenderedFrame::placeholder(size, &transform, document.max_raster_edge());
                    present(frame, display);
                    Ok(())
                }
            },
        }
    }
}

fn present<D: DisplaySurface>(frame: RenderedFrame, display: &mut D) {
    let (width, height) = (frame.width(), frame.height());
    display.set_bitmap(frame);
    display.set_content_size(width, height);
}
