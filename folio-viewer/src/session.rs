use crate::bindings::Action;
use crate::config::ViewerConfig;
use crate::document::DocumentHandle;
use crate::engine::RasterEngine;
use crate::error::{OpenError, Result, ViewerError};
use crate::pipeline::RenderPipeline;
use crate::surface::{Axis, Direction, DisplaySurface, StatusSink};
use crate::view_state::ViewState;
use std::path::Path;
use tracing::{debug, error, info};

/// A document that is currently shown, with the view over it.
struct OpenDocument<E: RasterEngine> {
    handle: DocumentHandle<E::Context>,
    view: ViewState,
}

/// Top-level controller: one method per user action.
///
/// The engine, display and status line are supplied by the caller. Commands
/// run synchronously; any command that changes the view re-renders before it
/// returns.
pub struct ViewerSession<E: RasterEngine, D: DisplaySurface, S: StatusSink = ()> {
    engine: E,
    display: D,
    status: S,
    config: ViewerConfig,
    pipeline: RenderPipeline,
    current: Option<OpenDocument<E>>,
}

impl<E, D, S> ViewerSession<E, D, S>
where
    E: RasterEngine,
    D: DisplaySurface,
    S: StatusSink,
{
    pub fn new(engine: E, display: D, status: S, config: ViewerConfig) -> Self {
        let pipeline = RenderPipeline::new(config.render_failure);
        Self {
            engine,
            display,
            status,
            config,
            pipeline,
            current: None,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn status(&self) -> &S {
        &self.status
    }

    pub fn pipeline(&self) -> &RenderPipeline {
        &self.pipeline
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn view_state(&self) -> Option<&ViewState> {
        self.current.as_ref().map(|doc| &doc.view)
    }

    pub fn page_count(&self) -> Option<usize> {
        self.current.as_ref().map(|doc| doc.handle.page_count())
    }

    pub fn document_path(&self) -> Option<&Path> {
        self.current.as_ref().map(|doc| doc.handle.path())
    }

    /// Open `path` at zero-based `start_page`, replacing any open document.
    ///
    /// The previous document is fully released before the new one is
    /// created. On failure the session is left without a document.
    pub fn open(&mut self, path: impl AsRef<Path>, start_page: usize) -> Result<()> {
        let path = path.as_ref();
        self.close();

        let mut handle = match DocumentHandle::open(&self.engine, path) {
            Ok(handle) => handle,
            Err(err) => return Err(self.report(err.into())),
        };

        handle.set_max_raster_edge(self.config.max_raster_edge);
        let page_count = handle.page_count();
        if start_page >= page_count {
            handle.close();
            return Err(self.report(
                OpenError::InvalidStartPage {
                    requested: start_page,
                    page_count,
                }
                .into(),
            ));
        }

        let file_name = handle.file_name();
        self.current = Some(OpenDocument {
            handle,
            view: ViewState::new(page_count, start_page),
        });
        self.render()?;

        self.status.set_file_name(&file_name);
        self.status.set_page_count(page_count);
        self.status.set_current_page(start_page);
        info!(path = %path.display(), page_count, start_page, "viewing document");
        Ok(())
    }

    /// Release the open document, if any, and clear the display.
    pub fn close(&mut self) {
        if let Some(doc) = self.current.take() {
            doc.handle.close();
            self.display.clear();
            self.status.clear();
        }
    }

    pub fn goto_page(&mut self, delta: i64) -> Result<()> {
        if !self.update_view(|view| view.goto_page_relative(delta))? {
            return Ok(());
        }
        if let Some(index) = self.view_state().map(ViewState::page_index) {
            self.status.set_current_page(index);
        }
        Ok(())
    }

    pub fn zoom(&mut self, delta_percent: f32) -> Result<()> {
        self.update_view(|view| view.zoom(delta_percent)).map(drop)
    }

    pub fn zoom_reset(&mut self) -> Result<()> {
        self.update_view(ViewState::zoom_reset).map(drop)
    }

    pub fn rotate(&mut self, delta_degrees: f32) -> Result<()> {
        self.update_view(|view| view.rotate(delta_degrees)).map(drop)
    }

    pub fn reset_view(&mut self) -> Result<()> {
        self.update_view(ViewState::reset_view).map(drop)
    }

    /// Move the viewport by one scroll step. Never re-renders.
    pub fn scroll_vertical(&mut self, direction: Direction) {
        self.scroll(Axis::Vertical, direction);
    }

    pub fn scroll_horizontal(&mut self, direction: Direction) {
        self.scroll(Axis::Horizontal, direction);
    }

    /// Run the command bound to `action` with the configured step sizes.
    ///
    /// [`Action::OpenFile`] needs a path chosen by the user and is left to
    /// the caller.
    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        let ViewerConfig {
            zoom_step,
            rotation_step,
            ..
        } = self.config;
        match action {
            Action::ZoomIn => self.zoom(zoom_step),
            Action::ZoomOut => self.zoom(-zoom_step),
            Action::ZoomReset => self.zoom_reset(),
            Action::NextPage => self.goto_page(1),
            Action::PrevPage => self.goto_page(-1),
            Action::RotateClockwise => self.rotate(rotation_step),
            Action::RotateCounterClockwise => self.rotate(-rotation_step),
            Action::ResetView => self.reset_view(),
            Action::ScrollDown => {
                self.scroll_vertical(Direction::Forward);
                Ok(())
            }
            Action::ScrollUp => {
                self.scroll_vertical(Direction::Backward);
                Ok(())
            }
            Action::ScrollLeft => {
                self.scroll_horizontal(Direction::Backward);
                Ok(())
            }
            Action::ScrollRight => {
                self.scroll_horizontal(Direction::Forward);
                Ok(())
            }
            Action::OpenFile => {
                debug!("open-file action needs a path from the caller");
                Ok(())
            }
        }
    }

    fn scroll(&mut self, axis: Axis, direction: Direction) {
        let offset = self.display.offset(axis) + direction.sign() * self.config.scroll_step;
        self.display.set_offset(axis, offset);
    }

    /// Apply `change` to the view and re-render if it reports a change.
    /// Returns whether anything changed.
    fn update_view(&mut self, change: impl FnOnce(&mut ViewState) -> bool) -> Result<bool> {
        let Some(doc) = self.current.as_mut() else {
            return Ok(false);
        };
        if !change(&mut doc.view) {
            return Ok(false);
        }
        self.render()?;
        Ok(true)
    }

    fn render(&mut self) -> Result<()> {
        let Some(doc) = self.current.as_mut() else {
            return Ok(());
        };
        if let Err(err) = self
            .pipeline
            .render(&doc.view, &mut doc.handle, &mut self.display)
        {
            self.close();
            return Err(self.report(err.into()));
        }
        Ok(())
    }

    fn report(&mut self, err: ViewerError) -> ViewerError {
        error!(error = %err, source = ?std::error::Error::source(&err), "viewer command failed");
        self.status.message(&err.to_string());
        err
    }
}
