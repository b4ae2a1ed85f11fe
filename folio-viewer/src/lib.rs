//! Single-page document viewer core.
//!
//! A [`ViewerSession`] owns the open [`DocumentHandle`] and its [`ViewState`];
//! every command mutates the view and synchronously pushes a freshly
//! rasterized [`RenderedFrame`] to a [`DisplaySurface`].

pub mod bindings;
pub mod config;
pub mod display;
pub mod document;
pub mod engine;
pub mod error;
pub mod pipeline;
pub mod raster;
pub mod renderer;
pub mod session;
pub mod status;
pub mod surface;
pub mod transform;
pub mod view_state;

pub use bindings::{Action, KeyChord};
pub use config::{Cli, RenderFailurePolicy, ViewerConfig};
pub use document::DocumentHandle;
pub use engine::{DecodeContext, RasterEngine};
pub use error::{OpenError, RenderError, ViewerError};
pub use pipeline::RenderPipeline;
pub use raster::RenderedFrame;
pub use renderer::PdfRenderer;
pub use session::ViewerSession;
pub use status::StatusBar;
pub use surface::{Axis, Direction, DisplaySurface, StatusSink};
pub use transform::Transform;
pub use view_state::ViewState;
