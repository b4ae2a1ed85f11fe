//! Error types for opening and rendering documents.

use std::path::PathBuf;
use thiserror::Error;

/// Failures while opening a document.
///
/// The first two kinds mean the rendering engine itself is unusable; callers are
/// expected to terminate. The rest reject a single open request.
#[derive(Debug, Error)]
pub enum OpenError {
    #[error("cannot create decoding context")]
    ContextAllocationFailed(#[source] anyhow::Error),

    #[error("cannot register document handlers")]
    HandlerRegistrationFailed(#[source] anyhow::Error),

    #[error("cannot open document {}", path.display())]
    DocumentOpenFailed {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("cannot count pages of {}", path.display())]
    PageCountFailed {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("start page {requested} is out of range for a document with {page_count} pages")]
    InvalidStartPage { requested: usize, page_count: usize },
}

impl OpenError {
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            OpenError::ContextAllocationFailed(_) | OpenError::HandlerRegistrationFailed(_)
        )
    }
}

/// Failures while rasterizing a page.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("page {page} is out of range for a document with {page_count} pages")]
    PageOutOfRange { page: usize, page_count: usize },

    #[error("cannot render page {page}")]
    RenderFailed {
        page: usize,
        #[source]
        source: anyhow::Error,
    },
}

/// Any error surfaced by a viewer session command.
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error(transparent)]
    Open(#[from] OpenError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

impl ViewerError {
    /// Whether the process cannot continue rendering at all.
    pub fn is_fatal(&self) -> bool {
        match self {
            ViewerError::Open(err) => err.is_fatal(),
            ViewerError::Render(_) => false,
        }
    }
}

pub type Result<T, E = ViewerError> = std::result::Result<T, E>;
