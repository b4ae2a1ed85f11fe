//! In-memory engine and recording surfaces for session tests.

#![allow(dead_code)]

use anyhow::{anyhow, bail, Result};
use folio_viewer::raster::pixel_size;
use folio_viewer::{Axis, DecodeContext, DisplaySurface, RasterEngine, RenderedFrame};
use image::{Rgba, RgbaImage};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

#[derive(Debug, Clone)]
pub struct FakeDoc {
    pub pages: usize,
    pub size: (f32, f32),
}

#[derive(Debug, Default)]
pub struct Library {
    pub docs: HashMap<PathBuf, FakeDoc>,
    pub broken_pages: HashSet<(PathBuf, usize)>,
    pub uncountable: HashSet<PathBuf>,
    pub fail_context: bool,
    pub fail_handlers: bool,
    pub events: Vec<String>,
    pub renders: usize,
    next_id: usize,
}

/// Engine serving documents registered in a shared [`Library`].
#[derive(Debug, Clone, Default)]
pub struct FakeEngine {
    pub library: Rc<RefCell<Library>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_doc(self, path: &str, pages: usize, size: (f32, f32)) -> Self {
        self.library
            .borrow_mut()
            .docs
            .insert(PathBuf::from(path), FakeDoc { pages, size });
        self
    }

    pub fn break_page(&self, path: &str, page: usize) {
        self.library
            .borrow_mut()
            .broken_pages
            .insert((PathBuf::from(path), page));
    }

    pub fn events(&self) -> Vec<String> {
        self.library.borrow().events.clone()
    }

    /// Pages rasterized so far, across all contexts.
    pub fn renders(&self) -> usize {
        self.library.borrow().renders
    }

    pub fn clear_events(&self) {
        self.library.borrow_mut().events.clear();
    }

    fn log(&self, event: String) {
        self.library.borrow_mut().events.push(event);
    }
}

pub struct FakeContext {
    id: usize,
    engine: FakeEngine,
}

impl Drop for FakeContext {
    fn drop(&mut self) {
        self.engine.log(format!("drop context {}", self.id));
    }
}

pub struct FakeDocument {
    path: PathBuf,
    doc: FakeDoc,
    engine: FakeEngine,
}

impl Drop for FakeDocument {
    fn drop(&mut self) {
        self.engine
            .log(format!("drop document {}", self.path.display()));
    }
}

impl RasterEngine for FakeEngine {
    type Context = FakeContext;

    fn create_context(&self) -> Result<FakeContext> {
        let id = {
            let mut library = self.library.borrow_mut();
            if library.fail_context {
                bail!("out of memory");
            }
            library.next_id += 1;
            library.next_id
        };
        self.log(format!("create context {id}"));
        Ok(FakeContext {
            id,
            engine: self.clone(),
        })
    }
}

impl DecodeContext for FakeContext {
    type Document = FakeDocument;

    fn register_handlers(&mut self) -> Result<()> {
        if self.engine.library.borrow().fail_handlers {
            bail!("no handlers available");
        }
        Ok(())
    }

    fn open_document(&self, path: &Path) -> Result<FakeDocument> {
        let doc = self
            .engine
            .library
            .borrow()
            .docs
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("No such file"))?;
        self.engine.log(format!("open document {}", path.display()));
        Ok(FakeDocument {
            path: path.to_path_buf(),
            doc,
            engine: self.engine.clone(),
        })
    }

    fn count_pages(&self, document: &FakeDocument) -> Result<usize> {
        if self.engine.library.borrow().uncountable.contains(&document.path) {
            bail!("broken page tree");
        }
        Ok(document.doc.pages)
    }

    fn page_size(&self, document: &FakeDocument, _index: usize) -> Result<(f32, f32)> {
        Ok(document.doc.size)
    }

    fn render_page(&self, document: &FakeDocument, index: usize, scale: f32) -> Result<RgbaImage> {
        {
            let mut library = self.engine.library.borrow_mut();
            if library.broken_pages.contains(&(document.path.clone(), index)) {
                bail!("corrupt content stream");
            }
            library.renders += 1;
        }
        let (w, h) = pixel_size(document.doc.size.0 * scale, document.doc.size.1 * scale);
        Ok(RgbaImage::from_pixel(w, h, Rgba([index as u8, 0, 0, 255])))
    }
}

/// Display surface that keeps every frame it was handed.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub frames: Vec<RenderedFrame>,
    pub content_size: Option<(u32, u32)>,
    pub offset_x: f32,
    pub offset_y: f32,
    pub clears: usize,
}

impl RecordingSurface {
    pub fn last_frame(&self) -> Option<&RenderedFrame> {
        self.frames.last()
    }

    pub fn last_size(&self) -> Option<(u32, u32)> {
        self.last_frame().map(|f| (f.width(), f.height()))
    }

    /// Red channel of the first pixel, which the fake engine sets to the page index.
    pub fn last_page_marker(&self) -> Option<u8> {
        self.last_frame().and_then(|f| f.pixels().first().copied())
    }
}

impl DisplaySurface for RecordingSurface {
    fn set_bitmap(&mut self, frame: RenderedFrame) {
        self.frames.push(frame);
    }

    fn set_content_size(&mut self, width: u32, height: u32) {
        self.content_size = Some((width, height));
    }

    fn offset(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.offset_x,
            Axis::Vertical => self.offset_y,
        }
    }

    fn set_offset(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::Horizontal => self.offset_x = value,
            Axis::Vertical => self.offset_y = value,
        }
    }

    fn clear(&mut self) {
        self.content_size = None;
        self.clears += 1;
    }
}
