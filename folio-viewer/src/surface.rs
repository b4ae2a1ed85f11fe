//! Capabilities the viewer pushes its output to.

use crate::raster::RenderedFrame;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Scroll direction along an axis: `Forward` is right or down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Forward => 1.0,
            Direction::Backward => -1.0,
        }
    }
}

/// Shows the current page and hosts a scrollable viewport around it.
pub trait DisplaySurface {
    /// Take ownership of a new frame, replacing the previous one.
    fn set_bitmap(&mut self, frame: RenderedFrame);

    fn set_content_size(&mut self, width: u32, height: u32);

    fn offset(&self, axis: Axis) -> f32;

    fn set_offset(&mut self, axis: Axis, value: f32);

    /// Drop the displayed frame; nothing is open anymore.
    fn clear(&mut self);
}

/// Best-effort status line. Every method defaults to doing nothing so that a
/// missing status line never affects the viewer.
pub trait StatusSink {
    fn set_file_name(&mut self, _name: &str) {}

    fn set_page_count(&mut self, _count: usize) {}

    /// Zero-based index of the page on screen.
    fn set_current_page(&mut self, _index: usize) {}

    fn message(&mut self, _text: &str) {}

    fn clear(&mut self) {}
}

impl StatusSink for () {}
