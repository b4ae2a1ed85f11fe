//! Display surface backed by iced widgets.

use crate::raster::RenderedFrame;
use crate::surface::{Axis, DisplaySurface};
use iced::widget::image::Handle;
use iced::widget::scrollable::{self, AbsoluteOffset, Viewport};
use iced::Task;

pub fn page_scroll_id() -> scrollable::Id {
    scrollable::Id::new("page")
}

/// The page image plus the scroll position of the scrollable hosting it.
#[derive(Debug, Clone, Default)]
pub struct PageSurface {
    image: Option<Handle>,
    content_size: (u32, u32),
    offset_x: f32,
    offset_y: f32,
    viewport_size: Option<(f32, f32)>,
}

impl PageSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image(&self) -> Option<&Handle> {
        self.image.as_ref()
    }

    pub fn content_size(&self) -> (u32, u32) {
        self.content_size
    }

    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport_size = Some((width, height));
        self.clamp_offsets();
    }

    /// Record a scroll position reported by the widget.
    pub fn sync_viewport(&mut self, viewport: Viewport) {
        let AbsoluteOffset { x, y } = viewport.absolute_offset();
        self.offset_x = x;
        self.offset_y = y;
        let bounds = viewport.bounds();
        self.set_viewport_size(bounds.width, bounds.height);
    }

    /// Task moving the scrollable to the stored offset.
    pub fn scroll_task<Message>(&self) -> Task<Message> {
        scrollable::scroll_to(
            page_scroll_id(),
            AbsoluteOffset {
                x: self.offset_x,
                y: self.offset_y,
            },
        )
    }

    fn max_offset(&self, axis: Axis) -> f32 {
        let (content, viewport) = match axis {
            Axis::Horizontal => (self.content_size.0, self.viewport_size.map(|v| v.0)),
            Axis::Vertical => (self.content_size.1, self.viewport_size.map(|v| v.1)),
        };
        (content as f32 - viewport.unwrap_or(0.0)).max(0.0)
    }

    fn clamp_offsets(&mut self) {
        self.offset_x = self.offset_x.clamp(0.0, self.max_offset(Axis::Horizontal));
        self.offset_y = self.offset_y.clamp(0.0, self.max_offset(Axis::Vertical));
    }
}

impl DisplaySurface for PageSurface {
    fn set_bitmap(&mut self, frame: RenderedFrame) {
        let (width, height) = (frame.width(), frame.height());
        self.image = Some(Handle::from_rgba(width, height, frame.into_pixels()));
    }

    fn set_content_size(&mut self, width: u32, height: u32) {
        self.content_size = (width, height);
        self.clamp_offsets();
    }

    fn offset(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.offset_x,
            Axis::Vertical => self.offset_y,
        }
    }

    fn set_offset(&mut self, axis: Axis, value: f32) {
        let value = value.clamp(0.0, self.max_offset(axis));
        match axis {
            Axis::Horizontal => self.offset_x = value,
            Axis::Vertical => self.offset_y = value,
        }
    }

    fn clear(&mut self) {
        *self = Self {
            viewport_size: self.viewport_size,
            ..Self::default()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn frame(width: u32, height: u32) -> RenderedFrame {
        RenderedFrame::from_image(RgbaImage::from_pixel(width, height, Rgba([1, 2, 3, 255])))
    }

    #[test]
    fn shows_frame_and_content_size() {
        let mut surface = PageSurface::new();
        assert!(surface.image().is_none());
        surface.set_bitmap(frame(30, 60));
        surface.set_content_size(30, 60);
        assert!(surface.image().is_some());
        assert_eq!(surface.content_size(), (30, 60));
    }

    #[test]
    fn offsets_stay_inside_scrollable_range() {
        let mut surface = PageSurface::new();
        surface.set_content_size(500, 1000);
        surface.set_viewport_size(400.0, 400.0);
        surface.set_offset(Axis::Vertical, 30.0);
        assert_eq!(surface.offset(Axis::Vertical), 30.0);
        surface.set_offset(Axis::Vertical, 5000.0);
        assert_eq!(surface.offset(Axis::Vertical), 600.0);
        surface.set_offset(Axis::Horizontal, -30.0);
        assert_eq!(surface.offset(Axis::Horizontal), 0.0);
        surface.set_offset(Axis::Horizontal, 250.0);
        assert_eq!(surface.offset(Axis::Horizontal), 100.0);
    }

    #[test]
    fn shrinking_content_pulls_offsets_back() {
        let mut surface = PageSurface::new();
        surface.set_viewport_size(100.0, 100.0);
        surface.set_content_size(400, 400);
        surface.set_offset(Axis::Vertical, 300.0);
        surface.set_content_size(200, 200);
        assert_eq!(surface.offset(Axis::Vertical), 100.0);
    }

    #[test]
    fn clear_forgets_page_but_not_viewport() {
        let mut surface = PageSurface::new();
        surface.set_viewport_size(100.0, 100.0);
        surface.set_bitmap(frame(300, 300));
        surface.set_content_size(300, 300);
        surface.set_offset(Axis::Horizontal, 60.0);
        surface.clear();
        assert!(surface.image().is_none());
        assert_eq!(surface.content_size(), (0, 0));
        assert_eq!(surface.offset(Axis::Horizontal), 0.0);
        surface.set_content_size(300, 300);
        surface.set_offset(Axis::Horizontal, 500.0);
        assert_eq!(surface.offset(Axis::Horizontal), 200.0);
    }
}
