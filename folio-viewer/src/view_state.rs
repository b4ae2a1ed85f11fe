use tracing::debug;

/// ViewState tracks which page is shown and how it is zoomed and rotated.
///
/// Every mutator returns `true` when the state changed and a render is due.
/// Requests that would leave the valid state space are ignored rather than
/// clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    page_count: usize,
    page_index: usize,
    zoom_percent: f32,
    rotation_degrees: f32,
}

impl ViewState {
    pub const DEFAULT_ZOOM: f32 = 100.0;
    pub const DEFAULT_ROTATION: f32 = 0.0;

    pub fn new(page_count: usize, start_page: usize) -> Self {
        debug_assert!(start_page < page_count.max(1));
        Self {
            page_count,
            page_index: start_page,
            zoom_percent: Self::DEFAULT_ZOOM,
            rotation_degrees: Self::DEFAULT_ROTATION,
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn zoom_percent(&self) -> f32 {
        self.zoom_percent
    }

    pub fn rotation_degrees(&self) -> f32 {
        self.rotation_degrees
    }

    pub fn goto_page_relative(&mut self, delta: i64) -> bool {
        let target = i64::try_from(self.page_index)
            .ok()
            .and_then(|index| index.checked_add(delta));
        let Some(target) = target.and_then(|t| usize::try_from(t).ok()) else {
            return false;
        };
        if target >= self.page_count {
            return false;
        }
        self.page_index = target;
        debug!(page = target, "page changed");
        true
    }

    /// Add `delta_percent` to the zoom unless the result would be zero or below.
    pub fn zoom(&mut self, delta_percent: f32) -> bool {
        let zoom = self.zoom_percent + delta_percent;
        if !zoom.is_finite() || zoom <= 0.0 {
            debug!(zoom = self.zoom_percent, delta_percent, "zoom rejected");
            return false;
        }
        self.zoom_percent = zoom;
        true
    }

    pub fn zoom_reset(&mut self) -> bool {
        self.zoom_percent = Self::DEFAULT_ZOOM;
        true
    }

    /// Add `delta_degrees` and wrap into `[0, 360)`.
    ///
    /// The accumulated angle is truncated to whole degrees before wrapping, so
    /// fractional parts are dropped on every call.
    pub fn rotate(&mut self, delta_degrees: f32) -> bool {
        let accumulated = self.rotation_degrees + delta_degrees;
        self.rotation_degrees = (accumulated as i32).rem_euclid(360) as f32;
        true
    }

    /// Restore default zoom and rotation, keeping the current page.
    pub fn reset_view(&mut self) -> bool {
        self.zoom_percent = Self::DEFAULT_ZOOM;
        self.rotation_degrees = Self::DEFAULT_ROTATION;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn starts_at_requested_page_with_defaults() {
        let view = ViewState::new(10, 3);
        assert_eq!(view.page_index(), 3);
        assert_eq!(view.zoom_percent(), 100.0);
        assert_eq!(view.rotation_degrees(), 0.0);
    }

    #[test]
    fn walks_to_last_page_then_stops() {
        let mut view = ViewState::new(10, 0);
        for _ in 0..9 {
            assert!(view.goto_page_relative(1));
        }
        assert_eq!(view.page_index(), 9);
        assert!(!view.goto_page_relative(1));
        assert_eq!(view.page_index(), 9);
    }

    #[test]
    fn cannot_go_before_first_page() {
        let mut view = ViewState::new(3, 0);
        assert!(!view.goto_page_relative(-1));
        assert!(!view.goto_page_relative(i64::MIN));
        assert_eq!(view.page_index(), 0);
    }

    #[test]
    fn zoom_below_zero_is_rejected() {
        let mut view = ViewState::new(1, 0);
        assert!(!view.zoom(-110.0));
        assert_eq!(view.zoom_percent(), 100.0);
        assert!(!view.zoom(-100.0));
        assert_eq!(view.zoom_percent(), 100.0);
        assert!(view.zoom(-99.5));
        assert_eq!(view.zoom_percent(), 0.5);
    }

    #[test]
    fn zoom_rejects_non_finite_results() {
        let mut view = ViewState::new(1, 0);
        assert!(!view.zoom(f32::NAN));
        assert!(!view.zoom(f32::INFINITY));
        assert_eq!(view.zoom_percent(), 100.0);
    }

    #[test]
    fn four_quarter_turns_return_to_zero() {
        let mut view = ViewState::new(1, 0);
        for expected in [90.0, 180.0, 270.0, 0.0] {
            view.rotate(90.0);
            assert_eq!(view.rotation_degrees(), expected);
        }
    }

    #[test]
    fn rotation_wraps_and_truncates() {
        let mut view = ViewState::new(1, 0);
        view.rotate(450.0);
        assert_eq!(view.rotation_degrees(), 90.0);

        let mut view = ViewState::new(1, 0);
        view.rotate(90.7);
        assert_eq!(view.rotation_degrees(), 90.0);
        assert_eq!(view.rotation_degrees().fract(), 0.0);

        view.rotate(0.7);
        view.rotate(0.7);
        assert_eq!(view.rotation_degrees(), 90.0);
    }

    #[test]
    fn counter_clockwise_rotation_stays_positive() {
        let mut view = ViewState::new(1, 0);
        view.rotate(-90.0);
        assert_eq!(view.rotation_degrees(), 270.0);
    }

    #[test]
    fn reset_view_keeps_page() {
        let mut view = ViewState::new(5, 2);
        view.zoom(40.0);
        view.rotate(180.0);
        view.goto_page_relative(1);
        view.reset_view();
        let once = view.clone();
        view.reset_view();
        assert_eq!(view, once);
        assert_eq!(view.page_index(), 3);
        assert_eq!(view.zoom_percent(), 100.0);
        assert_eq!(view.rotation_degrees(), 0.0);
    }

    proptest! {
        #[test]
        fn page_index_never_leaves_document(
            page_count in 1usize..64,
            moves in proptest::collection::vec(-5i64..=5, 0..40),
        ) {
            let mut view = ViewState::new(page_count, 0);
            for delta in moves {
                let before = view.page_index();
                let moved = view.goto_page_relative(delta);
                let target = before as i64 + delta;
                prop_assert_eq!(moved, target >= 0 && target < page_count as i64);
                if !moved {
                    prop_assert_eq!(view.page_index(), before);
                }
                prop_assert!(view.page_index() < page_count);
            }
        }

        #[test]
        fn zoom_is_always_positive(start in 1.0f32..500.0, delta in -600.0f32..600.0) {
            let mut view = ViewState::new(1, 0);
            view.zoom(start - 100.0);
            let before = view.zoom_percent();
            let changed = view.zoom(delta);
            if before + delta <= 0.0 {
                prop_assert!(!changed);
                prop_assert_eq!(view.zoom_percent(), before);
            } else {
                prop_assert!(changed);
                prop_assert_eq!(view.zoom_percent(), before + delta);
            }
            prop_assert!(view.zoom_percent() > 0.0);
        }

        #[test]
        fn rotation_is_integral_and_wrapped(deltas in proptest::collection::vec(-1000.0f32..1000.0, 1..20)) {
            let mut view = ViewState::new(1, 0);
            for delta in deltas {
                view.rotate(delta);
                let r = view.rotation_degrees();
                prop_assert!((0.0..360.0).contains(&r));
                prop_assert_eq!(r.fract(), 0.0);
            }
        }
    }
}
