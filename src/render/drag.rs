//! Press/move/release handling for the range markers.

use crate::error::GraphError;
use crate::render::backend::{Orientation, RenderBackend};
use crate::render::plot_interaction::PlotView;
use crate::state::markers::{MarkerId, RangeMarkers};

/// Drag gesture state. The axis lock is chosen at press time and cannot
/// change until release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    NoDrag,
    DraggingHorizontal(MarkerId),
    DraggingVertical(MarkerId),
}

impl DragState {
    pub fn marker(&self) -> Option<MarkerId> {
        match *self {
            DragState::NoDrag => None,
            DragState::DraggingHorizontal(id) | DragState::DraggingVertical(id) => Some(id),
        }
    }

    pub fn is_dragging(&self) -> bool {
        *self != DragState::NoDrag
    }
}

#[derive(Debug, Clone)]
pub struct DragInteraction {
    state: DragState,
    tolerance_px: f32,
}

impl DragInteraction {
    pub fn new(tolerance_px: f32) -> Self {
        Self {
            state: DragState::NoDrag,
            tolerance_px,
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn tolerance_px(&self) -> f32 {
        self.tolerance_px
    }

    /// Nearest marker within tolerance of `pos`, measured in pixels across
    /// the marker line. Ties go to the first marker in `MarkerId::ALL`.
    pub fn hit_test(
        &self,
        markers: &RangeMarkers,
        view: &PlotView,
        pos: egui::Pos2,
        rect: egui::Rect,
    ) -> Result<MarkerId, GraphError> {
        let mut best: Option<(MarkerId, f32)> = None;
        for id in MarkerId::ALL {
            let value = markers.position(id);
            let distance = match id.orientation() {
                Orientation::Vertical => (view.data_to_screen(value, view.y_min, rect).x - pos.x).abs(),
                Orientation::Horizontal => (view.data_to_screen(view.x_min, value, rect).y - pos.y).abs(),
            };
            if !distance.is_finite() || distance > self.tolerance_px {
                continue;
            }
            match best {
                Some((_, d)) if d <= distance => {}
                _ => best = Some((id, distance)),
            }
        }
        best.map(|(id, _)| id).ok_or(GraphError::NoHitMarker)
    }

    /// Start a gesture. Any previous gesture is discarded first, so every
    /// press is hit-tested from scratch.
    pub fn press(
        &mut self,
        markers: &RangeMarkers,
        view: &PlotView,
        pos: egui::Pos2,
        rect: egui::Rect,
    ) -> Result<MarkerId, GraphError> {
        self.state = DragState::NoDrag;
        let id = self.hit_test(markers, view, pos, rect)?;
        self.state = match id.orientation() {
            Orientation::Vertical => DragState::DraggingHorizontal(id),
            Orientation::Horizontal => DragState::DraggingVertical(id),
        };
        Ok(id)
    }

    /// Move the grabbed marker along its locked axis. Returns whether a
    /// marker was moved.
    pub fn drag_to<B: RenderBackend>(
        &mut self,
        markers: &mut RangeMarkers,
        backend: &mut B,
        view: &PlotView,
        pos: egui::Pos2,
        rect: egui::Rect,
    ) -> bool {
        let (x, y) = view.screen_to_data(pos, rect);
        match self.state {
            DragState::NoDrag => return false,
            DragState::DraggingHorizontal(id) => markers.move_marker(backend, id, x),
            DragState::DraggingVertical(id) => markers.move_marker(backend, id, y),
        }
        true
    }

    /// End the gesture. Returns the marker that was being dragged, if any.
    pub fn release(&mut self) -> Option<MarkerId> {
        std::mem::take(&mut self.state).marker()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::scene::Scene;
    use crate::state::markers::MarkerPair;

    fn setup() -> (Scene, RangeMarkers, PlotView, egui::Rect) {
        let mut scene = Scene::new();
        let markers = RangeMarkers::new(&mut scene, (2.0, 5.0), (2.0, 8.0), 1.0, [0.0, 0.0]);
        let mut view = PlotView::new();
        view.set_x_range(0.0, 10.0);
        view.set_y_range(0.0, 10.0);
        let rect = egui::Rect::from_min_size(egui::pos2(0.0, 0.0), egui::vec2(100.0, 100.0));
        (scene, markers, view, rect)
    }

    #[test]
    fn press_on_upper_x_locks_horizontal() {
        let (mut scene, mut markers, view, rect) = setup();
        let mut drag = DragInteraction::new(4.0);
        let pos = view.data_to_screen(5.0, 5.0, rect) + egui::vec2(2.0, 0.0);
        assert_eq!(drag.press(&markers, &view, pos, rect), Ok(MarkerId::XHigh));
        assert_eq!(drag.state(), DragState::DraggingHorizontal(MarkerId::XHigh));

        // Off-axis motion must not change the vertical markers.
        let target = view.data_to_screen(7.0, 1.0, rect);
        assert!(drag.drag_to(&mut markers, &mut scene, &view, target, rect));
        assert!((markers.position(MarkerId::XHigh) - 7.0).abs() < 1e-6);
        assert_eq!(markers.position(MarkerId::XLow), 2.0);
        assert_eq!(markers.range(MarkerPair::Y), (2.0, 8.0));
        assert_eq!(drag.state(), DragState::DraggingHorizontal(MarkerId::XHigh));

        assert_eq!(drag.release(), Some(MarkerId::XHigh));
        assert_eq!(drag.state(), DragState::NoDrag);
    }

    #[test]
    fn press_on_y_marker_locks_vertical() {
        let (mut scene, mut markers, view, rect) = setup();
        let mut drag = DragInteraction::new(4.0);
        // x = 9 is far from both x markers.
        let pos = view.data_to_screen(9.0, 8.0, rect);
        assert_eq!(drag.press(&markers, &view, pos, rect), Ok(MarkerId::YHigh));
        drag.drag_to(&mut markers, &mut scene, &view, view.data_to_screen(3.0, 6.0, rect), rect);
        assert!((markers.position(MarkerId::YHigh) - 6.0).abs() < 1e-6);
        assert_eq!(markers.range(MarkerPair::X), (2.0, 5.0));
    }

    #[test]
    fn press_picks_nearest_marker() {
        let (_scene, markers, view, rect) = setup();
        let drag = DragInteraction::new(40.0);
        // 1 px from x = 2 (XLow) and 29 px from x = 5 (XHigh); far from y markers.
        let pos = egui::pos2(21.0, 50.0);
        assert_eq!(drag.hit_test(&markers, &view, pos, rect), Ok(MarkerId::XLow));
    }

    #[test]
    fn press_outside_tolerance_stays_idle() {
        let (mut scene, mut markers, view, rect) = setup();
        let mut drag = DragInteraction::new(4.0);
        let pos = view.data_to_screen(9.0, 5.0, rect);
        assert_eq!(drag.press(&markers, &view, pos, rect), Err(GraphError::NoHitMarker));
        assert!(!drag.state().is_dragging());
        assert!(!drag.drag_to(&mut markers, &mut scene, &view, pos, rect));
        assert_eq!(drag.release(), None);
    }

    #[test]
    fn new_press_reevaluates_from_scratch() {
        let (_scene, markers, view, rect) = setup();
        let mut drag = DragInteraction::new(4.0);
        let on_marker = view.data_to_screen(5.0, 5.0, rect);
        drag.press(&markers, &view, on_marker, rect).unwrap();
        // A press that misses clears the stale gesture.
        let miss = view.data_to_screen(9.0, 5.0, rect);
        assert!(drag.press(&markers, &view, miss, rect).is_err());
        assert_eq!(drag.state(), DragState::NoDrag);
    }
}
