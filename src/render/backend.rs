//! The drawing service the graph engine talks to.
//!
//! The engine never paints. It creates and updates retained items through
//! [`RenderBackend`]; the host decides when and how to draw them.

use crate::state::dataset::Sample;

/// Handle to a curve or straight line owned by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineHandle(u64);

impl LineHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Handle to a text annotation owned by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LabelHandle(u64);

impl LabelHandle {
    pub fn new(id: u64) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

/// A vertical line sits at an x value, a horizontal line at a y value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Vertical,
    Horizontal,
}

/// What a straight line is used for; backends style them differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StraightLineRole {
    RangeMarker,
    Calibration,
}

pub trait RenderBackend {
    /// Append a new curve at the top of the z-order.
    fn create_line(&mut self) -> LineHandle;

    fn set_data(&mut self, line: LineHandle, samples: &[Sample]);

    fn create_straight_line(&mut self, orientation: Orientation, role: StraightLineRole) -> LineHandle;

    fn set_position(&mut self, line: LineHandle, value: f64);

    fn set_width(&mut self, line: LineHandle, px: f32);

    /// Remove a curve or straight line. Later curves move down one z-slot.
    fn remove_line(&mut self, line: LineHandle);

    fn create_label(&mut self) -> LabelHandle;

    /// Place `text` at `anchor` (plot space) shifted by `offset_px` on screen.
    fn set_label(&mut self, label: LabelHandle, text: &str, anchor: Sample, offset_px: [f32; 2]);

    fn set_axis_range(&mut self, axis: Axis, low: f64, high: f64);

    fn set_axis_label(&mut self, axis: Axis, text: &str);

    fn request_redraw(&mut self);
}
