//! Retained in-memory backend. The egui panel paints straight from it.

use crate::render::backend::{
    Axis, LabelHandle, LineHandle, Orientation, RenderBackend, StraightLineRole,
};
use crate::state::dataset::Sample;

/// Curve colors, cycled in creation order.
pub const COLOR_PALETTE: [[u8; 4]; 10] = [
    [31, 119, 180, 255],  // Blue
    [255, 127, 14, 255],  // Orange
    [44, 160, 44, 255],   // Green
    [214, 39, 40, 255],   // Red
    [148, 103, 189, 255], // Purple
    [140, 86, 75, 255],   // Brown
    [227, 119, 194, 255], // Pink
    [127, 127, 127, 255], // Gray
    [188, 189, 34, 255],  // Olive
    [23, 190, 207, 255],  // Cyan
];

pub fn color_for_index(index: usize) -> [u8; 4] {
    COLOR_PALETTE[index % COLOR_PALETTE.len()]
}

#[derive(Debug, Clone)]
pub struct Curve {
    pub handle: LineHandle,
    pub samples: Vec<Sample>,
    pub width: f32,
    pub color: [u8; 4],
}

#[derive(Debug, Clone)]
pub struct StraightLine {
    pub handle: LineHandle,
    pub orientation: Orientation,
    pub role: StraightLineRole,
    pub value: f64,
    pub width: f32,
}

#[derive(Debug, Clone)]
pub struct TextLabel {
    pub handle: LabelHandle,
    pub text: String,
    pub anchor: Sample,
    pub offset_px: [f32; 2],
}

#[derive(Debug, Clone)]
pub struct Scene {
    curves: Vec<Curve>,
    straight_lines: Vec<StraightLine>,
    labels: Vec<TextLabel>,
    x_range: (f64, f64),
    y_range: (f64, f64),
    x_label: String,
    y_label: String,
    next_id: u64,
    colors_used: usize,
    redraw_requested: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            curves: Vec::new(),
            straight_lines: Vec::new(),
            labels: Vec::new(),
            x_range: (0.0, 1.0),
            y_range: (0.0, 1.0),
            x_label: String::new(),
            y_label: String::new(),
            next_id: 1,
            colors_used: 0,
            redraw_requested: false,
        }
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Curves in z-order, bottom first.
    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    pub fn curve(&self, handle: LineHandle) -> Option<&Curve> {
        self.curves.iter().find(|c| c.handle == handle)
    }

    pub fn straight_lines(&self) -> &[StraightLine] {
        &self.straight_lines
    }

    pub fn straight_line(&self, handle: LineHandle) -> Option<&StraightLine> {
        self.straight_lines.iter().find(|l| l.handle == handle)
    }

    pub fn labels(&self) -> &[TextLabel] {
        &self.labels
    }

    pub fn line_count(&self) -> usize {
        self.curves.len()
    }

    pub fn axis_range(&self, axis: Axis) -> (f64, f64) {
        match axis {
            Axis::X => self.x_range,
            Axis::Y => self.y_range,
        }
    }

    pub fn axis_label(&self, axis: Axis) -> &str {
        match axis {
            Axis::X => &self.x_label,
            Axis::Y => &self.y_label,
        }
    }

    /// Returns whether a redraw was requested since the last call.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.redraw_requested)
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl RenderBackend for Scene {
    fn create_line(&mut self) -> LineHandle {
        let handle = LineHandle::new(self.next_id());
        let color = color_for_index(self.colors_used);
        self.colors_used += 1;
        self.curves.push(Curve {
            handle,
            samples: Vec::new(),
            width: 1.0,
            color,
        });
        handle
    }

    fn set_data(&mut self, line: LineHandle, samples: &[Sample]) {
        match self.curves.iter_mut().find(|c| c.handle == line) {
            Some(curve) => {
                curve.samples.clear();
                curve.samples.extend_from_slice(samples);
            }
            None => tracing::warn!("set_data on unknown curve {:?}", line),
        }
    }

    fn create_straight_line(&mut self, orientation: Orientation, role: StraightLineRole) -> LineHandle {
        let handle = LineHandle::new(self.next_id());
        self.straight_lines.push(StraightLine {
            handle,
            orientation,
            role,
            value: 0.0,
            width: 1.0,
        });
        handle
    }

    fn set_position(&mut self, line: LineHandle, value: f64) {
        match self.straight_lines.iter_mut().find(|l| l.handle == line) {
            Some(straight) => straight.value = value,
            None => tracing::warn!("set_position on unknown straight line {:?}", line),
        }
    }

    fn set_width(&mut self, line: LineHandle, px: f32) {
        if let Some(curve) = self.curves.iter_mut().find(|c| c.handle == line) {
            curve.width = px;
        } else if let Some(straight) = self.straight_lines.iter_mut().find(|l| l.handle == line) {
            straight.width = px;
        } else {
            tracing::warn!("set_width on unknown line {:?}", line);
        }
    }

    fn remove_line(&mut self, line: LineHandle) {
        if let Some(pos) = self.curves.iter().position(|c| c.handle == line) {
            self.curves.remove(pos);
        } else if let Some(pos) = self.straight_lines.iter().position(|l| l.handle == line) {
            self.straight_lines.remove(pos);
        } else {
            tracing::warn!("remove_line on unknown line {:?}", line);
        }
    }

    fn create_label(&mut self) -> LabelHandle {
        let handle = LabelHandle::new(self.next_id());
        self.labels.push(TextLabel {
            handle,
            text: String::new(),
            anchor: Sample::new(0.0, 0.0),
            offset_px: [0.0, 0.0],
        });
        handle
    }

    fn set_label(&mut self, label: LabelHandle, text: &str, anchor: Sample, offset_px: [f32; 2]) {
        if let Some(l) = self.labels.iter_mut().find(|l| l.handle == label) {
            l.text.clear();
            l.text.push_str(text);
            l.anchor = anchor;
            l.offset_px = offset_px;
        }
    }

    fn set_axis_range(&mut self, axis: Axis, low: f64, high: f64) {
        match axis {
            Axis::X => self.x_range = (low, high),
            Axis::Y => self.y_range = (low, high),
        }
    }

    fn set_axis_label(&mut self, axis: Axis, text: &str) {
        match axis {
            Axis::X => self.x_label = text.to_string(),
            Axis::Y => self.y_label = text.to_string(),
        }
    }

    fn request_redraw(&mut self) {
        self.redraw_requested = true;
    }
}
