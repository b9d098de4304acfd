//! The four draggable range markers and their shared delta label.

use crate::render::backend::{LabelHandle, LineHandle, Orientation, RenderBackend, StraightLineRole};
use crate::render::plot_interaction::format_tick_value;
use crate::state::dataset::Sample;

/// One of the four fixed markers. X markers are vertical lines dragged
/// horizontally, Y markers are horizontal lines dragged vertically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MarkerId {
    XLow,
    XHigh,
    YLow,
    YHigh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerPair {
    X,
    Y,
}

impl MarkerId {
    pub const ALL: [MarkerId; 4] = [MarkerId::XLow, MarkerId::XHigh, MarkerId::YLow, MarkerId::YHigh];

    fn index(self) -> usize {
        match self {
            MarkerId::XLow => 0,
            MarkerId::XHigh => 1,
            MarkerId::YLow => 2,
            MarkerId::YHigh => 3,
        }
    }

    pub fn pair(self) -> MarkerPair {
        match self {
            MarkerId::XLow | MarkerId::XHigh => MarkerPair::X,
            MarkerId::YLow | MarkerId::YHigh => MarkerPair::Y,
        }
    }

    pub fn orientation(self) -> Orientation {
        match self.pair() {
            MarkerPair::X => Orientation::Vertical,
            MarkerPair::Y => Orientation::Horizontal,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MarkerId::XLow => "x1",
            MarkerId::XHigh => "x2",
            MarkerId::YLow => "y1",
            MarkerId::YHigh => "y2",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RangeMarkers {
    handles: [LineHandle; 4],
    positions: [f64; 4],
    label: LabelHandle,
    label_offset_px: [f32; 2],
}

impl RangeMarkers {
    /// Create the four markers and the delta label on `backend`.
    pub fn new<B: RenderBackend>(
        backend: &mut B,
        x_range: (f64, f64),
        y_range: (f64, f64),
        width: f32,
        label_offset_px: [f32; 2],
    ) -> Self {
        let handles = MarkerId::ALL.map(|id| {
            let handle = backend.create_straight_line(id.orientation(), StraightLineRole::RangeMarker);
            backend.set_width(handle, width);
            handle
        });
        let markers = Self {
            handles,
            positions: [x_range.0, x_range.1, y_range.0, y_range.1],
            label: backend.create_label(),
            label_offset_px,
        };
        for id in MarkerId::ALL {
            backend.set_position(markers.handle(id), markers.position(id));
        }
        markers.refresh_label(backend);
        markers
    }

    pub fn position(&self, id: MarkerId) -> f64 {
        self.positions[id.index()]
    }

    pub fn handle(&self, id: MarkerId) -> LineHandle {
        self.handles[id.index()]
    }

    /// (low marker, high marker) positions of a pair, as placed.
    pub fn range(&self, pair: MarkerPair) -> (f64, f64) {
        match pair {
            MarkerPair::X => (self.position(MarkerId::XLow), self.position(MarkerId::XHigh)),
            MarkerPair::Y => (self.position(MarkerId::YLow), self.position(MarkerId::YHigh)),
        }
    }

    pub fn delta(&self, pair: MarkerPair) -> f64 {
        let (low, high) = self.range(pair);
        (high - low).abs()
    }

    /// Midpoint of both pairs; the delta label hangs off this point.
    pub fn label_anchor(&self) -> Sample {
        let (x1, x2) = self.range(MarkerPair::X);
        let (y1, y2) = self.range(MarkerPair::Y);
        Sample::new((x1 + x2) * 0.5, (y1 + y2) * 0.5)
    }

    pub fn label_text(&self) -> String {
        format!(
            "\u{0394}x = {}\n\u{0394}y = {}",
            format_tick_value(self.delta(MarkerPair::X)),
            format_tick_value(self.delta(MarkerPair::Y))
        )
    }

    /// Reposition a single marker. Non-finite positions are ignored.
    pub fn move_marker<B: RenderBackend>(&mut self, backend: &mut B, id: MarkerId, value: f64) {
        if !value.is_finite() {
            tracing::warn!("ignoring non-finite position for marker {}", id.label());
            return;
        }
        self.positions[id.index()] = value;
        backend.set_position(self.handle(id), value);
        self.refresh_label(backend);
    }

    pub fn set_x_range<B: RenderBackend>(&mut self, backend: &mut B, low: f64, high: f64) {
        self.set_pair(backend, MarkerId::XLow, MarkerId::XHigh, low, high);
    }

    pub fn set_y_range<B: RenderBackend>(&mut self, backend: &mut B, low: f64, high: f64) {
        self.set_pair(backend, MarkerId::YLow, MarkerId::YHigh, low, high);
    }

    fn set_pair<B: RenderBackend>(&mut self, backend: &mut B, lo: MarkerId, hi: MarkerId, low: f64, high: f64) {
        if !low.is_finite() || !high.is_finite() {
            tracing::warn!("ignoring non-finite marker range {low}..{high}");
            return;
        }
        self.positions[lo.index()] = low;
        self.positions[hi.index()] = high;
        backend.set_position(self.handle(lo), low);
        backend.set_position(self.handle(hi), high);
        self.refresh_label(backend);
    }

    pub fn set_width<B: RenderBackend>(&self, backend: &mut B, px: f32) {
        for handle in self.handles {
            backend.set_width(handle, px);
        }
    }

    fn refresh_label<B: RenderBackend>(&self, backend: &mut B) {
        backend.set_label(self.label, &self.label_text(), self.label_anchor(), self.label_offset_px);
        backend.request_redraw();
    }
}
