use crate::state::dataset::Sample;

/// Axis-aligned bounding box of plotted data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Bounds {
    /// Bounds over the finite samples, or `None` if there are none.
    pub fn from_samples(samples: &[Sample]) -> Option<Self> {
        let mut bounds: Option<Bounds> = None;
        for s in samples {
            if !s.x.is_finite() || !s.y.is_finite() {
                continue;
            }
            bounds = Some(match bounds {
                None => Bounds {
                    x_min: s.x,
                    x_max: s.x,
                    y_min: s.y,
                    y_max: s.y,
                },
                Some(b) => Bounds {
                    x_min: b.x_min.min(s.x),
                    x_max: b.x_max.max(s.x),
                    y_min: b.y_min.min(s.y),
                    y_max: b.y_max.max(s.y),
                },
            });
        }
        bounds
    }

    pub fn union(self, other: Bounds) -> Bounds {
        Bounds {
            x_min: self.x_min.min(other.x_min),
            x_max: self.x_max.max(other.x_max),
            y_min: self.y_min.min(other.y_min),
            y_max: self.y_max.max(other.y_max),
        }
    }
}

/// Current axis ranges of a graph in plot coordinates, plus the
/// pixel <-> plot mapping for a given canvas rect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotView {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl Default for PlotView {
    fn default() -> Self {
        Self {
            x_min: 0.0,
            x_max: 1.0,
            y_min: 0.0,
            y_max: 1.0,
        }
    }
}

impl PlotView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set both ranges to exactly the given box. An axis with zero span is
    /// widened by 0.5 on each side so the view never degenerates.
    pub fn fit_to_bounds(&mut self, bounds: Bounds) {
        let (x_min, x_max) = non_degenerate(bounds.x_min, bounds.x_max);
        let (y_min, y_max) = non_degenerate(bounds.y_min, bounds.y_max);
        self.x_min = x_min;
        self.x_max = x_max;
        self.y_min = y_min;
        self.y_max = y_max;
    }

    pub fn set_x_range(&mut self, min: f64, max: f64) {
        self.x_min = min;
        self.x_max = max;
    }

    pub fn set_y_range(&mut self, min: f64, max: f64) {
        self.y_min = min;
        self.y_max = max;
    }

    /// Convert screen position to data coordinates.
    pub fn screen_to_data(&self, pos: egui::Pos2, rect: egui::Rect) -> (f64, f64) {
        let t_x = (pos.x - rect.left()) as f64 / rect.width() as f64;
        let t_y = 1.0 - (pos.y - rect.top()) as f64 / rect.height() as f64;
        let data_x = self.x_min + t_x * (self.x_max - self.x_min);
        let data_y = self.y_min + t_y * (self.y_max - self.y_min);
        (data_x, data_y)
    }

    /// Convert data coordinates to screen position.
    pub fn data_to_screen(&self, x: f64, y: f64, rect: egui::Rect) -> egui::Pos2 {
        let t_x = (x - self.x_min) / (self.x_max - self.x_min);
        let t_y = 1.0 - (y - self.y_min) / (self.y_max - self.y_min);
        egui::Pos2::new(
            rect.left() + (t_x as f32) * rect.width(),
            rect.top() + (t_y as f32) * rect.height(),
        )
    }

    /// Shift the view by a pointer drag of `delta` pixels.
    pub fn pan(&mut self, delta: egui::Vec2, rect: egui::Rect) {
        let dx = -(delta.x as f64) * (self.x_max - self.x_min) / rect.width() as f64;
        let dy = (delta.y as f64) * (self.y_max - self.y_min) / rect.height() as f64;
        self.x_min += dx;
        self.x_max += dx;
        self.y_min += dy;
        self.y_max += dy;
    }

    /// Scale the view around a pixel position; `factor < 1` zooms in.
    pub fn zoom(&mut self, factor: f64, center: egui::Pos2, rect: egui::Rect) {
        let factor = factor.clamp(0.5, 2.0);
        let (cx, cy) = self.screen_to_data(center, rect);
        self.x_min = cx + (self.x_min - cx) * factor;
        self.x_max = cx + (self.x_max - cx) * factor;
        self.y_min = cy + (self.y_min - cy) * factor;
        self.y_max = cy + (self.y_max - cy) * factor;
    }
}

fn non_degenerate(min: f64, max: f64) -> (f64, f64) {
    if (max - min).abs() < 1e-15 {
        (min - 0.5, max + 0.5)
    } else {
        (min, max)
    }
}

/// A grid line position on one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLine {
    pub value: f64,
    pub major: bool,
}

/// Grid lines on a 1-2-5 step ladder, five minor lines per major step.
pub fn compute_grid_lines(min: f64, max: f64) -> Vec<GridLine> {
    let range = max - min;
    if range <= 0.0 || !range.is_finite() {
        return Vec::new();
    }

    let raw_step = range / 8.0;
    let order = 10f64.powf(raw_step.log10().floor());
    let normalized = raw_step / order;
    let major_step = match normalized {
        n if n <= 1.0 => order,
        n if n <= 2.0 => 2.0 * order,
        n if n <= 5.0 => 5.0 * order,
        _ => 10.0 * order,
    };
    let minor_step = major_step / 5.0;

    let start = (min / minor_step).floor() as i64;
    let end = (max / minor_step).ceil() as i64;
    (start..=end)
        .map(|i| i as f64 * minor_step)
        .filter(|v| *v >= min && *v <= max)
        .map(|value| GridLine {
            value,
            major: ((value / major_step).round() * major_step - value).abs() < major_step * 0.01,
        })
        .collect()
}

/// Format a numeric value for axis tick labels and readouts.
pub fn format_tick_value(val: f64) -> String {
    if val == 0.0 {
        return "0".to_string();
    }
    if val.abs() >= 1e6 || val.abs() < 1e-3 {
        return format!("{val:.2e}");
    }
    let s = format!("{val:.6}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
