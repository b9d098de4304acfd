use crate::processing::downsampling;
use crate::render::backend::{Axis, Orientation, StraightLineRole};
use crate::render::plot_interaction::{self, GridLine, PlotView};
use crate::render::scene::Scene;
use crate::state::dataset::{LineWidth, MemoryStore, PlotType};
use crate::state::graph_state::GraphState;
use crate::state::markers::MarkerPair;

pub type SceneGraph = GraphState<MemoryStore, Scene>;

/// Actions that the graph panel can request from the parent.
pub enum GraphAction {
    None,
    ToggleDatasets,
    ToggleAmplitude,
    ToggleRunning,
    SaveConfig,
    LoadConfig,
}

const MARKER_COLOR: egui::Color32 = egui::Color32::from_rgb(230, 180, 40);
const CALIBRATION_COLOR: egui::Color32 = egui::Color32::from_rgb(220, 60, 60);

/// Helper to create a toolbar button with consistent min size.
fn toolbar_btn(ui: &mut egui::Ui, label: &str) -> egui::Response {
    ui.add(egui::Button::new(label).min_size(egui::vec2(0.0, 26.0)))
}

/// Helper to create a selected/toggled toolbar button.
fn toolbar_toggle_btn(ui: &mut egui::Ui, label: &str, active: bool) -> egui::Response {
    let btn = if active {
        egui::Button::new(egui::RichText::new(label).strong())
            .fill(ui.visuals().selection.bg_fill)
            .min_size(egui::vec2(0.0, 26.0))
    } else {
        egui::Button::new(label).min_size(egui::vec2(0.0, 26.0))
    };
    ui.add(btn)
}

/// Toggle flags shown highlighted in the toolbar.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanelFlags {
    pub datasets_open: bool,
    pub amplitude_open: bool,
    pub running: bool,
}

/// Render the toolbar and plot canvas. Returns an action if the user
/// clicked a button that the parent has to handle.
pub fn show_graph_panel(graph: &mut SceneGraph, ui: &mut egui::Ui, flags: PanelFlags) -> GraphAction {
    let mut action = GraphAction::None;

    ui.horizontal(|ui| {
        let mut plot_type = graph.plot_type();
        egui::ComboBox::from_id_salt("plot_type")
            .selected_text(plot_type.label())
            .show_ui(ui, |ui| {
                for t in PlotType::ALL {
                    ui.selectable_value(&mut plot_type, t, t.label());
                }
            });
        if plot_type != graph.plot_type() {
            graph.set_plot_type(plot_type);
        }

        let mut width = graph.line_width();
        egui::ComboBox::from_id_salt("line_width")
            .selected_text(width.label())
            .show_ui(ui, |ui| {
                for w in LineWidth::ALL {
                    ui.selectable_value(&mut width, w, w.label());
                }
            });
        if width != graph.line_width() {
            graph.change_line_width(width);
        }

        ui.separator();
        if toolbar_btn(ui, "Fit").on_hover_text("Rescale axes to all lines").clicked() {
            graph.rescale_to_fit();
        }
        let run_label = if flags.running { "Pause" } else { "Run" };
        if toolbar_toggle_btn(ui, run_label, flags.running).clicked() {
            action = GraphAction::ToggleRunning;
        }
        if toolbar_toggle_btn(ui, "Datasets", flags.datasets_open).clicked() {
            action = GraphAction::ToggleDatasets;
        }
        if toolbar_toggle_btn(ui, "Amplitude", flags.amplitude_open).clicked() {
            action = GraphAction::ToggleAmplitude;
        }
        ui.separator();
        if toolbar_btn(ui, "Save settings").clicked() {
            action = GraphAction::SaveConfig;
        }
        if toolbar_btn(ui, "Load settings").clicked() {
            action = GraphAction::LoadConfig;
        }
    });

    ui.horizontal(|ui| {
        range_editor(ui, "X range", graph.markers().range(MarkerPair::X), |lo, hi| {
            graph.set_x_range(lo, hi)
        });
        ui.separator();
        range_editor(ui, "Y range", graph.markers().range(MarkerPair::Y), |lo, hi| {
            graph.set_y_range(lo, hi)
        });
    });

    ui.add_space(4.0);
    show_plot(graph, ui);
    action
}

/// Two drag values editing a marker pair. `apply` runs only on change.
fn range_editor(ui: &mut egui::Ui, label: &str, range: (f64, f64), apply: impl FnOnce(f64, f64)) {
    let (mut lo, mut hi) = range;
    ui.label(label);
    let speed = ((hi - lo).abs() / 200.0).max(1e-6);
    let changed = ui.add(egui::DragValue::new(&mut lo).speed(speed)).changed()
        | ui.add(egui::DragValue::new(&mut hi).speed(speed)).changed();
    if changed {
        apply(lo, hi);
    }
}

fn show_plot(graph: &mut SceneGraph, ui: &mut egui::Ui) {
    // --- Layout: left margin for Y axis, main plot area ---
    let left_margin = 70.0_f32;
    let right_margin = 20.0_f32;
    let bottom_margin = 40.0_f32;
    let top_margin = 10.0_f32;

    let total_rect = ui.allocate_space(ui.available_size()).1;
    let plot_rect = egui::Rect::from_min_max(
        egui::Pos2::new(total_rect.left() + left_margin, total_rect.top() + top_margin),
        egui::Pos2::new(total_rect.right() - right_margin, total_rect.bottom() - bottom_margin),
    );
    if plot_rect.width() < 10.0 || plot_rect.height() < 10.0 {
        return;
    }

    let response = ui.interact(plot_rect, egui::Id::new("scope_plot"), egui::Sense::click_and_drag());
    handle_input(graph, ui, &response, plot_rect);

    let painter = ui.painter_at(total_rect);
    painter.rect_filled(plot_rect, 0.0, ui.visuals().extreme_bg_color);

    let view = *graph.view();
    let x_grid = plot_interaction::compute_grid_lines(view.x_min, view.x_max);
    let y_grid = plot_interaction::compute_grid_lines(view.y_min, view.y_max);
    draw_grid(&painter, &view, plot_rect, &x_grid, &y_grid);

    let plot_painter = painter.with_clip_rect(plot_rect);
    draw_curves(&plot_painter, graph.backend(), &view, plot_rect);
    draw_straight_lines(&plot_painter, graph.backend(), &view, plot_rect);
    draw_labels(&plot_painter, graph.backend(), &view, plot_rect);
    draw_axes_and_labels(&painter, graph.backend(), &view, plot_rect, total_rect, &x_grid, &y_grid);

    if graph.registry().is_empty() {
        painter.text(
            plot_rect.center(),
            egui::Align2::CENTER_CENTER,
            "No data displayed",
            egui::FontId::proportional(16.0),
            ui.visuals().weak_text_color(),
        );
    }
}

/// Feed pointer events to the graph. A press that misses every marker pans
/// the view instead.
fn handle_input(graph: &mut SceneGraph, ui: &egui::Ui, response: &egui::Response, rect: egui::Rect) {
    if response.drag_started_by(egui::PointerButton::Primary) {
        if let Some(origin) = ui.input(|i| i.pointer.press_origin()) {
            graph.handle_mouse_press(origin, rect);
        }
    }

    if response.dragged_by(egui::PointerButton::Primary) {
        if graph.drag_state().is_dragging() {
            if let Some(pos) = response.interact_pointer_pos() {
                graph.handle_mouse_move(pos, rect);
            }
        } else {
            graph.pan_view(response.drag_delta(), rect);
        }
    } else if graph.drag_state().is_dragging() {
        // Drag ended this frame, possibly outside the canvas.
        graph.handle_mouse_release();
    }

    if response.hovered() {
        let scroll = ui.input(|i| i.smooth_scroll_delta.y);
        if scroll.abs() > 0.0 {
            if let Some(pos) = response.hover_pos() {
                graph.zoom_view(1.0 - scroll as f64 * 0.001, pos, rect);
            }
        }
    }

    if response.double_clicked() {
        graph.rescale_to_fit();
    }

    // Right click in an FFT view puts the calibration line of the topmost
    // line at the clicked frequency. Shift-right click clears it.
    if response.secondary_clicked() {
        let top = graph.registry().lookup_table().last().copied();
        if let (Some(uid), Some(pos)) = (top, response.interact_pointer_pos()) {
            if ui.input(|i| i.modifiers.shift) {
                graph.clear_calibration_line(uid);
            } else {
                let (x, _) = graph.view().screen_to_data(pos, rect);
                graph.set_calibration_line(uid, x);
            }
        }
    }
}

fn draw_grid(painter: &egui::Painter, view: &PlotView, rect: egui::Rect, x_grid: &[GridLine], y_grid: &[GridLine]) {
    let major = egui::Stroke::new(1.0, painter.ctx().style().visuals.text_color().gamma_multiply(0.15));
    let minor = egui::Stroke::new(0.5, painter.ctx().style().visuals.text_color().gamma_multiply(0.06));
    for g in x_grid {
        let x = view.data_to_screen(g.value, view.y_min, rect).x;
        let stroke = if g.major { major } else { minor };
        painter.line_segment([egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())], stroke);
    }
    for g in y_grid {
        let y = view.data_to_screen(view.x_min, g.value, rect).y;
        let stroke = if g.major { major } else { minor };
        painter.line_segment([egui::pos2(rect.left(), y), egui::pos2(rect.right(), y)], stroke);
    }
}

fn draw_curves(painter: &egui::Painter, scene: &Scene, view: &PlotView, rect: egui::Rect) {
    let max_points = (rect.width() as usize * 2).max(64);
    for curve in scene.curves() {
        if curve.samples.len() < 2 {
            continue;
        }
        let visible = downsampling::downsample_for_view(&curve.samples, view.x_min, view.x_max, max_points);
        let points: Vec<egui::Pos2> = visible
            .iter()
            .filter(|s| s.x.is_finite() && s.y.is_finite())
            .map(|s| view.data_to_screen(s.x, s.y, rect))
            .collect();
        let [r, g, b, a] = curve.color;
        let color = egui::Color32::from_rgba_unmultiplied(r, g, b, a);
        painter.add(egui::Shape::line(points, egui::Stroke::new(curve.width, color)));
    }
}

fn draw_straight_lines(painter: &egui::Painter, scene: &Scene, view: &PlotView, rect: egui::Rect) {
    for line in scene.straight_lines() {
        let color = match line.role {
            StraightLineRole::RangeMarker => MARKER_COLOR,
            StraightLineRole::Calibration => CALIBRATION_COLOR,
        };
        let stroke = egui::Stroke::new(line.width, color);
        let segment = match line.orientation {
            Orientation::Vertical => {
                let x = view.data_to_screen(line.value, view.y_min, rect).x;
                [egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())]
            }
            Orientation::Horizontal => {
                let y = view.data_to_screen(view.x_min, line.value, rect).y;
                [egui::pos2(rect.left(), y), egui::pos2(rect.right(), y)]
            }
        };
        match line.role {
            StraightLineRole::RangeMarker => {
                painter.add(egui::Shape::dashed_line(&segment, stroke, 6.0, 4.0));
            }
            StraightLineRole::Calibration => {
                painter.line_segment(segment, stroke);
            }
        }
    }
}

fn draw_labels(painter: &egui::Painter, scene: &Scene, view: &PlotView, rect: egui::Rect) {
    let font = egui::FontId::monospace(12.0);
    let text_color = painter.ctx().style().visuals.text_color();
    let bg_color = painter.ctx().style().visuals.window_fill;
    for label in scene.labels() {
        if label.text.is_empty() {
            continue;
        }
        let anchor = view.data_to_screen(label.anchor.x, label.anchor.y, rect);
        let pos = anchor + egui::vec2(label.offset_px[0], label.offset_px[1]);
        let galley = painter.layout_no_wrap(label.text.clone(), font.clone(), text_color);
        let bg_rect = egui::Rect::from_min_size(pos, galley.size()).expand(4.0);
        painter.rect_filled(bg_rect, 3.0, bg_color.gamma_multiply(0.9));
        painter.rect_stroke(bg_rect, 3.0, egui::Stroke::new(0.5, MARKER_COLOR), egui::StrokeKind::Outside);
        painter.galley(pos, galley, text_color);
    }
}

fn draw_axes_and_labels(
    painter: &egui::Painter,
    scene: &Scene,
    view: &PlotView,
    plot_rect: egui::Rect,
    total_rect: egui::Rect,
    x_grid: &[GridLine],
    y_grid: &[GridLine],
) {
    let text_color = painter.ctx().style().visuals.text_color();
    let dim_color = text_color.gamma_multiply(0.6);

    painter.rect_stroke(plot_rect, 0.0, egui::Stroke::new(1.0, dim_color), egui::StrokeKind::Outside);

    for g in x_grid.iter().filter(|g| g.major) {
        let screen_x = view.data_to_screen(g.value, view.y_min, plot_rect).x;
        painter.text(
            egui::Pos2::new(screen_x, plot_rect.bottom() + 4.0),
            egui::Align2::CENTER_TOP,
            plot_interaction::format_tick_value(g.value),
            egui::FontId::proportional(10.0),
            dim_color,
        );
    }
    painter.text(
        egui::Pos2::new(plot_rect.center().x, total_rect.bottom() - 4.0),
        egui::Align2::CENTER_BOTTOM,
        scene.axis_label(Axis::X),
        egui::FontId::proportional(12.0),
        text_color,
    );

    for g in y_grid.iter().filter(|g| g.major) {
        let screen_y = view.data_to_screen(view.x_min, g.value, plot_rect).y;
        painter.text(
            egui::Pos2::new(plot_rect.left() - 4.0, screen_y),
            egui::Align2::RIGHT_CENTER,
            plot_interaction::format_tick_value(g.value),
            egui::FontId::proportional(10.0),
            dim_color,
        );
    }
    // Y title sits above the tick column.
    painter.text(
        egui::Pos2::new(total_rect.left() + 2.0, total_rect.top()),
        egui::Align2::LEFT_TOP,
        scene.axis_label(Axis::Y),
        egui::FontId::proportional(12.0),
        text_color,
    );
}
