use chrono::{DateTime, Local};
use uuid::Uuid;

use crate::config::GraphConfig;
use crate::error::GraphError;
use crate::render::backend::{Axis, RenderBackend};
use crate::render::drag::{DragInteraction, DragState};
use crate::render::plot_interaction::PlotView;
use crate::state::dataset::{Dataset, DatasetStore, LineWidth, PlotType};
use crate::state::markers::RangeMarkers;
use crate::state::registry::{DrawStyle, LineRegistry};

/// Latest amplitude pushed by the acquisition side, for the readout dialog.
#[derive(Debug, Clone, Default)]
pub struct AmplitudeReadout {
    value: Option<f64>,
    min: f64,
    max: f64,
    updated_at: Option<DateTime<Local>>,
}

impl AmplitudeReadout {
    pub fn push(&mut self, amp: f64) {
        match self.value {
            None => {
                self.min = amp;
                self.max = amp;
            }
            Some(_) => {
                self.min = self.min.min(amp);
                self.max = self.max.max(amp);
            }
        }
        self.value = Some(amp);
        self.updated_at = Some(Local::now());
    }

    pub fn value(&self) -> Option<f64> {
        self.value
    }

    /// (min, max) seen since the last reset.
    pub fn range(&self) -> Option<(f64, f64)> {
        self.value.map(|_| (self.min, self.max))
    }

    pub fn updated_at(&self) -> Option<DateTime<Local>> {
        self.updated_at
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// One graph view: displayed lines, range markers, drag gesture, axes.
///
/// Every public entry point recovers from its own failures: problems are
/// logged and the display stays as it was.
pub struct GraphState<S: DatasetStore, B: RenderBackend> {
    store: S,
    backend: B,
    registry: LineRegistry,
    markers: RangeMarkers,
    drag: DragInteraction,
    view: PlotView,
    plot_type: PlotType,
    line_width: LineWidth,
    live: Option<Dataset>,
    amplitude: AmplitudeReadout,
}

impl<S: DatasetStore, B: RenderBackend> GraphState<S, B> {
    pub fn new(store: S, mut backend: B, config: &GraphConfig) -> Self {
        let [x_lo, x_hi] = config.initial_x_range;
        let [y_lo, y_hi] = config.initial_y_range;
        let markers = RangeMarkers::new(
            &mut backend,
            (x_lo, x_hi),
            (y_lo, y_hi),
            config.line_width.pixels(),
            config.delta_label_offset_px,
        );
        let mut view = PlotView::new();
        view.set_x_range(x_lo, x_hi);
        view.set_y_range(y_lo, y_hi);
        let mut graph = Self {
            store,
            backend,
            registry: LineRegistry::new(),
            markers,
            drag: DragInteraction::new(config.hit_tolerance_px),
            view,
            plot_type: config.plot_type,
            line_width: config.line_width,
            live: None,
            amplitude: AmplitudeReadout::default(),
        };
        graph.rename_axis(config.plot_type);
        graph.apply_view();
        graph
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Mutable store access for the acquisition side. Call `update_lines`
    /// afterwards to pick up changes to displayed datasets.
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn registry(&self) -> &LineRegistry {
        &self.registry
    }

    pub fn markers(&self) -> &RangeMarkers {
        &self.markers
    }

    pub fn view(&self) -> &PlotView {
        &self.view
    }

    pub fn plot_type(&self) -> PlotType {
        self.plot_type
    }

    pub fn line_width(&self) -> LineWidth {
        self.line_width
    }

    pub fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    pub fn live_uid(&self) -> Option<Uuid> {
        self.live.as_ref().map(|d| d.uid)
    }

    pub fn amplitude(&self) -> &AmplitudeReadout {
        &self.amplitude
    }

    pub fn amplitude_mut(&mut self) -> &mut AmplitudeReadout {
        &mut self.amplitude
    }

    fn style(&self) -> DrawStyle {
        DrawStyle {
            plot_type: self.plot_type,
            width: self.line_width,
        }
    }

    // ------------------------------------------------------------------
    // Displaying datasets
    // ------------------------------------------------------------------

    /// Show `dataset`. A live dataset is bound and drawn from the given
    /// snapshot; anything else is registered from the store by uid.
    pub fn display_data_set(&mut self, dataset: &Dataset, live: bool) {
        if !live && self.store.get_dataset(dataset.uid).is_none() {
            tracing::warn!("cannot display {}: {}", dataset.label, GraphError::UidNotFound(dataset.uid));
            return;
        }
        self.adopt_plot_type(dataset.plot_type);
        let style = self.style();
        if live {
            self.bind_live(dataset);
        } else if let Err(e) = self
            .registry
            .add_line(dataset.uid, &self.store, &mut self.backend, style)
        {
            tracing::warn!("cannot display {}: {e}", dataset.label);
        }
        self.rescale_to_fit();
    }

    /// Per-tick refresh of the live dataset. Falls back to binding it when
    /// no live line exists for this uid yet.
    pub fn update_live(&mut self, dataset: &Dataset) {
        let bound = self.live_uid() == Some(dataset.uid) && self.registry.contains(dataset.uid);
        if !bound {
            self.display_data_set(dataset, true);
            return;
        }
        let style = self.style();
        if let Some(live) = self.live.as_mut() {
            live.clone_from(dataset);
            if let Err(e) = self.registry.update_with(live, &mut self.backend, style) {
                tracing::warn!("live update failed: {e}");
            }
        }
        self.rescale_to_fit();
    }

    /// Unbind the live dataset and remove its line.
    pub fn clear_live(&mut self) {
        if let Some(live) = self.live.take() {
            if let Err(e) = self.registry.remove_line(live.uid, &mut self.backend) {
                tracing::warn!("clearing live view: {e}");
            }
            self.rescale_to_fit();
        }
    }

    fn bind_live(&mut self, dataset: &Dataset) {
        let style = self.style();
        if let Some(previous) = self.live.take() {
            if previous.uid != dataset.uid {
                tracing::debug!("replacing live dataset {}", previous.label);
                if let Err(e) = self.registry.remove_line(previous.uid, &mut self.backend) {
                    tracing::warn!("removing previous live line: {e}");
                }
            }
        }
        let live = self.live.insert(dataset.clone());
        if let Err(e) = self.registry.insert_dataset(live, &mut self.backend, style) {
            tracing::warn!("cannot display live dataset: {e}");
        }
    }

    /// Display the dataset behind an application item index.
    pub fn display_item(&mut self, item: usize) {
        let Some(uid) = self.store.uid_for_item(item) else {
            tracing::warn!("{}", GraphError::ItemNotFound(item));
            return;
        };
        if let Some(plot_type) = self.store.get_dataset(uid).map(|d| d.plot_type) {
            self.adopt_plot_type(plot_type);
        }
        let style = self.style();
        match self.registry.add_line(uid, &self.store, &mut self.backend, style) {
            Ok(()) => self.rescale_to_fit(),
            Err(e) => tracing::warn!("cannot display item {item}: {e}"),
        }
    }

    /// Remove the dataset behind an application item index.
    pub fn remove_item(&mut self, item: usize) {
        match self.store.uid_for_item(item) {
            Some(uid) => self.remove_dataset(uid),
            None => tracing::warn!("{}", GraphError::ItemNotFound(item)),
        }
    }

    pub fn remove_dataset(&mut self, uid: Uuid) {
        if self.live_uid() == Some(uid) {
            self.live = None;
        }
        match self.registry.remove_line(uid, &mut self.backend) {
            Ok(()) => self.rescale_to_fit(),
            Err(e) => tracing::warn!("cannot remove: {e}"),
        }
    }

    /// Whether the dataset behind `item` is currently displayed.
    pub fn is_item_displayed(&self, item: usize) -> bool {
        self.store
            .uid_for_item(item)
            .is_some_and(|uid| self.registry.contains(uid))
    }

    /// Re-read every displayed dataset, then rescale.
    pub fn update_lines(&mut self) {
        let style = self.style();
        self.registry
            .update_lines(&self.store, &mut self.backend, style, self.live.as_ref());
        self.rescale_to_fit();
    }

    /// Re-read the store-backed lines only, then rescale. The live line is
    /// left as the last `update_live` drew it. Returns how many lines were
    /// refreshed.
    pub fn update_stored_lines(&mut self) -> usize {
        let style = self.style();
        let live = self.live_uid();
        let uids: Vec<Uuid> = self
            .registry
            .lookup_table()
            .iter()
            .copied()
            .filter(|uid| Some(*uid) != live)
            .collect();
        let mut updated = 0;
        for uid in uids {
            match self.registry.update_line(uid, &self.store, &mut self.backend, style) {
                Ok(()) => updated += 1,
                Err(e) => tracing::warn!("skipping line refresh: {e}"),
            }
        }
        self.rescale_to_fit();
        updated
    }

    // ------------------------------------------------------------------
    // View and axes
    // ------------------------------------------------------------------

    fn adopt_plot_type(&mut self, plot_type: PlotType) {
        if self.registry.is_empty() && !self.plot_type.is_compatible(plot_type) {
            self.set_plot_type(plot_type);
        } else if !self.plot_type.is_compatible(plot_type) {
            tracing::debug!(
                "showing {:?} data in a {:?} view",
                plot_type,
                self.plot_type
            );
        }
    }

    /// Switch the active view type and redraw every line for it.
    pub fn set_plot_type(&mut self, plot_type: PlotType) {
        if plot_type == self.plot_type {
            return;
        }
        tracing::info!("plot type {:?} -> {:?}", self.plot_type, plot_type);
        self.plot_type = plot_type;
        self.rename_axis(plot_type);
        if !plot_type.is_fft() && self.registry.calibration_count() > 0 {
            tracing::debug!("dropping calibration lines outside FFT view");
            self.registry.clear_calibration_lines(&mut self.backend);
        }
        self.update_lines();
    }

    pub fn rename_axis(&mut self, plot_type: PlotType) {
        let (x, y) = plot_type.axis_titles();
        self.backend.set_axis_label(Axis::X, x);
        self.backend.set_axis_label(Axis::Y, y);
        self.backend.request_redraw();
    }

    /// Fit both axes to the union of every displayed line. With nothing to
    /// fit the ranges stay as they are.
    pub fn rescale_to_fit(&mut self) {
        match self.registry.bounds() {
            Some(bounds) => {
                self.view.fit_to_bounds(bounds);
                self.apply_view();
            }
            None => tracing::debug!("{}", GraphError::EmptyRegistry),
        }
    }

    pub fn change_line_width(&mut self, width: LineWidth) {
        tracing::info!("line width -> {}", width.label());
        self.line_width = width;
        self.registry.set_width(&mut self.backend, width);
        self.markers.set_width(&mut self.backend, width.pixels());
        self.backend.request_redraw();
    }

    /// Host-driven pan by a pointer delta in pixels.
    pub fn pan_view(&mut self, delta: egui::Vec2, rect: egui::Rect) {
        self.view.pan(delta, rect);
        self.apply_view();
    }

    /// Host-driven zoom around a pixel position.
    pub fn zoom_view(&mut self, factor: f64, center: egui::Pos2, rect: egui::Rect) {
        self.view.zoom(factor, center, rect);
        self.apply_view();
    }

    fn apply_view(&mut self) {
        self.backend.set_axis_range(Axis::X, self.view.x_min, self.view.x_max);
        self.backend.set_axis_range(Axis::Y, self.view.y_min, self.view.y_max);
        self.backend.request_redraw();
    }

    // ------------------------------------------------------------------
    // Markers and calibration lines
    // ------------------------------------------------------------------

    pub fn set_x_range(&mut self, low: f64, high: f64) {
        self.markers.set_x_range(&mut self.backend, low, high);
    }

    pub fn set_y_range(&mut self, low: f64, high: f64) {
        self.markers.set_y_range(&mut self.backend, low, high);
    }

    /// Place the calibration line of `uid` at `x`. Only FFT views have them.
    pub fn set_calibration_line(&mut self, uid: Uuid, x: f64) -> bool {
        let result = if self.plot_type.is_fft() {
            self.registry
                .set_calibration_line(uid, x, &mut self.backend, self.line_width)
        } else {
            Err(GraphError::NotFftView(self.plot_type))
        };
        match result {
            Ok(()) => {
                self.backend.request_redraw();
                true
            }
            Err(e) => {
                tracing::warn!("cannot set calibration line: {e}");
                false
            }
        }
    }

    pub fn clear_calibration_line(&mut self, uid: Uuid) -> bool {
        let removed = self.registry.clear_calibration_line(uid, &mut self.backend);
        if removed {
            self.backend.request_redraw();
        }
        removed
    }

    pub fn set_amplitude(&mut self, amp: f64) {
        self.amplitude.push(amp);
    }

    // ------------------------------------------------------------------
    // Pointer events from the host canvas
    // ------------------------------------------------------------------

    /// Returns whether a marker was grabbed.
    pub fn handle_mouse_press(&mut self, pos: egui::Pos2, rect: egui::Rect) -> bool {
        match self.drag.press(&self.markers, &self.view, pos, rect) {
            Ok(id) => {
                tracing::debug!("grabbed marker {}", id.label());
                true
            }
            Err(e) => {
                tracing::trace!("{e}");
                false
            }
        }
    }

    /// Returns whether a marker moved.
    pub fn handle_mouse_move(&mut self, pos: egui::Pos2, rect: egui::Rect) -> bool {
        self.drag
            .drag_to(&mut self.markers, &mut self.backend, &self.view, pos, rect)
    }

    /// Also used for focus loss and the pointer leaving mid-drag.
    pub fn handle_mouse_release(&mut self) {
        if let Some(id) = self.drag.release() {
            tracing::debug!("released marker {}", id.label());
        }
    }
}
