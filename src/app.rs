use std::time::{Duration, Instant};

use eframe::egui;

use crate::config::GraphConfig;
use crate::data::acquisition::DemoSource;
use crate::render::scene::Scene;
use crate::state::dataset::MemoryStore;
use crate::state::graph_state::GraphState;
use crate::ui::amplitude_dialog;
use crate::ui::dataset_dialog;
use crate::ui::graph_panel::{self, GraphAction, PanelFlags, SceneGraph};

/// Samples produced per acquisition tick.
const SAMPLES_PER_TICK: usize = 50;

/// The main scopegraph application: one graph fed by the demo source.
pub struct ScopeGraphApp {
    graph: SceneGraph,
    source: DemoSource,
    config: GraphConfig,
    running: bool,
    last_tick: Instant,
    show_datasets: bool,
    show_amplitude: bool,
    /// An error message to display briefly in the footer.
    error_message: Option<String>,
}

impl ScopeGraphApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: GraphConfig) -> Self {
        let ctx = &cc.egui_ctx;
        let mut style = (*ctx.style()).clone();
        style.spacing.button_padding = egui::vec2(10.0, 5.0);
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.visuals.window_corner_radius = egui::CornerRadius::same(8);
        ctx.set_style(style);

        Self::with_config(config)
    }

    fn with_config(config: GraphConfig) -> Self {
        let mut store = MemoryStore::new();
        let source = DemoSource::new(&mut store);
        let mut graph = GraphState::new(store, Scene::new(), &config);
        graph.display_data_set(source.live(), true);
        Self {
            graph,
            source,
            config,
            running: true,
            last_tick: Instant::now(),
            show_datasets: false,
            show_amplitude: false,
            error_message: None,
        }
    }

    /// Pull one block from the source and push it through the graph.
    fn acquire(&mut self) {
        let peak = self.source.advance(self.graph.store_mut(), SAMPLES_PER_TICK);
        self.graph.update_stored_lines();
        self.graph.update_live(self.source.live());
        self.graph.set_amplitude(peak);
    }

    fn save_config(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name(crate::config::CONFIG_FILE)
            .add_filter("Scopegraph settings", &["json"])
            .save_file()
        {
            self.config.line_width = self.graph.line_width();
            self.config.plot_type = self.graph.plot_type();
            if let Err(e) = self.config.save(&path) {
                tracing::error!("Failed to save settings: {e}");
                self.error_message = Some(e.to_string());
            }
        }
    }

    fn load_config(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Scopegraph settings", &["json"])
            .pick_file()
        {
            match GraphConfig::load(&path) {
                Ok(config) => {
                    let running = self.running;
                    *self = Self::with_config(config);
                    self.running = running;
                }
                Err(e) => {
                    tracing::error!("Failed to load settings: {e}");
                    self.error_message = Some(e.to_string());
                }
            }
        }
    }
}

impl eframe::App for ScopeGraphApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let tick = Duration::from_millis(self.config.live_tick_ms.max(1));
        if self.running && self.last_tick.elapsed() >= tick {
            self.last_tick = Instant::now();
            self.acquire();
        }

        // A drag cannot outlive window focus.
        if !ctx.input(|i| i.focused) && self.graph.drag_state().is_dragging() {
            self.graph.handle_mouse_release();
        }

        let mut action = GraphAction::None;

        egui::TopBottomPanel::bottom("footer")
            .frame(egui::Frame::side_top_panel(&ctx.style()).inner_margin(egui::Margin::symmetric(16, 6)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let lines = self.graph.registry().len();
                    let label = if lines == 1 { "1 line".to_string() } else { format!("{lines} lines") };
                    ui.label(egui::RichText::new(label).weak());
                    ui.separator();
                    ui.label(egui::RichText::new(self.graph.markers().label_text().replace('\n', "   ")).monospace());

                    if let Some(msg) = &self.error_message {
                        ui.separator();
                        ui.colored_label(egui::Color32::from_rgb(255, 80, 80), msg);
                        if ui.small_button("dismiss").clicked() {
                            self.error_message = None;
                        }
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let flags = PanelFlags {
                datasets_open: self.show_datasets,
                amplitude_open: self.show_amplitude,
                running: self.running,
            };
            action = graph_panel::show_graph_panel(&mut self.graph, ui, flags);
        });

        if self.show_datasets {
            self.show_datasets = dataset_dialog::show_dataset_dialog(ctx, &mut self.graph);
        }
        if self.show_amplitude {
            self.show_amplitude = amplitude_dialog::show_amplitude_dialog(ctx, self.graph.amplitude_mut());
        }

        match action {
            GraphAction::None => {}
            GraphAction::ToggleDatasets => self.show_datasets = !self.show_datasets,
            GraphAction::ToggleAmplitude => self.show_amplitude = !self.show_amplitude,
            GraphAction::ToggleRunning => self.running = !self.running,
            GraphAction::SaveConfig => self.save_config(),
            GraphAction::LoadConfig => self.load_config(),
        }

        let redraw = self.graph.backend_mut().take_redraw();
        if self.running {
            ctx.request_repaint_after(tick);
        } else if redraw {
            ctx.request_repaint();
        }
    }
}
