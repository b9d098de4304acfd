use egui_extras::{Column, TableBuilder};

use crate::state::dataset::DatasetStore;
use crate::ui::graph_panel::SceneGraph;

/// Show the dataset list with a display toggle per stored item. Returns
/// `true` while it should stay open.
pub fn show_dataset_dialog(ctx: &egui::Context, graph: &mut SceneGraph) -> bool {
    let mut open = true;

    let rows: Vec<(String, &'static str, usize, bool)> = graph
        .store()
        .iter()
        .enumerate()
        .map(|(item, d)| (d.label.clone(), d.plot_type.label(), d.point_count(), graph.is_item_displayed(item)))
        .collect();
    let live = graph.live_uid().map(|uid| graph.registry().contains(uid));

    egui::Window::new("Datasets")
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .default_width(420.0)
        .show(ctx, |ui| {
            if let Some(shown) = live {
                ui.horizontal(|ui| {
                    ui.label(egui::RichText::new("Live signal").strong());
                    ui.label(if shown { "displayed" } else { "bound" });
                    if ui.small_button("Clear").clicked() {
                        graph.clear_live();
                    }
                });
                ui.separator();
            }

            if graph.store().item_count() == 0 {
                ui.label(egui::RichText::new("No datasets stored.").weak());
                return;
            }

            let mut toggled: Option<(usize, bool)> = None;
            TableBuilder::new(ui)
                .striped(true)
                .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                .column(Column::auto().at_least(30.0))
                .column(Column::remainder().at_least(120.0))
                .column(Column::auto().at_least(110.0))
                .column(Column::auto().at_least(60.0))
                .header(20.0, |mut header| {
                    header.col(|ui| {
                        ui.strong("Show");
                    });
                    header.col(|ui| {
                        ui.strong("Label");
                    });
                    header.col(|ui| {
                        ui.strong("Type");
                    });
                    header.col(|ui| {
                        ui.strong("Points");
                    });
                })
                .body(|body| {
                    body.rows(20.0, rows.len(), |mut row| {
                        let item = row.index();
                        let (label, kind, points, shown) = &rows[item];
                        row.col(|ui| {
                            let mut checked = *shown;
                            if ui.checkbox(&mut checked, "").changed() {
                                toggled = Some((item, checked));
                            }
                        });
                        row.col(|ui| {
                            ui.label(label);
                        });
                        row.col(|ui| {
                            ui.label(*kind);
                        });
                        row.col(|ui| {
                            ui.label(points.to_string());
                        });
                    });
                });

            match toggled {
                Some((item, true)) => graph.display_item(item),
                Some((item, false)) => graph.remove_item(item),
                None => {}
            }
        });

    open
}
