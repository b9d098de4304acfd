use crate::render::plot_interaction::format_tick_value;
use crate::state::graph_state::AmplitudeReadout;

/// Show the amplitude readout window. Returns `true` while it should stay
/// open, `false` when the user closes it.
pub fn show_amplitude_dialog(ctx: &egui::Context, readout: &mut AmplitudeReadout) -> bool {
    let mut open = true;

    egui::Window::new("Amplitude")
        .open(&mut open)
        .collapsible(false)
        .resizable(false)
        .default_width(220.0)
        .show(ctx, |ui| {
            let Some(value) = readout.value() else {
                ui.label(egui::RichText::new("No amplitude received yet.").weak());
                return;
            };
            ui.label(egui::RichText::new(format_tick_value(value)).monospace().size(28.0).strong());
            if let Some((min, max)) = readout.range() {
                ui.label(format!("min {}   max {}", format_tick_value(min), format_tick_value(max)));
            }
            if let Some(at) = readout.updated_at() {
                ui.label(egui::RichText::new(format!("updated {}", at.format("%H:%M:%S%.3f"))).weak());
            }
            ui.add_space(4.0);
            if ui.button("Reset").clicked() {
                readout.reset();
            }
        });

    open
}
