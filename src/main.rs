use std::path::Path;

use eframe::egui;
use eframe::egui_wgpu;
use tracing_subscriber::EnvFilter;

use scopegraph::app::ScopeGraphApp;
use scopegraph::config::{GraphConfig, CONFIG_FILE};

fn main() -> eframe::Result<()> {
    // Initialize logging; RUST_LOG overrides the default filter.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("scopegraph=info")))
        .init();

    let config = GraphConfig::load_or_default(Path::new(CONFIG_FILE));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Scopegraph")
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([640.0, 480.0]),
        // Configure wgpu for driver stability on Windows.
        wgpu_options: egui_wgpu::WgpuConfiguration {
            present_mode: eframe::wgpu::PresentMode::AutoVsync,
            wgpu_setup: egui_wgpu::WgpuSetup::CreateNew(egui_wgpu::WgpuSetupCreateNew {
                instance_descriptor: eframe::wgpu::InstanceDescriptor {
                    backends: eframe::wgpu::Backends::DX12
                        | eframe::wgpu::Backends::VULKAN
                        | eframe::wgpu::Backends::GL,
                    ..Default::default()
                },
                power_preference: eframe::wgpu::PowerPreference::HighPerformance,
                ..Default::default()
            }),
            ..Default::default()
        },
        ..Default::default()
    };

    eframe::run_native(
        "Scopegraph",
        options,
        Box::new(move |cc| Ok(Box::new(ScopeGraphApp::new(cc, config)))),
    )
}
