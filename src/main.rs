#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use eframe::egui;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Starting plangrid {}", env!("CARGO_PKG_VERSION"));

    let viewport = egui::ViewportBuilder::default()
        .with_inner_size([1200.0, 860.0])
        .with_min_inner_size([760.0, 560.0])
        .with_title("Plangrid");

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Plangrid",
        options,
        Box::new(|cc| Ok(Box::new(plangrid::ui::PlanGridApp::new(cc)?))),
    )
}
