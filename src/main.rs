mod app;
mod color;
mod data;
mod state;
mod ui;

use app::FindexExplorerApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Findex Explorer – Financial Inclusion",
        options,
        Box::new(|_cc| {
            let mut app = FindexExplorerApp::default();
            // Pick up micro_world.csv from the working directory if present;
            // otherwise the user opens a table through the File menu.
            app.state.load_default_table();
            Ok(Box::new(app))
        }),
    )
}
