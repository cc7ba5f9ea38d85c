use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::pages::Page;

// ---------------------------------------------------------------------------
// Left side panel – page list and selectors
// ---------------------------------------------------------------------------

/// Render the left navigation panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Pages");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for page in Page::ALL {
                if ui
                    .selectable_label(state.page == page, page.title())
                    .clicked()
                {
                    state.page = page;
                }
            }

            ui.separator();
            ui.strong("Focus economy");

            let Some(accessor) = &state.accessor else {
                ui.label("No survey table loaded.");
                return;
            };

            // Clone the list so we can mutate state inside the combo.
            let economies = accessor.dataset().economies.clone();
            egui::ComboBox::from_id_salt("focus_economy")
                .selected_text(state.focus_economy.clone())
                .show_ui(ui, |ui: &mut Ui| {
                    for economy in &economies {
                        if ui
                            .selectable_label(state.focus_economy == *economy, economy)
                            .clicked()
                        {
                            state.set_focus_economy(economy.clone());
                        }
                    }
                });
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(accessor) = &state.accessor {
            ui.label(format!(
                "{} respondents · {} economies — {}",
                accessor.dataset().len(),
                accessor.dataset().economies.len(),
                accessor.source().display()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open survey microdata")
        .add_filter("Supported files", &["csv", "parquet", "pq", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        state.load_dataset(&path);
    }
}
