use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::Dimension;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – current selection
// ---------------------------------------------------------------------------

/// Render the selection panel. Returns a value the user asked to deselect.
pub fn side_panel(ui: &mut Ui, state: &AppState) -> Option<(Dimension, String)> {
    ui.heading("Selection");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return None;
    }

    if !state.controller.has_selection() {
        ui.label("Nothing selected.");
        ui.label(RichText::new("Click a pie slice or a bar to filter the heatmap.").weak());
        return None;
    }

    let mut deselect = None;
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let selection = state.controller.selection();
            for (dimension, values) in [
                (Dimension::Race, &selection.races),
                (Dimension::AgeGroup, &selection.age_groups),
            ] {
                if values.is_empty() {
                    continue;
                }
                ui.strong(capitalize(&dimension.to_string()));
                for value in values {
                    if ui
                        .selectable_label(true, value.as_str())
                        .on_hover_text("Click to deselect")
                        .clicked()
                    {
                        deselect = Some((dimension, value.clone()));
                    }
                }
                ui.separator();
            }
        });
    deselect
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
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

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} records loaded, {} match selection",
                ds.len(),
                state.filtered_count()
            ));
            if ds.skipped_rows > 0 {
                ui.label(
                    RichText::new(format!("({} rows skipped)", ds.skipped_rows))
                        .color(Color32::YELLOW),
                );
            }
        }

        ui.separator();

        if ui
            .add_enabled(
                state.controller.has_selection(),
                egui::Button::new("Deselect all"),
            )
            .clicked()
        {
            state.clear_selection();
        }

        for msg in [&state.config_error, &state.status_message].into_iter().flatten() {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open case data")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load(&path);
    }
}
