use eframe::egui::{self, ScrollArea, Ui};

use crate::data::model::Dimension;
use crate::state::AppState;
use crate::ui::{bar, heatmap, panels, pie};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct CovidDashboardApp {
    pub state: AppState,
}

impl CovidDashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for CovidDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: current selection ----
        let deselect = egui::SidePanel::left("selection_panel")
            .default_width(220.0)
            .resizable(true)
            .show(ctx, |ui| panels::side_panel(ui, &self.state))
            .inner;

        // ---- Central panel: charts ----
        let clicked = egui::CentralPanel::default()
            .show(ctx, |ui| charts(ui, &self.state))
            .inner;

        // Apply interactions after drawing, then rebuild the views.
        for (dimension, value) in deselect.into_iter().chain(clicked) {
            self.state.toggle(dimension, &value);
        }
    }
}

/// Draw the three linked charts. Returns the mark clicked this frame.
fn charts(ui: &mut Ui, state: &AppState) -> Option<(Dimension, String)> {
    let message = match &state.dataset {
        None => Some("Open a case file to view demographics  (File → Open…)"),
        Some(ds) if ds.is_empty() => Some("The loaded file contains no records."),
        Some(_) => None,
    };
    if let Some(message) = message {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(message);
        });
        return None;
    }

    let views = &state.views;
    let mut clicked = None;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.horizontal_top(|ui: &mut Ui| {
                ui.vertical(|ui: &mut Ui| {
                    ui.heading("Race / Ethnicity");
                    if let Some(race) = pie::race_pie_chart(ui, &views.pie) {
                        clicked = Some((Dimension::Race, race));
                    }
                });
                ui.separator();
                ui.vertical(|ui: &mut Ui| {
                    ui.heading("Age Group");
                    ui.set_min_width(500.0);
                    if let Some(age) = bar::age_bar_chart(ui, &views.bars) {
                        clicked = Some((Dimension::AgeGroup, age));
                    }
                });
            });

            ui.separator();
            ui.heading("Age Group × Race / Ethnicity");
            heatmap::heatmap(ui, &views.heatmap);
        });

    clicked
}
