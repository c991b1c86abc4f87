use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::filter::DateRange;
use crate::state::{AppState, PanelData, View};
use crate::ui::plot;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu, view tabs and status line.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open assets folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();

        for view in View::ALL {
            ui.selectable_value(&mut state.view, view, view.title());
        }

        ui.separator();
        ui.label(format!("assets: {}", state.config.assets_dir.display()));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Map view
// ---------------------------------------------------------------------------

pub fn map_view(ui: &mut Ui, state: &AppState) {
    let map = &state.config.map;
    ui.heading(&map.title);
    ui.add_space(8.0);
    ui.label("The interactive forage map is hosted online and opens in your browser.");
    ui.horizontal(|ui: &mut Ui| {
        ui.hyperlink_to("Open interactive map", &map.url);
        if ui.small_button("Copy link").clicked() {
            ui.ctx().copy_text(map.url.clone());
        }
    });
}

// ---------------------------------------------------------------------------
// Charts view
// ---------------------------------------------------------------------------

pub fn charts_view(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("NDVI Time Series Charts");
            ui.separator();

            for (i, panel) in state.charts.iter_mut().enumerate() {
                ui.strong(&panel.spec.title);
                match &panel.data {
                    PanelData::Missing => unavailable(ui, &panel.spec.title),
                    PanelData::Failed(msg) => failed(ui, msg),
                    PanelData::Loaded(_) => {
                        if let Some(range) = range_picker(ui, &format!("chart_{i}"), panel.range) {
                            panel.set_range(range);
                        }
                        plot::ndvi_chart(ui, &format!("chart_plot_{i}"), &panel.visible);
                    }
                }
                ui.add_space(12.0);
            }

            ui.heading("UAI vs MCDA Comparison");
            ui.separator();

            for (i, panel) in state.comparisons.iter_mut().enumerate() {
                ui.strong(&panel.spec.title);
                match (&panel.baseline, &panel.alternative) {
                    (PanelData::Failed(msg), _) | (_, PanelData::Failed(msg)) => failed(ui, msg),
                    (PanelData::Missing, _) => unavailable(ui, &panel.spec.baseline_file),
                    (_, alternative) => {
                        if *alternative == PanelData::Missing {
                            unavailable(ui, &panel.spec.alternative_file);
                        }
                        if let Some(range) =
                            range_picker(ui, &format!("comparison_{i}"), panel.range)
                        {
                            panel.set_range(range);
                        }
                        ui.label(
                            RichText::new(format!(
                                "dotted: {}  ·  solid: {}",
                                panel.spec.prefixes.baseline, panel.spec.prefixes.alternative
                            ))
                            .weak(),
                        );
                        plot::comparison_chart(
                            ui,
                            &format!("comparison_plot_{i}"),
                            &panel.series,
                        );
                    }
                }
                ui.add_space(12.0);
            }
        });
}

fn unavailable(ui: &mut Ui, what: &str) {
    ui.label(RichText::new(format!("⚠ {what} data is unavailable.")).color(Color32::YELLOW));
}

fn failed(ui: &mut Ui, msg: &str) {
    ui.label(RichText::new(format!("Error: {msg}")).color(Color32::RED));
}

/// Start/end date pickers. Returns the new range when the user changed it.
fn range_picker(ui: &mut Ui, id: &str, range: Option<DateRange>) -> Option<DateRange> {
    let mut range = range?;
    let start_id = format!("{id}_start");
    let end_id = format!("{id}_end");
    let mut changed = false;

    ui.horizontal(|ui: &mut Ui| {
        ui.label("From");
        changed |= ui
            .add(DatePickerButton::new(&mut range.start).id_salt(&start_id))
            .changed();
        ui.label("to");
        changed |= ui
            .add(DatePickerButton::new(&mut range.end).id_salt(&end_id))
            .changed();
    });

    changed.then_some(range)
}

// ---------------------------------------------------------------------------
// Documentation view
// ---------------------------------------------------------------------------

pub fn documentation_view(ui: &mut Ui, state: &AppState) {
    ScrollArea::vertical().show(ui, |ui: &mut Ui| {
        ui.heading("Workflow Documentation");
        for section in &state.config.documentation {
            ui.add_space(8.0);
            ui.label(RichText::new(&section.heading).strong().size(16.0));
            for line in section.body.lines() {
                match line.trim_start().strip_prefix("- ") {
                    Some(item) => ui.label(format!("• {item}")),
                    None => ui.label(line.trim()),
                };
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open NDVI assets folder")
        .set_directory(&state.config.assets_dir)
        .pick_folder();

    if let Some(dir) = folder {
        state.set_assets_dir(dir);
    }
}
