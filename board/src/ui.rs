//! UI module - egui input surface for the board
//!
//! Provides:
//! - Top bar: add-city field with suggestions, reference date, theme toggles
//! - Zone editor panel (left): per-zone time field, nudge buttons, slider
//!
//! Panels only collect intents into result structs; the update loop applies
//! them to the core state afterwards.

use std::collections::HashMap;

use chrono::NaiveDate;
use nannou_egui::egui;
use shared::{format_offset, search_zones, WallTime, ZoneEntry};

/// How many add-city suggestions to offer below the field
const MAX_SUGGESTIONS: usize = 6;

/// Retained text-edit state for the panels.
///
/// Buffers track what the user is typing; while a field is not focused it is
/// kept in sync with the core state, so external updates (ticks, propagation
/// from another zone) show through immediately.
#[derive(Default)]
pub struct PanelState {
    /// Add-city input, preserved across failed submissions for correction
    pub add_query: String,
    /// Last add-city failure, shown under the field
    pub add_error: Option<String>,
    /// Per-zone HH:MM buffers, keyed by entry id
    pub time_buffers: HashMap<String, String>,
    /// Reference date buffer (YYYY-MM-DD)
    pub date_buffer: String,
}

/// Result of top bar interactions
#[derive(Default)]
pub struct TopBarResult {
    /// Submitted zone name to add
    pub add_city: Option<String>,
    /// New reference date committed
    pub date_changed: Option<NaiveDate>,
    /// Dark mode checkbox toggled
    pub dark_mode_changed: bool,
    /// Reduced motion checkbox toggled
    pub reduced_motion_changed: bool,
    /// A field in the bar currently has focus
    pub editing: bool,
}

/// Result of zone editor panel interactions
#[derive(Default)]
pub struct EditorPanelResult {
    /// Committed time-field edits, in submission order
    pub time_edits: Vec<(String, WallTime)>,
    /// Slider positions changed this frame (minutes past midnight)
    pub slider_moves: Vec<(String, u32)>,
    /// A time field has focus or a slider is held
    pub editing: bool,
}

/// Draw the top bar: add-city, date, and theme controls.
pub fn draw_top_bar(
    ctx: &egui::Context,
    state: &mut PanelState,
    date: NaiveDate,
    dark_mode: &mut bool,
    reduced_motion: &mut bool,
) -> TopBarResult {
    let mut result = TopBarResult::default();

    egui::TopBottomPanel::top("board_top_bar").show(ctx, |ui| {
        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.label("Add zone:");
            let response = ui.add(
                egui::TextEdit::singleline(&mut state.add_query)
                    .hint_text("Time zone, city or town")
                    .desired_width(220.0),
            );
            if response.has_focus() {
                result.editing = true;
            }
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if (ui.button("Add").clicked() || submitted) && !state.add_query.trim().is_empty() {
                result.add_city = Some(state.add_query.trim().to_string());
            }

            ui.separator();

            ui.label("Date:");
            let date_response = ui.add(
                egui::TextEdit::singleline(&mut state.date_buffer).desired_width(94.0),
            );
            if date_response.has_focus() {
                result.editing = true;
            } else if !date_response.lost_focus() {
                state.date_buffer = date.format("%Y-%m-%d").to_string();
            }
            if date_response.lost_focus() {
                match NaiveDate::parse_from_str(state.date_buffer.trim(), "%Y-%m-%d") {
                    Ok(parsed) if parsed != date => result.date_changed = Some(parsed),
                    Ok(_) => {}
                    Err(_) => state.date_buffer = date.format("%Y-%m-%d").to_string(),
                }
            }
            if ui.small_button("Today").clicked() {
                let today = chrono::Utc::now().date_naive();
                if today != date {
                    result.date_changed = Some(today);
                }
                state.date_buffer = today.format("%Y-%m-%d").to_string();
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.checkbox(dark_mode, "Dark mode").changed() {
                    result.dark_mode_changed = true;
                }
                if ui.checkbox(reduced_motion, "Reduced motion").changed() {
                    result.reduced_motion_changed = true;
                }
            });
        });

        // Suggestions and errors live under the field
        if let Some(error) = &state.add_error {
            ui.colored_label(egui::Color32::from_rgb(211, 80, 63), error);
        }
        if !state.add_query.trim().is_empty() && result.add_city.is_none() {
            let matches = search_zones(state.add_query.trim());
            if !matches.is_empty() {
                ui.horizontal_wrapped(|ui| {
                    for tz in matches.iter().take(MAX_SUGGESTIONS) {
                        if ui.small_button(tz.name()).clicked() {
                            result.add_city = Some(tz.name().to_string());
                        }
                    }
                });
            }
        }
        ui.add_space(6.0);
    });

    result
}

/// Draw the zone editor panel (left side): one row per zone.
pub fn draw_zone_editors(
    ctx: &egui::Context,
    state: &mut PanelState,
    entries: &[ZoneEntry],
    step_minutes: u32,
) -> EditorPanelResult {
    let mut result = EditorPanelResult::default();

    egui::SidePanel::left("zone_editor_panel")
        .resizable(false)
        .default_width(280.0)
        .show(ctx, |ui| {
            ui.add_space(10.0);
            ui.heading("Zones");
            ui.add_space(4.0);
            ui.label(
                egui::RichText::new("Edit any time; the rest follow.")
                    .size(11.0)
                    .color(egui::Color32::from_rgb(140, 145, 155)),
            );
            ui.add_space(8.0);
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                for entry in entries {
                    ui.add_space(8.0);
                    draw_zone_row(ui, state, entry, step_minutes, &mut result);
                }
                ui.add_space(8.0);
            });
        });

    result
}

fn draw_zone_row(
    ui: &mut egui::Ui,
    state: &mut PanelState,
    entry: &ZoneEntry,
    step_minutes: u32,
    result: &mut EditorPanelResult,
) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(entry.short_name()).strong());
        ui.label(
            egui::RichText::new(format_offset(entry.offset_minutes))
                .size(11.0)
                .color(egui::Color32::from_rgb(140, 145, 155)),
        );
    });

    ui.horizontal(|ui| {
        let buffer = state
            .time_buffers
            .entry(entry.id.clone())
            .or_insert_with(|| entry.time.to_string());

        let response = ui.add(egui::TextEdit::singleline(buffer).desired_width(56.0));
        if response.has_focus() {
            result.editing = true;
        } else if !response.lost_focus() {
            // Not being edited: reflect the propagated value
            *buffer = entry.time.to_string();
        }
        if response.lost_focus() {
            match WallTime::parse(buffer) {
                Some(time) => {
                    if time != entry.time {
                        result.time_edits.push((entry.id.clone(), time));
                    }
                    *buffer = time.to_string();
                }
                None => *buffer = entry.time.to_string(),
            }
        }

        if ui.small_button("−").clicked() {
            result
                .time_edits
                .push((entry.id.clone(), entry.time.shifted(-(step_minutes as i64))));
        }
        if ui.small_button("+").clicked() {
            result
                .time_edits
                .push((entry.id.clone(), entry.time.shifted(step_minutes as i64)));
        }
    });

    let mut minutes = entry.time.minutes();
    let max_minutes = shared::MINUTES_PER_DAY as u32 - 1;
    let slider = ui.add(egui::Slider::new(&mut minutes, 0..=max_minutes).show_value(false));
    if slider.dragged() || slider.has_focus() {
        result.editing = true;
    }
    if slider.changed() {
        result.slider_moves.push((entry.id.clone(), minutes));
    }

    ui.separator();
}
