//! Zone Board
//!
//! A dashboard of synchronized time-zone cards. Editing any zone's time, the
//! reference date, or dragging a slider recomputes every other card from that
//! one source; cards can be added by name and reordered by dragging.

mod drawing;
mod ui;

use chrono::Utc;
use nannou::prelude::*;
use nannou_egui::{self, egui, Egui};
use shared::{load_prefs, save_prefs, MinuteTicker, Prefs, ZoneBoard};

use crate::drawing::{draw_cards, draw_title, palette, CardColumn};
use crate::ui::{draw_top_bar, draw_zone_editors, EditorPanelResult, PanelState, TopBarResult};

const LEFT_PANEL_WIDTH: f32 = 280.0;
const TOP_BAR_HEIGHT: f32 = 64.0;

fn main() {
    nannou::app(model).update(update).exit(exit).run();
}

/// An in-flight card drag
#[derive(Debug, Clone, Copy)]
struct CardDrag {
    from: usize,
    pos: Point2,
}

/// Application state
struct Model {
    /// Core state: reference clock plus the synchronized zone registry
    board: ZoneBoard,
    /// Minute cadence; stopped on exit
    ticker: MinuteTicker,
    /// Retained egui text-edit state
    panel: PanelState,
    /// Presentation preferences (persisted)
    prefs: Prefs,
    /// Card drag in progress, if any
    drag: Option<CardDrag>,
    /// Card index under the pointer
    hovered_card: Option<usize>,
    /// A panel field had focus last frame; ticks must not clobber the edit
    field_editing: bool,
    /// egui integration
    egui: Egui,
}

impl Model {
    fn edit_pending(&self) -> bool {
        self.field_editing || self.drag.is_some()
    }

    fn column(&self, window_rect: Rect) -> CardColumn {
        CardColumn::calculate(
            window_rect,
            LEFT_PANEL_WIDTH,
            TOP_BAR_HEIGHT,
            self.board.entries().len(),
        )
    }

    fn toggle_dark_mode(&mut self) {
        self.prefs.dark_mode = !self.prefs.dark_mode;
        save_prefs_logged(&self.prefs);
    }
}

fn save_prefs_logged(prefs: &Prefs) {
    if let Err(e) = save_prefs(prefs) {
        eprintln!("Failed to save preferences: {}", e);
    }
}

fn model(app: &App) -> Model {
    let window_id = app
        .new_window()
        .title("Zone Board")
        .size(1100, 700)
        .min_size(900, 560)
        .view(view)
        .key_pressed(key_pressed)
        .mouse_pressed(mouse_pressed)
        .mouse_released(mouse_released)
        .mouse_moved(mouse_moved)
        .raw_event(raw_window_event)
        .build()
        .unwrap();

    let window = app.window(window_id).unwrap();
    let egui = Egui::from_window(&window);

    let prefs = match load_prefs() {
        Ok(Some(prefs)) => prefs,
        Ok(None) => Prefs::default(),
        Err(e) => {
            eprintln!("Failed to load preferences: {}", e);
            Prefs::default()
        }
    };

    Model {
        board: ZoneBoard::new(Utc::now()),
        ticker: MinuteTicker::start(),
        panel: PanelState::default(),
        prefs,
        drag: None,
        hovered_card: None,
        field_editing: false,
        egui,
    }
}

fn update(_app: &App, model: &mut Model, update: Update) {
    if model.ticker.poll() {
        let pending = model.edit_pending();
        model.board.tick(Utc::now(), pending);
    }

    let entries = model.board.entries().to_vec();
    let date = model.board.date();
    let step = model.prefs.time_step_minutes;
    let mut dark_mode = model.prefs.dark_mode;
    let mut reduced_motion = model.prefs.reduced_motion;

    model.egui.set_elapsed_time(update.since_start);
    let ctx = model.egui.begin_frame();
    ctx.set_visuals(if dark_mode {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    });

    let top: TopBarResult = draw_top_bar(&ctx, &mut model.panel, date, &mut dark_mode, &mut reduced_motion);
    let editors: EditorPanelResult = draw_zone_editors(&ctx, &mut model.panel, &entries, step);

    drop(ctx);

    // Apply top bar results
    if let Some(query) = top.add_city {
        match model.board.add_city(&query) {
            Ok(()) => {
                model.panel.add_query.clear();
                model.panel.add_error = None;
            }
            // Input stays in the field for correction
            Err(e) => model.panel.add_error = Some(e.to_string()),
        }
    }
    if let Some(new_date) = top.date_changed {
        model.board.set_date(new_date);
    }
    if top.dark_mode_changed || top.reduced_motion_changed {
        model.prefs.dark_mode = dark_mode;
        model.prefs.reduced_motion = reduced_motion;
        save_prefs_logged(&model.prefs);
    }

    // Apply zone edits in order; each runs one full propagation pass, so
    // when several land in a frame the last one is the source of truth.
    for (id, minutes) in editors.slider_moves {
        model.board.slide(&id, minutes);
    }
    for (id, time) in editors.time_edits {
        model.board.edit_time(&id, time);
    }

    model.field_editing = top.editing || editors.editing;
}

fn view(app: &App, model: &Model, frame: Frame) {
    let draw = app.draw();
    let window_rect = app.window_rect();
    let pal = palette(model.prefs.dark_mode);

    draw.background().color(pal.background);

    let column = model.column(window_rect);
    let drag_from = model.drag.map(|d| d.from);
    let drag_pos = model.drag.map(|d| d.pos);
    let drop_slot = drag_pos.and_then(|p| column.drop_index(p));
    let ghost_pos = if model.prefs.reduced_motion {
        None
    } else {
        drag_pos
    };

    draw_cards(
        &draw,
        &column,
        model.board.entries(),
        model.board.date(),
        model.hovered_card,
        drag_from,
        drop_slot,
        ghost_pos,
        pal,
    );
    draw_title(&draw, window_rect, &column, pal);

    draw.to_frame(app, &frame).unwrap();
    model.egui.draw_to_frame(&frame).unwrap();
}

fn key_pressed(_app: &App, model: &mut Model, key: Key) {
    match key {
        // Escape abandons a drag; the order stays as it was
        Key::Escape => {
            model.drag = None;
        }
        Key::D => {
            if !model.field_editing {
                model.toggle_dark_mode();
            }
        }
        _ => {}
    }
}

fn mouse_pressed(app: &App, model: &mut Model, button: MouseButton) {
    if button != MouseButton::Left {
        return;
    }
    let pos = app.mouse.position();
    let column = model.column(app.window_rect());
    if let Some(index) = column.hit(pos) {
        model.drag = Some(CardDrag { from: index, pos });
    }
}

fn mouse_moved(app: &App, model: &mut Model, pos: Point2) {
    if let Some(drag) = &mut model.drag {
        drag.pos = pos;
    }
    let column = model.column(app.window_rect());
    model.hovered_card = column.hit(pos);
}

fn mouse_released(app: &App, model: &mut Model, button: MouseButton) {
    if button != MouseButton::Left {
        return;
    }
    if let Some(drag) = model.drag.take() {
        let column = model.column(app.window_rect());
        // A release outside the column is a cancelled drag (no target)
        model.board.reorder(drag.from, column.drop_index(drag.pos));
    }
}

fn raw_window_event(_app: &App, model: &mut Model, event: &nannou::winit::event::WindowEvent) {
    model.egui.handle_raw_event(event);
}

fn exit(_app: &App, mut model: Model) {
    model.ticker.stop();
}
