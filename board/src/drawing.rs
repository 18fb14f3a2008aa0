//! Drawing module - zone card column rendering and drag feedback
//!
//! Handles all nannou-based rendering: the vertical column of zone cards,
//! the drag ghost and insertion indicator, and the light/dark palettes.

use chrono::NaiveDate;
use nannou::prelude::*;
use shared::{format_offset, ZoneEntry};

/// Card dimensions
pub const CARD_WIDTH: f32 = 430.0;
pub const CARD_HEIGHT: f32 = 96.0;
pub const CARD_GAP: f32 = 14.0;

/// Vertical slack around the column still counted as a valid drop
const DROP_SLACK: f32 = 30.0;

const fn srgb(red: u8, green: u8, blue: u8) -> Srgb<u8> {
    Srgb {
        red,
        green,
        blue,
        standard: std::marker::PhantomData,
    }
}

/// Color palette, switchable between the light and dark themes
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Srgb<u8>,
    pub card_bg: Srgb<u8>,
    pub card_bg_hover: Srgb<u8>,
    pub card_border: Srgb<u8>,
    pub time_text: Srgb<u8>,
    pub name_text: Srgb<u8>,
    pub secondary_text: Srgb<u8>,
    pub accent: Srgb<u8>,
}

pub const LIGHT: Palette = Palette {
    background: srgb(248, 248, 250),
    card_bg: srgb(255, 255, 255),
    card_bg_hover: srgb(240, 244, 252),
    card_border: srgb(208, 210, 218),
    time_text: srgb(26, 26, 30),
    name_text: srgb(34, 34, 40),
    secondary_text: srgb(112, 114, 122),
    accent: srgb(25, 118, 210),
};

pub const DARK: Palette = Palette {
    background: srgb(18, 18, 18),
    card_bg: srgb(30, 30, 30),
    card_bg_hover: srgb(38, 38, 46),
    card_border: srgb(60, 60, 70),
    time_text: srgb(250, 250, 250),
    name_text: srgb(255, 255, 255),
    secondary_text: srgb(154, 154, 162),
    accent: srgb(144, 202, 249),
};

pub fn palette(dark_mode: bool) -> &'static Palette {
    if dark_mode {
        &DARK
    } else {
        &LIGHT
    }
}

fn with_alpha(c: Srgb<u8>, alpha: f32) -> Srgba<f32> {
    srgba(
        c.red as f32 / 255.0,
        c.green as f32 / 255.0,
        c.blue as f32 / 255.0,
        alpha,
    )
}

/// Layout of the card column in the canvas area right of the editor panel.
#[derive(Debug, Clone, Copy)]
pub struct CardColumn {
    pub center_x: f32,
    pub top: f32,
    pub count: usize,
}

impl CardColumn {
    /// Compute the column from the window, leaving room for the egui panels.
    pub fn calculate(
        window_rect: Rect,
        left_panel_width: f32,
        top_bar_height: f32,
        count: usize,
    ) -> Self {
        let center_x = (window_rect.left() + left_panel_width + window_rect.right()) / 2.0;
        let top = window_rect.top() - top_bar_height - 46.0;
        Self {
            center_x,
            top,
            count,
        }
    }

    fn slot_y(&self, index: usize) -> f32 {
        self.top - CARD_HEIGHT / 2.0 - index as f32 * (CARD_HEIGHT + CARD_GAP)
    }

    pub fn card_rect(&self, index: usize) -> Rect {
        Rect::from_x_y_w_h(self.center_x, self.slot_y(index), CARD_WIDTH, CARD_HEIGHT)
    }

    /// Index of the card containing `p`, if any.
    pub fn hit(&self, p: Point2) -> Option<usize> {
        (0..self.count).find(|&i| self.card_rect(i).contains(p))
    }

    /// The slot a drag at `p` would drop into.
    ///
    /// `None` when the pointer has left the column band, which the registry
    /// treats as a cancelled drag.
    pub fn drop_index(&self, p: Point2) -> Option<usize> {
        if self.count == 0 {
            return None;
        }
        if (p.x - self.center_x).abs() > CARD_WIDTH * 0.75 {
            return None;
        }
        let bottom = self.slot_y(self.count - 1) - CARD_HEIGHT / 2.0;
        if p.y > self.top + DROP_SLACK || p.y < bottom - DROP_SLACK {
            return None;
        }
        let slot = ((self.top - p.y) / (CARD_HEIGHT + CARD_GAP)).floor() as i64;
        Some(slot.clamp(0, self.count as i64 - 1) as usize)
    }
}

/// Draw the full card column, including drag feedback.
///
/// `ghost_pos` is the pointer position to float the dragged card at; pass
/// `None` under reduced motion to keep only the insertion indicator.
pub fn draw_cards(
    draw: &Draw,
    column: &CardColumn,
    entries: &[ZoneEntry],
    date: NaiveDate,
    hovered: Option<usize>,
    drag_from: Option<usize>,
    drop_slot: Option<usize>,
    ghost_pos: Option<Point2>,
    pal: &Palette,
) {
    let date_label = date.format("%a, %b %-d").to_string();

    for (index, entry) in entries.iter().enumerate() {
        if drag_from == Some(index) {
            continue;
        }
        let rect = column.card_rect(index);
        let is_hovered = hovered == Some(index) && drag_from.is_none();
        draw_card(draw, rect, entry, &date_label, is_hovered, pal);
    }

    // Insertion indicator at the candidate slot
    if let (Some(slot), Some(_)) = (drop_slot, drag_from) {
        let rect = column.card_rect(slot);
        let y = rect.top() + CARD_GAP / 2.0;
        draw.line()
            .start(pt2(rect.left(), y))
            .end(pt2(rect.right(), y))
            .weight(3.0)
            .color(pal.accent);
    }

    // Ghost of the dragged card follows the pointer
    if let (Some(from), Some(pos)) = (drag_from, ghost_pos) {
        if let Some(entry) = entries.get(from) {
            draw_ghost(draw, column, entry, pos, pal);
        }
    }
}

fn draw_card(
    draw: &Draw,
    rect: Rect,
    entry: &ZoneEntry,
    date_label: &str,
    hovered: bool,
    pal: &Palette,
) {
    let bg = if hovered { pal.card_bg_hover } else { pal.card_bg };
    draw.rect()
        .xy(rect.xy())
        .wh(rect.wh())
        .color(bg)
        .stroke(pal.card_border)
        .stroke_weight(1.5);

    // Drag handle: three short bars at the left edge
    let handle_x = rect.left() + 16.0;
    for i in 0..3 {
        let y = rect.y() + 8.0 - i as f32 * 8.0;
        draw.line()
            .start(pt2(handle_x - 6.0, y))
            .end(pt2(handle_x + 6.0, y))
            .weight(2.0)
            .color(pal.secondary_text);
    }

    // Zone name and offset on the left
    draw.text(entry.short_name())
        .x_y(rect.left() + 120.0, rect.y() + 22.0)
        .w(170.0)
        .font_size(20)
        .color(pal.name_text);
    draw.text(&format_offset(entry.offset_minutes))
        .x_y(rect.left() + 120.0, rect.y() - 6.0)
        .w(170.0)
        .font_size(13)
        .color(pal.secondary_text);
    draw.text(date_label)
        .x_y(rect.left() + 120.0, rect.y() - 26.0)
        .w(170.0)
        .font_size(13)
        .color(pal.secondary_text);

    // Displayed time on the right
    draw.text(&entry.time.to_string())
        .x_y(rect.right() - 90.0, rect.y())
        .w(140.0)
        .font_size(36)
        .color(pal.time_text);
}

fn draw_ghost(draw: &Draw, column: &CardColumn, entry: &ZoneEntry, pos: Point2, pal: &Palette) {
    let rect = Rect::from_x_y_w_h(column.center_x, pos.y, CARD_WIDTH, CARD_HEIGHT);
    draw.rect()
        .xy(rect.xy())
        .wh(rect.wh())
        .color(with_alpha(pal.card_bg_hover, 0.85))
        .stroke(pal.accent)
        .stroke_weight(2.0);
    draw.text(entry.short_name())
        .x_y(rect.left() + 120.0, rect.y() + 12.0)
        .w(170.0)
        .font_size(20)
        .color(pal.name_text);
    draw.text(&entry.time.to_string())
        .x_y(rect.right() - 90.0, rect.y())
        .w(140.0)
        .font_size(36)
        .color(with_alpha(pal.time_text, 0.9));
}

/// Draw the window title above the column.
pub fn draw_title(draw: &Draw, window_rect: Rect, column: &CardColumn, pal: &Palette) {
    draw.text("ZONE BOARD")
        .x_y(column.center_x, window_rect.top() - 24.0)
        .w(400.0)
        .font_size(16)
        .color(pal.secondary_text);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column() -> CardColumn {
        let window = Rect::from_x_y_w_h(0.0, 0.0, 1200.0, 800.0);
        CardColumn::calculate(window, 280.0, 90.0, 3)
    }

    #[test]
    fn test_card_rects_stack_downwards() {
        let col = column();
        let first = col.card_rect(0);
        let second = col.card_rect(1);
        assert!(second.top() < first.bottom());
        assert_eq!(first.x(), second.x());
    }

    #[test]
    fn test_hit_finds_card_under_pointer() {
        let col = column();
        let inside = col.card_rect(1).xy();
        assert_eq!(col.hit(inside), Some(1));

        let gap_between = pt2(col.center_x, col.card_rect(0).bottom() - CARD_GAP / 2.0);
        assert_eq!(col.hit(gap_between), None);
    }

    #[test]
    fn test_drop_index_inside_column() {
        let col = column();
        assert_eq!(col.drop_index(col.card_rect(0).xy()), Some(0));
        assert_eq!(col.drop_index(col.card_rect(2).xy()), Some(2));
    }

    #[test]
    fn test_drop_outside_band_is_cancelled() {
        let col = column();
        let far_left = pt2(col.center_x - CARD_WIDTH, col.card_rect(1).y());
        assert_eq!(col.drop_index(far_left), None);

        let below = pt2(col.center_x, col.card_rect(2).bottom() - DROP_SLACK * 3.0);
        assert_eq!(col.drop_index(below), None);
    }

    #[test]
    fn test_empty_column_accepts_no_drop() {
        let window = Rect::from_x_y_w_h(0.0, 0.0, 1200.0, 800.0);
        let col = CardColumn::calculate(window, 280.0, 90.0, 0);
        assert_eq!(col.drop_index(pt2(col.center_x, col.top)), None);
    }
}
