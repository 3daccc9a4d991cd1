use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};

use crate::session::NotificationLevel;
use crate::timetable::SubjectTone;

pub const ACCENT: Color32 = Color32::from_rgb(19, 152, 244);

pub fn setup_fonts(ctx: &egui::Context) {
    let mut fonts = egui::FontDefinitions::default();

    // Phosphor icons as fallback in the proportional family
    egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);

    ctx.set_fonts(fonts);
}

pub fn setup_theme(ctx: &egui::Context) {
    let mut style = Style::default();

    let mut visuals = Visuals::dark();

    let bg = Color32::from_rgb(12, 12, 11);
    visuals.panel_fill = bg;
    visuals.window_fill = bg;
    visuals.faint_bg_color = Color32::from_rgb(24, 24, 22);
    visuals.extreme_bg_color = Color32::BLACK;

    // Widget colors - warm grays (R=G > B for warmth)
    visuals.widgets.noninteractive.bg_fill = Color32::from_rgb(40, 40, 38);
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, Color32::from_rgb(176, 176, 168));

    visuals.widgets.inactive.bg_fill = Color32::from_rgb(56, 56, 52);
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, Color32::from_rgb(200, 200, 192));

    visuals.widgets.hovered.bg_fill = Color32::from_rgb(80, 80, 74);
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, Color32::WHITE);

    visuals.widgets.active.bg_fill = ACCENT;
    visuals.widgets.active.fg_stroke = Stroke::new(1.0, Color32::WHITE);

    visuals.selection.bg_fill = ACCENT;
    visuals.selection.stroke = Stroke::new(1.0, Color32::WHITE);
    visuals.hyperlink_color = ACCENT;

    visuals.widgets.noninteractive.rounding = Rounding::same(6.0);
    visuals.widgets.inactive.rounding = Rounding::same(6.0);
    visuals.widgets.hovered.rounding = Rounding::same(6.0);
    visuals.widgets.active.rounding = Rounding::same(6.0);
    visuals.window_rounding = Rounding::same(8.0);

    style.visuals = visuals;

    style.text_styles = [
        (TextStyle::Small, FontId::new(12.0, FontFamily::Proportional)),
        (TextStyle::Body, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Button, FontId::new(14.0, FontFamily::Proportional)),
        (TextStyle::Heading, FontId::new(20.0, FontFamily::Proportional)),
        (TextStyle::Monospace, FontId::new(14.0, FontFamily::Monospace)),
    ]
    .into();

    style.spacing.item_spacing = egui::vec2(10.0, 8.0);
    style.spacing.button_padding = egui::vec2(14.0, 8.0);
    style.spacing.window_margin = egui::Margin::same(20.0);

    ctx.set_style(style);
}

/// Returns (bg, border, text) for a subject card, light pastel on dark text
pub fn subject_colors(tone: SubjectTone) -> (Color32, Color32, Color32) {
    match tone {
        SubjectTone::Blue => (rgb(0xdbeafe), rgb(0x93c5fd), rgb(0x1e40af)),
        SubjectTone::Green => (rgb(0xdcfce7), rgb(0x86efac), rgb(0x166534)),
        SubjectTone::Purple => (rgb(0xf3e8ff), rgb(0xd8b4fe), rgb(0x6b21a8)),
        SubjectTone::Amber => (rgb(0xfef3c7), rgb(0xfcd34d), rgb(0x92400e)),
        SubjectTone::Rose => (rgb(0xffe4e6), rgb(0xfda4af), rgb(0x9f1239)),
        SubjectTone::Cyan => (rgb(0xcffafe), rgb(0x67e8f9), rgb(0x155e75)),
        SubjectTone::Indigo => (rgb(0xe0e7ff), rgb(0xa5b4fc), rgb(0x3730a3)),
        SubjectTone::Emerald => (rgb(0xd1fae5), rgb(0x6ee7b7), rgb(0x065f46)),
        SubjectTone::Fuchsia => (rgb(0xfae8ff), rgb(0xf0abfc), rgb(0x86198f)),
        SubjectTone::Orange => (rgb(0xffedd5), rgb(0xfdba74), rgb(0x9a3412)),
    }
}

/// Returns (bg, dashed-border) for cells without a lesson
pub fn empty_cell_colors() -> (Color32, Color32) {
    (Color32::from_rgb(24, 24, 22), Color32::from_rgb(48, 48, 44))
}

/// Returns (bg, text) for axis headers
pub fn header_colors() -> (Color32, Color32) {
    (Color32::from_rgb(32, 32, 30), Color32::from_rgb(208, 208, 200))
}

pub fn secondary_text() -> Color32 {
    Color32::from_rgb(150, 150, 142)
}

pub fn notification_color(level: NotificationLevel) -> Color32 {
    match level {
        NotificationLevel::Success => Color32::from_rgb(152, 195, 121),
        NotificationLevel::Error => Color32::from_rgb(224, 108, 117),
    }
}

/// Returns (content_bg, frame_color) for cards and toasts
pub fn card_colors() -> (Color32, Color32) {
    (Color32::from_rgb(18, 18, 17), Color32::from_rgb(40, 40, 38))
}

const fn rgb(hex: u32) -> Color32 {
    Color32::from_rgb((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
}
