use chrono::{DateTime, NaiveDateTime};
use egui::{Color32, RichText, Ui};

use crate::api::{Plan, ScheduleEntry};
use crate::session::SelectionState;
use crate::timetable::{entry_detail, ClassFilter, SubjectTone, TimetableMatrix};
use super::theme::{empty_cell_colors, header_colors, secondary_text, subject_colors, ACCENT};

/// Result from plan selector interactions
#[derive(Default)]
pub struct SelectorResult {
    pub plan_index: Option<usize>,
    pub class_selector: Option<String>,
    pub open_plan_url: Option<String>,
}

const CELL_MIN_WIDTH: f32 = 120.0;
const CELL_HEIGHT: f32 = 64.0;
const PERIOD_COLUMN_WIDTH: f32 = 56.0;

/// Plan and class pickers. Disabled while a request is in flight.
pub fn render_plan_selector(
    ui: &mut Ui,
    plans: &[Plan],
    classes: &[String],
    state: &SelectionState,
    class_text: &mut String,
) -> SelectorResult {
    let mut result = SelectorResult::default();
    let filter = state.class_filter();

    ui.horizontal(|ui| {
        ui.add_enabled_ui(!state.is_loading, |ui| {
            if !plans.is_empty() {
                ui.label(RichText::new("Plan").color(secondary_text()));
                let selected_text = state
                    .selected_plan_index
                    .and_then(|i| plans.get(i).map(|p| p.display_title(i)))
                    .unwrap_or_else(|| "Select a plan".to_string());

                egui::ComboBox::from_id_salt("plan_combo")
                    .selected_text(selected_text)
                    .width(220.0)
                    .show_ui(ui, |ui| {
                        for (index, plan) in plans.iter().enumerate() {
                            let is_selected = state.selected_plan_index == Some(index);
                            if ui.selectable_label(is_selected, plan.display_title(index)).clicked() && !is_selected {
                                result.plan_index = Some(index);
                            }
                        }
                    });

                if let Some(plan) = state.selected_plan_index.and_then(|i| plans.get(i)) {
                    if !plan.url.is_empty() {
                        let link = ui.add(egui::Label::new(
                            RichText::new(egui_phosphor::regular::ARROW_SQUARE_OUT).size(16.0).color(ACCENT)
                        ).sense(egui::Sense::click()));
                        if link.hovered() {
                            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                        }
                        if link.on_hover_text("Open plan in browser").clicked() {
                            result.open_plan_url = Some(plan.url.clone());
                        }
                    }
                }

                ui.add_space(16.0);
            }

            ui.label(RichText::new("Class").color(secondary_text()));
            let selected_text = if filter.is_all() { "All classes".to_string() } else { filter.to_string() };
            egui::ComboBox::from_id_salt("class_combo")
                .selected_text(selected_text)
                .width(140.0)
                .show_ui(ui, |ui| {
                    if ui.selectable_label(filter.is_all(), "All classes").clicked() {
                        result.class_selector = Some(ClassFilter::All.as_str().to_string());
                    }
                    for class in classes {
                        let is_selected = filter.as_str() == class.as_str();
                        if ui.selectable_label(is_selected, class).clicked() {
                            result.class_selector = Some(class.clone());
                        }
                    }
                });

            // Free text, applied on Enter
            let response = ui.add(
                egui::TextEdit::singleline(class_text)
                    .hint_text("e.g. 10c")
                    .desired_width(100.0)
            );
            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                let text = class_text.trim();
                result.class_selector = Some(if text.is_empty() {
                    ClassFilter::All.as_str().to_string()
                } else {
                    text.to_string()
                });
            }
        });

        if !filter.is_all() {
            ui.add_space(8.0);
            render_badge(ui, filter.as_str(), ACCENT, Color32::WHITE);
        }
    });

    result
}

/// Day columns, period rows. Falls back to a placeholder when an axis is empty.
pub fn render_timetable(ui: &mut Ui, matrix: &TimetableMatrix, entries: &[ScheduleEntry], loading: bool) {
    if matrix.is_empty() {
        ui.add_space(40.0);
        ui.vertical_centered(|ui| {
            if loading {
                ui.spinner();
                ui.add_space(8.0);
                ui.label(RichText::new("Loading timetable...").color(secondary_text()));
            } else {
                ui.label(RichText::new(egui_phosphor::regular::CALENDAR_X).size(40.0).color(secondary_text()));
                ui.add_space(8.0);
                ui.label(RichText::new("No timetable available").size(16.0).color(secondary_text()));
            }
        });
        return;
    }

    ui.horizontal(|ui| {
        ui.label(RichText::new(format!("Showing {} entries", entries.len())).color(secondary_text()));
        if loading {
            ui.spinner();
        }
    });
    ui.add_space(4.0);

    let days = matrix.days();
    let periods = matrix.periods();
    let spacing = 4.0;
    let cell_width = ((ui.available_width() - PERIOD_COLUMN_WIDTH) / days.len() as f32 - spacing)
        .max(CELL_MIN_WIDTH);

    egui::ScrollArea::both().show(ui, |ui| {
        egui::Grid::new("timetable_grid")
            .num_columns(days.len() + 1)
            .spacing([spacing, spacing])
            .show(ui, |ui| {
                ui.label("");
                for day in days {
                    render_header(ui, day, cell_width);
                }
                ui.end_row();

                for (p, period) in periods.iter().enumerate() {
                    render_header(ui, period, PERIOD_COLUMN_WIDTH);
                    for (d, day) in days.iter().enumerate() {
                        let (rect, response) = ui.allocate_exact_size(
                            egui::vec2(cell_width, CELL_HEIGHT),
                            egui::Sense::hover(),
                        );
                        let Some(cell) = matrix.cell(d, p) else { continue };
                        if cell.is_empty() {
                            let (bg, border) = empty_cell_colors();
                            ui.painter().rect(rect, 6.0, bg, egui::Stroke::new(1.0, border));
                            continue;
                        }

                        paint_lesson(ui, rect, &cell.subject, &cell.room);
                        response.on_hover_ui(|ui| {
                            ui.label(RichText::new(&cell.subject).strong());
                            if let Some(text) = entry_detail(entries, day, period).and_then(|e| e.text.as_deref()) {
                                ui.label(text);
                            }
                        });
                    }
                    ui.end_row();
                }
            });
    });
}

fn render_header(ui: &mut Ui, label: &str, width: f32) {
    let (bg, text) = header_colors();
    let (rect, _) = ui.allocate_exact_size(egui::vec2(width, 32.0), egui::Sense::hover());
    ui.painter().rect_filled(rect, 4.0, bg);
    ui.painter().text(
        rect.center(),
        egui::Align2::CENTER_CENTER,
        label,
        egui::FontId::proportional(14.0),
        text,
    );
}

fn paint_lesson(ui: &Ui, rect: egui::Rect, subject: &str, room: &str) {
    let (bg, border, text) = subject_colors(SubjectTone::for_subject(subject));
    let painter = ui.painter();
    painter.rect(rect, 6.0, bg, egui::Stroke::new(1.0, border));

    let subject_galley = painter.layout(
        subject.to_string(),
        egui::FontId::proportional(14.0),
        text,
        rect.width() - 16.0,
    );
    painter.galley(rect.min + egui::vec2(8.0, 8.0), subject_galley, text);

    if !room.is_empty() {
        let font = egui::FontId::proportional(11.0);
        let room_galley = painter.layout_no_wrap(room.to_string(), font, text);
        let badge_size = room_galley.size() + egui::vec2(10.0, 4.0);
        let badge_rect = egui::Rect::from_min_size(
            egui::pos2(rect.min.x + 8.0, rect.max.y - badge_size.y - 8.0),
            badge_size,
        );
        painter.rect_stroke(badge_rect, 8.0, egui::Stroke::new(1.0, border));
        painter.galley(badge_rect.min + egui::vec2(5.0, 2.0), room_galley, text);
    }
}

fn render_badge(ui: &mut Ui, text: &str, bg: Color32, fg: Color32) {
    egui::Frame::none()
        .fill(bg)
        .rounding(egui::Rounding::same(10.0))
        .inner_margin(egui::Margin::symmetric(8.0, 2.0))
        .show(ui, |ui| {
            ui.label(RichText::new(text).size(12.0).color(fg));
        });
}

/// "2024-05-03 07:15:00" as "03.05.2024 07:15". Unknown formats are shown as-is.
pub fn format_last_updated(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return dt.format("%d.%m.%Y %H:%M").to_string();
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%d.%m.%Y %H:%M").to_string();
    }
    raw.to_string()
}
