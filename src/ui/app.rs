use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use eframe::egui;
use egui::{Color32, RichText};

use crate::api::PlanClient;
use crate::config::{clamp_font_scale, Config};
use crate::session::{Notification, SelectionController};
use super::theme::{card_colors, notification_color, secondary_text, ACCENT};
use super::views::{self, format_last_updated};

const TOAST_LIFETIME: Duration = Duration::from_secs(4);

pub struct PlanGridApp {
    config: Config,
    controller: SelectionController,

    // Login form
    login_username: String,
    login_password: String,

    // Free-text class field next to the class picker
    class_text: String,

    toasts: Vec<(Notification, Instant)>,

    // Must outlive the controller's spawned requests
    _runtime: tokio::runtime::Runtime,
}

impl PlanGridApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> anyhow::Result<Self> {
        let config = Config::load().unwrap_or_else(|e| {
            log::warn!("Using default config: {:#}", e);
            Config::default()
        });
        super::setup_fonts(&cc.egui_ctx);
        super::setup_theme(&cc.egui_ctx);

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("Failed to create tokio runtime")?;
        let client = PlanClient::new(&config)?;
        log::info!("Timetable service at {}", config.base_url());

        let controller = SelectionController::from_config(Arc::new(client), runtime.handle().clone(), &config);

        Ok(Self {
            config,
            controller,
            login_username: String::new(),
            login_password: String::new(),
            class_text: String::new(),
            toasts: Vec::new(),
            _runtime: runtime,
        })
    }

    fn submit_login(&mut self) {
        let username = self.login_username.trim().to_string();
        if username.is_empty() || self.login_password.is_empty() {
            self.toasts.push((Notification::error("Enter username and password"), Instant::now()));
            return;
        }
        self.controller.submit_credentials(&username, &self.login_password);
        self.login_password.clear();
    }

    fn render_login(&mut self, ui: &mut egui::Ui) {
        let loading = self.controller.is_loading();

        ui.vertical_centered(|ui| {
            ui.add_space(60.0);
            ui.label(RichText::new(egui_phosphor::regular::CALENDAR_BLANK).size(48.0).color(ACCENT));
            ui.add_space(8.0);
            ui.heading("Plangrid");
            ui.add_space(8.0);
            ui.label(RichText::new("Sign in with your timetable account.").color(secondary_text()));
            ui.add_space(20.0);
        });

        let (card_bg, card_border) = card_colors();
        let mut submit = false;
        ui.vertical_centered(|ui| {
            egui::Frame::none()
                .fill(card_bg)
                .stroke(egui::Stroke::new(1.0, card_border))
                .rounding(egui::Rounding::same(8.0))
                .inner_margin(egui::Margin::same(20.0))
                .show(ui, |ui| {
                    ui.add_enabled_ui(!loading, |ui| {
                        egui::Grid::new("login_grid")
                            .num_columns(2)
                            .spacing([20.0, 10.0])
                            .show(ui, |ui| {
                                ui.label("Username:");
                                ui.add(
                                    egui::TextEdit::singleline(&mut self.login_username)
                                        .desired_width(260.0)
                                );
                                ui.end_row();

                                ui.label("Password:");
                                let password = ui.add(
                                    egui::TextEdit::singleline(&mut self.login_password)
                                        .password(true)
                                        .desired_width(260.0)
                                );
                                if password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                                    submit = true;
                                }
                                ui.end_row();
                            });

                        ui.add_space(12.0);
                        ui.horizontal(|ui| {
                            if ui.button("Load timetable").clicked() {
                                submit = true;
                            }
                            if loading {
                                ui.spinner();
                            }
                        });
                    });
                });

            ui.add_space(12.0);
            ui.label(
                RichText::new("Credentials are kept for this session only.")
                    .size(12.0)
                    .color(secondary_text())
            );
        });

        if submit && !loading {
            self.submit_login();
        }
    }

    fn render_main(&mut self, ui: &mut egui::Ui) {
        ui.add_space(8.0);
        ui.horizontal(|ui| {
            ui.heading("Timetable");
            if let Some(username) = self.controller.username() {
                ui.label(RichText::new(username).color(secondary_text()));
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let loading = self.controller.is_loading();
                let reload = ui.add_enabled(
                    !loading,
                    egui::Button::new(format!("{} Reload", egui_phosphor::regular::ARROWS_CLOCKWISE)),
                );
                if reload.clicked() {
                    if let Err(e) = self.controller.reload() {
                        self.toasts.push((Notification::error(e.to_string()), Instant::now()));
                    }
                }
                if loading {
                    ui.spinner();
                }
                if let Some(raw) = &self.controller.state().last_updated {
                    ui.label(
                        RichText::new(format!("Last updated: {}", format_last_updated(raw)))
                            .color(secondary_text())
                    );
                }
            });
        });
        ui.add_space(8.0);

        let selection = views::render_plan_selector(
            ui,
            self.controller.available_plans(),
            self.controller.available_classes(),
            self.controller.state(),
            &mut self.class_text,
        );
        if let Some(index) = selection.plan_index {
            if let Err(e) = self.controller.change_plan(index) {
                log::warn!("Plan change refused: {}", e);
                self.toasts.push((Notification::error(e.to_string()), Instant::now()));
            }
        }
        if let Some(selector) = selection.class_selector {
            self.controller.change_class_filter(&selector);
            if self.controller.state().class_filter().is_all() {
                self.class_text.clear();
            }
        }
        if let Some(url) = selection.open_plan_url {
            if let Err(e) = open::that(&url) {
                log::warn!("Failed to open {}: {}", url, e);
            }
        }

        ui.add_space(12.0);
        views::render_timetable(
            ui,
            self.controller.matrix(),
            self.controller.visible_entries(),
            self.controller.is_loading(),
        );
    }

    fn render_toasts(&mut self, ctx: &egui::Context) {
        self.toasts.retain(|(_, shown)| shown.elapsed() < TOAST_LIFETIME);
        if self.toasts.is_empty() {
            return;
        }

        let mut dismissed = None;
        egui::Area::new(egui::Id::new("toasts"))
            .anchor(egui::Align2::RIGHT_BOTTOM, [-16.0, -16.0])
            .show(ctx, |ui| {
                let (card_bg, _) = card_colors();
                for (index, (toast, _)) in self.toasts.iter().enumerate() {
                    let color = notification_color(toast.level);
                    egui::Frame::none()
                        .fill(card_bg)
                        .stroke(egui::Stroke::new(1.0, color))
                        .rounding(egui::Rounding::same(8.0))
                        .inner_margin(egui::Margin::symmetric(14.0, 10.0))
                        .show(ui, |ui| {
                            ui.set_max_width(320.0);
                            ui.horizontal(|ui| {
                                ui.vertical(|ui| {
                                    ui.label(RichText::new(&toast.title).strong().color(color));
                                    ui.label(RichText::new(&toast.message).color(Color32::WHITE));
                                });
                                let close = ui.add(egui::Label::new(
                                    RichText::new(egui_phosphor::regular::X).size(14.0).color(secondary_text())
                                ).sense(egui::Sense::click()));
                                if close.hovered() {
                                    ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                                }
                                if close.clicked() {
                                    dismissed = Some(index);
                                }
                            });
                        });
                    ui.add_space(6.0);
                }
            });

        if let Some(index) = dismissed {
            self.toasts.remove(index);
        }

        // Keep repainting so toasts expire without input
        ctx.request_repaint_after(Duration::from_millis(250));
    }
}

impl eframe::App for PlanGridApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Handle pinch-to-zoom (trackpad pinch or Ctrl+scroll)
        let zoom_delta = ctx.input(|i| i.zoom_delta());
        if zoom_delta != 1.0 {
            self.config.font_scale = clamp_font_scale(self.config.font_scale * zoom_delta);
            if (zoom_delta - 1.0).abs() > 0.01 {
                if let Err(e) = self.config.save() {
                    log::warn!("Failed to save config: {:#}", e);
                }
            }
        }
        ctx.set_pixels_per_point(self.config.font_scale);

        self.controller.poll();
        let now = Instant::now();
        for notification in self.controller.take_notifications() {
            self.toasts.push((notification, now));
        }
        if self.controller.is_loading() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::CentralPanel::default().frame(
            egui::Frame::none()
                .fill(ctx.style().visuals.panel_fill)
                .inner_margin(egui::Margin::symmetric(16.0, 8.0))
        ).show(ctx, |ui| {
            if self.controller.timetable().is_none() {
                self.render_login(ui);
            } else {
                self.render_main(ui);
            }
        });

        self.render_toasts(ctx);
    }
}
