//! Main application state and rendering logic.

use eframe::{App, CreationContext};
use egui::{Context, RichText};

use gradeviz_client::StatisticsClient;
use gradeviz_core::{FetchPhase, GradeSession};

use crate::chart::draw_bar_chart;
use crate::controller::FetchController;
use crate::hover_panel::HoverDetailPanel;

/// The viewer application.
pub struct GradeVizApp {
    /// UI-independent session state (input, series, phase, fencing).
    session: GradeSession,
    /// Async bridge to the statistics endpoint.
    controller: FetchController,
    /// Hover detail panel state.
    hover_panel: HoverDetailPanel,
    /// Current dark mode state.
    dark_mode: bool,
}

impl GradeVizApp {
    /// Create the app around a configured client.
    pub fn new(cc: &CreationContext<'_>, client: StatisticsClient) -> std::io::Result<Self> {
        let dark_mode = cc.egui_ctx.style().visuals.dark_mode;

        Ok(Self {
            session: GradeSession::new(),
            controller: FetchController::new(client)?,
            hover_panel: HoverDetailPanel::default(),
            dark_mode,
        })
    }

    fn ui_input_row(&mut self, ui: &mut egui::Ui, ctx: &Context) {
        ui.horizontal(|ui| {
            ui.label("Student ID:");

            let response = ui.add(
                egui::TextEdit::singleline(self.session.input_mut())
                    .hint_text("identifier")
                    .desired_width(180.0),
            );

            // Enter submits the raw text, empty string included.
            let submitted =
                response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if submitted {
                let request = self.session.submit();
                self.controller.trigger(request, ctx.clone());
                response.request_focus();
            }

            if self.session.is_loading() {
                ui.spinner();
                ui.label(RichText::new("fetching…").small().color(egui::Color32::GRAY));
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                self.hover_panel.ui(ui, self.controller.client().base_url());
            });
        });
    }

    fn ui_error_banner(&self, ui: &mut egui::Ui) {
        let Some(failure) = self.session.failure() else {
            return;
        };

        let (fill, text) = banner_colors(self.dark_mode);
        egui::Frame::new()
            .fill(fill)
            .corner_radius(4.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(failure.label()).strong().color(text));
                    ui.label(RichText::new(failure.to_string()).small().color(text));
                });
            });
    }

    fn ui_chart_area(&mut self, ui: &mut egui::Ui) {
        if !self.session.has_loaded() {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new("Enter a student ID to retrieve grades.")
                        .color(egui::Color32::GRAY),
                );
            });
            return;
        }

        if let Some(identifier) = self.session.submitted() {
            let heading = if identifier.is_empty() {
                "Grades:".to_string()
            } else {
                format!("Grades for student {}:", identifier)
            };
            ui.label(heading);
        }

        draw_bar_chart(ui, self.session.series(), self.dark_mode);
    }
}

impl App for GradeVizApp {
    fn update(&mut self, ctx: &Context, _: &mut eframe::Frame) {
        // Drain finished fetches before drawing anything.
        self.controller.poll(&mut self.session);

        // Advance the hover transition.
        let dt = ctx.input(|i| i.stable_dt);
        self.hover_panel.tick(dt);

        // Keep repainting while something is moving or outstanding.
        if self.session.is_loading() || self.hover_panel.is_animating() {
            ctx.request_repaint();
        }

        self.dark_mode = ctx.style().visuals.dark_mode;

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.heading("Grade Statistics");
            ui.add_space(4.0);
            self.ui_input_row(ui, ctx);
            if self.session.phase() == FetchPhase::Failed {
                ui.add_space(4.0);
                self.ui_error_banner(ui);
            }
            ui.add_space(6.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.ui_chart_area(ui);
        });
    }
}

fn banner_colors(dark_mode: bool) -> (egui::Color32, egui::Color32) {
    if dark_mode {
        (
            egui::Color32::from_rgb(70, 30, 30),
            egui::Color32::from_rgb(255, 180, 180),
        )
    } else {
        (
            egui::Color32::from_rgb(250, 225, 225),
            egui::Color32::from_rgb(150, 40, 40),
        )
    }
}
