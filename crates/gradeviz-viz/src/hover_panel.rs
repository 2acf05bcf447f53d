//! Hover-activated detail panel.
//!
//! A small trigger card; while the pointer is over it, an explanatory
//! panel fades and slides in below, and fades back out on leave. Purely
//! presentational — nothing else in the app observes the hover state.

use egui::RichText;
use gradeviz_core::HoverTransition;

/// Slide distance of the enter/exit transition, in points.
const SLIDE_DISTANCE: f32 = 10.0;

/// State for the hover detail panel.
#[derive(Debug, Clone, Default)]
pub struct HoverDetailPanel {
    transition: HoverTransition,
}

impl HoverDetailPanel {
    /// Advance the transition by delta time; called once per frame.
    pub fn tick(&mut self, dt: f32) {
        self.transition.tick(dt);
    }

    /// Whether a repaint is needed to keep the transition moving.
    pub fn is_animating(&self) -> bool {
        self.transition.is_animating()
    }

    /// Draw the trigger card and, when visible, the detail panel.
    pub fn ui(&mut self, ui: &mut egui::Ui, endpoint: &str) {
        let response = ui.add(egui::Button::new("ℹ About this chart"));
        self.transition.set_hovered(response.hovered());

        if !self.transition.is_visible() {
            return;
        }

        let alpha = self.transition.alpha();
        let offset = self.transition.slide_offset(SLIDE_DISTANCE);
        let anchor = egui::pos2(
            response.rect.left(),
            response.rect.bottom() + 6.0 + offset,
        );

        let (fill, heading, body) = panel_colors(ui.ctx().style().visuals.dark_mode);

        egui::Area::new(egui::Id::new("hover_detail_panel"))
            .order(egui::Order::Foreground)
            .fixed_pos(anchor)
            .movable(false)
            .interactable(false)
            .show(ui.ctx(), |ui| {
                egui::Frame::new()
                    .fill(fill.linear_multiply(alpha))
                    .corner_radius(6.0)
                    .inner_margin(10.0)
                    .show(ui, |ui| {
                        ui.set_max_width(300.0);
                        ui.label(
                            RichText::new("Detailed explanation")
                                .strong()
                                .color(heading.linear_multiply(alpha)),
                        );
                        ui.label(
                            RichText::new(
                                "One bar per value returned by the statistics \
                                 endpoint, in server order. Press Enter in the \
                                 identifier field to fetch; only the most \
                                 recently submitted request updates the chart.",
                            )
                            .small()
                            .color(body.linear_multiply(alpha)),
                        );
                        ui.add_space(4.0);
                        ui.label(
                            RichText::new(format!("Endpoint: {}", endpoint))
                                .small()
                                .color(body.linear_multiply(alpha)),
                        );
                    });
            });
    }
}

fn panel_colors(dark_mode: bool) -> (egui::Color32, egui::Color32, egui::Color32) {
    if dark_mode {
        (
            egui::Color32::from_rgb(40, 40, 48),
            egui::Color32::from_rgb(230, 230, 235),
            egui::Color32::from_rgb(180, 180, 190),
        )
    } else {
        (
            egui::Color32::from_rgb(245, 245, 250),
            egui::Color32::from_rgb(40, 40, 50),
            egui::Color32::from_rgb(90, 90, 100),
        )
    }
}
