//! Bar chart rendering for the statistics series.
//!
//! Layout math is kept in pure functions so the geometry is testable
//! without a UI; drawing goes through the egui painter. Category labels
//! are derived from the series length at render time.

use egui::{Align2, FontId, Sense, Stroke};
use gradeviz_core::{axis_labels, StatisticsSeries};

/// Fraction of each category slot occupied by its bar.
pub const BAR_WIDTH_FRACTION: f32 = 0.6;

const VALUE_TICKS: usize = 4;

/// Round a series maximum up to a friendly axis maximum (1/2/5 ladder).
pub fn nice_axis_max(max: f64) -> f64 {
    if !(max > 0.0) {
        return 1.0;
    }

    let magnitude = 10f64.powf(max.log10().floor());
    let normalized = max / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };

    nice * magnitude
}

/// Compute one rectangle per value inside the plot area.
///
/// Bars are centered in equal-width slots; heights scale against
/// `axis_max` with negative values clamped to the baseline.
pub fn layout_bars(plot: egui::Rect, values: &[f64], axis_max: f64) -> Vec<egui::Rect> {
    if values.is_empty() || axis_max <= 0.0 {
        return Vec::new();
    }

    let slot = plot.width() / values.len() as f32;
    let bar_width = slot * BAR_WIDTH_FRACTION;

    values
        .iter()
        .enumerate()
        .map(|(index, &value)| {
            let center_x = plot.left() + (index as f32 + 0.5) * slot;
            let height = ((value.max(0.0) / axis_max) as f32).min(1.0) * plot.height();
            egui::Rect::from_min_max(
                egui::pos2(center_x - bar_width / 2.0, plot.bottom() - height),
                egui::pos2(center_x + bar_width / 2.0, plot.bottom()),
            )
        })
        .collect()
}

/// Draw the chart into the remaining space of `ui`.
///
/// An empty series still draws the axes and gridlines, just no bars.
pub fn draw_bar_chart(ui: &mut egui::Ui, series: &StatisticsSeries, dark_mode: bool) {
    let (rect, _response) = ui.allocate_exact_size(ui.available_size(), Sense::hover());
    if !ui.is_rect_visible(rect) {
        return;
    }

    // Margins leave room for tick values on the left and labels below.
    let plot = egui::Rect::from_min_max(
        egui::pos2(rect.left() + 44.0, rect.top() + 12.0),
        egui::pos2(rect.right() - 12.0, rect.bottom() - 24.0),
    );
    if plot.width() <= 0.0 || plot.height() <= 0.0 {
        return;
    }

    let painter = ui.painter();
    let axis_max = nice_axis_max(series.max_value().unwrap_or(0.0));

    for step in 0..=VALUE_TICKS {
        let fraction = step as f32 / VALUE_TICKS as f32;
        let y = plot.bottom() - fraction * plot.height();
        painter.line_segment(
            [egui::pos2(plot.left(), y), egui::pos2(plot.right(), y)],
            Stroke::new(1.0, grid_color(dark_mode)),
        );
        painter.text(
            egui::pos2(plot.left() - 6.0, y),
            Align2::RIGHT_CENTER,
            format_tick(axis_max * fraction as f64),
            FontId::proportional(10.0),
            text_color(dark_mode),
        );
    }

    let labels = axis_labels(series.len());
    let bars = layout_bars(plot, series.values(), axis_max);

    for (index, bar) in bars.iter().enumerate() {
        let response = ui.interact(*bar, ui.id().with(("grade_bar", index)), Sense::hover());
        let color = if response.hovered() {
            bar_hover_color(dark_mode)
        } else {
            bar_color(dark_mode)
        };
        painter.rect_filled(*bar, 2.0, color);

        let label = labels.get(index).map(String::as_str).unwrap_or("");
        painter.text(
            egui::pos2(bar.center().x, plot.bottom() + 4.0),
            Align2::CENTER_TOP,
            label,
            FontId::proportional(10.0),
            text_color(dark_mode),
        );

        response.on_hover_text(format!("{}: {}", label, series.values()[index]));
    }

    // Baseline drawn last so the axis stays crisp over the bars.
    painter.line_segment(
        [plot.left_bottom(), plot.right_bottom()],
        Stroke::new(1.0, axis_color(dark_mode)),
    );
}

fn format_tick(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{}", value.round() as i64)
    } else {
        format!("{:.1}", value)
    }
}

fn bar_color(dark_mode: bool) -> egui::Color32 {
    if dark_mode {
        egui::Color32::from_rgb(110, 160, 255)
    } else {
        egui::Color32::from_rgb(60, 110, 200)
    }
}

fn bar_hover_color(dark_mode: bool) -> egui::Color32 {
    if dark_mode {
        egui::Color32::from_rgb(150, 190, 255)
    } else {
        egui::Color32::from_rgb(90, 140, 230)
    }
}

fn grid_color(dark_mode: bool) -> egui::Color32 {
    if dark_mode {
        egui::Color32::from_rgba_unmultiplied(255, 255, 255, 20)
    } else {
        egui::Color32::from_rgba_unmultiplied(0, 0, 0, 20)
    }
}

fn axis_color(dark_mode: bool) -> egui::Color32 {
    if dark_mode {
        egui::Color32::from_rgb(160, 160, 160)
    } else {
        egui::Color32::from_rgb(100, 100, 100)
    }
}

fn text_color(dark_mode: bool) -> egui::Color32 {
    if dark_mode {
        egui::Color32::from_rgb(200, 200, 200)
    } else {
        egui::Color32::from_rgb(80, 80, 80)
    }
}
