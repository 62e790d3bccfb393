use crate::theme::Theme;
use crate::ui::view::ChartSeries;
use eframe::egui::{self, Align2, CornerRadius, FontId, Rect, Sense, Stroke};

const CHART_HEIGHT: f32 = 200.0;
const LABEL_BAND: f32 = 18.0;

/// Paints a vertical bar chart scaled to the largest value.
pub fn bar_chart(ui: &mut egui::Ui, series: &ChartSeries, theme: &Theme) {
    let width = ui.available_width().max(120.0);
    let (rect, _response) = ui.allocate_exact_size(egui::vec2(width, CHART_HEIGHT), Sense::hover());
    let painter = ui.painter_at(rect);

    painter.line_segment(
        [rect.left_bottom() - egui::vec2(0.0, LABEL_BAND), rect.right_bottom() - egui::vec2(0.0, LABEL_BAND)],
        Stroke::new(1.0, theme.border_subtle),
    );

    if series.bars.is_empty() {
        return;
    }

    let max = series.max_value();
    let plot_height = CHART_HEIGHT - LABEL_BAND * 2.0;
    let slot = rect.width() / series.bars.len() as f32;
    let bar_width = (slot * 0.6).max(2.0);
    let baseline = rect.bottom() - LABEL_BAND;

    for (index, bar) in series.bars.iter().enumerate() {
        let ratio = if max > 0.0 {
            (bar.value.max(0.0) / max) as f32
        } else {
            0.0
        };
        let center_x = rect.left() + slot * (index as f32 + 0.5);
        let top = baseline - plot_height * ratio;
        let bar_rect = Rect::from_min_max(
            egui::pos2(center_x - bar_width / 2.0, top),
            egui::pos2(center_x + bar_width / 2.0, baseline),
        );
        painter.rect_filled(bar_rect, CornerRadius::same(Theme::R8 / 2), theme.accent_primary);
        painter.text(
            egui::pos2(center_x, top - 2.0),
            Align2::CENTER_BOTTOM,
            bar.value.to_string(),
            FontId::proportional(11.0),
            theme.text_muted,
        );
        painter.text(
            egui::pos2(center_x, baseline + 2.0),
            Align2::CENTER_TOP,
            &bar.label,
            FontId::proportional(11.0),
            theme.text_primary,
        );
    }
}
