use egui::{Color32, Rect, Response, Sense, Ui};

use crate::window::layout::PanelLayout;

const BACKDROP_COLOR: Color32 = Color32::from_black_alpha(128);
const PANEL_COLOR: Color32 = Color32::WHITE;
const PANEL_RADIUS: f32 = 20.0;
const SHADOW_COLOR: Color32 = Color32::from_black_alpha(60);
const SHADOW_SPREAD: f32 = 10.0;

/// Paint the dimmed backdrop with the rounded panel on top.
///
/// The returned response covers the whole window; clicks landing on the panel
/// are filtered by hit-testing against the layout.
pub fn draw_overlay(ui: &mut Ui, layout: &PanelLayout) -> Response {
    let (response, painter) = ui.allocate_painter(layout.area.size(), Sense::click());

    painter.rect_filled(layout.area, 0.0, BACKDROP_COLOR);

    if layout.panel.width() > 0.0 {
        let shadow = layout.panel.expand(SHADOW_SPREAD);
        painter.rect_filled(shadow, PANEL_RADIUS + SHADOW_SPREAD, SHADOW_COLOR);
        painter.rect_filled(layout.panel, PANEL_RADIUS, PANEL_COLOR);
    }

    response
}

/// Standalone windows just get a plain surface behind the page.
pub fn draw_standalone(ui: &mut Ui) -> Rect {
    let available = ui.available_size();
    let (response, painter) = ui.allocate_painter(available, Sense::hover());
    painter.rect_filled(response.rect, 0.0, PANEL_COLOR);
    response.rect
}

/// Shown in place of the page when no webview could be created.
pub fn draw_unavailable(ui: &Ui, panel: Rect) {
    ui.painter().text(
        panel.center(),
        egui::Align2::CENTER_CENTER,
        "Preview unavailable",
        egui::FontId::proportional(16.0),
        Color32::GRAY,
    );
}
