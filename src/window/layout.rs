use egui::{Pos2, Rect, Vec2};

use crate::window::presentation::PresentationMode;

/// Side of the square content panel in logical points.
pub const PANEL_SIZE: f32 = 500.0;

/// Space kept between the overlay panel and the display edge on small screens.
pub const PANEL_MARGIN: f32 = 16.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitRegion {
    Panel,
    Backdrop,
    Outside,
}

/// Largest square side not exceeding `bound` that fits in `available`.
pub fn fit_square(available: Vec2, bound: f32) -> f32 {
    available.x.min(available.y).min(bound).max(0.0)
}

/// Where the content panel sits inside the window's drawable area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelLayout {
    pub area: Rect,
    pub panel: Rect,
}

impl PanelLayout {
    pub fn compute(mode: PresentationMode, area: Rect) -> Self {
        let panel = match mode {
            PresentationMode::Overlay => {
                let usable = area.size() - Vec2::splat(PANEL_MARGIN * 2.0);
                let side = fit_square(usable, PANEL_SIZE);
                Rect::from_center_size(area.center(), Vec2::splat(side))
            }
            // The page itself caps the canvas at PANEL_SIZE.
            PresentationMode::Standalone => area,
        };
        Self { area, panel }
    }

    pub fn hit(&self, pos: Pos2) -> HitRegion {
        if self.panel.contains(pos) {
            HitRegion::Panel
        } else if self.area.contains(pos) {
            HitRegion::Backdrop
        } else {
            HitRegion::Outside
        }
    }
}
