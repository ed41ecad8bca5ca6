use std::time::{Duration, Instant};

use egui::{Color32, Rect, Ui};

pub const NOTICE_DURATION: Duration = Duration::from_secs(6);

const NOTICE_GAP: f32 = 12.0;

/// Transient, non-blocking message about a failed file load.
#[derive(Clone, Debug)]
pub struct Notice {
    pub message: String,
    shown_at: Instant,
}

impl Notice {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            shown_at: Instant::now(),
        }
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now.duration_since(self.shown_at) >= NOTICE_DURATION
    }

    pub fn remaining_at(&self, now: Instant) -> Duration {
        NOTICE_DURATION.saturating_sub(now.duration_since(self.shown_at))
    }
}

/// Overlay: the message sits on the backdrop just below the panel.
pub fn draw_below_panel(ui: &Ui, panel: Rect, notice: &Notice) {
    ui.painter().text(
        panel.center_bottom() + egui::vec2(0.0, NOTICE_GAP),
        egui::Align2::CENTER_TOP,
        &notice.message,
        egui::FontId::proportional(14.0),
        Color32::from_rgb(255, 110, 110),
    );
}

/// Standalone: a status bar line at the bottom of the window.
pub fn draw_status_bar(ui: &mut Ui, notice: &Notice) {
    ui.horizontal(|ui| {
        ui.colored_label(Color32::RED, &notice.message);
    });
}
