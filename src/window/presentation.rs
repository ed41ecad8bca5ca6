use std::fmt;
use std::str::FromStr;

use egui::{ViewportBuilder, WindowLevel};

use crate::window::state::DismissTrigger;

/// Logical size of the standalone window before the user resizes it.
pub const STANDALONE_SIZE: [f32; 2] = [600.0, 600.0];
pub const STANDALONE_MIN_SIZE: [f32; 2] = [200.0, 200.0];

/// Overlay size used until the monitor size is known.
pub const OVERLAY_FALLBACK_SIZE: [f32; 2] = [1280.0, 800.0];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PresentationMode {
    /// Borderless always-on-top panel covering the display, with a backdrop.
    #[default]
    Overlay,
    /// Conventional titled, closable, resizable window.
    Standalone,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActivationPolicy {
    /// No dock or taskbar presence.
    Accessory,
    Regular,
}

impl PresentationMode {
    pub fn activation_policy(self) -> ActivationPolicy {
        match self {
            PresentationMode::Overlay => ActivationPolicy::Accessory,
            PresentationMode::Standalone => ActivationPolicy::Regular,
        }
    }

    pub fn accepts(self, trigger: DismissTrigger) -> bool {
        match self {
            PresentationMode::Overlay => true,
            PresentationMode::Standalone => trigger == DismissTrigger::CloseRequested,
        }
    }

    pub fn has_backdrop(self) -> bool {
        self == PresentationMode::Overlay
    }

    /// Whether the key monitor listens for Escape in this mode.
    pub fn escape_dismisses(self) -> bool {
        self.accepts(DismissTrigger::EscapeKey)
    }

    pub fn viewport(self, title: &str) -> ViewportBuilder {
        let builder = ViewportBuilder::default()
            .with_title(title)
            .with_active(true);

        let builder = match self {
            PresentationMode::Overlay => builder
                .with_inner_size(OVERLAY_FALLBACK_SIZE)
                .with_position([0.0, 0.0])
                .with_decorations(false)
                .with_transparent(true)
                .with_resizable(false)
                .with_window_level(WindowLevel::AlwaysOnTop),
            PresentationMode::Standalone => builder
                .with_inner_size(STANDALONE_SIZE)
                .with_min_inner_size(STANDALONE_MIN_SIZE)
                .with_decorations(true)
                .with_resizable(true)
                .with_close_button(true)
                .with_minimize_button(true),
        };

        match self.activation_policy() {
            // macOS applies this through the event loop instead.
            ActivationPolicy::Accessory if !cfg!(target_os = "macos") => builder.with_taskbar(false),
            _ => builder,
        }
    }

    /// The standalone window is centered on the primary display by eframe.
    pub fn centered(self) -> bool {
        self == PresentationMode::Standalone
    }
}

impl fmt::Display for PresentationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresentationMode::Overlay => write!(f, "overlay"),
            PresentationMode::Standalone => write!(f, "standalone"),
        }
    }
}

impl FromStr for PresentationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "overlay" => Ok(PresentationMode::Overlay),
            "standalone" => Ok(PresentationMode::Standalone),
            other => Err(format!(
                "unknown presentation mode '{other}' (expected 'overlay' or 'standalone')"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_modes() {
        assert_eq!("overlay".parse(), Ok(PresentationMode::Overlay));
        assert_eq!(" STANDALONE ".parse(), Ok(PresentationMode::Standalone));
        assert!("window".parse::<PresentationMode>().is_err());
    }

    #[test]
    fn test_display_parses_back() {
        for mode in [PresentationMode::Overlay, PresentationMode::Standalone] {
            assert_eq!(mode.to_string().parse(), Ok(mode));
        }
    }

    #[test]
    fn test_activation_policy() {
        assert_eq!(
            PresentationMode::Overlay.activation_policy(),
            ActivationPolicy::Accessory
        );
        assert_eq!(
            PresentationMode::Standalone.activation_policy(),
            ActivationPolicy::Regular
        );
    }

    #[test]
    fn test_overlay_trigger_set() {
        let mode = PresentationMode::Overlay;
        assert!(mode.accepts(DismissTrigger::BackdropTap));
        assert!(mode.accepts(DismissTrigger::EscapeKey));
        assert!(mode.accepts(DismissTrigger::CloseRequested));
        assert!(mode.has_backdrop());
    }

    #[test]
    fn test_standalone_trigger_set() {
        let mode = PresentationMode::Standalone;
        assert!(!mode.accepts(DismissTrigger::BackdropTap));
        assert!(!mode.accepts(DismissTrigger::EscapeKey));
        assert!(mode.accepts(DismissTrigger::CloseRequested));
        assert!(!mode.has_backdrop());
        assert!(!mode.escape_dismisses());
    }

    #[test]
    fn test_viewport_styling() {
        let overlay = PresentationMode::Overlay.viewport("a");
        assert_eq!(overlay.decorations, Some(false));
        assert_eq!(overlay.transparent, Some(true));
        assert_eq!(overlay.window_level, Some(WindowLevel::AlwaysOnTop));

        let standalone = PresentationMode::Standalone.viewport("a");
        assert_eq!(standalone.decorations, Some(true));
        assert_eq!(standalone.resizable, Some(true));
        assert_eq!(standalone.title.as_deref(), Some("a"));
        assert!(PresentationMode::Standalone.centered());
    }
}
