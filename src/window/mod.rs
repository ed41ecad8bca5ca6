//! The single preview window: presentation mode, lifecycle and dismissal.
//!
//! Everything here is independent of the windowing backend. [`crate::app`]
//! feeds native and webview input in as [`WindowInput`] and carries out the
//! returned [`Effect`].

pub mod key_monitor;
pub mod layout;
pub mod presentation;
pub mod state;

use std::sync::mpsc::{self, Receiver, Sender};

use egui::Pos2;

use key_monitor::{Key, KeyDisposition, KeyMonitor};
use layout::{HitRegion, PanelLayout};
use presentation::PresentationMode;
use state::{DismissTrigger, Phase, WindowState};

#[derive(Clone, Debug, PartialEq)]
pub enum WindowInput {
    KeyDown(Key),
    /// Primary click or tap at a position in window coordinates.
    Tap(Pos2),
    CloseRequested,
    /// The native window gained or lost key focus.
    FocusChanged(bool),
    /// The embedded page gained or lost keyboard focus.
    PageFocusChanged(bool),
}

/// Something the embedded page reported through its message bridge.
#[derive(Clone, Debug, PartialEq)]
pub enum PageEvent {
    KeyDown(Key),
    Focus(bool),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    Ignored,
    /// Key event left for the focused widget.
    PassThrough,
    /// Bring the window to the front and give it key focus again.
    Raise,
    Dismiss(DismissTrigger),
}

pub struct PreviewWindow {
    mode: PresentationMode,
    state: WindowState,
    monitor: KeyMonitor,
    layout: Option<PanelLayout>,

    page_tx: Sender<PageEvent>,
    page_rx: Receiver<PageEvent>,

    // The window is key while either the native window or the child page has focus
    native_focused: bool,
    page_focused: bool,
}

impl PreviewWindow {
    pub fn new(mode: PresentationMode) -> Self {
        let (page_tx, page_rx) = mpsc::channel();
        Self {
            mode,
            state: WindowState::default(),
            monitor: KeyMonitor::new(mode.escape_dismisses()),
            layout: None,
            page_tx,
            page_rx,
            native_focused: false,
            page_focused: false,
        }
    }

    pub fn mode(&self) -> PresentationMode {
        self.mode
    }

    pub fn state(&self) -> &WindowState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Where the embedded page posts its key and focus events.
    pub fn page_sender(&self) -> Sender<PageEvent> {
        self.page_tx.clone()
    }

    #[cfg(test)]
    pub fn is_listening(&self) -> bool {
        self.monitor.is_armed()
    }

    pub fn set_layout(&mut self, layout: PanelLayout) {
        self.layout = Some(layout);
    }

    /// Window created and content embedded: show it and arm the key listener.
    pub fn show(&mut self) -> bool {
        if !self.state.show() {
            return false;
        }
        // Anything the page posted before the window was key is stale.
        for _ in self.page_rx.try_iter() {}
        self.native_focused = true;
        self.page_focused = false;
        self.monitor.arm();
        log::info!("Preview window shown ({})", self.mode);
        true
    }

    /// Page events queued since the last call, as window input.
    ///
    /// A key press inside the page means the page holds keyboard focus, so it
    /// is preceded by a focus change when the page was not known to have it.
    pub fn page_inputs(&mut self) -> Vec<WindowInput> {
        let mut page_focused = self.page_focused;
        let mut inputs = Vec::new();
        for event in self.page_rx.try_iter() {
            match event {
                PageEvent::KeyDown(key) => {
                    if !page_focused {
                        page_focused = true;
                        inputs.push(WindowInput::PageFocusChanged(true));
                    }
                    inputs.push(WindowInput::KeyDown(key));
                }
                PageEvent::Focus(focused) => {
                    page_focused = focused;
                    inputs.push(WindowInput::PageFocusChanged(focused));
                }
            }
        }
        inputs
    }

    pub fn handle(&mut self, input: WindowInput) -> Effect {
        if !self.state.is_live() {
            return Effect::Ignored;
        }

        match input {
            WindowInput::KeyDown(key) => match self.monitor.on_key_down(&key) {
                KeyDisposition::Consumed => self.dismiss(DismissTrigger::EscapeKey),
                KeyDisposition::PassThrough => Effect::PassThrough,
            },
            WindowInput::Tap(pos) => {
                let on_backdrop = self
                    .layout
                    .map(|l| l.hit(pos) == HitRegion::Backdrop)
                    .unwrap_or(false);
                if on_backdrop && self.state.dismissal_armed {
                    self.dismiss(DismissTrigger::BackdropTap)
                } else {
                    Effect::Ignored
                }
            }
            WindowInput::CloseRequested => self.dismiss(DismissTrigger::CloseRequested),
            WindowInput::FocusChanged(focused) => {
                self.native_focused = focused;
                self.update_key_focus()
            }
            WindowInput::PageFocusChanged(focused) => {
                self.page_focused = focused;
                self.update_key_focus()
            }
        }
    }

    /// `Dismissing -> Terminated`: unregister the key listener first.
    pub fn finish_dismissal(&mut self) -> bool {
        if self.state.phase() != Phase::Dismissing {
            return false;
        }
        self.monitor.disarm();
        self.state.terminate()
    }

    /// The key listener follows key focus while shown. Regaining it re-raises.
    fn update_key_focus(&mut self) -> Effect {
        let focused = self.native_focused || self.page_focused;
        let regained = focused && !self.state.focused;
        self.state.focused = focused;

        if self.state.phase() != Phase::Shown {
            return Effect::Ignored;
        }
        if focused {
            self.monitor.arm();
        } else {
            self.monitor.disarm();
        }
        if regained {
            Effect::Raise
        } else {
            Effect::Ignored
        }
    }

    fn dismiss(&mut self, trigger: DismissTrigger) -> Effect {
        if !self.mode.accepts(trigger) {
            return Effect::Ignored;
        }
        if self.state.begin_dismissal(trigger) {
            log::info!("Dismissing preview: {:?}", trigger);
            Effect::Dismiss(trigger)
        } else {
            Effect::Ignored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, Rect, Vec2};

    fn shown(mode: PresentationMode) -> PreviewWindow {
        let mut window = PreviewWindow::new(mode);
        let area = Rect::from_min_size(Pos2::ZERO, Vec2::new(1920.0, 1080.0));
        window.set_layout(PanelLayout::compute(mode, area));
        assert!(window.show());
        window
    }

    fn dismiss_and_finish(window: &mut PreviewWindow, input: WindowInput) -> Effect {
        let effect = window.handle(input);
        window.finish_dismissal();
        effect
    }

    #[test]
    fn test_show_arms_listener() {
        let mut window = PreviewWindow::new(PresentationMode::Overlay);
        assert!(!window.is_listening());
        assert!(window.show());
        assert!(window.is_listening());
        assert_eq!(window.phase(), Phase::Shown);
        assert!(window.state().dismissal_armed);
    }

    #[test]
    fn test_overlay_escape_terminates() {
        let mut window = shown(PresentationMode::Overlay);
        let effect = dismiss_and_finish(&mut window, WindowInput::KeyDown(Key::Escape));
        assert_eq!(effect, Effect::Dismiss(DismissTrigger::EscapeKey));
        assert_eq!(window.phase(), Phase::Terminated);
        assert!(!window.is_listening());
    }

    #[test]
    fn test_overlay_other_key_passes_through() {
        let mut window = shown(PresentationMode::Overlay);
        let effect = window.handle(WindowInput::KeyDown(Key::Other("Space".into())));
        assert_eq!(effect, Effect::PassThrough);
        assert_eq!(window.phase(), Phase::Shown);
    }

    #[test]
    fn test_overlay_tap_inside_panel_keeps_window() {
        let mut window = shown(PresentationMode::Overlay);
        assert_eq!(window.handle(WindowInput::Tap(pos2(960.0, 540.0))), Effect::Ignored);
        assert_eq!(window.phase(), Phase::Shown);
    }

    #[test]
    fn test_overlay_backdrop_tap_terminates() {
        let mut window = shown(PresentationMode::Overlay);
        let effect = dismiss_and_finish(&mut window, WindowInput::Tap(pos2(20.0, 20.0)));
        assert_eq!(effect, Effect::Dismiss(DismissTrigger::BackdropTap));
        assert_eq!(window.phase(), Phase::Terminated);
    }

    #[test]
    fn test_tap_without_layout_ignored() {
        let mut window = PreviewWindow::new(PresentationMode::Overlay);
        window.show();
        assert_eq!(window.handle(WindowInput::Tap(pos2(1.0, 1.0))), Effect::Ignored);
    }

    #[test]
    fn test_standalone_close_terminates() {
        let mut window = shown(PresentationMode::Standalone);
        let effect = dismiss_and_finish(&mut window, WindowInput::CloseRequested);
        assert_eq!(effect, Effect::Dismiss(DismissTrigger::CloseRequested));
        assert_eq!(window.phase(), Phase::Terminated);
    }

    #[test]
    fn test_standalone_escape_has_no_effect() {
        let mut window = shown(PresentationMode::Standalone);
        assert_eq!(window.handle(WindowInput::KeyDown(Key::Escape)), Effect::PassThrough);
        assert_eq!(window.handle(WindowInput::Tap(pos2(1.0, 1.0))), Effect::Ignored);
        assert_eq!(window.phase(), Phase::Shown);
    }

    #[test]
    fn test_overlay_close_request_terminates() {
        let mut window = shown(PresentationMode::Overlay);
        dismiss_and_finish(&mut window, WindowInput::CloseRequested);
        assert_eq!(window.phase(), Phase::Terminated);
    }

    #[test]
    fn test_terminated_ignores_everything() {
        let mut window = shown(PresentationMode::Overlay);
        dismiss_and_finish(&mut window, WindowInput::KeyDown(Key::Escape));

        for input in [
            WindowInput::KeyDown(Key::Escape),
            WindowInput::Tap(pos2(5.0, 5.0)),
            WindowInput::CloseRequested,
            WindowInput::FocusChanged(true),
        ] {
            assert_eq!(window.handle(input), Effect::Ignored);
        }
        assert!(!window.show());
        assert!(!window.finish_dismissal());
        assert_eq!(window.phase(), Phase::Terminated);
    }

    #[test]
    fn test_second_trigger_while_dismissing_ignored() {
        let mut window = shown(PresentationMode::Overlay);
        window.handle(WindowInput::Tap(pos2(5.0, 5.0)));
        assert_eq!(window.phase(), Phase::Dismissing);
        assert_eq!(window.handle(WindowInput::KeyDown(Key::Escape)), Effect::Ignored);
        assert_eq!(window.state().trigger(), Some(DismissTrigger::BackdropTap));
    }

    #[test]
    fn test_refocus_raises() {
        let mut window = shown(PresentationMode::Overlay);
        assert_eq!(window.handle(WindowInput::FocusChanged(true)), Effect::Ignored);
        assert_eq!(window.handle(WindowInput::FocusChanged(false)), Effect::Ignored);
        assert!(!window.state().focused);
        assert_eq!(window.handle(WindowInput::FocusChanged(true)), Effect::Raise);
        assert_eq!(window.phase(), Phase::Shown);
    }

    #[test]
    fn test_page_keys_delivered_after_show() {
        let mut window = PreviewWindow::new(PresentationMode::Overlay);
        let tx = window.page_sender();
        tx.send(PageEvent::KeyDown(Key::Escape)).unwrap();

        window.show();
        assert!(window.page_inputs().is_empty());

        tx.send(PageEvent::KeyDown(Key::Escape)).unwrap();
        let inputs = window.page_inputs();
        assert_eq!(
            inputs,
            vec![
                WindowInput::PageFocusChanged(true),
                WindowInput::KeyDown(Key::Escape)
            ]
        );
        let effects: Vec<Effect> = inputs.into_iter().map(|i| window.handle(i)).collect();
        assert_eq!(
            effects,
            vec![Effect::Ignored, Effect::Dismiss(DismissTrigger::EscapeKey)]
        );
    }

    #[test]
    fn test_listener_follows_key_focus() {
        let mut window = shown(PresentationMode::Overlay);
        assert!(window.is_listening());

        window.handle(WindowInput::FocusChanged(false));
        assert!(!window.is_listening());
        assert_eq!(window.handle(WindowInput::KeyDown(Key::Escape)), Effect::PassThrough);
        assert_eq!(window.phase(), Phase::Shown);

        assert_eq!(window.handle(WindowInput::FocusChanged(true)), Effect::Raise);
        assert!(window.is_listening());
        assert_eq!(
            window.handle(WindowInput::KeyDown(Key::Escape)),
            Effect::Dismiss(DismissTrigger::EscapeKey)
        );
    }

    #[test]
    fn test_page_focus_keeps_window_key() {
        let mut window = shown(PresentationMode::Overlay);
        let tx = window.page_sender();

        // The child page taking focus makes the native window report a loss.
        tx.send(PageEvent::Focus(true)).unwrap();
        let mut inputs = vec![WindowInput::FocusChanged(false)];
        inputs.extend(window.page_inputs());
        for input in inputs {
            window.handle(input);
        }
        assert!(window.is_listening());
        assert!(window.state().focused);

        tx.send(PageEvent::Focus(false)).unwrap();
        for input in window.page_inputs() {
            window.handle(input);
        }
        assert!(!window.is_listening());
        assert!(!window.state().focused);
    }

    #[test]
    fn test_focus_before_show_does_not_arm() {
        let mut window = PreviewWindow::new(PresentationMode::Overlay);
        assert_eq!(window.handle(WindowInput::FocusChanged(true)), Effect::Ignored);
        assert!(!window.is_listening());
    }

    #[test]
    fn test_backdrop_tap_before_show_ignored() {
        let mut window = PreviewWindow::new(PresentationMode::Overlay);
        let area = Rect::from_min_size(Pos2::ZERO, Vec2::new(1920.0, 1080.0));
        window.set_layout(PanelLayout::compute(PresentationMode::Overlay, area));
        assert_eq!(window.handle(WindowInput::Tap(pos2(20.0, 20.0))), Effect::Ignored);
        assert_eq!(window.phase(), Phase::Initializing);
    }

    #[test]
    fn test_finish_requires_dismissal() {
        let mut window = shown(PresentationMode::Standalone);
        assert!(!window.finish_dismissal());
        assert!(window.is_listening());
    }
}
