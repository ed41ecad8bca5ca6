use std::time::{Duration, Instant};

use egui::{Pos2, ViewportCommand, WindowLevel};

use crate::content_bridge::ContentDescriptor;
use crate::render_surface::{self, RenderSurface, SurfaceOptions};
use crate::ui::backdrop;
use crate::ui::notice::{self, Notice};
use crate::ui::shortcuts;
use crate::window::key_monitor::Key;
use crate::window::layout::PanelLayout;
use crate::window::presentation::PresentationMode;
use crate::window::state::{DismissTrigger, Phase};
use crate::window::{Effect, PreviewWindow, WindowInput};

/// GTK has to be pumped from our loop, so keep frames coming on Linux.
const TOOLKIT_PUMP_INTERVAL: Duration = Duration::from_millis(16);

pub struct PreviewApp {
    window: PreviewWindow,

    // Consumed when the render surface is embedded
    pending_content: Option<(ContentDescriptor, SurfaceOptions)>,
    surface: Option<RenderSurface>,
    surface_failed: bool,

    notice: Option<Notice>,
    last_pixels_per_point: f32,
    last_focused: Option<bool>,
    covers_monitor: bool,
}

impl PreviewApp {
    pub fn new(
        mode: PresentationMode,
        descriptor: ContentDescriptor,
        surface_options: SurfaceOptions,
        notice: Option<String>,
    ) -> Self {
        Self {
            window: PreviewWindow::new(mode),
            pending_content: Some((descriptor, surface_options)),
            surface: None,
            surface_failed: false,
            notice: notice.map(Notice::new),
            last_pixels_per_point: 0.0,
            last_focused: None,
            covers_monitor: false,
        }
    }

    fn cover_monitor(&mut self, ctx: &egui::Context) {
        if self.covers_monitor || !self.window.mode().has_backdrop() {
            return;
        }
        if let Some(size) = ctx.input(|i| i.viewport().monitor_size) {
            ctx.send_viewport_cmd(ViewportCommand::OuterPosition(Pos2::ZERO));
            ctx.send_viewport_cmd(ViewportCommand::InnerSize(size));
            self.covers_monitor = true;
        }
    }

    /// Lay out and paint this frame. Returns the layout and a backdrop click, if any.
    fn draw(&self, ctx: &egui::Context) -> (PanelLayout, Option<Pos2>) {
        let mode = self.window.mode();
        let notice = self.notice.as_ref();
        let unavailable = self.surface_failed;

        match mode {
            PresentationMode::Overlay => {
                egui::CentralPanel::default()
                    .frame(egui::Frame::NONE)
                    .show(ctx, |ui| {
                        let layout = PanelLayout::compute(mode, ui.max_rect());
                        let response = backdrop::draw_overlay(ui, &layout);
                        if unavailable {
                            backdrop::draw_unavailable(ui, layout.panel);
                        }
                        if let Some(n) = notice {
                            notice::draw_below_panel(ui, layout.panel, n);
                        }
                        let tap = if response.clicked() {
                            response.interact_pointer_pos()
                        } else {
                            None
                        };
                        (layout, tap)
                    })
                    .inner
            }
            PresentationMode::Standalone => {
                if let Some(n) = notice {
                    egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
                        notice::draw_status_bar(ui, n);
                    });
                }
                egui::CentralPanel::default()
                    .frame(egui::Frame::NONE)
                    .show(ctx, |ui| {
                        let area = backdrop::draw_standalone(ui);
                        let layout = PanelLayout::compute(mode, area);
                        if unavailable {
                            backdrop::draw_unavailable(ui, layout.panel);
                        }
                        (layout, None)
                    })
                    .inner
            }
        }
    }

    /// Per-frame bookkeeping, then paint. Returns the layout and a backdrop click.
    fn present(&mut self, ctx: &egui::Context) -> (PanelLayout, Option<Pos2>) {
        self.cover_monitor(ctx);

        let now = Instant::now();
        if let Some(n) = &self.notice {
            if n.is_expired_at(now) {
                self.notice = None;
            } else {
                ctx.request_repaint_after(n.remaining_at(now));
            }
        }

        let (layout, tap) = self.draw(ctx);
        self.window.set_layout(layout);
        (layout, tap)
    }

    /// Embed the page into the panel. A failure leaves the window usable.
    fn embed(
        &mut self,
        ctx: &egui::Context,
        frame: &eframe::Frame,
        layout: &PanelLayout,
        pixels_per_point: f32,
    ) {
        let Some((descriptor, options)) = self.pending_content.take() else {
            return;
        };
        match RenderSurface::new(
            frame,
            descriptor,
            options,
            layout.panel,
            pixels_per_point,
            self.window.page_sender(),
            ctx.clone(),
        ) {
            Ok(surface) => self.surface = Some(surface),
            Err(e) => {
                log::error!("{e}");
                self.surface_failed = true;
            }
        }
    }

    /// `Initializing -> Shown`: raise and focus the window once.
    fn show(&mut self, ctx: &egui::Context) {
        if self.window.show() {
            self.raise(ctx);
        }
    }

    fn sync_surface(&mut self, layout: &PanelLayout, pixels_per_point: f32) {
        let Some(surface) = self.surface.as_mut() else {
            return;
        };

        if let Err(e) = surface.set_bounds(layout.panel, pixels_per_point) {
            log::warn!("{e}");
        }

        // Moved to a display with a different scale: redraw the page.
        if self.last_pixels_per_point > 0.0 && self.last_pixels_per_point != pixels_per_point {
            if let Err(e) = surface.refresh() {
                log::warn!("{e}");
            }
        }
    }

    fn raise(&self, ctx: &egui::Context) {
        if !self.window.state().visible {
            return;
        }
        if self.window.mode().has_backdrop() {
            ctx.send_viewport_cmd(ViewportCommand::WindowLevel(WindowLevel::AlwaysOnTop));
        }
        ctx.send_viewport_cmd(ViewportCommand::Focus);
        if let Some(surface) = &self.surface {
            surface.focus();
        }
    }

    fn collect_inputs(&mut self, ctx: &egui::Context, tap: Option<Pos2>) -> Vec<WindowInput> {
        let mut inputs = Vec::new();

        if ctx.input(|i| i.viewport().close_requested()) {
            inputs.push(WindowInput::CloseRequested);
        }

        let focused = ctx.input(|i| i.viewport().focused);
        if focused.is_some() && focused != self.last_focused {
            self.last_focused = focused;
            inputs.extend(focused.map(WindowInput::FocusChanged));
        }

        inputs.extend(
            shortcuts::key_presses(ctx)
                .into_iter()
                .map(|k| WindowInput::KeyDown(Key::from_egui(k))),
        );
        inputs.extend(self.window.page_inputs());

        if let Some(pos) = tap {
            inputs.push(WindowInput::Tap(pos));
        }

        inputs
    }

    /// Feed this frame's input to the window and carry out the effects.
    fn process_input(&mut self, ctx: &egui::Context, tap: Option<Pos2>) {
        for input in self.collect_inputs(ctx, tap) {
            match self.window.handle(input) {
                Effect::Dismiss(DismissTrigger::EscapeKey) => shortcuts::consume_escape(ctx),
                Effect::Raise => self.raise(ctx),
                Effect::Dismiss(_) | Effect::PassThrough | Effect::Ignored => {}
            }
        }

        if self.window.phase() == Phase::Dismissing {
            self.terminate(ctx);
        }
    }

    /// `Dismissing -> Terminated`: release the key listener, then close.
    fn terminate(&mut self, ctx: &egui::Context) {
        if self.window.finish_dismissal() {
            log::info!("Terminating preview ({:?})", self.window.state().trigger());
            ctx.send_viewport_cmd(ViewportCommand::Close);
        }
    }
}

impl eframe::App for PreviewApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        render_surface::pump_toolkit_events();
        if cfg!(target_os = "linux") {
            ctx.request_repaint_after(TOOLKIT_PUMP_INTERVAL);
        }

        if self.window.phase() == Phase::Terminated {
            return;
        }

        let pixels_per_point = ctx.pixels_per_point();
        let (layout, tap) = self.present(ctx);

        if self.window.phase() == Phase::Initializing {
            self.embed(ctx, frame, &layout, pixels_per_point);
            self.show(ctx);
        } else {
            self.sync_surface(&layout, pixels_per_point);
        }
        self.last_pixels_per_point = pixels_per_point;

        self.process_input(ctx, tap);
    }

    fn clear_color(&self, visuals: &egui::Visuals) -> [f32; 4] {
        if self.window.mode().has_backdrop() {
            [0.0; 4]
        } else {
            visuals.panel_fill.to_normalized_gamma_f32()
        }
    }
}
