use std::borrow::Cow;
use std::path::Path;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use wry::dpi::{PhysicalPosition, PhysicalSize};
use wry::http::{header, Response, StatusCode};
use wry::raw_window_handle::HasWindowHandle;
use wry::{WebView, WebViewBuilder};

use crate::content_bridge::ContentDescriptor;
use crate::error::{PreviewError, Result};
use crate::template::{self, Placeholder, TemplateValues};
use crate::window::key_monitor::Key;
use crate::window::PageEvent;

pub const BUILTIN_TEMPLATE: &str = include_str!("../assets/preview.html");

/// Scheme the synthesized page is served from. Navigating to it instead of
/// loading an HTML string keeps large payloads clear of WebView2's 2 MB
/// `NavigateToString` cap.
const PAGE_PROTOCOL: &str = "lottie-preview";

const KEY_MESSAGE_PREFIX: &str = "keydown:";
const FOCUS_MESSAGE: &str = "focus";
const BLUR_MESSAGE: &str = "blur";

/// Forwards every key press and focus change in the page to the host.
/// Nothing is prevented.
const KEY_BRIDGE_SCRIPT: &str = r#"
window.addEventListener("keydown", function (event) {
    window.ipc.postMessage("keydown:" + event.key);
}, true);
window.addEventListener("focus", function () {
    window.ipc.postMessage("focus");
});
window.addEventListener("blur", function () {
    window.ipc.postMessage("blur");
});
"#;

/// Fixed inputs of document synthesis besides the content itself.
#[derive(Clone, Debug)]
pub struct SurfaceOptions {
    pub template: String,
    pub renderer_url: String,
    pub title: String,
}

/// Read the template override, falling back to the built-in page.
pub fn resolve_template(path: Option<&Path>) -> String {
    let Some(path) = path else {
        return BUILTIN_TEMPLATE.to_string();
    };
    match read_template(path) {
        Ok(t) => {
            log::info!("Using template {}", path.display());
            t
        }
        Err(e) => {
            log::warn!("{e}; using built-in template");
            BUILTIN_TEMPLATE.to_string()
        }
    }
}

fn read_template(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| PreviewError::Template {
        path: path.to_path_buf(),
        source,
    })
}

/// Self-contained page that decodes the payload and hands it to the renderer.
pub fn document(descriptor: &ContentDescriptor, options: &SurfaceOptions) -> String {
    let values: TemplateValues = [
        (Placeholder::Payload, descriptor.encoded_payload().to_string()),
        (
            Placeholder::PayloadKind,
            descriptor.payload_kind().script_tag().to_string(),
        ),
        (Placeholder::RendererUrl, options.renderer_url.clone()),
        (Placeholder::Title, escape_html(&options.title)),
    ]
    .into_iter()
    .collect();

    template::render(&options.template, &values)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Decode a message posted by the key bridge script.
pub fn parse_page_message(body: &str) -> Option<PageEvent> {
    match body {
        FOCUS_MESSAGE => Some(PageEvent::Focus(true)),
        BLUR_MESSAGE => Some(PageEvent::Focus(false)),
        _ => body
            .strip_prefix(KEY_MESSAGE_PREFIX)
            .filter(|k| !k.is_empty())
            .map(|k| PageEvent::KeyDown(Key::from_dom(k))),
    }
}

/// Queue a page message for the window and wake the UI loop so it is handled
/// without waiting for a native event. Returns false if nothing was queued.
pub fn forward_page_message(body: &str, events: &Sender<PageEvent>, wake: impl FnOnce()) -> bool {
    let Some(event) = parse_page_message(body) else {
        log::warn!("Unrecognised message from page: {body}");
        return false;
    };
    // The receiver is gone once the window is torn down.
    if events.send(event).is_err() {
        return false;
    }
    wake();
    true
}

/// URL under which [`PAGE_PROTOCOL`] is reachable. WebView2 and Android only
/// route custom schemes through `http://<scheme>.localhost`.
pub fn page_url() -> String {
    if cfg!(any(target_os = "windows", target_os = "android")) {
        format!("http://{PAGE_PROTOCOL}.localhost/")
    } else {
        format!("{PAGE_PROTOCOL}://localhost/")
    }
}

/// Answer a request to the page protocol. Only the root is served.
pub fn serve_page(document: &str, path: &str) -> Response<Cow<'static, [u8]>> {
    let response = if matches!(path, "" | "/" | "/index.html") {
        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
            .body(Cow::Owned(document.as_bytes().to_vec()))
    } else {
        log::debug!("No page resource at {path}");
        Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Cow::Borrowed(&[][..]))
    };
    response.unwrap_or_else(|e| {
        log::error!("Failed to build page response: {e}");
        Response::new(Cow::Borrowed(&[][..]))
    })
}

/// Logical rect in egui points to a physical webview rect.
pub fn physical_bounds(rect: egui::Rect, pixels_per_point: f32) -> wry::Rect {
    let x = (rect.min.x * pixels_per_point).round() as i32;
    let y = (rect.min.y * pixels_per_point).round() as i32;
    let w = (rect.width() * pixels_per_point).round().max(0.0) as u32;
    let h = (rect.height() * pixels_per_point).round().max(0.0) as u32;
    wry::Rect {
        position: PhysicalPosition::new(x, y).into(),
        size: PhysicalSize::new(w, h).into(),
    }
}

/// Embedded webview showing one animation.
pub struct RenderSurface {
    webview: WebView,
    descriptor: ContentDescriptor,
    options: SurfaceOptions,
    // Read by the page protocol handler on every load
    page: Arc<Mutex<String>>,
    bounds: egui::Rect,
    pixels_per_point: f32,
}

impl RenderSurface {
    pub fn new<W: HasWindowHandle>(
        parent: &W,
        descriptor: ContentDescriptor,
        options: SurfaceOptions,
        bounds: egui::Rect,
        pixels_per_point: f32,
        events: Sender<PageEvent>,
        repaint: egui::Context,
    ) -> Result<Self> {
        init_toolkit()?;

        let page = Arc::new(Mutex::new(document(&descriptor, &options)));
        let served = Arc::clone(&page);
        let webview = WebViewBuilder::new()
            .with_custom_protocol(PAGE_PROTOCOL.to_string(), move |_id, request| {
                let document = match served.lock() {
                    Ok(d) => d,
                    Err(poisoned) => poisoned.into_inner(),
                };
                serve_page(&document, request.uri().path())
            })
            .with_url(page_url())
            .with_bounds(physical_bounds(bounds, pixels_per_point))
            .with_focused(true)
            .with_initialization_script(KEY_BRIDGE_SCRIPT)
            .with_ipc_handler(move |request: wry::http::Request<String>| {
                forward_page_message(request.body(), &events, || repaint.request_repaint());
            })
            .build_as_child(parent)?;

        log::debug!(
            "Render surface created ({} bytes of payload)",
            descriptor.encoded_payload().len()
        );

        Ok(Self {
            webview,
            descriptor,
            options,
            page,
            bounds,
            pixels_per_point,
        })
    }

    /// Re-synthesize the page from the stored descriptor and load it again.
    pub fn refresh(&mut self) -> Result<()> {
        log::debug!("Refreshing render surface");
        let html = document(&self.descriptor, &self.options);
        match self.page.lock() {
            Ok(mut page) => *page = html,
            Err(poisoned) => *poisoned.into_inner() = html,
        }
        self.webview.load_url(&page_url())?;
        Ok(())
    }

    pub fn set_bounds(&mut self, bounds: egui::Rect, pixels_per_point: f32) -> Result<()> {
        if bounds == self.bounds && pixels_per_point == self.pixels_per_point {
            return Ok(());
        }
        log::debug!("Render surface bounds {:?} @ {}", bounds, pixels_per_point);
        self.webview
            .set_bounds(physical_bounds(bounds, pixels_per_point))?;
        self.bounds = bounds;
        self.pixels_per_point = pixels_per_point;
        Ok(())
    }

    pub fn focus(&self) {
        if let Err(e) = self.webview.focus() {
            log::warn!("Failed to focus render surface: {e}");
        }
    }
}

#[cfg(target_os = "linux")]
fn init_toolkit() -> Result<()> {
    if gtk::is_initialized() {
        return Ok(());
    }
    gtk::init().map_err(|e| PreviewError::RenderSurface(e.to_string()))
}

#[cfg(not(target_os = "linux"))]
fn init_toolkit() -> Result<()> {
    Ok(())
}

/// The GTK webview needs its events dispatched from the winit loop.
#[cfg(target_os = "linux")]
pub fn pump_toolkit_events() {
    if !gtk::is_initialized() {
        return;
    }
    while gtk::events_pending() {
        gtk::main_iteration_do(false);
    }
}

#[cfg(not(target_os = "linux"))]
pub fn pump_toolkit_events() {}
