use std::path::{Path, PathBuf};

use winit::event_loop::EventLoopBuilder;

use crate::app::PreviewApp;
use crate::config::Config;
use crate::content_bridge::ContentDescriptor;
use crate::error::Result;
use crate::file_loader::FileContent;
use crate::render_surface::{self, SurfaceOptions};
use crate::window::presentation::{ActivationPolicy, PresentationMode};

pub const APP_NAME: &str = "Lottie Preview";

/// What the window starts with, decided before any window exists.
pub struct Launch {
    pub descriptor: ContentDescriptor,
    pub title: String,
    /// Message for a failed load. A missing argument is not reported.
    pub notice: Option<String>,
}

/// Read and bridge the file once. Every failure degrades to empty content.
pub fn prepare(file: Option<&Path>) -> Launch {
    let Some(path) = file else {
        log::info!("No file path provided");
        return Launch {
            descriptor: ContentDescriptor::empty(),
            title: APP_NAME.to_string(),
            notice: None,
        };
    };

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    match FileContent::load(path) {
        Ok(content) => {
            log::info!(
                "File loaded successfully: {} ({}, {})",
                path.display(),
                content.file_size_display(),
                if content.is_structured() { "structured" } else { "binary" }
            );
            Launch {
                descriptor: ContentDescriptor::bridge(Some(&content)),
                title: format!("{} - {}", content.filename(), APP_NAME),
                notice: None,
            }
        }
        Err(e) => {
            log::warn!("Failed to load {}: {}", path.display(), e);
            Launch {
                descriptor: ContentDescriptor::bridge(None),
                title: format!("{} - {}", name, APP_NAME),
                notice: Some(format!("Could not open {}: {}", name, e)),
            }
        }
    }
}

pub fn native_options(mode: PresentationMode, title: &str) -> eframe::NativeOptions {
    let policy = mode.activation_policy();
    eframe::NativeOptions {
        viewport: mode.viewport(title),
        centered: mode.centered(),
        event_loop_builder: Some(Box::new(move |builder| {
            configure_event_loop(builder, policy);
        })),
        ..Default::default()
    }
}

#[allow(unused_variables)]
fn configure_event_loop<T: 'static>(builder: &mut EventLoopBuilder<T>, policy: ActivationPolicy) {
    #[cfg(target_os = "macos")]
    {
        use winit::platform::macos::{ActivationPolicy as MacPolicy, EventLoopBuilderExtMacOS};
        builder.with_activation_policy(match policy {
            ActivationPolicy::Accessory => MacPolicy::Accessory,
            ActivationPolicy::Regular => MacPolicy::Regular,
        });
    }

    // The webview can only be parented to an X11 window.
    #[cfg(target_os = "linux")]
    {
        use winit::platform::x11::EventLoopBuilderExtX11;
        builder.with_x11();
    }
}

/// Run the preview until the window is dismissed.
///
/// Only a failure to open the window itself is returned; everything before
/// it has already been absorbed into empty content.
pub fn run(file: Option<PathBuf>, config: Config) -> Result<()> {
    let launch = prepare(file.as_deref());

    let surface_options = SurfaceOptions {
        template: render_surface::resolve_template(config.template_path.as_deref()),
        renderer_url: config.renderer_url.clone(),
        title: launch.title.clone(),
    };
    let options = native_options(config.mode, &launch.title);
    let mode = config.mode;

    log::info!("Opening {} preview", mode);
    eframe::run_native(
        APP_NAME,
        options,
        Box::new(move |_cc| {
            Ok(Box::new(PreviewApp::new(
                mode,
                launch.descriptor,
                surface_options,
                launch.notice,
            )))
        }),
    )?;

    log::info!("Preview closed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content_bridge::PayloadKind;

    #[test]
    fn test_no_argument_gives_empty_content() {
        let launch = prepare(None);
        assert_eq!(launch.descriptor.encoded_payload(), "");
        assert_eq!(launch.descriptor.payload_kind(), PayloadKind::Structured);
        assert!(launch.notice.is_none());
        assert_eq!(launch.title, APP_NAME);
    }

    #[test]
    fn test_missing_file_gives_empty_content_and_notice() {
        let dir = tempfile::tempdir().unwrap();
        let launch = prepare(Some(&dir.path().join("gone.lottie")));
        assert!(launch.descriptor.is_empty());
        assert_eq!(launch.descriptor, ContentDescriptor::empty());
        let notice = launch.notice.unwrap();
        assert!(notice.starts_with("Could not open gone.lottie"));
    }

    #[test]
    fn test_structured_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Anim.JSON");
        let json = br#"{"v":"5.7.4","fr":30}"#;
        std::fs::write(&path, json).unwrap();

        let launch = prepare(Some(&path));
        assert_eq!(launch.descriptor.payload_kind(), PayloadKind::Structured);
        assert_eq!(launch.descriptor.decoded().unwrap(), json);
        assert_eq!(launch.title, format!("Anim.JSON - {}", APP_NAME));
        assert!(launch.notice.is_none());
    }

    #[test]
    fn test_binary_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("anim.lottie");
        std::fs::write(&path, [0x50, 0x4b, 0x03, 0x04, 0xff]).unwrap();

        let launch = prepare(Some(&path));
        assert_eq!(launch.descriptor.payload_kind(), PayloadKind::Binary);
        assert_eq!(
            launch.descriptor.decoded().unwrap(),
            vec![0x50, 0x4b, 0x03, 0x04, 0xff]
        );
    }

    #[test]
    fn test_native_options_follow_mode() {
        let overlay = native_options(PresentationMode::Overlay, "t");
        assert!(!overlay.centered);
        assert_eq!(overlay.viewport.decorations, Some(false));
        assert!(overlay.event_loop_builder.is_some());

        let standalone = native_options(PresentationMode::Standalone, "t");
        assert!(standalone.centered);
        assert_eq!(standalone.viewport.title.as_deref(), Some("t"));
    }
}
