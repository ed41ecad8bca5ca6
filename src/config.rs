use std::path::{Path, PathBuf};

use config::Environment;
use serde::Deserialize;

use crate::window::presentation::PresentationMode;

const ENV_PREFIX: &str = "LOTTIE_PREVIEW";

pub const MODE_VAR: &str = "LOTTIE_PREVIEW_MODE";
pub const RENDERER_URL_VAR: &str = "LOTTIE_PREVIEW_RENDERER_URL";
pub const TEMPLATE_VAR: &str = "LOTTIE_PREVIEW_TEMPLATE";

pub const DEFAULT_RENDERER_URL: &str =
    "https://cdn.jsdelivr.net/npm/@lottiefiles/dotlottie-web@0.28.0/+esm";

/// Template file picked up from the executable's directory when present.
pub const SIDECAR_TEMPLATE: &str = "preview.html";

/// Static startup configuration. Read once, never changed afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub mode: PresentationMode,
    pub renderer_url: String,
    pub template_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: PresentationMode::default(),
            renderer_url: DEFAULT_RENDERER_URL.to_string(),
            template_path: None,
        }
    }
}

/// `LOTTIE_PREVIEW_*` variables as the environment source sees them, before
/// validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    mode: Option<String>,
    renderer_url: Option<String>,
    template: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let mut config = Self::from_environment(Environment::with_prefix(ENV_PREFIX));
        if config.template_path.is_none() {
            config.template_path = sidecar_template();
        }
        config
    }

    /// Build from an environment source. Invalid values are logged and left
    /// at their defaults.
    pub fn from_environment(environment: Environment) -> Self {
        let raw = ::config::Config::builder()
            .add_source(environment)
            .build()
            .and_then(|c| c.try_deserialize::<RawConfig>())
            .unwrap_or_else(|e| {
                log::warn!("Ignoring environment configuration: {e}");
                RawConfig::default()
            });
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawConfig) -> Self {
        let mut config = Config::default();

        if let Some(value) = raw.mode {
            match value.parse::<PresentationMode>() {
                Ok(mode) => config.mode = mode,
                Err(e) => log::warn!("Ignoring {MODE_VAR}: {e}"),
            }
        }

        if let Some(url) = raw.renderer_url {
            let url = url.trim();
            if url.is_empty() {
                log::warn!("Ignoring empty {RENDERER_URL_VAR}");
            } else {
                config.renderer_url = url.to_string();
            }
        }

        config.template_path = raw
            .template
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        config
    }
}

fn sidecar_template() -> Option<PathBuf> {
    let exe = std::env::current_exe().ok()?;
    sidecar_in(exe.parent()?)
}

fn sidecar_in(dir: &Path) -> Option<PathBuf> {
    let candidate = dir.join(SIDECAR_TEMPLATE);
    candidate.is_file().then_some(candidate)
}
