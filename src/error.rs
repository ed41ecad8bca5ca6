use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PreviewError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read template {}: {source}", .path.display())]
    Template {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create render surface: {0}")]
    RenderSurface(String),

    #[error("Failed to open preview window: {0}")]
    Window(String),
}

impl From<wry::Error> for PreviewError {
    fn from(e: wry::Error) -> Self {
        PreviewError::RenderSurface(e.to_string())
    }
}

impl From<eframe::Error> for PreviewError {
    fn from(e: eframe::Error) -> Self {
        PreviewError::Window(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PreviewError>;
