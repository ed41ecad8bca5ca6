use std::path::{Path, PathBuf};

use crate::error::Result;

/// Extension of the text-based animation format. Anything else is treated as
/// an opaque packaged binary.
pub const STRUCTURED_EXTENSION: &str = ".json";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    Structured,
    Binary,
}

/// Classify a path by case-insensitive suffix match on its file name.
pub fn classify(path: &Path) -> Encoding {
    let name = match path.file_name() {
        Some(n) => n.to_string_lossy().to_lowercase(),
        None => return Encoding::Binary,
    };

    if name.ends_with(STRUCTURED_EXTENSION) {
        Encoding::Structured
    } else {
        Encoding::Binary
    }
}

/// Bytes of the previewed file, read once and never mutated.
pub struct FileContent {
    path: PathBuf,
    bytes: Vec<u8>,
    is_structured: bool,
}

impl FileContent {
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;

        Ok(FileContent {
            path: path.to_path_buf(),
            bytes,
            is_structured: classify(path) == Encoding::Structured,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_structured(&self) -> bool {
        self.is_structured
    }

    pub fn filename(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
    }

    pub fn file_size_display(&self) -> String {
        let size = self.bytes.len();
        if size < 1024 {
            format!("{} B", size)
        } else if size < 1024 * 1024 {
            format!("{:.1} KB", size as f64 / 1024.0)
        } else {
            format!("{:.1} MB", size as f64 / (1024.0 * 1024.0))
        }
    }
}
