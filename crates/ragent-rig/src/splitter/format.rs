//! Supported input document formats.

use std::path::Path;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

use crate::{Error, Result};

/// Input formats the chunker can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DocumentFormat {
    /// Portable Document Format.
    Pdf,
    /// Plain UTF-8 text.
    Text,
    /// Markdown, read as plain text.
    Markdown,
}

impl DocumentFormat {
    /// Detects the format from a file extension (case-insensitive).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "txt" | "text" => Some(Self::Text),
            "md" | "markdown" => Some(Self::Markdown),
            _ => None,
        }
    }

    /// Detects the format of a file from its path.
    pub fn from_path(path: &Path) -> Result<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| {
                Error::document(format!("unsupported document type: {}", path.display()))
            })
    }

    /// Reads the document at `path` into plain text.
    pub fn load_text(&self, path: &Path) -> Result<String> {
        match self {
            Self::Pdf => pdf_extract::extract_text(path).map_err(|e| {
                Error::document(format!("failed to extract text from {}: {e}", path.display()))
            }),
            Self::Text | Self::Markdown => std::fs::read_to_string(path).map_err(|e| {
                Error::document(format!("failed to read {}: {e}", path.display()))
            }),
        }
    }
}
