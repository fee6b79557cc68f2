use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Broad classification of a [`FontgenError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or incomplete atlas or metrics data
    Data,
    /// Missing files, unparsable existing output, external tool failures
    Io,
    /// Unsupported or malformed configuration
    Config,
}

#[derive(Debug, Error)]
pub enum FontgenError {
    #[error("IO Error: {0}")]
    IO(#[from] io::Error),

    #[error("Font source directory {path:?} not found")]
    NoSourceDir { path: PathBuf },

    #[error("No font files found in {path:?}")]
    NoFontsFound { path: PathBuf },

    #[error("Atlas document {path:?} is not valid JSON: {source}")]
    UnparsableDocument {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Malformed atlas data: {0}")]
    Data(String),

    #[error("Atlas document is already merged by weight; correct each weight before merging")]
    AlreadyMerged,

    #[error("Could not parse font {path:?}: {reason}")]
    FontParse { path: PathBuf, reason: String },

    #[error("Font {path:?} is a {container} file; metrics can only be read from TTF/OTF")]
    UnsupportedContainer {
        path: PathBuf,
        container: &'static str,
    },

    #[error("Rasterizer failed on {path:?}: {reason}")]
    Rasterizer { path: PathBuf, reason: String },

    #[error("Unsupported field type {0:?} (expected one of sdf, ssdf, msdf, mtsdf)")]
    UnsupportedFieldType(String),

    #[error("Error reading overrides {path:?}: {source}")]
    Overrides {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl FontgenError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FontgenError::Data(_) | FontgenError::AlreadyMerged => ErrorKind::Data,
            FontgenError::UnsupportedFieldType(_) | FontgenError::Overrides { .. } => {
                ErrorKind::Config
            }
            FontgenError::IO(_)
            | FontgenError::NoSourceDir { .. }
            | FontgenError::NoFontsFound { .. }
            | FontgenError::UnparsableDocument { .. }
            | FontgenError::FontParse { .. }
            | FontgenError::UnsupportedContainer { .. }
            | FontgenError::Rasterizer { .. } => ErrorKind::Io,
        }
    }
}

impl From<serde_json::Error> for FontgenError {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            serde_json::error::Category::Io => {
                FontgenError::IO(io::Error::new(io::ErrorKind::Other, err))
            }
            _ => FontgenError::Data(err.to_string()),
        }
    }
}
