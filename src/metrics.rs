use std::path::{Path, PathBuf};

use read_fonts::{FileRef, FontRef, TableProvider as _};
use serde::{Deserialize, Serialize};

use crate::FontgenError;

/// Subdirectory of the destination directory holding the metrics documents
pub const METRICS_SUBDIR: &str = "metrics";

/// Vertical font metrics, in font units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontMetrics {
    /// OS/2 `sTypoAscender`
    pub ascender: i16,
    /// OS/2 `sTypoDescender`
    pub descender: i16,
    /// OS/2 `sTypoLineGap`
    pub line_gap: i16,
    /// head `unitsPerEm`
    pub units_per_em: u16,
}

impl FontMetrics {
    /// Read metrics from the font file at `path`
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FontgenError> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        Self::from_data(&data, path)
    }

    /// Read metrics from an in-memory font. `path` is used for error reporting.
    ///
    /// For font collections, the first font is used.
    pub fn from_data(data: &[u8], path: &Path) -> Result<Self, FontgenError> {
        if let Some(container) = compressed_container(data) {
            return Err(FontgenError::UnsupportedContainer {
                path: path.to_path_buf(),
                container,
            });
        }
        let parse_error = |e: read_fonts::ReadError| FontgenError::FontParse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };
        let font: FontRef = match FileRef::new(data).map_err(parse_error)? {
            FileRef::Font(font) => font,
            FileRef::Collection(collection) => collection.get(0).map_err(parse_error)?,
        };
        let os2 = font.os2().map_err(parse_error)?;
        let head = font.head().map_err(parse_error)?;
        Ok(FontMetrics {
            ascender: os2.s_typo_ascender(),
            descender: os2.s_typo_descender(),
            line_gap: os2.s_typo_line_gap(),
            units_per_em: head.units_per_em(),
        })
    }

    /// Location of the metrics document for the font called `font_name`
    pub fn document_path(dst_dir: &Path, font_name: &str) -> PathBuf {
        dst_dir
            .join(METRICS_SUBDIR)
            .join(format!("{}.metrics.json", font_name))
    }

    /// Write the metrics-only document, creating its directory if needed
    pub fn save(&self, path: &Path) -> Result<(), FontgenError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

fn compressed_container(data: &[u8]) -> Option<&'static str> {
    match data.get(0..4) {
        Some(b"wOFF") => Some("WOFF"),
        Some(b"wOF2") => Some("WOFF2"),
        _ => None,
    }
}
