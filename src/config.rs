use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::{FieldType, FontgenError};

pub const DEFAULT_FONT_SIZE: u32 = 42;
pub const DEFAULT_DISTANCE_RANGE: u32 = 4;
/// Name of the shared atlas when none is given
pub const DEFAULT_FACE_NAME: &str = "atlas";

const OVERRIDES_FILE: &str = "overrides.json";
const CHARSET_FILE: &str = "charset.txt";

/// Whether each font gets its own atlas, or all fonts share one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtlasMode {
    /// One atlas per font file, named after the file
    PerFont,
    /// All fonts, expected to be named `<face_name>-<weight>.<ext>`, are
    /// merged into one atlas named after the face
    Single { face_name: String },
}

/// Everything a generation run needs to know
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateConfig {
    pub src_dir: PathBuf,
    pub dst_dir: PathBuf,
    pub field_types: Vec<FieldType>,
    pub atlas: AtlasMode,
    /// Read font metrics and write them alongside each atlas
    pub extract_metrics: bool,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        GenerateConfig {
            src_dir: PathBuf::from("font-src"),
            dst_dir: PathBuf::from("font-dst"),
            field_types: vec![FieldType::Mtsdf],
            atlas: AtlasMode::PerFont,
            extract_metrics: true,
        }
    }
}

impl GenerateConfig {
    pub fn new(src_dir: impl Into<PathBuf>, dst_dir: impl Into<PathBuf>) -> Self {
        GenerateConfig {
            src_dir: src_dir.into(),
            dst_dir: dst_dir.into(),
            ..Default::default()
        }
    }

    pub fn overrides_path(&self) -> PathBuf {
        self.src_dir.join(OVERRIDES_FILE)
    }

    pub fn charset_path(&self) -> PathBuf {
        self.src_dir.join(CHARSET_FILE)
    }

    /// The charset file, if the source directory has one
    pub fn charset(&self) -> Option<PathBuf> {
        let path = self.charset_path();
        path.exists().then_some(path)
    }

    pub fn face_name(&self) -> Option<&str> {
        match &self.atlas {
            AtlasMode::PerFont => None,
            AtlasMode::Single { face_name } => Some(face_name),
        }
    }

    /// The name of the atlas a font with the given base name goes into
    pub fn atlas_name<'a>(&'a self, base_name: &'a str) -> &'a str {
        self.face_name().unwrap_or(base_name)
    }

    /// `<dst>/<name>.<field type>.<ext>`
    pub fn output_path(&self, name: &str, field_type: FieldType, ext: &str) -> PathBuf {
        self.dst_dir.join(format!("{}.{}.{}", name, field_type, ext))
    }
}

/// Per-font, per-field-type size settings from `overrides.json`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOverride {
    #[serde(default)]
    pub font_size: Option<u32>,
    #[serde(default)]
    pub distance_range: Option<u32>,
}

type RawOverrides = IndexMap<String, IndexMap<String, FieldOverride>>;

/// Contents of `overrides.json`, keyed by atlas name then field type
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawOverrides")]
pub struct Overrides(IndexMap<String, HashMap<FieldType, FieldOverride>>);

impl From<RawOverrides> for Overrides {
    fn from(raw: RawOverrides) -> Self {
        let by_name = raw
            .into_iter()
            .map(|(name, by_type)| {
                let by_type = by_type
                    .into_iter()
                    .filter_map(|(field_type, value)| match field_type.parse::<FieldType>() {
                        Ok(field_type) => Some((field_type, value)),
                        Err(e) => {
                            log::warn!("Ignoring overrides for {}: {}", name, e);
                            None
                        }
                    })
                    .collect();
                (name, by_type)
            })
            .collect();
        Overrides(by_name)
    }
}

impl Overrides {
    /// Load overrides from `path`; a missing file means no overrides
    pub fn load(path: &Path) -> Result<Self, FontgenError> {
        if !path.exists() {
            return Ok(Overrides::default());
        }
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|source| FontgenError::Overrides {
            path: path.to_path_buf(),
            source,
        })
    }

    fn get(&self, name: &str, field_type: FieldType) -> FieldOverride {
        self.0
            .get(name)
            .and_then(|by_type| by_type.get(&field_type))
            .copied()
            .unwrap_or_default()
    }

    /// Font size for an atlas; zero counts as unset
    pub fn font_size(&self, name: &str, field_type: FieldType) -> u32 {
        self.get(name, field_type)
            .font_size
            .filter(|&size| size != 0)
            .unwrap_or(DEFAULT_FONT_SIZE)
    }

    /// Distance range for an atlas; zero counts as unset
    pub fn distance_range(&self, name: &str, field_type: FieldType) -> u32 {
        self.get(name, field_type)
            .distance_range
            .filter(|&range| range != 0)
            .unwrap_or(DEFAULT_DISTANCE_RANGE)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_paths() {
        let config = GenerateConfig::new("in", "out");
        assert_eq!(config.overrides_path(), Path::new("in/overrides.json"));
        assert_eq!(config.charset_path(), Path::new("in/charset.txt"));
        assert_eq!(
            config.output_path("Inter-Bold", FieldType::Msdf, "json"),
            Path::new("out/Inter-Bold.msdf.json")
        );
        assert_eq!(config.atlas_name("Inter-Bold"), "Inter-Bold");

        let single = GenerateConfig {
            atlas: AtlasMode::Single {
                face_name: "Inter".to_string(),
            },
            ..config
        };
        assert_eq!(single.atlas_name("Inter-Bold"), "Inter");
    }

    #[test]
    fn test_overrides() {
        let overrides: Overrides = serde_json::from_str(
            r#"{
                "Inter": {
                    "msdf": {"fontSize": 64, "distanceRange": 8},
                    "ssdf": {"fontSize": 0}
                }
            }"#,
        )
        .unwrap();
        assert_eq!(overrides.font_size("Inter", FieldType::Msdf), 64);
        assert_eq!(overrides.distance_range("Inter", FieldType::Msdf), 8);
        assert_eq!(overrides.font_size("Inter", FieldType::Ssdf), 42);
        assert_eq!(overrides.distance_range("Inter", FieldType::Ssdf), 4);
        assert_eq!(overrides.font_size("Inter", FieldType::Mtsdf), 42);
        assert_eq!(overrides.distance_range("Roboto", FieldType::Msdf), 4);
    }

    #[test]
    fn test_missing_overrides_file() {
        let dir = tempfile::tempdir().unwrap();
        let overrides = Overrides::load(&dir.path().join("overrides.json")).unwrap();
        assert_eq!(overrides, Overrides::default());
    }

    #[test]
    fn test_unknown_field_type_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overrides.json");
        std::fs::write(
            &path,
            r#"{"Inter": {"psdf": {"fontSize": 12}, "msdf": {"fontSize": 64}}}"#,
        )
        .unwrap();
        let overrides = Overrides::load(&path).unwrap();
        assert_eq!(overrides.font_size("Inter", FieldType::Msdf), 64);
        assert_eq!(overrides.font_size("Inter", FieldType::Sdf), 42);
        assert_eq!(overrides.0["Inter"].len(), 1);
    }

    #[test]
    fn test_malformed_overrides_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overrides.json");
        std::fs::write(&path, r#"{"Inter": {"msdf": {"fontSize": "big"}}}"#).unwrap();
        let err = Overrides::load(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
