use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::FontgenError;

/// Kind of distance field to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Single-channel signed distance field
    Sdf,
    /// "Soft" single-channel SDF; rasterized as plain SDF
    Ssdf,
    /// Multi-channel signed distance field
    Msdf,
    /// Multi-channel SDF with the true distance in the alpha channel
    Mtsdf,
}

impl FieldType {
    pub const ALL: [FieldType; 4] = [
        FieldType::Sdf,
        FieldType::Ssdf,
        FieldType::Msdf,
        FieldType::Mtsdf,
    ];

    /// The name used in output file names and `overrides.json`
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Sdf => "sdf",
            FieldType::Ssdf => "ssdf",
            FieldType::Msdf => "msdf",
            FieldType::Mtsdf => "mtsdf",
        }
    }

    /// The `fieldType` option passed to the rasterizer
    pub fn rasterizer_field_type(&self) -> &'static str {
        match self {
            FieldType::Sdf | FieldType::Ssdf => "sdf",
            FieldType::Msdf => "msdf",
            FieldType::Mtsdf => "mtsdf",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = FontgenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|ft| ft.as_str() == s)
            .ok_or_else(|| FontgenError::UnsupportedFieldType(s.to_string()))
    }
}
