//! The atlas description document written by the rasterizer, and the
//! correction of its vertical metadata.
//!
//! The rasterizer pads every glyph bitmap by half the distance range, adds
//! that padding to the baseline and to each glyph's `yoffset`, and never
//! takes it back out. Left alone, every glyph renders between one and two
//! pads too low. [`AtlasDocument::correct`] removes it.
//!
//! The document is kept as an ordered JSON object so that everything the
//! correction does not touch, key order included, is written back exactly
//! as it was read.

use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

use crate::{FontMetrics, FontgenError};

/// Key under which font metrics are embedded in the atlas document
pub const METRICS_KEY: &str = "lightningMetrics";

/// A BMFont-style JSON atlas description.
///
/// Constructing one checks that `distanceField.distanceRange`,
/// `common.base` and `chars` are present and well typed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AtlasDocument {
    root: Map<String, Value>,
}

/// Glyph tables of an atlas: either one table, or one per font weight
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Chars<'a> {
    Flat(&'a [Value]),
    ByWeight(&'a Map<String, Value>),
}

impl Chars<'_> {
    /// Number of glyph records across all tables
    pub fn len(&self) -> usize {
        match self {
            Chars::Flat(glyphs) => glyphs.len(),
            Chars::ByWeight(tables) => tables
                .values()
                .filter_map(Value::as_array)
                .map(Vec::len)
                .sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The amount the rasterizer pads each glyph by, for a given distance range
pub fn pad(distance_range: u32) -> i64 {
    (distance_range >> 1) as i64
}

fn data_error(msg: impl Into<String>) -> FontgenError {
    FontgenError::Data(msg.into())
}

/// Subtract `amount` from a JSON number. Integers stay integers; fractional
/// results keep their fraction.
fn subtract(number: &Number, amount: i64) -> Result<Number, FontgenError> {
    if let Some(value) = number.as_i64() {
        if let Some(result) = value.checked_sub(amount) {
            return Ok(Number::from(result));
        }
    }
    let value = number
        .as_f64()
        .ok_or_else(|| data_error(format!("{} is not a finite number", number)))?;
    let result = value - amount as f64;
    if result.fract() == 0.0 && result.abs() < i64::MAX as f64 {
        return Ok(Number::from(result as i64));
    }
    Number::from_f64(result).ok_or_else(|| data_error(format!("{} is not finite", result)))
}

fn glyph_yoffset(glyph: &Value) -> Result<&Number, FontgenError> {
    match glyph.get("yoffset") {
        Some(Value::Number(n)) => Ok(n),
        Some(_) => Err(data_error("glyph yoffset is not a number")),
        None => Err(data_error("glyph record has no yoffset")),
    }
}

impl TryFrom<Map<String, Value>> for AtlasDocument {
    type Error = FontgenError;

    fn try_from(root: Map<String, Value>) -> Result<Self, Self::Error> {
        let document = AtlasDocument { root };
        document.distance_range()?;
        document.base()?;
        match document.chars()? {
            Chars::Flat(glyphs) => {
                for glyph in glyphs {
                    glyph_yoffset(glyph)?;
                }
            }
            Chars::ByWeight(tables) => {
                for (weight, table) in tables {
                    let glyphs = table.as_array().ok_or_else(|| {
                        data_error(format!("chars.{} is not a glyph table", weight))
                    })?;
                    for glyph in glyphs {
                        glyph_yoffset(glyph)?;
                    }
                }
            }
        }
        Ok(document)
    }
}

impl TryFrom<Value> for AtlasDocument {
    type Error = FontgenError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(root) => root.try_into(),
            _ => Err(data_error("atlas document is not a JSON object")),
        }
    }
}

impl<'de> Deserialize<'de> for AtlasDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let root = Map::deserialize(deserializer)?;
        AtlasDocument::try_from(root).map_err(serde::de::Error::custom)
    }
}

impl AtlasDocument {
    /// Parse a document as the rasterizer writes it.
    ///
    /// Missing or mistyped `distanceField.distanceRange`, `common.base` or
    /// `chars` give a [`FontgenError::Data`].
    pub fn from_json(json: &str) -> Result<Self, FontgenError> {
        let value: Value = serde_json::from_str(json)?;
        value.try_into()
    }

    /// Load a document from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FontgenError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&contents)
    }

    pub fn to_json(&self) -> Result<String, FontgenError> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), FontgenError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// The whole document, in its original key order
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    pub(crate) fn as_map_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.root
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }

    fn section(&self, name: &str) -> Result<&Map<String, Value>, FontgenError> {
        self.root
            .get(name)
            .ok_or_else(|| data_error(format!("missing {}", name)))?
            .as_object()
            .ok_or_else(|| data_error(format!("{} is not an object", name)))
    }

    pub fn distance_range(&self) -> Result<u32, FontgenError> {
        let range = self
            .section("distanceField")?
            .get("distanceRange")
            .ok_or_else(|| data_error("missing distanceField.distanceRange"))?;
        range
            .as_u64()
            .and_then(|r| u32::try_from(r).ok())
            .ok_or_else(|| {
                data_error(format!(
                    "distanceField.distanceRange {} is not a distance",
                    range
                ))
            })
    }

    pub fn pad(&self) -> Result<i64, FontgenError> {
        Ok(pad(self.distance_range()?))
    }

    /// Baseline offset in pixels
    pub fn base(&self) -> Result<&Number, FontgenError> {
        match self.section("common")?.get("base") {
            Some(Value::Number(n)) => Ok(n),
            Some(_) => Err(data_error("common.base is not a number")),
            None => Err(data_error("missing common.base")),
        }
    }

    pub fn chars(&self) -> Result<Chars<'_>, FontgenError> {
        match self.root.get("chars") {
            Some(Value::Array(glyphs)) => Ok(Chars::Flat(glyphs)),
            Some(Value::Object(tables)) => Ok(Chars::ByWeight(tables)),
            Some(_) => Err(data_error("chars is neither a glyph table nor keyed by weight")),
            None => Err(data_error("missing chars")),
        }
    }

    pub fn face(&self) -> Option<&str> {
        self.root.get("info")?.get("face")?.as_str()
    }

    pub fn metrics(&self) -> Option<&Value> {
        self.root.get(METRICS_KEY)
    }

    /// Remove the distance field padding from the baseline and from every
    /// glyph's `yoffset`, and embed the font metrics if there are any.
    ///
    /// This is a one-shot transform: correcting a document twice subtracts
    /// the padding twice. Documents whose glyph tables are already keyed by
    /// weight are rejected, since their tables were corrected before being
    /// merged. Nothing is changed when an error is returned.
    pub fn correct(&mut self, metrics: Option<FontMetrics>) -> Result<(), FontgenError> {
        let pad = self.pad()?;
        let Chars::Flat(glyphs) = self.chars()? else {
            return Err(FontgenError::AlreadyMerged);
        };
        log::debug!(
            "Removing pad of {} from baseline and {} from {} glyph offsets",
            pad,
            2 * pad,
            glyphs.len()
        );

        let base = subtract(self.base()?, pad)?;
        let yoffsets = glyphs
            .iter()
            .map(|glyph| subtract(glyph_yoffset(glyph)?, 2 * pad))
            .collect::<Result<Vec<_>, _>>()?;
        let metrics = metrics.map(serde_json::to_value).transpose()?;

        if let Some(Value::Object(common)) = self.root.get_mut("common") {
            common.insert("base".to_string(), Value::Number(base));
        }
        if let Some(Value::Array(glyphs)) = self.root.get_mut("chars") {
            for (glyph, yoffset) in glyphs.iter_mut().zip(yoffsets) {
                if let Value::Object(glyph) = glyph {
                    glyph.insert("yoffset".to_string(), Value::Number(yoffset));
                }
            }
        }
        if let Some(metrics) = metrics {
            self.root.insert(METRICS_KEY.to_string(), metrics);
        }
        Ok(())
    }
}
