//! Merging several weights of one face into a shared atlas document.
//!
//! A merged document is a regular [`AtlasDocument`] in which each
//! per-weight field (`chars`, `kernings` and the embedded metrics) maps the
//! lower-cased weight key to that weight's own value. The texture the
//! weights share grows with every weight packed into it, so its size and
//! page list follow the latest weight. All other fields come from whichever
//! weight seeded the document.

use std::path::Path;

use serde_json::{Map, Value};

use crate::{
    atlas::{AtlasDocument, Chars, METRICS_KEY},
    FontgenError, WeightKey,
};

/// Fields holding one value per weight in a merged document
pub const PER_WEIGHT_FIELDS: [&str; 3] = ["chars", "kernings", METRICS_KEY];

/// Members of `common` describing the shared texture
const TEXTURE_FIELDS: [&str; 3] = ["scaleW", "scaleH", "pages"];

/// What a merge applies to
#[derive(Debug, Clone, PartialEq)]
pub enum MergeTarget {
    /// No document exists yet; the incoming weight seeds it
    Create,
    /// An existing merged document to add the incoming weight to
    Update(AtlasDocument),
}

impl MergeTarget {
    /// Load the merge target at `path`.
    ///
    /// An existing file that is not valid JSON aborts the merge with
    /// [`FontgenError::UnparsableDocument`] before anything is written.
    pub fn load(path: &Path) -> Result<Self, FontgenError> {
        if !path.exists() {
            log::debug!("No atlas at {}, will create it", path.display());
            return Ok(MergeTarget::Create);
        }
        let contents = std::fs::read_to_string(path)?;
        let value: Value =
            serde_json::from_str(&contents).map_err(|source| FontgenError::UnparsableDocument {
                path: path.to_path_buf(),
                source,
            })?;
        let document = AtlasDocument::try_from(value)?;
        if !matches!(document.chars()?, Chars::ByWeight(_)) {
            return Err(FontgenError::Data(format!(
                "{} exists but its glyph tables are not keyed by weight",
                path.display()
            )));
        }
        Ok(MergeTarget::Update(document))
    }
}

/// Merge `incoming`, the corrected document of a single weight, into
/// `target`.
///
/// When creating, `incoming` becomes the document, with each per-weight
/// field moved under `weight.key` and `info.face` set to `face_name`. When
/// updating, the entries for `weight.key` are inserted or replaced and the
/// shared texture fields are taken from `incoming`.
pub fn merge(
    target: MergeTarget,
    weight: &WeightKey,
    incoming: AtlasDocument,
    face_name: &str,
) -> Result<AtlasDocument, FontgenError> {
    if !matches!(incoming.chars()?, Chars::Flat(_)) {
        return Err(FontgenError::AlreadyMerged);
    }
    match target {
        MergeTarget::Create => {
            log::info!("Creating atlas {} with weight '{}'", face_name, weight.key);
            let mut document = incoming;
            let root = document.as_map_mut();
            for field in PER_WEIGHT_FIELDS {
                if let Some(value) = root.get_mut(field) {
                    let own = value.take();
                    *value = Value::Object(Map::from_iter([(weight.key.clone(), own)]));
                }
            }
            set_face(root, face_name);
            Ok(document)
        }
        MergeTarget::Update(mut existing) => {
            let mut incoming = incoming.into_value();
            let root = existing.as_map_mut();
            let mut replaced = false;
            for field in PER_WEIGHT_FIELDS {
                let Some(own) = incoming.get_mut(field).map(Value::take) else {
                    continue;
                };
                let Value::Object(by_weight) = root
                    .entry(field)
                    .or_insert_with(|| Value::Object(Map::new()))
                else {
                    return Err(FontgenError::Data(format!(
                        "{} in the merge target is not keyed by weight",
                        field
                    )));
                };
                replaced |= by_weight.insert(weight.key.clone(), own).is_some();
            }
            take_texture_fields(root, &mut incoming);
            if replaced {
                log::info!("Replacing weight '{}' in atlas {}", weight.key, face_name);
            } else {
                log::info!("Adding weight '{}' to atlas {}", weight.key, face_name);
            }
            Ok(existing)
        }
    }
}

fn set_face(root: &mut Map<String, Value>, face_name: &str) {
    let info = root
        .entry("info")
        .or_insert_with(|| Value::Object(Map::new()));
    if let Value::Object(info) = info {
        info.insert("face".to_string(), Value::String(face_name.to_string()));
    }
}

fn take_texture_fields(root: &mut Map<String, Value>, incoming: &mut Value) {
    if let Some(pages) = incoming.get_mut("pages").map(Value::take) {
        root.insert("pages".to_string(), pages);
    }
    let (Some(Value::Object(common)), Some(Value::Object(latest))) =
        (root.get_mut("common"), incoming.get_mut("common"))
    else {
        return;
    };
    for field in TEXTURE_FIELDS {
        if let Some(value) = latest.remove(field) {
            common.insert(field.to_string(), value);
        }
    }
}
