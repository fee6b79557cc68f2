/// Weight names a font file of a shared atlas is expected to carry
pub const KNOWN_WEIGHTS: [&str; 9] = [
    "Thin",
    "ExtraLight",
    "Light",
    "Regular",
    "Medium",
    "SemiBold",
    "Bold",
    "ExtraBold",
    "Black",
];

/// The key a font weight's glyph table is stored under in a merged atlas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeightKey {
    /// The weight as written in the file name
    pub name: String,
    /// Lower-cased weight, used as the key in the merged document
    pub key: String,
}

impl WeightKey {
    /// Derive the weight from a font's base name, for font files named
    /// `<face_name>-<weight>.<ext>`.
    ///
    /// If the base name does not start with `<face_name>-`, or nothing
    /// follows it, the whole base name is the weight.
    pub fn from_font_name(base_name: &str, face_name: &str) -> Self {
        let name = base_name
            .strip_prefix(face_name)
            .and_then(|rest| rest.strip_prefix('-'))
            .and_then(|rest| rest.split('-').next())
            .filter(|weight| !weight.is_empty())
            .unwrap_or(base_name);
        WeightKey {
            name: name.to_string(),
            key: name.to_lowercase(),
        }
    }

    pub fn is_known(&self) -> bool {
        KNOWN_WEIGHTS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(&self.name))
    }

    /// Log a warning if the weight is not one of [`KNOWN_WEIGHTS`]
    pub fn warn_if_unknown(&self, face_name: &str) {
        if !self.is_known() {
            log::warn!(
                "{} does not follow the format [fontFaceName]-[fontWeight].[ext], or the face name '{}' is wrong; the font may not work correctly",
                self.name,
                face_name
            );
        }
    }
}

/// The part of a font file name before its first `.`
pub fn base_name(file_name: &str) -> &str {
    file_name.split('.').next().unwrap_or(file_name)
}
