use std::path::PathBuf;

use crate::{
    atlas::AtlasDocument,
    config::{GenerateConfig, Overrides},
    merge::{merge, MergeTarget},
    rasterizer::{RasterJob, Rasterizer},
    weight::{base_name, WeightKey},
    FieldType, FontMetrics, FontgenError,
};

/// File name endings of the fonts picked up from the source directory
pub const FONT_EXTENSIONS: [&str; 4] = [".ttf", ".otf", ".woff", ".woff2"];

/// What was produced for one font and field type
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFont {
    /// Name of the atlas the font went into
    pub font_name: String,
    pub field_type: FieldType,
    pub font_path: PathBuf,
    pub json_path: PathBuf,
    pub png_path: PathBuf,
    /// Set when the font was merged into a shared atlas
    pub weight: Option<WeightKey>,
    pub metrics: Option<FontMetrics>,
    pub metrics_path: Option<PathBuf>,
}

/// Drives the rasterizer over a source directory
pub struct Generator<'a> {
    config: &'a GenerateConfig,
    rasterizer: &'a dyn Rasterizer,
    overrides: Overrides,
}

impl<'a> Generator<'a> {
    pub fn new(
        config: &'a GenerateConfig,
        rasterizer: &'a dyn Rasterizer,
    ) -> Result<Self, FontgenError> {
        let overrides = Overrides::load(&config.overrides_path())?;
        Ok(Generator {
            config,
            rasterizer,
            overrides,
        })
    }

    /// Font files in the source directory, sorted by name
    pub fn font_files(&self) -> Result<Vec<String>, FontgenError> {
        let src_dir = &self.config.src_dir;
        if !src_dir.is_dir() {
            return Err(FontgenError::NoSourceDir {
                path: src_dir.clone(),
            });
        }
        let mut files = vec![];
        for entry in std::fs::read_dir(src_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                log::warn!("Skipping non-UTF-8 file name {:?}", entry.file_name());
                continue;
            };
            if FONT_EXTENSIONS.iter().any(|ext| name.ends_with(ext)) {
                files.push(name);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Generate every configured field type for every font in the source
    /// directory. The first failure aborts the run.
    pub fn run(&self) -> Result<Vec<GeneratedFont>, FontgenError> {
        let files = self.font_files()?;
        if files.is_empty() {
            return Err(FontgenError::NoFontsFound {
                path: self.config.src_dir.clone(),
            });
        }
        std::fs::create_dir_all(&self.config.dst_dir)?;

        let mut generated = vec![];
        for file in files.iter() {
            for field_type in self.config.field_types.iter() {
                generated.push(self.generate_font(file, *field_type)?);
            }
        }
        Ok(generated)
    }

    /// Rasterize one font, correct its atlas description and, in single
    /// atlas mode, merge it into the shared atlas.
    pub fn generate_font(
        &self,
        file_name: &str,
        field_type: FieldType,
    ) -> Result<GeneratedFont, FontgenError> {
        let config = self.config;
        log::info!("Generating {} font from {}", field_type, file_name);

        let font_path = config.src_dir.join(file_name);
        let base = base_name(file_name);
        let name = config.atlas_name(base);
        let json_path = config.output_path(name, field_type, "json");

        let mut job = RasterJob::new(
            font_path.clone(),
            field_type,
            config.dst_dir.join(format!("{}.{}", name, field_type)),
        );
        job.font_size = self.overrides.font_size(name, field_type);
        job.distance_range = self.overrides.distance_range(name, field_type);
        job.charset = config.charset();

        // The shared atlas must be read before the rasterizer overwrites it
        let merging = match config.face_name() {
            Some(face_name) => {
                job.reuse = Some(config.output_path(name, field_type, "cfg"));
                let weight = WeightKey::from_font_name(base, face_name);
                weight.warn_if_unknown(face_name);
                Some((face_name, weight, MergeTarget::load(&json_path)?))
            }
            None => None,
        };
        log::debug!("{:?}", job);

        let output = self.rasterizer.rasterize(&job)?;
        let mut document = AtlasDocument::from_json(&output.json)?;

        let metrics = if config.extract_metrics {
            Some(FontMetrics::from_path(&font_path)?)
        } else {
            None
        };

        log::info!("Adjusting {}", json_path.display());
        document.correct(metrics)?;

        let (document, weight) = match merging {
            Some((face_name, weight, target)) => {
                (merge(target, &weight, document, face_name)?, Some(weight))
            }
            None => (document, None),
        };

        let metrics_path = metrics.map(|_| FontMetrics::document_path(&config.dst_dir, base));
        let (atlas_written, metrics_written) = rayon::join(
            || document.save(&json_path),
            || match (&metrics, &metrics_path) {
                (Some(metrics), Some(path)) => metrics.save(path),
                _ => Ok(()),
            },
        );
        atlas_written?;
        metrics_written?;

        Ok(GeneratedFont {
            font_name: name.to_string(),
            field_type,
            font_path,
            json_path,
            png_path: job.png_path(),
            weight,
            metrics,
            metrics_path,
        })
    }
}

/// Generate atlases for every font in `config.src_dir`
pub fn generate_fonts(
    config: &GenerateConfig,
    rasterizer: &dyn Rasterizer,
) -> Result<Vec<GeneratedFont>, FontgenError> {
    Generator::new(config, rasterizer)?.run()
}
