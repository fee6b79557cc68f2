use std::path::PathBuf;

use clap::Parser;

use crate::{config::DEFAULT_FACE_NAME, AtlasMode, FieldType, GenerateConfig};

/// SDF bitmap font atlas generator
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory containing the source fonts, overrides.json and charset.txt
    #[arg(default_value = "font-src")]
    pub src_dir: PathBuf,

    /// Directory to write atlases to
    #[arg(default_value = "font-dst")]
    pub dst_dir: PathBuf,

    /// Distance field types to generate
    #[arg(short = 't', long = "field-type", value_enum, default_values_t = [FieldType::Mtsdf])]
    pub field_types: Vec<FieldType>,

    /// Merge all fonts into one atlas; fonts should be named [face-name]-[weight].[ext]
    #[arg(short, long)]
    pub single_atlas: bool,

    /// Name of the shared atlas
    #[arg(long, default_value = DEFAULT_FACE_NAME, requires = "single_atlas")]
    pub face_name: String,

    /// Don't read font metrics or write metrics files
    #[arg(long)]
    pub no_metrics: bool,

    /// Rasterizer program to run
    #[arg(long, default_value = "msdf-bmfont")]
    pub rasterizer: String,

    #[command(flatten)]
    pub verbosity: clap_verbosity_flag::Verbosity<clap_verbosity_flag::InfoLevel>,
}

impl Args {
    pub fn config(&self) -> GenerateConfig {
        GenerateConfig {
            src_dir: self.src_dir.clone(),
            dst_dir: self.dst_dir.clone(),
            field_types: self.field_types.clone(),
            atlas: if self.single_atlas {
                AtlasMode::Single {
                    face_name: self.face_name.clone(),
                }
            } else {
                AtlasMode::PerFont
            },
            extract_metrics: !self.no_metrics,
        }
    }
}
