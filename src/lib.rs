#![deny(clippy::unwrap_used, clippy::expect_used)]
//! Batch generation of signed distance field bitmap font atlases.
//!
//! Rasterization itself is done by an external tool (see [`rasterizer`]).
//! This crate drives it over a directory of fonts, fixes the vertical
//! metadata of the atlas descriptions it writes, and can merge several
//! weights of one face into a single shared atlas.

#[cfg(feature = "cli")]
mod args;
pub mod atlas;
pub mod config;
mod error;
mod fieldtype;
mod generate;
pub mod merge;
mod metrics;
pub mod rasterizer;
mod weight;

#[cfg(feature = "cli")]
pub use crate::args::Args;
pub use crate::{
    atlas::{AtlasDocument, Chars},
    config::{AtlasMode, GenerateConfig, Overrides},
    error::{ErrorKind, FontgenError},
    fieldtype::FieldType,
    generate::{generate_fonts, GeneratedFont, Generator, FONT_EXTENSIONS},
    merge::MergeTarget,
    metrics::{FontMetrics, METRICS_SUBDIR},
    rasterizer::{MsdfBmfont, RasterJob, RasterOutput, Rasterizer},
    weight::{base_name, WeightKey, KNOWN_WEIGHTS},
};
