//! The external glyph rasterizer.
//!
//! Rasterizing glyphs, computing distance fields and packing the texture are
//! all left to an external tool. This module only describes a job and hands
//! it over.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Command,
};

use crate::{FieldType, FontgenError};

pub const DEFAULT_TEXTURE_SIZE: (u32, u32) = (2048, 2048);
pub const DEFAULT_ROUND_DECIMAL: u32 = 6;

/// Options for rasterizing one font into one atlas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterJob {
    pub font_path: PathBuf,
    pub field_type: FieldType,
    pub font_size: u32,
    pub distance_range: u32,
    pub round_decimal: u32,
    /// Shrink the texture to the smallest size that fits
    pub smart_size: bool,
    /// Keep texture dimensions powers of two
    pub pot: bool,
    /// Apply the right-to-left shaping fix
    pub rtl: bool,
    pub texture_size: (u32, u32),
    /// File listing the characters to rasterize
    pub charset: Option<PathBuf>,
    /// Packing state shared between fonts of one atlas
    pub reuse: Option<PathBuf>,
    /// Output path without extension; the texture and the description are
    /// written next to it
    pub filename: PathBuf,
}

impl RasterJob {
    pub fn new(font_path: PathBuf, field_type: FieldType, filename: PathBuf) -> Self {
        RasterJob {
            font_path,
            field_type,
            font_size: crate::config::DEFAULT_FONT_SIZE,
            distance_range: crate::config::DEFAULT_DISTANCE_RANGE,
            round_decimal: DEFAULT_ROUND_DECIMAL,
            smart_size: true,
            pot: true,
            rtl: true,
            texture_size: DEFAULT_TEXTURE_SIZE,
            charset: None,
            reuse: None,
            filename,
        }
    }

    fn with_extension(&self, ext: &str) -> PathBuf {
        let mut name = self.filename.clone().into_os_string();
        name.push(".");
        name.push(ext);
        PathBuf::from(name)
    }

    /// Where the atlas description ends up
    pub fn json_path(&self) -> PathBuf {
        self.with_extension("json")
    }

    /// Where the texture ends up
    pub fn png_path(&self) -> PathBuf {
        self.with_extension("png")
    }
}

/// The result of a rasterizer run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterOutput {
    /// The atlas description, as JSON text
    pub json: String,
}

pub trait Rasterizer {
    fn rasterize(&self, job: &RasterJob) -> Result<RasterOutput, FontgenError>;
}

/// Runs the `msdf-bmfont` command line tool
#[derive(Debug, Clone)]
pub struct MsdfBmfont {
    program: OsString,
}

impl Default for MsdfBmfont {
    fn default() -> Self {
        MsdfBmfont::new("msdf-bmfont")
    }
}

impl MsdfBmfont {
    pub fn new(program: impl Into<OsString>) -> Self {
        MsdfBmfont {
            program: program.into(),
        }
    }

    /// Command line arguments for a job
    pub fn args(job: &RasterJob) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "--output-type".into(),
            "json".into(),
            "--filename".into(),
            job.filename.clone().into(),
            "--font-size".into(),
            job.font_size.to_string().into(),
            "--distance-range".into(),
            job.distance_range.to_string().into(),
            "--field-type".into(),
            job.field_type.rasterizer_field_type().into(),
            "--round-decimal".into(),
            job.round_decimal.to_string().into(),
            "--texture-size".into(),
            format!("{},{}", job.texture_size.0, job.texture_size.1).into(),
        ];
        if job.smart_size {
            args.push("--smart-size".into());
        }
        if job.pot {
            args.push("--pot".into());
        }
        if job.rtl {
            args.push("--rtl".into());
        }
        if let Some(charset) = &job.charset {
            args.push("--charset-file".into());
            args.push(charset.clone().into());
        }
        if let Some(reuse) = &job.reuse {
            args.push("--reuse".into());
            args.push(reuse.clone().into());
        }
        args.push(job.font_path.clone().into());
        args
    }
}

impl Rasterizer for MsdfBmfont {
    fn rasterize(&self, job: &RasterJob) -> Result<RasterOutput, FontgenError> {
        let args = Self::args(job);
        log::debug!("Running {:?} {:?}", self.program, args);
        let output = Command::new(&self.program)
            .args(&args)
            .output()
            .map_err(|e| rasterizer_error(&job.font_path, e.to_string()))?;
        if !output.status.success() {
            return Err(rasterizer_error(
                &job.font_path,
                format!(
                    "{} ({})",
                    String::from_utf8_lossy(&output.stderr).trim(),
                    output.status
                ),
            ));
        }
        log::trace!("{}", String::from_utf8_lossy(&output.stdout));
        let json = std::fs::read_to_string(job.json_path())?;
        Ok(RasterOutput { json })
    }
}

fn rasterizer_error(path: &Path, reason: String) -> FontgenError {
    FontgenError::Rasterizer {
        path: path.to_path_buf(),
        reason,
    }
}
