//! Vector rasterization backends.
//!
//! The engine never parses PDFs itself. A `Rasterizer` turns one page of a
//! vector document into a raster file and, when it can, reports the page count.

use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use serde::{Deserialize, Serialize};

use crate::error::RasterizeError;

pub trait Rasterizer: Send + Sync {
    /// Number of pages in `document`, or `None` if the backend cannot tell.
    fn page_count(&self, document: &Path) -> Result<Option<usize>, RasterizeError>;

    /// Render page `index` (zero-based) of `document` to `out`.
    fn rasterize_page(&self, document: &Path, index: usize, out: &Path) -> Result<(), RasterizeError>;

    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RasterizerConfig {
    /// ImageMagick entry point.
    pub program: PathBuf,
    /// Optional `-density` (DPI) applied before reading the document.
    pub density: Option<u32>,
}

impl Default for RasterizerConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("magick"),
            density: None,
        }
    }
}

/// ImageMagick 7 backend.
pub struct MagickRasterizer {
    config: RasterizerConfig,
}

impl MagickRasterizer {
    pub fn new(config: RasterizerConfig) -> Self {
        Self { config }
    }

    fn run(&self, mut cmd: Command) -> Result<Output, RasterizeError> {
        tracing::debug!(cmd = ?cmd, "Running rasterizer");
        Ok(cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?)
    }
}

impl Default for MagickRasterizer {
    fn default() -> Self {
        Self::new(RasterizerConfig::default())
    }
}

impl Rasterizer for MagickRasterizer {
    fn page_count(&self, document: &Path) -> Result<Option<usize>, RasterizeError> {
        let mut cmd = Command::new(&self.config.program);
        cmd.args(["identify", "-ping", "-format", "%n\\n"]).arg(document);
        let output = self.run(cmd)?;

        if !output.status.success() {
            return Err(RasterizeError::Failed {
                index: 0,
                message: stderr_tail(&output),
            });
        }
        Ok(parse_page_count(&String::from_utf8_lossy(&output.stdout)))
    }

    fn rasterize_page(&self, document: &Path, index: usize, out: &Path) -> Result<(), RasterizeError> {
        let mut cmd = Command::new(&self.config.program);
        if let Some(dpi) = self.config.density {
            cmd.arg("-density").arg(dpi.to_string());
        }
        cmd.arg(page_selector(document, index)).arg(out);

        // A leftover raster from the previous page must not pass for this one.
        match std::fs::remove_file(out) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        let output = self.run(cmd)?;

        if output.status.success() && out.exists() {
            return Ok(());
        }
        let message = stderr_tail(&output);
        if is_out_of_range_message(&message) {
            Err(RasterizeError::PageOutOfRange { index })
        } else {
            Err(RasterizeError::Failed { index, message })
        }
    }

    fn name(&self) -> &str {
        "imagemagick"
    }
}

/// `file.pdf[3]`: ImageMagick's frame selection syntax.
fn page_selector(document: &Path, index: usize) -> String {
    format!("{}[{}]", document.display(), index)
}

/// `identify -format "%n\n"` prints the frame count once per frame.
fn parse_page_count(stdout: &str) -> Option<usize> {
    stdout.lines().find_map(|l| l.trim().parse().ok())
}

fn is_out_of_range_message(stderr: &str) -> bool {
    let lower = stderr.to_ascii_lowercase();
    lower.contains("invalid argument for option")
        || lower.contains("no images defined")
        || lower.contains("requested frame")
        || lower.contains("out of range")
}

fn stderr_tail(output: &Output) -> String {
    let text = String::from_utf8_lossy(&output.stderr);
    let tail: Vec<_> = text.lines().rev().take(4).collect();
    let joined = tail.into_iter().rev().collect::<Vec<_>>().join(" | ");
    if joined.is_empty() {
        format!("exit status {}", output.status)
    } else {
        joined
    }
}
