//! Composite Renderer - background plus scaled logo copies at every slot
//!
//! One call owns one canvas: decode, draw, serialize, drop.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage};

use crate::error::{MockupError, MockupResult};
use crate::fit::{fit_to_group, FittedSize};
use crate::layout::{MockupLayout, SlotGroup};
use crate::validation::{ImageInput, ImageRole, Validator};

/// A decoded logo raster, read-only for the duration of one render.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub path: PathBuf,
    pub image: RgbaImage,
}

impl SourceImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

pub struct CompositeRenderer {
    layout: MockupLayout,
    validator: Validator,
    filter: FilterType,
}

impl CompositeRenderer {
    pub fn new(layout: MockupLayout) -> Self {
        Self {
            layout,
            validator: Validator::new(),
            filter: FilterType::Lanczos3,
        }
    }

    pub fn layout(&self) -> &MockupLayout {
        &self.layout
    }

    /// Decode and validate a logo raster.
    pub fn load_source(&self, path: &Path) -> MockupResult<SourceImage> {
        let image = decode(path)?;
        self.validator
            .validate(
                &ImageInput::new(ImageRole::Source, path, image.dimensions()),
                &self.layout,
            )
            .into_result(path)?;
        Ok(SourceImage {
            path: path.to_path_buf(),
            image,
        })
    }

    /// Decode the background and bring it to canvas size.
    pub fn load_background(&self, path: &Path) -> MockupResult<RgbaImage> {
        let image = decode(path)?;
        let result = self
            .validator
            .validate(
                &ImageInput::new(ImageRole::Background, path, image.dimensions()),
                &self.layout,
            )
            .into_result(path)?;

        for warning in result.warnings() {
            tracing::warn!(
                path = %path.display(),
                rule = warning.rule,
                expected = ?warning.expected,
                actual = ?warning.actual,
                "{}",
                warning.message
            );
        }

        let [w, h] = self.layout.canvas_size;
        if image.dimensions() == (w, h) {
            Ok(image)
        } else {
            Ok(imageops::resize(&image, w, h, self.filter))
        }
    }

    /// Draw the background once, then the source centered on every anchor of both groups.
    pub fn compose(&self, background: RgbaImage, source: &SourceImage) -> RgbaImage {
        let mut canvas = background;
        for group in self.layout.groups() {
            self.draw_group(&mut canvas, source, group);
        }
        canvas
    }

    fn draw_group(&self, canvas: &mut RgbaImage, source: &SourceImage, group: &SlotGroup) {
        let fitted = fit_to_group(source.width(), source.height(), group);
        let (w, h) = fitted.to_pixels();
        let scaled = imageops::resize(&source.image, w, h, self.filter);

        for anchor in group.anchors {
            let (x, y) = top_left(anchor.x, anchor.y, fitted);
            imageops::overlay(canvas, &scaled, x, y);
        }

        tracing::debug!(
            group = ?group.id,
            width = fitted.width,
            height = fitted.height,
            slots = group.anchors.len(),
            "Placed logo copies"
        );
    }

    /// Full contract: background + source in, one PNG at `out` overwritten.
    pub fn render(&self, background: &Path, source: &SourceImage, out: &Path) -> MockupResult<()> {
        let canvas = self.compose(self.load_background(background)?, source);
        write_png(&canvas, out)?;
        tracing::info!(
            out = %out.display(),
            source = %source.path.display(),
            "Mockup written"
        );
        Ok(())
    }

    pub fn render_file(&self, background: &Path, source: &Path, out: &Path) -> MockupResult<()> {
        let source = self.load_source(source)?;
        self.render(background, &source, out)
    }
}

impl Default for CompositeRenderer {
    fn default() -> Self {
        Self::new(MockupLayout::standard())
    }
}

fn top_left(cx: i32, cy: i32, size: FittedSize) -> (i64, i64) {
    let x = (cx as f64 - size.width / 2.0).round() as i64;
    let y = (cy as f64 - size.height / 2.0).round() as i64;
    (x, y)
}

fn decode(path: &Path) -> MockupResult<RgbaImage> {
    let image: DynamicImage = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| MockupError::decode(path, e.to_string()))?;
    Ok(image.into_rgba8())
}

/// Write through a sibling temp file so `out` only ever holds a complete PNG.
pub fn write_png(canvas: &RgbaImage, out: &Path) -> MockupResult<()> {
    let partial = out.with_extension("png.partial");
    let result = write_flushed(canvas, &partial).and_then(|()| Ok(fs::rename(&partial, out)?));
    if result.is_err() {
        let _ = fs::remove_file(&partial);
    }
    result
}

fn write_flushed(canvas: &RgbaImage, path: &Path) -> MockupResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    canvas
        .write_to(&mut writer, ImageFormat::Png)
        .map_err(|e| MockupError::Encode {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
    writer.flush()?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    Ok(())
}
