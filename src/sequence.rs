//! Page Sequencer - one mockup per page of a vector logo.
//!
//! `Counted` asks the rasterizer for the page count and treats any page
//! failure as a real error. `BestEffort` keeps rendering until the first
//! rasterization failure and stops without reporting it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MockupError, MockupResult};
use crate::rasterize::Rasterizer;
use crate::render::CompositeRenderer;
use crate::workspace::JobContext;

/// Intermediate raster, overwritten for every page.
pub const PAGE_RASTER_NAME: &str = "logo_page.png";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageMode {
    #[default]
    Counted,
    BestEffort,
}

pub fn page_output_name(index: usize) -> String {
    format!("resultado_page_{}.png", index)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub index: usize,
    pub path: PathBuf,
}

pub struct PageSequencer<'a> {
    renderer: &'a CompositeRenderer,
    rasterizer: &'a dyn Rasterizer,
    mode: PageMode,
}

impl<'a> PageSequencer<'a> {
    pub fn new(renderer: &'a CompositeRenderer, rasterizer: &'a dyn Rasterizer, mode: PageMode) -> Self {
        Self {
            renderer,
            rasterizer,
            mode,
        }
    }

    /// Render every page of `document` into the job directory, in page order.
    pub fn run(&self, document: &Path, job: &JobContext) -> MockupResult<Vec<RenderedPage>> {
        let page_raster = job.path(PAGE_RASTER_NAME);
        let result = match self.mode {
            PageMode::Counted => self.run_counted(document, job, &page_raster),
            PageMode::BestEffort => self.run_best_effort(document, job, &page_raster),
        };

        match fs::remove_file(&page_raster) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %page_raster.display(), error = %e, "Could not remove page raster"),
        }
        result
    }

    fn run_counted(&self, document: &Path, job: &JobContext, page_raster: &Path) -> MockupResult<Vec<RenderedPage>> {
        let count = self.rasterizer.page_count(document)?.ok_or_else(|| {
            MockupError::decode(
                document,
                format!(
                    "{} cannot report a page count; use the best_effort page mode",
                    self.rasterizer.name()
                ),
            )
        })?;
        tracing::info!(job = %job.id, pages = count, "Rendering vector logo");

        let mut pages = Vec::with_capacity(count);
        for index in 0..count {
            self.rasterizer.rasterize_page(document, index, page_raster)?;
            pages.push(self.render_page(job, index, page_raster)?);
        }
        Ok(pages)
    }

    fn run_best_effort(&self, document: &Path, job: &JobContext, page_raster: &Path) -> MockupResult<Vec<RenderedPage>> {
        let mut pages = Vec::new();
        let mut index = 0;
        loop {
            match self.rasterizer.rasterize_page(document, index, page_raster) {
                Ok(()) => {}
                Err(e) if e.is_out_of_range() => {
                    tracing::debug!(job = %job.id, pages = index, "No more pages");
                    break;
                }
                Err(e) => {
                    tracing::warn!(job = %job.id, page = index, error = %e, "Stopping page loop");
                    break;
                }
            }
            pages.push(self.render_page(job, index, page_raster)?);
            index += 1;
        }
        Ok(pages)
    }

    fn render_page(&self, job: &JobContext, index: usize, page_raster: &Path) -> MockupResult<RenderedPage> {
        tracing::info!(job = %job.id, page = index, "Page rasterized");
        let out = job.path(&page_output_name(index));
        self.renderer
            .render_file(&job.background_path(), page_raster, &out)?;
        Ok(RenderedPage { index, path: out })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_names() {
        assert_eq!(page_output_name(0), "resultado_page_0.png");
        assert_eq!(page_output_name(12), "resultado_page_12.png");
    }

    #[test]
    fn test_page_mode_serde() {
        assert_eq!(serde_json::to_string(&PageMode::BestEffort).unwrap(), r#""best_effort""#);
        let m: PageMode = serde_json::from_str(r#""counted""#).unwrap();
        assert_eq!(m, PageMode::default());
    }
}
