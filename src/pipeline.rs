//! Mockup Pipeline - single entry point for a job
//!
//! Resolve the source, dispatch to the page sequencer (vector) or a single
//! composite render (raster), then describe every file produced.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::config::MockupConfig;
use crate::error::{MockupError, MockupResult};
use crate::hashing::{compute_report_hash, file_sha256};
use crate::layout::MockupLayout;
use crate::rasterize::{MagickRasterizer, Rasterizer};
use crate::render::CompositeRenderer;
use crate::sequence::{PageMode, PageSequencer, RenderedPage};
use crate::source::{self, SourceDescriptor, SourceKind};
use crate::workspace::{JobContext, Upload};
use crate::ENGINE_VERSION;

pub const RASTER_OUTPUT_NAME: &str = "resultado.png";

#[derive(Debug, Clone, Serialize)]
pub struct MockupOutput {
    /// Source page for vector input; `None` for raster input.
    pub page: Option<usize>,
    pub filename: String,
    pub path: PathBuf,
    pub size: [u32; 2],
    pub hash: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MockupReport {
    pub job_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub engine_version: String,
    pub source: SourceDescriptor,
    pub outputs: Vec<MockupOutput>,
    pub report_hash: String,
}

pub struct MockupPipeline {
    renderer: CompositeRenderer,
    rasterizer: Box<dyn Rasterizer>,
    page_mode: PageMode,
}

impl MockupPipeline {
    pub fn new(layout: MockupLayout, rasterizer: Box<dyn Rasterizer>, page_mode: PageMode) -> Self {
        Self {
            renderer: CompositeRenderer::new(layout),
            rasterizer,
            page_mode,
        }
    }

    pub fn from_config(config: &MockupConfig) -> Self {
        Self::new(
            MockupLayout::standard(),
            Box::new(MagickRasterizer::new(config.rasterizer.clone())),
            config.page_mode,
        )
    }

    pub fn layout(&self) -> &MockupLayout {
        self.renderer.layout()
    }

    /// Run the job in an already staged directory.
    pub fn run(&self, job: &JobContext) -> MockupResult<MockupReport> {
        let source = source::resolve(&job.dir)?;
        tracing::info!(
            job = %job.id,
            kind = ?source.kind,
            path = %source.path.display(),
            "Source resolved"
        );

        let outputs = match source.kind {
            SourceKind::Vector => {
                let sequencer = PageSequencer::new(&self.renderer, self.rasterizer.as_ref(), self.page_mode);
                sequencer
                    .run(&source.path, job)?
                    .into_iter()
                    .map(|RenderedPage { index, path }| describe_output(Some(index), path))
                    .collect::<MockupResult<Vec<_>>>()?
            }
            SourceKind::Raster => {
                let out = job.path(RASTER_OUTPUT_NAME);
                self.renderer
                    .render_file(&job.background_path(), &source.path, &out)?;
                vec![describe_output(None, out)?]
            }
        };

        let mut report = MockupReport {
            job_id: job.id,
            created_at: job.created_at,
            engine_version: ENGINE_VERSION.to_string(),
            source,
            outputs,
            report_hash: String::new(),
        };
        report.report_hash = compute_report_hash(&report)?;

        tracing::info!(job = %job.id, outputs = report.outputs.len(), "Job complete");
        Ok(report)
    }

    /// Reset `dir`, stage `upload` into it and run the job.
    ///
    /// The upload is buffered first, so it may live inside `dir`.
    pub fn process_upload(&self, dir: &Path, background: &Path, upload: &Path) -> MockupResult<MockupReport> {
        let upload = Upload::read(upload)?;
        let job = JobContext::prepare(dir, background)?;
        job.stage(&upload)?;
        self.run(&job)
    }
}

fn describe_output(page: Option<usize>, path: PathBuf) -> MockupResult<MockupOutput> {
    let (w, h) = image::image_dimensions(&path)
        .map_err(|e| MockupError::decode(&path, e.to_string()))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(MockupOutput {
        page,
        filename,
        hash: file_sha256(&path)?,
        size: [w, h],
        path,
    })
}
