//! Mockup Core - logo mockup layout and composition engine
//!
//! A single logo (PDF, PNG or JPG) is scaled per slot group and stamped onto
//! a fixed 1920x1080 background at precomputed anchors. Multi-page PDFs give
//! one mockup per page.

pub mod config;
pub mod error;
pub mod fit;
pub mod hashing;
pub mod layout;
pub mod logging;
pub mod pipeline;
pub mod rasterize;
pub mod render;
pub mod sequence;
pub mod source;
pub mod validation;
pub mod workspace;

pub use config::{LoggingConfig, MockupConfig};
pub use error::{ErrorKind, MockupError, MockupResult, RasterizeError};
pub use fit::{fit, fit_to_group, FittedSize};
pub use layout::{MockupLayout, Point, SlotGroup, SlotGroupId};
pub use pipeline::{MockupOutput, MockupPipeline, MockupReport};
pub use rasterize::{MagickRasterizer, Rasterizer, RasterizerConfig};
pub use render::{CompositeRenderer, SourceImage};
pub use sequence::{PageMode, PageSequencer, RenderedPage};
pub use source::{resolve, SourceDescriptor, SourceFormat, SourceKind};
pub use workspace::{JobContext, Upload};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
