//! Error types for the mockup engine.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Coarse failure class reported at the job boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Decode,
    Io,
}

/// Outcome of a single page rasterization attempt.
#[derive(Debug, Error)]
pub enum RasterizeError {
    #[error("Page {index} is out of range")]
    PageOutOfRange { index: usize },

    #[error("Rasterizer failed on page {index}: {message}")]
    Failed { index: usize, message: String },

    #[error("Could not launch rasterizer: {0}")]
    Launch(#[from] std::io::Error),
}

impl RasterizeError {
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::PageOutOfRange { .. })
    }
}

#[derive(Debug, Error)]
pub enum MockupError {
    #[error("No logo source (logo.pdf/png/jpg) in {}", dir.display())]
    NotFound { dir: PathBuf },

    #[error("Failed to decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },

    #[error("Rasterization failed: {0}")]
    Rasterize(#[from] RasterizeError),

    #[error("Failed to encode {}: {message}", path.display())]
    Encode { path: PathBuf, message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type MockupResult<T> = Result<T, MockupError>;

impl MockupError {
    pub fn decode(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Decode { .. } | Self::Rasterize(_) => ErrorKind::Decode,
            Self::Encode { .. } | Self::Config { .. } | Self::Io(_) | Self::Serialization(_) => {
                ErrorKind::Io
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let e = MockupError::NotFound { dir: "imagens".into() };
        assert_eq!(e.kind(), ErrorKind::NotFound);
        assert!(e.to_string().contains("imagens"));

        let e = MockupError::from(RasterizeError::Failed { index: 2, message: "bad".into() });
        assert_eq!(e.kind(), ErrorKind::Decode);

        let e = MockupError::from(std::io::Error::other("disk full"));
        assert_eq!(e.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_out_of_range_tag() {
        assert!(RasterizeError::PageOutOfRange { index: 3 }.is_out_of_range());
        assert!(!RasterizeError::Failed { index: 0, message: String::new() }.is_out_of_range());
    }
}
