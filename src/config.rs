//! Engine configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MockupError, MockupResult};
use crate::rasterize::RasterizerConfig;
use crate::sequence::PageMode;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MockupConfig {
    /// Directory holding the current job's inputs and outputs.
    pub work_dir: PathBuf,

    /// Background asset copied into the work directory on reset.
    pub background: PathBuf,

    pub page_mode: PageMode,

    pub rasterizer: RasterizerConfig,

    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive, e.g. "info" or "mockup_core=debug,warn".
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for MockupConfig {
    fn default() -> Self {
        Self {
            work_dir: PathBuf::from("imagens"),
            background: PathBuf::from("background.png"),
            page_mode: PageMode::default(),
            rasterizer: RasterizerConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl MockupConfig {
    /// Read `path` if given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> MockupResult<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path).map_err(|e| {
            MockupError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
            .map_err(|e| MockupError::config(format!("invalid {}: {}", path.display(), e)))
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = MockupConfig::load(None).unwrap();
        assert_eq!(cfg.work_dir, PathBuf::from("imagens"));
        assert_eq!(cfg.page_mode, PageMode::Counted);
        assert_eq!(cfg.rasterizer.program, PathBuf::from("magick"));
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let cfg = MockupConfig::from_json(
            r#"{"page_mode": "best_effort", "rasterizer": {"density": 150}}"#,
        )
        .unwrap();
        assert_eq!(cfg.page_mode, PageMode::BestEffort);
        assert_eq!(cfg.rasterizer.density, Some(150));
        assert_eq!(cfg.rasterizer.program, PathBuf::from("magick"));
        assert_eq!(cfg.background, PathBuf::from("background.png"));
    }

    #[test]
    fn test_bad_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mockup.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = MockupConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, MockupError::Config { .. }));

        let missing = MockupConfig::load(Some(&dir.path().join("absent.json"))).unwrap_err();
        assert!(missing.to_string().contains("cannot read"));
    }
}
