//! Source Resolver - pick the job's logo by fixed name and priority.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MockupError, MockupResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Pdf,
    Png,
    Jpg,
}

impl SourceFormat {
    /// Resolution priority: vector first.
    pub const PRIORITY: [SourceFormat; 3] = [Self::Pdf, Self::Png, Self::Jpg];

    pub fn file_name(self) -> &'static str {
        match self {
            Self::Pdf => "logo.pdf",
            Self::Png => "logo.png",
            Self::Jpg => "logo.jpg",
        }
    }

    pub fn kind(self) -> SourceKind {
        match self {
            Self::Pdf => SourceKind::Vector,
            Self::Png | Self::Jpg => SourceKind::Raster,
        }
    }

    /// Case-insensitive extension match; `.jpeg` folds into `Jpg`.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpg),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Vector,
    Raster,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceDescriptor {
    pub kind: SourceKind,
    pub format: SourceFormat,
    pub path: PathBuf,
}

/// First of `logo.pdf`, `logo.png`, `logo.jpg` present in `dir`.
pub fn resolve(dir: &Path) -> MockupResult<SourceDescriptor> {
    SourceFormat::PRIORITY
        .iter()
        .map(|&format| (format, dir.join(format.file_name())))
        .find(|(_, path)| path.is_file())
        .map(|(format, path)| SourceDescriptor {
            kind: format.kind(),
            format,
            path,
        })
        .ok_or_else(|| MockupError::NotFound {
            dir: dir.to_path_buf(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_pdf_wins_over_png() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("logo.png"), b"x").unwrap();
        fs::write(dir.path().join("logo.pdf"), b"x").unwrap();
        let src = resolve(dir.path()).unwrap();
        assert_eq!(src.kind, SourceKind::Vector);
        assert_eq!(src.path, dir.path().join("logo.pdf"));
    }

    #[test]
    fn test_png_wins_over_jpg() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("logo.jpg"), b"x").unwrap();
        fs::write(dir.path().join("logo.png"), b"x").unwrap();
        let src = resolve(dir.path()).unwrap();
        assert_eq!(src.format, SourceFormat::Png);
        assert_eq!(src.kind, SourceKind::Raster);
    }

    #[test]
    fn test_empty_dir_not_found() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("background.png"), b"x").unwrap();
        fs::write(dir.path().join("logo.gif"), b"x").unwrap();
        let err = resolve(dir.path()).unwrap_err();
        assert!(matches!(err, MockupError::NotFound { .. }));
    }

    #[test]
    fn test_directory_named_like_source_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("logo.pdf")).unwrap();
        fs::write(dir.path().join("logo.jpg"), b"x").unwrap();
        assert_eq!(resolve(dir.path()).unwrap().format, SourceFormat::Jpg);
    }

    #[test]
    fn test_extension_mapping() {
        assert_eq!(SourceFormat::from_extension("JPEG"), Some(SourceFormat::Jpg));
        assert_eq!(SourceFormat::from_extension("Pdf"), Some(SourceFormat::Pdf));
        assert_eq!(SourceFormat::from_extension("svg"), None);
    }
}
