//! Job workspace: the directory one mockup job reads from and writes to.
//!
//! Every core call receives the `JobContext` explicitly, so separate jobs can
//! run against separate directories.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{MockupError, MockupResult};
use crate::source::SourceFormat;

pub const BACKGROUND_NAME: &str = "background.png";

#[derive(Debug, Clone, Serialize)]
pub struct JobContext {
    pub id: Uuid,
    pub dir: PathBuf,
    pub created_at: DateTime<Utc>,
}

impl JobContext {
    /// Use `dir` as it is, without resetting it.
    pub fn open(dir: impl Into<PathBuf>) -> MockupResult<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(MockupError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("work directory {} does not exist", dir.display()),
            )));
        }
        Ok(Self::new(dir))
    }

    /// Delete and recreate `dir`, then copy the background asset into it.
    pub fn prepare(dir: impl Into<PathBuf>, background_asset: &Path) -> MockupResult<Self> {
        let dir = dir.into();
        check_reset_target(&dir, background_asset, &std::env::current_dir()?)?;
        // Read first: the asset may live inside the directory being reset.
        let background = fs::read(background_asset)?;

        match fs::remove_dir_all(&dir) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        fs::create_dir_all(&dir)?;
        fs::write(dir.join(BACKGROUND_NAME), background)?;

        let job = Self::new(dir);
        tracing::info!(job = %job.id, dir = %job.dir.display(), "Workspace reset");
        Ok(job)
    }

    fn new(dir: PathBuf) -> Self {
        Self {
            id: Uuid::new_v4(),
            dir,
            created_at: Utc::now(),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    pub fn background_path(&self) -> PathBuf {
        self.path(BACKGROUND_NAME)
    }

    /// Copy an uploaded file in under its canonical source name.
    ///
    /// Unrecognized extensions keep their original name and will not resolve.
    pub fn stage_upload(&self, upload: &Path) -> MockupResult<PathBuf> {
        self.stage(&Upload::read(upload)?)
    }

    /// Write an already buffered upload in under its canonical source name.
    pub fn stage(&self, upload: &Upload) -> MockupResult<PathBuf> {
        let target = self.path(&staged_name(&upload.name));
        fs::write(&target, &upload.bytes)?;
        tracing::info!(job = %self.id, upload = %upload.name, staged = %target.display(), "Upload staged");
        Ok(target)
    }
}

/// An uploaded file held in memory, so it survives a workspace reset.
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn read(path: &Path) -> MockupResult<Self> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| MockupError::config(format!("invalid upload path {}", path.display())))?
            .to_string();
        Ok(Self {
            name,
            bytes: fs::read(path)?,
        })
    }
}

/// Refuse to reset a directory that holds the caller's cwd or the
/// background asset's own folder.
fn check_reset_target(dir: &Path, background_asset: &Path, cwd: &Path) -> MockupResult<()> {
    let Ok(target) = dir.canonicalize() else {
        // Nothing there yet, nothing to lose.
        return Ok(());
    };
    let cwd = cwd.canonicalize()?;
    if cwd.starts_with(&target) {
        return Err(MockupError::config(format!(
            "refusing to reset {}: it contains the current directory",
            target.display()
        )));
    }
    let asset_dir = background_asset
        .canonicalize()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf));
    if let Some(asset_dir) = asset_dir {
        if asset_dir != target && asset_dir.starts_with(&target) {
            return Err(MockupError::config(format!(
                "refusing to reset {}: it contains the background folder {}",
                target.display(),
                asset_dir.display()
            )));
        }
    }
    Ok(())
}

pub fn staged_name(original: &str) -> String {
    Path::new(original)
        .extension()
        .and_then(|e| e.to_str())
        .and_then(SourceFormat::from_extension)
        .map(|f| f.file_name().to_string())
        .unwrap_or_else(|| original.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staged_names() {
        assert_eq!(staged_name("logo-acme.PDF"), "logo.pdf");
        assert_eq!(staged_name("brand.jpeg"), "logo.jpg");
        assert_eq!(staged_name("mark.png"), "logo.png");
        assert_eq!(staged_name("vector.svg"), "vector.svg");
        assert_eq!(staged_name("README"), "README");
    }

    #[test]
    fn test_prepare_resets_directory() {
        let root = tempfile::tempdir().unwrap();
        let asset = root.path().join("bg-asset.png");
        fs::write(&asset, b"bg").unwrap();
        let dir = root.path().join("imagens");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("resultado_page_4.png"), b"stale").unwrap();

        let job = JobContext::prepare(&dir, &asset).unwrap();
        assert!(!dir.join("resultado_page_4.png").exists());
        assert_eq!(fs::read(job.background_path()).unwrap(), b"bg");
    }

    #[test]
    fn test_prepare_with_background_inside_dir() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("imagens");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join(BACKGROUND_NAME), b"bg").unwrap();
        fs::write(dir.join("logo.png"), b"old").unwrap();

        let job = JobContext::prepare(&dir, &dir.join(BACKGROUND_NAME)).unwrap();
        assert_eq!(fs::read(job.background_path()).unwrap(), b"bg");
        assert!(!dir.join("logo.png").exists());
    }

    #[test]
    fn test_prepare_missing_background_keeps_dir() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("imagens");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join("keep.txt"), b"k").unwrap();

        let err = JobContext::prepare(&dir, &root.path().join("nope.png")).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Io);
        assert!(dir.join("keep.txt").exists());
    }

    #[test]
    fn test_reset_refuses_cwd_and_its_ancestors() {
        let root = tempfile::tempdir().unwrap();
        let cwd = root.path().join("project");
        fs::create_dir(&cwd).unwrap();
        let asset = root.path().join("bg.png");

        let err = check_reset_target(root.path(), &asset, &cwd).unwrap_err();
        assert!(matches!(err, MockupError::Config { .. }));
        assert!(check_reset_target(&cwd, &asset, &cwd).is_err());

        let work = cwd.join("imagens");
        fs::create_dir(&work).unwrap();
        assert!(check_reset_target(&work, &asset, &cwd).is_ok());
        assert!(check_reset_target(&cwd.join("not-yet"), &asset, &cwd).is_ok());
    }

    #[test]
    fn test_prepare_refuses_dir_above_background_folder() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("site");
        let assets = dir.join("assets");
        fs::create_dir_all(&assets).unwrap();
        fs::write(assets.join("bg.png"), b"bg").unwrap();
        fs::write(dir.join("index.html"), b"keep").unwrap();

        let err = JobContext::prepare(&dir, &assets.join("bg.png")).unwrap_err();
        assert!(matches!(err, MockupError::Config { .. }));
        assert!(dir.join("index.html").exists());
        assert!(assets.join("bg.png").exists());
    }

    #[test]
    fn test_buffered_upload_survives_reset() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("imagens");
        fs::create_dir(&dir).unwrap();
        fs::write(dir.join(BACKGROUND_NAME), b"bg").unwrap();
        fs::write(dir.join("mark.JPEG"), b"jpeg bytes").unwrap();

        let upload = Upload::read(&dir.join("mark.JPEG")).unwrap();
        let job = JobContext::prepare(&dir, &dir.join(BACKGROUND_NAME)).unwrap();
        let staged = job.stage(&upload).unwrap();
        assert_eq!(staged, dir.join("logo.jpg"));
        assert_eq!(fs::read(staged).unwrap(), b"jpeg bytes");
        assert!(!dir.join("mark.JPEG").exists());
    }

    #[test]
    fn test_open_requires_dir() {
        let root = tempfile::tempdir().unwrap();
        assert!(JobContext::open(root.path().join("missing")).is_err());
        let job = JobContext::open(root.path()).unwrap();
        assert_eq!(job.path("x.png"), root.path().join("x.png"));
    }

    #[test]
    fn test_jobs_get_distinct_ids() {
        let root = tempfile::tempdir().unwrap();
        let a = JobContext::open(root.path()).unwrap();
        let b = JobContext::open(root.path()).unwrap();
        assert_ne!(a.id, b.id);
    }
}
