use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::utils::error::{AppError, AppResult};
use crate::utils::filename;

const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "mp4", "webm"];

/// Writes uploaded media into the public uploads directory under safe,
/// collision-free names.
#[derive(Clone)]
pub struct UploadService {
    dir: PathBuf,
}

impl UploadService {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Stores the upload and returns the filename it was saved under.
    pub fn store(&self, original_name: &str, bytes: &[u8]) -> AppResult<String> {
        if original_name.trim().is_empty() {
            return Err(AppError::UploadRejected("empty filename".to_string()));
        }

        let (raw_stem, ext) = original_name
            .rsplit_once('.')
            .ok_or_else(|| AppError::UploadRejected("file has no extension".to_string()))?;

        let ext = ext.trim().to_ascii_lowercase();
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(AppError::UploadRejected(format!(
                "file type .{ext} is not allowed"
            )));
        }

        // A stem made entirely of rejected characters sanitizes to nothing.
        let stem = match filename::sanitize(raw_stem) {
            s if s.is_empty() => Uuid::new_v4().simple().to_string(),
            s => s,
        };

        fs::create_dir_all(&self.dir)?;

        let mut stored = format!("{stem}.{ext}");
        let mut counter = 0u32;
        while self.dir.join(&stored).exists() {
            counter += 1;
            stored = format!("{stem}-{counter}.{ext}");
        }

        fs::write(self.dir.join(&stored), bytes)?;
        log::debug!("stored upload {stored} ({} bytes)", bytes.len());

        Ok(stored)
    }

    /// Best-effort removal of a stored file. Failures are logged and ignored:
    /// a leftover file is cosmetic, a failed delete must not fail the request.
    pub fn remove(&self, stored_name: &str) {
        // stored names never contain separators, anything else is not ours
        if stored_name.contains('/') || stored_name.contains('\\') {
            log::warn!("refusing to remove suspicious filename: {stored_name}");
            return;
        }

        if let Err(e) = fs::remove_file(self.dir.join(stored_name)) {
            log::warn!("failed to remove upload {stored_name}: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service() -> (tempfile::TempDir, UploadService) {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let service = UploadService::new(dir.path());
        (dir, service)
    }

    #[test]
    fn store_writes_the_bytes() {
        let (dir, service) = test_service();
        let stored = service.store("car.jpg", b"jpeg-bytes").expect("store failed");
        assert_eq!(stored, "car.jpg");
        assert_eq!(
            fs::read(dir.path().join(&stored)).expect("read failed"),
            b"jpeg-bytes"
        );
    }

    #[test]
    fn store_suffixes_on_collision() {
        let (_dir, service) = test_service();
        assert_eq!(service.store("car.jpg", b"a").expect("store failed"), "car.jpg");
        assert_eq!(
            service.store("car.jpg", b"b").expect("store failed"),
            "car-1.jpg"
        );
        assert_eq!(
            service.store("car.jpg", b"c").expect("store failed"),
            "car-2.jpg"
        );
    }

    #[test]
    fn store_rejects_disallowed_extension() {
        let (_dir, service) = test_service();
        let err = service.store("shell.php", b"<?php").unwrap_err();
        assert!(matches!(err, AppError::UploadRejected(_)));
    }

    #[test]
    fn store_rejects_missing_extension() {
        let (_dir, service) = test_service();
        assert!(matches!(
            service.store("README", b"x").unwrap_err(),
            AppError::UploadRejected(_)
        ));
    }

    #[test]
    fn store_rejects_empty_filename() {
        let (_dir, service) = test_service();
        assert!(matches!(
            service.store("", b"x").unwrap_err(),
            AppError::UploadRejected(_)
        ));
        assert!(matches!(
            service.store("   ", b"x").unwrap_err(),
            AppError::UploadRejected(_)
        ));
    }

    #[test]
    fn store_neutralizes_path_traversal() {
        let (dir, service) = test_service();
        let stored = service
            .store("../../evil.png", b"png")
            .expect("store failed");
        assert_eq!(stored, "evil.png");
        assert!(dir.path().join("evil.png").exists());
    }

    #[test]
    fn store_generates_a_name_when_nothing_survives_sanitizing() {
        let (_dir, service) = test_service();
        let stored = service.store("€€€.png", b"png").expect("store failed");
        assert!(stored.ends_with(".png"));
        assert!(stored.len() > ".png".len());
        // a second all-symbol upload must not collide either
        let second = service.store("€€€.png", b"png").expect("store failed");
        assert_ne!(stored, second);
    }

    #[test]
    fn remove_deletes_the_file() {
        let (dir, service) = test_service();
        let stored = service.store("car.jpg", b"x").expect("store failed");
        service.remove(&stored);
        assert!(!dir.path().join(&stored).exists());
    }

    #[test]
    fn remove_ignores_missing_files() {
        let (_dir, service) = test_service();
        service.remove("never-stored.jpg");
    }
}
