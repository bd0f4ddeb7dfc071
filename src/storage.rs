// SPDX-License-Identifier: MPL-2.0

//! Picture library and capture cache

use crate::backends::camera::types::PhotoRef;
use crate::constants::paths;
use crate::errors::StorageError;
use futures::future::BoxFuture;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Media store: somewhere captured photos can be persisted
pub trait MediaStore: Send + Sync {
    /// Move the captured photo into the store, returning where it ended up
    fn persist(&self, photo: &PhotoRef) -> BoxFuture<'static, Result<PathBuf, StorageError>>;
}

/// The user's picture directory (~/Pictures/shutter)
pub fn default_library_directory() -> PathBuf {
    dirs::picture_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Pictures")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(paths::APP_DIR_NAME)
}

/// Where captures wait until they are saved or discarded
pub fn capture_cache_directory() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(paths::APP_DIR_NAME)
        .join(paths::CAPTURE_SUBDIR)
}

/// Photos saved as plain files in a directory
#[derive(Debug, Clone)]
pub struct PicturesLibrary {
    dir: PathBuf,
}

impl PicturesLibrary {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl MediaStore for PicturesLibrary {
    fn persist(&self, photo: &PhotoRef) -> BoxFuture<'static, Result<PathBuf, StorageError>> {
        Box::pin(save_to_library(photo.clone(), self.dir.clone()))
    }
}

/// IMG_<timestamp>.<ext>, or IMG_<timestamp>_<n>.<ext> for the n-th collision
pub fn photo_file_name(timestamp: &str, extension: &str, attempt: u32) -> String {
    if attempt == 0 {
        format!("{}{}.{}", paths::PHOTO_PREFIX, timestamp, extension)
    } else {
        format!("{}{}_{}.{}", paths::PHOTO_PREFIX, timestamp, attempt, extension)
    }
}

/// Move a capture into `library_dir` under a timestamped name
pub async fn save_to_library(photo: PhotoRef, library_dir: PathBuf) -> Result<PathBuf, StorageError> {
    let source = photo.path().to_path_buf();
    if !tokio::fs::try_exists(&source).await? {
        return Err(StorageError::SourceMissing(source));
    }

    tokio::fs::create_dir_all(&library_dir).await?;

    let timestamp = chrono::Local::now()
        .format(paths::PHOTO_TIMESTAMP_FORMAT)
        .to_string();
    let mut attempt = 0;
    let target = loop {
        let candidate = library_dir.join(photo_file_name(&timestamp, photo.extension(), attempt));
        if !tokio::fs::try_exists(&candidate).await? {
            break candidate;
        }
        attempt += 1;
    };

    move_file(&source, &target).await?;

    info!(path = %target.display(), "Photo saved to library");
    Ok(target)
}

/// Move a capture to an exact path, replacing what is there
pub async fn move_capture(photo: &PhotoRef, target: &Path) -> Result<(), StorageError> {
    let source = photo.path();
    if !tokio::fs::try_exists(source).await? {
        return Err(StorageError::SourceMissing(source.to_path_buf()));
    }
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    move_file(source, target).await?;
    info!(path = %target.display(), "Photo saved");
    Ok(())
}

async fn move_file(source: &Path, target: &Path) -> Result<(), StorageError> {
    // rename fails across filesystems (cache and pictures may differ)
    if let Err(e) = tokio::fs::rename(source, target).await {
        debug!(error = %e, "Rename failed, copying instead");
        tokio::fs::copy(source, target).await?;
        tokio::fs::remove_file(source).await?;
    }
    Ok(())
}

/// Delete a capture that will not be saved
pub async fn discard_capture(photo: PhotoRef) {
    match tokio::fs::remove_file(photo.path()).await {
        Ok(()) => debug!(path = %photo.path().display(), "Capture discarded"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %photo.path().display(), error = %e, "Failed to discard capture"),
    }
}

/// Remove captures left behind by a previous run, returning how many were removed
pub async fn clear_capture_cache(capture_dir: PathBuf) -> usize {
    let Ok(mut entries) = tokio::fs::read_dir(&capture_dir).await else {
        return 0;
    };

    let mut removed = 0;
    while let Ok(Some(entry)) = entries.next_entry().await {
        let is_capture = entry
            .file_name()
            .to_string_lossy()
            .starts_with(paths::CAPTURE_PREFIX);
        if is_capture && tokio::fs::remove_file(entry.path()).await.is_ok() {
            removed += 1;
        }
    }

    if removed > 0 {
        info!(removed, dir = %capture_dir.display(), "Cleared stale captures");
    }
    removed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("shutter-{}-{}", name, uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_photo_file_name() {
        assert_eq!(photo_file_name("20260101_120000", "jpg", 0), "IMG_20260101_120000.jpg");
        assert_eq!(photo_file_name("20260101_120000", "png", 2), "IMG_20260101_120000_2.png");
    }

    #[tokio::test]
    async fn test_save_moves_capture_into_library() {
        let cache = scratch_dir("cache");
        let library = scratch_dir("library");
        std::fs::create_dir_all(&cache).unwrap();
        let source = cache.join("capture_test.jpg");
        std::fs::write(&source, b"jpeg").unwrap();

        let saved = PicturesLibrary::new(library.clone())
            .persist(&PhotoRef::new(&source))
            .await
            .unwrap();

        assert!(saved.starts_with(&library));
        assert!(!source.exists());
        assert_eq!(std::fs::read(&saved).unwrap(), b"jpeg");
        assert_eq!(saved.extension().unwrap(), "jpg");

        let _ = std::fs::remove_dir_all(cache);
        let _ = std::fs::remove_dir_all(library);
    }

    #[tokio::test]
    async fn test_save_does_not_overwrite_existing_photo() {
        let cache = scratch_dir("cache");
        let library = scratch_dir("library");
        std::fs::create_dir_all(&cache).unwrap();

        let first = cache.join("capture_a.jpg");
        let second = cache.join("capture_b.jpg");
        std::fs::write(&first, b"a").unwrap();
        std::fs::write(&second, b"b").unwrap();

        let store = PicturesLibrary::new(library.clone());
        let saved_a = store.persist(&PhotoRef::new(&first)).await.unwrap();
        let saved_b = store.persist(&PhotoRef::new(&second)).await.unwrap();

        assert_ne!(saved_a, saved_b);
        assert_eq!(std::fs::read(&saved_a).unwrap(), b"a");
        assert_eq!(std::fs::read(&saved_b).unwrap(), b"b");

        let _ = std::fs::remove_dir_all(cache);
        let _ = std::fs::remove_dir_all(library);
    }

    #[tokio::test]
    async fn test_missing_capture_is_reported() {
        let missing = scratch_dir("missing").join("capture_gone.jpg");
        let result = save_to_library(PhotoRef::new(&missing), scratch_dir("library")).await;
        assert_eq!(result, Err(StorageError::SourceMissing(missing)));
    }

    #[tokio::test]
    async fn test_move_capture_to_exact_path() {
        let cache = scratch_dir("cache");
        std::fs::create_dir_all(&cache).unwrap();
        let source = cache.join("capture_exact.png");
        std::fs::write(&source, b"png").unwrap();

        let target = scratch_dir("out").join("nested").join("shot.png");
        move_capture(&PhotoRef::new(&source), &target).await.unwrap();

        assert!(!source.exists());
        assert_eq!(std::fs::read(&target).unwrap(), b"png");

        let _ = std::fs::remove_dir_all(cache);
        let _ = std::fs::remove_dir_all(target.parent().unwrap().parent().unwrap());
    }

    #[tokio::test]
    async fn test_clear_capture_cache_only_removes_captures() {
        let dir = scratch_dir("cache");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("capture_1.jpg"), b"x").unwrap();
        std::fs::write(dir.join("capture_2.png"), b"x").unwrap();
        std::fs::write(dir.join("notes.txt"), b"x").unwrap();

        assert_eq!(clear_capture_cache(dir.clone()).await, 2);
        assert!(dir.join("notes.txt").exists());

        discard_capture(PhotoRef::new(dir.join("capture_1.jpg"))).await;

        let _ = std::fs::remove_dir_all(dir);
    }
}
