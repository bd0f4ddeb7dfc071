// SPDX-License-Identifier: MPL-2.0

//! Error types for the camera application

use crate::backends::camera::BackendError;
use std::fmt;
use std::path::PathBuf;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera access or session errors
    Camera(CameraError),
    /// Still capture errors
    Photo(PhotoError),
    /// Picture library errors
    Storage(StorageError),
}

/// Camera-specific errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// The user (or the sandbox) refused camera access
    PermissionDenied,
    /// No camera devices found
    NoCameraFound,
    /// The preview session could not be started
    SessionFailed(String),
}

/// Still capture errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoError {
    /// The session has not delivered a frame yet
    NoFrameAvailable,
    /// Encoding the still failed
    EncodingFailed(String),
    /// Writing the encoded still to the capture cache failed
    SaveFailed(String),
}

/// Picture library errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The captured file disappeared before it could be saved
    SourceMissing(PathBuf),
    /// Filesystem error while moving the photo into the library
    Io(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Photo(e) => write!(f, "Photo error: {}", e),
            AppError::Storage(e) => write!(f, "Storage error: {}", e),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::PermissionDenied => write!(f, "Access denied"),
            CameraError::NoCameraFound => write!(f, "No camera devices found"),
            CameraError::SessionFailed(msg) => write!(f, "Failed to start camera: {}", msg),
        }
    }
}

impl fmt::Display for PhotoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoError::NoFrameAvailable => write!(f, "No frame available for capture"),
            PhotoError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
            PhotoError::SaveFailed(msg) => write!(f, "Save failed: {}", msg),
        }
    }
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::SourceMissing(path) => {
                write!(f, "Captured photo is missing: {}", path.display())
            }
            StorageError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for PhotoError {}
impl std::error::Error for StorageError {}

impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<PhotoError> for AppError {
    fn from(err: PhotoError) -> Self {
        AppError::Photo(err)
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Storage(err)
    }
}

impl From<BackendError> for CameraError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::DeviceNotFound(_) => CameraError::NoCameraFound,
            other => CameraError::SessionFailed(other.to_string()),
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

impl From<std::io::Error> for PhotoError {
    fn from(err: std::io::Error) -> Self {
        PhotoError::SaveFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_message_matches_alert() {
        assert_eq!(CameraError::PermissionDenied.to_string(), "Access denied");
    }

    #[test]
    fn test_backend_errors_map_to_camera_errors() {
        let missing: CameraError = BackendError::DeviceNotFound("/dev/video9".into()).into();
        assert_eq!(missing, CameraError::NoCameraFound);

        let failed: CameraError = BackendError::InitializationFailed("no caps".into()).into();
        assert!(matches!(failed, CameraError::SessionFailed(msg) if msg.contains("no caps")));
    }

    #[test]
    fn test_app_error_wraps_storage_error() {
        let err: AppError = StorageError::Io("disk full".into()).into();
        assert_eq!(err.to_string(), "Storage error: I/O error: disk full");
    }
}
