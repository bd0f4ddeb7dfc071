// SPDX-License-Identifier: GPL-3.0-only
// Shared types for camera backend abstraction

//! Shared types for camera backends

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Represents a camera device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    pub name: String,
    /// Empty = PipeWire default camera, `pipewire-<id>` = PipeWire node,
    /// `/dev/videoN` = V4L2 node
    pub path: String,
}

impl CameraDevice {
    /// The camera PipeWire picks when no target is given
    pub fn pipewire_default() -> Self {
        Self {
            name: "Default Camera".to_string(),
            path: String::new(),
        }
    }

    pub fn is_v4l2(&self) -> bool {
        self.path.starts_with("/dev/video")
    }
}

impl std::fmt::Display for CameraDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} ({})", self.name, self.path)
        }
    }
}

/// A single RGBA frame from the camera
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// Row stride in bytes (may include padding)
    pub stride: u32,
    /// RGBA8 pixels
    pub data: Arc<[u8]>,
    /// Timestamp when frame was captured (for latency diagnostics)
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Build a frame from tightly packed RGBA pixels
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            stride: width * 4,
            data: Arc::from(data),
            captured_at: Instant::now(),
        }
    }

    /// RGBA pixels without row padding
    pub fn packed_rgba(&self) -> Vec<u8> {
        let row_len = self.width as usize * 4;
        if self.stride as usize == row_len {
            return self.data.to_vec();
        }

        let mut packed = Vec::with_capacity(row_len * self.height as usize);
        for row in self.data.chunks(self.stride as usize).take(self.height as usize) {
            packed.extend_from_slice(&row[..row_len.min(row.len())]);
        }
        packed
    }
}

/// Latest-frame stream of a live session; `None` until the first frame arrives
pub type FrameReceiver = tokio::sync::watch::Receiver<Option<Arc<CameraFrame>>>;

/// Producer side of [`FrameReceiver`]
pub type FrameSender = tokio::sync::watch::Sender<Option<Arc<CameraFrame>>>;

/// Outcome of a camera permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Opaque reference to the encoded data of a captured still
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhotoRef(PathBuf);

impl PhotoRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }

    /// File extension of the encoded data, `jpg` when unknown
    pub fn extension(&self) -> &str {
        self.0
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("jpg")
    }
}

/// A still photo held by the capture flow until it is saved or discarded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedPhoto {
    pub width: u32,
    pub height: u32,
    pub reference: PhotoRef,
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error types for backend operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Backend is not available on this system
    NotAvailable(String),
    /// Failed to initialize backend
    InitializationFailed(String),
    /// Camera device not found
    DeviceNotFound(String),
    /// Other errors
    Other(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::NotAvailable(msg) => write!(f, "Backend not available: {}", msg),
            BackendError::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            BackendError::DeviceNotFound(msg) => write!(f, "Device not found: {}", msg),
            BackendError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_rgba_strips_row_padding() {
        // 2x2 frame with 4 bytes of padding per row
        let data: Vec<u8> = vec![
            1, 1, 1, 1, 2, 2, 2, 2, 0, 0, 0, 0, //
            3, 3, 3, 3, 4, 4, 4, 4, 0, 0, 0, 0,
        ];
        let frame = CameraFrame {
            width: 2,
            height: 2,
            stride: 12,
            data: Arc::from(data),
            captured_at: Instant::now(),
        };

        let packed = frame.packed_rgba();
        assert_eq!(packed.len(), 16);
        assert_eq!(&packed[8..12], &[3, 3, 3, 3]);
    }

    #[test]
    fn test_photo_ref_extension() {
        assert_eq!(PhotoRef::new("/tmp/capture_1.png").extension(), "png");
        assert_eq!(PhotoRef::new("/tmp/capture_1").extension(), "jpg");
    }
}
