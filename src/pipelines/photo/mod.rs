// SPDX-License-Identifier: MPL-2.0

//! Async still capture pipeline
//!
//! ```text
//! Preview frame → Post-Processing → Encoding → Capture cache
//!       ↓
//! CapturedPhoto { width, height, reference }
//! ```
//!
//! Every stage runs off the UI thread. The written file is the photo's
//! reference until it is saved to the library or discarded.

pub mod encoding;
pub mod processing;

pub use encoding::{EncodingFormat, PhotoEncoder};
pub use processing::{PostProcessingConfig, PostProcessor};

use crate::backends::camera::types::{CameraFrame, CapturedPhoto};
use crate::config::Config;
use crate::errors::PhotoError;
use std::path::PathBuf;
use std::sync::Arc;

/// Complete still capture pipeline
#[derive(Debug, Clone)]
pub struct PhotoPipeline {
    post_processor: PostProcessor,
    encoder: PhotoEncoder,
    capture_dir: PathBuf,
}

impl PhotoPipeline {
    pub fn new(
        processing_config: PostProcessingConfig,
        encoder: PhotoEncoder,
        capture_dir: PathBuf,
    ) -> Self {
        Self {
            post_processor: PostProcessor::new(processing_config),
            encoder,
            capture_dir,
        }
    }

    /// Pipeline matching the user's settings, writing into `capture_dir`
    pub fn from_config(config: &Config, capture_dir: PathBuf) -> Self {
        Self::new(
            PostProcessingConfig {
                mirror: config.mirror_preview,
            },
            PhotoEncoder::new(config.photo_format.into(), config.photo_quality),
            capture_dir,
        )
    }

    /// Process, encode and write a frame, returning the captured photo
    pub async fn capture(&self, frame: Arc<CameraFrame>) -> Result<CapturedPhoto, PhotoError> {
        let processed = self.post_processor.process(frame).await?;
        let encoded = self.encoder.encode(processed).await?;
        self.encoder.write_capture(encoded, &self.capture_dir).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhotoOutputFormat;

    #[tokio::test]
    async fn test_capture_writes_file_with_dimensions() {
        let dir = std::env::temp_dir().join(format!("shutter-pipeline-{}", uuid::Uuid::new_v4()));
        let config = Config {
            photo_format: PhotoOutputFormat::Png,
            ..Config::default()
        };
        let pipeline = PhotoPipeline::from_config(&config, dir.clone());

        let frame = Arc::new(CameraFrame::from_rgba(6, 3, vec![128; 6 * 3 * 4]));
        let photo = pipeline.capture(frame).await.unwrap();

        assert_eq!((photo.width, photo.height), (6, 3));
        assert_eq!(photo.reference.extension(), "png");
        assert!(photo.reference.path().starts_with(&dir));

        let decoded = image::open(photo.reference.path()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (6, 3));

        let _ = std::fs::remove_dir_all(dir);
    }
}
