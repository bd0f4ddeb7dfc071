// SPDX-License-Identifier: MPL-2.0

//! Post-processing of captured frames

use crate::backends::camera::types::CameraFrame;
use crate::errors::PhotoError;
use image::RgbaImage;
use std::sync::Arc;
use tracing::debug;

/// Post-processing configuration
#[derive(Debug, Clone, Default)]
pub struct PostProcessingConfig {
    /// Flip horizontally so the still matches the mirrored viewfinder
    pub mirror: bool,
}

/// Processed image data
pub struct ProcessedImage {
    pub image: RgbaImage,
    pub width: u32,
    pub height: u32,
}

/// Post-processor for captured frames
#[derive(Debug, Clone, Default)]
pub struct PostProcessor {
    config: PostProcessingConfig,
}

impl PostProcessor {
    pub fn new(config: PostProcessingConfig) -> Self {
        Self { config }
    }

    /// Turn a raw frame into a packed RGBA image on a blocking thread
    pub async fn process(&self, frame: Arc<CameraFrame>) -> Result<ProcessedImage, PhotoError> {
        let mirror = self.config.mirror;

        tokio::task::spawn_blocking(move || {
            let mut image = RgbaImage::from_raw(frame.width, frame.height, frame.packed_rgba())
                .ok_or_else(|| {
                    PhotoError::EncodingFailed(format!(
                        "Frame buffer too small for {}x{}",
                        frame.width, frame.height
                    ))
                })?;

            if mirror {
                image::imageops::flip_horizontal_in_place(&mut image);
            }

            debug!(width = frame.width, height = frame.height, mirror, "Frame processed");

            Ok(ProcessedImage {
                width: image.width(),
                height: image.height(),
                image,
            })
        })
        .await
        .map_err(|e| PhotoError::EncodingFailed(format!("Processing task error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_pixel_frame() -> Arc<CameraFrame> {
        Arc::new(CameraFrame::from_rgba(
            2,
            1,
            vec![255, 0, 0, 255, 0, 0, 255, 255],
        ))
    }

    #[tokio::test]
    async fn test_mirror_swaps_columns() {
        let processor = PostProcessor::new(PostProcessingConfig { mirror: true });
        let processed = processor.process(two_pixel_frame()).await.unwrap();
        assert_eq!(processed.image.get_pixel(0, 0).0, [0, 0, 255, 255]);
        assert_eq!(processed.image.get_pixel(1, 0).0, [255, 0, 0, 255]);
    }

    #[tokio::test]
    async fn test_truncated_frame_is_rejected() {
        let frame = Arc::new(CameraFrame::from_rgba(4, 4, vec![0; 8]));
        let result = PostProcessor::default().process(frame).await;
        assert!(matches!(result, Err(PhotoError::EncodingFailed(_))));
    }
}
