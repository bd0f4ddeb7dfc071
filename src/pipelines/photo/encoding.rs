// SPDX-License-Identifier: GPL-3.0-only

//! Async photo encoding
//!
//! JPEG (with quality control) or PNG. Encoding runs on a blocking task.

use super::processing::ProcessedImage;
use crate::backends::camera::types::{CapturedPhoto, PhotoRef};
use crate::config::PhotoOutputFormat;
use crate::constants::{PhotoQuality, paths};
use crate::errors::PhotoError;
use image::{DynamicImage, ImageFormat};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Supported encoding formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodingFormat {
    Jpeg,
    Png,
}

impl EncodingFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            EncodingFormat::Jpeg => "jpg",
            EncodingFormat::Png => "png",
        }
    }
}

impl From<PhotoOutputFormat> for EncodingFormat {
    fn from(format: PhotoOutputFormat) -> Self {
        match format {
            PhotoOutputFormat::Jpeg => EncodingFormat::Jpeg,
            PhotoOutputFormat::Png => EncodingFormat::Png,
        }
    }
}

/// Encoded image data ready for saving
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub format: EncodingFormat,
    pub width: u32,
    pub height: u32,
}

/// Photo encoder
#[derive(Debug, Clone, Copy)]
pub struct PhotoEncoder {
    format: EncodingFormat,
    quality: PhotoQuality,
}

impl PhotoEncoder {
    pub fn new(format: EncodingFormat, quality: PhotoQuality) -> Self {
        Self { format, quality }
    }

    /// Encode a processed image asynchronously
    pub async fn encode(&self, processed: ProcessedImage) -> Result<EncodedImage, PhotoError> {
        let format = self.format;
        let quality = self.quality;

        tokio::task::spawn_blocking(move || {
            let data = match format {
                EncodingFormat::Jpeg => Self::encode_jpeg(processed.image, quality)?,
                EncodingFormat::Png => Self::encode_png(processed.image)?,
            };

            debug!(size = data.len(), ?format, "Encoding complete");

            Ok(EncodedImage {
                data,
                format,
                width: processed.width,
                height: processed.height,
            })
        })
        .await
        .map_err(|e| PhotoError::EncodingFailed(format!("Encoding task error: {}", e)))?
    }

    /// Write an encoded still into the capture cache
    ///
    /// The file stays there until the photo is saved to the library or
    /// discarded.
    pub async fn write_capture(
        &self,
        encoded: EncodedImage,
        capture_dir: &Path,
    ) -> Result<CapturedPhoto, PhotoError> {
        tokio::fs::create_dir_all(capture_dir).await?;

        let path = capture_path(capture_dir, encoded.format);
        tokio::fs::write(&path, &encoded.data).await?;

        info!(
            path = %path.display(),
            width = encoded.width,
            height = encoded.height,
            "Still captured"
        );

        Ok(CapturedPhoto {
            width: encoded.width,
            height: encoded.height,
            reference: PhotoRef::new(path),
        })
    }

    /// JPEG has no alpha channel, so the frame is flattened to RGB first
    fn encode_jpeg(
        image: image::RgbaImage,
        quality: PhotoQuality,
    ) -> Result<Vec<u8>, PhotoError> {
        let rgb = DynamicImage::ImageRgba8(image).to_rgb8();
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);

        let mut encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, quality.jpeg_quality());

        encoder
            .encode(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| PhotoError::EncodingFailed(format!("JPEG encoding failed: {}", e)))?;

        Ok(buffer)
    }

    fn encode_png(image: image::RgbaImage) -> Result<Vec<u8>, PhotoError> {
        let mut buffer = Vec::new();

        image
            .write_to(&mut std::io::Cursor::new(&mut buffer), ImageFormat::Png)
            .map_err(|e| PhotoError::EncodingFailed(format!("PNG encoding failed: {}", e)))?;

        Ok(buffer)
    }
}

/// Unique cache file name: capture_<timestamp>_<random>.<ext>
fn capture_path(capture_dir: &Path, format: EncodingFormat) -> PathBuf {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    capture_dir.join(format!(
        "{}{}_{}.{}",
        paths::CAPTURE_PREFIX,
        timestamp,
        &suffix[..8],
        format.extension()
    ))
}
