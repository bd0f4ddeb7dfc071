// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use serde::{Deserialize, Serialize};

/// Still photo quality presets
///
/// Only affects lossy formats. PNG output ignores the preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PhotoQuality {
    /// Small files, visible artefacts
    Low,
    /// Balanced quality and file size
    Medium,
    /// Default
    #[default]
    High,
    /// Minimal compression
    Maximum,
}

impl PhotoQuality {
    /// All presets, lowest first, for settings dropdowns
    pub const ALL: [PhotoQuality; 4] = [
        PhotoQuality::Low,
        PhotoQuality::Medium,
        PhotoQuality::High,
        PhotoQuality::Maximum,
    ];

    /// Get display name for the preset
    pub fn display_name(&self) -> &'static str {
        match self {
            PhotoQuality::Low => "Low",
            PhotoQuality::Medium => "Medium",
            PhotoQuality::High => "High",
            PhotoQuality::Maximum => "Maximum",
        }
    }

    /// JPEG quality value (0-100)
    pub fn jpeg_quality(&self) -> u8 {
        match self {
            PhotoQuality::Low => 60,
            PhotoQuality::Medium => 80,
            PhotoQuality::High => 92,
            PhotoQuality::Maximum => 98,
        }
    }
}

/// UI dimensions
pub mod ui {
    /// Diameter of the round shutter button on the viewfinder
    pub const CAPTURE_BUTTON_SIZE: f32 = 70.0;

    /// Distance between the shutter button and the bottom edge
    pub const CAPTURE_BUTTON_BOTTOM_MARGIN: f32 = 50.0;

    /// Width of the text buttons ("Take Picture", "Re-take", "Save photo")
    pub const ACTION_BUTTON_WIDTH: f32 = 130.0;

    /// Height of the text buttons
    pub const ACTION_BUTTON_HEIGHT: f32 = 40.0;

    /// Corner radius of the text buttons
    pub const ACTION_BUTTON_RADIUS: f32 = 4.0;

    /// Padding around the preview buttons
    pub const PREVIEW_PADDING: u16 = 15;

    /// Text size on the preview buttons
    pub const PREVIEW_BUTTON_TEXT_SIZE: u16 = 20;

    /// Background of the "Take Picture" button (#14274e)
    pub const START_BUTTON_COLOR: [f32; 3] = [0.078, 0.153, 0.306];
}

/// GStreamer pipeline settings
pub mod pipeline {
    /// Maximum buffer queue size (keep small for low latency)
    pub const MAX_BUFFERS: u32 = 2;

    /// Get number of threads for videoconvert based on available CPU threads
    pub fn videoconvert_threads() -> u32 {
        std::thread::available_parallelism()
            .map(|n| n.get() as u32)
            .unwrap_or(4)
    }

    /// Output pixel format for appsink
    pub const OUTPUT_FORMAT: &str = "RGBA";
}

/// Timing constants
pub mod timing {
    /// Frame counter modulo for periodic logging
    pub const FRAME_LOG_INTERVAL: u64 = 30;

    /// Pipeline playing state timeout on start
    pub const START_TIMEOUT_SECS: u64 = 5;

    /// An unanswered camera permission prompt counts as denied after this
    pub const PERMISSION_TIMEOUT_SECS: u64 = 120;

    /// Frames delivered before this are ignored by headless capture (auto exposure settles)
    pub const WARMUP_MS: u64 = 500;

    /// Headless capture gives up if no frame arrives within this window
    pub const FIRST_FRAME_TIMEOUT_SECS: u64 = 5;
}

/// File and directory naming
pub mod paths {
    /// Directory name used below the cache and pictures directories
    pub const APP_DIR_NAME: &str = "shutter";

    /// Subdirectory of the cache directory holding unsaved captures
    pub const CAPTURE_SUBDIR: &str = "captures";

    /// File name prefix of unsaved captures
    pub const CAPTURE_PREFIX: &str = "capture_";

    /// File name prefix of photos saved to the library
    pub const PHOTO_PREFIX: &str = "IMG_";

    /// Timestamp layout used in saved photo names
    pub const PHOTO_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
}

/// Application information
pub mod app_info {
    use std::path::Path;

    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }

    /// Check if the application is running inside a Flatpak sandbox
    pub fn is_flatpak() -> bool {
        Path::new("/.flatpak-info").exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_quality_is_high() {
        assert_eq!(PhotoQuality::default(), PhotoQuality::High);
        assert_eq!(PhotoQuality::default().jpeg_quality(), 92);
    }
}
