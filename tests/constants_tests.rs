// SPDX-License-Identifier: MPL-2.0

//! Integration tests for constants module

use shutter::constants::{PhotoQuality, paths, timing};

#[test]
fn test_photo_quality_values() {
    // Low, Medium, High, Maximum
    assert_eq!(PhotoQuality::ALL.len(), 4);
}

#[test]
fn test_photo_quality_ordering() {
    // Presets are ordered from lowest to highest quality
    let mut prev = 0u8;
    for preset in PhotoQuality::ALL {
        let quality = preset.jpeg_quality();
        assert!(
            quality > prev,
            "Presets should be ordered from lowest to highest"
        );
        assert!(quality <= 100);
        prev = quality;
    }
}

#[test]
fn test_photo_quality_display_names() {
    for preset in PhotoQuality::ALL {
        let name = preset.display_name();
        assert!(
            !name.is_empty(),
            "Preset {:?} has empty display name",
            preset
        );
    }
}

#[test]
fn test_capture_and_photo_prefixes_differ() {
    // Clearing the capture cache must never match saved photos
    assert_ne!(paths::CAPTURE_PREFIX, paths::PHOTO_PREFIX);
    assert!(!paths::PHOTO_PREFIX.starts_with(paths::CAPTURE_PREFIX));
}

#[test]
fn test_warmup_shorter_than_first_frame_timeout() {
    assert!(timing::WARMUP_MS < timing::FIRST_FRAME_TIMEOUT_SECS * 1000);
}
