// SPDX-License-Identifier: MPL-2.0

//! Integration tests for configuration module

use shutter::Config;
use shutter::config::{AppTheme, PhotoOutputFormat};
use shutter::constants::PhotoQuality;

#[test]
fn test_config_default() {
    let config = Config::default();

    assert!(
        config.mirror_preview,
        "Mirror preview should be enabled by default"
    );
    assert_eq!(config.app_theme, AppTheme::System);
    assert_eq!(config.photo_format, PhotoOutputFormat::Jpeg);
    assert_eq!(config.photo_quality, PhotoQuality::High);
    assert!(config.last_camera_path.is_none());
}

#[test]
fn test_library_directory_uses_override() {
    let config = Config {
        save_directory: Some("/tmp/shutter-override".into()),
        ..Config::default()
    };
    assert_eq!(
        config.library_directory(),
        std::path::PathBuf::from("/tmp/shutter-override")
    );
}

#[test]
fn test_default_library_directory_is_app_subdirectory() {
    let dir = Config::default().library_directory();
    assert!(
        dir.ends_with("shutter"),
        "Default library should be a shutter folder, got {}",
        dir.display()
    );
}

#[test]
fn test_dropdown_orders_cover_all_variants() {
    assert_eq!(AppTheme::ALL.len(), 3);
    assert_eq!(PhotoOutputFormat::ALL.len(), 2);
    assert!(AppTheme::ALL.contains(&AppTheme::default()));
    assert!(PhotoOutputFormat::ALL.contains(&PhotoOutputFormat::default()));
}
