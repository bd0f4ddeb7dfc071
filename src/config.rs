// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::PhotoQuality;
use cosmic::cosmic_config::{self, CosmicConfigEntry, cosmic_config_derive::CosmicConfigEntry};
use cosmic::{Theme, theme};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::error;

/// Application theme preference
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum AppTheme {
    /// Follow system theme (dark or light based on system setting)
    #[default]
    System,
    /// Always use dark theme
    Dark,
    /// Always use light theme
    Light,
}

impl AppTheme {
    /// Order used by the settings dropdown
    pub const ALL: [AppTheme; 3] = [AppTheme::System, AppTheme::Dark, AppTheme::Light];

    /// Get the COSMIC theme for this app theme preference
    pub fn theme(&self) -> Theme {
        match self {
            Self::Dark => {
                let mut theme = theme::system_dark();
                theme.theme_type.prefer_dark(Some(true));
                theme
            }
            Self::Light => {
                let mut theme = theme::system_light();
                theme.theme_type.prefer_dark(Some(false));
                theme
            }
            Self::System => theme::system_preference(),
        }
    }
}

/// File format of saved photos
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum PhotoOutputFormat {
    #[default]
    Jpeg,
    Png,
}

impl PhotoOutputFormat {
    pub const ALL: [PhotoOutputFormat; 2] = [PhotoOutputFormat::Jpeg, PhotoOutputFormat::Png];

    pub fn display_name(&self) -> &'static str {
        match self {
            PhotoOutputFormat::Jpeg => "JPEG",
            PhotoOutputFormat::Png => "PNG",
        }
    }
}

#[derive(Debug, Clone, CosmicConfigEntry, Eq, PartialEq, Serialize, Deserialize)]
#[version = 1]
pub struct Config {
    /// Application theme preference (System, Dark, Light)
    pub app_theme: AppTheme,
    /// Last used camera device path (empty = PipeWire default camera)
    pub last_camera_path: Option<String>,
    /// Mirror camera preview and captured stills horizontally (selfie mode)
    pub mirror_preview: bool,
    /// Encoding of saved photos
    pub photo_format: PhotoOutputFormat,
    /// JPEG quality preset
    pub photo_quality: PhotoQuality,
    /// Picture library override; `None` uses ~/Pictures/shutter
    pub save_directory: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_theme: AppTheme::default(),
            last_camera_path: None,
            mirror_preview: true,
            photo_format: PhotoOutputFormat::default(),
            photo_quality: PhotoQuality::default(),
            save_directory: None,
        }
    }
}

impl Config {
    /// Open the config handler for `app_id` and read the stored settings
    ///
    /// Read errors are logged and the affected fields fall back to defaults.
    pub fn load(app_id: &str) -> (Option<cosmic_config::Config>, Config) {
        match cosmic_config::Config::new(app_id, Self::VERSION) {
            Ok(handler) => {
                let config = match Self::get_entry(&handler) {
                    Ok(config) => config,
                    Err((errors, config)) => {
                        error!(?errors, "Errors loading config");
                        config
                    }
                };
                (Some(handler), config)
            }
            Err(err) => {
                error!(%err, "Failed to create config handler");
                (None, Self::default())
            }
        }
    }

    /// Directory photos are saved to
    pub fn library_directory(&self) -> PathBuf {
        self.save_directory
            .clone()
            .unwrap_or_else(crate::storage::default_library_directory)
    }
}
