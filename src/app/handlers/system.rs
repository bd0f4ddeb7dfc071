// SPDX-License-Identifier: GPL-3.0-only

//! System handlers
//!
//! Handles navigation, dialogs, camera selection and settings.

use crate::app::state::{AppModel, ContextPage, DialogPage, Message};
use crate::backends::camera::types::CameraDevice;
use crate::config::{AppTheme, PhotoOutputFormat};
use crate::constants::PhotoQuality;
use crate::storage::PicturesLibrary;
use cosmic::Task;
use std::sync::Arc;
use tracing::{error, info, warn};

impl AppModel {
    // =========================================================================
    // Navigation Handlers
    // =========================================================================

    pub(crate) fn handle_launch_url(&self, url: String) -> Task<cosmic::Action<Message>> {
        if let Err(err) = open::that_detached(&url) {
            error!(url = %url, error = %err, "Failed to open URL");
        }
        Task::none()
    }

    pub(crate) fn handle_toggle_context_page(
        &mut self,
        context_page: ContextPage,
    ) -> Task<cosmic::Action<Message>> {
        if self.context_page == context_page {
            self.core.window.show_context = !self.core.window.show_context;
        } else {
            self.context_page = context_page;
            self.core.window.show_context = true;
        }
        Task::none()
    }

    pub(crate) fn handle_close_dialog(&mut self) -> Task<cosmic::Action<Message>> {
        self.dialog_page = None;
        Task::none()
    }

    // =========================================================================
    // Camera Selection Handlers
    // =========================================================================

    pub(crate) fn handle_cameras_enumerated(
        &mut self,
        cameras: Vec<CameraDevice>,
    ) -> Task<cosmic::Action<Message>> {
        info!(count = cameras.len(), "Cameras enumerated");
        if cameras.is_empty() {
            warn!("No cameras found");
        }

        self.camera_dropdown_options = cameras.iter().map(|c| c.name.clone()).collect();

        // Prefer the remembered camera, then whatever the flow already uses
        let remembered = self.config.last_camera_path.as_deref();
        let current = self.flow.device().path.as_str();
        self.current_camera_index = cameras
            .iter()
            .position(|c| Some(c.path.as_str()) == remembered)
            .or_else(|| cameras.iter().position(|c| c.path == current))
            .unwrap_or(0);
        self.available_cameras = cameras;

        if let Some(device) = self.available_cameras.get(self.current_camera_index).cloned()
            && let Err(e) = self.flow.select_device(device, self.backend.as_ref())
        {
            error!(error = %e, "Failed to switch to enumerated camera");
        }
        Task::none()
    }

    pub(crate) fn handle_select_camera(&mut self, index: usize) -> Task<cosmic::Action<Message>> {
        let Some(device) = self.available_cameras.get(index).cloned() else {
            return Task::none();
        };

        self.current_camera_index = index;
        self.viewfinder = None;
        self.config.last_camera_path = Some(device.path.clone());
        self.save_config("camera");

        if let Err(e) = self.flow.select_device(device, self.backend.as_ref()) {
            self.dialog_page = Some(DialogPage::Error(e.to_string()));
        }
        Task::none()
    }

    // =========================================================================
    // Settings Handlers
    // =========================================================================

    pub(crate) fn handle_update_config(
        &mut self,
        config: crate::config::Config,
    ) -> Task<cosmic::Action<Message>> {
        info!("UpdateConfig received");
        if config.save_directory != self.config.save_directory {
            self.store = Arc::new(PicturesLibrary::new(config.library_directory()));
        }
        let theme_changed = config.app_theme != self.config.app_theme;
        self.config = config;

        if theme_changed {
            cosmic::command::set_theme(self.config.app_theme.theme())
        } else {
            Task::none()
        }
    }

    pub(crate) fn handle_set_app_theme(&mut self, index: usize) -> Task<cosmic::Action<Message>> {
        let Some(&app_theme) = AppTheme::ALL.get(index) else {
            return Task::none();
        };

        info!(?app_theme, "Setting application theme");
        self.config.app_theme = app_theme;
        self.save_config("app theme");

        cosmic::command::set_theme(app_theme.theme())
    }

    pub(crate) fn handle_toggle_mirror_preview(&mut self) -> Task<cosmic::Action<Message>> {
        self.config.mirror_preview = !self.config.mirror_preview;
        info!(mirror = self.config.mirror_preview, "Toggled mirror preview");
        self.save_config("mirror preview");
        Task::none()
    }

    pub(crate) fn handle_select_photo_format(
        &mut self,
        index: usize,
    ) -> Task<cosmic::Action<Message>> {
        if let Some(&format) = PhotoOutputFormat::ALL.get(index) {
            info!(?format, "Selected photo output format");
            self.config.photo_format = format;
            self.save_config("photo format");
        }
        Task::none()
    }

    pub(crate) fn handle_select_photo_quality(
        &mut self,
        index: usize,
    ) -> Task<cosmic::Action<Message>> {
        if let Some(&quality) = PhotoQuality::ALL.get(index) {
            info!(?quality, "Selected photo quality");
            self.config.photo_quality = quality;
            self.save_config("photo quality");
        }
        Task::none()
    }

    pub(crate) fn handle_open_library_folder(&self) -> Task<cosmic::Action<Message>> {
        let dir = self.config.library_directory();

        if let Err(e) = std::fs::create_dir_all(&dir) {
            error!(error = %e, path = %dir.display(), "Failed to create picture folder");
            return Task::none();
        }
        if let Err(e) = open::that_detached(&dir) {
            error!(error = %e, path = %dir.display(), "Failed to open picture folder");
        }
        Task::none()
    }
}
