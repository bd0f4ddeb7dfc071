// SPDX-License-Identifier: GPL-3.0-only

//! Message update handling
//!
//! The `update()` function only routes messages; the handling code lives in
//! the `handlers` submodules:
//!
//! - `handlers::capture`: permission, viewfinder, capture, re-take, save
//! - `handlers::system`: camera selection, settings, dialogs, navigation

use crate::app::state::{AppModel, Message};
use cosmic::Task;

impl AppModel {
    /// Main message handler - routes messages to appropriate handler methods.
    pub fn update(&mut self, message: Message) -> Task<cosmic::Action<Message>> {
        match message {
            // ===== UI Navigation =====
            Message::LaunchUrl(url) => self.handle_launch_url(url),
            Message::ToggleContextPage(page) => self.handle_toggle_context_page(page),
            Message::CloseDialog => self.handle_close_dialog(),

            // ===== Capture Flow =====
            Message::TakePicture => self.handle_take_picture(),
            Message::PermissionResolved(permission) => {
                self.handle_permission_resolved(permission)
            }
            Message::ViewfinderFrame(generation, frame) => {
                self.handle_viewfinder_frame(generation, frame)
            }
            Message::Capture => self.handle_capture(),
            Message::PhotoCaptured(result) => self.handle_photo_captured(result),
            Message::Retake => self.handle_retake(),
            Message::SavePhoto => self.handle_save_photo(),
            Message::PhotoSaved(result) => self.handle_photo_saved(result),
            Message::CapturesDiscarded => Task::none(),

            // ===== Camera Selection =====
            Message::CamerasEnumerated(cameras) => self.handle_cameras_enumerated(cameras),
            Message::SelectCamera(index) => self.handle_select_camera(index),

            // ===== Settings =====
            Message::UpdateConfig(config) => self.handle_update_config(config),
            Message::SetAppTheme(index) => self.handle_set_app_theme(index),
            Message::ToggleMirrorPreview => self.handle_toggle_mirror_preview(),
            Message::SelectPhotoFormat(index) => self.handle_select_photo_format(index),
            Message::SelectPhotoQuality(index) => self.handle_select_photo_quality(index),
            Message::OpenLibraryFolder => self.handle_open_library_folder(),
            Message::CaptureCacheCleared(_) => Task::none(),
        }
    }
}
