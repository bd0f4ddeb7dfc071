// SPDX-License-Identifier: GPL-3.0-only

//! Capture flow handlers
//!
//! Bridges messages to [`CaptureFlow`](crate::app::flow::CaptureFlow) and turns
//! its answers into tasks and dialogs.

use crate::app::flow::{Screen, StartAction};
use crate::app::state::{AppModel, DialogPage, Message};
use crate::backends::camera::types::{CameraFrame, CapturedPhoto, Permission};
use crate::errors::{AppError, CameraError, PhotoError, StorageError};
use crate::fl;
use crate::pipelines::photo::PhotoPipeline;
use crate::storage;
use cosmic::Task;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

impl AppModel {
    // =========================================================================
    // Camera Start
    // =========================================================================

    pub(crate) fn handle_take_picture(&mut self) -> Task<cosmic::Action<Message>> {
        let action = self.flow.request_start(self.backend.as_ref());
        self.apply_start_action(action)
    }

    pub(crate) fn handle_permission_resolved(
        &mut self,
        permission: Permission,
    ) -> Task<cosmic::Action<Message>> {
        info!(?permission, "Camera permission resolved");
        self.viewfinder = None;

        if let Err(e) = self
            .flow
            .permission_resolved(permission, self.backend.as_ref())
        {
            self.show_camera_error(e);
        }
        Task::none()
    }

    fn apply_start_action(
        &mut self,
        action: Result<StartAction, CameraError>,
    ) -> Task<cosmic::Action<Message>> {
        match action {
            Ok(StartAction::RequestPermission) => {
                debug!("Requesting camera permission");
                Task::perform(self.backend.request_permission(), |permission| {
                    cosmic::Action::App(Message::PermissionResolved(permission))
                })
            }
            Ok(StartAction::Started) => {
                self.viewfinder = None;
                Task::none()
            }
            Ok(StartAction::Ignored) => Task::none(),
            Err(e) => {
                self.show_camera_error(e);
                Task::none()
            }
        }
    }

    fn show_camera_error(&mut self, error: CameraError) {
        self.dialog_page = Some(camera_error_dialog(error));
    }

    // =========================================================================
    // Viewfinder
    // =========================================================================

    pub(crate) fn handle_viewfinder_frame(
        &mut self,
        generation: u64,
        frame: Arc<CameraFrame>,
    ) -> Task<cosmic::Action<Message>> {
        // Frames still queued from a released session are dropped
        if generation == self.flow.session_generation() && self.flow.screen() == Screen::Live {
            self.viewfinder = Some(viewfinder_handle(&frame, self.config.mirror_preview));
        }
        Task::none()
    }

    // =========================================================================
    // Capture / Re-take / Save
    // =========================================================================

    pub(crate) fn handle_capture(&mut self) -> Task<cosmic::Action<Message>> {
        let pipeline = PhotoPipeline::from_config(&self.config, self.capture_dir.clone());

        match self.flow.capture(&pipeline) {
            Some(capture) => {
                info!("Capturing photo");
                Task::perform(capture, |result| {
                    cosmic::Action::App(Message::PhotoCaptured(result))
                })
            }
            None => Task::none(),
        }
    }

    pub(crate) fn handle_photo_captured(
        &mut self,
        result: Result<CapturedPhoto, PhotoError>,
    ) -> Task<cosmic::Action<Message>> {
        let outcome = self.flow.photo_captured(result);

        if self.flow.preview_visible() {
            self.viewfinder = None;
        }
        if let Err(e) = outcome {
            self.dialog_page = Some(DialogPage::Error(
                fl!("capture-failed", error = e.to_string()),
            ));
        }

        self.discard_dropped_photos()
    }

    pub(crate) fn handle_retake(&mut self) -> Task<cosmic::Action<Message>> {
        let action = self.flow.retake(self.backend.as_ref());
        let discard = self.discard_dropped_photos();
        let start = self.apply_start_action(action);
        Task::batch([discard, start])
    }

    pub(crate) fn handle_save_photo(&mut self) -> Task<cosmic::Action<Message>> {
        let Some(photo) = self.flow.save() else {
            return Task::none();
        };

        info!(path = %photo.path().display(), "Saving photo");
        Task::perform(self.store.persist(&photo), |result| {
            cosmic::Action::App(Message::PhotoSaved(result))
        })
    }

    pub(crate) fn handle_photo_saved(
        &mut self,
        result: Result<PathBuf, StorageError>,
    ) -> Task<cosmic::Action<Message>> {
        match self.flow.save_finished(result, self.backend.as_ref()) {
            Ok(action) => self.apply_start_action(Ok(action)),
            Err(AppError::Camera(e)) => {
                self.show_camera_error(e);
                Task::none()
            }
            Err(e) => {
                self.dialog_page = Some(DialogPage::Error(
                    fl!("save-failed", error = e.to_string()),
                ));
                Task::none()
            }
        }
    }

    /// Delete the cache files of photos the flow let go of
    fn discard_dropped_photos(&mut self) -> Task<cosmic::Action<Message>> {
        let discarded = self.flow.take_discarded();
        if discarded.is_empty() {
            return Task::none();
        }

        Task::perform(
            async move {
                for photo in discarded {
                    storage::discard_capture(photo).await;
                }
            },
            |_| cosmic::Action::App(Message::CapturesDiscarded),
        )
    }
}

/// Image handle for a preview frame, flipped horizontally when mirroring
/// Dialog raised for a camera start failure
fn camera_error_dialog(error: CameraError) -> DialogPage {
    match error {
        CameraError::PermissionDenied => DialogPage::AccessDenied,
        other => DialogPage::Error(other.to_string()),
    }
}

fn viewfinder_handle(frame: &CameraFrame, mirror: bool) -> cosmic::widget::image::Handle {
    let mut pixels = frame.packed_rgba();
    if mirror {
        mirror_rows(&mut pixels, frame.width as usize);
    }
    cosmic::widget::image::Handle::from_rgba(frame.width, frame.height, pixels)
}

fn mirror_rows(pixels: &mut [u8], width: usize) {
    if width == 0 {
        return;
    }
    for row in pixels.chunks_exact_mut(width * 4) {
        for x in 0..width / 2 {
            let mirrored = width - 1 - x;
            for c in 0..4 {
                row.swap(x * 4 + c, mirrored * 4 + c);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirror_rows_swaps_columns() {
        // 3x2: columns a b c on both rows
        let mut pixels = vec![
            1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, //
            4, 4, 4, 4, 5, 5, 5, 5, 6, 6, 6, 6,
        ];
        mirror_rows(&mut pixels, 3);
        assert_eq!(
            pixels,
            vec![
                3, 3, 3, 3, 2, 2, 2, 2, 1, 1, 1, 1, //
                6, 6, 6, 6, 5, 5, 5, 5, 4, 4, 4, 4,
            ]
        );
    }

    #[test]
    fn test_denied_permission_raises_access_dialog() {
        assert_eq!(
            camera_error_dialog(CameraError::PermissionDenied),
            DialogPage::AccessDenied
        );
    }

    #[test]
    fn test_other_camera_errors_raise_error_dialog() {
        assert_eq!(
            camera_error_dialog(CameraError::SessionFailed("device busy".into())),
            DialogPage::Error(CameraError::SessionFailed("device busy".into()).to_string())
        );
        assert!(matches!(
            camera_error_dialog(CameraError::NoCameraFound),
            DialogPage::Error(_)
        ));
    }

    #[test]
    fn test_mirror_rows_empty_frame() {
        let mut pixels = Vec::new();
        mirror_rows(&mut pixels, 0);
        assert!(pixels.is_empty());
    }
}
