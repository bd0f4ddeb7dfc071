// SPDX-License-Identifier: GPL-3.0-only

//! Capture flow state machine
//!
//! ```text
//!            request_start / permission_resolved(Granted)
//!   Idle ───────────────────────────────────────────────▶ Live
//!    ▲                                                     │ capture → photo_captured
//!    │ permission denied                                   ▼
//!    └── (stays Idle)               Live ◀── retake ── Preview
//!                                   Live ◀── save → save_finished(Ok)
//! ```
//!
//! The camera session is owned by the `Live` state, so leaving Live always
//! releases the camera. Asynchronous work (permission prompt, encoding,
//! persisting) is done by the caller; the flow only decides what the results
//! mean for the current state.

use crate::backends::camera::{
    CameraBackend, CameraDevice, CameraSession, CapturedPhoto, Permission, PhotoRef,
};
use crate::errors::{AppError, CameraError, PhotoError, StorageError};
use crate::pipelines::photo::PhotoPipeline;
use futures::future::BoxFuture;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Which of the three screens is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// "Take Picture" button
    Idle,
    /// Viewfinder with the shutter button
    Live,
    /// Captured photo with "Re-take" and "Save photo"
    Preview,
}

/// What the caller has to do after asking the flow to start the camera
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartAction {
    /// Run [`CameraBackend::request_permission`] and report the answer
    /// through [`CaptureFlow::permission_resolved`]
    RequestPermission,
    /// Permission was granted earlier; the session is already running
    Started,
    /// Nothing to do (camera already running, prompt already open, ...)
    Ignored,
}

enum FlowState {
    Idle,
    Live {
        session: Box<dyn CameraSession>,
        capturing: bool,
    },
    Preview {
        photo: CapturedPhoto,
        saving: bool,
    },
}

/// The view controller behind the three screens
pub struct CaptureFlow {
    state: FlowState,
    device: CameraDevice,
    permission_granted: bool,
    permission_pending: bool,
    session_generation: u64,
    discarded: Vec<PhotoRef>,
}

impl CaptureFlow {
    pub fn new(device: CameraDevice) -> Self {
        Self {
            state: FlowState::Idle,
            device,
            permission_granted: false,
            permission_pending: false,
            session_generation: 0,
            discarded: Vec::new(),
        }
    }

    // ===== State queries =====

    pub fn screen(&self) -> Screen {
        match self.state {
            FlowState::Idle => Screen::Idle,
            FlowState::Live { .. } => Screen::Live,
            FlowState::Preview { .. } => Screen::Preview,
        }
    }

    /// Camera started: Live, or Preview of a photo taken while Live
    pub fn camera_started(&self) -> bool {
        !matches!(self.state, FlowState::Idle)
    }

    pub fn preview_visible(&self) -> bool {
        matches!(self.state, FlowState::Preview { .. })
    }

    pub fn photo(&self) -> Option<&CapturedPhoto> {
        match &self.state {
            FlowState::Preview { photo, .. } => Some(photo),
            _ => None,
        }
    }

    /// The live session, only while Live
    pub fn session(&self) -> Option<&dyn CameraSession> {
        match &self.state {
            FlowState::Live { session, .. } => Some(session.as_ref()),
            _ => None,
        }
    }

    /// Increments every time a session starts; identifies the preview stream
    pub fn session_generation(&self) -> u64 {
        self.session_generation
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.state, FlowState::Live { capturing: true, .. })
    }

    pub fn is_saving(&self) -> bool {
        matches!(self.state, FlowState::Preview { saving: true, .. })
    }

    pub fn is_permission_pending(&self) -> bool {
        self.permission_pending
    }

    pub fn device(&self) -> &CameraDevice {
        &self.device
    }

    /// Photos dropped by the flow whose cache files should be deleted
    pub fn take_discarded(&mut self) -> Vec<PhotoRef> {
        std::mem::take(&mut self.discarded)
    }

    // ===== Transitions =====

    /// "Take Picture": start the camera, asking for permission first if needed
    pub fn request_start(
        &mut self,
        backend: &dyn CameraBackend,
    ) -> Result<StartAction, CameraError> {
        if self.camera_started() || self.permission_pending {
            return Ok(StartAction::Ignored);
        }

        if self.permission_granted {
            self.start_session(backend)?;
            return Ok(StartAction::Started);
        }

        self.permission_pending = true;
        Ok(StartAction::RequestPermission)
    }

    /// Apply the answer of a permission prompt
    ///
    /// Denied leaves the flow Idle and returns `PermissionDenied` for the
    /// alert. Granted starts the session.
    pub fn permission_resolved(
        &mut self,
        permission: Permission,
        backend: &dyn CameraBackend,
    ) -> Result<(), CameraError> {
        self.permission_pending = false;

        match permission {
            Permission::Denied => {
                info!("Camera access denied");
                self.permission_granted = false;
                Err(CameraError::PermissionDenied)
            }
            Permission::Granted => {
                self.permission_granted = true;
                if self.camera_started() {
                    debug!("Permission granted while camera already started");
                    return Ok(());
                }
                self.start_session(backend)
            }
        }
    }

    /// Shutter pressed: the capture future of the live session
    ///
    /// `None` when there is no session or a capture is already running.
    pub fn capture(
        &mut self,
        pipeline: &PhotoPipeline,
    ) -> Option<BoxFuture<'static, Result<CapturedPhoto, PhotoError>>> {
        match &mut self.state {
            FlowState::Live { session, capturing } if !*capturing => {
                *capturing = true;
                Some(session.capture_still(pipeline.clone()))
            }
            FlowState::Live { .. } => {
                debug!("Capture already in progress");
                None
            }
            _ => {
                debug!("Capture ignored, no active session");
                None
            }
        }
    }

    /// Apply the result of a capture
    ///
    /// On success the session is released and the photo shown. A photo that
    /// arrives after the flow left Live is discarded.
    pub fn photo_captured(
        &mut self,
        result: Result<CapturedPhoto, PhotoError>,
    ) -> Result<(), PhotoError> {
        let capturing = self.is_capturing();

        match result {
            Ok(photo) if capturing => {
                info!(
                    width = photo.width,
                    height = photo.height,
                    path = %photo.reference.path().display(),
                    "Previewing captured photo"
                );
                self.state = FlowState::Preview {
                    photo,
                    saving: false,
                };
                Ok(())
            }
            Ok(photo) => {
                debug!("Stale capture result, discarding");
                self.discarded.push(photo.reference);
                Ok(())
            }
            Err(e) => {
                if let FlowState::Live { capturing, .. } = &mut self.state {
                    *capturing = false;
                }
                warn!(error = %e, "Capture failed");
                if capturing { Err(e) } else { Ok(()) }
            }
        }
    }

    /// "Re-take": drop the photo and go back to the viewfinder
    pub fn retake(&mut self, backend: &dyn CameraBackend) -> Result<StartAction, CameraError> {
        match &self.state {
            FlowState::Preview { saving: false, .. } => {}
            FlowState::Preview { .. } => {
                debug!("Retake ignored while saving");
                return Ok(StartAction::Ignored);
            }
            _ => return Ok(StartAction::Ignored),
        }

        if let FlowState::Preview { photo, .. } =
            std::mem::replace(&mut self.state, FlowState::Idle)
        {
            info!("Discarding photo for retake");
            self.discarded.push(photo.reference);
        }

        self.request_start(backend)
    }

    /// "Save photo": the reference to persist, `None` if there is nothing to save
    pub fn save(&mut self) -> Option<PhotoRef> {
        match &mut self.state {
            FlowState::Preview { photo, saving } if !*saving => {
                *saving = true;
                Some(photo.reference.clone())
            }
            _ => None,
        }
    }

    /// Apply the result of persisting the photo
    ///
    /// Success drops the photo and restarts the viewfinder. Failure keeps the
    /// photo on screen so the user can try again or re-take.
    pub fn save_finished(
        &mut self,
        result: Result<PathBuf, StorageError>,
        backend: &dyn CameraBackend,
    ) -> Result<StartAction, AppError> {
        if !self.is_saving() {
            debug!("Save result without a save in progress");
            return Ok(StartAction::Ignored);
        }

        match result {
            Ok(path) => {
                info!(path = %path.display(), "Photo persisted");
                self.state = FlowState::Idle;
                Ok(self.request_start(backend)?)
            }
            Err(e) => {
                warn!(error = %e, "Persisting photo failed, keeping preview");
                if let FlowState::Preview { saving, .. } = &mut self.state {
                    *saving = false;
                }
                Err(e.into())
            }
        }
    }

    /// Use another camera, restarting the session if one is running
    pub fn select_device(
        &mut self,
        device: CameraDevice,
        backend: &dyn CameraBackend,
    ) -> Result<(), CameraError> {
        if device == self.device {
            return Ok(());
        }

        info!(device = %device, "Selecting camera");
        self.device = device;

        if matches!(self.state, FlowState::Live { capturing: false, .. }) {
            // Release the old camera before opening the new one
            self.state = FlowState::Idle;
            self.start_session(backend)?;
        }

        Ok(())
    }

    /// Release the camera and drop any photo
    pub fn stop(&mut self) {
        if let FlowState::Preview { photo, .. } =
            std::mem::replace(&mut self.state, FlowState::Idle)
        {
            self.discarded.push(photo.reference);
        }
    }

    fn start_session(&mut self, backend: &dyn CameraBackend) -> Result<(), CameraError> {
        match backend.start_session(&self.device) {
            Ok(session) => {
                self.session_generation += 1;
                info!(
                    device = %self.device,
                    generation = self.session_generation,
                    "Camera live"
                );
                self.state = FlowState::Live {
                    session,
                    capturing: false,
                };
                Ok(())
            }
            Err(e) => {
                warn!(device = %self.device, error = %e, "Failed to start camera session");
                self.state = FlowState::Idle;
                Err(e.into())
            }
        }
    }
}
