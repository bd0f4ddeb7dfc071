// SPDX-License-Identifier: MPL-2.0

//! Camera backend abstraction
//!
//! The capture flow only talks to the two traits in this module. The
//! GStreamer implementation lives in [`gst`].
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │ CaptureFlow (app)   │
//! └──────────┬──────────┘
//!            │ request_permission / start_session
//!            ▼
//! ┌─────────────────────┐
//! │  CameraBackend      │  ← enumeration, permission
//! └──────────┬──────────┘
//!            │ owns while Live
//!            ▼
//! ┌─────────────────────┐
//! │  CameraSession      │  ← preview frames, still capture
//! └─────────────────────┘
//! ```

pub mod gst;
pub mod permission;
pub mod types;
pub mod v4l2_utils;

pub use types::*;

use crate::errors::PhotoError;
use crate::pipelines::photo::PhotoPipeline;
use futures::future::BoxFuture;
use std::sync::Arc;

/// Camera capability: everything needed before a session exists
pub trait CameraBackend: Send + Sync {
    /// Enumerate available cameras
    fn enumerate_cameras(&self) -> Vec<CameraDevice>;

    /// Ask the platform for camera access
    ///
    /// Resolves once the user (or the portal) has answered. There is no
    /// cancellation; the future always runs to completion.
    fn request_permission(&self) -> BoxFuture<'static, Permission>;

    /// Open the camera and start streaming preview frames
    ///
    /// The returned session owns the device. Dropping it stops the stream and
    /// releases the camera.
    fn start_session(&self, device: &CameraDevice) -> BackendResult<Box<dyn CameraSession>>;
}

/// A live camera session
pub trait CameraSession: Send {
    /// The device this session streams from
    fn device(&self) -> &CameraDevice;

    /// Receiver for the most recent preview frame
    fn preview(&self) -> FrameReceiver;

    /// Capture a still from the most recent frame
    ///
    /// The returned future does not borrow the session, so the session may be
    /// released while encoding is still running.
    fn capture_still(
        &self,
        pipeline: PhotoPipeline,
    ) -> BoxFuture<'static, Result<CapturedPhoto, PhotoError>> {
        let frame: Option<Arc<CameraFrame>> = self.preview().borrow().clone();
        Box::pin(async move {
            let frame = frame.ok_or(PhotoError::NoFrameAvailable)?;
            pipeline.capture(frame).await
        })
    }
}

/// Get the platform camera backend
pub fn get_backend() -> Arc<dyn CameraBackend> {
    Arc::new(gst::GstBackend::new())
}
