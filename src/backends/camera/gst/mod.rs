// SPDX-License-Identifier: GPL-3.0-only

//! GStreamer camera backend
//!
//! Streams from PipeWire (`pipewiresrc`) or directly from a V4L2 node
//! (`v4l2src`) into an RGBA appsink.

mod enumeration;
mod pipeline;

pub use enumeration::enumerate_cameras;
pub use pipeline::{GstSession, build_pipeline_string};

use super::{
    BackendResult, CameraBackend, CameraDevice, CameraSession, Permission, permission,
};
use futures::future::BoxFuture;
use tracing::info;

/// Camera backend built on GStreamer
#[derive(Debug, Default)]
pub struct GstBackend;

impl GstBackend {
    pub fn new() -> Self {
        Self
    }
}

impl CameraBackend for GstBackend {
    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        let cameras = enumerate_cameras();
        info!(count = cameras.len(), "Enumerated cameras");
        cameras
    }

    fn request_permission(&self) -> BoxFuture<'static, Permission> {
        Box::pin(permission::request_camera_access())
    }

    fn start_session(&self, device: &CameraDevice) -> BackendResult<Box<dyn CameraSession>> {
        let session = GstSession::start(device)?;
        Ok(Box::new(session))
    }
}
