// SPDX-License-Identifier: GPL-3.0-only

//! Camera discovery

use super::super::types::CameraDevice;
use super::super::v4l2_utils;
use tracing::{debug, warn};

/// List cameras: the PipeWire default camera first (when `pipewiresrc` is
/// installed), then every V4L2 capture node
pub fn enumerate_cameras() -> Vec<CameraDevice> {
    let mut cameras = Vec::new();

    if pipewire_available() {
        cameras.push(CameraDevice::pipewire_default());
    }

    for node in v4l2_utils::list_video_nodes() {
        if let Some(card) = v4l2_utils::query_capture_device(&node) {
            cameras.push(CameraDevice {
                name: card,
                path: node,
            });
        }
    }

    cameras
}

fn pipewire_available() -> bool {
    if let Err(e) = gstreamer::init() {
        warn!(error = %e, "GStreamer init failed");
        return false;
    }

    let available = gstreamer::ElementFactory::find("pipewiresrc").is_some();
    debug!(available, "pipewiresrc lookup");
    available
}
