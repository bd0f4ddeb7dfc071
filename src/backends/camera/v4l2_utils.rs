// SPDX-License-Identifier: GPL-3.0-only

//! V4L2 device node helpers
//!
//! Used for enumeration next to PipeWire and for the device access check
//! when no permission portal is reachable.

use std::ffi::CString;
use std::os::unix::io::{AsRawFd, RawFd};
use tracing::debug;

/// VIDIOC_QUERYCAP ioctl number
const VIDIOC_QUERYCAP: libc::c_ulong = 0x80685600;

/// Device supports single-planar video capture
const V4L2_CAP_VIDEO_CAPTURE: u32 = 0x0000_0001;

/// Device supports multi-planar video capture
const V4L2_CAP_VIDEO_CAPTURE_MPLANE: u32 = 0x0000_1000;

/// `device_caps` is filled in
const V4L2_CAP_DEVICE_CAPS: u32 = 0x8000_0000;

/// V4L2 capability structure for VIDIOC_QUERYCAP ioctl
#[repr(C)]
struct V4l2Capability {
    driver: [u8; 16],
    card: [u8; 32],
    bus_info: [u8; 32],
    version: u32,
    capabilities: u32,
    device_caps: u32,
    reserved: [u32; 3],
}

impl V4l2Capability {
    /// Capabilities of this node (not of the whole physical device)
    fn node_caps(&self) -> u32 {
        if self.capabilities & V4L2_CAP_DEVICE_CAPS != 0 {
            self.device_caps
        } else {
            self.capabilities
        }
    }

    fn card_name(&self) -> String {
        let len = self.card.iter().position(|&c| c == 0).unwrap_or(self.card.len());
        String::from_utf8_lossy(&self.card[..len]).trim().to_string()
    }
}

/// Query V4L2 capabilities for an open file descriptor.
fn query_v4l2_cap(fd: RawFd) -> Option<V4l2Capability> {
    let mut cap: V4l2Capability = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(fd, VIDIOC_QUERYCAP as _, &mut cap as *mut V4l2Capability) };
    if result < 0 { None } else { Some(cap) }
}

/// Parse the index out of `/dev/videoN` or `videoN`
pub fn video_node_index(path: &str) -> Option<u32> {
    let name = path.rsplit('/').next()?;
    name.strip_prefix("video")?.parse().ok()
}

/// All `/dev/videoN` nodes, sorted by index
pub fn list_video_nodes() -> Vec<String> {
    let Ok(entries) = std::fs::read_dir("/dev") else {
        return Vec::new();
    };

    let mut nodes: Vec<(u32, String)> = entries
        .flatten()
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().to_string();
            video_node_index(&name).map(|index| (index, format!("/dev/{}", name)))
        })
        .collect();

    nodes.sort_by_key(|(index, _)| *index);
    nodes.into_iter().map(|(_, path)| path).collect()
}

/// Card name of a node that can capture video, `None` for metadata/output nodes
/// or nodes we cannot open
pub fn query_capture_device(path: &str) -> Option<String> {
    let file = std::fs::File::open(path).ok()?;
    let cap = query_v4l2_cap(file.as_raw_fd())?;

    let caps = cap.node_caps();
    if caps & (V4L2_CAP_VIDEO_CAPTURE | V4L2_CAP_VIDEO_CAPTURE_MPLANE) == 0 {
        debug!(path, caps = format!("{:#x}", caps), "Not a capture node");
        return None;
    }

    let card = cap.card_name();
    debug!(path, card = %card, "Found V4L2 capture node");
    Some(if card.is_empty() { path.to_string() } else { card })
}

/// Whether this process may open the node for streaming
pub fn is_accessible(path: &str) -> bool {
    let Ok(c_path) = CString::new(path) else {
        return false;
    };
    unsafe { libc::access(c_path.as_ptr(), libc::R_OK | libc::W_OK) == 0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_node_index() {
        assert_eq!(video_node_index("/dev/video0"), Some(0));
        assert_eq!(video_node_index("video12"), Some(12));
        assert_eq!(video_node_index("/dev/v4l-subdev0"), None);
        assert_eq!(video_node_index("/dev/videoX"), None);
    }

    #[test]
    fn test_missing_node_is_not_accessible() {
        assert!(!is_accessible("/dev/video-does-not-exist"));
        assert!(query_capture_device("/dev/video-does-not-exist").is_none());
    }
}
