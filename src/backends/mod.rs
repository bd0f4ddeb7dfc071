// SPDX-License-Identifier: MPL-2.0

//! Backend abstraction layer
//!
//! # Modules
//!
//! - [`camera`]: camera permission, device enumeration, live sessions and
//!   still capture (GStreamer over PipeWire or V4L2)

pub mod camera;
