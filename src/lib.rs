// SPDX-License-Identifier: MPL-2.0

//! Shutter - a single-window camera application for the COSMIC desktop
//!
//! Ask for camera access, show a live viewfinder, take a still, then either
//! re-take it or save it to the picture library.
//!
//! # Architecture
//!
//! - [`app`]: the capture flow state machine and the libcosmic UI around it
//! - [`backends`]: camera capability (permission, sessions, still capture)
//! - [`pipelines`]: still photo processing and encoding
//! - [`storage`]: picture library and capture cache
//! - [`config`]: user configuration handling
//!
//! # Example
//!
//! ```ignore
//! // GUI:           shutter
//! // List cameras:  shutter list
//! // Headless shot: shutter photo --camera 0 --output ~/shot.jpg
//! ```

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod i18n;
pub mod pipelines;
pub mod storage;

// Re-export commonly used types
pub use app::{AppModel, CaptureFlow, Message, Screen, StartAction};
pub use config::Config;
pub use constants::PhotoQuality;
