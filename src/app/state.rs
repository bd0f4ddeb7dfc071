// SPDX-License-Identifier: GPL-3.0-only

//! Application state management

use crate::app::flow::CaptureFlow;
use crate::backends::camera::CameraBackend;
use crate::backends::camera::types::{CameraDevice, CameraFrame, CapturedPhoto, Permission};
use crate::config::Config;
use crate::errors::{PhotoError, StorageError};
use crate::storage::MediaStore;
use cosmic::cosmic_config;
use cosmic::widget::about::About;
use std::path::PathBuf;
use std::sync::Arc;

/// The application model stores app-specific state used to describe its interface and
/// drive its logic.
pub struct AppModel {
    /// Application state which is managed by the COSMIC runtime.
    pub core: cosmic::Core,
    /// Display a context drawer with the designated page if defined.
    pub context_page: ContextPage,
    /// The about page for this app.
    pub about: About,
    /// Configuration data that persists between application runs.
    pub config: Config,
    /// Configuration handler for saving settings
    pub config_handler: Option<cosmic_config::Config>,
    /// Modal dialog currently shown, if any
    pub dialog_page: Option<DialogPage>,

    /// Camera capability (permission, sessions)
    pub backend: Arc<dyn CameraBackend>,
    /// Where saved photos go
    pub store: Arc<dyn MediaStore>,
    /// Idle / Live / Preview controller
    pub flow: CaptureFlow,
    /// Directory holding captures until they are saved or discarded
    pub capture_dir: PathBuf,

    /// Cameras found at startup
    pub available_cameras: Vec<CameraDevice>,
    /// Index into `available_cameras`
    pub current_camera_index: usize,
    /// Latest viewfinder frame of the live session, ready to draw
    pub viewfinder: Option<cosmic::widget::image::Handle>,

    // Dropdown labels, built once so the settings view can borrow them
    pub camera_dropdown_options: Vec<String>,
    pub theme_dropdown_options: Vec<String>,
    pub format_dropdown_options: Vec<String>,
    pub quality_dropdown_options: Vec<String>,
}

/// The context page to display in the context drawer.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ContextPage {
    #[default]
    About,
    Settings,
}

/// Modal dialogs
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DialogPage {
    /// Camera permission was refused
    AccessDenied,
    /// Something failed; the text is shown as-is
    Error(String),
}

/// Messages emitted by the application and its widgets.
#[derive(Debug, Clone)]
pub enum Message {
    // ===== UI Navigation =====
    /// Open external URL
    LaunchUrl(String),
    /// Toggle context drawer page (About, Settings)
    ToggleContextPage(ContextPage),
    /// Dismiss the current dialog
    CloseDialog,

    // ===== Capture Flow =====
    /// "Take Picture" pressed
    TakePicture,
    /// Answer of the camera permission prompt
    PermissionResolved(Permission),
    /// New viewfinder frame for the given session generation
    ViewfinderFrame(u64, Arc<CameraFrame>),
    /// Shutter button pressed
    Capture,
    /// Still capture finished
    PhotoCaptured(Result<CapturedPhoto, PhotoError>),
    /// "Re-take" pressed
    Retake,
    /// "Save photo" pressed
    SavePhoto,
    /// Persisting the photo finished
    PhotoSaved(Result<PathBuf, StorageError>),
    /// Discarded captures were removed from the cache
    CapturesDiscarded,

    // ===== Camera Selection =====
    /// Camera enumeration finished
    CamerasEnumerated(Vec<CameraDevice>),
    /// Camera chosen in the settings drawer
    SelectCamera(usize),

    // ===== Settings =====
    /// Config changed on disk
    UpdateConfig(Config),
    SetAppTheme(usize),
    ToggleMirrorPreview,
    SelectPhotoFormat(usize),
    SelectPhotoQuality(usize),
    /// Open the picture library in the file manager
    OpenLibraryFolder,
    /// Stale captures from a previous run were removed
    CaptureCacheCleared(usize),
}
