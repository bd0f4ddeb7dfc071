// SPDX-License-Identifier: GPL-3.0-only

//! Capture flow scenarios against an in-memory camera and picture store

use futures::future::BoxFuture;
use shutter::Config;
use shutter::app::{CaptureFlow, Screen, StartAction};
use shutter::backends::camera::{
    BackendError, BackendResult, CameraBackend, CameraDevice, CameraFrame, CameraSession,
    FrameReceiver, FrameSender, Permission, PhotoRef,
};
use shutter::config::PhotoOutputFormat;
use shutter::errors::{AppError, CameraError, PhotoError, StorageError};
use shutter::pipelines::photo::PhotoPipeline;
use shutter::storage::MediaStore;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ===== Mocks =====

struct MockBackend {
    permission: Permission,
    fail_start: AtomicBool,
    with_frames: bool,
    started: AtomicUsize,
    live: Arc<AtomicUsize>,
}

impl MockBackend {
    fn new(permission: Permission) -> Self {
        Self {
            permission,
            fail_start: AtomicBool::new(false),
            with_frames: true,
            started: AtomicUsize::new(0),
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn without_frames(mut self) -> Self {
        self.with_frames = false;
        self
    }

    fn sessions_started(&self) -> usize {
        self.started.load(Ordering::SeqCst)
    }

    fn sessions_live(&self) -> usize {
        self.live.load(Ordering::SeqCst)
    }
}

impl CameraBackend for MockBackend {
    fn enumerate_cameras(&self) -> Vec<CameraDevice> {
        vec![CameraDevice::pipewire_default()]
    }

    fn request_permission(&self) -> BoxFuture<'static, Permission> {
        let permission = self.permission;
        Box::pin(async move { permission })
    }

    fn start_session(&self, device: &CameraDevice) -> BackendResult<Box<dyn CameraSession>> {
        if self.fail_start.load(Ordering::SeqCst) {
            return Err(BackendError::InitializationFailed("device busy".into()));
        }

        self.started.fetch_add(1, Ordering::SeqCst);
        self.live.fetch_add(1, Ordering::SeqCst);

        let frame = self
            .with_frames
            .then(|| Arc::new(CameraFrame::from_rgba(4, 2, vec![200; 4 * 2 * 4])));
        let (sender, receiver) = tokio::sync::watch::channel(frame);

        Ok(Box::new(MockSession {
            device: device.clone(),
            _sender: sender,
            receiver,
            live: Arc::clone(&self.live),
        }))
    }
}

struct MockSession {
    device: CameraDevice,
    _sender: FrameSender,
    receiver: FrameReceiver,
    live: Arc<AtomicUsize>,
}

impl CameraSession for MockSession {
    fn device(&self) -> &CameraDevice {
        &self.device
    }

    fn preview(&self) -> FrameReceiver {
        self.receiver.clone()
    }
}

impl Drop for MockSession {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct MockStore {
    fail: AtomicBool,
    persisted: Mutex<Vec<PhotoRef>>,
}

impl MediaStore for MockStore {
    fn persist(&self, photo: &PhotoRef) -> BoxFuture<'static, Result<PathBuf, StorageError>> {
        let result = if self.fail.load(Ordering::SeqCst) {
            Err(StorageError::Io("disk full".into()))
        } else {
            self.persisted.lock().unwrap().push(photo.clone());
            Ok(PathBuf::from("/library").join(photo.path().file_name().unwrap()))
        };
        Box::pin(async move { result })
    }
}

// ===== Helpers =====

struct Scratch(PathBuf);

impl Scratch {
    fn new() -> Self {
        Self(std::env::temp_dir().join(format!("shutter-flow-{}", uuid::Uuid::new_v4())))
    }

    fn pipeline(&self) -> PhotoPipeline {
        let config = Config {
            photo_format: PhotoOutputFormat::Png,
            ..Config::default()
        };
        PhotoPipeline::from_config(&config, self.0.clone())
    }
}

impl Drop for Scratch {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

fn assert_invariants(flow: &CaptureFlow) {
    assert_eq!(flow.preview_visible(), flow.photo().is_some());
    if !flow.camera_started() {
        assert!(!flow.preview_visible());
        assert!(flow.photo().is_none());
    }
}

/// Idle -> Live through a granted prompt
async fn go_live(flow: &mut CaptureFlow, backend: &MockBackend) {
    assert_eq!(
        flow.request_start(backend),
        Ok(StartAction::RequestPermission)
    );
    let permission = backend.request_permission().await;
    flow.permission_resolved(permission, backend).unwrap();
    assert_eq!(flow.screen(), Screen::Live);
    assert_invariants(flow);
}

async fn take_photo(flow: &mut CaptureFlow, pipeline: &PhotoPipeline) {
    let capture = flow.capture(pipeline).expect("capture should start while Live");
    let result = capture.await;
    flow.photo_captured(result).unwrap();
    assert_eq!(flow.screen(), Screen::Preview);
    assert_invariants(flow);
}

// ===== Scenarios =====

#[tokio::test]
async fn test_capture_save_capture_retake() {
    let scratch = Scratch::new();
    let pipeline = scratch.pipeline();
    let backend = MockBackend::new(Permission::Granted);
    let store = MockStore::default();
    let mut flow = CaptureFlow::new(CameraDevice::pipewire_default());

    assert_eq!(flow.screen(), Screen::Idle);
    assert!(!flow.camera_started());
    assert_invariants(&flow);

    go_live(&mut flow, &backend).await;
    assert_eq!(backend.sessions_live(), 1);

    take_photo(&mut flow, &pipeline).await;
    let photo = flow.photo().cloned().unwrap();
    assert_eq!((photo.width, photo.height), (4, 2));
    assert!(photo.reference.path().exists());
    assert_eq!(backend.sessions_live(), 0, "camera released while previewing");

    // Save, then straight back to the viewfinder without a second prompt
    let reference = flow.save().unwrap();
    assert!(flow.is_saving());
    let result = store.persist(&reference).await;
    assert_eq!(
        flow.save_finished(result, &backend).unwrap(),
        StartAction::Started
    );
    assert_eq!(flow.screen(), Screen::Live);
    assert!(flow.photo().is_none());
    assert_invariants(&flow);
    assert_eq!(store.persisted.lock().unwrap().as_slice(), &[photo.reference]);

    // Capture again, then re-take
    take_photo(&mut flow, &pipeline).await;
    let retaken = flow.photo().cloned().unwrap();
    assert_eq!(flow.retake(&backend), Ok(StartAction::Started));
    assert_eq!(flow.screen(), Screen::Live);
    assert!(flow.photo().is_none());
    assert_invariants(&flow);
    assert_eq!(flow.take_discarded(), vec![retaken.reference]);

    assert_eq!(backend.sessions_started(), 3);
    assert_eq!(backend.sessions_live(), 1);
}

#[tokio::test]
async fn test_permission_denied_stays_idle() {
    let backend = MockBackend::new(Permission::Denied);
    let mut flow = CaptureFlow::new(CameraDevice::pipewire_default());

    assert_eq!(
        flow.request_start(&backend),
        Ok(StartAction::RequestPermission)
    );
    let permission = backend.request_permission().await;
    assert_eq!(
        flow.permission_resolved(permission, &backend),
        Err(CameraError::PermissionDenied)
    );

    assert_eq!(flow.screen(), Screen::Idle);
    assert!(flow.photo().is_none());
    assert!(!flow.camera_started());
    assert_eq!(backend.sessions_started(), 0);
    assert_invariants(&flow);

    // Pressing the button again asks again
    assert_eq!(
        flow.request_start(&backend),
        Ok(StartAction::RequestPermission)
    );
}

#[tokio::test]
async fn test_start_ignored_while_prompt_open() {
    let backend = MockBackend::new(Permission::Granted);
    let mut flow = CaptureFlow::new(CameraDevice::pipewire_default());

    assert_eq!(
        flow.request_start(&backend),
        Ok(StartAction::RequestPermission)
    );
    assert!(flow.is_permission_pending());
    assert_eq!(flow.request_start(&backend), Ok(StartAction::Ignored));

    flow.permission_resolved(Permission::Granted, &backend)
        .unwrap();
    assert_eq!(flow.request_start(&backend), Ok(StartAction::Ignored));
    assert_eq!(backend.sessions_started(), 1);
}

#[tokio::test]
async fn test_save_failure_keeps_preview() {
    let scratch = Scratch::new();
    let pipeline = scratch.pipeline();
    let backend = MockBackend::new(Permission::Granted);
    let store = MockStore::default();
    store.fail.store(true, Ordering::SeqCst);
    let mut flow = CaptureFlow::new(CameraDevice::pipewire_default());

    go_live(&mut flow, &backend).await;
    take_photo(&mut flow, &pipeline).await;
    let photo = flow.photo().cloned().unwrap();

    let reference = flow.save().unwrap();
    assert!(flow.save().is_none(), "second save while saving is ignored");
    assert_eq!(flow.retake(&backend), Ok(StartAction::Ignored));

    let result = store.persist(&reference).await;
    let err = flow.save_finished(result, &backend).unwrap_err();
    assert!(matches!(err, AppError::Storage(StorageError::Io(_))));

    assert_eq!(flow.screen(), Screen::Preview);
    assert_eq!(flow.photo(), Some(&photo));
    assert!(!flow.is_saving());
    assert_invariants(&flow);

    // The user can try again
    store.fail.store(false, Ordering::SeqCst);
    let reference = flow.save().unwrap();
    let result = store.persist(&reference).await;
    flow.save_finished(result, &backend).unwrap();
    assert_eq!(flow.screen(), Screen::Live);
}

#[tokio::test]
async fn test_capture_while_idle_is_noop() {
    let scratch = Scratch::new();
    let mut flow = CaptureFlow::new(CameraDevice::pipewire_default());

    assert!(flow.capture(&scratch.pipeline()).is_none());
    assert_eq!(flow.screen(), Screen::Idle);
    assert!(flow.save().is_none());
    assert_invariants(&flow);
}

#[tokio::test]
async fn test_second_capture_ignored_while_pending() {
    let scratch = Scratch::new();
    let pipeline = scratch.pipeline();
    let backend = MockBackend::new(Permission::Granted);
    let mut flow = CaptureFlow::new(CameraDevice::pipewire_default());

    go_live(&mut flow, &backend).await;
    let first = flow.capture(&pipeline).unwrap();
    assert!(flow.is_capturing());
    assert!(flow.capture(&pipeline).is_none());

    flow.photo_captured(first.await).unwrap();
    assert_eq!(flow.screen(), Screen::Preview);
}

#[tokio::test]
async fn test_stale_capture_is_discarded() {
    let scratch = Scratch::new();
    let pipeline = scratch.pipeline();
    let backend = MockBackend::new(Permission::Granted);
    let mut flow = CaptureFlow::new(CameraDevice::pipewire_default());

    go_live(&mut flow, &backend).await;
    let capture = flow.capture(&pipeline).unwrap();
    flow.stop();
    assert_eq!(backend.sessions_live(), 0);

    let result = capture.await;
    let photo = result.clone().unwrap();
    flow.photo_captured(result).unwrap();

    assert_eq!(flow.screen(), Screen::Idle);
    assert!(flow.photo().is_none());
    assert_eq!(flow.take_discarded(), vec![photo.reference]);
    assert_invariants(&flow);
}

#[tokio::test]
async fn test_capture_without_frame_stays_live() {
    let scratch = Scratch::new();
    let pipeline = scratch.pipeline();
    let backend = MockBackend::new(Permission::Granted).without_frames();
    let mut flow = CaptureFlow::new(CameraDevice::pipewire_default());

    go_live(&mut flow, &backend).await;
    let result = flow.capture(&pipeline).unwrap().await;
    assert_eq!(flow.photo_captured(result), Err(PhotoError::NoFrameAvailable));

    assert_eq!(flow.screen(), Screen::Live);
    assert!(!flow.is_capturing());
    assert_invariants(&flow);
}

#[tokio::test]
async fn test_session_start_failure_stays_idle() {
    let backend = MockBackend::new(Permission::Granted);
    backend.fail_start.store(true, Ordering::SeqCst);
    let mut flow = CaptureFlow::new(CameraDevice::pipewire_default());

    flow.request_start(&backend).unwrap();
    let err = flow
        .permission_resolved(Permission::Granted, &backend)
        .unwrap_err();
    assert!(matches!(err, CameraError::SessionFailed(msg) if msg.contains("device busy")));
    assert_eq!(flow.screen(), Screen::Idle);

    // Permission is remembered, the next attempt starts directly
    backend.fail_start.store(false, Ordering::SeqCst);
    assert_eq!(flow.request_start(&backend), Ok(StartAction::Started));
    assert_eq!(flow.screen(), Screen::Live);
}

#[tokio::test]
async fn test_select_device_restarts_live_session() {
    let backend = MockBackend::new(Permission::Granted);
    let mut flow = CaptureFlow::new(CameraDevice::pipewire_default());
    go_live(&mut flow, &backend).await;
    let generation = flow.session_generation();

    let usb = CameraDevice {
        name: "USB Camera".into(),
        path: "/dev/video2".into(),
    };
    flow.select_device(usb.clone(), &backend).unwrap();

    assert_eq!(flow.device(), &usb);
    assert_eq!(flow.session().map(|s| s.device().clone()), Some(usb));
    assert!(flow.session_generation() > generation);
    assert_eq!(backend.sessions_live(), 1);
}
