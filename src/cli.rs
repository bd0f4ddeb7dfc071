// SPDX-License-Identifier: GPL-3.0-only

//! Command-line entry points
//!
//! `shutter photo` runs the same capture flow as the window, minus the
//! window: permission, session, capture, save.

use cosmic::Application;
use shutter::app::{AppModel, CaptureFlow, StartAction};
use shutter::backends::camera::{self, CameraBackend, CameraDevice, FrameReceiver};
use shutter::config::Config;
use shutter::constants::timing;
use shutter::errors::{CameraError, PhotoError};
use shutter::pipelines::photo::PhotoPipeline;
use shutter::storage::{self, MediaStore, PicturesLibrary};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// List available cameras
pub fn list_cameras() -> Result<(), Box<dyn std::error::Error>> {
    let cameras = camera::get_backend().enumerate_cameras();

    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras:");
    println!();
    for (index, camera) in cameras.iter().enumerate() {
        println!("  [{}] {}", index, camera.name);
        if !camera.path.is_empty() {
            println!("      Device: {}", camera.path);
        }
    }

    Ok(())
}

/// Take a single photo with the given camera
pub fn take_photo(
    camera_index: usize,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let backend = camera::get_backend();

    let cameras = backend.enumerate_cameras();
    if cameras.is_empty() {
        return Err(CameraError::NoCameraFound.into());
    }
    let Some(camera) = cameras.get(camera_index).cloned() else {
        return Err(format!(
            "Camera index {} out of range (0-{})",
            camera_index,
            cameras.len() - 1
        )
        .into());
    };
    println!("Using camera: {}", camera.name);

    let (_, config) = Config::load(AppModel::APP_ID);
    let rt = tokio::runtime::Runtime::new()?;
    let saved = rt.block_on(capture_and_save(
        backend.as_ref(),
        camera,
        &config,
        storage::capture_cache_directory(),
        output,
    ))?;

    println!("Photo saved: {}", saved.display());
    Ok(())
}

async fn capture_and_save(
    backend: &dyn CameraBackend,
    camera: CameraDevice,
    config: &Config,
    capture_dir: PathBuf,
    output: Option<PathBuf>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut flow = CaptureFlow::new(camera);

    if flow.request_start(backend)? == StartAction::RequestPermission {
        let permission = backend.request_permission().await;
        flow.permission_resolved(permission, backend)?;
    }

    let mut preview = flow
        .session()
        .ok_or_else(|| CameraError::SessionFailed("camera did not start".into()))?
        .preview();

    println!("Capturing...");
    wait_for_warm_frame(&mut preview).await?;

    let pipeline = PhotoPipeline::from_config(config, capture_dir);
    let capture = flow
        .capture(&pipeline)
        .ok_or_else(|| CameraError::SessionFailed("camera session not running".into()))?;
    let result = capture.await;
    flow.photo_captured(result)?;

    let photo = flow.save().ok_or(PhotoError::NoFrameAvailable)?;
    let result = match output {
        Some(dir) if dir.is_dir() => PicturesLibrary::new(dir).persist(&photo).await,
        Some(path) => storage::move_capture(&photo, &path).await.map(|()| path),
        None => {
            PicturesLibrary::new(config.library_directory())
                .persist(&photo)
                .await
        }
    };

    match result {
        Ok(saved) => {
            // The camera is not needed again; release it instead of going back to Live
            flow.stop();
            for discarded in flow.take_discarded() {
                storage::discard_capture(discarded).await;
            }
            Ok(saved)
        }
        Err(e) => {
            // Leave the capture in the cache so it can be copied out by hand
            eprintln!("Photo kept at: {}", photo.path().display());
            Err(e.into())
        }
    }
}

/// Wait until the camera has streamed for the warm-up period
///
/// Early frames are often dark while auto exposure settles. Gives up when no
/// frame arrives at all within the first-frame timeout.
async fn wait_for_warm_frame(
    preview: &mut FrameReceiver,
) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();
    let warmup = Duration::from_millis(timing::WARMUP_MS);
    let deadline = start + Duration::from_secs(timing::FIRST_FRAME_TIMEOUT_SECS);

    loop {
        let has_frame = preview.borrow().is_some();
        if has_frame && start.elapsed() >= warmup {
            debug!(elapsed_ms = start.elapsed().as_millis(), "Camera warmed up");
            return Ok(());
        }

        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return if has_frame {
                Ok(())
            } else {
                Err(PhotoError::NoFrameAvailable.into())
            };
        }

        let wait = if has_frame {
            warmup.saturating_sub(start.elapsed()).min(remaining)
        } else {
            remaining
        };

        match tokio::time::timeout(wait, preview.changed()).await {
            Ok(Ok(())) | Err(_) => {}
            Ok(Err(_)) => {
                info!("Preview stream closed before capture");
                return Err(CameraError::SessionFailed("preview stream closed".into()).into());
            }
        }
    }
}
