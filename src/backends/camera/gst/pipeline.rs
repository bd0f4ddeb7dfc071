// SPDX-License-Identifier: MPL-2.0

//! GStreamer preview pipeline for a camera session

use super::super::CameraSession;
use super::super::types::*;
use crate::constants::{pipeline, timing};
use gstreamer::prelude::*;
use gstreamer_app::AppSink;
use gstreamer_video::VideoInfo;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, error, info, warn};

/// Source element for a device path
fn source_element(device: &CameraDevice) -> String {
    let path = device.path.as_str();
    if path.is_empty() {
        "pipewiresrc do-timestamp=true".to_string()
    } else if let Some(node_id) = path.strip_prefix("pipewire-") {
        format!("pipewiresrc target-object={} do-timestamp=true", node_id)
    } else if device.is_v4l2() {
        format!("v4l2src device={} do-timestamp=true", path)
    } else {
        warn!(path, "Unknown device path format, passing it to pipewiresrc");
        format!("pipewiresrc path={} do-timestamp=true", path)
    }
}

/// Full launch line: source, decode whatever the camera sends, RGBA appsink
pub fn build_pipeline_string(device: &CameraDevice) -> String {
    format!(
        "{} ! decodebin ! videoconvert n-threads={} ! video/x-raw,format={} ! appsink name=sink",
        source_element(device),
        pipeline::videoconvert_threads(),
        pipeline::OUTPUT_FORMAT
    )
}

/// Live camera session backed by a GStreamer pipeline
///
/// The pipeline runs from [`GstSession::start`] until the session is dropped.
pub struct GstSession {
    device: CameraDevice,
    pipeline: gstreamer::Pipeline,
    appsink: AppSink,
    frames: FrameReceiver,
}

impl GstSession {
    /// Build the pipeline and set it to PLAYING
    pub fn start(device: &CameraDevice) -> BackendResult<Self> {
        info!(device = %device, "Starting camera session");

        gstreamer::init().map_err(|e| BackendError::NotAvailable(e.to_string()))?;

        if device.is_v4l2() && !std::path::Path::new(&device.path).exists() {
            return Err(BackendError::DeviceNotFound(device.path.clone()));
        }

        let launch = build_pipeline_string(device);
        debug!(pipeline = %launch, "Launching pipeline");

        let pipeline = gstreamer::parse::launch(&launch)
            .map_err(|e| BackendError::InitializationFailed(e.to_string()))?
            .dynamic_cast::<gstreamer::Pipeline>()
            .map_err(|_| {
                BackendError::InitializationFailed("Launch line is not a pipeline".to_string())
            })?;

        let appsink = pipeline
            .by_name("sink")
            .ok_or_else(|| BackendError::InitializationFailed("Failed to get appsink".to_string()))?
            .dynamic_cast::<AppSink>()
            .map_err(|_| {
                BackendError::InitializationFailed("Failed to cast appsink".to_string())
            })?;

        appsink.set_property("sync", false);
        appsink.set_property("max-buffers", pipeline::MAX_BUFFERS);
        appsink.set_property("drop", true);
        appsink.set_property("enable-last-sample", false);

        let (sender, frames) = tokio::sync::watch::channel(None);
        install_frame_callback(&appsink, sender);

        if let Err(e) = pipeline.set_state(gstreamer::State::Playing) {
            error!(error = %e, "Failed to set pipeline to PLAYING");
            let reason = check_bus_for_errors(&pipeline);
            let _ = pipeline.set_state(gstreamer::State::Null);
            return Err(BackendError::InitializationFailed(
                reason.unwrap_or_else(|| format!("Failed to start pipeline: {}", e)),
            ));
        }

        // Live sources go PLAYING asynchronously; a busy device or failed
        // negotiation only shows up on the bus
        wait_for_playing(
            &pipeline,
            gstreamer::ClockTime::from_seconds(timing::START_TIMEOUT_SECS),
        )?;

        info!("Camera session started");

        Ok(Self {
            device: device.clone(),
            pipeline,
            appsink,
            frames,
        })
    }
}

impl CameraSession for GstSession {
    fn device(&self) -> &CameraDevice {
        &self.device
    }

    fn preview(&self) -> FrameReceiver {
        self.frames.clone()
    }
}

impl Drop for GstSession {
    fn drop(&mut self) {
        info!(device = %self.device, "Stopping camera session");
        self.appsink
            .set_callbacks(gstreamer_app::AppSinkCallbacks::builder().build());

        release_pipeline(&self.pipeline);
    }
}

/// Wait for the pipeline to reach PLAYING, tearing it down on failure
fn wait_for_playing(
    pipeline: &gstreamer::Pipeline,
    timeout: gstreamer::ClockTime,
) -> BackendResult<()> {
    let (result, state, pending) = pipeline.state(timeout);
    debug!(?result, ?state, ?pending, "Pipeline state");

    let failure = if result.is_err() || state != gstreamer::State::Playing {
        Some(
            check_bus_for_errors(pipeline)
                .unwrap_or_else(|| format!("Pipeline did not start (stuck in {:?})", state)),
        )
    } else {
        // Reached PLAYING, but a source may already have failed
        bus_error(pipeline, gstreamer::ClockTime::ZERO)
    };

    match failure {
        Some(reason) => {
            error!(%reason, "Camera pipeline failed to start");
            release_pipeline(pipeline);
            Err(BackendError::InitializationFailed(reason))
        }
        None => Ok(()),
    }
}

/// Set the pipeline to NULL
///
/// Changes to NULL complete synchronously, so the device is free on return.
fn release_pipeline(pipeline: &gstreamer::Pipeline) {
    match pipeline.set_state(gstreamer::State::Null) {
        Ok(_) => debug!("Pipeline stopped, camera released"),
        Err(e) => warn!(error = %e, "Failed to stop pipeline"),
    }
}

/// Publish every decoded sample as the latest frame
fn install_frame_callback(appsink: &AppSink, sender: FrameSender) {
    let frame_counter = AtomicU64::new(0);

    appsink.set_callbacks(
        gstreamer_app::AppSinkCallbacks::builder()
            .new_sample(move |appsink| {
                let captured_at = Instant::now();
                let frame_num = frame_counter.fetch_add(1, Ordering::Relaxed);

                let sample = appsink
                    .pull_sample()
                    .map_err(|_| gstreamer::FlowError::Eos)?;
                let buffer = sample.buffer().ok_or(gstreamer::FlowError::Error)?;
                let caps = sample.caps().ok_or(gstreamer::FlowError::Error)?;

                let video_info = VideoInfo::from_caps(caps).map_err(|e| {
                    error!(frame = frame_num, error = ?e, "Failed to get video info");
                    gstreamer::FlowError::Error
                })?;

                let map = buffer.map_readable().map_err(|e| {
                    error!(frame = frame_num, error = ?e, "Failed to map buffer");
                    gstreamer::FlowError::Error
                })?;

                let frame = CameraFrame {
                    width: video_info.width(),
                    height: video_info.height(),
                    stride: video_info.stride()[0] as u32,
                    data: Arc::from(map.as_slice()),
                    captured_at,
                };

                if frame_num % timing::FRAME_LOG_INTERVAL == 0 {
                    debug!(
                        frame = frame_num,
                        width = frame.width,
                        height = frame.height,
                        copy_us = captured_at.elapsed().as_micros(),
                        "Preview frame"
                    );
                }

                // No receivers left means the session is shutting down
                if sender.send(Some(Arc::new(frame))).is_err() {
                    return Err(gstreamer::FlowError::Eos);
                }

                Ok(gstreamer::FlowSuccess::Ok)
            })
            .build(),
    );
}

/// Log the first error or warning waiting on the bus, returning the error text
fn check_bus_for_errors(pipeline: &gstreamer::Pipeline) -> Option<String> {
    let bus = pipeline.bus()?;
    let msg = bus.timed_pop_filtered(
        gstreamer::ClockTime::from_mseconds(100),
        &[
            gstreamer::MessageType::Error,
            gstreamer::MessageType::Warning,
        ],
    )?;

    match msg.view() {
        gstreamer::MessageView::Error(err) => {
            error!(
                error = %err.error(),
                debug = ?err.debug(),
                source = ?err.src().map(|s| s.name()),
                "GStreamer error during pipeline start"
            );
            Some(err.error().to_string())
        }
        gstreamer::MessageView::Warning(warn_msg) => {
            warn!(
                warning = %warn_msg.error(),
                debug = ?warn_msg.debug(),
                "GStreamer warning during pipeline start"
            );
            None
        }
        _ => None,
    }
}

/// Text of an error already posted on the bus, if any
fn bus_error(pipeline: &gstreamer::Pipeline, timeout: gstreamer::ClockTime) -> Option<String> {
    let msg = pipeline
        .bus()?
        .timed_pop_filtered(timeout, &[gstreamer::MessageType::Error])?;
    match msg.view() {
        gstreamer::MessageView::Error(err) => Some(err.error().to_string()),
        _ => None,
    }
}
