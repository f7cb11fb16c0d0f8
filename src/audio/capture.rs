//! Microphone capture and the listen loop.
//!
//! The device callback only converts and enqueues frames; recognition runs
//! on the caller's thread, which drains the frame channel and feeds the
//! transcription session until the engine reports an utterance boundary.

use super::dispatch::{f32_to_i16, FrameDispatcher};
use super::resample::convert_frame_to_target;
use crate::config::CaptureConfig;
use crate::console::ProgressLine;
use crate::stt::{TranscribeEvent, Transcriber};
use crate::{log_debug, log_debug_content};
use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleFormat, StreamConfig};
use crossbeam_channel::{bounded, RecvTimeoutError};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How often the drain loop re-checks the interruption flag while the
/// channel is quiet.
const STOP_POLL_MS: u64 = 100;

/// Result of one `listen()` invocation. Faults are carried as a diagnostic
/// string so callers only ever decide between continue and terminate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListenOutcome {
    /// Normalized (lower-cased, trimmed) transcript of one turn.
    Utterance(String),
    /// The user asked to stop while we were listening.
    Interrupted,
    /// A device or engine fault; already logged, safe to retry.
    Failed(String),
}

/// Audio input device wrapper.
pub struct Recorder {
    device: cpal::Device,
}

impl Recorder {
    /// List microphone names so the CLI can expose a selector.
    pub fn list_devices() -> Result<Vec<String>> {
        let host = cpal::default_host();
        let devices = host.input_devices().context("no input devices available")?;
        let mut names = Vec::new();
        for device in devices {
            if let Ok(name) = device.name() {
                names.push(name);
            }
        }
        Ok(names)
    }

    /// Create a recorder, optionally forcing a specific device so users can
    /// pick the right microphone when several are present.
    pub fn new(preferred_device: Option<&str>) -> Result<Self> {
        let host = cpal::default_host();
        let device = match preferred_device {
            Some(name) => {
                let mut devices = host.input_devices().context("no input devices available")?;
                devices
                    .find(|d| d.name().map(|n| n == name).unwrap_or(false))
                    .ok_or_else(|| anyhow!("input device '{name}' not found"))?
            }
            None => host
                .default_input_device()
                .context("no default input device available")?,
        };
        Ok(Self { device })
    }

    /// Name of the active recording device.
    pub fn device_name(&self) -> String {
        self.device
            .name()
            .unwrap_or_else(|_| "Unknown Device".to_string())
    }
}

/// Capture one utterance.
///
/// Opens a scoped input stream for the duration of the call, feeds frames to
/// the transcription session, and mirrors partial transcripts to the
/// progress display. Returns once the engine finalizes a non-empty
/// utterance, the stop flag is raised, or a fault occurs. The session is
/// reset on every exit path so the next turn starts clean.
pub fn listen(
    recorder: &Recorder,
    transcriber: &mut Transcriber,
    cfg: &CaptureConfig,
    stop_flag: &Arc<AtomicBool>,
    progress: &mut ProgressLine,
) -> ListenOutcome {
    match listen_impl(recorder, transcriber, cfg, stop_flag, progress) {
        Ok(outcome) => outcome,
        Err(err) => {
            progress.clear();
            transcriber.reset();
            let diagnostic = format!("{err:#}");
            log_debug(&format!("listen failed: {diagnostic}"));
            ListenOutcome::Failed(diagnostic)
        }
    }
}

fn listen_impl(
    recorder: &Recorder,
    transcriber: &mut Transcriber,
    cfg: &CaptureConfig,
    stop_flag: &Arc<AtomicBool>,
    progress: &mut ProgressLine,
) -> Result<ListenOutcome> {
    let default_config = recorder
        .device
        .default_input_config()
        .context("failed to query the input device configuration")?;
    let format = default_config.sample_format();
    let device_config: StreamConfig = default_config.into();
    let device_rate = device_config.sample_rate.0;
    let channels = usize::from(device_config.channels.max(1));

    // Same frame duration on both sides of the resampler.
    let device_frame_samples = ((cfg.frame_samples as u64 * u64::from(device_rate))
        / u64::from(cfg.sample_rate.max(1)))
    .max(1) as usize;

    log_debug(&format!(
        "listen: device='{}' format={format:?} rate={device_rate}Hz channels={channels} frame={device_frame_samples}",
        recorder.device_name()
    ));

    // A fresh bounded channel per call: stale frames from a previous turn
    // cannot survive into this one.
    let (sender, receiver) = bounded::<Vec<f32>>(cfg.channel_capacity.max(1));
    let dropped = Arc::new(AtomicUsize::new(0));
    let dispatcher = Arc::new(Mutex::new(FrameDispatcher::new(
        device_frame_samples,
        sender,
        dropped.clone(),
    )));

    let err_fn = |err| log_debug(&format!("audio_stream_error: {err}"));
    let stream = match format {
        SampleFormat::F32 => {
            let dispatcher = dispatcher.clone();
            let dropped = dropped.clone();
            recorder.device.build_input_stream(
                &device_config,
                move |data: &[f32], _| {
                    if let Ok(mut pump) = dispatcher.try_lock() {
                        pump.push(data, channels, |sample| sample);
                    } else {
                        dropped.fetch_add(1, Ordering::Relaxed);
                    }
                },
                err_fn,
                None,
            )?
        }
        SampleFormat::I16 => {
            let dispatcher = dispatcher.clone();
            let dropped = dropped.clone();
            recorder.device.build_input_stream(
                &device_config,
                move |data: &[i16], _| {
                    if let Ok(mut pump) = dispatcher.try_lock() {
                        pump.push(data, channels, |sample| sample as f32 / 32_768.0);
                    } else {
                        dropped.fetch_add(1, Ordering::Relaxed);
                    }
                },
                err_fn,
                None,
            )?
        }
        SampleFormat::U16 => {
            let dispatcher = dispatcher.clone();
            let dropped = dropped.clone();
            recorder.device.build_input_stream(
                &device_config,
                move |data: &[u16], _| {
                    if let Ok(mut pump) = dispatcher.try_lock() {
                        pump.push(data, channels, |sample| {
                            (sample as f32 - 32_768.0) / 32_768.0
                        });
                    } else {
                        dropped.fetch_add(1, Ordering::Relaxed);
                    }
                },
                err_fn,
                None,
            )?
        }
        other => return Err(anyhow!("unsupported sample format: {other:?}")),
    };

    stream.play().context("failed to start the input stream")?;
    println!("\nÉcoute en cours…");

    let wait_time = Duration::from_millis(STOP_POLL_MS);
    let outcome = loop {
        if stop_flag.load(Ordering::Relaxed) {
            progress.clear();
            transcriber.reset();
            log_debug("listen interrupted by user");
            break ListenOutcome::Interrupted;
        }
        match receiver.recv_timeout(wait_time) {
            Ok(frame) => {
                let target_frame = convert_frame_to_target(
                    frame,
                    device_rate,
                    cfg.sample_rate,
                    cfg.frame_samples,
                );
                if target_frame.is_empty() {
                    continue;
                }
                let pcm = f32_to_i16(&target_frame);
                match transcriber.accept_frame(&pcm)? {
                    TranscribeEvent::Final(text) => {
                        let normalized = text.trim().to_lowercase();
                        if normalized.is_empty() {
                            // Silence also finalizes; keep listening.
                            continue;
                        }
                        progress.clear();
                        println!("Vous : {text}");
                        log_debug_content(&format!("transcript: {normalized}"));
                        transcriber.reset();
                        break ListenOutcome::Utterance(normalized);
                    }
                    TranscribeEvent::Partial(partial) => {
                        progress.update(&partial);
                    }
                    TranscribeEvent::Pending => {}
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                return Err(anyhow!("audio stream disconnected"));
            }
        }
    };

    let dropped_frames = dropped.load(Ordering::Relaxed);
    if dropped_frames > 0 {
        log_debug(&format!("listen: dropped {dropped_frames} frame(s)"));
    }
    if let Err(err) = stream.pause() {
        log_debug(&format!("failed to pause audio stream: {err}"));
    }
    drop(stream);

    Ok(outcome)
}
