//! Synchronous playback of synthesized waveforms.

use crate::log_debug;
use anyhow::{anyhow, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, StreamConfig};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Extra wait beyond the waveform's nominal duration before we give up on
/// the completion flag.
const COMPLETION_MARGIN_MS: u64 = 500;

/// Short tail so device buffers drain before the stream is torn down.
const DRAIN_TAIL_MS: u64 = 100;

/// Output device plus a stream configuration negotiated at the synthesis
/// sample rate. `play_blocking` does not return until the waveform has been
/// rendered to the device.
pub struct Player {
    device: cpal::Device,
    config: StreamConfig,
    sample_rate: u32,
}

impl Player {
    /// List speaker names so the CLI can expose a selector.
    pub fn list_devices() -> Result<Vec<String>> {
        let host = cpal::default_host();
        let devices = host
            .output_devices()
            .context("no output devices available")?;
        let mut names = Vec::new();
        for device in devices {
            if let Ok(name) = device.name() {
                names.push(name);
            }
        }
        Ok(names)
    }

    /// Open the output device and negotiate a mono configuration at the
    /// requested rate, falling back to stereo when the device insists.
    pub fn new(preferred_device: Option<&str>, sample_rate: u32) -> Result<Self> {
        let host = cpal::default_host();
        let device = match preferred_device {
            Some(name) => {
                let mut devices = host
                    .output_devices()
                    .context("no output devices available")?;
                devices
                    .find(|d| d.name().map(|n| n == name).unwrap_or(false))
                    .ok_or_else(|| anyhow!("output device '{name}' not found"))?
            }
            None => host
                .default_output_device()
                .context("no default output device available")?,
        };

        let rate_supported = |c: &cpal::SupportedStreamConfigRange| {
            c.min_sample_rate() <= SampleRate(sample_rate)
                && c.max_sample_rate() >= SampleRate(sample_rate)
        };
        let supported = device
            .supported_output_configs()
            .context("failed to query output configurations")?
            .find(|c| c.channels() == 1 && rate_supported(c))
            .or_else(|| {
                device
                    .supported_output_configs()
                    .ok()?
                    .find(|c| c.channels() == 2 && rate_supported(c))
            })
            .ok_or_else(|| {
                anyhow!("no output configuration supports {sample_rate} Hz on this device")
            })?;
        let config = supported.with_sample_rate(SampleRate(sample_rate)).config();

        log_debug(&format!(
            "playback: device='{}' rate={sample_rate}Hz channels={}",
            device.name().unwrap_or_default(),
            config.channels
        ));

        Ok(Self {
            device,
            config,
            sample_rate,
        })
    }

    pub fn device_name(&self) -> String {
        self.device
            .name()
            .unwrap_or_else(|_| "Unknown Device".to_string())
    }

    /// Play a mono 16-bit waveform and block until it finishes (or until a
    /// generous deadline passes, so a wedged device cannot hang the
    /// conversation forever).
    pub fn play_blocking(&self, samples: &[i16]) -> Result<()> {
        if samples.is_empty() {
            return Ok(());
        }

        let channels = usize::from(self.config.channels.max(1));
        let waveform: Vec<f32> = samples.iter().map(|s| f32::from(*s) / 32_768.0).collect();
        let total = waveform.len();

        let finished = Arc::new(AtomicBool::new(false));
        let finished_cb = finished.clone();
        let mut position = 0usize;

        let err_fn = |err| log_debug(&format!("audio_playback_error: {err}"));
        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _| {
                    for frame in data.chunks_mut(channels) {
                        let sample = if position < waveform.len() {
                            let s = waveform[position];
                            position += 1;
                            s
                        } else {
                            finished_cb.store(true, Ordering::Relaxed);
                            0.0
                        };
                        for out in frame.iter_mut() {
                            *out = sample;
                        }
                    }
                },
                err_fn,
                None,
            )
            .context("failed to open the output stream")?;

        stream.play().context("failed to start playback")?;

        let nominal_ms = (total as u64 * 1000) / u64::from(self.sample_rate.max(1));
        let deadline = Duration::from_millis(nominal_ms + COMPLETION_MARGIN_MS);
        let started = Instant::now();
        while !finished.load(Ordering::Relaxed) {
            if started.elapsed() > deadline {
                log_debug("playback deadline reached before completion flag");
                break;
            }
            std::thread::sleep(Duration::from_millis(50));
        }
        std::thread::sleep(Duration::from_millis(DRAIN_TAIL_MS));
        drop(stream);

        log_debug(&format!("playback complete ({total} samples)"));
        Ok(())
    }
}
