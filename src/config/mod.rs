//! Command-line parsing and validation helpers.

mod defaults;
#[cfg(test)]
mod tests;
mod validation;

use clap::Parser;
use std::path::PathBuf;

pub use defaults::{
    DEFAULT_ASSISTANT_NAME, DEFAULT_CAPTURE_SAMPLE_RATE, DEFAULT_FRAME_CHANNEL_CAPACITY,
    DEFAULT_FRAME_SAMPLES, DEFAULT_LISTEN_RETRY_DELAY_MS, DEFAULT_PIPER_CMD, DEFAULT_PIPER_VOICE,
    DEFAULT_STT_MODEL_DIR, DEFAULT_SYNTHESIS_SAMPLE_RATE, DEFAULT_SYNTHESIS_TIMEOUT_MS,
    PIPER_RELEASE_URL, STT_MODEL_URL,
};

/// CLI options for the Depanvox assistant. Validated values keep the audio
/// pipeline and the synthesis subprocess safe.
#[derive(Debug, Parser, Clone)]
#[command(about = "Assistant vocal de support technique", author, version)]
pub struct AppConfig {
    /// Directory holding the Vosk recognizer model
    #[arg(long = "stt-model-dir", env = "DEPANVOX_STT_MODEL", default_value = DEFAULT_STT_MODEL_DIR)]
    pub stt_model_dir: PathBuf,

    /// Path to the Piper executable
    #[arg(long = "piper-cmd", env = "DEPANVOX_PIPER_CMD", default_value = DEFAULT_PIPER_CMD)]
    pub piper_cmd: PathBuf,

    /// Piper voice model (.onnx); its .onnx.json sidecar is read when present
    #[arg(long = "piper-voice", env = "DEPANVOX_PIPER_VOICE", default_value = DEFAULT_PIPER_VOICE)]
    pub piper_voice: PathBuf,

    /// Preferred audio input device name
    #[arg(long)]
    pub input_device: Option<String>,

    /// Preferred audio output device name
    #[arg(long)]
    pub output_device: Option<String>,

    /// Print detected audio input devices and exit
    #[arg(long = "list-input-devices", default_value_t = false)]
    pub list_input_devices: bool,

    /// Print detected audio output devices and exit
    #[arg(long = "list-output-devices", default_value_t = false)]
    pub list_output_devices: bool,

    /// Print environment diagnostics and exit
    #[arg(long = "doctor", default_value_t = false)]
    pub doctor: bool,

    /// Capture sample rate fed to the recognizer (Hz)
    #[arg(long = "capture-sample-rate", default_value_t = defaults::DEFAULT_CAPTURE_SAMPLE_RATE)]
    pub capture_sample_rate: u32,

    /// Samples per audio frame handed to the recognizer
    #[arg(long = "frame-samples", default_value_t = defaults::DEFAULT_FRAME_SAMPLES)]
    pub frame_samples: usize,

    /// Playback sample rate when the voice sidecar does not state one (Hz)
    #[arg(long = "synthesis-sample-rate", default_value_t = defaults::DEFAULT_SYNTHESIS_SAMPLE_RATE)]
    pub synthesis_sample_rate: u32,

    /// Frame channel capacity between the capture callback and the listen loop
    #[arg(long = "frame-channel-capacity", default_value_t = defaults::DEFAULT_FRAME_CHANNEL_CAPACITY)]
    pub frame_channel_capacity: usize,

    /// Name the assistant announces and answers identity questions with
    #[arg(long = "assistant-name", env = "DEPANVOX_NAME", default_value = DEFAULT_ASSISTANT_NAME)]
    pub assistant_name: String,

    /// Pause before retrying after a capture fault (milliseconds)
    #[arg(long = "listen-retry-delay-ms", default_value_t = defaults::DEFAULT_LISTEN_RETRY_DELAY_MS)]
    pub listen_retry_delay_ms: u64,

    /// Abort after this many consecutive capture faults (0 retries forever)
    #[arg(long = "max-consecutive-listen-errors", default_value_t = 0)]
    pub max_consecutive_listen_errors: u32,

    /// Hard limit on one synthesis run (milliseconds)
    #[arg(long = "synthesis-timeout-ms", default_value_t = defaults::DEFAULT_SYNTHESIS_TIMEOUT_MS)]
    pub synthesis_timeout_ms: u64,

    /// Enable file logging (debug)
    #[arg(long = "logs", env = "DEPANVOX_LOGS", default_value_t = false)]
    pub logs: bool,

    /// Disable all file logging (overrides --logs and log env vars)
    #[arg(long = "no-logs", env = "DEPANVOX_NO_LOGS", default_value_t = false)]
    pub no_logs: bool,

    /// Allow logging transcript/response snippets (debug log only)
    #[arg(long = "log-content", env = "DEPANVOX_LOG_CONTENT", default_value_t = false)]
    pub log_content: bool,

    /// Enable verbose timing logs
    #[arg(long)]
    pub log_timings: bool,
}

/// Tunable parameters for one `listen()` invocation.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    pub sample_rate: u32,
    pub frame_samples: usize,
    pub channel_capacity: usize,
}

/// Everything the synthesis path needs, frozen at startup.
#[derive(Debug, Clone)]
pub struct SynthesisConfig {
    pub piper_cmd: PathBuf,
    pub voice_model: PathBuf,
    pub sample_rate: u32,
    pub timeout_ms: u64,
    pub output_device: Option<String>,
}

impl AppConfig {
    pub fn capture_config(&self) -> CaptureConfig {
        CaptureConfig {
            sample_rate: self.capture_sample_rate,
            frame_samples: self.frame_samples,
            channel_capacity: self.frame_channel_capacity,
        }
    }

    /// `sample_rate` is whatever the voice sidecar reported, falling back to
    /// the configured rate when the sidecar is absent or unreadable.
    pub fn synthesis_config(&self, sample_rate: u32) -> SynthesisConfig {
        SynthesisConfig {
            piper_cmd: self.piper_cmd.clone(),
            voice_model: self.piper_voice.clone(),
            sample_rate,
            timeout_ms: self.synthesis_timeout_ms,
            output_device: self.output_device.clone(),
        }
    }
}
