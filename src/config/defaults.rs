//! Default values shared by the CLI definition and its validation rules.

/// Directory produced by unpacking the French Vosk model archive.
pub const DEFAULT_STT_MODEL_DIR: &str = "vosk-model-small-fr-0.22/vosk-model-small-fr-0.22";

/// Where operators can fetch the recognizer model when it is missing.
pub const STT_MODEL_URL: &str = "https://alphacephei.com/vosk/models/vosk-model-small-fr-0.22.zip";

/// Piper binary location after unpacking the release archive.
pub const DEFAULT_PIPER_CMD: &str = "piper/piper";

/// Where operators can fetch the Piper release when it is missing.
pub const PIPER_RELEASE_URL: &str =
    "https://github.com/rhasspy/piper/releases/download/2023.11.14-1/piper_linux_x86_64.tar.gz";

/// French voice used for synthesis. The matching `.onnx.json` sidecar is
/// looked up next to it.
pub const DEFAULT_PIPER_VOICE: &str = "fr-fr-siwis-medium.onnx";

pub const DEFAULT_CAPTURE_SAMPLE_RATE: u32 = 16_000;

/// Samples per frame handed to the recognizer (0.5 s at 16 kHz).
pub const DEFAULT_FRAME_SAMPLES: usize = 8_000;

/// Piper's output rate for the siwis voices; the voice sidecar wins when it
/// is readable.
pub const DEFAULT_SYNTHESIS_SAMPLE_RATE: u32 = 22_050;

pub const DEFAULT_FRAME_CHANNEL_CAPACITY: usize = 32;

pub const DEFAULT_ASSISTANT_NAME: &str = "Assistant IT";

/// Pause between listen retries after a capture fault.
pub const DEFAULT_LISTEN_RETRY_DELAY_MS: u64 = 2_000;

/// Upper bound on one synthesis run (subprocess plus playback wait).
pub const DEFAULT_SYNTHESIS_TIMEOUT_MS: u64 = 30_000;

pub const MIN_SAMPLE_RATE: u32 = 8_000;
pub const MAX_SAMPLE_RATE: u32 = 48_000;
pub const MIN_FRAME_SAMPLES: usize = 160;
pub const MAX_FRAME_SAMPLES: usize = 96_000;
pub const MAX_RETRY_DELAY_MS: u64 = 60_000;
pub const MIN_SYNTHESIS_TIMEOUT_MS: u64 = 1_000;
pub const MAX_SYNTHESIS_TIMEOUT_MS: u64 = 120_000;
pub const MAX_CONSECUTIVE_ERROR_LIMIT: u32 = 100;
