//! Vosk speech-to-text integration.
//!
//! Wraps `vosk` to provide a streaming transcription session. The model is
//! loaded once and reused across turns; `reset` discards recognizer state
//! without reloading it.

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use std::sync::Once;
use vosk::{CompleteResult, DecodingState, Model, Recognizer};

/// What one audio frame produced once the engine has seen it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscribeEvent {
    /// The engine judged an utterance boundary reached. The text may be
    /// empty (silence also finalizes); callers decide what to do with it.
    Final(String),
    /// Best-effort in-progress text for display only.
    Partial(String),
    /// Nothing new this frame.
    Pending,
}

/// Long-lived recognizer session for one conversation.
///
/// Not thread-safe; drive it from the thread that owns the listen loop.
pub struct Transcriber {
    recognizer: Recognizer,
    _model: Model,
}

impl Transcriber {
    /// Loads the Vosk model from disk and builds a recognizer at the capture
    /// sample rate. Engine logging is lowered once per process because Kaldi
    /// is chatty on stderr during model load.
    pub fn new(model_dir: &Path, sample_rate: u32) -> Result<Self> {
        silence_engine_logs();

        let model_dir_str = model_dir
            .to_str()
            .ok_or_else(|| anyhow!("model path '{}' is not valid UTF-8", model_dir.display()))?;
        let model = Model::new(model_dir_str).with_context(|| {
            format!("failed to load recognizer model from '{}'", model_dir.display())
        })?;
        let mut recognizer = Recognizer::new(&model, sample_rate as f32)
            .context("failed to create recognizer for the loaded model")?;
        recognizer.set_words(false);

        Ok(Self {
            recognizer,
            _model: model,
        })
    }

    /// Feed one frame of 16-bit mono PCM and report what the engine made of
    /// it.
    pub fn accept_frame(&mut self, frame: &[i16]) -> Result<TranscribeEvent> {
        let state = self
            .recognizer
            .accept_waveform(frame)
            .map_err(|err| anyhow!("recognizer rejected audio frame: {err:?}"))?;
        match state {
            DecodingState::Finalized => {
                let text = complete_text(self.recognizer.result());
                Ok(TranscribeEvent::Final(text))
            }
            DecodingState::Running => {
                let partial = self.recognizer.partial_result().partial.to_string();
                if partial.is_empty() {
                    Ok(TranscribeEvent::Pending)
                } else {
                    Ok(TranscribeEvent::Partial(partial))
                }
            }
            DecodingState::Failed => Err(anyhow!("recognizer entered a failed decoding state")),
        }
    }

    /// Discard in-progress recognizer state, keeping the loaded model.
    /// Call after a final result and after an interruption.
    pub fn reset(&mut self) {
        self.recognizer.reset();
    }
}

fn complete_text(result: CompleteResult<'_>) -> String {
    match result {
        CompleteResult::Single(single) => single.text.to_string(),
        CompleteResult::Multiple(multiple) => multiple
            .alternatives
            .first()
            .map(|alternative| alternative.text.to_string())
            .unwrap_or_default(),
    }
}

fn silence_engine_logs() {
    static LOWER_LOG_LEVEL: Once = Once::new();
    LOWER_LOG_LEVEL.call_once(|| {
        vosk::set_log_level(vosk::LogLevel::Error);
    });
}
