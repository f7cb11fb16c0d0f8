//! Audio capture and playback pipeline.
//!
//! Capture runs through CPAL: the device callback chunks mono frames into a
//! bounded channel, the listen loop resamples them to the recognizer rate
//! and feeds the transcription session. Playback renders synthesized
//! waveforms synchronously.

mod capture;
mod dispatch;
mod playback;
mod resample;

pub use capture::{listen, ListenOutcome, Recorder};
pub use playback::Player;
