use super::defaults::{
    MAX_CONSECUTIVE_ERROR_LIMIT, MAX_FRAME_SAMPLES, MAX_RETRY_DELAY_MS, MAX_SAMPLE_RATE,
    MAX_SYNTHESIS_TIMEOUT_MS, MIN_FRAME_SAMPLES, MIN_SAMPLE_RATE, MIN_SYNTHESIS_TIMEOUT_MS,
};
use super::AppConfig;
use anyhow::{bail, Result};
use clap::Parser;

impl AppConfig {
    /// Parse CLI arguments and validate them right away.
    pub fn parse_args() -> Result<Self> {
        let mut config = Self::parse();
        config.validate()?;
        Ok(config)
    }

    /// Check CLI values and normalize what needs normalizing.
    pub fn validate(&mut self) -> Result<()> {
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&self.capture_sample_rate) {
            bail!(
                "--capture-sample-rate must be between {MIN_SAMPLE_RATE} and {MAX_SAMPLE_RATE} Hz, got {}",
                self.capture_sample_rate
            );
        }
        if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&self.synthesis_sample_rate) {
            bail!(
                "--synthesis-sample-rate must be between {MIN_SAMPLE_RATE} and {MAX_SAMPLE_RATE} Hz, got {}",
                self.synthesis_sample_rate
            );
        }
        if !(MIN_FRAME_SAMPLES..=MAX_FRAME_SAMPLES).contains(&self.frame_samples) {
            bail!(
                "--frame-samples must be between {MIN_FRAME_SAMPLES} and {MAX_FRAME_SAMPLES}, got {}",
                self.frame_samples
            );
        }
        // More than two seconds of audio per frame makes the partial display
        // useless and stretches interruption latency.
        if self.frame_samples as u64 > u64::from(self.capture_sample_rate) * 2 {
            bail!(
                "--frame-samples ({}) exceeds two seconds at {} Hz",
                self.frame_samples,
                self.capture_sample_rate
            );
        }
        if !(4..=1024).contains(&self.frame_channel_capacity) {
            bail!(
                "--frame-channel-capacity must be between 4 and 1024, got {}",
                self.frame_channel_capacity
            );
        }
        if self.listen_retry_delay_ms > MAX_RETRY_DELAY_MS {
            bail!(
                "--listen-retry-delay-ms must be at most {MAX_RETRY_DELAY_MS}, got {}",
                self.listen_retry_delay_ms
            );
        }
        if self.max_consecutive_listen_errors > MAX_CONSECUTIVE_ERROR_LIMIT {
            bail!(
                "--max-consecutive-listen-errors must be at most {MAX_CONSECUTIVE_ERROR_LIMIT}, got {}",
                self.max_consecutive_listen_errors
            );
        }
        if !(MIN_SYNTHESIS_TIMEOUT_MS..=MAX_SYNTHESIS_TIMEOUT_MS)
            .contains(&self.synthesis_timeout_ms)
        {
            bail!(
                "--synthesis-timeout-ms must be between {MIN_SYNTHESIS_TIMEOUT_MS} and {MAX_SYNTHESIS_TIMEOUT_MS}, got {}",
                self.synthesis_timeout_ms
            );
        }

        self.assistant_name = self.assistant_name.trim().to_string();
        if self.assistant_name.is_empty() {
            bail!("--assistant-name must not be blank");
        }

        if let Some(device) = &self.input_device {
            if device.trim().is_empty() {
                bail!("--input-device must not be blank when provided");
            }
        }
        if let Some(device) = &self.output_device {
            if device.trim().is_empty() {
                bail!("--output-device must not be blank when provided");
            }
        }

        Ok(())
    }
}
