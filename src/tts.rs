//! Piper text-to-speech integration.
//!
//! Synthesis runs the Piper executable as a scoped subprocess: text goes in
//! on stdin, raw 16-bit PCM comes back on stdout. Every failure (missing
//! asset, bad exit status, empty audio, timeout) is an `Err` the caller can
//! log and survive; the conversation must not die because a response could
//! not be voiced.

use anyhow::{anyhow, bail, Context, Result};
use std::io::Read;
use std::io::Write as _;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::audio::Player;
use crate::config::SynthesisConfig;
use crate::{log_debug, log_debug_content};

/// Runs the external synthesis process and converts its output.
pub struct Synthesizer {
    cfg: SynthesisConfig,
}

impl Synthesizer {
    pub fn new(cfg: SynthesisConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &SynthesisConfig {
        &self.cfg
    }

    /// Synthesize `text` into mono 16-bit samples at the configured rate.
    pub fn synthesize(&self, text: &str) -> Result<Vec<i16>> {
        if !self.cfg.piper_cmd.exists() {
            bail!(
                "piper executable not found at '{}'",
                self.cfg.piper_cmd.display()
            );
        }
        if !self.cfg.voice_model.exists() {
            bail!(
                "piper voice model not found at '{}'",
                self.cfg.voice_model.display()
            );
        }

        let started = Instant::now();
        let mut child = Command::new(&self.cfg.piper_cmd)
            .arg("--model")
            .arg(&self.cfg.voice_model)
            .arg("--output_raw")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .context("failed to start the synthesis process")?;

        let mut stdin = child
            .stdin
            .take()
            .context("failed to open the synthesis process stdin")?;
        let mut stdout = child
            .stdout
            .take()
            .context("failed to capture the synthesis process stdout")?;
        let mut stderr = child
            .stderr
            .take()
            .context("failed to capture the synthesis process stderr")?;

        // Writer and stderr drain run on their own threads so the audio read
        // below can never deadlock against a full pipe.
        let text_owned = text.to_string();
        let writer = thread::spawn(move || {
            let _ = stdin.write_all(text_owned.as_bytes());
            // stdin closes on drop, signalling end of input.
        });
        let stderr_drain = thread::spawn(move || {
            let mut diagnostics = String::new();
            let _ = stderr.read_to_string(&mut diagnostics);
            diagnostics
        });
        let stdout_drain = thread::spawn(move || {
            let mut audio = Vec::new();
            let result = stdout.read_to_end(&mut audio);
            (audio, result)
        });

        let status = wait_with_timeout(&mut child, Duration::from_millis(self.cfg.timeout_ms));

        let _ = writer.join();
        let (audio_bytes, read_result) = stdout_drain
            .join()
            .map_err(|_| anyhow!("synthesis audio reader thread panicked"))?;
        let diagnostics = stderr_drain.join().unwrap_or_default();

        let status = status?;
        read_result.context("failed to read synthesized audio")?;

        if !status.success() {
            bail!(
                "synthesis process failed with {status}: {}",
                diagnostics.trim()
            );
        }
        if audio_bytes.is_empty() {
            bail!("synthesis process produced no audio output");
        }

        let samples = pcm_bytes_to_samples(&audio_bytes);
        if samples.is_empty() {
            bail!("synthesized audio was empty");
        }
        log_debug(&format!(
            "synthesis: {} samples in {:.2}s",
            samples.len(),
            started.elapsed().as_secs_f64()
        ));
        Ok(samples)
    }
}

fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<ExitStatus> {
    let deadline = Instant::now() + timeout;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {
                if Instant::now() >= deadline {
                    let _ = child.kill();
                    let _ = child.wait();
                    bail!("synthesis process timed out after {} ms", timeout.as_millis());
                }
                thread::sleep(Duration::from_millis(50));
            }
            Err(err) => return Err(anyhow!("failed to wait for the synthesis process: {err}")),
        }
    }
}

/// Interpret raw bytes as little-endian 16-bit mono PCM. A trailing odd
/// byte is discarded.
pub(crate) fn pcm_bytes_to_samples(bytes: &[u8]) -> Vec<i16> {
    bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}

/// Voices responses: prints the text, synthesizes it, and plays the result
/// synchronously. The output device is opened lazily and kept for the life
/// of the session once it works.
pub struct SpeechOutput {
    assistant_name: String,
    synthesizer: Synthesizer,
    player: Option<Player>,
}

impl SpeechOutput {
    pub fn new(assistant_name: impl Into<String>, cfg: SynthesisConfig) -> Self {
        Self {
            assistant_name: assistant_name.into(),
            synthesizer: Synthesizer::new(cfg),
            player: None,
        }
    }

    /// Open the output device without speaking. Used for the startup
    /// capability check; failure is reported, not fatal.
    pub fn check_output_device(&mut self) -> Result<String> {
        self.ensure_player().map(Player::device_name)
    }

    /// Print and voice one response, blocking until playback completes.
    /// On `Err` the text has already been printed; the session continues.
    pub fn speak(&mut self, text: &str) -> Result<()> {
        println!("{} : {text}", self.assistant_name);
        log_debug_content(&format!("speak: {text}"));

        let samples = self.synthesizer.synthesize(text)?;
        let player = self.ensure_player()?;
        player.play_blocking(&samples)
    }

    fn ensure_player(&mut self) -> Result<&Player> {
        if self.player.is_none() {
            let cfg = self.synthesizer.config();
            let player = Player::new(cfg.output_device.as_deref(), cfg.sample_rate)
                .context("failed to open the output device")?;
            self.player = Some(player);
        }
        self.player
            .as_ref()
            .ok_or_else(|| anyhow!("output device unavailable"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("depanvox-tts-{tag}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    fn synth_config(piper_cmd: &Path, voice: &Path, timeout_ms: u64) -> SynthesisConfig {
        SynthesisConfig {
            piper_cmd: piper_cmd.to_path_buf(),
            voice_model: voice.to_path_buf(),
            sample_rate: 22_050,
            timeout_ms,
            output_device: None,
        }
    }

    #[cfg(unix)]
    fn write_script(path: &Path, body: &str) {
        use std::os::unix::fs::PermissionsExt;
        std::fs::write(path, format!("#!/bin/sh\n{body}\n")).expect("write script");
        let mut perms = std::fs::metadata(path).expect("script metadata").permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(path, perms).expect("make script executable");
    }

    #[test]
    fn pcm_conversion_reads_little_endian_pairs() {
        assert_eq!(pcm_bytes_to_samples(&[0x01, 0x00, 0xFF, 0x7F]), vec![1, i16::MAX]);
        assert_eq!(pcm_bytes_to_samples(&[0x00, 0x80]), vec![i16::MIN]);
    }

    #[test]
    fn pcm_conversion_drops_trailing_odd_byte() {
        assert_eq!(pcm_bytes_to_samples(&[0x02, 0x00, 0x42]), vec![2]);
        assert!(pcm_bytes_to_samples(&[0x42]).is_empty());
        assert!(pcm_bytes_to_samples(&[]).is_empty());
    }

    #[test]
    fn synthesize_rejects_missing_executable() {
        let dir = scratch_dir("no-exe");
        let voice = dir.join("voice.onnx");
        std::fs::write(&voice, b"").expect("voice stub");
        let synthesizer = Synthesizer::new(synth_config(&dir.join("absent"), &voice, 5_000));
        let err = synthesizer.synthesize("bonjour").expect_err("executable is absent");
        assert!(err.to_string().contains("piper executable"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[cfg(unix)]
    #[test]
    fn synthesize_rejects_missing_voice_model() {
        let dir = scratch_dir("no-voice");
        let exe = dir.join("piper");
        write_script(&exe, "exit 0");
        let synthesizer = Synthesizer::new(synth_config(&exe, &dir.join("absent.onnx"), 5_000));
        let err = synthesizer.synthesize("bonjour").expect_err("voice is absent");
        assert!(err.to_string().contains("voice model"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[cfg(unix)]
    #[test]
    fn synthesize_reports_nonzero_exit_with_stderr() {
        let dir = scratch_dir("exit-status");
        let exe = dir.join("piper");
        let voice = dir.join("voice.onnx");
        std::fs::write(&voice, b"").expect("voice stub");
        write_script(&exe, "echo 'missing espeak data' >&2\nexit 3");
        let synthesizer = Synthesizer::new(synth_config(&exe, &voice, 5_000));
        let err = synthesizer.synthesize("bonjour").expect_err("process exits nonzero");
        let message = err.to_string();
        assert!(message.contains("failed with"), "{message}");
        assert!(message.contains("missing espeak data"), "{message}");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[cfg(unix)]
    #[test]
    fn synthesize_rejects_empty_audio_output() {
        let dir = scratch_dir("empty-audio");
        let exe = dir.join("piper");
        let voice = dir.join("voice.onnx");
        std::fs::write(&voice, b"").expect("voice stub");
        write_script(&exe, "exit 0");
        let synthesizer = Synthesizer::new(synth_config(&exe, &voice, 5_000));
        let err = synthesizer.synthesize("bonjour").expect_err("no audio was produced");
        assert!(err.to_string().contains("no audio output"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[cfg(unix)]
    #[test]
    fn synthesize_returns_pcm_samples_from_stdout() {
        let dir = scratch_dir("pcm-out");
        let exe = dir.join("piper");
        let voice = dir.join("voice.onnx");
        std::fs::write(&voice, b"").expect("voice stub");
        // Emits two little-endian samples: 1 and 2.
        write_script(&exe, "printf '\\001\\000\\002\\000'");
        let synthesizer = Synthesizer::new(synth_config(&exe, &voice, 5_000));
        let samples = synthesizer.synthesize("bonjour").expect("synthesis succeeds");
        assert_eq!(samples, vec![1, 2]);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[cfg(unix)]
    #[test]
    fn synthesize_receives_text_on_stdin() {
        let dir = scratch_dir("stdin");
        let exe = dir.join("piper");
        let voice = dir.join("voice.onnx");
        std::fs::write(&voice, b"").expect("voice stub");
        // Echo stdin back as "audio": the byte pair of "ab" is one sample.
        write_script(&exe, "cat");
        let synthesizer = Synthesizer::new(synth_config(&exe, &voice, 5_000));
        let samples = synthesizer.synthesize("ab").expect("synthesis succeeds");
        assert_eq!(samples, vec![i16::from_le_bytes([b'a', b'b'])]);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[cfg(unix)]
    #[test]
    fn synthesize_kills_processes_that_overrun_the_timeout() {
        let dir = scratch_dir("timeout");
        let exe = dir.join("piper");
        let voice = dir.join("voice.onnx");
        std::fs::write(&voice, b"").expect("voice stub");
        write_script(&exe, "sleep 30");
        let synthesizer = Synthesizer::new(synth_config(&exe, &voice, 200));
        let started = Instant::now();
        let err = synthesizer.synthesize("bonjour").expect_err("process overruns");
        assert!(err.to_string().contains("timed out"));
        assert!(started.elapsed() < Duration::from_secs(10));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
