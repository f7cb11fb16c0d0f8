//! Startup verification of the recognizer model and synthesis assets.
//!
//! Nothing is downloaded here; when an asset is missing the process aborts
//! with a message naming the file and where to fetch it.

use anyhow::{bail, Result};
use serde::Deserialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::config::{AppConfig, PIPER_RELEASE_URL, STT_MODEL_URL};
use crate::log_debug;

/// Subset of the Piper voice `.onnx.json` sidecar we care about.
#[derive(Debug, Deserialize)]
struct VoiceSidecar {
    audio: Option<VoiceAudio>,
}

#[derive(Debug, Deserialize)]
struct VoiceAudio {
    sample_rate: Option<u32>,
}

/// Sidecar convention: the voice config sits next to the model with a
/// `.json` suffix appended to the full file name.
pub fn sidecar_path(voice_model: &Path) -> PathBuf {
    let mut name = voice_model.as_os_str().to_os_string();
    name.push(".json");
    PathBuf::from(name)
}

/// Abort-worthy checks: recognizer model directory, Piper executable, voice
/// model. The sidecar is advisory only.
pub fn verify(config: &AppConfig) -> Result<()> {
    if !config.stt_model_dir.is_dir() {
        bail!(
            "recognizer model not found at '{}'; download it from {} and unpack it there",
            config.stt_model_dir.display(),
            STT_MODEL_URL
        );
    }
    if !config.piper_cmd.exists() {
        bail!(
            "piper executable not found at '{}'; download it from {} and unpack it there",
            config.piper_cmd.display(),
            PIPER_RELEASE_URL
        );
    }
    if !config.piper_voice.exists() {
        bail!(
            "piper voice model not found at '{}'; fetch the voice (.onnx and .onnx.json) from the piper voices collection",
            config.piper_voice.display()
        );
    }
    if !sidecar_path(&config.piper_voice).exists() {
        eprintln!(
            "Avertissement : fichier de configuration de voix absent ('{}'), la synthèse peut être dégradée.",
            sidecar_path(&config.piper_voice).display()
        );
    }
    Ok(())
}

/// Playback rate for the configured voice: the sidecar's value when
/// readable, the configured fallback otherwise.
pub fn voice_sample_rate(config: &AppConfig) -> u32 {
    match read_sidecar_rate(&sidecar_path(&config.piper_voice)) {
        Some(rate) => rate,
        None => {
            log_debug(&format!(
                "voice sidecar unreadable, assuming {} Hz",
                config.synthesis_sample_rate
            ));
            config.synthesis_sample_rate
        }
    }
}

fn read_sidecar_rate(path: &Path) -> Option<u32> {
    let raw = std::fs::read_to_string(path).ok()?;
    let sidecar: VoiceSidecar = serde_json::from_str(&raw).ok()?;
    sidecar.audio?.sample_rate
}

/// Human-readable asset summary for `--doctor`.
pub fn doctor_report(config: &AppConfig) -> String {
    let mut report = String::new();
    let mut push_check = |label: &str, path: &Path, present: bool| {
        let _ = writeln!(
            report,
            "  {label}: {} ({})",
            if present { "ok" } else { "MISSING" },
            path.display()
        );
    };
    push_check(
        "recognizer model",
        &config.stt_model_dir,
        config.stt_model_dir.is_dir(),
    );
    push_check("piper executable", &config.piper_cmd, config.piper_cmd.exists());
    push_check("piper voice", &config.piper_voice, config.piper_voice.exists());
    let sidecar = sidecar_path(&config.piper_voice);
    push_check("voice sidecar", &sidecar, sidecar.exists());
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn config_with(dir: &Path) -> AppConfig {
        let mut cfg = AppConfig::parse_from(["test-app"]);
        cfg.stt_model_dir = dir.join("model");
        cfg.piper_cmd = dir.join("piper");
        cfg.piper_voice = dir.join("voice.onnx");
        cfg
    }

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("depanvox-assets-{tag}-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    #[test]
    fn sidecar_path_appends_full_suffix() {
        let path = sidecar_path(Path::new("fr-fr-siwis-medium.onnx"));
        assert_eq!(path, PathBuf::from("fr-fr-siwis-medium.onnx.json"));
    }

    #[test]
    fn verify_reports_missing_model_first() {
        let dir = scratch_dir("missing-model");
        let cfg = config_with(&dir);
        let err = verify(&cfg).expect_err("model is absent");
        assert!(err.to_string().contains("recognizer model"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn verify_reports_missing_piper_after_model() {
        let dir = scratch_dir("missing-piper");
        let cfg = config_with(&dir);
        std::fs::create_dir_all(&cfg.stt_model_dir).expect("create model dir");
        let err = verify(&cfg).expect_err("piper is absent");
        assert!(err.to_string().contains("piper executable"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn verify_passes_when_assets_exist() {
        let dir = scratch_dir("all-present");
        let cfg = config_with(&dir);
        std::fs::create_dir_all(&cfg.stt_model_dir).expect("create model dir");
        std::fs::write(&cfg.piper_cmd, b"").expect("create piper stub");
        std::fs::write(&cfg.piper_voice, b"").expect("create voice stub");
        assert!(verify(&cfg).is_ok());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn sidecar_rate_wins_when_present() {
        let dir = scratch_dir("sidecar");
        let cfg = config_with(&dir);
        std::fs::write(
            sidecar_path(&cfg.piper_voice),
            r#"{"audio": {"sample_rate": 24000}}"#,
        )
        .expect("write sidecar");
        assert_eq!(voice_sample_rate(&cfg), 24_000);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_sidecar_falls_back_to_configured_rate() {
        let dir = scratch_dir("no-sidecar");
        let cfg = config_with(&dir);
        assert_eq!(voice_sample_rate(&cfg), cfg.synthesis_sample_rate);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_sidecar_falls_back_to_configured_rate() {
        let dir = scratch_dir("bad-sidecar");
        let cfg = config_with(&dir);
        std::fs::write(sidecar_path(&cfg.piper_voice), b"not json").expect("write sidecar");
        assert_eq!(voice_sample_rate(&cfg), cfg.synthesis_sample_rate);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
