use super::AppConfig;
use clap::Parser;

fn base_config() -> AppConfig {
    AppConfig::parse_from(["test-app"])
}

#[test]
fn defaults_are_valid() {
    let mut cfg = base_config();
    assert!(cfg.validate().is_ok());
}

#[test]
fn rejects_capture_rate_out_of_bounds() {
    let mut cfg = AppConfig::parse_from(["test-app", "--capture-sample-rate", "4000"]);
    assert!(cfg.validate().is_err());

    let mut cfg = AppConfig::parse_from(["test-app", "--capture-sample-rate", "96000"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn accepts_capture_rate_bounds() {
    let mut cfg = AppConfig::parse_from(["test-app", "--capture-sample-rate", "8000"]);
    cfg.frame_samples = 4_000;
    assert!(cfg.validate().is_ok());

    let mut cfg = AppConfig::parse_from(["test-app", "--capture-sample-rate", "48000"]);
    assert!(cfg.validate().is_ok());
}

#[test]
fn rejects_frame_size_longer_than_two_seconds() {
    let mut cfg = AppConfig::parse_from([
        "test-app",
        "--capture-sample-rate",
        "8000",
        "--frame-samples",
        "24000",
    ]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_tiny_frame() {
    let mut cfg = AppConfig::parse_from(["test-app", "--frame-samples", "8"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_channel_capacity_out_of_bounds() {
    let mut cfg = AppConfig::parse_from(["test-app", "--frame-channel-capacity", "2"]);
    assert!(cfg.validate().is_err());

    let mut cfg = AppConfig::parse_from(["test-app", "--frame-channel-capacity", "2048"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_excessive_retry_delay() {
    let mut cfg = AppConfig::parse_from(["test-app", "--listen-retry-delay-ms", "61000"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn zero_retry_delay_is_allowed() {
    let mut cfg = AppConfig::parse_from(["test-app", "--listen-retry-delay-ms", "0"]);
    assert!(cfg.validate().is_ok());
}

#[test]
fn rejects_synthesis_timeout_out_of_bounds() {
    let mut cfg = AppConfig::parse_from(["test-app", "--synthesis-timeout-ms", "500"]);
    assert!(cfg.validate().is_err());

    let mut cfg = AppConfig::parse_from(["test-app", "--synthesis-timeout-ms", "600000"]);
    assert!(cfg.validate().is_err());
}

#[test]
fn trims_and_rejects_blank_assistant_name() {
    let mut cfg = AppConfig::parse_from(["test-app", "--assistant-name", "  Clara  "]);
    assert!(cfg.validate().is_ok());
    assert_eq!(cfg.assistant_name, "Clara");

    let mut cfg = AppConfig::parse_from(["test-app", "--assistant-name", "   "]);
    assert!(cfg.validate().is_err());
}

#[test]
fn rejects_blank_device_names() {
    let mut cfg = base_config();
    cfg.input_device = Some("  ".to_string());
    assert!(cfg.validate().is_err());

    let mut cfg = base_config();
    cfg.output_device = Some(String::new());
    assert!(cfg.validate().is_err());
}

#[test]
fn capture_config_mirrors_cli_values() {
    let mut cfg = AppConfig::parse_from([
        "test-app",
        "--capture-sample-rate",
        "16000",
        "--frame-samples",
        "4000",
        "--frame-channel-capacity",
        "16",
    ]);
    cfg.validate().expect("config should validate");
    let capture = cfg.capture_config();
    assert_eq!(capture.sample_rate, 16_000);
    assert_eq!(capture.frame_samples, 4_000);
    assert_eq!(capture.channel_capacity, 16);
}

#[test]
fn synthesis_config_prefers_sidecar_rate() {
    let cfg = base_config();
    let synth = cfg.synthesis_config(24_000);
    assert_eq!(synth.sample_rate, 24_000);
    assert_eq!(synth.timeout_ms, cfg.synthesis_timeout_ms);
}
