//! Depanvox entrypoint: configuration, asset checks, then the conversation
//! loop.
//!
//! Interruption is a SIGINT/SIGTERM handler flipping an atomic flag; the
//! listen loop and the session driver observe it and wind down through the
//! same farewell path as a spoken exit.

use anyhow::{anyhow, Result};
use depanvox::audio::{Player, Recorder};
use depanvox::config::AppConfig;
use depanvox::intent::Classifier;
use depanvox::session::SessionDriver;
use depanvox::stt::Transcriber;
use depanvox::tts::SpeechOutput;
use depanvox::{assets, init_logging, init_tracing, log_debug};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

fn main() -> Result<()> {
    let config = AppConfig::parse_args()?;
    init_logging(&config);
    init_tracing(&config);

    if config.list_input_devices {
        for name in Recorder::list_devices()? {
            println!("{name}");
        }
        return Ok(());
    }
    if config.list_output_devices {
        for name in Player::list_devices()? {
            println!("{name}");
        }
        return Ok(());
    }
    if config.doctor {
        print_doctor_report(&config);
        return Ok(());
    }

    assets::verify(&config)?;

    let transcriber = Transcriber::new(&config.stt_model_dir, config.capture_sample_rate)?;
    println!("Reconnaissance vocale prête.");

    let recorder = Recorder::new(config.input_device.as_deref())?;
    log_debug(&format!("input device: {}", recorder.device_name()));

    let synthesis_rate = assets::voice_sample_rate(&config);
    let output = SpeechOutput::new(
        config.assistant_name.clone(),
        config.synthesis_config(synthesis_rate),
    );
    let classifier = Classifier::new(config.assistant_name.clone());

    let stop_flag = Arc::new(AtomicBool::new(false));
    if let Err(err) = install_stop_signal_handlers(stop_flag.clone()) {
        eprintln!("Avertissement : {err:#}");
    }

    let mut driver = SessionDriver::new(
        recorder,
        transcriber,
        classifier,
        output,
        &config,
        stop_flag,
    );
    driver.run()
}

fn print_doctor_report(config: &AppConfig) {
    println!("depanvox {}", env!("CARGO_PKG_VERSION"));
    println!("Fichiers requis :");
    print!("{}", assets::doctor_report(config));
    print_device_section("Périphériques d'entrée :", Recorder::list_devices());
    print_device_section("Périphériques de sortie :", Player::list_devices());
}

fn print_device_section(title: &str, devices: Result<Vec<String>>) {
    println!("{title}");
    match devices {
        Ok(names) if names.is_empty() => println!("  (aucun)"),
        Ok(names) => {
            for name in names {
                println!("  {name}");
            }
        }
        Err(err) => println!("  indisponibles : {err:#}"),
    }
}

/// The handler can only touch statics, so the shared flag is registered
/// here before the handler is installed.
static STOP_FLAG: OnceLock<Arc<AtomicBool>> = OnceLock::new();

#[cfg(unix)]
extern "C" fn handle_stop_signal(_: libc::c_int) {
    if let Some(flag) = STOP_FLAG.get() {
        flag.store(true, Ordering::SeqCst);
    }
}

#[cfg(unix)]
fn install_stop_signal_handlers(flag: Arc<AtomicBool>) -> Result<()> {
    let _ = STOP_FLAG.set(flag);
    unsafe {
        // SAFETY: handle_stop_signal only performs atomic operations, which
        // are async-signal-safe.
        let handler = handle_stop_signal as *const () as libc::sighandler_t;
        if libc::signal(libc::SIGINT, handler) == libc::SIG_ERR {
            return Err(anyhow!("failed to install SIGINT handler"));
        }
        if libc::signal(libc::SIGTERM, handler) == libc::SIG_ERR {
            return Err(anyhow!("failed to install SIGTERM handler"));
        }
    }
    Ok(())
}

#[cfg(not(unix))]
fn install_stop_signal_handlers(flag: Arc<AtomicBool>) -> Result<()> {
    let _ = STOP_FLAG.set(flag);
    Err(anyhow!(
        "interruption par signal non prise en charge sur cette plateforme"
    ))
}
