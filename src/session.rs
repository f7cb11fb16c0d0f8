//! Top-level conversation loop.
//!
//! Greets, then cycles listen → classify → speak until an exit intent, an
//! interruption, or (when a cap is configured) too many consecutive capture
//! faults. Speech-output failures never end the session: the text was
//! already printed, so the conversation limps on silently.

use crate::audio::{listen, ListenOutcome, Recorder};
use crate::config::{AppConfig, CaptureConfig};
use crate::console::ProgressLine;
use crate::intent::{self, Classifier, Reply};
use crate::log_debug;
use crate::stt::Transcriber;
use crate::tts::SpeechOutput;
use anyhow::{bail, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// What the driver does next after one listen cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Step {
    /// Voice a reply and listen again.
    Speak(String),
    /// Nothing usable was heard; ask the user to repeat.
    Reprompt,
    /// Capture faulted; apologize, pause, then retry.
    Apologize,
    /// The user interrupted; say goodbye, then stop.
    Farewell,
    /// An exit intent; stop without further speech.
    Stop,
}

/// Pure decision step between capture and speech, kept free of I/O so the
/// cycle is testable without devices.
pub(crate) fn dispatch(outcome: &ListenOutcome, classifier: &Classifier) -> Step {
    match outcome {
        ListenOutcome::Failed(_) => Step::Apologize,
        ListenOutcome::Interrupted => Step::Farewell,
        ListenOutcome::Utterance(utterance) if utterance.is_empty() => Step::Reprompt,
        ListenOutcome::Utterance(utterance) => match classifier.classify(utterance) {
            Reply::EndSession => Step::Stop,
            Reply::Text(text) => Step::Speak(text),
            Reply::Unrecognized(text) => Step::Speak(text),
        },
    }
}

pub struct SessionDriver {
    recorder: Recorder,
    transcriber: Transcriber,
    classifier: Classifier,
    output: SpeechOutput,
    capture_cfg: CaptureConfig,
    assistant_name: String,
    retry_delay: Duration,
    max_consecutive_errors: u32,
    log_timings: bool,
    stop_flag: Arc<AtomicBool>,
}

impl SessionDriver {
    pub fn new(
        recorder: Recorder,
        transcriber: Transcriber,
        classifier: Classifier,
        output: SpeechOutput,
        config: &AppConfig,
        stop_flag: Arc<AtomicBool>,
    ) -> Self {
        Self {
            recorder,
            transcriber,
            classifier,
            output,
            capture_cfg: config.capture_config(),
            assistant_name: config.assistant_name.clone(),
            retry_delay: Duration::from_millis(config.listen_retry_delay_ms),
            max_consecutive_errors: config.max_consecutive_listen_errors,
            log_timings: config.log_timings,
            stop_flag,
        }
    }

    /// Run the conversation to completion. `Ok` covers both the exit-intent
    /// and interruption paths; `Err` only the configured fault cap.
    pub fn run(&mut self) -> Result<()> {
        match self.output.check_output_device() {
            Ok(name) => log_debug(&format!("output device ready: {name}")),
            Err(err) => eprintln!(
                "Avertissement : vérification du périphérique de sortie échouée ({err:#}). La lecture audio pourrait poser problème."
            ),
        }

        self.say(&intent::greeting(&self.assistant_name));

        let outcome = self.conversation_loop();
        if let Err(err) = &outcome {
            log_debug(&format!("session aborted: {err:#}"));
        }
        println!("Assistant terminé.");
        outcome
    }

    fn conversation_loop(&mut self) -> Result<()> {
        let mut progress = ProgressLine::new();
        let mut consecutive_errors = 0u32;
        loop {
            if self.stop_flag.load(Ordering::Relaxed) {
                // Interrupted outside of a listen call (e.g. mid-playback).
                self.say(intent::farewell());
                break;
            }

            let listen_started = Instant::now();
            let outcome = listen(
                &self.recorder,
                &mut self.transcriber,
                &self.capture_cfg,
                &self.stop_flag,
                &mut progress,
            );
            let listen_elapsed = listen_started.elapsed().as_secs_f64();
            tracing::debug!(listen_s = listen_elapsed, "listen cycle complete");
            match dispatch(&outcome, &self.classifier) {
                Step::Speak(text) => {
                    consecutive_errors = 0;
                    let respond_started = Instant::now();
                    self.say(&text);
                    if self.log_timings {
                        log_debug(&format!(
                            "timing|phase=turn|listen_s={listen_elapsed:.3}|respond_s={:.3}|chars={}",
                            respond_started.elapsed().as_secs_f64(),
                            text.len()
                        ));
                    }
                }
                Step::Reprompt => {
                    consecutive_errors = 0;
                    self.say(intent::reprompt());
                }
                Step::Apologize => {
                    consecutive_errors += 1;
                    self.say(intent::listen_apology());
                    if self.max_consecutive_errors > 0
                        && consecutive_errors >= self.max_consecutive_errors
                    {
                        bail!(
                            "listening failed {consecutive_errors} times in a row; giving up"
                        );
                    }
                    std::thread::sleep(self.retry_delay);
                }
                Step::Farewell => {
                    self.say(intent::farewell());
                    break;
                }
                Step::Stop => break,
            }
        }

        Ok(())
    }

    /// Speaking is best-effort: the text is already on screen, so a
    /// synthesis or playback fault is logged and the session continues.
    fn say(&mut self, text: &str) {
        if let Err(err) = self.output.speak(text) {
            log_debug(&format!("speech output failed: {err:#}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    struct FixedClock(NaiveDateTime);

    impl intent::Clock for FixedClock {
        fn now(&self) -> NaiveDateTime {
            self.0
        }
    }

    fn classifier() -> Classifier {
        let instant = NaiveDate::from_ymd_opt(2024, 3, 5)
            .expect("valid date")
            .and_hms_opt(10, 30, 0)
            .expect("valid time");
        Classifier::with_clock("Assistant IT", Box::new(FixedClock(instant)))
    }

    #[test]
    fn capture_fault_leads_to_apology_and_retry() {
        let step = dispatch(
            &ListenOutcome::Failed("device vanished".to_string()),
            &classifier(),
        );
        assert_eq!(step, Step::Apologize);
    }

    #[test]
    fn interruption_leads_to_farewell() {
        let step = dispatch(&ListenOutcome::Interrupted, &classifier());
        assert_eq!(step, Step::Farewell);
    }

    #[test]
    fn empty_utterance_leads_to_reprompt() {
        let step = dispatch(&ListenOutcome::Utterance(String::new()), &classifier());
        assert_eq!(step, Step::Reprompt);
    }

    #[test]
    fn exit_intent_stops_without_speaking() {
        let step = dispatch(
            &ListenOutcome::Utterance("au revoir".to_string()),
            &classifier(),
        );
        assert_eq!(step, Step::Stop);
    }

    #[test]
    fn recognized_utterance_is_spoken_back() {
        let step = dispatch(
            &ListenOutcome::Utterance("bonjour".to_string()),
            &classifier(),
        );
        match step {
            Step::Speak(text) => assert!(text.contains("Décrivez-moi votre problème technique")),
            other => panic!("expected a spoken step, got {other:?}"),
        }
    }

    #[test]
    fn unmatched_utterance_is_spoken_back_with_echo() {
        let step = dispatch(
            &ListenOutcome::Utterance("le grille-pain fume".to_string()),
            &classifier(),
        );
        match step {
            Step::Speak(text) => assert!(text.contains("le grille-pain fume")),
            other => panic!("expected a spoken step, got {other:?}"),
        }
    }
}
