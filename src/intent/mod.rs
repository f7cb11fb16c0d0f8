//! Keyword-rule response selection.
//!
//! A single resolver walks the ordered rule tables in `rules` and the first
//! matching rule wins. Matching is case-insensitive substring containment —
//! no tokenization, no scoring. The classifier holds no state besides its
//! configuration and an injected clock, so the same input always yields the
//! same reply.

mod rules;

use chrono::{Datelike, Local, NaiveDateTime, Timelike};

use rules::{GeneralOutcome, APP_PLACEHOLDER, DEFAULT_APP_NAME, MONTHS, WEEKDAYS};

/// What the conversation should do with one utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A canned response to speak; the session continues.
    Text(String),
    /// No rule matched; carries the reformulation prompt echoing the
    /// utterance. Spoken like `Text`, but distinguishable in logs and tests.
    Unrecognized(String),
    /// An exit keyword was heard; the session ends without further speech.
    EndSession,
}

/// Time source for the time/date rules, swappable in tests.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock used in production.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

pub struct Classifier {
    assistant_name: String,
    clock: Box<dyn Clock>,
}

impl Classifier {
    pub fn new(assistant_name: impl Into<String>) -> Self {
        Self::with_clock(assistant_name, Box::new(SystemClock))
    }

    pub fn with_clock(assistant_name: impl Into<String>, clock: Box<dyn Clock>) -> Self {
        Self {
            assistant_name: assistant_name.into(),
            clock,
        }
    }

    /// Map one utterance to a reply. Total: every input, including the empty
    /// string, yields exactly one `Reply`.
    pub fn classify(&self, utterance: &str) -> Reply {
        let utterance = utterance.trim();
        if utterance.is_empty() {
            return Reply::Text(rules::EMPTY_INPUT.to_string());
        }
        let normalized = utterance.to_lowercase();

        for rule in rules::GENERAL_RULES {
            if contains_any(&normalized, rule.triggers) {
                return match rule.outcome {
                    GeneralOutcome::Static(text) => Reply::Text(text.to_string()),
                    GeneralOutcome::TimeOfDay => Reply::Text(self.time_reply()),
                    GeneralOutcome::CurrentDate => Reply::Text(self.date_reply()),
                    GeneralOutcome::Identity => Reply::Text(self.identity_reply()),
                    GeneralOutcome::EndSession => Reply::EndSession,
                };
            }
        }

        for category in rules::CATEGORIES {
            if !contains_any(&normalized, category.triggers) {
                continue;
            }
            for arm in category.arms {
                if contains_any(&normalized, arm.keywords) {
                    let script = match category.app_names {
                        Some(apps) => {
                            let app = apps
                                .iter()
                                .find(|(keyword, _)| normalized.contains(keyword))
                                .map(|(_, name)| *name)
                                .unwrap_or(DEFAULT_APP_NAME);
                            arm.script.replace(APP_PLACEHOLDER, app)
                        }
                        None => arm.script.to_string(),
                    };
                    return Reply::Text(script);
                }
            }
            return Reply::Text(category.clarify.to_string());
        }

        Reply::Unrecognized(format!(
            "Désolé, je ne suis pas sûr de comprendre le problème '{utterance}'. Pouvez-vous reformuler ?"
        ))
    }

    fn time_reply(&self) -> String {
        let now = self.clock.now();
        format!("Il est {} heures {}.", now.hour(), now.minute())
    }

    fn date_reply(&self) -> String {
        let now = self.clock.now();
        let weekday = WEEKDAYS[now.weekday().num_days_from_monday() as usize];
        let month = MONTHS[now.month0() as usize];
        format!(
            "Nous sommes le {weekday} {} {month} {}.",
            now.day(),
            now.year()
        )
    }

    fn identity_reply(&self) -> String {
        format!(
            "Je suis {}, votre assistant de support technique local.",
            self.assistant_name
        )
    }
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle))
}

/// Spoken when the assistant starts up.
pub fn greeting(assistant_name: &str) -> String {
    format!(
        "Bonjour ! Je suis {assistant_name}. Comment puis-je vous assister avec vos problèmes techniques aujourd'hui ?"
    )
}

/// Spoken when the user interrupts or asks to leave.
pub fn farewell() -> &'static str {
    "Support terminé. Au revoir !"
}

/// Spoken after a capture fault before retrying.
pub fn listen_apology() -> &'static str {
    "Désolé, une erreur s'est produite lors de l'écoute."
}

/// Spoken when a turn produced no usable words.
pub fn reprompt() -> &'static str {
    "Je n'ai pas bien entendu. Pouvez-vous décrire votre problème technique ?"
}
