//! # Folio Scheduling Dialogue
//!
//! File: cli/src/assistant/scheduling.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! A guided, strictly linear conversation that collects an appointment date,
//! time, name, email and phone number, one message at a time:
//!
//! ```text
//! date -> time -> name -> email -> phone -> complete
//! ```
//!
//! Each step validates the raw message. A valid value is stored and the dialogue
//! moves on; an invalid one produces a re-prompt and the step is retried, with no
//! retry limit. Completion yields a [`Booking`] whose [`Booking::url`] is handed
//! to the external booking service.
//!
//! ## Architecture
//!
//! - [`Step`] is a tagged variant; every step carries exactly the values
//!   collected before it, so a half-filled booking cannot be observed.
//! - [`SchedulingSession::handle`] consumes the session by value and returns a
//!   [`StepOutcome`] that either hands a session back or completes it.
//! - Validation failures are [`FieldError`]s whose `Display` text is the re-prompt.
//!
//! ## Examples
//!
//! ```rust
//! let (session, opening) = SchedulingSession::start();
//! match session.handle("01/15/2025") {
//!     StepOutcome::Advanced { session, prompt } => { /* now at StepKind::Time */ }
//!     StepOutcome::Rejected { session, error } => { /* still at StepKind::Date */ }
//!     StepOutcome::Completed(booking) => unreachable!(),
//! }
//! ```
//!
use regex::Regex;
use serde::Serialize;
use std::{fmt, sync::LazyLock};
use thiserror::Error;

pub const OPENING_PROMPT: &str =
    "I'll help you schedule an appointment. What date would you prefer? (Please use MM/DD/YYYY format)";
pub const TIME_PROMPT: &str = "What time would you prefer? (Please use HH:MM AM/PM format)";
pub const NAME_PROMPT: &str = "Please provide your full name:";
pub const EMAIL_PROMPT: &str = "Please provide your email address:";
pub const PHONE_PROMPT: &str = "Please provide your phone number:";

static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(0[1-9]|1[0-2])/(0[1-9]|[12][0-9]|3[01])/[0-9]{4}$").expect("date pattern compiles")
});
static TIME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(0?[1-9]|1[0-2]):[0-5][0-9] (AM|PM)$").expect("time pattern compiles")
});
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

/// A message that does not satisfy the current step's format.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    #[error("Please provide a valid date in MM/DD/YYYY format.")]
    Date,
    #[error("Please provide a valid time in HH:MM AM/PM format.")]
    Time,
    #[error("Please provide a valid email address.")]
    Email,
    #[error("Please provide a valid 10-digit phone number.")]
    Phone,
}

/// `MM/DD/YYYY` with a 01–31 day range; calendar validity is not checked.
pub fn validate_date(input: &str) -> Result<&str, FieldError> {
    if DATE_PATTERN.is_match(input) {
        Ok(input)
    } else {
        Err(FieldError::Date)
    }
}

/// `H:MM AM/PM` or `HH:MM AM/PM`, hour 1–12, suffix in any case.
pub fn validate_time(input: &str) -> Result<&str, FieldError> {
    if TIME_PATTERN.is_match(input) {
        Ok(input)
    } else {
        Err(FieldError::Time)
    }
}

pub fn validate_email(input: &str) -> Result<&str, FieldError> {
    if EMAIL_PATTERN.is_match(input) {
        Ok(input)
    } else {
        Err(FieldError::Email)
    }
}

/// Returns the ten digits left after discarding every other character.
pub fn validate_phone(input: &str) -> Result<String, FieldError> {
    let digits: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 10 {
        Ok(digits)
    } else {
        Err(FieldError::Phone)
    }
}

/// The step a dialogue is waiting on, without the collected values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Date,
    Time,
    Name,
    Email,
    Phone,
    Complete,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StepKind::Date => "date",
            StepKind::Time => "time",
            StepKind::Name => "name",
            StepKind::Email => "email",
            StepKind::Phone => "phone",
            StepKind::Complete => "complete",
        };
        f.write_str(label)
    }
}

/// In-progress state: each variant holds what was collected before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Date,
    Time { date: String },
    Name { date: String, time: String },
    Email { date: String, time: String, name: String },
    Phone { date: String, time: String, name: String, email: String },
}

/// The `complete` state: every field collected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Booking {
    pub date: String,
    pub time: String,
    pub name: String,
    pub email: String,
    /// As typed by the visitor, punctuation included.
    pub phone: String,
}

impl Booking {
    /// # Booking URL (`url`)
    ///
    /// Appends name, email, date and time to `base` as percent-encoded query
    /// parameters. The phone number is not part of the hand-off.
    pub fn url(&self, base: &str) -> String {
        format!(
            "{}?name={}&email={}&date={}&time={}",
            base,
            urlencoding::encode(&self.name),
            urlencoding::encode(&self.email),
            urlencoding::encode(&self.date),
            urlencoding::encode(&self.time)
        )
    }

    /// The assistant's closing message for this booking.
    pub fn confirmation(&self, service: &str) -> String {
        format!(
            "Great! I'm opening {} with your preferred date ({} at {}). Please confirm your appointment there.",
            service, self.date, self.time
        )
    }
}

/// Result of feeding one message to a session.
#[derive(Debug)]
pub enum StepOutcome {
    /// Value accepted; `prompt` asks for the next field.
    Advanced {
        session: SchedulingSession,
        prompt: &'static str,
    },
    /// Value refused; the session is unchanged and `error` is the re-prompt.
    Rejected {
        session: SchedulingSession,
        error: FieldError,
    },
    /// Phone accepted; the session is finished.
    Completed(Booking),
}

/// One appointment-booking dialogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulingSession {
    step: Step,
}

impl SchedulingSession {
    /// Begins a dialogue at the date step, returning it with its opening prompt.
    pub fn start() -> (Self, &'static str) {
        (Self { step: Step::Date }, OPENING_PROMPT)
    }

    pub fn step(&self) -> &Step {
        &self.step
    }

    pub fn kind(&self) -> StepKind {
        match self.step {
            Step::Date => StepKind::Date,
            Step::Time { .. } => StepKind::Time,
            Step::Name { .. } => StepKind::Name,
            Step::Email { .. } => StepKind::Email,
            Step::Phone { .. } => StepKind::Phone,
        }
    }

    /// # Handle Message (`handle`)
    ///
    /// Validates `input` against the current step and moves the dialogue
    /// forward by exactly one step, or leaves it where it was.
    pub fn handle(self, input: &str) -> StepOutcome {
        match self.step {
            Step::Date => match validate_date(input) {
                Ok(date) => advance(
                    Step::Time {
                        date: date.to_string(),
                    },
                    TIME_PROMPT,
                ),
                Err(error) => reject(Step::Date, error),
            },
            Step::Time { date } => match validate_time(input) {
                Ok(time) => advance(
                    Step::Name {
                        date,
                        time: time.to_string(),
                    },
                    NAME_PROMPT,
                ),
                Err(error) => reject(Step::Time { date }, error),
            },
            Step::Name { date, time } => advance(
                Step::Email {
                    date,
                    time,
                    name: input.to_string(),
                },
                EMAIL_PROMPT,
            ),
            Step::Email { date, time, name } => match validate_email(input) {
                Ok(email) => advance(
                    Step::Phone {
                        date,
                        time,
                        name,
                        email: email.to_string(),
                    },
                    PHONE_PROMPT,
                ),
                Err(error) => reject(Step::Email { date, time, name }, error),
            },
            Step::Phone {
                date,
                time,
                name,
                email,
            } => match validate_phone(input) {
                Ok(_) => StepOutcome::Completed(Booking {
                    date,
                    time,
                    name,
                    email,
                    phone: input.to_string(),
                }),
                Err(error) => reject(
                    Step::Phone {
                        date,
                        time,
                        name,
                        email,
                    },
                    error,
                ),
            },
        }
    }
}

fn advance(step: Step, prompt: &'static str) -> StepOutcome {
    StepOutcome::Advanced {
        session: SchedulingSession { step },
        prompt,
    }
}

fn reject(step: Step, error: FieldError) -> StepOutcome {
    StepOutcome::Rejected {
        session: SchedulingSession { step },
        error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expect_advanced(outcome: StepOutcome, expected_prompt: &str) -> SchedulingSession {
        match outcome {
            StepOutcome::Advanced { session, prompt } => {
                assert_eq!(prompt, expected_prompt);
                session
            }
            other => panic!("expected the dialogue to advance, got {:?}", other),
        }
    }

    fn expect_rejected(outcome: StepOutcome, expected: FieldError) -> SchedulingSession {
        match outcome {
            StepOutcome::Rejected { session, error } => {
                assert_eq!(error, expected);
                session
            }
            other => panic!("expected a re-prompt, got {:?}", other),
        }
    }

    #[test]
    fn test_date_validation() {
        assert!(validate_date("01/15/2025").is_ok());
        assert!(validate_date("12/31/1999").is_ok());
        assert!(validate_date("02/31/2025").is_ok()); // Day range only, not calendar validity
        assert_eq!(validate_date("13/01/2025"), Err(FieldError::Date));
        assert_eq!(validate_date("1/15/2025"), Err(FieldError::Date));
        assert_eq!(validate_date("01/32/2025"), Err(FieldError::Date));
        assert_eq!(validate_date("01/00/2025"), Err(FieldError::Date));
        assert_eq!(validate_date("01/15/25"), Err(FieldError::Date));
        assert_eq!(validate_date(" 01/15/2025"), Err(FieldError::Date));
    }

    #[test]
    fn test_time_validation() {
        assert!(validate_time("02:30 PM").is_ok());
        assert!(validate_time("2:30 pm").is_ok());
        assert!(validate_time("12:59 Am").is_ok());
        assert_eq!(validate_time("13:00 PM"), Err(FieldError::Time));
        assert_eq!(validate_time("00:30 AM"), Err(FieldError::Time));
        assert_eq!(validate_time("02:60 PM"), Err(FieldError::Time));
        assert_eq!(validate_time("02:30PM"), Err(FieldError::Time));
        assert_eq!(validate_time("14:30"), Err(FieldError::Time));
    }

    #[test]
    fn test_email_validation() {
        assert!(validate_email("a@b.co").is_ok());
        assert!(validate_email("jane@example.com").is_ok());
        assert_eq!(validate_email("not-an-email"), Err(FieldError::Email));
        assert_eq!(validate_email("jane@example"), Err(FieldError::Email));
        assert_eq!(validate_email("jane doe@example.com"), Err(FieldError::Email));
        assert_eq!(validate_email("a@@b.co"), Err(FieldError::Email));
    }

    #[test]
    fn test_phone_validation() {
        assert_eq!(validate_phone("(555) 123-4567").unwrap(), "5551234567");
        assert_eq!(validate_phone("555.123.4567").unwrap(), "5551234567");
        assert_eq!(validate_phone("555-1234"), Err(FieldError::Phone));
        assert_eq!(validate_phone("+1 (555) 123-4567"), Err(FieldError::Phone)); // 11 digits
    }

    #[test]
    fn test_rejected_date_stays_on_date() {
        let (session, opening) = SchedulingSession::start();
        assert_eq!(opening, OPENING_PROMPT);
        let session = expect_rejected(session.handle("13/01/2025"), FieldError::Date);
        assert_eq!(session.kind(), StepKind::Date);
        assert_eq!(session.step(), &Step::Date);
        assert_eq!(
            FieldError::Date.to_string(),
            "Please provide a valid date in MM/DD/YYYY format."
        );
    }

    #[test]
    fn test_full_dialogue() {
        let (session, _) = SchedulingSession::start();
        let session = expect_advanced(session.handle("01/15/2025"), TIME_PROMPT);
        assert_eq!(session.kind(), StepKind::Time);
        let session = expect_advanced(session.handle("02:30 PM"), NAME_PROMPT);
        assert_eq!(session.kind(), StepKind::Name);
        let session = expect_advanced(session.handle("Jane Doe"), EMAIL_PROMPT);
        assert_eq!(session.kind(), StepKind::Email);
        let session = expect_rejected(session.handle("not-an-email"), FieldError::Email);
        let session = expect_advanced(session.handle("jane@example.com"), PHONE_PROMPT);
        assert_eq!(
            session.step(),
            &Step::Phone {
                date: "01/15/2025".into(),
                time: "02:30 PM".into(),
                name: "Jane Doe".into(),
                email: "jane@example.com".into(),
            }
        );
        let session = expect_rejected(session.handle("12345"), FieldError::Phone);

        let booking = match session.handle("(555) 123-4567") {
            StepOutcome::Completed(booking) => booking,
            other => panic!("expected completion, got {:?}", other),
        };
        assert_eq!(booking.phone, "(555) 123-4567");
        assert_eq!(
            booking.url("https://calendly.com/thanon43"),
            "https://calendly.com/thanon43?name=Jane%20Doe&email=jane%40example.com&date=01%2F15%2F2025&time=02%3A30%20PM"
        );
        assert_eq!(
            booking.confirmation("Calendly"),
            "Great! I'm opening Calendly with your preferred date (01/15/2025 at 02:30 PM). Please confirm your appointment there."
        );
    }

    #[test]
    fn test_name_accepts_anything() {
        let (session, _) = SchedulingSession::start();
        let session = expect_advanced(session.handle("03/03/2025"), TIME_PROMPT);
        let session = expect_advanced(session.handle("9:05 am"), NAME_PROMPT);
        let session = expect_advanced(session.handle("skills"), EMAIL_PROMPT);
        match session.step() {
            Step::Email { name, .. } => assert_eq!(name, "skills"),
            other => panic!("unexpected step {:?}", other),
        }
    }

    #[test]
    fn test_step_kind_display() {
        assert_eq!(StepKind::Date.to_string(), "date");
        assert_eq!(StepKind::Complete.to_string(), "complete");
    }
}
