//! Pick-one-from-a-list state machine
//!
//! ```text
//! Prompting ──input──▶ Validating ──┬──▶ Accepted
//!     ▲                             ├──▶ Quit
//!     └──────── Rejected ◀──────────┘
//! ```
//!
//! The same machine drives the system-image prompt, the emulator-id prompt and the
//! per-emulator system-image prompt; only the candidates, the default and the handling
//! of blank input differ.

use crate::error::Result;
use crate::prompt::Prompter;

/// Typing this (any case) abandons the current selection
pub const QUIT_SENTINEL: &str = "QUIT";

const NO_VALID_INPUT: &str = "ERROR: No valid input found";

/// Anything that can answer "is this a valid choice?"
pub trait Candidates {
    fn contains_key(&self, key: &str) -> bool;
}

/// What a blank answer means
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlankInput {
    /// Take the configured default
    UseDefault,
    /// Report "no valid input" and ask again
    Reject,
}

/// Outcome of a selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Accepted(String),
    /// Always-override mode, but the default is not among the candidates
    Unmatched(String),
    /// The user typed the quit sentinel or closed the input
    Quit,
}

#[derive(Debug)]
enum State {
    Prompting,
    Validating(String),
    Rejected(String),
    Accepted(String),
    Quit,
}

#[derive(Debug, Clone)]
pub struct Selector<'a> {
    prompt: String,
    listing: &'a [String],
    default: Option<&'a str>,
    blank: BlankInput,
    unknown_label: &'a str,
}

impl<'a> Selector<'a> {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            listing: &[],
            default: None,
            blank: BlankInput::Reject,
            unknown_label: "Unknown selection",
        }
    }

    /// Lines shown before every prompt
    #[must_use]
    pub fn listing(mut self, lines: &'a [String]) -> Self {
        self.listing = lines;
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: &'a str) -> Self {
        self.default = Some(value);
        self
    }

    #[must_use]
    pub fn on_blank(mut self, blank: BlankInput) -> Self {
        self.blank = blank;
        self
    }

    /// Label of the message printed for an unknown answer
    #[must_use]
    pub fn unknown_label(mut self, label: &'a str) -> Self {
        self.unknown_label = label;
        self
    }

    /// Run the machine until it accepts a candidate or the user quits.
    ///
    /// With `always_override` no input is read: the default is accepted when it is a
    /// candidate and reported as [`Selection::Unmatched`] otherwise.
    pub fn select<C>(
        &self,
        candidates: &C,
        always_override: bool,
        prompter: &mut dyn Prompter,
    ) -> Result<Selection>
    where
        C: Candidates + ?Sized,
    {
        if always_override {
            return Ok(self.select_default(candidates, prompter));
        }

        let mut state = State::Prompting;
        loop {
            state = match state {
                State::Prompting => {
                    for line in self.listing {
                        prompter.show(line);
                    }
                    match prompter.read_line(&self.prompt)? {
                        Some(input) => State::Validating(input),
                        None => State::Quit,
                    }
                }
                State::Validating(input) => self.validate(&input, candidates),
                State::Rejected(message) => {
                    prompter.show(&message);
                    State::Prompting
                }
                State::Accepted(value) => return Ok(Selection::Accepted(value)),
                State::Quit => return Ok(Selection::Quit),
            };
        }
    }

    fn select_default<C>(&self, candidates: &C, prompter: &mut dyn Prompter) -> Selection
    where
        C: Candidates + ?Sized,
    {
        let Some(default) = self.default else {
            prompter.show(NO_VALID_INPUT);
            return Selection::Quit;
        };

        if candidates.contains_key(default) {
            tracing::info!("(ALWAYS OVERRIDE): selecting {default}");
            Selection::Accepted(default.to_string())
        } else {
            prompter.show(&format!("ERROR: {} - {default}", self.unknown_label));
            Selection::Unmatched(default.to_string())
        }
    }

    fn validate<C>(&self, input: &str, candidates: &C) -> State
    where
        C: Candidates + ?Sized,
    {
        let input = input.trim();
        if input.eq_ignore_ascii_case(QUIT_SENTINEL) {
            return State::Quit;
        }

        let value = if input.is_empty() {
            match (self.blank, self.default) {
                (BlankInput::UseDefault, Some(default)) => default,
                _ => return State::Rejected(NO_VALID_INPUT.to_string()),
            }
        } else {
            input
        };

        if candidates.contains_key(value) {
            State::Accepted(value.to_string())
        } else {
            State::Rejected(format!("ERROR: {} - {value}", self.unknown_label))
        }
    }
}
