//! Console input behind an injectable trait
//!
//! The orchestrator and the selector never touch stdin directly. Production code uses
//! [`TerminalPrompter`]; tests hand in a scripted implementation.

use std::io::{self, BufRead, IsTerminal, Write};

use inquire::{Confirm, InquireError, Text};

use crate::error::Result;

/// Source of user input and sink for user-facing messages
pub trait Prompter {
    /// Show a line of text to the user
    fn show(&mut self, text: &str);

    /// Read one line of input. `None` means the input stream ended.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Ask a yes/no question; anything but an affirmative answer is "no"
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// Prompter backed by the real terminal.
///
/// Uses `inquire` when stdin is a TTY and falls back to plain line reads when input is
/// piped, so answers can be scripted from a shell.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    fn read_piped_line(prompt: &str) -> Result<Option<String>> {
        print!("{prompt} ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

impl Prompter for TerminalPrompter {
    fn show(&mut self, text: &str) {
        println!("{text}");
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        if !io::stdin().is_terminal() {
            return Self::read_piped_line(prompt);
        }

        match Text::new(prompt).prompt() {
            Ok(answer) => Ok(Some(answer)),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        if !io::stdin().is_terminal() {
            return Ok(Self::read_piped_line(question)?
                .as_deref()
                .is_some_and(is_affirmative));
        }

        match Confirm::new(question)
            .with_default(false)
            .with_help_message("Press 'y' to continue, Enter or 'n' to cancel")
            .prompt()
        {
            Ok(answer) => Ok(answer),
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Lenient yes/no parsing for piped answers
pub fn is_affirmative(input: &str) -> bool {
    matches!(
        input.trim().to_ascii_lowercase().as_str(),
        "y" | "yes" | "true" | "t" | "on"
    )
}
