//! UI/Progress presentation layer
//!
//! This module handles:
//! - Activity spinners for downloads and SDK tool runs
//! - Silent reporting for non-interactive output and tests
//! - The banner and catalog listings shown before prompts ([`display`])
//!
//! Long-running work goes through the [`ProgressReporter`] trait so the orchestrator never
//! decides by itself whether to draw on the terminal.

pub mod display;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress reporter for one activity at a time
pub trait ProgressReporter {
    /// Show that `message` is in progress
    fn start(&mut self, message: &str);

    /// The current activity completed
    fn finish(&mut self);

    /// The current activity failed
    fn abandon(&mut self);
}

/// Spinner on stderr while an activity runs
#[derive(Default)]
pub struct InteractiveProgressReporter {
    spinner: Option<ProgressBar>,
}

impl InteractiveProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg} [{elapsed}]")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

impl ProgressReporter for InteractiveProgressReporter {
    fn start(&mut self, message: &str) {
        self.finish();

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(Self::spinner_style());
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(120));
        self.spinner = Some(spinner);
    }

    fn finish(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    fn abandon(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.abandon();
        }
    }
}

impl Drop for InteractiveProgressReporter {
    fn drop(&mut self) {
        self.finish();
    }
}

/// No-op reporter, used when stderr is not a terminal
#[derive(Default)]
pub struct SilentProgressReporter;

impl ProgressReporter for SilentProgressReporter {
    fn start(&mut self, _message: &str) {}

    fn finish(&mut self) {}

    fn abandon(&mut self) {}
}

/// Spinners when stderr is a terminal, nothing otherwise
pub fn reporter_for_terminal() -> Box<dyn ProgressReporter> {
    if console::Term::stderr().is_term() {
        Box::new(InteractiveProgressReporter::new())
    } else {
        Box::new(SilentProgressReporter)
    }
}
