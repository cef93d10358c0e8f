//! Command guard
//!
//! Runs a command to completion or until Ctrl-C, and turns its result into a
//! process exit code. Every failure is classified exactly once and rendered as
//! an error panel on stderr.

use crate::core::classify::{CliFailure, ErrorCategory, Outcome, classify};
use crate::core::exit_codes;
use crate::display::ErrorPanel;
use crate::error::AppError;
use crossterm::style::Stylize;
use std::error::Error;
use std::future::Future;

#[derive(Debug, Clone, Copy, Default)]
pub struct GuardOptions {
    /// Print the error chain after unexpected failures.
    pub debug: bool,
    pub use_colors: bool,
}

pub async fn run_guarded<F>(command: F, options: GuardOptions) -> i32
where
    F: Future<Output = Result<(), AppError>>,
{
    let result = tokio::select! {
        result = command => result,
        _ = interrupted() => Err(AppError::Cancelled),
    };

    match result {
        Ok(()) => exit_codes::OK,
        Err(error) => report(&error, options),
    }
}

/// Resolves on Ctrl-C. Never resolves when no signal handler can be installed.
async fn interrupted() {
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}

/// Render `error` to stderr and return the exit code it maps to.
pub fn report(error: &AppError, options: GuardOptions) -> i32 {
    let outcome = classify(error);
    tracing::debug!(exit_code = outcome.exit_code(), error = %error, "command finished with error");

    match &outcome {
        Outcome::PassThrough(_) => {}
        Outcome::Cancelled => {
            if options.use_colors {
                eprintln!("{}", "Cancelled".dim());
            } else {
                eprintln!("Cancelled");
            }
        }
        Outcome::Failure(failure) => {
            ErrorPanel::new(options.use_colors).print(failure);
            if let Some(details) = debug_details(error, failure, options) {
                eprintln!("{}", details);
            }
        }
    }

    outcome.exit_code()
}

/// Extra stderr text under `--debug`. Only unexpected (generic) failures carry it.
fn debug_details(error: &AppError, failure: &CliFailure, options: GuardOptions) -> Option<String> {
    (options.debug && failure.category == ErrorCategory::Generic).then(|| error_chain(error))
}

/// Debug form of the error followed by each `source` in turn.
pub fn error_chain(error: &AppError) -> String {
    let mut lines = vec![format!("{:?}", error)];
    let mut source = error.source();
    while let Some(cause) = source {
        lines.push(format!("Caused by: {}", cause));
        source = cause.source();
    }
    lines.join("\n")
}
