//! Error types for the setup binary.

use thiserror::Error;

/// Errors that can stop the setup process before it runs.
///
/// Probe and apply failures are deliberately not represented here: the
/// flow converts them into logged messages and a report, never an error.
#[derive(Debug, Error)]
pub enum SetupError {
    /// A required environment variable is absent or empty.
    #[error("{name} must be set")]
    MissingEnv { name: &'static str },
}
