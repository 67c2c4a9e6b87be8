//! Application error type.
//!
//! Every failure that reaches `main` carries the process exit code it should
//! produce:
//!
//! - `2` input/schema/IO problems (missing file or column, malformed value, export failure)
//! - `3` nothing usable to report on (zero rows loaded)
//! - `4` runtime failures (terminal handling, degenerate statistics input)

use thiserror::Error;

use crate::stats::StatsError;

#[derive(Clone, Error)]
#[error("{message}")]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl From<StatsError> for AppError {
    fn from(err: StatsError) -> Self {
        AppError::new(4, format!("Statistics error: {err}"))
    }
}
