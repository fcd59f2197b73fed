// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::output::{NO_HEADING_TARGET, StderrStyles};
use camino::Utf8PathBuf;
use livereport_metadata::LiveReportExitCode;
use livereport_runner::errors::{ConfigError, IdentityParseError};
use owo_colors::OwoColorize;
use std::error::Error;
use thiserror::Error;
use tracing::error;

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

// Note that the #[error()] strings are mostly placeholder messages -- the expected way to print out
// errors is with the display_to_stderr method, which colorizes errors.

/// An error that livereport expects to happen: bad input or a bad environment, not a bug.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("viewer config error")]
    ConfigError {
        #[from]
        err: ConfigError,
    },
    #[error("page URL has no run identity")]
    PageUrlError {
        url: String,
        #[source]
        err: IdentityParseError,
    },
    #[error("failed to create async runtime")]
    RuntimeCreateError {
        #[source]
        err: std::io::Error,
    },
    #[error("failed to open input")]
    InputReadFailed {
        path: Utf8PathBuf,
        #[source]
        err: std::io::Error,
    },
    #[error("failed to serialize view")]
    SerializeViewError {
        #[source]
        err: serde_json::Error,
    },
    #[error("failed to write output")]
    WriteOutputError {
        #[source]
        err: std::io::Error,
    },
}

impl ExpectedError {
    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::ConfigError { .. }
            | Self::PageUrlError { .. }
            | Self::RuntimeCreateError { .. }
            | Self::SerializeViewError { .. } => LiveReportExitCode::SETUP_ERROR,
            Self::InputReadFailed { .. } => LiveReportExitCode::INPUT_READ_FAILED,
            Self::WriteOutputError { .. } => LiveReportExitCode::WRITE_OUTPUT_ERROR,
        }
    }

    /// Displays this error to stderr, followed by its causes.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let mut next_error: Option<&dyn Error> = match self {
            Self::ConfigError { err } => {
                // The config error names the file, and its source is the detailed cause.
                error!("{err}");
                err.source()
            }
            Self::PageUrlError { url, err } => {
                error!(
                    "failed to determine the run shown by page `{}`",
                    url.style(styles.bold)
                );
                Some(err as &dyn Error)
            }
            Self::RuntimeCreateError { err } => {
                error!("failed to create async runtime");
                Some(err as &dyn Error)
            }
            Self::InputReadFailed { path, err } => {
                error!("failed to open input `{}`", path.style(styles.bold));
                Some(err as &dyn Error)
            }
            Self::SerializeViewError { err } => {
                error!("failed to serialize view as JSON");
                Some(err as &dyn Error)
            }
            Self::WriteOutputError { err } => {
                error!("failed to write output");
                Some(err as &dyn Error)
            }
        };

        while let Some(err) = next_error {
            error!(target: NO_HEADING_TARGET, "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}
