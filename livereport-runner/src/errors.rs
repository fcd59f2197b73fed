// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Errors produced by livereport.

use camino::Utf8PathBuf;
use std::{error::Error as StdError, fmt, num::ParseIntError};
use thiserror::Error;

/// An error that occurred while decoding an inbound frame into an event.
///
/// Frames that fail to decode are dropped by the
/// [`Connection`](crate::connection::Connection); this error only ever shows up in diagnostics.
#[derive(Debug, Error)]
pub enum FrameParseError {
    /// The frame was not valid JSON, or didn't match the event schema.
    #[error("frame is not a valid JSON event")]
    Json {
        /// The underlying error.
        #[source]
        err: serde_json::Error,
    },

    /// The frame parsed, but carried no message kind.
    #[error("frame has no message kind")]
    MissingKind,

    /// The frame was not in the `TYPE:ID:DATA` form.
    #[error("frame is not in `TYPE:ID:DATA` form")]
    NotDelimited,
}

/// An error that occurred while deriving a run identity from a page path.
#[derive(Clone, Debug, Error)]
pub enum IdentityParseError {
    /// The path doesn't contain three dash or slash separated integers.
    #[error("page path `{path}` does not contain a `TEST-RUN-SEED` run identity")]
    NoNumberedIdentity {
        /// The path that was parsed.
        path: String,
    },

    /// The path doesn't end in a slug.
    #[error("page path `{path}` does not end in a run slug")]
    NoSlug {
        /// The path that was parsed.
        path: String,
    },

    /// One of the numeric components didn't fit in an integer.
    #[error("run identity component `{which}` in page path `{path}` is out of range")]
    Integer {
        /// The path that was parsed.
        path: String,

        /// Which component was invalid.
        which: &'static str,

        /// The parse failure.
        #[source]
        err: ParseIntError,
    },
}

/// An error that occurred while loading the viewer configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read viewer config at `{path}`")]
    Read {
        /// The path that was read.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: std::io::Error,
    },

    /// The config file could not be parsed.
    #[error("failed to parse viewer config at `{path}`")]
    Parse {
        /// The path that was parsed.
        path: Utf8PathBuf,

        /// The underlying error.
        #[source]
        error: toml::de::Error,
    },
}

/// Error returned while parsing one of the configuration enums from a string.
#[derive(Clone, Debug, Error)]
#[error(
    "unrecognized value for {what}: {input}\n(known values: {})",
    .known.join(", "),
)]
pub struct UnknownVariantError {
    what: &'static str,
    input: String,
    known: &'static [&'static str],
}

impl UnknownVariantError {
    pub(crate) fn new(
        what: &'static str,
        input: impl Into<String>,
        known: &'static [&'static str],
    ) -> Self {
        Self {
            what,
            input: input.into(),
            known,
        }
    }
}

/// Displays an error along with the chain of errors that caused it.
///
/// Diagnostics are single log lines, so causes are joined with `: ` rather than printed on
/// separate lines.
#[derive(Debug)]
pub struct DisplayErrorChain<E> {
    error: E,
}

impl<E: StdError> DisplayErrorChain<E> {
    /// Creates a new `DisplayErrorChain`.
    pub fn new(error: E) -> Self {
        Self { error }
    }
}

impl<E: StdError> fmt::Display for DisplayErrorChain<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        let mut source = self.error.source();
        while let Some(err) = source {
            write!(f, ": {err}")?;
            source = err.source();
        }

        Ok(())
    }
}
