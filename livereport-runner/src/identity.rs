// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Run identities and the schemes used to derive them.
//!
//! A run identity names the test execution an event stream belongs to. Deployments have used two
//! shapes over time: a path with three integers (`/TEST-RUN-SEED/`) and a single composite slug.
//! Both are folded into [`RunIdentity`], an opaque value that is only ever compared for equality,
//! so that the filtering logic doesn't care which shape a deployment uses.

use crate::{
    errors::{IdentityParseError, UnknownVariantError},
    events::Event,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::{fmt, str::FromStr, sync::LazyLock};

// The dashed form wins over any other numeric segments in the path.
static NUMBERED_DASHED_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(\d+)-(\d+)-(\d+)").unwrap());
static NUMBERED_PATH_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/(\d+)[-/](\d+)[-/](\d+)").unwrap());
static SLUG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").unwrap());

/// An opaque, equality-comparable run identity.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RunIdentity(IdentityKey);

#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(untagged)]
enum IdentityKey {
    Numbered {
        #[serde(rename = "testId")]
        test_id: u64,
        run: u64,
    },
    Slug(SmolStr),
}

impl RunIdentity {
    /// Creates a run identity from a test id and run number.
    pub fn numbered(test_id: u64, run: u64) -> Self {
        Self(IdentityKey::Numbered { test_id, run })
    }

    /// Creates a run identity from a composite slug.
    pub fn slug(slug: impl Into<SmolStr>) -> Self {
        Self(IdentityKey::Slug(slug.into()))
    }
}

impl fmt::Display for RunIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            IdentityKey::Numbered { test_id, run } => write!(f, "{test_id}-{run}"),
            IdentityKey::Slug(slug) => f.write_str(slug),
        }
    }
}

/// The identity a page represents, as parsed from its path.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PageIdentity {
    /// The identity events are compared against.
    pub run: RunIdentity,

    /// The seed component of a numbered path. Not part of the comparison.
    pub seed: Option<u64>,
}

/// How run identities are derived, from page paths and from events.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentityScheme {
    /// Three integers in the path (`/TEST-RUN-SEED`), `testId` and `run` in events.
    #[default]
    Numbered,

    /// The last path segment is a slug, `slug` in events.
    Slug,
}

impl IdentityScheme {
    /// String representations of all known variants.
    pub fn variants() -> &'static [&'static str] {
        &["numbered", "slug"]
    }

    /// Parses the identity a page at `path` represents.
    pub fn parse_path(self, path: &str) -> Result<PageIdentity, IdentityParseError> {
        match self {
            Self::Numbered => parse_numbered_path(path),
            Self::Slug => parse_slug_path(path),
        }
    }

    /// Returns the identity carried by an event, or `None` if the event doesn't carry an identity
    /// of this scheme.
    pub fn event_identity(self, event: &Event) -> Option<RunIdentity> {
        match self {
            Self::Numbered => match (event.test_id, event.run) {
                (Some(test_id), Some(run)) => Some(RunIdentity::numbered(test_id, run)),
                _ => None,
            },
            Self::Slug => event.slug.clone().map(RunIdentity::slug),
        }
    }
}

impl FromStr for IdentityScheme {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "numbered" => Ok(Self::Numbered),
            "slug" => Ok(Self::Slug),
            other => Err(UnknownVariantError::new(
                "identity scheme",
                other,
                Self::variants(),
            )),
        }
    }
}

impl fmt::Display for IdentityScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numbered => f.write_str("numbered"),
            Self::Slug => f.write_str("slug"),
        }
    }
}

fn parse_numbered_path(path: &str) -> Result<PageIdentity, IdentityParseError> {
    let captures = NUMBERED_DASHED_REGEX
        .captures(path)
        .or_else(|| NUMBERED_PATH_REGEX.captures(path))
        .ok_or_else(|| IdentityParseError::NoNumberedIdentity {
            path: path.to_owned(),
        })?;

    let component = |index: usize, which: &'static str| {
        captures[index]
            .parse::<u64>()
            .map_err(|err| IdentityParseError::Integer {
                path: path.to_owned(),
                which,
                err,
            })
    };

    let test_id = component(1, "test id")?;
    let run = component(2, "run")?;
    let seed = component(3, "seed")?;

    Ok(PageIdentity {
        run: RunIdentity::numbered(test_id, run),
        seed: Some(seed),
    })
}

fn parse_slug_path(path: &str) -> Result<PageIdentity, IdentityParseError> {
    let mut segments = path.split('/').filter(|segment| !segment.is_empty()).rev();

    // Pages are either served as the run directory itself or as a file inside it.
    let slug = match segments.next() {
        Some(last) if last.ends_with(".html") || last.ends_with(".htm") => segments.next(),
        other => other,
    };

    match slug {
        Some(slug) if SLUG_REGEX.is_match(slug) => Ok(PageIdentity {
            run: RunIdentity::slug(slug),
            seed: None,
        }),
        _ => Err(IdentityParseError::NoSlug {
            path: path.to_owned(),
        }),
    }
}
