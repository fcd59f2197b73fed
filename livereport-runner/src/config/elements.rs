// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Individual sections of the viewer configuration.

use crate::{
    codec::FrameFormat,
    errors::UnknownVariantError,
    filter::{IdentityBinding, MismatchPolicy},
    identity::IdentityScheme,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The kind of page a session drives, which determines how events are applied.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageKind {
    /// A live per-run report: result rows and a summary.
    #[default]
    Report,

    /// An aggregate log of events from many runs.
    Log,

    /// A listing of run directories.
    Directories,
}

impl PageKind {
    /// String representations of all known variants.
    pub fn variants() -> &'static [&'static str] {
        &["report", "log", "directories"]
    }
}

impl FromStr for PageKind {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "report" => Ok(Self::Report),
            "log" => Ok(Self::Log),
            "directories" => Ok(Self::Directories),
            other => Err(UnknownVariantError::new("page kind", other, Self::variants())),
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Report => f.write_str("report"),
            Self::Log => f.write_str("log"),
            Self::Directories => f.write_str("directories"),
        }
    }
}

/// Identity filter settings.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct IdentityConfig {
    /// How identities are derived.
    pub scheme: IdentityScheme,

    /// When the page identity is bound.
    pub binding: IdentityBinding,

    /// What happens to the channel when an event for another run arrives.
    pub on_mismatch: MismatchPolicy,

    /// Whether the filter runs at all. `None` means "depends on the page kind".
    pub enabled: Option<bool>,
}

impl IdentityConfig {
    /// Returns true if the identity filter should run on a page of this kind.
    ///
    /// Unless configured explicitly, only report pages filter: log and directory pages show events
    /// from many runs.
    pub fn is_enabled_for(&self, page: PageKind) -> bool {
        self.enabled.unwrap_or(page == PageKind::Report)
    }
}

/// Log page settings.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct LogConfig {
    /// Columns spanned by summary content, reserved for per-browser sub-results.
    pub summary_extra_columns: usize,
}

impl LogConfig {
    /// The minimum number of columns a summary spans.
    pub const MIN_SUMMARY_EXTRA_COLUMNS: usize = 9;
}

/// Identifiers of the page elements the view writes to.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ElementIds {
    /// The results table.
    pub results: String,
    /// The summary region.
    pub summary: String,
    /// The aggregate log table.
    pub logs: String,
    /// The directory listing.
    pub directories: String,
    /// The thumbnail toggle control.
    pub toggle: String,
}

/// Marker classes for the two alternative renderings of a result.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct MarkerClasses {
    /// Class carried by thumbnail elements.
    pub thumbnail: String,
    /// Class carried by text-link elements.
    pub text_link: String,
}

// ---
// Deserialized forms
// ---

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(in crate::config) struct DeserializedPageConfig {
    pub(in crate::config) kind: Option<PageKind>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(in crate::config) struct DefaultPageConfig {
    pub(in crate::config) kind: PageKind,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(in crate::config) struct DeserializedIdentityConfig {
    pub(in crate::config) scheme: Option<IdentityScheme>,
    pub(in crate::config) binding: Option<IdentityBinding>,
    pub(in crate::config) on_mismatch: Option<MismatchPolicy>,
    pub(in crate::config) enabled: Option<bool>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(in crate::config) struct DefaultIdentityConfig {
    pub(in crate::config) scheme: IdentityScheme,
    pub(in crate::config) binding: IdentityBinding,
    pub(in crate::config) on_mismatch: MismatchPolicy,
}

impl DefaultIdentityConfig {
    pub(in crate::config) fn resolve(&self, user: &DeserializedIdentityConfig) -> IdentityConfig {
        IdentityConfig {
            scheme: user.scheme.unwrap_or(self.scheme),
            binding: user.binding.unwrap_or(self.binding),
            on_mismatch: user.on_mismatch.unwrap_or(self.on_mismatch),
            enabled: user.enabled,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(in crate::config) struct DeserializedFramesConfig {
    pub(in crate::config) format: Option<FrameFormat>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(in crate::config) struct DefaultFramesConfig {
    pub(in crate::config) format: FrameFormat,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(in crate::config) struct DeserializedLogConfig {
    pub(in crate::config) summary_extra_columns: Option<usize>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(in crate::config) struct DefaultLogConfig {
    pub(in crate::config) summary_extra_columns: usize,
}

impl DefaultLogConfig {
    pub(in crate::config) fn resolve(&self, user: &DeserializedLogConfig) -> LogConfig {
        let columns = user
            .summary_extra_columns
            .unwrap_or(self.summary_extra_columns);
        LogConfig {
            summary_extra_columns: columns.max(LogConfig::MIN_SUMMARY_EXTRA_COLUMNS),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(in crate::config) struct DeserializedElementIds {
    results: Option<String>,
    summary: Option<String>,
    logs: Option<String>,
    directories: Option<String>,
    toggle: Option<String>,
}

impl ElementIds {
    pub(in crate::config) fn resolve(&self, user: DeserializedElementIds) -> Self {
        Self {
            results: user.results.unwrap_or_else(|| self.results.clone()),
            summary: user.summary.unwrap_or_else(|| self.summary.clone()),
            logs: user.logs.unwrap_or_else(|| self.logs.clone()),
            directories: user
                .directories
                .unwrap_or_else(|| self.directories.clone()),
            toggle: user.toggle.unwrap_or_else(|| self.toggle.clone()),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(in crate::config) struct DeserializedMarkerClasses {
    thumbnail: Option<String>,
    text_link: Option<String>,
}

impl MarkerClasses {
    pub(in crate::config) fn resolve(&self, user: DeserializedMarkerClasses) -> Self {
        Self {
            thumbnail: user.thumbnail.unwrap_or_else(|| self.thumbnail.clone()),
            text_link: user.text_link.unwrap_or_else(|| self.text_link.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(PageKind::Report, None, true ; "report defaults to enabled")]
    #[test_case(PageKind::Log, None, false ; "log defaults to disabled")]
    #[test_case(PageKind::Directories, None, false ; "directories default to disabled")]
    #[test_case(PageKind::Log, Some(true), true ; "explicitly enabled")]
    #[test_case(PageKind::Report, Some(false), false ; "explicitly disabled")]
    fn identity_enabled_for(page: PageKind, enabled: Option<bool>, expected: bool) {
        let config = IdentityConfig {
            scheme: IdentityScheme::Numbered,
            binding: IdentityBinding::FirstEvent,
            on_mismatch: MismatchPolicy::Drop,
            enabled,
        };
        assert_eq!(config.is_enabled_for(page), expected);
    }

    #[test]
    fn page_kind_from_str() {
        assert_eq!("log".parse::<PageKind>().unwrap(), PageKind::Log);
        let err = "dashboard".parse::<PageKind>().unwrap_err();
        assert!(err.to_string().contains("report, log, directories"));
    }
}
