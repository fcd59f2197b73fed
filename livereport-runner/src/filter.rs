// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The identity filter.
//!
//! Several report pages may be open against one shared event stream. The filter makes sure that a
//! page only ever renders events from the run it represents.

use crate::{
    config::IdentityConfig,
    errors::{DisplayErrorChain, IdentityParseError, UnknownVariantError},
    events::Event,
    identity::{IdentityScheme, RunIdentity},
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use tracing::{debug, error};

/// When a filter binds the identity of its page.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentityBinding {
    /// Parse the page path when the filter is created.
    AtLoad,

    /// Parse the page path when the first event arrives.
    #[default]
    FirstEvent,

    /// Bind to the identity carried by the first event, without looking at the path.
    AdoptFirst,
}

impl IdentityBinding {
    /// String representations of all known variants.
    pub fn variants() -> &'static [&'static str] {
        &["at-load", "first-event", "adopt-first"]
    }
}

impl FromStr for IdentityBinding {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "at-load" => Ok(Self::AtLoad),
            "first-event" => Ok(Self::FirstEvent),
            "adopt-first" => Ok(Self::AdoptFirst),
            other => Err(UnknownVariantError::new(
                "identity binding",
                other,
                Self::variants(),
            )),
        }
    }
}

impl fmt::Display for IdentityBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AtLoad => f.write_str("at-load"),
            Self::FirstEvent => f.write_str("first-event"),
            Self::AdoptFirst => f.write_str("adopt-first"),
        }
    }
}

/// What happens when an event for another run arrives.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MismatchPolicy {
    /// Drop the event and keep listening.
    #[default]
    Drop,

    /// Drop the event and close the channel.
    Close,
}

impl MismatchPolicy {
    /// String representations of all known variants.
    pub fn variants() -> &'static [&'static str] {
        &["drop", "close"]
    }
}

impl FromStr for MismatchPolicy {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drop" => Ok(Self::Drop),
            "close" => Ok(Self::Close),
            other => Err(UnknownVariantError::new(
                "mismatch policy",
                other,
                Self::variants(),
            )),
        }
    }
}

impl fmt::Display for MismatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Drop => f.write_str("drop"),
            Self::Close => f.write_str("close"),
        }
    }
}

/// The outcome of checking an event against the page identity.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FilterVerdict {
    /// The event belongs to this page.
    Accept,

    /// The event was dropped.
    Reject {
        /// True if the channel should be closed as well.
        close: bool,
    },
}

impl FilterVerdict {
    /// Returns true if the event was accepted.
    pub fn is_accept(self) -> bool {
        matches!(self, Self::Accept)
    }
}

#[derive(Clone, Debug)]
enum BindState {
    Unbound,
    Bound(RunIdentity),
    Unresolvable(IdentityParseError),
}

/// Checks each event's run identity against the identity of the page.
///
/// Once bound, the page identity never changes.
#[derive(Clone, Debug)]
pub struct IdentityFilter {
    scheme: IdentityScheme,
    binding: IdentityBinding,
    policy: MismatchPolicy,
    path: String,
    state: BindState,
}

impl IdentityFilter {
    /// Creates a filter for a page at `path`.
    ///
    /// With [`IdentityBinding::AtLoad`], the path is parsed immediately.
    pub fn new(config: &IdentityConfig, path: impl Into<String>) -> Self {
        let mut filter = Self {
            scheme: config.scheme,
            binding: config.binding,
            policy: config.on_mismatch,
            path: path.into(),
            state: BindState::Unbound,
        };
        if filter.binding == IdentityBinding::AtLoad {
            filter.bind_from_path();
        }
        filter
    }

    /// Returns the bound page identity, if any.
    pub fn bound(&self) -> Option<&RunIdentity> {
        match &self.state {
            BindState::Bound(identity) => Some(identity),
            BindState::Unbound | BindState::Unresolvable(_) => None,
        }
    }

    /// Returns the error encountered while resolving the page identity, if any.
    pub fn resolve_error(&self) -> Option<&IdentityParseError> {
        match &self.state {
            BindState::Unresolvable(err) => Some(err),
            BindState::Unbound | BindState::Bound(_) => None,
        }
    }

    /// Checks an event, binding the page identity first if that hasn't happened yet.
    ///
    /// Every rejection logs exactly one error.
    pub fn check(&mut self, event: &Event) -> FilterVerdict {
        let event_identity = self.scheme.event_identity(event);

        if matches!(self.state, BindState::Unbound) {
            match self.binding {
                IdentityBinding::AtLoad | IdentityBinding::FirstEvent => self.bind_from_path(),
                IdentityBinding::AdoptFirst => {
                    if let Some(identity) = &event_identity {
                        debug!("adopting run identity {identity} from first event");
                        self.state = BindState::Bound(identity.clone());
                    }
                }
            }
        }

        let page_identity = match &self.state {
            BindState::Bound(identity) => identity,
            BindState::Unresolvable(err) => {
                error!(
                    "dropping {} event: page identity is unresolved: {}",
                    event.kind,
                    DisplayErrorChain::new(err),
                );
                return self.reject();
            }
            BindState::Unbound => {
                error!(
                    "dropping {} event: it carries no {} identity to bind the page to",
                    event.kind, self.scheme,
                );
                return self.reject();
            }
        };

        match event_identity {
            Some(identity) if &identity == page_identity => FilterVerdict::Accept,
            Some(identity) => {
                error!(
                    "dropping {} event: event run {identity} does not match page run {page_identity}",
                    event.kind,
                );
                self.reject()
            }
            None => {
                error!(
                    "dropping {} event: it carries no {} identity (page run {page_identity})",
                    event.kind, self.scheme,
                );
                self.reject()
            }
        }
    }

    fn bind_from_path(&mut self) {
        self.state = match self.scheme.parse_path(&self.path) {
            Ok(identity) => {
                debug!("bound page {} to run {}", self.path, identity.run);
                BindState::Bound(identity.run)
            }
            Err(err) => {
                // Lazy binding happens while checking an event, and that event's rejection is the
                // one diagnostic for it.
                if self.binding == IdentityBinding::AtLoad {
                    error!(
                        "failed to resolve page identity, no events will be shown: {}",
                        DisplayErrorChain::new(&err),
                    );
                } else {
                    debug!("failed to resolve page identity for {}", self.path);
                }
                BindState::Unresolvable(err)
            }
        };
    }

    fn reject(&self) -> FilterVerdict {
        FilterVerdict::Reject {
            close: self.policy == MismatchPolicy::Close,
        }
    }
}
