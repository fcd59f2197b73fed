// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Page sessions.
//!
//! A [`PageSession`] holds everything a page knows: where it is, which run it shows, whether
//! thumbnails are visible, and the view itself. It is created once when the page loads, and is
//! then driven by a [`Connection`](crate::connection::Connection) and by user actions on the same
//! loop, so it needs no locking.

use crate::{
    config::{PageKind, ViewerConfig},
    connection::HandleOutcome,
    events::Event,
    filter::{FilterVerdict, IdentityFilter},
    identity::RunIdentity,
    thumbs::ThumbnailVisibility,
    updater::{EventHandler, PageHandler},
    view::{PageView, View, ViewEffect},
};
use tracing::debug;

/// The location of a page: a path and a fragment.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PageLocation {
    path: String,
    fragment: String,
}

impl PageLocation {
    /// Creates a location from a path and a fragment (including the leading `#`, or empty).
    pub fn new(path: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            fragment: fragment.into(),
        }
    }

    /// Parses a page URL of the form `[scheme://host]PATH[?QUERY][#FRAGMENT]`.
    pub fn parse(url: &str) -> Self {
        let (rest, fragment) = match url.find('#') {
            Some(index) => url.split_at(index),
            None => (url, ""),
        };
        let rest = rest.split_once('?').map_or(rest, |(path, _)| path);
        let path = match rest.split_once("://") {
            Some((_, after_scheme)) => after_scheme
                .find('/')
                .map_or("/", |index| &after_scheme[index..]),
            None => rest,
        };
        Self::new(path, fragment)
    }

    /// Returns the path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the fragment, including the leading `#`. Empty if there is no fragment.
    pub fn fragment(&self) -> &str {
        &self.fragment
    }
}

/// All state of one open page.
#[derive(Debug)]
pub struct PageSession<V = PageView> {
    location: PageLocation,
    filter: Option<IdentityFilter>,
    handler: PageHandler,
    visibility: ThumbnailVisibility,
    view: V,
}

impl PageSession<PageView> {
    /// Creates a session for a page at `location`, rendering into a fresh [`PageView`].
    pub fn new(config: &ViewerConfig, location: PageLocation) -> Self {
        Self::with_view(config, location, PageView::default())
    }
}

impl<V: View> PageSession<V> {
    /// Creates a session for a page at `location`, rendering into `view`.
    ///
    /// If the location's fragment asks for thumbnails, they are shown before this returns.
    pub fn with_view(config: &ViewerConfig, location: PageLocation, view: V) -> Self {
        let filter = if config.identity.is_enabled_for(config.page) {
            Some(IdentityFilter::new(&config.identity, location.path()))
        } else {
            debug!("identity filter disabled for {} page", config.page);
            None
        };

        let restore = ThumbnailVisibility::from_fragment(location.fragment());
        let mut session = Self {
            location,
            filter,
            handler: PageHandler::new(config),
            visibility: ThumbnailVisibility::Hidden,
            view,
        };
        if restore == ThumbnailVisibility::Shown {
            session.toggle_thumbnails();
        }
        session
    }

    /// Handles one event from the connection.
    pub fn handle_event(&mut self, event: &Event) -> HandleOutcome {
        if let Some(filter) = &mut self.filter
            && let FilterVerdict::Reject { close } = filter.check(event)
        {
            return if close {
                HandleOutcome::Close
            } else {
                HandleOutcome::Continue
            };
        }

        for effect in self.handler.handle(event, self.visibility) {
            self.view.apply(effect);
        }
        HandleOutcome::Continue
    }

    /// Flips thumbnail visibility, as a click on the toggle control does.
    pub fn toggle_thumbnails(&mut self) {
        self.visibility = self.visibility.toggled();
        self.location.fragment = self.visibility.fragment().to_owned();
        self.view
            .apply(ViewEffect::SyncThumbnails(self.visibility));
        self.view
            .apply(ViewEffect::SetToggleLabel(self.visibility.toggle_label()));
    }

    /// Returns the current thumbnail visibility.
    pub fn visibility(&self) -> ThumbnailVisibility {
        self.visibility
    }

    /// Returns the current location. The fragment tracks thumbnail visibility.
    pub fn location(&self) -> &PageLocation {
        &self.location
    }

    /// Returns the run this page is bound to, if it has been bound yet.
    pub fn identity(&self) -> Option<&RunIdentity> {
        self.filter.as_ref().and_then(IdentityFilter::bound)
    }

    /// Returns the kind of page.
    pub fn page_kind(&self) -> PageKind {
        self.handler.page_kind()
    }

    /// Returns the view.
    pub fn view(&self) -> &V {
        &self.view
    }

    /// Consumes the session, returning the view.
    pub fn into_view(self) -> V {
        self.view
    }
}
