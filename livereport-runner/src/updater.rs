// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! View updaters.
//!
//! An updater maps an accepted event to the view effects it causes. Updaters hold configuration
//! but no page state, so the same event always produces the same effects for a given thumbnail
//! visibility.

mod directories;
mod log;
mod report;

pub use directories::DirectoryUpdater;
pub use log::LogUpdater;
pub use report::ReportUpdater;

use crate::{
    config::{PageKind, ViewerConfig},
    events::Event,
    thumbs::ThumbnailVisibility,
    view::ViewEffect,
};
use smallvec::SmallVec;

/// The effects caused by a single event.
///
/// Most events cause an append followed by a thumbnail re-sync, so two effects are stored inline.
pub type Effects = SmallVec<[ViewEffect; 2]>;

/// Maps events to view effects.
pub trait EventHandler {
    /// Returns the effects of an event that passed the identity filter.
    ///
    /// `visibility` is the page's current thumbnail visibility, re-applied after rows are added.
    fn handle(&self, event: &Event, visibility: ThumbnailVisibility) -> Effects;
}

/// The updater for a kind of page.
#[derive(Clone, Debug)]
pub enum PageHandler {
    /// A per-run report page.
    Report(ReportUpdater),
    /// An aggregate log page.
    Log(LogUpdater),
    /// A directory listing.
    Directories(DirectoryUpdater),
}

impl PageHandler {
    /// Creates the updater for the page kind named in `config`.
    pub fn new(config: &ViewerConfig) -> Self {
        match config.page {
            PageKind::Report => Self::Report(ReportUpdater),
            PageKind::Log => Self::Log(LogUpdater::new(&config.log)),
            PageKind::Directories => Self::Directories(DirectoryUpdater),
        }
    }

    /// Returns the kind of page this updater drives.
    pub fn page_kind(&self) -> PageKind {
        match self {
            Self::Report(_) => PageKind::Report,
            Self::Log(_) => PageKind::Log,
            Self::Directories(_) => PageKind::Directories,
        }
    }
}

impl EventHandler for PageHandler {
    fn handle(&self, event: &Event, visibility: ThumbnailVisibility) -> Effects {
        match self {
            Self::Report(updater) => updater.handle(event, visibility),
            Self::Log(updater) => updater.handle(event, visibility),
            Self::Directories(updater) => updater.handle(event, visibility),
        }
    }
}
