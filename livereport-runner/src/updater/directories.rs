// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{Effects, EventHandler};
use crate::{
    events::{Event, EventKind},
    helpers::plural,
    thumbs::ThumbnailVisibility,
    view::{DirectoryEntry, ViewEffect},
};
use smallvec::smallvec;
use tracing::{debug, error, info};

/// Replaces a directory listing whenever a new directory set arrives.
#[derive(Clone, Copy, Debug, Default)]
pub struct DirectoryUpdater;

impl EventHandler for DirectoryUpdater {
    fn handle(&self, event: &Event, _visibility: ThumbnailVisibility) -> Effects {
        if event.kind != EventKind::NewDirectorySet {
            info!("ignoring {} event on a directory page", event.kind);
            return Effects::new();
        }

        let Some(directories) = event.payload.as_directories() else {
            error!(
                "{} event carries an HTML fragment instead of a directory list, keeping current listing",
                event.kind,
            );
            return Effects::new();
        };

        debug!(
            "replacing directory listing with {} {}",
            directories.len(),
            plural::directories_str(directories.len()),
        );
        let entries = directories.iter().map(DirectoryEntry::new).collect();
        smallvec![ViewEffect::ReplaceDirectories(entries)]
    }
}
