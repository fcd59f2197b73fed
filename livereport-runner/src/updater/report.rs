// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{Effects, EventHandler};
use crate::{
    events::{Event, EventKind},
    thumbs::ThumbnailVisibility,
    view::ViewEffect,
};
use regex::Regex;
use smallvec::smallvec;
use std::sync::LazyLock;
use tracing::{error, info};

// Anchored at both ends. The inner content may not contain any line terminator, including `\r`
// and the Unicode line and paragraph separators.
static ROW_WRAPPER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<tr>([^\r\n\x{2028}\x{2029}]*)</tr>$").unwrap());

/// Returns the inner content of a `<tr>…</tr>` fragment, or the fragment itself if it isn't
/// wrapped in a single row tag.
pub(crate) fn strip_row_wrapper(fragment: &str) -> &str {
    match ROW_WRAPPER_REGEX.captures(fragment) {
        Some(captures) => captures.get(1).map_or(fragment, |inner| inner.as_str()),
        None => fragment,
    }
}

/// Applies `row` and `summary` events to a per-run report page.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReportUpdater;

impl EventHandler for ReportUpdater {
    fn handle(&self, event: &Event, visibility: ThumbnailVisibility) -> Effects {
        match &event.kind {
            EventKind::Row => {
                let Some(fragment) = event.payload.as_fragment() else {
                    error!("dropping row event: payload is not an HTML fragment");
                    return Effects::new();
                };
                smallvec![
                    ViewEffect::AppendResultRow {
                        html: strip_row_wrapper(fragment).to_owned(),
                    },
                    ViewEffect::SyncThumbnails(visibility),
                ]
            }
            EventKind::Summary => {
                let Some(fragment) = event.payload.as_fragment() else {
                    error!("dropping summary event: payload is not an HTML fragment");
                    return Effects::new();
                };
                smallvec![ViewEffect::ReplaceSummary {
                    html: fragment.to_owned(),
                }]
            }
            EventKind::NewDirectorySet | EventKind::NewDirectory => {
                info!("ignoring {} event on a report page", event.kind);
                Effects::new()
            }
            EventKind::Unknown(kind) => {
                error!("unknown message kind `{kind}`, dropping event");
                Effects::new()
            }
        }
    }
}
