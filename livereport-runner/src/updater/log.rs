// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use super::{Effects, EventHandler, report::strip_row_wrapper};
use crate::{
    config::LogConfig,
    events::{Event, EventKind},
    thumbs::ThumbnailVisibility,
    view::{LogContent, LogRow, ViewEffect},
};
use regex::{Captures, Regex};
use smallvec::smallvec;
use std::{borrow::Cow, sync::LazyLock};
use tracing::{error, info};

static RESOURCE_ATTR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\b((?:href|src)\s*=\s*)(["']?)"#).unwrap());

/// Prefixes every `href` and `src` attribute value with `run_dir/`, so that resources embedded
/// in a run's report still resolve from the aggregate page.
pub(crate) fn rewrite_resource_refs<'a>(html: &'a str, run_dir: &str) -> Cow<'a, str> {
    RESOURCE_ATTR_REGEX.replace_all(html, |captures: &Captures<'_>| {
        format!("{}{}{run_dir}/", &captures[1], &captures[2])
    })
}

/// Synthesizes one row of an aggregate log table per event.
#[derive(Clone, Debug)]
pub struct LogUpdater {
    summary_extra_columns: usize,
}

impl LogUpdater {
    /// Creates a new log updater.
    pub fn new(config: &LogConfig) -> Self {
        Self {
            summary_extra_columns: config
                .summary_extra_columns
                .max(LogConfig::MIN_SUMMARY_EXTRA_COLUMNS),
        }
    }

    fn content(&self, event: &Event, run_dir: &str) -> Option<LogContent> {
        match &event.kind {
            EventKind::Row | EventKind::Summary => {
                let Some(fragment) = event.payload.as_fragment() else {
                    error!(
                        "dropping {} event from {run_dir}: payload is not an HTML fragment",
                        event.kind,
                    );
                    return None;
                };
                if event.kind == EventKind::Row {
                    let html = rewrite_resource_refs(strip_row_wrapper(fragment), run_dir);
                    Some(LogContent::Cells {
                        html: html.into_owned(),
                    })
                } else {
                    Some(LogContent::Summary {
                        html: fragment.to_owned(),
                        iteration: event.iteration,
                        colspan: self.summary_extra_columns,
                    })
                }
            }
            EventKind::NewDirectory => Some(LogContent::Blank),
            EventKind::NewDirectorySet | EventKind::Unknown(_) => None,
        }
    }
}

impl EventHandler for LogUpdater {
    fn handle(&self, event: &Event, visibility: ThumbnailVisibility) -> Effects {
        match &event.kind {
            EventKind::NewDirectorySet => {
                info!("ignoring {} event on a log page", event.kind);
                return Effects::new();
            }
            EventKind::Unknown(kind) => {
                error!("unknown message kind `{kind}`, dropping event");
                return Effects::new();
            }
            EventKind::Row | EventKind::Summary | EventKind::NewDirectory => {}
        }

        let Some(run_dir) = event.run_dir() else {
            error!(
                "dropping {} event: it names no run directory to link to",
                event.kind
            );
            return Effects::new();
        };

        match self.content(event, &run_dir) {
            Some(content) => smallvec![
                ViewEffect::AppendLogRow(LogRow {
                    kind: event.kind.clone(),
                    run_dir,
                    content,
                }),
                ViewEffect::SyncThumbnails(visibility),
            ],
            None => Effects::new(),
        }
    }
}
