// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The view a page session writes to.
//!
//! Updaters never touch a view directly: they return [`ViewEffect`]s, which the session applies
//! to a [`View`] in order. [`PageView`] is the in-memory view used by the command line and by
//! tests.

use crate::{
    config::{ElementIds, MarkerClasses, PageKind},
    events::EventKind,
    helpers::html_escape,
    thumbs::{DisplayMode, ThumbnailVisibility},
};
use serde::Serialize;
use swrite::{SWrite, swrite, swriteln};

/// A single change to a view.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ViewEffect {
    /// Append a row with this inner content to the results table.
    AppendResultRow {
        /// The row's inner HTML.
        html: String,
    },

    /// Replace the content of the summary region.
    ReplaceSummary {
        /// The new summary HTML.
        html: String,
    },

    /// Append a row to the aggregate log table.
    AppendLogRow(LogRow),

    /// Replace the whole directory listing.
    ReplaceDirectories(Vec<DirectoryEntry>),

    /// Apply a thumbnail visibility to every thumbnail and text-link element on the page.
    SyncThumbnails(ThumbnailVisibility),

    /// Set the label of the thumbnail toggle control.
    SetToggleLabel(&'static str),
}

/// A view that effects can be applied to.
pub trait View {
    /// Applies a single effect.
    fn apply(&mut self, effect: ViewEffect);
}

/// A row of the aggregate log table.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LogRow {
    /// The kind of event the row was synthesized from.
    pub kind: EventKind,

    /// The directory of the run the event came from.
    pub run_dir: String,

    /// Kind-specific content.
    pub content: LogContent,
}

impl LogRow {
    /// Returns the link to the originating run's page.
    pub fn run_href(&self) -> String {
        format!("{}/", self.run_dir)
    }
}

/// Kind-specific content of a [`LogRow`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum LogContent {
    /// The cells of a result row, with resource references rewritten.
    Cells {
        /// The cells' HTML.
        html: String,
    },

    /// A summary, spanning the per-browser columns.
    Summary {
        /// The summary HTML.
        html: String,
        /// The iteration the summary is for.
        iteration: Option<u64>,
        /// The number of columns spanned.
        colspan: usize,
    },

    /// A placeholder.
    Blank,
}

/// An entry of the directory listing.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct DirectoryEntry {
    /// The directory name.
    pub name: String,
    /// The link to the run's page.
    pub href: String,
}

impl DirectoryEntry {
    /// Creates an entry linking to the page of the run in `name`.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let href = format!("{name}/");
        Self { name, href }
    }
}

/// Display modes applied to the thumbnail and text-link elements of a row.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RowDisplay {
    /// The mode of thumbnail elements.
    pub thumbnail: DisplayMode,
    /// The mode of text-link elements.
    pub text_link: DisplayMode,
}

impl RowDisplay {
    /// Returns the display modes for a visibility.
    pub fn for_visibility(visibility: ThumbnailVisibility) -> Self {
        Self {
            thumbnail: visibility.thumbnail_display(),
            text_link: visibility.text_link_display(),
        }
    }
}

/// A row of the results table.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ResultRow {
    /// The row's inner HTML.
    pub html: String,
    /// Current display modes.
    pub display: RowDisplay,
}

/// A row of the log table, with its display modes.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RenderedLogRow {
    /// The row.
    #[serde(flatten)]
    pub row: LogRow,
    /// Current display modes.
    pub display: RowDisplay,
}

/// An in-memory page.
///
/// Rows are appended with the modes a freshly created element has (both inline) and only change
/// when a [`ViewEffect::SyncThumbnails`] is applied.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct PageView {
    /// The results table.
    pub results: Vec<ResultRow>,
    /// The summary region.
    pub summary: Option<String>,
    /// The aggregate log table.
    pub logs: Vec<RenderedLogRow>,
    /// The directory listing.
    pub directories: Vec<DirectoryEntry>,
    /// The visibility last applied to the page.
    pub visibility: ThumbnailVisibility,
    /// The label of the toggle control.
    pub toggle_label: &'static str,
}

impl Default for PageView {
    fn default() -> Self {
        Self {
            results: Vec::new(),
            summary: None,
            logs: Vec::new(),
            directories: Vec::new(),
            visibility: ThumbnailVisibility::Hidden,
            toggle_label: ThumbnailVisibility::Hidden.toggle_label(),
        }
    }
}

impl View for PageView {
    fn apply(&mut self, effect: ViewEffect) {
        match effect {
            ViewEffect::AppendResultRow { html } => self.results.push(ResultRow {
                html,
                display: RowDisplay::default(),
            }),
            ViewEffect::ReplaceSummary { html } => self.summary = Some(html),
            ViewEffect::AppendLogRow(row) => self.logs.push(RenderedLogRow {
                row,
                display: RowDisplay::default(),
            }),
            ViewEffect::ReplaceDirectories(entries) => self.directories = entries,
            ViewEffect::SyncThumbnails(visibility) => {
                let display = RowDisplay::for_visibility(visibility);
                self.visibility = visibility;
                for row in &mut self.results {
                    row.display = display;
                }
                for row in &mut self.logs {
                    row.display = display;
                }
            }
            ViewEffect::SetToggleLabel(label) => self.toggle_label = label,
        }
    }
}

impl PageView {
    /// Renders an HTML snapshot of the parts of the page a page of this kind has.
    pub fn render_html(
        &self,
        page: PageKind,
        elements: &ElementIds,
        classes: &MarkerClasses,
    ) -> String {
        let mut out = String::new();

        if page != PageKind::Directories {
            swriteln!(
                out,
                r#"<input type="button" id="{}" value="{}">"#,
                html_escape(&elements.toggle),
                self.toggle_label,
            );
            swriteln!(out, "<style>");
            swriteln!(
                out,
                ".{} {{ display: {}; }}",
                classes.thumbnail,
                self.visibility.thumbnail_display(),
            );
            swriteln!(
                out,
                ".{} {{ display: {}; }}",
                classes.text_link,
                self.visibility.text_link_display(),
            );
            swriteln!(out, "</style>");
        }

        match page {
            PageKind::Report => self.render_report(&mut out, elements),
            PageKind::Log => self.render_logs(&mut out, elements),
            PageKind::Directories => self.render_directories(&mut out, elements),
        }

        out
    }

    fn render_report(&self, out: &mut String, elements: &ElementIds) {
        swriteln!(
            out,
            r#"<div id="{}">{}</div>"#,
            html_escape(&elements.summary),
            self.summary.as_deref().unwrap_or_default(),
        );
        swriteln!(out, r#"<table id="{}">"#, html_escape(&elements.results));
        for row in &self.results {
            swriteln!(out, "<tr>{}</tr>", row.html);
        }
        swriteln!(out, "</table>");
    }

    fn render_logs(&self, out: &mut String, elements: &ElementIds) {
        swriteln!(out, r#"<table id="{}">"#, html_escape(&elements.logs));
        for RenderedLogRow { row, .. } in &self.logs {
            swrite!(
                out,
                r#"<tr><td>{}</td><td><a href="{}">{}</a></td>"#,
                row.kind,
                html_escape(&row.run_href()),
                html_escape(&row.run_dir),
            );
            match &row.content {
                LogContent::Cells { html } => out.push_str(html),
                LogContent::Summary {
                    html,
                    iteration,
                    colspan,
                } => {
                    match iteration {
                        Some(iteration) => swrite!(out, "<td>{iteration}</td>"),
                        None => out.push_str("<td></td>"),
                    }
                    swrite!(out, r#"<td colspan="{colspan}">{html}</td>"#);
                }
                LogContent::Blank => out.push_str("<td></td>"),
            }
            swriteln!(out, "</tr>");
        }
        swriteln!(out, "</table>");
    }

    fn render_directories(&self, out: &mut String, elements: &ElementIds) {
        swriteln!(out, r#"<ul id="{}">"#, html_escape(&elements.directories));
        for entry in &self.directories {
            swriteln!(
                out,
                r#"<li><a href="{}">{}</a></li>"#,
                html_escape(&entry.href),
                html_escape(&entry.name),
            );
        }
        swriteln!(out, "</ul>");
    }
}
