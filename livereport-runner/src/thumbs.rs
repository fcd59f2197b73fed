// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thumbnail visibility.
//!
//! Result rows show either image thumbnails or plain text links. Which one is a page-wide setting,
//! toggled by the user and remembered in the URL fragment so that reloads and shared links come
//! back in the same state.

use serde::Serialize;
use std::fmt;

/// Whether thumbnails or text links are displayed.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThumbnailVisibility {
    /// Text links are shown, thumbnails are hidden.
    #[default]
    Hidden,

    /// Thumbnails are shown, text links are hidden.
    Shown,
}

impl ThumbnailVisibility {
    /// The fragment recorded while thumbnails are shown.
    pub const SHOWN_FRAGMENT: &'static str = "#thumbs";

    /// The fragment recorded while thumbnails are hidden.
    pub const HIDDEN_FRAGMENT: &'static str = "#";

    /// Returns the visibility a page fragment asks for.
    pub fn from_fragment(fragment: &str) -> Self {
        if fragment.contains("thumbs") {
            Self::Shown
        } else {
            Self::Hidden
        }
    }

    /// Returns the other state.
    pub fn toggled(self) -> Self {
        match self {
            Self::Hidden => Self::Shown,
            Self::Shown => Self::Hidden,
        }
    }

    /// Returns the fragment to record for this state.
    pub fn fragment(self) -> &'static str {
        match self {
            Self::Hidden => Self::HIDDEN_FRAGMENT,
            Self::Shown => Self::SHOWN_FRAGMENT,
        }
    }

    /// Returns the label of the toggle control in this state.
    ///
    /// The label names the action a click performs, not the current state.
    pub fn toggle_label(self) -> &'static str {
        match self {
            Self::Hidden => "Show Thumbnails",
            Self::Shown => "Hide Thumbnails",
        }
    }

    /// Returns the display mode for thumbnail elements.
    pub fn thumbnail_display(self) -> DisplayMode {
        match self {
            Self::Hidden => DisplayMode::None,
            Self::Shown => DisplayMode::Inline,
        }
    }

    /// Returns the display mode for text-link elements. Always the complement of
    /// [`Self::thumbnail_display`].
    pub fn text_link_display(self) -> DisplayMode {
        self.thumbnail_display().complement()
    }
}

/// A CSS display mode.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplayMode {
    /// `display: inline`.
    #[default]
    Inline,

    /// `display: none`.
    None,
}

impl DisplayMode {
    /// Returns the other mode.
    pub fn complement(self) -> Self {
        match self {
            Self::Inline => Self::None,
            Self::None => Self::Inline,
        }
    }

    /// Returns the CSS value.
    pub fn as_css(self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::None => "none",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_css())
    }
}
