// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! General support code for livereport-runner.

use std::borrow::Cow;

/// Utilities for pluralizing various words based on count.
pub mod plural {
    /// Returns "frame" if `count` is 1, otherwise "frames".
    pub fn frames_str(count: usize) -> &'static str {
        if count == 1 { "frame" } else { "frames" }
    }

    /// Returns "event" if `count` is 1, otherwise "events".
    pub fn events_str(count: usize) -> &'static str {
        if count == 1 { "event" } else { "events" }
    }

    /// Returns "directory" if `count` is 1, otherwise "directories".
    pub fn directories_str(count: usize) -> &'static str {
        if count == 1 {
            "directory"
        } else {
            "directories"
        }
    }
}

/// Escapes text for use in HTML content and double-quoted attribute values.
pub fn html_escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}
