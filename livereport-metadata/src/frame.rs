// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt;

/// A single event frame, as serialized by the report server.
///
/// Run identity is carried in one of two forms depending on the deployment: the decomposed
/// `testId` + `run` (+ `seed`) integers, or a single composite `slug`. Consumers pick one form per
/// deployment and ignore the other.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFrame {
    /// The message kind discriminator.
    ///
    /// Earlier servers named this field `msgType`.
    #[serde(default, alias = "msgType", skip_serializing_if = "Option::is_none")]
    pub kind: Option<SmolStr>,

    /// The numeric test identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_id: Option<u64>,

    /// The run number for the test.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<u64>,

    /// The random seed for the run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// The composite run slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<SmolStr>,

    /// The iteration this event belongs to, used for display only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iteration: Option<u64>,

    /// The directory holding the run's report, relative to the server root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test_dir: Option<String>,

    /// The event payload.
    #[serde(default)]
    pub data: FramePayload,
}

impl EventFrame {
    /// Returns the parsed event kind, or `None` if the frame has no discriminator.
    ///
    /// An empty discriminator is treated the same as a missing one.
    pub fn event_kind(&self) -> Option<EventKind> {
        match self.kind.as_deref() {
            None | Some("") => None,
            Some(kind) => Some(EventKind::from_wire(kind)),
        }
    }
}

/// The payload of an [`EventFrame`].
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum FramePayload {
    /// An HTML fragment, carried by `row` and `summary` events.
    Fragment(String),

    /// An ordered list of directory names, carried by `newDirs` events.
    Directories(Vec<String>),
}

impl FramePayload {
    /// Returns the HTML fragment, if this payload is one.
    pub fn as_fragment(&self) -> Option<&str> {
        match self {
            Self::Fragment(fragment) => Some(fragment),
            Self::Directories(_) => None,
        }
    }

    /// Returns the directory list, if this payload is one.
    pub fn as_directories(&self) -> Option<&[String]> {
        match self {
            Self::Fragment(_) => None,
            Self::Directories(dirs) => Some(dirs),
        }
    }

    /// Returns a short, single-line preview of the payload for diagnostics.
    pub fn preview(&self) -> String {
        const PREVIEW_CHARS: usize = 40;

        match self {
            Self::Fragment(fragment) => fragment.chars().take(PREVIEW_CHARS).collect(),
            Self::Directories(dirs) => format!("[{} directories]", dirs.len()),
        }
    }
}

impl Default for FramePayload {
    fn default() -> Self {
        Self::Fragment(String::new())
    }
}

/// The kind of an event, as named by the frame discriminator.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum EventKind {
    /// A new result row: `row`.
    Row,

    /// A replacement summary: `summary`.
    Summary,

    /// A snapshot of the current directory set: `newDirs`.
    NewDirectorySet,

    /// A new run directory started producing events: `newDir`.
    NewDirectory,

    /// A discriminator this version doesn't know about.
    Unknown(SmolStr),
}

impl EventKind {
    /// Wire names for all known kinds.
    pub fn variants() -> &'static [&'static str] {
        &["row", "summary", "newDirs", "newDir"]
    }

    /// Parses a wire discriminator. This never fails: unrecognized names map to
    /// [`EventKind::Unknown`].
    pub fn from_wire(kind: &str) -> Self {
        match kind {
            "row" => Self::Row,
            "summary" => Self::Summary,
            "newDirs" | "newDirSet" => Self::NewDirectorySet,
            "newDir" => Self::NewDirectory,
            other => Self::Unknown(other.into()),
        }
    }

    /// Returns the wire name for this kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Row => "row",
            Self::Summary => "summary",
            Self::NewDirectorySet => "newDirs",
            Self::NewDirectory => "newDir",
            Self::Unknown(kind) => kind,
        }
    }

    /// Returns true if this kind is one of the known kinds.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for EventKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let kind = SmolStr::deserialize(deserializer)?;
        Ok(Self::from_wire(&kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("row", EventKind::Row ; "row")]
    #[test_case("summary", EventKind::Summary ; "summary")]
    #[test_case("newDirs", EventKind::NewDirectorySet ; "new dirs")]
    #[test_case("newDirSet", EventKind::NewDirectorySet ; "new dir set alias")]
    #[test_case("newDir", EventKind::NewDirectory ; "new dir")]
    #[test_case("Row", EventKind::Unknown("Row".into()) ; "case sensitive")]
    #[test_case("progress", EventKind::Unknown("progress".into()) ; "unknown")]
    fn kind_from_wire(input: &str, expected: EventKind) {
        assert_eq!(EventKind::from_wire(input), expected);
    }

    #[test]
    fn frame_with_numbered_identity() {
        let frame: EventFrame = serde_json::from_str(
            r#"{"kind": "row", "testId": 3, "run": 1, "seed": 42, "iteration": 7,
                "data": "<tr><td>ok</td></tr>"}"#,
        )
        .unwrap();

        assert_eq!(frame.event_kind(), Some(EventKind::Row));
        assert_eq!((frame.test_id, frame.run, frame.seed), (Some(3), Some(1), Some(42)));
        assert_eq!(frame.iteration, Some(7));
        assert_eq!(frame.data.as_fragment(), Some("<tr><td>ok</td></tr>"));
        assert_eq!(frame.slug, None);
    }

    #[test]
    fn frame_with_msg_type_and_directory_list() {
        let frame: EventFrame =
            serde_json::from_str(r#"{"msgType": "newDirs", "data": ["3-1-42", "3-2-17"]}"#)
                .unwrap();

        assert_eq!(frame.event_kind(), Some(EventKind::NewDirectorySet));
        assert_eq!(
            frame.data.as_directories(),
            Some(&["3-1-42".to_owned(), "3-2-17".to_owned()][..])
        );
    }

    #[test_case(r#"{"data": "x"}"# ; "missing kind")]
    #[test_case(r#"{"kind": "", "data": "x"}"# ; "empty kind")]
    fn frame_without_kind(input: &str) {
        let frame: EventFrame = serde_json::from_str(input).unwrap();
        assert_eq!(frame.event_kind(), None);
    }

    #[test]
    fn missing_data_is_empty_fragment() {
        let frame: EventFrame = serde_json::from_str(r#"{"kind": "newDir", "slug": "a"}"#).unwrap();
        assert_eq!(frame.data, FramePayload::Fragment(String::new()));
    }

    #[test]
    fn payload_preview_is_truncated() {
        let payload = FramePayload::Fragment("x".repeat(100));
        assert_eq!(payload.preview().len(), 40);

        let payload = FramePayload::Directories(vec!["a".to_owned(), "b".to_owned()]);
        assert_eq!(payload.preview(), "[2 directories]");
    }
}
