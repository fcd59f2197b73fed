// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Frame codecs.
//!
//! Two frame encodings have been used by report servers:
//!
//! * `json`: one JSON object per frame, following
//!   [`EventFrame`](livereport_metadata::EventFrame).
//! * `delimited`: the first-generation `TYPE:ID:DATA` text form. `ID` is an opaque slug and
//!   `DATA` is the rest of the frame, colons included.

use crate::{
    errors::{FrameParseError, UnknownVariantError},
    events::{Event, EventKind, Payload},
};
use livereport_metadata::EventFrame;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The encoding used for frames on a channel.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameFormat {
    /// JSON objects.
    #[default]
    Json,

    /// `TYPE:ID:DATA` text.
    Delimited,
}

impl FrameFormat {
    /// String representations of all known variants.
    pub fn variants() -> &'static [&'static str] {
        &["json", "delimited"]
    }

    /// Decodes a single frame.
    pub fn decode(self, frame: &str) -> Result<Event, FrameParseError> {
        match self {
            Self::Json => decode_json(frame),
            Self::Delimited => decode_delimited(frame),
        }
    }
}

impl FromStr for FrameFormat {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Self::Json),
            "delimited" => Ok(Self::Delimited),
            other => Err(UnknownVariantError::new(
                "frame format",
                other,
                Self::variants(),
            )),
        }
    }
}

impl fmt::Display for FrameFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("json"),
            Self::Delimited => f.write_str("delimited"),
        }
    }
}

fn decode_json(frame: &str) -> Result<Event, FrameParseError> {
    let frame: EventFrame =
        serde_json::from_str(frame).map_err(|err| FrameParseError::Json { err })?;
    Event::from_frame(frame).ok_or(FrameParseError::MissingKind)
}

fn decode_delimited(frame: &str) -> Result<Event, FrameParseError> {
    let (kind, rest) = frame.split_once(':').ok_or(FrameParseError::NotDelimited)?;
    let (id, data) = rest.split_once(':').ok_or(FrameParseError::NotDelimited)?;
    if kind.is_empty() {
        return Err(FrameParseError::MissingKind);
    }

    Ok(Event::new(EventKind::from_wire(kind), Payload::Fragment(data.to_owned())).with_slug(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn decode_json_row() {
        let event = FrameFormat::Json
            .decode(r#"{"kind":"row","testId":3,"run":1,"seed":42,"data":"<tr><td>a</td></tr>"}"#)
            .unwrap();
        assert_eq!(
            event,
            Event::new(
                EventKind::Row,
                Payload::Fragment("<tr><td>a</td></tr>".to_owned())
            )
            .with_numbered(3, 1, 42)
        );
    }

    #[test]
    fn decode_json_unknown_kind_is_not_an_error() {
        let event = FrameFormat::Json
            .decode(r#"{"kind":"progress","data":"50%"}"#)
            .unwrap();
        assert_eq!(event.kind, EventKind::Unknown("progress".into()));
    }

    #[test_case("not json" ; "garbage")]
    #[test_case("42" ; "number")]
    #[test_case(r#"{"kind": 5}"# ; "numeric kind")]
    #[test_case(r#"{"kind": "row", "testId": "three"}"# ; "string test id")]
    fn decode_json_invalid(frame: &str) {
        let err = FrameFormat::Json.decode(frame).unwrap_err();
        assert!(
            matches!(err, FrameParseError::Json { .. }),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn decode_json_missing_kind() {
        let err = FrameFormat::Json
            .decode(r#"{"testId": 3, "run": 1, "data": "x"}"#)
            .unwrap_err();
        assert!(matches!(err, FrameParseError::MissingKind));
    }

    #[test_case("row:chrome-3:<tr><td>a:b</td></tr>", "row", "chrome-3", "<tr><td>a:b</td></tr>" ; "data with colons")]
    #[test_case("summary:x:", "summary", "x", "" ; "empty data")]
    #[test_case("weird::data", "weird", "", "data" ; "empty id")]
    fn decode_delimited_ok(frame: &str, kind: &str, slug: &str, data: &str) {
        let event = FrameFormat::Delimited.decode(frame).unwrap();
        assert_eq!(event.kind, EventKind::from_wire(kind));
        assert_eq!(event.slug.as_deref(), Some(slug));
        assert_eq!(event.payload.as_fragment(), Some(data));
    }

    #[test]
    fn decode_delimited_invalid() {
        assert!(matches!(
            FrameFormat::Delimited.decode("no separators"),
            Err(FrameParseError::NotDelimited)
        ));
        assert!(matches!(
            FrameFormat::Delimited.decode("row:only-one"),
            Err(FrameParseError::NotDelimited)
        ));
        assert!(matches!(
            FrameFormat::Delimited.decode(":id:data"),
            Err(FrameParseError::MissingKind)
        ));
    }
}
