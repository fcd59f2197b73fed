// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Decoded events.

pub use livereport_metadata::{EventKind, FramePayload as Payload};
use livereport_metadata::EventFrame;
use smol_str::SmolStr;

/// An event decoded from a single frame.
///
/// Events are produced by a [`Connection`](crate::connection::Connection) and consumed by a
/// [`PageSession`](crate::session::PageSession). Unlike an [`EventFrame`], an event always has a
/// kind.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Event {
    /// The kind of event this is.
    pub kind: EventKind,

    /// The numeric test identifier, if the producer sent one.
    pub test_id: Option<u64>,

    /// The run number, if the producer sent one.
    pub run: Option<u64>,

    /// The run seed, if the producer sent one.
    pub seed: Option<u64>,

    /// The composite run slug, if the producer sent one.
    pub slug: Option<SmolStr>,

    /// The iteration this event belongs to. Display only.
    pub iteration: Option<u64>,

    /// The directory holding the run's report.
    pub test_dir: Option<String>,

    /// The kind-specific payload.
    pub payload: Payload,
}

impl Event {
    /// Creates an event of the given kind with no identity and the given payload.
    pub fn new(kind: EventKind, payload: Payload) -> Self {
        Self {
            kind,
            test_id: None,
            run: None,
            seed: None,
            slug: None,
            iteration: None,
            test_dir: None,
            payload,
        }
    }

    /// Converts a wire frame to an event, returning `None` if the frame has no kind.
    pub fn from_frame(frame: EventFrame) -> Option<Self> {
        let kind = frame.event_kind()?;
        Some(Self {
            kind,
            test_id: frame.test_id,
            run: frame.run,
            seed: frame.seed,
            slug: frame.slug,
            iteration: frame.iteration,
            test_dir: frame.test_dir,
            payload: frame.data,
        })
    }

    /// Sets the numeric identity.
    pub fn with_numbered(mut self, test_id: u64, run: u64, seed: u64) -> Self {
        self.test_id = Some(test_id);
        self.run = Some(run);
        self.seed = Some(seed);
        self
    }

    /// Sets the slug identity.
    pub fn with_slug(mut self, slug: impl Into<SmolStr>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Sets the iteration.
    pub fn with_iteration(mut self, iteration: u64) -> Self {
        self.iteration = Some(iteration);
        self
    }

    /// Returns the directory of the run this event came from.
    ///
    /// This is `testDir` if present, otherwise it is derived from whichever identity the event
    /// carries.
    pub fn run_dir(&self) -> Option<String> {
        if let Some(test_dir) = &self.test_dir {
            return Some(test_dir.clone());
        }
        if let Some(slug) = &self.slug {
            return Some(slug.to_string());
        }
        match (self.test_id, self.run, self.seed) {
            (Some(test_id), Some(run), Some(seed)) => Some(format!("{test_id}-{run}-{seed}")),
            (Some(test_id), Some(run), None) => Some(format!("{test_id}-{run}")),
            _ => None,
        }
    }
}
