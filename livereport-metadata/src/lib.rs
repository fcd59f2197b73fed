// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Wire schema for live test-report event streams.
//!
//! A report server pushes one frame per event over a long-lived channel. This crate describes what
//! those frames look like on the wire, so that producers and consumers can share one definition.
//! The logic that applies events to a report page lives in `livereport-runner`.

mod exit_codes;
mod frame;

pub use exit_codes::*;
pub use frame::*;
