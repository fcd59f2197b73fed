// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core functionality for livereport, a client for live test-report pages.
//!
//! A report server streams events describing a test run as it executes. A page subscribes to the
//! stream through a [`connection::Connection`], checks that each event belongs to the run it
//! shows with an [`filter::IdentityFilter`], and applies accepted events to its view through the
//! updater for its kind of page. All of a page's state lives in a [`session::PageSession`].

pub mod codec;
pub mod config;
pub mod connection;
pub mod errors;
pub mod events;
pub mod filter;
mod helpers;
pub mod identity;
pub mod session;
#[cfg(test)]
mod test_helpers;
pub mod thumbs;
pub mod updater;
pub mod view;
