// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Follow a live test-report stream from the command line.
//!
//! `livereport watch` reads event frames from a file or standard input, applies them to a page
//! the same way a browser tab showing that page would, and prints the resulting view.

#![warn(missing_docs)]

mod dispatch;
mod errors;
mod output;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
#[doc(hidden)]
pub use output::OutputWriter;
