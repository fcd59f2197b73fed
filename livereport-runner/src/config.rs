// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Viewer configuration.
//!
//! The configuration says what kind of page a session drives, how run identities are derived and
//! checked, how frames are encoded, and which element identifiers and marker classes the page
//! template uses. Defaults are embedded in the binary; a user file is layered on top.

mod elements;
mod imp;

pub use elements::*;
pub use imp::*;
