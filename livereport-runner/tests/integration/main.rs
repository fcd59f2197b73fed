// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: frames are fed through the line transport into a page session.

mod directories;
mod fixtures;
mod log_page;
mod report;
