// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for `livereport` failures.
///
/// Problems with individual frames never cause a non-zero exit: they are logged and dropped. The
/// codes here cover setting up a session and writing out its result.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum LiveReportExitCode {}

impl LiveReportExitCode {
    /// No errors occurred and the session ran to completion.
    pub const OK: i32 = 0;

    /// A user issue happened while setting up a session, for example an invalid config file or
    /// page URL.
    pub const SETUP_ERROR: i32 = 96;

    /// The frame input could not be opened.
    pub const INPUT_READ_FAILED: i32 = 97;

    /// Writing data to stdout or stderr produced an error.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;
}
