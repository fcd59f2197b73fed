// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino_tempfile::Utf8TempDir;
use color_eyre::eyre::Result;
use livereport_runner::{
    config::{ConfigLocation, ViewerConfig},
    connection::{Connection, ConnectionSummary, spawn_line_reader},
    session::{PageLocation, PageSession},
};

/// Feeds `input`, one frame per line, to a fresh session for the page at `url`.
pub(crate) async fn drive(
    config: &ViewerConfig,
    url: &str,
    input: &'static str,
) -> (PageSession, ConnectionSummary) {
    let mut session = PageSession::new(config, PageLocation::parse(url));
    let receiver = spawn_line_reader(input.as_bytes());
    let summary = Connection::new("fixture", config.frames, receiver)
        .run(|event| session.handle_event(&event))
        .await;
    (session, summary)
}

/// Loads a viewer config from TOML text.
pub(crate) fn config_from_toml(contents: &str) -> Result<ViewerConfig> {
    let dir = Utf8TempDir::new()?;
    let path = dir.path().join("viewer.toml");
    std::fs::write(&path, contents)?;
    Ok(ViewerConfig::load(ConfigLocation::Explicit(&path))?)
}
