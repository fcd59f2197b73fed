// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::{config_from_toml, drive};
use color_eyre::eyre::Result;
use indoc::indoc;
use livereport_runner::{
    config::ViewerConfig,
    connection::CloseReason,
    identity::RunIdentity,
    thumbs::ThumbnailVisibility,
    view::RowDisplay,
};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn report_page_shows_only_its_run() {
    let input = indoc! {r#"
        {"kind":"row","testId":3,"run":1,"seed":42,"data":"<tr><td>first</td></tr>"}
        {"kind":"row","testId":3,"run":2,"seed":42,"data":"<tr><td>other run</td></tr>"}
        this is not a frame
        {"kind":"summary","testId":3,"run":1,"seed":42,"iteration":1,"data":"1 passed"}
        {"msgType":"row","testId":3,"run":1,"seed":42,"data":"<tr><td>second</td></tr>"}
        {"kind":"newDirs","testId":3,"run":1,"data":["3-1-42"]}
        {"kind":"progress","testId":3,"run":1,"data":"50%"}
        {"kind":"summary","testId":3,"run":1,"seed":42,"iteration":2,"data":"2 passed"}
    "#};

    let (session, summary) = drive(&ViewerConfig::default(), "/3-1-42/", input).await;

    assert_eq!(session.identity(), Some(&RunIdentity::numbered(3, 1)));
    let rows: Vec<_> = session
        .view()
        .results
        .iter()
        .map(|row| row.html.as_str())
        .collect();
    assert_eq!(rows, vec!["<td>first</td>", "<td>second</td>"]);
    assert_eq!(session.view().summary.as_deref(), Some("2 passed"));

    assert_eq!(summary.frames_received, 8);
    assert_eq!(summary.malformed_frames, 1);
    assert_eq!(summary.events_dispatched, 7);
    assert_eq!(summary.close_reason, CloseReason::Remote);
}

#[tokio::test]
async fn thumbnails_restored_from_fragment() {
    let input = indoc! {r#"
        {"kind":"row","testId":3,"run":1,"data":"<tr><td><img class=\"thumb\"><a class=\"tlink\">x</a></td></tr>"}
    "#};

    let (mut session, _) = drive(&ViewerConfig::default(), "/3-1-42/#thumbs", input).await;
    assert_eq!(session.visibility(), ThumbnailVisibility::Shown);
    assert_eq!(
        session.view().results[0].display,
        RowDisplay::for_visibility(ThumbnailVisibility::Shown),
        "rows added after load follow the restored state"
    );

    session.toggle_thumbnails();
    assert_eq!(session.location().fragment(), "#");
    assert_eq!(
        session.view().results[0].display,
        RowDisplay::for_visibility(ThumbnailVisibility::Hidden)
    );
}

#[tokio::test]
async fn first_generation_stream() -> Result<()> {
    let config = config_from_toml(indoc! {r#"
        [identity]
        scheme = "slug"
        binding = "adopt-first"
        on-mismatch = "close"

        [frames]
        format = "delimited"
    "#})?;

    let input = indoc! {r#"
        row:chrome-3:<tr><td>a: ok</td></tr>
        summary:chrome-3:1 of 1 passed
        row:firefox-3:<tr><td>b</td></tr>
        row:chrome-3:<tr><td>never seen</td></tr>
    "#};

    let (session, summary) = drive(&config, "/", input).await;

    assert_eq!(session.identity(), Some(&RunIdentity::slug("chrome-3")));
    assert_eq!(session.view().results.len(), 1);
    assert_eq!(session.view().results[0].html, "<td>a: ok</td>");
    assert_eq!(session.view().summary.as_deref(), Some("1 of 1 passed"));
    assert_eq!(summary.close_reason, CloseReason::Handler);
    assert_eq!(summary.events_dispatched, 3);

    Ok(())
}

#[tokio::test]
async fn unresolvable_page_shows_nothing() {
    let input = indoc! {r#"
        {"kind":"row","testId":3,"run":1,"data":"<tr><td>a</td></tr>"}
        {"kind":"summary","testId":3,"run":1,"data":"done"}
    "#};

    let (session, summary) = drive(&ViewerConfig::default(), "/dashboard/", input).await;
    assert_eq!(session.identity(), None);
    assert!(session.view().results.is_empty());
    assert_eq!(session.view().summary, None);
    assert_eq!(summary.events_dispatched, 2);
}
