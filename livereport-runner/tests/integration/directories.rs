// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::drive;
use indoc::indoc;
use livereport_runner::{
    config::{PageKind, ViewerConfig},
    view::DirectoryEntry,
};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn listing_is_replaced_wholesale() {
    let config = ViewerConfig {
        page: PageKind::Directories,
        ..ViewerConfig::default()
    };

    let input = indoc! {r#"
        {"kind":"newDirs","data":["3-1-42","3-2-42"]}
        {"kind":"row","testId":3,"run":1,"data":"<td>ignored</td>"}
        {"kind":"newDirSet","data":["4-1-7"]}
        {"kind":"newDirs","data":"not a list"}
    "#};

    let (session, summary) = drive(&config, "/", input).await;

    assert_eq!(summary.events_dispatched, 4);
    assert_eq!(
        session.view().directories,
        vec![DirectoryEntry::new("4-1-7")],
        "a fragment payload leaves the last listing in place"
    );
    assert_eq!(session.view().directories[0].href, "4-1-7/");
}
