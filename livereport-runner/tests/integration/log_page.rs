// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::fixtures::{config_from_toml, drive};
use color_eyre::eyre::Result;
use indoc::indoc;
use livereport_runner::{config::PageKind, events::EventKind, view::LogContent};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn log_page_aggregates_runs() -> Result<()> {
    let config = config_from_toml(indoc! {r#"
        [page]
        kind = "log"

        [log]
        summary-extra-columns = 10
    "#})?;
    assert_eq!(config.page, PageKind::Log);

    let input = indoc! {r#"
        {"kind":"row","testId":3,"run":1,"seed":42,"data":"<tr><td><img src=\"a.png\" class=\"thumb\"></td></tr>"}
        {"kind":"row","testId":4,"run":1,"seed":7,"testDir":"runs/4-1-7","data":"<td><a href=\"log.txt\">log</a></td>"}
        {"kind":"summary","slug":"chrome-5","iteration":3,"data":"all passed"}
        {"kind":"newDir","testDir":"runs/9"}
        {"kind":"newDirs","data":["runs/9"]}
        {"kind":"row","data":"<td>nowhere</td>"}
    "#};

    let (session, summary) = drive(&config, "/log/", input).await;
    assert_eq!(summary.events_dispatched, 6);

    let rows: Vec<_> = session
        .view()
        .logs
        .iter()
        .map(|rendered| &rendered.row)
        .collect();
    assert_eq!(rows.len(), 4);

    assert_eq!(rows[0].kind, EventKind::Row);
    assert_eq!(rows[0].run_dir, "3-1-42");
    assert_eq!(
        rows[0].content,
        LogContent::Cells {
            html: r#"<td><img src="3-1-42/a.png" class="thumb"></td>"#.to_owned(),
        }
    );

    assert_eq!(rows[1].run_dir, "runs/4-1-7");
    assert_eq!(rows[1].run_href(), "runs/4-1-7/");
    assert_eq!(
        rows[1].content,
        LogContent::Cells {
            html: r#"<td><a href="runs/4-1-7/log.txt">log</a></td>"#.to_owned(),
        }
    );

    assert_eq!(
        rows[2].content,
        LogContent::Summary {
            html: "all passed".to_owned(),
            iteration: Some(3),
            colspan: 10,
        }
    );
    assert_eq!(rows[3].content, LogContent::Blank);

    Ok(())
}
