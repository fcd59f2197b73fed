// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    ExpectedError, Result,
    output::{OutputContext, OutputOpts, OutputWriter},
};
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand, ValueEnum};
use livereport_runner::{
    codec::FrameFormat,
    config::{ConfigLocation, PageKind, ViewerConfig},
    connection::{Connection, ConnectionSummary, spawn_line_reader},
    filter::IdentityBinding,
    identity::{IdentityScheme, RunIdentity},
    session::{PageLocation, PageSession},
    view::PageView,
};
use serde::Serialize;
use std::io::Write;
use tokio::io::{AsyncBufRead, BufReader};
use tracing::debug;

/// Follow a live test-report stream.
///
/// Frames are read one per line and applied to a page exactly as a browser tab showing that page
/// would apply them.
#[derive(Debug, Parser)]
#[command(
    version,
    styles = crate::output::clap_styles::style(),
    max_term_width = 100,
)]
pub struct LiveReportApp {
    #[clap(flatten)]
    output: OutputOpts,

    #[clap(subcommand)]
    command: Command,
}

impl LiveReportApp {
    /// Initializes the output context.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the app.
    ///
    /// Returns the exit code.
    pub fn exec(self, output_writer: &mut OutputWriter) -> Result<i32> {
        match self.command {
            Command::Watch(opts) => opts.exec(output_writer),
        }
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply a stream of frames to a page and print the result
    ///
    /// The stream ends when the input does, or when the page asks to close the channel.
    Watch(Box<WatchOpts>),
}

#[derive(Debug, Args)]
struct WatchOpts {
    /// Location of the page, as PATH[#FRAGMENT]
    #[arg(long, value_name = "URL")]
    page_url: String,

    /// File to read frames from, one per line ("-" for standard input)
    #[arg(long, short, value_name = "PATH", default_value = "-")]
    input: Utf8PathBuf,

    /// Viewer config file, layered over the defaults
    #[arg(long, value_name = "PATH", env = "LIVEREPORT_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Kind of page: report, log, directories
    #[arg(long, value_name = "KIND", help_heading = "PAGE OPTIONS")]
    page: Option<PageKind>,

    /// Run identity scheme: numbered, slug
    #[arg(long, value_name = "SCHEME", help_heading = "PAGE OPTIONS")]
    scheme: Option<IdentityScheme>,

    /// Frame encoding: json, delimited
    #[arg(long, value_name = "FORMAT", help_heading = "PAGE OPTIONS")]
    format: Option<FrameFormat>,

    /// Click the thumbnail toggle once after the stream ends
    #[arg(long, help_heading = "PAGE OPTIONS")]
    toggle_thumbs: bool,

    /// Output format for the final view
    #[arg(
        long,
        value_enum,
        default_value_t,
        value_name = "FMT",
        help_heading = "OUTPUT OPTIONS"
    )]
    message_format: MessageFormat,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
enum MessageFormat {
    /// An HTML snapshot of the page
    #[default]
    Html,
    /// A JSON document describing the page and the connection
    Json,
}

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct WatchReport<'a> {
    page: PageKind,
    run: Option<&'a RunIdentity>,
    fragment: &'a str,
    connection: &'a ConnectionSummary,
    view: &'a PageView,
}

impl WatchOpts {
    fn exec(self, output_writer: &mut OutputWriter) -> Result<i32> {
        let config = self.make_config()?;
        let location = PageLocation::parse(&self.page_url);
        self.check_page_identity(&config, &location)?;

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| ExpectedError::RuntimeCreateError { err })?;
        let (mut session, summary) = block_on_input(runtime, self.watch(&config, location))?;

        if self.toggle_thumbs {
            session.toggle_thumbnails();
        }

        self.write_output(&config, &session, &summary, output_writer)?;
        Ok(0)
    }

    fn make_config(&self) -> Result<ViewerConfig> {
        let mut config = ViewerConfig::load(ConfigLocation::from_cli_or_env(self.config.as_deref()))?;
        if let Some(page) = self.page {
            config.page = page;
        }
        if let Some(scheme) = self.scheme {
            config.identity.scheme = scheme;
        }
        if let Some(format) = self.format {
            config.frames = format;
        }
        debug!("resolved viewer config: {config:?}");
        Ok(config)
    }

    /// Fails early if the page is filtered by a path that names no run.
    fn check_page_identity(&self, config: &ViewerConfig, location: &PageLocation) -> Result<()> {
        if !config.identity.is_enabled_for(config.page)
            || config.identity.binding == IdentityBinding::AdoptFirst
        {
            return Ok(());
        }

        config
            .identity
            .scheme
            .parse_path(location.path())
            .map_err(|err| ExpectedError::PageUrlError {
                url: self.page_url.clone(),
                err,
            })?;
        Ok(())
    }

    async fn watch(
        &self,
        config: &ViewerConfig,
        location: PageLocation,
    ) -> Result<(PageSession, ConnectionSummary)> {
        let (endpoint, reader): (&str, Box<dyn AsyncBufRead + Unpin + Send>) =
            if self.input.as_str() == "-" {
                ("stdin", Box::new(BufReader::new(tokio::io::stdin())))
            } else {
                let file = tokio::fs::File::open(&self.input).await.map_err(|err| {
                    ExpectedError::InputReadFailed {
                        path: self.input.clone(),
                        err,
                    }
                })?;
                (self.input.as_str(), Box::new(BufReader::new(file)))
            };

        let mut session = PageSession::new(config, location);
        let receiver = spawn_line_reader(reader);
        let summary = Connection::new(endpoint, config.frames, receiver)
            .run(|event| session.handle_event(&event))
            .await;

        Ok((session, summary))
    }

    fn write_output(
        &self,
        config: &ViewerConfig,
        session: &PageSession,
        summary: &ConnectionSummary,
        output_writer: &mut OutputWriter,
    ) -> Result<()> {
        let mut writer = output_writer.stdout_writer();

        match self.message_format {
            MessageFormat::Html => {
                let html = session
                    .view()
                    .render_html(config.page, &config.elements, &config.classes);
                writer
                    .write_all(html.as_bytes())
                    .map_err(|err| ExpectedError::WriteOutputError { err })?;
            }
            MessageFormat::Json => {
                let report = WatchReport {
                    page: config.page,
                    run: session.identity(),
                    fragment: session.location().fragment(),
                    connection: summary,
                    view: session.view(),
                };
                serde_json::to_writer_pretty(&mut writer, &report).map_err(|err| {
                    if err.is_io() {
                        ExpectedError::WriteOutputError { err: err.into() }
                    } else {
                        ExpectedError::SerializeViewError { err }
                    }
                })?;
                writeln!(writer).map_err(|err| ExpectedError::WriteOutputError { err })?;
            }
        }

        writer
            .flush()
            .map_err(|err| ExpectedError::WriteOutputError { err })
    }
}

/// Runs `future` to completion, then shuts the runtime down without waiting for blocking reads.
///
/// Reading standard input parks a blocking thread until the producer writes another line or closes
/// the stream. Once the page has closed its channel, that read is abandoned.
fn block_on_input<F: Future>(runtime: tokio::runtime::Runtime, future: F) -> F::Output {
    let output = runtime.block_on(future);
    runtime.shutdown_background();
    output
}
