// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Terminal output: diagnostics on stderr, the final view on stdout.
//!
//! Everything the runner reports about the connection and the page (frames dropped, runs
//! mismatched, the channel closing) arrives as `tracing` events and is printed one per line with a
//! short level heading. The view itself is the only thing written to stdout, so it can be piped.

use clap::{Args, ValueEnum};
use owo_colors::{OwoColorize, Style, style};
use std::{
    fmt,
    io::{BufWriter, Write},
    sync::Once,
};
use tracing::{
    Event, Level, Subscriber,
    field::{Field, Visit},
    level_filters::LevelFilter,
};
use tracing_subscriber::{
    Layer,
    filter::Targets,
    fmt::{FmtContext, FormatEvent, FormatFields, format},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
};

/// Log events with this target are printed without a level heading.
pub(crate) const NO_HEADING_TARGET: &str = "livereport::no_heading";

/// Environment variable overriding the log filter, in `tracing_subscriber::filter::Targets` syntax.
const LOG_ENV: &str = "LIVEREPORT_LOG";

pub(crate) mod clap_styles {
    use clap::builder::{
        Styles,
        styling::{AnsiColor, Effects},
    };

    pub(crate) const fn style() -> Styles {
        let bold_green = AnsiColor::Green.on_default().effects(Effects::BOLD);
        let bold_cyan = AnsiColor::Cyan.on_default().effects(Effects::BOLD);

        Styles::styled()
            .header(bold_green)
            .usage(bold_green)
            .literal(bold_cyan)
            .placeholder(AnsiColor::Cyan.on_default())
            .error(AnsiColor::Red.on_default().effects(Effects::BOLD))
            .valid(bold_cyan)
            .invalid(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    }
}

#[derive(Copy, Clone, Debug, Args)]
#[must_use]
pub(crate) struct OutputOpts {
    /// Verbose output: log every frame received
    #[arg(long, short, global = true, env = "LIVEREPORT_VERBOSE")]
    pub(crate) verbose: bool,

    /// Produce color output: auto, always, never
    #[arg(
        long,
        value_enum,
        default_value_t,
        hide_possible_values = true,
        global = true,
        value_name = "WHEN",
        env = "LIVEREPORT_COLOR"
    )]
    pub(crate) color: Color,
}

impl OutputOpts {
    pub(crate) fn init(self) -> OutputContext {
        init_logging(self.color, self.verbose);
        OutputContext { color: self.color }
    }
}

/// Output settings, resolved once at startup.
#[derive(Copy, Clone, Debug)]
#[must_use]
pub struct OutputContext {
    pub(crate) color: Color,
}

impl OutputContext {
    /// Returns general stderr styles for the current output context.
    pub fn stderr_styles(&self) -> StderrStyles {
        let mut styles = StderrStyles::default();
        if self.color.should_colorize(supports_color::Stream::Stderr) {
            styles.bold = style().bold();
        }
        styles
    }
}

/// When to colorize output.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
#[must_use]
pub enum Color {
    /// Colorize if the stream supports it.
    #[default]
    Auto,
    /// Always colorize.
    Always,
    /// Never colorize.
    Never,
}

impl Color {
    pub(crate) fn should_colorize(self, stream: supports_color::Stream) -> bool {
        match self {
            Color::Auto => supports_color::on_cached(stream).is_some(),
            Color::Always => true,
            Color::Never => false,
        }
    }
}

static INIT_LOGGER: Once = Once::new();

fn init_logging(color: Color, verbose: bool) {
    let mut styles = LogStyles::default();
    if color.should_colorize(supports_color::Stream::Stderr) {
        styles.colorize();
    }

    INIT_LOGGER.call_once(|| {
        let filter = std::env::var_os(LOG_ENV).unwrap_or_default();
        let filter = filter
            .into_string()
            .unwrap_or_else(|_| panic!("{LOG_ENV} is not UTF-8"));
        let targets = log_targets(&filter, verbose);

        let layer = tracing_subscriber::fmt::layer()
            .event_format(HeadingFormatter { styles })
            .with_writer(std::io::stderr)
            .with_filter(targets);

        tracing_subscriber::registry().with(layer).init();
    });
}

/// Builds the log filter: `LIVEREPORT_LOG` if set, otherwise `info`, or `debug` with `--verbose`
/// so that every decoded frame is shown.
fn log_targets(filter: &str, verbose: bool) -> Targets {
    if filter.is_empty() {
        let default = if verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        };
        Targets::new().with_default(default)
    } else {
        filter
            .parse()
            .unwrap_or_else(|err| panic!("unable to parse {LOG_ENV}: {err}"))
    }
}

/// Prints `heading: message`, dropping span context and any fields other than the message.
struct HeadingFormatter {
    styles: LogStyles,
}

impl<S, N> FormatEvent<S, N> for HeadingFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let metadata = event.metadata();
        if metadata.target() != NO_HEADING_TARGET {
            let (heading, style) = self.styles.heading(*metadata.level());
            write!(writer, "{}: ", heading.style(style))?;
        }

        let mut visitor = MessageVisitor {
            writer: &mut writer,
            result: Ok(()),
        };
        event.record(&mut visitor);
        visitor.result?;

        writeln!(writer)
    }
}

struct MessageVisitor<'writer, 'a> {
    writer: &'a mut format::Writer<'writer>,
    result: fmt::Result,
}

impl Visit for MessageVisitor<'_, '_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" && self.result.is_ok() {
            self.result = write!(self.writer, "{value:?}");
        }
    }
}

#[derive(Debug, Default)]
struct LogStyles {
    error: Style,
    warning: Style,
    info: Style,
    debug: Style,
}

impl LogStyles {
    fn colorize(&mut self) {
        self.error = style().red().bold();
        self.warning = style().yellow().bold();
        self.info = style().bold();
        self.debug = style().dimmed();
    }

    fn heading(&self, level: Level) -> (&'static str, Style) {
        match level {
            Level::ERROR => ("error", self.error),
            Level::WARN => ("warning", self.warning),
            Level::INFO => ("info", self.info),
            // Trace events are only ever enabled through LIVEREPORT_LOG.
            _ => ("debug", self.debug),
        }
    }
}

/// Styles for messages printed to stderr.
#[derive(Debug, Default)]
pub struct StderrStyles {
    pub(crate) bold: Style,
}

/// Where the final view is written: stdout, or a buffer in tests.
#[derive(Default)]
pub enum OutputWriter {
    /// Standard output.
    #[default]
    Normal,
    /// Captured output.
    #[cfg(test)]
    Test {
        /// Everything written to stdout.
        stdout: Vec<u8>,
    },
}

impl OutputWriter {
    pub(crate) fn stdout_writer(&mut self) -> Box<dyn Write + '_> {
        match self {
            Self::Normal => Box::new(BufWriter::new(std::io::stdout().lock())),
            #[cfg(test)]
            Self::Test { stdout } => Box::new(stdout),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("", false, Level::INFO, true ; "default shows info")]
    #[test_case("", false, Level::DEBUG, false ; "default hides frames")]
    #[test_case("", true, Level::DEBUG, true ; "verbose shows frames")]
    #[test_case("warn", true, Level::INFO, false ; "env overrides verbose")]
    #[test_case("livereport_runner=debug", false, Level::DEBUG, true ; "per target")]
    fn targets(filter: &str, verbose: bool, level: Level, enabled: bool) {
        let targets = log_targets(filter, verbose);
        assert_eq!(
            targets.would_enable("livereport_runner::connection", &level),
            enabled
        );
    }

    #[test]
    #[should_panic = "unable to parse LIVEREPORT_LOG"]
    fn bad_filter_panics() {
        log_targets("livereport=loud", false);
    }

    #[test]
    fn headings() {
        let styles = LogStyles::default();
        assert_eq!(styles.heading(Level::WARN).0, "warning");
        assert_eq!(styles.heading(Level::TRACE).0, "debug");
    }
}
