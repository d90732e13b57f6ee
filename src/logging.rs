//! Logging setup
//!
//! Diagnostics go to stderr as `[LEVEL]  message` lines so that stdout stays
//! clean for `eval "$(tfconfig dotenv dev --export)"`.

use std::fmt;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    filter::Directive,
    fmt::{format::DefaultFields, format::Writer, FmtContext, FormatEvent, FormatFields, MakeWriter},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Targets whose output is controlled by `--aws-debug`
const AWS_TARGETS: &[&str] = &["aws_config", "aws_sdk_ssm", "aws_smithy_runtime", "aws_smithy_runtime_api"];

/// Logging options resolved from flags and settings
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    pub level: String,
    pub aws_debug: bool,
}

/// Event formatter printing `[LEVEL]  message key=value`
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelPrefixFormat;

impl<S, N> FormatEvent<S, N> for LevelPrefixFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(writer, "[{}]  ", level_label(event.metadata().level()))?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn level_label(level: &Level) -> &'static str {
    match *level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARNING",
        Level::INFO => "INFO",
        Level::DEBUG => "DEBUG",
        Level::TRACE => "TRACE",
    }
}

/// Build the filter: `RUST_LOG` wins, otherwise `level`; AWS targets are kept
/// at `warn` unless `aws_debug` is set.
pub fn build_filter(options: &LoggingOptions) -> anyhow::Result<EnvFilter> {
    let mut filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&options.level));

    let aws_level = if options.aws_debug { "debug" } else { "warn" };
    for target in AWS_TARGETS {
        let directive: Directive = format!("{target}={aws_level}").parse()?;
        filter = filter.add_directive(directive);
    }

    Ok(filter)
}

/// Plain-text `[LEVEL]` layer writing to `writer`, never colored
pub fn format_layer<S, W>(writer: W) -> tracing_subscriber::fmt::Layer<S, DefaultFields, LevelPrefixFormat, W>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    W: for<'w> MakeWriter<'w> + 'static,
{
    tracing_subscriber::fmt::layer()
        .event_format(LevelPrefixFormat)
        .with_ansi(false)
        .with_writer(writer)
}

/// Initialize the global tracing subscriber
pub fn init_tracing(options: &LoggingOptions) -> anyhow::Result<()> {
    let filter = build_filter(options)?;

    let stderr_layer = format_layer(std::io::stderr).with_filter(filter);

    tracing_subscriber::registry().with(stderr_layer).try_init()?;

    Ok(())
}

#[cfg(test)]
pub(crate) use capture::capture_logs;
