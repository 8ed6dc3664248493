//! Process-wide logging for hosts embedding the authentication layer.
//!
//! Everything is funnelled into a single `tracing` subscriber. Library code in
//! `impostor-auth` mixes `log::*` macros with `tracing` spans, so the `log`
//! facade is bridged with `tracing_log::LogTracer` and both end up in the same
//! file and console outputs.

use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::str::FromStr;

use impostor_configs::LoggingSettings;
use tracing::Subscriber;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer};

/// Output format of the log file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Single-line human readable records
    Compact,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compact" | "text" => Ok(LogFormat::Compact),
            "json" | "jsonl" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Combine the base level with per-target overrides into one filter.
///
/// Targets are emitted in sorted order so the resulting directive string is
/// stable regardless of map iteration order.
fn env_filter(settings: &LoggingSettings) -> anyhow::Result<EnvFilter> {
    let overrides: BTreeMap<_, _> = settings.targets.iter().collect();
    let directives = std::iter::once(settings.level.clone())
        .chain(overrides.into_iter().map(|(target, lvl)| format!("{}={}", target, lvl)))
        .collect::<Vec<_>>()
        .join(",");

    EnvFilter::try_new(&directives)
        .map_err(|e| anyhow::anyhow!("Invalid log filter '{}': {}", directives, e))
}

fn file_layer<S>(
    format: LogFormat,
    file: File,
    filter: EnvFilter,
) -> Box<dyn Layer<S> + Send + Sync + 'static>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let base = tracing_subscriber::fmt::layer()
        .with_writer(file)
        .with_target(true)
        .with_thread_names(true)
        .with_span_events(FmtSpan::CLOSE);

    match format {
        LogFormat::Json => base.json().with_span_list(true).with_filter(filter).boxed(),
        LogFormat::Compact => base.with_ansi(false).with_filter(filter).boxed(),
    }
}

/// Install the global subscriber described by `settings`.
///
/// Fails if the log directory cannot be created, the filter does not parse or
/// a global subscriber is already installed.
pub fn init_logging(settings: &LoggingSettings) -> anyhow::Result<()> {
    let format: LogFormat = settings.format.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let file_path = settings.file_path();

    if let Some(dir) = Path::new(&file_path).parent() {
        fs::create_dir_all(dir)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(&file_path)?;

    // Another component may already have claimed the `log` facade
    let _ = tracing_log::LogTracer::init();

    let console = if settings.log_to_console {
        let layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter(settings)?);
        Some(layer)
    } else {
        None
    };

    let subscriber = tracing_subscriber::registry()
        .with(console)
        .with(file_layer(format, file, env_filter(settings)?));

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    tracing::debug!(
        level = %settings.level,
        console = settings.log_to_console,
        file = %file_path,
        "logging initialized"
    );

    Ok(())
}
