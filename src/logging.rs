use std::path::Path;

use anyhow::{Context, anyhow};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};

use semver_match::cli::LogFormat;

/// Default filter when RUST_LOG is unset
const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber. Logs go to stderr so stdout stays free for
/// workflow commands; with `log_file` they are mirrored to that file.
///
/// The returned guard must be held until exit to flush the file writer.
pub fn init(format: LogFormat, log_file: Option<&Path>) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let (writer, guard) = match log_file {
        Some(path) => {
            let directory = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .with_context(|| format!("log file path {} has no file name", path.display()))?;
            std::fs::create_dir_all(directory)
                .with_context(|| format!("failed to create log directory {}", directory.display()))?;

            let appender = tracing_appender::rolling::never(directory, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            (
                BoxMakeWriter::new(std::io::stderr.and(non_blocking)),
                Some(guard),
            )
        }
        None => (BoxMakeWriter::new(std::io::stderr), None),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(false);

    let result = match format {
        LogFormat::Text => builder.with_ansi(log_file.is_none()).try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|e| anyhow!("failed to initialize logging: {e}"))?;

    Ok(guard)
}
