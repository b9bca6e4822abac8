//! Key/value sinks using the GitHub Actions file command format

use std::fs::{File, OpenOptions};
use std::io::{self, Stdout, Write};
use std::path::Path;

use crate::error::PublishError;

/// Destination for named values (step outputs or environment variables)
pub trait Sink {
    /// Write a single `name` / `value` entry
    fn write_entry(&mut self, name: &str, value: &str) -> Result<(), PublishError>;
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn write_entry(&mut self, name: &str, value: &str) -> Result<(), PublishError> {
        (**self).write_entry(name, value)
    }
}

/// Sink writing `name=value` lines, or `name<<DELIM` blocks for multi-line values
///
/// This is the format read back from `$GITHUB_OUTPUT` and `$GITHUB_ENV`.
pub struct FileCommandSink<W: Write> {
    writer: W,
    kind: &'static str,
    target: String,
}

impl FileCommandSink<File> {
    /// Append to the file at `path`, creating it if needed
    pub fn append(path: &Path, kind: &'static str) -> Result<Self, PublishError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| PublishError::Io {
                target: path.display().to_string(),
                source,
            })?;

        Ok(Self::new(file, kind, path.display().to_string()))
    }
}

impl FileCommandSink<Stdout> {
    pub fn stdout(kind: &'static str) -> Self {
        Self::new(io::stdout(), kind, "stdout".to_string())
    }
}

impl<W: Write> FileCommandSink<W> {
    /// `kind` names the entries in errors ("output", "environment variable")
    pub fn new(writer: W, kind: &'static str, target: String) -> Self {
        Self {
            writer,
            kind,
            target,
        }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn io_error(&self, source: io::Error) -> PublishError {
        PublishError::Io {
            target: self.target.clone(),
            source,
        }
    }
}

impl<W: Write> Sink for FileCommandSink<W> {
    fn write_entry(&mut self, name: &str, value: &str) -> Result<(), PublishError> {
        if name.trim().is_empty() || name.contains(['=', '\n', '\r']) || name.contains("<<") {
            return Err(PublishError::InvalidName {
                kind: self.kind,
                name: name.to_string(),
            });
        }

        let entry = format_entry(name, value);
        let result = self
            .writer
            .write_all(entry.as_bytes())
            .and_then(|()| self.writer.flush());

        result.map_err(|e| self.io_error(e))
    }
}

fn format_entry(name: &str, value: &str) -> String {
    if !value.contains(['\n', '\r']) {
        return format!("{name}={value}\n");
    }

    let mut delimiter = String::from("ghadelimiter");
    while value.split(['\n', '\r']).any(|line| line == delimiter) {
        delimiter.push('_');
    }

    format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
}

/// Render a workflow `::error::` command, escaping the message
pub fn error_command(message: &str) -> String {
    let escaped = message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A");
    format!("::error::{escaped}")
}
