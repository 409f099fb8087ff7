//! Append-only progress log sinks.
//!
//! The progress log is product output: container stdout/stderr and goal
//! status lines the host shows next to a goal. It is separate from the
//! `tracing` diagnostics configured in [`crate::logging`].

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::warn;

/// Sink the executor streams container output into.
///
/// Writers may be called from several threads at once (stdout and stderr
/// are forwarded concurrently), so implementations serialize internally.
/// Writes never fail from the caller's point of view.
pub trait ProgressLog: Send + Sync {
    fn write(&self, text: &str);
}

/// Progress log backed by any [`Write`] implementation.
pub struct WriterLog<W: Write + Send> {
    inner: Mutex<W>,
}

impl<W: Write + Send> WriterLog<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: Mutex::new(writer),
        }
    }
}

impl WriterLog<File> {
    /// Open `path` for appending, creating it (and parent dirs) if needed.
    pub fn append_to(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create log dir {}", parent.display()))?;
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("open progress log {}", path.display()))?;
        Ok(Self::new(file))
    }
}

impl<W: Write + Send> ProgressLog for WriterLog<W> {
    fn write(&self, text: &str) {
        let Ok(mut writer) = self.inner.lock() else {
            warn!("progress log lock poisoned, dropping write");
            return;
        };
        // Flush per write so output shows up while the container is running.
        if let Err(e) = writer.write_all(text.as_bytes()) {
            warn!(err = %e, "failed to write progress log");
        } else if let Err(e) = writer.flush() {
            warn!(err = %e, "failed to flush progress log");
        }
    }
}

/// In-memory progress log, for hosts that collect output before storing it.
#[derive(Debug, Default)]
pub struct MemoryLog {
    buf: Mutex<String>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far.
    pub fn contents(&self) -> String {
        match self.buf.lock() {
            Ok(buf) => buf.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl ProgressLog for MemoryLog {
    fn write(&self, text: &str) {
        match self.buf.lock() {
            Ok(mut buf) => buf.push_str(text),
            Err(poisoned) => poisoned.into_inner().push_str(text),
        }
    }
}

/// Write `text` followed by a newline unless it already ends with one.
pub fn write_line(log: &dyn ProgressLog, text: &str) {
    if text.ends_with('\n') {
        log.write(text);
    } else {
        log.write(&format!("{text}\n"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_log_appends() {
        let log = MemoryLog::new();
        log.write("a");
        write_line(&log, "b");
        write_line(&log, "c\n");
        assert_eq!(log.contents(), "ab\nc\n");
    }

    #[test]
    fn file_log_appends_across_opens() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("logs").join("progress.log");

        WriterLog::append_to(&path).expect("open").write("first\n");
        WriterLog::append_to(&path).expect("reopen").write("second\n");

        let contents = std::fs::read_to_string(&path).expect("read");
        assert_eq!(contents, "first\nsecond\n");
    }
}
