//! In-memory ring of formatted log lines for the terminal host.
//!
//! The host draws over the whole terminal, so tracing output cannot go to
//! stderr while it runs. Lines land here instead and the status area shows
//! the tail.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, OnceLock};

pub const DEFAULT_MAX_LINES: usize = 500;

static GLOBAL_LOG: OnceLock<LogBufferHandle> = OnceLock::new();

/// Installs the buffer the tracing writer delegates to. Only the first call
/// wins.
pub fn set_global_log_buffer(handle: LogBufferHandle) -> bool {
    GLOBAL_LOG.set(handle).is_ok()
}

pub fn global_log_buffer() -> Option<LogBufferHandle> {
    GLOBAL_LOG.get().cloned()
}

#[derive(Debug)]
struct LogLines {
    lines: VecDeque<String>,
    max_lines: usize,
}

impl LogLines {
    fn push_line(&mut self, line: String) {
        self.lines.push_back(line);
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }
}

#[derive(Clone, Debug)]
pub struct LogBufferHandle {
    inner: Arc<Mutex<LogLines>>,
}

impl Default for LogBufferHandle {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINES)
    }
}

impl LogBufferHandle {
    pub fn new(max_lines: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(LogLines {
                lines: VecDeque::new(),
                max_lines: max_lines.max(1),
            })),
        }
    }

    pub fn push(&self, line: impl Into<String>) {
        if let Ok(mut lines) = self.inner.lock() {
            lines.push_line(line.into());
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|l| l.lines.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The newest `count` lines, oldest first.
    pub fn tail(&self, count: usize) -> Vec<String> {
        let Ok(lines) = self.inner.lock() else {
            return Vec::new();
        };
        let skip = lines.lines.len().saturating_sub(count);
        lines.lines.iter().skip(skip).cloned().collect()
    }

    pub fn writer(&self) -> LogBufferWriter {
        LogBufferWriter {
            handle: self.clone(),
            pending: Vec::new(),
        }
    }
}

/// `io::Write` adapter that splits what it is given into lines.
#[derive(Debug)]
pub struct LogBufferWriter {
    handle: LogBufferHandle,
    pending: Vec<u8>,
}

impl LogBufferWriter {
    fn push_complete_lines(&mut self) {
        let Some(pos) = self.pending.iter().rposition(|b| *b == b'\n') else {
            return;
        };
        let drained: Vec<u8> = self.pending.drain(..=pos).collect();
        for line in String::from_utf8_lossy(&drained).split('\n') {
            if !line.is_empty() {
                self.handle.push(line.to_string());
            }
        }
    }
}

impl Write for LogBufferWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.push_complete_lines();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.push_complete_lines();
        if !self.pending.is_empty() {
            let rest = String::from_utf8_lossy(&self.pending).to_string();
            self.pending.clear();
            self.handle.push(rest);
        }
        Ok(())
    }
}

impl Drop for LogBufferWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
