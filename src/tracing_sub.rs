use std::io::{self, Write};

use tracing::Level;

use crate::log_buffer::{LogBufferHandle, LogBufferWriter, global_log_buffer};

/// Where one formatted event goes.
pub enum LogSink {
    Buffer(LogBufferWriter),
    Stderr(io::Stderr),
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            LogSink::Buffer(w) => w.write(buf),
            LogSink::Stderr(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            LogSink::Buffer(w) => w.flush(),
            LogSink::Stderr(s) => s.flush(),
        }
    }
}

/// Chooses a sink per event: the pinned buffer if any, then the global log
/// buffer, then stderr. The global lookup is per event so a buffer installed
/// after the subscriber still gets everything from then on.
#[derive(Clone, Debug, Default)]
pub struct SubscriberMakeWriter {
    pinned: Option<LogBufferHandle>,
}

impl SubscriberMakeWriter {
    pub fn to_buffer(handle: LogBufferHandle) -> Self {
        Self {
            pinned: Some(handle),
        }
    }
}

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for SubscriberMakeWriter {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        match self.pinned.clone().or_else(global_log_buffer) {
            Some(handle) => LogSink::Buffer(handle.writer()),
            None => LogSink::Stderr(io::stderr()),
        }
    }
}

/// Compact, uncolored, untimed lines: the log pane is a few rows tall.
pub fn subscriber(
    level: Level,
    writer: SubscriberMakeWriter,
) -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(writer)
        .with_target(false)
        .with_thread_names(false)
        .without_time()
        .with_ansi(false)
        .finish()
}

pub fn init_default() {
    init_with_level(Level::DEBUG);
}

/// Later calls are no-ops; the first subscriber stays installed.
pub fn init_with_level(level: Level) {
    let _ = tracing::subscriber::set_global_default(subscriber(
        level,
        SubscriberMakeWriter::default(),
    ));
}
