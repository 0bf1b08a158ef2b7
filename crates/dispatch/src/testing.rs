//! Log capture for unit tests.

use std::io;
use std::sync::{Arc, Mutex};

/// Shared in-memory sink for a fmt subscriber.
#[derive(Clone, Default)]
pub(crate) struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub(crate) fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` under a subscriber writing into `buffer`.
pub(crate) fn with_log_buffer<R>(buffer: &LogBuffer, f: impl FnOnce() -> R) -> R {
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .finish();
    tracing::subscriber::with_default(subscriber, f)
}

/// Runs `f` and returns everything it logged.
pub(crate) fn capture_logs(f: impl FnOnce()) -> String {
    let buffer = LogBuffer::default();
    with_log_buffer(&buffer, f);
    buffer.contents()
}
