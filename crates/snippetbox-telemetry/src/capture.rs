//! In-memory log capture for tests.
//!
//! Installs a thread-local JSON subscriber whose output lands in a buffer,
//! so a test can assert on the exact records a code path emitted.
//!
//! ```rust
//! let (logs, _guard) = snippetbox_telemetry::capture::capture_logs();
//! tracing::error!(method = "GET", uri = "/", "boom");
//!
//! let records = logs.records();
//! assert_eq!(records[0]["method"], "GET");
//! assert_eq!(records[0]["level"], "ERROR");
//! ```

use parking_lot::Mutex;
use std::io;
use std::sync::Arc;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::layer::SubscriberExt;

/// Shared buffer receiving captured log lines.
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Returns everything captured so far.
    #[must_use]
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buf.lock()).into_owned()
    }

    /// Returns captured records parsed as JSON, skipping lines that are not.
    #[must_use]
    pub fn records(&self) -> Vec<serde_json::Value> {
        self.contents()
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    /// Returns `true` if nothing has been captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.lock().is_empty()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.lock().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Captures every event on the current thread until the guard drops.
#[must_use]
pub fn capture_logs() -> (LogCapture, DefaultGuard) {
    let capture = LogCapture::default();
    let writer = capture.clone();
    let layer = tracing_subscriber::fmt::layer()
        .json()
        .flatten_event(true)
        .with_writer(move || writer.clone());
    let subscriber = tracing_subscriber::registry().with(layer);
    (capture, tracing::subscriber::set_default(subscriber))
}
