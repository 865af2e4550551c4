use serde_json::Value;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::subscriber::DefaultGuard;

/// In-memory sink for JSON log lines emitted on the current thread.
///
/// Works with `#[tokio::test]`, whose runtime runs on the test thread.
///
/// ```
/// use test_utils::CapturedLogs;
///
/// let (logs, _guard) = CapturedLogs::install();
/// tracing::info!(user_id = 7, "Created user");
///
/// let event = logs.event("Created user").unwrap();
/// assert_eq!(event["fields"]["user_id"], 7);
/// ```
#[derive(Clone, Default)]
pub struct CapturedLogs {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    /// Routes this thread's events into a new buffer until the guard drops.
    pub fn install() -> (Self, DefaultGuard) {
        let logs = Self::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::TRACE)
            .with_writer(move || writer.clone())
            .finish();

        (logs, tracing::subscriber::set_default(subscriber))
    }

    /// Every captured line, parsed
    pub fn lines(&self) -> Vec<Value> {
        String::from_utf8_lossy(&self.lock())
            .lines()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    /// The first event whose message is `message`
    pub fn event(&self, message: &str) -> Option<Value> {
        self.lines()
            .into_iter()
            .find(|line| line["fields"]["message"] == message)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.buf.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captures_fields_and_span() {
        let (logs, _guard) = CapturedLogs::install();

        let span = tracing::info_span!("outer", request = "r-1");
        span.in_scope(|| tracing::warn!(attempt = 2, "Retrying"));

        let event = logs.event("Retrying").unwrap();
        assert_eq!(event["level"], "WARN");
        assert_eq!(event["fields"]["attempt"], 2);
        assert_eq!(event["span"]["name"], "outer");
        assert_eq!(event["span"]["request"], "r-1");
    }

    #[test]
    fn test_other_threads_are_not_captured() {
        let (logs, _guard) = CapturedLogs::install();

        std::thread::spawn(|| tracing::info!("elsewhere")).join().unwrap();

        assert!(logs.event("elsewhere").is_none());
    }
}
