use tracing::info;

/// Surfaces notices to whoever is driving the session.
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// Writes notices to the log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn alert(&self, message: &str) {
        info!("🔔 {message}");
    }
}
