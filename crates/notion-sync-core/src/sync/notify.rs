use tracing::info;

/// Transient, non-blocking user notices.
pub trait Notifier: Send + Sync {
    /// Show a notice, replacing the one currently shown.
    fn show(&self, message: &str);

    /// Take down the current notice without showing a new one.
    fn dismiss(&self);
}

/// Notices as log lines, for headless use.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn show(&self, message: &str) {
        info!(notice = %message);
    }

    fn dismiss(&self) {}
}
