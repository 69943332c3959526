use notion_sync_core::Notifier;
use std::sync::{Mutex, MutexGuard};
use tracing::info;

/// The notice currently shown to the user.
///
/// A new notice replaces the previous one; notices never block.
#[derive(Debug, Default)]
pub struct NoticeBoard {
    current: Mutex<Option<String>>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<String> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Option<String>> {
        self.current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Notifier for NoticeBoard {
    fn show(&self, message: &str) {
        info!(notice = %message);
        *self.lock() = Some(message.to_string());
    }

    fn dismiss(&self) {
        *self.lock() = None;
    }
}
