//! User notifications (toasts/alerts)

use std::cell::RefCell;
use std::rc::Rc;

use tracing::info;

/// Shows a short message to the user
pub trait Notifier {
    fn notify(&mut self, message: &str);
}

/// Writes notifications to the log
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, message: &str) {
        info!(target: "notifier", "{message}");
    }
}

/// Keeps every message, readable through a shared handle
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    messages: Rc<RefCell<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, message: &str) {
        self.messages.borrow_mut().push(message.to_owned());
    }
}
