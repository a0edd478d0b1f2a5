//! User-facing notifications and single-choice prompts.

use crate::extension::lifecycle::Disposable;
use crate::extension::registry::Service;
use crate::host::{MessageSurface, Severity};
use log::debug;
use std::rc::Rc;

/// Thin front for the host notification surface.
pub struct MessageService {
    surface: Rc<dyn MessageSurface>,
}

impl MessageService {
    pub fn new(surface: Rc<dyn MessageSurface>) -> Self {
        Self { surface }
    }

    pub fn show_info(&self, message: &str) {
        self.surface.notify(Severity::Info, message);
    }

    pub fn show_warning(&self, message: &str) {
        self.surface.notify(Severity::Warning, message);
    }

    pub fn show_error(&self, message: &str) {
        self.surface.notify(Severity::Error, message);
    }

    /// Asks the user to pick one of `options`.
    ///
    /// Dismissal resolves to `None`; it is not an error.
    pub fn ask_user(&self, question: &str, options: &[&str]) -> Option<String> {
        let items: Vec<String> = options.iter().map(|option| (*option).to_string()).collect();
        let answer = self.surface.pick_one(question, &items);
        debug!(
            "event=ask_user module=service status={} options={}",
            if answer.is_some() { "picked" } else { "dismissed" },
            items.len()
        );
        answer
    }
}

impl Service for MessageService {
    fn as_disposable(self: Rc<Self>) -> Option<Rc<dyn Disposable>> {
        Some(self)
    }
}

impl Disposable for MessageService {
    fn dispose(&self) {
        debug!("event=message_dispose module=service status=ok");
    }
}
