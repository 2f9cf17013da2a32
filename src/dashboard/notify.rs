//! User-facing notifications and confirmations

use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Warning,
    Error,
}

/// A blocking message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Where notices go and where confirmations come from
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);

    /// Ask the user to confirm a destructive action
    fn confirm(&self, prompt: &str) -> bool;
}

/// Keeps every notice in memory and answers confirmations with a fixed value
#[derive(Debug)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
    prompts: Mutex<Vec<String>>,
    answer: bool,
}

impl RecordingNotifier {
    pub fn new(answer: bool) -> Self {
        Self {
            notices: Mutex::new(Vec::new()),
            prompts: Mutex::new(Vec::new()),
            answer,
        }
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().map(|n| n.clone()).unwrap_or_default()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Notice> {
        self.notices().pop()
    }
}

impl Default for RecordingNotifier {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }

    fn confirm(&self, prompt: &str) -> bool {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        self.answer
    }
}
