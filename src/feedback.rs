//! User-facing notices.
//!
//! Success notices are transient and expire after [`NOTICE_TTL`]. Errors are
//! blocking: they stay until dismissed.

use std::time::{Duration, Instant};

pub const NOTICE_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// `None` for notices that need an explicit dismissal.
    pub expires_at: Option<Instant>,
}

impl Notice {
    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }
}

#[derive(Debug, Default)]
pub struct Feedback {
    success: Option<Notice>,
    error: Option<Notice>,
}

impl Feedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self, message: impl Into<String>, now: Instant) {
        self.success = Some(Notice {
            level: NoticeLevel::Success,
            message: message.into(),
            expires_at: Some(now + NOTICE_TTL),
        });
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.error = Some(Notice {
            level: NoticeLevel::Error,
            message: message.into(),
            expires_at: None,
        });
    }

    /// Drops the success notice once it has expired.
    pub fn tick(&mut self, now: Instant) {
        if self.success.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.success = None;
        }
    }

    pub fn active_success(&self, now: Instant) -> Option<&str> {
        self.success
            .as_ref()
            .filter(|n| !n.is_expired(now))
            .map(|n| n.message.as_str())
    }

    pub fn blocking_error(&self) -> Option<&str> {
        self.error.as_ref().map(|n| n.message.as_str())
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }
}
