//! # Status Bar
//!
//! Two-priority overlay for the bottom line:
//!
//! - **normal**: persistent text such as `Connected to #mchat as ana`
//! - **urgent**: a transient notice that preempts normal while active
//!
//! An active urgent message is dismissed by the next keystroke unless it was
//! raised with `no_dismiss`. Either buffer rejects updates longer than
//! [`MAX_STATUS_LEN`] characters and keeps its previous text.

use log::warn;

pub const MAX_STATUS_LEN: usize = 1024;

/// What the status line shows right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub text: String,
    /// Urgent text is drawn with emphasis
    pub emphasized: bool,
}

#[derive(Debug, Default)]
pub struct StatusBar {
    normal: String,
    urgent: String,
    urgent_active: bool,
    no_dismiss: bool,
}

impl StatusBar {
    pub fn new(normal: impl Into<String>) -> Self {
        Self {
            normal: normal.into(),
            ..Self::default()
        }
    }

    /// Replace the normal text. Returns `false` if the text was rejected.
    pub fn set_normal(&mut self, text: impl Into<String>) -> bool {
        let text = text.into();
        if !fits(&text) {
            return false;
        }
        self.normal = text;
        true
    }

    /// Replace the urgent text; with `show_now` it becomes visible immediately.
    /// Returns `false` if the text was rejected.
    pub fn set_urgent(&mut self, text: impl Into<String>, show_now: bool, no_dismiss: bool) -> bool {
        let text = text.into();
        if !fits(&text) {
            return false;
        }
        self.urgent = text;
        if show_now {
            self.urgent_active = true;
            self.no_dismiss = no_dismiss;
        }
        true
    }

    /// Shorthand for the common case: show now, dismiss on next key.
    pub fn notify(&mut self, text: impl Into<String>) -> bool {
        self.set_urgent(text, true, false)
    }

    pub fn unset_urgent(&mut self) {
        self.urgent_active = false;
        self.no_dismiss = false;
    }

    /// Called by the event loop for every keystroke.
    pub fn dismiss_on_keystroke(&mut self) {
        if self.urgent_active && !self.no_dismiss {
            self.unset_urgent();
        }
    }

    pub fn normal_text(&self) -> &str {
        &self.normal
    }

    pub fn urgent_text(&self) -> &str {
        &self.urgent
    }

    pub fn is_urgent(&self) -> bool {
        self.urgent_active
    }

    pub fn visible(&self) -> StatusLine {
        let (text, emphasized) = if self.urgent_active {
            (&self.urgent, true)
        } else {
            (&self.normal, false)
        };
        StatusLine {
            text: format!("Status: {text}"),
            emphasized,
        }
    }
}

fn fits(text: &str) -> bool {
    let len = text.chars().count();
    if len > MAX_STATUS_LEN {
        warn!("Rejected status update of {} chars (max {})", len, MAX_STATUS_LEN);
        return false;
    }
    true
}
