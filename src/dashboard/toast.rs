//! Toast notifications
//!
//! Transient messages the controller raises for the front end to show.

use owo_colors::{OwoColorize, Style};

/// A toast notification message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// The message to display
    pub message: String,
    /// The severity level of the toast
    pub level: ToastLevel,
}

/// Severity level for toast notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Error,
    Success,
}

impl Toast {
    /// Create a new toast with the given message and level
    pub fn new(message: String, level: ToastLevel) -> Self {
        Self { message, level }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Error)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message.into(), ToastLevel::Success)
    }

    pub fn is_error(&self) -> bool {
        self.level == ToastLevel::Error
    }

    /// Terminal style for this toast's level
    pub fn style(&self) -> Style {
        match self.level {
            ToastLevel::Error => Style::new().red().bold(),
            ToastLevel::Success => Style::new().green(),
        }
    }

    /// One-line rendering for the terminal
    pub fn render(&self) -> String {
        self.message.style(self.style()).to_string()
    }
}
