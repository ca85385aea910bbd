//! One-shot user-facing notices returned alongside a payload.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub level: Level,
    pub message: String,
}

impl Message {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: Level::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }
}

/// A payload paired with the notice the client should display.
#[derive(Debug, Serialize)]
pub struct WithMessage<T: Serialize> {
    #[serde(flatten)]
    pub message: Message,
    pub data: T,
}

impl<T: Serialize> WithMessage<T> {
    pub fn success(message: impl Into<String>, data: T) -> Self {
        Self {
            message: Message::success(message),
            data,
        }
    }

    pub fn warning(message: impl Into<String>, data: T) -> Self {
        Self {
            message: Message::warning(message),
            data,
        }
    }
}
