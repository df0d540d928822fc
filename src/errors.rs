use reqwest::StatusCode;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingElement,
    WrongElement,
    Transport,
    Status,
    Decode,
    InvalidEvent,
    Io,
}

#[derive(Debug)]
pub struct PageError {
    pub kind: ErrorKind,
    pub message: String,
}

impl PageError {
    pub fn missing_element(id: &str) -> Self {
        Self {
            kind: ErrorKind::MissingElement,
            message: format!("no element with id '{id}'"),
        }
    }

    pub fn wrong_element(id: &str, expected: &str) -> Self {
        Self {
            kind: ErrorKind::WrongElement,
            message: format!("element '{id}' is not a {expected}"),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Transport,
            message: message.into(),
        }
    }

    pub fn status(path: &str, status: StatusCode) -> Self {
        Self {
            kind: ErrorKind::Status,
            message: format!("{path} answered {status}"),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Decode,
            message: message.into(),
        }
    }

    pub fn invalid_event(spec: &str) -> Self {
        Self {
            kind: ErrorKind::InvalidEvent,
            message: format!("cannot parse event '{spec}'"),
        }
    }
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for PageError {}

impl From<std::io::Error> for PageError {
    fn from(err: std::io::Error) -> Self {
        Self {
            kind: ErrorKind::Io,
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for PageError {
    fn from(err: reqwest::Error) -> Self {
        Self::transport(err.to_string())
    }
}

impl From<serde_json::Error> for PageError {
    fn from(err: serde_json::Error) -> Self {
        Self::decode(err.to_string())
    }
}
