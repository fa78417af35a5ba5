use thiserror::Error as ThisError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Two keys disagree about the shape of a slot (strict mode only).
    Conflict,
    Decode,
    Encode,
    Deserialize,
}

#[derive(Debug, Clone, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub message: String,
    /// The input key being processed when the error was raised.
    pub key: Option<String>,
}

impl Error {
    pub fn conflict(key: impl Into<String>, message: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            kind: ErrorKind::Conflict,
            message: format!("path conflict at `{key}`: {}", message.into()),
            key: Some(key),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Decode,
            message: message.into(),
            key: None,
        }
    }

    pub fn encode(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Encode,
            message: message.into(),
            key: None,
        }
    }

    pub fn deserialize(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Deserialize,
            message: message.into(),
            key: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}
