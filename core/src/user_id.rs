use std::fmt;

use rkyv::{Archive, Deserialize, Serialize};

pub const USER_ID_MAX_LEN: usize = 32;

fn is_user_id_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-' | '.')
}

pub fn is_valid_user_id(value: &str) -> bool {
    UserId::parse(value).is_ok()
}

/// Journal owner. Lookups are exact; "Ada" and "ada" are different users.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    pub fn parse(value: &str) -> Result<Self, UserIdError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(UserIdError::Empty);
        }
        let len = trimmed.chars().count();
        if len > USER_ID_MAX_LEN {
            return Err(UserIdError::TooLong {
                max: USER_ID_MAX_LEN,
                found: len,
            });
        }
        for (idx, ch) in trimmed.chars().enumerate() {
            if !is_user_id_char(ch) {
                return Err(UserIdError::InvalidCharacter { ch, index: idx });
            }
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for UserId {
    type Err = UserIdError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIdError {
    Empty,
    TooLong { max: usize, found: usize },
    InvalidCharacter { ch: char, index: usize },
}

impl fmt::Display for UserIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserIdError::Empty => write!(f, "user id cannot be empty"),
            UserIdError::TooLong { max, found } => {
                write!(f, "user id must be at most {max} chars, got {found}")
            }
            UserIdError::InvalidCharacter { ch, index } => {
                write!(f, "invalid character '{ch}' at position {index}")
            }
        }
    }
}

impl std::error::Error for UserIdError {}
