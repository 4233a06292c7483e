use std::{error::Error, fmt};

use super::{ERErrKind, ERError};

impl ERError {
    pub fn new(msg: &str) -> ERError {
        ERError {
            detail: Some(msg.to_string()),
            ..Default::default()
        }
    }

    pub fn new_with_kind(msg: &str, kind: ERErrKind) -> ERError {
        ERError {
            detail: Some(msg.to_string()),
            kind,
            ..Default::default()
        }
    }

    pub fn from(err: Box<dyn Error>) -> ERError {
        let mut result = ERError {
            detail: Some("".to_string()),
            ..Default::default()
        };
        result.err = Some(err);
        result
    }

    pub fn kind(&self) -> ERErrKind {
        self.kind
    }
}

impl fmt::Display for ERError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(detail) = &self.detail {
            if !detail.is_empty() {
                return write!(f, "{}: {}", self.kind, detail);
            }
        }

        if let Some(err) = &self.err {
            return write!(f, "{}: {:?}", self.kind, err);
        }

        write!(f, "{}: Nothing", self.kind)
    }
}

impl Error for ERError {}
