use std::{error::Error, fmt::Display};

pub mod error;
pub mod file;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ERErrKind {
    None,
    TooSmall,
    BadMagic,
    UnsupportedClass,
    OutOfBounds,
    SectionTableOutOfBounds,
    NoStringTable,
    NameOffsetOutOfBounds,
    UnterminatedString,
}

impl Default for ERErrKind {
    fn default() -> Self {
        Self::None
    }
}

impl Display for ERErrKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::TooSmall => write!(f, "TooSmall"),
            Self::BadMagic => write!(f, "BadMagic"),
            Self::UnsupportedClass => write!(f, "UnsupportedClass"),
            Self::OutOfBounds => write!(f, "OutOfBounds"),
            Self::SectionTableOutOfBounds => write!(f, "SectionTableOutOfBounds"),
            Self::NoStringTable => write!(f, "NoStringTable"),
            Self::NameOffsetOutOfBounds => write!(f, "NameOffsetOutOfBounds"),
            Self::UnterminatedString => write!(f, "UnterminatedString"),
        }
    }
}

#[derive(Debug, Default)]
pub struct ERError {
    detail  : Option<String>,
    err     : Option<Box<dyn Error>>,
    kind    : ERErrKind
}
