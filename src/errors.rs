use crate::location::Location;
use std::fmt;
use thiserror::Error;

/// A single syntax error together with the position it was recorded at.
///
/// Errors are non-fatal: the tokenizer and parser record them and keep
/// going, so a caller always gets whatever partial output could be built.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct SyntaxError {
    pub message: String,
    pub location: Location,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, location: Location) -> SyntaxError {
        SyntaxError {
            message: message.into(),
            location,
        }
    }
}

/// An append-only list of syntax errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorList(Vec<SyntaxError>);

impl ErrorList {
    pub fn new() -> ErrorList {
        ErrorList(Vec::new())
    }

    pub fn push(&mut self, error: SyntaxError) {
        self.0.push(error);
    }

    /// Appends all errors of `other`, preserving order.
    pub fn extend(&mut self, other: ErrorList) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn first(&self) -> Option<&SyntaxError> {
        self.0.first()
    }

    pub fn get(&self, index: usize) -> Option<&SyntaxError> {
        self.0.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SyntaxError> {
        self.0.iter()
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.len() {
            0 => write!(f, "no errors"),
            1 => write!(f, "{}", self.0[0]),
            n => write!(f, "{} (and {} more errors)", self.0[0], n - 1),
        }
    }
}

impl std::error::Error for ErrorList {}
