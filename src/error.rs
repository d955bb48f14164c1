//! Crate error type
//!
//! Only construction-time problems surface as errors. Gameplay values are
//! clamped, and storage problems are logged and dropped.

use std::fmt;

use crate::sim::layout::BodyRole;

/// Errors raised while setting up a session or loading configuration
#[derive(Debug)]
pub enum PinballError {
    /// The table layout has no body for a role the session needs
    MissingBody(BodyRole),
    /// The table layout has more than one body for a unique role
    DuplicateBody(BodyRole),
    /// Tuning JSON could not be parsed
    Tuning(serde_json::Error),
    /// Tuning file could not be read
    Io(std::io::Error),
}

impl fmt::Display for PinballError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PinballError::MissingBody(role) => {
                write!(f, "table layout has no {} body", role.name())
            }
            PinballError::DuplicateBody(role) => {
                write!(f, "table layout has more than one {} body", role.name())
            }
            PinballError::Tuning(e) => write!(f, "invalid tuning: {}", e),
            PinballError::Io(e) => write!(f, "cannot read tuning file: {}", e),
        }
    }
}

impl std::error::Error for PinballError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PinballError::Tuning(e) => Some(e),
            PinballError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for PinballError {
    fn from(e: serde_json::Error) -> Self {
        PinballError::Tuning(e)
    }
}

impl From<std::io::Error> for PinballError {
    fn from(e: std::io::Error) -> Self {
        PinballError::Io(e)
    }
}
