//! Error types for the OceanQA core.

use thiserror::Error;

/// Errors raised when data falls outside the fixed scene catalog.
///
/// These indicate a caller bug or corrupt input and are never retried.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Object class is not one of octopus, fish, bag, rock
    #[error("Unknown object type: {0}")]
    UnknownObjectType(String),

    /// Property name is not part of the object model
    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    /// Property value (colour, rotation) is not part of the catalog
    #[error("Unknown property value: {0}")]
    UnknownPropertyValue(String),

    /// Event label could not be parsed
    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    /// All grid cells of a frame are already claimed
    #[error("No free placement cell left ({0} cells in total)")]
    PlacementExhausted(usize),

    /// Scene configuration is inconsistent
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl CoreError {
    /// Creates an unknown-property-value error.
    pub fn value(value: impl std::fmt::Display) -> Self {
        Self::UnknownPropertyValue(value.to_string())
    }

    /// Creates an invalid-configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
