//! Error types shared across the engine

use crate::store::StoreError;

/// Errors reported by the registry, the award engine and the player facade
#[derive(Debug, thiserror::Error)]
pub enum ConquestError {
    /// Invalid definitions or a missing level ladder
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A maneuver key that was never registered
    #[error("Unknown maneuver ('{0}')")]
    UnknownManeuver(String),

    /// Failure reported by the history store, passed through unchanged
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ConquestError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

pub type Result<T, E = ConquestError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_key() {
        let err = ConquestError::UnknownManeuver("Unknown".to_string());
        assert_eq!(err.to_string(), "Unknown maneuver ('Unknown')");

        let err = ConquestError::config("Must have at least one condition");
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn store_errors_convert() {
        let err: ConquestError = StoreError::Poisoned.into();
        assert!(matches!(err, ConquestError::Store(StoreError::Poisoned)));
    }
}
