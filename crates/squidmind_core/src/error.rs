//! Error types for the cognitive engine.
//!
//! Only genuine integration mistakes surface as errors. Missing optional
//! state, stale memory references and vanished targets degrade to defaults.

use thiserror::Error;

/// Errors returned by core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Lookup of a neuron name that was never registered.
    #[error("Unknown neuron: {0}")]
    UnknownNeuron(String),

    /// Attempt to register a neuron name that already exists.
    #[error("Duplicate neuron: {0}")]
    DuplicateNeuron(String),

    /// Attempt to remove a core neuron.
    #[error("Protected neuron cannot be removed: {0}")]
    ProtectedNeuron(String),

    /// Personality identifier missing or not recognized.
    #[error("Unknown personality: {0}")]
    UnknownPersonality(String),

    /// Explicit write of a non-finite number.
    #[error("Invalid value for {0}: not a finite number")]
    InvalidValue(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    #[must_use]
    pub fn unknown_neuron<S: Into<String>>(name: S) -> Self {
        Self::UnknownNeuron(name.into())
    }

    #[must_use]
    pub fn duplicate_neuron<S: Into<String>>(name: S) -> Self {
        Self::DuplicateNeuron(name.into())
    }

    #[must_use]
    pub fn protected_neuron<S: Into<String>>(name: S) -> Self {
        Self::ProtectedNeuron(name.into())
    }

    #[must_use]
    pub fn invalid_value<S: Into<String>>(name: S) -> Self {
        Self::InvalidValue(name.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::unknown_neuron("hunger2");
        assert_eq!(err.to_string(), "Unknown neuron: hunger2");
    }

    #[test]
    fn test_errors_are_distinguishable() {
        assert_ne!(
            CoreError::unknown_neuron("x"),
            CoreError::duplicate_neuron("x")
        );
        assert!(matches!(
            CoreError::protected_neuron("anxiety"),
            CoreError::ProtectedNeuron(ref n) if n == "anxiety"
        ));
    }

    #[test]
    fn test_invalid_value_display() {
        let err = CoreError::invalid_value("hunger");
        assert_eq!(err.to_string(), "Invalid value for hunger: not a finite number");
    }
}
