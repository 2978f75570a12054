//! Domain error types.
//!
//! These errors represent validation failures in the domain layer. They are
//! distinct from cache and API errors.

/// Domain-level errors for validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Vehicle type name is neither "train" nor "bus"
    #[error("invalid vehicle type \"{0}\"")]
    InvalidVehicleType(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DomainError::InvalidVehicleType("tram".into());
        assert_eq!(err.to_string(), "invalid vehicle type \"tram\"");
    }
}
