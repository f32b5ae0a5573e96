//! Status subsystem errors
//!
//! Probing itself never fails; these cover setup only.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatusError {
    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// A strategy name in config or a request was not recognised
    #[error("Invalid probe strategy: {0}")]
    InvalidStrategy(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StatusError::InvalidStrategy("ping".to_string());
        assert_eq!(err.to_string(), "Invalid probe strategy: ping");
    }
}
