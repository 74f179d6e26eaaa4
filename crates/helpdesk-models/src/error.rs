//! Error types for the `helpdesk-models` crate.
//!
//! All fallible constructors and `FromStr` implementations in this crate
//! return variants of [`ModelError`].

/// Errors produced when constructing or validating model types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// A ticket identifier was not a positive integer.
    #[error("invalid ticket id \"{value}\": {reason}")]
    InvalidTicketId {
        /// The value that failed validation.
        value: String,
        /// Human-readable explanation.
        reason: String,
    },

    /// An email address was blank or structurally unusable as a lookup key.
    #[error("invalid email address \"{value}\": {reason}")]
    InvalidEmail {
        /// The value that failed validation.
        value: String,
        /// Human-readable explanation.
        reason: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_ticket_id() {
        let err = ModelError::InvalidTicketId {
            value: "abc".into(),
            reason: "must be a positive integer".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid ticket id \"abc\": must be a positive integer"
        );
    }

    #[test]
    fn error_display_email() {
        let err = ModelError::InvalidEmail {
            value: " ".into(),
            reason: "must not be blank".into(),
        };
        assert_eq!(err.to_string(), "invalid email address \" \": must not be blank");
    }
}
