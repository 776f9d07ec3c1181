use thiserror::Error;

use crate::domain::order::OrderStatus;
use crate::domain::quote::QuoteStatus;
use crate::domain::rfq::RfqStatus;

/// Failures raised synchronously by the pure lifecycle and pricing logic.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid rfq transition from {from:?} to {to:?}")]
    InvalidRfqTransition { from: RfqStatus, to: RfqStatus },
    #[error("invalid quote transition from {from:?} to {to:?}: {reason}")]
    InvalidQuoteTransition { from: QuoteStatus, to: QuoteStatus, reason: String },
    #[error("invalid order transition from {from:?} to {to:?}")]
    InvalidOrderTransition { from: OrderStatus, to: OrderStatus },
    #[error("validation failed: {0}")]
    Validation(String),
}

/// Failures surfaced by workflow operations that cross the persistence
/// boundary. `Gateway` failures are always retryable; everything else is a
/// business-rule rejection the caller must not retry verbatim.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum WorkflowError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("{entity} {id} references missing {missing_entity} {missing_id}")]
    DanglingReference {
        entity: &'static str,
        id: String,
        missing_entity: &'static str,
        missing_id: String,
    },
    #[error("persistence gateway failure: {0}")]
    Gateway(String),
}

impl WorkflowError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound { entity, id: id.into() }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Gateway(_))
    }

    /// Human-readable reason shown to the acting user in place of the raw
    /// error. Never exposes internal identifiers or stack detail.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Domain(DomainError::Validation(_)) => {
                "The submitted data failed validation. Check inputs and try again."
            }
            Self::Domain(_) => "That action is not allowed in the record's current state.",
            Self::NotFound { .. } => "The requested record could not be found.",
            Self::DanglingReference { .. } => {
                "A linked record is missing. The platform team has been notified."
            }
            Self::Gateway(_) => "The data store is temporarily unavailable. Please retry shortly.",
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::quote::QuoteStatus;
    use crate::errors::{DomainError, WorkflowError};

    #[test]
    fn domain_errors_surface_as_rejected_actions() {
        let error = WorkflowError::from(DomainError::InvalidQuoteTransition {
            from: QuoteStatus::Accepted,
            to: QuoteStatus::SentToClient,
            reason: "transition not permitted".to_string(),
        });

        assert!(!error.is_retryable());
        assert_eq!(error.user_message(), "That action is not allowed in the record's current state.");
    }

    #[test]
    fn validation_errors_get_their_own_message() {
        let error = WorkflowError::from(DomainError::Validation("empty items".to_string()));
        assert_eq!(
            error.user_message(),
            "The submitted data failed validation. Check inputs and try again."
        );
    }

    #[test]
    fn gateway_errors_are_retryable() {
        let error = WorkflowError::Gateway("connection reset".to_string());
        assert!(error.is_retryable());
        assert_eq!(
            error.user_message(),
            "The data store is temporarily unavailable. Please retry shortly."
        );
    }

    #[test]
    fn not_found_constructor_captures_entity_and_id() {
        let error = WorkflowError::not_found("quote", "Q-404");
        assert_eq!(error.to_string(), "quote not found: Q-404");
    }
}
