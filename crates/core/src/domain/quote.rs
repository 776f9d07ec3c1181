use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::rfq::RfqId;
use crate::domain::user::UserId;
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuoteId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteStatus {
    PendingAdmin,
    SentToClient,
    Accepted,
    Rejected,
}

/// How the platform markup for this quote is determined. A manual entry pins
/// an admin-chosen percent to this quote; an inherited one defers to the
/// category/global schedule at resolution time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarginAssignment {
    Manual { percent: Decimal },
    #[default]
    Inherited,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub rfq_id: RfqId,
    pub supplier_id: UserId,
    pub supplier_price: Decimal,
    pub margin: MarginAssignment,
    /// Derived client-facing price. Written whenever the margin is
    /// (re)assigned and at send time; never edited independently.
    pub final_price: Option<Decimal>,
    pub status: QuoteStatus,
    pub created_at: DateTime<Utc>,
}

impl Quote {
    /// Builds a supplier-submitted quote awaiting admin pricing.
    pub fn draft(
        id: QuoteId,
        rfq_id: RfqId,
        supplier_id: UserId,
        supplier_price: Decimal,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if supplier_price < Decimal::ZERO {
            return Err(DomainError::Validation(format!(
                "supplier price must not be negative (got {supplier_price})"
            )));
        }

        Ok(Self {
            id,
            rfq_id,
            supplier_id,
            supplier_price,
            margin: MarginAssignment::Inherited,
            final_price: None,
            status: QuoteStatus::PendingAdmin,
            created_at,
        })
    }

    pub fn can_transition_to(&self, next: QuoteStatus) -> bool {
        matches!(
            (&self.status, next),
            (QuoteStatus::PendingAdmin, QuoteStatus::SentToClient)
                | (QuoteStatus::SentToClient, QuoteStatus::Accepted)
                | (QuoteStatus::SentToClient, QuoteStatus::Rejected)
        )
    }

    pub fn transition_to(&mut self, next: QuoteStatus) -> Result<(), DomainError> {
        if self.can_transition_to(next.clone()) {
            self.status = next;
            return Ok(());
        }

        Err(DomainError::InvalidQuoteTransition {
            from: self.status.clone(),
            to: next,
            reason: "transition not permitted".to_string(),
        })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.status, QuoteStatus::Accepted | QuoteStatus::Rejected)
    }

    /// Gate for the admin "send" action: the quote needs a real cost basis
    /// before a client-facing price can be derived from it.
    pub fn ensure_sendable(&self) -> Result<(), DomainError> {
        if self.status != QuoteStatus::PendingAdmin {
            return Err(DomainError::InvalidQuoteTransition {
                from: self.status.clone(),
                to: QuoteStatus::SentToClient,
                reason: "transition not permitted".to_string(),
            });
        }
        if self.supplier_price <= Decimal::ZERO {
            return Err(DomainError::InvalidQuoteTransition {
                from: self.status.clone(),
                to: QuoteStatus::SentToClient,
                reason: "supplier price must be positive before sending".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use crate::domain::rfq::RfqId;
    use crate::domain::user::UserId;
    use crate::errors::DomainError;

    use super::{MarginAssignment, Quote, QuoteId, QuoteStatus};

    fn quote(status: QuoteStatus) -> Quote {
        let mut quote = Quote::draft(
            QuoteId("Q-1".to_string()),
            RfqId("RFQ-1".to_string()),
            UserId("S-1".to_string()),
            Decimal::new(100_000, 2),
            Utc::now(),
        )
        .expect("valid quote");
        quote.status = status;
        quote
    }

    #[test]
    fn drafted_quote_awaits_admin_with_inherited_margin() {
        let quote = quote(QuoteStatus::PendingAdmin);
        assert_eq!(quote.status, QuoteStatus::PendingAdmin);
        assert_eq!(quote.margin, MarginAssignment::Inherited);
        assert_eq!(quote.final_price, None);
    }

    #[test]
    fn negative_supplier_price_is_rejected() {
        let error = Quote::draft(
            QuoteId("Q-2".to_string()),
            RfqId("RFQ-1".to_string()),
            UserId("S-1".to_string()),
            Decimal::new(-1, 0),
            Utc::now(),
        )
        .expect_err("negative price must fail");
        assert!(matches!(error, DomainError::Validation(_)));
    }

    #[test]
    fn allows_send_accept_lifecycle() {
        let mut quote = quote(QuoteStatus::PendingAdmin);
        quote.transition_to(QuoteStatus::SentToClient).expect("pending -> sent");
        quote.transition_to(QuoteStatus::Accepted).expect("sent -> accepted");
        assert!(quote.is_terminal());
    }

    #[test]
    fn accepted_and_rejected_are_terminal() {
        for status in [QuoteStatus::Accepted, QuoteStatus::Rejected] {
            let mut quote = quote(status);
            let error = quote
                .transition_to(QuoteStatus::SentToClient)
                .expect_err("terminal states admit no transitions");
            assert!(matches!(error, DomainError::InvalidQuoteTransition { .. }));
        }
    }

    #[test]
    fn pending_quote_cannot_be_accepted_directly() {
        let mut quote = quote(QuoteStatus::PendingAdmin);
        let error =
            quote.transition_to(QuoteStatus::Accepted).expect_err("must pass through sent");
        assert!(matches!(error, DomainError::InvalidQuoteTransition { .. }));
    }

    #[test]
    fn zero_priced_quote_is_not_sendable() {
        let mut quote = quote(QuoteStatus::PendingAdmin);
        quote.supplier_price = Decimal::ZERO;
        let error = quote.ensure_sendable().expect_err("zero price cannot be sent");
        assert!(matches!(
            error,
            DomainError::InvalidQuoteTransition { ref reason, .. }
                if reason.contains("supplier price")
        ));
    }

    #[test]
    fn sent_quote_is_not_sendable_again() {
        let quote = quote(QuoteStatus::SentToClient);
        assert!(quote.ensure_sendable().is_err());
    }
}
