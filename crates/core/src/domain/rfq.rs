use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::product::ProductId;
use crate::domain::user::UserId;
use crate::errors::DomainError;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RfqId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RfqStatus {
    Open,
    Quoted,
    Closed,
}

/// One requested line within an RFQ. Items have no identity of their own;
/// they live and die with the owning RFQ.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RfqItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rfq {
    pub id: RfqId,
    pub client_id: UserId,
    pub items: Vec<RfqItem>,
    pub status: RfqStatus,
    pub created_at: DateTime<Utc>,
}

impl Rfq {
    /// Builds a submitted RFQ, enforcing the non-empty-items and
    /// positive-quantity invariants.
    pub fn submit(
        id: RfqId,
        client_id: UserId,
        items: Vec<RfqItem>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if items.is_empty() {
            return Err(DomainError::Validation(
                "an RFQ must contain at least one item".to_string(),
            ));
        }
        if let Some(item) = items.iter().find(|item| item.quantity == 0) {
            return Err(DomainError::Validation(format!(
                "item for product {} has zero quantity",
                item.product_id.0
            )));
        }

        Ok(Self { id, client_id, items, status: RfqStatus::Open, created_at })
    }

    pub fn can_transition_to(&self, next: RfqStatus) -> bool {
        matches!(
            (&self.status, next),
            (RfqStatus::Open, RfqStatus::Quoted)
                | (RfqStatus::Open, RfqStatus::Closed)
                | (RfqStatus::Quoted, RfqStatus::Closed)
        )
    }

    pub fn transition_to(&mut self, next: RfqStatus) -> Result<(), DomainError> {
        if self.can_transition_to(next.clone()) {
            self.status = next;
            return Ok(());
        }

        Err(DomainError::InvalidRfqTransition { from: self.status.clone(), to: next })
    }

    /// A closed RFQ is terminal: no new quotes may attach to it.
    pub fn accepts_new_quotes(&self) -> bool {
        !matches!(self.status, RfqStatus::Closed)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::domain::product::ProductId;
    use crate::domain::user::UserId;
    use crate::errors::DomainError;

    use super::{Rfq, RfqId, RfqItem, RfqStatus};

    fn item(quantity: u32) -> RfqItem {
        RfqItem { product_id: ProductId("steel-coil".to_string()), quantity, notes: None }
    }

    fn rfq(status: RfqStatus) -> Rfq {
        let mut rfq = Rfq::submit(
            RfqId("RFQ-1".to_string()),
            UserId("C-1".to_string()),
            vec![item(5)],
            Utc::now(),
        )
        .expect("valid rfq");
        rfq.status = status;
        rfq
    }

    #[test]
    fn submitted_rfq_starts_open() {
        let rfq = rfq(RfqStatus::Open);
        assert_eq!(rfq.status, RfqStatus::Open);
        assert!(rfq.accepts_new_quotes());
    }

    #[test]
    fn empty_item_list_is_rejected() {
        let error = Rfq::submit(
            RfqId("RFQ-2".to_string()),
            UserId("C-1".to_string()),
            Vec::new(),
            Utc::now(),
        )
        .expect_err("empty rfq must fail");
        assert!(matches!(error, DomainError::Validation(_)));
    }

    #[test]
    fn zero_quantity_item_is_rejected() {
        let error = Rfq::submit(
            RfqId("RFQ-3".to_string()),
            UserId("C-1".to_string()),
            vec![item(0)],
            Utc::now(),
        )
        .expect_err("zero quantity must fail");
        assert!(matches!(error, DomainError::Validation(_)));
    }

    #[test]
    fn open_rfq_can_close_directly() {
        let mut rfq = rfq(RfqStatus::Open);
        rfq.transition_to(RfqStatus::Closed).expect("open -> closed");
        assert_eq!(rfq.status, RfqStatus::Closed);
    }

    #[test]
    fn closed_rfq_cannot_reopen() {
        let mut rfq = rfq(RfqStatus::Closed);
        let error = rfq.transition_to(RfqStatus::Open).expect_err("closed is terminal");
        assert!(matches!(error, DomainError::InvalidRfqTransition { .. }));
        assert!(!rfq.accepts_new_quotes());
    }

    #[test]
    fn quoted_rfq_still_accepts_quotes() {
        assert!(rfq(RfqStatus::Quoted).accepts_new_quotes());
    }
}
