//! The workflow store: single mutable owner of RFQ/Quote/Order state. UI
//! layers read snapshots and issue the intent operations defined here; no
//! caller mutates a record directly.

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{info, warn};
use uuid::Uuid;

use sourcedesk_core::domain::order::{Order, OrderId, OrderStatus};
use sourcedesk_core::domain::product::Product;
use sourcedesk_core::domain::quote::{MarginAssignment, Quote, QuoteId, QuoteStatus};
use sourcedesk_core::domain::rfq::{Rfq, RfqId, RfqItem, RfqStatus};
use sourcedesk_core::domain::user::UserId;
use sourcedesk_core::errors::{DomainError, WorkflowError};
use sourcedesk_core::margin::{
    category_of, final_price, resolve_margin, MarginResolution, MarginSchedule,
};

use crate::gateway::{GatewayError, PersistenceGateway, QuoteFilter};

/// Result of a successful quote acceptance: the accepted quote and the order
/// materialized from it, as one logical outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Acceptance {
    pub quote: Quote,
    pub order: Order,
}

pub struct WorkflowStore {
    gateway: Arc<dyn PersistenceGateway>,
}

impl WorkflowStore {
    pub fn new(gateway: Arc<dyn PersistenceGateway>) -> Self {
        Self { gateway }
    }

    /// Client intent: submit a new RFQ. Every referenced product must exist
    /// and be approved for ordering.
    pub async fn submit_rfq(
        &self,
        client_id: UserId,
        items: Vec<RfqItem>,
    ) -> Result<Rfq, WorkflowError> {
        for item in &items {
            let product = self
                .gateway
                .get_product(&item.product_id)
                .await?
                .ok_or_else(|| WorkflowError::not_found("product", item.product_id.0.clone()))?;
            if !product.is_orderable() {
                return Err(DomainError::Validation(format!(
                    "product {} is not approved for ordering",
                    product.id.0
                ))
                .into());
            }
        }

        let rfq = Rfq::submit(RfqId(Uuid::new_v4().to_string()), client_id, items, Utc::now())?;
        let rfq = self.gateway.create_rfq(rfq).await?;
        info!(event_name = "workflow.rfq_submitted", rfq_id = %rfq.id.0, "rfq submitted");
        Ok(rfq)
    }

    /// Supplier intent: quote against an open or quoted RFQ.
    pub async fn submit_quote(
        &self,
        rfq_id: RfqId,
        supplier_id: UserId,
        supplier_price: Decimal,
    ) -> Result<Quote, WorkflowError> {
        let rfq = self
            .gateway
            .get_rfq(&rfq_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("rfq", rfq_id.0.clone()))?;
        if !rfq.accepts_new_quotes() {
            return Err(DomainError::InvalidRfqTransition {
                from: rfq.status,
                to: RfqStatus::Quoted,
            }
            .into());
        }

        let quote = Quote::draft(
            QuoteId(Uuid::new_v4().to_string()),
            rfq_id,
            supplier_id,
            supplier_price,
            Utc::now(),
        )?;
        let quote = self.gateway.create_quote(quote).await?;
        info!(
            event_name = "workflow.quote_submitted",
            quote_id = %quote.id.0,
            rfq_id = %quote.rfq_id.0,
            "quote submitted for admin pricing"
        );
        Ok(quote)
    }

    /// Admin intent: pin a manual margin override to one quote. The derived
    /// final price is rewritten immediately so it always reflects the last
    /// margin assignment.
    pub async fn set_margin_override(
        &self,
        quote_id: &QuoteId,
        percent: Decimal,
    ) -> Result<Quote, WorkflowError> {
        if percent < Decimal::ZERO {
            return Err(DomainError::Validation(format!(
                "margin percent must not be negative (got {percent})"
            ))
            .into());
        }
        self.reassign_margin(quote_id, MarginAssignment::Manual { percent }).await
    }

    /// Admin intent: drop the manual override, reverting the quote to
    /// whichever of the category/global defaults currently applies.
    pub async fn clear_margin_override(&self, quote_id: &QuoteId) -> Result<Quote, WorkflowError> {
        self.reassign_margin(quote_id, MarginAssignment::Inherited).await
    }

    async fn reassign_margin(
        &self,
        quote_id: &QuoteId,
        assignment: MarginAssignment,
    ) -> Result<Quote, WorkflowError> {
        let mut quote = self.load_quote(quote_id).await?;
        if quote.is_terminal() {
            return Err(DomainError::InvalidQuoteTransition {
                from: quote.status.clone(),
                to: quote.status.clone(),
                reason: "margin cannot change on a settled quote".to_string(),
            }
            .into());
        }

        quote.margin = assignment;
        let resolution = self.resolve_for(&quote).await?;
        quote.final_price = Some(final_price(quote.supplier_price, resolution.percent));
        let quote = self.gateway.update_quote(quote).await?;
        info!(
            event_name = "workflow.margin_assigned",
            quote_id = %quote.id.0,
            source = %resolution.source,
            percent = %resolution.percent,
            "margin reassigned and final price rederived"
        );
        Ok(quote)
    }

    pub async fn set_global_margin(&self, percent: Decimal) -> Result<MarginSchedule, WorkflowError> {
        self.persist_margin_setting(None, percent).await
    }

    pub async fn set_category_margin(
        &self,
        category: impl Into<String>,
        percent: Decimal,
    ) -> Result<MarginSchedule, WorkflowError> {
        self.persist_margin_setting(Some(category.into()), percent).await
    }

    pub async fn clear_category_margin(
        &self,
        category: &str,
    ) -> Result<MarginSchedule, WorkflowError> {
        Ok(self.gateway.clear_margin_setting(category).await?)
    }

    async fn persist_margin_setting(
        &self,
        category: Option<String>,
        percent: Decimal,
    ) -> Result<MarginSchedule, WorkflowError> {
        // validate through the schedule before touching the store
        let mut schedule = self.gateway.margin_schedule().await?;
        match &category {
            Some(name) => schedule.set_category(name.clone(), percent)?,
            None => schedule.set_global(percent)?,
        }
        Ok(self.gateway.update_margin_setting(category, percent).await?)
    }

    /// Admin intent: release a priced quote to the client. Resolves the
    /// effective margin, writes the derived final price, and advances the
    /// parent RFQ to `Quoted` on first send.
    pub async fn send_quote(&self, quote_id: &QuoteId) -> Result<Quote, WorkflowError> {
        let mut quote = self.load_quote(quote_id).await?;
        quote.ensure_sendable()?;

        // guard before any write: a closed RFQ admits no further quoting
        let mut rfq = self.load_parent_rfq(&quote).await?;
        if !rfq.accepts_new_quotes() {
            return Err(DomainError::InvalidQuoteTransition {
                from: quote.status.clone(),
                to: QuoteStatus::SentToClient,
                reason: "parent rfq is closed".to_string(),
            }
            .into());
        }

        let resolution = self.resolve_for(&quote).await?;
        quote.final_price = Some(final_price(quote.supplier_price, resolution.percent));
        quote.transition_to(QuoteStatus::SentToClient)?;
        let quote = self.gateway.update_quote(quote).await?;

        if rfq.status == RfqStatus::Open {
            rfq.transition_to(RfqStatus::Quoted)?;
            self.gateway.update_rfq(rfq).await?;
        }

        info!(
            event_name = "workflow.quote_sent",
            quote_id = %quote.id.0,
            rfq_id = %quote.rfq_id.0,
            margin_source = %resolution.source,
            final_price = %quote.final_price.unwrap_or_default(),
            "quote sent to client"
        );
        Ok(quote)
    }

    /// Client intent: accept a quote. One logical operation covering the
    /// quote transition, the RFQ close, and the order materialization.
    /// Idempotent on retry: re-running against an already-accepted quote
    /// returns the existing order, repairing whatever a failed earlier
    /// attempt left behind (an unclosed RFQ, a missing order).
    pub async fn accept_quote(&self, quote_id: &QuoteId) -> Result<Acceptance, WorkflowError> {
        let quote = self.load_quote(quote_id).await?;

        match quote.status {
            QuoteStatus::Accepted => return self.resume_acceptance(quote).await,
            QuoteStatus::SentToClient => {}
            _ => {
                return Err(DomainError::InvalidQuoteTransition {
                    from: quote.status,
                    to: QuoteStatus::Accepted,
                    reason: "only quotes sent to the client can be accepted".to_string(),
                }
                .into());
            }
        }

        // resolve the parent before any mutation so guard failures leave no
        // side effects behind
        let rfq = self.load_parent_rfq(&quote).await?;
        if rfq.status == RfqStatus::Closed {
            // closed means a sibling already won this RFQ
            return Err(DomainError::InvalidQuoteTransition {
                from: quote.status,
                to: QuoteStatus::Accepted,
                reason: "parent rfq is already closed".to_string(),
            }
            .into());
        }

        let mut quote = quote;
        quote.transition_to(QuoteStatus::Accepted)?;
        let quote = self.gateway.update_quote(quote).await?;

        let mut rfq = rfq;
        rfq.transition_to(RfqStatus::Closed)?;
        let rfq = self.gateway.update_rfq(rfq).await?;

        let order = self.materialize_order(&quote, &rfq).await?;
        info!(
            event_name = "workflow.quote_accepted",
            quote_id = %quote.id.0,
            rfq_id = %rfq.id.0,
            order_id = %order.id.0,
            amount = %order.amount,
            "quote accepted and order materialized"
        );
        Ok(Acceptance { quote, order })
    }

    /// Client intent: reject a quote. Terminal; siblings are untouched.
    pub async fn reject_quote(&self, quote_id: &QuoteId) -> Result<Quote, WorkflowError> {
        let mut quote = self.load_quote(quote_id).await?;
        quote.transition_to(QuoteStatus::Rejected)?;
        let quote = self.gateway.update_quote(quote).await?;
        info!(event_name = "workflow.quote_rejected", quote_id = %quote.id.0, "quote rejected");
        Ok(quote)
    }

    /// Fulfillment intent: advance an order's shipping status.
    pub async fn advance_order(
        &self,
        order_id: &OrderId,
        next: OrderStatus,
    ) -> Result<Order, WorkflowError> {
        let mut order = self
            .gateway
            .get_order(order_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("order", order_id.0.clone()))?;
        order.transition_to(next)?;
        Ok(self.gateway.update_order(order).await?)
    }

    pub async fn rfq(&self, id: &RfqId) -> Result<Option<Rfq>, WorkflowError> {
        Ok(self.gateway.get_rfq(id).await?)
    }

    pub async fn quote(&self, id: &QuoteId) -> Result<Option<Quote>, WorkflowError> {
        Ok(self.gateway.get_quote(id).await?)
    }

    pub async fn quotes(&self, filter: QuoteFilter) -> Result<Vec<Quote>, WorkflowError> {
        Ok(self.gateway.list_quotes(filter).await?)
    }

    pub async fn orders(&self) -> Result<Vec<Order>, WorkflowError> {
        Ok(self.gateway.list_orders().await?)
    }

    pub async fn margin_schedule(&self) -> Result<MarginSchedule, WorkflowError> {
        Ok(self.gateway.margin_schedule().await?)
    }

    /// Effective margin for a quote as it stands, without mutating anything.
    pub async fn resolve_margin_for(
        &self,
        quote_id: &QuoteId,
    ) -> Result<MarginResolution, WorkflowError> {
        let quote = self.load_quote(quote_id).await?;
        self.resolve_for(&quote).await
    }

    async fn load_quote(&self, id: &QuoteId) -> Result<Quote, WorkflowError> {
        self.gateway
            .get_quote(id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("quote", id.0.clone()))
    }

    async fn load_parent_rfq(&self, quote: &Quote) -> Result<Rfq, WorkflowError> {
        self.gateway.get_rfq(&quote.rfq_id).await?.ok_or_else(|| {
            WorkflowError::DanglingReference {
                entity: "quote",
                id: quote.id.0.clone(),
                missing_entity: "rfq",
                missing_id: quote.rfq_id.0.clone(),
            }
        })
    }

    async fn resolve_for(&self, quote: &Quote) -> Result<MarginResolution, WorkflowError> {
        let rfq = self.load_parent_rfq(quote).await?;
        let product: Option<Product> = match rfq.items.first() {
            Some(item) => self.gateway.get_product(&item.product_id).await?,
            None => None,
        };
        let category = category_of(&rfq, product.as_ref());
        let schedule = self.gateway.margin_schedule().await?;
        Ok(resolve_margin(&quote.margin, &category, &schedule))
    }

    /// Retry path for a quote already committed as accepted: re-run whatever
    /// the failed earlier attempt left undone (the recognized degraded
    /// states) before returning the existing or re-created order.
    async fn resume_acceptance(&self, quote: Quote) -> Result<Acceptance, WorkflowError> {
        let mut rfq = self.load_parent_rfq(&quote).await?;
        if rfq.status != RfqStatus::Closed {
            warn!(
                event_name = "workflow.rfq_close_repaired",
                quote_id = %quote.id.0,
                rfq_id = %rfq.id.0,
                "accepted quote left its rfq open; re-running the close"
            );
            rfq.transition_to(RfqStatus::Closed)?;
            rfq = self.gateway.update_rfq(rfq).await?;
        }

        if let Some(order) = self.gateway.find_order_by_quote(&quote.id).await? {
            return Ok(Acceptance { quote, order });
        }

        warn!(
            event_name = "workflow.order_repaired",
            quote_id = %quote.id.0,
            "accepted quote had no order; re-running order materialization"
        );
        let order = self.materialize_order(&quote, &rfq).await?;
        Ok(Acceptance { quote, order })
    }

    async fn materialize_order(&self, quote: &Quote, rfq: &Rfq) -> Result<Order, WorkflowError> {
        let amount = quote.final_price.ok_or_else(|| {
            DomainError::Validation(format!("accepted quote {} has no final price", quote.id.0))
        })?;
        let order = Order {
            id: OrderId(Uuid::new_v4().to_string()),
            quote_id: Some(quote.id.clone()),
            client_id: rfq.client_id.clone(),
            supplier_id: quote.supplier_id.clone(),
            amount,
            status: OrderStatus::Processing,
            created_at: Utc::now(),
        };

        match self.gateway.create_order(order).await {
            Ok(order) => Ok(order),
            // a concurrent or earlier attempt won the uniqueness race
            Err(GatewayError::Conflict(_)) => self
                .gateway
                .find_order_by_quote(&quote.id)
                .await?
                .ok_or_else(|| WorkflowError::Gateway("order conflict without a stored order".to_string())),
            Err(error) => Err(error.into()),
        }
    }
}
