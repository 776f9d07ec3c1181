//! Persistence Gateway: the single boundary between the workflow engine and
//! the backing store. Workflow code is written once against the trait; the
//! in-memory and remote implementations are interchangeable.

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use sourcedesk_core::domain::order::{Order, OrderId};
use sourcedesk_core::domain::product::{Product, ProductId};
use sourcedesk_core::domain::quote::{Quote, QuoteId, QuoteStatus};
use sourcedesk_core::domain::rfq::{Rfq, RfqId};
use sourcedesk_core::domain::user::{User, UserId};
use sourcedesk_core::errors::WorkflowError;
use sourcedesk_core::margin::MarginSchedule;

pub mod memory;
pub mod remote;

pub use memory::InMemoryGateway;
pub use remote::RemoteGateway;

/// Gateway failures are retryable from the caller's point of view; none of
/// them is assumed permanent.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("unexpected http status {status} from {endpoint}")]
    Http { status: u16, endpoint: String },
    #[error("decode failure: {0}")]
    Decode(String),
    #[error("snapshot io failure: {0}")]
    Snapshot(String),
    #[error("conflict: {0}")]
    Conflict(String),
}

impl From<GatewayError> for WorkflowError {
    fn from(value: GatewayError) -> Self {
        WorkflowError::Gateway(value.to_string())
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(value: reqwest::Error) -> Self {
        GatewayError::Transport(value.to_string())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuoteFilter {
    pub rfq_id: Option<RfqId>,
    pub supplier_id: Option<UserId>,
    pub status: Option<QuoteStatus>,
}

impl QuoteFilter {
    pub fn for_rfq(rfq_id: RfqId) -> Self {
        Self { rfq_id: Some(rfq_id), ..Self::default() }
    }

    pub fn matches(&self, quote: &Quote) -> bool {
        if let Some(rfq_id) = &self.rfq_id {
            if &quote.rfq_id != rfq_id {
                return false;
            }
        }
        if let Some(supplier_id) = &self.supplier_id {
            if &quote.supplier_id != supplier_id {
                return false;
            }
        }
        if let Some(status) = &self.status {
            if &quote.status != status {
                return false;
            }
        }
        true
    }
}

#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    async fn get_user(&self, id: &UserId) -> Result<Option<User>, GatewayError>;
    async fn upsert_user(&self, user: User) -> Result<User, GatewayError>;

    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, GatewayError>;
    async fn upsert_product(&self, product: Product) -> Result<Product, GatewayError>;

    async fn get_rfq(&self, id: &RfqId) -> Result<Option<Rfq>, GatewayError>;
    async fn create_rfq(&self, rfq: Rfq) -> Result<Rfq, GatewayError>;
    async fn update_rfq(&self, rfq: Rfq) -> Result<Rfq, GatewayError>;

    async fn get_quote(&self, id: &QuoteId) -> Result<Option<Quote>, GatewayError>;
    async fn list_quotes(&self, filter: QuoteFilter) -> Result<Vec<Quote>, GatewayError>;
    async fn create_quote(&self, quote: Quote) -> Result<Quote, GatewayError>;
    async fn update_quote(&self, quote: Quote) -> Result<Quote, GatewayError>;

    /// Fails with [`GatewayError::Conflict`] when an order for the same quote
    /// already exists; order creation is idempotent on `quote_id` uniqueness.
    async fn create_order(&self, order: Order) -> Result<Order, GatewayError>;
    async fn get_order(&self, id: &OrderId) -> Result<Option<Order>, GatewayError>;
    async fn find_order_by_quote(&self, quote_id: &QuoteId) -> Result<Option<Order>, GatewayError>;
    async fn list_orders(&self) -> Result<Vec<Order>, GatewayError>;
    async fn update_order(&self, order: Order) -> Result<Order, GatewayError>;

    async fn margin_schedule(&self) -> Result<MarginSchedule, GatewayError>;
    async fn update_margin_setting(
        &self,
        category: Option<String>,
        percent: Decimal,
    ) -> Result<MarginSchedule, GatewayError>;
    async fn clear_margin_setting(&self, category: &str) -> Result<MarginSchedule, GatewayError>;
}
