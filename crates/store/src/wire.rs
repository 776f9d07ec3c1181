//! Wire representation of every entity crossing the persistence boundary.
//! Field names are snake_case and status enums are SCREAMING_SNAKE_CASE
//! strings on the wire. This module is the only place the mapping lives;
//! both the remote gateway and the snapshot file go through it.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use sourcedesk_core::domain::order::{Order, OrderId, OrderStatus};
use sourcedesk_core::domain::product::{Product, ProductId, ProductStatus};
use sourcedesk_core::domain::quote::{MarginAssignment, Quote, QuoteId, QuoteStatus};
use sourcedesk_core::domain::rfq::{Rfq, RfqId, RfqItem, RfqStatus};
use sourcedesk_core::domain::user::{AccountStatus, KycStatus, Role, User, UserId};
use sourcedesk_core::margin::MarginSchedule;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleWire {
    Guest,
    Client,
    Supplier,
    Admin,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatusWire {
    Pending,
    Approved,
    Suspended,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum KycStatusWire {
    NotSubmitted,
    InReview,
    Verified,
    Rejected,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatusWire {
    Pending,
    Approved,
    Rejected,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RfqStatusWire {
    Open,
    Quoted,
    Closed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuoteStatusWire {
    PendingAdmin,
    SentToClient,
    Accepted,
    Rejected,
}

impl QuoteStatusWire {
    /// Query-parameter form used by the remote gateway's list endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingAdmin => "PENDING_ADMIN",
            Self::SentToClient => "SENT_TO_CLIENT",
            Self::Accepted => "ACCEPTED",
            Self::Rejected => "REJECTED",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatusWire {
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserWire {
    pub id: String,
    pub role: RoleWire,
    pub company_name: String,
    pub verified: bool,
    pub status: AccountStatusWire,
    pub kyc_status: KycStatusWire,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductWire {
    pub id: String,
    pub supplier_id: String,
    pub name: String,
    pub category: String,
    pub cost_price: Decimal,
    pub status: ProductStatusWire,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RfqItemWire {
    pub product_id: String,
    pub quantity: u32,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RfqWire {
    pub id: String,
    pub client_id: String,
    pub items: Vec<RfqItemWire>,
    pub status: RfqStatusWire,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteWire {
    pub id: String,
    pub rfq_id: String,
    pub supplier_id: String,
    pub supplier_price: Decimal,
    /// Manual admin override; absent when the quote inherits from the
    /// category/global schedule.
    pub margin_percent: Option<Decimal>,
    pub final_price: Option<Decimal>,
    pub status: QuoteStatusWire,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderWire {
    pub id: String,
    pub quote_id: Option<String>,
    pub client_id: String,
    pub supplier_id: String,
    pub amount: Decimal,
    pub status: OrderStatusWire,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginScheduleWire {
    pub global_percent: Decimal,
    pub category_percents: BTreeMap<String, Decimal>,
}

/// Body for the remote margin-setting endpoint; `category = null` addresses
/// the global default.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginSettingWire {
    pub category: Option<String>,
    pub percent: Decimal,
}

impl From<Role> for RoleWire {
    fn from(value: Role) -> Self {
        match value {
            Role::Guest => Self::Guest,
            Role::Client => Self::Client,
            Role::Supplier => Self::Supplier,
            Role::Admin => Self::Admin,
        }
    }
}

impl From<RoleWire> for Role {
    fn from(value: RoleWire) -> Self {
        match value {
            RoleWire::Guest => Self::Guest,
            RoleWire::Client => Self::Client,
            RoleWire::Supplier => Self::Supplier,
            RoleWire::Admin => Self::Admin,
        }
    }
}

impl From<AccountStatus> for AccountStatusWire {
    fn from(value: AccountStatus) -> Self {
        match value {
            AccountStatus::Pending => Self::Pending,
            AccountStatus::Approved => Self::Approved,
            AccountStatus::Suspended => Self::Suspended,
        }
    }
}

impl From<AccountStatusWire> for AccountStatus {
    fn from(value: AccountStatusWire) -> Self {
        match value {
            AccountStatusWire::Pending => Self::Pending,
            AccountStatusWire::Approved => Self::Approved,
            AccountStatusWire::Suspended => Self::Suspended,
        }
    }
}

impl From<KycStatus> for KycStatusWire {
    fn from(value: KycStatus) -> Self {
        match value {
            KycStatus::NotSubmitted => Self::NotSubmitted,
            KycStatus::InReview => Self::InReview,
            KycStatus::Verified => Self::Verified,
            KycStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<KycStatusWire> for KycStatus {
    fn from(value: KycStatusWire) -> Self {
        match value {
            KycStatusWire::NotSubmitted => Self::NotSubmitted,
            KycStatusWire::InReview => Self::InReview,
            KycStatusWire::Verified => Self::Verified,
            KycStatusWire::Rejected => Self::Rejected,
        }
    }
}

impl From<ProductStatus> for ProductStatusWire {
    fn from(value: ProductStatus) -> Self {
        match value {
            ProductStatus::Pending => Self::Pending,
            ProductStatus::Approved => Self::Approved,
            ProductStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<ProductStatusWire> for ProductStatus {
    fn from(value: ProductStatusWire) -> Self {
        match value {
            ProductStatusWire::Pending => Self::Pending,
            ProductStatusWire::Approved => Self::Approved,
            ProductStatusWire::Rejected => Self::Rejected,
        }
    }
}

impl From<RfqStatus> for RfqStatusWire {
    fn from(value: RfqStatus) -> Self {
        match value {
            RfqStatus::Open => Self::Open,
            RfqStatus::Quoted => Self::Quoted,
            RfqStatus::Closed => Self::Closed,
        }
    }
}

impl From<RfqStatusWire> for RfqStatus {
    fn from(value: RfqStatusWire) -> Self {
        match value {
            RfqStatusWire::Open => Self::Open,
            RfqStatusWire::Quoted => Self::Quoted,
            RfqStatusWire::Closed => Self::Closed,
        }
    }
}

impl From<QuoteStatus> for QuoteStatusWire {
    fn from(value: QuoteStatus) -> Self {
        match value {
            QuoteStatus::PendingAdmin => Self::PendingAdmin,
            QuoteStatus::SentToClient => Self::SentToClient,
            QuoteStatus::Accepted => Self::Accepted,
            QuoteStatus::Rejected => Self::Rejected,
        }
    }
}

impl From<QuoteStatusWire> for QuoteStatus {
    fn from(value: QuoteStatusWire) -> Self {
        match value {
            QuoteStatusWire::PendingAdmin => Self::PendingAdmin,
            QuoteStatusWire::SentToClient => Self::SentToClient,
            QuoteStatusWire::Accepted => Self::Accepted,
            QuoteStatusWire::Rejected => Self::Rejected,
        }
    }
}

impl From<OrderStatus> for OrderStatusWire {
    fn from(value: OrderStatus) -> Self {
        match value {
            OrderStatus::Processing => Self::Processing,
            OrderStatus::Shipped => Self::Shipped,
            OrderStatus::Delivered => Self::Delivered,
            OrderStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<OrderStatusWire> for OrderStatus {
    fn from(value: OrderStatusWire) -> Self {
        match value {
            OrderStatusWire::Processing => Self::Processing,
            OrderStatusWire::Shipped => Self::Shipped,
            OrderStatusWire::Delivered => Self::Delivered,
            OrderStatusWire::Cancelled => Self::Cancelled,
        }
    }
}

impl From<User> for UserWire {
    fn from(value: User) -> Self {
        Self {
            id: value.id.0,
            role: value.role.into(),
            company_name: value.company_name,
            verified: value.verified,
            status: value.status.into(),
            kyc_status: value.kyc_status.into(),
        }
    }
}

impl From<UserWire> for User {
    fn from(value: UserWire) -> Self {
        Self {
            id: UserId(value.id),
            role: value.role.into(),
            company_name: value.company_name,
            verified: value.verified,
            status: value.status.into(),
            kyc_status: value.kyc_status.into(),
        }
    }
}

impl From<Product> for ProductWire {
    fn from(value: Product) -> Self {
        Self {
            id: value.id.0,
            supplier_id: value.supplier_id.0,
            name: value.name,
            category: value.category,
            cost_price: value.cost_price,
            status: value.status.into(),
        }
    }
}

impl From<ProductWire> for Product {
    fn from(value: ProductWire) -> Self {
        Self {
            id: ProductId(value.id),
            supplier_id: UserId(value.supplier_id),
            name: value.name,
            category: value.category,
            cost_price: value.cost_price,
            status: value.status.into(),
        }
    }
}

impl From<RfqItem> for RfqItemWire {
    fn from(value: RfqItem) -> Self {
        Self { product_id: value.product_id.0, quantity: value.quantity, notes: value.notes }
    }
}

impl From<RfqItemWire> for RfqItem {
    fn from(value: RfqItemWire) -> Self {
        Self {
            product_id: ProductId(value.product_id),
            quantity: value.quantity,
            notes: value.notes,
        }
    }
}

impl From<Rfq> for RfqWire {
    fn from(value: Rfq) -> Self {
        Self {
            id: value.id.0,
            client_id: value.client_id.0,
            items: value.items.into_iter().map(Into::into).collect(),
            status: value.status.into(),
            created_at: value.created_at,
        }
    }
}

impl From<RfqWire> for Rfq {
    fn from(value: RfqWire) -> Self {
        Self {
            id: RfqId(value.id),
            client_id: UserId(value.client_id),
            items: value.items.into_iter().map(Into::into).collect(),
            status: value.status.into(),
            created_at: value.created_at,
        }
    }
}

impl From<Quote> for QuoteWire {
    fn from(value: Quote) -> Self {
        let margin_percent = match value.margin {
            MarginAssignment::Manual { percent } => Some(percent),
            MarginAssignment::Inherited => None,
        };
        Self {
            id: value.id.0,
            rfq_id: value.rfq_id.0,
            supplier_id: value.supplier_id.0,
            supplier_price: value.supplier_price,
            margin_percent,
            final_price: value.final_price,
            status: value.status.into(),
            created_at: value.created_at,
        }
    }
}

impl From<QuoteWire> for Quote {
    fn from(value: QuoteWire) -> Self {
        let margin = match value.margin_percent {
            Some(percent) => MarginAssignment::Manual { percent },
            None => MarginAssignment::Inherited,
        };
        Self {
            id: QuoteId(value.id),
            rfq_id: RfqId(value.rfq_id),
            supplier_id: UserId(value.supplier_id),
            supplier_price: value.supplier_price,
            margin,
            final_price: value.final_price,
            status: value.status.into(),
            created_at: value.created_at,
        }
    }
}

impl From<Order> for OrderWire {
    fn from(value: Order) -> Self {
        Self {
            id: value.id.0,
            quote_id: value.quote_id.map(|id| id.0),
            client_id: value.client_id.0,
            supplier_id: value.supplier_id.0,
            amount: value.amount,
            status: value.status.into(),
            created_at: value.created_at,
        }
    }
}

impl From<OrderWire> for Order {
    fn from(value: OrderWire) -> Self {
        Self {
            id: OrderId(value.id),
            quote_id: value.quote_id.map(QuoteId),
            client_id: UserId(value.client_id),
            supplier_id: UserId(value.supplier_id),
            amount: value.amount,
            status: value.status.into(),
            created_at: value.created_at,
        }
    }
}

impl From<MarginSchedule> for MarginScheduleWire {
    fn from(value: MarginSchedule) -> Self {
        Self { global_percent: value.global_percent, category_percents: value.category_percents }
    }
}

impl From<MarginScheduleWire> for MarginSchedule {
    fn from(value: MarginScheduleWire) -> Self {
        Self { global_percent: value.global_percent, category_percents: value.category_percents }
    }
}
