use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use sourcedesk_core::domain::order::{Order, OrderId};
use sourcedesk_core::domain::product::{Product, ProductId};
use sourcedesk_core::domain::quote::{Quote, QuoteId};
use sourcedesk_core::domain::rfq::{Rfq, RfqId};
use sourcedesk_core::domain::user::{User, UserId};
use sourcedesk_core::margin::MarginSchedule;

use crate::snapshot::SnapshotDocument;

use super::{GatewayError, PersistenceGateway, QuoteFilter};

/// Mock-mode gateway holding all collections behind `RwLock`ed maps. Doubles
/// as the reference implementation for the gateway contract and as the
/// backing store for local fallback mode.
#[derive(Default)]
pub struct InMemoryGateway {
    users: RwLock<HashMap<String, User>>,
    products: RwLock<HashMap<String, Product>>,
    rfqs: RwLock<HashMap<String, Rfq>>,
    quotes: RwLock<HashMap<String, Quote>>,
    orders: RwLock<HashMap<String, Order>>,
    margins: RwLock<MarginSchedule>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a gateway from a previously exported snapshot document.
    pub fn from_snapshot(document: SnapshotDocument) -> Self {
        let (users, products, rfqs, quotes, orders, margins) = document.into_collections();
        Self {
            users: RwLock::new(users),
            products: RwLock::new(products),
            rfqs: RwLock::new(rfqs),
            quotes: RwLock::new(quotes),
            orders: RwLock::new(orders),
            margins: RwLock::new(margins),
        }
    }

    /// Exports the full store state as one snapshot document.
    pub async fn snapshot(&self, mode_marker: &str) -> SnapshotDocument {
        SnapshotDocument::from_collections(
            mode_marker,
            self.users.read().await.clone(),
            self.products.read().await.clone(),
            self.rfqs.read().await.clone(),
            self.quotes.read().await.clone(),
            self.orders.read().await.clone(),
            self.margins.read().await.clone(),
        )
    }
}

#[async_trait]
impl PersistenceGateway for InMemoryGateway {
    async fn get_user(&self, id: &UserId) -> Result<Option<User>, GatewayError> {
        Ok(self.users.read().await.get(&id.0).cloned())
    }

    async fn upsert_user(&self, user: User) -> Result<User, GatewayError> {
        self.users.write().await.insert(user.id.0.clone(), user.clone());
        Ok(user)
    }

    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, GatewayError> {
        Ok(self.products.read().await.get(&id.0).cloned())
    }

    async fn upsert_product(&self, product: Product) -> Result<Product, GatewayError> {
        self.products.write().await.insert(product.id.0.clone(), product.clone());
        Ok(product)
    }

    async fn get_rfq(&self, id: &RfqId) -> Result<Option<Rfq>, GatewayError> {
        Ok(self.rfqs.read().await.get(&id.0).cloned())
    }

    async fn create_rfq(&self, rfq: Rfq) -> Result<Rfq, GatewayError> {
        let mut rfqs = self.rfqs.write().await;
        if rfqs.contains_key(&rfq.id.0) {
            return Err(GatewayError::Conflict(format!("rfq {} already exists", rfq.id.0)));
        }
        rfqs.insert(rfq.id.0.clone(), rfq.clone());
        Ok(rfq)
    }

    async fn update_rfq(&self, rfq: Rfq) -> Result<Rfq, GatewayError> {
        self.rfqs.write().await.insert(rfq.id.0.clone(), rfq.clone());
        Ok(rfq)
    }

    async fn get_quote(&self, id: &QuoteId) -> Result<Option<Quote>, GatewayError> {
        Ok(self.quotes.read().await.get(&id.0).cloned())
    }

    async fn list_quotes(&self, filter: QuoteFilter) -> Result<Vec<Quote>, GatewayError> {
        let quotes = self.quotes.read().await;
        let mut matched: Vec<Quote> =
            quotes.values().filter(|quote| filter.matches(quote)).cloned().collect();
        matched.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.0.cmp(&b.id.0)));
        Ok(matched)
    }

    async fn create_quote(&self, quote: Quote) -> Result<Quote, GatewayError> {
        let mut quotes = self.quotes.write().await;
        if quotes.contains_key(&quote.id.0) {
            return Err(GatewayError::Conflict(format!("quote {} already exists", quote.id.0)));
        }
        quotes.insert(quote.id.0.clone(), quote.clone());
        Ok(quote)
    }

    async fn update_quote(&self, quote: Quote) -> Result<Quote, GatewayError> {
        self.quotes.write().await.insert(quote.id.0.clone(), quote.clone());
        Ok(quote)
    }

    async fn create_order(&self, order: Order) -> Result<Order, GatewayError> {
        let mut orders = self.orders.write().await;
        if let Some(quote_id) = &order.quote_id {
            let duplicate = orders.values().any(|existing| {
                existing.quote_id.as_ref().is_some_and(|existing_id| existing_id == quote_id)
            });
            if duplicate {
                return Err(GatewayError::Conflict(format!(
                    "an order for quote {} already exists",
                    quote_id.0
                )));
            }
        }
        orders.insert(order.id.0.clone(), order.clone());
        Ok(order)
    }

    async fn get_order(&self, id: &OrderId) -> Result<Option<Order>, GatewayError> {
        Ok(self.orders.read().await.get(&id.0).cloned())
    }

    async fn find_order_by_quote(&self, quote_id: &QuoteId) -> Result<Option<Order>, GatewayError> {
        let orders = self.orders.read().await;
        Ok(orders
            .values()
            .find(|order| order.quote_id.as_ref().is_some_and(|id| id == quote_id))
            .cloned())
    }

    async fn list_orders(&self) -> Result<Vec<Order>, GatewayError> {
        let orders = self.orders.read().await;
        let mut all: Vec<Order> = orders.values().cloned().collect();
        all.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.0.cmp(&b.id.0)));
        Ok(all)
    }

    async fn update_order(&self, order: Order) -> Result<Order, GatewayError> {
        self.orders.write().await.insert(order.id.0.clone(), order.clone());
        Ok(order)
    }

    async fn margin_schedule(&self) -> Result<MarginSchedule, GatewayError> {
        Ok(self.margins.read().await.clone())
    }

    async fn update_margin_setting(
        &self,
        category: Option<String>,
        percent: Decimal,
    ) -> Result<MarginSchedule, GatewayError> {
        let mut margins = self.margins.write().await;
        match category {
            Some(category) => margins.category_percents.insert(category, percent),
            None => {
                margins.global_percent = percent;
                None
            }
        };
        Ok(margins.clone())
    }

    async fn clear_margin_setting(&self, category: &str) -> Result<MarginSchedule, GatewayError> {
        let mut margins = self.margins.write().await;
        margins.clear_category(category);
        Ok(margins.clone())
    }
}
