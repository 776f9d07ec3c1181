use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::Serialize;

use sourcedesk_core::domain::order::{Order, OrderId};
use sourcedesk_core::domain::product::{Product, ProductId};
use sourcedesk_core::domain::quote::{Quote, QuoteId};
use sourcedesk_core::domain::rfq::{Rfq, RfqId};
use sourcedesk_core::domain::user::{User, UserId};
use sourcedesk_core::margin::MarginSchedule;

use crate::wire::{
    MarginScheduleWire, MarginSettingWire, OrderWire, ProductWire, QuoteStatusWire, QuoteWire,
    RfqWire, UserWire,
};

use super::{GatewayError, PersistenceGateway, QuoteFilter};

/// Gateway backed by the hosted REST store. All payloads cross the boundary
/// in the wire shapes from [`crate::wire`]; request timeouts are owned here,
/// bounded by configuration.
pub struct RemoteGateway {
    client: Client,
    base_url: String,
}

impl RemoteGateway {
    pub fn new(
        base_url: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(request_timeout).build()?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, GatewayError> {
        let endpoint = self.endpoint(path);
        let response = self.client.get(&endpoint).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(response, &endpoint)?;
        Ok(Some(decode(response).await?))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, GatewayError> {
        let endpoint = self.endpoint(path);
        let response = self.client.get(&endpoint).query(query).send().await?;
        let response = check_status(response, &endpoint)?;
        decode(response).await
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        let endpoint = self.endpoint(path);
        let response = self.client.post(&endpoint).json(body).send().await?;
        let response = check_status(response, &endpoint)?;
        decode(response).await
    }

    async fn put_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, GatewayError> {
        let endpoint = self.endpoint(path);
        let response = self.client.put(&endpoint).json(body).send().await?;
        let response = check_status(response, &endpoint)?;
        decode(response).await
    }
}

fn check_status(response: Response, endpoint: &str) -> Result<Response, GatewayError> {
    let status = response.status();
    if status == StatusCode::CONFLICT {
        return Err(GatewayError::Conflict(format!("{endpoint} reported a conflict")));
    }
    if !status.is_success() {
        return Err(GatewayError::Http { status: status.as_u16(), endpoint: endpoint.to_string() });
    }
    Ok(response)
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
    response.json::<T>().await.map_err(|err| GatewayError::Decode(err.to_string()))
}

fn quote_query(filter: &QuoteFilter) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(rfq_id) = &filter.rfq_id {
        query.push(("rfq_id", rfq_id.0.clone()));
    }
    if let Some(supplier_id) = &filter.supplier_id {
        query.push(("supplier_id", supplier_id.0.clone()));
    }
    if let Some(status) = &filter.status {
        query.push(("status", QuoteStatusWire::from(status.clone()).as_str().to_string()));
    }
    query
}

#[async_trait]
impl PersistenceGateway for RemoteGateway {
    async fn get_user(&self, id: &UserId) -> Result<Option<User>, GatewayError> {
        Ok(self.get_optional::<UserWire>(&format!("/users/{}", id.0)).await?.map(Into::into))
    }

    async fn upsert_user(&self, user: User) -> Result<User, GatewayError> {
        let path = format!("/users/{}", user.id.0);
        let wire: UserWire = self.put_json(&path, &UserWire::from(user)).await?;
        Ok(wire.into())
    }

    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>, GatewayError> {
        Ok(self.get_optional::<ProductWire>(&format!("/products/{}", id.0)).await?.map(Into::into))
    }

    async fn upsert_product(&self, product: Product) -> Result<Product, GatewayError> {
        let path = format!("/products/{}", product.id.0);
        let wire: ProductWire = self.put_json(&path, &ProductWire::from(product)).await?;
        Ok(wire.into())
    }

    async fn get_rfq(&self, id: &RfqId) -> Result<Option<Rfq>, GatewayError> {
        Ok(self.get_optional::<RfqWire>(&format!("/rfqs/{}", id.0)).await?.map(Into::into))
    }

    async fn create_rfq(&self, rfq: Rfq) -> Result<Rfq, GatewayError> {
        let wire: RfqWire = self.post_json("/rfqs", &RfqWire::from(rfq)).await?;
        Ok(wire.into())
    }

    async fn update_rfq(&self, rfq: Rfq) -> Result<Rfq, GatewayError> {
        let path = format!("/rfqs/{}", rfq.id.0);
        let wire: RfqWire = self.put_json(&path, &RfqWire::from(rfq)).await?;
        Ok(wire.into())
    }

    async fn get_quote(&self, id: &QuoteId) -> Result<Option<Quote>, GatewayError> {
        Ok(self.get_optional::<QuoteWire>(&format!("/quotes/{}", id.0)).await?.map(Into::into))
    }

    async fn list_quotes(&self, filter: QuoteFilter) -> Result<Vec<Quote>, GatewayError> {
        let wires: Vec<QuoteWire> = self.get_json("/quotes", &quote_query(&filter)).await?;
        Ok(wires.into_iter().map(Into::into).collect())
    }

    async fn create_quote(&self, quote: Quote) -> Result<Quote, GatewayError> {
        let wire: QuoteWire = self.post_json("/quotes", &QuoteWire::from(quote)).await?;
        Ok(wire.into())
    }

    async fn update_quote(&self, quote: Quote) -> Result<Quote, GatewayError> {
        let path = format!("/quotes/{}", quote.id.0);
        let wire: QuoteWire = self.put_json(&path, &QuoteWire::from(quote)).await?;
        Ok(wire.into())
    }

    async fn create_order(&self, order: Order) -> Result<Order, GatewayError> {
        let wire: OrderWire = self.post_json("/orders", &OrderWire::from(order)).await?;
        Ok(wire.into())
    }

    async fn get_order(&self, id: &OrderId) -> Result<Option<Order>, GatewayError> {
        Ok(self.get_optional::<OrderWire>(&format!("/orders/{}", id.0)).await?.map(Into::into))
    }

    async fn find_order_by_quote(&self, quote_id: &QuoteId) -> Result<Option<Order>, GatewayError> {
        let wires: Vec<OrderWire> =
            self.get_json("/orders", &[("quote_id", quote_id.0.clone())]).await?;
        Ok(wires.into_iter().next().map(Into::into))
    }

    async fn list_orders(&self) -> Result<Vec<Order>, GatewayError> {
        let wires: Vec<OrderWire> = self.get_json("/orders", &[]).await?;
        Ok(wires.into_iter().map(Into::into).collect())
    }

    async fn update_order(&self, order: Order) -> Result<Order, GatewayError> {
        let path = format!("/orders/{}", order.id.0);
        let wire: OrderWire = self.put_json(&path, &OrderWire::from(order)).await?;
        Ok(wire.into())
    }

    async fn margin_schedule(&self) -> Result<MarginSchedule, GatewayError> {
        let wire: MarginScheduleWire = self.get_json("/margins", &[]).await?;
        Ok(wire.into())
    }

    async fn update_margin_setting(
        &self,
        category: Option<String>,
        percent: Decimal,
    ) -> Result<MarginSchedule, GatewayError> {
        let wire: MarginScheduleWire =
            self.put_json("/margins", &MarginSettingWire { category, percent }).await?;
        Ok(wire.into())
    }

    async fn clear_margin_setting(&self, category: &str) -> Result<MarginSchedule, GatewayError> {
        let endpoint = self.endpoint(&format!("/margins/{category}"));
        let response = self.client.delete(&endpoint).send().await?;
        let response = check_status(response, &endpoint)?;
        decode::<MarginScheduleWire>(response).await.map(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use sourcedesk_core::domain::quote::QuoteStatus;
    use sourcedesk_core::domain::rfq::RfqId;
    use sourcedesk_core::domain::user::UserId;

    use crate::gateway::QuoteFilter;

    use super::{quote_query, RemoteGateway};

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let gateway = RemoteGateway::new("https://api.example.test/", Duration::from_secs(5))
            .expect("client builds");
        assert_eq!(gateway.endpoint("/quotes"), "https://api.example.test/quotes");
    }

    #[test]
    fn quote_filter_maps_to_snake_case_query_params() {
        let query = quote_query(&QuoteFilter {
            rfq_id: Some(RfqId("RFQ-7".to_string())),
            supplier_id: Some(UserId("S-2".to_string())),
            status: Some(QuoteStatus::SentToClient),
        });

        assert_eq!(
            query,
            vec![
                ("rfq_id", "RFQ-7".to_string()),
                ("supplier_id", "S-2".to_string()),
                ("status", "SENT_TO_CLIENT".to_string()),
            ]
        );
    }
}
