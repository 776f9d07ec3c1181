//! Local fallback persistence: the whole workflow store serializes to one
//! JSON document tagged with the store mode that produced it. A snapshot
//! written under a different mode is discarded on load so mock-shaped and
//! remote-shaped records never mix.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use sourcedesk_core::config::StoreMode;
use sourcedesk_core::domain::order::Order;
use sourcedesk_core::domain::product::Product;
use sourcedesk_core::domain::quote::Quote;
use sourcedesk_core::domain::rfq::Rfq;
use sourcedesk_core::domain::user::User;
use sourcedesk_core::margin::MarginSchedule;

use crate::gateway::GatewayError;
use crate::wire::{
    MarginScheduleWire, OrderWire, ProductWire, QuoteWire, RfqWire, UserWire,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotDocument {
    /// Store mode marker recorded at save time.
    pub mode: String,
    pub users: Vec<UserWire>,
    pub products: Vec<ProductWire>,
    pub rfqs: Vec<RfqWire>,
    pub quotes: Vec<QuoteWire>,
    pub orders: Vec<OrderWire>,
    pub margins: MarginScheduleWire,
}

impl SnapshotDocument {
    pub fn from_collections(
        mode_marker: &str,
        users: HashMap<String, User>,
        products: HashMap<String, Product>,
        rfqs: HashMap<String, Rfq>,
        quotes: HashMap<String, Quote>,
        orders: HashMap<String, Order>,
        margins: MarginSchedule,
    ) -> Self {
        let mut document = Self {
            mode: mode_marker.to_string(),
            users: users.into_values().map(Into::into).collect(),
            products: products.into_values().map(Into::into).collect(),
            rfqs: rfqs.into_values().map(Into::into).collect(),
            quotes: quotes.into_values().map(Into::into).collect(),
            orders: orders.into_values().map(Into::into).collect(),
            margins: margins.into(),
        };
        // stable ordering keeps snapshots diffable
        document.users.sort_by(|a, b| a.id.cmp(&b.id));
        document.products.sort_by(|a, b| a.id.cmp(&b.id));
        document.rfqs.sort_by(|a, b| a.id.cmp(&b.id));
        document.quotes.sort_by(|a, b| a.id.cmp(&b.id));
        document.orders.sort_by(|a, b| a.id.cmp(&b.id));
        document
    }

    #[allow(clippy::type_complexity)]
    pub fn into_collections(
        self,
    ) -> (
        HashMap<String, User>,
        HashMap<String, Product>,
        HashMap<String, Rfq>,
        HashMap<String, Quote>,
        HashMap<String, Order>,
        MarginSchedule,
    ) {
        let users = self
            .users
            .into_iter()
            .map(|wire| (wire.id.clone(), User::from(wire)))
            .collect();
        let products = self
            .products
            .into_iter()
            .map(|wire| (wire.id.clone(), Product::from(wire)))
            .collect();
        let rfqs =
            self.rfqs.into_iter().map(|wire| (wire.id.clone(), Rfq::from(wire))).collect();
        let quotes =
            self.quotes.into_iter().map(|wire| (wire.id.clone(), Quote::from(wire))).collect();
        let orders =
            self.orders.into_iter().map(|wire| (wire.id.clone(), Order::from(wire))).collect();
        (users, products, rfqs, quotes, orders, self.margins.into())
    }
}

/// Writes the snapshot document to its single backing file.
pub fn persist(path: &Path, document: &SnapshotDocument) -> Result<(), GatewayError> {
    let serialized = serde_json::to_string_pretty(document)
        .map_err(|err| GatewayError::Decode(err.to_string()))?;
    fs::write(path, serialized).map_err(|err| GatewayError::Snapshot(err.to_string()))
}

/// Loads a snapshot if one exists and its mode marker matches the current
/// configuration. A mismatched marker discards the snapshot (with a warning)
/// rather than loading records shaped for the other mode.
pub fn load(path: &Path, expected_mode: StoreMode) -> Result<Option<SnapshotDocument>, GatewayError> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(path).map_err(|err| GatewayError::Snapshot(err.to_string()))?;
    let document: SnapshotDocument =
        serde_json::from_str(&raw).map_err(|err| GatewayError::Decode(err.to_string()))?;

    if document.mode != expected_mode.marker() {
        warn!(
            event_name = "snapshot.mode_mismatch",
            stored_mode = %document.mode,
            expected_mode = %expected_mode.marker(),
            path = %path.display(),
            "discarding snapshot recorded under a different store mode"
        );
        return Ok(None);
    }

    Ok(Some(document))
}
