use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::user::UserId;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub supplier_id: UserId,
    pub name: String,
    pub category: String,
    pub cost_price: Decimal,
    pub status: ProductStatus,
}

impl Product {
    /// Only admin-approved products are browsable and orderable by clients.
    pub fn is_orderable(&self) -> bool {
        self.status == ProductStatus::Approved
    }
}
