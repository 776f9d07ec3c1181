//! Deterministic demo fixtures: one approved client, two approved suppliers
//! with approved products, and a margin schedule with a category default that
//! diverges from the global default. Used by the CLI seed/demo commands and
//! the integration suite.

use rust_decimal::Decimal;

use sourcedesk_core::domain::product::{Product, ProductId, ProductStatus};
use sourcedesk_core::domain::user::{AccountStatus, KycStatus, Role, User, UserId};

use crate::gateway::{GatewayError, InMemoryGateway, PersistenceGateway};

pub const CLIENT_ID: &str = "user-client-globex";
pub const SUPPLIER_METALS_ID: &str = "user-supplier-acme";
pub const SUPPLIER_TEXTILES_ID: &str = "user-supplier-initech";
pub const ADMIN_ID: &str = "user-admin-platform";

pub const PRODUCT_STEEL_COIL: &str = "prod-steel-coil";
pub const PRODUCT_COTTON_BALE: &str = "prod-cotton-bale";
pub const PRODUCT_UNAPPROVED: &str = "prod-pending-alloy";

pub const GLOBAL_MARGIN_PERCENT: i64 = 15;
pub const METALS_MARGIN_PERCENT: i64 = 20;

fn user(id: &str, role: Role, company_name: &str) -> User {
    User {
        id: UserId(id.to_string()),
        role,
        company_name: company_name.to_string(),
        verified: true,
        status: AccountStatus::Approved,
        kyc_status: KycStatus::Verified,
    }
}

fn product(
    id: &str,
    supplier_id: &str,
    name: &str,
    category: &str,
    cost_cents: i64,
    status: ProductStatus,
) -> Product {
    Product {
        id: ProductId(id.to_string()),
        supplier_id: UserId(supplier_id.to_string()),
        name: name.to_string(),
        category: category.to_string(),
        cost_price: Decimal::new(cost_cents, 2),
        status,
    }
}

/// Seeds the demo dataset into a fresh in-memory gateway.
pub async fn demo_gateway() -> Result<InMemoryGateway, GatewayError> {
    let gateway = InMemoryGateway::new();

    gateway.upsert_user(user(ADMIN_ID, Role::Admin, "Sourcedesk Platform")).await?;
    gateway.upsert_user(user(CLIENT_ID, Role::Client, "Globex Manufacturing")).await?;
    gateway.upsert_user(user(SUPPLIER_METALS_ID, Role::Supplier, "Acme Metals")).await?;
    gateway.upsert_user(user(SUPPLIER_TEXTILES_ID, Role::Supplier, "Initech Textiles")).await?;

    gateway
        .upsert_product(product(
            PRODUCT_STEEL_COIL,
            SUPPLIER_METALS_ID,
            "Cold-rolled steel coil",
            "Metals",
            85_000,
            ProductStatus::Approved,
        ))
        .await?;
    gateway
        .upsert_product(product(
            PRODUCT_COTTON_BALE,
            SUPPLIER_TEXTILES_ID,
            "Combed cotton bale",
            "Textiles",
            42_000,
            ProductStatus::Approved,
        ))
        .await?;
    gateway
        .upsert_product(product(
            PRODUCT_UNAPPROVED,
            SUPPLIER_METALS_ID,
            "Experimental alloy sheet",
            "Metals",
            120_000,
            ProductStatus::Pending,
        ))
        .await?;

    gateway.update_margin_setting(None, Decimal::new(GLOBAL_MARGIN_PERCENT, 0)).await?;
    gateway
        .update_margin_setting(Some("Metals".to_string()), Decimal::new(METALS_MARGIN_PERCENT, 0))
        .await?;

    Ok(gateway)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use sourcedesk_core::domain::product::ProductId;
    use sourcedesk_core::domain::user::UserId;

    use crate::gateway::PersistenceGateway;

    use super::{demo_gateway, CLIENT_ID, PRODUCT_STEEL_COIL};

    #[tokio::test]
    async fn demo_dataset_is_seeded_and_deterministic() {
        let gateway = demo_gateway().await.expect("seed demo dataset");

        let client = gateway
            .get_user(&UserId(CLIENT_ID.to_string()))
            .await
            .expect("lookup client")
            .expect("client exists");
        assert!(client.can_transact());

        let steel = gateway
            .get_product(&ProductId(PRODUCT_STEEL_COIL.to_string()))
            .await
            .expect("lookup product")
            .expect("product exists");
        assert!(steel.is_orderable());
        assert_eq!(steel.category, "Metals");

        let schedule = gateway.margin_schedule().await.expect("schedule");
        assert_eq!(schedule.global_percent, Decimal::new(15, 0));
        assert_eq!(schedule.category_percent("Metals"), Some(Decimal::new(20, 0)));
    }
}
