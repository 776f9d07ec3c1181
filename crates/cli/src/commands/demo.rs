use std::sync::Arc;

use rust_decimal::Decimal;

use crate::commands::CommandResult;
use sourcedesk_core::domain::product::ProductId;
use sourcedesk_core::domain::rfq::RfqItem;
use sourcedesk_core::domain::user::UserId;
use sourcedesk_core::errors::WorkflowError;
use sourcedesk_store::fixtures::{self, CLIENT_ID, PRODUCT_STEEL_COIL, SUPPLIER_METALS_ID};
use sourcedesk_store::workflow::WorkflowStore;

pub fn run() -> CommandResult {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "demo",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    let result = runtime.block_on(async {
        let gateway = fixtures::demo_gateway().await.map_err(|error| {
            CommandResult::failure("demo", "seed_execution", error.to_string(), 4)
        })?;
        let store = WorkflowStore::new(Arc::new(gateway));

        run_flow(&store).await.map_err(|error| {
            CommandResult::failure_with_hint(
                "demo",
                "workflow",
                error.to_string(),
                error.user_message(),
                5,
            )
        })
    });

    match result {
        Ok(lines) => CommandResult::success("demo", lines.join("\n")),
        Err(result) => result,
    }
}

/// Walks one RFQ through quoting, admin pricing, and acceptance, narrating
/// each step.
async fn run_flow(store: &WorkflowStore) -> Result<Vec<String>, WorkflowError> {
    let mut lines = Vec::new();

    let rfq = store
        .submit_rfq(
            UserId(CLIENT_ID.to_string()),
            vec![RfqItem {
                product_id: ProductId(PRODUCT_STEEL_COIL.to_string()),
                quantity: 10,
                notes: None,
            }],
        )
        .await?;
    lines.push(format!("1. client submitted rfq {} (10x steel coil)", rfq.id.0));

    let quote = store
        .submit_quote(
            rfq.id.clone(),
            UserId(SUPPLIER_METALS_ID.to_string()),
            Decimal::new(1000, 0),
        )
        .await?;
    lines.push(format!("2. supplier quoted {} at 1000", quote.id.0));

    let quote = store.set_margin_override(&quote.id, Decimal::new(10, 0)).await?;
    let resolution = store.resolve_margin_for(&quote.id).await?;
    lines.push(format!(
        "3. admin pinned a 10% manual margin ({} wins over the schedule)",
        resolution.source
    ));

    let quote = store.send_quote(&quote.id).await?;
    let final_price = quote.final_price.unwrap_or_default();
    lines.push(format!("4. quote sent to client at final price {final_price}"));

    let acceptance = store.accept_quote(&quote.id).await?;
    lines.push(format!(
        "5. client accepted; order {} materialized for {}",
        acceptance.order.id.0, acceptance.order.amount
    ));

    let rfq = store
        .rfq(&rfq.id)
        .await?
        .ok_or_else(|| WorkflowError::not_found("rfq", rfq.id.0.clone()))?;
    lines.push(format!("6. rfq is now {:?}; sibling quotes would remain untouched", rfq.status));

    Ok(lines)
}
