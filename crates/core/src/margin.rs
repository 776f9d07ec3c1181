//! Three-tier margin resolution: a manual per-quote override wins over the
//! category default, which wins over the platform-wide global default.

use std::collections::BTreeMap;
use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::domain::product::Product;
use crate::domain::quote::MarginAssignment;
use crate::domain::rfq::Rfq;
use crate::errors::DomainError;

/// Sentinel category used when a quote's RFQ has no items or its first item
/// points at a product we cannot find. Flows through the same precedence
/// chain as any real category.
pub const FALLBACK_CATEGORY: &str = "General";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarginSource {
    Manual,
    Category(String),
    Global,
}

impl fmt::Display for MarginSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual => write!(f, "manual"),
            Self::Category(name) => write!(f, "category:{name}"),
            Self::Global => write!(f, "global"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginResolution {
    pub percent: Decimal,
    pub source: MarginSource,
}

/// Platform margin defaults: one global percent plus at most one percent per
/// category. The map representation makes the at-most-one-per-category
/// invariant structural.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarginSchedule {
    pub global_percent: Decimal,
    pub category_percents: BTreeMap<String, Decimal>,
}

impl MarginSchedule {
    pub fn new(global_percent: Decimal) -> Result<Self, DomainError> {
        ensure_percent(global_percent)?;
        Ok(Self { global_percent, category_percents: BTreeMap::new() })
    }

    pub fn set_global(&mut self, percent: Decimal) -> Result<(), DomainError> {
        ensure_percent(percent)?;
        self.global_percent = percent;
        Ok(())
    }

    pub fn set_category(
        &mut self,
        category: impl Into<String>,
        percent: Decimal,
    ) -> Result<(), DomainError> {
        ensure_percent(percent)?;
        self.category_percents.insert(category.into(), percent);
        Ok(())
    }

    pub fn clear_category(&mut self, category: &str) {
        self.category_percents.remove(category);
    }

    pub fn category_percent(&self, category: &str) -> Option<Decimal> {
        self.category_percents.get(category).copied()
    }
}

fn ensure_percent(percent: Decimal) -> Result<(), DomainError> {
    if percent < Decimal::ZERO {
        return Err(DomainError::Validation(format!(
            "margin percent must not be negative (got {percent})"
        )));
    }
    Ok(())
}

/// Resolves the effective markup for a quote. Total over all inputs: a
/// missing category entry falls to the global default, which always exists.
pub fn resolve_margin(
    assignment: &MarginAssignment,
    category: &str,
    schedule: &MarginSchedule,
) -> MarginResolution {
    if let MarginAssignment::Manual { percent } = assignment {
        return MarginResolution { percent: *percent, source: MarginSource::Manual };
    }

    if let Some(percent) = schedule.category_percent(category) {
        return MarginResolution {
            percent,
            source: MarginSource::Category(category.to_string()),
        };
    }

    MarginResolution { percent: schedule.global_percent, source: MarginSource::Global }
}

/// Client-facing price: `supplier_price * (1 + percent/100)`, rounded to two
/// decimals, midpoint away from zero. Recomputing from the same inputs is
/// idempotent.
pub fn final_price(supplier_price: Decimal, percent: Decimal) -> Decimal {
    (supplier_price * (Decimal::ONE + percent / Decimal::ONE_HUNDRED))
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Category of a quote, derived from the first item of its parent RFQ. The
/// caller resolves the product lookup; a missing item or dangling product
/// reference lands on [`FALLBACK_CATEGORY`].
pub fn category_of(rfq: &Rfq, first_item_product: Option<&Product>) -> String {
    match (rfq.items.first(), first_item_product) {
        (Some(_), Some(product)) => product.category.clone(),
        _ => FALLBACK_CATEGORY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal::Decimal;

    use crate::domain::product::{Product, ProductId, ProductStatus};
    use crate::domain::quote::MarginAssignment;
    use crate::domain::rfq::{Rfq, RfqId, RfqItem};
    use crate::domain::user::UserId;
    use crate::errors::DomainError;

    use super::{
        category_of, final_price, resolve_margin, MarginSchedule, MarginSource, FALLBACK_CATEGORY,
    };

    fn schedule() -> MarginSchedule {
        let mut schedule = MarginSchedule::new(Decimal::new(15, 0)).expect("valid global");
        schedule.set_category("Metals", Decimal::new(20, 0)).expect("valid category");
        schedule
    }

    #[test]
    fn manual_override_wins_over_everything() {
        let resolution = resolve_margin(
            &MarginAssignment::Manual { percent: Decimal::new(10, 0) },
            "Metals",
            &schedule(),
        );
        assert_eq!(resolution.percent, Decimal::new(10, 0));
        assert_eq!(resolution.source, MarginSource::Manual);
    }

    #[test]
    fn clearing_override_reverts_to_category_then_global() {
        let schedule = schedule();

        let category = resolve_margin(&MarginAssignment::Inherited, "Metals", &schedule);
        assert_eq!(category.percent, Decimal::new(20, 0));
        assert_eq!(category.source, MarginSource::Category("Metals".to_string()));

        let global = resolve_margin(&MarginAssignment::Inherited, "Textiles", &schedule);
        assert_eq!(global.percent, Decimal::new(15, 0));
        assert_eq!(global.source, MarginSource::Global);
    }

    #[test]
    fn source_renders_for_display() {
        assert_eq!(MarginSource::Manual.to_string(), "manual");
        assert_eq!(MarginSource::Category("Metals".to_string()).to_string(), "category:Metals");
        assert_eq!(MarginSource::Global.to_string(), "global");
    }

    #[test]
    fn negative_percent_is_rejected() {
        let mut schedule = schedule();
        let error =
            schedule.set_category("Metals", Decimal::new(-5, 0)).expect_err("negative percent");
        assert!(matches!(error, DomainError::Validation(_)));
        assert!(MarginSchedule::new(Decimal::new(-1, 0)).is_err());
    }

    #[test]
    fn price_derivation_matches_fixed_rounding() {
        // 1000 * 1.10 = 1100, 900 * 1.20 = 1080
        assert_eq!(
            final_price(Decimal::new(1000, 0), Decimal::new(10, 0)),
            Decimal::new(1100, 0)
        );
        assert_eq!(
            final_price(Decimal::new(900, 0), Decimal::new(20, 0)),
            Decimal::new(1080, 0)
        );
        // 10.01 * 1.125 = 11.26125 -> 11.26
        assert_eq!(
            final_price(Decimal::new(1001, 2), Decimal::new(125, 1)),
            Decimal::new(1126, 2)
        );
        // exact midpoint rounds away from zero: 10.02 * 1.125 = 11.2725 -> 11.28
        assert_eq!(
            final_price(Decimal::new(1002, 2), Decimal::new(125, 1)),
            Decimal::new(1128, 2)
        );
    }

    #[test]
    fn recomputation_does_not_drift() {
        let once = final_price(Decimal::new(99_999, 2), Decimal::new(1_750, 2));
        let twice = final_price(Decimal::new(99_999, 2), Decimal::new(1_750, 2));
        assert_eq!(once, twice);
        assert_eq!(once, once.round_dp_with_strategy(
            2,
            rust_decimal::RoundingStrategy::MidpointAwayFromZero,
        ));
    }

    #[test]
    fn category_falls_back_to_sentinel() {
        let rfq = Rfq::submit(
            RfqId("RFQ-1".to_string()),
            UserId("C-1".to_string()),
            vec![RfqItem {
                product_id: ProductId("steel-coil".to_string()),
                quantity: 1,
                notes: None,
            }],
            Utc::now(),
        )
        .expect("valid rfq");

        let product = Product {
            id: ProductId("steel-coil".to_string()),
            supplier_id: UserId("S-1".to_string()),
            name: "Steel coil".to_string(),
            category: "Metals".to_string(),
            cost_price: Decimal::new(900, 0),
            status: ProductStatus::Approved,
        };

        assert_eq!(category_of(&rfq, Some(&product)), "Metals");
        // dangling product reference
        assert_eq!(category_of(&rfq, None), FALLBACK_CATEGORY);
    }
}
