pub mod config;
pub mod domain;
pub mod errors;
pub mod margin;

pub use domain::order::{Order, OrderId, OrderStatus};
pub use domain::product::{Product, ProductId, ProductStatus};
pub use domain::quote::{MarginAssignment, Quote, QuoteId, QuoteStatus};
pub use domain::rfq::{Rfq, RfqId, RfqItem, RfqStatus};
pub use domain::user::{AccountStatus, KycStatus, Role, User, UserId};
pub use errors::{DomainError, WorkflowError};
pub use margin::{
    final_price, resolve_margin, MarginResolution, MarginSchedule, MarginSource, FALLBACK_CATEGORY,
};
