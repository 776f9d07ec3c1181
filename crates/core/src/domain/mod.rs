pub mod order;
pub mod product;
pub mod quote;
pub mod rfq;
pub mod user;
