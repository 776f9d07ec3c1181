pub mod fixtures;
pub mod gateway;
pub mod snapshot;
pub mod wire;
pub mod workflow;

pub use gateway::{GatewayError, InMemoryGateway, PersistenceGateway, QuoteFilter, RemoteGateway};
pub use snapshot::SnapshotDocument;
pub use workflow::{Acceptance, WorkflowStore};
