//! Market data adapters.

mod in_memory;
mod snapshot;

pub use in_memory::InMemoryMarketData;
pub use snapshot::{MarketSnapshot, SnapshotError, SnapshotMarketData};
