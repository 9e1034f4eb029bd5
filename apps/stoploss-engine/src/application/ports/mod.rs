//! Application Ports (Driven)
//!
//! Interfaces the application uses to reach external systems.

mod market_data_port;

pub use market_data_port::{ContractQuery, MarketDataPort};
