//! Infrastructure Layer
//!
//! Adapters implementing the application ports.

pub mod market_data;
