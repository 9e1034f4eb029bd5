//! Application Layer
//!
//! Orchestrates the engine with its external collaborators:
//!
//! - **Ports**: market data the engine consumes
//! - **Use Cases**: fetch inputs, run the engine

pub mod ports;
pub mod use_cases;

pub use ports::*;
pub use use_cases::*;
