//! Option pricing at the stop level and theta decay projection.
//!
//! # Example
//!
//! ```ignore
//! use stoploss_engine::pricing::{OptionPriceProjector, PricingMethod};
//!
//! let projector = OptionPriceProjector::default();
//! let estimate = projector.price_at(&contract, 501.44, 0);
//! assert_eq!(estimate.method, PricingMethod::IntrinsicValue);
//! ```

pub mod black_scholes;
mod iv;
mod projector;
mod theta;

pub use iv::{IvError, IvSolver, IvSolverConfig};
pub use projector::{OptionPriceEstimate, OptionPriceProjector, PricingMethod};
pub use theta::{DecayInterval, ThetaProjection, ThetaProjector, ThetaStep};
