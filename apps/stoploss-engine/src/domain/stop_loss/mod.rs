//! Stop-loss decision: horizon classification, candidate generation,
//! precedence, buffer caps and the terminal result types.

mod buffer_policy;
mod candidates;
mod horizon;
mod resolver;
mod result;

pub use buffer_policy::{BufferPolicy, CapCheck};
pub use candidates::{BasisKind, CandidateGenerator, MarketSignals, StopLossCandidate};
pub use horizon::{RequestedHorizon, TradeHorizon};
pub use resolver::{PrecedenceResolver, Resolution};
pub use result::{RecommendationSet, StopLossResult};
