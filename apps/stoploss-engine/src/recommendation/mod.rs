//! Recommendation pipeline: engine entry point, assembler and display.

mod assembler;
pub mod display;
mod engine;

pub use assembler::RecommendationAssembler;
pub use display::{DisplaySection, RiskWarning, SectionKind, WarningKind};
pub use engine::{RecommendationRequest, StopLossEngine};
