//! Application Use Cases

mod recommend_stop_loss;

pub use recommend_stop_loss::RecommendStopLossUseCase;
