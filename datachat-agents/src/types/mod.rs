pub mod turn;

pub use turn::{ChartType, Turn, TurnState, VizRecommendation};
