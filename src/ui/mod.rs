/// Custom widgets drawn on an iced canvas
pub mod prediction_bars;

pub use prediction_bars::PredictionBars;
