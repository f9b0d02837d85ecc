pub mod pipeline;
pub mod validate;

pub use pipeline::{Analysis, AnalysisStatus, Pipeline};
pub use validate::{parse_candles, validate_candles};
