pub mod board;
pub mod export;
pub mod pipeline;
pub mod producer;
pub mod profile;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use board::{AppStatus, PulseBoard};
pub use pipeline::{normalize, normalize_with};
pub use producer::IntelligenceSource;
