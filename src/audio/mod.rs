pub mod segment;

pub use segment::{AudioSegment, TARGET_SAMPLE_RATE};
