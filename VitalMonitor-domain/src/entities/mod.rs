// Domain entities and value objects
pub mod thresholds;
pub mod vitals;

// Re-export common types for easier imports
pub use thresholds::{Threshold, ThresholdTable};
pub use vitals::{AlertEvent, Reading, VerdictMap, VitalKind};
