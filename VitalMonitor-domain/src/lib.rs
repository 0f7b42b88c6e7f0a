// VitalMonitor Domain
// This crate contains the range-evaluation and alerting engine

// Vital entities and the threshold table
pub mod entities;

// Evaluation and alert signaling
pub mod services;

// Startup configuration
pub mod config;

// Testing utilities - only available with mock feature
#[cfg(feature = "mock")]
pub mod testing;

pub use config::{ConfigError, MonitorConfig};
pub use entities::{AlertEvent, Reading, Threshold, ThresholdTable, VerdictMap, VitalKind};
pub use services::{AlertPolicy, AlertSignaler, SampleOutcome, VitalsEvaluator};
