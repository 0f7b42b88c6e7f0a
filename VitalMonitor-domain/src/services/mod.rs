pub mod alert;
pub mod evaluator;

// Domain services
// This module contains the evaluation and alerting logic.

use crate::config::MonitorConfig;

pub use alert::{AlertSignaler, BlinkPattern, BlinkSignaler, SignalerKind, TracingSignaler};
pub use evaluator::{AlertPolicy, SampleOutcome, VitalsEvaluator};

/// Evaluator type used by binaries: the signaler is chosen at startup
pub type DynEvaluator = VitalsEvaluator<Box<dyn AlertSignaler>>;

/// Build the signaler selected by the configuration
pub fn create_signaler(config: &MonitorConfig) -> Box<dyn AlertSignaler> {
    match config.signaler {
        SignalerKind::Blink => Box::new(BlinkSignaler::stdout(BlinkPattern {
            interval: config.blink_interval,
            ..BlinkPattern::default()
        })),
        SignalerKind::Log => Box::new(TracingSignaler),
    }
}

/// Build an evaluator from a loaded configuration
pub fn create_evaluator(config: &MonitorConfig) -> DynEvaluator {
    evaluator::log_created(&config.thresholds, config.policy);
    VitalsEvaluator::new(config.thresholds, create_signaler(config)).with_policy(config.policy)
}

/// Evaluator with the canonical thresholds, first-failure policy and a blinking stdout alert
pub fn create_default_evaluator() -> DynEvaluator {
    create_evaluator(&MonitorConfig::default())
}
