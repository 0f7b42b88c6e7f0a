//! Monitor configuration
//!
//! The threshold table, aggregation policy and signaler are read once at
//! startup, from process environment variables (optionally seeded by a `.env`
//! file in the binary). Any invalid value is a [`ConfigError`]; nothing falls
//! back to a default silently.

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use crate::entities::thresholds::{Threshold, ThresholdTable};
use crate::entities::vitals::VitalKind;
use crate::services::alert::{BlinkPattern, SignalerKind};
use crate::services::evaluator::AlertPolicy;

/// Configuration integrity errors, fatal at startup
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A threshold entry is inconsistent
    #[error("Invalid threshold for {vital}: {reason}")]
    InvalidThreshold { vital: VitalKind, reason: String },

    /// A configuration variable could not be parsed
    #[error("Invalid value {value:?} for {key}: {reason}")]
    InvalidValue { key: String, value: String, reason: String },
}

/// Everything needed to build an evaluator
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorConfig {
    pub thresholds: ThresholdTable,
    pub policy: AlertPolicy,
    pub signaler: SignalerKind,
    pub blink_interval: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            thresholds: ThresholdTable::default(),
            policy: AlertPolicy::default(),
            signaler: SignalerKind::default(),
            blink_interval: BlinkPattern::default().interval,
        }
    }
}

impl MonitorConfig {
    /// Load from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ThresholdTable::default();

        let thresholds = ThresholdTable::new(
            threshold_from(&lookup, VitalKind::Temperature, defaults.bounds_for(VitalKind::Temperature))?,
            threshold_from(&lookup, VitalKind::PulseRate, defaults.bounds_for(VitalKind::PulseRate))?,
            threshold_from(&lookup, VitalKind::Spo2, defaults.bounds_for(VitalKind::Spo2))?,
        )?;

        let policy = parse_var::<AlertPolicy, _>(&lookup, "ALERT_POLICY")?.unwrap_or_default();
        let signaler = parse_var::<SignalerKind, _>(&lookup, "ALERT_SIGNALER")?.unwrap_or_default();
        let blink_interval = match parse_var::<u64, _>(&lookup, "ALERT_BLINK_INTERVAL_MS")? {
            // A zero hold would turn the blocking alert into a no-op
            Some(0) => {
                return Err(ConfigError::InvalidValue {
                    key: "ALERT_BLINK_INTERVAL_MS".to_string(),
                    value: "0".to_string(),
                    reason: "interval must be at least 1 ms; use ALERT_SIGNALER=log for a non-blocking alert"
                        .to_string(),
                })
            }
            Some(ms) => Duration::from_millis(ms),
            None => BlinkPattern::default().interval,
        };

        let config = Self { thresholds, policy, signaler, blink_interval };
        info!(
            policy = ?config.policy,
            signaler = ?config.signaler,
            blink_interval_ms = config.blink_interval.as_millis() as u64,
            "Monitor configuration loaded"
        );
        Ok(config)
    }
}

fn threshold_from<F>(lookup: &F, vital: VitalKind, default: Threshold) -> Result<Threshold, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let prefix = format!("VITALS_{}", vital.as_str().to_uppercase());

    let min = parse_var::<f64, _>(lookup, &format!("{}_MIN", prefix))?.unwrap_or(default.min);
    let max = match parse_var::<f64, _>(lookup, &format!("{}_MAX", prefix))? {
        Some(max) => Some(max),
        None => default.max,
    };

    let threshold = Threshold { min, max };
    if threshold != default {
        debug!(vital = %vital, min, max = ?max, "Threshold overridden");
    }
    Ok(threshold)
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => {
            let trimmed = raw.trim();
            trimmed.parse::<T>().map(Some).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw.clone(),
                reason: e.to_string(),
            })
        }
    }
}
