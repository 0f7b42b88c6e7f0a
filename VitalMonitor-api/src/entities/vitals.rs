use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use vital_monitor_domain::{AlertPolicy, Threshold, ThresholdTable, VerdictMap, VitalKind};

/// One vital's verdict as returned to API clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct VitalVerdict {
    /// Which vital was evaluated
    pub vital: VitalKind,

    /// Whether the reading is inside the safe range
    pub within_range: bool,
}

/// Convert a domain verdict map into an ordered list
pub fn convert_to_public_verdicts(verdicts: &VerdictMap) -> Vec<VitalVerdict> {
    verdicts
        .iter()
        .map(|(vital, within_range)| VitalVerdict { vital, within_range })
        .collect()
}

/// Response for the pure evaluation endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EvaluationResponse {
    /// True when every vital is within range
    pub all_within_range: bool,

    /// Verdicts in evaluation order (temperature, pulse rate, SpO2)
    pub verdicts: Vec<VitalVerdict>,
}

/// Response for the alerting check endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckResponse {
    /// Aggregate decision under the active alert policy
    pub safe: bool,

    /// Vitals an alert was raised for, in the order they were raised
    pub alerted: Vec<VitalKind>,

    /// Policy that decided which alerts were raised
    pub policy: AlertPolicy,

    /// Full verdicts, for callers that need per-vital detail
    pub verdicts: Vec<VitalVerdict>,

    /// When the check completed
    pub checked_at: chrono::DateTime<chrono::Utc>,
}

/// The active threshold table
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ThresholdsResponse {
    /// Safe range per vital, keyed by vital name, in evaluation order
    #[schema(value_type = Object)]
    pub thresholds: IndexMap<String, Threshold>,

    /// Aggregation policy in effect
    pub policy: AlertPolicy,
}

impl ThresholdsResponse {
    pub fn new(table: &ThresholdTable, policy: AlertPolicy) -> Self {
        Self {
            thresholds: VitalKind::ALL
                .into_iter()
                .map(|vital| (vital.as_str().to_string(), table.bounds_for(vital)))
                .collect(),
            policy,
        }
    }
}
