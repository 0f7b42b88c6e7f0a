use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

/// The physiological signals monitored at the bedside
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum VitalKind {
    /// Body temperature in degrees Fahrenheit
    Temperature,

    /// Pulse rate in beats per minute
    PulseRate,

    /// Blood oxygen saturation as a percentage
    Spo2,
}

impl VitalKind {
    /// Every vital, in evaluation order
    pub const ALL: [VitalKind; 3] = [VitalKind::Temperature, VitalKind::PulseRate, VitalKind::Spo2];

    /// Machine-readable name, matching the serde representation
    pub fn as_str(self) -> &'static str {
        match self {
            VitalKind::Temperature => "temperature",
            VitalKind::PulseRate => "pulse_rate",
            VitalKind::Spo2 => "spo2",
        }
    }

    /// Human-readable name
    pub fn label(self) -> &'static str {
        match self {
            VitalKind::Temperature => "Temperature",
            VitalKind::PulseRate => "Pulse Rate",
            VitalKind::Spo2 => "Oxygen Saturation",
        }
    }

    /// Operator-facing text shown when this vital is out of range
    pub fn alert_message(self) -> &'static str {
        match self {
            VitalKind::Temperature => "Temperature critical!",
            VitalKind::PulseRate => "Pulse Rate is out of range!",
            VitalKind::Spo2 => "Oxygen Saturation out of range!",
        }
    }
}

impl fmt::Display for VitalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VitalKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VitalKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("Unknown vital: {}", s))
    }
}

/// One simultaneous sample of all monitored vitals
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct Reading {
    /// Body temperature (°F)
    pub temperature: f64,

    /// Pulse rate (beats per minute)
    pub pulse_rate: i32,

    /// Oxygen saturation (%)
    pub spo2: i32,
}

impl Reading {
    pub fn new(temperature: f64, pulse_rate: i32, spo2: i32) -> Self {
        Self { temperature, pulse_rate, spo2 }
    }

    /// The measured value for a single vital, widened for comparison against its threshold
    pub fn value_of(&self, vital: VitalKind) -> f64 {
        match vital {
            VitalKind::Temperature => self.temperature,
            VitalKind::PulseRate => f64::from(self.pulse_rate),
            VitalKind::Spo2 => f64::from(self.spo2),
        }
    }
}

/// Per-vital "within range" results, kept in evaluation order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct VerdictMap {
    verdicts: IndexMap<VitalKind, bool>,
}

impl VerdictMap {
    pub(crate) fn record(&mut self, vital: VitalKind, within_range: bool) {
        self.verdicts.insert(vital, within_range);
    }

    /// Verdict for a vital, if it was evaluated
    pub fn get(&self, vital: VitalKind) -> Option<bool> {
        self.verdicts.get(&vital).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (VitalKind, bool)> + '_ {
        self.verdicts.iter().map(|(vital, ok)| (*vital, *ok))
    }

    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }

    /// True when every evaluated vital is within its safe range
    pub fn all_within_range(&self) -> bool {
        self.verdicts.values().all(|ok| *ok)
    }

    /// Vitals that failed, in evaluation order
    pub fn failing(&self) -> Vec<VitalKind> {
        self.iter().filter(|(_, ok)| !ok).map(|(vital, _)| vital).collect()
    }
}

/// A single out-of-range condition handed to an alert signaler
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertEvent {
    pub vital: VitalKind,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

impl AlertEvent {
    pub fn for_vital(vital: VitalKind) -> Self {
        Self {
            vital,
            message: vital.alert_message().to_string(),
            raised_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vital_kind_order() {
        assert_eq!(
            VitalKind::ALL,
            [VitalKind::Temperature, VitalKind::PulseRate, VitalKind::Spo2]
        );
    }

    #[test]
    fn test_vital_kind_names_round_trip() {
        for kind in VitalKind::ALL {
            assert_eq!(kind.as_str().parse::<VitalKind>(), Ok(kind));
            assert_eq!(
                serde_json::to_value(kind).unwrap(),
                serde_json::Value::String(kind.to_string())
            );
        }
        assert!("blood_pressure".parse::<VitalKind>().is_err());
    }

    #[test]
    fn test_alert_messages() {
        assert_eq!(VitalKind::Temperature.alert_message(), "Temperature critical!");
        assert_eq!(VitalKind::PulseRate.alert_message(), "Pulse Rate is out of range!");
        assert_eq!(VitalKind::Spo2.alert_message(), "Oxygen Saturation out of range!");
    }

    #[test]
    fn test_reading_value_of() {
        let reading = Reading::new(98.6, 75, 98);
        assert_eq!(reading.value_of(VitalKind::Temperature), 98.6);
        assert_eq!(reading.value_of(VitalKind::PulseRate), 75.0);
        assert_eq!(reading.value_of(VitalKind::Spo2), 98.0);
    }

    #[test]
    fn test_verdict_map_keeps_insertion_order() {
        let mut verdicts = VerdictMap::default();
        verdicts.record(VitalKind::Temperature, false);
        verdicts.record(VitalKind::PulseRate, true);
        verdicts.record(VitalKind::Spo2, false);

        assert_eq!(verdicts.len(), 3);
        assert!(!verdicts.all_within_range());
        assert_eq!(verdicts.failing(), vec![VitalKind::Temperature, VitalKind::Spo2]);

        let json = serde_json::to_string(&verdicts).unwrap();
        assert_eq!(json, r#"{"temperature":false,"pulse_rate":true,"spo2":false}"#);
    }

    #[test]
    fn test_alert_event_for_vital() {
        let event = AlertEvent::for_vital(VitalKind::PulseRate);
        assert_eq!(event.vital, VitalKind::PulseRate);
        assert_eq!(event.message, "Pulse Rate is out of range!");
    }
}
