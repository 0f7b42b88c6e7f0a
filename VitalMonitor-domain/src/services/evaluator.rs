use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use crate::entities::thresholds::ThresholdTable;
use crate::entities::vitals::{AlertEvent, Reading, VerdictMap, VitalKind};
use crate::services::alert::AlertSignaler;

/// How a sample with several out-of-range vitals is reported
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum AlertPolicy {
    /// Alert on the first failing vital in evaluation order and stop
    #[default]
    FirstFailure,

    /// Alert on every failing vital, in evaluation order
    AllFailures,
}

impl FromStr for AlertPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "first_failure" => Ok(AlertPolicy::FirstFailure),
            "all_failures" => Ok(AlertPolicy::AllFailures),
            other => Err(format!("expected one of first_failure, all_failures; got {}", other)),
        }
    }
}

impl fmt::Display for AlertPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertPolicy::FirstFailure => write!(f, "first_failure"),
            AlertPolicy::AllFailures => write!(f, "all_failures"),
        }
    }
}

/// Result of checking one sample under the active policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleOutcome {
    /// True when every vital is within range
    pub safe: bool,

    /// Vitals an alert was raised for, in the order they were raised
    pub alerted: Vec<VitalKind>,
}

/// Evaluates readings against a fixed threshold table and signals violations
pub struct VitalsEvaluator<S: AlertSignaler> {
    thresholds: ThresholdTable,
    signaler: S,
    policy: AlertPolicy,
}

impl<S: AlertSignaler> VitalsEvaluator<S> {
    /// Create an evaluator using the first-failure policy
    pub fn new(thresholds: ThresholdTable, signaler: S) -> Self {
        Self {
            thresholds,
            signaler,
            policy: AlertPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: AlertPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn thresholds(&self) -> &ThresholdTable {
        &self.thresholds
    }

    pub fn policy(&self) -> AlertPolicy {
        self.policy
    }

    pub fn signaler(&self) -> &S {
        &self.signaler
    }

    /// Whether a single value lies inside the vital's inclusive range
    pub fn is_within_range(&self, vital: VitalKind, value: f64) -> bool {
        self.thresholds.bounds_for(vital).contains(value)
    }

    /// Verdict for every vital. Never alerts.
    pub fn evaluate_sample(&self, reading: &Reading) -> VerdictMap {
        let mut verdicts = VerdictMap::default();
        for vital in VitalKind::ALL {
            let ok = self.is_within_range(vital, reading.value_of(vital));
            debug!(vital = %vital, value = reading.value_of(vital), ok, "Vital evaluated");
            verdicts.record(vital, ok);
        }
        verdicts
    }

    /// Check a sample, raising alerts as the policy dictates.
    ///
    /// Under [`AlertPolicy::FirstFailure`] evaluation stops at the first
    /// failing vital, so at most one alert is raised per call.
    pub fn check_sample(&self, reading: &Reading) -> SampleOutcome {
        let mut alerted = Vec::new();

        for vital in VitalKind::ALL {
            let value = reading.value_of(vital);
            if self.is_within_range(vital, value) {
                continue;
            }

            warn!(vital = %vital, value, policy = %self.policy, "Vital out of range");
            self.signaler.raise_alert(&AlertEvent::for_vital(vital));
            alerted.push(vital);

            if self.policy == AlertPolicy::FirstFailure {
                break;
            }
        }

        SampleOutcome {
            safe: alerted.is_empty(),
            alerted,
        }
    }

    /// True when every vital is within range; alerts otherwise
    pub fn sample_is_safe(&self, reading: &Reading) -> bool {
        self.check_sample(reading).safe
    }
}

impl<S: AlertSignaler> fmt::Debug for VitalsEvaluator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VitalsEvaluator")
            .field("thresholds", &self.thresholds)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

pub(crate) fn log_created(thresholds: &ThresholdTable, policy: AlertPolicy) {
    info!(
        temperature = ?thresholds.bounds_for(VitalKind::Temperature),
        pulse_rate = ?thresholds.bounds_for(VitalKind::PulseRate),
        spo2 = ?thresholds.bounds_for(VitalKind::Spo2),
        policy = %policy,
        "Vitals evaluator created"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::thresholds::Threshold;
    use crate::services::alert::MockAlertSignaler;

    fn evaluator_with(mock: MockAlertSignaler) -> VitalsEvaluator<MockAlertSignaler> {
        VitalsEvaluator::new(ThresholdTable::default(), mock)
    }

    fn silent() -> VitalsEvaluator<MockAlertSignaler> {
        let mut mock = MockAlertSignaler::new();
        mock.expect_raise_alert().times(0);
        evaluator_with(mock)
    }

    fn expecting(vital: VitalKind, message: &'static str) -> VitalsEvaluator<MockAlertSignaler> {
        let mut mock = MockAlertSignaler::new();
        mock.expect_raise_alert()
            .withf(move |event| event.vital == vital && event.message.contains(message))
            .times(1)
            .return_const(());
        evaluator_with(mock)
    }

    #[test]
    fn test_temperature_range() {
        let evaluator = silent();
        assert!(evaluator.is_within_range(VitalKind::Temperature, 95.0));
        assert!(evaluator.is_within_range(VitalKind::Temperature, 102.0));
        assert!(evaluator.is_within_range(VitalKind::Temperature, 98.6));
        assert!(!evaluator.is_within_range(VitalKind::Temperature, 94.999));
        assert!(!evaluator.is_within_range(VitalKind::Temperature, 102.001));
        assert!(!evaluator.is_within_range(VitalKind::Temperature, 94.9));
        assert!(!evaluator.is_within_range(VitalKind::Temperature, 102.1));
    }

    #[test]
    fn test_pulse_rate_range() {
        let evaluator = silent();
        assert!(evaluator.is_within_range(VitalKind::PulseRate, 60.0));
        assert!(evaluator.is_within_range(VitalKind::PulseRate, 100.0));
        assert!(evaluator.is_within_range(VitalKind::PulseRate, 75.0));
        assert!(!evaluator.is_within_range(VitalKind::PulseRate, 59.0));
        assert!(!evaluator.is_within_range(VitalKind::PulseRate, 101.0));
    }

    #[test]
    fn test_spo2_range() {
        let evaluator = silent();
        assert!(evaluator.is_within_range(VitalKind::Spo2, 90.0));
        assert!(evaluator.is_within_range(VitalKind::Spo2, 100.0));
        assert!(!evaluator.is_within_range(VitalKind::Spo2, 89.0));
        assert!(!evaluator.is_within_range(VitalKind::Spo2, 0.0));
    }

    #[test]
    fn test_range_sweep_matches_closed_intervals() {
        let evaluator = silent();
        for tenth in 900..=1100 {
            let t = f64::from(tenth) / 10.0;
            assert_eq!(
                evaluator.is_within_range(VitalKind::Temperature, t),
                (95.0..=102.0).contains(&t),
                "temperature {}",
                t
            );
        }
        for p in 0..=250 {
            assert_eq!(
                evaluator.is_within_range(VitalKind::PulseRate, f64::from(p)),
                (60..=100).contains(&p),
                "pulse {}",
                p
            );
        }
        for s in 0..=100 {
            assert_eq!(evaluator.is_within_range(VitalKind::Spo2, f64::from(s)), s >= 90, "spo2 {}", s);
        }
    }

    #[test]
    fn test_evaluate_sample_all_ok() {
        let verdicts = silent().evaluate_sample(&Reading::new(98.6, 75, 98));
        assert!(verdicts.all_within_range());
        assert_eq!(
            verdicts.iter().map(|(vital, _)| vital).collect::<Vec<_>>(),
            VitalKind::ALL.to_vec()
        );
    }

    #[test]
    fn test_evaluate_sample_single_failures() {
        let evaluator = silent();

        let verdicts = evaluator.evaluate_sample(&Reading::new(103.0, 75, 98));
        assert_eq!(verdicts.get(VitalKind::Temperature), Some(false));
        assert_eq!(verdicts.get(VitalKind::PulseRate), Some(true));
        assert_eq!(verdicts.get(VitalKind::Spo2), Some(true));

        let verdicts = evaluator.evaluate_sample(&Reading::new(98.6, 55, 98));
        assert_eq!(verdicts.failing(), vec![VitalKind::PulseRate]);

        let verdicts = evaluator.evaluate_sample(&Reading::new(98.6, 75, 89));
        assert_eq!(verdicts.failing(), vec![VitalKind::Spo2]);
    }

    #[test]
    fn test_evaluate_sample_never_alerts_on_multiple_failures() {
        let verdicts = silent().evaluate_sample(&Reading::new(103.0, 55, 89));
        assert_eq!(verdicts.failing(), VitalKind::ALL.to_vec());
    }

    #[test]
    fn test_safe_sample_raises_nothing() {
        assert!(silent().sample_is_safe(&Reading::new(98.6, 75, 98)));
        assert!(silent().sample_is_safe(&Reading::new(98.1, 70, 98)));
    }

    #[test]
    fn test_high_temperature_alerts() {
        let evaluator = expecting(VitalKind::Temperature, "Temperature critical!");
        assert!(!evaluator.sample_is_safe(&Reading::new(103.0, 75, 98)));
    }

    #[test]
    fn test_low_pulse_alerts() {
        let evaluator = expecting(VitalKind::PulseRate, "Pulse Rate is out of range!");
        assert!(!evaluator.sample_is_safe(&Reading::new(98.6, 55, 98)));
    }

    #[test]
    fn test_low_spo2_alerts() {
        let evaluator = expecting(VitalKind::Spo2, "Oxygen Saturation out of range!");
        assert!(!evaluator.sample_is_safe(&Reading::new(98.6, 75, 85)));
    }

    #[test]
    fn test_first_failure_policy_raises_exactly_one_alert() {
        let evaluator = expecting(VitalKind::Temperature, "Temperature critical!");
        let outcome = evaluator.check_sample(&Reading::new(103.0, 55, 85));
        assert!(!outcome.safe);
        assert_eq!(outcome.alerted, vec![VitalKind::Temperature]);
    }

    #[test]
    fn test_first_failure_follows_evaluation_order() {
        // Pulse and SpO2 both fail; pulse is evaluated first
        let evaluator = expecting(VitalKind::PulseRate, "Pulse Rate is out of range!");
        assert!(!evaluator.sample_is_safe(&Reading::new(99.0, 102, 70)));
    }

    #[test]
    fn test_all_failures_policy_alerts_each_in_order() {
        let mut seq = mockall::Sequence::new();
        let mut mock = MockAlertSignaler::new();
        for vital in VitalKind::ALL {
            mock.expect_raise_alert()
                .withf(move |event| event.vital == vital)
                .times(1)
                .in_sequence(&mut seq)
                .return_const(());
        }

        let evaluator = evaluator_with(mock).with_policy(AlertPolicy::AllFailures);
        let outcome = evaluator.check_sample(&Reading::new(103.0, 55, 85));
        assert!(!outcome.safe);
        assert_eq!(outcome.alerted, VitalKind::ALL.to_vec());
    }

    #[test]
    fn test_all_failures_policy_skips_passing_vitals() {
        let evaluator = expecting(VitalKind::Spo2, "Oxygen Saturation out of range!")
            .with_policy(AlertPolicy::AllFailures);
        let outcome = evaluator.check_sample(&Reading::new(98.6, 75, 85));
        assert_eq!(outcome.alerted, vec![VitalKind::Spo2]);
    }

    #[test]
    fn test_custom_thresholds_are_honoured() {
        let table = ThresholdTable::new(
            Threshold::between(96.0, 100.0),
            Threshold::between(50.0, 110.0),
            Threshold::at_least(94.0),
        )
        .unwrap();

        let mut mock = MockAlertSignaler::new();
        mock.expect_raise_alert()
            .withf(|event| event.vital == VitalKind::Spo2)
            .times(1)
            .return_const(());

        let evaluator = VitalsEvaluator::new(table, mock);
        assert!(evaluator.is_within_range(VitalKind::PulseRate, 55.0));
        assert!(!evaluator.is_within_range(VitalKind::Temperature, 101.0));
        assert!(!evaluator.sample_is_safe(&Reading::new(98.6, 55, 92)));
    }

    #[test]
    fn test_nan_temperature_is_not_safe() {
        let evaluator = expecting(VitalKind::Temperature, "Temperature critical!");
        assert!(!evaluator.sample_is_safe(&Reading::new(f64::NAN, 75, 98)));
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("first_failure".parse::<AlertPolicy>(), Ok(AlertPolicy::FirstFailure));
        assert_eq!("All_Failures".parse::<AlertPolicy>(), Ok(AlertPolicy::AllFailures));
        assert!("every".parse::<AlertPolicy>().is_err());
        assert_eq!(AlertPolicy::AllFailures.to_string(), "all_failures");
    }
}
