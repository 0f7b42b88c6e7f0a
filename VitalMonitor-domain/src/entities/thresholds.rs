use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

#[cfg(feature = "with-api")]
use utoipa::ToSchema;

use crate::config::ConfigError;
use crate::entities::vitals::VitalKind;

/// Inclusive safe range for a single vital
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
#[validate(schema(function = "validate_bounds"))]
pub struct Threshold {
    /// Lowest acceptable value (inclusive)
    pub min: f64,

    /// Highest acceptable value (inclusive); `None` means unbounded above
    pub max: Option<f64>,
}

impl Threshold {
    pub const fn between(min: f64, max: f64) -> Self {
        Self { min, max: Some(max) }
    }

    pub const fn at_least(min: f64) -> Self {
        Self { min, max: None }
    }

    /// Both ends are inclusive. NaN is never contained.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && self.max.map_or(true, |max| value <= max)
    }
}

fn validate_bounds(threshold: &Threshold) -> Result<(), ValidationError> {
    let fail = |code: &'static str, message: String| {
        let mut err = ValidationError::new(code);
        err.message = Some(Cow::Owned(message));
        err
    };

    if !threshold.min.is_finite() {
        return Err(fail("min_not_finite", format!("min must be finite, got {}", threshold.min)));
    }

    if let Some(max) = threshold.max {
        if !max.is_finite() {
            return Err(fail("max_not_finite", format!("max must be finite, got {}", max)));
        }
        if threshold.min > max {
            return Err(fail(
                "min_above_max",
                format!("min ({}) must not exceed max ({})", threshold.min, max),
            ));
        }
    }

    Ok(())
}

fn describe(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .map(|err| {
            err.message
                .as_ref()
                .map(|msg| msg.to_string())
                .unwrap_or_else(|| err.code.to_string())
        })
        .collect::<Vec<String>>()
        .join("; ")
}

/// Safe ranges for every vital. Built once, read-only afterwards.
///
/// There is one field per [`VitalKind`], so adding a vital without a range
/// fails to compile in [`ThresholdTable::bounds_for`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "with-api", derive(ToSchema))]
pub struct ThresholdTable {
    temperature: Threshold,
    pulse_rate: Threshold,
    spo2: Threshold,
}

impl ThresholdTable {
    /// Build a table, rejecting any inconsistent range
    pub fn new(temperature: Threshold, pulse_rate: Threshold, spo2: Threshold) -> Result<Self, ConfigError> {
        let table = Self { temperature, pulse_rate, spo2 };

        for vital in VitalKind::ALL {
            table
                .bounds_for(vital)
                .validate()
                .map_err(|errors| ConfigError::InvalidThreshold {
                    vital,
                    reason: describe(&errors),
                })?;
        }

        Ok(table)
    }

    pub fn bounds_for(&self, vital: VitalKind) -> Threshold {
        match vital {
            VitalKind::Temperature => self.temperature,
            VitalKind::PulseRate => self.pulse_rate,
            VitalKind::Spo2 => self.spo2,
        }
    }
}

impl Default for ThresholdTable {
    /// Adult clinical ranges: temperature 95–102 °F, pulse 60–100 bpm, SpO2 at least 90 %
    fn default() -> Self {
        Self {
            temperature: Threshold::between(95.0, 102.0),
            pulse_rate: Threshold::between(60.0, 100.0),
            spo2: Threshold::at_least(90.0),
        }
    }
}
