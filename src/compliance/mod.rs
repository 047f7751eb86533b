//! Compliance evaluation of measurements against regulatory rules
//!
//! This module is organized into submodules:
//! - `rules`: rule types and the standard catalog
//!
//! Verdicts are a pure function of `(value, unit, rule, margin)`. Besides
//! pass/fail, a measurement strictly above a minimum but within the warning
//! margin of it (10% by default) is reported as a warning. A value exactly on
//! the minimum is compliant.

pub mod rules;

pub use rules::{ComplianceRule, RuleCatalog, RuleId, Severity};

use std::fmt;

use crate::defaults;
use crate::measurement::{Measurement, MeasurementId, MeasurementKind};
use crate::units::{self, Unit};

/// Outcome of one rule; ordering is `Compliant < Warning < Violation`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ComplianceStatus {
    Compliant,
    Warning,
    Violation,
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComplianceStatus::Compliant => "compliant",
            ComplianceStatus::Warning => "warning",
            ComplianceStatus::Violation => "violation",
        };
        f.write_str(name)
    }
}

/// Result of one measurement against one rule
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComplianceCheck {
    pub rule_id: RuleId,
    pub measurement_id: MeasurementId,
    pub status: ComplianceStatus,
    /// Measured value in the rule's unit
    pub actual_value: f64,
    /// The bound that decided the status (the maximum when exceeded, else the minimum)
    pub required_value: f64,
    pub unit: Unit,
    pub severity: Severity,
}

/// Rule evaluator with a configurable warning margin
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Evaluator {
    warning_margin: f64,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self { warning_margin: defaults::WARNING_MARGIN }
    }
}

impl Evaluator {
    /// Evaluator with a custom margin; negative or non-finite margins become 0
    pub fn with_margin(warning_margin: f64) -> Self {
        let warning_margin = if warning_margin.is_finite() { warning_margin.max(0.0) } else { 0.0 };
        Self { warning_margin }
    }

    pub fn warning_margin(&self) -> f64 {
        self.warning_margin
    }

    /// Classify `actual` (already in the rule's unit)
    pub fn status(&self, actual: f64, rule: &ComplianceRule) -> ComplianceStatus {
        if actual < rule.min_value {
            return ComplianceStatus::Violation;
        }
        if let Some(max) = rule.max_value {
            if actual > max {
                return ComplianceStatus::Violation;
            }
        }
        // the floor itself passes; the band is (min, min * (1 + margin)]
        if actual > rule.min_value && actual <= rule.min_value * (1.0 + self.warning_margin) {
            ComplianceStatus::Warning
        } else {
            ComplianceStatus::Compliant
        }
    }

    /// Check one value against every rule that applies to `kind`, in rule order
    pub fn evaluate_value<'r>(
        &self,
        measurement_id: &MeasurementId,
        kind: MeasurementKind,
        value: f64,
        unit: Unit,
        rules: impl IntoIterator<Item = &'r ComplianceRule>,
    ) -> Vec<ComplianceCheck> {
        rules
            .into_iter()
            .filter(|rule| rule.applies_to == kind)
            .map(|rule| {
                let actual = units::convert(value, unit, rule.unit, kind.dimension());
                let status = self.status(actual, rule);
                let required_value = match rule.max_value {
                    Some(max) if actual > max => max,
                    _ => rule.min_value,
                };
                ComplianceCheck {
                    rule_id: rule.id.clone(),
                    measurement_id: measurement_id.clone(),
                    status,
                    actual_value: actual,
                    required_value,
                    unit: rule.unit,
                    severity: rule.severity,
                }
            })
            .collect()
    }

    pub fn evaluate<'r>(
        &self,
        measurement: &Measurement,
        rules: impl IntoIterator<Item = &'r ComplianceRule>,
    ) -> Vec<ComplianceCheck> {
        self.evaluate_value(measurement.id(), measurement.kind(), measurement.value(), measurement.unit(), rules)
    }
}

/// Evaluate with the default margin.
pub fn evaluate(measurement: &Measurement, rules: &[ComplianceRule]) -> Vec<ComplianceCheck> {
    Evaluator::default().evaluate(measurement, rules)
}

/// Pick the single check attached to a measurement.
///
/// Worst status wins, then highest severity; ties keep evaluation order.
pub fn most_severe(checks: Vec<ComplianceCheck>) -> Option<ComplianceCheck> {
    let mut best: Option<ComplianceCheck> = None;
    for check in checks {
        let replace = match &best {
            None => true,
            Some(b) => (check.status, check.severity) > (b.status, b.severity),
        };
        if replace {
            best = Some(check);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::MeasurementKind::{Area, Clearance, Distance};

    fn fire_lane() -> ComplianceRule {
        RuleCatalog::standard().get(&RuleId::from(rules::FIRE_LANE)).cloned().unwrap()
    }

    fn status_of(value: f64, unit: Unit, rule: &ComplianceRule) -> ComplianceStatus {
        let checks = Evaluator::default().evaluate_value(&"m".into(), rule.applies_to, value, unit, [rule]);
        assert_eq!(checks.len(), 1);
        checks[0].status
    }

    // ==================== thresholds ====================

    #[test]
    fn below_minimum_is_violation() {
        assert_eq!(status_of(3.0, Unit::Meters, &fire_lane()), ComplianceStatus::Violation);
    }

    #[test]
    fn exactly_minimum_is_compliant() {
        assert_eq!(status_of(3.66, Unit::Meters, &fire_lane()), ComplianceStatus::Compliant);
    }

    #[test]
    fn just_above_minimum_is_warning() {
        assert_eq!(status_of(3.67, Unit::Meters, &fire_lane()), ComplianceStatus::Warning);
    }

    #[test]
    fn warning_band_upper_edge() {
        let rule = fire_lane();
        let edge = rule.min_value * 1.1;
        assert_eq!(status_of(edge - 1e-6, Unit::Meters, &rule), ComplianceStatus::Warning);
        assert_eq!(status_of(edge + 1e-6, Unit::Meters, &rule), ComplianceStatus::Compliant);
        assert_eq!(status_of(5.0, Unit::Meters, &rule), ComplianceStatus::Compliant);
    }

    #[test]
    fn maximum_is_enforced() {
        let rule = ComplianceRule::new("ramp", "Ramp run", Distance, 1.0, Unit::Meters, Severity::Low).with_max(9.0);
        assert_eq!(status_of(9.5, Unit::Meters, &rule), ComplianceStatus::Violation);
        assert_eq!(status_of(8.0, Unit::Meters, &rule), ComplianceStatus::Compliant);

        let checks = Evaluator::default().evaluate_value(&"m".into(), Distance, 9.5, Unit::Meters, [&rule]);
        assert_eq!(checks[0].required_value, 9.0);
    }

    #[test]
    fn custom_margin() {
        let rule = fire_lane();
        let strict = Evaluator::with_margin(0.0);
        assert_eq!(strict.status(3.67, &rule), ComplianceStatus::Compliant);
        assert_eq!(strict.status(3.66, &rule), ComplianceStatus::Compliant);
        assert_eq!(strict.status(3.65, &rule), ComplianceStatus::Violation);
        assert_eq!(Evaluator::with_margin(-1.0).warning_margin(), 0.0);
    }

    // ==================== units and filtering ====================

    #[test]
    fn converts_into_rule_unit() {
        // 12.5 ft = 3.81 m, clears 3.66 m by about 4%
        let checks = Evaluator::default().evaluate_value(&"m".into(), Distance, 12.5, Unit::Feet, [&fire_lane()]);
        assert_eq!(checks[0].status, ComplianceStatus::Warning);
        assert_eq!(checks[0].unit, Unit::Meters);
        assert!((checks[0].actual_value - 3.81).abs() < 1e-9);
    }

    #[test]
    fn only_applicable_rules_are_checked() {
        let catalog = RuleCatalog::standard();
        let distance = Evaluator::default().evaluate_value(&"m".into(), Distance, 2.0, Unit::Meters, catalog.rules());
        assert_eq!(distance.len(), 2);

        let clearance = Evaluator::default().evaluate_value(&"m".into(), Clearance, 2.0, Unit::Meters, catalog.rules());
        assert_eq!(clearance.len(), 1);

        let area = Evaluator::default().evaluate_value(&"m".into(), Area, 2.0, Unit::Meters, catalog.rules());
        assert!(area.is_empty());
    }

    // ==================== most severe ====================

    #[test]
    fn most_severe_prefers_violation_then_severity() {
        let catalog = RuleCatalog::standard();
        // 0.5 m fails both the fire lane (critical) and the ADA path (high)
        let checks = Evaluator::default().evaluate_value(&"m".into(), Distance, 0.5, Unit::Meters, catalog.rules());
        let worst = most_severe(checks).unwrap();
        assert_eq!(worst.rule_id, RuleId::from(rules::FIRE_LANE));

        // 2.0 m fails only the fire lane; the ADA pass must not win
        let checks = Evaluator::default().evaluate_value(&"m".into(), Distance, 2.0, Unit::Meters, catalog.rules());
        let worst = most_severe(checks).unwrap();
        assert_eq!(worst.status, ComplianceStatus::Violation);
        assert_eq!(worst.rule_id, RuleId::from(rules::FIRE_LANE));
    }

    #[test]
    fn most_severe_ties_keep_evaluation_order() {
        let a = ComplianceRule::new("a", "A", Distance, 1.0, Unit::Meters, Severity::High);
        let b = ComplianceRule::new("b", "B", Distance, 1.0, Unit::Meters, Severity::High);
        let checks = Evaluator::default().evaluate_value(&"m".into(), Distance, 0.5, Unit::Meters, [&a, &b]);
        assert_eq!(most_severe(checks).unwrap().rule_id, RuleId::from("a"));
    }

    #[test]
    fn most_severe_of_nothing_is_none() {
        assert_eq!(most_severe(Vec::new()), None);
    }
}
