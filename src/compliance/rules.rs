//! Compliance rules and the catalog that ships with the engine

use std::fmt;

use crate::measurement::MeasurementKind;
use crate::units::Unit;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleId(pub String);

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RuleId {
    fn from(s: &str) -> Self {
        RuleId(s.to_string())
    }
}

/// How bad a failed rule is; ordering is `Low < Medium < High < Critical`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        };
        f.write_str(name)
    }
}

/// A named threshold tied to a regulation
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ComplianceRule {
    pub id: RuleId,
    pub name: String,
    pub applies_to: MeasurementKind,
    pub min_value: f64,
    pub max_value: Option<f64>,
    pub unit: Unit,
    pub severity: Severity,
    pub required: bool,
    /// Free-text regulation reference shown next to the badge
    pub citation: String,
}

impl ComplianceRule {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        applies_to: MeasurementKind,
        min_value: f64,
        unit: Unit,
        severity: Severity,
    ) -> Self {
        Self {
            id: RuleId(id.into()),
            name: name.into(),
            applies_to,
            min_value,
            max_value: None,
            unit,
            severity,
            required: true,
            citation: String::new(),
        }
    }

    pub fn with_max(mut self, max_value: f64) -> Self {
        self.max_value = Some(max_value);
        self
    }

    pub fn with_citation(mut self, citation: impl Into<String>) -> Self {
        self.citation = citation.into();
        self
    }
}

pub const FIRE_LANE: &str = "fire_lane";
pub const ADA_PATH: &str = "ada_path";
pub const EQUIPMENT_CLEARANCE: &str = "equipment_clearance";

/// All rules the UI can toggle, in evaluation order
#[derive(Clone, Debug, PartialEq)]
pub struct RuleCatalog {
    rules: Vec<ComplianceRule>,
}

impl RuleCatalog {
    pub fn new(rules: Vec<ComplianceRule>) -> Self {
        Self { rules }
    }

    /// Fire lane, accessible path and equipment clearance minimums
    pub fn standard() -> Self {
        Self::new(vec![
            ComplianceRule::new(FIRE_LANE, "Fire lane width", MeasurementKind::Distance, 3.66, Unit::Meters, Severity::Critical)
                .with_citation("Fire code: fire apparatus access roads, minimum unobstructed width 12 ft"),
            ComplianceRule::new(ADA_PATH, "ADA path width", MeasurementKind::Distance, 0.91, Unit::Meters, Severity::High)
                .with_citation("ADA Standards for Accessible Design 403.5.1: clear width 36 in"),
            ComplianceRule::new(
                EQUIPMENT_CLEARANCE,
                "Equipment clearance",
                MeasurementKind::Clearance,
                1.22,
                Unit::Meters,
                Severity::Medium,
            )
            .with_citation("Working space around equipment, minimum 4 ft"),
        ])
    }

    pub fn get(&self, id: &RuleId) -> Option<&ComplianceRule> {
        self.rules.iter().find(|r| &r.id == id)
    }

    pub fn contains(&self, id: &RuleId) -> bool {
        self.get(id).is_some()
    }

    pub fn rules(&self) -> &[ComplianceRule] {
        &self.rules
    }

    pub fn ids(&self) -> impl Iterator<Item = &RuleId> {
        self.rules.iter().map(|r| &r.id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
