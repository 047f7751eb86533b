//! Authoritative collection of completed measurements for one site map.
//!
//! Every mutation computes `value` and `compliance` before the measurement
//! becomes visible, then notifies the host's [`PersistenceSink`]. Hosts that
//! share a store across threads wrap the whole store in one mutex
//! ([`SharedStore`]); pointer events arrive at human speed so a coarse lock
//! is enough.

use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use crate::compliance::{self, ComplianceCheck, ComplianceStatus, Evaluator, RuleCatalog, RuleId};
use crate::defaults;
use crate::errors::{ConfigError, RuleError, StoreError};
use crate::log::{debug, warn};
use crate::measurement::{
    Measurement, MeasurementDraft, MeasurementId, MeasurementKind, MeasurementPatch, PointId, SitePoint,
    compute_value,
};
use crate::types::{WorldPoint, check_positive};

/// Which site map a store belongs to, and its world scale
#[derive(Clone, Debug, PartialEq)]
pub struct SiteMapContext {
    site_map_id: String,
    meters_per_unit: f64,
}

impl SiteMapContext {
    pub fn new(site_map_id: impl Into<String>) -> Self {
        Self { site_map_id: site_map_id.into(), meters_per_unit: defaults::SCALE }
    }

    /// Set how many meters one world unit spans
    pub fn with_scale(mut self, meters_per_unit: f64) -> Result<Self, ConfigError> {
        self.meters_per_unit =
            check_positive(meters_per_unit).map_err(|_| ConfigError::InvalidScale { value: meters_per_unit })?;
        Ok(self)
    }

    pub fn site_map_id(&self) -> &str {
        &self.site_map_id
    }

    pub fn meters_per_unit(&self) -> f64 {
        self.meters_per_unit
    }
}

/// Host-side persistence, notified after every mutation
pub trait PersistenceSink {
    fn created(&mut self, measurement: &Measurement);
    fn updated(&mut self, measurement: &Measurement);
    fn deleted(&mut self, id: &MeasurementId);
}

/// Sink for hosts that do not persist
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl PersistenceSink for NoopSink {
    fn created(&mut self, _: &Measurement) {}
    fn updated(&mut self, _: &Measurement) {}
    fn deleted(&mut self, _: &MeasurementId) {}
}

/// A store mutation as delivered over a channel
#[derive(Clone, Debug, PartialEq)]
pub enum Change {
    Created(Measurement),
    Updated(Measurement),
    Deleted(MeasurementId),
}

/// Forward changes to a persistence worker.
///
/// A hung-up receiver never fails the mutation; each dropped change is logged.
impl PersistenceSink for Sender<Change> {
    fn created(&mut self, measurement: &Measurement) {
        forward(self, Change::Created(measurement.clone()));
    }

    fn updated(&mut self, measurement: &Measurement) {
        forward(self, Change::Updated(measurement.clone()));
    }

    fn deleted(&mut self, id: &MeasurementId) {
        forward(self, Change::Deleted(id.clone()));
    }
}

fn forward(tx: &Sender<Change>, change: Change) {
    if tx.send(change).is_err() {
        warn!("persistence receiver hung up, change dropped");
    }
}

/// Compliance condition used by [`MeasurementFilter`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComplianceFilter {
    /// No rule applied
    Unevaluated,
    Status(ComplianceStatus),
}

/// Criteria for [`MeasurementStore::list`]; the default matches everything
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeasurementFilter {
    pub kind: Option<MeasurementKind>,
    pub compliance: Option<ComplianceFilter>,
    /// Case-insensitive substring of the label
    pub label_contains: Option<String>,
}

impl MeasurementFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: MeasurementKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn status(mut self, status: ComplianceStatus) -> Self {
        self.compliance = Some(ComplianceFilter::Status(status));
        self
    }

    pub fn unevaluated(mut self) -> Self {
        self.compliance = Some(ComplianceFilter::Unevaluated);
        self
    }

    pub fn label_contains(mut self, needle: impl Into<String>) -> Self {
        self.label_contains = Some(needle.into());
        self
    }

    pub fn matches(&self, m: &Measurement) -> bool {
        if self.kind.is_some_and(|k| k != m.kind()) {
            return false;
        }
        let compliance_ok = match self.compliance {
            None => true,
            Some(ComplianceFilter::Unevaluated) => m.compliance().is_none(),
            Some(ComplianceFilter::Status(s)) => m.compliance().is_some_and(|c| c.status == s),
        };
        if !compliance_ok {
            return false;
        }
        match &self.label_contains {
            Some(needle) => m.label().to_lowercase().contains(&needle.to_lowercase()),
            None => true,
        }
    }
}

/// Badge counts across the store
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ComplianceSummary {
    pub compliant: usize,
    pub warning: usize,
    pub violation: usize,
    pub unevaluated: usize,
}

pub type SharedStore = Arc<Mutex<MeasurementStore>>;

pub struct MeasurementStore {
    context: SiteMapContext,
    catalog: RuleCatalog,
    /// Enabled rule ids, kept in catalog order so evaluation order is stable
    enabled: Vec<RuleId>,
    evaluator: Evaluator,
    measurements: Vec<Measurement>,
    next_seq: u64,
    sink: Box<dyn PersistenceSink + Send>,
}

impl std::fmt::Debug for MeasurementStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeasurementStore")
            .field("context", &self.context)
            .field("enabled", &self.enabled)
            .field("measurements", &self.measurements.len())
            .finish_non_exhaustive()
    }
}

impl MeasurementStore {
    /// Store with the standard catalog, every rule enabled, and no persistence
    pub fn new(context: SiteMapContext) -> Self {
        let catalog = RuleCatalog::standard();
        let enabled = catalog.ids().cloned().collect();
        Self {
            context,
            catalog,
            enabled,
            evaluator: Evaluator::default(),
            measurements: Vec::new(),
            next_seq: 0,
            sink: Box::new(NoopSink),
        }
    }

    /// Replace the catalog; every rule in it starts enabled
    pub fn with_catalog(mut self, catalog: RuleCatalog) -> Self {
        self.enabled = catalog.ids().cloned().collect();
        self.catalog = catalog;
        self.recompute_all();
        self
    }

    pub fn with_evaluator(mut self, evaluator: Evaluator) -> Self {
        self.evaluator = evaluator;
        self.recompute_all();
        self
    }

    pub fn with_sink(mut self, sink: impl PersistenceSink + Send + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(Mutex::new(self))
    }

    pub fn context(&self) -> &SiteMapContext {
        &self.context
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    pub fn enabled_rules(&self) -> &[RuleId] {
        &self.enabled
    }

    pub fn len(&self) -> usize {
        self.measurements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.measurements.is_empty()
    }

    pub fn get(&self, id: &MeasurementId) -> Option<&Measurement> {
        self.measurements.iter().find(|m| m.id() == id)
    }

    /// Measurements matching `filter`, in creation order
    pub fn list(&self, filter: &MeasurementFilter) -> Vec<&Measurement> {
        self.measurements.iter().filter(|m| filter.matches(m)).collect()
    }

    /// Freeze a draft into a stored measurement.
    ///
    /// The kernel runs exactly once here; compliance is attached before the
    /// measurement is stored or returned.
    pub fn create(&mut self, draft: MeasurementDraft) -> Result<Measurement, StoreError> {
        let MeasurementDraft { kind, points, unit, label } = draft;
        check_point_count(kind, points.len())?;

        self.next_seq += 1;
        let id = MeasurementId(format!("{}/m{}", self.context.site_map_id, self.next_seq));
        let value = compute_value(kind, &points, self.context.meters_per_unit, unit);
        let label = label.unwrap_or_else(|| format!("{kind} {}", self.next_seq));

        let points = site_points(&id, &points);
        let mut measurement = Measurement::new(id, kind, points, value, unit, label);
        measurement.set_compliance(verdict(&self.evaluator, &self.catalog, &self.enabled, &measurement));

        debug!(id = %measurement.id(), %kind, value, "measurement created");
        self.sink.created(&measurement);
        self.measurements.push(measurement.clone());
        Ok(measurement)
    }

    /// Apply a partial update.
    ///
    /// New points recompute value and compliance. A unit change re-expresses
    /// the value from the same geometry and recomputes compliance.
    pub fn update(&mut self, id: &MeasurementId, patch: MeasurementPatch) -> Result<Measurement, StoreError> {
        let idx = self.index_of(id)?;
        let scale = self.context.meters_per_unit;
        let measurement = &mut self.measurements[idx];
        let kind = measurement.kind();

        if let Some(points) = &patch.points {
            check_point_count(kind, points.len())?;
        }
        if let Some(label) = patch.label {
            measurement.set_label(label);
        }
        if let Some(unit) = patch.unit {
            let value = compute_value(kind, &measurement.positions(), scale, unit);
            measurement.set_value_in(value, unit);
        }
        if let Some(points) = patch.points {
            let value = compute_value(kind, &points, scale, measurement.unit());
            let points = site_points(measurement.id(), &points);
            measurement.set_points(points, value);
        }
        let check = verdict(&self.evaluator, &self.catalog, &self.enabled, measurement);
        measurement.set_compliance(check);

        debug!(%id, value = measurement.value(), "measurement updated");
        self.sink.updated(measurement);
        Ok(measurement.clone())
    }

    /// Remove a measurement outright
    pub fn delete(&mut self, id: &MeasurementId) -> Result<Measurement, StoreError> {
        let idx = self.index_of(id)?;
        let removed = self.measurements.remove(idx);
        debug!(%id, "measurement deleted");
        self.sink.deleted(id);
        Ok(removed)
    }

    /// Choose which catalog rules are active and re-evaluate every measurement.
    ///
    /// Ids missing from the catalog are logged, skipped and returned.
    pub fn set_enabled_rules<I>(&mut self, ids: I) -> Vec<RuleError>
    where
        I: IntoIterator,
        I::Item: Into<RuleId>,
    {
        let requested: Vec<RuleId> = ids.into_iter().map(Into::into).collect();
        let mut ignored = Vec::new();
        for id in &requested {
            if !self.catalog.contains(id) {
                warn!(rule = %id, "ignoring unknown compliance rule");
                ignored.push(RuleError::UnknownRule { id: id.clone() });
            }
        }
        self.enabled = self.catalog.ids().filter(|id| requested.contains(id)).cloned().collect();
        debug!(enabled = self.enabled.len(), "enabled rules changed");
        self.recompute_all();
        ignored
    }

    /// Swap the catalog, keeping enabled ids that still exist
    pub fn replace_catalog(&mut self, catalog: RuleCatalog) {
        let previous = std::mem::take(&mut self.enabled);
        self.enabled = catalog.ids().filter(|id| previous.contains(id)).cloned().collect();
        self.catalog = catalog;
        self.recompute_all();
    }

    /// Counts of attached verdicts, for toolbar badges
    pub fn compliance_summary(&self) -> ComplianceSummary {
        let mut summary = ComplianceSummary::default();
        for m in &self.measurements {
            match m.compliance().map(|c| c.status) {
                Some(ComplianceStatus::Compliant) => summary.compliant += 1,
                Some(ComplianceStatus::Warning) => summary.warning += 1,
                Some(ComplianceStatus::Violation) => summary.violation += 1,
                None => summary.unevaluated += 1,
            }
        }
        summary
    }

    pub(crate) fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    fn index_of(&self, id: &MeasurementId) -> Result<usize, StoreError> {
        self.measurements
            .iter()
            .position(|m| m.id() == id)
            .ok_or_else(|| StoreError::UnknownMeasurement { id: id.clone() })
    }

    fn recompute_all(&mut self) {
        for m in &mut self.measurements {
            let check = verdict(&self.evaluator, &self.catalog, &self.enabled, m);
            m.set_compliance(check);
        }
    }
}

fn check_point_count(kind: MeasurementKind, got: usize) -> Result<(), StoreError> {
    if kind.accepts_count(got) {
        Ok(())
    } else {
        Err(StoreError::InvalidPointCount { kind, got, expected: kind.expected_points() })
    }
}

fn verdict(
    evaluator: &Evaluator,
    catalog: &RuleCatalog,
    enabled: &[RuleId],
    measurement: &Measurement,
) -> Option<ComplianceCheck> {
    let rules = enabled.iter().filter_map(|id| catalog.get(id));
    compliance::most_severe(evaluator.evaluate(measurement, rules))
}

/// Point ids are `<measurement id>.p<index>`
fn site_points(id: &MeasurementId, points: &[WorldPoint]) -> Vec<SitePoint> {
    points
        .iter()
        .enumerate()
        .map(|(i, &pos)| SitePoint { id: PointId(format!("{id}.p{i}")), pos })
        .collect()
}
