//! Error types with diagnostic codes using miette
//!
//! Every error here is a usage bug in the calling layer, surfaced synchronously.
//! Geometry itself never fails; degenerate shapes measure as zero.

use miette::Diagnostic;
use thiserror::Error;

use crate::compliance::RuleId;
use crate::measurement::{MeasurementId, MeasurementKind};

// ============================================================================
// Configuration Errors
// ============================================================================

/// Malformed viewport or grid configuration
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("invalid zoom: {value}")]
    #[diagnostic(
        code(sitemeasure::config::invalid_zoom),
        help("zoom must be a finite number greater than zero")
    )]
    InvalidZoom { value: f64 },

    #[error("invalid grid size: {value}")]
    #[diagnostic(
        code(sitemeasure::config::invalid_grid_size),
        help("grid cell size must be a finite number greater than zero")
    )]
    InvalidGridSize { value: f64 },

    #[error("invalid scale: {value}")]
    #[diagnostic(
        code(sitemeasure::config::invalid_scale),
        help("meters per world unit must be a finite number greater than zero")
    )]
    InvalidScale { value: f64 },
}

// ============================================================================
// Drawing Session Errors
// ============================================================================

/// Errors raised by the drawing session state machine
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("no drawing session is active")]
    #[diagnostic(
        code(sitemeasure::session::not_active),
        help("call begin() before adding points, completing or cancelling")
    )]
    SessionNotActive,

    #[error("a {kind} drawing session is already active")]
    #[diagnostic(
        code(sitemeasure::session::already_active),
        help("cancel() the current session before beginning a new one")
    )]
    SessionAlreadyActive { kind: MeasurementKind },

    #[error("{kind} needs {expected} points, got {got}")]
    #[diagnostic(code(sitemeasure::session::invalid_point_count))]
    InvalidPointCount {
        kind: MeasurementKind,
        got: usize,
        expected: String,
    },
}

// ============================================================================
// Store Errors
// ============================================================================

/// Errors raised by the measurement store
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("{kind} needs {expected} points, got {got}")]
    #[diagnostic(code(sitemeasure::store::invalid_point_count))]
    InvalidPointCount {
        kind: MeasurementKind,
        got: usize,
        expected: String,
    },

    #[error("unknown measurement: {id}")]
    #[diagnostic(code(sitemeasure::store::unknown_measurement))]
    UnknownMeasurement { id: MeasurementId },
}

// ============================================================================
// Rule Errors
// ============================================================================

/// Rule ids that could not be resolved against the catalog.
///
/// These are logged and returned, never raised: rule sets are user-editable
/// and may reference ids removed from the catalog.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum RuleError {
    #[error("unknown rule: {id}")]
    #[diagnostic(
        code(sitemeasure::rules::unknown_rule),
        severity(Warning),
        help("the id was ignored; check the rule catalog")
    )]
    UnknownRule { id: RuleId },
}

// ============================================================================
// Canvas Errors
// ============================================================================

/// Errors from the canvas façade
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum CanvasError {
    #[error("no measurement tool is selected")]
    #[diagnostic(
        code(sitemeasure::canvas::no_tool_selected),
        help("select a tool before placing points")
    )]
    NoToolSelected,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}
