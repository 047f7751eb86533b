//! Interactive measurement and compliance engine for event site maps.
//!
//! A host forwards pointer events to a [`MeasureCanvas`]. The canvas maps
//! them through the [`Viewport`] and grid, collects points in a
//! [`DrawingSession`], and on completion freezes a [`Measurement`] in the
//! [`MeasurementStore`], where it is checked against the enabled
//! [`ComplianceRule`]s. Rendering is left to the host through
//! [`render::RenderSurface`].
//!
//! ```
//! use sitemeasure::{CanvasEvent, MeasureCanvas, MeasurementKind, MeasurementStore, SiteMapContext};
//! use sitemeasure::types::spt;
//!
//! let store = MeasurementStore::new(SiteMapContext::new("north-lot"));
//! let mut canvas = MeasureCanvas::new(store);
//! canvas.select_tool(Some(MeasurementKind::Distance));
//! canvas.pointer_down(spt(0.0, 0.0)).unwrap();
//! let CanvasEvent::Completed(m) = canvas.pointer_down(spt(5.0, 0.0)).unwrap() else {
//!     unreachable!()
//! };
//! assert_eq!(m.value(), 5.0);
//! ```

pub mod canvas;
pub mod compliance;
pub mod defaults;
pub mod errors;
pub mod geometry;
pub mod grid;
pub mod log;
pub mod measurement;
pub mod render;
pub mod session;
pub mod store;
pub mod transform;
pub mod types;
pub mod units;

pub use canvas::{CanvasEvent, MeasureCanvas};
pub use compliance::{ComplianceCheck, ComplianceRule, ComplianceStatus, Evaluator, RuleCatalog, RuleId, Severity};
pub use errors::{CanvasError, ConfigError, RuleError, SessionError, StoreError};
pub use grid::GridSettings;
pub use measurement::{Measurement, MeasurementDraft, MeasurementId, MeasurementKind, MeasurementPatch};
pub use session::{DrawingSession, PointerMap, Preview};
pub use store::{MeasurementFilter, MeasurementStore, PersistenceSink, SharedStore, SiteMapContext};
pub use transform::{Pan, Viewport};
pub use units::Unit;
