pub mod config;
pub mod domain;
pub mod errors;
pub mod facts;
pub mod format;
pub mod metrics;

pub use domain::case::{CaseData, Department, DepartmentId, FTE_ANNUAL_HOURS};
pub use domain::payload::{
    Attachment, ChartData, ChartMarker, ChartPoint, ChartSeries, ResponsePayload, TableData,
    TableRow, Topic, UnknownTopic,
};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use facts::{QuickFact, QuickFacts, SAMPLE_QUESTIONS};
pub use metrics::{
    BreakEven, CaseAnalysis, DerivedMetrics, ShipmentProjection, YearPosition,
    DEFAULT_HORIZON_YEARS, NO_PAYBACK_STATEMENT,
};
