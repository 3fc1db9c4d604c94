//! Scoring primitives and pillar calculators
//!
//! Everything in here is pure: no I/O, no shared state, and degenerate input
//! falls back to a documented neutral value instead of failing.

pub mod clock;
pub mod composite;
pub mod context;
pub mod decay;
pub mod diagnostics;
pub mod mad;
pub mod pillars;
pub mod stats;

pub use clock::{FacilityClock, FixedOffsetClock, LocalClock};
pub use composite::{composite_score, grade_pillars};
pub use context::{ScoringContext, SurgeonProfile};
pub use decay::graduated_case_score;
pub use diagnostics::{DiagnosticsCollector, DiagnosticsSink, NoDiagnostics, SurgeonDiagnostics};
pub use mad::{mad_score, mad_score_detailed, CohortMethod, MadScoreBreakdown};
