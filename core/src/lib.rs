//! Real-time risk-scoring detection core.
//!
//! `Engine` is the single entry point: it owns the per-user account table
//! and every detector's state, runs detectors in a fixed order for each
//! observed event, and aggregates their signals into a `RiskAssessment`
//! that may mutate account state (freeze, session invalidation).

pub mod config;
pub mod detectors;
pub mod engine;
pub mod error;
pub mod model;
pub mod stats;

pub use config::EngineConfig;
pub use engine::{AccountSummary, BehaviorSummary, Engine};
pub use model::{
    AccountState, Action, ActivityEvent, IdentityContext, PrivilegeChange, RiskAssessment,
    RiskSignal, SessionState, SignalKind,
};
