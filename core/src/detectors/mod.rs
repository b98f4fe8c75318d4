//! Each detector observes one facet of user behavior and is invoked in a
//! fixed order by the engine. They are independent types rather than
//! an inheritance hierarchy: one (`PrivilegeMonitor`) returns a `Vec` of
//! signals, the rest return `Option<RiskSignal>`. The engine treats both
//! uniformly by flattening into the assessment's ordered signal list.

pub mod attack_predictor;
pub mod behavior;
pub mod fingerprint;
pub mod graph;
pub mod pivot;
pub mod privilege;
pub mod sequence;
pub mod timing;

pub use attack_predictor::AttackSequencePredictor;
pub use behavior::BehaviorAnomalyDetector;
pub use fingerprint::IdentityFingerprinter;
pub use graph::GraphModel;
pub use pivot::PivotTracker;
pub use privilege::PrivilegeMonitor;
pub use sequence::ApiSequenceModel;
pub use timing::TimingProfiler;
