//! Accuracy evaluation: matching, per-case metrics, corpus reports.
//!
//! # Overview
//!
//! The offline half of the pipeline. One case's validated predictions are
//! matched against its ground truth under an IoU threshold
//! ([`match_rooms`]), reduced to [`CaseMetrics`], and many cases are
//! aggregated into an [`EvaluationReport`] with per-category breakdowns and
//! a worst-N list.
//!
//! ```rust
//! use roomiq::eval::{match_rooms, CaseMetrics, MatcherConfig};
//! use roomiq::types::Confidence;
//! use roomiq::{BoundingBox, GroundTruthRoom, Room};
//!
//! let b = BoundingBox::new(100.0, 100.0, 500.0, 600.0).unwrap();
//! let predicted = vec![Room::new("p1", b, None, Confidence::CERTAIN)];
//! let truth = vec![GroundTruthRoom::new("g1", b, None)];
//!
//! let results = match_rooms(&predicted, &truth, &MatcherConfig::default());
//! let metrics = CaseMetrics::from_matches(&results);
//! assert_eq!(metrics.detection_rate, 1.0);
//! ```
//!
//! Matching never double-counts: every predicted room and every ground-truth
//! room lands in exactly one [`MatchResult`]. The matcher and the aggregator
//! never fail for well-formed input; malformed input is a contract violation
//! upstream, not a runtime condition handled here.

pub mod fixtures;
pub mod matcher;
pub mod metrics;
pub mod report;

pub use fixtures::{
    discover_cases, load_ground_truth, load_prediction, FixturePair, GroundTruthFixture,
    PredictionFixture,
};
pub use matcher::{match_rooms, MatchResult, MatcherConfig, DEFAULT_IOU_THRESHOLD};
pub use metrics::CaseMetrics;
pub use report::{AggregateStats, CaseResult, EvaluationReport, ReportConfig, WorstCase};
