//! # roomiq
//!
//! Room-detection response validation and accuracy evaluation.
//!
//! A vision model looking at a blueprint answers in free text. This crate
//! turns that answer into a trustworthy, machine-consumable set of room
//! boundaries - and measures how good the answer is against known-correct
//! data.
//!
//! - **Extraction**: locate and parse the structured span buried in prose
//!   and markdown fences
//! - **Validation**: drop or repair malformed records, score each surviving
//!   room with a deterministic confidence heuristic
//! - **Matching**: pair predictions with ground truth by IoU, greedily and
//!   deterministically, with no double counting
//! - **Aggregation**: per-case metrics and corpus-wide reports with
//!   category breakdowns and a worst-N list
//!
//! ## Online path (single request)
//!
//! ```rust
//! use roomiq::{detect_rooms, ValidatorConfig};
//!
//! let answer = "Here are the rooms:\n```json\n[{\"id\":\"r1\",\"bounding_box\":[100,100,500,600],\"name_hint\":\"Kitchen\"}]\n```\nDone.";
//! let outcome = detect_rooms(answer, &ValidatorConfig::default());
//!
//! assert_eq!(outcome.rooms.len(), 1);
//! assert_eq!(outcome.rooms[0].id, "r1");
//! // A response with no structured span yields zero rooms plus a
//! // diagnostic reason - never a panic, never an unhandled fault.
//! ```
//!
//! ## Offline path (batch evaluation)
//!
//! ```rust
//! use roomiq::pipeline::{evaluate_corpus, CaseInput, EvalCase, EvalConfig};
//! use roomiq::{BoundingBox, GroundTruthRoom};
//!
//! let case = EvalCase {
//!     case_id: "level1_test_001".to_string(),
//!     category: Some("level1".to_string()),
//!     input: CaseInput::ResponseText(
//!         "```json\n[{\"id\":\"r1\",\"bounding_box\":[100,100,500,600]}]\n```".to_string(),
//!     ),
//!     ground_truth: vec![GroundTruthRoom::new(
//!         "room_1",
//!         BoundingBox::new(100.0, 100.0, 500.0, 600.0).unwrap(),
//!         None,
//!     )],
//! };
//!
//! let report = evaluate_corpus(&[case], &EvalConfig::default());
//! assert_eq!(report.overall.mean_detection_rate, 1.0);
//! ```
//!
//! ## Design
//!
//! - **Pure core**: every stage is a function of its inputs; no I/O, no
//!   shared state. Independent cases parallelize freely (enable the
//!   `eval-parallel` feature for a rayon-backed corpus runner).
//! - **Invariants by construction**: a [`BoundingBox`] cannot exist with
//!   inverted or out-of-range coordinates; a [`Room`] is valid the moment
//!   it exists.
//! - **Rejection is data**: per-record problems become counted drops, not
//!   errors; only a structurally broken case fails, and only that case.
//! - **Determinism over optimality**: greedy IoU matching with total-order
//!   tie-breaks beats an optimal-but-fiddly assignment for single-digit
//!   room counts.
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! roomiq = "0.2"                                      # sequential evaluation
//! roomiq = { version = "0.2", features = ["eval-parallel"] } # rayon corpus runner
//! ```

#![warn(missing_docs)]

mod error;
pub mod eval;
pub mod extract;
pub mod geometry;
pub mod pipeline;
mod room;
pub mod types;
pub mod validate;

pub mod prelude {
    //! Commonly used items, re-exported for convenience.
    //!
    //! ```rust
    //! use roomiq::prelude::*;
    //!
    //! let outcome = detect_rooms("[]", &ValidatorConfig::default());
    //! assert!(outcome.rooms.is_empty());
    //! assert!(outcome.diagnostic.is_none());
    //! ```
    pub use crate::error::{Error, Result};
    pub use crate::eval::{
        match_rooms, CaseMetrics, CaseResult, EvaluationReport, MatchResult, MatcherConfig,
        ReportConfig,
    };
    pub use crate::extract::extract_records;
    pub use crate::geometry::BoundingBox;
    pub use crate::pipeline::{
        detect_rooms, evaluate_corpus, CaseInput, DetectionOutcome, EvalCase, EvalConfig,
    };
    pub use crate::room::{GroundTruthRoom, Room};
    pub use crate::types::Confidence;
    pub use crate::validate::{
        validate_records, DropCounts, RecordOutcome, RejectReason, ValidationOutcome,
        ValidatorConfig,
    };
}

// Re-exports
pub use error::{Error, Result};
pub use extract::extract_records;
pub use geometry::{BoundingBox, COORD_MAX, COORD_MIN};
pub use pipeline::{detect_rooms, DetectionOutcome};
pub use room::{GroundTruthRoom, Room};
pub use validate::{
    validate_record, validate_records, validate_response_value, DropCounts, RecordOutcome,
    RejectReason, ValidationOutcome, ValidatorConfig,
};
