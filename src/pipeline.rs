//! Online detection and offline corpus evaluation entry points.
//!
//! The online path ([`detect_rooms`]) serves a single request: raw model
//! text in, validated rooms out. Extraction failure is not a fault - the
//! caller gets an empty room list plus a diagnostic reason.
//!
//! The offline path ([`evaluate_corpus`]) scores a corpus of cases against
//! ground truth. Every case is independent; a structurally broken case is
//! logged, counted, and never aborts the rest of the run. With the
//! `eval-parallel` feature, cases run concurrently under rayon - the
//! reduction sorts by case id, so parallel and sequential runs produce
//! identical reports.

use crate::eval::{
    match_rooms, CaseMetrics, CaseResult, EvaluationReport, MatcherConfig, ReportConfig,
};
use crate::extract::extract_records;
use crate::room::{GroundTruthRoom, Room};
use crate::validate::{validate_records, validate_response_value, DropCounts, ValidatorConfig};
use crate::Result;
use serde_json::Value;

/// Outcome of validating one model response (online path).
///
/// Never an error: a response with no extractable rooms yields an empty
/// list and a `diagnostic` explaining why.
#[derive(Debug, Clone, Default)]
pub struct DetectionOutcome {
    /// Rooms that survived validation.
    pub rooms: Vec<Room>,
    /// Tally of records dropped during validation.
    pub dropped: DropCounts,
    /// Reason extraction produced nothing, when it did.
    pub diagnostic: Option<String>,
}

/// Validate a raw model response into well-formed rooms.
///
/// # Example
///
/// ```rust
/// use roomiq::{detect_rooms, ValidatorConfig};
///
/// let text = "Here are the rooms:\n```json\n[{\"id\":\"r1\",\"bounding_box\":[100,100,500,600],\"name_hint\":\"Kitchen\"}]\n```";
/// let outcome = detect_rooms(text, &ValidatorConfig::default());
/// assert_eq!(outcome.rooms.len(), 1);
/// assert!(outcome.diagnostic.is_none());
///
/// // No structured span at all: empty rooms plus a reason, never a panic
/// let outcome = detect_rooms("I see no rooms here.", &ValidatorConfig::default());
/// assert!(outcome.rooms.is_empty());
/// assert!(outcome.diagnostic.is_some());
/// ```
#[must_use]
pub fn detect_rooms(response_text: &str, cfg: &ValidatorConfig) -> DetectionOutcome {
    match extract_records(response_text) {
        Ok(records) => {
            let outcome = validate_records(&records, cfg);
            DetectionOutcome {
                rooms: outcome.rooms,
                dropped: outcome.dropped,
                diagnostic: None,
            }
        }
        Err(err) => {
            log::warn!("room extraction produced nothing: {}", err);
            DetectionOutcome {
                rooms: Vec::new(),
                dropped: DropCounts::default(),
                diagnostic: Some(err.to_string()),
            }
        }
    }
}

/// Input side of one evaluation case.
#[derive(Debug, Clone)]
pub enum CaseInput {
    /// Raw model response text; goes through extraction.
    ResponseText(String),
    /// Pre-extracted records as an arbitrary JSON value; must be an array.
    Records(Value),
}

/// One case of an offline evaluation run.
#[derive(Debug, Clone)]
pub struct EvalCase {
    /// Stable case identifier (e.g. blueprint id).
    pub case_id: String,
    /// Optional difficulty/category label.
    pub category: Option<String>,
    /// The prediction side.
    pub input: CaseInput,
    /// The authoritative room boundaries.
    pub ground_truth: Vec<GroundTruthRoom>,
}

/// Configuration for an offline evaluation run.
#[derive(Debug, Clone, Default)]
pub struct EvalConfig {
    /// Validator tuning.
    pub validator: ValidatorConfig,
    /// Matcher tuning.
    pub matcher: MatcherConfig,
    /// Report tuning.
    pub report: ReportConfig,
}

/// Evaluate a single case.
///
/// An unparseable response is "zero rooms detected" (all ground truth
/// becomes false negatives). Input that is not a record sequence at all is
/// the one per-case fatal condition and propagates as
/// [`crate::Error::Validation`].
pub fn evaluate_case(case: &EvalCase, cfg: &EvalConfig) -> Result<CaseResult> {
    let rooms = match &case.input {
        CaseInput::ResponseText(text) => detect_rooms(text, &cfg.validator).rooms,
        CaseInput::Records(value) => validate_response_value(value, &cfg.validator)?.rooms,
    };

    let matches = match_rooms(&rooms, &case.ground_truth, &cfg.matcher);
    Ok(CaseResult {
        case_id: case.case_id.clone(),
        category: case.category.clone(),
        metrics: CaseMetrics::from_matches(&matches),
    })
}

/// Evaluate a corpus of cases into an [`EvaluationReport`].
///
/// Case failures are isolated: a failed case is logged, counted in
/// `cases_failed`, and the rest of the corpus is unaffected.
#[must_use]
pub fn evaluate_corpus(cases: &[EvalCase], cfg: &EvalConfig) -> EvaluationReport {
    let outcomes = run_cases(cases, cfg);

    let mut results = Vec::with_capacity(outcomes.len());
    let mut failed = 0usize;
    for (case_id, outcome) in outcomes {
        match outcome {
            Ok(result) => results.push(result),
            Err(err) => {
                log::warn!("case {} failed: {}", case_id, err);
                failed += 1;
            }
        }
    }

    let mut report = EvaluationReport::aggregate(results, &cfg.report);
    report.cases_failed = failed;
    report
}

#[cfg(feature = "eval-parallel")]
fn run_cases(cases: &[EvalCase], cfg: &EvalConfig) -> Vec<(String, Result<CaseResult>)> {
    use rayon::prelude::*;

    cases
        .par_iter()
        .map(|case| (case.case_id.clone(), evaluate_case(case, cfg)))
        .collect()
}

#[cfg(not(feature = "eval-parallel"))]
fn run_cases(cases: &[EvalCase], cfg: &EvalConfig) -> Vec<(String, Result<CaseResult>)> {
    cases
        .iter()
        .map(|case| (case.case_id.clone(), evaluate_case(case, cfg)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BoundingBox;
    use serde_json::json;

    fn gt(id: &str, coords: [f64; 4]) -> GroundTruthRoom {
        GroundTruthRoom::new(id, BoundingBox::from_slice(&coords).unwrap(), None)
    }

    #[test]
    fn detect_happy_path() {
        let text = r#"```json
[{"id": "r1", "bounding_box": [100, 100, 500, 600], "name_hint": "Kitchen"}]
```"#;
        let outcome = detect_rooms(text, &ValidatorConfig::default());
        assert_eq!(outcome.rooms.len(), 1);
        assert_eq!(outcome.dropped.total(), 0);
        assert!(outcome.diagnostic.is_none());
    }

    #[test]
    fn detect_unparseable_yields_reason() {
        let outcome = detect_rooms("no structure here", &ValidatorConfig::default());
        assert!(outcome.rooms.is_empty());
        let reason = outcome.diagnostic.expect("diagnostic expected");
        assert!(reason.contains("Extraction failed"));
    }

    #[test]
    fn failed_extraction_case_counts_as_all_false_negatives() {
        let case = EvalCase {
            case_id: "c1".to_string(),
            category: None,
            input: CaseInput::ResponseText("nothing structured".to_string()),
            ground_truth: vec![
                gt("g1", [0.0, 0.0, 100.0, 100.0]),
                gt("g2", [200.0, 0.0, 300.0, 100.0]),
            ],
        };
        let result = evaluate_case(&case, &EvalConfig::default()).unwrap();
        assert_eq!(result.metrics.false_negative_count, 2);
        assert_eq!(result.metrics.room_count_predicted, 0);
        assert_eq!(result.metrics.detection_rate, 0.0);
    }

    #[test]
    fn non_sequence_records_fail_the_case() {
        let case = EvalCase {
            case_id: "c1".to_string(),
            category: None,
            input: CaseInput::Records(json!({"rooms": []})),
            ground_truth: vec![],
        };
        assert!(evaluate_case(&case, &EvalConfig::default()).is_err());
    }

    #[test]
    fn corpus_isolates_failed_cases() {
        let good = EvalCase {
            case_id: "good".to_string(),
            category: Some("level1".to_string()),
            input: CaseInput::Records(json!([
                {"id": "r1", "bounding_box": [100, 100, 500, 600], "name_hint": "Kitchen"}
            ])),
            ground_truth: vec![gt("g1", [100.0, 100.0, 500.0, 600.0])],
        };
        let bad = EvalCase {
            case_id: "bad".to_string(),
            category: Some("level1".to_string()),
            input: CaseInput::Records(json!("not an array")),
            ground_truth: vec![gt("g1", [0.0, 0.0, 100.0, 100.0])],
        };

        let report = evaluate_corpus(&[good, bad], &EvalConfig::default());
        assert_eq!(report.overall.case_count, 1);
        assert_eq!(report.cases_failed, 1);
        assert_eq!(report.overall.mean_detection_rate, 1.0);
    }

    #[test]
    fn corpus_report_is_deterministic_across_input_order() {
        let make = |id: &str, coords: [f64; 4]| EvalCase {
            case_id: id.to_string(),
            category: None,
            input: CaseInput::Records(json!([
                {"id": "p", "bounding_box": [coords[0], coords[1], coords[2], coords[3]]}
            ])),
            ground_truth: vec![gt("g", [0.0, 0.0, 100.0, 100.0])],
        };

        let a = make("a", [0.0, 0.0, 100.0, 100.0]);
        let b = make("b", [500.0, 500.0, 600.0, 600.0]);

        let forward = evaluate_corpus(&[a.clone(), b.clone()], &EvalConfig::default());
        let backward = evaluate_corpus(&[b, a], &EvalConfig::default());
        assert_eq!(forward, backward);
    }
}
