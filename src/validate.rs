//! Record validation and sanitization.
//!
//! Turns the loosely-typed records produced by [`crate::extract`] into
//! well-formed [`Room`]s. Per-record problems are data, not control flow:
//! each record resolves to a [`RecordOutcome`] (valid room or a typed
//! rejection reason), and dropped records are tallied in [`DropCounts`] for
//! observability. The validator only fails as a whole when its input is not
//! a sequence at all.
//!
//! Repair policy: coordinates slightly out of range are clamped into
//! [0, 1000] (recovery), but geometry that is degenerate *after* clamping
//! (`x_min >= x_max` or `y_min >= y_max`) cannot be repaired and rejects the
//! record.

use crate::geometry::{BoundingBox, COORD_MAX, COORD_MIN};
use crate::room::Room;
use crate::types::Confidence;
use crate::{Error, Result};
use serde_json::Value;
use std::fmt;

/// Tuning knobs for coordinate repair and confidence scoring.
///
/// The penalty constants are a policy choice, not a derived physical
/// quantity; they are configuration so the policy can be tuned without
/// touching validation logic.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Penalty subtracted when `name_hint` is absent or empty.
    pub missing_name_penalty: f64,
    /// Penalty subtracted when the box area falls below `min_area`.
    pub small_area_penalty: f64,
    /// Minimum plausible room area in normalized square units; smaller boxes
    /// are more often spurious.
    pub min_area: f64,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            missing_name_penalty: 0.2,
            small_area_penalty: 0.1,
            // 50x50 in the 0-1000 space
            min_area: 2500.0,
        }
    }
}

/// Why a record was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// Record is not a JSON object.
    NotAnObject,
    /// Missing or non-string `id` field.
    MissingId,
    /// Missing `bounding_box` field.
    MissingBoundingBox,
    /// `bounding_box` is not a 4-element array.
    MalformedBoundingBox,
    /// A box value did not coerce to a number.
    NonNumericCoordinate,
    /// Degenerate or inverted box after clamping.
    DegenerateGeometry,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::NotAnObject => "record is not an object",
            Self::MissingId => "missing 'id' field",
            Self::MissingBoundingBox => "missing 'bounding_box' field",
            Self::MalformedBoundingBox => "bounding_box is not a 4-element array",
            Self::NonNumericCoordinate => "bounding_box contains a non-numeric value",
            Self::DegenerateGeometry => "degenerate box geometry after clamping",
        };
        f.write_str(msg)
    }
}

/// Per-record validation outcome.
///
/// Rejection is a first-class, inspectable result rather than an error.
#[derive(Debug, Clone)]
pub enum RecordOutcome {
    /// Record produced a well-formed room.
    Valid(Room),
    /// Record was dropped for the given reason.
    Rejected(RejectReason),
}

/// Tally of dropped records by rejection reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropCounts {
    /// Records that were not objects.
    pub not_an_object: usize,
    /// Records missing a usable `id`.
    pub missing_id: usize,
    /// Records missing `bounding_box`.
    pub missing_bounding_box: usize,
    /// Records whose `bounding_box` had the wrong shape.
    pub malformed_bounding_box: usize,
    /// Records with non-numeric box values.
    pub non_numeric_coordinate: usize,
    /// Records with unrepairable geometry.
    pub degenerate_geometry: usize,
}

impl DropCounts {
    /// Total number of dropped records.
    #[must_use]
    pub fn total(&self) -> usize {
        self.not_an_object
            + self.missing_id
            + self.missing_bounding_box
            + self.malformed_bounding_box
            + self.non_numeric_coordinate
            + self.degenerate_geometry
    }

    fn record(&mut self, reason: RejectReason) {
        match reason {
            RejectReason::NotAnObject => self.not_an_object += 1,
            RejectReason::MissingId => self.missing_id += 1,
            RejectReason::MissingBoundingBox => self.missing_bounding_box += 1,
            RejectReason::MalformedBoundingBox => self.malformed_bounding_box += 1,
            RejectReason::NonNumericCoordinate => self.non_numeric_coordinate += 1,
            RejectReason::DegenerateGeometry => self.degenerate_geometry += 1,
        }
    }
}

/// Result of validating a record sequence: the surviving rooms plus the
/// drop tally. Always a valid (possibly empty) sequence, never an error.
#[derive(Debug, Clone, Default)]
pub struct ValidationOutcome {
    /// Rooms that passed every check.
    pub rooms: Vec<Room>,
    /// Per-reason tally of dropped records.
    pub dropped: DropCounts,
}

/// Validate a single record.
pub fn validate_record(record: &Value, cfg: &ValidatorConfig) -> RecordOutcome {
    let obj = match record.as_object() {
        Some(obj) => obj,
        None => return RecordOutcome::Rejected(RejectReason::NotAnObject),
    };

    let id = match obj.get("id") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        // Models sometimes emit numeric ids; stringify them
        Some(Value::Number(n)) => n.to_string(),
        _ => return RecordOutcome::Rejected(RejectReason::MissingId),
    };

    let raw_box = match obj.get("bounding_box") {
        Some(v) => v,
        None => return RecordOutcome::Rejected(RejectReason::MissingBoundingBox),
    };

    let values = match raw_box.as_array() {
        Some(values) if values.len() == 4 => values,
        _ => return RecordOutcome::Rejected(RejectReason::MalformedBoundingBox),
    };

    let mut coords = [0.0_f64; 4];
    for (slot, value) in coords.iter_mut().zip(values) {
        match value.as_f64() {
            Some(n) if n.is_finite() => *slot = n,
            _ => return RecordOutcome::Rejected(RejectReason::NonNumericCoordinate),
        }
    }

    // Clamp first (repair), then check geometry (detect) - in that order
    let [x_min, y_min, x_max, y_max] = coords.map(|c| c.clamp(COORD_MIN, COORD_MAX));
    let bounding_box = match BoundingBox::new(x_min, y_min, x_max, y_max) {
        Ok(b) => b,
        Err(_) => return RecordOutcome::Rejected(RejectReason::DegenerateGeometry),
    };

    let name_hint = obj
        .get("name_hint")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    let confidence = score_confidence(name_hint.as_deref(), bounding_box.area(), cfg);

    RecordOutcome::Valid(Room::new(id, bounding_box, name_hint, confidence))
}

/// Validate a record sequence, dropping bad records and tallying the drops.
///
/// Never fails: the output is always a valid (possibly empty) room sequence.
/// Drops are logged at warn level with their reason.
pub fn validate_records(records: &[Value], cfg: &ValidatorConfig) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();

    for (i, record) in records.iter().enumerate() {
        match validate_record(record, cfg) {
            RecordOutcome::Valid(room) => outcome.rooms.push(room),
            RecordOutcome::Rejected(reason) => {
                log::warn!("dropping record {}: {}", i, reason);
                outcome.dropped.record(reason);
            }
        }
    }

    outcome
}

/// Validate an arbitrary JSON value expected to be a record sequence.
///
/// # Errors
///
/// [`Error::Validation`] when the value is not an array at all. This is the
/// only whole-batch failure the validator produces; per-record problems are
/// counted drops.
pub fn validate_response_value(value: &Value, cfg: &ValidatorConfig) -> Result<ValidationOutcome> {
    match value.as_array() {
        Some(records) => Ok(validate_records(records, cfg)),
        None => Err(Error::validation(format!(
            "expected a JSON array of room records, got {}",
            json_type_name(value)
        ))),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Deterministic confidence heuristic.
///
/// Start at 1.0; penalize a missing/empty label and an implausibly small
/// area; the result is clamped into [0, 1] by construction.
fn score_confidence(name_hint: Option<&str>, area: f64, cfg: &ValidatorConfig) -> Confidence {
    let mut confidence = Confidence::CERTAIN;
    if name_hint.is_none() {
        confidence = confidence.penalize(cfg.missing_name_penalty);
    }
    if area < cfg.min_area {
        confidence = confidence.penalize(cfg.small_area_penalty);
    }
    confidence
}
