//! Room entities and the wire contract.
//!
//! A [`Room`] is a predicted space that survived validation; a
//! [`GroundTruthRoom`] is an externally authored, presumed-correct boundary.
//! Both are immutable value objects created once per pipeline run.
//!
//! The wire shape for a predicted room is:
//!
//! ```json
//! { "id": "r1", "bounding_box": [100, 100, 500, 600], "name_hint": "Kitchen", "confidence": 0.9 }
//! ```
//!
//! `name_hint` serializes as `null` when absent (consumers expect the key).

use crate::geometry::BoundingBox;
use crate::types::Confidence;
use serde::{Deserialize, Serialize};

/// A predicted room with a validated bounding box and a derived trust score.
///
/// Invariant: a `Room` is only ever constructed from a [`BoundingBox`], so it
/// is geometrically valid by construction; the validator rejects records that
/// cannot satisfy this before a `Room` exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Caller-visible identifier, unique within one response.
    pub id: String,
    /// Validated box in the [0, 1000] coordinate space.
    pub bounding_box: BoundingBox,
    /// Optional room label (e.g. "Kitchen", "Office").
    #[serde(default)]
    pub name_hint: Option<String>,
    /// Validator-assigned trust score in [0, 1].
    pub confidence: Confidence,
}

impl Room {
    /// Create a new room.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        bounding_box: BoundingBox,
        name_hint: Option<String>,
        confidence: Confidence,
    ) -> Self {
        Self {
            id: id.into(),
            bounding_box,
            name_hint,
            confidence,
        }
    }

    /// Room area in normalized square units.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.bounding_box.area()
    }
}

/// An authoritative room boundary supplied by an external fixture.
///
/// Same shape as [`Room`] minus the confidence; never mutated by this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundTruthRoom {
    /// Identifier, unique within one case.
    pub id: String,
    /// Box in the [0, 1000] coordinate space.
    pub bounding_box: BoundingBox,
    /// Optional room label.
    #[serde(default)]
    pub name_hint: Option<String>,
}

impl GroundTruthRoom {
    /// Create a new ground-truth room.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        bounding_box: BoundingBox,
        name_hint: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            bounding_box,
            name_hint,
        }
    }
}
