//! Greedy IoU matching of predicted rooms against ground truth.
//!
//! Pairs every predicted room with at most one ground-truth room (and vice
//! versa) under a configurable IoU threshold. Greedy assignment over the
//! globally sorted pair list is a deterministic approximation of optimal
//! bipartite matching; box counts per case are small enough that the
//! approximation gap does not matter, and reproducibility does. An exact
//! assignment algorithm could replace the internals behind the same
//! contract: no double counting, total-order tie-breaks.

use crate::room::{GroundTruthRoom, Room};
use serde::{Deserialize, Serialize};

/// Default IoU threshold for accepting a match.
pub const DEFAULT_IOU_THRESHOLD: f64 = 0.5;

/// Matcher configuration.
///
/// The threshold is the one externally meaningful tuning knob of the
/// matching stage.
#[derive(Debug, Clone, Copy)]
pub struct MatcherConfig {
    /// Minimum IoU for a predicted/ground-truth pair to count as a match.
    pub iou_threshold: f64,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            iou_threshold: DEFAULT_IOU_THRESHOLD,
        }
    }
}

/// Classification of one room after matching.
///
/// Every predicted room and every ground-truth room appears in exactly one
/// `MatchResult` - the core invariant of the matcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MatchResult {
    /// Predicted room paired with a ground-truth room at `iou` >= threshold.
    TruePositive {
        /// The matched prediction.
        predicted: Room,
        /// Its ground-truth partner.
        ground_truth: GroundTruthRoom,
        /// Overlap of the pair.
        iou: f64,
    },
    /// Predicted room with no acceptable ground-truth partner.
    FalsePositive {
        /// The unmatched prediction.
        predicted: Room,
    },
    /// Ground-truth room with no acceptable predicted partner.
    FalseNegative {
        /// The missed ground-truth room.
        ground_truth: GroundTruthRoom,
    },
}

impl MatchResult {
    /// Whether this is a true positive.
    #[must_use]
    pub fn is_true_positive(&self) -> bool {
        matches!(self, Self::TruePositive { .. })
    }

    /// IoU of the pair, when matched.
    #[must_use]
    pub fn iou(&self) -> Option<f64> {
        match self {
            Self::TruePositive { iou, .. } => Some(*iou),
            _ => None,
        }
    }
}

/// Match one case's predicted rooms against its ground truth.
///
/// Deterministic greedy maximum-overlap assignment:
///
/// 1. Compute the full pairwise IoU matrix.
/// 2. Keep pairs with IoU >= threshold, sorted by descending IoU; ties break
///    by ascending predicted id, then ascending ground-truth id, then pair
///    indices (a total order).
/// 3. Walk the list, accepting a pair when neither side is claimed yet.
/// 4. Unclaimed predictions become false positives; unclaimed ground truth
///    becomes false negatives.
///
/// Zero predictions, zero ground truth, or both are valid inputs, not
/// errors.
///
/// # Example
///
/// ```rust
/// use roomiq::eval::{match_rooms, MatcherConfig};
/// use roomiq::types::Confidence;
/// use roomiq::{BoundingBox, GroundTruthRoom, Room};
///
/// let b = BoundingBox::new(100.0, 100.0, 500.0, 600.0).unwrap();
/// let predicted = vec![Room::new("p1", b, None, Confidence::CERTAIN)];
/// let truth = vec![GroundTruthRoom::new("g1", b, None)];
///
/// let results = match_rooms(&predicted, &truth, &MatcherConfig::default());
/// assert_eq!(results.len(), 1);
/// assert!((results[0].iou().unwrap() - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn match_rooms(
    predicted: &[Room],
    ground_truth: &[GroundTruthRoom],
    cfg: &MatcherConfig,
) -> Vec<MatchResult> {
    // (iou, predicted index, truth index) for every pair above threshold
    let mut pairs: Vec<(f64, usize, usize)> = Vec::new();
    for (pi, pred) in predicted.iter().enumerate() {
        for (ti, truth) in ground_truth.iter().enumerate() {
            let iou = pred.bounding_box.iou(&truth.bounding_box);
            if iou >= cfg.iou_threshold {
                pairs.push((iou, pi, ti));
            }
        }
    }

    pairs.sort_by(|a, b| {
        b.0.total_cmp(&a.0)
            .then_with(|| predicted[a.1].id.cmp(&predicted[b.1].id))
            .then_with(|| ground_truth[a.2].id.cmp(&ground_truth[b.2].id))
            .then_with(|| a.1.cmp(&b.1))
            .then_with(|| a.2.cmp(&b.2))
    });

    let mut pred_claimed = vec![false; predicted.len()];
    let mut truth_claimed = vec![false; ground_truth.len()];
    let mut results = Vec::with_capacity(predicted.len() + ground_truth.len());

    for (iou, pi, ti) in pairs {
        if pred_claimed[pi] || truth_claimed[ti] {
            continue;
        }
        pred_claimed[pi] = true;
        truth_claimed[ti] = true;
        results.push(MatchResult::TruePositive {
            predicted: predicted[pi].clone(),
            ground_truth: ground_truth[ti].clone(),
            iou,
        });
    }

    for (pi, pred) in predicted.iter().enumerate() {
        if !pred_claimed[pi] {
            results.push(MatchResult::FalsePositive {
                predicted: pred.clone(),
            });
        }
    }

    for (ti, truth) in ground_truth.iter().enumerate() {
        if !truth_claimed[ti] {
            results.push(MatchResult::FalseNegative {
                ground_truth: truth.clone(),
            });
        }
    }

    results
}
