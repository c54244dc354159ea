//! Per-case accuracy metrics.
//!
//! [`CaseMetrics`] reduces one case's match results into the numbers a
//! report consumer cares about. Pure and total: well-formed match results
//! always produce metrics, never an error.

use super::matcher::MatchResult;
use serde::{Deserialize, Serialize};

/// Accuracy metrics for one evaluated case (one blueprint).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseMetrics {
    /// Mean IoU over true positives; `None` when the case has none.
    pub average_iou: Option<f64>,
    /// Matched fraction of ground truth: `|TP| / |truth|` (0.0 when there is
    /// no ground truth).
    pub detection_rate: f64,
    /// `|TP| / |predicted|` (0.0 when there are no predictions).
    pub precision: f64,
    /// Same as `detection_rate`; kept under its standard name.
    pub recall: f64,
    /// Harmonic mean of precision and recall (0.0 when both are 0).
    pub f1: f64,
    /// Number of matched pairs.
    pub true_positive_count: usize,
    /// Predictions without a partner.
    pub false_positive_count: usize,
    /// Ground-truth rooms without a partner.
    pub false_negative_count: usize,
    /// Total predicted rooms in the case.
    pub room_count_predicted: usize,
    /// Total ground-truth rooms in the case.
    pub room_count_truth: usize,
}

impl CaseMetrics {
    /// Compute metrics from one case's match results.
    #[must_use]
    pub fn from_matches(matches: &[MatchResult]) -> Self {
        let mut ious = Vec::new();
        let mut true_positive_count = 0;
        let mut false_positive_count = 0;
        let mut false_negative_count = 0;

        for result in matches {
            match result {
                MatchResult::TruePositive { iou, .. } => {
                    true_positive_count += 1;
                    ious.push(*iou);
                }
                MatchResult::FalsePositive { .. } => false_positive_count += 1,
                MatchResult::FalseNegative { .. } => false_negative_count += 1,
            }
        }

        let room_count_predicted = true_positive_count + false_positive_count;
        let room_count_truth = true_positive_count + false_negative_count;

        let average_iou = if ious.is_empty() {
            None
        } else {
            Some(ious.iter().sum::<f64>() / ious.len() as f64)
        };

        let detection_rate = if room_count_truth == 0 {
            0.0
        } else {
            true_positive_count as f64 / room_count_truth as f64
        };

        let precision = if room_count_predicted == 0 {
            0.0
        } else {
            true_positive_count as f64 / room_count_predicted as f64
        };

        let recall = detection_rate;
        let f1 = if precision + recall > 0.0 {
            2.0 * precision * recall / (precision + recall)
        } else {
            0.0
        };

        Self {
            average_iou,
            detection_rate,
            precision,
            recall,
            f1,
            true_positive_count,
            false_positive_count,
            false_negative_count,
            room_count_predicted,
            room_count_truth,
        }
    }
}
