//! Corpus-level evaluation report.
//!
//! Reduces many cases' [`CaseMetrics`] into a single [`EvaluationReport`]:
//! mean/median aggregates per field, a per-category breakdown preserving
//! label-insertion order, and a worst-N list for triage. Aggregation sorts
//! cases by their stable identifier first, so the report is identical
//! regardless of the order cases completed in.

use super::metrics::CaseMetrics;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// One case's contribution to a corpus report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseResult {
    /// Stable case identifier (e.g. blueprint id).
    pub case_id: String,
    /// Externally supplied difficulty/category label, if any.
    #[serde(default)]
    pub category: Option<String>,
    /// The case's metrics.
    pub metrics: CaseMetrics,
}

/// Report configuration.
#[derive(Debug, Clone, Copy)]
pub struct ReportConfig {
    /// Number of worst cases to list for triage.
    pub worst_n: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self { worst_n: 5 }
    }
}

/// Mean/median aggregates over a set of cases.
///
/// `mean_iou`/`median_iou` are computed over cases that have a defined
/// `average_iou` (at least one true positive); they are `None` when no case
/// does. Every other statistic counts all cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Number of cases aggregated.
    pub case_count: usize,
    /// Mean of defined per-case IoU averages.
    pub mean_iou: Option<f64>,
    /// Median of defined per-case IoU averages.
    pub median_iou: Option<f64>,
    /// Mean detection rate.
    pub mean_detection_rate: f64,
    /// Median detection rate.
    pub median_detection_rate: f64,
    /// Mean precision.
    pub mean_precision: f64,
    /// Median precision.
    pub median_precision: f64,
    /// Mean recall.
    pub mean_recall: f64,
    /// Median recall.
    pub median_recall: f64,
    /// Mean F1.
    pub mean_f1: f64,
    /// Median F1.
    pub median_f1: f64,
    /// Mean false-positive count.
    pub mean_false_positive_count: f64,
    /// Median false-positive count.
    pub median_false_positive_count: f64,
    /// Mean false-negative count.
    pub mean_false_negative_count: f64,
    /// Median false-negative count.
    pub median_false_negative_count: f64,
    /// Mean predicted-room count.
    pub mean_room_count_predicted: f64,
    /// Median predicted-room count.
    pub median_room_count_predicted: f64,
    /// Mean ground-truth-room count.
    pub mean_room_count_truth: f64,
    /// Median ground-truth-room count.
    pub median_room_count_truth: f64,
}

impl AggregateStats {
    fn from_cases(cases: &[&CaseMetrics]) -> Self {
        let ious: Vec<f64> = cases.iter().filter_map(|m| m.average_iou).collect();

        let field = |f: fn(&CaseMetrics) -> f64| -> Vec<f64> {
            cases.iter().map(|m| f(m)).collect()
        };

        let detection = field(|m| m.detection_rate);
        let precision = field(|m| m.precision);
        let recall = field(|m| m.recall);
        let f1 = field(|m| m.f1);
        let false_pos = field(|m| m.false_positive_count as f64);
        let false_neg = field(|m| m.false_negative_count as f64);
        let predicted = field(|m| m.room_count_predicted as f64);
        let truth = field(|m| m.room_count_truth as f64);

        Self {
            case_count: cases.len(),
            mean_iou: mean(&ious),
            median_iou: median(&ious),
            mean_detection_rate: mean(&detection).unwrap_or(0.0),
            median_detection_rate: median(&detection).unwrap_or(0.0),
            mean_precision: mean(&precision).unwrap_or(0.0),
            median_precision: median(&precision).unwrap_or(0.0),
            mean_recall: mean(&recall).unwrap_or(0.0),
            median_recall: median(&recall).unwrap_or(0.0),
            mean_f1: mean(&f1).unwrap_or(0.0),
            median_f1: median(&f1).unwrap_or(0.0),
            mean_false_positive_count: mean(&false_pos).unwrap_or(0.0),
            median_false_positive_count: median(&false_pos).unwrap_or(0.0),
            mean_false_negative_count: mean(&false_neg).unwrap_or(0.0),
            median_false_negative_count: median(&false_neg).unwrap_or(0.0),
            mean_room_count_predicted: mean(&predicted).unwrap_or(0.0),
            median_room_count_predicted: median(&predicted).unwrap_or(0.0),
            mean_room_count_truth: mean(&truth).unwrap_or(0.0),
            median_room_count_truth: median(&truth).unwrap_or(0.0),
        }
    }
}

/// A worst-performing case, listed for triage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorstCase {
    /// Case identifier.
    pub case_id: String,
    /// The case's detection rate.
    pub detection_rate: f64,
    /// The case's average IoU, when defined.
    pub average_iou: Option<f64>,
}

/// Aggregate accuracy report over a corpus of evaluated cases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    /// Corpus-wide aggregates, flattened into the top level of the report.
    #[serde(flatten)]
    pub overall: AggregateStats,
    /// Aggregates per category label, in label-insertion order.
    pub per_category: IndexMap<String, AggregateStats>,
    /// Cases ranked worst-first by detection rate.
    pub worst_cases: Vec<WorstCase>,
    /// Per-case results, sorted by case id.
    pub cases: Vec<CaseResult>,
    /// Cases that failed structurally and produced no metrics.
    pub cases_failed: usize,
}

impl EvaluationReport {
    /// Aggregate per-case results into a corpus report.
    ///
    /// Cases are sorted by `case_id` before any order-sensitive output, so
    /// the report does not depend on completion order.
    #[must_use]
    pub fn aggregate(mut cases: Vec<CaseResult>, cfg: &ReportConfig) -> Self {
        cases.sort_by(|a, b| a.case_id.cmp(&b.case_id));

        let all: Vec<&CaseMetrics> = cases.iter().map(|c| &c.metrics).collect();
        let overall = AggregateStats::from_cases(&all);

        let mut by_category: IndexMap<String, Vec<&CaseMetrics>> = IndexMap::new();
        for case in &cases {
            if let Some(label) = &case.category {
                by_category
                    .entry(label.clone())
                    .or_default()
                    .push(&case.metrics);
            }
        }
        let per_category = by_category
            .into_iter()
            .map(|(label, group)| (label, AggregateStats::from_cases(&group)))
            .collect();

        let mut ranked: Vec<&CaseResult> = cases.iter().collect();
        ranked.sort_by(|a, b| {
            let a_iou = a.metrics.average_iou.unwrap_or(0.0);
            let b_iou = b.metrics.average_iou.unwrap_or(0.0);
            a.metrics
                .detection_rate
                .total_cmp(&b.metrics.detection_rate)
                .then_with(|| a_iou.total_cmp(&b_iou))
                .then_with(|| a.case_id.cmp(&b.case_id))
        });
        let worst_cases = ranked
            .into_iter()
            .take(cfg.worst_n)
            .map(|c| WorstCase {
                case_id: c.case_id.clone(),
                detection_rate: c.metrics.detection_rate,
                average_iou: c.metrics.average_iou,
            })
            .collect();

        Self {
            overall,
            per_category,
            worst_cases,
            cases,
            cases_failed: 0,
        }
    }

    /// Human-readable one-screen summary.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Evaluated {} cases", self.overall.case_count);
        if self.cases_failed > 0 {
            let _ = writeln!(out, "  failed structurally: {}", self.cases_failed);
        }
        match self.overall.mean_iou {
            Some(iou) => {
                let _ = writeln!(out, "  mean IoU:            {:.3}", iou);
            }
            None => {
                let _ = writeln!(out, "  mean IoU:            n/a (no true positives)");
            }
        }
        let _ = writeln!(
            out,
            "  mean detection rate: {:.3}",
            self.overall.mean_detection_rate
        );
        let _ = writeln!(out, "  mean F1:             {:.3}", self.overall.mean_f1);
        let _ = writeln!(
            out,
            "  mean false positives: {:.2}",
            self.overall.mean_false_positive_count
        );

        for (label, stats) in &self.per_category {
            let _ = writeln!(
                out,
                "  [{}] cases={} detection={:.3} f1={:.3}",
                label, stats.case_count, stats.mean_detection_rate, stats.mean_f1
            );
        }

        if !self.worst_cases.is_empty() {
            let _ = writeln!(out, "  worst cases:");
            for worst in &self.worst_cases {
                let _ = writeln!(
                    out,
                    "    {} detection={:.3} iou={}",
                    worst.case_id,
                    worst.detection_rate,
                    worst
                        .average_iou
                        .map_or_else(|| "n/a".to_string(), |v| format!("{:.3}", v)),
                );
            }
        }

        out
    }
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics(detection_rate: f64, average_iou: Option<f64>) -> CaseMetrics {
        let truth = 4usize;
        let tp = (detection_rate * truth as f64).round() as usize;
        CaseMetrics {
            average_iou,
            detection_rate,
            precision: detection_rate,
            recall: detection_rate,
            f1: detection_rate,
            true_positive_count: tp,
            false_positive_count: truth - tp,
            false_negative_count: truth - tp,
            room_count_predicted: truth,
            room_count_truth: truth,
        }
    }

    fn case(id: &str, category: Option<&str>, detection: f64, iou: Option<f64>) -> CaseResult {
        CaseResult {
            case_id: id.to_string(),
            category: category.map(str::to_string),
            metrics: metrics(detection, iou),
        }
    }

    #[test]
    fn mean_detection_rate_two_cases() {
        let report = EvaluationReport::aggregate(
            vec![
                case("a", None, 1.0, Some(0.9)),
                case("b", None, 0.5, Some(0.7)),
            ],
            &ReportConfig::default(),
        );
        assert!((report.overall.mean_detection_rate - 0.75).abs() < 1e-12);
    }

    #[test]
    fn undefined_iou_excluded_from_iou_mean_only() {
        let report = EvaluationReport::aggregate(
            vec![
                case("a", None, 1.0, Some(0.8)),
                case("b", None, 0.0, None),
            ],
            &ReportConfig::default(),
        );
        // IoU mean over the single defined case
        assert_eq!(report.overall.mean_iou, Some(0.8));
        // Detection mean over both
        assert!((report.overall.mean_detection_rate - 0.5).abs() < 1e-12);
        assert_eq!(report.overall.case_count, 2);
    }

    #[test]
    fn all_undefined_iou_is_none() {
        let report = EvaluationReport::aggregate(
            vec![case("a", None, 0.0, None)],
            &ReportConfig::default(),
        );
        assert_eq!(report.overall.mean_iou, None);
        assert_eq!(report.overall.median_iou, None);
    }

    #[test]
    fn median_of_even_count_averages_middles() {
        let report = EvaluationReport::aggregate(
            vec![
                case("a", None, 0.0, None),
                case("b", None, 0.25, None),
                case("c", None, 0.75, None),
                case("d", None, 1.0, None),
            ],
            &ReportConfig::default(),
        );
        assert!((report.overall.median_detection_rate - 0.5).abs() < 1e-12);
    }

    #[test]
    fn category_breakdown_preserves_insertion_order() {
        let report = EvaluationReport::aggregate(
            vec![
                case("a", Some("level2"), 1.0, Some(0.9)),
                case("b", Some("level1"), 0.5, Some(0.8)),
                case("c", Some("level2"), 0.0, None),
            ],
            &ReportConfig::default(),
        );
        // Cases sort by id first, so "level2" (case a) is inserted before
        // "level1" (case b)
        let labels: Vec<&String> = report.per_category.keys().collect();
        assert_eq!(labels, ["level2", "level1"]);
        assert_eq!(report.per_category["level2"].case_count, 2);
        assert_eq!(report.per_category["level1"].case_count, 1);
    }

    #[test]
    fn worst_cases_ranked_ascending() {
        let report = EvaluationReport::aggregate(
            vec![
                case("good", None, 1.0, Some(0.95)),
                case("bad", None, 0.0, None),
                case("mid", None, 0.5, Some(0.6)),
            ],
            &ReportConfig { worst_n: 2 },
        );
        assert_eq!(report.worst_cases.len(), 2);
        assert_eq!(report.worst_cases[0].case_id, "bad");
        assert_eq!(report.worst_cases[1].case_id, "mid");
    }

    #[test]
    fn worst_case_tie_broken_by_iou() {
        let report = EvaluationReport::aggregate(
            vec![
                case("higher_iou", None, 0.5, Some(0.9)),
                case("lower_iou", None, 0.5, Some(0.6)),
            ],
            &ReportConfig { worst_n: 1 },
        );
        assert_eq!(report.worst_cases[0].case_id, "lower_iou");
    }

    #[test]
    fn aggregation_is_order_independent() {
        let cases = vec![
            case("c", Some("x"), 0.3, Some(0.4)),
            case("a", Some("y"), 0.9, Some(0.8)),
            case("b", Some("x"), 0.6, None),
        ];
        let mut shuffled = cases.clone();
        shuffled.reverse();

        let report_a = EvaluationReport::aggregate(cases, &ReportConfig::default());
        let report_b = EvaluationReport::aggregate(shuffled, &ReportConfig::default());
        assert_eq!(report_a, report_b);
    }

    #[test]
    fn report_wire_contract_fields() {
        let report = EvaluationReport::aggregate(
            vec![case("a", Some("level1"), 1.0, Some(0.9))],
            &ReportConfig::default(),
        );
        let json = serde_json::to_value(&report).unwrap();
        // Flattened aggregates at the top level
        assert!(json.get("mean_iou").is_some());
        assert!(json.get("median_iou").is_some());
        assert!(json.get("mean_detection_rate").is_some());
        assert!(json.get("mean_false_positive_count").is_some());
        assert!(json["per_category"].get("level1").is_some());
        assert!(json["worst_cases"][0].get("case_id").is_some());
    }

    #[test]
    fn summary_renders() {
        let report = EvaluationReport::aggregate(
            vec![case("a", Some("level1"), 0.5, Some(0.7))],
            &ReportConfig::default(),
        );
        let text = report.summary();
        assert!(text.contains("Evaluated 1 cases"));
        assert!(text.contains("level1"));
    }
}
