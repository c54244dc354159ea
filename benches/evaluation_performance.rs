//! Performance benchmarks for the evaluation hot path.
//!
//! # Usage
//!
//! ```bash
//! cargo bench --bench evaluation_performance
//! ```
//!
//! Matching is quadratic in room count per case; real blueprints carry
//! single digits to low tens of rooms, so the grid sizes here bracket the
//! realistic range.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use roomiq::eval::{match_rooms, CaseMetrics, MatcherConfig};
use roomiq::types::Confidence;
use roomiq::{detect_rooms, BoundingBox, GroundTruthRoom, Room, ValidatorConfig};

/// Build an n x n grid of rooms; predictions are jittered by `offset`.
fn grid(n: usize, offset: f64) -> Vec<BoundingBox> {
    let cell = 1000.0 / n as f64;
    let mut boxes = Vec::with_capacity(n * n);
    for row in 0..n {
        for col in 0..n {
            let x_min = (col as f64 * cell + offset).clamp(0.0, 990.0);
            let y_min = (row as f64 * cell + offset).clamp(0.0, 990.0);
            let x_max = (x_min + cell * 0.9).min(1000.0);
            let y_max = (y_min + cell * 0.9).min(1000.0);
            boxes.push(BoundingBox::new(x_min, y_min, x_max, y_max).expect("grid box is valid"));
        }
    }
    boxes
}

fn bench_matching(c: &mut Criterion) {
    for n in [3usize, 6] {
        let predicted: Vec<Room> = grid(n, 4.0)
            .into_iter()
            .enumerate()
            .map(|(i, b)| Room::new(format!("p{}", i), b, None, Confidence::CERTAIN))
            .collect();
        let truth: Vec<GroundTruthRoom> = grid(n, 0.0)
            .into_iter()
            .enumerate()
            .map(|(i, b)| GroundTruthRoom::new(format!("g{}", i), b, None))
            .collect();
        let cfg = MatcherConfig::default();

        c.bench_function(&format!("match_rooms_{}x{}", n, n), |bencher| {
            bencher.iter(|| {
                let results = match_rooms(black_box(&predicted), black_box(&truth), &cfg);
                black_box(CaseMetrics::from_matches(&results))
            });
        });
    }
}

fn bench_detection(c: &mut Criterion) {
    let rooms: Vec<String> = (0..12)
        .map(|i| {
            format!(
                r#"{{"id": "room_{}", "bounding_box": [{}, {}, {}, {}], "name_hint": "Room {}"}}"#,
                i,
                (i % 4) * 250,
                (i / 4) * 300,
                (i % 4) * 250 + 200,
                (i / 4) * 300 + 250,
                i
            )
        })
        .collect();
    let response = format!(
        "I analyzed the blueprint. Here are the rooms I found:\n\n```json\n[{}]\n```\n\nLet me know if anything looks off.",
        rooms.join(",\n")
    );
    let cfg = ValidatorConfig::default();

    c.bench_function("detect_rooms_fenced_response", |bencher| {
        bencher.iter(|| black_box(detect_rooms(black_box(&response), &cfg)));
    });
}

criterion_group!(benches, bench_matching, bench_detection);
criterion_main!(benches);
