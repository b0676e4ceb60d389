use chrono::{TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};
use std::hint::black_box;
use training_journal::time_utils::{wall_time_to_instant, OffsetOracle};
use training_journal::validation::{validate_plan_at, validate_workout};

fn strength_exercises(count: usize) -> Value {
    (0..count)
        .map(|i| {
            json!({
                "name": format!("Exercise {i}"),
                "sets": [
                    {"reps": 8, "weightKg": 60},
                    {"reps": 8, "weightKg": 62.5},
                    {"reps": 6, "weightKg": 65},
                ],
            })
        })
        .collect()
}

fn benchmark_validation(c: &mut Criterion) {
    let workout = json!({
        "id": "wk-strength-0001",
        "startedAt": "2025-03-10T18:00:00+01:00",
        "sport": "strength",
        "durationMin": 60,
        "rpe": 8,
        "notes": "Heavy day",
        "details": {"exercises": strength_exercises(8)},
    });
    let plan = json!({
        "id": "plan-strength-0001",
        "plannedFor": "2025-03-12T18:00:00+01:00",
        "durationMin": 60,
        "exercises": strength_exercises(8),
    });
    let now = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();

    let mut group = c.benchmark_group("validation");

    group.bench_function("strength_workout", |b| {
        b.iter(|| validate_workout(black_box(&workout)))
    });

    group.bench_function("strength_plan", |b| {
        b.iter(|| validate_plan_at(black_box(&plan), None, now))
    });

    group.finish();
}

fn benchmark_wall_time(c: &mut Criterion) {
    let paris: &dyn OffsetOracle = &chrono_tz::Europe::Paris;
    // Sunday of the spring-forward week
    let date = chrono::NaiveDate::from_ymd_opt(2025, 3, 30).unwrap();
    let time = chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap();

    c.bench_function("wall_time_to_instant_dst", |b| {
        b.iter(|| wall_time_to_instant(paris, black_box(date), black_box(time)))
    });
}

criterion_group!(benches, benchmark_validation, benchmark_wall_time);
criterion_main!(benches);
