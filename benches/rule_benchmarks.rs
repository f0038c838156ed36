//! Performance benchmarks for the HR operations engine.
//!
//! Covers the pure rules (check-in, check-out, monthly summary, payroll
//! totals) and one round trip through the HTTP router.
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{body::Body, http::Request};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;
use tower::ServiceExt;

use hrms_engine::api::{AppState, ManualClock, create_router};
use hrms_engine::calculation::{apply_check_in, apply_check_out, compute_payroll, summarize};
use hrms_engine::config::{AttendanceConfig, ConfigLoader};
use hrms_engine::models::{AttendanceRecord, Employee};

fn bench_employee() -> Employee {
    serde_json::from_value(serde_json::json!({
        "id": "EMP20240001",
        "email": "bench@example.com",
        "personal_info": {"first_name": "Bench", "last_name": "Mark", "phone_number": "1"},
        "employment_info": {
            "department": "Engineering",
            "position": "Developer",
            "date_of_joining": "2024-01-01"
        },
        "compensation": {"basic_salary": "30000"}
    }))
    .expect("Failed to build employee")
}

fn at(day: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
    day.and_hms_opt(h, m, 0).expect("valid time")
}

/// Builds `days` completed attendance records, every third one late.
fn month_of_records(days: usize) -> Vec<AttendanceRecord> {
    let employee = bench_employee();
    let config = AttendanceConfig::default();
    let first = NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date");

    (0..days)
        .map(|i| {
            let day = first + Duration::days(i as i64);
            let minute = if i % 3 == 0 { 20 } else { 0 };
            let record = apply_check_in(None, &employee, at(day, 9, minute), None, &config)
                .expect("check-in");
            apply_check_out(&record, at(day, 18, 30), None).expect("check-out")
        })
        .collect()
}

/// Benchmark: a check-in followed by a check-out.
fn bench_check_in_out(c: &mut Criterion) {
    let employee = bench_employee();
    let config = AttendanceConfig::default();
    let day = NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date");

    c.bench_function("check_in_then_out", |b| {
        b.iter(|| {
            let record = apply_check_in(
                None,
                black_box(&employee),
                at(day, 9, 17),
                None,
                &config,
            )
            .expect("check-in");
            black_box(apply_check_out(&record, at(day, 18, 42), None).expect("check-out"))
        })
    });
}

/// Benchmark: summarizing one month and one year of records.
fn bench_summarize(c: &mut Criterion) {
    let mut group = c.benchmark_group("summarize");
    for days in [31usize, 366] {
        let records = month_of_records(days);
        group.throughput(Throughput::Elements(days as u64));
        group.bench_with_input(BenchmarkId::from_parameter(days), &records, |b, records| {
            b.iter(|| black_box(summarize(black_box(records))))
        });
    }
    group.finish();
}

/// Benchmark: payroll totals over typical components.
fn bench_compute_payroll(c: &mut Criterion) {
    let earnings: BTreeMap<String, Decimal> = [
        ("basic_salary", "30000"),
        ("hra", "5000"),
        ("transport", "1600"),
        ("medical", "1250"),
        ("overtime", "1234.56"),
        ("bonus", "500"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.parse().expect("decimal")))
    .collect();
    let deductions: BTreeMap<String, Decimal> = [
        ("pf", "1800"),
        ("esi", "0"),
        ("professional_tax", "200"),
        ("tds", "2000"),
        ("advance", "0"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.parse().expect("decimal")))
    .collect();

    c.bench_function("compute_payroll", |b| {
        b.iter(|| black_box(compute_payroll(black_box(&earnings), black_box(&deductions))))
    });
}

/// Benchmark: GET /attendance/summary through the router.
fn bench_summary_endpoint(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("runtime");
    let clock = Arc::new(ManualClock::new(
        at(NaiveDate::from_ymd_opt(2024, 1, 31).expect("valid date"), 12, 0),
    ));
    let config = ConfigLoader::load("./config").expect("Failed to load config");
    let state = AppState::new(config)
        .expect("Failed to build state")
        .with_clock(clock);
    let router = create_router(state);

    c.bench_function("summary_endpoint", |b| {
        b.to_async(&rt).iter(|| async {
            let response = router
                .clone()
                .oneshot(
                    Request::builder()
                        .method("GET")
                        .uri("/attendance/summary?month=1&year=2024")
                        .header("Authorization", "Bearer developer-dev-token")
                        .body(Body::empty())
                        .expect("request"),
                )
                .await
                .expect("response");
            black_box(response)
        })
    });
}

criterion_group!(
    benches,
    bench_check_in_out,
    bench_summarize,
    bench_compute_payroll,
    bench_summary_endpoint,
);
criterion_main!(benches);
