use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nextdo_core::recurrence::{next_date, RecurrenceRule};

fn now() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

fn bench_rule_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("rule_parsing");
    for rule in ["d 7", "y", "w 1,3,5", "m 1,15,-1 1,4,7,10"] {
        group.bench_with_input(BenchmarkId::from_parameter(rule), rule, |b, rule| {
            b.iter(|| black_box(rule).parse::<RecurrenceRule>().unwrap())
        });
    }
    group.finish();
}

fn bench_next_date(c: &mut Criterion) {
    let mut group = c.benchmark_group("next_date");
    let cases = [
        ("daily_far_past", "19900101", "d 3"),
        ("yearly_far_past", "19900615", "y"),
        ("weekly", "20240101", "w 7"),
        ("monthly_last_day", "20240101", "m -1"),
        ("monthly_leap_day", "20240101", "m 29 2"),
    ];
    for (name, anchor, rule) in cases {
        group.bench_function(name, |b| {
            b.iter(|| next_date(black_box(now()), black_box(anchor), black_box(rule)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_rule_parsing, bench_next_date);
criterion_main!(benches);
