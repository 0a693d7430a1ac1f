//! Parser throughput benchmarks

use chrono::{TimeZone, Utc};
use criterion::{Criterion, criterion_group, criterion_main};
use mateweather::MetarParser;
use mateweather::app::services::metar_parser::tokenize;
use std::hint::black_box;

const REPORTS: &[&str] = &[
    "221751Z 18015G25KT 1/4SM +TSRA BKN008 OVC015 18/17 A2992",
    "111251Z 27012KT 10SM FEW250 M09/M17 A3036 RMK AO2 SLP285 T10891172",
    "251020Z 00000KT CAVOK 21/12 Q1018",
    "031650Z VRB03KT 9999 2000SW -SHRA SCT020CB BKN040 12/09 Q1009",
];

fn bench_parse(c: &mut Criterion) {
    let parser = MetarParser::new()
        .with_reference_time(Utc.with_ymd_and_hms(2024, 3, 25, 0, 0, 0).unwrap());

    c.bench_function("parse_reports", |b| {
        b.iter(|| {
            for report in REPORTS {
                black_box(parser.parse(black_box(report)));
            }
        })
    });

    c.bench_function("tokenize_reports", |b| {
        b.iter(|| {
            for report in REPORTS {
                black_box(tokenize(black_box(report)).count());
            }
        })
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
