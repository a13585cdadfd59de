use criterion::{Criterion, black_box, criterion_group, criterion_main};
use codehub_runner::figure::{Figure, Series, SeriesKind, render_png};
use codehub_runner::wire::handle_run_code;
use codehub_runner::{ExecutionRequest, Executor};

const SURVEY: &str = r#"
    let count = input("How many? ").parse_int();
    let total = 0;
    for i in 0..count {
        total += input(`Value ${i + 1}: `).parse_int();
    }
    print(`total: ${total}`);
"#;

fn benchmark_replay(c: &mut Criterion) {
    let executor = Executor::default();
    let answers: Vec<String> = std::iter::once("20".to_string())
        .chain((1..=20).map(|i| i.to_string()))
        .collect();
    let request = ExecutionRequest::replaying(SURVEY, answers);

    c.bench_function("replay_21_answers", |b| {
        b.iter(|| {
            let outcome = executor.execute(black_box(&request));
            assert!(outcome.is_completed());
        })
    });

    let body = br#"{"code": "print(\"hi\")", "inputs": [], "input_index": 0}"#;
    c.bench_function("wire_round_trip", |b| {
        b.iter(|| handle_run_code("POST", black_box(body), &executor))
    });
}

fn benchmark_render(c: &mut Criterion) {
    let mut figure = Figure::new(1);
    figure.title = Some("benchmark".to_string());
    let ys: Vec<f64> = (0..200).map(|i| (i as f64 / 10.0).sin()).collect();
    figure.series.push(Series::indexed(SeriesKind::Line, ys));

    c.bench_function("render_png_640x480", |b| {
        b.iter(|| render_png(black_box(&figure), 640, 480).map(|png| png.len()))
    });
}

criterion_group!(benches, benchmark_replay, benchmark_render);
criterion_main!(benches);
