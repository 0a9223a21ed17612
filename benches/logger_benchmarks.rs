//! Criterion benchmarks for customlog

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use customlog::prelude::*;
use customlog::render_message;
use tempfile::TempDir;

/// Sink that formats and discards, isolating logger overhead from IO
struct Discard {
    formatter: LineFormatter,
}

impl Appender for Discard {
    fn append(&mut self, record: &LogRecord) -> Result<()> {
        black_box(self.formatter.format(record));
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "discard"
    }
}

fn discarding_logger(level: LevelFilter) -> Logger {
    Logger::builder()
        .min_level(level)
        .appender(Discard {
            formatter: LineFormatter::new(),
        })
        .build()
}

// ============================================================================
// Rendering Benchmarks
// ============================================================================

fn bench_render_message(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_message");
    group.throughput(Throughput::Elements(1));

    for count in [0usize, 1, 4] {
        let template = vec!["field={}"; count.max(1)].join(" ");
        let params: Vec<String> = (0..count).map(|i| format!("value{}", i)).collect();
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| render_message(black_box(&template), black_box(&params)));
        });
    }

    group.finish();
}

fn bench_formatters(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatters");
    group.throughput(Throughput::Elements(1));

    let record = LogRecord::new(LogLevel::Info, "user {} logged in from {}")
        .with_params(["alice", "10.0.0.1"])
        .with_target("Auth");

    let line = LineFormatter::new();
    group.bench_function("line", |b| b.iter(|| line.format(black_box(&record))));

    let simple = SimpleFormatter::new();
    group.bench_function("simple", |b| b.iter(|| simple.format(black_box(&record))));

    let traced = record
        .clone()
        .with_error(ErrorReport::new("timeout").with_cause("connection reset"));
    group.bench_function("line_with_trace", |b| {
        b.iter(|| line.format(black_box(&traced)))
    });

    group.finish();
}

// ============================================================================
// Level Filtering Benchmarks
// ============================================================================

fn bench_level_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_filtering");
    group.throughput(Throughput::Elements(1));

    let logger = discarding_logger(LevelFilter::Warn);

    group.bench_function("filtered_out", |b| {
        b.iter(|| logger.debug(black_box("dropped {} {}"), &[&1, &"two"]));
    });

    group.bench_function("passed", |b| {
        b.iter(|| logger.warn(black_box("kept {} {}"), &[&1, &"two"]));
    });

    group.finish();
}

// ============================================================================
// File Output Benchmarks
// ============================================================================

fn bench_file_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_logging");
    group.throughput(Throughput::Elements(1));

    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let buffered = Logger::builder()
        .output_path(temp_dir.path().join("buffered.log"))
        .rotation(RotationPolicy::new().with_max_size(1024 * 1024).with_max_backups(2))
        .build();
    group.bench_function("buffered", |b| {
        b.iter(|| buffered.info(black_box("request {} took {}ms"), &[&"/api", &12]));
    });

    let direct = Logger::builder()
        .output_path(temp_dir.path().join("direct.log"))
        .rotation(RotationPolicy::new().with_max_size(1024 * 1024).with_max_backups(2))
        .buffered(false)
        .build();
    group.bench_function("unbuffered", |b| {
        b.iter(|| direct.info(black_box("request {} took {}ms"), &[&"/api", &12]));
    });

    group.finish();
}

fn bench_concurrent_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_logging");

    let logger = discarding_logger(LevelFilter::All);

    group.bench_function("multi_thread_4", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|t| {
                    let logger = logger.clone();
                    std::thread::spawn(move || {
                        for i in 0..100 {
                            logger.info("worker {} item {}", &[&t, &i]);
                        }
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap();
            }
        });
    });

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(
    benches,
    bench_render_message,
    bench_formatters,
    bench_level_filtering,
    bench_file_logging,
    bench_concurrent_logging
);

criterion_main!(benches);
