use bashc::{parser, Config};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::time::Duration;

const SMALL_BASH: &str = r#"
echo "starting install"
PREFIX=/usr/local
if [ -d "$PREFIX" ]; then
  echo "prefix exists"
fi
"#;

const MEDIUM_BASH: &str = r#"
set -e
PREFIX="/usr/local"
VERSION="1.0.0"
ARCH="x86_64"

check_exists() {
  [ -d "$PREFIX/app" ]
}

install_component() {
  mkdir -p "$PREFIX/app"
  cp -r ./dist/* "$PREFIX/app"
}

if check_exists; then
  echo "already installed"
else
  install_component
fi

for i in {1..5}; do
  echo "step $i"
done

git log --oneline | head -5 | tee "$PREFIX/app/install.log"
"#;

fn benchmark_lex_and_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("lex_and_parse");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(50);

    group.bench_with_input(BenchmarkId::new("parse", "small"), &SMALL_BASH, |b, source| {
        b.iter(|| parser::parse(source).expect("small.sh should parse"))
    });

    group.bench_with_input(BenchmarkId::new("parse", "medium"), &MEDIUM_BASH, |b, source| {
        b.iter(|| parser::parse(source).expect("medium.sh should parse"))
    });

    group.bench_with_input(
        BenchmarkId::new("parse_with_recovery", "medium"),
        &MEDIUM_BASH,
        |b, source| b.iter(|| parser::parse_with_recovery(source)),
    );

    group.finish();
}

fn benchmark_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(30);

    let config = Config::default();

    group.throughput(Throughput::Bytes(SMALL_BASH.len() as u64));
    group.bench_with_input(BenchmarkId::new("transpile", "small"), &(SMALL_BASH, &config), |b, (source, config)| {
        b.iter(|| bashc::transpile(source, (*config).clone()))
    });

    group.throughput(Throughput::Bytes(MEDIUM_BASH.len() as u64));
    group.bench_with_input(BenchmarkId::new("transpile", "medium"), &(MEDIUM_BASH, &config), |b, (source, config)| {
        b.iter(|| bashc::transpile(source, (*config).clone()))
    });

    group.finish();
}

fn benchmark_scalability(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalability");
    let config = Config::default();

    for lines in [10, 50, 200].iter() {
        let source = generate_repeated_echo_script(*lines);
        group.throughput(Throughput::Elements(*lines as u64));
        group.bench_with_input(BenchmarkId::new("transpile_n_lines", lines), &source, |b, source| {
            b.iter(|| bashc::transpile(source, config.clone()))
        });
    }

    group.finish();
}

fn generate_repeated_echo_script(lines: usize) -> String {
    let mut out = String::new();
    for i in 0..lines {
        out.push_str(&format!("echo \"line {i}\"\n"));
    }
    out
}

criterion_group!(benches, benchmark_lex_and_parse, benchmark_end_to_end, benchmark_scalability);
criterion_main!(benches);
