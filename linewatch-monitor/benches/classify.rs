use criterion::{black_box, criterion_group, criterion_main, Criterion};
use linewatch_monitor::{classify, describe};

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");

    group.bench_function("refused", |b| {
        b.iter(|| classify(black_box(Some("ECONNREFUSED http://localhost:8060/: error sending request"))))
    });

    group.bench_function("generic_fallback", |b| {
        b.iter(|| classify(black_box(Some("Network Error"))))
    });

    group.bench_function("describe_generic", |b| {
        b.iter(|| describe(black_box(Some("Request failed with status code 502"))))
    });

    group.finish();
}

criterion_group!(benches, bench_classify);
criterion_main!(benches);
