use criterion::{Criterion, criterion_group, criterion_main};
use lectio_syntax::{Context, format_references, locate_references, parse_reference};

fn generate_commentary(paragraphs: usize) -> String {
    let base = "In the beginning (Gen 1:1; 2:4-7) the pattern is set, as II Cor. 5:17 \
                and Rom 8:28-29 later echo. See also v. 3, ch. 4 and John 3:16, 18.\n";
    base.repeat(paragraphs)
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for reference in ["John 3:16-17", "II Corinthians 12", "Gen 1:1; 2:3; 4:5, 7"] {
        group.bench_function(reference, |b| {
            b.iter(|| parse_reference(std::hint::black_box(reference), &Context::default()));
        });
    }

    group.finish();
}

fn bench_locate(c: &mut Criterion) {
    let mut group = c.benchmark_group("locate");
    group.sample_size(20);

    for paragraphs in [1, 100] {
        let text = generate_commentary(paragraphs);
        group.bench_function(format!("{paragraphs}_paragraphs"), |b| {
            b.iter(|| {
                let segments = locate_references(std::hint::black_box(&text), &Context::default());
                std::hint::black_box(segments);
            });
        });
    }

    group.finish();
}

fn bench_format(c: &mut Criterion) {
    let specs = parse_reference("Gen 1:1; 2:4-7; Exodus 3:14, 15", &Context::default());
    c.bench_function("format", |b| {
        b.iter(|| format_references(std::hint::black_box(&specs)));
    });
}

criterion_group!(benches, bench_parse, bench_locate, bench_format);
criterion_main!(benches);
