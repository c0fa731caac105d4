use criterion::{Criterion, black_box, criterion_group, criterion_main};
use regblocks_syntax::Parser;

fn bench_literals(c: &mut Criterion) {
    let input = "hello world this is a test hello universe";

    c.bench_function("parse_literals", |b| {
        b.iter(|| Parser::new(black_box(input)).parse())
    });
}

fn bench_named_groups(c: &mut Criterion) {
    let input = r"(?<year>\d{4})-(?<month>\d{2})-(?<day>\d{2})\k<year>";

    c.bench_function("parse_named_groups", |b| {
        b.iter(|| Parser::new(black_box(input)).parse())
    });
}

fn bench_email(c: &mut Criterion) {
    let input = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

    c.bench_function("parse_email", |b| {
        b.iter(|| Parser::new(black_box(input)).parse())
    });
}

fn bench_unicode_mode(c: &mut Criterion) {
    let input = r"(?<=\u{1F600})[\p{L}\d]+(?!A)";

    c.bench_function("parse_unicode_mode", |b| {
        b.iter(|| Parser::new(black_box(input)).unicode(true).parse())
    });
}

fn bench_deep_nesting(c: &mut Criterion) {
    let input = "(".repeat(64) + "a|b" + &")".repeat(64);

    c.bench_function("parse_deep_nesting", |b| {
        b.iter(|| Parser::new(black_box(&input)).parse())
    });
}

criterion_group!(
    benches,
    bench_literals,
    bench_named_groups,
    bench_email,
    bench_unicode_mode,
    bench_deep_nesting,
);

criterion_main!(benches);
