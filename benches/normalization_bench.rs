use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use entity_prep::text::{normalize_text, script_ratio, ScriptBlockDetector};
use entity_prep::{InlineSpanReplacer, NoopTranslator};
use std::sync::Arc;

const ENGLISH_PARAGRAPH: &str = "Tribhuvan University announces the revised examination schedule for \
    bachelor and master programmes. Students are requested to check the notice board regularly. ";
const MIXED_PARAGRAPH: &str = "The admission notice (भर्ना सूचना) for the academic year २०८१ is \
    published by the शिक्षा, विज्ञान तथा प्रविधि मन्त्रालय together with the schedule. ";
const MOJIBAKE_PARAGRAPH: &str = "à¤¨à¥‡à¤ªà¤¾à¤² Government notice â€” Nepalâ€™s ﬁrst\u{200B} list. ";

fn repeated(paragraph: &str, times: usize) -> String {
    paragraph.repeat(times)
}

fn bench_normalization(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize_text");

    for (name, paragraph) in [
        ("english", ENGLISH_PARAGRAPH),
        ("mixed", MIXED_PARAGRAPH),
        ("mojibake", MOJIBAKE_PARAGRAPH),
    ] {
        let text = repeated(paragraph, 200);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_function(name, |b| b.iter(|| normalize_text(black_box(&text))));
    }

    group.finish();
}

fn bench_script_analysis(c: &mut Criterion) {
    let detector = ScriptBlockDetector::devanagari().expect("Devanagari detector should compile");
    let text = normalize_text(&repeated(MIXED_PARAGRAPH, 200));

    let mut group = c.benchmark_group("script_analysis");
    group.throughput(Throughput::Bytes(text.len() as u64));
    group.bench_function("script_ratio", |b| {
        b.iter(|| script_ratio(black_box(&detector), black_box(&text)))
    });
    group.finish();
}

fn bench_inline_replacement(c: &mut Criterion) {
    let detector = Arc::new(ScriptBlockDetector::devanagari().expect("Devanagari detector should compile"));
    let text = normalize_text(&repeated(MIXED_PARAGRAPH, 200));

    let mut group = c.benchmark_group("inline_replacement");
    group.throughput(Throughput::Bytes(text.len() as u64));

    // Cold: every iteration starts with an empty cache
    group.bench_function("cold_cache", |b| {
        b.iter(|| {
            let replacer =
                InlineSpanReplacer::new(Arc::new(NoopTranslator::new()), detector.clone());
            replacer.replace(black_box(&text), 15_000)
        })
    });

    let warm = InlineSpanReplacer::new(Arc::new(NoopTranslator::new()), detector.clone());
    warm.replace(&text, usize::MAX);
    group.bench_function("warm_cache", |b| {
        b.iter(|| warm.replace(black_box(&text), 15_000))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_normalization,
    bench_script_analysis,
    bench_inline_replacement
);
criterion_main!(benches);
