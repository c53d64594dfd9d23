use criterion::{Criterion, black_box, criterion_group, criterion_main};
use repl_bridge::{
    BridgeConfig, CursorPosition, Document, RegionExtractor, RegionKind, ReplLanguage,
    TextDocument,
};

/// A notebook of `chunks` fenced R chunks, each preceded by a line of prose.
fn large_notebook(chunks: usize) -> String {
    let mut out = String::with_capacity(chunks * 128);
    for i in 0..chunks {
        out.push_str(&format!("Paragraph {i:05} describing the next computation.\n"));
        out.push_str(&format!("```{{r chunk-{i}}}\n"));
        out.push_str(&format!("x{i} <- rnorm(100)\n"));
        out.push('\n');
        out.push_str(&format!("summary(x{i})\n"));
        out.push_str("```\n");
    }
    // Drop the final '\n' so no trailing empty line is created.
    out.pop();
    out
}

fn extractor() -> RegionExtractor {
    let config = BridgeConfig::for_language(&ReplLanguage::R).unwrap();
    RegionExtractor::new(config.chunk_pattern().clone())
}

fn bench_chunk_deep_in_document(c: &mut Criterion) {
    let doc = TextDocument::from_text(&large_notebook(5_000));
    let extractor = extractor();

    // Inside chunk 2_500: well past the top so the backward search is not trivial.
    let cursor = CursorPosition::new(2_500 * 6 + 4, 0);

    c.bench_function("chunk/5k_chunks_middle", |b| {
        b.iter(|| {
            let region = extractor
                .extract(RegionKind::Chunk, black_box(&doc), cursor, None)
                .unwrap();
            black_box(region);
        })
    });
}

fn bench_previous_chunks_to_end(c: &mut Criterion) {
    let doc = TextDocument::from_text(&large_notebook(5_000));
    let extractor = extractor();
    let cursor = CursorPosition::new(doc.line_count(), 0);

    c.bench_function("previous_chunks/5k_chunks", |b| {
        b.iter(|| {
            let region = extractor
                .extract(RegionKind::PreviousChunks, black_box(&doc), cursor, None)
                .unwrap();
            black_box(region.lines.len());
        })
    });
}

criterion_group!(
    benches,
    bench_chunk_deep_in_document,
    bench_previous_chunks_to_end
);
criterion_main!(benches);
