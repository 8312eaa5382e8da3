//! Benchmarks for PalmDOC decompression and markup scanning.
//!
//! Run with: cargo bench

use criterion::{criterion_group, criterion_main, Criterion};

use mobitext::palmdoc;
use mobitext::scanner::{MarkupEvent, MarkupScanner};

/// Builds a compressed record mixing all four code classes, shaped like
/// real prose: literal words, byte-pair spaces, and back-references to
/// repeated phrases.
fn sample_record() -> Vec<u8> {
    let mut record = Vec::new();
    record.extend_from_slice(b"the rain in spain falls mainly on the plain.");

    // 0xC0-0xFF pairs: space plus an uppercase letter.
    for c in b"SPAIN" {
        record.push(c ^ 0x80);
    }

    // Back-references into the opening phrase (distance well within the
    // output written so far, length 3-10).
    for length in 3u16..=10 {
        let compound = (20 << 3) | (length - 3);
        record.push(0x80 | (compound >> 8) as u8);
        record.push((compound & 0xFF) as u8);
    }

    // Literal runs of out-of-range bytes.
    record.extend_from_slice(&[4, 0x81, 0x82, 0x83, 0x84]);

    // Pad with plain literals, keeping the output under the record cap.
    while record.len() < 512 {
        record.extend_from_slice(b" over and over ");
    }
    record
}

fn sample_markup() -> String {
    let mut markup = String::from("<html><body>");
    for i in 0..200 {
        markup.push_str(&format!(
            "<p>Paragraph {i} with an &amp; entity and <a filepos=0000001234 >a link</a>.</p>"
        ));
    }
    markup.push_str("</body></html>");
    markup
}

fn bench_decompress(c: &mut Criterion) {
    let record = sample_record();

    c.bench_function("palmdoc_decompress", |b| {
        b.iter(|| palmdoc::decompress(&record).unwrap());
    });
}

fn bench_scan_markup(c: &mut Criterion) {
    let markup = sample_markup();

    c.bench_function("scan_markup", |b| {
        b.iter(|| {
            let mut scanner = MarkupScanner::new(&markup);
            let mut events = 0usize;
            while scanner.next_event() != MarkupEvent::EndOfStream {
                events += 1;
            }
            events
        });
    });
}

criterion_group!(benches, bench_decompress, bench_scan_markup);
criterion_main!(benches);
