// SPDX-License-Identifier: MIT OR Apache-2.0

//! Full pipeline: build a log, close it, store it compactly, decode it.

use steplog::compress::{
    compress, compress_with_threshold, decompress, decompress_payload, MinSize, Payload,
};
use steplog::{debug_format, Log};

fn sample_lines() -> Vec<String> {
    Log::with_tag("validation")
        .append("input_valid", true)
        .append("item_count", 3u32)
        .tag("pricing")
        .append_with("total_cents", 104_950u64, |c: &u64| {
            format!("{}.{:02} EUR", c / 100, c % 100)
        })
        .tag("approval")
        .append("granted", true)
        .close(debug_format)
}

#[test]
fn close_then_compress_then_decompress() {
    let lines = sample_lines();
    assert_eq!(
        lines,
        vec![
            "validation_input_valid: true".to_string(),
            "validation_item_count: 3".to_string(),
            "pricing_total_cents: 1049.50 EUR".to_string(),
            "approval_granted: true".to_string(),
        ]
    );
    assert_eq!(decompress(&compress(&lines)).unwrap(), lines);
}

#[test]
fn raw_iff_joined_length_below_threshold() {
    let lines = sample_lines();
    let joined_len: usize =
        lines.iter().map(String::len).sum::<usize>() + lines.len() - 1;

    for min in [0, 1, joined_len, joined_len + 1, 10_000] {
        let payload = compress_with_threshold(&lines, MinSize::Bytes(min));
        let expect_raw = joined_len < min;
        assert_eq!(
            matches!(payload, Payload::Raw(_)),
            expect_raw,
            "min_size {min}, joined {joined_len}"
        );
        assert_eq!(decompress_payload(&payload).unwrap(), lines);
    }
}

#[test]
fn unicode_survives_the_full_pipeline() {
    let lines = Log::with_tag("shipping")
        .append("city", "Zürich".to_string())
        .append("note", "✓ übernacht".to_string())
        .close(debug_format);
    let payload = compress_with_threshold(&lines, MinSize::Bytes(0));
    assert!(payload.is_compressed());
    assert_eq!(decompress_payload(&payload).unwrap(), lines);
}

#[test]
fn empty_log_stores_and_decodes_as_empty() {
    let lines = Log::new().close(debug_format);
    assert!(lines.is_empty());
    assert_eq!(decompress(&compress(&lines)).unwrap(), lines);

    let payload = compress_with_threshold(&lines, MinSize::Auto);
    assert!(matches!(payload, Payload::Raw(ref b) if b.is_empty()));
    assert_eq!(decompress_payload(&payload).unwrap(), lines);
}

#[test]
fn compressed_beats_raw_for_repetitive_logs() {
    let lines: Vec<String> = (0..50)
        .map(|i| format!("retry_attempt_{i}: \"connection refused\""))
        .collect();
    let raw = compress_with_threshold(&lines, MinSize::Bytes(usize::MAX));
    let compressed = compress_with_threshold(&lines, MinSize::Bytes(0));
    assert!(compressed.as_bytes().len() < raw.as_bytes().len());
}

#[test]
fn payload_variant_flag_is_observable_for_persistence() {
    let lines = sample_lines();
    let payload = compress_with_threshold(&lines, MinSize::Auto);
    // Callers persist the flag next to the bytes; both must survive to
    // decode later.
    let (flag, bytes) = (payload.is_compressed(), payload.as_bytes().to_vec());
    let restored = if flag {
        Payload::Compressed(bytes)
    } else {
        Payload::Raw(bytes)
    };
    assert_eq!(decompress_payload(&restored).unwrap(), lines);
}
