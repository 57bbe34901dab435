// SPDX-License-Identifier: MIT OR Apache-2.0

//! Size-aware compression of a serialized log.
//!
//! A closed log is a list of strings. For storage, the list is joined
//! with `"\n"` and run through zlib (deflate-class, so any external
//! consumer with a standard zlib inflate — a SQL decompression
//! extension, another runtime's standard library — can decode the bytes
//! verbatim).
//!
//! Small logs are the common case, and a deflate-class codec carries a
//! fixed per-stream header that makes compressed output *larger* than
//! tiny inputs. [`compress_with_threshold`] therefore skips the codec
//! below a byte threshold and returns a [`Payload`] that records which
//! variant was produced. Callers persisting a `Payload` must persist the
//! variant flag too; the two byte forms are not self-describing.
//!
//! # Format limitations
//!
//! A literal `"\n"` inside an entry string is indistinguishable from the
//! entry separator after the join/split round trip: one entry containing
//! a newline comes back as two entries. Preserved as specified, not
//! escaped. Relatedly, the degenerate list `[""]` joins to the same
//! bytes as the empty list and decodes as `[]`.

use std::io;
use std::io::{Read, Write};

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use thiserror::Error;

/// Threshold used by [`MinSize::Auto`]: joined payloads under 100 bytes
/// are stored raw.
pub const DEFAULT_MIN_SIZE: usize = 100;

/// Minimum joined-payload size at which compression kicks in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MinSize {
    /// Use [`DEFAULT_MIN_SIZE`].
    #[default]
    Auto,
    /// Explicit threshold in bytes; `Bytes(0)` always compresses.
    Bytes(usize),
}

impl MinSize {
    fn threshold(self) -> usize {
        match self {
            MinSize::Auto => DEFAULT_MIN_SIZE,
            MinSize::Bytes(n) => n,
        }
    }
}

/// The outcome of a size-thresholded compression.
///
/// `Raw` carries the joined UTF-8 bytes untouched; `Compressed` carries
/// zlib output. Which variant was used must be stored alongside the
/// bytes (a sibling column or flag) for [`decompress_payload`] to
/// dispatch on later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Joined entries, uncompressed.
    Raw(Vec<u8>),
    /// Zlib-compressed joined entries.
    Compressed(Vec<u8>),
}

impl Payload {
    /// The stored bytes, whichever variant holds them.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Payload::Raw(b) | Payload::Compressed(b) => b,
        }
    }

    /// True for the [`Payload::Compressed`] variant.
    pub fn is_compressed(&self) -> bool {
        matches!(self, Payload::Compressed(_))
    }
}

/// Errors surfaced while decoding a stored log.
///
/// Decoding never yields a partial entry list; any failure in the codec
/// or in UTF-8 validation returns an error instead.
#[derive(Debug, Error)]
pub enum CompressError {
    /// The zlib stream is malformed or truncated.
    #[error("corrupt compressed log: {0}")]
    Codec(#[from] io::Error),
    /// The decoded bytes are not valid UTF-8.
    #[error("decoded log is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Result alias for decode operations.
pub type CompressResult<T> = Result<T, CompressError>;

/// Compresses serialized entries: join with `"\n"`, then zlib.
///
/// ```rust
/// use steplog::compress::{compress, decompress};
///
/// let entries = vec!["validation_input_valid: true".to_string()];
/// let bytes = compress(&entries);
/// assert_eq!(decompress(&bytes).unwrap(), entries);
/// ```
pub fn compress<S: AsRef<str>>(entries: &[S]) -> Vec<u8> {
    deflate(join(entries).as_bytes())
}

/// Compresses only when the joined payload is at least `min_size` bytes;
/// smaller payloads are returned raw.
///
/// ```rust
/// use steplog::compress::{compress_with_threshold, MinSize, Payload};
///
/// let entries = vec!["s_a: 1".to_string()];
/// let payload = compress_with_threshold(&entries, MinSize::Auto);
/// assert!(matches!(payload, Payload::Raw(_)));
///
/// let payload = compress_with_threshold(&entries, MinSize::Bytes(0));
/// assert!(payload.is_compressed());
/// ```
pub fn compress_with_threshold<S: AsRef<str>>(entries: &[S], min_size: MinSize) -> Payload {
    let joined = join(entries);
    if joined.len() < min_size.threshold() {
        Payload::Raw(joined.into_bytes())
    } else {
        Payload::Compressed(deflate(joined.as_bytes()))
    }
}

/// Inflates compressed bytes and splits them back into entries.
///
/// A malformed or truncated stream, or invalid UTF-8 inside it, returns
/// an error; the entry list is never partially reconstructed. An empty
/// decoded payload yields an empty list.
pub fn decompress(bytes: &[u8]) -> CompressResult<Vec<String>> {
    let mut decoder = ZlibDecoder::new(bytes);
    let mut decoded = Vec::new();
    decoder.read_to_end(&mut decoded)?;
    split(String::from_utf8(decoded)?)
}

/// Decodes a [`Payload`], dispatching on its variant.
pub fn decompress_payload(payload: &Payload) -> CompressResult<Vec<String>> {
    match payload {
        Payload::Raw(bytes) => split(String::from_utf8(bytes.clone())?),
        Payload::Compressed(bytes) => decompress(bytes),
    }
}

/// [`decompress`] for callers that treat corruption as unrecoverable.
///
/// # Panics
///
/// Panics with the underlying cause on any decode failure.
pub fn decompress_strict(bytes: &[u8]) -> Vec<String> {
    match decompress(bytes) {
        Ok(entries) => entries,
        Err(e) => panic!("steplog: {e}"),
    }
}

fn join<S: AsRef<str>>(entries: &[S]) -> String {
    let mut joined = String::new();
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            joined.push('\n');
        }
        joined.push_str(entry.as_ref());
    }
    joined
}

fn split(joined: String) -> CompressResult<Vec<String>> {
    if joined.is_empty() {
        return Ok(Vec::new());
    }
    Ok(joined.split('\n').map(str::to_string).collect())
}

fn deflate(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    // Writing into a Vec cannot fail.
    encoder
        .write_all(bytes)
        .expect("in-memory deflate cannot fail");
    encoder.finish().expect("in-memory deflate cannot fail")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn round_trip_preserves_entries() {
        let input = entries(&[
            "validation_input_valid: true",
            "authorization_user_role: \"admin\"",
        ]);
        assert_eq!(decompress(&compress(&input)).unwrap(), input);
    }

    #[test]
    fn round_trip_empty_list() {
        let input: Vec<String> = Vec::new();
        assert_eq!(decompress(&compress(&input)).unwrap(), input);
    }

    #[test]
    fn round_trip_unicode() {
        let input = entries(&["shipping_city: \"Zürich\"", "notes_emoji: \"✓ approved\""]);
        assert_eq!(decompress(&compress(&input)).unwrap(), input);
    }

    #[test]
    fn embedded_newline_splits_into_two_entries() {
        // Known format limitation: a literal newline in a value is
        // indistinguishable from an entry separator after the round trip.
        let input = entries(&["s_note: \"line one\nline two\""]);
        let output = decompress(&compress(&input)).unwrap();
        assert_eq!(
            output,
            entries(&["s_note: \"line one", "line two\""])
        );
    }

    #[test]
    fn threshold_boundary() {
        let input = entries(&["abcde"]); // joined length 5
        assert!(matches!(
            compress_with_threshold(&input, MinSize::Bytes(6)),
            Payload::Raw(_)
        ));
        // Equal to the threshold is not "below" it.
        assert!(compress_with_threshold(&input, MinSize::Bytes(5)).is_compressed());
    }

    #[test]
    fn zero_threshold_always_compresses() {
        let empty: Vec<String> = Vec::new();
        assert!(compress_with_threshold(&empty, MinSize::Bytes(0)).is_compressed());
    }

    #[test]
    fn auto_threshold_is_one_hundred_bytes() {
        assert_eq!(MinSize::Auto.threshold(), 100);
        assert_eq!(MinSize::default(), MinSize::Auto);
        let short = entries(&["s_a: 1"]);
        assert!(matches!(
            compress_with_threshold(&short, MinSize::Auto),
            Payload::Raw(_)
        ));
        let long = entries(&[&"x".repeat(100)]);
        assert!(compress_with_threshold(&long, MinSize::Auto).is_compressed());
    }

    #[test]
    fn payload_round_trips_both_variants() {
        let input = entries(&["s_a: 1", "s_b: 2"]);
        let raw = compress_with_threshold(&input, MinSize::Bytes(usize::MAX));
        assert!(!raw.is_compressed());
        assert_eq!(decompress_payload(&raw).unwrap(), input);

        let compressed = compress_with_threshold(&input, MinSize::Bytes(0));
        assert!(compressed.is_compressed());
        assert_eq!(decompress_payload(&compressed).unwrap(), input);
    }

    #[test]
    fn garbage_input_is_a_recoverable_error() {
        let err = decompress(b"definitely not a zlib stream").unwrap_err();
        assert!(matches!(err, CompressError::Codec(_)));
    }

    #[test]
    fn truncated_stream_is_a_recoverable_error() {
        let bytes = compress(&entries(&["s_a: 1", "s_b: 2", "s_c: 3"]));
        let truncated = &bytes[..bytes.len() / 2];
        assert!(decompress(truncated).is_err());
    }

    #[test]
    fn raw_payload_with_invalid_utf8_is_an_error() {
        let payload = Payload::Raw(vec![0xff, 0xfe, 0xfd]);
        assert!(matches!(
            decompress_payload(&payload),
            Err(CompressError::Utf8(_))
        ));
    }

    #[test]
    #[should_panic(expected = "corrupt compressed log")]
    fn strict_decompress_panics_on_corruption() {
        decompress_strict(b"garbage");
    }
}
