//! Byte encoding and field delimiter sniffing.
//!
//! Encoding is guessed from a fixed-size prefix of the file: a byte order
//! mark wins, then UTF-16 is recognised by where NUL bytes fall, then the
//! prefix is checked for UTF-8 validity. Anything else is read as
//! windows-1252, which accepts every byte.

use std::borrow::Cow;
use std::path::Path;

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};

use crate::error::{IngestError, Result};

/// Number of leading bytes inspected when guessing the encoding.
pub const ENCODING_SAMPLE_BYTES: usize = 10_000;

/// Number of leading decoded characters inspected for the delimiter.
pub const DELIMITER_SAMPLE_CHARS: usize = 1024;

/// Fraction of byte pairs that must carry a NUL on one side to call UTF-16.
const UTF16_NUL_RATIO: f64 = 0.3;

/// Result of encoding sniffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodingGuess {
    pub encoding: &'static Encoding,
    /// Length of the byte order mark to skip, zero when absent.
    pub bom_len: usize,
    /// Every sampled byte was 7-bit ASCII.
    pub ascii_only: bool,
}

impl EncodingGuess {
    fn plain(encoding: &'static Encoding) -> Self {
        Self {
            encoding,
            bom_len: 0,
            ascii_only: false,
        }
    }

    /// Lower-case label for reports, `ascii` for pure ASCII samples.
    pub fn label(&self) -> String {
        if self.ascii_only {
            "ascii".to_string()
        } else {
            self.encoding.name().to_ascii_lowercase()
        }
    }

    /// True when ASCII text is stored byte-for-byte.
    pub fn is_ascii_compatible(&self) -> bool {
        self.encoding.is_ascii_compatible()
    }
}

/// Guesses the encoding of `bytes` from its first [`ENCODING_SAMPLE_BYTES`].
pub fn sniff_encoding(bytes: &[u8]) -> EncodingGuess {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        return EncodingGuess {
            encoding,
            bom_len,
            ascii_only: false,
        };
    }

    let sample = &bytes[..bytes.len().min(ENCODING_SAMPLE_BYTES)];

    if let Some(encoding) = utf16_by_nul_parity(sample) {
        return EncodingGuess::plain(encoding);
    }

    if sample.is_ascii() {
        return EncodingGuess {
            encoding: UTF_8,
            bom_len: 0,
            ascii_only: true,
        };
    }

    match std::str::from_utf8(sample) {
        Ok(_) => EncodingGuess::plain(UTF_8),
        // A multi-byte sequence cut off by the sample boundary is still UTF-8.
        Err(err) if err.error_len().is_none() => EncodingGuess::plain(UTF_8),
        Err(_) => EncodingGuess::plain(WINDOWS_1252),
    }
}

fn utf16_by_nul_parity(sample: &[u8]) -> Option<&'static Encoding> {
    let pairs = sample.len() / 2;
    if pairs == 0 {
        return None;
    }
    let mut even_nuls = 0usize;
    let mut odd_nuls = 0usize;
    for pair in sample.chunks_exact(2) {
        if pair[0] == 0 {
            even_nuls += 1;
        }
        if pair[1] == 0 {
            odd_nuls += 1;
        }
    }
    let ratio = |count: usize| count as f64 / pairs as f64;
    if ratio(odd_nuls) >= UTF16_NUL_RATIO && even_nuls == 0 {
        Some(UTF_16LE)
    } else if ratio(even_nuls) >= UTF16_NUL_RATIO && odd_nuls == 0 {
        Some(UTF_16BE)
    } else {
        None
    }
}

/// Decodes the whole file under `guess`, failing on malformed sequences.
pub fn decode<'a>(path: &Path, bytes: &'a [u8], guess: &EncodingGuess) -> Result<Cow<'a, str>> {
    let body = &bytes[guess.bom_len.min(bytes.len())..];
    guess
        .encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| IngestError::Decode {
            path: path.to_path_buf(),
            encoding: guess.encoding.name(),
        })
}

/// Picks `,` or `\t` from the first [`DELIMITER_SAMPLE_CHARS`] characters.
///
/// Comma wins ties, including a sample holding neither.
pub fn detect_delimiter(text: &str) -> u8 {
    let (commas, tabs) = text
        .chars()
        .take(DELIMITER_SAMPLE_CHARS)
        .fold((0usize, 0usize), |(commas, tabs), ch| match ch {
            ',' => (commas + 1, tabs),
            '\t' => (commas, tabs + 1),
            _ => (commas, tabs),
        });
    if commas >= tabs { b',' } else { b'\t' }
}

/// Printable name of a delimiter byte for reports.
pub fn delimiter_label(delimiter: u8) -> &'static str {
    match delimiter {
        b',' => "comma",
        b'\t' => "tab",
        _ => "other",
    }
}
