//! Bit sequence loading
//!
//! Sample files come in two flavours: ASCII text made of '0'/'1' characters
//! (what the fetcher writes) and packed binary straight from a QRNG. The
//! encoding is guessed from the first bytes of the file.

use crate::constants::bits::{ASCII_ONE, ASCII_PROBE_LEN, ASCII_THRESHOLD, ASCII_ZERO};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// How the bytes of a sample file encode its bits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BitEncoding {
    /// One ASCII '0'/'1' character per bit, other bytes ignored
    Ascii,
    /// Eight bits per byte, most significant bit first
    Packed,
}

impl std::fmt::Display for BitEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ascii => write!(f, "ascii"),
            Self::Packed => write!(f, "packed"),
        }
    }
}

fn is_bit_char(byte: u8) -> bool {
    byte == ASCII_ZERO || byte == ASCII_ONE
}

/// Guess the encoding of raw file content
///
/// Looks at the first 100 bytes. The content is ASCII when strictly more
/// than 80% of the probed bytes are '0' or '1'; for a full probe that is
/// "more than 80 of 100". Hitting the threshold exactly counts as packed.
/// Empty input is reported as packed (and decodes to nothing either way).
pub fn detect_encoding(raw: &[u8]) -> BitEncoding {
    let probe = &raw[..raw.len().min(ASCII_PROBE_LEN)];
    if probe.is_empty() {
        return BitEncoding::Packed;
    }

    let bit_chars = probe.iter().filter(|&&b| is_bit_char(b)).count();

    // bit_chars / len > THRESHOLD / PROBE_LEN, in integers
    if bit_chars * ASCII_PROBE_LEN > ASCII_THRESHOLD * probe.len() {
        BitEncoding::Ascii
    } else {
        BitEncoding::Packed
    }
}

/// Decode raw content with an explicit encoding
pub fn decode_with(raw: &[u8], encoding: BitEncoding) -> Vec<u8> {
    match encoding {
        BitEncoding::Ascii => raw
            .iter()
            .filter(|&&b| is_bit_char(b))
            .map(|&b| u8::from(b == ASCII_ONE))
            .collect(),
        BitEncoding::Packed => {
            let mut bits = Vec::with_capacity(raw.len() * 8);
            for &byte in raw {
                for shift in (0..8).rev() {
                    bits.push((byte >> shift) & 1);
                }
            }
            bits
        }
    }
}

/// Decode raw content into a sequence of 0/1 values
pub fn decode_bits(raw: &[u8]) -> Vec<u8> {
    decode_with(raw, detect_encoding(raw))
}

/// Read a sample file and decode its bits
///
/// Empty files yield an empty sequence; read failures are propagated.
pub fn load_bits(path: &Path) -> Result<Vec<u8>> {
    let raw = fs::read(path)?;
    let encoding = detect_encoding(&raw);
    let bits = decode_with(&raw, encoding);

    debug!(
        path = %path.display(),
        bytes = raw.len(),
        bits = bits.len(),
        %encoding,
        "loaded sample"
    );

    Ok(bits)
}

/// Render bytes as ASCII bit text, most significant bit first, no separators
pub fn encode_ascii(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 8);
    for byte in bytes {
        out.push_str(&format!("{:08b}", byte));
    }
    out
}
