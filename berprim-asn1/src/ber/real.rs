//! REAL content octets (X.690 8.5)
//!
//! # Content Forms
//!
//! The first content octet selects the form:
//!
//! ```text
//! Bits: 8 7 6 5 4 3 2 1
//!       1 S B B F F L L   binary: sign, base, scale factor, exponent length
//!       0 1 0 0 0 0 V V   special value
//!       0 0 N N N N N N   decimal (ISO 6093 NR form)
//! ```
//!
//! Plus zero has no content octets at all. Special values are single octets:
//! `0x40` PLUS-INFINITY, `0x41` MINUS-INFINITY, `0x42` NOT-A-NUMBER,
//! `0x43` minus zero.
//!
//! A binary value is `S * N * 2^F * B^E` where the exponent E is a two's
//! complement integer and the mantissa N an unsigned integer. Encoding always
//! uses base 2 and F = 0 with an odd mantissa, so M and E take the fewest
//! octets possible. Decoding accepts any scale factor; base 8 and 16 are
//! rejected.

use crate::ber::config::{CodecConfig, RealBase};
use berprim_core::{BerError, BerResult, RealValue};
use once_cell::sync::Lazy;
use regex::Regex;

/// Binary encoding marker (bit 8)
const BINARY_ENCODING: u8 = 0x80;
/// Sign bit of a binary encoding (bit 7)
const IS_NEGATIVE: u8 = 0x40;
/// Exponent length selector: length in the following octet
const EXPONENT_LENGTH_FOLLOWS: u8 = 0x03;

/// PLUS-INFINITY
pub const PLUS_INFINITY: u8 = 0x40;
/// MINUS-INFINITY
pub const MINUS_INFINITY: u8 = 0x41;
/// NOT-A-NUMBER
pub const NOT_A_NUMBER: u8 = 0x42;
/// minus zero
pub const MINUS_ZERO: u8 = 0x43;

/// ISO 6093 number representation of a decimal REAL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecimalForm {
    Nr1,
    Nr2,
    Nr3,
}

static NR1: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ *[+-]?[0-9]+$").expect("NR1 pattern is valid"));
static NR2: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ *[+-]?([0-9]+[.,][0-9]*|[.,][0-9]+)$").expect("NR2 pattern is valid")
});
static NR3: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^ *[+-]?([0-9]+[.,]?[0-9]*|[.,][0-9]+)[Ee][+-]?[0-9]+$")
        .expect("NR3 pattern is valid")
});

impl DecimalForm {
    fn pattern(self) -> &'static Regex {
        match self {
            DecimalForm::Nr1 => &*NR1,
            DecimalForm::Nr2 => &*NR2,
            DecimalForm::Nr3 => &*NR3,
        }
    }
}

fn malformed(reason: impl Into<String>) -> BerError {
    let reason = reason.into();
    log::debug!("REAL rejected: {}", reason);
    BerError::MalformedReal(reason)
}

/// REAL content codec
///
/// Stateless apart from its configuration; safe to share between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealCodec {
    config: CodecConfig,
}

impl RealCodec {
    /// Create a codec with the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a codec with a custom configuration
    pub fn with_config(config: CodecConfig) -> Self {
        Self { config }
    }

    /// Get the codec configuration
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode an `f64` into content octets
    ///
    /// # Errors
    /// Returns `BerError::UnsupportedBase` if the configured base is not 2.
    pub fn encode(&self, value: f64) -> BerResult<Vec<u8>> {
        self.encode_value(&RealValue::from(value))
    }

    /// Encode an `f32` into content octets (widened to `f64` first)
    pub fn encode_f32(&self, value: f32) -> BerResult<Vec<u8>> {
        self.encode_value(&RealValue::from(value))
    }

    /// Encode a REAL value into content octets
    ///
    /// The value is normalized first, so a `Binary` with an even mantissa
    /// encodes the same as its canonical form and a zero mantissa encodes as
    /// a signed zero.
    ///
    /// # Errors
    /// Returns `BerError::UnsupportedBase` if the configured base is not 2.
    pub fn encode_value(&self, value: &RealValue) -> BerResult<Vec<u8>> {
        if self.config.real_base != RealBase::Two {
            log::debug!("REAL encode rejected: base {}", self.config.real_base.radix());
            return Err(BerError::UnsupportedBase(self.config.real_base.radix()));
        }

        let value = value.normalized();
        let bytes = match value {
            RealValue::Zero { negative: false } => Vec::new(),
            RealValue::Zero { negative: true } => vec![MINUS_ZERO],
            RealValue::PlusInfinity => vec![PLUS_INFINITY],
            RealValue::MinusInfinity => vec![MINUS_INFINITY],
            RealValue::NotANumber => vec![NOT_A_NUMBER],
            RealValue::Binary {
                negative,
                mantissa,
                exponent,
            } => encode_binary(negative, mantissa, exponent),
        };

        log::trace!("encoded REAL {} into {} content octets", value, bytes.len());
        Ok(bytes)
    }

    /// Decode content octets into an `f64`
    pub fn decode(&self, bytes: &[u8]) -> BerResult<f64> {
        self.decode_value(bytes).map(|value| value.to_f64())
    }

    /// Decode content octets into a REAL value
    ///
    /// # Errors
    /// Returns:
    /// - `BerError::UnsupportedBase` for binary encodings in base 8 or 16
    /// - `BerError::MalformedReal` if the octets are inconsistent with the
    ///   lengths and forms they declare
    ///
    /// Binary results are canonical (odd mantissa). Magnitudes outside the
    /// `f64` range are kept exactly in binary form, but a decimal form such
    /// as `1E400` is read through `f64` and saturates to infinity or signed
    /// zero.
    pub fn decode_value(&self, bytes: &[u8]) -> BerResult<RealValue> {
        let Some((&first, rest)) = bytes.split_first() else {
            log::trace!("decoded REAL 0 from empty content");
            return Ok(RealValue::Zero { negative: false });
        };

        let value = if first & BINARY_ENCODING != 0 {
            self.decode_binary(first, rest)?
        } else if first & 0x40 != 0 {
            decode_special(first, rest)?
        } else {
            decode_decimal(first, rest)?
        };

        log::trace!("decoded REAL {} from {} content octets", value, bytes.len());
        Ok(value)
    }

    fn decode_binary(&self, control: u8, rest: &[u8]) -> BerResult<RealValue> {
        let negative = control & IS_NEGATIVE != 0;

        let base = RealBase::from_bits(control).map_err(|e| {
            log::debug!("REAL rejected: {}", e);
            e
        })?;
        if base != RealBase::Two {
            log::debug!("REAL rejected: base {} not supported", base.radix());
            return Err(BerError::UnsupportedBase(base.radix()));
        }

        let scale = i64::from((control >> 2) & 0x03);

        let (exponent_len, rest) = match control & 0x03 {
            EXPONENT_LENGTH_FOLLOWS => {
                let Some((&len, rest)) = rest.split_first() else {
                    return Err(malformed("missing exponent length octet"));
                };
                if len == 0 {
                    return Err(malformed("exponent length octet is zero"));
                }
                (len as usize, rest)
            }
            code => (code as usize + 1, rest),
        };

        if exponent_len > rest.len() {
            return Err(malformed(format!(
                "exponent needs {} octets, {} available",
                exponent_len,
                rest.len()
            )));
        }

        let (exponent_bytes, mantissa_bytes) = rest.split_at(exponent_len);
        if mantissa_bytes.is_empty() {
            return Err(malformed("no mantissa octets"));
        }

        if self.config.strict {
            if has_redundant_sign_octet(exponent_bytes) {
                return Err(malformed("exponent not in fewest octets"));
            }
            if mantissa_bytes[0] == 0 {
                return Err(malformed("mantissa has leading zero octet"));
            }
        }

        let exponent_bytes = strip_sign_padding(exponent_bytes);
        if exponent_bytes.len() > 8 {
            return Err(malformed(format!(
                "exponent of {} significant octets exceeds 64 bits",
                exponent_bytes.len()
            )));
        }

        let exponent = exponent_bytes.iter().fold(
            if exponent_bytes[0] & 0x80 != 0 { -1i64 } else { 0 },
            |acc, &b| (acc << 8) | i64::from(b),
        );
        let (mantissa, extra_exponent) = fold_mantissa(mantissa_bytes);

        Ok(RealValue::binary(
            negative,
            mantissa,
            exponent
                .saturating_add(scale)
                .saturating_add(extra_exponent),
        ))
    }
}

/// Binary form of a canonical value (odd mantissa, so M and E take the fewest octets)
fn encode_binary(negative: bool, mantissa: u64, exponent: i64) -> Vec<u8> {
    let exponent_bytes = twos_complement_minimal(exponent);
    let mantissa_bytes = unsigned_minimal(mantissa);

    let mut control = BINARY_ENCODING | RealBase::Two.to_bits();
    if negative {
        control |= IS_NEGATIVE;
    }

    let mut bytes = Vec::with_capacity(2 + exponent_bytes.len() + mantissa_bytes.len());
    match exponent_bytes.len() {
        len @ 1..=3 => bytes.push(control | (len as u8 - 1)),
        len => {
            bytes.push(control | EXPONENT_LENGTH_FOLLOWS);
            bytes.push(len as u8);
        }
    }
    bytes.extend_from_slice(&exponent_bytes);
    bytes.extend_from_slice(&mantissa_bytes);
    bytes
}

fn decode_special(octet: u8, rest: &[u8]) -> BerResult<RealValue> {
    if !rest.is_empty() {
        return Err(malformed(format!(
            "special value {:#04x} followed by {} octets",
            octet,
            rest.len()
        )));
    }

    match octet {
        PLUS_INFINITY => Ok(RealValue::PlusInfinity),
        MINUS_INFINITY => Ok(RealValue::MinusInfinity),
        NOT_A_NUMBER => Ok(RealValue::NotANumber),
        MINUS_ZERO => Ok(RealValue::Zero { negative: true }),
        other => Err(malformed(format!("unknown special value {:#04x}", other))),
    }
}

fn decode_decimal(octet: u8, rest: &[u8]) -> BerResult<RealValue> {
    let form = match octet & 0x3F {
        1 => DecimalForm::Nr1,
        2 => DecimalForm::Nr2,
        3 => DecimalForm::Nr3,
        other => return Err(malformed(format!("unknown decimal form NR{}", other))),
    };

    let text = std::str::from_utf8(rest).map_err(|_| malformed("decimal form is not ASCII"))?;
    if !form.pattern().is_match(text) {
        return Err(malformed(format!("\"{}\" is not valid {:?}", text, form)));
    }

    let normalized = text.trim_start_matches(' ').replace(',', ".");
    let value: f64 = normalized
        .parse()
        .map_err(|_| malformed(format!("cannot parse decimal \"{}\"", text)))?;

    Ok(RealValue::from(value))
}

/// Minimal big-endian two's complement
fn twos_complement_minimal(value: i64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let start = (0..7)
        .take_while(|&i| has_redundant_sign_octet(&bytes[i..]))
        .count();
    bytes[start..].to_vec()
}

/// Minimal big-endian unsigned, at least one octet
fn unsigned_minimal(value: u64) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    let start = bytes.iter().take_while(|&&b| b == 0).count().min(7);
    bytes[start..].to_vec()
}

/// First octet only repeats the sign of the second (X.690 8.5.7.4: the first
/// nine bits shall not be all zeros or all ones)
fn has_redundant_sign_octet(bytes: &[u8]) -> bool {
    match bytes {
        [0x00, next, ..] => next & 0x80 == 0,
        [0xFF, next, ..] => next & 0x80 != 0,
        _ => false,
    }
}

/// Drop leading octets that only repeat the sign
fn strip_sign_padding(mut bytes: &[u8]) -> &[u8] {
    while has_redundant_sign_octet(bytes) {
        bytes = &bytes[1..];
    }
    bytes
}

/// Read an unsigned mantissa of any width
///
/// Keeps the 64 most significant bits and returns the exponent adjustment
/// for the dropped ones. A non-zero dropped bit is folded into bit 0 so that
/// rounding to 53 bits stays correct.
fn fold_mantissa(bytes: &[u8]) -> (u64, i64) {
    let mut mantissa = 0u64;
    let mut dropped_bits = 0i64;
    let mut sticky = false;

    for &byte in bytes {
        let room = mantissa.leading_zeros();
        if room >= 8 {
            mantissa = (mantissa << 8) | u64::from(byte);
        } else if room == 0 {
            sticky |= byte != 0;
            dropped_bits += 8;
        } else {
            let drop = 8 - room;
            mantissa = (mantissa << room) | u64::from(byte >> drop);
            sticky |= byte & ((1u8 << drop) - 1) != 0;
            dropped_bits += i64::from(drop);
        }
    }

    (mantissa | u64::from(sticky), dropped_bits)
}

/// Encode an `f64` into REAL content octets with the default configuration
pub fn encode_real(value: f64) -> BerResult<Vec<u8>> {
    RealCodec::new().encode(value)
}

/// Decode REAL content octets into an `f64` with the default configuration
pub fn decode_real(bytes: &[u8]) -> BerResult<f64> {
    RealCodec::new().decode(bytes)
}
