//! BER decoder for OBJECT IDENTIFIER and REAL values
//!
//! # Usage Example
//!
//! ```rust
//! use berprim_asn1::ber::BerDecoder;
//!
//! let data = [0x06, 0x03, 0x88, 0x37, 0x03, 0x09, 0x01, 0x40];
//! let mut decoder = BerDecoder::new(&data);
//! assert_eq!(decoder.decode_object_identifier()?.to_string(), "2.999.3");
//! assert_eq!(decoder.decode_real()?, f64::INFINITY);
//! assert!(!decoder.has_remaining());
//! # Ok::<(), berprim_core::BerError>(())
//! ```

use crate::ber::config::CodecConfig;
use crate::ber::oid::ObjectIdentifierCodec;
use crate::ber::real::RealCodec;
use crate::ber::types::{BerLength, BerTag};
use berprim_core::{BerError, BerResult, ObjectIdentifier, RealValue};

/// BER decoder reading TLV (Tag-Length-Value) triplets from a byte buffer
///
/// The position only advances past a TLV once it has been fully decoded, so
/// a failed decode leaves the decoder where it was.
///
/// # Why This Design?
/// Borrowing the buffer lets `decode_tlv` hand out content slices without
/// copying. Restoring the position on failure means a caller can try
/// `decode_real` after `decode_object_identifier` reports `UnexpectedTag`.
pub struct BerDecoder<'a> {
    buffer: &'a [u8],
    position: usize,
    config: CodecConfig,
}

impl<'a> BerDecoder<'a> {
    /// Create a new BER decoder
    pub fn new(buffer: &'a [u8]) -> Self {
        Self::with_config(buffer, CodecConfig::default())
    }

    /// Create a new BER decoder with a custom configuration
    pub fn with_config(buffer: &'a [u8], config: CodecConfig) -> Self {
        Self {
            buffer,
            position: 0,
            config,
        }
    }

    /// Get current position in buffer
    pub fn position(&self) -> usize {
        self.position
    }

    /// Get remaining bytes
    pub fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    /// Check if there is more data to decode
    pub fn has_remaining(&self) -> bool {
        self.position < self.buffer.len()
    }

    /// Decode a TLV triplet
    ///
    /// # Returns
    /// Returns `Ok((tag, value_bytes))`
    ///
    /// # Errors
    /// - `BerError::TruncatedInput` if no tag can be read
    /// - `BerError::InvalidLength` if the length is malformed or larger than
    ///   the bytes left in the buffer
    pub fn decode_tlv(&mut self) -> BerResult<(BerTag, &'a [u8])> {
        let data = &self.buffer[self.position..];

        let (tag, tag_bytes) = BerTag::decode(data)?;
        let (length, length_bytes) = BerLength::decode(&data[tag_bytes..])?;

        let start = tag_bytes + length_bytes;
        let available = data.len() - start;
        if length.value() > available {
            log::debug!(
                "TLV rejected at offset {}: declared length {}, {} bytes available",
                self.position,
                length.value(),
                available
            );
            return Err(BerError::InvalidLength(format!(
                "declared length {} exceeds {} available bytes",
                length.value(),
                available
            )));
        }

        let value = &data[start..start + length.value()];
        self.position += start + length.value();
        Ok((tag, value))
    }

    /// Decode an OBJECT IDENTIFIER (universal tag 6)
    ///
    /// # Errors
    /// Returns `BerError::UnexpectedTag` if the next TLV is not a primitive
    /// OBJECT IDENTIFIER, plus any error of `ObjectIdentifierCodec::decode`.
    pub fn decode_object_identifier(&mut self) -> BerResult<ObjectIdentifier> {
        let codec = ObjectIdentifierCodec::with_config(self.config);
        self.decode_primitive(BerTag::OBJECT_IDENTIFIER, |value| codec.decode(value))
    }

    /// Decode a REAL (universal tag 9) as `f64`
    pub fn decode_real(&mut self) -> BerResult<f64> {
        self.decode_real_value().map(|value| value.to_f64())
    }

    /// Decode a REAL (universal tag 9) as its abstract value
    pub fn decode_real_value(&mut self) -> BerResult<RealValue> {
        let codec = RealCodec::with_config(self.config);
        self.decode_primitive(BerTag::REAL, |value| codec.decode_value(value))
    }

    /// Read the next TLV, requiring the given tag, and decode its content
    ///
    /// The position is restored if the tag or the content fails to decode.
    fn decode_primitive<T>(
        &mut self,
        expected: BerTag,
        decode: impl FnOnce(&'a [u8]) -> BerResult<T>,
    ) -> BerResult<T> {
        let start = self.position;
        let result = self.decode_tlv().and_then(|(tag, value)| {
            if tag != expected {
                log::debug!("expected {:?} at offset {}, got {:?}", expected, start, tag);
                return Err(BerError::UnexpectedTag(format!(
                    "expected {:?}, got {:?}",
                    expected, tag
                )));
            }
            decode(value)
        });

        if result.is_err() {
            self.position = start;
        }
        result
    }
}
