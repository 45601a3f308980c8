//! BER encoder for OBJECT IDENTIFIER and REAL values
//!
//! # Usage Example
//!
//! ```rust
//! use berprim_asn1::ber::BerEncoder;
//!
//! let mut encoder = BerEncoder::new();
//! encoder.encode_object_identifier_str("2.999.3")?;
//! encoder.encode_real(3.14)?;
//! let bytes = encoder.into_bytes();
//! assert_eq!(&bytes[..5], &[0x06, 0x03, 0x88, 0x37, 0x03]);
//! # Ok::<(), berprim_core::BerError>(())
//! ```

use crate::ber::config::CodecConfig;
use crate::ber::oid::ObjectIdentifierCodec;
use crate::ber::real::RealCodec;
use crate::ber::types::{BerLength, BerTag};
use berprim_core::{BerResult, ObjectIdentifier, RealValue};

/// BER encoder writing complete TLV (Tag-Length-Value) triplets
///
/// Values are appended to an internal `Vec<u8>` buffer, so several values
/// can be encoded back to back.
///
/// # Why This Design?
/// Content octets come from `ObjectIdentifierCodec` and `RealCodec`; the
/// encoder only adds framing. A failed encode leaves the buffer untouched,
/// because the content is produced in full before any framing octet is
/// written.
#[derive(Debug, Default)]
pub struct BerEncoder {
    buffer: Vec<u8>,
    config: CodecConfig,
}

impl BerEncoder {
    /// Create a new BER encoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new BER encoder with initial capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            config: CodecConfig::default(),
        }
    }

    /// Create a new BER encoder with a custom configuration
    pub fn with_config(config: CodecConfig) -> Self {
        Self {
            buffer: Vec::new(),
            config,
        }
    }

    /// Encode a TLV triplet from already encoded content octets
    ///
    /// # Arguments
    /// * `tag` - Tag to write
    /// * `value` - Content octets; the definite length is derived from them
    pub fn encode_tlv(&mut self, tag: &BerTag, value: &[u8]) {
        self.buffer.extend_from_slice(&tag.encode());
        self.buffer.extend_from_slice(&BerLength::new(value.len()).encode());
        self.buffer.extend_from_slice(value);
    }

    /// Encode an OBJECT IDENTIFIER (universal tag 6)
    ///
    /// # Errors
    /// Returns `BerError::ArcOverflow` if the first two arcs combine to more
    /// than 64 bits.
    pub fn encode_object_identifier(&mut self, oid: &ObjectIdentifier) -> BerResult<()> {
        let content = ObjectIdentifierCodec::with_config(self.config).encode(oid)?;
        self.encode_tlv(&BerTag::OBJECT_IDENTIFIER, &content);
        Ok(())
    }

    /// Encode an OBJECT IDENTIFIER given in dotted-decimal form
    pub fn encode_object_identifier_str(&mut self, dotted: &str) -> BerResult<()> {
        self.encode_object_identifier(&dotted.parse()?)
    }

    /// Encode a REAL (universal tag 9)
    pub fn encode_real(&mut self, value: f64) -> BerResult<()> {
        self.encode_real_value(&RealValue::from(value))
    }

    /// Encode a REAL from its abstract value
    ///
    /// # Arguments
    /// * `value` - Any `RealValue`; non-canonical `Binary` values are
    ///   normalized before encoding
    ///
    /// # Errors
    /// Returns `BerError::UnsupportedBase` if the configured base is not 2.
    pub fn encode_real_value(&mut self, value: &RealValue) -> BerResult<()> {
        let content = RealCodec::with_config(self.config).encode_value(value)?;
        self.encode_tlv(&BerTag::REAL, &content);
        Ok(())
    }

    /// Get the encoded bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Get a reference to the encoded bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Clear the encoder buffer
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ber::config::RealBase;
    use berprim_core::BerError;

    #[test]
    fn test_encode_object_identifier() {
        let mut encoder = BerEncoder::new();
        encoder.encode_object_identifier_str("2.5.4.3").unwrap();
        assert_eq!(encoder.as_bytes(), &[0x06, 0x03, 0x55, 0x04, 0x03]);
    }

    #[test]
    fn test_encode_real_tlv() {
        let mut encoder = BerEncoder::new();
        encoder.encode_real(0.0).unwrap();
        encoder.encode_real(f64::INFINITY).unwrap();
        encoder.encode_real(f64::MAX).unwrap();
        assert_eq!(
            encoder.into_bytes(),
            vec![
                0x09, 0x00, // plus zero
                0x09, 0x01, 0x40, // PLUS-INFINITY
                0x09, 0x0A, 0x81, 0x03, 0xCB, 0x1F, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF,
            ]
        );
    }

    #[test]
    fn test_encode_long_form_length() {
        let arcs: Vec<u64> = std::iter::once(1).chain(std::iter::repeat(3).take(200)).collect();
        let oid = ObjectIdentifier::new(arcs).unwrap();

        let mut encoder = BerEncoder::with_capacity(256);
        encoder.encode_object_identifier(&oid).unwrap();
        let bytes = encoder.into_bytes();
        // 40*1 + 3 then 199 arcs of one octet each
        assert_eq!(&bytes[..3], &[0x06, 0x81, 200]);
        assert_eq!(bytes.len(), 203);
    }

    #[test]
    fn test_encode_failure_leaves_buffer_untouched() {
        let mut encoder =
            BerEncoder::with_config(CodecConfig::default().with_real_base(RealBase::Sixteen));
        encoder.encode_object_identifier_str("1.2").unwrap();
        assert_eq!(encoder.encode_real(1.0), Err(BerError::UnsupportedBase(16)));
        assert_eq!(encoder.as_bytes(), &[0x06, 0x01, 0x2A]);

        encoder.clear();
        assert!(encoder.as_bytes().is_empty());
    }

    #[test]
    fn test_object_identifier_matches_rasn() {
        use rasn::types::ObjectIdentifier as RasnOid;

        for arcs in [vec![2u32, 999, 3], vec![1, 2, 840, 113549, 1, 1, 11], vec![0, 9, 2342, 19200300]] {
            let expected = rasn::ber::encode(&RasnOid::new_unchecked(arcs.clone().into())).unwrap();

            let oid = ObjectIdentifier::new(arcs.iter().map(|&a| u64::from(a)).collect()).unwrap();
            let mut encoder = BerEncoder::new();
            encoder.encode_object_identifier(&oid).unwrap();
            assert_eq!(encoder.into_bytes(), expected, "{}", oid);
        }
    }
}
