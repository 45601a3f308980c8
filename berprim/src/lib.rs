//! berprim - BER primitive codecs for ASN.1 OBJECT IDENTIFIER and REAL
//!
//! # Architecture
//!
//! This library is organized as a workspace with multiple crates:
//!
//! - `berprim-core`: value types (`ObjectIdentifier`, `RealValue`) and error handling
//! - `berprim-asn1`: BER content codecs, codec configuration and TLV framing
//!
//! # Usage
//!
//! ```
//! use berprim::{encode_object_identifier, decode_real, encode_real};
//!
//! assert_eq!(encode_object_identifier("2.999.3")?, vec![0x88, 0x37, 0x03]);
//! assert_eq!(decode_real(&encode_real(3.14)?)?, 3.14);
//! # Ok::<(), berprim::BerError>(())
//! ```

// Re-export core types
pub use berprim_core::{BerError, BerResult, ObjectIdentifier, RealValue};

// Re-export codecs
pub use berprim_asn1::ber::{
    decode_object_identifier, decode_real, encode_object_identifier, encode_real, CodecConfig,
    ObjectIdentifierCodec, RealBase, RealCodec,
};

// Re-export TLV framing
pub mod ber {
    pub use berprim_asn1::ber::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_identifier_contract() {
        let encoded = encode_object_identifier("2.999.3").unwrap();
        assert_eq!(encoded, vec![0x88, 0x37, 0x03]);
        assert_eq!(decode_object_identifier(&encoded).unwrap().to_string(), "2.999.3");

        assert!(matches!(
            encode_object_identifier("1"),
            Err(BerError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            decode_object_identifier(&[0x88, 0x37, 0x83]),
            Err(BerError::TruncatedInput(_))
        ));
    }

    #[test]
    fn test_real_contract() {
        assert!(encode_real(0.0).unwrap().is_empty());
        assert_eq!(decode_real(&[]).unwrap(), 0.0);
        assert_eq!(decode_real(&encode_real(3.14).unwrap()).unwrap(), 3.14);
        assert_eq!(decode_real(&encode_real(-1e-310).unwrap()).unwrap(), -1e-310);

        let codec = RealCodec::with_config(CodecConfig::default().with_real_base(RealBase::Sixteen));
        assert_eq!(codec.encode(1.0), Err(BerError::UnsupportedBase(16)));
        assert!(matches!(decode_real(&[0x81, 0x00]), Err(BerError::MalformedReal(_))));
    }

    #[test]
    fn test_tlv_round_trip() {
        let mut encoder = ber::BerEncoder::new();
        encoder.encode_object_identifier_str("1.3.6.1").unwrap();
        encoder.encode_real(-2.5).unwrap();
        let bytes = encoder.into_bytes();

        let mut decoder = ber::BerDecoder::new(&bytes);
        assert_eq!(
            decoder.decode_object_identifier().unwrap(),
            "1.3.6.1".parse::<ObjectIdentifier>().unwrap()
        );
        assert_eq!(decoder.decode_real().unwrap(), -2.5);
        assert!(!decoder.has_remaining());
    }
}
