//! OBJECT IDENTIFIER content octets (X.690 8.19)
//!
//! # Encoding Rules
//!
//! - The first two arcs X.Y are combined into one subidentifier `40*X + Y`
//! - Every subidentifier is written in base 128, big-endian, with bit 8 set
//!   on all octets but the last
//! - Subidentifiers use the fewest octets possible; zero is a single `0x00`
//!
//! For example `2.999.3` combines to 1079 and 3, giving `88 37 03`.

use crate::ber::config::CodecConfig;
use crate::ber::types::base128;
use berprim_core::{BerError, BerResult, ObjectIdentifier};

/// Subidentifier values below this split as `V / 40`, `V % 40`; above it the
/// first arc is 2.
const JOINT_ISO_ITU_T_START: u64 = 80;

/// OBJECT IDENTIFIER content codec
///
/// Stateless apart from its configuration; safe to share between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectIdentifierCodec {
    config: CodecConfig,
}

impl ObjectIdentifierCodec {
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

    /// Encode an object identifier into content octets
    ///
    /// # Errors
    /// Returns `BerError::ArcOverflow` if `40*X + Y` does not fit in 64 bits.
    pub fn encode(&self, oid: &ObjectIdentifier) -> BerResult<Vec<u8>> {
        let arcs = oid.arcs();
        let combined = arcs[0]
            .checked_mul(40)
            .and_then(|x| x.checked_add(arcs[1]))
            .ok_or_else(|| {
                log::debug!("OID {} rejected: first subidentifier overflows", oid);
                BerError::ArcOverflow(format!("40 * {} + {} does not fit in 64 bits", arcs[0], arcs[1]))
            })?;

        let mut bytes = base128(combined);
        for &arc in &arcs[2..] {
            bytes.extend_from_slice(&base128(arc));
        }

        log::trace!("encoded OID {} into {} content octets", oid, bytes.len());
        Ok(bytes)
    }

    /// Encode an arc sequence into content octets
    ///
    /// # Errors
    /// Returns `BerError::InvalidIdentifier` if the arcs do not form a valid
    /// object identifier.
    pub fn encode_arcs(&self, arcs: &[u64]) -> BerResult<Vec<u8>> {
        self.encode(&ObjectIdentifier::from_slice(arcs)?)
    }

    /// Encode a dotted-decimal identifier such as `"2.999.3"`
    pub fn encode_str(&self, dotted: &str) -> BerResult<Vec<u8>> {
        self.encode(&dotted.parse()?)
    }

    /// Decode content octets into an object identifier
    ///
    /// # Errors
    /// Returns:
    /// - `BerError::TruncatedInput` if the input is empty or ends inside a
    ///   subidentifier
    /// - `BerError::ArcOverflow` if a subidentifier does not fit in 64 bits
    /// - `BerError::InvalidIdentifier` in strict mode for a subidentifier
    ///   with a leading `0x80` octet
    pub fn decode(&self, bytes: &[u8]) -> BerResult<ObjectIdentifier> {
        if bytes.is_empty() {
            log::debug!("OID rejected: no content octets");
            return Err(BerError::TruncatedInput(
                "object identifier has no content octets".to_string(),
            ));
        }

        let mut subidentifiers = Vec::new();
        let mut value = 0u64;
        let mut in_group = false;

        for (offset, &byte) in bytes.iter().enumerate() {
            if !in_group && byte == 0x80 && self.config.strict {
                log::debug!("OID rejected: non-minimal subidentifier at offset {}", offset);
                return Err(BerError::InvalidIdentifier(format!(
                    "non-minimal subidentifier at offset {}",
                    offset
                )));
            }
            if value > u64::MAX >> 7 {
                log::debug!("OID rejected: subidentifier overflow at offset {}", offset);
                return Err(BerError::ArcOverflow(format!(
                    "subidentifier at offset {} does not fit in 64 bits",
                    offset
                )));
            }

            value = (value << 7) | u64::from(byte & 0x7F);
            in_group = byte & 0x80 != 0;
            if !in_group {
                subidentifiers.push(value);
                value = 0;
            }
        }

        if in_group {
            log::debug!("OID rejected: last octet {:#04x} has continuation bit", bytes[bytes.len() - 1]);
            return Err(BerError::TruncatedInput(
                "object identifier ends inside a subidentifier".to_string(),
            ));
        }

        let first = subidentifiers[0];
        let (x, y) = if first < JOINT_ISO_ITU_T_START {
            (first / 40, first % 40)
        } else {
            (2, first - JOINT_ISO_ITU_T_START)
        };

        let mut arcs = Vec::with_capacity(subidentifiers.len() + 1);
        arcs.push(x);
        arcs.push(y);
        arcs.extend_from_slice(&subidentifiers[1..]);

        let oid = ObjectIdentifier::new(arcs)?;
        log::trace!("decoded OID {} from {} content octets", oid, bytes.len());
        Ok(oid)
    }
}

/// Encode a dotted-decimal identifier with the default configuration
pub fn encode_object_identifier(dotted: &str) -> BerResult<Vec<u8>> {
    ObjectIdentifierCodec::new().encode_str(dotted)
}

/// Decode OBJECT IDENTIFIER content octets with the default configuration
pub fn decode_object_identifier(bytes: &[u8]) -> BerResult<ObjectIdentifier> {
    ObjectIdentifierCodec::new().decode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn oid(dotted: &str) -> ObjectIdentifier {
        dotted.parse().unwrap()
    }

    #[test]
    fn test_encode_joint_iso_itu_t_example() {
        let bytes = encode_object_identifier("2.999.3").unwrap();
        assert_eq!(bytes, vec![0x88, 0x37, 0x03]);
    }

    #[test]
    fn test_encode_known_identifiers() {
        let codec = ObjectIdentifierCodec::new();
        // id-at-commonName
        assert_eq!(codec.encode(&oid("2.5.4.3")).unwrap(), vec![0x55, 0x04, 0x03]);
        // rsadsi
        assert_eq!(
            codec.encode(&oid("1.2.840.113549")).unwrap(),
            vec![0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D]
        );
        assert_eq!(codec.encode(&oid("0.0")).unwrap(), vec![0x00]);
        assert_eq!(codec.encode(&oid("1.3.6.1.0")).unwrap(), vec![0x2B, 0x06, 0x01, 0x00]);
    }

    #[test]
    fn test_encode_arcs_validation() {
        let codec = ObjectIdentifierCodec::new();
        assert!(matches!(codec.encode_arcs(&[1]), Err(BerError::InvalidIdentifier(_))));
        assert!(matches!(codec.encode_arcs(&[]), Err(BerError::InvalidIdentifier(_))));
        assert!(matches!(codec.encode_str("1.-3"), Err(BerError::InvalidIdentifier(_))));
        assert!(matches!(
            codec.encode_arcs(&[2, u64::MAX]),
            Err(BerError::ArcOverflow(_))
        ));
    }

    #[test]
    fn test_decode_first_subidentifier_split() {
        assert_eq!(decode_object_identifier(&[0x27]).unwrap(), oid("0.39"));
        assert_eq!(decode_object_identifier(&[0x28]).unwrap(), oid("1.0"));
        assert_eq!(decode_object_identifier(&[0x4F]).unwrap(), oid("1.39"));
        assert_eq!(decode_object_identifier(&[0x50]).unwrap(), oid("2.0"));
        assert_eq!(decode_object_identifier(&[0x88, 0x37, 0x03]).unwrap(), oid("2.999.3"));
    }

    #[test]
    fn test_round_trip() {
        let codec = ObjectIdentifierCodec::new();
        for dotted in [
            "0.0",
            "1.2.840.113549.1.1.11",
            "2.999.3",
            "1.3.6.1.4.1.311.21.20",
            "2.18446744073709551535",
        ] {
            let value = oid(dotted);
            let encoded = codec.encode(&value).unwrap();
            assert_eq!(codec.decode(&encoded).unwrap(), value, "{}", dotted);
        }
    }

    #[test]
    fn test_round_trip_large_arcs() {
        let codec = ObjectIdentifierCodec::new();
        let value = ObjectIdentifier::new(vec![2, u64::MAX - 80, 0, u64::MAX, 128]).unwrap();
        let encoded = codec.encode(&value).unwrap();
        assert_eq!(codec.decode(&encoded).unwrap(), value);
    }

    #[test]
    fn test_round_trip_random_arcs() {
        let codec = ObjectIdentifierCodec::new();
        let mut rng = StdRng::seed_from_u64(0x0006_0006);

        for _ in 0..5_000 {
            let first = rng.gen_range(0..3u64);
            let second = if first < 2 {
                [0, 1, 38, 39, rng.gen_range(0..40)][rng.gen_range(0..5)]
            } else {
                let top = u64::MAX - JOINT_ISO_ITU_T_START;
                [0, 1, 39, 40, 79, 80, top - 1, top, rng.gen_range(0..=top)][rng.gen_range(0..9)]
            };

            let mut arcs = vec![first, second];
            for _ in 0..rng.gen_range(0..6) {
                let arc = [
                    0,
                    127,
                    128,
                    16_383,
                    16_384,
                    u64::MAX - 1,
                    u64::MAX,
                    rng.r#gen::<u64>(),
                    rng.gen_range(0..1 << 21),
                ][rng.gen_range(0..9)];
                arcs.push(arc);
            }

            let value = ObjectIdentifier::new(arcs).unwrap();
            let encoded = codec.encode(&value).unwrap();
            assert_eq!(codec.decode(&encoded).unwrap(), value, "{}", value);
        }
    }

    #[test]
    fn test_decode_truncated() {
        assert!(matches!(
            decode_object_identifier(&[0x2A, 0x86]),
            Err(BerError::TruncatedInput(_))
        ));
        assert!(matches!(decode_object_identifier(&[0x88]), Err(BerError::TruncatedInput(_))));
        assert!(matches!(decode_object_identifier(&[]), Err(BerError::TruncatedInput(_))));
    }

    #[test]
    fn test_decode_overflow() {
        let mut bytes = vec![0xFF; 10];
        bytes.push(0x7F);
        assert!(matches!(decode_object_identifier(&bytes), Err(BerError::ArcOverflow(_))));
    }

    #[test]
    fn test_non_minimal_subidentifier() {
        let bytes = [0x2A, 0x80, 0x01];
        assert_eq!(decode_object_identifier(&bytes).unwrap(), oid("1.2.1"));

        let strict = ObjectIdentifierCodec::with_config(CodecConfig::strict());
        assert!(matches!(strict.decode(&bytes), Err(BerError::InvalidIdentifier(_))));
        assert!(matches!(strict.decode(&[0x80, 0x2A]), Err(BerError::InvalidIdentifier(_))));
    }
}
