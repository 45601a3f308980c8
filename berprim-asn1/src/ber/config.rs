//! Codec configuration

use berprim_core::{BerError, BerResult};
use serde::{Deserialize, Serialize};

/// Base of a binary-encoded REAL (X.690 8.5.7.2, bits 6-5 of the first content octet)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RealBase {
    /// Base 2 (`00`)
    #[default]
    Two,
    /// Base 8 (`01`)
    Eight,
    /// Base 16 (`10`)
    Sixteen,
}

impl RealBase {
    /// Numeric base
    pub fn radix(self) -> u8 {
        match self {
            RealBase::Two => 2,
            RealBase::Eight => 8,
            RealBase::Sixteen => 16,
        }
    }

    /// Base selector bits, already in position 6-5
    pub fn to_bits(self) -> u8 {
        match self {
            RealBase::Two => 0x00,
            RealBase::Eight => 0x10,
            RealBase::Sixteen => 0x20,
        }
    }

    /// Read the base selector from a binary-form control octet
    ///
    /// The reserved selector `11` is reported as `MalformedReal`.
    pub fn from_bits(control: u8) -> BerResult<Self> {
        match (control >> 4) & 0x03 {
            0 => Ok(RealBase::Two),
            1 => Ok(RealBase::Eight),
            2 => Ok(RealBase::Sixteen),
            _ => Err(BerError::MalformedReal(
                "reserved base selector 11".to_string(),
            )),
        }
    }
}

/// Codec configuration
///
/// Shared by `ObjectIdentifierCodec` and `RealCodec`. The default matches
/// plain BER: base 2 REAL encoding and lenient decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Base used when encoding REAL values; only base 2 is produced
    pub real_base: RealBase,
    /// Reject non-minimal encodings when decoding
    ///
    /// Covers OID subidentifiers starting with `0x80`, redundant leading
    /// REAL exponent octets and leading zero REAL mantissa octets.
    pub strict: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            real_base: RealBase::Two,
            strict: false,
        }
    }
}

impl CodecConfig {
    /// Configuration rejecting every non-minimal encoding
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    /// Set the REAL encoding base
    pub fn with_real_base(mut self, base: RealBase) -> Self {
        self.real_base = base;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CodecConfig::default();
        assert_eq!(config.real_base, RealBase::Two);
        assert!(!config.strict);
        assert!(CodecConfig::strict().strict);
    }

    #[test]
    fn test_real_base_bits() {
        for base in [RealBase::Two, RealBase::Eight, RealBase::Sixteen] {
            assert_eq!(RealBase::from_bits(0x80 | base.to_bits()).unwrap(), base);
        }
        assert!(matches!(
            RealBase::from_bits(0xB0),
            Err(BerError::MalformedReal(_))
        ));
    }

    #[test]
    fn test_config_serde() {
        let config = CodecConfig::strict().with_real_base(RealBase::Sixteen);
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"real_base":"Sixteen","strict":true}"#);
        let back: CodecConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
