//! BER (Basic Encoding Rules) codecs for ASN.1 primitive values
//!
//! This module encodes and decodes the content octets of two universal
//! primitive types, and frames them as TLV triplets when needed:
//!
//! | type              | tag    | content codec           |
//! |-------------------|--------|-------------------------|
//! | OBJECT IDENTIFIER | `0x06` | `ObjectIdentifierCodec` |
//! | REAL              | `0x09` | `RealCodec`             |
//!
//! # Content Octets vs. TLV
//!
//! The codecs in `oid` and `real` work on content octets only: `2.999.3`
//! becomes `88 37 03`. `BerEncoder` and `BerDecoder` add and strip the tag
//! and definite length: `06 03 88 37 03`.
//!
//! # Implementation Notes
//!
//! 1. **Stateless**: codecs hold only a `Copy` configuration; every call
//!    allocates its own output buffer.
//! 2. **Integer arithmetic**: base-128 packing, two's complement exponents
//!    and IEEE-754 decomposition use fixed-width integers and shifts.
//! 3. **Indefinite Length**: not used by primitive encodings, rejected.

pub mod config;
pub mod decoder;
pub mod encoder;
pub mod oid;
pub mod real;
pub mod types;

pub use config::{CodecConfig, RealBase};
pub use decoder::BerDecoder;
pub use encoder::BerEncoder;
pub use oid::{decode_object_identifier, encode_object_identifier, ObjectIdentifierCodec};
pub use real::{decode_real, encode_real, RealCodec};
pub use types::{BerLength, BerTag, BerTagClass};
