//! ASN.1 BER processing for OBJECT IDENTIFIER and REAL values
//!
//! This crate provides the content-octet codecs for the two primitive types
//! and minimal TLV framing around them. Schema compilation, type dispatch and
//! constructed types are left to the caller.

pub mod ber;

pub use ber::{
    decode_object_identifier, decode_real, encode_object_identifier, encode_real, BerDecoder,
    BerEncoder, BerLength, BerTag, BerTagClass, CodecConfig, ObjectIdentifierCodec, RealBase,
    RealCodec,
};
pub use berprim_core::{BerError, BerResult, ObjectIdentifier, RealValue};
