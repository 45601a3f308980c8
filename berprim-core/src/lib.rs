//! Core types and utilities for BER primitive codecs
//!
//! This crate provides the value types shared by the OBJECT IDENTIFIER and
//! REAL codecs, together with the error type used throughout the workspace.

pub mod error;
pub mod object_identifier;
pub mod real_value;

pub use error::{BerError, BerResult};
pub use object_identifier::ObjectIdentifier;
pub use real_value::RealValue;
