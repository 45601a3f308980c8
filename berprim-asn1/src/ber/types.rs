//! BER framing types (Tag, Length)

use berprim_core::{BerError, BerResult};

/// Universal tag number of OBJECT IDENTIFIER
pub const TAG_OBJECT_IDENTIFIER: u32 = 6;
/// Universal tag number of REAL
pub const TAG_REAL: u32 = 9;

/// BER Tag Class
///
/// Bits 8-7 of the identifier octet. OBJECT IDENTIFIER and REAL are both
/// Universal; the other classes only show up when a caller frames the
/// content octets with an implicit tag of its own.
///
/// # Why Keep All Four?
/// `BerDecoder` has to report what it actually found when the tag does not
/// match, and an application or context-specific tag is a common reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BerTagClass {
    /// Universal class (00)
    Universal = 0,
    /// Application class (01)
    Application = 1,
    /// Context-specific class (10)
    ContextSpecific = 2,
    /// Private class (11)
    Private = 3,
}

impl BerTagClass {
    /// Get tag class from the identifier octet
    ///
    /// # Arguments
    /// * `bits` - The whole identifier octet; only bits 8-7 are read
    pub fn from_bits(bits: u8) -> Self {
        match (bits >> 6) & 0x03 {
            0 => BerTagClass::Universal,
            1 => BerTagClass::Application,
            2 => BerTagClass::ContextSpecific,
            _ => BerTagClass::Private,
        }
    }

    /// Convert tag class to identifier octet bits
    pub fn to_bits(self) -> u8 {
        (self as u8) << 6
    }
}

/// BER Tag
///
/// A BER tag identifies the type of an ASN.1 value. It consists of:
/// - **Class**: Universal, Application, Context-specific, or Private
/// - **Constructed/Primitive**: OBJECT IDENTIFIER and REAL are always primitive
/// - **Tag Number**: 6 for OBJECT IDENTIFIER, 9 for REAL
///
/// # Encoding Format
///
/// Short form (tag number 0-30):
/// ```text
/// Bits: 8 7 6 5 4 3 2 1
///       C C P T T T T T
/// ```
///
/// High tag number form (tag number > 30):
/// ```text
/// First byte:      C C P 1 1 1 1 1
/// Following bytes: 1 T T T T T T T ... 0 T T T T T T T
/// ```
///
/// # Why This Design?
/// The tag numbers this crate needs fit the short form, but decoding the
/// high tag number form lets the decoder step over, and report, any tag it
/// is handed instead of misreading the octets that follow as a length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BerTag {
    class: BerTagClass,
    constructed: bool,
    number: u32,
}

impl BerTag {
    /// Universal, primitive OBJECT IDENTIFIER tag (`0x06`)
    pub const OBJECT_IDENTIFIER: BerTag = BerTag::universal(false, TAG_OBJECT_IDENTIFIER);
    /// Universal, primitive REAL tag (`0x09`)
    pub const REAL: BerTag = BerTag::universal(false, TAG_REAL);

    /// Create a new BER tag
    ///
    /// # Arguments
    /// * `class` - Tag class
    /// * `constructed` - Whether this is a constructed type
    /// * `number` - Tag number
    pub const fn new(class: BerTagClass, constructed: bool, number: u32) -> Self {
        Self {
            class,
            constructed,
            number,
        }
    }

    /// Create a Universal class tag
    pub const fn universal(constructed: bool, number: u32) -> Self {
        Self::new(BerTagClass::Universal, constructed, number)
    }

    /// Get tag class
    pub fn class(&self) -> BerTagClass {
        self.class
    }

    /// Check if tag is constructed
    pub fn is_constructed(&self) -> bool {
        self.constructed
    }

    /// Get tag number
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Encode tag to bytes
    ///
    /// # Encoding Strategy
    /// - If tag number <= 30: Use short form (1 byte)
    /// - If tag number > 30: Use high tag number form, base-128 groups after
    ///   a `0x1F` marker
    pub fn encode(&self) -> Vec<u8> {
        let leading = self.class.to_bits() | if self.constructed { 0x20 } else { 0x00 };

        if self.number <= 30 {
            return vec![leading | self.number as u8];
        }

        let mut result = vec![leading | 0x1F];
        result.extend_from_slice(&base128(u64::from(self.number)));
        result
    }

    /// Decode tag from bytes
    ///
    /// # Arguments
    /// * `data` - Buffer starting at the identifier octet
    ///
    /// # Returns
    /// Returns `Ok((BerTag, bytes_consumed))`
    ///
    /// # Errors
    /// - `BerError::TruncatedInput` if the buffer is empty or ends inside a
    ///   high tag number
    /// - `BerError::UnexpectedTag` if the tag number does not fit in 32 bits
    pub fn decode(data: &[u8]) -> BerResult<(Self, usize)> {
        let Some(&first_byte) = data.first() else {
            return Err(BerError::TruncatedInput("empty buffer for tag".to_string()));
        };

        let class = BerTagClass::from_bits(first_byte);
        let constructed = (first_byte & 0x20) != 0;
        let tag_bits = first_byte & 0x1F;

        if tag_bits < 31 {
            return Ok((Self::new(class, constructed, u32::from(tag_bits)), 1));
        }

        let mut number = 0u32;
        for (index, &byte) in data.iter().enumerate().skip(1) {
            number = number
                .checked_mul(128)
                .map(|n| n | u32::from(byte & 0x7F))
                .ok_or_else(|| BerError::UnexpectedTag("tag number too large".to_string()))?;
            if byte & 0x80 == 0 {
                return Ok((Self::new(class, constructed, number), index + 1));
            }
        }

        Err(BerError::TruncatedInput(
            "incomplete high tag number".to_string(),
        ))
    }
}

/// Big-endian base-128 groups, continuation bit on all but the last byte
pub(crate) fn base128(mut value: u64) -> Vec<u8> {
    let mut groups = vec![(value & 0x7F) as u8];
    value >>= 7;
    while value > 0 {
        groups.push(0x80 | (value & 0x7F) as u8);
        value >>= 7;
    }
    groups.reverse();
    groups
}

/// BER definite length
///
/// # Encoding Format
///
/// Short form (length 0-127):
/// ```text
/// Bits: 8 7 6 5 4 3 2 1
///       0 L L L L L L L
/// ```
///
/// Long form (length > 127):
/// ```text
/// First byte:      1 N N N N N N N   (number of length octets)
/// Following bytes: big-endian length, fewest octets
/// ```
///
/// Indefinite length (`0x80`) is only defined for constructed encodings, so
/// it is rejected on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BerLength {
    /// Short form: length 0-127
    Short(u8),
    /// Long form: length > 127
    Long(usize),
}

impl BerLength {
    /// Create a length, choosing the short form when it fits
    pub fn new(length: usize) -> Self {
        if length < 128 {
            BerLength::Short(length as u8)
        } else {
            BerLength::Long(length)
        }
    }

    /// Get the length value
    pub fn value(&self) -> usize {
        match self {
            BerLength::Short(l) => *l as usize,
            BerLength::Long(l) => *l,
        }
    }

    /// Encode length to bytes
    pub fn encode(&self) -> Vec<u8> {
        match *self {
            BerLength::Short(length) => vec![length],
            BerLength::Long(length) => {
                let octets = length.to_be_bytes();
                let skip = octets.iter().take_while(|&&b| b == 0).count();
                let significant = &octets[skip..];

                let mut result = Vec::with_capacity(1 + significant.len());
                result.push(0x80 | significant.len() as u8);
                result.extend_from_slice(significant);
                result
            }
        }
    }

    /// Decode length from bytes
    ///
    /// # Returns
    /// Returns `Ok((BerLength, bytes_consumed))`
    ///
    /// # Errors
    /// Returns `BerError::InvalidLength` for an empty buffer, the indefinite
    /// form, a length wider than `usize`, or missing length octets.
    pub fn decode(data: &[u8]) -> BerResult<(Self, usize)> {
        let Some(&first_byte) = data.first() else {
            return Err(BerError::InvalidLength("empty buffer for length".to_string()));
        };

        if first_byte & 0x80 == 0 {
            return Ok((BerLength::Short(first_byte), 1));
        }

        let num_bytes = (first_byte & 0x7F) as usize;
        if num_bytes == 0 {
            return Err(BerError::InvalidLength(
                "indefinite length not allowed for primitive encodings".to_string(),
            ));
        }
        if num_bytes > std::mem::size_of::<usize>() {
            return Err(BerError::InvalidLength(format!(
                "length of length too large: {} bytes",
                num_bytes
            )));
        }
        if data.len() < 1 + num_bytes {
            return Err(BerError::InvalidLength(format!(
                "need {} length bytes, got {}",
                num_bytes,
                data.len() - 1
            )));
        }

        let length = data[1..=num_bytes]
            .iter()
            .fold(0usize, |acc, &b| (acc << 8) | b as usize);

        Ok((BerLength::Long(length), 1 + num_bytes))
    }
}
