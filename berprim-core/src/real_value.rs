//! REAL value type
//!
//! `RealValue` is the abstract value carried by an ASN.1 REAL: either one of
//! the special values or a binary number `(-1)^S * M * 2^E` with an integer
//! mantissa. Conversions to and from `f64` work on the IEEE-754 bit pattern
//! with integer arithmetic only.

use std::fmt;

const FRACTION_BITS: u32 = 52;
const FRACTION_MASK: u64 = (1 << FRACTION_BITS) - 1;
const IMPLICIT_BIT: u64 = 1 << FRACTION_BITS;
const EXPONENT_MASK: u64 = 0x7FF;
const SIGN_BIT: u64 = 1 << 63;
const INFINITY_BITS: u64 = EXPONENT_MASK << FRACTION_BITS;
/// Exponent of the least significant bit of an integer mantissa when the
/// biased exponent field is 1 (also the fixed exponent of subnormals).
const MIN_EXPONENT: i64 = -1074;
/// Bias between the IEEE exponent field and the integer-mantissa exponent
const EXPONENT_BIAS: i64 = 1075;
const PRECISION: i64 = 53;

/// ASN.1 REAL abstract value
///
/// Equality is structural. Values built with [`RealValue::binary`] or
/// converted from a float are canonical, so equal numbers compare equal; a
/// `Binary` written out by hand should go through [`RealValue::normalized`]
/// before comparing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RealValue {
    /// Plus or minus zero
    Zero { negative: bool },
    /// PLUS-INFINITY
    PlusInfinity,
    /// MINUS-INFINITY
    MinusInfinity,
    /// NOT-A-NUMBER
    NotANumber,
    /// `(-1)^negative * mantissa * 2^exponent`
    Binary {
        negative: bool,
        mantissa: u64,
        exponent: i64,
    },
}

impl RealValue {
    /// Create a binary value in canonical form
    ///
    /// A zero mantissa collapses to `Zero`. Otherwise trailing zero bits are
    /// moved into the exponent so the stored mantissa is odd, which makes
    /// equal numbers compare equal: `binary(false, 12, -3) == binary(false, 3, -1)`.
    ///
    /// # Arguments
    /// * `negative` - Sign of the value
    /// * `mantissa` - Unsigned integer mantissa
    /// * `exponent` - Power of two applied to the mantissa
    pub fn binary(negative: bool, mantissa: u64, exponent: i64) -> Self {
        if mantissa == 0 {
            return RealValue::Zero { negative };
        }

        let trailing = mantissa.trailing_zeros();
        RealValue::Binary {
            negative,
            mantissa: mantissa >> trailing,
            exponent: exponent.saturating_add(i64::from(trailing)),
        }
    }

    /// Bring a value into canonical form
    ///
    /// Only `Binary` values built directly through the enum variant can be
    /// non-canonical; every other value is returned unchanged.
    pub fn normalized(&self) -> Self {
        match *self {
            RealValue::Binary {
                negative,
                mantissa,
                exponent,
            } => RealValue::binary(negative, mantissa, exponent),
            other => other,
        }
    }

    /// Check if this is one of the X.690 special values (infinities, NaN, minus zero)
    ///
    /// Plus zero is not special: it is encoded with no content octets.
    pub fn is_special(&self) -> bool {
        matches!(
            self,
            RealValue::PlusInfinity
                | RealValue::MinusInfinity
                | RealValue::NotANumber
                | RealValue::Zero { negative: true }
        )
    }

    /// Check if this is plus or minus zero
    pub fn is_zero(&self) -> bool {
        matches!(self, RealValue::Zero { .. })
    }

    /// Check if the sign is negative
    pub fn is_negative(&self) -> bool {
        match self {
            RealValue::Zero { negative } | RealValue::Binary { negative, .. } => *negative,
            RealValue::MinusInfinity => true,
            RealValue::PlusInfinity | RealValue::NotANumber => false,
        }
    }

    /// Convert to the nearest `f64`
    ///
    /// Exact for every value produced from an `f64`. Mantissas wider than 53
    /// bits are rounded to nearest, ties to even; magnitudes beyond the `f64`
    /// range become infinity or signed zero.
    pub fn to_f64(&self) -> f64 {
        match *self {
            RealValue::Zero { negative } => {
                if negative {
                    -0.0
                } else {
                    0.0
                }
            }
            RealValue::PlusInfinity => f64::INFINITY,
            RealValue::MinusInfinity => f64::NEG_INFINITY,
            RealValue::NotANumber => f64::NAN,
            RealValue::Binary {
                negative,
                mantissa,
                exponent,
            } => f64::from_bits(binary_to_bits(negative, mantissa, exponent)),
        }
    }
}

/// Build the IEEE-754 bit pattern nearest to `(-1)^negative * mantissa * 2^exponent`
fn binary_to_bits(negative: bool, mantissa: u64, exponent: i64) -> u64 {
    let sign = if negative { SIGN_BIT } else { 0 };
    if mantissa == 0 {
        return sign;
    }

    let width = 64 - i64::from(mantissa.leading_zeros());
    // value lies in [2^top, 2^(top + 1))
    let top = exponent.saturating_add(width - 1);
    if top > 1023 {
        return sign | INFINITY_BITS;
    }
    if top < MIN_EXPONENT - 1 {
        // below half the smallest subnormal
        return sign;
    }

    // Bits to drop so the mantissa fits the 53-bit precision, or so its LSB
    // lands on 2^-1074 for subnormal results.
    let shift = (width - PRECISION).max(MIN_EXPONENT - exponent);
    let (mut significand, mut lsb_exponent) = if shift <= 0 {
        (mantissa << (-shift) as u32, exponent + shift)
    } else {
        (round_shift(mantissa, shift as u32), exponent + shift)
    };

    if significand == 0 {
        return sign;
    }
    if significand == IMPLICIT_BIT << 1 {
        significand >>= 1;
        lsb_exponent += 1;
    }

    if significand >= IMPLICIT_BIT {
        let biased = lsb_exponent + EXPONENT_BIAS;
        if biased >= EXPONENT_MASK as i64 {
            return sign | INFINITY_BITS;
        }
        sign | ((biased as u64) << FRACTION_BITS) | (significand & FRACTION_MASK)
    } else {
        // subnormal: lsb_exponent is MIN_EXPONENT here
        sign | significand
    }
}

/// Shift right by `shift` bits, rounding to nearest with ties to even
fn round_shift(value: u64, shift: u32) -> u64 {
    if shift > 64 {
        // value < 2^64 <= half of the first dropped unit
        return 0;
    }
    let wide = u128::from(value);
    let mut quotient = wide >> shift;
    let remainder = wide & ((1u128 << shift) - 1);
    let half = 1u128 << (shift - 1);
    if remainder > half || (remainder == half && quotient & 1 == 1) {
        quotient += 1;
    }
    quotient as u64
}

impl From<f64> for RealValue {
    fn from(value: f64) -> Self {
        let bits = value.to_bits();
        let negative = bits & SIGN_BIT != 0;
        let biased = (bits >> FRACTION_BITS) & EXPONENT_MASK;
        let fraction = bits & FRACTION_MASK;

        if biased == EXPONENT_MASK {
            return if fraction != 0 {
                RealValue::NotANumber
            } else if negative {
                RealValue::MinusInfinity
            } else {
                RealValue::PlusInfinity
            };
        }

        if biased == 0 {
            RealValue::binary(negative, fraction, MIN_EXPONENT)
        } else {
            RealValue::binary(negative, fraction | IMPLICIT_BIT, biased as i64 - EXPONENT_BIAS)
        }
    }
}

impl From<f32> for RealValue {
    fn from(value: f32) -> Self {
        RealValue::from(f64::from(value))
    }
}

impl From<RealValue> for f64 {
    fn from(value: RealValue) -> Self {
        value.to_f64()
    }
}

impl fmt::Display for RealValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RealValue::Zero { negative: false } => write!(f, "0"),
            RealValue::Zero { negative: true } => write!(f, "-0"),
            RealValue::PlusInfinity => write!(f, "PLUS-INFINITY"),
            RealValue::MinusInfinity => write!(f, "MINUS-INFINITY"),
            RealValue::NotANumber => write!(f, "NOT-A-NUMBER"),
            RealValue::Binary {
                negative,
                mantissa,
                exponent,
            } => write!(
                f,
                "{}{} * 2^{}",
                if *negative { "-" } else { "" },
                mantissa,
                exponent
            ),
        }
    }
}
