//! Bit patterns in native or arbitrary-precision form.
//!
//! Wide patterns are [`BigUint`]s. Every operation on them is a shift or a
//! logical operation on the full integer, so positions past 63 behave like
//! any other.

use crate::codec::{NATIVE_BITS, StorageWidth};
use crate::error::CodecError;
use crate::scalar::Scalar;
use num_bigint::BigUint;
use num_traits::{One, Zero};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bits {
    /// Stored as an `i64` with the same bit pattern.
    Native(u64),
    /// Stored as a decimal string.
    Wide(BigUint),
}

impl Bits {
    pub fn zero(width: StorageWidth) -> Self {
        match width {
            StorageWidth::Native => Bits::Native(0),
            StorageWidth::Wide => Bits::Wide(BigUint::zero()),
        }
    }

    pub fn width(&self) -> StorageWidth {
        match self {
            Bits::Native(_) => StorageWidth::Native,
            Bits::Wide(_) => StorageWidth::Wide,
        }
    }

    pub fn is_zero(&self) -> bool {
        match self {
            Bits::Native(word) => *word == 0,
            Bits::Wide(n) => n.is_zero(),
        }
    }

    pub fn test(&self, position: usize) -> bool {
        match self {
            Bits::Native(word) => position < NATIVE_BITS && (word >> position) & 1 == 1,
            Bits::Wide(n) => ((n >> position) & BigUint::one()).is_one(),
        }
    }

    /// Set one bit. Setting a bit twice is a no-op.
    pub fn set(&mut self, position: usize) -> Result<(), CodecError> {
        match self {
            Bits::Native(word) => {
                if position >= NATIVE_BITS {
                    return Err(CodecError::BitOutOfRange { position });
                }
                *word |= 1u64 << position;
            }
            Bits::Wide(n) => *n |= BigUint::one() << position,
        }
        Ok(())
    }

    pub fn clear(&mut self, position: usize) {
        if !self.test(position) {
            return;
        }
        match self {
            Bits::Native(word) => *word &= !(1u64 << position),
            Bits::Wide(n) => *n ^= BigUint::one() << position,
        }
    }

    /// Positions of the set bits, ascending.
    pub fn positions(&self) -> Vec<usize> {
        let upper = match self {
            Bits::Native(word) => NATIVE_BITS - word.leading_zeros() as usize,
            Bits::Wide(n) => n.bits() as usize,
        };
        (0..upper).filter(|&position| self.test(position)).collect()
    }

    pub fn to_scalar(&self) -> Scalar {
        match self {
            Bits::Native(word) => Scalar::Integer(*word as i64),
            Bits::Wide(n) => Scalar::Text(n.to_str_radix(10)),
        }
    }

    /// Parse a stored scalar.
    ///
    /// Blank text reads as zero. Native storage takes any integer (its bit
    /// pattern) or decimal text that fits in 64 bits; wide storage takes a
    /// non-negative integer or decimal text of any length.
    pub fn from_scalar(scalar: &Scalar, width: StorageWidth) -> Result<Self, CodecError> {
        let malformed = || CodecError::Malformed {
            width,
            scalar: scalar.to_string(),
        };
        if scalar.is_blank() {
            return Ok(Self::zero(width));
        }

        match (scalar, width) {
            (Scalar::Integer(n), StorageWidth::Native) => Ok(Bits::Native(*n as u64)),
            (Scalar::Integer(n), StorageWidth::Wide) => u64::try_from(*n)
                .map(|n| Bits::Wide(BigUint::from(n)))
                .map_err(|_| malformed()),
            (Scalar::Text(text), _) => {
                let digits = text.trim();
                if !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(malformed());
                }
                match width {
                    StorageWidth::Native => digits
                        .parse::<u64>()
                        .map(Bits::Native)
                        .map_err(|_| malformed()),
                    StorageWidth::Wide => BigUint::parse_bytes(digits.as_bytes(), 10)
                        .map(Bits::Wide)
                        .ok_or_else(malformed),
                }
            }
        }
    }
}
