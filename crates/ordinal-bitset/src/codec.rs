//! Encoding sets of enum values into a single scalar.

use crate::bits::Bits;
use crate::coerce::{self, SetInput};
use crate::error::{CodecError, CoercionError};
use crate::scalar::{ColumnKind, Scalar};
use ordinal_enum::{EnumType, EnumValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

/// Bits available in native storage.
pub const NATIVE_BITS: usize = 64;

/// How a packed set is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageWidth {
    /// A 64-bit word in an integer column.
    Native,
    /// An arbitrary-precision integer written as a decimal string.
    Wide,
}

impl StorageWidth {
    /// Pick the width for a column of `kind` holding `bit_width` bits.
    ///
    /// Text columns are always wide. Integer columns must fit the type in a
    /// native word. Columns of unknown kind are native when the type fits and
    /// wide otherwise.
    pub fn for_column(kind: ColumnKind, bit_width: usize) -> Result<Self, CodecError> {
        let fits = bit_width <= NATIVE_BITS;
        match kind {
            ColumnKind::Text => Ok(StorageWidth::Wide),
            ColumnKind::Integer if fits => Ok(StorageWidth::Native),
            ColumnKind::Integer => Err(CodecError::WidthExceeded {
                bit_width,
                max: NATIVE_BITS,
            }),
            ColumnKind::Unknown if fits => Ok(StorageWidth::Native),
            ColumnKind::Unknown => Ok(StorageWidth::Wide),
        }
    }
}

impl fmt::Display for StorageWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageWidth::Native => f.write_str("native"),
            StorageWidth::Wide => f.write_str("wide"),
        }
    }
}

/// Members of one enum type, in declaration order and without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumSet<'t> {
    members: Vec<&'t EnumValue>,
}

impl<'t> EnumSet<'t> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, value: &EnumValue) -> bool {
        self.members.iter().any(|member| *member == value)
    }

    pub fn names(&self) -> Vec<&'t str> {
        self.members.iter().map(|member| member.name()).collect()
    }
}

impl<'t> FromIterator<&'t EnumValue> for EnumSet<'t> {
    fn from_iter<I: IntoIterator<Item = &'t EnumValue>>(iter: I) -> Self {
        let mut members: Vec<&'t EnumValue> = iter.into_iter().collect();
        members.sort_by_key(|member| member.ordinal());
        members.dedup();
        Self { members }
    }
}

impl<'t> Deref for EnumSet<'t> {
    type Target = [&'t EnumValue];

    fn deref(&self) -> &Self::Target {
        &self.members
    }
}

impl<'t> IntoIterator for EnumSet<'t> {
    type Item = &'t EnumValue;
    type IntoIter = std::vec::IntoIter<&'t EnumValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.members.into_iter()
    }
}

/// `Beer, CubaLibre`
impl fmt::Display for EnumSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names().join(", "))
    }
}

/// Packs subsets of one enum type at a fixed storage width.
///
/// Each member occupies the bit at its [`bit_position`](EnumValue::bit_position).
#[derive(Debug, Clone, Copy)]
pub struct SetCodec<'t> {
    ty: &'t EnumType,
    width: StorageWidth,
}

impl<'t> SetCodec<'t> {
    /// Fails with [`CodecError::WidthExceeded`] when a native codec is asked
    /// for a type with bit positions past 63.
    pub fn new(ty: &'t EnumType, width: StorageWidth) -> Result<Self, CodecError> {
        let bit_width = ty.bit_width();
        if width == StorageWidth::Native && bit_width > NATIVE_BITS {
            return Err(CodecError::WidthExceeded {
                bit_width,
                max: NATIVE_BITS,
            });
        }
        Ok(Self { ty, width })
    }

    /// Codec for a column of `kind`, see [`StorageWidth::for_column`].
    pub fn for_column(ty: &'t EnumType, kind: ColumnKind) -> Result<Self, CodecError> {
        Self::new(ty, StorageWidth::for_column(kind, ty.bit_width())?)
    }

    pub fn enum_type(&self) -> &'t EnumType {
        self.ty
    }

    pub fn width(&self) -> StorageWidth {
        self.width
    }

    pub fn empty(&self) -> Bits {
        Bits::zero(self.width)
    }

    pub fn encode_bits<'v, I>(&self, values: I) -> Result<Bits, CodecError>
    where
        I: IntoIterator<Item = &'v EnumValue>,
    {
        let mut bits = self.empty();
        for value in values {
            self.check_member(value)?;
            bits.set(value.bit_position())?;
        }
        Ok(bits)
    }

    /// Scalar with the bit of every value in `values` set.
    pub fn encode<'v, I>(&self, values: I) -> Result<Scalar, CodecError>
    where
        I: IntoIterator<Item = &'v EnumValue>,
    {
        self.encode_bits(values).map(|bits| bits.to_scalar())
    }

    pub fn parse(&self, scalar: &Scalar) -> Result<Bits, CodecError> {
        Bits::from_scalar(scalar, self.width)
    }

    /// Members whose bits are set, in declaration order. Bits no member
    /// occupies are ignored.
    pub fn decode_bits(&self, bits: &Bits) -> EnumSet<'t> {
        self.ty
            .iter()
            .filter(|value| bits.test(value.bit_position()))
            .collect()
    }

    /// A missing scalar decodes to `None`, which is not the empty set.
    pub fn decode(&self, scalar: Option<&Scalar>) -> Result<Option<EnumSet<'t>>, CodecError> {
        scalar
            .map(|scalar| self.parse(scalar).map(|bits| self.decode_bits(&bits)))
            .transpose()
    }

    /// Set bits that no member of the type occupies.
    pub fn unknown_bits(&self, scalar: &Scalar) -> Result<Vec<usize>, CodecError> {
        self.parse(scalar).map(|bits| self.unknown_positions(&bits))
    }

    pub fn unknown_positions(&self, bits: &Bits) -> Vec<usize> {
        bits.positions()
            .into_iter()
            .filter(|&position| !self.ty.iter().any(|value| value.bit_position() == position))
            .collect()
    }

    pub fn contains(&self, scalar: Option<&Scalar>, value: &EnumValue) -> Result<bool, CodecError> {
        self.check_member(value)?;
        match scalar {
            Some(scalar) => Ok(self.parse(scalar)?.test(value.bit_position())),
            None => Ok(false),
        }
    }

    /// `scalar` with the bit of `value` set or cleared.
    pub fn with_member(
        &self,
        scalar: Option<&Scalar>,
        value: &EnumValue,
        present: bool,
    ) -> Result<Scalar, CodecError> {
        self.check_member(value)?;
        let mut bits = match scalar {
            Some(scalar) => self.parse(scalar)?,
            None => self.empty(),
        };
        if present {
            bits.set(value.bit_position())?;
        } else {
            bits.clear(value.bit_position());
        }
        Ok(bits.to_scalar())
    }

    /// Resolve heterogeneous input to a set, rejecting it whole if any
    /// element does not resolve.
    pub fn coerce<'i>(&self, input: impl Into<SetInput<'i>>) -> Result<EnumSet<'t>, CoercionError> {
        coerce::resolve(self.ty, input.into())
    }

    /// [`coerce`](Self::coerce) then [`encode`](Self::encode).
    pub fn encode_input<'i>(&self, input: impl Into<SetInput<'i>>) -> Result<Scalar, CodecError> {
        let set = self.coerce(input)?;
        self.encode(set)
    }

    fn check_member(&self, value: &EnumValue) -> Result<(), CodecError> {
        if self.ty.contains(value) {
            Ok(())
        } else {
            Err(CodecError::ForeignValue {
                type_name: self.ty.display_name().to_string(),
                value: value.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ordinal_enum::define_enum_type;

    #[test]
    fn width_for_column() {
        use ColumnKind::*;
        assert_eq!(StorageWidth::for_column(Text, 3), Ok(StorageWidth::Wide));
        assert_eq!(StorageWidth::for_column(Integer, 64), Ok(StorageWidth::Native));
        assert_eq!(
            StorageWidth::for_column(Integer, 65),
            Err(CodecError::WidthExceeded {
                bit_width: 65,
                max: 64
            })
        );
        assert_eq!(StorageWidth::for_column(Unknown, 64), Ok(StorageWidth::Native));
        assert_eq!(StorageWidth::for_column(Unknown, 65), Ok(StorageWidth::Wide));
    }

    #[test]
    fn native_codec_rejects_wide_types() {
        let wide = define_enum_type(Some("Many"), (0..65).map(|i| format!("M{i}")))
            .expect("many should define");
        assert!(matches!(
            SetCodec::new(&wide, StorageWidth::Native),
            Err(CodecError::WidthExceeded { bit_width: 65, .. })
        ));
        assert_eq!(
            SetCodec::for_column(&wide, ColumnKind::Unknown)
                .expect("unknown column falls back to wide")
                .width(),
            StorageWidth::Wide
        );
    }

    #[test]
    fn foreign_values_are_rejected() {
        let color = define_enum_type(Some("Color"), ["RED", "GREEN"]).expect("color");
        let other = define_enum_type(Some("Other"), ["RED"]).expect("other");
        let codec = SetCodec::new(&color, StorageWidth::Native).expect("codec");
        assert_eq!(
            codec.encode([other.first()]),
            Err(CodecError::ForeignValue {
                type_name: "Color".to_string(),
                value: "Other::RED".to_string(),
            })
        );
    }

    #[test]
    fn decode_distinguishes_absent_from_empty() {
        let color = define_enum_type(Some("Color"), ["RED", "GREEN"]).expect("color");
        let codec = SetCodec::new(&color, StorageWidth::Native).expect("codec");
        assert_eq!(codec.decode(None), Ok(None));
        assert_eq!(codec.decode(Some(&Scalar::Integer(0))), Ok(Some(EnumSet::new())));
    }

    #[test]
    fn member_toggles_and_stale_bits() {
        let color = define_enum_type(Some("Color"), ["RED", "GREEN", "BLUE"]).expect("color");
        let codec = SetCodec::new(&color, StorageWidth::Native).expect("codec");
        let green = color.with_name("GREEN").expect("green");

        let with_green = codec.with_member(None, green, true).expect("set");
        assert_eq!(with_green, Scalar::Integer(2));
        assert_eq!(codec.contains(Some(&with_green), green), Ok(true));
        let cleared = codec
            .with_member(Some(&with_green), green, false)
            .expect("clear");
        assert_eq!(cleared, Scalar::Integer(0));

        assert_eq!(codec.unknown_bits(&Scalar::Integer(0b1010)), Ok(vec![3]));
    }

    #[test]
    fn set_display_joins_names() {
        let drinks = define_enum_type(Some("Drinks"), ["Beer", "Wine", "CubaLibre"]).expect("drinks");
        let set: EnumSet<'_> = [drinks.last(), drinks.first(), drinks.first()]
            .into_iter()
            .collect();
        assert_eq!(set.to_string(), "Beer, CubaLibre");
        assert_eq!(set.len(), 2);
    }
}
