//! # ordinal-bitset
//!
//! Packs a subset of an enum type into one storage cell. Each member owns
//! the bit at its bit position; a set is stored either as a native 64-bit
//! word or, when the type is wider or the column holds text, as the decimal
//! string of an arbitrary-precision integer.
//!
//! ```
//! use ordinal_bitset::{Scalar, SetCodec, StorageWidth};
//! use ordinal_enum::define_enum_type;
//!
//! let color = define_enum_type(Some("Color"), ["RED", "GREEN", "BLUE"]).unwrap();
//! let codec = SetCodec::new(&color, StorageWidth::Native).unwrap();
//! let red_blue = codec.coerce("RED, BLUE").unwrap();
//! assert_eq!(codec.encode(red_blue).unwrap(), Scalar::Integer(0b101));
//! ```

pub mod bits;
pub mod codec;
pub mod coerce;
pub mod error;
pub mod scalar;

pub use bits::Bits;
pub use codec::{EnumSet, NATIVE_BITS, SetCodec, StorageWidth};
pub use coerce::{SetInput, SetItem};
pub use error::{CodecError, CoercionError};
pub use scalar::{ColumnKind, Scalar};
