//! Runtime support for generated register definitions.
//!
//! A register definition is a plain value type with one member per field.
//! Conversions to and from the raw bus word are performed with explicit
//! shift/mask arithmetic by the [`codec`] primitives, never by reinterpreting
//! the value's memory.

#![no_std]

pub mod codec;
pub mod layout;

use core::fmt;

#[doc(hidden)]
pub use static_assertions;

/// Implemented by every generated register value type.
pub trait Register: Copy {
    /// The register name as it appears in the datasheet.
    const NAME: &'static str;

    /// The bus address used to select this register.
    ///
    /// Registers that exist once per motor report the address of the first instance.
    const ADDRESS: u8;

    /// The number of low bits of the raw word that are meaningful.
    const N_BITS: u8;

    /// The layout of every declared field.
    const FIELDS: &'static [layout::Field];

    /// Decode a raw bus word. Bits outside of declared fields are dropped.
    fn from_raw(raw: u32) -> Self;

    /// Encode the value as a raw bus word. Bits outside of declared fields are zero.
    fn raw(&self) -> u32;

    /// The bits of the raw word covered by declared fields.
    fn mask() -> u32 {
        layout::mask(Self::FIELDS)
    }

    /// The `(address, raw)` pair to hand to the transport for a write.
    fn write(&self) -> (u8, u32) {
        (Self::ADDRESS, self.raw())
    }
}

/// A bus address that no register occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UnknownAddress(pub u8);

impl fmt::Display for UnknownAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no register at address 0x{:02x}", self.0)
    }
}

impl core::error::Error for UnknownAddress {}
