//! Constant descriptions of register layouts.

use core::ops::Range;

use crate::codec;

/// A named, contiguous bit range within a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Field {
    pub name: &'static str,
    pub offset: u8,
    pub width: u8,
    pub signed: bool,
}

impl Field {
    pub const fn new(name: &'static str, offset: u8, width: u8) -> Self {
        Self {
            name,
            offset,
            width,
            signed: false,
        }
    }

    /// Interpret the field as a two's complement integer.
    pub const fn signed(self) -> Self {
        Self {
            signed: true,
            ..self
        }
    }

    /// The bits of the parent register the field occupies.
    #[inline]
    pub const fn domain(&self) -> Range<u8> {
        self.offset..(self.offset + self.width)
    }

    /// The field's bits in position within the raw word.
    #[inline]
    pub const fn mask(&self) -> u32 {
        codec::mask(self.width) << self.offset
    }

    /// Extract the field from a raw word.
    ///
    /// Signed fields are sign-extended, and returned as their 32-bit two's
    /// complement bit pattern.
    pub const fn read(&self, raw: u32) -> u32 {
        if self.signed {
            codec::unpack_signed(raw, self.offset, self.width) as u32
        } else {
            codec::unpack(raw, self.offset, self.width)
        }
    }

    /// Merge `value` into `acc` at the field's position, truncating it to the field width.
    pub const fn write(&self, acc: u32, value: u32) -> u32 {
        codec::pack(acc, self.offset, self.width, value)
    }

    const fn is_placed_within(&self, n_bits: u8) -> bool {
        self.width != 0 && self.offset as u32 + self.width as u32 <= n_bits as u32
    }
}

/// Check that a layout is well formed: the register width is within `1..=32`,
/// every field is non-empty and lies within the register width, and no two
/// fields overlap.
pub const fn is_valid(fields: &[Field], n_bits: u8) -> bool {
    if n_bits == 0 || n_bits > 32 {
        return false;
    }

    let mut occupied = 0u32;
    let mut i = 0;

    while i < fields.len() {
        let field = &fields[i];

        if !field.is_placed_within(n_bits) {
            return false;
        }

        if occupied & field.mask() != 0 {
            return false;
        }

        occupied |= field.mask();
        i += 1;
    }

    true
}

/// The union of the masks of every field.
pub const fn mask(fields: &[Field]) -> u32 {
    let mut mask = 0;
    let mut i = 0;

    while i < fields.len() {
        mask |= fields[i].mask();
        i += 1;
    }

    mask
}
