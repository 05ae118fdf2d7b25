//! Bit-level pack/unpack primitives over a 32-bit accumulator.
//!
//! All primitives require `1 <= width <= 32` and `offset + width <= 32`.
//! Generated code only calls them with layouts that were validated when the
//! register model was built, and the generated layouts are additionally
//! checked with a static assertion.

/// A mask of the low `width` bits.
#[inline]
pub const fn mask(width: u8) -> u32 {
    debug_assert!(width >= 1 && width <= 32);

    u32::MAX >> (32 - width as u32)
}

/// Place the low `width` bits of `value` at `offset` within `acc`.
///
/// Bits of `value` beyond `width` are discarded.
#[inline]
pub const fn pack(acc: u32, offset: u8, width: u8, value: u32) -> u32 {
    debug_assert!(offset as u32 + width as u32 <= 32);

    acc | ((value & mask(width)) << offset)
}

/// Place the `width`-bit two's complement representation of `value` at `offset` within `acc`.
#[inline]
pub const fn pack_signed(acc: u32, offset: u8, width: u8, value: i32) -> u32 {
    pack(acc, offset, width, value as u32)
}

/// Extract `width` bits starting at `offset`.
#[inline]
pub const fn unpack(raw: u32, offset: u8, width: u8) -> u32 {
    debug_assert!(offset as u32 + width as u32 <= 32);

    (raw >> offset) & mask(width)
}

/// Extract `width` bits starting at `offset`, sign-extending from bit `width - 1`.
#[inline]
pub const fn unpack_signed(raw: u32, offset: u8, width: u8) -> i32 {
    let shift = 32 - width as u32;

    ((unpack(raw, offset, width) << shift) as i32) >> shift
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks() {
        assert_eq!(mask(1), 0b1);
        assert_eq!(mask(4), 0xf);
        assert_eq!(mask(31), 0x7fff_ffff);
        assert_eq!(mask(32), u32::MAX);
    }

    #[test]
    fn pack_places_bits() {
        let raw = pack(0, 0, 4, 5);
        let raw = pack(raw, 4, 3, 4);
        let raw = pack(raw, 7, 4, 1);
        let raw = pack(raw, 14, 1, 0);
        let raw = pack(raw, 15, 2, 2);

        assert_eq!(raw, 0x0001_00c5);
    }

    #[test]
    fn pack_truncates() {
        assert_eq!(pack(0, 0, 4, 0x15), 0x5);
        assert_eq!(pack(0, 8, 5, 0xff), 0x1f00);
    }

    #[test]
    fn full_width() {
        assert_eq!(pack(0, 0, 32, 0xdead_beef), 0xdead_beef);
        assert_eq!(unpack(0xdead_beef, 0, 32), 0xdead_beef);
        assert_eq!(unpack_signed(0xffff_ffff, 0, 32), -1);
        assert_eq!(pack_signed(0, 0, 32, i32::MIN), 0x8000_0000);
    }

    #[test]
    fn top_placement() {
        assert_eq!(pack(0, 31, 1, 1), 0x8000_0000);
        assert_eq!(unpack(0x8000_0000, 31, 1), 1);
        assert_eq!(pack(0, 24, 8, 0x10), 0x1000_0000);
        assert_eq!(unpack(0x1000_0000, 24, 8), 0x10);
    }

    #[test]
    fn signed() {
        // 7-bit field at 16
        let raw = pack_signed(0, 16, 7, -1);
        assert_eq!(raw, 0x007f_0000);
        assert_eq!(unpack_signed(raw, 16, 7), -1);

        let raw = pack_signed(0, 16, 7, -64);
        assert_eq!(raw, 0x0040_0000);
        assert_eq!(unpack_signed(raw, 16, 7), -64);

        assert_eq!(unpack_signed(pack_signed(0, 16, 7, 63), 16, 7), 63);

        // 24-bit field at 0
        assert_eq!(unpack_signed(0x00ff_ffff, 0, 24), -1);
        assert_eq!(unpack_signed(0x007f_ffff, 0, 24), 0x7f_ffff);
    }

    #[test]
    fn unpack_ignores_neighbours() {
        let raw = 0xffff_ffff;

        assert_eq!(unpack(raw, 4, 3), 0b111);
        assert_eq!(unpack(0b1111_0000, 0, 4), 0);
    }
}
