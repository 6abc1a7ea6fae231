//! The US-ASCII fast path.
//!
//! Widening maps every byte to one code unit and narrowing maps every code
//! unit to one byte. Anything outside `0x00..0x80` becomes the substitution
//! character. This is a projection, not a decode: it never fails and never
//! changes the unit count.

/// Substitution character used when no default character is supplied.
pub const SUBSTITUTE: u8 = b'?';

/// Widen a single byte.
#[inline]
#[must_use]
pub const fn widen(byte: u8) -> u16 {
    if byte < 0x80 {
        byte as u16
    } else {
        SUBSTITUTE as u16
    }
}

/// Narrow a single code unit, or `None` if it has no 7-bit representation.
#[inline]
#[must_use]
pub fn narrow(unit: u16) -> Option<u8> {
    u8::try_from(unit).ok().filter(u8::is_ascii)
}

/// Widen `src` into `dst`. Both slices must have the same length.
pub fn widen_into(src: &[u8], dst: &mut [u16]) {
    debug_assert_eq!(src.len(), dst.len());
    for (out, &byte) in dst.iter_mut().zip(src) {
        *out = widen(byte);
    }
}

/// Project `src` into `dst`, substituting `default_char` for units outside
/// the 7-bit range. Both slices must have the same length.
///
/// Returns `true` if at least one substitution happened.
pub fn project_into(src: &[u16], dst: &mut [u8], default_char: u8) -> bool {
    debug_assert_eq!(src.len(), dst.len());
    let mut substituted = false;
    for (out, &unit) in dst.iter_mut().zip(src) {
        *out = narrow(unit).unwrap_or_else(|| {
            substituted = true;
            default_char
        });
    }
    substituted
}
