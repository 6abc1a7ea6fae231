//! Code-page identifiers and conversion flags.
//!
//! Identifiers and flag bits use the numbering of the Windows
//! `MultiByteToWideChar` / `WideCharToMultiByte` family so values can be
//! passed through unchanged when interoperating with that platform.

use core::fmt;

use bitflags::bitflags;

/// Numeric identifier selecting a byte encoding.
///
/// Any value other than [`CodePage::ASCII`] is forwarded verbatim to the
/// buffer's [`Converter`](crate::Converter).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CodePage(pub u32);

impl CodePage {
    /// US-ASCII (7-bit). Reserved: selects the 1:1 widening fast path and is
    /// never handed to a converter.
    pub const ASCII: Self = Self(20127);
    /// UTF-8.
    pub const UTF8: Self = Self(65001);
    /// Western European (Windows).
    pub const WINDOWS_1252: Self = Self(1252);
    /// Japanese (Shift_JIS).
    pub const SHIFT_JIS: Self = Self(932);
    /// Western European (Mac).
    pub const MAC_ROMAN: Self = Self(10000);

    /// Whether this identifier selects the fast path.
    #[must_use]
    pub const fn is_fast_path(self) -> bool {
        self.0 == Self::ASCII.0
    }
}

impl Default for CodePage {
    fn default() -> Self {
        Self::ASCII
    }
}

impl From<u32> for CodePage {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for CodePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CP{}", self.0)
    }
}

bitflags! {
    /// Conversion-mode flags.
    ///
    /// Decode-side and encode-side bits share one set, as they do on the
    /// platform; each conversion direction looks only at the bits that apply
    /// to it. Unknown bits are kept as given.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ConversionFlags: u32 {
        /// `MB_PRECOMPOSED`.
        const PRECOMPOSED = 0x0000_0001;
        /// `MB_COMPOSITE`.
        const COMPOSITE = 0x0000_0002;
        /// `MB_USEGLYPHCHARS`.
        const USE_GLYPH_CHARS = 0x0000_0004;
        /// `MB_ERR_INVALID_CHARS`: fail decoding on malformed input instead
        /// of substituting U+FFFD.
        const ERR_INVALID_CHARS = 0x0000_0008;
        /// `WC_DISCARDNS`.
        const DISCARD_NS = 0x0000_0010;
        /// `WC_SEPCHARS`.
        const SEP_CHARS = 0x0000_0020;
        /// `WC_DEFAULTCHAR`.
        const DEFAULT_CHAR = 0x0000_0040;
        /// `WC_ERR_INVALID_CHARS`: fail encoding on unpaired surrogates.
        const WC_ERR_INVALID_CHARS = 0x0000_0080;
        /// `WC_COMPOSITECHECK`.
        const COMPOSITE_CHECK = 0x0000_0200;
        /// `WC_NO_BEST_FIT_CHARS`.
        const NO_BEST_FIT_CHARS = 0x0000_0400;

        const _ = !0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_path_is_us_ascii() {
        assert!(CodePage::ASCII.is_fast_path());
        assert!(CodePage::default().is_fast_path());
        assert!(!CodePage::UTF8.is_fast_path());
        assert_eq!(CodePage::from(20127), CodePage::ASCII);
    }

    #[test]
    fn flags_keep_platform_bits() {
        assert_eq!(ConversionFlags::ERR_INVALID_CHARS.bits(), 0x8);
        assert_eq!(ConversionFlags::NO_BEST_FIT_CHARS.bits(), 0x400);
        let raw = ConversionFlags::from_bits_retain(0x8000_0008);
        assert!(raw.contains(ConversionFlags::ERR_INVALID_CHARS));
        assert_eq!(raw.bits(), 0x8000_0008);
    }

    #[test]
    fn display_names_the_code_page() {
        assert_eq!(alloc::format!("{}", CodePage::SHIFT_JIS), "CP932");
    }
}
