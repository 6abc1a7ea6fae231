//! The encoding-conversion capability the buffer delegates to.
//!
//! A [`Converter`] follows the measure-then-convert protocol of the Windows
//! conversion functions: the caller first asks how many units a conversion
//! will produce, allocates exactly that much, then converts. Both calls
//! report counts, and the buffer checks that they agree instead of trusting
//! either one.
//!
//! A count of `0` for non-empty input means the conversion is unsupported or
//! was rejected (for example under
//! [`ConversionFlags::ERR_INVALID_CHARS`]).

mod system;

pub use system::SystemConverter;

use crate::{CodePage, ConversionFlags};

/// Narrow ↔ wide conversion under numeric code pages.
pub trait Converter {
    /// Number of wide units `src` decodes to under `code_page`.
    fn measure_wide(&self, src: &[u8], code_page: CodePage, flags: ConversionFlags) -> usize;

    /// Decode `src` into `dst` and return the number of units written.
    ///
    /// Returns `0` if the conversion fails or `dst` is too small.
    fn to_wide(
        &self,
        src: &[u8],
        code_page: CodePage,
        flags: ConversionFlags,
        dst: &mut [u16],
    ) -> usize;

    /// Number of bytes `src` encodes to under `code_page`, with
    /// `default_char` standing in for unmappable characters.
    fn measure_narrow(
        &self,
        src: &[u16],
        code_page: CodePage,
        flags: ConversionFlags,
        default_char: Option<u8>,
    ) -> usize;

    /// Encode `src` into `dst` and return the number of bytes written.
    ///
    /// Unmappable characters become `default_char` (or `b'?'`). When
    /// `used_default` is given it is set to whether that happened. Returns
    /// `0` if the conversion fails or `dst` is too small.
    fn to_narrow(
        &self,
        src: &[u16],
        code_page: CodePage,
        flags: ConversionFlags,
        default_char: Option<u8>,
        dst: &mut [u8],
        used_default: Option<&mut bool>,
    ) -> usize;
}

impl<C: Converter + ?Sized> Converter for &C {
    fn measure_wide(&self, src: &[u8], code_page: CodePage, flags: ConversionFlags) -> usize {
        (**self).measure_wide(src, code_page, flags)
    }

    fn to_wide(
        &self,
        src: &[u8],
        code_page: CodePage,
        flags: ConversionFlags,
        dst: &mut [u16],
    ) -> usize {
        (**self).to_wide(src, code_page, flags, dst)
    }

    fn measure_narrow(
        &self,
        src: &[u16],
        code_page: CodePage,
        flags: ConversionFlags,
        default_char: Option<u8>,
    ) -> usize {
        (**self).measure_narrow(src, code_page, flags, default_char)
    }

    fn to_narrow(
        &self,
        src: &[u16],
        code_page: CodePage,
        flags: ConversionFlags,
        default_char: Option<u8>,
        dst: &mut [u8],
        used_default: Option<&mut bool>,
    ) -> usize {
        (**self).to_narrow(src, code_page, flags, default_char, dst, used_default)
    }
}
