//! The accumulation buffer.
//!
//! `EncodedStringBuffer` keeps two representations of the same text:
//!
//! - `wide`: the authoritative UTF-16 code units, followed by a NUL
//!   terminator once anything has been appended.
//! - `ascii`: the US-ASCII projection of `wide`, one byte per unit plus a NUL
//!   terminator. It is rebuilt in full after every append, so reads never see
//!   a stale projection and never pay for a conversion.
//!
//! Every append funnels into [`EncodedStringBuffer::append_wide`]. Byte input
//! is decoded into a scratch vector first, so a failed conversion leaves the
//! buffer exactly as it was.

use alloc::{vec, vec::Vec};
use core::{ffi::CStr, fmt};

use bstr::BStr;

use crate::{
    CodePage, ConversionFlags, ConversionInvariantViolation, Converter, Direction,
    SystemConverter, ascii,
};

const WIDE_NUL: &[u16] = &[0];
const NARROW_NUL: &[u8] = &[0];

/// A growable UTF-16 string built from narrow and wide fragments.
///
/// # Examples
///
/// ```rust
/// use encbuf::{CodePage, ConversionFlags, EncodedStringBuffer};
///
/// let mut buf = EncodedStringBuffer::new();
/// buf.append_ascii(b"caf");
/// buf.append_bytes(&[0xE9], CodePage::WINDOWS_1252, ConversionFlags::empty())
///     .unwrap();
///
/// assert_eq!(buf.as_wide(), &[0x63, 0x61, 0x66, 0xE9]);
/// assert_eq!(buf.as_narrow(), "caf?");
/// ```
#[derive(Clone)]
pub struct EncodedStringBuffer<C = SystemConverter> {
    wide: Vec<u16>,
    ascii: Vec<u8>,
    converter: C,
}

impl EncodedStringBuffer {
    /// Creates an empty buffer using the [`SystemConverter`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_converter(SystemConverter)
    }
}

impl Default for EncodedStringBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Converter> EncodedStringBuffer<C> {
    /// Creates an empty buffer that delegates non-ASCII code pages to
    /// `converter`.
    pub fn with_converter(converter: C) -> Self {
        Self {
            wide: Vec::new(),
            ascii: Vec::new(),
            converter,
        }
    }

    /// The converter this buffer delegates to.
    pub fn converter(&self) -> &C {
        &self.converter
    }

    /// Number of UTF-16 code units, not counting the terminator.
    #[must_use]
    pub fn len(&self) -> usize {
        self.wide.len().saturating_sub(1)
    }

    /// Whether nothing has been appended yet (or only empty fragments).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Appends bytes as US-ASCII: bytes below `0x80` widen to the same value,
    /// all others become `'?'`.
    pub fn append_ascii(&mut self, bytes: &[u8]) {
        let mut units = vec![0u16; bytes.len()];
        ascii::widen_into(bytes, &mut units);
        self.append_wide(&units);
    }

    /// Appends a NUL-terminated string as US-ASCII, stopping at the NUL.
    pub fn append_c_str(&mut self, s: &CStr) {
        self.append_ascii(s.to_bytes());
    }

    /// Appends `bytes` decoded under `code_page`.
    ///
    /// [`CodePage::ASCII`] takes the same fast path as
    /// [`append_ascii`](Self::append_ascii) and never fails. Any other code
    /// page is measured, then converted, by the buffer's [`Converter`]. A
    /// measurement of zero (unknown code page, or malformed input under
    /// [`ConversionFlags::ERR_INVALID_CHARS`]) appends nothing.
    ///
    /// # Errors
    ///
    /// Returns [`ConversionInvariantViolation`] if the converter writes a
    /// different number of units than it measured. The buffer is unchanged.
    pub fn append_bytes(
        &mut self,
        bytes: &[u8],
        code_page: CodePage,
        flags: ConversionFlags,
    ) -> Result<(), ConversionInvariantViolation> {
        if code_page.is_fast_path() {
            self.append_ascii(bytes);
            return Ok(());
        }

        let expected = self.converter.measure_wide(bytes, code_page, flags);
        if expected == 0 && !bytes.is_empty() {
            tracing::warn!(
                code_page = code_page.0,
                flags = flags.bits(),
                len = bytes.len(),
                "conversion to wide measured zero units, nothing appended"
            );
        }

        let mut units = vec![0u16; expected];
        let actual = if expected == 0 {
            0
        } else {
            self.converter.to_wide(bytes, code_page, flags, &mut units)
        };

        if actual != expected {
            tracing::error!(
                code_page = code_page.0,
                expected,
                actual,
                "converter wrote a different number of wide units than it measured"
            );
            return Err(ConversionInvariantViolation {
                direction: Direction::ToWide,
                code_page,
                expected,
                actual,
            });
        }

        self.append_wide(&units);
        Ok(())
    }

    /// Appends `count` bytes of `bytes` starting at `offset`, decoded under
    /// `code_page`. See [`append_bytes`](Self::append_bytes).
    ///
    /// # Errors
    ///
    /// As [`append_bytes`](Self::append_bytes).
    ///
    /// # Panics
    ///
    /// Panics if `offset + count` exceeds `bytes.len()`.
    pub fn append_bytes_at(
        &mut self,
        bytes: &[u8],
        offset: usize,
        count: usize,
        code_page: CodePage,
        flags: ConversionFlags,
    ) -> Result<(), ConversionInvariantViolation> {
        self.append_bytes(&bytes[offset..offset + count], code_page, flags)
    }

    /// Appends UTF-16 code units verbatim.
    ///
    /// This is the one primitive every other append reduces to. Units are
    /// copied; unpaired surrogates and embedded NULs are kept as given.
    pub fn append_wide(&mut self, units: &[u16]) {
        let len = self.len();
        let mut wide = Vec::with_capacity(len + units.len() + 1);
        wide.extend_from_slice(&self.wide[..len]);
        wide.extend_from_slice(units);
        wide.push(0);
        self.wide = wide;

        self.regenerate_ascii();
    }

    /// Appends `count` units of `units` starting at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset + count` exceeds `units.len()`.
    pub fn append_wide_at(&mut self, units: &[u16], offset: usize, count: usize) {
        self.append_wide(&units[offset..offset + count]);
    }

    /// Appends units up to, not including, the first NUL. A slice without a
    /// NUL is appended whole.
    pub fn append_wide_terminated(&mut self, units: &[u16]) {
        let end = units.iter().position(|&u| u == 0).unwrap_or(units.len());
        self.append_wide(&units[..end]);
    }

    /// Appends UTF-8 text as UTF-16.
    pub fn append_str(&mut self, s: &str) {
        let units: Vec<u16> = s.encode_utf16().collect();
        self.append_wide(&units);
    }

    fn regenerate_ascii(&mut self) {
        let len = self.len();
        let mut projected = vec![0u8; len + 1];
        ascii::project_into(&self.wide[..len], &mut projected[..len], ascii::SUBSTITUTE);
        self.ascii = projected;
    }

    /// The UTF-16 code units, without the terminator.
    #[must_use]
    pub fn as_wide(&self) -> &[u16] {
        &self.wide[..self.len()]
    }

    /// The UTF-16 code units followed by a NUL terminator.
    #[must_use]
    pub fn as_wide_with_nul(&self) -> &[u16] {
        if self.wide.is_empty() { WIDE_NUL } else { &self.wide }
    }

    /// Copies the code units and a NUL terminator into `dst` and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `dst` is shorter than `len() + 1`.
    pub fn copy_wide_into<'a>(&self, dst: &'a mut [u16]) -> &'a mut [u16] {
        let src = self.as_wide_with_nul();
        dst[..src.len()].copy_from_slice(src);
        dst
    }

    /// The cached US-ASCII projection, without the terminator.
    #[must_use]
    pub fn as_narrow(&self) -> &BStr {
        BStr::new(&self.ascii[..self.len()])
    }

    /// The cached US-ASCII projection followed by a NUL terminator.
    #[must_use]
    pub fn as_narrow_with_nul(&self) -> &[u8] {
        if self.ascii.is_empty() { NARROW_NUL } else { &self.ascii }
    }

    /// Projects the code units to US-ASCII into `dst`, NUL-terminated, and
    /// returns it. Produces the same bytes as
    /// [`as_narrow_with_nul`](Self::as_narrow_with_nul).
    ///
    /// # Panics
    ///
    /// Panics if `dst` is shorter than `len() + 1`.
    pub fn copy_narrow_into<'a>(&self, dst: &'a mut [u8]) -> &'a mut [u8] {
        let len = self.len();
        ascii::project_into(self.as_wide(), &mut dst[..len], ascii::SUBSTITUTE);
        dst[len] = 0;
        dst
    }

    /// Number of bytes [`encode_into`](Self::encode_into) produces under
    /// `code_page`, not counting the terminator.
    ///
    /// On the fast path this is always `len()`. Otherwise it is the
    /// converter's measurement, which is `0` for unsupported code pages;
    /// exporting a non-empty buffer under such a code page fails.
    pub fn narrow_len(
        &self,
        code_page: CodePage,
        flags: ConversionFlags,
        default_char: Option<u8>,
    ) -> usize {
        if code_page.is_fast_path() {
            self.len()
        } else {
            self.converter
                .measure_narrow(self.as_wide(), code_page, flags, default_char)
        }
    }

    /// Encodes the code units under `code_page` into `dst`, NUL-terminated,
    /// and returns it.
    ///
    /// Characters the code page cannot represent become `default_char`, or
    /// `'?'` if none is given. When `used_default` is given it is cleared
    /// first, then set to whether any substitution happened.
    ///
    /// `dst` must hold [`narrow_len`](Self::narrow_len)` + 1` bytes. For
    /// single-byte code pages that is `len() + 1`.
    ///
    /// # Errors
    ///
    /// On any code page other than [`CodePage::ASCII`], returns
    /// [`ConversionInvariantViolation`] if the converter produces a different
    /// number of bytes than it measured. A `dst` too small for the measured
    /// output is reported the same way, since the converter then writes
    /// nothing. A non-empty buffer that the converter measures at zero bytes
    /// (unknown code page, a UTF-16 code page, or unpaired surrogates under
    /// [`ConversionFlags::WC_ERR_INVALID_CHARS`]) is an error too, with
    /// `expected` set to `len() + 1` and `actual` to `0`.
    ///
    /// # Panics
    ///
    /// On the fast path, panics if `dst` is shorter than `len() + 1`.
    pub fn encode_into<'a>(
        &self,
        dst: &'a mut [u8],
        code_page: CodePage,
        flags: ConversionFlags,
        default_char: Option<u8>,
        used_default: Option<&mut bool>,
    ) -> Result<&'a mut [u8], ConversionInvariantViolation> {
        tracing::trace!(
            dst_len = dst.len(),
            code_page = code_page.0,
            flags = flags.bits(),
            default_char = ?default_char,
            wants_used_default = used_default.is_some(),
            "encode_into"
        );

        let len = self.len();

        if code_page.is_fast_path() {
            let substituted = ascii::project_into(
                self.as_wide(),
                &mut dst[..len],
                default_char.unwrap_or(ascii::SUBSTITUTE),
            );
            dst[len] = 0;
            if let Some(flag) = used_default {
                *flag = substituted;
            }
            return Ok(dst);
        }

        let mut used_default = used_default;
        if let Some(flag) = used_default.as_deref_mut() {
            *flag = false;
        }

        let measured = self
            .converter
            .measure_narrow(self.as_wide(), code_page, flags, default_char);
        if measured == 0 && len > 0 {
            // Non-empty text always encodes to at least one byte, so zero
            // means the converter refused it.
            tracing::error!(
                code_page = code_page.0,
                flags = flags.bits(),
                len,
                expected = len + 1,
                actual = 0,
                "conversion to narrow measured zero bytes for non-empty text"
            );
            return Err(ConversionInvariantViolation {
                direction: Direction::ToNarrow,
                code_page,
                expected: len + 1,
                actual: 0,
            });
        }
        let capacity = dst.len().saturating_sub(1);
        let written = self.converter.to_narrow(
            self.as_wide(),
            code_page,
            flags,
            default_char,
            &mut dst[..capacity],
            used_default,
        );

        let expected = measured + 1;
        let actual = match dst.get_mut(written) {
            Some(slot) => {
                *slot = 0;
                written + 1
            }
            None => written,
        };

        if actual != expected {
            let so_far = BStr::new(&dst[..written.min(dst.len())]);
            tracing::error!(
                code_page = code_page.0,
                expected,
                actual,
                dst = %so_far,
                dst_len = dst.len(),
                "converter wrote a different number of bytes than it measured"
            );
            return Err(ConversionInvariantViolation {
                direction: Direction::ToNarrow,
                code_page,
                expected,
                actual,
            });
        }

        Ok(dst)
    }

    /// Encodes the code units under `code_page` into a new vector, without a
    /// terminator. Also returns whether any character was substituted.
    ///
    /// # Errors
    ///
    /// As [`encode_into`](Self::encode_into).
    pub fn to_narrow_vec(
        &self,
        code_page: CodePage,
        flags: ConversionFlags,
        default_char: Option<u8>,
    ) -> Result<(Vec<u8>, bool), ConversionInvariantViolation> {
        let mut out = vec![0u8; self.narrow_len(code_page, flags, default_char) + 1];
        let mut used_default = false;
        self.encode_into(&mut out, code_page, flags, default_char, Some(&mut used_default))?;
        out.pop();
        Ok((out, used_default))
    }
}

impl<C: Converter> fmt::Write for EncodedStringBuffer<C> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append_str(s);
        Ok(())
    }
}

impl<C> fmt::Debug for EncodedStringBuffer<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.wide.len().saturating_sub(1);
        let text: alloc::string::String = char::decode_utf16(self.wide[..len].iter().copied())
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect();
        f.debug_struct("EncodedStringBuffer")
            .field("len", &len)
            .field("text", &text)
            .finish_non_exhaustive()
    }
}
