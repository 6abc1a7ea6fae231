use alloc::{vec, vec::Vec};

use encoding_rs::{CoderResult, DecoderResult, EncoderResult, Encoding};

use super::Converter;
use crate::{CodePage, ConversionFlags, ascii};

/// Default [`Converter`], backed by `encoding_rs`.
///
/// Code pages are resolved through the `codepage` crate's Windows table.
/// Decoding substitutes U+FFFD for malformed input, encoding substitutes the
/// default character for unmappable characters; both fail instead when the
/// matching strict flag is set. The UTF-16 code pages decode but do not
/// encode, matching the platform, which has no narrow form for them.
///
/// [`CodePage::ASCII`] is handled here as well, for callers that use the
/// converter directly. [`EncodedStringBuffer`](crate::EncodedStringBuffer)
/// never routes that code page through a converter.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemConverter;

impl SystemConverter {
    /// Resolve a code page, or `None` if it has no known encoding.
    #[must_use]
    pub fn encoding(code_page: CodePage) -> Option<&'static Encoding> {
        let number = u16::try_from(code_page.0).ok()?;
        codepage::to_encoding(number)
    }

    fn decode(src: &[u8], code_page: CodePage, flags: ConversionFlags) -> Option<Vec<u16>> {
        if code_page.is_fast_path() {
            return Some(src.iter().copied().map(ascii::widen).collect());
        }

        let encoding = Self::encoding(code_page)?;
        let mut decoder = encoding.new_decoder_without_bom_handling();
        let mut out = vec![0u16; decoder.max_utf16_buffer_length(src.len())?];

        let written = if flags.contains(ConversionFlags::ERR_INVALID_CHARS) {
            let (result, _, written) =
                decoder.decode_to_utf16_without_replacement(src, &mut out, true);
            if !matches!(result, DecoderResult::InputEmpty) {
                return None;
            }
            written
        } else {
            let (result, _, written, _) = decoder.decode_to_utf16(src, &mut out, true);
            if !matches!(result, CoderResult::InputEmpty) {
                return None;
            }
            written
        };

        out.truncate(written);
        Some(out)
    }

    fn encode(
        src: &[u16],
        code_page: CodePage,
        flags: ConversionFlags,
        default_char: Option<u8>,
    ) -> Option<(Vec<u8>, bool)> {
        let substitute = default_char.unwrap_or(ascii::SUBSTITUTE);

        if code_page.is_fast_path() {
            let mut out = vec![0u8; src.len()];
            let used_default = ascii::project_into(src, &mut out, substitute);
            return Some((out, used_default));
        }

        let encoding = Self::encoding(code_page)?;
        if encoding.output_encoding() != encoding {
            return None;
        }
        if flags.contains(ConversionFlags::WC_ERR_INVALID_CHARS)
            && char::decode_utf16(src.iter().copied()).any(|c| c.is_err())
        {
            return None;
        }

        let mut encoder = encoding.new_encoder();
        let capacity = encoder
            .max_buffer_length_from_utf16_without_replacement(src.len())
            .unwrap_or(src.len());
        let mut out = vec![0u8; capacity.max(1)];
        let mut read = 0;
        let mut written = 0;
        let mut used_default = false;

        loop {
            let (result, r, w) =
                encoder.encode_from_utf16_without_replacement(&src[read..], &mut out[written..], true);
            read += r;
            written += w;
            match result {
                EncoderResult::InputEmpty => break,
                EncoderResult::OutputFull => out.resize(out.len() * 2, 0),
                EncoderResult::Unmappable(_) => {
                    if written == out.len() {
                        out.resize(out.len() * 2, 0);
                    }
                    out[written] = substitute;
                    written += 1;
                    used_default = true;
                }
            }
        }

        out.truncate(written);
        Some((out, used_default))
    }
}

// Measuring runs the whole conversion and discards the output, so a
// measure-then-convert call pair decodes (or encodes) twice.
impl Converter for SystemConverter {
    fn measure_wide(&self, src: &[u8], code_page: CodePage, flags: ConversionFlags) -> usize {
        Self::decode(src, code_page, flags).map_or(0, |units| units.len())
    }

    fn to_wide(
        &self,
        src: &[u8],
        code_page: CodePage,
        flags: ConversionFlags,
        dst: &mut [u16],
    ) -> usize {
        let Some(units) = Self::decode(src, code_page, flags) else {
            return 0;
        };
        let Some(slot) = dst.get_mut(..units.len()) else {
            return 0;
        };
        slot.copy_from_slice(&units);
        units.len()
    }

    fn measure_narrow(
        &self,
        src: &[u16],
        code_page: CodePage,
        flags: ConversionFlags,
        default_char: Option<u8>,
    ) -> usize {
        Self::encode(src, code_page, flags, default_char).map_or(0, |(bytes, _)| bytes.len())
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
        let Some((bytes, substituted)) = Self::encode(src, code_page, flags, default_char) else {
            return 0;
        };
        let Some(slot) = dst.get_mut(..bytes.len()) else {
            return 0;
        };
        slot.copy_from_slice(&bytes);
        if let Some(flag) = used_default {
            *flag = substituted;
        }
        bytes.len()
    }
}
