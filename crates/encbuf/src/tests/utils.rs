use crate::{CodePage, ConversionFlags, Converter, SystemConverter};

/// Converts like [`SystemConverter`] but over-reports every measurement by
/// `extra`, so the buffer sees a conversion that disagrees with its own
/// measurement.
#[derive(Debug, Clone, Copy)]
pub(crate) struct OvermeasuringConverter {
    pub extra: usize,
}

impl Converter for OvermeasuringConverter {
    fn measure_wide(&self, src: &[u8], code_page: CodePage, flags: ConversionFlags) -> usize {
        SystemConverter.measure_wide(src, code_page, flags) + self.extra
    }

    fn to_wide(
        &self,
        src: &[u8],
        code_page: CodePage,
        flags: ConversionFlags,
        dst: &mut [u16],
    ) -> usize {
        SystemConverter.to_wide(src, code_page, flags, dst)
    }

    fn measure_narrow(
        &self,
        src: &[u16],
        code_page: CodePage,
        flags: ConversionFlags,
        default_char: Option<u8>,
    ) -> usize {
        SystemConverter.measure_narrow(src, code_page, flags, default_char) + self.extra
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
        SystemConverter.to_narrow(src, code_page, flags, default_char, dst, used_default)
    }
}

/// Panics if the buffer ever consults it; proves the fast path bypasses the
/// converter.
#[derive(Debug, Clone, Copy)]
pub(crate) struct UnreachableConverter;

impl Converter for UnreachableConverter {
    fn measure_wide(&self, _: &[u8], code_page: CodePage, _: ConversionFlags) -> usize {
        panic!("measure_wide called for {code_page}")
    }

    fn to_wide(&self, _: &[u8], code_page: CodePage, _: ConversionFlags, _: &mut [u16]) -> usize {
        panic!("to_wide called for {code_page}")
    }

    fn measure_narrow(
        &self,
        _: &[u16],
        code_page: CodePage,
        _: ConversionFlags,
        _: Option<u8>,
    ) -> usize {
        panic!("measure_narrow called for {code_page}")
    }

    fn to_narrow(
        &self,
        _: &[u16],
        code_page: CodePage,
        _: ConversionFlags,
        _: Option<u8>,
        _: &mut [u8],
        _: Option<&mut bool>,
    ) -> usize {
        panic!("to_narrow called for {code_page}")
    }
}
