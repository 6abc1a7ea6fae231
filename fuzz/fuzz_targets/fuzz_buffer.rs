#![no_main]

use arbitrary::Arbitrary;
use encbuf::{CodePage, ConversionFlags, EncodedStringBuffer, ascii};
use libfuzzer_sys::fuzz_target;

const CODE_PAGES: &[CodePage] = &[
    CodePage::ASCII,
    CodePage::UTF8,
    CodePage::WINDOWS_1252,
    CodePage::SHIFT_JIS,
    CodePage::MAC_ROMAN,
    CodePage(936),
    CodePage(1200),
    CodePage(12345),
];

#[derive(Debug, Arbitrary)]
enum Op {
    Bytes { data: Vec<u8>, code_page: u8, strict: bool },
    Wide(Vec<u16>),
    Export { code_page: u8, default_char: Option<u8> },
}

fn code_page(index: u8) -> CodePage {
    CODE_PAGES[usize::from(index) % CODE_PAGES.len()]
}

fn check_cache(buf: &EncodedStringBuffer) {
    let wide = buf.as_wide();
    let mut expected = vec![0u8; wide.len()];
    ascii::project_into(wide, &mut expected, ascii::SUBSTITUTE);
    assert_eq!(buf.as_narrow(), expected.as_slice());
    assert_eq!(buf.as_narrow_with_nul().len(), buf.len() + 1);
    assert_eq!(buf.as_wide_with_nul().len(), buf.len() + 1);
}

fn run(ops: Vec<Op>) {
    let mut buf = EncodedStringBuffer::new();

    for op in ops {
        match op {
            Op::Bytes { data, code_page: index, strict } => {
                let cp = code_page(index);
                let flags = if strict {
                    ConversionFlags::ERR_INVALID_CHARS
                } else {
                    ConversionFlags::empty()
                };
                let before = buf.len();
                buf.append_bytes(&data, cp, flags)
                    .expect("system converter agrees with itself");
                if cp.is_fast_path() {
                    assert_eq!(buf.len(), before + data.len());
                }
            }
            Op::Wide(units) => {
                let before = buf.len();
                buf.append_wide(&units);
                assert_eq!(buf.len(), before + units.len());
            }
            Op::Export { code_page: index, default_char } => {
                let cp = code_page(index);
                let flags = ConversionFlags::empty();
                let needed = buf.narrow_len(cp, flags, default_char);
                let mut dst = vec![0xAAu8; needed + 1];
                let refused = needed == 0 && !buf.is_empty();
                match buf.encode_into(&mut dst, cp, flags, default_char, None) {
                    Ok(_) => {
                        assert!(!refused);
                        assert_eq!(dst[needed], 0);
                    }
                    Err(err) => {
                        assert!(refused, "{err}");
                        assert_eq!(err.expected, buf.len() + 1);
                    }
                }
            }
        }
        check_cache(&buf);
    }
}

fuzz_target!(|ops: Vec<Op>| run(ops));
