//! A UTF-16 string accumulator with code-page conversion at its boundary.
//!
//! [`EncodedStringBuffer`] builds a wide (UTF-16) string from fragments that
//! arrive either as bytes in a numbered [`CodePage`] or as wide code units,
//! and exports it again as wide units or as bytes in any code page. A
//! US-ASCII projection is cached and kept in step with every append.
//!
//! ```rust
//! use encbuf::{CodePage, ConversionFlags, EncodedStringBuffer};
//!
//! let mut buf = EncodedStringBuffer::new();
//! buf.append_ascii(b"Hi ");
//! buf.append_bytes(&[0x82, 0xA0], CodePage::SHIFT_JIS, ConversionFlags::empty())
//!     .unwrap();
//!
//! assert_eq!(buf.len(), 4);
//! assert_eq!(buf.as_narrow(), "Hi ?");
//!
//! let (utf8, substituted) = buf
//!     .to_narrow_vec(CodePage::UTF8, ConversionFlags::empty(), None)
//!     .unwrap();
//! assert_eq!(utf8, "Hi あ".as_bytes());
//! assert!(!substituted);
//! ```
//!
//! Diagnostics are emitted through `tracing`; install a subscriber to see
//! them.

#![no_std]
extern crate alloc;

#[cfg(test)]
extern crate std;

#[cfg(feature = "fuzzing")]
pub mod ascii;
#[cfg(not(feature = "fuzzing"))]
mod ascii;

mod buffer;
mod code_page;
mod converter;
mod error;

#[cfg(test)]
mod tests;

pub use buffer::EncodedStringBuffer;
pub use code_page::{CodePage, ConversionFlags};
pub use converter::{Converter, SystemConverter};
pub use error::{ConversionInvariantViolation, Direction};
