//! Low-level wire constants and helpers.
//!
//! The actual encode/decode logic lives in `line_codec` and `framing`.

/// Field separator inside an encoded line (ASCII group separator).
///
/// Non-printable, so it is not expected in anything a user types.
pub const SEPARATOR: char = '\x1D';

/// Number of delimiter-separated fields in a line.
pub const FIELD_COUNT: usize = 4;

/// Size of the big-endian length prefix in front of every frame.
pub const FRAME_HEADER_LEN: usize = 2;

/// Largest payload a frame can describe.
pub const MAX_FRAME_LEN: usize = u16::MAX as usize;

/// Is `s` a syntactically valid signed decimal integer?
///
/// Digits only, optionally preceded by a single `-` as long as at least
/// one digit follows it. Range is not checked here.
pub fn is_number(s: &str) -> bool {
    let digits = match s.strip_prefix('-') {
        Some(rest) => rest,
        None => s,
    };
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}
