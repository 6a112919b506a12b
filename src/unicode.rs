//! Emoji glyph <-> code point helpers.
//!
//! The detector reports its dominant emoji as a JS string, which is either a
//! single UTF-16 unit (e.g. ☺ U+263A) or a surrogate pair (e.g. 🙂 U+1F642).
//! Targets are stored as plain code points so they can be compared directly.

const HIGH_SURROGATE_START: u16 = 0xD800;
const HIGH_SURROGATE_END: u16 = 0xDBFF;
const LOW_SURROGATE_START: u16 = 0xDC00;
const LOW_SURROGATE_END: u16 = 0xDFFF;

/// Convert a glyph made of one or two UTF-16 units into its code point.
/// Returns `None` for empty input or anything longer than one character.
pub fn to_code_point(glyph: &str) -> Option<u32> {
    let mut units = glyph.encode_utf16();
    let first = units.next()?;
    match (units.next(), units.next()) {
        (None, _) => Some(first as u32),
        (Some(second), None) => combine_surrogates(first, second),
        _ => None,
    }
}

/// Combine a high/low surrogate pair into the code point it encodes.
pub fn combine_surrogates(high: u16, low: u16) -> Option<u32> {
    if !(HIGH_SURROGATE_START..=HIGH_SURROGATE_END).contains(&high)
        || !(LOW_SURROGATE_START..=LOW_SURROGATE_END).contains(&low)
    {
        return None;
    }
    Some((high - HIGH_SURROGATE_START) as u32 * 0x400 + (low - LOW_SURROGATE_START) as u32 + 0x10000)
}

/// Glyph for a code point; `None` if it is not a Unicode scalar value.
pub fn glyph(code: u32) -> Option<char> {
    char::from_u32(code)
}
