//! Glyph widths for the standard Helvetica faces and text encoding.
//!
//! Standard fonts are not embedded, so their advance widths have to be known up
//! front to right-align and centre text. Only printable ASCII is ever drawn; it is
//! identical in WinAnsiEncoding.

/// First and last character codes with known widths.
pub const FIRST_CHAR: u8 = 32;
pub const LAST_CHAR: u8 = 126;

/// Helvetica (and Helvetica-Oblique) advance widths for codes 32..=126, in
/// thousandths of an em.
pub const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

/// Encode text as single-byte character codes, replacing anything outside
/// printable ASCII with `?`.
pub fn encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match u8::try_from(c) {
            Ok(b) if (FIRST_CHAR..=LAST_CHAR).contains(&b) => b,
            _ => b'?',
        })
        .collect()
}

/// Index into a width table for an already-encoded byte.
pub fn width_index(code: u8) -> usize {
    (code.clamp(FIRST_CHAR, LAST_CHAR) - FIRST_CHAR) as usize
}
