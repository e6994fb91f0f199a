//! Standard Type 1 font metrics and WinAnsi text encoding.
//!
//! Only the two base-14 fonts the page stream references are described here.
//! Widths are in 1/1000 em, taken from the Adobe Core14 AFM files for the
//! printable ASCII range; the upper WinAnsi half covers the punctuation that
//! survives normalization (bullets, dashes, curly quotes) and falls back to
//! the average lowercase width for accented letters.

use encoding_rs::WINDOWS_1252;

/// Millimetres per PostScript point.
pub const PT_TO_MM: f32 = 25.4 / 72.0;

/// Byte substituted for characters with no WinAnsi code point.
const REPLACEMENT: u8 = b'?';

/// A font the page stream can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

impl Font {
    /// PostScript base font name.
    pub fn base_name(self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Name used in page resource dictionaries.
    pub fn resource_name(self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
        }
    }

    /// Advance width of a WinAnsi byte, in 1/1000 em.
    pub fn glyph_width(self, byte: u8) -> u16 {
        let ascii = match self {
            Font::Helvetica => &HELVETICA_WIDTHS,
            Font::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        };
        match byte {
            32..=126 => ascii[(byte - 32) as usize],
            0x85 | 0x97 => 1000,
            0x91 | 0x92 => match self {
                Font::Helvetica => 222,
                Font::HelveticaBold => 278,
            },
            0x93 | 0x94 => match self {
                Font::Helvetica => 333,
                Font::HelveticaBold => 500,
            },
            0x95 => 350,
            0xA0 => 278,
            _ => 556,
        }
    }
}

/// Encode text into WinAnsi bytes for a simple-font string.
///
/// Tabs become spaces; control characters and anything outside the
/// code page become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    let mut buf = [0u8; 4];
    for c in text.chars() {
        if c == '\t' {
            out.push(b' ');
        } else if c.is_ascii() {
            out.push(if c.is_ascii_control() { REPLACEMENT } else { c as u8 });
        } else {
            let (bytes, _, had_errors) = WINDOWS_1252.encode(c.encode_utf8(&mut buf));
            match (had_errors, bytes.as_ref()) {
                (false, [b]) => out.push(*b),
                _ => out.push(REPLACEMENT),
            }
        }
    }
    out
}

/// Rendered width of `text` in millimetres at `size` points.
pub fn text_width(text: &str, font: Font, size: f32) -> f32 {
    let units: u32 = encode_win_ansi(text)
        .into_iter()
        .map(|b| u32::from(font.glyph_width(b)))
        .sum();
    units as f32 / 1000.0 * size * PT_TO_MM
}

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];
