//! Character mapping from Windows-1252 text to the display's escape tokens.
//!
//! The display firmware only renders 7-bit ASCII directly. Everything in the
//! upper half of the Windows-1252 code page (0x80-0xFF) is addressed with a
//! `<Uxx>` token whose hex number is the byte value minus 0x80, so `€` (0x80)
//! becomes `<U0>` and `ÿ` (0xFF) becomes `<U7F>`.
//!
//! Mapping is a single pass keyed by source character, so a token that has
//! already been emitted is never looked at again.

/// Replacement emitted for characters the display cannot show at all.
pub const UNMAPPED: char = '?';

/// The firmware's character table, ordered by Windows-1252 byte value.
///
/// The five bytes Windows-1252 leaves undefined (0x81, 0x8D, 0x8F, 0x90,
/// 0x9D) are keyed by the C1 control characters they decode to.
pub static CHARACTER_MAP: [(char, &str); 128] = [
    ('€', "<U0>"), ('\u{81}', "<U1>"), ('‚', "<U2>"), ('ƒ', "<U3>"),
    ('„', "<U4>"), ('…', "<U5>"), ('†', "<U6>"), ('‡', "<U7>"),
    ('ˆ', "<U8>"), ('‰', "<U9>"), ('Š', "<UA>"), ('‹', "<UB>"),
    ('Œ', "<UC>"), ('\u{8D}', "<UD>"), ('Ž', "<UE>"), ('\u{8F}', "<UF>"),
    ('\u{90}', "<U10>"), ('‘', "<U11>"), ('’', "<U12>"), ('“', "<U13>"),
    ('”', "<U14>"), ('•', "<U15>"), ('–', "<U16>"), ('—', "<U17>"),
    ('˜', "<U18>"), ('™', "<U19>"), ('š', "<U1A>"), ('›', "<U1B>"),
    ('œ', "<U1C>"), ('\u{9D}', "<U1D>"), ('ž', "<U1E>"), ('Ÿ', "<U1F>"),
    ('\u{A0}', "<U20>"), ('¡', "<U21>"), ('¢', "<U22>"), ('£', "<U23>"),
    ('¤', "<U24>"), ('¥', "<U25>"), ('¦', "<U26>"), ('§', "<U27>"),
    ('¨', "<U28>"), ('©', "<U29>"), ('ª', "<U2A>"), ('«', "<U2B>"),
    ('¬', "<U2C>"), ('\u{AD}', "<U2D>"), ('®', "<U2E>"), ('¯', "<U2F>"),
    ('°', "<U30>"), ('±', "<U31>"), ('²', "<U32>"), ('³', "<U33>"),
    ('´', "<U34>"), ('µ', "<U35>"), ('¶', "<U36>"), ('·', "<U37>"),
    ('¸', "<U38>"), ('¹', "<U39>"), ('º', "<U3A>"), ('»', "<U3B>"),
    ('¼', "<U3C>"), ('½', "<U3D>"), ('¾', "<U3E>"), ('¿', "<U3F>"),
    ('À', "<U40>"), ('Á', "<U41>"), ('Â', "<U42>"), ('Ã', "<U43>"),
    ('Ä', "<U44>"), ('Å', "<U45>"), ('Æ', "<U46>"), ('Ç', "<U47>"),
    ('È', "<U48>"), ('É', "<U49>"), ('Ê', "<U4A>"), ('Ë', "<U4B>"),
    ('Ì', "<U4C>"), ('Í', "<U4D>"), ('Î', "<U4E>"), ('Ï', "<U4F>"),
    ('Ð', "<U50>"), ('Ñ', "<U51>"), ('Ò', "<U52>"), ('Ó', "<U53>"),
    ('Ô', "<U54>"), ('Õ', "<U55>"), ('Ö', "<U56>"), ('×', "<U57>"),
    ('Ø', "<U58>"), ('Ù', "<U59>"), ('Ú', "<U5A>"), ('Û', "<U5B>"),
    ('Ü', "<U5C>"), ('Ý', "<U5D>"), ('Þ', "<U5E>"), ('ß', "<U5F>"),
    ('à', "<U60>"), ('á', "<U61>"), ('â', "<U62>"), ('ã', "<U63>"),
    ('ä', "<U64>"), ('å', "<U65>"), ('æ', "<U66>"), ('ç', "<U67>"),
    ('è', "<U68>"), ('é', "<U69>"), ('ê', "<U6A>"), ('ë', "<U6B>"),
    ('ì', "<U6C>"), ('í', "<U6D>"), ('î', "<U6E>"), ('ï', "<U6F>"),
    ('ð', "<U70>"), ('ñ', "<U71>"), ('ò', "<U72>"), ('ó', "<U73>"),
    ('ô', "<U74>"), ('õ', "<U75>"), ('ö', "<U76>"), ('÷', "<U77>"),
    ('ø', "<U78>"), ('ù', "<U79>"), ('ú', "<U7A>"), ('û', "<U7B>"),
    ('ü', "<U7C>"), ('ý', "<U7D>"), ('þ', "<U7E>"), ('ÿ', "<U7F>"),
];

/// Iterate the table in code page order.
pub fn entries() -> impl Iterator<Item = (char, &'static str)> {
    CHARACTER_MAP.iter().copied()
}

/// Index of `c` in the table, i.e. its Windows-1252 byte minus 0x80.
pub fn table_index(c: char) -> Option<usize> {
    match c as u32 {
        // Latin-1 supplement lines up with the code page byte for byte.
        cp @ 0xA0..=0xFF => Some(cp as usize - 0x80),
        _ => CHARACTER_MAP[..0x20].iter().position(|&(ch, _)| ch == c),
    }
}

/// Windows-1252 byte value of `c`, if it lives in the upper half.
pub fn code_point(c: char) -> Option<u8> {
    table_index(c).map(|idx| 0x80 + idx as u8)
}

/// Escape token for `c`, if the display has a glyph for it.
pub fn token_for(c: char) -> Option<&'static str> {
    table_index(c).map(|idx| CHARACTER_MAP[idx].1)
}

/// Replace every character outside ASCII with its display token.
///
/// ASCII passes through untouched, including control tags such as `<L1>`.
/// Characters that are neither ASCII nor in the table become [`UNMAPPED`],
/// so the result is always pure ASCII.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii() {
            out.push(c);
            continue;
        }
        match token_for(c) {
            Some(token) => out.push_str(token),
            None => out.push(UNMAPPED),
        }
    }
    out
}

/// True when `text` can go on the wire as is.
pub fn is_wire_safe(text: &str) -> bool {
    text.is_ascii()
}
