//! Simple-font encodings.
//!
//! Maps single-byte character codes of non-composite fonts to Unicode
//! using a base encoding (WinAnsi, MacRoman or Standard) optionally
//! modified by a `/Differences` array. The WinAnsi and MacRoman tables are
//! built from [`encoding_rs`] code pages.

use std::sync::LazyLock;

use encoding_rs::Encoding;

type CodeTable = [Option<char>; 256];

/// A named base encoding for simple fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseEncoding {
    /// WinAnsiEncoding (Windows code page 1252).
    WinAnsi,
    /// MacRomanEncoding.
    MacRoman,
    /// Adobe StandardEncoding, the default for fonts without /Encoding.
    Standard,
}

impl BaseEncoding {
    /// Parse a PDF encoding name such as `WinAnsiEncoding`.
    pub fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"WinAnsiEncoding" => Some(Self::WinAnsi),
            b"MacRomanEncoding" => Some(Self::MacRoman),
            b"StandardEncoding" => Some(Self::Standard),
            _ => None,
        }
    }

    fn table(self) -> &'static CodeTable {
        match self {
            BaseEncoding::WinAnsi => &*WIN_ANSI,
            BaseEncoding::MacRoman => &*MAC_ROMAN,
            BaseEncoding::Standard => &*STANDARD,
        }
    }
}

static WIN_ANSI: LazyLock<CodeTable> = LazyLock::new(|| code_page_table(encoding_rs::WINDOWS_1252));
static MAC_ROMAN: LazyLock<CodeTable> = LazyLock::new(|| code_page_table(encoding_rs::MACINTOSH));
static STANDARD: LazyLock<CodeTable> = LazyLock::new(standard_table);

fn code_page_table(encoding: &'static Encoding) -> CodeTable {
    let mut table = [None; 256];
    for code in 0x20..=0xFFu8 {
        let (decoded, had_errors) = encoding.decode_without_bom_handling(std::slice::from_ref(&code));
        if !had_errors {
            table[code as usize] = decoded.chars().next().filter(|c| !c.is_control());
        }
    }
    table
}

/// StandardEncoding: ASCII with curly quotes at 0x27/0x60 and its own
/// upper half.
fn standard_table() -> CodeTable {
    let mut table = [None; 256];
    for code in 0x20..=0x7Eu8 {
        table[code as usize] = Some(char::from(code));
    }
    table[0x27] = Some('\u{2019}');
    table[0x60] = Some('\u{2018}');
    for &(code, ch) in STANDARD_UPPER {
        table[code as usize] = Some(ch);
    }
    table
}

static STANDARD_UPPER: &[(u8, char)] = &[
    (0xA1, '\u{00A1}'),
    (0xA2, '\u{00A2}'),
    (0xA3, '\u{00A3}'),
    (0xA4, '\u{2044}'),
    (0xA5, '\u{00A5}'),
    (0xA6, '\u{0192}'),
    (0xA7, '\u{00A7}'),
    (0xA8, '\u{00A4}'),
    (0xA9, '\''),
    (0xAA, '\u{201C}'),
    (0xAB, '\u{00AB}'),
    (0xAC, '\u{2039}'),
    (0xAD, '\u{203A}'),
    (0xAE, '\u{FB01}'),
    (0xAF, '\u{FB02}'),
    (0xB1, '\u{2013}'),
    (0xB2, '\u{2020}'),
    (0xB3, '\u{2021}'),
    (0xB4, '\u{00B7}'),
    (0xB6, '\u{00B6}'),
    (0xB7, '\u{2022}'),
    (0xB8, '\u{201A}'),
    (0xB9, '\u{201E}'),
    (0xBA, '\u{201D}'),
    (0xBB, '\u{00BB}'),
    (0xBC, '\u{2026}'),
    (0xBD, '\u{2030}'),
    (0xBF, '\u{00BF}'),
    (0xC1, '`'),
    (0xC2, '\u{00B4}'),
    (0xC3, '\u{02C6}'),
    (0xC4, '\u{02DC}'),
    (0xC5, '\u{00AF}'),
    (0xC6, '\u{02D8}'),
    (0xC7, '\u{02D9}'),
    (0xC8, '\u{00A8}'),
    (0xCA, '\u{02DA}'),
    (0xCB, '\u{00B8}'),
    (0xCD, '\u{02DD}'),
    (0xCE, '\u{02DB}'),
    (0xCF, '\u{02C7}'),
    (0xD0, '\u{2014}'),
    (0xE1, '\u{00C6}'),
    (0xE3, '\u{00AA}'),
    (0xE8, '\u{0141}'),
    (0xE9, '\u{00D8}'),
    (0xEA, '\u{0152}'),
    (0xEB, '\u{00BA}'),
    (0xF1, '\u{00E6}'),
    (0xF5, '\u{0131}'),
    (0xF8, '\u{0142}'),
    (0xF9, '\u{00F8}'),
    (0xFA, '\u{0153}'),
    (0xFB, '\u{00DF}'),
];

/// A simple-font encoding: a base table with `/Differences` applied.
#[derive(Debug, Clone)]
pub struct SimpleEncoding {
    table: CodeTable,
}

impl Default for SimpleEncoding {
    fn default() -> Self {
        Self::from_base(BaseEncoding::Standard)
    }
}

impl SimpleEncoding {
    pub fn from_base(base: BaseEncoding) -> Self {
        Self {
            table: *base.table(),
        }
    }

    /// Override codes with glyph names from a `/Differences` array.
    ///
    /// Names that do not resolve to a character leave the code unmapped.
    pub fn apply_differences<'a, I>(&mut self, differences: I)
    where
        I: IntoIterator<Item = (u8, &'a str)>,
    {
        for (code, name) in differences {
            self.table[code as usize] = glyph_name_to_char(name);
        }
    }

    pub fn decode(&self, code: u8) -> Option<char> {
        self.table[code as usize]
    }
}

/// Resolve a PDF glyph name to its Unicode character.
///
/// Handles `uniXXXX`, `uXXXX`..`uXXXXXX`, single-character names, suffixed
/// variants such as `a.sc`, and common Adobe glyph names.
pub fn glyph_name_to_char(name: &str) -> Option<char> {
    let name = name.split('.').next().unwrap_or(name);

    if let Some(hex) = name.strip_prefix("uni") {
        if hex.len() >= 4 && hex.len() % 4 == 0 {
            return u32::from_str_radix(&hex[..4], 16).ok().and_then(char::from_u32);
        }
    }
    if let Some(hex) = name.strip_prefix('u') {
        if (4..=6).contains(&hex.len()) && hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return u32::from_str_radix(hex, 16).ok().and_then(char::from_u32);
        }
    }

    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        if c.is_ascii_alphabetic() {
            return Some(c);
        }
    }

    GLYPH_NAMES
        .binary_search_by_key(&name, |&(n, _)| n)
        .ok()
        .map(|i| GLYPH_NAMES[i].1)
}

/// Common Adobe glyph names, sorted for binary search.
static GLYPH_NAMES: &[(&str, char)] = &[
    ("AE", '\u{00C6}'),
    ("Aacute", '\u{00C1}'),
    ("Acircumflex", '\u{00C2}'),
    ("Adieresis", '\u{00C4}'),
    ("Agrave", '\u{00C0}'),
    ("Aring", '\u{00C5}'),
    ("Atilde", '\u{00C3}'),
    ("Cacute", '\u{0106}'),
    ("Ccedilla", '\u{00C7}'),
    ("Ccircumflex", '\u{0108}'),
    ("Eacute", '\u{00C9}'),
    ("Ecedilla", '\u{0228}'),
    ("Ecircumflex", '\u{00CA}'),
    ("Edieresis", '\u{00CB}'),
    ("Egrave", '\u{00C8}'),
    ("Eth", '\u{00D0}'),
    ("Etilde", '\u{1EBC}'),
    ("Euro", '\u{20AC}'),
    ("Iacute", '\u{00CD}'),
    ("Icircumflex", '\u{00CE}'),
    ("Idieresis", '\u{00CF}'),
    ("Igrave", '\u{00CC}'),
    ("Itilde", '\u{0128}'),
    ("Lslash", '\u{0141}'),
    ("Nacute", '\u{0143}'),
    ("Ncedilla", '\u{0145}'),
    ("Ngrave", '\u{01F8}'),
    ("Ntilde", '\u{00D1}'),
    ("OE", '\u{0152}'),
    ("Oacute", '\u{00D3}'),
    ("Ocircumflex", '\u{00D4}'),
    ("Odieresis", '\u{00D6}'),
    ("Ograve", '\u{00D2}'),
    ("Oslash", '\u{00D8}'),
    ("Otilde", '\u{00D5}'),
    ("Scaron", '\u{0160}'),
    ("Thorn", '\u{00DE}'),
    ("Uacute", '\u{00DA}'),
    ("Ucircumflex", '\u{00DB}'),
    ("Udieresis", '\u{00DC}'),
    ("Ugrave", '\u{00D9}'),
    ("Uring", '\u{016E}'),
    ("Utilde", '\u{0168}'),
    ("Yacute", '\u{00DD}'),
    ("Ycircumflex", '\u{0176}'),
    ("Ydieresis", '\u{0178}'),
    ("Ygrave", '\u{1EF2}'),
    ("Ytilde", '\u{1EF8}'),
    ("Zcaron", '\u{017D}'),
    ("aacute", '\u{00E1}'),
    ("acircumflex", '\u{00E2}'),
    ("acute", '\u{00B4}'),
    ("adieresis", '\u{00E4}'),
    ("ae", '\u{00E6}'),
    ("agrave", '\u{00E0}'),
    ("ampersand", '&'),
    ("aring", '\u{00E5}'),
    ("asciicircum", '^'),
    ("asciitilde", '~'),
    ("asterisk", '*'),
    ("at", '@'),
    ("atilde", '\u{00E3}'),
    ("backslash", '\\'),
    ("bar", '|'),
    ("braceleft", '{'),
    ("braceright", '}'),
    ("bracketleft", '['),
    ("bracketright", ']'),
    ("breve", '\u{02D8}'),
    ("brokenbar", '\u{00A6}'),
    ("bullet", '\u{2022}'),
    ("cacute", '\u{0107}'),
    ("caron", '\u{02C7}'),
    ("ccedilla", '\u{00E7}'),
    ("ccircumflex", '\u{0109}'),
    ("cedilla", '\u{00B8}'),
    ("cent", '\u{00A2}'),
    ("circumflex", '\u{02C6}'),
    ("colon", ':'),
    ("comma", ','),
    ("copyright", '\u{00A9}'),
    ("currency", '\u{00A4}'),
    ("dagger", '\u{2020}'),
    ("daggerdbl", '\u{2021}'),
    ("degree", '\u{00B0}'),
    ("dieresis", '\u{00A8}'),
    ("divide", '\u{00F7}'),
    ("dollar", '$'),
    ("dotlessi", '\u{0131}'),
    ("eacute", '\u{00E9}'),
    ("ecedilla", '\u{0229}'),
    ("ecircumflex", '\u{00EA}'),
    ("edieresis", '\u{00EB}'),
    ("egrave", '\u{00E8}'),
    ("eight", '8'),
    ("ellipsis", '\u{2026}'),
    ("emdash", '\u{2014}'),
    ("endash", '\u{2013}'),
    ("equal", '='),
    ("eth", '\u{00F0}'),
    ("etilde", '\u{1EBD}'),
    ("exclam", '!'),
    ("exclamdown", '\u{00A1}'),
    ("ff", '\u{FB00}'),
    ("ffi", '\u{FB03}'),
    ("ffl", '\u{FB04}'),
    ("fi", '\u{FB01}'),
    ("five", '5'),
    ("fl", '\u{FB02}'),
    ("florin", '\u{0192}'),
    ("four", '4'),
    ("fraction", '\u{2044}'),
    ("germandbls", '\u{00DF}'),
    ("grave", '`'),
    ("greater", '>'),
    ("guillemotleft", '\u{00AB}'),
    ("guillemotright", '\u{00BB}'),
    ("guilsinglleft", '\u{2039}'),
    ("guilsinglright", '\u{203A}'),
    ("hyphen", '-'),
    ("iacute", '\u{00ED}'),
    ("icircumflex", '\u{00EE}'),
    ("idieresis", '\u{00EF}'),
    ("igrave", '\u{00EC}'),
    ("itilde", '\u{0129}'),
    ("less", '<'),
    ("logicalnot", '\u{00AC}'),
    ("lslash", '\u{0142}'),
    ("macron", '\u{00AF}'),
    ("minus", '\u{2212}'),
    ("mu", '\u{00B5}'),
    ("multiply", '\u{00D7}'),
    ("nacute", '\u{0144}'),
    ("nbspace", '\u{00A0}'),
    ("ncedilla", '\u{0146}'),
    ("ngrave", '\u{01F9}'),
    ("nine", '9'),
    ("ntilde", '\u{00F1}'),
    ("numbersign", '#'),
    ("oacute", '\u{00F3}'),
    ("ocircumflex", '\u{00F4}'),
    ("odieresis", '\u{00F6}'),
    ("oe", '\u{0153}'),
    ("ograve", '\u{00F2}'),
    ("one", '1'),
    ("onehalf", '\u{00BD}'),
    ("onequarter", '\u{00BC}'),
    ("ordfeminine", '\u{00AA}'),
    ("ordmasculine", '\u{00BA}'),
    ("oslash", '\u{00F8}'),
    ("otilde", '\u{00F5}'),
    ("paragraph", '\u{00B6}'),
    ("parenleft", '('),
    ("parenright", ')'),
    ("percent", '%'),
    ("period", '.'),
    ("periodcentered", '\u{00B7}'),
    ("perthousand", '\u{2030}'),
    ("plus", '+'),
    ("plusminus", '\u{00B1}'),
    ("question", '?'),
    ("questiondown", '\u{00BF}'),
    ("quotedbl", '"'),
    ("quotedblbase", '\u{201E}'),
    ("quotedblleft", '\u{201C}'),
    ("quotedblright", '\u{201D}'),
    ("quoteleft", '\u{2018}'),
    ("quoteright", '\u{2019}'),
    ("quotesinglbase", '\u{201A}'),
    ("quotesingle", '\''),
    ("registered", '\u{00AE}'),
    ("ring", '\u{02DA}'),
    ("scaron", '\u{0161}'),
    ("section", '\u{00A7}'),
    ("semicolon", ';'),
    ("seven", '7'),
    ("six", '6'),
    ("slash", '/'),
    ("space", ' '),
    ("sterling", '\u{00A3}'),
    ("thorn", '\u{00FE}'),
    ("three", '3'),
    ("threequarters", '\u{00BE}'),
    ("tilde", '\u{02DC}'),
    ("trademark", '\u{2122}'),
    ("two", '2'),
    ("uacute", '\u{00FA}'),
    ("ucircumflex", '\u{00FB}'),
    ("udieresis", '\u{00FC}'),
    ("ugrave", '\u{00F9}'),
    ("underscore", '_'),
    ("uring", '\u{016F}'),
    ("utilde", '\u{0169}'),
    ("yacute", '\u{00FD}'),
    ("ycircumflex", '\u{0177}'),
    ("ydieresis", '\u{00FF}'),
    ("yen", '\u{00A5}'),
    ("ygrave", '\u{1EF3}'),
    ("ytilde", '\u{1EF9}'),
    ("zcaron", '\u{017E}'),
    ("zero", '0'),];
