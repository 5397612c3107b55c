//! Font resources as seen by the text interpreter.
//!
//! A [`FontInfo`] holds what is needed to turn shown strings into Unicode
//! text and to advance the text position: the ToUnicode CMap, the simple
//! encoding, the code width, and glyph widths.

use std::collections::HashMap;

use lopdf::{Dictionary, Document, Object};
use tracing::debug;

use crate::cmap::ToUnicodeCMap;
use crate::encoding::{BaseEncoding, SimpleEncoding};
use crate::objects::{
    get_array, get_dict, get_name, get_resolved, object_to_f64, resolve_object, stream_content,
};

/// Glyph width used when a simple font has no width for a code.
const DEFAULT_SIMPLE_WIDTH: f64 = 500.0;
/// Default /DW for composite fonts.
const DEFAULT_CID_WIDTH: f64 = 1000.0;

/// Decoding and metrics information for one font resource.
#[derive(Debug, Clone)]
pub(crate) struct FontInfo {
    to_unicode: Option<ToUnicodeCMap>,
    encoding: SimpleEncoding,
    /// Composite (Type0) fonts use 2-byte codes.
    composite: bool,
    first_char: u32,
    widths: Vec<f64>,
    cid_widths: HashMap<u32, f64>,
    default_width: f64,
}

impl Default for FontInfo {
    fn default() -> Self {
        Self {
            to_unicode: None,
            encoding: SimpleEncoding::default(),
            composite: false,
            first_char: 0,
            widths: Vec::new(),
            cid_widths: HashMap::new(),
            default_width: DEFAULT_SIMPLE_WIDTH,
        }
    }
}

/// One character code of a shown string.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DecodedGlyph {
    pub text: String,
    /// Horizontal advance in glyph space (thousandths of text space).
    pub width: f64,
    /// Single-byte code 32, which receives word spacing.
    pub is_space: bool,
}

impl FontInfo {
    /// Build from a font dictionary.
    pub(crate) fn load(doc: &Document, font: &Dictionary) -> Self {
        let composite = get_name(doc, font, b"Subtype") == Some(&b"Type0"[..]);

        let to_unicode = get_resolved(doc, font, b"ToUnicode")
            .and_then(|obj| obj.as_stream().ok())
            .and_then(|stream| stream_content(stream).ok())
            .and_then(|bytes| match ToUnicodeCMap::parse(&bytes) {
                Ok(cmap) => Some(cmap),
                Err(e) => {
                    debug!(error = %e, "ignoring malformed ToUnicode CMap");
                    None
                }
            });

        let mut info = FontInfo {
            to_unicode,
            composite,
            ..FontInfo::default()
        };

        if composite {
            info.default_width = DEFAULT_CID_WIDTH;
            if let Some(descendant) = get_array(doc, font, b"DescendantFonts")
                .and_then(|kids| kids.first())
                .and_then(|obj| resolve_object(doc, obj).as_dict().ok())
            {
                if let Some(dw) = get_resolved(doc, descendant, b"DW").and_then(object_to_f64) {
                    info.default_width = dw;
                }
                if let Some(w) = get_array(doc, descendant, b"W") {
                    info.cid_widths = parse_cid_widths(doc, w);
                }
            }
        } else {
            info.encoding = load_simple_encoding(doc, font);
            info.first_char = get_resolved(doc, font, b"FirstChar")
                .and_then(object_to_f64)
                .map_or(0, |v| v as u32);
            if let Some(widths) = get_array(doc, font, b"Widths") {
                info.widths = widths
                    .iter()
                    .map(|w| object_to_f64(resolve_object(doc, w)).unwrap_or(0.0))
                    .collect();
            }
            if let Some(missing) = get_dict(doc, font, b"FontDescriptor")
                .and_then(|fd| get_resolved(doc, fd, b"MissingWidth"))
                .and_then(object_to_f64)
            {
                info.default_width = missing;
            }
        }

        info
    }

    fn code_width(&self) -> usize {
        match self.to_unicode.as_ref().and_then(ToUnicodeCMap::code_width) {
            Some(width) if (1..=2).contains(&width) => width,
            _ if self.composite => 2,
            _ => 1,
        }
    }

    fn glyph_width(&self, code: u32) -> f64 {
        if self.composite {
            return self
                .cid_widths
                .get(&code)
                .copied()
                .unwrap_or(self.default_width);
        }
        code.checked_sub(self.first_char)
            .and_then(|i| self.widths.get(i as usize))
            .copied()
            .unwrap_or(self.default_width)
    }

    fn unicode(&self, code: u32, width: usize) -> String {
        if let Some(mapped) = self.to_unicode.as_ref().and_then(|cmap| cmap.lookup(code)) {
            return mapped.to_string();
        }
        if width == 1 {
            let byte = code as u8;
            let ch = self.encoding.decode(byte).unwrap_or(char::from(byte));
            return ch.to_string();
        }
        char::from_u32(code)
            .filter(|c| !c.is_control())
            .map(String::from)
            .unwrap_or_default()
    }

    /// Split a shown string into character codes and decode each.
    pub(crate) fn decode(&self, bytes: &[u8]) -> Vec<DecodedGlyph> {
        let width = self.code_width();
        bytes
            .chunks(width)
            .map(|chunk| {
                let code = chunk.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b));
                DecodedGlyph {
                    text: self.unicode(code, chunk.len()),
                    width: self.glyph_width(code),
                    is_space: chunk.len() == 1 && code == 32,
                }
            })
            .collect()
    }
}

fn load_simple_encoding(doc: &Document, font: &Dictionary) -> SimpleEncoding {
    match get_resolved(doc, font, b"Encoding") {
        Some(Object::Name(name)) => BaseEncoding::from_name(name)
            .map(SimpleEncoding::from_base)
            .unwrap_or_default(),
        Some(Object::Dictionary(dict)) => {
            let mut encoding = get_name(doc, dict, b"BaseEncoding")
                .and_then(BaseEncoding::from_name)
                .map(SimpleEncoding::from_base)
                .unwrap_or_default();
            if let Some(differences) = get_array(doc, dict, b"Differences") {
                encoding.apply_differences(parse_differences(differences));
            }
            encoding
        }
        _ => SimpleEncoding::default(),
    }
}

/// `[code /name /name ... code /name ...]` into `(code, name)` pairs.
fn parse_differences(array: &[Object]) -> Vec<(u8, &str)> {
    let mut pairs = Vec::new();
    let mut code: Option<u32> = None;
    for item in array {
        match item {
            Object::Integer(n) => code = u32::try_from(*n).ok(),
            Object::Name(name) => {
                if let (Some(c), Ok(name)) = (code, std::str::from_utf8(name)) {
                    if let Ok(byte) = u8::try_from(c) {
                        pairs.push((byte, name));
                    }
                    code = Some(c + 1);
                }
            }
            _ => {}
        }
    }
    pairs
}

/// `/W` array: `c [w1 w2 ...]` and `c_first c_last w` forms.
fn parse_cid_widths(doc: &Document, array: &[Object]) -> HashMap<u32, f64> {
    let mut widths = HashMap::new();
    let items: Vec<&Object> = array.iter().map(|obj| resolve_object(doc, obj)).collect();
    let mut i = 0;
    while i + 1 < items.len() {
        let Some(first) = object_to_f64(items[i]).map(|v| v as u32) else {
            break;
        };
        if let Ok(list) = items[i + 1].as_array() {
            for (offset, w) in list.iter().enumerate() {
                if let Some(w) = object_to_f64(w) {
                    widths.insert(first + offset as u32, w);
                }
            }
            i += 2;
        } else if i + 2 < items.len() {
            let last = object_to_f64(items[i + 1]).map_or(first, |v| v as u32);
            if let Some(w) = object_to_f64(items[i + 2]) {
                for cid in first..=last {
                    widths.insert(cid, w);
                }
            }
            i += 3;
        } else {
            break;
        }
    }
    widths
}
