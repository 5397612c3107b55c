//! ToUnicode CMap parser for mapping character codes to Unicode strings.
//!
//! Parses CMap data embedded in PDF `/ToUnicode` streams. Supports
//! `begincodespacerange`, `beginbfchar` and `beginbfrange` sections with
//! UTF-16BE encoded destination values.

use std::collections::HashMap;

use crate::error::BackendError;

/// A parsed ToUnicode CMap.
#[derive(Debug, Clone, Default)]
pub struct ToUnicodeCMap {
    mappings: HashMap<u32, String>,
    /// Byte width of codes, from the first codespace range (if any).
    code_width: Option<usize>,
}

impl ToUnicodeCMap {
    /// Parse a ToUnicode CMap from its raw byte content.
    pub fn parse(data: &[u8]) -> Result<Self, BackendError> {
        let text = String::from_utf8_lossy(data);
        let mut cmap = ToUnicodeCMap::default();

        for section in sections(&text, "begincodespacerange", "endcodespacerange") {
            if let Some(low) = hex_tokens(section).first() {
                cmap.code_width.get_or_insert(low.len().div_ceil(2));
            }
        }
        for section in sections(&text, "beginbfchar", "endbfchar") {
            parse_bfchar_section(section, &mut cmap.mappings)?;
        }
        for section in sections(&text, "beginbfrange", "endbfrange") {
            parse_bfrange_section(section, &mut cmap.mappings)?;
        }

        Ok(cmap)
    }

    /// Look up the Unicode string for a character code.
    pub fn lookup(&self, code: u32) -> Option<&str> {
        self.mappings.get(&code).map(String::as_str)
    }

    /// Code width declared by the codespace range, in bytes.
    pub fn code_width(&self) -> Option<usize> {
        self.code_width
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

/// Iterate the bodies of all `begin ... end` sections.
fn sections<'a>(text: &'a str, begin: &'a str, end: &'a str) -> impl Iterator<Item = &'a str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        let start = rest.find(begin)? + begin.len();
        let len = rest[start..].find(end)?;
        let body = &rest[start..start + len];
        rest = &rest[start + len + end.len()..];
        Some(body)
    })
}

/// Extract all `<hex>` tokens, with whitespace inside a token removed.
fn hex_tokens(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find('<') {
        let Some(end) = rest[start + 1..].find('>') else {
            break;
        };
        let hex: String = rest[start + 1..start + 1 + end]
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        tokens.push(hex);
        rest = &rest[start + 1 + end + 1..];
    }
    tokens
}

fn parse_hex_code(hex: &str) -> Result<u32, BackendError> {
    u32::from_str_radix(hex, 16)
        .map_err(|e| BackendError::Font(format!("invalid CMap code '{hex}': {e}")))
}

/// Hex digits to UTF-16BE code units. Two-digit values are single-byte
/// codes and are widened to one code unit.
fn hex_to_units(hex: &str) -> Result<Vec<u16>, BackendError> {
    if hex.len() == 2 {
        return Ok(vec![parse_hex_code(hex)? as u16]);
    }
    if hex.len() % 4 != 0 {
        return Err(BackendError::Font(format!(
            "UTF-16BE value must have a multiple of 4 hex digits, got '{hex}'"
        )));
    }
    hex.as_bytes()
        .chunks(4)
        .map(|chunk| {
            let digits = std::str::from_utf8(chunk)
                .map_err(|e| BackendError::Font(format!("invalid hex in CMap: {e}")))?;
            u16::from_str_radix(digits, 16)
                .map_err(|e| BackendError::Font(format!("invalid hex '{digits}': {e}")))
        })
        .collect()
}

fn units_to_string(units: &[u16]) -> String {
    String::from_utf16_lossy(units)
}

/// `<src> <dst>` pairs.
fn parse_bfchar_section(
    section: &str,
    mappings: &mut HashMap<u32, String>,
) -> Result<(), BackendError> {
    let tokens = hex_tokens(section);
    for pair in tokens.chunks_exact(2) {
        let code = parse_hex_code(&pair[0])?;
        let units = hex_to_units(&pair[1])?;
        mappings.insert(code, units_to_string(&units));
    }
    Ok(())
}

/// `<lo> <hi> <dst>` or `<lo> <hi> [<dst0> <dst1> ...]` entries.
///
/// In the first form the last code unit of `dst` is incremented across
/// the range.
fn parse_bfrange_section(
    section: &str,
    mappings: &mut HashMap<u32, String>,
) -> Result<(), BackendError> {
    let mut rest = section.trim_start();
    while !rest.is_empty() {
        let (lo_hi, after) = take_hex_tokens(rest, 2);
        if lo_hi.len() < 2 {
            break;
        }
        let lo = parse_hex_code(&lo_hi[0])?;
        let hi = parse_hex_code(&lo_hi[1])?;
        if hi < lo {
            return Err(BackendError::Font(format!(
                "bfrange high code {hi:#x} below low code {lo:#x}"
            )));
        }
        let after = after.trim_start();

        if let Some(array_body) = after.strip_prefix('[') {
            let close = array_body.find(']').unwrap_or(array_body.len());
            for (offset, dst) in hex_tokens(&array_body[..close]).iter().enumerate() {
                let code = lo + offset as u32;
                if code > hi {
                    break;
                }
                mappings.insert(code, units_to_string(&hex_to_units(dst)?));
            }
            rest = array_body.get(close + 1..).unwrap_or("").trim_start();
        } else {
            let (dst, after_dst) = take_hex_tokens(after, 1);
            let Some(dst) = dst.first() else {
                break;
            };
            let base = hex_to_units(dst)?;
            for offset in 0..=(hi - lo) {
                let mut units = base.clone();
                if let Some(last) = units.last_mut() {
                    *last = last.wrapping_add(offset as u16);
                }
                mappings.insert(lo + offset, units_to_string(&units));
            }
            rest = after_dst.trim_start();
        }
    }
    Ok(())
}

/// Take up to `n` leading `<hex>` tokens, returning them and the remainder.
fn take_hex_tokens(text: &str, n: usize) -> (Vec<String>, &str) {
    let mut tokens = Vec::with_capacity(n);
    let mut rest = text;
    while tokens.len() < n {
        let trimmed = rest.trim_start();
        let Some(body) = trimmed.strip_prefix('<') else {
            break;
        };
        let Some(end) = body.find('>') else {
            break;
        };
        tokens.push(body[..end].chars().filter(|c| !c.is_whitespace()).collect());
        rest = &body[end + 1..];
    }
    (tokens, rest)
}
