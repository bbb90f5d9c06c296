//! Pure helpers over operand text.
//!
//! Operands are plain strings throughout the engine: literals straight from
//! the source and values substituted from the symbol table go through the
//! same tests.

use mos6510::AddressingMode;

use crate::error::Error;

/// Longest label or variable name.
pub const NAME_MAX: usize = 20;

/// Literal shape of an addressing mode: prefix, hex digit count, suffix.
pub fn form(mode: AddressingMode) -> Option<(&'static str, usize, &'static str)> {
    use AddressingMode::*;
    match mode {
        Implied | Accumulator => None,
        Immediate => Some(("#$", 2, "")),
        AbsoluteX => Some(("$", 4, ",X")),
        AbsoluteY => Some(("$", 4, ",Y")),
        Absolute => Some(("$", 4, "")),
        ZeroPageX => Some(("$", 2, ",X")),
        ZeroPageY => Some(("$", 2, ",Y")),
        ZeroPage | Relative => Some(("$", 2, "")),
        IndirectIndexedY => Some(("($", 2, "),Y")),
        Indirect => Some(("($", 4, ")")),
        IndexedIndirectX => Some(("($", 2, ",X)")),
    }
}

/// Length of the literal `prefix` + `digits` hex digits + `suffix` at the start of `s`.
pub fn literal(s: &str, prefix: &str, digits: usize, suffix: &str) -> Option<usize> {
    let rest = s.strip_prefix(prefix)?;
    let hex = rest.get(..digits)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    rest[digits..].strip_prefix(suffix)?;
    Some(prefix.len() + digits + suffix.len())
}

/// Length of a `[a-zA-Z0-9]{1,20}` run at the start of `s`.
pub fn name_len(s: &str) -> Option<usize> {
    let len = s
        .chars()
        .take(NAME_MAX)
        .take_while(|c| c.is_ascii_alphanumeric())
        .count();
    (len > 0).then_some(len)
}

pub fn matches_addressing_mode(token: &str, mode: AddressingMode) -> bool {
    match mode {
        AddressingMode::Implied => false,
        AddressingMode::Accumulator => token == "A",
        _ => match form(mode) {
            Some((prefix, digits, suffix)) => {
                literal(token, prefix, digits, suffix) == Some(token.len())
            }
            None => false,
        },
    }
}

// ----------------------------------------------------------------------------
// Literals

pub fn is_byte(s: &str) -> bool {
    literal(s, "$", 2, "") == Some(s.len())
}

pub fn is_word(s: &str) -> bool {
    literal(s, "$", 4, "") == Some(s.len())
}

fn hex_after_dollar(s: &str, digits: usize) -> Option<u16> {
    let start = s.find('$')? + 1;
    let hex = s.get(start..start + digits)?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(hex, 16).ok()
}

/// First `$xx` in `s`, wherever it sits (`#$10`, `($FB),Y` ...).
pub fn parse_byte(s: &str) -> Option<u8> {
    hex_after_dollar(s, 2).map(|v| v as u8)
}

/// First `$xxxx` in `s` as it is laid out in 6502 memory.
pub fn parse_word_little_endian(s: &str) -> Option<[u8; 2]> {
    hex_after_dollar(s, 4).map(u16::to_le_bytes)
}

/// First `$xxxx` in `s` in display order, as `.word` stores it.
pub fn parse_word_big_endian(s: &str) -> Option<[u8; 2]> {
    hex_after_dollar(s, 4).map(u16::to_be_bytes)
}

pub fn word_to_int(s: &str) -> Option<u16> {
    if is_word(s) {
        u16::from_str_radix(&s[1..], 16).ok()
    } else {
        None
    }
}

pub fn format_byte(value: u8) -> String {
    format!("${:02X}", value)
}

pub fn format_word(value: u16) -> String {
    format!("${:04X}", value)
}

pub fn format_immediate(value: u8) -> String {
    format!("#${:02X}", value)
}

// ----------------------------------------------------------------------------
// References

/// `name`, `<name` or `>name`.
pub fn is_label_reference(s: &str) -> bool {
    let body = s.strip_prefix(['<', '>']).unwrap_or(s);
    name_len(body) == Some(body.len())
}

pub fn is_high_low_byte_extract(s: &str) -> bool {
    s.starts_with('<') || s.starts_with('>')
}

pub fn strip_high_low(s: &str) -> &str {
    s.strip_prefix(['<', '>']).unwrap_or(s)
}

/// Low byte for `<label`, high byte for `>label`.
pub fn extract_high_low_byte(label: &str, word: &str) -> Option<u8> {
    let [lo, hi] = parse_word_little_endian(word)?;
    match label.chars().next() {
        Some('<') => Some(lo),
        Some('>') => Some(hi),
        _ => None,
    }
}

// ----------------------------------------------------------------------------
// Branches

/// Displacement from the byte after a 2-byte branch at `current` to `target`,
/// as the two's-complement byte the CPU expects.
pub fn relative_offset(current: u16, target: u16) -> Result<u8, Error> {
    let offset = target as i32 - (current as i32 + 2);
    if !(-128..=127).contains(&offset) {
        return Err(Error::RelativeOffsetOutOfRange(offset));
    }
    Ok(offset as i8 as u8)
}
