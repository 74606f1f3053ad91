//! Byte and code-point classification used throughout the parser.
//!
//! The URL serialization is always ASCII, so most predicates here work on
//! bytes.  Only [`is_url_code_point`] needs to see whole scalars.

/// The uppercase hex digit for one nibble.  Percent-encoding writes two of
/// these after each `%`.
///
/// # Panics
/// Panics when `nibble` is 16 or more.
#[must_use]
pub fn upper_hex_char(nibble: u8) -> char {
    const DIGITS: &[u8; 16] = b"0123456789ABCDEF";
    assert!(nibble < 16, "not a nibble: {nibble}");
    DIGITS[nibble as usize] as char
}

/// The value of an ASCII hex digit, case-insensitive, or `None`.
/// Percent-decoding and the host parser use this to recognize well-formed
/// `%XX` triplets.
#[must_use]
pub fn from_hex_byte(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

/// <https://url.spec.whatwg.org/#forbidden-host-code-point>
#[must_use]
pub fn is_forbidden_host_byte(b: u8) -> bool {
    matches!(
        b,
        0x00 | b'\t'
            | b'\n'
            | b'\r'
            | b' '
            | b'#'
            | b'/'
            | b':'
            | b'<'
            | b'>'
            | b'?'
            | b'@'
            | b'['
            | b'\\'
            | b']'
            | b'^'
            | b'|'
    )
}

/// <https://url.spec.whatwg.org/#forbidden-domain-code-point>
#[must_use]
pub fn is_forbidden_domain_byte(b: u8) -> bool {
    is_forbidden_host_byte(b) || b <= 0x1F || b == b'%' || b == 0x7F
}

/// <https://url.spec.whatwg.org/#url-code-points>
#[must_use]
pub fn is_url_code_point(c: char) -> bool {
    if c.is_ascii() {
        return c.is_ascii_alphanumeric()
            || matches!(
                c,
                '!' | '$'
                    | '&'
                    | '\''
                    | '('
                    | ')'
                    | '*'
                    | '+'
                    | ','
                    | '-'
                    | '.'
                    | '/'
                    | ':'
                    | ';'
                    | '='
                    | '?'
                    | '@'
                    | '_'
                    | '~'
            );
    }
    let cp = u32::from(c);
    if !(0xA0..=0x10_FFFD).contains(&cp) {
        return false;
    }
    // Noncharacters.
    if (0xFDD0..=0xFDEF).contains(&cp) || (cp & 0xFFFE) == 0xFFFE {
        return false;
    }
    true
}

#[must_use]
pub fn is_c0_control_or_space(b: u8) -> bool {
    b <= 0x20
}

#[must_use]
pub fn is_ascii_tab_or_newline(b: u8) -> bool {
    matches!(b, b'\t' | b'\n' | b'\r')
}

/// A Windows drive letter is an ASCII alpha followed by `:` or `|`.
#[must_use]
pub fn is_windows_drive_letter(segment: &[u8]) -> bool {
    segment.len() == 2 && segment[0].is_ascii_alphabetic() && matches!(segment[1], b':' | b'|')
}

/// A normalized Windows drive letter is an ASCII alpha followed by `:`.
#[must_use]
pub fn is_normalized_windows_drive_letter(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// True when `input` begins with a Windows drive letter that is followed by
/// nothing, `/`, `\`, `?`, or `#`.
#[must_use]
pub fn starts_with_windows_drive_letter(input: &[u8]) -> bool {
    input.len() >= 2
        && is_windows_drive_letter(&input[..2])
        && (input.len() == 2 || matches!(input[2], b'/' | b'\\' | b'?' | b'#'))
}

/// True for `.` and its percent-encoded spelling, ASCII case-insensitive.
#[must_use]
pub fn is_single_dot_segment(segment: &str) -> bool {
    segment == "." || segment.eq_ignore_ascii_case("%2e")
}

/// True for `..` and all of its partly or fully percent-encoded spellings.
#[must_use]
pub fn is_double_dot_segment(segment: &str) -> bool {
    matches!(
        segment.to_ascii_lowercase().as_str(),
        ".." | ".%2e" | "%2e." | "%2e%2e"
    )
}
