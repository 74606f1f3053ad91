/// Render a byte slice as printable ASCII: printable characters as-is,
/// everything else escaped like `\n` or `\x19`.
///
/// Error types quote rejected host and domain input through this, so a
/// message stays one readable line even when the input held controls or
/// non-ASCII bytes.
#[must_use]
pub fn escape_ascii(input: &[u8]) -> String {
    let mut out = String::with_capacity(input.len());
    for &byte in input {
        out.extend(core::ascii::escape_default(byte).map(char::from));
    }
    out
}

/// Like [`escape_ascii`], but caps the quoted input at `max_len` bytes and
/// marks the cut with `...`.  Keeps error messages bounded no matter how
/// long the rejected input was.
#[must_use]
pub fn escape_and_elide(input: &[u8], max_len: usize) -> String {
    if input.len() > max_len {
        let mut out = escape_ascii(&input[..max_len]);
        out.push_str("...");
        out
    } else {
        escape_ascii(input)
    }
}

/// [`escape_ascii`] for a single scalar, escaping its UTF-8 bytes.
#[must_use]
pub fn escape_char(c: char) -> String {
    let mut buf = [0_u8; 4];
    escape_ascii(c.encode_utf8(&mut buf).as_bytes())
}
