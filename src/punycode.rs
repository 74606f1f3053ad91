//! Punycode (RFC 3492): the bootstring transcoding that represents Unicode
//! labels in ASCII, plus the `xn--`-prefixed label forms used by IDNA.
//!
//! All delta and code-point arithmetic is checked; inputs that would overflow
//! 32-bit state are rejected rather than wrapped.

use core::fmt::{Display, Formatter};

const BASE: u32 = 36;
const TMIN: u32 = 1;
const TMAX: u32 = 26;
const SKEW: u32 = 38;
const DAMP: u32 = 700;
const INITIAL_BIAS: u32 = 72;
const INITIAL_N: u32 = 0x80;

/// The ACE prefix marking an encoded label.
pub const ACE_PREFIX: &str = "xn--";

#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialOrd, PartialEq)]
pub enum PunycodeError {
    /// Delta or code-point arithmetic exceeded 32 bits.
    Overflow,
    /// A character in the delta section is not a base-36 digit.
    InvalidDigit,
    /// A decoded value is not a Unicode scalar, or a non-basic character
    /// appears in the basic section.
    InvalidCodePoint,
    /// [`decode_label`](crate::punycode::decode_label) input without `xn--`.
    MissingPrefix,
    /// Decoding produced a basic code point, which encoders never emit.
    BasicInTail,
}
impl Display for PunycodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), core::fmt::Error> {
        match self {
            PunycodeError::Overflow => write!(f, "punycode arithmetic overflow"),
            PunycodeError::InvalidDigit => write!(f, "invalid punycode digit"),
            PunycodeError::InvalidCodePoint => write!(f, "invalid code point in punycode"),
            PunycodeError::MissingPrefix => write!(f, "punycode label without xn-- prefix"),
            PunycodeError::BasicInTail => {
                write!(f, "punycode delta section encodes a basic code point")
            }
        }
    }
}
impl std::error::Error for PunycodeError {}

/// Bias adaptation, RFC 3492 section 6.1.
fn adapt(mut delta: u32, num_points: u32, first_time: bool) -> u32 {
    delta /= if first_time { DAMP } else { 2 };
    delta += delta / num_points;
    let mut k = 0;
    while delta > ((BASE - TMIN) * TMAX) / 2 {
        delta /= BASE - TMIN;
        k += BASE;
    }
    k + (((BASE - TMIN + 1) * delta) / (delta + SKEW))
}

fn digit_char(digit: u32) -> char {
    debug_assert!(digit < BASE);
    if digit < 26 {
        (b'a' + digit as u8) as char
    } else {
        (b'0' + (digit - 26) as u8) as char
    }
}

fn digit_value(c: char) -> Result<u32, PunycodeError> {
    match c {
        'a'..='z' => Ok(u32::from(c) - u32::from('a')),
        'A'..='Z' => Ok(u32::from(c) - u32::from('A')),
        '0'..='9' => Ok(u32::from(c) - u32::from('0') + 26),
        _ => Err(PunycodeError::InvalidDigit),
    }
}

/// Raw bootstring encode: basic code points, a `-` delimiter when any basic
/// code points exist, then the delta sequence.  No ACE prefix.
///
/// # Errors
/// Returns [`PunycodeError::Overflow`] when the input is too long for 32-bit
/// delta arithmetic.
pub fn encode(input: &str) -> Result<String, PunycodeError> {
    let scalars: Vec<u32> = input.chars().map(u32::from).collect();
    let mut output: String = input.chars().filter(char::is_ascii).collect();
    let basic_count = output.len() as u32;
    if basic_count > 0 {
        output.push('-');
    }
    let mut n = INITIAL_N;
    let mut delta: u32 = 0;
    let mut bias = INITIAL_BIAS;
    let mut handled = basic_count;
    while (handled as usize) < scalars.len() {
        let m = scalars
            .iter()
            .copied()
            .filter(|&c| c >= n)
            .min()
            .ok_or(PunycodeError::Overflow)?;
        delta = delta
            .checked_add(
                (m - n)
                    .checked_mul(handled + 1)
                    .ok_or(PunycodeError::Overflow)?,
            )
            .ok_or(PunycodeError::Overflow)?;
        n = m;
        for &c in &scalars {
            if c < n {
                delta = delta.checked_add(1).ok_or(PunycodeError::Overflow)?;
            }
            if c == n {
                let mut q = delta;
                let mut k = BASE;
                loop {
                    let t = k.saturating_sub(bias).clamp(TMIN, TMAX);
                    if q < t {
                        break;
                    }
                    output.push(digit_char(t + (q - t) % (BASE - t)));
                    q = (q - t) / (BASE - t);
                    k += BASE;
                }
                output.push(digit_char(q));
                bias = adapt(delta, handled + 1, handled == basic_count);
                delta = 0;
                handled += 1;
            }
        }
        delta = delta.checked_add(1).ok_or(PunycodeError::Overflow)?;
        n = n.checked_add(1).ok_or(PunycodeError::Overflow)?;
    }
    Ok(output)
}

/// Raw bootstring decode of `input` (no ACE prefix).
///
/// # Errors
/// Returns an error on a malformed digit, arithmetic overflow, or a decoded
/// value that is not a non-basic Unicode scalar.
pub fn decode(input: &str) -> Result<String, PunycodeError> {
    let (basic, tail) = match input.rfind('-') {
        Some(pos) => (&input[..pos], &input[pos + 1..]),
        None => ("", input),
    };
    if !basic.is_ascii() {
        return Err(PunycodeError::InvalidCodePoint);
    }
    let mut output: Vec<char> = basic.chars().collect();
    let mut n = INITIAL_N;
    let mut i: u32 = 0;
    let mut bias = INITIAL_BIAS;
    let mut tail_chars = tail.chars().peekable();
    while tail_chars.peek().is_some() {
        let old_i = i;
        let mut weight: u32 = 1;
        let mut k = BASE;
        loop {
            let c = tail_chars.next().ok_or(PunycodeError::InvalidDigit)?;
            let digit = digit_value(c)?;
            i = i
                .checked_add(digit.checked_mul(weight).ok_or(PunycodeError::Overflow)?)
                .ok_or(PunycodeError::Overflow)?;
            let t = k.saturating_sub(bias).clamp(TMIN, TMAX);
            if digit < t {
                break;
            }
            weight = weight
                .checked_mul(BASE - t)
                .ok_or(PunycodeError::Overflow)?;
            k += BASE;
        }
        let length = output.len() as u32 + 1;
        bias = adapt(i - old_i, length, old_i == 0);
        n = n
            .checked_add(i / length)
            .ok_or(PunycodeError::Overflow)?;
        i %= length;
        if n < INITIAL_N {
            return Err(PunycodeError::BasicInTail);
        }
        let c = char::from_u32(n).ok_or(PunycodeError::InvalidCodePoint)?;
        output.insert(i as usize, c);
        i += 1;
    }
    Ok(output.into_iter().collect())
}

/// Encode one IDNA label: labels that are entirely basic pass through
/// unchanged, anything else becomes `xn--` plus the bootstring form.
///
/// # Errors
/// Returns [`PunycodeError::Overflow`] for labels too long to encode.
pub fn encode_label(label: &str) -> Result<String, PunycodeError> {
    if label.is_ascii() {
        return Ok(label.to_string());
    }
    Ok(format!("{ACE_PREFIX}{}", encode(label)?))
}

/// Decode one `xn--` label back to Unicode.
///
/// # Errors
/// Returns [`PunycodeError::MissingPrefix`] when the prefix is absent, or any
/// [`decode`] error.
pub fn decode_label(label: &str) -> Result<String, PunycodeError> {
    let tail = label
        .strip_prefix(ACE_PREFIX)
        .ok_or(PunycodeError::MissingPrefix)?;
    decode(tail)
}
