//! IDNA Compatibility Processing (UTS #46): map, normalize, split, validate,
//! and Punycode-encode domain labels.
//!
//! Processing is always non-transitional with CheckHyphens off, CheckBidi and
//! CheckJoiners on.  `be_strict` turns on the STD3 ASCII rules and DNS length
//! verification, matching the URL standard's `beStrict` flag.

pub mod mapping;

use crate::punycode::{self, PunycodeError, ACE_PREFIX};
use core::fmt::{Display, Formatter};
use mapping::Status;
use unicode_bidi::{bidi_class, BidiClass};
use unicode_normalization::char::{canonical_combining_class, is_combining_mark};
use unicode_normalization::{is_nfc, UnicodeNormalization};

const CCC_VIRAMA: u8 = 9;

#[derive(Clone, Debug, Eq, Hash, Ord, PartialOrd, PartialEq)]
pub enum IdnaError {
    /// A code point the mapping table disallows.
    DisallowedCodePoint(char),
    /// Input bytes were not valid UTF-8 (strict mode only).
    IllFormedUtf8,
    /// A label failed validation: not NFC, leading combining mark, misplaced
    /// joiner, or bidi rule violation.
    LabelValidation,
    /// A label or the whole domain exceeds DNS length limits (strict mode).
    DnsLength,
    /// An `xn--` label did not decode.
    Punycode(PunycodeError),
}
impl Display for IdnaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), core::fmt::Error> {
        match self {
            IdnaError::DisallowedCodePoint(c) => {
                write!(f, "disallowed code point: {}", crate::util::escape_char(*c))
            }
            IdnaError::IllFormedUtf8 => write!(f, "ill-formed UTF-8 in domain"),
            IdnaError::LabelValidation => write!(f, "domain label failed validation"),
            IdnaError::DnsLength => write!(f, "domain exceeds DNS length limits"),
            IdnaError::Punycode(e) => write!(f, "punycode: {e}"),
        }
    }
}
impl std::error::Error for IdnaError {}
impl From<PunycodeError> for IdnaError {
    fn from(e: PunycodeError) -> Self {
        IdnaError::Punycode(e)
    }
}

/// The domain-to-ASCII operation.
///
/// # Errors
/// Returns an error when the input contains a disallowed code point, a label
/// fails validation, an `xn--` label does not decode, or (under `be_strict`)
/// a DNS length limit is exceeded.
pub fn to_ascii(domain: &str, be_strict: bool) -> Result<String, IdnaError> {
    let normalized = map_and_normalize(domain, be_strict)?;
    let is_bidi = is_bidi_domain(&normalized);
    let mut output = String::with_capacity(normalized.len());
    for (n, label) in normalized.split('.').enumerate() {
        if n > 0 {
            output.push('.');
        }
        output.push_str(&process_label(label, be_strict, is_bidi)?.ascii);
    }
    if be_strict {
        verify_dns_length(&output)?;
    }
    Ok(output)
}

/// The domain-to-ASCII operation over raw bytes.
///
/// Ill-formed sequences fail under `be_strict` and are otherwise substituted
/// with U+FFFD, which the mapping table then rejects as disallowed.
///
/// # Errors
/// See [`to_ascii`].
pub fn to_ascii_bytes(domain: &[u8], be_strict: bool) -> Result<String, IdnaError> {
    match core::str::from_utf8(domain) {
        Ok(domain) => to_ascii(domain, be_strict),
        Err(_) if be_strict => Err(IdnaError::IllFormedUtf8),
        Err(_) => to_ascii(&String::from_utf8_lossy(domain), false),
    }
}

/// The domain-to-Unicode operation: like [`to_ascii`] but `xn--` labels are
/// returned in decoded form.
///
/// # Errors
/// Same failures as [`to_ascii`] in lenient mode.
pub fn to_unicode(domain: &str) -> Result<String, IdnaError> {
    let normalized = map_and_normalize(domain, false)?;
    let is_bidi = is_bidi_domain(&normalized);
    let mut output = String::with_capacity(normalized.len());
    for (n, label) in normalized.split('.').enumerate() {
        if n > 0 {
            output.push('.');
        }
        output.push_str(&process_label(label, false, is_bidi)?.unicode);
    }
    Ok(output)
}

struct ProcessedLabel {
    ascii: String,
    unicode: String,
}

/// Validate one label and produce both its ASCII and Unicode forms.
fn process_label(
    label: &str,
    be_strict: bool,
    is_bidi: bool,
) -> Result<ProcessedLabel, IdnaError> {
    if let Some(tail) = label.strip_prefix(ACE_PREFIX) {
        // Already Punycode: decode, validate without mapping, re-encode.
        let decoded = punycode::decode(tail)?;
        validate_label(&decoded, be_strict, is_bidi, true)?;
        let ascii = punycode::encode_label(&decoded)?;
        return Ok(ProcessedLabel {
            ascii,
            unicode: decoded,
        });
    }
    validate_label(label, be_strict, is_bidi, false)?;
    Ok(ProcessedLabel {
        ascii: punycode::encode_label(label)?,
        unicode: label.to_string(),
    })
}

/// Steps 1-3 of the pipeline: per-scalar mapping, then NFC.
fn map_and_normalize(domain: &str, be_strict: bool) -> Result<String, IdnaError> {
    let mut mapped = String::with_capacity(domain.len());
    for c in domain.chars() {
        let entry = mapping::lookup(c);
        match entry.status() {
            Status::Valid | Status::Deviation => mapped.push(c),
            Status::Ignored => {}
            Status::Mapped => entry.append_replacement_to(&mut mapped),
            Status::Disallowed => return Err(IdnaError::DisallowedCodePoint(c)),
            Status::DisallowedStd3Valid => {
                if be_strict {
                    return Err(IdnaError::DisallowedCodePoint(c));
                }
                mapped.push(c);
            }
            Status::DisallowedStd3Mapped => {
                if be_strict {
                    return Err(IdnaError::DisallowedCodePoint(c));
                }
                entry.append_replacement_to(&mut mapped);
            }
        }
    }
    Ok(mapped.nfc().collect())
}

/// Label validity per UTS #46 section 4.1 with CheckHyphens off.
fn validate_label(
    label: &str,
    be_strict: bool,
    is_bidi: bool,
    from_ace: bool,
) -> Result<(), IdnaError> {
    if label.is_empty() {
        return Ok(());
    }
    if !is_nfc(label) {
        return Err(IdnaError::LabelValidation);
    }
    if from_ace && label.strip_prefix(ACE_PREFIX).is_some() {
        return Err(IdnaError::LabelValidation);
    }
    if from_ace && label.is_ascii() {
        // An encoded label must decode to something non-basic.
        return Err(IdnaError::LabelValidation);
    }
    if label.chars().next().is_some_and(is_combining_mark) {
        return Err(IdnaError::LabelValidation);
    }
    let chars: Vec<char> = label.chars().collect();
    for (n, &c) in chars.iter().enumerate() {
        if c == '.' {
            return Err(IdnaError::LabelValidation);
        }
        match mapping::lookup(c).status() {
            Status::Valid | Status::Deviation => {}
            Status::DisallowedStd3Valid if !be_strict => {}
            _ => return Err(IdnaError::DisallowedCodePoint(c)),
        }
        // ContextJ: joiners only directly after a virama.
        if matches!(c, '\u{200C}' | '\u{200D}') {
            let after_virama = n > 0 && canonical_combining_class(chars[n - 1]) == CCC_VIRAMA;
            if !after_virama {
                return Err(IdnaError::LabelValidation);
            }
        }
    }
    if is_bidi && !passes_bidi(&chars) {
        return Err(IdnaError::LabelValidation);
    }
    Ok(())
}

/// True when any character in the domain has Bidi_Class R, AL, or AN.
fn is_bidi_domain(domain: &str) -> bool {
    domain.chars().any(|c| {
        matches!(
            bidi_class(c),
            BidiClass::R | BidiClass::AL | BidiClass::AN
        )
    })
}

/// RFC 5893 section 2, applied to labels of a bidi domain name.
fn passes_bidi(label: &[char]) -> bool {
    let Some(&first) = label.first() else {
        return true;
    };
    match bidi_class(first) {
        // LTR label: rules 5 and 6.
        BidiClass::L => {
            let mut last_non_nsm = first;
            for &c in &label[1..] {
                match bidi_class(c) {
                    BidiClass::L
                    | BidiClass::EN
                    | BidiClass::ES
                    | BidiClass::CS
                    | BidiClass::ET
                    | BidiClass::ON
                    | BidiClass::BN => last_non_nsm = c,
                    BidiClass::NSM => {}
                    _ => return false,
                }
            }
            matches!(bidi_class(last_non_nsm), BidiClass::L | BidiClass::EN)
        }
        // RTL label: rules 2, 3, and 4.
        BidiClass::R | BidiClass::AL => {
            let mut seen_en = false;
            let mut seen_an = false;
            let mut last_non_nsm = first;
            for &c in &label[1..] {
                match bidi_class(c) {
                    BidiClass::R
                    | BidiClass::AL
                    | BidiClass::ES
                    | BidiClass::CS
                    | BidiClass::ET
                    | BidiClass::ON
                    | BidiClass::BN => last_non_nsm = c,
                    BidiClass::EN => {
                        seen_en = true;
                        last_non_nsm = c;
                    }
                    BidiClass::AN => {
                        seen_an = true;
                        last_non_nsm = c;
                    }
                    BidiClass::NSM => {}
                    _ => return false,
                }
            }
            if seen_en && seen_an {
                return false;
            }
            matches!(
                bidi_class(last_non_nsm),
                BidiClass::R | BidiClass::AL | BidiClass::EN | BidiClass::AN
            )
        }
        // Rule 1: the first character must be L, R, or AL.
        _ => false,
    }
}

/// RFC 1035 limits: 1-63 bytes per label, 1-253 for the whole domain.
fn verify_dns_length(domain: &str) -> Result<(), IdnaError> {
    let domain = domain.strip_suffix('.').unwrap_or(domain);
    if domain.is_empty() || domain.len() > 253 {
        return Err(IdnaError::DnsLength);
    }
    for label in domain.split('.') {
        if label.is_empty() || label.len() > 63 {
            return Err(IdnaError::DnsLength);
        }
    }
    Ok(())
}
