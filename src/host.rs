//! The host of a URL: a domain, an IP address, an opaque string, or empty.

use crate::ascii::{from_hex_byte, is_forbidden_domain_byte, is_forbidden_host_byte};
use crate::error::ValidationError;
use crate::idna::{self, IdnaError};
use crate::ipv4::{ends_in_a_number, Ipv4Address, Ipv4ParseError};
use crate::ipv6::{Ipv6Address, Ipv6ParseError};
use crate::percent::{percent_decode, percent_encode_byte_to, EncodeSet};
use crate::util::escape_and_elide;
use core::fmt::{Display, Formatter};

#[derive(Clone, Debug, Eq, Hash, Ord, PartialOrd, PartialEq)]
pub enum HostParseError {
    /// A `[` host without the closing `]`.
    Ipv6Unclosed,
    Ipv4(Ipv4ParseError),
    Ipv6(Ipv6ParseError),
    Idna(IdnaError),
    /// A forbidden host code point in an opaque host.
    ForbiddenHostCharacter(char),
    /// A forbidden domain code point after IDNA processing.
    ForbiddenDomainCharacter(char),
    /// A `%` that does not start a well-formed percent triplet.
    InvalidPercentEncoding,
    /// A character outside the URL code points (host and hostname setters).
    InvalidCharacter(char),
    /// IDNA processing reduced the domain to nothing.
    EmptyDomain,
}
impl Display for HostParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), core::fmt::Error> {
        match self {
            HostParseError::Ipv6Unclosed => write!(f, "IPv6 host missing closing ']'"),
            HostParseError::Ipv4(e) => write!(f, "{e}"),
            HostParseError::Ipv6(e) => write!(f, "{e}"),
            HostParseError::Idna(e) => write!(f, "{e}"),
            HostParseError::ForbiddenHostCharacter(c) => {
                write!(
                    f,
                    "forbidden host character \"{}\"",
                    escape_and_elide(c.to_string().as_bytes(), 10)
                )
            }
            HostParseError::ForbiddenDomainCharacter(c) => {
                write!(
                    f,
                    "forbidden domain character \"{}\"",
                    escape_and_elide(c.to_string().as_bytes(), 10)
                )
            }
            HostParseError::InvalidPercentEncoding => {
                write!(f, "malformed percent-encoding in host")
            }
            HostParseError::InvalidCharacter(c) => {
                write!(
                    f,
                    "character not permitted in a hostname: \"{}\"",
                    escape_and_elide(c.to_string().as_bytes(), 10)
                )
            }
            HostParseError::EmptyDomain => write!(f, "domain is empty after IDNA processing"),
        }
    }
}
impl std::error::Error for HostParseError {}
impl From<Ipv4ParseError> for HostParseError {
    fn from(e: Ipv4ParseError) -> Self {
        HostParseError::Ipv4(e)
    }
}
impl From<Ipv6ParseError> for HostParseError {
    fn from(e: Ipv6ParseError) -> Self {
        HostParseError::Ipv6(e)
    }
}
impl From<IdnaError> for HostParseError {
    fn from(e: IdnaError) -> Self {
        HostParseError::Idna(e)
    }
}

/// A parsed host.
///
/// Hosts of special schemes other than `file` are always `Domain`, `Ipv4`,
/// or `Ipv6`; non-special schemes get `Opaque` (or `Empty`) hosts.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialOrd, PartialEq)]
pub enum Host {
    /// ASCII domain after IDNA toASCII.
    Domain(String),
    Ipv4(Ipv4Address),
    Ipv6(Ipv6Address),
    /// Percent-encoded host of a non-special URL.
    Opaque(String),
    Empty,
}
impl Host {
    /// Parse a host for a special scheme: IPv6 in brackets, otherwise IDNA
    /// domain processing with an IPv4 attempt when the final label is
    /// numeric.
    ///
    /// # Errors
    /// Returns an error describing the first defect found.
    pub fn parse(input: &str) -> Result<Host, HostParseError> {
        Self::parse_with(input, true, None)
    }

    /// Parse a host for a non-special scheme: forbidden host code points are
    /// rejected and everything else is kept percent-encoded.
    ///
    /// # Errors
    /// Returns an error on a forbidden host code point, malformed percent
    /// triplet, or unclosed `[`.
    pub fn parse_opaque(input: &str) -> Result<Host, HostParseError> {
        Self::parse_with(input, false, None)
    }

    pub(crate) fn parse_with(
        input: &str,
        is_special: bool,
        vfn: Option<&dyn Fn(ValidationError)>,
    ) -> Result<Host, HostParseError> {
        if let Some(rest) = input.strip_prefix('[') {
            let inner = rest
                .strip_suffix(']')
                .ok_or(HostParseError::Ipv6Unclosed)?;
            return Ok(Host::Ipv6(Ipv6Address::parse(inner)?));
        }
        if !is_special {
            return Self::parse_opaque_inner(input);
        }
        if input.is_empty() {
            return Ok(Host::Empty);
        }
        check_percent_triplets(input)?;
        let domain = String::from_utf8_lossy(&percent_decode(input)).into_owned();
        let ascii_domain = idna::to_ascii(&domain, false)?;
        if ascii_domain.is_empty() {
            return Err(HostParseError::EmptyDomain);
        }
        if let Some(forbidden) = ascii_domain
            .chars()
            .find(|&c| c.is_ascii() && is_forbidden_domain_byte(c as u8))
        {
            return Err(HostParseError::ForbiddenDomainCharacter(forbidden));
        }
        if ends_in_a_number(&ascii_domain) {
            return Ok(Host::Ipv4(Ipv4Address::parse_with(&ascii_domain, vfn)?));
        }
        Ok(Host::Domain(ascii_domain))
    }

    fn parse_opaque_inner(input: &str) -> Result<Host, HostParseError> {
        if input.is_empty() {
            return Ok(Host::Empty);
        }
        if let Some(forbidden) = input
            .chars()
            .find(|&c| c.is_ascii() && is_forbidden_host_byte(c as u8))
        {
            return Err(HostParseError::ForbiddenHostCharacter(forbidden));
        }
        check_percent_triplets(input)?;
        let mut encoded = String::with_capacity(input.len());
        for byte in input.bytes() {
            percent_encode_byte_to(byte, EncodeSet::C0Control, &mut encoded);
        }
        Ok(Host::Opaque(encoded))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Host::Empty)
    }
}
impl Display for Host {
    /// The host serializer: IPv6 in brackets, everything else as stored.
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), core::fmt::Error> {
        match self {
            Host::Domain(name) | Host::Opaque(name) => write!(f, "{name}"),
            Host::Ipv4(addr) => write!(f, "{addr}"),
            Host::Ipv6(addr) => write!(f, "[{addr}]"),
            Host::Empty => Ok(()),
        }
    }
}
impl From<Ipv4Address> for Host {
    fn from(addr: Ipv4Address) -> Self {
        Host::Ipv4(addr)
    }
}
impl From<Ipv6Address> for Host {
    fn from(addr: Ipv6Address) -> Self {
        Host::Ipv6(addr)
    }
}
impl From<std::net::IpAddr> for Host {
    fn from(addr: std::net::IpAddr) -> Self {
        match addr {
            std::net::IpAddr::V4(v4) => Host::Ipv4(v4.into()),
            std::net::IpAddr::V6(v6) => Host::Ipv6(v6.into()),
        }
    }
}

/// Every `%` must begin a well-formed triplet; the URL parser treats a bad
/// triplet in a host as fatal rather than a warning.
fn check_percent_triplets(input: &str) -> Result<(), HostParseError> {
    let bytes = input.as_bytes();
    for (n, &byte) in bytes.iter().enumerate() {
        if byte == b'%' {
            let well_formed = n + 2 < bytes.len()
                && from_hex_byte(bytes[n + 1]).is_some()
                && from_hex_byte(bytes[n + 2]).is_some();
            if !well_formed {
                return Err(HostParseError::InvalidPercentEncoding);
            }
        }
    }
    Ok(())
}
