//! The [`Url`] value: a parsed, normalized URL defined by its serialization.

use crate::ascii::is_url_code_point;
use crate::error::{ParseError, SetterError, ValidationError};
use crate::host::Host;
use crate::parser::{Parser, State};
use crate::percent::{percent_encode, EncodeSet};
use crate::storage::{HostKind, SchemeKind, Structure};
use core::fmt::{Display, Formatter};
use core::hash::{Hash, Hasher};

/// A parsed URL.
///
/// The value is one contiguous ASCII serialization plus byte offsets for
/// every component; getters return slices of it and mutations rewrite it in
/// place.  Re-parsing the serialization always yields an identical value.
///
/// Example:
/// ```
/// use weburl::Url;
///
/// let url = Url::parse("https://example.org/a/b?k=v").unwrap();
/// assert_eq!(url.scheme(), "https");
/// assert_eq!(url.host_str(), Some("example.org"));
/// assert_eq!(url.path(), "/a/b");
/// assert_eq!(url.query(), Some("k=v"));
/// ```
#[derive(Clone)]
pub struct Url {
    pub(crate) serialization: String,
    pub(crate) structure: Structure,
}

impl Url {
    /// Parse an absolute URL string.
    ///
    /// # Errors
    /// Returns a [`ParseError`] describing the first fatal defect.
    pub fn parse(input: &str) -> Result<Url, ParseError> {
        Parser::new(None, None).parse_url(input)
    }

    /// Begin a parse with options: a base URL for relative references and a
    /// callback receiving [`ValidationError`] warnings.
    #[must_use]
    pub fn options<'a>() -> ParseOptions<'a> {
        ParseOptions {
            base: None,
            vfn: None,
        }
    }

    /// Resolve `input` as a reference against this URL.
    ///
    /// # Errors
    /// Returns a [`ParseError`] when the reference cannot be resolved.
    pub fn join(&self, input: &str) -> Result<Url, ParseError> {
        Url::options().base_url(Some(self)).parse(input)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.serialization
    }

    /// The read-only byte view of the serialization.  Always ASCII.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.serialization.as_bytes()
    }

    #[must_use]
    pub fn serialize(&self) -> &str {
        self.as_str()
    }

    #[must_use]
    pub fn serialize_excluding_fragment(&self) -> &str {
        let end = self
            .structure
            .fragment_start
            .unwrap_or(self.serialization.len() as u32);
        &self.serialization[..end as usize]
    }

    /// The scheme, lowercase, without the trailing `:`.
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.serialization[..self.structure.scheme_end as usize]
    }

    /// Whether the scheme is http, https, ws, wss, ftp, or file.
    #[must_use]
    pub fn is_special(&self) -> bool {
        self.structure.is_special()
    }

    /// The percent-encoded username, or `""`.
    #[must_use]
    pub fn username(&self) -> &str {
        if !self.structure.has_authority() {
            return "";
        }
        let start = self.structure.authority_start() as usize;
        &self.serialization[start..self.structure.username_end as usize]
    }

    /// The percent-encoded password, or `""`.
    #[must_use]
    pub fn password(&self) -> &str {
        let end = self.structure.username_end as usize;
        if !self.structure.has_credentials()
            || self.serialization.as_bytes().get(end) != Some(&b':')
        {
            return "";
        }
        &self.serialization[end + 1..self.structure.host_start as usize - 1]
    }

    /// The host serialization, or `None` when the URL has no authority.
    #[must_use]
    pub fn host_str(&self) -> Option<&str> {
        if !self.structure.has_authority() {
            return None;
        }
        let span = self.structure.host_start as usize..self.structure.host_end as usize;
        Some(&self.serialization[span])
    }

    /// The typed host, or `None` when the URL has no authority.
    #[must_use]
    pub fn host(&self) -> Option<Host> {
        let text = self.host_str()?;
        Some(match self.structure.host_kind {
            HostKind::None => return None,
            HostKind::Empty => Host::Empty,
            HostKind::Domain => Host::Domain(text.to_string()),
            HostKind::Ipv4(addr) => Host::Ipv4(addr),
            HostKind::Ipv6(addr) => Host::Ipv6(addr),
            HostKind::Opaque => Host::Opaque(text.to_string()),
        })
    }

    /// The explicit port, absent when equal to the scheme's default.
    #[must_use]
    pub fn port(&self) -> Option<u16> {
        self.structure.port
    }

    /// The explicit port or the scheme's default.
    #[must_use]
    pub fn port_or_known_default(&self) -> Option<u16> {
        self.structure.port.or(self.structure.scheme_kind.default_port())
    }

    /// The `userinfo@host:port` slice, or `""` without an authority.
    #[must_use]
    pub fn authority(&self) -> &str {
        if !self.structure.has_authority() {
            return "";
        }
        let span = self.structure.authority_start() as usize..self.structure.path_start as usize;
        &self.serialization[span]
    }

    /// The serialized path.  `""` is possible for non-special URLs.
    #[must_use]
    pub fn path(&self) -> &str {
        let span = self.structure.path_start as usize
            ..self.structure.path_end(self.serialization.len()) as usize;
        let path = &self.serialization[span];
        // Strip the `/.` marker that guards authority-less paths starting
        // with `//`.
        if !self.structure.has_authority() {
            if let Some(rest) = path.strip_prefix("/.") {
                if rest.starts_with('/') {
                    return rest;
                }
            }
        }
        path
    }

    /// True when the path is a single opaque token (e.g. `mailto:alice@ex`).
    #[must_use]
    pub fn has_opaque_path(&self) -> bool {
        self.structure.has_opaque_path
    }

    /// The query, without the `?`.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        let start = self.structure.query_start? as usize;
        let end = self
            .structure
            .fragment_start
            .unwrap_or(self.serialization.len() as u32) as usize;
        Some(&self.serialization[start + 1..end])
    }

    /// The fragment, without the `#`.
    #[must_use]
    pub fn fragment(&self) -> Option<&str> {
        let start = self.structure.fragment_start? as usize;
        Some(&self.serialization[start + 1..])
    }

    /// Replace the scheme.
    ///
    /// # Errors
    /// Rejects syntactically invalid schemes, changes that cross the
    /// special/non-special line, and `file:` transitions that would leave
    /// the URL invalid.
    pub fn set_scheme(&mut self, value: &str) -> Result<(), SetterError> {
        let value = value.strip_suffix(':').unwrap_or(value);
        let bytes = value.as_bytes();
        let valid = !bytes.is_empty()
            && bytes[0].is_ascii_alphabetic()
            && bytes
                .iter()
                .all(|&b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'));
        if !valid {
            return Err(SetterError::Parse(ParseError::InvalidScheme));
        }
        let scheme = value.to_ascii_lowercase();
        let kind = SchemeKind::from_scheme(&scheme);
        if kind.is_special() != self.structure.is_special() {
            return Err(SetterError::SchemeChange);
        }
        if kind == SchemeKind::File
            && (self.structure.has_credentials() || self.structure.port.is_some())
        {
            return Err(SetterError::SchemeChange);
        }
        if self.structure.scheme_kind == SchemeKind::File
            && self.structure.host_kind == HostKind::Empty
        {
            return Err(SetterError::SchemeChange);
        }
        self.rewrite_scheme(&scheme, kind);
        if self.structure.port.is_some() && self.structure.port == kind.default_port() {
            self.rewrite_port(None);
        }
        Ok(())
    }

    /// Replace the username, percent-encoding as needed.
    ///
    /// # Errors
    /// Rejected when the URL cannot carry credentials.
    pub fn set_username(&mut self, value: &str) -> Result<(), SetterError> {
        if self.structure.cannot_have_credentials_or_port() {
            return Err(SetterError::CannotHaveCredentials);
        }
        let username = percent_encode(value, EncodeSet::Userinfo);
        let password = self.password().to_string();
        self.rewrite_userinfo(&username, &password);
        Ok(())
    }

    /// Replace the password, percent-encoding as needed.  An empty value
    /// removes the password.
    ///
    /// # Errors
    /// Rejected when the URL cannot carry credentials.
    pub fn set_password(&mut self, value: &str) -> Result<(), SetterError> {
        if self.structure.cannot_have_credentials_or_port() {
            return Err(SetterError::CannotHaveCredentials);
        }
        let username = self.username().to_string();
        let password = percent_encode(value, EncodeSet::Userinfo);
        self.rewrite_userinfo(&username, &password);
        Ok(())
    }

    /// Replace the host, optionally with a `host:port` value.
    ///
    /// # Errors
    /// Rejected on an opaque-path URL or when the new host does not parse.
    pub fn set_host(&mut self, value: &str) -> Result<(), SetterError> {
        self.set_host_impl(value, State::Host)
    }

    /// Replace the hostname; a `:` in the value is rejected.
    ///
    /// # Errors
    /// Rejected on an opaque-path URL or when the new host does not parse.
    pub fn set_hostname(&mut self, value: &str) -> Result<(), SetterError> {
        self.set_host_impl(value, State::Hostname)
    }

    fn set_host_impl(&mut self, value: &str, state: State) -> Result<(), SetterError> {
        if self.structure.has_opaque_path {
            return Err(SetterError::OpaquePath);
        }
        // A hostname assigned through the API must consist of URL code
        // points (plus `%` and the IPv6 brackets); the parser's
        // warn-and-continue lenience does not apply here.
        for c in value.chars() {
            if matches!(c, '[' | ']' | '%') {
                continue;
            }
            if !is_url_code_point(c) {
                return Err(SetterError::Parse(ParseError::Host(
                    crate::host::HostParseError::InvalidCharacter(c),
                )));
            }
        }
        let parsed = Parser::new(None, None).run(value, self.clone(), Some(state))?;
        *self = parsed;
        Ok(())
    }

    /// Replace the port.  `Some(default)` stores as absent per the
    /// standard's default-port elision.
    ///
    /// # Errors
    /// Rejected when the URL cannot carry a port.
    pub fn set_port(&mut self, port: Option<u16>) -> Result<(), SetterError> {
        if self.structure.cannot_have_credentials_or_port() {
            return Err(SetterError::CannotHavePort);
        }
        let port = match port {
            Some(value) if Some(value) == self.structure.scheme_kind.default_port() => None,
            other => other,
        };
        self.rewrite_port(port);
        Ok(())
    }

    /// Replace the path, re-running path parsing and normalization.
    ///
    /// # Errors
    /// Rejected on an opaque-path URL.
    pub fn set_path(&mut self, value: &str) -> Result<(), SetterError> {
        if self.structure.has_opaque_path {
            return Err(SetterError::OpaquePath);
        }
        let mut cleared = self.clone();
        cleared.path_clear();
        let parsed = Parser::new(None, None).run(value, cleared, Some(State::PathStart))?;
        *self = parsed;
        Ok(())
    }

    /// Replace or remove the query.  A leading `?` in the value is ignored.
    pub fn set_query(&mut self, value: Option<&str>) {
        match value {
            None => self.rewrite_query(None),
            Some(value) => {
                let value = value.strip_prefix('?').unwrap_or(value);
                let set = if self.structure.is_special() {
                    EncodeSet::SpecialQuery
                } else {
                    EncodeSet::Query
                };
                let encoded = percent_encode(value, set);
                self.rewrite_query(Some(&encoded));
            }
        }
    }

    /// Replace or remove the fragment.  A leading `#` in the value is
    /// ignored.
    pub fn set_fragment(&mut self, value: Option<&str>) {
        match value {
            None => self.rewrite_fragment(None),
            Some(value) => {
                let value = value.strip_prefix('#').unwrap_or(value);
                let encoded = percent_encode(value, EncodeSet::Fragment);
                self.rewrite_fragment(Some(&encoded));
            }
        }
    }
}

impl Display for Url {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), core::fmt::Error> {
        write!(f, "{}", self.serialization)
    }
}
impl core::fmt::Debug for Url {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), core::fmt::Error> {
        f.debug_tuple("Url").field(&self.serialization).finish()
    }
}
impl PartialEq for Url {
    fn eq(&self, other: &Url) -> bool {
        self.serialization == other.serialization
    }
}
impl Eq for Url {}
impl PartialOrd for Url {
    fn partial_cmp(&self, other: &Url) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Url {
    fn cmp(&self, other: &Url) -> core::cmp::Ordering {
        self.serialization.cmp(&other.serialization)
    }
}
impl Hash for Url {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.serialization.hash(state);
    }
}
impl core::str::FromStr for Url {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Url, ParseError> {
        Url::parse(s)
    }
}
impl TryFrom<&str> for Url {
    type Error = ParseError;

    fn try_from(value: &str) -> Result<Url, ParseError> {
        Url::parse(value)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Url {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Url {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Url, D::Error> {
        let text = String::deserialize(deserializer)?;
        Url::parse(&text).map_err(serde::de::Error::custom)
    }
}
#[cfg(feature = "serde")]
impl serde::Serialize for Host {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

/// Options for a parse: a base URL and a violation callback.
///
/// ```
/// use weburl::Url;
///
/// let base = Url::parse("https://example.org/a/").unwrap();
/// let url = Url::options().base_url(Some(&base)).parse("b").unwrap();
/// assert_eq!(url.as_str(), "https://example.org/a/b");
/// ```
#[derive(Copy, Clone)]
pub struct ParseOptions<'a> {
    base: Option<&'a Url>,
    vfn: Option<&'a dyn Fn(ValidationError)>,
}
impl<'a> ParseOptions<'a> {
    #[must_use]
    pub fn base_url(mut self, base: Option<&'a Url>) -> Self {
        self.base = base;
        self
    }

    #[must_use]
    pub fn violation_callback(mut self, cb: Option<&'a dyn Fn(ValidationError)>) -> Self {
        self.vfn = cb;
        self
    }

    /// Run the parse.
    ///
    /// # Errors
    /// Returns a [`ParseError`] describing the first fatal defect.
    pub fn parse(self, input: &str) -> Result<Url, ParseError> {
        Parser::new(self.base, self.vfn).parse_url(input)
    }
}
