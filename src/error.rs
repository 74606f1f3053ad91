//! Fatal parse errors, non-fatal validation warnings, and setter rejections.

use crate::host::HostParseError;
use core::fmt::{Display, Formatter};

/// A condition that makes the parser return failure.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialOrd, PartialEq)]
pub enum ParseError {
    /// The input has no valid scheme and no usable base.
    MissingScheme,
    /// The scheme is syntactically invalid.
    InvalidScheme,
    /// A base URL was required but cannot serve as one (opaque path).
    InvalidBase,
    /// A special non-file URL with an empty host.
    EmptyHost,
    /// The host failed to parse; carries the detailed reason.
    Host(HostParseError),
    /// The port is not a number or does not fit in 16 bits.
    InvalidPort,
    /// An opaque path may not contain a raw NUL.
    OpaquePathForbiddenCharacter,
    /// A `file:` URL's host would be a Windows drive letter.
    DriveLetterHost,
}
impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), core::fmt::Error> {
        match self {
            ParseError::MissingScheme => write!(f, "relative URL without a base"),
            ParseError::InvalidScheme => write!(f, "invalid scheme"),
            ParseError::InvalidBase => write!(f, "base URL cannot be a base"),
            ParseError::EmptyHost => write!(f, "empty host"),
            ParseError::Host(e) => write!(f, "invalid host: {e}"),
            ParseError::InvalidPort => write!(f, "invalid port number"),
            ParseError::OpaquePathForbiddenCharacter => {
                write!(f, "forbidden character in opaque path")
            }
            ParseError::DriveLetterHost => {
                write!(f, "file URL host cannot be a Windows drive letter")
            }
        }
    }
}
impl std::error::Error for ParseError {}
impl From<HostParseError> for ParseError {
    fn from(e: HostParseError) -> Self {
        ParseError::Host(e)
    }
}

/// A recoverable anomaly, reported through the violation callback without
/// changing the parse result.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialOrd, PartialEq)]
pub enum ValidationError {
    /// Leading or trailing C0 controls or spaces were stripped.
    StrippedControlOrSpace,
    /// Tab, LF, or CR bytes were removed from the input.
    StrippedTabOrNewline,
    /// A code point that is not a URL code point, or a `%` that does not
    /// start a triplet.
    InvalidUrlUnit,
    /// A special scheme not followed by `//`.
    SpecialSchemeMissingFollowingSolidus,
    /// `\` used where a special URL expects `/`.
    UnexpectedReverseSolidus,
    /// The input includes credentials.
    InvalidCredentials,
    /// Extra slashes before the authority.
    ExtraAuthoritySlashes,
    /// An IPv4 address with a trailing dot.
    Ipv4EmptyPart,
    /// An IPv4 part written in octal or hex.
    Ipv4NonDecimalPart,
    /// A relative file URL starting with a Windows drive letter.
    FileInvalidWindowsDriveLetter,
    /// A file URL whose host looks like a Windows drive letter.
    FileInvalidWindowsDriveLetterHost,
}

/// Why a setter refused to mutate the URL.  The URL is unchanged.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialOrd, PartialEq)]
pub enum SetterError {
    /// The new component value failed to parse.
    Parse(ParseError),
    /// Scheme changes may not cross the special/non-special line, and
    /// `file:` imposes extra constraints.
    SchemeChange,
    /// The operation does not apply to a URL with an opaque path.
    OpaquePath,
    /// The URL cannot carry credentials (no host, empty host, or `file:`).
    CannotHaveCredentials,
    /// The URL cannot carry a port (no host, empty host, or `file:`).
    CannotHavePort,
}
impl Display for SetterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), core::fmt::Error> {
        match self {
            SetterError::Parse(e) => write!(f, "{e}"),
            SetterError::SchemeChange => write!(f, "scheme change not allowed"),
            SetterError::OpaquePath => write!(f, "URL has an opaque path"),
            SetterError::CannotHaveCredentials => {
                write!(f, "URL cannot have username or password")
            }
            SetterError::CannotHavePort => write!(f, "URL cannot have a port"),
        }
    }
}
impl std::error::Error for SetterError {}
impl From<ParseError> for SetterError {
    fn from(e: ParseError) -> Self {
        SetterError::Parse(e)
    }
}
impl From<HostParseError> for SetterError {
    fn from(e: HostParseError) -> Self {
        SetterError::Parse(ParseError::Host(e))
    }
}
