//! The origin of a URL: a (scheme, host, port) tuple or an opaque origin.

use crate::host::Host;
use crate::storage::SchemeKind;
use crate::url::Url;
use core::fmt::{Display, Formatter};

/// A security origin derived from a URL.
///
/// Tuple origins exist for http, https, ws, wss, and ftp URLs; everything
/// else (including `file:`) is opaque.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Origin {
    Opaque,
    Tuple {
        scheme: String,
        host: Host,
        port: Option<u16>,
    },
}
impl Origin {
    #[must_use]
    pub fn is_tuple(&self) -> bool {
        matches!(self, Origin::Tuple { .. })
    }

    /// The ASCII serialization: `scheme://host[:port]`, or `null` for an
    /// opaque origin.
    #[must_use]
    pub fn ascii_serialization(&self) -> String {
        self.to_string()
    }
}
impl Display for Origin {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), core::fmt::Error> {
        match self {
            Origin::Opaque => write!(f, "null"),
            Origin::Tuple {
                scheme,
                host,
                port,
            } => {
                write!(f, "{scheme}://{host}")?;
                if let Some(port) = port {
                    write!(f, ":{port}")?;
                }
                Ok(())
            }
        }
    }
}

impl Url {
    /// Derive this URL's origin.
    #[must_use]
    pub fn origin(&self) -> Origin {
        match self.structure.scheme_kind {
            SchemeKind::Http
            | SchemeKind::Https
            | SchemeKind::Ws
            | SchemeKind::Wss
            | SchemeKind::Ftp => Origin::Tuple {
                scheme: self.scheme().to_string(),
                host: self.host().unwrap_or(Host::Empty),
                port: self.port(),
            },
            SchemeKind::File | SchemeKind::Other => Origin::Opaque,
        }
    }
}
