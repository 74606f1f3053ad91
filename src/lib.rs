//! weburl
//! ======
//!
//! A URL library implementing the contemporary web-platform URL standard:
//! a byte-level parsing state machine producing canonical, normalized URL
//! values, together with the codecs the parser needs — IDNA (with Punycode),
//! IPv4 and IPv6 host parsing, and percent-encoding.
//!
//! # Features
//! - `forbid(unsafe_code)`
//! - One contiguous serialization per URL; getters are slices, mutations are
//!   in-place rewrites
//! - Typed validation warnings that never fail the parse
//! - Host parsing with IDNA (UTS #46), IPv4 shorthand/radix forms, and
//!   RFC 5952 IPv6 serialization
//! - Mutating views: path components and form-urlencoded query parameters
//! - Optional serde support behind the `serde` feature
//!
//! # Limitations
//! - No networking of any kind: this crate only produces and manipulates
//!   URL values.
//! - IDNA mapping data is derived from Unicode character properties at
//!   first use rather than from a vendored copy of the mapping table;
//!   see DESIGN.md for the differences this implies.
//! - ContextJ checking implements the Virama rule only.
//!
//! # Example
//! ```rust
//! use weburl::{Host, Url};
//!
//! let url = Url::parse("https://user@example.org:8080/a/../b?q#top").unwrap();
//! assert_eq!(url.as_str(), "https://user@example.org:8080/b?q#top");
//! assert_eq!(url.host(), Some(Host::Domain("example.org".to_string())));
//! assert_eq!(url.port(), Some(8080));
//!
//! let next = url.join("./c?x=1").unwrap();
//! assert_eq!(next.as_str(), "https://user@example.org:8080/c?x=1");
//! ```
#![forbid(unsafe_code)]

mod ascii;
mod error;
mod host;
mod indexed_table;
mod ipv4;
mod ipv6;
mod origin;
mod parser;
mod path_components;
mod query_params;
mod segmented_line;
mod storage;
mod url;
mod util;

pub mod idna;
pub mod percent;
pub mod punycode;

/// Range-keyed building blocks used to assemble the static IDNA table.
pub mod collections {
    pub use crate::indexed_table::{IndexedTable, INDEX_BITS};
    pub use crate::segmented_line::SegmentedLine;
}

pub use crate::error::{ParseError, SetterError, ValidationError};
pub use crate::host::{Host, HostParseError};
pub use crate::idna::IdnaError;
pub use crate::ipv4::{Ipv4Address, Ipv4ParseError};
pub use crate::ipv6::{Ipv4InIpv6Error, Ipv6Address, Ipv6ParseError};
pub use crate::origin::Origin;
pub use crate::path_components::{PathComponents, PathComponentsMut};
pub use crate::punycode::PunycodeError;
pub use crate::query_params::QueryParamsMut;
pub use crate::url::{ParseOptions, Url};
