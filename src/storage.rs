//! The compact URL representation: one contiguous ASCII serialization plus a
//! [`Structure`] of byte offsets and flags locating every component, and the
//! rewriter every mutation routes through.
//!
//! A rewrite splices the replacement into the serialization between the
//! unchanged prefix and suffix, then shifts the offsets that follow.  Setters
//! that can change more than one component re-enter the parser instead
//! (see [`parser`](crate::parser)).

use crate::host::Host;
use crate::ipv4::Ipv4Address;
use crate::ipv6::Ipv6Address;
use crate::url::Url;

/// The scheme, classified.  Special schemes get strict authority and host
/// rules and carry default ports.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialOrd, PartialEq)]
pub(crate) enum SchemeKind {
    Http,
    Https,
    Ws,
    Wss,
    Ftp,
    File,
    Other,
}
impl SchemeKind {
    pub(crate) fn from_scheme(scheme: &str) -> SchemeKind {
        match scheme {
            "http" => SchemeKind::Http,
            "https" => SchemeKind::Https,
            "ws" => SchemeKind::Ws,
            "wss" => SchemeKind::Wss,
            "ftp" => SchemeKind::Ftp,
            "file" => SchemeKind::File,
            _ => SchemeKind::Other,
        }
    }

    pub(crate) fn is_special(self) -> bool {
        self != SchemeKind::Other
    }

    pub(crate) fn default_port(self) -> Option<u16> {
        match self {
            SchemeKind::Http | SchemeKind::Ws => Some(80),
            SchemeKind::Https | SchemeKind::Wss => Some(443),
            SchemeKind::Ftp => Some(21),
            SchemeKind::File | SchemeKind::Other => None,
        }
    }
}

/// What kind of host the serialization's host range holds.  The numeric
/// variants keep the parsed address so getters never re-parse.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum HostKind {
    /// No authority at all.
    None,
    Empty,
    Domain,
    Ipv4(Ipv4Address),
    Ipv6(Ipv6Address),
    Opaque,
}

/// Byte offsets of every component inside the serialization, plus flags.
///
/// Component layout, in order:
/// `scheme ":" ["//" [username [":" password] "@"] host [":" port]] path
/// ["?" query] ["#" fragment]`
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Structure {
    /// Offset of the `:` after the scheme.
    pub scheme_end: u32,
    /// End of the username; equals `authority_start` when there are no
    /// credentials.
    pub username_end: u32,
    /// First byte of the host; when credentials are present the byte before
    /// it is `@`.
    pub host_start: u32,
    pub host_end: u32,
    pub host_kind: HostKind,
    pub port: Option<u16>,
    /// First byte of the path (or of the opaque path).
    pub path_start: u32,
    /// Offset of `?`, when a query is present.
    pub query_start: Option<u32>,
    /// Offset of `#`, when a fragment is present.
    pub fragment_start: Option<u32>,
    pub scheme_kind: SchemeKind,
    pub has_opaque_path: bool,
    pub path_segment_count: u32,
}
impl Structure {
    pub(crate) fn new() -> Structure {
        Structure {
            scheme_end: 0,
            username_end: 0,
            host_start: 0,
            host_end: 0,
            host_kind: HostKind::None,
            port: None,
            path_start: 0,
            query_start: None,
            fragment_start: None,
            scheme_kind: SchemeKind::Other,
            has_opaque_path: false,
            path_segment_count: 0,
        }
    }

    pub(crate) fn is_special(&self) -> bool {
        self.scheme_kind.is_special()
    }

    pub(crate) fn has_authority(&self) -> bool {
        self.host_kind != HostKind::None
    }

    pub(crate) fn authority_start(&self) -> u32 {
        debug_assert!(self.has_authority());
        self.scheme_end + 3
    }

    pub(crate) fn has_credentials(&self) -> bool {
        self.has_authority() && self.host_start > self.authority_start()
    }

    /// End of the path region.
    pub(crate) fn path_end(&self, serialization_len: usize) -> u32 {
        self.query_start
            .or(self.fragment_start)
            .unwrap_or(serialization_len as u32)
    }

    /// Whether username/password/port may be attached per the URL standard.
    pub(crate) fn cannot_have_credentials_or_port(&self) -> bool {
        !self.has_authority()
            || self.host_kind == HostKind::Empty
            || self.scheme_kind == SchemeKind::File
    }
}

fn shift(offset: &mut u32, boundary: u32, delta: i64) {
    if *offset >= boundary {
        *offset = (i64::from(*offset) + delta) as u32;
    }
}

fn shift_opt(offset: &mut Option<u32>, boundary: u32, delta: i64) {
    if let Some(offset) = offset {
        shift(offset, boundary, delta);
    }
}

/// The rewriter.  Every method replaces exactly one region of the
/// serialization and fixes the offsets behind it.
impl Url {
    fn splice(&mut self, range: core::ops::Range<usize>, replacement: &str) -> i64 {
        let removed = range.len() as i64;
        self.serialization.replace_range(range, replacement);
        replacement.len() as i64 - removed
    }

    pub(crate) fn rewrite_scheme(&mut self, scheme: &str, kind: SchemeKind) {
        let old_end = self.structure.scheme_end;
        let delta = self.splice(0..old_end as usize, scheme);
        self.structure.scheme_end = scheme.len() as u32;
        self.structure.scheme_kind = kind;
        let boundary = old_end + 1;
        shift(&mut self.structure.username_end, boundary, delta);
        shift(&mut self.structure.host_start, boundary, delta);
        shift(&mut self.structure.host_end, boundary, delta);
        shift(&mut self.structure.path_start, boundary, delta);
        shift_opt(&mut self.structure.query_start, boundary, delta);
        shift_opt(&mut self.structure.fragment_start, boundary, delta);
    }

    pub(crate) fn rewrite_host(&mut self, host: &Host) {
        let kind = match host {
            Host::Domain(_) => HostKind::Domain,
            Host::Ipv4(addr) => HostKind::Ipv4(*addr),
            Host::Ipv6(addr) => HostKind::Ipv6(*addr),
            Host::Opaque(_) => HostKind::Opaque,
            Host::Empty => HostKind::Empty,
        };
        self.rewrite_host_raw(&host.to_string(), kind);
    }

    pub(crate) fn rewrite_host_raw(&mut self, text: &str, kind: HostKind) {
        if self.structure.has_authority() {
            let old_start = self.structure.host_start;
            let old_end = self.structure.host_end;
            let delta = self.splice(old_start as usize..old_end as usize, text);
            self.structure.host_end = old_start + text.len() as u32;
            self.structure.host_kind = kind;
            shift(&mut self.structure.path_start, old_end, delta);
            shift_opt(&mut self.structure.query_start, old_end, delta);
            shift_opt(&mut self.structure.fragment_start, old_end, delta);
        } else {
            // Creating the authority: insert `//` plus the host after the
            // scheme.
            let insert_at = self.structure.scheme_end + 1;
            let inserted = format!("//{text}");
            self.serialization.insert_str(insert_at as usize, &inserted);
            let delta = inserted.len() as i64;
            shift(&mut self.structure.path_start, insert_at, delta);
            shift_opt(&mut self.structure.query_start, insert_at, delta);
            shift_opt(&mut self.structure.fragment_start, insert_at, delta);
            self.structure.username_end = insert_at + 2;
            self.structure.host_start = insert_at + 2;
            self.structure.host_end = insert_at + 2 + text.len() as u32;
            self.structure.host_kind = kind;
        }
    }

    pub(crate) fn rewrite_port(&mut self, port: Option<u16>) {
        let start = self.structure.host_end;
        let end = self.structure.path_start.max(start);
        let text = match port {
            Some(port) => format!(":{port}"),
            None => String::new(),
        };
        let delta = self.splice(start as usize..end as usize, &text);
        self.structure.port = port;
        shift(&mut self.structure.path_start, end, delta);
        shift_opt(&mut self.structure.query_start, end, delta);
        shift_opt(&mut self.structure.fragment_start, end, delta);
    }

    /// Replace the credentials region (`username[:password]@`, possibly
    /// empty) with the already-encoded values.
    pub(crate) fn rewrite_userinfo(&mut self, username: &str, password: &str) {
        debug_assert!(self.structure.has_authority());
        let start = self.structure.authority_start();
        let end = self.structure.host_start;
        let mut text = String::new();
        if !username.is_empty() || !password.is_empty() {
            text.push_str(username);
            if !password.is_empty() {
                text.push(':');
                text.push_str(password);
            }
            text.push('@');
        }
        let delta = self.splice(start as usize..end as usize, &text);
        self.structure.username_end = if text.is_empty() {
            start
        } else {
            start + username.len() as u32
        };
        shift(&mut self.structure.host_start, end, delta);
        shift(&mut self.structure.host_end, end, delta);
        shift(&mut self.structure.path_start, end, delta);
        shift_opt(&mut self.structure.query_start, end, delta);
        shift_opt(&mut self.structure.fragment_start, end, delta);
    }

    /// Append one path segment (already percent-encoded) at the end of the
    /// path region.
    pub(crate) fn path_append_segment(&mut self, segment: &str) {
        debug_assert!(!self.structure.has_opaque_path);
        let at = self.structure.path_end(self.serialization.len());
        let text = format!("/{segment}");
        self.serialization.insert_str(at as usize, &text);
        let delta = text.len() as i64;
        shift_opt(&mut self.structure.query_start, at, delta);
        shift_opt(&mut self.structure.fragment_start, at, delta);
        self.structure.path_segment_count += 1;
    }

    /// Remove the last path segment, unless the path is a lone `file:`
    /// drive letter.
    pub(crate) fn path_shorten(&mut self) {
        if self.structure.path_segment_count == 0 {
            return;
        }
        if self.structure.scheme_kind == SchemeKind::File
            && self.structure.path_segment_count == 1
            && self
                .first_path_segment()
                .is_some_and(|s| crate::ascii::is_normalized_windows_drive_letter(&s))
        {
            return;
        }
        let start = self.structure.path_start as usize;
        let end = self.structure.path_end(self.serialization.len()) as usize;
        let Some(last_slash) = self.serialization[start..end].rfind('/') else {
            return;
        };
        let cut = start + last_slash;
        let delta = self.splice(cut..end, "");
        shift_opt(&mut self.structure.query_start, end as u32, delta);
        shift_opt(&mut self.structure.fragment_start, end as u32, delta);
        self.structure.path_segment_count -= 1;
        if self.structure.path_segment_count == 0 {
            // Drop a now-orphaned `/.` marker.
            self.path_clear();
        }
    }

    pub(crate) fn path_clear(&mut self) {
        let start = self.structure.path_start as usize;
        let end = self.structure.path_end(self.serialization.len()) as usize;
        let delta = self.splice(start..end, "");
        shift_opt(&mut self.structure.query_start, end as u32, delta);
        shift_opt(&mut self.structure.fragment_start, end as u32, delta);
        self.structure.path_segment_count = 0;
    }

    pub(crate) fn first_path_segment(&self) -> Option<String> {
        if self.structure.has_opaque_path || self.structure.path_segment_count == 0 {
            return None;
        }
        let start = self.structure.path_start as usize;
        let end = self.structure.path_end(self.serialization.len()) as usize;
        let path = &self.serialization[start..end];
        let tail = path.strip_prefix('/')?;
        Some(tail.split('/').next().unwrap_or("").to_string())
    }

    /// Insert already-encoded query text before the fragment.  The `?` must
    /// already be in place.
    pub(crate) fn append_query_text(&mut self, text: &str) {
        debug_assert!(self.structure.query_start.is_some());
        if text.is_empty() {
            return;
        }
        let at = self
            .structure
            .fragment_start
            .unwrap_or(self.serialization.len() as u32);
        self.serialization.insert_str(at as usize, text);
        shift_opt(&mut self.structure.fragment_start, at, text.len() as i64);
    }

    /// Replace or remove the whole query component.  `encoded` excludes the
    /// `?`.
    pub(crate) fn rewrite_query(&mut self, encoded: Option<&str>) {
        let end = self
            .structure
            .fragment_start
            .unwrap_or(self.serialization.len() as u32);
        match (self.structure.query_start, encoded) {
            (Some(start), Some(text)) => {
                let delta = self.splice(start as usize + 1..end as usize, text);
                shift_opt(&mut self.structure.fragment_start, end, delta);
            }
            (Some(start), None) => {
                let delta = self.splice(start as usize..end as usize, "");
                self.structure.query_start = None;
                shift_opt(&mut self.structure.fragment_start, end, delta);
            }
            (None, Some(text)) => {
                let inserted = format!("?{text}");
                self.serialization.insert_str(end as usize, &inserted);
                self.structure.query_start = Some(end);
                shift_opt(&mut self.structure.fragment_start, end, inserted.len() as i64);
            }
            (None, None) => {}
        }
    }

    /// Replace or remove the whole fragment component.  `encoded` excludes
    /// the `#`.
    pub(crate) fn rewrite_fragment(&mut self, encoded: Option<&str>) {
        match (self.structure.fragment_start, encoded) {
            (Some(start), Some(text)) => {
                let len = self.serialization.len();
                self.splice(start as usize + 1..len, text);
            }
            (Some(start), None) => {
                self.serialization.truncate(start as usize);
                self.structure.fragment_start = None;
            }
            (None, Some(text)) => {
                self.structure.fragment_start = Some(self.serialization.len() as u32);
                self.serialization.push('#');
                self.serialization.push_str(text);
            }
            (None, None) => {}
        }
    }

    /// A hierarchical path starting `//` on a URL without an authority
    /// serializes behind a `/.` marker so it re-parses unambiguously.  When
    /// a mutation adds an authority, a stale marker is removed again.
    pub(crate) fn apply_path_marker(&mut self) {
        if self.structure.has_opaque_path {
            return;
        }
        let start = self.structure.path_start as usize;
        let end = self.structure.path_end(self.serialization.len()) as usize;
        let path = &self.serialization[start..end];
        // Dot segments never survive normalization, so a `/./` prefix can
        // only be the marker.
        let has_marker = path.starts_with("/./");
        if self.structure.has_authority() {
            if has_marker {
                let delta = self.splice(start..start + 2, "");
                shift_opt(&mut self.structure.query_start, start as u32, delta);
                shift_opt(&mut self.structure.fragment_start, start as u32, delta);
            }
        } else if !has_marker && path.starts_with("//") {
            self.serialization.insert_str(start, "/.");
            shift_opt(&mut self.structure.query_start, start as u32, 2);
            shift_opt(&mut self.structure.fragment_start, start as u32, 2);
        }
    }
}
