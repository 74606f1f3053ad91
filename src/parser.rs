//! The URL parser: a state machine over the filtered input bytes.
//!
//! `run` starts at [`State::SchemeStart`] for a full parse, or at the state a
//! setter re-enters to re-parse a single component (the "state override").
//! Each state is a method that consumes what it needs from the input and
//! returns the next state; the serialization and its [`Structure`] offsets
//! are built through the rewriting helpers on [`Url`].

use crate::ascii::{
    is_ascii_tab_or_newline, is_c0_control_or_space, is_double_dot_segment, is_single_dot_segment,
    is_url_code_point, is_windows_drive_letter, starts_with_windows_drive_letter,
};
use crate::error::{ParseError, ValidationError};
use crate::host::Host;
use crate::percent::{percent_encode_byte_to, EncodeSet};
use crate::storage::{HostKind, SchemeKind, Structure};
use crate::url::Url;

/// Parser states.  `Hostname` is `Host` that refuses a port; it is only
/// entered through the hostname setter's state override.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum State {
    SchemeStart,
    NoScheme,
    SpecialRelativeOrAuthority,
    PathOrAuthority,
    Relative,
    RelativeSlash,
    SpecialAuthoritySlashes,
    SpecialAuthorityIgnoreSlashes,
    Authority,
    Host,
    Hostname,
    Port,
    File,
    FileSlash,
    FileHost,
    PathStart,
    Path,
    OpaquePath,
    Query,
    Fragment,
    Done,
}

pub(crate) struct Parser<'a> {
    pub base: Option<&'a Url>,
    pub vfn: Option<&'a dyn Fn(ValidationError)>,
}
impl<'a> Parser<'a> {
    pub(crate) fn new(base: Option<&'a Url>, vfn: Option<&'a dyn Fn(ValidationError)>) -> Self {
        Self { base, vfn }
    }

    fn warn(&self, error: ValidationError) {
        if let Some(cb) = self.vfn {
            cb(error);
        }
    }

    /// Full parse of `input`, with the standard preprocessing: strip leading
    /// and trailing C0 controls and spaces, remove tabs and newlines.
    pub(crate) fn parse_url(&self, input: &str) -> Result<Url, ParseError> {
        let trimmed = input.trim_matches(|c: char| is_c0_control_or_space_char(c));
        if trimmed.len() != input.len() {
            self.warn(ValidationError::StrippedControlOrSpace);
        }
        let filtered: String = if trimmed.bytes().any(is_ascii_tab_or_newline) {
            self.warn(ValidationError::StrippedTabOrNewline);
            trimmed
                .chars()
                .filter(|&c| !matches!(c, '\t' | '\n' | '\r'))
                .collect()
        } else {
            trimmed.to_string()
        };
        let url = Url {
            serialization: String::new(),
            structure: Structure::new(),
        };
        self.run(&filtered, url, None)
    }

    /// Run the machine over `input`, starting from `state_override` when a
    /// setter re-enters mid-way, on top of `url` (empty for a full parse, a
    /// copy of the target for setters; the copy is returned mutated only on
    /// success).
    pub(crate) fn run(
        &self,
        input: &str,
        url: Url,
        state_override: Option<State>,
    ) -> Result<Url, ParseError> {
        let mut run = Run {
            parser: self,
            url,
            input,
            bytes: input.as_bytes(),
            i: 0,
            state_override,
            path_begun: state_override.is_some(),
        };
        let mut state = state_override.unwrap_or(State::SchemeStart);
        while state != State::Done {
            state = match state {
                State::SchemeStart => run.scheme_start()?,
                State::NoScheme => run.no_scheme()?,
                State::SpecialRelativeOrAuthority => run.special_relative_or_authority()?,
                State::PathOrAuthority => run.path_or_authority()?,
                State::Relative => run.relative()?,
                State::RelativeSlash => run.relative_slash()?,
                State::SpecialAuthoritySlashes => run.special_authority_slashes()?,
                State::SpecialAuthorityIgnoreSlashes => run.special_authority_ignore_slashes()?,
                State::Authority => run.authority()?,
                State::Host | State::Hostname => run.host()?,
                State::Port => run.port()?,
                State::File => run.file()?,
                State::FileSlash => run.file_slash()?,
                State::FileHost => run.file_host()?,
                State::PathStart => run.path_start()?,
                State::Path => run.path()?,
                State::OpaquePath => run.opaque_path()?,
                State::Query => run.query()?,
                State::Fragment => run.fragment()?,
                State::Done => State::Done,
            };
        }
        let mut url = run.url;
        url.apply_path_marker();
        Ok(url)
    }
}

fn is_c0_control_or_space_char(c: char) -> bool {
    c.is_ascii() && is_c0_control_or_space(c as u8)
}

struct Run<'a, 'p> {
    parser: &'p Parser<'a>,
    url: Url,
    input: &'p str,
    bytes: &'p [u8],
    i: usize,
    state_override: Option<State>,
    path_begun: bool,
}
impl Run<'_, '_> {
    fn warn(&self, error: ValidationError) {
        self.parser.warn(error);
    }

    fn c(&self) -> Option<u8> {
        self.bytes.get(self.i).copied()
    }

    fn remaining(&self) -> &[u8] {
        &self.bytes[self.i.min(self.bytes.len())..]
    }

    fn special(&self) -> bool {
        self.url.structure.is_special()
    }

    fn overridden(&self) -> bool {
        self.state_override.is_some()
    }

    /// Mark where the path region begins, once.
    fn begin_path(&mut self) {
        if !self.path_begun {
            self.url.structure.path_start = self.url.serialization.len() as u32;
            self.path_begun = true;
        }
    }

    fn begin_query(&mut self) {
        self.url.structure.query_start = Some(self.url.serialization.len() as u32);
        self.url.serialization.push('?');
    }

    fn begin_fragment(&mut self) {
        self.url.structure.fragment_start = Some(self.url.serialization.len() as u32);
        self.url.serialization.push('#');
    }

    /// Write `base`'s scheme when the no-scheme path inherits it.
    fn inherit_scheme(&mut self, base: &Url) {
        if self.url.serialization.is_empty() {
            self.url.serialization.push_str(base.scheme());
            self.url.serialization.push(':');
            self.url.structure.scheme_end = base.structure.scheme_end;
            self.url.structure.scheme_kind = base.structure.scheme_kind;
        }
        debug_assert_eq!(self.url.structure.scheme_end, base.structure.scheme_end);
    }

    /// Copy username, password, host, and port from `base`.  The schemes are
    /// byte-identical, so the offsets transfer as-is.
    fn copy_authority(&mut self, base: &Url) {
        if base.structure.has_authority() {
            self.url.serialization.push_str("//");
            let span = base.structure.authority_start() as usize..base.structure.path_start as usize;
            self.url.serialization.push_str(&base.serialization[span]);
            self.url.structure.username_end = base.structure.username_end;
            self.url.structure.host_start = base.structure.host_start;
            self.url.structure.host_end = base.structure.host_end;
            self.url.structure.host_kind = base.structure.host_kind;
            self.url.structure.port = base.structure.port;
        }
    }

    fn copy_path(&mut self, base: &Url) {
        self.url.structure.path_start = self.url.serialization.len() as u32;
        self.path_begun = true;
        let span = base.structure.path_start as usize
            ..base.structure.path_end(base.serialization.len()) as usize;
        self.url.serialization.push_str(&base.serialization[span]);
        self.url.structure.path_segment_count = base.structure.path_segment_count;
        self.url.structure.has_opaque_path = base.structure.has_opaque_path;
    }

    fn copy_query(&mut self, base: &Url) {
        if let Some(query_start) = base.structure.query_start {
            let end = base
                .structure
                .fragment_start
                .unwrap_or(base.serialization.len() as u32);
            self.url.structure.query_start = Some(self.url.serialization.len() as u32);
            self.url
                .serialization
                .push_str(&base.serialization[query_start as usize..end as usize]);
        }
    }

    /// Scheme start and scheme states.
    fn scheme_start(&mut self) -> Result<State, ParseError> {
        debug_assert!(!self.overridden(), "scheme setter rewrites directly");
        if !self.c().is_some_and(|b| b.is_ascii_alphabetic()) {
            self.i = 0;
            return Ok(State::NoScheme);
        }
        let mut buffer = String::new();
        loop {
            match self.c() {
                Some(b) if b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.') => {
                    buffer.push(b.to_ascii_lowercase() as char);
                    self.i += 1;
                }
                Some(b':') => {
                    self.i += 1;
                    break;
                }
                _ => {
                    self.i = 0;
                    return Ok(State::NoScheme);
                }
            }
        }
        let kind = SchemeKind::from_scheme(&buffer);
        self.url.serialization.push_str(&buffer);
        self.url.structure.scheme_end = buffer.len() as u32;
        self.url.serialization.push(':');
        self.url.structure.scheme_kind = kind;
        if kind == SchemeKind::File {
            if !self.remaining().starts_with(b"//") {
                self.warn(ValidationError::SpecialSchemeMissingFollowingSolidus);
            }
            return Ok(State::File);
        }
        if kind.is_special() {
            if let Some(base) = self.parser.base {
                if base.scheme() == buffer {
                    return Ok(State::SpecialRelativeOrAuthority);
                }
            }
            return Ok(State::SpecialAuthoritySlashes);
        }
        if self.remaining().first() == Some(&b'/') {
            self.i += 1;
            return Ok(State::PathOrAuthority);
        }
        self.url.structure.has_opaque_path = true;
        self.begin_path();
        Ok(State::OpaquePath)
    }

    fn no_scheme(&mut self) -> Result<State, ParseError> {
        let Some(base) = self.parser.base else {
            return Err(ParseError::MissingScheme);
        };
        if base.has_opaque_path() {
            if self.c() != Some(b'#') {
                return Err(ParseError::InvalidBase);
            }
            self.inherit_scheme(base);
            self.copy_path(base);
            self.copy_query(base);
            self.begin_fragment();
            self.i += 1;
            return Ok(State::Fragment);
        }
        if base.structure.scheme_kind == SchemeKind::File {
            Ok(State::File)
        } else {
            Ok(State::Relative)
        }
    }

    fn special_relative_or_authority(&mut self) -> Result<State, ParseError> {
        if self.c() == Some(b'/') && self.remaining().get(1) == Some(&b'/') {
            self.i += 2;
            Ok(State::SpecialAuthorityIgnoreSlashes)
        } else {
            self.warn(ValidationError::SpecialSchemeMissingFollowingSolidus);
            Ok(State::Relative)
        }
    }

    fn path_or_authority(&mut self) -> Result<State, ParseError> {
        if self.c() == Some(b'/') {
            self.i += 1;
            Ok(State::Authority)
        } else {
            self.begin_path();
            Ok(State::Path)
        }
    }

    fn relative(&mut self) -> Result<State, ParseError> {
        let Some(base) = self.parser.base else {
            return Err(ParseError::MissingScheme);
        };
        debug_assert!(base.structure.scheme_kind != SchemeKind::File);
        self.inherit_scheme(base);
        match self.c() {
            Some(b'/') => {
                self.i += 1;
                Ok(State::RelativeSlash)
            }
            Some(b'\\') if self.special() => {
                self.warn(ValidationError::UnexpectedReverseSolidus);
                self.i += 1;
                Ok(State::RelativeSlash)
            }
            c => {
                self.copy_authority(base);
                self.copy_path(base);
                match c {
                    Some(b'?') => {
                        self.begin_query();
                        self.i += 1;
                        Ok(State::Query)
                    }
                    Some(b'#') => {
                        self.copy_query(base);
                        self.begin_fragment();
                        self.i += 1;
                        Ok(State::Fragment)
                    }
                    None => {
                        self.copy_query(base);
                        Ok(State::Done)
                    }
                    Some(_) => {
                        self.url.path_shorten();
                        Ok(State::Path)
                    }
                }
            }
        }
    }

    fn relative_slash(&mut self) -> Result<State, ParseError> {
        let Some(base) = self.parser.base else {
            return Err(ParseError::MissingScheme);
        };
        match self.c() {
            Some(b'/') if self.special() => {
                self.i += 1;
                Ok(State::SpecialAuthorityIgnoreSlashes)
            }
            Some(b'\\') if self.special() => {
                self.warn(ValidationError::UnexpectedReverseSolidus);
                self.i += 1;
                Ok(State::SpecialAuthorityIgnoreSlashes)
            }
            Some(b'/') => {
                self.i += 1;
                Ok(State::Authority)
            }
            _ => {
                self.copy_authority(base);
                self.begin_path();
                Ok(State::Path)
            }
        }
    }

    fn special_authority_slashes(&mut self) -> Result<State, ParseError> {
        if self.c() == Some(b'/') && self.remaining().get(1) == Some(&b'/') {
            self.i += 2;
        } else {
            self.warn(ValidationError::SpecialSchemeMissingFollowingSolidus);
        }
        Ok(State::SpecialAuthorityIgnoreSlashes)
    }

    fn special_authority_ignore_slashes(&mut self) -> Result<State, ParseError> {
        while matches!(self.c(), Some(b'/') | Some(b'\\')) {
            self.warn(ValidationError::ExtraAuthoritySlashes);
            self.i += 1;
        }
        Ok(State::Authority)
    }

    /// Userinfo accumulation: everything up to the last unescaped `@` is
    /// credentials; later `@`s are percent-encoded into them.
    fn authority(&mut self) -> Result<State, ParseError> {
        self.url.serialization.push_str("//");
        let authority_start = self.url.serialization.len() as u32;
        self.url.structure.username_end = authority_start;
        let mut username = String::new();
        let mut password = String::new();
        let mut at_sign_seen = false;
        let mut password_token_seen = false;
        let content_start = self.i;
        let mut host_begin = self.i;
        let mut buffer_start = self.i;
        loop {
            let c = self.c();
            let terminator = match c {
                None | Some(b'/') | Some(b'?') | Some(b'#') => true,
                Some(b'\\') if self.special() => true,
                _ => false,
            };
            if terminator {
                if at_sign_seen && buffer_start == self.i {
                    return Err(ParseError::EmptyHost);
                }
                if at_sign_seen && (!username.is_empty() || !password.is_empty()) {
                    self.url.serialization.push_str(&username);
                    self.url.structure.username_end =
                        authority_start + username.len() as u32;
                    if !password.is_empty() {
                        self.url.serialization.push(':');
                        self.url.serialization.push_str(&password);
                    }
                    self.url.serialization.push('@');
                }
                self.i = if at_sign_seen { host_begin } else { content_start };
                let len = self.url.serialization.len() as u32;
                self.url.structure.host_start = len;
                self.url.structure.host_end = len;
                self.url.structure.host_kind = HostKind::Empty;
                return Ok(State::Host);
            }
            if c == Some(b'@') {
                self.warn(ValidationError::InvalidCredentials);
                let mut pending = Vec::new();
                if at_sign_seen {
                    pending.extend_from_slice(b"%40");
                }
                pending.extend_from_slice(&self.bytes[buffer_start..self.i]);
                for &byte in &pending {
                    if byte == b':' && !password_token_seen {
                        password_token_seen = true;
                        continue;
                    }
                    let sink = if password_token_seen {
                        &mut password
                    } else {
                        &mut username
                    };
                    percent_encode_byte_to(byte, EncodeSet::Userinfo, sink);
                }
                at_sign_seen = true;
                self.i += 1;
                host_begin = self.i;
                buffer_start = self.i;
                continue;
            }
            self.i += 1;
        }
    }

    fn host(&mut self) -> Result<State, ParseError> {
        if self.overridden() && self.url.structure.scheme_kind == SchemeKind::File {
            return Ok(State::FileHost);
        }
        let mut inside_brackets = false;
        let host_input_start = self.i;
        loop {
            let c = self.c();
            match c {
                Some(b':') if !inside_brackets => {
                    let buffer = &self.input[host_input_start..self.i];
                    if buffer.is_empty() {
                        return Err(ParseError::EmptyHost);
                    }
                    if self.state_override == Some(State::Hostname) {
                        return Err(ParseError::Host(
                            crate::host::HostParseError::InvalidCharacter(':'),
                        ));
                    }
                    self.parse_and_set_host(buffer)?;
                    self.i += 1;
                    return Ok(State::Port);
                }
                None | Some(b'/') | Some(b'?') | Some(b'#') => {
                    return self.finish_host(host_input_start);
                }
                Some(b'\\') if self.special() => {
                    return self.finish_host(host_input_start);
                }
                Some(b'[') => {
                    inside_brackets = true;
                    self.i += 1;
                }
                Some(b']') => {
                    inside_brackets = false;
                    self.i += 1;
                }
                Some(_) => self.i += 1,
            }
        }
    }

    fn finish_host(&mut self, host_input_start: usize) -> Result<State, ParseError> {
        let buffer = &self.input[host_input_start..self.i];
        if self.special() && buffer.is_empty() {
            return Err(ParseError::EmptyHost);
        }
        if self.overridden()
            && buffer.is_empty()
            && (self.url.structure.has_credentials() || self.url.structure.port.is_some())
        {
            return Err(ParseError::EmptyHost);
        }
        self.parse_and_set_host(buffer)?;
        if self.overridden() {
            return Ok(State::Done);
        }
        self.begin_path_after_authority();
        Ok(State::PathStart)
    }

    fn parse_and_set_host(&mut self, buffer: &str) -> Result<(), ParseError> {
        let host = Host::parse_with(buffer, self.special(), self.parser.vfn)?;
        self.url.rewrite_host(&host);
        Ok(())
    }

    fn begin_path_after_authority(&mut self) {
        self.url.structure.path_start = self.url.serialization.len() as u32;
        self.path_begun = true;
    }

    fn port(&mut self) -> Result<State, ParseError> {
        let mut digits = String::new();
        loop {
            let c = self.c();
            match c {
                Some(b) if b.is_ascii_digit() => {
                    digits.push(b as char);
                    self.i += 1;
                }
                None | Some(b'/') | Some(b'?') | Some(b'#') => break,
                Some(b'\\') if self.special() => break,
                _ if self.overridden() => break,
                _ => return Err(ParseError::InvalidPort),
            }
        }
        if !digits.is_empty() {
            let value: u32 = digits.parse().map_err(|_| ParseError::InvalidPort)?;
            let value = u16::try_from(value).map_err(|_| ParseError::InvalidPort)?;
            let port = if Some(value) == self.url.structure.scheme_kind.default_port() {
                None
            } else {
                Some(value)
            };
            self.url.rewrite_port(port);
        }
        if self.overridden() {
            return Ok(State::Done);
        }
        self.begin_path_after_authority();
        Ok(State::PathStart)
    }

    fn file(&mut self) -> Result<State, ParseError> {
        if let Some(base) = self.parser.base {
            if self.url.serialization.is_empty() && base.structure.scheme_kind == SchemeKind::File {
                self.inherit_scheme(base);
            }
        }
        if self.url.serialization.is_empty() {
            self.url.serialization.push_str("file:");
            self.url.structure.scheme_end = 4;
            self.url.structure.scheme_kind = SchemeKind::File;
        }
        // A file URL always has an authority; default to the empty host.
        self.url.serialization.push_str("//");
        let len = self.url.serialization.len() as u32;
        self.url.structure.username_end = len;
        self.url.structure.host_start = len;
        self.url.structure.host_end = len;
        self.url.structure.host_kind = HostKind::Empty;
        match self.c() {
            Some(b'/') => {
                self.i += 1;
                Ok(State::FileSlash)
            }
            Some(b'\\') => {
                self.warn(ValidationError::UnexpectedReverseSolidus);
                self.i += 1;
                Ok(State::FileSlash)
            }
            c => {
                let base = self
                    .parser
                    .base
                    .filter(|b| b.structure.scheme_kind == SchemeKind::File);
                let Some(base) = base else {
                    self.begin_path();
                    return Ok(State::Path);
                };
                self.copy_host_from(base);
                self.copy_path(base);
                match c {
                    Some(b'?') => {
                        self.begin_query();
                        self.i += 1;
                        Ok(State::Query)
                    }
                    Some(b'#') => {
                        self.copy_query(base);
                        self.begin_fragment();
                        self.i += 1;
                        Ok(State::Fragment)
                    }
                    None => {
                        self.copy_query(base);
                        Ok(State::Done)
                    }
                    Some(_) => {
                        if starts_with_windows_drive_letter(self.remaining()) {
                            self.warn(ValidationError::FileInvalidWindowsDriveLetter);
                            self.url.path_clear();
                        } else {
                            self.url.path_shorten();
                        }
                        Ok(State::Path)
                    }
                }
            }
        }
    }

    fn copy_host_from(&mut self, base: &Url) {
        let span = base.structure.host_start as usize..base.structure.host_end as usize;
        let text = base.serialization[span].to_string();
        self.url.rewrite_host_raw(&text, base.structure.host_kind);
    }

    fn file_slash(&mut self) -> Result<State, ParseError> {
        match self.c() {
            Some(b'/') => {
                self.i += 1;
                Ok(State::FileHost)
            }
            Some(b'\\') => {
                self.warn(ValidationError::UnexpectedReverseSolidus);
                self.i += 1;
                Ok(State::FileHost)
            }
            _ => {
                if let Some(base) = self
                    .parser
                    .base
                    .filter(|b| b.structure.scheme_kind == SchemeKind::File)
                {
                    self.copy_host_from(base);
                    if !starts_with_windows_drive_letter(self.remaining()) {
                        if let Some(first) = base.first_path_segment() {
                            if crate::ascii::is_normalized_windows_drive_letter(&first) {
                                self.begin_path();
                                self.url.path_append_segment(&first);
                            }
                        }
                    }
                }
                self.begin_path();
                Ok(State::Path)
            }
        }
    }

    fn file_host(&mut self) -> Result<State, ParseError> {
        let host_input_start = self.i;
        loop {
            match self.c() {
                None | Some(b'/') | Some(b'\\') | Some(b'?') | Some(b'#') => break,
                Some(_) => self.i += 1,
            }
        }
        let buffer = &self.input[host_input_start..self.i];
        if is_windows_drive_letter(buffer.as_bytes()) {
            if self.overridden() {
                return Err(ParseError::DriveLetterHost);
            }
            self.warn(ValidationError::FileInvalidWindowsDriveLetterHost);
            self.i = host_input_start;
            self.begin_path();
            return Ok(State::Path);
        }
        if buffer.is_empty() {
            self.url.rewrite_host(&Host::Empty);
        } else {
            let host = Host::parse_with(buffer, true, self.parser.vfn)?;
            let host = match host {
                Host::Domain(name) if name == "localhost" => Host::Empty,
                other => other,
            };
            self.url.rewrite_host(&host);
        }
        if self.overridden() {
            return Ok(State::Done);
        }
        self.begin_path_after_authority();
        Ok(State::PathStart)
    }

    fn path_start(&mut self) -> Result<State, ParseError> {
        self.begin_path();
        if self.special() {
            if self.c() == Some(b'\\') {
                self.warn(ValidationError::UnexpectedReverseSolidus);
            }
            if matches!(self.c(), Some(b'/') | Some(b'\\')) {
                self.i += 1;
            }
            return Ok(State::Path);
        }
        match self.c() {
            Some(b'?') if !self.overridden() => {
                self.begin_query();
                self.i += 1;
                Ok(State::Query)
            }
            Some(b'#') if !self.overridden() => {
                self.begin_fragment();
                self.i += 1;
                Ok(State::Fragment)
            }
            Some(b'/') => {
                self.i += 1;
                Ok(State::Path)
            }
            Some(_) => Ok(State::Path),
            None => {
                if self.overridden() && !self.url.structure.has_authority() {
                    self.url.path_append_segment("");
                }
                Ok(State::Done)
            }
        }
    }

    fn path(&mut self) -> Result<State, ParseError> {
        self.begin_path();
        let mut buffer = String::new();
        loop {
            let c = self.c();
            let slash_like = c == Some(b'/') || (self.special() && c == Some(b'\\'));
            let terminator = c.is_none()
                || slash_like
                || (!self.overridden() && matches!(c, Some(b'?') | Some(b'#')));
            if !terminator {
                let byte = c.unwrap_or_default();
                self.check_url_unit(byte);
                percent_encode_byte_to(byte, EncodeSet::Path, &mut buffer);
                self.i += 1;
                continue;
            }
            if c == Some(b'\\') {
                self.warn(ValidationError::UnexpectedReverseSolidus);
            }
            if is_double_dot_segment(&buffer) {
                self.url.path_shorten();
                if !slash_like {
                    self.url.path_append_segment("");
                }
            } else if is_single_dot_segment(&buffer) {
                if !slash_like {
                    self.url.path_append_segment("");
                }
            } else {
                if self.url.structure.scheme_kind == SchemeKind::File
                    && self.url.structure.path_segment_count == 0
                    && is_windows_drive_letter(buffer.as_bytes())
                {
                    buffer.replace_range(1..2, ":");
                }
                self.url.path_append_segment(&buffer);
            }
            buffer.clear();
            match c {
                None => return Ok(State::Done),
                Some(b'?') => {
                    self.begin_query();
                    self.i += 1;
                    return Ok(State::Query);
                }
                Some(b'#') => {
                    self.begin_fragment();
                    self.i += 1;
                    return Ok(State::Fragment);
                }
                _ => self.i += 1,
            }
        }
    }

    fn opaque_path(&mut self) -> Result<State, ParseError> {
        loop {
            match self.c() {
                None => return Ok(State::Done),
                Some(b'?') => {
                    self.begin_query();
                    self.i += 1;
                    return Ok(State::Query);
                }
                Some(b'#') => {
                    self.begin_fragment();
                    self.i += 1;
                    return Ok(State::Fragment);
                }
                Some(0x00) => return Err(ParseError::OpaquePathForbiddenCharacter),
                Some(byte) => {
                    self.check_url_unit(byte);
                    percent_encode_byte_to(byte, EncodeSet::C0Control, &mut self.url.serialization);
                    self.i += 1;
                }
            }
        }
    }

    fn query(&mut self) -> Result<State, ParseError> {
        let set = if self.special() {
            EncodeSet::SpecialQuery
        } else {
            EncodeSet::Query
        };
        let mut buffer = String::new();
        loop {
            match self.c() {
                None => {
                    self.url.append_query_text(&buffer);
                    return Ok(State::Done);
                }
                Some(b'#') if !self.overridden() => {
                    self.url.append_query_text(&buffer);
                    self.begin_fragment();
                    self.i += 1;
                    return Ok(State::Fragment);
                }
                Some(byte) => {
                    self.check_url_unit(byte);
                    percent_encode_byte_to(byte, set, &mut buffer);
                    self.i += 1;
                }
            }
        }
    }

    fn fragment(&mut self) -> Result<State, ParseError> {
        let mut buffer = String::new();
        loop {
            match self.c() {
                None => {
                    self.url.serialization.push_str(&buffer);
                    return Ok(State::Done);
                }
                Some(byte) => {
                    self.check_url_unit(byte);
                    percent_encode_byte_to(byte, EncodeSet::Fragment, &mut buffer);
                    self.i += 1;
                }
            }
        }
    }

    /// Warn on ASCII bytes outside the URL code points and on `%` that does
    /// not begin a triplet.  Non-ASCII is always a URL code point here
    /// because the input is a `str`.
    fn check_url_unit(&self, byte: u8) {
        if byte == b'%' {
            let hex = self.bytes.get(self.i + 1).is_some_and(u8::is_ascii_hexdigit)
                && self.bytes.get(self.i + 2).is_some_and(u8::is_ascii_hexdigit);
            if !hex {
                self.warn(ValidationError::InvalidUrlUnit);
            }
            return;
        }
        if byte.is_ascii() && !is_url_code_point(byte as char) {
            self.warn(ValidationError::InvalidUrlUnit);
        }
    }
}
