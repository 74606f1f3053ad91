//! The query as `application/x-www-form-urlencoded` key-value pairs.
//!
//! Keys may repeat.  Reads decode `+` and percent-triplets; writes encode
//! with the form-urlencoded set and rewrite the query component as a whole.

use crate::percent::{percent_decode, EncodeSet};
use crate::url::Url;

/// Decode one form-urlencoded token: `+` is a space, triplets are bytes.
fn decode_token(token: &str) -> String {
    let plus_decoded: Vec<u8> = token
        .bytes()
        .map(|b| if b == b'+' { b' ' } else { b })
        .collect();
    String::from_utf8_lossy(&percent_decode(plus_decoded)).into_owned()
}

fn encode_token(token: &str, out: &mut String) {
    for byte in token.bytes() {
        if byte == b' ' {
            out.push('+');
        } else if EncodeSet::FormUrlencoded.contains(byte) {
            out.push('%');
            out.push(crate::ascii::upper_hex_char(byte >> 4));
            out.push(crate::ascii::upper_hex_char(byte & 0xF));
        } else {
            out.push(byte as char);
        }
    }
}

fn parse_pairs(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| match chunk.split_once('=') {
            Some((key, value)) => (decode_token(key), decode_token(value)),
            None => (decode_token(chunk), String::new()),
        })
        .collect()
}

fn serialize_pairs(pairs: &[(String, String)]) -> String {
    let mut out = String::new();
    for (key, value) in pairs {
        if !out.is_empty() {
            out.push('&');
        }
        encode_token(key, &mut out);
        out.push('=');
        encode_token(value, &mut out);
    }
    out
}

/// Mutating view over the query's key-value pairs.
#[derive(Debug)]
pub struct QueryParamsMut<'a> {
    url: &'a mut Url,
    pairs: Vec<(String, String)>,
}
impl QueryParamsMut<'_> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The first value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value for `key`, in order.
    #[must_use]
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Add `key=value` at the end.
    pub fn append(&mut self, key: &str, value: &str) {
        self.pairs.push((key.to_string(), value.to_string()));
        self.write_back();
    }

    /// Add every pair from `iter` at the end.
    pub fn append_pairs<'s>(&mut self, iter: impl IntoIterator<Item = (&'s str, &'s str)>) {
        self.pairs.extend(
            iter.into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string())),
        );
        self.write_back();
    }

    /// Set `key` to a single `value`: the first occurrence is replaced and
    /// the rest removed, or the pair is appended when absent.
    pub fn set(&mut self, key: &str, value: &str) {
        match self.pairs.iter().position(|(k, _)| k == key) {
            Some(index) => {
                self.pairs[index].1 = value.to_string();
                self.pairs.retain({
                    let mut seen = 0;
                    move |(k, _)| {
                        if k == key {
                            seen += 1;
                            seen == 1
                        } else {
                            true
                        }
                    }
                });
            }
            None => self.pairs.push((key.to_string(), value.to_string())),
        }
        self.write_back();
    }

    /// Remove every pair with `key`; returns how many were removed.
    pub fn remove(&mut self, key: &str) -> usize {
        let before = self.pairs.len();
        self.pairs.retain(|(k, _)| k != key);
        self.write_back();
        before - self.pairs.len()
    }

    /// Remove every pair.  The query component itself is removed.
    pub fn clear(&mut self) {
        self.pairs.clear();
        self.write_back();
    }

    fn write_back(&mut self) {
        if self.pairs.is_empty() {
            self.url.rewrite_query(None);
        } else {
            self.url.rewrite_query(Some(&serialize_pairs(&self.pairs)));
        }
    }
}

impl Url {
    /// The query parsed as form-urlencoded pairs, decoded.
    pub fn query_params(&self) -> impl Iterator<Item = (String, String)> {
        parse_pairs(self.query().unwrap_or("")).into_iter()
    }

    /// Mutable form-urlencoded view of the query.
    pub fn query_params_mut(&mut self) -> QueryParamsMut<'_> {
        let pairs = parse_pairs(self.query().unwrap_or(""));
        QueryParamsMut { url: self, pairs }
    }
}
