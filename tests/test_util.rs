#![allow(dead_code)]

use weburl::Url;

/// Parse `input` and require success.
#[allow(clippy::missing_panics_doc)]
pub fn parse(input: &str) -> Url {
    match Url::parse(input) {
        Ok(url) => url,
        Err(e) => panic!("failed to parse {input:?}: {e}"),
    }
}

/// Re-parsing a serialization must yield a byte-identical value.
#[allow(clippy::missing_panics_doc)]
pub fn assert_roundtrip(url: &Url) {
    let reparsed = match Url::parse(url.as_str()) {
        Ok(url) => url,
        Err(e) => panic!("serialization {:?} failed to re-parse: {e}", url.as_str()),
    };
    assert_eq!(
        reparsed.as_str(),
        url.as_str(),
        "serialization {:?} is not idempotent",
        url.as_str()
    );
}

/// Every serialization byte must be ASCII.
#[allow(clippy::missing_panics_doc)]
pub fn assert_all_ascii(url: &Url) {
    assert!(
        url.as_bytes().iter().all(u8::is_ascii),
        "non-ASCII byte in serialization {:?}",
        url.as_str()
    );
}
