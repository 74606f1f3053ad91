#![cfg(feature = "serde")]

use weburl::Url;

#[test]
fn url_serializes_as_its_serialization() {
    let url = Url::parse("https://example.org/a?b#c").unwrap();
    assert_eq!(
        serde_json::to_string(&url).unwrap(),
        "\"https://example.org/a?b#c\""
    );
}

#[test]
fn url_deserializes_by_parsing() {
    let url: Url = serde_json::from_str("\"https://EXAMPLE.org/x/../y\"").unwrap();
    assert_eq!(url.as_str(), "https://example.org/y");
    let error = serde_json::from_str::<Url>("\"no scheme\"");
    assert!(error.is_err());
}

#[test]
fn host_serializes_as_string() {
    let url = Url::parse("https://example.org/").unwrap();
    assert_eq!(
        serde_json::to_string(&url.host().unwrap()).unwrap(),
        "\"example.org\""
    );
}
