use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use weburl::idna::{self, mapping, IdnaError};
use weburl::punycode::{self, PunycodeError};

#[test]
fn punycode_known_labels() {
    assert_eq!(punycode::encode("ü").unwrap(), "tda");
    assert_eq!(punycode::decode("tda").unwrap(), "ü");
    assert_eq!(punycode::encode("bücher").unwrap(), "bcher-kva");
    assert_eq!(punycode::decode("bcher-kva").unwrap(), "bücher");
    assert_eq!(punycode::encode("你好你好").unwrap(), "6qqa088eba");
    assert_eq!(punycode::decode("6qqa088eba").unwrap(), "你好你好");
    // Decode is case-insensitive in the digits.
    assert_eq!(punycode::decode("6QQA088EBA").unwrap(), "你好你好");
}

#[test]
fn punycode_labels() {
    assert_eq!(punycode::encode_label("abc").unwrap(), "abc");
    assert_eq!(punycode::encode_label("你好你好").unwrap(), "xn--6qqa088eba");
    assert_eq!(punycode::decode_label("xn--6qqa088eba").unwrap(), "你好你好");
    assert_eq!(
        punycode::decode_label("abc"),
        Err(PunycodeError::MissingPrefix)
    );
}

#[test]
fn punycode_failures() {
    assert_eq!(punycode::decode("!"), Err(PunycodeError::InvalidDigit));
    assert_eq!(
        punycode::decode("99999999999999999999"),
        Err(PunycodeError::Overflow)
    );
    // Non-ASCII in the basic section.
    assert_eq!(punycode::decode("ü-abc"), Err(PunycodeError::InvalidCodePoint));
}

#[test]
fn punycode_roundtrip_random() {
    let mut rng = SmallRng::seed_from_u64(0xfeed_beef);
    for _ in 0..300 {
        let len = rng.gen_range(1..12);
        let label: String = (0..len)
            .map(|_| loop {
                // Mix basic and non-basic scalars; skip surrogates.
                let cp = if rng.gen_bool(0.3) {
                    rng.gen_range(0x20..0x7F)
                } else {
                    rng.gen_range(0x80..0x2_0000)
                };
                if let Some(c) = char::from_u32(cp) {
                    break c;
                }
            })
            .collect();
        if label.is_ascii() {
            continue;
        }
        let encoded = punycode::encode(&label).unwrap();
        assert!(encoded.is_ascii());
        assert_eq!(punycode::decode(&encoded).unwrap(), label, "{label:?}");
    }
}

#[test]
fn to_ascii_known_domains() {
    assert_eq!(idna::to_ascii("你好你好.cn", false).unwrap(), "xn--6qqa088eba.cn");
    assert_eq!(idna::to_ascii("EXAMPLE.COM", false).unwrap(), "example.com");
    assert_eq!(idna::to_ascii("exam\u{00AD}ple", false).unwrap(), "example");
    assert_eq!(
        idna::to_ascii("xn--6qqa088eba.cn", false).unwrap(),
        "xn--6qqa088eba.cn"
    );
    // Non-transitional: sharp s is preserved, not mapped to "ss".
    assert_eq!(idna::to_ascii("faß.de", false).unwrap(), "xn--fa-hia.de");
    assert_eq!(idna::to_ascii("example.com.", false).unwrap(), "example.com.");
}

#[test]
fn to_ascii_std3_gates() {
    assert_eq!(idna::to_ascii("ex ample", false).unwrap(), "ex ample");
    assert!(matches!(
        idna::to_ascii("ex ample", true),
        Err(IdnaError::DisallowedCodePoint(' '))
    ));
    assert_eq!(idna::to_ascii("under_score", false).unwrap(), "under_score");
    assert!(idna::to_ascii("under_score", true).is_err());
}

#[test]
fn to_ascii_failures() {
    assert!(matches!(
        idna::to_ascii("a\u{FFFD}b", false),
        Err(IdnaError::DisallowedCodePoint(_))
    ));
    assert!(matches!(
        idna::to_ascii("xn--a-ecp.com", false),
        Ok(_) | Err(IdnaError::Punycode(_) | IdnaError::LabelValidation)
    ));
    // A label that decodes to pure ASCII is not a valid ACE label.
    assert!(idna::to_ascii("xn--abc-", false).is_err());
}

#[test]
fn to_ascii_bytes_handles_invalid_utf8() {
    assert_eq!(
        idna::to_ascii_bytes(b"example.com", false).unwrap(),
        "example.com"
    );
    assert_eq!(
        idna::to_ascii_bytes(b"exa\xFFmple", true),
        Err(IdnaError::IllFormedUtf8)
    );
    // Lenient mode substitutes U+FFFD, which the table disallows.
    assert!(matches!(
        idna::to_ascii_bytes(b"exa\xFFmple", false),
        Err(IdnaError::DisallowedCodePoint(_))
    ));
}

#[test]
fn dns_length_limits() {
    let long_label = "a".repeat(64);
    assert!(idna::to_ascii(&long_label, false).is_ok());
    assert_eq!(idna::to_ascii(&long_label, true), Err(IdnaError::DnsLength));
    let ok_label = "a".repeat(63);
    assert!(idna::to_ascii(&ok_label, true).is_ok());
    let long_domain = [ok_label.as_str(); 5].join(".");
    assert_eq!(idna::to_ascii(&long_domain, true), Err(IdnaError::DnsLength));
}

#[test]
fn bidi_rules() {
    let hebrew = idna::to_ascii("אבג", false).unwrap();
    assert!(hebrew.starts_with("xn--"), "{hebrew}");
    assert!(idna::to_ascii("אבג123", false).is_ok());
    assert_eq!(
        idna::to_ascii("אבגa", false),
        Err(IdnaError::LabelValidation)
    );
    assert_eq!(
        idna::to_ascii("0אבג", false),
        Err(IdnaError::LabelValidation)
    );
    // An LTR label in a bidi domain must still follow the LTR rules.
    assert!(idna::to_ascii("abc.אבג", false).is_ok());
}

#[test]
fn context_joiner_rules() {
    // ZWNJ directly after a virama is the minimal allowed context.
    let with_virama = "\u{0915}\u{094D}\u{200C}";
    assert!(idna::to_ascii(with_virama, false).unwrap().starts_with("xn--"));
    assert_eq!(
        idna::to_ascii("a\u{200C}b", false),
        Err(IdnaError::LabelValidation)
    );
    assert_eq!(
        idna::to_ascii("\u{200D}x", false),
        Err(IdnaError::LabelValidation)
    );
}

#[test]
fn combining_mark_rule() {
    assert_eq!(
        idna::to_ascii("\u{0301}abc", false),
        Err(IdnaError::LabelValidation)
    );
}

#[test]
fn to_unicode() {
    assert_eq!(idna::to_unicode("xn--6qqa088eba.cn").unwrap(), "你好你好.cn");
    assert_eq!(idna::to_unicode("example.com").unwrap(), "example.com");
    assert_eq!(idna::to_unicode("你好.CN").unwrap(), "你好.cn");
}

#[test]
fn to_ascii_is_stable() {
    for input in [
        "example.com",
        "你好你好.cn",
        "faß.de",
        "EXAMPLE.org",
        "xn--6qqa088eba.cn",
        "a.b.c.d",
        "ex ample",
    ] {
        let once = idna::to_ascii(input, false).unwrap();
        let twice = idna::to_ascii(&once, false).unwrap();
        assert_eq!(once, twice, "{input:?}");
    }
}

#[test]
fn mapping_table_covers_every_code_point() {
    let mut expected_next = 0_u32;
    let mut count = 0_usize;
    for entry in mapping::entries() {
        assert_eq!(entry.range.start, expected_next, "gap or overlap in table");
        assert!(entry.range.end > entry.range.start, "empty entry");
        expected_next = entry.range.end;
        count += 1;
    }
    assert_eq!(expected_next, 0x11_0000);
    assert!(count > 100, "suspiciously small table: {count}");
}

#[test]
fn mapping_lookups() {
    use mapping::Status;

    let upper = mapping::lookup('A');
    assert_eq!(upper.status(), Status::Mapped);
    assert_eq!(upper.replacement(), Some("a".to_string()));
    assert_eq!(mapping::lookup('Z').replacement(), Some("z".to_string()));
    assert_eq!(mapping::lookup('a').status(), Status::Valid);
    assert_eq!(mapping::lookup('-').status(), Status::Valid);
    assert_eq!(mapping::lookup('你').status(), Status::Valid);
    assert_eq!(mapping::lookup(' ').status(), Status::DisallowedStd3Valid);
    assert_eq!(mapping::lookup('_').status(), Status::DisallowedStd3Valid);
    assert_eq!(mapping::lookup('\u{00AD}').status(), Status::Ignored);
    assert_eq!(mapping::lookup('\u{00DF}').status(), Status::Deviation);
    assert_eq!(mapping::lookup('\u{200C}').status(), Status::Deviation);
    assert_eq!(mapping::lookup('\u{E000}').status(), Status::Disallowed);
    assert_eq!(mapping::lookup('\u{0080}').status(), Status::Disallowed);
    // Compatibility mappings land in the shared replacements arena.
    let roman_eight = mapping::lookup('\u{2167}');
    assert_eq!(roman_eight.status(), Status::Mapped);
    assert_eq!(roman_eight.replacement(), Some("viii".to_string()));
    // Ideographic full stop maps to '.'.
    assert_eq!(mapping::lookup('\u{3002}').replacement(), Some(".".to_string()));
}
