use weburl::percent::{
    percent_decode, percent_decode_to_string, percent_encode, EncodeSet, PercentDecode,
    PercentEncode,
};

#[test]
fn c0_control_set() {
    assert!(EncodeSet::C0Control.contains(0x00));
    assert!(EncodeSet::C0Control.contains(0x1F));
    assert!(EncodeSet::C0Control.contains(0x7F));
    assert!(EncodeSet::C0Control.contains(0x80));
    assert!(EncodeSet::C0Control.contains(0xFF));
    assert!(!EncodeSet::C0Control.contains(b' '));
    assert!(!EncodeSet::C0Control.contains(b'~'));
    assert!(!EncodeSet::C0Control.contains(b'a'));
}

#[test]
fn fragment_set() {
    for byte in [b' ', b'"', b'<', b'>', b'`'] {
        assert!(EncodeSet::Fragment.contains(byte), "{byte:?}");
    }
    assert!(!EncodeSet::Fragment.contains(b'#'));
    assert!(!EncodeSet::Fragment.contains(b'/'));
}

#[test]
fn query_sets() {
    for byte in [b' ', b'"', b'#', b'<', b'>'] {
        assert!(EncodeSet::Query.contains(byte), "{byte:?}");
        assert!(EncodeSet::SpecialQuery.contains(byte), "{byte:?}");
    }
    assert!(!EncodeSet::Query.contains(b'\''));
    assert!(EncodeSet::SpecialQuery.contains(b'\''));
}

#[test]
fn path_set() {
    for byte in [b'?', b'`', b'{', b'}', b'#', b' '] {
        assert!(EncodeSet::Path.contains(byte), "{byte:?}");
    }
    assert!(!EncodeSet::Path.contains(b'/'));
    assert!(!EncodeSet::Path.contains(b'|'));
}

#[test]
fn userinfo_set() {
    for byte in b"/:;=@[\\]^|" {
        assert!(EncodeSet::Userinfo.contains(*byte), "{byte:?}");
    }
    assert!(!EncodeSet::Userinfo.contains(b'%'));
    assert!(!EncodeSet::Userinfo.contains(b'$'));
}

#[test]
fn component_set() {
    for byte in b"$%&+," {
        assert!(EncodeSet::Component.contains(*byte), "{byte:?}");
    }
    assert!(!EncodeSet::Component.contains(b'!'));
    assert!(!EncodeSet::Component.contains(b'~'));
}

#[test]
fn form_urlencoded_set() {
    for byte in b"!'()~$%&+," {
        assert!(EncodeSet::FormUrlencoded.contains(*byte), "{byte:?}");
    }
    assert!(!EncodeSet::FormUrlencoded.contains(b'*'));
    assert!(!EncodeSet::FormUrlencoded.contains(b'-'));
}

#[test]
fn encode() {
    assert_eq!(percent_encode("", EncodeSet::Path), "");
    assert_eq!(percent_encode("abc", EncodeSet::Path), "abc");
    assert_eq!(percent_encode("a b", EncodeSet::Query), "a%20b");
    assert_eq!(percent_encode("/", EncodeSet::Userinfo), "%2F");
    assert_eq!(percent_encode("æ", EncodeSet::Path), "%C3%A6");
    assert_eq!(percent_encode("aæb", EncodeSet::Path), "a%C3%A6b");
    assert_eq!(percent_encode("\u{fffd}", EncodeSet::Path), "%EF%BF%BD");
    // Hex digits are uppercase.
    assert_eq!(percent_encode("\u{1F}", EncodeSet::C0Control), "%1F");
}

#[test]
fn encode_lazy() {
    assert_eq!(PercentEncode::new(b"a b", EncodeSet::Query).to_string(), "a%20b");
    assert_eq!(
        format!("x={}", PercentEncode::new(b"1+2", EncodeSet::Component)),
        "x=1%2B2"
    );
}

#[test]
fn decode() {
    assert_eq!(percent_decode(""), b"");
    assert_eq!(percent_decode("abc"), b"abc");
    assert_eq!(percent_decode("%2a"), b"*");
    assert_eq!(percent_decode("%2A"), b"*");
    assert_eq!(percent_decode("%c3%a6"), [0xC3, 0xA6]);
    assert_eq!(percent_decode_to_string("%c3%a6"), "æ");
    assert_eq!(percent_decode_to_string("a%c3%a6b"), "aæb");
    assert_eq!(percent_decode_to_string("%c3"), "\u{fffd}");
}

#[test]
fn decode_malformed_passthrough() {
    assert_eq!(percent_decode("%"), b"%");
    assert_eq!(percent_decode("%2"), b"%2");
    assert_eq!(percent_decode("%2X"), b"%2X");
    assert_eq!(percent_decode("%X2"), b"%X2");
    assert_eq!(percent_decode_to_string("%2%2a"), "%2*");
    assert_eq!(percent_decode_to_string("100%"), "100%");
}

#[test]
fn decode_lazy() {
    let decoded: Vec<u8> = PercentDecode::new(b"%41B%43").collect();
    assert_eq!(decoded, b"ABC");
}

#[test]
fn encode_decode_closure() {
    // Decoding an encoding recovers the input bytes for every set.
    let input = "a b/c?d#e%f`{}|\\^~\u{00E9}\u{4F60}";
    for set in [
        EncodeSet::C0Control,
        EncodeSet::Fragment,
        EncodeSet::Query,
        EncodeSet::SpecialQuery,
        EncodeSet::Path,
        EncodeSet::Userinfo,
        EncodeSet::Component,
        EncodeSet::FormUrlencoded,
    ] {
        let encoded = percent_encode(input, set);
        assert!(encoded.is_ascii());
        if set == EncodeSet::Component || set == EncodeSet::FormUrlencoded {
            assert_eq!(percent_decode(&encoded), input.as_bytes(), "{set:?}");
        }
    }
}
