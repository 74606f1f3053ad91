use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use weburl::{
    Host, HostParseError, Ipv4Address, Ipv4InIpv6Error, Ipv4ParseError, Ipv6Address,
    Ipv6ParseError,
};

#[test]
fn ipv4_radix_forms() {
    assert_eq!(Ipv4Address::parse("0xC0.077601005").unwrap().bits(), 3_237_937_669);
    assert_eq!(
        Ipv4Address::parse("0xC0.077601005").unwrap().to_string(),
        "192.255.2.5"
    );
    assert_eq!(Ipv4Address::parse("234.011.0").unwrap().bits(), 3_926_458_368);
    assert_eq!(Ipv4Address::parse("234.011.0").unwrap().to_string(), "234.9.0.0");
    assert_eq!(Ipv4Address::parse("127.0.0.1").unwrap().bits(), 0x7F00_0001);
    assert_eq!(Ipv4Address::parse("0x7f.1").unwrap().to_string(), "127.0.0.1");
    assert_eq!(Ipv4Address::parse("192.168.1").unwrap().to_string(), "192.168.0.1");
    assert_eq!(Ipv4Address::parse("4294967295").unwrap().to_string(), "255.255.255.255");
    assert_eq!(Ipv4Address::parse("0x0").unwrap().bits(), 0);
    assert_eq!(Ipv4Address::parse("0x").unwrap().bits(), 0);
    // One trailing dot is allowed.
    assert_eq!(Ipv4Address::parse("1.2.3.4.").unwrap().to_string(), "1.2.3.4");
}

#[test]
fn ipv4_failures() {
    assert_eq!(Ipv4Address::parse(""), Err(Ipv4ParseError::EmptyPart));
    assert_eq!(Ipv4Address::parse("1..2"), Err(Ipv4ParseError::EmptyPart));
    assert_eq!(Ipv4Address::parse("1.2.3.4.."), Err(Ipv4ParseError::TooManyParts));
    assert_eq!(Ipv4Address::parse("1.2.3.4.5"), Err(Ipv4ParseError::TooManyParts));
    assert_eq!(Ipv4Address::parse("256.1.1.1"), Err(Ipv4ParseError::Overflow));
    assert_eq!(Ipv4Address::parse("1.2.3.256"), Err(Ipv4ParseError::Overflow));
    assert_eq!(Ipv4Address::parse("4294967296"), Err(Ipv4ParseError::Overflow));
    assert_eq!(Ipv4Address::parse("08"), Err(Ipv4ParseError::InvalidCharacter));
    assert_eq!(Ipv4Address::parse("0xg"), Err(Ipv4ParseError::InvalidCharacter));
    assert_eq!(Ipv4Address::parse("12a"), Err(Ipv4ParseError::InvalidCharacter));
}

#[test]
fn ipv4_conversions() {
    let addr = Ipv4Address::from([192, 168, 0, 1]);
    assert_eq!(addr.octets(), [192, 168, 0, 1]);
    assert_eq!(std::net::Ipv4Addr::from(addr), std::net::Ipv4Addr::new(192, 168, 0, 1));
    assert_eq!(Ipv4Address::from(std::net::Ipv4Addr::LOCALHOST).bits(), 0x7F00_0001);
    assert_eq!("1.2.3.4".parse::<Ipv4Address>().unwrap(), Ipv4Address::from(0x0102_0304));
}

#[test]
fn ipv4_roundtrip_random() {
    let mut rng = SmallRng::seed_from_u64(0x1234_5678);
    for _ in 0..1000 {
        let bits: u32 = rng.gen_range(0..=u32::MAX);
        let addr = Ipv4Address::from(bits);
        assert_eq!(Ipv4Address::parse(&addr.to_string()).unwrap().bits(), bits);
    }
}

#[test]
fn ipv6_parse_and_serialize() {
    let addr = Ipv6Address::parse("2001::ce49:7601:e866:efff:62c3:fffe").unwrap();
    assert_eq!(
        addr.pieces(),
        [0x2001, 0, 0xce49, 0x7601, 0xe866, 0xefff, 0x62c3, 0xfffe]
    );
    assert_eq!(addr.to_string(), "2001:0:ce49:7601:e866:efff:62c3:fffe");

    assert_eq!(Ipv6Address::parse("::").unwrap().pieces(), [0; 8]);
    assert_eq!(Ipv6Address::parse("::").unwrap().to_string(), "::");
    assert_eq!(Ipv6Address::parse("::1").unwrap().to_string(), "::1");
    assert_eq!(Ipv6Address::parse("1::").unwrap().to_string(), "1::");
    assert_eq!(
        Ipv6Address::parse("1:2:3:4:5:6:7:8").unwrap().to_string(),
        "1:2:3:4:5:6:7:8"
    );
    assert_eq!(
        Ipv6Address::parse("::ffff:192.168.0.1").unwrap().pieces(),
        [0, 0, 0, 0, 0, 0xffff, 0xc0a8, 0x0001]
    );
    assert_eq!(
        Ipv6Address::parse("1:2:3:4:5:6:1.2.3.4").unwrap().pieces(),
        [1, 2, 3, 4, 5, 6, 0x0102, 0x0304]
    );
    assert_eq!(
        Ipv6Address::parse("1:2:3:4:5:6:7::").unwrap().to_string(),
        "1:2:3:4:5:6:7:0"
    );
}

#[test]
fn ipv6_zero_run_compression() {
    // Longest run wins; leftmost on ties; single zeros stay.
    assert_eq!(Ipv6Address::from([0, 0, 1, 0, 0, 0, 1, 0]).to_string(), "0:0:1::1:0");
    assert_eq!(Ipv6Address::from([0, 1, 2, 3, 4, 5, 6, 7]).to_string(), "0:1:2:3:4:5:6:7");
    assert_eq!(Ipv6Address::from([0, 0, 1, 1, 0, 0, 1, 1]).to_string(), "::1:1:0:0:1:1");
    assert_eq!(Ipv6Address::from([1, 1, 1, 1, 1, 1, 0, 0]).to_string(), "1:1:1:1:1:1::");
}

#[test]
fn ipv6_failures() {
    assert_eq!(Ipv6Address::parse(":1"), Err(Ipv6ParseError::LeadingColon));
    assert_eq!(Ipv6Address::parse("1:"), Err(Ipv6ParseError::TrailingColon));
    assert_eq!(Ipv6Address::parse("1::2::3"), Err(Ipv6ParseError::MultipleCompressions));
    assert_eq!(Ipv6Address::parse("1:2:3"), Err(Ipv6ParseError::TooFewPieces));
    assert_eq!(
        Ipv6Address::parse("1:2:3:4:5:6:7:8:9"),
        Err(Ipv6ParseError::TooManyPieces)
    );
    assert_eq!(Ipv6Address::parse("12345::"), Err(Ipv6ParseError::PieceTooLong));
    assert_eq!(Ipv6Address::parse("::g"), Err(Ipv6ParseError::PieceStartsWithNonHex));
    assert_eq!(Ipv6Address::parse("1:2!:3"), Err(Ipv6ParseError::InvalidCharacter));
    assert_eq!(
        Ipv6Address::parse("1:2:3:4:5:6:7:1.2.3.4"),
        Err(Ipv6ParseError::Ipv4(Ipv4InIpv6Error::TooManyComponents))
    );
    assert_eq!(
        Ipv6Address::parse("::1.2.3"),
        Err(Ipv6ParseError::Ipv4(Ipv4InIpv6Error::TooFewComponents))
    );
    assert_eq!(
        Ipv6Address::parse("::1.2.3.04"),
        Err(Ipv6ParseError::Ipv4(Ipv4InIpv6Error::UnsupportedRadix))
    );
    assert_eq!(
        Ipv6Address::parse("::1.2.3.456"),
        Err(Ipv6ParseError::Ipv4(Ipv4InIpv6Error::Overflow))
    );
    assert_eq!(
        Ipv6Address::parse("::1.2.3.4.5"),
        Err(Ipv6ParseError::Ipv4(Ipv4InIpv6Error::TooManyComponents))
    );
    assert_eq!(
        Ipv6Address::parse("::ffff:.1.2.3"),
        Err(Ipv6ParseError::Ipv4(Ipv4InIpv6Error::InvalidCharacter))
    );
}

#[test]
fn ipv6_conversions() {
    let addr = Ipv6Address::from([0x2001, 0xdb8, 0, 0, 0, 0, 0, 1]);
    assert_eq!(
        std::net::Ipv6Addr::from(addr),
        "2001:db8::1".parse::<std::net::Ipv6Addr>().unwrap()
    );
    assert_eq!(Ipv6Address::from(std::net::Ipv6Addr::LOCALHOST).to_string(), "::1");
    let mut octets = [0_u8; 16];
    octets[0] = 0x20;
    octets[1] = 0x01;
    octets[15] = 1;
    assert_eq!(Ipv6Address::parse("2001::1").unwrap().octets(), octets);
}

#[test]
fn ipv6_roundtrip_random() {
    let mut rng = SmallRng::seed_from_u64(0x9abc_def0);
    for _ in 0..1000 {
        let mut pieces = [0_u16; 8];
        for piece in &mut pieces {
            // Zero-heavy values exercise the compression logic.
            *piece = if rng.gen_bool(0.5) {
                0
            } else {
                rng.gen_range(1..=u16::MAX)
            };
        }
        let addr = Ipv6Address::from(pieces);
        let reparsed = Ipv6Address::parse(&addr.to_string()).unwrap();
        assert_eq!(reparsed.pieces(), pieces, "{addr}");
    }
}

#[test]
fn host_parsing() {
    assert_eq!(
        Host::parse("example.com").unwrap(),
        Host::Domain("example.com".to_string())
    );
    assert_eq!(
        Host::parse("EXAMPLE.com").unwrap(),
        Host::Domain("example.com".to_string())
    );
    assert_eq!(
        Host::parse("ex%41mple.com").unwrap(),
        Host::Domain("example.com".to_string())
    );
    assert!(matches!(Host::parse("127.0.0.1").unwrap(), Host::Ipv4(_)));
    assert!(matches!(Host::parse("[::1]").unwrap(), Host::Ipv6(_)));
    assert!(matches!(Host::parse("foo.0x1A"), Err(HostParseError::Ipv4(_))));
    assert_eq!(Host::parse("[::1"), Err(HostParseError::Ipv6Unclosed));
    assert_eq!(
        Host::parse("ex%zzle"),
        Err(HostParseError::InvalidPercentEncoding)
    );
    assert_eq!(
        Host::parse("exa mple.com"),
        Err(HostParseError::ForbiddenDomainCharacter(' '))
    );
}

#[test]
fn opaque_host_parsing() {
    assert_eq!(
        Host::parse_opaque("café").unwrap(),
        Host::Opaque("caf%C3%A9".to_string())
    );
    assert_eq!(Host::parse_opaque("").unwrap(), Host::Empty);
    assert_eq!(
        Host::parse_opaque("h^st"),
        Err(HostParseError::ForbiddenHostCharacter('^'))
    );
    assert_eq!(
        Host::parse_opaque("h{st}").unwrap(),
        Host::Opaque("h{st}".to_string())
    );
}

#[test]
fn host_serialization() {
    assert_eq!(Host::Domain("example.com".to_string()).to_string(), "example.com");
    assert_eq!(Host::Ipv4(Ipv4Address::from([1, 2, 3, 4])).to_string(), "1.2.3.4");
    assert_eq!(
        Host::Ipv6(Ipv6Address::from([0, 0, 0, 0, 0, 0, 0, 1])).to_string(),
        "[::1]"
    );
    assert_eq!(Host::Empty.to_string(), "");
    assert_eq!(Host::from(std::net::IpAddr::V4([9, 8, 7, 6].into())).to_string(), "9.8.7.6");
    assert!(Host::Empty.is_empty());
}
