use super::*;
use crate::error::ErrorKind;
use proptest::prelude::*;

#[test]
fn greeting_offers_only_no_authentication() {
    assert_eq!(GREETING, [0x05, 0x01, 0x00]);
}

#[test]
fn method_selection_accepts_no_authentication() {
    check_method_selection([0x05, 0x00]).expect("valid reply");
}

#[test]
fn method_selection_rejects_other_versions() {
    let err = check_method_selection([0x04, 0x00]).expect_err("SOCKS4 reply");
    assert!(matches!(
        err,
        Socks5Error::ProtocolMismatch {
            field: ProtocolField::MethodReplyVersion,
            expected: 0x05,
            actual: 0x04,
        }
    ));
}

#[test]
fn method_selection_reports_chosen_method() {
    let err = check_method_selection([0x05, METHOD_NO_ACCEPTABLE]).expect_err("rejected");
    assert!(matches!(
        err,
        Socks5Error::AuthNegotiationFailed {
            expected: 0x00,
            actual: 0xFF,
        }
    ));
}

#[test]
fn version_is_checked_before_method() {
    let err = check_method_selection([0x01, 0x02]).expect_err("invalid reply");
    assert_eq!(err.kind(), ErrorKind::ProtocolMismatch);
}

#[test]
fn connect_request_for_example_com_443_matches_wire_bytes() {
    let request = ConnectRequest::new("example.com", 443).expect("valid request");
    let expected = [
        0x05, 0x01, 0x00, 0x03, 0x0B, 0x65, 0x78, 0x61, 0x6D, 0x70, 0x6C, 0x65, 0x2E, 0x63, 0x6F,
        0x6D, 0x01, 0xBB,
    ];

    let encoded = request.encode();
    assert_eq!(encoded, expected);
    assert_eq!(request.encoded_len(), expected.len());

    let decoded = ConnectRequest::decode(&encoded).expect("decodes");
    assert_eq!(decoded.host(), "example.com");
    assert_eq!(decoded.port(), 443);
}

#[test]
fn connect_request_accepts_255_byte_host() {
    let host = "a".repeat(MAX_HOST_LEN);
    let request = ConnectRequest::new(host.clone(), 80).expect("fits length prefix");
    let encoded = request.encode();

    assert_eq!(encoded[4], 0xFF);
    assert_eq!(&encoded[5..5 + MAX_HOST_LEN], host.as_bytes());
}

#[test]
fn connect_request_rejects_256_byte_host() {
    let host = "a".repeat(MAX_HOST_LEN + 1);
    match ConnectRequest::new(host.clone(), 80) {
        Err(Socks5Error::AddressTooLong {
            host: reported,
            length,
            max,
        }) => {
            assert_eq!(reported, host);
            assert_eq!(length, 256);
            assert_eq!(max, 255);
        }
        other => panic!("expected AddressTooLong, got {other:?}"),
    }
}

#[test]
fn connect_request_length_counts_bytes_not_chars() {
    // 128 two-byte characters encode to 256 bytes.
    let host = "é".repeat(128);
    let err = ConnectRequest::new(host, 80).expect_err("too long in bytes");
    assert_eq!(err.kind(), ErrorKind::AddressTooLong);
}

#[test]
fn decode_rejects_short_header() {
    let err = ConnectRequest::decode(&[0x05, 0x01, 0x00]).expect_err("truncated");
    assert_eq!(err.kind(), ErrorKind::Malformed);
}

#[test]
fn decode_rejects_truncated_body() {
    let mut bytes = ConnectRequest::new("example.com", 80)
        .expect("request")
        .encode();
    bytes.pop();
    let err = ConnectRequest::decode(&bytes).expect_err("truncated");
    assert!(err.to_string().contains("expected 13"));
}

#[test]
fn decode_rejects_non_connect_commands() {
    let mut bytes = ConnectRequest::new("example.com", 80)
        .expect("request")
        .encode();
    bytes[1] = 0x02;
    let err = ConnectRequest::decode(&bytes).expect_err("BIND");
    assert!(matches!(
        err,
        Socks5Error::ProtocolMismatch {
            field: ProtocolField::RequestCommand,
            actual: 0x02,
            ..
        }
    ));
}

#[test]
fn decode_rejects_invalid_utf8_host() {
    let bytes = [0x05, 0x01, 0x00, 0x03, 0x02, 0xC3, 0x28, 0x00, 0x50];
    let err = ConnectRequest::decode(&bytes).expect_err("invalid UTF-8");
    assert_eq!(err.kind(), ErrorKind::Malformed);
}

#[test]
fn reply_header_success_selects_bound_address_length() {
    assert_eq!(
        parse_reply_header([0x05, 0x00, 0x00, 0x01]).expect("ipv4"),
        BoundAddressType::Ipv4
    );
    assert_eq!(
        parse_reply_header([0x05, 0x00, 0x00, 0x04]).expect("ipv6"),
        BoundAddressType::Ipv6
    );
    assert_eq!(BoundAddressType::Ipv4.trailing_len(), 6);
    assert_eq!(BoundAddressType::Ipv6.trailing_len(), 18);
}

#[test]
fn reply_header_rejects_wrong_version() {
    let err = parse_reply_header([0x04, 0x00, 0x00, 0x01]).expect_err("bad version");
    assert!(matches!(
        err,
        Socks5Error::ProtocolMismatch {
            field: ProtocolField::ReplyVersion,
            actual: 0x04,
            ..
        }
    ));
}

#[test]
fn reply_header_reports_refusal_status() {
    let err = parse_reply_header([0x05, 0x02, 0x00, 0x01]).expect_err("refused");
    assert!(matches!(
        err,
        Socks5Error::ConnectRefused {
            status: 0x02,
            reason: ReplyCode::NotAllowedByRuleset,
        }
    ));
}

#[test]
fn reply_header_checks_status_before_reserved() {
    let err = parse_reply_header([0x05, 0x01, 0x09, 0x01]).expect_err("refused");
    assert_eq!(err.kind(), ErrorKind::ConnectRefused);
}

#[test]
fn reply_header_rejects_nonzero_reserved() {
    let err = parse_reply_header([0x05, 0x00, 0x01, 0x01]).expect_err("reserved set");
    assert!(matches!(
        err,
        Socks5Error::ProtocolMismatch {
            field: ProtocolField::ReplyReserved,
            actual: 0x01,
            ..
        }
    ));
}

#[test]
fn reply_header_rejects_domain_and_unknown_address_types() {
    for atyp in [ATYP_DOMAIN, 0x7F] {
        let err = parse_reply_header([0x05, 0x00, 0x00, atyp]).expect_err("unsupported");
        assert!(matches!(err, Socks5Error::UnsupportedAddressType { atyp: a } if a == atyp));
    }
}

#[test]
fn reply_code_descriptions_cover_assigned_values() {
    assert_eq!(ReplyCode::from_byte(0x04).to_string(), "host unreachable");
    assert_eq!(ReplyCode::from_byte(0x08).as_byte(), 0x08);
    assert_eq!(ReplyCode::from_byte(0x42), ReplyCode::Unassigned(0x42));
    assert_eq!(ReplyCode::Unassigned(0x42).as_byte(), 0x42);
}

proptest! {
    #[test]
    fn host_length_limit_is_exactly_the_prefix_range(len in 0usize..=600) {
        let result = ConnectRequest::new("h".repeat(len), 1);
        prop_assert_eq!(result.is_ok(), len <= MAX_HOST_LEN);
    }

    #[test]
    fn encoded_request_carries_length_prefix_and_big_endian_port(
        host in "[a-z0-9.-]{1,255}",
        port in any::<u16>(),
    ) {
        let bytes = ConnectRequest::new(host.clone(), port).expect("fits").encode();
        prop_assert_eq!(usize::from(bytes[4]), host.len());
        prop_assert_eq!(&bytes[bytes.len() - 2..], &port.to_be_bytes()[..]);
    }
}
