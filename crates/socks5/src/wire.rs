//! SOCKS5 message layouts (RFC 1928, CONNECT with "no authentication" only).
//!
//! Every message the client sends or receives has a constant length or is
//! length-prefixed, so the driver reads with fixed-size `read_exact` calls and
//! never needs framing state.

use std::fmt;

use crate::error::{ProtocolField, Result, Socks5Error, malformed};

/// Protocol version byte.
pub const SOCKS5_VERSION: u8 = 0x05;
/// "No authentication required" method identifier.
pub const METHOD_NO_AUTHENTICATION: u8 = 0x00;
/// Method identifier a server uses to reject every offered method.
pub const METHOD_NO_ACCEPTABLE: u8 = 0xFF;
/// CONNECT command.
pub const CMD_CONNECT: u8 = 0x01;
/// Value required in reserved bytes.
pub const RESERVED: u8 = 0x00;
/// IPv4 address type.
pub const ATYP_IPV4: u8 = 0x01;
/// Domain name address type.
pub const ATYP_DOMAIN: u8 = 0x03;
/// IPv6 address type.
pub const ATYP_IPV6: u8 = 0x04;
/// Largest host length the single-byte length prefix can describe.
pub const MAX_HOST_LEN: usize = 0xFF;

/// Client greeting offering only "no authentication".
pub const GREETING: [u8; 3] = [SOCKS5_VERSION, 0x01, METHOD_NO_AUTHENTICATION];

/// Length of the method-selection reply.
pub const METHOD_REPLY_LEN: usize = 2;
/// Length of the fixed CONNECT reply header.
pub const REPLY_HEADER_LEN: usize = 4;

const REQUEST_HEADER_LEN: usize = 5;
const PORT_LEN: usize = 2;

/// Validates the proxy's method-selection reply.
pub fn check_method_selection(reply: [u8; METHOD_REPLY_LEN]) -> Result<()> {
    let [version, method] = reply;
    if version != SOCKS5_VERSION {
        return Err(Socks5Error::ProtocolMismatch {
            field: ProtocolField::MethodReplyVersion,
            expected: SOCKS5_VERSION,
            actual: version,
        });
    }
    if method != METHOD_NO_AUTHENTICATION {
        return Err(Socks5Error::AuthNegotiationFailed {
            expected: METHOD_NO_AUTHENTICATION,
            actual: method,
        });
    }
    Ok(())
}

/// CONNECT request addressed by domain name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConnectRequest {
    host: String,
    port: u16,
}

impl ConnectRequest {
    /// Creates a request, rejecting hosts longer than [`MAX_HOST_LEN`] bytes.
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self> {
        let host = host.into();
        if host.len() > MAX_HOST_LEN {
            return Err(Socks5Error::AddressTooLong {
                length: host.len(),
                host,
                max: MAX_HOST_LEN,
            });
        }
        Ok(Self { host, port })
    }

    /// Returns the destination host.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the destination port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Number of bytes [`encode`](Self::encode) produces.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        REQUEST_HEADER_LEN + self.host.len() + PORT_LEN
    }

    /// Serializes the request as
    /// `VER CMD RSV ATYP=domain LEN HOST PORT(big-endian)`.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.encoded_len());
        bytes.extend_from_slice(&[
            SOCKS5_VERSION,
            CMD_CONNECT,
            RESERVED,
            ATYP_DOMAIN,
            self.host.len() as u8,
        ]);
        bytes.extend_from_slice(self.host.as_bytes());
        bytes.extend_from_slice(&self.port.to_be_bytes());
        bytes
    }

    /// Parses a domain-name CONNECT request produced by [`encode`](Self::encode).
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let Some((header, rest)) = bytes.split_first_chunk::<REQUEST_HEADER_LEN>() else {
            return Err(malformed(format!(
                "CONNECT request is {} bytes, shorter than its {REQUEST_HEADER_LEN}-byte header",
                bytes.len()
            )));
        };
        let [version, command, reserved, atyp, host_len] = *header;

        expect_byte(ProtocolField::RequestVersion, SOCKS5_VERSION, version)?;
        expect_byte(ProtocolField::RequestCommand, CMD_CONNECT, command)?;
        expect_byte(ProtocolField::RequestReserved, RESERVED, reserved)?;
        expect_byte(ProtocolField::RequestAddressType, ATYP_DOMAIN, atyp)?;

        let host_len = usize::from(host_len);
        let expected = host_len + PORT_LEN;
        if rest.len() != expected {
            return Err(malformed(format!(
                "CONNECT request body is {} bytes, expected {expected}",
                rest.len()
            )));
        }

        let (host, port) = rest.split_at(host_len);
        let host = std::str::from_utf8(host)
            .map_err(|_| malformed("CONNECT request host is not valid UTF-8"))?;
        let port = u16::from_be_bytes([port[0], port[1]]);

        Self::new(host, port)
    }
}

fn expect_byte(field: ProtocolField, expected: u8, actual: u8) -> Result<()> {
    if actual == expected {
        Ok(())
    } else {
        Err(Socks5Error::ProtocolMismatch {
            field,
            expected,
            actual,
        })
    }
}

/// Address family of the bound address trailing a successful CONNECT reply.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BoundAddressType {
    /// Four address bytes.
    Ipv4,
    /// Sixteen address bytes.
    Ipv6,
}

impl BoundAddressType {
    /// Returns the ATYP byte for this family.
    #[must_use]
    pub const fn atyp(self) -> u8 {
        match self {
            Self::Ipv4 => ATYP_IPV4,
            Self::Ipv6 => ATYP_IPV6,
        }
    }

    /// Bytes that follow the reply header: the address plus a two-byte port.
    #[must_use]
    pub const fn trailing_len(self) -> usize {
        match self {
            Self::Ipv4 => 4 + PORT_LEN,
            Self::Ipv6 => 16 + PORT_LEN,
        }
    }
}

/// Validates the fixed CONNECT reply header and returns the bound address type.
pub fn parse_reply_header(header: [u8; REPLY_HEADER_LEN]) -> Result<BoundAddressType> {
    let [version, status, reserved, atyp] = header;

    if version != SOCKS5_VERSION {
        return Err(Socks5Error::ProtocolMismatch {
            field: ProtocolField::ReplyVersion,
            expected: SOCKS5_VERSION,
            actual: version,
        });
    }
    let reason = ReplyCode::from_byte(status);
    if reason != ReplyCode::Succeeded {
        return Err(Socks5Error::ConnectRefused { status, reason });
    }
    if reserved != RESERVED {
        return Err(Socks5Error::ProtocolMismatch {
            field: ProtocolField::ReplyReserved,
            expected: RESERVED,
            actual: reserved,
        });
    }

    match atyp {
        ATYP_IPV4 => Ok(BoundAddressType::Ipv4),
        ATYP_IPV6 => Ok(BoundAddressType::Ipv6),
        other => Err(Socks5Error::UnsupportedAddressType { atyp: other }),
    }
}

/// REP field of a CONNECT reply.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ReplyCode {
    /// `0x00`
    Succeeded,
    /// `0x01`
    GeneralFailure,
    /// `0x02`
    NotAllowedByRuleset,
    /// `0x03`
    NetworkUnreachable,
    /// `0x04`
    HostUnreachable,
    /// `0x05`
    ConnectionRefused,
    /// `0x06`
    TtlExpired,
    /// `0x07`
    CommandNotSupported,
    /// `0x08`
    AddressTypeNotSupported,
    /// Any value RFC 1928 leaves unassigned.
    Unassigned(u8),
}

impl ReplyCode {
    /// Interprets a raw REP byte.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            0x00 => Self::Succeeded,
            0x01 => Self::GeneralFailure,
            0x02 => Self::NotAllowedByRuleset,
            0x03 => Self::NetworkUnreachable,
            0x04 => Self::HostUnreachable,
            0x05 => Self::ConnectionRefused,
            0x06 => Self::TtlExpired,
            0x07 => Self::CommandNotSupported,
            0x08 => Self::AddressTypeNotSupported,
            other => Self::Unassigned(other),
        }
    }

    /// Returns the raw REP byte.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        match self {
            Self::Succeeded => 0x00,
            Self::GeneralFailure => 0x01,
            Self::NotAllowedByRuleset => 0x02,
            Self::NetworkUnreachable => 0x03,
            Self::HostUnreachable => 0x04,
            Self::ConnectionRefused => 0x05,
            Self::TtlExpired => 0x06,
            Self::CommandNotSupported => 0x07,
            Self::AddressTypeNotSupported => 0x08,
            Self::Unassigned(other) => other,
        }
    }

    /// Returns the RFC 1928 description of the code.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Succeeded => "succeeded",
            Self::GeneralFailure => "general SOCKS server failure",
            Self::NotAllowedByRuleset => "connection not allowed by ruleset",
            Self::NetworkUnreachable => "network unreachable",
            Self::HostUnreachable => "host unreachable",
            Self::ConnectionRefused => "connection refused",
            Self::TtlExpired => "TTL expired",
            Self::CommandNotSupported => "command not supported",
            Self::AddressTypeNotSupported => "address type not supported",
            Self::Unassigned(_) => "unassigned reply code",
        }
    }
}

impl fmt::Display for ReplyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[cfg(test)]
mod tests;
