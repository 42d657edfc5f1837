//! Error taxonomy for the SOCKS5 dialer.
//!
//! Every failure is terminal for the handshake that produced it. Variants carry
//! the offending byte, field, or text so a failure can be diagnosed from the
//! message alone.

use std::fmt;
use std::io;

use endpoint::EndpointError;
use thiserror::Error;

use crate::wire::ReplyCode;

/// Result type for SOCKS5 operations.
pub type Result<T> = std::result::Result<T, Socks5Error>;

/// Fixed-position protocol field whose value did not match.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProtocolField {
    /// Version byte of the method-selection reply.
    MethodReplyVersion,
    /// Version byte of the CONNECT reply.
    ReplyVersion,
    /// Reserved byte of the CONNECT reply.
    ReplyReserved,
    /// Version byte of a CONNECT request.
    RequestVersion,
    /// Command byte of a CONNECT request.
    RequestCommand,
    /// Reserved byte of a CONNECT request.
    RequestReserved,
    /// Address type byte of a CONNECT request.
    RequestAddressType,
}

impl ProtocolField {
    /// Returns a short description of the field.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MethodReplyVersion => "method selection version (not a SOCKS5 server)",
            Self::ReplyVersion => "CONNECT reply version",
            Self::ReplyReserved => "CONNECT reply reserved byte",
            Self::RequestVersion => "CONNECT request version",
            Self::RequestCommand => "CONNECT request command",
            Self::RequestReserved => "CONNECT request reserved byte",
            Self::RequestAddressType => "CONNECT request address type",
        }
    }
}

impl fmt::Display for ProtocolField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced while establishing a SOCKS5 connection.
#[derive(Debug, Error)]
pub enum Socks5Error {
    /// Connecting, reading, or writing failed, including deadline expiry.
    #[error("failed to {action} {peer}: {source}")]
    Transport {
        /// Operation that failed, e.g. `"read CONNECT reply from"`.
        action: &'static str,
        /// Proxy address the operation targeted.
        peer: String,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A fixed-position byte did not hold its required value.
    #[error("unexpected {field}: expected {expected:#04x}, got {actual:#04x}")]
    ProtocolMismatch {
        /// Field that was checked.
        field: ProtocolField,
        /// Required value.
        expected: u8,
        /// Value received.
        actual: u8,
    },
    /// The proxy selected an authentication method other than "no authentication".
    #[error(
        "SOCKS authentication method negotiation failed; expected {expected:#04x}, got {actual:#04x}"
    )]
    AuthNegotiationFailed {
        /// Method that was offered.
        expected: u8,
        /// Method the proxy selected.
        actual: u8,
    },
    /// The caller supplied a malformed address or port.
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
    /// The target host does not fit the single-byte length prefix.
    #[error("hostname {host} is {length} bytes, over maximum length {max}")]
    AddressTooLong {
        /// Host that was rejected.
        host: String,
        /// Encoded length in bytes.
        length: usize,
        /// Largest encodable length.
        max: usize,
    },
    /// The proxy refused the CONNECT request.
    #[error("could not complete SOCKS5 connection: status {status:#04x} ({reason})")]
    ConnectRefused {
        /// Raw REP byte.
        status: u8,
        /// Interpretation of the REP byte.
        reason: ReplyCode,
    },
    /// The bound address type in the CONNECT reply is neither IPv4 nor IPv6.
    #[error("invalid address type {atyp:#04x} in CONNECT response")]
    UnsupportedAddressType {
        /// Raw ATYP byte.
        atyp: u8,
    },
    /// An encoded message could not be decoded.
    #[error("malformed SOCKS5 message: {message}")]
    Malformed {
        /// What was wrong with the message.
        message: String,
    },
}

/// Fieldless classification of a [`Socks5Error`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorKind {
    /// See [`Socks5Error::Transport`].
    Transport,
    /// See [`Socks5Error::ProtocolMismatch`].
    ProtocolMismatch,
    /// See [`Socks5Error::AuthNegotiationFailed`].
    AuthNegotiationFailed,
    /// Malformed address text, see [`EndpointError::InvalidAddress`].
    InvalidAddress,
    /// Malformed or out-of-range port, see [`EndpointError::InvalidPort`].
    InvalidPort,
    /// See [`Socks5Error::AddressTooLong`].
    AddressTooLong,
    /// See [`Socks5Error::ConnectRefused`].
    ConnectRefused,
    /// See [`Socks5Error::UnsupportedAddressType`].
    UnsupportedAddressType,
    /// See [`Socks5Error::Malformed`].
    Malformed,
}

impl Socks5Error {
    /// Returns the classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. } => ErrorKind::Transport,
            Self::ProtocolMismatch { .. } => ErrorKind::ProtocolMismatch,
            Self::AuthNegotiationFailed { .. } => ErrorKind::AuthNegotiationFailed,
            Self::Endpoint(EndpointError::InvalidAddress { .. }) => ErrorKind::InvalidAddress,
            Self::Endpoint(EndpointError::InvalidPort { .. }) => ErrorKind::InvalidPort,
            Self::AddressTooLong { .. } => ErrorKind::AddressTooLong,
            Self::ConnectRefused { .. } => ErrorKind::ConnectRefused,
            Self::UnsupportedAddressType { .. } => ErrorKind::UnsupportedAddressType,
            Self::Malformed { .. } => ErrorKind::Malformed,
        }
    }

    /// Reports whether this is a transport failure caused by an elapsed deadline.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport { source, .. } => matches!(
                source.kind(),
                io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock
            ),
            _ => false,
        }
    }

    /// Returns the underlying I/O error for transport failures.
    #[must_use]
    pub fn io_error(&self) -> Option<&io::Error> {
        match self {
            Self::Transport { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub(crate) fn transport_error(
    action: &'static str,
    peer: impl fmt::Display,
    error: io::Error,
) -> Socks5Error {
    Socks5Error::Transport {
        action,
        peer: peer.to_string(),
        source: error,
    }
}

pub(crate) fn malformed(message: impl Into<String>) -> Socks5Error {
    Socks5Error::Malformed {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use endpoint::AddressIssue;
    use std::error::Error as _;

    #[test]
    fn transport_error_formats_action_and_peer() {
        let err = transport_error(
            "connect to",
            "127.0.0.1:1080",
            io::Error::new(io::ErrorKind::ConnectionRefused, "refused"),
        );

        assert_eq!(err.kind(), ErrorKind::Transport);
        assert_eq!(err.to_string(), "failed to connect to 127.0.0.1:1080: refused");
        assert!(err.source().is_some());
        assert!(!err.is_timeout());
    }

    #[test]
    fn timeout_classification_covers_timed_out_and_would_block() {
        for kind in [io::ErrorKind::TimedOut, io::ErrorKind::WouldBlock] {
            let err = transport_error("read from", "proxy:1080", io::Error::from(kind));
            assert!(err.is_timeout(), "{kind:?} should classify as timeout");
        }
    }

    #[test]
    fn protocol_mismatch_names_field_and_bytes() {
        let err = Socks5Error::ProtocolMismatch {
            field: ProtocolField::ReplyReserved,
            expected: 0x00,
            actual: 0x2a,
        };
        let text = err.to_string();

        assert!(text.contains("reserved"));
        assert!(text.contains("0x00"));
        assert!(text.contains("0x2a"));
    }

    #[test]
    fn method_reply_version_mentions_socks5() {
        let err = Socks5Error::ProtocolMismatch {
            field: ProtocolField::MethodReplyVersion,
            expected: 0x05,
            actual: 0x04,
        };
        assert!(err.to_string().contains("not a SOCKS5 server"));
    }

    #[test]
    fn auth_failure_reports_expected_and_actual() {
        let err = Socks5Error::AuthNegotiationFailed {
            expected: 0x00,
            actual: 0x02,
        };
        let text = err.to_string();
        assert!(text.contains("expected 0x00"));
        assert!(text.contains("got 0x02"));
    }

    #[test]
    fn connect_refused_carries_status_and_reason() {
        let err = Socks5Error::ConnectRefused {
            status: 0x05,
            reason: ReplyCode::from_byte(0x05),
        };
        assert_eq!(err.kind(), ErrorKind::ConnectRefused);
        assert!(err.to_string().contains("0x05"));
        assert!(err.to_string().contains("connection refused"));
    }

    #[test]
    fn endpoint_errors_pass_through_unchanged() {
        let inner = endpoint::resolve("example.com").expect_err("missing port");
        let text = inner.to_string();
        let err = Socks5Error::from(inner);

        assert_eq!(err.kind(), ErrorKind::InvalidAddress);
        assert_eq!(err.to_string(), text);
        assert!(matches!(
            err,
            Socks5Error::Endpoint(EndpointError::InvalidAddress {
                issue: AddressIssue::MissingPort,
                ..
            })
        ));
    }

    #[test]
    fn invalid_port_maps_to_its_own_kind() {
        let err = Socks5Error::from(endpoint::resolve("example.com:http").expect_err("bad port"));
        assert_eq!(err.kind(), ErrorKind::InvalidPort);
    }

    #[test]
    fn io_error_is_only_exposed_for_transport_failures() {
        let err = Socks5Error::UnsupportedAddressType { atyp: 0x7f };
        assert!(err.io_error().is_none());
        assert!(err.to_string().contains("0x7f"));
    }
}
