use std::fmt;

use thiserror::Error;

/// Structural defect found while splitting a `host:port` address.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AddressIssue {
    /// No `:port` suffix was present.
    MissingPort,
    /// A host outside brackets contained `:`, or extra colons followed `]`.
    TooManyColons,
    /// An opening `[` was never closed.
    MissingClosingBracket,
    /// A `[` appeared where only the opening bracket is permitted.
    UnexpectedOpeningBracket,
    /// A `]` appeared after the bracketed host.
    UnexpectedClosingBracket,
    /// The host component was empty.
    MissingHost,
}

impl AddressIssue {
    /// Returns the human readable description of the defect.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingPort => "missing port in address",
            Self::TooManyColons => "too many colons in address",
            Self::MissingClosingBracket => "missing ']' in address",
            Self::UnexpectedOpeningBracket => "unexpected '[' in address",
            Self::UnexpectedClosingBracket => "unexpected ']' in address",
            Self::MissingHost => "missing host in address",
        }
    }
}

impl fmt::Display for AddressIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors produced while resolving a textual address into an [`Endpoint`](crate::Endpoint).
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum EndpointError {
    /// The address could not be split into host and port.
    #[error("invalid address '{address}': {issue}")]
    InvalidAddress {
        /// Address text supplied by the caller.
        address: String,
        /// What was wrong with it.
        issue: AddressIssue,
    },
    /// The port component is not a base-10 integer in `0..=65535`.
    #[error("invalid port '{port}' in address '{address}'")]
    InvalidPort {
        /// Address text supplied by the caller.
        address: String,
        /// Offending port text.
        port: String,
    },
}

impl EndpointError {
    pub(crate) fn address(address: &str, issue: AddressIssue) -> Self {
        Self::InvalidAddress {
            address: address.to_owned(),
            issue,
        }
    }

    pub(crate) fn port(address: &str, port: &str) -> Self {
        Self::InvalidPort {
            address: address.to_owned(),
            port: port.to_owned(),
        }
    }
}
