use std::fmt;
use std::str::FromStr;

use crate::error::{AddressIssue, EndpointError};

/// A validated host and TCP port pair.
///
/// The host is kept exactly as written (minus IPv6 brackets); no DNS lookup or
/// IP parsing is performed.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    /// Creates an endpoint from an already split host and port.
    ///
    /// Fails with [`AddressIssue::MissingHost`] when `host` is empty.
    pub fn new(host: impl Into<String>, port: u16) -> Result<Self, EndpointError> {
        let host = host.into();
        if host.is_empty() {
            return Err(EndpointError::address(&host, AddressIssue::MissingHost));
        }
        Ok(Self { host, port })
    }

    /// Returns the host name or address literal.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Returns the TCP port.
    #[must_use]
    pub const fn port(&self) -> u16 {
        self.port
    }

    /// Consumes the endpoint and returns its host and port.
    #[must_use]
    pub fn into_parts(self) -> (String, u16) {
        (self.host, self.port)
    }
}

impl FromStr for Endpoint {
    type Err = EndpointError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        crate::parse::resolve(text)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}
