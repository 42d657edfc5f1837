use std::net::SocketAddr;
use std::time::Duration;

/// Budget applied to a dial when none is configured.
pub const DEFAULT_DIAL_TIMEOUT: Duration = Duration::from_secs(30);

/// Settings for a SOCKS5 dial.
///
/// The timeout bounds the entire operation, from the first connect attempt to
/// the last byte of the CONNECT reply.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DialOptions {
    timeout: Duration,
    #[cfg_attr(feature = "serde", serde(default))]
    bind_address: Option<SocketAddr>,
}

impl DialOptions {
    /// Creates options with the given whole-operation timeout.
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            bind_address: None,
        }
    }

    /// Binds the outbound socket to `address` before connecting.
    ///
    /// The port is ignored; the operating system picks an ephemeral one. The
    /// address family must match the proxy's.
    #[must_use]
    pub const fn with_bind_address(mut self, address: SocketAddr) -> Self {
        self.bind_address = Some(address);
        self
    }

    /// Replaces the whole-operation timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the whole-operation timeout.
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the local bind address, if any.
    pub const fn bind_address(&self) -> Option<SocketAddr> {
        self.bind_address
    }
}

impl Default for DialOptions {
    fn default() -> Self {
        Self::new(DEFAULT_DIAL_TIMEOUT)
    }
}
