//! Handshake tracing (`tracing` feature).
//!
//! Without the feature every helper is an empty inline function, so call
//! sites stay unconditional.

use std::net::SocketAddr;
use std::time::Duration;

use endpoint::Endpoint;

use crate::error::Socks5Error;

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

/// Trace a TCP connect attempt to one resolved proxy address.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn connect_attempt(proxy: &Endpoint, candidate: SocketAddr, budget: Option<Duration>) {
    debug!(
        target: "socks5::dial",
        proxy = %proxy,
        candidate = %candidate,
        budget = ?budget,
        "connecting to proxy {} via {}",
        proxy,
        candidate
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn connect_attempt(_proxy: &Endpoint, _candidate: SocketAddr, _budget: Option<Duration>) {}

/// Trace bytes sent to the proxy.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn sent(stage: &'static str, bytes: &[u8]) {
    trace!(
        target: "socks5::dial",
        stage = stage,
        len = bytes.len(),
        "-> {} {:02x?}",
        stage,
        bytes
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn sent(_stage: &'static str, _bytes: &[u8]) {}

/// Trace bytes received from the proxy.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn received(stage: &'static str, bytes: &[u8]) {
    trace!(
        target: "socks5::dial",
        stage = stage,
        len = bytes.len(),
        "<- {} {:02x?}",
        stage,
        bytes
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn received(_stage: &'static str, _bytes: &[u8]) {}

/// Trace a completed handshake.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn established(proxy: &Endpoint, target: &Endpoint) {
    debug!(
        target: "socks5::dial",
        proxy = %proxy,
        destination = %target,
        "SOCKS5 tunnel to {} established through {}",
        target,
        proxy
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn established(_proxy: &Endpoint, _target: &Endpoint) {}

/// Trace a failed dial.
#[cfg(feature = "tracing")]
#[inline]
pub(crate) fn failed(proxy: &Endpoint, error: &Socks5Error) {
    debug!(
        target: "socks5::dial",
        proxy = %proxy,
        kind = ?error.kind(),
        timeout = error.is_timeout(),
        "SOCKS5 dial through {} failed: {}",
        proxy,
        error
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub(crate) fn failed(_proxy: &Endpoint, _error: &Socks5Error) {}
