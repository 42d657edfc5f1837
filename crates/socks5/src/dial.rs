//! The SOCKS5 CONNECT handshake driver.
//!
//! A dial records its start time, connects to the proxy within the caller's
//! budget, pins the stream's deadline to `start + timeout`, and then runs three
//! fixed-format exchanges: greeting, method selection, CONNECT. Any failure
//! aborts the dial and drops the connection.

use std::io::{Read, Write};
use std::net::TcpStream;
use std::time::{Duration, Instant};

use endpoint::Endpoint;

use crate::deadline::DeadlineStream;
use crate::error::{Result, transport_error};
use crate::options::DialOptions;
use crate::trace;
use crate::wire::{
    self, BoundAddressType, ConnectRequest, GREETING, METHOD_REPLY_LEN, REPLY_HEADER_LEN,
};

/// Largest bound-address trailer (IPv6 address plus port).
const MAX_BOUND_ADDRESS_LEN: usize = 18;

/// Connects to `target` through the SOCKS5 proxy at `proxy`.
///
/// Both addresses use `host:port` form. `timeout` bounds the whole operation,
/// connect included. The returned stream is still bound by that deadline;
/// call [`DeadlineStream::clear_deadline`] or
/// [`DeadlineStream::set_deadline`] before using it for longer-lived traffic.
///
/// Only the "no authentication" method and the CONNECT command are supported.
pub fn connect(proxy: &str, target: &str, timeout: Duration) -> Result<DeadlineStream<TcpStream>> {
    Socks5Dialer::new(proxy, DialOptions::new(timeout))?.dial(target)
}

/// Reusable dialer for one proxy.
#[derive(Clone, Debug)]
pub struct Socks5Dialer {
    proxy: Endpoint,
    options: DialOptions,
}

impl Socks5Dialer {
    /// Creates a dialer for the proxy at `proxy` (`host:port`).
    pub fn new(proxy: &str, options: DialOptions) -> Result<Self> {
        let proxy = endpoint::resolve(proxy)?;
        Ok(Self::from_endpoint(proxy, options))
    }

    /// Creates a dialer for an already resolved proxy endpoint.
    #[must_use]
    pub const fn from_endpoint(proxy: Endpoint, options: DialOptions) -> Self {
        Self { proxy, options }
    }

    /// Returns the proxy endpoint.
    pub const fn proxy(&self) -> &Endpoint {
        &self.proxy
    }

    /// Returns the dial options.
    pub const fn options(&self) -> &DialOptions {
        &self.options
    }

    /// Connects to `target` (`host:port`) through the proxy.
    pub fn dial(&self, target: &str) -> Result<DeadlineStream<TcpStream>> {
        let started = Instant::now();
        self.dial_from(started, target)
            .inspect_err(|error| trace::failed(&self.proxy, error))
    }

    fn dial_from(&self, started: Instant, target: &str) -> Result<DeadlineStream<TcpStream>> {
        // A timeout too large to add to `started` cannot elapse; treat it as unbounded.
        let deadline = started.checked_add(self.options.timeout());

        let stream =
            crate::transport::connect_proxy(&self.proxy, deadline, self.options.bind_address())?;
        let mut stream = DeadlineStream::new(stream);
        if let Some(deadline) = deadline {
            stream
                .set_deadline(deadline)
                .map_err(|error| transport_error("set deadline on", &self.proxy, error))?;
        }

        negotiate(&mut stream, &self.proxy, target)?;
        Ok(stream)
    }
}

/// Runs the SOCKS5 exchange for `target` over an already connected stream.
///
/// `proxy` only labels transport errors. Nothing is written after a failed
/// method selection, and an over-long target host is rejected before the
/// CONNECT request is sent. The proxy's bound address is read and discarded.
pub fn negotiate<S: Read + Write>(stream: &mut S, proxy: &Endpoint, target: &str) -> Result<()> {
    stream
        .write_all(&GREETING)
        .map_err(|error| transport_error("write greeting to", proxy, error))?;
    trace::sent("greeting", &GREETING);

    let mut method_reply = [0u8; METHOD_REPLY_LEN];
    stream
        .read_exact(&mut method_reply)
        .map_err(|error| transport_error("read method selection from", proxy, error))?;
    trace::received("method selection", &method_reply);
    wire::check_method_selection(method_reply)?;

    let target = endpoint::resolve(target)?;
    let request = ConnectRequest::new(target.host(), target.port())?.encode();
    stream
        .write_all(&request)
        .and_then(|()| stream.flush())
        .map_err(|error| transport_error("write CONNECT request to", proxy, error))?;
    trace::sent("CONNECT request", &request);

    let mut header = [0u8; REPLY_HEADER_LEN];
    stream
        .read_exact(&mut header)
        .map_err(|error| transport_error("read CONNECT reply from", proxy, error))?;
    trace::received("CONNECT reply", &header);
    let bound = wire::parse_reply_header(header)?;

    discard_bound_address(stream, proxy, bound)?;
    trace::established(proxy, &target);
    Ok(())
}

fn discard_bound_address<S: Read>(
    stream: &mut S,
    proxy: &Endpoint,
    bound: BoundAddressType,
) -> Result<()> {
    let mut trailer = [0u8; MAX_BOUND_ADDRESS_LEN];
    let trailer = &mut trailer[..bound.trailing_len()];
    stream
        .read_exact(trailer)
        .map_err(|error| transport_error("read bound address from", proxy, error))?;
    trace::received("bound address", trailer);
    Ok(())
}
