use std::io;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::{Duration, Instant};

use endpoint::Endpoint;
use socket2::{Domain, Protocol, SockAddr, Socket, Type};

use crate::deadline::remaining_until;
use crate::error::{Result, transport_error};
use crate::trace;

/// Opens a TCP connection to the proxy, trying each resolved address in turn.
///
/// Every attempt is bounded by the budget left before `deadline`, so a slow
/// first candidate eats into the time available to the rest. The last failure
/// is reported when no candidate connects.
pub(crate) fn connect_proxy(
    proxy: &Endpoint,
    deadline: Option<Instant>,
    bind_address: Option<SocketAddr>,
) -> Result<TcpStream> {
    let candidates = (proxy.host(), proxy.port())
        .to_socket_addrs()
        .map_err(|error| transport_error("resolve proxy address for", proxy, error))?;

    let mut last_error: Option<(SocketAddr, io::Error)> = None;

    for candidate in candidates {
        let timeout = deadline
            .map(remaining_until)
            .transpose()
            .map_err(|error| transport_error("connect to", proxy, error))?;

        trace::connect_attempt(proxy, candidate, timeout);
        match connect_with_optional_bind(candidate, bind_address, timeout) {
            Ok(stream) => return Ok(stream),
            Err(error) => last_error = Some((candidate, error)),
        }
    }

    match last_error {
        Some((candidate, error)) => Err(transport_error("connect to", candidate, error)),
        None => Err(transport_error(
            "resolve proxy address for",
            proxy,
            io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                "proxy resolution returned no addresses",
            ),
        )),
    }
}

/// Opens a TCP connection to `target`, optionally binding to a local address first.
///
/// When `bind_address` is provided its port is forced to `0` so the OS picks
/// an ephemeral port.
pub(crate) fn connect_with_optional_bind(
    target: SocketAddr,
    bind_address: Option<SocketAddr>,
    timeout: Option<Duration>,
) -> io::Result<TcpStream> {
    if let Some(bind) = bind_address {
        if target.is_ipv4() != bind.is_ipv4() {
            return Err(io::Error::new(
                io::ErrorKind::AddrNotAvailable,
                "bind address family does not match proxy address",
            ));
        }

        let domain = if target.is_ipv4() {
            Domain::IPV4
        } else {
            Domain::IPV6
        };

        let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
        let mut bind_addr = bind;
        bind_addr.set_port(0);
        socket.bind(&SockAddr::from(bind_addr))?;

        let target_addr = SockAddr::from(target);
        if let Some(duration) = timeout {
            socket.connect_timeout(&target_addr, duration)?;
        } else {
            socket.connect(&target_addr)?;
        }

        Ok(socket.into())
    } else if let Some(duration) = timeout {
        TcpStream::connect_timeout(&target, duration)
    } else {
        TcpStream::connect(target)
    }
}
