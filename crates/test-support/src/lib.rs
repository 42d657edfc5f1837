#![deny(unsafe_code)]

//! Shared test utilities for the socks-dial workspace.
//!
//! [`StubProxy`] is a single-connection SOCKS5 server on `127.0.0.1` that
//! replays a [`ProxyScript`] and records every byte the client sends.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

/// How long the stub waits on a silent client before giving up.
const CLIENT_READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Point in the exchange at which the stub goes silent.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StallPoint {
    /// After accepting, before reading the greeting.
    Accept,
    /// After the greeting, before the method-selection reply.
    MethodReply,
    /// After the CONNECT request, before the reply.
    ConnectReply,
}

/// Scripted behaviour for one proxied connection.
#[derive(Clone, Debug)]
pub struct ProxyScript {
    method_reply: Vec<u8>,
    connect_reply: Vec<u8>,
    stall: Option<(StallPoint, Duration)>,
    echo: bool,
}

impl ProxyScript {
    /// Accepts "no authentication" and grants CONNECT with an IPv4 bound address.
    pub fn granting_ipv4() -> Self {
        Self {
            method_reply: vec![0x05, 0x00],
            connect_reply: vec![0x05, 0x00, 0x00, 0x01, 127, 0, 0, 1, 0x1F, 0x90],
            stall: None,
            echo: false,
        }
    }

    /// Accepts "no authentication" and grants CONNECT with an IPv6 bound address.
    pub fn granting_ipv6() -> Self {
        let mut connect_reply = vec![0x05, 0x00, 0x00, 0x04];
        connect_reply.extend_from_slice(&[0u8; 15]);
        connect_reply.push(1);
        connect_reply.extend_from_slice(&1080u16.to_be_bytes());
        Self {
            connect_reply,
            ..Self::granting_ipv4()
        }
    }

    /// Replaces the method-selection reply.
    pub fn with_method_reply(mut self, reply: impl Into<Vec<u8>>) -> Self {
        self.method_reply = reply.into();
        self
    }

    /// Replaces the CONNECT reply (header and bound address).
    pub fn with_connect_reply(mut self, reply: impl Into<Vec<u8>>) -> Self {
        self.connect_reply = reply.into();
        self
    }

    /// Goes silent for `duration` at `point`.
    pub fn stalling(mut self, point: StallPoint, duration: Duration) -> Self {
        self.stall = Some((point, duration));
        self
    }

    /// Echoes client bytes back after a successful CONNECT reply.
    pub fn echoing(mut self) -> Self {
        self.echo = true;
        self
    }

    fn pause_at(&self, point: StallPoint) {
        if let Some((stall_point, duration)) = self.stall
            && stall_point == point
        {
            thread::sleep(duration);
        }
    }
}

/// A running stub proxy.
pub struct StubProxy {
    addr: SocketAddr,
    handle: thread::JoinHandle<Vec<u8>>,
}

impl StubProxy {
    /// Binds an ephemeral loopback port and serves one connection with `script`.
    pub fn spawn(script: ProxyScript) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub proxy");
        let addr = listener.local_addr().expect("stub proxy addr");

        let handle = thread::spawn(move || match listener.accept() {
            Ok((stream, _)) => serve(stream, &script),
            Err(_) => Vec::new(),
        });

        Self { addr, handle }
    }

    /// Returns the listening socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the listening address in `host:port` form.
    pub fn address(&self) -> String {
        self.addr.to_string()
    }

    /// Waits for the connection to finish and returns every byte received.
    pub fn finish(self) -> Vec<u8> {
        self.handle.join().expect("stub proxy thread panicked")
    }
}

fn serve(mut stream: TcpStream, script: &ProxyScript) -> Vec<u8> {
    let mut received = Vec::new();
    let _ = stream.set_read_timeout(Some(CLIENT_READ_TIMEOUT));

    script.pause_at(StallPoint::Accept);
    if !read_into(&mut stream, 3, &mut received) {
        return received;
    }

    script.pause_at(StallPoint::MethodReply);
    if stream.write_all(&script.method_reply).is_err() {
        return received;
    }

    // VER CMD RSV ATYP LEN, then LEN host bytes and a two-byte port.
    if !read_into(&mut stream, 5, &mut received) {
        return received;
    }
    let host_len = usize::from(received[received.len() - 1]);
    if !read_into(&mut stream, host_len + 2, &mut received) {
        return received;
    }

    script.pause_at(StallPoint::ConnectReply);
    if stream.write_all(&script.connect_reply).is_err() {
        return received;
    }

    if script.echo {
        let _ = stream.set_read_timeout(None);
        let mut buf = [0u8; 1024];
        loop {
            match stream.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if stream.write_all(&buf[..n]).is_err() {
                        break;
                    }
                }
            }
        }
    }

    received
}

/// Appends exactly `len` bytes to `received`; returns `false` on EOF or error.
fn read_into(stream: &mut TcpStream, len: usize, received: &mut Vec<u8>) -> bool {
    let mut buf = vec![0u8; len];
    if stream.read_exact(&mut buf).is_err() {
        return false;
    }
    received.extend_from_slice(&buf);
    true
}

/// Returns a loopback address with nothing listening on it.
pub fn unused_local_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind probe listener");
    listener.local_addr().expect("probe addr")
}
