#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]
#![deny(missing_docs)]

//! Blocking SOCKS5 CONNECT client.
//!
//! This crate re-exports the workspace members behind one import path:
//! [`endpoint`] parses `host:port` addresses and [`socks5`] runs the proxy
//! handshake. Most callers only need [`connect`]:
//!
//! ```no_run
//! use std::time::Duration;
//!
//! let _stream = socks_dial::connect("127.0.0.1:1080", "example.com:443", Duration::from_secs(5))?;
//! # Ok::<(), socks_dial::Socks5Error>(())
//! ```

pub use endpoint;
pub use socks5;

pub use socks5::{
    DEFAULT_DIAL_TIMEOUT, DeadlineStream, DialOptions, Endpoint, EndpointError, ErrorKind,
    ProtocolField, Result, Socks5Dialer, Socks5Error, TimeoutControl, connect, negotiate, wire,
};
