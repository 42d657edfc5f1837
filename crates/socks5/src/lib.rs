#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `socks5` establishes TCP connections through a SOCKS5 proxy (RFC 1928).
//! [`connect`] opens a connection to the proxy, offers the "no
//! authentication" method, asks the proxy to CONNECT to the target, validates
//! the reply, and hands back a ready-to-use byte stream.
//!
//! # Design
//!
//! - [`wire`] holds the message layouts and their validation rules.
//! - [`DeadlineStream`] turns one absolute deadline into the relative socket
//!   timeouts `std` understands, so the caller's timeout bounds the whole
//!   dial rather than each step.
//! - [`negotiate`] drives the exchange over any `Read + Write` stream;
//!   [`connect`] and [`Socks5Dialer`] add proxy resolution, connect, and the
//!   deadline.
//!
//! # Invariants
//!
//! - The deadline is `start + timeout`, where `start` is taken before the
//!   proxy connect. Time spent connecting is charged against the handshake.
//! - Nothing follows the greeting unless the proxy selected "no
//!   authentication".
//! - Target hosts longer than 255 bytes are rejected before the CONNECT
//!   request is written.
//! - The proxy's bound address is consumed in full and discarded.
//! - No step is retried. A failed dial drops its connection.
//!
//! # Errors
//!
//! All operations return [`Socks5Error`]; [`Socks5Error::kind`] gives a
//! fieldless [`ErrorKind`] and [`Socks5Error::is_timeout`] identifies elapsed
//! deadlines.
//!
//! # Examples
//!
//! ```no_run
//! use std::io::Write;
//! use std::time::Duration;
//!
//! let mut stream = socks5::connect("127.0.0.1:9050", "example.com:80", Duration::from_secs(10))?;
//! stream.clear_deadline()?;
//! stream.write_all(b"GET / HTTP/1.0\r\n\r\n")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod deadline;
mod dial;
mod error;
mod options;
mod trace;
mod transport;
pub mod wire;

pub use crate::deadline::{DeadlineStream, TimeoutControl};
pub use crate::dial::{Socks5Dialer, connect, negotiate};
pub use crate::error::{ErrorKind, ProtocolField, Result, Socks5Error};
pub use crate::options::{DEFAULT_DIAL_TIMEOUT, DialOptions};
pub use endpoint::{Endpoint, EndpointError};
