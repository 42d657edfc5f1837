#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `endpoint` turns textual `host:port` addresses into validated
//! [`Endpoint`] values. It is the address front-end of the SOCKS5 dialer: the
//! proxy address and the relay target both pass through [`resolve`] before any
//! byte reaches the wire.
//!
//! # Design
//!
//! Splitting follows the conventional host:port grammar used by network
//! tooling:
//!
//! - the port is everything after the last `:`;
//! - IPv6 literals must be enclosed in brackets (`[::1]:1080`), and the
//!   brackets are stripped from the resulting host;
//! - a bare host containing `:` is rejected instead of guessed at.
//!
//! Hosts are not looked up. Name resolution is left to the transport (or, for
//! relay targets, to the proxy itself).
//!
//! # Errors
//!
//! Structural problems surface as [`EndpointError::InvalidAddress`] carrying an
//! [`AddressIssue`]; a port that is not a base-10 integer in `0..=65535`
//! surfaces as [`EndpointError::InvalidPort`] naming the offending text.
//!
//! # Examples
//!
//! ```
//! let endpoint = endpoint::resolve("[2001:db8::1]:443").unwrap();
//! assert_eq!(endpoint.host(), "2001:db8::1");
//! assert_eq!(endpoint.port(), 443);
//! assert_eq!(endpoint.to_string(), "[2001:db8::1]:443");
//! ```

mod error;
mod parse;
mod types;

pub use crate::error::{AddressIssue, EndpointError};
pub use crate::parse::{parse_port, resolve, split_host_port};
pub use crate::types::Endpoint;
