use crate::error::{AddressIssue, EndpointError};
use crate::types::Endpoint;

/// Resolves `address` into a validated [`Endpoint`].
///
/// Splits with [`split_host_port`], rejects an empty host, and parses the port
/// with [`parse_port`].
pub fn resolve(address: &str) -> Result<Endpoint, EndpointError> {
    let (host, port_text) = split_host_port(address)?;
    if host.is_empty() {
        return Err(EndpointError::address(address, AddressIssue::MissingHost));
    }
    let port = parse_port(address, port_text)?;
    Endpoint::new(host, port)
}

/// Splits `address` into host and port text on the last `:`.
///
/// A leading `[` introduces a bracketed host which must be followed directly by
/// `]:`. The returned host excludes the brackets. The port text is returned
/// unvalidated and may be empty.
pub fn split_host_port(address: &str) -> Result<(&str, &str), EndpointError> {
    let colon = address
        .rfind(':')
        .ok_or_else(|| EndpointError::address(address, AddressIssue::MissingPort))?;

    let (host, host_start, trailer_start) = if let Some(rest) = address.strip_prefix('[') {
        let close = rest
            .find(']')
            .map(|idx| idx + 1)
            .ok_or_else(|| EndpointError::address(address, AddressIssue::MissingClosingBracket))?;

        let after_close = close + 1;
        if after_close == address.len() {
            return Err(EndpointError::address(address, AddressIssue::MissingPort));
        }
        if after_close != colon {
            let issue = if address.as_bytes()[after_close] == b':' {
                AddressIssue::TooManyColons
            } else {
                AddressIssue::MissingPort
            };
            return Err(EndpointError::address(address, issue));
        }

        (&address[1..close], 1, after_close)
    } else {
        let host = &address[..colon];
        if host.contains(':') {
            return Err(EndpointError::address(address, AddressIssue::TooManyColons));
        }
        (host, 0, 0)
    };

    if address[host_start..].contains('[') {
        return Err(EndpointError::address(
            address,
            AddressIssue::UnexpectedOpeningBracket,
        ));
    }
    if address[trailer_start..].contains(']') {
        return Err(EndpointError::address(
            address,
            AddressIssue::UnexpectedClosingBracket,
        ));
    }

    Ok((host, &address[colon + 1..]))
}

/// Parses `text` as a base-10 port in `0..=65535`.
///
/// Signs, whitespace and empty text are rejected. `address` is only used to
/// give the error context.
pub fn parse_port(address: &str, text: &str) -> Result<u16, EndpointError> {
    if text.is_empty() || !text.bytes().all(|byte| byte.is_ascii_digit()) {
        return Err(EndpointError::port(address, text));
    }
    text.parse::<u16>()
        .map_err(|_| EndpointError::port(address, text))
}
