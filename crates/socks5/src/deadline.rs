//! Absolute deadlines over streams that only understand relative timeouts.
//!
//! `std::net::TcpStream` exposes per-call read and write timeouts. A SOCKS5
//! dial must instead bound the *whole* exchange, so [`DeadlineStream`] keeps an
//! [`Instant`] and converts the remaining budget into a relative timeout before
//! every read and write.

use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::time::{Duration, Instant};

/// Streams whose blocking reads and writes can be bounded by a relative timeout.
pub trait TimeoutControl {
    /// Bounds subsequent reads by `timeout`; `None` blocks indefinitely.
    fn set_read_budget(&mut self, timeout: Option<Duration>) -> io::Result<()>;

    /// Bounds subsequent writes by `timeout`; `None` blocks indefinitely.
    fn set_write_budget(&mut self, timeout: Option<Duration>) -> io::Result<()>;
}

impl TimeoutControl for TcpStream {
    fn set_read_budget(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        self.set_read_timeout(timeout)
    }

    fn set_write_budget(&mut self, timeout: Option<Duration>) -> io::Result<()> {
        self.set_write_timeout(timeout)
    }
}

/// Returns the time left before `deadline`, or a `TimedOut` error once it has passed.
pub(crate) fn remaining_until(deadline: Instant) -> io::Result<Duration> {
    let now = Instant::now();
    if now >= deadline {
        return Err(deadline_exceeded());
    }
    Ok(deadline - now)
}

fn deadline_exceeded() -> io::Error {
    io::Error::new(io::ErrorKind::TimedOut, "deadline exceeded")
}

/// A stream bound by an optional absolute deadline.
///
/// Once the deadline passes, every read and write fails with
/// [`io::ErrorKind::TimedOut`]. The deadline stays in force until the owner
/// moves it with [`set_deadline`](Self::set_deadline) or removes it with
/// [`clear_deadline`](Self::clear_deadline).
#[derive(Debug)]
pub struct DeadlineStream<S> {
    inner: S,
    deadline: Option<Instant>,
}

impl<S: TimeoutControl> DeadlineStream<S> {
    /// Wraps `inner` without a deadline.
    pub const fn new(inner: S) -> Self {
        Self {
            inner,
            deadline: None,
        }
    }

    /// Sets the absolute deadline and applies the remaining budget to the stream.
    ///
    /// Fails with `TimedOut` when `deadline` has already passed; the deadline
    /// is recorded either way.
    pub fn set_deadline(&mut self, deadline: Instant) -> io::Result<()> {
        self.deadline = Some(deadline);
        let remaining = remaining_until(deadline)?;
        self.inner.set_read_budget(Some(remaining))?;
        self.inner.set_write_budget(Some(remaining))
    }

    /// Removes the deadline and lets the stream block indefinitely.
    pub fn clear_deadline(&mut self) -> io::Result<()> {
        self.deadline = None;
        self.inner.set_read_budget(None)?;
        self.inner.set_write_budget(None)
    }

    /// Returns the current deadline, if any.
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns the time left before the deadline, saturating at zero.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// Returns a shared reference to the wrapped stream.
    pub const fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Returns a mutable reference to the wrapped stream.
    ///
    /// Timeouts set directly on the stream are overwritten on the next read or
    /// write while a deadline is active.
    pub fn get_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Unwraps the stream.
    ///
    /// The stream keeps whatever relative timeout was applied last; call
    /// [`clear_deadline`](Self::clear_deadline) first to hand back an
    /// unbounded stream.
    pub fn into_inner(self) -> S {
        self.inner
    }

    fn budget(&self) -> io::Result<Option<Duration>> {
        self.deadline.map(remaining_until).transpose()
    }

    fn classify(&self, error: io::Error) -> io::Error {
        // Socket timeouts surface as EAGAIN on Unix.
        if self.deadline.is_some() && error.kind() == io::ErrorKind::WouldBlock {
            deadline_exceeded()
        } else {
            error
        }
    }
}

impl<S: Read + TimeoutControl> Read for DeadlineStream<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(remaining) = self.budget()? {
            self.inner.set_read_budget(Some(remaining))?;
        }
        self.inner.read(buf).map_err(|error| self.classify(error))
    }
}

impl<S: Write + TimeoutControl> Write for DeadlineStream<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(remaining) = self.budget()? {
            self.inner.set_write_budget(Some(remaining))?;
        }
        self.inner.write(buf).map_err(|error| self.classify(error))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.budget()?;
        self.inner.flush().map_err(|error| self.classify(error))
    }
}
