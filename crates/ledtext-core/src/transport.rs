//! The seam between the display controller and the physical link.
//!
//! [`LedDisplay`](crate::LedDisplay) only talks to a [`Transport`], so the
//! same controller drives a real [`SerialTransport`](crate::SerialTransport)
//! or a [`MockTransport`](crate::MockTransport) in tests.

use crate::error::Result;

/// Blocking request/response link to one display.
pub trait Transport {
    /// Write all of `request`, then wait once for a reply.
    ///
    /// Returns whatever arrived before the read timeout, which may be
    /// nothing. Fails with [`Error::Closed`](crate::Error::Closed) after
    /// [`close`](Transport::close).
    fn transact(&mut self, request: &[u8]) -> Result<Vec<u8>>;

    /// Release the underlying handle. Calling it again is a no-op.
    fn close(&mut self);

    fn is_open(&self) -> bool;
}
