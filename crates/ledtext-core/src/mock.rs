//! In-memory transport for exercising the controller without hardware.
//!
//! Clones of a [`MockTransport`] share their state, so a test can keep one
//! handle, move another into an [`LedDisplay`](crate::LedDisplay), and still
//! inspect what was sent after the display is gone.
//!
//! ```
//! use ledtext_core::{LedDisplay, MockTransport};
//! use ledtext_codec::{ControlTags, DeviceAddress};
//!
//! let mock = MockTransport::new();
//! mock.push_response(b"OK");
//! let mut display = LedDisplay::new(mock.clone(), DeviceAddress(1)).with_tags(ControlTags::none());
//! let response = display.send("Hello").unwrap();
//! assert_eq!(response.bytes(), b"OK");
//! assert_eq!(mock.sent(), vec![b"<ID01>Hello42<E>".to_vec()]);
//! ```

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::transport::Transport;

#[derive(Debug, Default)]
struct State {
    sent: Vec<Vec<u8>>,
    responses: VecDeque<Vec<u8>>,
    /// Error kinds to fail the next transactions with, in order.
    failures: VecDeque<io::ErrorKind>,
    closed: bool,
    close_calls: usize,
}

/// Scripted [`Transport`] that records every request.
///
/// With no queued response a transaction behaves like a silent device: it
/// waits out the configured timeout and returns nothing.
#[derive(Debug, Clone)]
pub struct MockTransport {
    state: Arc<Mutex<State>>,
    timeout: Duration,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::with_timeout(Duration::ZERO)
    }

    /// Silent transactions block for `timeout`, like a real read would.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(State::default())),
            timeout,
        }
    }

    pub fn push_response(&self, response: &[u8]) {
        self.state.lock().responses.push_back(response.to_vec());
    }

    /// Make the next transaction fail with an I/O error of `kind`.
    pub fn fail_next(&self, kind: io::ErrorKind) {
        self.state.lock().failures.push_back(kind);
    }

    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.state.lock().sent.clone()
    }

    /// How many times `close` released the session (0 or 1).
    pub fn times_closed(&self) -> usize {
        self.state.lock().close_calls
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for MockTransport {
    fn transact(&mut self, request: &[u8]) -> Result<Vec<u8>> {
        let queued = {
            let mut state = self.state.lock();
            if state.closed {
                return Err(Error::Closed);
            }
            if let Some(kind) = state.failures.pop_front() {
                return Err(io::Error::new(kind, "mock transport failure").into());
            }
            state.sent.push(request.to_vec());
            state.responses.pop_front()
        };

        match queued {
            Some(response) => Ok(response),
            None => {
                std::thread::sleep(self.timeout);
                Ok(Vec::new())
            }
        }
    }

    fn close(&mut self) {
        let mut state = self.state.lock();
        if !state.closed {
            state.closed = true;
            state.close_calls += 1;
        }
    }

    fn is_open(&self) -> bool {
        !self.state.lock().closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn records_requests_and_replays_responses() {
        let mut mock = MockTransport::new();
        mock.push_response(b"one");
        assert_eq!(mock.transact(b"a").unwrap(), b"one");
        assert_eq!(mock.transact(b"b").unwrap(), b"");
        assert_eq!(mock.sent(), vec![b"a".to_vec(), b"b".to_vec()]);
    }

    #[test]
    fn silent_device_waits_for_timeout() {
        let mut mock = MockTransport::with_timeout(Duration::from_millis(50));
        let start = Instant::now();
        assert!(mock.transact(b"x").unwrap().is_empty());
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(50));
        assert!(elapsed < Duration::from_secs(2));
    }

    #[test]
    fn injected_failure_leaves_session_open() {
        let mut mock = MockTransport::new();
        mock.fail_next(io::ErrorKind::BrokenPipe);
        assert!(matches!(mock.transact(b"x"), Err(Error::Io(_))));
        assert!(mock.is_open());
        assert!(mock.transact(b"y").is_ok());
        assert_eq!(mock.sent(), vec![b"y".to_vec()]);
    }

    #[test]
    fn close_twice_counts_once() {
        let mut mock = MockTransport::new();
        mock.close();
        mock.close();
        assert_eq!(mock.times_closed(), 1);
        assert!(!mock.is_open());
        assert!(matches!(mock.transact(b"x"), Err(Error::Closed)));
    }

    #[test]
    fn clones_share_state() {
        let handle = MockTransport::new();
        let mut other = handle.clone();
        other.transact(b"shared").unwrap();
        assert_eq!(handle.sent(), vec![b"shared".to_vec()]);
    }
}
