//! Error type shared by the transport, controller and input sources.

/// Everything that can go wrong talking to a display.
///
/// A read that times out without data is not an error; it shows up as an
/// empty response instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The serial device could not be opened (missing, busy, not a tty).
    #[error("cannot open {port}: {source}")]
    DeviceOpen {
        port: String,
        #[source]
        source: serialport::Error,
    },

    /// Write or read failed at the OS or driver level.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The session has been closed and cannot carry transactions.
    #[error("session closed")]
    Closed,

    /// An input source failed to produce text.
    #[error("input source error: {0}")]
    Source(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_device_open() {
        let e = Error::DeviceOpen {
            port: "/dev/ttyUSB9".into(),
            source: serialport::Error::new(serialport::ErrorKind::NoDevice, "no such device"),
        };
        assert_eq!(e.to_string(), "cannot open /dev/ttyUSB9: no such device");
    }

    #[test]
    fn display_closed() {
        assert_eq!(Error::Closed.to_string(), "session closed");
    }

    #[test]
    fn io_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        let e: Error = io.into();
        assert!(matches!(e, Error::Io(_)));
        assert_eq!(e.to_string(), "I/O error: gone");
    }
}
