//! Serial transport, display controller and input sources for LED boards.

pub mod display;
pub mod driver;
pub mod encoding;
pub mod error;
pub mod mock;
pub mod serial;
pub mod source;
pub mod transport;

pub use display::{LedDisplay, Response};
pub use driver::{run, RunStats};
pub use encoding::TextEncoding;
pub use error::{Error, Result};
pub use mock::MockTransport;
pub use serial::{list_ports, PortInfo, SerialConfig, SerialTransport};
pub use source::{
    InteractiveSource, LogTailSource, NowPlaying, NowPlayingSource, OsaScriptPlayer, Poll,
    TextSource, Track,
};
pub use transport::Transport;
