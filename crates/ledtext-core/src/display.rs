//! The display controller: text in, framed packet out, response back.

use ledtext_codec::{CommandPacket, ControlTags, DeviceAddress};
use log::debug;

use crate::encoding::TextEncoding;
use crate::error::Result;
use crate::serial::{SerialConfig, SerialTransport};
use crate::transport::Transport;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Response {
    bytes: Vec<u8>,
}

impl Response {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn text(&self, encoding: TextEncoding) -> String {
        encoding.decode(&self.bytes)
    }
}

/// One LED board on one transport.
///
/// The transport is closed when the display is closed or dropped, whichever
/// comes first.
pub struct LedDisplay<T: Transport> {
    transport: T,
    address: DeviceAddress,
    tags: ControlTags,
    encoding: TextEncoding,
}

impl LedDisplay<SerialTransport> {
    /// Open the serial port described by `cfg` and bind it to `address`.
    pub fn open(cfg: &SerialConfig, address: DeviceAddress) -> Result<Self> {
        let transport = SerialTransport::open(cfg)?;
        Ok(Self::new(transport, address))
    }
}

impl<T: Transport> LedDisplay<T> {
    pub fn new(transport: T, address: DeviceAddress) -> Self {
        Self {
            transport,
            address,
            tags: ControlTags::default(),
            encoding: TextEncoding::default(),
        }
    }

    pub fn with_tags(mut self, tags: ControlTags) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_response_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn address(&self) -> DeviceAddress {
        self.address
    }

    pub fn tags(&self) -> &ControlTags {
        &self.tags
    }

    /// The packet `send` would transmit for `text`.
    pub fn packet(&self, text: &str) -> CommandPacket {
        CommandPacket::new(self.address, &self.tags.apply(text))
    }

    /// Show `text` on the board.
    ///
    /// Blocks for the write plus at most the transport's read timeout.
    /// Transport errors are returned as is; the session stays open.
    pub fn send(&mut self, text: &str) -> Result<Response> {
        let packet = self.packet(text);
        debug!("sending to display {}: {:?}", self.address, packet.to_string());

        let response = Response::new(self.transport.transact(&packet.to_bytes())?);
        if response.is_empty() {
            debug!("no response from display {}", self.address);
        } else {
            debug!(
                "{}-byte response from display {}: {:?} [{}]",
                response.len(),
                self.address,
                response.text(self.encoding),
                hex::encode_upper(response.bytes())
            );
        }
        Ok(response)
    }

    pub fn is_open(&self) -> bool {
        self.transport.is_open()
    }

    pub fn close(&mut self) {
        self.transport.close();
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: Transport> Drop for LedDisplay<T> {
    fn drop(&mut self) {
        self.transport.close();
    }
}
