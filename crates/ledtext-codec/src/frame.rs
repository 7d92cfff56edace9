//! Command packet framing.
//!
//! A packet looks like `<ID01>Hello42<E>`: the device address as two hex
//! digits, the sanitized payload, the XOR checksum of the payload as two hex
//! digits, then the end marker.

use std::fmt;

use crate::charmap;
use crate::DeviceAddress;

/// Marker closing every packet.
pub const END_MARKER: &str = "<E>";

/// XOR of every payload byte, seeded with zero.
pub fn checksum(payload: &[u8]) -> u8 {
    payload.iter().fold(0, |acc, &b| acc ^ b)
}

/// One framed message for a single display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandPacket {
    address: DeviceAddress,
    payload: String,
    checksum: u8,
}

impl CommandPacket {
    /// Sanitize `text` and frame it for `address`.
    ///
    /// The checksum covers the sanitized payload, i.e. exactly the bytes
    /// that go on the wire, so every character of a `<Uxx>` token counts.
    pub fn new(address: DeviceAddress, text: &str) -> Self {
        let payload = charmap::sanitize(text);
        debug_assert!(charmap::is_wire_safe(&payload), "non-ASCII left in {payload:?}");
        let checksum = checksum(payload.as_bytes());
        Self {
            address,
            payload,
            checksum,
        }
    }

    pub fn address(&self) -> DeviceAddress {
        self.address
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn checksum(&self) -> u8 {
        self.checksum
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }
}

impl fmt::Display for CommandPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<ID{}>{}{:02X}{}",
            self.address, self.payload, self.checksum, END_MARKER
        )
    }
}

/// Frame `text` for `address` and return the bytes to transmit.
pub fn encode(address: DeviceAddress, text: &str) -> Vec<u8> {
    CommandPacket::new(address, text).to_bytes()
}
