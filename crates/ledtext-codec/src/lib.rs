//! Wire format for serial LED display boards: character mapping, command
//! framing and checksums. Pure functions only, no I/O.

pub mod charmap;
pub mod frame;

pub use charmap::sanitize;
pub use frame::{checksum, encode, CommandPacket};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors raised while building codec configuration values.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("device address {0} is outside 0-255")]
    OutOfRange(i64),
    #[error("invalid device address {0:?}")]
    Invalid(String),
}

/// Bus address of one display. Shown on the wire as two uppercase hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceAddress(pub u8);

impl DeviceAddress {
    /// Factory default address of every supported board.
    pub const DEFAULT: DeviceAddress = DeviceAddress(1);
}

impl Default for DeviceAddress {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<u8> for DeviceAddress {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

impl TryFrom<i64> for DeviceAddress {
    type Error = AddressError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map(Self)
            .map_err(|_| AddressError::OutOfRange(value))
    }
}

impl FromStr for DeviceAddress {
    type Err = AddressError;

    /// Accepts decimal (`"1"`, `"255"`) or `0x`-prefixed hex (`"0x1F"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            Some(hex) => i64::from_str_radix(hex, 16),
            None => s.parse::<i64>(),
        };
        let value = parsed.map_err(|_| AddressError::Invalid(s.to_string()))?;
        Self::try_from(value)
    }
}

impl fmt::Display for DeviceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}", self.0)
    }
}

/// Display-control tags prefixed to every message (line, page, effect, speed).
///
/// The string is vendor defined and passed to the board verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControlTags(String);

impl ControlTags {
    /// Line 1, page A, then the effect and speed tags the boards ship with.
    pub const DEFAULT: &'static str = "<L1><PA><FE><MQ><WC><FA>";

    pub fn new(tags: impl Into<String>) -> Self {
        Self(tags.into())
    }

    /// No tags at all; the board keeps whatever page settings it has.
    pub fn none() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `text` with the tags in front, ready for [`encode`].
    pub fn apply(&self, text: &str) -> String {
        let mut out = String::with_capacity(self.0.len() + text.len());
        out.push_str(&self.0);
        out.push_str(text);
        out
    }
}

impl Default for ControlTags {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_formats_as_two_hex_digits() {
        assert_eq!(DeviceAddress(1).to_string(), "01");
        assert_eq!(DeviceAddress(0x1F).to_string(), "1F");
        assert_eq!(DeviceAddress(255).to_string(), "FF");
    }

    #[test]
    fn address_parses_decimal_and_hex() {
        assert_eq!("7".parse(), Ok(DeviceAddress(7)));
        assert_eq!(" 255 ".parse(), Ok(DeviceAddress(255)));
        assert_eq!("0x1f".parse(), Ok(DeviceAddress(0x1F)));
    }

    #[test]
    fn address_exposes_raw_byte() {
        assert_eq!(DeviceAddress::DEFAULT.0, 1);
        assert_eq!(DeviceAddress::from(0xA5).0, 0xA5);
    }

    #[test]
    fn address_out_of_range_is_rejected() {
        assert_eq!("256".parse::<DeviceAddress>(), Err(AddressError::OutOfRange(256)));
        assert_eq!(DeviceAddress::try_from(-1i64), Err(AddressError::OutOfRange(-1)));
        assert!(matches!("one".parse::<DeviceAddress>(), Err(AddressError::Invalid(_))));
    }

    #[test]
    fn address_deserialize_checks_range() {
        let ok: DeviceAddress = serde_json::from_str("12").unwrap();
        assert_eq!(ok, DeviceAddress(12));
        assert!(serde_json::from_str::<DeviceAddress>("300").is_err());
    }

    #[test]
    fn tags_prefix_text() {
        assert_eq!(ControlTags::default().apply("Hi"), "<L1><PA><FE><MQ><WC><FA>Hi");
        assert_eq!(ControlTags::none().apply("Hi"), "Hi");
        assert_eq!(ControlTags::new("<L2>").as_str(), "<L2>");
    }
}
