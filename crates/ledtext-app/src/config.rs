//! Settings file and its merge with command line flags.

use anyhow::{bail, Context, Result};
use ledtext_codec::{ControlTags, DeviceAddress};
use ledtext_core::{SerialConfig, TextEncoding};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: f64 = 0.1;
pub const DEFAULT_INTERVAL_SECS: f64 = 1.0;
pub const DEFAULT_PLAYER: &str = "Music";

/// Contents of `config.json`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub port: Option<String>,
    pub baud: Option<u32>,
    pub address: Option<DeviceAddress>,
    pub timeout_secs: Option<f64>,
    pub tags: Option<ControlTags>,
    pub response_encoding: Option<TextEncoding>,
    pub interval_secs: Option<f64>,
    pub player: Option<String>,
}

/// `<config dir>/ledtext/config.json`, if the platform has a config dir.
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ledtext").join("config.json"))
}

impl AppConfig {
    /// Load `explicit` (which must exist) or the default file (which may not).
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match default_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };
        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }
}

/// Flags that override the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub port: Option<String>,
    pub baud: Option<u32>,
    pub address: Option<DeviceAddress>,
    pub timeout_secs: Option<f64>,
    pub tags: Option<String>,
    pub response_encoding: Option<TextEncoding>,
    pub interval_secs: Option<f64>,
    pub player: Option<String>,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub port: Option<String>,
    pub baud: u32,
    pub address: DeviceAddress,
    pub timeout: Duration,
    pub tags: ControlTags,
    pub response_encoding: TextEncoding,
    pub interval: Duration,
    pub player: String,
}

impl Settings {
    pub fn resolve(file: AppConfig, flags: Overrides) -> Result<Self> {
        let timeout_secs = flags
            .timeout_secs
            .or(file.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let interval_secs = flags
            .interval_secs
            .or(file.interval_secs)
            .unwrap_or(DEFAULT_INTERVAL_SECS);

        Ok(Self {
            port: flags.port.or(file.port),
            baud: flags.baud.or(file.baud).unwrap_or(9600),
            address: flags.address.or(file.address).unwrap_or_default(),
            timeout: seconds("timeout", timeout_secs)?,
            tags: flags.tags.map(ControlTags::new).or(file.tags).unwrap_or_default(),
            response_encoding: flags
                .response_encoding
                .or(file.response_encoding)
                .unwrap_or_default(),
            interval: seconds("interval", interval_secs)?,
            player: flags
                .player
                .or(file.player)
                .unwrap_or_else(|| DEFAULT_PLAYER.to_string()),
        })
    }

    pub fn serial_config(&self) -> Result<SerialConfig> {
        let Some(port) = &self.port else {
            bail!("no serial port given; pass --port or set \"port\" in the config file");
        };
        Ok(SerialConfig {
            baud_rate: self.baud,
            timeout: self.timeout,
            ..SerialConfig::new(port.clone())
        })
    }
}

fn seconds(name: &str, value: f64) -> Result<Duration> {
    if value <= 0.0 {
        bail!("{name} must be positive, got {value}");
    }
    Duration::try_from_secs_f64(value).with_context(|| format!("invalid {name} {value}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file_or_flags() {
        let settings = Settings::resolve(AppConfig::default(), Overrides::default()).unwrap();
        assert_eq!(settings.port, None);
        assert_eq!(settings.baud, 9600);
        assert_eq!(settings.address, DeviceAddress(1));
        assert_eq!(settings.timeout, Duration::from_millis(100));
        assert_eq!(settings.tags.as_str(), ControlTags::DEFAULT);
        assert_eq!(settings.interval, Duration::from_secs(1));
        assert_eq!(settings.player, "Music");
        assert!(settings.serial_config().is_err());
    }

    #[test]
    fn flags_win_over_file() {
        let file = AppConfig {
            port: Some("/dev/cu.SLAB_USBtoUART".into()),
            address: Some(DeviceAddress(3)),
            timeout_secs: Some(0.5),
            tags: Some(ControlTags::new("<L2>")),
            ..Default::default()
        };
        let flags = Overrides {
            address: Some(DeviceAddress(9)),
            tags: Some(String::new()),
            ..Default::default()
        };
        let settings = Settings::resolve(file, flags).unwrap();
        assert_eq!(settings.address, DeviceAddress(9));
        assert_eq!(settings.tags.as_str(), "");
        assert_eq!(settings.timeout, Duration::from_millis(500));

        let serial = settings.serial_config().unwrap();
        assert_eq!(serial.port_name, "/dev/cu.SLAB_USBtoUART");
        assert_eq!(serial.baud_rate, 9600);
        assert_eq!(serial.timeout, Duration::from_millis(500));
    }

    #[test]
    fn bad_timeouts_are_rejected() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let flags = Overrides {
                timeout_secs: Some(bad),
                ..Default::default()
            };
            assert!(Settings::resolve(AppConfig::default(), flags).is_err(), "{bad}");
        }
    }

    #[test]
    fn load_reads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "port": "COM3", "address": 2, "tags": "<L1><PB>", "response_encoding": "windows1252" }"#,
        )
        .unwrap();
        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.port.as_deref(), Some("COM3"));
        assert_eq!(config.address, Some(DeviceAddress(2)));
        assert_eq!(config.tags, Some(ControlTags::new("<L1><PB>")));
        assert_eq!(config.response_encoding, Some(TextEncoding::Windows1252));
    }

    #[test]
    fn load_rejects_bad_address_and_unknown_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "address": 300 }"#).unwrap();
        assert!(AppConfig::load(Some(&path)).is_err());
        std::fs::write(&path, r#"{ "device": "COM3" }"#).unwrap();
        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("nope.json"))).is_err());
    }
}
