//! Serial port transport for the display boards.
//!
//! The boards listen at 9600 baud, 8 data bits, no parity, one stop bit and
//! no flow control. Every transaction is a blocking write followed by reads
//! until the response buffer fills or the configured timeout runs out.

use log::info;
use serialport::{SerialPort, SerialPortInfo};
use std::io::{self, Read, Write};
use std::time::{Duration, Instant};

use crate::error::{Error, Result};
use crate::transport::Transport;

#[derive(Debug, Clone)]
pub struct PortInfo {
    pub port_name: String,
    pub port_type: String,
    pub vid: Option<u16>,
    pub pid: Option<u16>,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
}

impl From<SerialPortInfo> for PortInfo {
    fn from(info: SerialPortInfo) -> Self {
        let (port_type, vid, pid, manufacturer, product) = match info.port_type {
            serialport::SerialPortType::UsbPort(usb) => {
                ("USB", Some(usb.vid), Some(usb.pid), usb.manufacturer, usb.product)
            }
            serialport::SerialPortType::PciPort => ("PCI", None, None, None, None),
            serialport::SerialPortType::BluetoothPort => ("Bluetooth", None, None, None, None),
            serialport::SerialPortType::Unknown => ("Unknown", None, None, None, None),
        };
        Self {
            port_name: info.port_name,
            port_type: port_type.to_string(),
            vid,
            pid,
            manufacturer,
            product,
        }
    }
}

impl std::fmt::Display for PortInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.port_name, self.port_type)?;
        if let (Some(vid), Some(pid)) = (self.vid, self.pid) {
            write!(f, " {vid:04X}:{pid:04X}")?;
        }
        for detail in [&self.manufacturer, &self.product].into_iter().flatten() {
            write!(f, " {detail}")?;
        }
        Ok(())
    }
}

pub fn list_ports() -> Vec<PortInfo> {
    serialport::available_ports()
        .unwrap_or_default()
        .into_iter()
        .map(PortInfo::from)
        .collect()
}

#[derive(Debug, Clone)]
pub struct SerialConfig {
    pub port_name: String,
    pub baud_rate: u32,
    pub data_bits: serialport::DataBits,
    pub parity: serialport::Parity,
    pub stop_bits: serialport::StopBits,
    pub flow_control: serialport::FlowControl,
    pub timeout: Duration,
    pub response_len: usize,
}

impl SerialConfig {
    pub fn new(port_name: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            ..Default::default()
        }
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port_name: String::new(),
            baud_rate: 9600,
            data_bits: serialport::DataBits::Eight,
            parity: serialport::Parity::None,
            stop_bits: serialport::StopBits::One,
            flow_control: serialport::FlowControl::None,
            timeout: Duration::from_millis(100),
            response_len: 100,
        }
    }
}

pub struct SerialTransport {
    port: Option<Box<dyn SerialPort>>,
    port_name: String,
    timeout: Duration,
    response_len: usize,
}

impl SerialTransport {
    pub fn open(cfg: &SerialConfig) -> Result<Self> {
        let port = serialport::new(&cfg.port_name, cfg.baud_rate)
            .data_bits(cfg.data_bits)
            .parity(cfg.parity)
            .stop_bits(cfg.stop_bits)
            .flow_control(cfg.flow_control)
            .timeout(cfg.timeout)
            .open()
            .map_err(|source| Error::DeviceOpen {
                port: cfg.port_name.clone(),
                source,
            })?;
        info!("opened {} at {} baud", cfg.port_name, cfg.baud_rate);
        Self::from_port(port, cfg)
    }

    /// Wrap a port opened elsewhere, applying the timeout from `cfg`.
    pub fn from_port(mut port: Box<dyn SerialPort>, cfg: &SerialConfig) -> Result<Self> {
        port.set_timeout(cfg.timeout).map_err(io::Error::from)?;
        let port_name = port.name().unwrap_or_else(|| cfg.port_name.clone());
        Ok(Self {
            port: Some(port),
            port_name,
            timeout: cfg.timeout,
            response_len: cfg.response_len.max(1),
        })
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

impl Transport for SerialTransport {
    fn transact(&mut self, request: &[u8]) -> Result<Vec<u8>> {
        let port = self.port.as_mut().ok_or(Error::Closed)?;
        port.write_all(request)?;
        port.flush()?;

        // The board may answer in several chunks; the timeout covers them all.
        let deadline = Instant::now() + self.timeout;
        let mut buf = vec![0u8; self.response_len];
        let mut filled = 0;
        while filled < buf.len() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            port.set_timeout(remaining).map_err(io::Error::from)?;
            match port.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::TimedOut => break,
                Err(e) => return Err(e.into()),
            }
        }
        buf.truncate(filled);
        Ok(buf)
    }

    fn close(&mut self) {
        if self.port.take().is_some() {
            info!("closed {}", self.port_name);
        }
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        self.close();
    }
}
