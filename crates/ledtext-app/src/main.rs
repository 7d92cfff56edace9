// ledtext -- send text to scrolling LED display boards over a serial link.
//
// Usage:
//   ledtext ports
//   ledtext encode "Motörhead - Ace of Spades"
//   ledtext --port /dev/cu.SLAB_USBtoUART send "Hello"
//   ledtext --port COM3 -v interactive
//   ledtext --port /dev/ttyUSB0 now-playing --player iTunes
//   ledtext --port /dev/ttyUSB0 log-tail ~/Library/VirtualDJ/Tracklisting/tracklist.txt

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use config::{AppConfig, Overrides, Settings};
use ledtext_codec::{CommandPacket, DeviceAddress};
use ledtext_core::{
    list_ports, run, InteractiveSource, LedDisplay, LogTailSource, NowPlayingSource,
    OsaScriptPlayer, SerialTransport, TextEncoding, TextSource,
};

/// Send text to serial LED display boards.
#[derive(Parser, Debug)]
#[command(name = "ledtext", version, about)]
struct Cli {
    /// Config file (default: <config dir>/ledtext/config.json).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Serial port path (e.g. /dev/ttyUSB0, /dev/cu.SLAB_USBtoUART, COM3).
    #[arg(long, global = true, env = "LEDTEXT_PORT")]
    port: Option<String>,

    /// Baud rate.
    #[arg(long, global = true)]
    baud: Option<u32>,

    /// Display address, decimal or 0x-prefixed hex (0-255).
    #[arg(long, global = true)]
    address: Option<DeviceAddress>,

    /// Response timeout in seconds (fractions allowed).
    #[arg(long, global = true)]
    timeout: Option<f64>,

    /// Control tags put in front of every message, e.g. "<L1><PA><FE>".
    #[arg(long, global = true, allow_hyphen_values = true)]
    tags: Option<String>,

    /// How to decode display responses: auto, ascii, windows-1252, utf-8.
    #[arg(long, global = true)]
    encoding: Option<TextEncoding>,

    /// Log frames and responses.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List serial ports.
    Ports,

    /// Print the packet for TEXT without opening a port.
    Encode { text: String },

    /// Send TEXT once and print the response.
    Send { text: String },

    /// Send every line typed on stdin.
    Interactive,

    /// Follow the track playing in a macOS media player.
    NowPlaying {
        /// AppleScript name of the player (Music, iTunes, Spotify).
        #[arg(long)]
        player: Option<String>,

        /// Seconds between polls.
        #[arg(long)]
        interval: Option<f64>,
    },

    /// Follow a DJ tracklist file and show each new entry.
    LogTail {
        file: PathBuf,

        /// Seconds between polls.
        #[arg(long)]
        interval: Option<f64>,
    },
}

impl Cli {
    fn overrides(&self) -> Overrides {
        let (interval_secs, player) = match &self.command {
            Command::NowPlaying { player, interval } => (*interval, player.clone()),
            Command::LogTail { interval, .. } => (*interval, None),
            _ => (None, None),
        };
        Overrides {
            port: self.port.clone(),
            baud: self.baud,
            address: self.address,
            timeout_secs: self.timeout,
            tags: self.tags.clone(),
            response_encoding: self.encoding,
            interval_secs,
            player,
        }
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "warn,ledtext=debug,ledtext_core=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let file = AppConfig::load(cli.config.as_deref())?;
    let settings = Settings::resolve(file, cli.overrides())?;

    match cli.command {
        Command::Ports => print_ports(),
        Command::Encode { text } => {
            let packet = CommandPacket::new(settings.address, &settings.tags.apply(&text));
            println!("{packet}");
            Ok(())
        }
        Command::Send { text } => {
            let mut display = open_display(&settings)?;
            let response = display.send(&text)?;
            if response.is_empty() {
                println!("no response");
            } else {
                println!(
                    "{}-byte response: {:?}",
                    response.len(),
                    response.text(settings.response_encoding)
                );
            }
            Ok(())
        }
        Command::Interactive => drive(&settings, InteractiveSource::stdin()),
        Command::NowPlaying { .. } => drive(
            &settings,
            NowPlayingSource::new(OsaScriptPlayer::new(settings.player.clone())),
        ),
        Command::LogTail { file, .. } => {
            let source = LogTailSource::new(&file)
                .with_context(|| format!("watching {}", file.display()))?;
            drive(&settings, source)
        }
    }
}

fn print_ports() -> Result<()> {
    let ports = list_ports();
    if ports.is_empty() {
        println!("no serial ports found");
    }
    for port in ports {
        println!("{port}");
    }
    Ok(())
}

fn open_display(settings: &Settings) -> Result<LedDisplay<SerialTransport>> {
    let serial = settings.serial_config()?;
    let display = LedDisplay::open(&serial, settings.address)?
        .with_tags(settings.tags.clone())
        .with_response_encoding(settings.response_encoding);
    Ok(display)
}

fn drive(settings: &Settings, mut source: impl TextSource) -> Result<()> {
    let mut display = open_display(settings)?;
    let stats = run(
        &mut display,
        &mut source,
        settings.interval,
        &crossbeam_channel::never(),
    )?;
    log::info!("sent {} messages, {} answered", stats.sent, stats.responses);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "ledtext", "send", "Hello", "--port", "/dev/ttyUSB0", "--address", "0x1F",
        ])
        .unwrap();
        assert_eq!(cli.port.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(cli.address, Some(DeviceAddress(0x1F)));
        assert!(matches!(cli.command, Command::Send { ref text } if text == "Hello"));
    }

    #[test]
    fn rejects_out_of_range_address() {
        assert!(Cli::try_parse_from(["ledtext", "--address", "256", "ports"]).is_err());
    }

    #[test]
    fn now_playing_options_reach_settings() {
        let cli = Cli::try_parse_from([
            "ledtext", "now-playing", "--player", "iTunes", "--interval", "2.5",
        ])
        .unwrap();
        let settings = Settings::resolve(AppConfig::default(), cli.overrides()).unwrap();
        assert_eq!(settings.player, "iTunes");
        assert_eq!(settings.interval, std::time::Duration::from_millis(2500));
    }

    #[test]
    fn encoding_flag_parses() {
        let cli = Cli::try_parse_from(["ledtext", "--encoding", "cp1252", "ports"]).unwrap();
        assert_eq!(cli.encoding, Some(TextEncoding::Windows1252));
    }
}
