//! Where display text comes from.
//!
//! Each source answers one question per poll: is there new text to show?
//! The [`driver`](crate::driver) loop turns the answers into `send` calls.

use log::warn;
use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::SystemTime;

use crate::encoding::TextEncoding;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Poll {
    /// New text for the display.
    Text(String),
    /// Nothing new; ask again after the poll interval.
    Idle,
    /// The source is exhausted.
    Finished,
}

pub trait TextSource {
    fn poll(&mut self) -> Result<Poll>;
}

/// Lines typed on a terminal (or piped in), one message per line.
pub struct InteractiveSource<R> {
    reader: R,
}

impl<R: BufRead> InteractiveSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl InteractiveSource<io::StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: BufRead> TextSource for InteractiveSource<R> {
    fn poll(&mut self) -> Result<Poll> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(Poll::Finished);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Poll::Text(line))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub artist: String,
    pub title: String,
}

impl std::fmt::Display for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.artist, self.title)
    }
}

/// Something that knows which song is playing.
pub trait NowPlaying {
    /// `None` when nothing is playing.
    fn current_track(&mut self) -> Result<Option<Track>>;
}

/// Asks a macOS media player through `osascript`.
#[derive(Debug, Clone)]
pub struct OsaScriptPlayer {
    application: String,
}

impl OsaScriptPlayer {
    pub fn new(application: impl Into<String>) -> Self {
        Self {
            application: application.into(),
        }
    }

    fn query(&self, property: &str) -> Result<String> {
        let script = format!(
            "tell application \"{}\" to get {} of current track",
            self.application, property
        );
        let output = Command::new("osascript").arg("-e").arg(&script).output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Source(format!(
                "osascript {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(stdout.trim_end_matches(['\r', '\n']).to_string())
    }
}

impl Default for OsaScriptPlayer {
    fn default() -> Self {
        Self::new("Music")
    }
}

impl NowPlaying for OsaScriptPlayer {
    fn current_track(&mut self) -> Result<Option<Track>> {
        let title = self.query("name")?;
        let artist = self.query("artist")?;
        if title.is_empty() && artist.is_empty() {
            return Ok(None);
        }
        Ok(Some(Track { artist, title }))
    }
}

/// Emits `"artist - title"` whenever the playing track changes.
pub struct NowPlayingSource<P> {
    player: P,
    last: Option<String>,
}

impl<P: NowPlaying> NowPlayingSource<P> {
    pub fn new(player: P) -> Self {
        Self { player, last: None }
    }
}

impl<P: NowPlaying> TextSource for NowPlayingSource<P> {
    fn poll(&mut self) -> Result<Poll> {
        let track = match self.player.current_track() {
            Ok(Some(track)) => track,
            Ok(None) => return Ok(Poll::Idle),
            Err(e) => {
                warn!("now playing query failed: {e}");
                return Ok(Poll::Idle);
            }
        };
        let line = track.to_string();
        if self.last.as_deref() == Some(line.as_str()) {
            return Ok(Poll::Idle);
        }
        self.last = Some(line.clone());
        Ok(Poll::Text(line))
    }
}

/// Separator between timestamp and track in a DJ tracklist line.
pub const TRACKLIST_DELIMITER: &str = " : ";

/// Text after the first [`TRACKLIST_DELIMITER`], or the whole line.
pub fn tracklist_entry(line: &str) -> &str {
    match line.find(TRACKLIST_DELIMITER) {
        Some(pos) => line[pos + TRACKLIST_DELIMITER.len()..].trim(),
        None => line.trim(),
    }
}

/// Follows a tracklist file and emits its newest entry each time it changes.
pub struct LogTailSource {
    path: PathBuf,
    modified: SystemTime,
}

impl LogTailSource {
    /// Starts from the file's current state; only later changes are emitted.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let modified = fs::metadata(&path)?.modified()?;
        Ok(Self { path, modified })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn last_entry(&self) -> Result<Option<String>> {
        let bytes = fs::read(&self.path)?;
        let text = TextEncoding::Auto.decode(&bytes);
        Ok(text
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .map(|line| tracklist_entry(line).to_string()))
    }
}

impl TextSource for LogTailSource {
    fn poll(&mut self) -> Result<Poll> {
        let modified = match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                // DJ software sometimes replaces the file instead of appending.
                warn!("{} is missing, waiting for it", self.path.display());
                return Ok(Poll::Idle);
            }
            Err(e) => return Err(e.into()),
        };
        if modified == self.modified {
            return Ok(Poll::Idle);
        }
        self.modified = modified;
        Ok(match self.last_entry()? {
            Some(entry) => Poll::Text(entry),
            None => Poll::Idle,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn interactive_yields_lines_then_finishes() {
        let mut source = InteractiveSource::new(Cursor::new("first\r\n\nlast"));
        assert_eq!(source.poll().unwrap(), Poll::Text("first".into()));
        assert_eq!(source.poll().unwrap(), Poll::Text(String::new()));
        assert_eq!(source.poll().unwrap(), Poll::Text("last".into()));
        assert_eq!(source.poll().unwrap(), Poll::Finished);
    }

    struct Scripted(Vec<Result<Option<Track>>>);

    impl NowPlaying for Scripted {
        fn current_track(&mut self) -> Result<Option<Track>> {
            if self.0.is_empty() {
                return Ok(None);
            }
            self.0.remove(0)
        }
    }

    fn track(artist: &str, title: &str) -> Result<Option<Track>> {
        Ok(Some(Track {
            artist: artist.into(),
            title: title.into(),
        }))
    }

    #[test]
    fn now_playing_only_reports_changes() {
        let mut source = NowPlayingSource::new(Scripted(vec![
            track("Daft Punk", "One More Time"),
            track("Daft Punk", "One More Time"),
            Err(Error::Source("player quit".into())),
            Ok(None),
            track("Röyksopp", "Eple"),
        ]));
        assert_eq!(source.poll().unwrap(), Poll::Text("Daft Punk - One More Time".into()));
        assert_eq!(source.poll().unwrap(), Poll::Idle);
        assert_eq!(source.poll().unwrap(), Poll::Idle);
        assert_eq!(source.poll().unwrap(), Poll::Idle);
        assert_eq!(source.poll().unwrap(), Poll::Text("Röyksopp - Eple".into()));
    }

    #[test]
    fn tracklist_entry_splits_on_delimiter() {
        assert_eq!(tracklist_entry("21:04 : Moby - Porcelain\n"), "Moby - Porcelain");
        assert_eq!(tracklist_entry("a : b : c"), "b : c");
        assert_eq!(tracklist_entry("  no delimiter here "), "no delimiter here");
    }

    #[test]
    fn missing_tracklist_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            LogTailSource::new(dir.path().join("tracklist.txt")),
            Err(Error::Io(_))
        ));
    }
}
