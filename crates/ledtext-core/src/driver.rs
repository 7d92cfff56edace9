//! The polling loop that feeds a [`TextSource`] into a display.

use crossbeam_channel::{select, tick, Receiver};
use log::{debug, info};
use std::time::Duration;

use crate::display::LedDisplay;
use crate::error::Result;
use crate::source::{Poll, TextSource};
use crate::transport::Transport;

/// Counters reported when the loop ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub sent: usize,
    pub responses: usize,
}

/// Poll `source` until it finishes or `shutdown` fires, sending each new
/// text to `display` as it arrives.
///
/// When the source is idle the loop sleeps until the next tick of
/// `interval`. A disconnected `shutdown` channel counts as a shutdown
/// request; pass [`crossbeam_channel::never`] to run until the source ends.
/// The first transport error stops the loop and is returned.
pub fn run<T, S>(
    display: &mut LedDisplay<T>,
    source: &mut S,
    interval: Duration,
    shutdown: &Receiver<()>,
) -> Result<RunStats>
where
    T: Transport,
    S: TextSource + ?Sized,
{
    let ticker = tick(interval);
    let mut stats = RunStats::default();

    loop {
        if !shutdown.is_empty() {
            info!("shutdown requested");
            break;
        }
        match source.poll()? {
            Poll::Text(text) => {
                let response = display.send(&text)?;
                stats.sent += 1;
                if !response.is_empty() {
                    stats.responses += 1;
                }
            }
            Poll::Idle => {
                select! {
                    recv(ticker) -> _ => {}
                    recv(shutdown) -> _ => {
                        info!("shutdown requested");
                        break;
                    }
                }
            }
            Poll::Finished => {
                debug!("input source finished");
                break;
            }
        }
    }

    Ok(stats)
}
