//! The tick source that drives a timer.
//!
//! A [`Ticker`] owns one background thread that emits a [`Tick`] on a
//! channel at a fixed interval until it is stopped. Stopping joins the
//! thread and is safe to repeat; dropping a ticker stops it.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::error::PomoError;

/// One cadence pulse, tagged with the ticker that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Generation of the emitting ticker
    pub generation: u64,
}

/// Handle to a running repeating task.
#[derive(Debug)]
pub struct Ticker {
    generation: u64,
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Spawn a ticker that sends a [`Tick`] every `interval`.
    ///
    /// The thread exits when the ticker is stopped or when the receiving
    /// end of `ticks` is gone.
    ///
    /// # Errors
    ///
    /// Returns `PomoError::Io` if the thread cannot be spawned.
    pub fn spawn(interval: Duration, generation: u64, ticks: Sender<Tick>) -> Result<Self, PomoError> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name(format!("pomo-ticker-{generation}"))
            .spawn(move || loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        if ticks.send(Tick { generation }).is_err() {
                            break;
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })?;

        tracing::debug!(generation, ?interval, "ticker started");

        Ok(Self {
            generation,
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Whether the ticker is still active.
    #[cfg(test)]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Stop the ticker and wait for its thread to exit.
    pub fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            // The thread may already be gone if the receiver was dropped
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!(generation = self.generation, "ticker thread panicked");
            } else {
                tracing::debug!(generation = self.generation, "ticker stopped");
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_emits_tagged_ticks() {
        let (tx, rx) = mpsc::channel();
        let mut ticker = Ticker::spawn(Duration::from_millis(1), 7, tx).unwrap();

        for _ in 0..3 {
            let tick = rx.recv_timeout(Duration::from_secs(2)).unwrap();
            assert_eq!(tick.generation, 7);
        }

        ticker.stop();
        assert!(!ticker.is_active());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let (tx, _rx) = mpsc::channel();
        let mut ticker = Ticker::spawn(Duration::from_millis(1), 1, tx).unwrap();

        ticker.stop();
        ticker.stop();
        assert!(!ticker.is_active());
    }

    #[test]
    fn test_no_ticks_after_stop() {
        let (tx, rx) = mpsc::channel();
        let mut ticker = Ticker::spawn(Duration::from_millis(1), 1, tx).unwrap();
        rx.recv_timeout(Duration::from_secs(2)).unwrap();

        ticker.stop();

        // Drain anything sent before the stop; afterwards the channel is closed
        loop {
            match rx.recv_timeout(Duration::from_secs(2)) {
                Ok(_) => continue,
                Err(e) => {
                    assert_eq!(e, RecvTimeoutError::Disconnected);
                    break;
                }
            }
        }
    }

    #[test]
    fn test_drop_stops_thread() {
        let (tx, rx) = mpsc::channel();
        {
            let _ticker = Ticker::spawn(Duration::from_millis(1), 3, tx).unwrap();
            rx.recv_timeout(Duration::from_secs(2)).unwrap();
        }

        while rx.recv_timeout(Duration::from_secs(2)).is_ok() {}
        assert_eq!(
            rx.recv_timeout(Duration::from_millis(10)),
            Err(RecvTimeoutError::Disconnected)
        );
    }

    #[test]
    fn test_thread_exits_when_receiver_dropped() {
        let (tx, rx) = mpsc::channel();
        let mut ticker = Ticker::spawn(Duration::from_millis(1), 1, tx).unwrap();
        drop(rx);

        // Join must not hang
        ticker.stop();
        assert!(!ticker.is_active());
    }
}
