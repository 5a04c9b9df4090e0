use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

/// Events sent from the ticker thread to the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickEvent {
    /// Time to recompute clock-derived state such as deadline highlights.
    Tick(DateTime<Utc>),
}

/// A periodic timer on its own thread.
///
/// The thread only sends ticks; the consumer owns the tracker state and
/// recomputes on its own thread. Stopping is immediate: the thread waits on
/// its stop channel rather than sleeping out the interval.
pub struct DeadlineTicker {
    rx: mpsc::Receiver<TickEvent>,
    stop_tx: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl DeadlineTicker {
    /// Start ticking every `interval`
    pub fn start(interval: Duration) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("deadline-ticker".into())
            .spawn(move || {
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            if tx.send(TickEvent::Tick(Utc::now())).is_err() {
                                break;
                            }
                        }
                        // Stop requested, or the ticker was dropped
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                debug!("deadline ticker stopped");
            })?;

        Ok(DeadlineTicker {
            rx,
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Non-blocking poll for pending ticks (may be empty)
    pub fn poll(&self) -> Vec<TickEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.rx.try_recv() {
            events.push(evt);
        }
        events
    }

    /// Block until the next tick. `None` once the ticker has stopped.
    pub fn wait(&self) -> Option<TickEvent> {
        self.rx.recv().ok()
    }

    /// Stop the thread and wait for it to exit
    pub fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

impl Drop for DeadlineTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn delivers_ticks() {
        let ticker = DeadlineTicker::start(Duration::from_millis(10)).unwrap();
        let first = ticker.wait();
        assert!(matches!(first, Some(TickEvent::Tick(_))));
    }

    #[test]
    fn stop_does_not_wait_out_the_interval() {
        let mut ticker = DeadlineTicker::start(Duration::from_secs(3600)).unwrap();
        let started = Instant::now();
        ticker.stop();
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(!ticker.is_running());
        assert!(ticker.poll().is_empty());
        assert_eq!(ticker.wait(), None);
    }

    #[test]
    fn stop_twice_is_harmless() {
        let mut ticker = DeadlineTicker::start(Duration::from_millis(5)).unwrap();
        ticker.stop();
        ticker.stop();
    }
}
