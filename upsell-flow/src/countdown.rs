//! Urgency countdown shown next to the offer.
//!
//! Purely cosmetic. Reaching zero does not expire the offer or touch the flow.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use upsell_store::app_config::CountdownConfig;

pub const DEFAULT_SECONDS: u32 = 300;

/// Seconds left, formatted `M:SS`
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
}

impl Countdown {
    pub fn new(seconds: u32) -> Self {
        Self { remaining: seconds }
    }

    /// Advance one second. Stays at zero once there.
    pub fn tick(&mut self) -> u32 {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_finished(&self) -> bool {
        self.remaining == 0
    }

    pub fn display(&self) -> String {
        format_clock(self.remaining)
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DEFAULT_SECONDS)
    }
}

/// A countdown ticking on its own task. Dropping the handle stops it.
pub struct CountdownHandle {
    rx: watch::Receiver<u32>,
    task: JoinHandle<()>,
}

impl CountdownHandle {
    pub fn start(seconds: u32) -> Self {
        let (tx, rx) = watch::channel(seconds);

        let task = tokio::spawn(async move {
            let mut countdown = Countdown::new(seconds);
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            // First tick fires immediately
            interval.tick().await;

            while !countdown.is_finished() {
                interval.tick().await;
                if tx.send(countdown.tick()).is_err() {
                    break;
                }
            }
        });

        Self { rx, task }
    }

    pub fn from_config(config: &CountdownConfig) -> Self {
        Self::start(config.seconds)
    }

    pub fn remaining(&self) -> u32 {
        *self.rx.borrow()
    }

    pub fn display(&self) -> String {
        format_clock(self.remaining())
    }

    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.rx.clone()
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
