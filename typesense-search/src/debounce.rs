//! Keystroke debouncer for incremental suggestions.
//!
//! Owns at most one pending timer. Each input change cancels the pending
//! timer and schedules a new one, so a burst of keystrokes produces a single
//! callback once typing pauses for the quiet period. Clearing the input
//! fires immediately so stale suggestions disappear without delay.

use std::time::Duration;
use tokio::task::JoinHandle;

/// What the debouncer hands to its callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSignal {
    /// The input is empty or whitespace-only; clear suggestions now.
    Empty,
    /// Typing paused with this (trimmed) text in the input.
    Settled(String),
}

/// Single-stream debouncer.
///
/// Must be used from within a tokio runtime: the quiet-period timer is a
/// spawned task. Dropping the debouncer cancels any pending callback.
#[derive(Debug)]
pub struct Debouncer {
    quiet_period: Duration,
    pending: Option<JoinHandle<()>>,
}

impl Debouncer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            pending: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Record an input change.
    ///
    /// Cancels any not-yet-fired callback, then either invokes `callback`
    /// with [`InputSignal::Empty`] right away (blank input) or schedules it
    /// with [`InputSignal::Settled`] after the quiet period.
    pub fn on_input_change<F>(&mut self, text: &str, callback: F)
    where
        F: FnOnce(InputSignal) + Send + 'static,
    {
        self.cancel();

        let text = text.trim();
        if text.is_empty() {
            callback(InputSignal::Empty);
            return;
        }

        let text = text.to_owned();
        let quiet_period = self.quiet_period;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            callback(InputSignal::Settled(text));
        }));
    }

    /// Cancel the pending callback, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Whether a callback is scheduled and has not fired yet.
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    const QUIET: Duration = Duration::from_millis(225);

    fn sender(tx: &mpsc::UnboundedSender<InputSignal>) -> impl FnOnce(InputSignal) + Send + 'static {
        let tx = tx.clone();
        move |signal| {
            let _ = tx.send(signal);
        }
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<InputSignal>) -> Vec<InputSignal> {
        let mut out = Vec::new();
        while let Ok(signal) = rx.try_recv() {
            out.push(signal);
        }
        out
    }

    #[tokio::test(start_paused = true)]
    async fn burst_collapses_to_last_input() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(QUIET);

        for text in ["h", "ha", "har", "harr"] {
            debouncer.on_input_change(text, sender(&tx));
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert!(drain(&mut rx).is_empty());

        tokio::time::sleep(QUIET).await;
        assert_eq!(drain(&mut rx), vec![InputSignal::Settled("harr".into())]);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn does_not_fire_before_quiet_period() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(QUIET);

        debouncer.on_input_change("dune", sender(&tx));
        tokio::time::sleep(QUIET - Duration::from_millis(1)).await;
        assert!(drain(&mut rx).is_empty());
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(drain(&mut rx), vec![InputSignal::Settled("dune".into())]);
    }

    #[tokio::test(start_paused = true)]
    async fn blank_input_fires_immediately_and_cancels_pending() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(QUIET);

        debouncer.on_input_change("a", sender(&tx));
        debouncer.on_input_change("   ", sender(&tx));
        assert_eq!(drain(&mut rx), vec![InputSignal::Empty]);
        assert!(!debouncer.is_pending());

        tokio::time::sleep(QUIET * 2).await;
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn settled_text_is_trimmed() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(QUIET);

        debouncer.on_input_change("  emma ", sender(&tx));
        tokio::time::sleep(QUIET * 2).await;
        assert_eq!(drain(&mut rx), vec![InputSignal::Settled("emma".into())]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_callback() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut debouncer = Debouncer::new(QUIET);

        debouncer.on_input_change("beloved", sender(&tx));
        debouncer.cancel();
        tokio::time::sleep(QUIET * 2).await;
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_cancels_pending_callback() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        {
            let mut debouncer = Debouncer::new(QUIET);
            debouncer.on_input_change("ulysses", sender(&tx));
        }
        tokio::time::sleep(QUIET * 2).await;
        assert!(drain(&mut rx).is_empty());
    }
}
