use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

/// Once-per-second countdown task for a single question.
///
/// Sends the question's epoch on every tick. The task is aborted by
/// `cancel` or when the timer is dropped, so no tick is produced after the
/// question it belongs to has been answered or left.
#[derive(Debug)]
pub struct QuestionTimer {
    epoch: u64,
    handle: JoinHandle<()>,
}

impl QuestionTimer {
    pub const TICK: Duration = Duration::from_secs(1);

    /// Spawn a timer on the current tokio runtime.
    #[must_use]
    pub fn start(epoch: u64, ticks: mpsc::UnboundedSender<u64>) -> Self {
        Self::with_period(epoch, Self::TICK, ticks)
    }

    #[must_use]
    pub fn with_period(epoch: u64, period: Duration, ticks: mpsc::UnboundedSender<u64>) -> Self {
        let handle = tokio::spawn(async move {
            let mut clock = interval(period);
            clock.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            clock.tick().await;
            loop {
                clock.tick().await;
                if ticks.send(epoch).is_err() {
                    break;
                }
            }
        });
        Self { epoch, handle }
    }

    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn cancel(&self) {
        self.handle.abort();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for QuestionTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn ticks_once_per_second_with_epoch() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _timer = QuestionTimer::start(7, tx);

        tokio::time::sleep(Duration::from_millis(3_500)).await;
        let mut seen = Vec::new();
        while let Ok(epoch) = rx.try_recv() {
            seen.push(epoch);
        }
        assert_eq!(seen, [7, 7, 7]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_ticks() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let timer = QuestionTimer::start(1, tx);

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        timer.cancel();
        tokio::time::sleep(Duration::from_secs(5)).await;

        let mut count = 0;
        while rx.try_recv().is_ok() {
            count += 1;
        }
        assert_eq!(count, 1);
        assert!(timer.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn drop_aborts_task() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        drop(QuestionTimer::start(2, tx));

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(rx.try_recv().is_err());
    }
}
