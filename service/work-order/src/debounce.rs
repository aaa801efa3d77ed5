use std::time::Duration;

use tokio::task::JoinHandle;

/// Quiet period of the list search box.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Emits the latest input once no further input arrived for `delay`.
///
/// Each `input` restarts the timer. Values come out of the receiver returned
/// by [`Debouncer::new`]; `cancel` or dropping the debouncer discards a
/// pending value.
pub struct Debouncer<T> {
    delay: Duration,
    sender: flume::Sender<T>,
    timer: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration) -> (Self, flume::Receiver<T>) {
        let (sender, receiver) = flume::unbounded();
        let debouncer = Self {
            delay,
            sender,
            timer: None,
        };
        (debouncer, receiver)
    }

    pub fn input(&mut self, value: T) {
        self.cancel();
        let sender = self.sender.clone();
        let delay = self.delay;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if sender.send(value).is_err() {
                tracing::trace!("Debounced value dropped, receiver closed");
            }
        }));
    }

    pub fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.timer.as_ref().is_some_and(|timer| !timer.is_finished())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn only_the_last_value_fires() {
        let (mut debouncer, values) = Debouncer::new(DEFAULT_DEBOUNCE);
        for text in ["p", "pu", "pum", "pump"] {
            debouncer.input(text.to_owned());
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        assert!(debouncer.is_pending());
        assert!(values.is_empty());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(values.recv_async().await.unwrap(), "pump");
        assert!(values.try_recv().is_err());
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_discards_pending_value() {
        let (mut debouncer, values) = Debouncer::new(Duration::from_millis(50));
        debouncer.input(1);
        debouncer.cancel();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(values.try_recv().is_err());
    }
}
