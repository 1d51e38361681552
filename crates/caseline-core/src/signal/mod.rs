//! Outbound status signals.
//!
//! Cross-component signaling is explicit: the emitter owns a [`Signal`],
//! consumers hold `watch::Receiver`s or a [`WatchStream`]. No implicit
//! event dispatch.

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// A latched status value with change notification.
///
/// `set` only notifies when the value actually changes, so consumers
/// never observe redundant transitions.
#[derive(Debug)]
pub struct Signal<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone + PartialEq + Send + Sync + 'static> Signal<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Update the value, notifying subscribers only on change.
    pub fn set(&self, value: T) {
        self.tx.send_if_modified(|current| {
            if *current == value {
                false
            } else {
                *current = value;
                true
            }
        });
    }

    /// The current value.
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    /// Subscribe for changes.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Subscribe as a stream. The stream yields the current value first,
    /// then one item per change.
    pub fn stream(&self) -> WatchStream<T> {
        WatchStream::new(self.tx.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_returns_latest() {
        let signal = Signal::new(false);
        assert!(!signal.get());
        signal.set(true);
        assert!(signal.get());
    }

    #[tokio::test]
    async fn redundant_set_does_not_notify() {
        let signal = Signal::new(false);
        let mut rx = signal.subscribe();

        signal.set(false);
        assert!(!rx.has_changed().unwrap());

        signal.set(true);
        assert!(rx.has_changed().unwrap());
        rx.changed().await.unwrap();
        assert!(*rx.borrow());
    }

    #[tokio::test]
    async fn stream_yields_current_then_changes() {
        use futures::StreamExt;

        let signal = Signal::new(0u32);
        let mut stream = signal.stream();

        assert_eq!(stream.next().await, Some(0));
        signal.set(3);
        assert_eq!(stream.next().await, Some(3));
    }
}
