//! Dependency-keyed reactive stores.
//!
//! A [`Wired`] store holds the last fetched value for one dependency key
//! and notifies subscribers whenever the cached state is replaced. The
//! owner drives the fetch itself: [`Wired::rekey`] reports whether the
//! dependency changed (and therefore whether a refetch is due), and
//! [`Wired::publish`]/[`Wired::fail`] replace the state wholesale.

use tokio::sync::watch;

/// The cached state of a wired fetch.
#[derive(Debug, Clone, PartialEq)]
pub enum WireState<T> {
    /// No fetch has completed for the current key yet.
    Pending,
    /// The last fetch for the current key succeeded.
    Ready(T),
    /// The last fetch for the current key failed.
    Failed(String),
}

impl<T> WireState<T> {
    /// The ready value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            WireState::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// A reactive store keyed on a dependency value.
#[derive(Debug)]
pub struct Wired<K, T> {
    key: Option<K>,
    tx: watch::Sender<WireState<T>>,
}

impl<K: PartialEq, T: Clone> Wired<K, T> {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(WireState::Pending);
        Self { key: None, tx }
    }

    /// Replace the dependency key.
    ///
    /// Returns `true` when the key changed, which obliges the owner to
    /// re-invoke the fetch. An unchanged key is not refetched.
    pub fn rekey(&mut self, key: Option<K>) -> bool {
        if self.key == key {
            return false;
        }
        self.key = key;
        true
    }

    /// The current dependency key.
    pub fn key(&self) -> Option<&K> {
        self.key.as_ref()
    }

    /// Replace the cached state with a fresh value and notify subscribers.
    pub fn publish(&self, value: T) {
        self.tx.send_replace(WireState::Ready(value));
    }

    /// Record a fetch failure and notify subscribers.
    pub fn fail(&self, message: impl Into<String>) {
        self.tx.send_replace(WireState::Failed(message.into()));
    }

    /// Drop the cached state back to [`WireState::Pending`].
    pub fn reset(&self) {
        self.tx.send_replace(WireState::Pending);
    }

    /// Subscribe for state replacements.
    pub fn subscribe(&self) -> watch::Receiver<WireState<T>> {
        self.tx.subscribe()
    }

    /// A clone of the current cached state.
    pub fn state(&self) -> WireState<T> {
        self.tx.borrow().clone()
    }
}

impl<K: PartialEq, T: Clone> Default for Wired<K, T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_pending_and_unkeyed() {
        let wire: Wired<u32, Vec<String>> = Wired::new();
        assert!(wire.key().is_none());
        assert_eq!(wire.state(), WireState::Pending);
    }

    #[test]
    fn rekey_reports_changes_only() {
        let mut wire: Wired<u32, ()> = Wired::new();
        assert!(wire.rekey(Some(7)));
        assert!(!wire.rekey(Some(7)));
        assert!(wire.rekey(Some(8)));
        assert!(wire.rekey(None));
        assert!(!wire.rekey(None));
    }

    #[tokio::test]
    async fn publish_notifies_subscribers() {
        let wire: Wired<u32, Vec<u32>> = Wired::new();
        let mut rx = wire.subscribe();

        wire.publish(vec![1, 2, 3]);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), WireState::Ready(vec![1, 2, 3]));

        wire.fail("backend unavailable");
        rx.changed().await.unwrap();
        assert_eq!(
            *rx.borrow(),
            WireState::Failed("backend unavailable".to_string())
        );
    }

    #[test]
    fn value_accessor_only_for_ready() {
        let state: WireState<u32> = WireState::Ready(5);
        assert_eq!(state.value(), Some(&5));
        assert_eq!(WireState::<u32>::Pending.value(), None);
        assert_eq!(WireState::<u32>::Failed("x".into()).value(), None);
    }
}
