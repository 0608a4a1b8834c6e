//! Subscriptions: per-consumer cursors into a repository's publications.
//!
//! Every subscription owns a single-slot view of the published state. The
//! repository overwrites the slot on each publication and never waits for a
//! consumer, so a slow consumer skips intermediate states but always sees the
//! latest one, in publication order.

use crate::core::State;
use crate::repository::engine::Inner;
use crate::repository::lifecycle::Detach;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::warn;
use uuid::Uuid;

/// Identity of a single subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Content of the published cell.
#[derive(Debug)]
pub(crate) enum Slot<S> {
    /// Repository is not active
    Vacant,
    Occupied(Arc<S>),
    /// Repository was shut down; keeps the state current at that moment
    Closed(Option<Arc<S>>),
}

impl<S> Slot<S> {
    pub(crate) fn state(&self) -> Option<Arc<S>> {
        match self {
            Self::Occupied(state) => Some(Arc::clone(state)),
            Self::Vacant | Self::Closed(_) => None,
        }
    }
}

impl<S> Clone for Slot<S> {
    fn clone(&self) -> Self {
        match self {
            Self::Vacant => Self::Vacant,
            Self::Occupied(state) => Self::Occupied(Arc::clone(state)),
            Self::Closed(last) => Self::Closed(last.clone()),
        }
    }
}

/// A live subscription to a [`StateRepository`](crate::repository::StateRepository).
///
/// The first value is the state that was current when the subscription was
/// created. After that, [`recv`](Subscription::recv) yields each newly
/// published state; if several were published since the last call only the
/// latest is returned. `recv` returns `None` once the repository is shut
/// down.
///
/// Dropping a subscription detaches it. When the last subscription detaches
/// the repository deactivates; [`unsubscribe`](Subscription::unsubscribe)
/// waits for that teardown, while a plain drop schedules it on the current
/// tokio runtime.
pub struct Subscription<S: State> {
    id: SubscriptionId,
    receiver: watch::Receiver<Slot<S>>,
    pending: Option<Arc<S>>,
    last_seen: Option<Arc<S>>,
    closed: bool,
    attached: bool,
    repository: Arc<Inner<S>>,
}

impl<S: State> Subscription<S> {
    pub(crate) fn new(
        id: SubscriptionId,
        mut receiver: watch::Receiver<Slot<S>>,
        repository: Arc<Inner<S>>,
    ) -> Self {
        let joined = receiver.borrow_and_update().clone();
        let closed = matches!(joined, Slot::Closed(_));
        Self {
            id,
            receiver,
            pending: joined.state(),
            last_seen: None,
            closed,
            attached: true,
            repository,
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Wait for the next state.
    ///
    /// Cancel-safe: dropping the future loses no state.
    pub async fn recv(&mut self) -> Option<Arc<S>> {
        if let Some(state) = self.pending.take() {
            return Some(self.deliver(state));
        }
        while !self.closed {
            if self.receiver.changed().await.is_err() {
                self.closed = true;
                break;
            }
            let slot = self.receiver.borrow_and_update().clone();
            if let Some(state) = self.accept(slot) {
                return Some(state);
            }
        }
        None
    }

    /// Take the next state if one is ready, without waiting.
    pub fn try_recv(&mut self) -> Option<Arc<S>> {
        if let Some(state) = self.pending.take() {
            return Some(self.deliver(state));
        }
        if self.closed {
            return None;
        }
        match self.receiver.has_changed() {
            Ok(true) => {}
            Ok(false) => return None,
            Err(_) => {
                self.closed = true;
                return None;
            }
        }
        let slot = self.receiver.borrow_and_update().clone();
        self.accept(slot)
    }

    /// The latest published state, without consuming anything.
    pub fn latest(&self) -> Option<Arc<S>> {
        self.receiver.borrow().state()
    }

    /// Whether the repository has been shut down and no value is left to read.
    pub fn is_closed(&self) -> bool {
        self.closed && self.pending.is_none()
    }

    /// Adapt into a [`Stream`] of states that ends when the repository shuts
    /// down. Dropping the stream detaches the subscription.
    pub fn into_stream(self) -> impl Stream<Item = Arc<S>> + Send + 'static {
        futures::stream::unfold(self, |mut subscription| async move {
            let state = subscription.recv().await?;
            Some((state, subscription))
        })
    }

    /// Detach from the repository. If this was the last subscription, waits
    /// until the repository has deactivated.
    pub async fn unsubscribe(mut self) {
        self.attached = false;
        let repository = Arc::clone(&self.repository);
        let id = self.id;
        drop(self);

        if repository.detach(id) != Detach::LastSubscriber {
            return;
        }
        if repository.in_own_hook() {
            // Waiting here would wait on the transition running this hook.
            tokio::spawn(repository.deactivate());
        } else {
            repository.deactivate().await;
        }
    }

    fn accept(&mut self, slot: Slot<S>) -> Option<Arc<S>> {
        match slot {
            Slot::Occupied(state) => Some(self.deliver(state)),
            Slot::Closed(last) => {
                self.closed = true;
                // The final state is delivered even if shutdown followed it
                // before this subscriber read it.
                let unseen = last.filter(|state| {
                    !self
                        .last_seen
                        .as_ref()
                        .is_some_and(|seen| Arc::ptr_eq(seen, state))
                });
                unseen.map(|state| self.deliver(state))
            }
            Slot::Vacant => None,
        }
    }

    fn deliver(&mut self, state: Arc<S>) -> Arc<S> {
        self.last_seen = Some(Arc::clone(&state));
        state
    }
}

impl<S: State> fmt::Debug for Subscription<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("repository", &self.repository.name())
            .field("closed", &self.closed)
            .finish()
    }
}

impl<S: State> Drop for Subscription<S> {
    fn drop(&mut self) {
        if !self.attached {
            return;
        }
        if self.repository.detach(self.id) != Detach::LastSubscriber {
            return;
        }
        match Handle::try_current() {
            Ok(handle) => {
                handle.spawn(Arc::clone(&self.repository).deactivate());
            }
            Err(_) => warn!(
                repository = %self.repository.name(),
                "last subscription dropped outside a tokio runtime, deactivation skipped"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::repository::{RepositoryStatus, StateRepository};
    use crate::state_enum;
    use futures::StreamExt;
    use std::sync::Arc;

    state_enum! {
        enum Location {
            Unknown,
            Available,
            Unavailable,
        }
    }

    #[tokio::test]
    async fn first_value_is_state_at_join_time() {
        let repository = StateRepository::new(|| Location::Unknown);
        let mut early = repository.subscribe().unwrap();

        repository.change_state(|_| Location::Available).await.unwrap();
        let mut late = repository.subscribe().unwrap();
        repository.change_state(|_| Location::Unavailable).await.unwrap();

        assert_eq!(*early.recv().await.unwrap(), Location::Unknown);
        assert_eq!(*late.recv().await.unwrap(), Location::Available);
        assert_eq!(*late.recv().await.unwrap(), Location::Unavailable);
    }

    #[tokio::test]
    async fn slow_subscriber_coalesces_to_latest() {
        let repository = StateRepository::new(|| Location::Unknown);
        let mut subscription = repository.subscribe().unwrap();
        assert_eq!(*subscription.recv().await.unwrap(), Location::Unknown);

        repository.change_state(|_| Location::Available).await.unwrap();
        repository.change_state(|_| Location::Unavailable).await.unwrap();

        assert_eq!(*subscription.recv().await.unwrap(), Location::Unavailable);
        assert!(subscription.try_recv().is_none());
    }

    #[tokio::test]
    async fn try_recv_does_not_wait() {
        let repository = StateRepository::new(|| Location::Unknown);
        let mut subscription = repository.subscribe().unwrap();

        assert_eq!(*subscription.try_recv().unwrap(), Location::Unknown);
        assert!(subscription.try_recv().is_none());

        repository.change_state(|_| Location::Available).await.unwrap();
        assert_eq!(*subscription.try_recv().unwrap(), Location::Available);
    }

    #[tokio::test]
    async fn latest_peeks_without_consuming() {
        let repository = StateRepository::new(|| Location::Unknown);
        let mut subscription = repository.subscribe().unwrap();
        repository.change_state(|_| Location::Available).await.unwrap();

        assert_eq!(subscription.latest().as_deref(), Some(&Location::Available));
        assert_eq!(*subscription.recv().await.unwrap(), Location::Unknown);
        assert_eq!(*subscription.recv().await.unwrap(), Location::Available);
    }

    #[tokio::test]
    async fn shutdown_ends_subscriptions() {
        let repository = StateRepository::new(|| Location::Unknown);
        let mut subscription = repository.subscribe().unwrap();
        assert!(subscription.recv().await.is_some());

        repository.shutdown().await.unwrap();

        assert!(subscription.recv().await.is_none());
        assert!(subscription.is_closed());
        assert!(subscription.try_recv().is_none());
    }

    #[tokio::test]
    async fn state_published_before_shutdown_is_not_lost() {
        let repository = StateRepository::new(|| Location::Unknown);
        let mut subscription = repository.subscribe().unwrap();
        assert_eq!(*subscription.recv().await.unwrap(), Location::Unknown);

        repository.change_state(|_| Location::Available).await.unwrap();
        repository.shutdown().await.unwrap();

        assert_eq!(*subscription.recv().await.unwrap(), Location::Available);
        assert!(subscription.recv().await.is_none());
    }

    #[tokio::test]
    async fn stream_yields_join_state_first() {
        let repository = StateRepository::new(|| Location::Unknown);
        let stream = repository.subscribe().unwrap().into_stream();

        repository.change_state(|_| Location::Available).await.unwrap();
        let first: Vec<Arc<Location>> = stream.take(1).collect().await;

        assert_eq!(*first[0], Location::Unknown);
    }

    #[tokio::test]
    async fn unsubscribe_of_last_subscriber_deactivates() {
        let repository = StateRepository::new(|| Location::Unknown);
        let first = repository.subscribe().unwrap();
        let second = repository.subscribe().unwrap();
        assert_eq!(repository.subscriber_count(), 2);

        first.unsubscribe().await;
        assert_eq!(repository.status(), RepositoryStatus::Active);

        repository.unsubscribe(second).await;
        assert_eq!(repository.status(), RepositoryStatus::Uninitialized);
        assert!(repository.current().is_none());
    }
}
