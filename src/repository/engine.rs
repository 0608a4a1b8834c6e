//! The state repository engine.
//!
//! A repository owns one current state, runs transitions strictly one at a
//! time, and republishes every new state to its subscriptions. Transitions
//! wait on a fair async mutex; once the lock is held the transition runs on
//! its own task so a caller that stops waiting cannot leave it half done.

use super::config::RepositoryConfig;
use super::error::{BoxError, HookPhase, RepositoryError};
use super::lifecycle::{
    Detach, LifecycleEvent, Registry, RepositoryId, RepositoryStats, RepositoryStatus,
};
use crate::builder::RepositoryBuilder;
use crate::core::{State, StateHistory, TransitionKind, TransitionRecord};
use crate::subscription::{Slot, Subscription, SubscriptionId};
use chrono::Utc;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::{broadcast, watch, Mutex as AsyncMutex};
use tokio::task::JoinHandle;
use tracing::{debug, debug_span, info, trace, warn, Instrument};

tokio::task_local! {
    /// Set while a task runs a transition (and its hooks) for a repository.
    static TRANSITION_OWNER: RepositoryId;
}

pub(crate) type InitialStateFn<S> = Box<dyn Fn() -> S + Send + Sync>;
pub(crate) type DeinitializeFn<S> = Arc<dyn Fn(&S) -> S + Send + Sync>;

/// Concurrent container for a single current state.
///
/// The repository is inert until first subscribed. The first subscriber
/// activates it (calling the initial state factory), the last one to leave
/// deactivates it, and [`shutdown`](StateRepository::shutdown) terminates it.
/// Handles are cheap to clone and share one underlying repository.
///
/// # Example
///
/// ```rust
/// use statehouse::repository::StateRepository;
/// use statehouse::state_enum;
///
/// state_enum! {
///     pub enum Permission {
///         Denied,
///         Allowed,
///     }
/// }
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), statehouse::repository::RepositoryError> {
/// let repository = StateRepository::new(|| Permission::Denied);
/// let mut subscription = repository.subscribe()?;
/// assert_eq!(*subscription.recv().await.unwrap(), Permission::Denied);
///
/// repository.change_state(|_| Permission::Allowed).await?;
/// assert_eq!(*subscription.recv().await.unwrap(), Permission::Allowed);
/// # Ok(())
/// # }
/// ```
pub struct StateRepository<S: State> {
    inner: Arc<Inner<S>>,
}

impl<S: State> Clone for StateRepository<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: State> fmt::Debug for StateRepository<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateRepository")
            .field("id", &self.inner.id)
            .field("name", &self.inner.config.name)
            .field("status", &self.status())
            .finish()
    }
}

impl<S: State> StateRepository<S> {
    /// Create a repository with the default configuration.
    pub fn new<F>(initial_state: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
    {
        Self::from_parts(RepositoryConfig::default(), Box::new(initial_state), None)
    }

    /// Start a builder for a configured repository.
    pub fn builder() -> RepositoryBuilder<S> {
        RepositoryBuilder::new()
    }

    pub(crate) fn from_parts(
        config: RepositoryConfig,
        initial_state: InitialStateFn<S>,
        deinitialize: Option<DeinitializeFn<S>>,
    ) -> Self {
        let (published, _) = watch::channel(Slot::Vacant);
        let (lifecycle, _) = broadcast::channel(config.lifecycle_capacity);
        let history = StateHistory::with_capacity(config.history_capacity);

        Self {
            inner: Arc::new(Inner {
                id: RepositoryId::new(),
                config,
                initial_state,
                deinitialize,
                transition_lock: Arc::new(AsyncMutex::new(())),
                activation: Mutex::new(()),
                published,
                registry: Mutex::new(Registry::new()),
                lifecycle,
                history: Mutex::new(history),
                sequence: AtomicU64::new(0),
            }),
        }
    }

    pub fn id(&self) -> RepositoryId {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.config.name
    }

    pub fn config(&self) -> &RepositoryConfig {
        &self.inner.config
    }

    /// The presently published state.
    ///
    /// Never waits for an in-flight transition: until that transition
    /// publishes, the state current before it started is returned. `None`
    /// while the repository is not active.
    pub fn current(&self) -> Option<Arc<S>> {
        self.inner.published.borrow().state()
    }

    pub fn status(&self) -> RepositoryStatus {
        self.inner.lock_registry().status
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.lock_registry().subscriber_count()
    }

    pub fn stats(&self) -> RepositoryStats {
        let registry = self.inner.lock_registry();
        RepositoryStats {
            name: self.inner.config.name.clone(),
            status: registry.status,
            subscribers: registry.subscriber_count(),
            activations: registry.activations,
            deactivations: registry.deactivations,
            transitions: self.inner.sequence.load(Ordering::SeqCst),
        }
    }

    /// Snapshot of the retained transition history.
    pub fn history(&self) -> StateHistory {
        self.inner.lock_history().clone()
    }

    /// Receive activation, deactivation and termination events.
    pub fn lifecycle_events(&self) -> broadcast::Receiver<LifecycleEvent> {
        self.inner.lifecycle.subscribe()
    }

    /// Attach a new subscriber.
    ///
    /// The first value the subscription yields is the state current at the
    /// moment it joined. If this is the first subscriber the repository
    /// activates, calling the initial state factory exactly once.
    ///
    /// The factory runs without the registry lock held, so it may query this
    /// repository (`status`, `stats`, `current`), but it must not subscribe
    /// to it.
    pub fn subscribe(&self) -> Result<Subscription<S>, RepositoryError> {
        let inner = &self.inner;
        let _activation = inner.lock_activation();

        let status = inner.lock_registry().status;
        let fresh = match status {
            RepositoryStatus::Terminated => return Err(inner.terminated()),
            RepositoryStatus::Uninitialized => Some(Arc::new((inner.initial_state)())),
            RepositoryStatus::Active | RepositoryStatus::Deactivating => None,
        };

        let mut registry = inner.lock_registry();
        if registry.status == RepositoryStatus::Terminated {
            return Err(inner.terminated());
        }
        if let Some(state) = fresh {
            inner.activate(&mut registry, state);
        }

        let id = SubscriptionId::new();
        registry.attach(id);
        let receiver = inner.published.subscribe();
        let subscribers = registry.subscriber_count();
        drop(registry);

        trace!(repository = %inner.config.name, subscription = %id, subscribers, "subscribed");
        Ok(Subscription::new(id, receiver, Arc::clone(inner)))
    }

    /// Detach a subscription; equivalent to [`Subscription::unsubscribe`].
    pub async fn unsubscribe(&self, subscription: Subscription<S>) {
        subscription.unsubscribe().await;
    }

    /// Replace the current state with `transition(current)`.
    ///
    /// Waits for every earlier transition to finish, then runs the hook
    /// protocol described on [`State`]. Returns the published state.
    pub async fn change_state<F>(&self, transition: F) -> Result<Arc<S>, RepositoryError>
    where
        F: FnOnce(&S) -> S + Send + 'static,
    {
        self.transition(TransitionKind::Requested, move |old: &Arc<S>| {
            Ok(Arc::new(transition(&**old)))
        })
        .await
    }

    /// Like [`change_state`](Self::change_state) but the transition works on
    /// shared handles, so it can return the current `Arc` unchanged.
    pub async fn update<F>(&self, transition: F) -> Result<Arc<S>, RepositoryError>
    where
        F: FnOnce(&Arc<S>) -> Arc<S> + Send + 'static,
    {
        self.transition(TransitionKind::Requested, move |old: &Arc<S>| {
            Ok(transition(old))
        })
        .await
    }

    /// Run a fallible transition. An `Err` aborts the transition: nothing is
    /// published and the current state is kept.
    pub async fn try_change_state<F, E>(&self, transition: F) -> Result<Arc<S>, RepositoryError>
    where
        F: FnOnce(&S) -> Result<S, E> + Send + 'static,
        E: Into<BoxError>,
    {
        self.transition(TransitionKind::Requested, move |old: &Arc<S>| {
            transition(&**old).map(Arc::new).map_err(Into::into)
        })
        .await
    }

    /// Queue a transition on a new task and return immediately.
    ///
    /// This is how a hook requests a follow-up transition on its own
    /// repository: the request runs after the current transition releases
    /// the lock.
    pub fn enqueue_change<F>(&self, transition: F) -> JoinHandle<Result<Arc<S>, RepositoryError>>
    where
        F: FnOnce(&S) -> S + Send + 'static,
    {
        let repository = self.clone();
        tokio::spawn(async move { repository.change_state(transition).await })
    }

    /// Terminate the repository.
    ///
    /// Waits for an in-flight transition, runs the deinitialize transition if
    /// the repository is active, then closes every subscription. Later calls
    /// to `subscribe` and `change_state` fail with
    /// [`RepositoryError::Terminated`]. Calling it again is a no-op.
    pub async fn shutdown(&self) -> Result<(), RepositoryError> {
        let inner = Arc::clone(&self.inner);
        if inner.in_own_hook() {
            return Err(inner.reentrant());
        }

        let guard = Arc::clone(&inner.transition_lock).lock_owned().await;
        let id = inner.id;
        let span = debug_span!("shutdown", repository = %inner.config.name);
        let task_inner = Arc::clone(&inner);
        let task = tokio::spawn(
            TRANSITION_OWNER
                .scope(id, async move {
                    task_inner.shutdown_locked().await;
                    drop(guard);
                })
                .instrument(span),
        );
        task.await.map_err(|_| inner.panicked())
    }

    async fn transition<F>(&self, kind: TransitionKind, transition: F) -> Result<Arc<S>, RepositoryError>
    where
        F: FnOnce(&Arc<S>) -> Result<Arc<S>, BoxError> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        if inner.in_own_hook() {
            return Err(inner.reentrant());
        }
        let terminated = inner.lock_registry().status == RepositoryStatus::Terminated;
        if terminated {
            return Err(inner.terminated());
        }

        // Cancelling the caller here leaves nothing acquired.
        let guard = Arc::clone(&inner.transition_lock).lock_owned().await;

        let id = inner.id;
        let span = debug_span!("transition", repository = %inner.config.name, ?kind);
        let task_inner = Arc::clone(&inner);
        let task = tokio::spawn(
            TRANSITION_OWNER
                .scope(id, async move {
                    let result = task_inner.apply_locked(kind, transition).await;
                    drop(guard);
                    result
                })
                .instrument(span),
        );

        match task.await {
            Ok(result) => result,
            Err(_) => Err(inner.panicked()),
        }
    }
}

/// Shared repository state behind every handle and subscription.
pub(crate) struct Inner<S: State> {
    id: RepositoryId,
    config: RepositoryConfig,
    initial_state: InitialStateFn<S>,
    deinitialize: Option<DeinitializeFn<S>>,
    /// Serialization lock: held from `before_creating_new_state` through
    /// `after_new_state_is_set`.
    transition_lock: Arc<AsyncMutex<()>>,
    /// Held while leaving or entering `Uninitialized`, including the
    /// `initial_state` call, so the factory runs at most once per activation.
    activation: Mutex<()>,
    /// Current state cell. Written only under `transition_lock`, or during
    /// activation while no state exists to transition from.
    published: watch::Sender<Slot<S>>,
    /// Narrower lock for subscriber bookkeeping.
    registry: Mutex<Registry>,
    lifecycle: broadcast::Sender<LifecycleEvent>,
    history: Mutex<StateHistory>,
    sequence: AtomicU64,
}

impl<S: State> Inner<S> {
    pub(crate) fn name(&self) -> &str {
        &self.config.name
    }

    pub(crate) fn detach(&self, id: SubscriptionId) -> Detach {
        let mut registry = self.lock_registry();
        let detach = registry.detach(id);
        trace!(
            repository = %self.config.name,
            subscription = %id,
            subscribers = registry.subscriber_count(),
            "unsubscribed"
        );
        detach
    }

    /// Whether the current task is running a transition of this repository.
    pub(crate) fn in_own_hook(&self) -> bool {
        TRANSITION_OWNER
            .try_with(|owner| *owner == self.id)
            .unwrap_or(false)
    }

    /// Tear down after the last subscriber left.
    pub(crate) async fn deactivate(self: Arc<Self>) {
        let guard = Arc::clone(&self.transition_lock).lock_owned().await;
        let span = debug_span!("deactivate", repository = %self.config.name);
        let task_inner = Arc::clone(&self);
        let task = tokio::spawn(
            TRANSITION_OWNER
                .scope(self.id, async move {
                    task_inner.deactivate_locked().await;
                    drop(guard);
                })
                .instrument(span),
        );
        if task.await.is_err() {
            warn!(repository = %self.config.name, "deactivation task panicked");
        }
    }

    fn activate(&self, registry: &mut Registry, state: Arc<S>) {
        info!(repository = %self.config.name, state = state.name(), "repository activated");
        self.published.send_replace(Slot::Occupied(state));
        registry.status = RepositoryStatus::Active;
        registry.activations += 1;
        self.emit(LifecycleEvent::Activated);
    }

    async fn deactivate_locked(self: &Arc<Self>) {
        {
            let mut registry = self.lock_registry();
            if registry.status != RepositoryStatus::Active || registry.subscriber_count() > 0 {
                debug!(repository = %self.config.name, status = ?registry.status, "deactivation skipped");
                return;
            }
            registry.status = RepositoryStatus::Deactivating;
        }

        self.run_deinitialize().await;

        let _activation = self.lock_activation();
        let (retired, waiting) = {
            let mut registry = self.lock_registry();
            let retired = self.published.send_replace(Slot::Vacant);
            registry.status = RepositoryStatus::Uninitialized;
            registry.deactivations += 1;
            self.emit(LifecycleEvent::Deactivated);
            info!(repository = %self.config.name, "repository deactivated");
            (retired, registry.subscriber_count() > 0)
        };
        drop(retired);

        if waiting {
            // Someone subscribed while teardown ran.
            let state = Arc::new((self.initial_state)());
            let mut registry = self.lock_registry();
            if registry.status == RepositoryStatus::Uninitialized {
                self.activate(&mut registry, state);
            }
        }
    }

    async fn shutdown_locked(self: &Arc<Self>) {
        let was_active = {
            let mut registry = self.lock_registry();
            if registry.status == RepositoryStatus::Terminated {
                return;
            }
            let was_active = registry.status == RepositoryStatus::Active;
            registry.status = RepositoryStatus::Terminated;
            was_active
        };

        if was_active {
            self.run_deinitialize().await;
        }

        let last = self.published.borrow().state();
        let retired = self.published.send_replace(Slot::Closed(last));
        self.lock_registry().clear();
        self.emit(LifecycleEvent::Terminated);
        info!(repository = %self.config.name, "repository terminated");
        drop(retired);
    }

    /// Run the deinitialize transition, if any, on its own task.
    ///
    /// Teardown continues whatever the outcome: an error or a panic in the
    /// transition or its hooks is logged and the current state is retired
    /// anyway.
    async fn run_deinitialize(self: &Arc<Self>) {
        let Some(deinitialize) = self.deinitialize.clone() else {
            return;
        };
        let inner = Arc::clone(self);
        let task = tokio::spawn(
            TRANSITION_OWNER
                .scope(self.id, async move {
                    inner
                        .apply_locked(TransitionKind::Deinitialize, move |old: &Arc<S>| {
                            Ok(Arc::new(deinitialize(&**old)))
                        })
                        .await
                })
                .in_current_span(),
        );
        match task.await {
            Ok(Ok(_)) => {}
            Ok(Err(error)) => {
                warn!(repository = %self.config.name, %error, "deinitialize transition failed")
            }
            Err(_) => warn!(repository = %self.config.name, "deinitialize transition panicked"),
        }
    }

    /// Run the hook protocol. The caller holds `transition_lock`.
    async fn apply_locked<F>(&self, kind: TransitionKind, transition: F) -> Result<Arc<S>, RepositoryError>
    where
        F: FnOnce(&Arc<S>) -> Result<Arc<S>, BoxError>,
    {
        let old = self.current_for_transition()?;

        self.run_hook(&old, HookPhase::BeforeCreatingNewState).await?;
        let new = transition(&old).map_err(|source| RepositoryError::TransitionFailed {
            from: old.name().to_string(),
            source,
        })?;
        self.run_hook(&old, HookPhase::AfterCreatingNewState).await?;

        self.publish(&old, &new, kind);

        self.run_hook(&new, HookPhase::AfterNewStateIsSet).await?;
        Ok(new)
    }

    fn current_for_transition(&self) -> Result<Arc<S>, RepositoryError> {
        match &*self.published.borrow() {
            Slot::Occupied(state) => Ok(Arc::clone(state)),
            Slot::Vacant => Err(RepositoryError::Inactive {
                repository: self.config.name.clone(),
            }),
            Slot::Closed(_) => Err(self.terminated()),
        }
    }

    fn publish(&self, old: &Arc<S>, new: &Arc<S>, kind: TransitionKind) {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.published.send_replace(Slot::Occupied(Arc::clone(new)));
        self.lock_history().record(TransitionRecord {
            sequence,
            from: old.name().to_string(),
            to: new.name().to_string(),
            kind,
            timestamp: Utc::now(),
        });
        debug!(
            repository = %self.config.name,
            sequence,
            from = old.name(),
            to = new.name(),
            "state published"
        );
    }

    async fn run_hook(&self, state: &Arc<S>, phase: HookPhase) -> Result<(), RepositoryError> {
        trace!(repository = %self.config.name, state = state.name(), %phase, "running hook");
        let hook = match phase {
            HookPhase::BeforeCreatingNewState => state.before_creating_new_state(),
            HookPhase::AfterCreatingNewState => state.after_creating_new_state(),
            HookPhase::AfterNewStateIsSet => state.after_new_state_is_set(),
        };

        let outcome = match self.config.hook_timeout() {
            Some(timeout) => tokio::time::timeout(timeout, hook).await.map_err(|_| {
                RepositoryError::HookTimedOut {
                    state: state.name().to_string(),
                    phase,
                    timeout,
                }
            })?,
            None => hook.await,
        };

        outcome.map_err(|source| RepositoryError::HookFailed {
            state: state.name().to_string(),
            phase,
            source,
        })
    }

    fn emit(&self, event: LifecycleEvent) {
        // No receivers is fine.
        let _ = self.lifecycle.send(event);
    }

    fn lock_registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_activation(&self) -> MutexGuard<'_, ()> {
        self.activation.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_history(&self) -> MutexGuard<'_, StateHistory> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn terminated(&self) -> RepositoryError {
        RepositoryError::Terminated {
            repository: self.config.name.clone(),
        }
    }

    fn reentrant(&self) -> RepositoryError {
        RepositoryError::ReentrantTransition {
            repository: self.config.name.clone(),
        }
    }

    fn panicked(&self) -> RepositoryError {
        RepositoryError::TransitionPanicked {
            repository: self.config.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::HookError;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;

    #[derive(Debug, PartialEq)]
    enum Connection {
        Disconnected,
        Connecting,
        Connected,
    }

    #[async_trait]
    impl State for Connection {
        fn name(&self) -> &str {
            match self {
                Self::Disconnected => "Disconnected",
                Self::Connecting => "Connecting",
                Self::Connected => "Connected",
            }
        }
    }

    #[derive(Debug)]
    struct Failing;

    #[async_trait]
    impl State for Failing {
        fn name(&self) -> &str {
            "Failing"
        }

        async fn before_creating_new_state(&self) -> Result<(), HookError> {
            Err(HookError::new("refused"))
        }
    }

    #[tokio::test]
    async fn repository_is_inert_until_subscribed() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let repository = StateRepository::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Connection::Disconnected
        });

        assert_eq!(repository.status(), RepositoryStatus::Uninitialized);
        assert!(repository.current().is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let _subscription = repository.subscribe().unwrap();
        assert_eq!(repository.status(), RepositoryStatus::Active);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn change_state_without_subscribers_is_inactive() {
        let repository = StateRepository::new(|| Connection::Disconnected);

        let result = repository.change_state(|_| Connection::Connecting).await;

        assert!(matches!(result, Err(RepositoryError::Inactive { .. })));
    }

    #[tokio::test]
    async fn change_state_publishes_and_records_history() {
        let repository = StateRepository::new(|| Connection::Disconnected);
        let _subscription = repository.subscribe().unwrap();

        repository.change_state(|_| Connection::Connecting).await.unwrap();
        let published = repository.change_state(|_| Connection::Connected).await.unwrap();

        assert_eq!(*published, Connection::Connected);
        assert_eq!(repository.current().as_deref(), Some(&Connection::Connected));

        let history = repository.history();
        assert_eq!(history.get_path(), vec!["Disconnected", "Connecting", "Connected"]);
        assert_eq!(repository.stats().transitions, 2);
    }

    #[tokio::test]
    async fn update_can_keep_the_same_state() {
        let repository = StateRepository::new(|| Connection::Disconnected);
        let _subscription = repository.subscribe().unwrap();
        let before = repository.current().unwrap();

        let after = repository.update(Arc::clone).await.unwrap();

        assert!(Arc::ptr_eq(&before, &after));
        assert_eq!(repository.stats().transitions, 1);
    }

    #[tokio::test]
    async fn failed_hook_keeps_old_state() {
        let repository = StateRepository::new(|| Failing);
        let _subscription = repository.subscribe().unwrap();
        let before = repository.current().unwrap();

        let result = repository.change_state(|_| Failing).await;

        match result {
            Err(RepositoryError::HookFailed { phase, .. }) => {
                assert_eq!(phase, HookPhase::BeforeCreatingNewState)
            }
            other => panic!("Expected hook failure, got {other:?}"),
        }
        assert!(Arc::ptr_eq(&before, &repository.current().unwrap()));
        assert!(repository.history().is_empty());
    }

    #[tokio::test]
    async fn failed_transition_function_keeps_old_state() {
        let repository = StateRepository::new(|| Connection::Disconnected);
        let _subscription = repository.subscribe().unwrap();

        let result = repository
            .try_change_state(|_| Err::<Connection, _>("adapter missing"))
            .await;

        assert!(matches!(result, Err(RepositoryError::TransitionFailed { .. })));
        assert_eq!(repository.current().as_deref(), Some(&Connection::Disconnected));

        // The lock was released.
        repository.change_state(|_| Connection::Connecting).await.unwrap();
    }

    #[tokio::test]
    async fn panicking_transition_releases_the_lock() {
        let repository = StateRepository::new(|| Connection::Disconnected);
        let _subscription = repository.subscribe().unwrap();

        let result = repository
            .change_state(|_| -> Connection { panic!("boom") })
            .await;

        assert!(matches!(result, Err(RepositoryError::TransitionPanicked { .. })));
        repository.change_state(|_| Connection::Connected).await.unwrap();
        assert_eq!(repository.current().as_deref(), Some(&Connection::Connected));
    }

    #[tokio::test]
    async fn shutdown_rejects_further_work() {
        let repository = StateRepository::new(|| Connection::Disconnected);
        let _subscription = repository.subscribe().unwrap();

        repository.shutdown().await.unwrap();
        repository.shutdown().await.unwrap();

        assert_eq!(repository.status(), RepositoryStatus::Terminated);
        assert!(repository.current().is_none());
        assert!(matches!(
            repository.subscribe(),
            Err(RepositoryError::Terminated { .. })
        ));
        assert!(matches!(
            repository.change_state(|_| Connection::Connected).await,
            Err(RepositoryError::Terminated { .. })
        ));
    }

    #[tokio::test]
    async fn debug_output_names_repository() {
        let repository = StateRepository::<Connection>::builder()
            .name("bluetooth")
            .initial_state(|| Connection::Disconnected)
            .build()
            .unwrap();

        let debug = format!("{repository:?}");
        assert!(debug.contains("bluetooth"));
        assert!(debug.contains("Uninitialized"));
    }
}
