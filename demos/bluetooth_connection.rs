//! Bluetooth Connection
//!
//! This example demonstrates states that own resources and manage them from
//! their lifecycle hooks.
//!
//! Key concepts:
//! - `Connecting` owns a timeout timer, started once the state is published
//!   and cancelled before the next state is created
//! - A hook schedules a follow-up transition with `update`
//! - Shutdown runs the deinitialize transition through the same hooks
//! - Tracing output from the repository
//!
//! Run with: cargo run --example bluetooth_connection

use futures::StreamExt;
use statehouse::{async_trait, HookError, RepositoryError, State, StateRepository};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::AbortHandle;
use tracing::warn;

const CONNECT_TIMEOUT: Duration = Duration::from_millis(150);

#[derive(Debug)]
enum Connection {
    Disconnected,
    Connecting {
        device: String,
        repository: StateRepository<Connection>,
        timer: Mutex<Option<AbortHandle>>,
    },
    Connected {
        device: String,
    },
}

impl Connection {
    fn connecting(device: &str, repository: StateRepository<Connection>) -> Self {
        Self::Connecting {
            device: device.to_string(),
            repository,
            timer: Mutex::new(None),
        }
    }
}

// Leaves `Connecting` for `Disconnected`, keeps any other state as it is
fn give_up(old: &Arc<Connection>) -> Arc<Connection> {
    match **old {
        Connection::Connecting { .. } => Arc::new(Connection::Disconnected),
        _ => Arc::clone(old),
    }
}

#[async_trait]
impl State for Connection {
    fn name(&self) -> &str {
        match self {
            Self::Disconnected => "Disconnected",
            Self::Connecting { .. } => "Connecting",
            Self::Connected { .. } => "Connected",
        }
    }

    async fn before_creating_new_state(&self) -> Result<(), HookError> {
        match self {
            Self::Connecting { device, timer, .. } => {
                let pending = timer
                    .lock()
                    .map_err(|_| HookError::new("timer lock poisoned"))?
                    .take();
                if let Some(handle) = pending {
                    handle.abort();
                    println!("  [{}] connect timer cancelled", device);
                }
                Ok(())
            }
            Self::Connected { device } => {
                println!("  [{}] closing link", device);
                Ok(())
            }
            Self::Disconnected => Ok(()),
        }
    }

    async fn after_new_state_is_set(&self) -> Result<(), HookError> {
        match self {
            Self::Connecting {
                device,
                repository,
                timer,
            } => {
                let repository = repository.clone();
                let handle = tokio::spawn(async move {
                    tokio::time::sleep(CONNECT_TIMEOUT).await;
                    if let Err(error) = repository.update(give_up).await {
                        warn!(%error, "connect timeout transition failed");
                    }
                });
                *timer.lock().map_err(|_| HookError::new("timer lock poisoned"))? =
                    Some(handle.abort_handle());
                println!("  [{}] connect timer started", device);
                Ok(())
            }
            Self::Connected { device } => {
                println!("  [{}] link up", device);
                Ok(())
            }
            Self::Disconnected => Ok(()),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), RepositoryError> {
    tracing_subscriber::fmt::init();

    let repository = StateRepository::builder()
        .name("bluetooth")
        .hook_timeout(Duration::from_millis(500))
        .initial_state(|| Connection::Disconnected)
        .deinitialize(|_| Connection::Disconnected)
        .build()
        .expect("valid configuration");

    let mut updates = repository.subscribe()?.into_stream().boxed();
    let watcher = tokio::spawn(async move {
        while let Some(state) = updates.next().await {
            println!("  observed: {}", state.name());
        }
    });

    // Scenario 1: The device never answers
    println!("Scenario 1: Connection Times Out");
    let handle = repository.clone();
    repository
        .change_state(move |_| Connection::connecting("headset", handle))
        .await?;
    tokio::time::sleep(CONNECT_TIMEOUT * 2).await;
    println!("  Current: {:?}", repository.current().map(|s| s.name().to_string()));

    // Scenario 2: The device answers in time
    println!("\nScenario 2: Connection Succeeds");
    let handle = repository.clone();
    repository
        .change_state(move |_| Connection::connecting("headset", handle))
        .await?;
    repository
        .change_state(|old| match old {
            Connection::Connecting { device, .. } => Connection::Connected {
                device: device.clone(),
            },
            _ => Connection::Disconnected,
        })
        .await?;
    tokio::time::sleep(CONNECT_TIMEOUT * 2).await;
    println!("  Current: {:?}", repository.current().map(|s| s.name().to_string()));

    // Scenario 3: Shutdown releases the link
    println!("\nScenario 3: Shutdown");
    repository.shutdown().await?;
    let _ = watcher.await;

    println!("\nPath: {:?}", repository.history().get_path());
    println!("Stats: {:?}", repository.stats());
    Ok(())
}
