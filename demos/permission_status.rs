//! Permission Status
//!
//! This example demonstrates a repository of plain states with no resources.
//!
//! Key concepts:
//! - Declaring states with `state_enum!`
//! - Lazy activation on the first subscriber
//! - Replay-latest delivery to a late subscriber
//! - Deactivation when the last subscriber leaves
//!
//! Run with: cargo run --example permission_status

use statehouse::{state_enum, LifecycleEvent, RepositoryError, StateRepository};

state_enum! {
    pub enum PermissionStatus {
        NotDetermined,
        Denied,
        Allowed,
    }
}

#[tokio::main]
async fn main() -> Result<(), RepositoryError> {
    let repository = StateRepository::builder()
        .name("camera-permission")
        .initial_state(|| PermissionStatus::NotDetermined)
        .build()
        .expect("valid configuration");
    let mut events = repository.lifecycle_events();

    println!("Repository created: {:?}", repository.status());

    // Scenario 1: First subscriber activates the repository
    println!("\nScenario 1: First Subscriber");
    let mut screen = repository.subscribe()?;
    println!("  Status: {:?}", repository.status());
    println!("  Screen sees: {:?}", screen.recv().await);

    // Scenario 2: User answers the permission prompt
    println!("\nScenario 2: Permission Prompt");
    repository.change_state(|_| PermissionStatus::Denied).await?;
    repository.change_state(|_| PermissionStatus::Allowed).await?;
    println!("  Screen sees: {:?}", screen.recv().await);

    // Scenario 3: A late subscriber starts from the current state
    println!("\nScenario 3: Late Subscriber");
    let mut settings = repository.subscribe()?;
    println!("  Settings sees: {:?}", settings.recv().await);

    // Scenario 4: Everyone leaves
    println!("\nScenario 4: Last Subscriber Leaves");
    screen.unsubscribe().await;
    println!("  After screen leaves: {:?}", repository.status());
    settings.unsubscribe().await;
    println!("  After settings leaves: {:?}", repository.status());

    repository.shutdown().await?;

    println!("\nLifecycle events:");
    while let Ok(event) = events.try_recv() {
        let label = match event {
            LifecycleEvent::Activated => "activated",
            LifecycleEvent::Deactivated => "deactivated",
            LifecycleEvent::Terminated => "terminated",
        };
        println!("  {}", label);
    }

    println!("\nStats: {:?}", repository.stats());
    Ok(())
}
