//! Tests for the sync controller's loading state machine and snapshot flow.

use std::sync::Arc;

use crate::board::{
    adapters::memory::{InMemoryIdentityProvider, InMemoryTaskStore},
    domain::{SessionId, TaskStatus},
    services::{BoardService, ConfirmedDeletion, SyncController, SyncPhase},
};
use crate::config::{AppId, BoardConfig, ConnectionDescriptor};
use rstest::{fixture, rstest};

fn connected_config() -> BoardConfig {
    BoardConfig::new(AppId::new("unit").expect("valid app id"))
        .with_connection(ConnectionDescriptor::new("mem://local", "unit-project"))
}

fn board(store: &InMemoryTaskStore, session: &str) -> BoardService {
    BoardService::new(
        Arc::new(store.clone()),
        connected_config().collection_path(),
        SessionId::new(session),
    )
}

#[fixture]
fn store() -> InMemoryTaskStore {
    InMemoryTaskStore::new()
}

#[fixture]
fn identity() -> InMemoryIdentityProvider {
    InMemoryIdentityProvider::new()
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_connection_parks_the_controller(
    store: InMemoryTaskStore,
    identity: InMemoryIdentityProvider,
) {
    let config = BoardConfig::new(AppId::new("unit").expect("valid app id"));
    let mut controller = SyncController::new(Arc::new(store));

    controller.start(&config, &identity).await;

    assert_eq!(controller.status().phase(), SyncPhase::Unavailable);
    assert_eq!(controller.status().message(), "backend connection not configured");
    assert!(!controller.process_next().await);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_sign_in_stays_in_awaiting_auth(
    store: InMemoryTaskStore,
    identity: InMemoryIdentityProvider,
) {
    identity.reject_next_sign_in();
    let mut controller = SyncController::new(Arc::new(store));

    controller.start(&connected_config(), &identity).await;

    assert_eq!(controller.status().phase(), SyncPhase::AwaitingAuth);
    assert!(controller.status().message().starts_with("sign-in failed"));
    assert_eq!(controller.session(), None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn start_signs_in_subscribes_and_reaches_ready(
    store: InMemoryTaskStore,
    identity: InMemoryIdentityProvider,
) {
    let mut controller = SyncController::new(Arc::new(store));

    controller.start(&connected_config(), &identity).await;
    assert_eq!(controller.status().phase(), SyncPhase::Syncing);
    assert!(controller.session().is_some());

    assert_eq!(controller.pump(), 1);
    assert_eq!(controller.status().phase(), SyncPhase::Ready);
    assert_eq!(controller.status().message(), "connected");
    assert!(controller.tasks().is_empty());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn token_bootstrap_resolves_the_registered_session(
    store: InMemoryTaskStore,
    identity: InMemoryIdentityProvider,
) {
    identity.register_token("prep-token", SessionId::new("session-fixed"));
    let config = connected_config().with_session_token("prep-token");
    let mut controller = SyncController::new(Arc::new(store));

    controller.start(&config, &identity).await;

    assert_eq!(
        controller.session().map(SessionId::as_str),
        Some("session-fixed")
    );
    assert_eq!(controller.status().phase(), SyncPhase::Syncing);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn a_rejected_token_stays_in_awaiting_auth(
    store: InMemoryTaskStore,
    identity: InMemoryIdentityProvider,
) {
    let config = connected_config().with_session_token("unknown-token");
    let mut controller = SyncController::new(Arc::new(store));

    controller.start(&config, &identity).await;

    assert_eq!(controller.status().phase(), SyncPhase::AwaitingAuth);
    assert_eq!(controller.session(), None);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn snapshots_replace_the_task_list_wholesale(
    store: InMemoryTaskStore,
    identity: InMemoryIdentityProvider,
) {
    let mut controller = SyncController::new(Arc::new(store.clone()));
    controller.start(&connected_config(), &identity).await;
    controller.pump();

    let service = board(&store, "session-a");
    let first = service
        .add_task("Ch.5 Quiz", "")
        .await
        .expect("add should succeed");
    service
        .add_task("Flashcards", "")
        .await
        .expect("add should succeed");
    controller.pump();
    assert_eq!(controller.tasks().len(), 2);
    assert_eq!(controller.columns().column(TaskStatus::Todo).len(), 2);

    service.delete_task(ConfirmedDeletion::confirm(first.clone())).await;
    controller.pump();
    assert_eq!(controller.tasks().len(), 1);
    assert!(controller.tasks().iter().all(|task| task.id() != &first));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn feed_failure_degrades_but_serves_stale_reads(
    store: InMemoryTaskStore,
    identity: InMemoryIdentityProvider,
) {
    let mut controller = SyncController::new(Arc::new(store.clone()));
    controller.start(&connected_config(), &identity).await;
    controller.pump();

    let service = board(&store, "session-a");
    service
        .add_task("Ch.5 Quiz", "")
        .await
        .expect("add should succeed");
    controller.pump();
    assert_eq!(controller.tasks().len(), 1);

    store.break_feed(&connected_config().collection_path(), "connection reset");
    controller.pump();

    assert_eq!(controller.status().phase(), SyncPhase::Degraded);
    assert!(controller.status().message().starts_with("realtime feed lost"));
    // Last-known-good snapshot is still served.
    assert_eq!(controller.tasks().len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn restart_closes_the_prior_subscription_first(
    store: InMemoryTaskStore,
    identity: InMemoryIdentityProvider,
) {
    let collection = connected_config().collection_path();
    let mut controller = SyncController::new(Arc::new(store.clone()));

    controller.start(&connected_config(), &identity).await;
    assert_eq!(store.subscriber_count(&collection), 1);

    controller.start(&connected_config(), &identity).await;
    assert_eq!(store.subscriber_count(&collection), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn shutdown_releases_the_subscription_exactly_once(
    store: InMemoryTaskStore,
    identity: InMemoryIdentityProvider,
) {
    let collection = connected_config().collection_path();
    let mut controller = SyncController::new(Arc::new(store.clone()));
    controller.start(&connected_config(), &identity).await;
    assert_eq!(store.subscriber_count(&collection), 1);

    controller.shutdown();
    assert_eq!(store.subscriber_count(&collection), 0);

    // Double release is a no-op, not an error.
    controller.shutdown();
    assert_eq!(store.subscriber_count(&collection), 0);
    assert!(!controller.process_next().await);
}
