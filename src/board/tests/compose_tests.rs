//! Tests for the add-task form buffers and submission gating.

use std::sync::Arc;

use crate::board::{
    adapters::memory::InMemoryTaskStore,
    domain::{CollectionPath, SessionId, TaskDomainError},
    services::{BoardService, MutationError, TaskComposer},
};
use rstest::{fixture, rstest};

#[fixture]
fn store() -> InMemoryTaskStore {
    InMemoryTaskStore::new()
}

fn board(store: &InMemoryTaskStore) -> BoardService {
    BoardService::new(
        Arc::new(store.clone()),
        CollectionPath::new("artifacts/unit/public/data/study_tasks"),
        SessionId::new("session-a"),
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn successful_submit_clears_the_buffers(store: InMemoryTaskStore) {
    let service = board(&store);
    let mut composer = TaskComposer::new();
    composer.set_title("Ch.5 Quiz");
    composer.set_description("pages 120-150");

    composer
        .submit(&service)
        .await
        .expect("submit should succeed");

    assert_eq!(composer.title(), "");
    assert_eq!(composer.description(), "");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_submit_retains_the_buffers(store: InMemoryTaskStore) {
    let service = board(&store);
    let mut composer = TaskComposer::new();
    composer.set_description("typed before any title");

    let result = composer.submit(&service).await;
    assert!(matches!(
        result,
        Err(MutationError::Domain(TaskDomainError::EmptyTitle))
    ));
    assert_eq!(composer.description(), "typed before any title");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_submit_retains_the_buffers_for_retry(store: InMemoryTaskStore) {
    let service = board(&store);
    let mut composer = TaskComposer::new();
    composer.set_title("Ch.5 Quiz");
    composer.set_description("pages 120-150");

    store.reject_next_write();
    let result = composer.submit(&service).await;
    assert!(matches!(result, Err(MutationError::Store(_))));
    assert_eq!(composer.title(), "Ch.5 Quiz");
    assert_eq!(composer.description(), "pages 120-150");

    composer
        .submit(&service)
        .await
        .expect("retry with intact buffers should succeed");
    assert_eq!(composer.title(), "");
}
