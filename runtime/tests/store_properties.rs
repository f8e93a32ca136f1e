//! Store behavior under concurrency and generated input.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use ezratask_core::{NewTodo, PageRequest, Todo, TodoId};
use ezratask_runtime::{TodoAction, TodoStore};
use ezratask_testing::properties::{priority, short_description, valid_description};
use ezratask_testing::{SteppingClock, test_clock};
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

fn store() -> Arc<TodoStore> {
    Arc::new(TodoStore::new(Arc::new(SteppingClock::default())))
}

async fn create(store: &TodoStore, request: NewTodo) -> Todo {
    let event = store.send(TodoAction::Create(request)).await.unwrap();
    event.todo().unwrap().clone()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_get_unique_ids() {
    let store = store();

    let handles: Vec<_> = (0..100)
        .map(|i| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { create(&store, NewTodo::new(format!("task {i}"))).await })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        let todo = handle.await.unwrap();
        assert!(ids.insert(todo.id), "duplicate id {}", todo.id);
    }

    let expected: HashSet<_> = (1..=100).map(TodoId::new).collect();
    assert_eq!(ids, expected);
    assert_eq!(store.len().await, 100);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn creates_racing_resets_keep_ids_contiguous() {
    let store = store();

    for _ in 0..20 {
        let handles: Vec<_> = (0..40)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    let action = if i % 10 == 5 {
                        TodoAction::Reset
                    } else {
                        TodoAction::Create(NewTodo::new(format!("racer {i}")))
                    };
                    store.send(action).await.unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        // Every surviving todo was issued after the last reset, so the ids
        // are exactly 1..=len and none was overwritten.
        let (len, last_id) = store.state(|s| (s.len(), s.last_id())).await;
        assert_eq!(u64::try_from(len).unwrap(), last_id);
        for id in 1..=last_id {
            assert!(store.get(TodoId::new(id)).await.is_some(), "missing id {id}");
        }
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_toggles_each_bump_row_version() {
    let store = store();
    let todo = create(&store, NewTodo::new("contended")).await;

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.send(TodoAction::ToggleCompletion(todo.id)).await })
        })
        .collect();
    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }

    let after = store.get(todo.id).await.unwrap();
    assert_eq!(after.row_version, 11);
    // An even number of flips lands back on open
    assert!(!after.is_completed());
}

#[tokio::test]
async fn listing_never_mixes_archived_and_active() {
    let store = Arc::new(TodoStore::new(Arc::new(test_clock())));
    for i in 0..10 {
        let todo = create(&store, NewTodo::new(format!("item {i}"))).await;
        if i % 3 == 0 {
            store.send(TodoAction::Archive(todo.id)).await.unwrap();
        }
    }

    let active = store.list(PageRequest::active()).await.unwrap();
    let archived = store.list(PageRequest::archived()).await.unwrap();

    assert!(active.items.iter().all(|t| !t.is_archived()));
    assert!(archived.items.iter().all(Todo::is_archived));
    assert_eq!(active.total_count + archived.total_count, 10);
    assert_eq!(archived.total_count, 4);
}

proptest! {
    #[test]
    fn valid_descriptions_are_accepted(description in valid_description(), priority in priority()) {
        let store = store();
        let todo = tokio_test::block_on(
            create(&store, NewTodo::new(description.clone()).with_priority(priority)),
        );
        prop_assert_eq!(&todo.description, &description);
        prop_assert_eq!(todo.priority, priority);
        prop_assert_eq!(todo.row_version, 1);
        prop_assert!(!todo.is_completed());
    }

    #[test]
    fn short_descriptions_are_rejected(description in short_description()) {
        let store = store();
        let result = tokio_test::block_on(store.send(TodoAction::Create(NewTodo::new(description))));
        prop_assert!(result.is_err());
        prop_assert!(tokio_test::block_on(store.is_empty()));
    }

    #[test]
    fn pages_partition_the_listing(count in 0usize..40, page_size in 1i64..10) {
        let store = store();
        tokio_test::block_on(async {
            for i in 0..count {
                create(&store, NewTodo::new(format!("todo {i}"))).await;
            }
        });

        let mut seen = Vec::new();
        let mut page_number = 1;
        loop {
            let page = tokio_test::block_on(
                store.list(PageRequest::active().page(page_number, page_size)),
            )
            .unwrap();
            prop_assert_eq!(page.total_count, count);
            if page.items.is_empty() {
                break;
            }
            seen.extend(page.items.into_iter().map(|t| t.id));
            page_number += 1;
        }

        let expected: Vec<_> = (1..=u64::try_from(count).unwrap()).rev().map(TodoId::new).collect();
        prop_assert_eq!(seen, expected);
    }
}
