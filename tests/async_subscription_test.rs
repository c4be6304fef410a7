//! Tests for the tokio notification adapter

#![cfg(feature = "tokio-runtime")]

use prometheus_operator::{Operator, OperatorConfig, Priority, WorkItem};
use std::time::Duration;

#[tokio::test]
async fn test_subscribe_async_receives_both_kinds() {
    let operator: Operator<u32, u32> =
        Operator::new(&OperatorConfig::new("async-sub").with_sleep_ms(1)).unwrap();
    let mut events = operator.subscribe_async();

    operator.enqueue(WorkItem::new("double", vec![21], |m: &[u32]| Ok(m[0] * 2)));
    operator.enqueue_with_priority(
        WorkItem::new("fail", vec![], |_: &[u32]| Err(anyhow::anyhow!("async boom"))),
        Priority::Normal,
    );

    let first = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("timed out")
        .expect("channel closed");
    assert_eq!(first.as_triggered().unwrap().result.data, Some(42));

    let second = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("timed out")
        .expect("channel closed");
    let error = second.as_error().unwrap();
    assert_eq!(error.ticket, "fail");
    assert_eq!(error.error.to_string(), "async boom");
}

#[tokio::test]
async fn test_dropped_async_receiver_is_pruned() {
    let operator: Operator<u32, u32> =
        Operator::new(&OperatorConfig::new("async-prune").with_sleep_ms(1)).unwrap();
    let events = operator.subscribe_async();
    let sync_events = operator.subscribe();
    drop(events);

    operator.enqueue(WorkItem::new("one", vec![], |_: &[u32]| Ok(1)));
    let received = tokio::task::spawn_blocking(move || sync_events.recv_timeout(Duration::from_secs(5)))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(received.ticket(), "one");
    assert_eq!(operator.sink_count(), 1);
}
