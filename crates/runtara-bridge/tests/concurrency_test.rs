// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Concurrent resolve, bind and translation tests.

mod common;

use std::sync::Arc;

use futures::future::join_all;
use serde_json::json;

use common::{RecordingProcessor, component, vars};
use runtara_bridge::BridgeError;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_resolve_yields_one_endpoint() {
    let (component, _) = component();

    let tasks = (0..32).map(|_| {
        let component = component.clone();
        tokio::spawn(async move { component.resolve("wf://orders").unwrap() })
    });
    let endpoints: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    assert!(endpoints.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    assert_eq!(component.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_bind_accepts_exactly_one() {
    let (component, _) = component();

    let tasks = (0..16).map(|_| {
        let component = component.clone();
        tokio::spawn(async move {
            component
                .bind_consumer("wf://orders", RecordingProcessor::new())
                .map(|_| ())
        })
    });
    let results: Vec<_> = join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    let bound = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(bound, 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| matches!(e, BridgeError::DuplicateConsumer { .. })));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_deliveries_do_not_interfere() {
    let (component, engine) = component();
    let processor = RecordingProcessor::new();
    component.bind_consumer("wf://orders", processor.clone()).unwrap();

    for i in 0..20 {
        engine
            .start_instance(format!("inst-{}", i), vars(json!({"n": i})))
            .await;
    }

    let tasks = (0..20).map(|i| {
        let component = component.clone();
        tokio::spawn(async move {
            component
                .deliver("wf://orders", &format!("inst-{}", i))
                .await
                .map(|message| (i, message))
        })
    });

    for result in join_all(tasks).await {
        let (i, message) = result.unwrap().unwrap();
        assert_eq!(message.properties, vars(json!({"n": i})));
        assert_eq!(message.process_instance_id(), Some(format!("inst-{}", i).as_str()));
    }
    assert_eq!(processor.count().await, 20);
}
