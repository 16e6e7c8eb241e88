// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Subscriber setup tests. Kept in their own binary: the subscriber is global.

use runtara_bridge::telemetry::init_subscriber;

#[test]
fn test_init_subscriber_once() {
    init_subscriber().unwrap();

    let err = init_subscriber().unwrap_err();
    assert_eq!(err.error_code(), "CONFIG_ERROR");
}
