// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use otelconf::log::{max_level, set_max_level, LevelFilter};
use otelconf_sdk::DeclarativeConfiguration;
use serial_test::serial;

fn create(document: &str) {
    DeclarativeConfiguration::default()
        .parse_and_create(document)
        .expect("builds");
}

#[test]
#[serial]
fn test_log_level_sets_max_level() {
    let default_lvl = max_level();

    create("file_format: \"1.0\"\nlog_level: debug\ndisabled: true\n");
    assert_eq!(max_level(), LevelFilter::Debug);

    create("file_format: \"1.0\"\nlog_level: WARN\n");
    assert_eq!(max_level(), LevelFilter::Warn);

    set_max_level(default_lvl);
}

#[test]
#[serial]
fn test_invalid_log_level_keeps_max_level() {
    let default_lvl = max_level();
    set_max_level(LevelFilter::Info);

    create("file_format: \"1.0\"\nlog_level: verbose\n");
    assert_eq!(max_level(), LevelFilter::Info);

    set_max_level(default_lvl);
}
