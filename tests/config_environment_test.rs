// ABOUTME: Tests for environment-driven configuration loading
// ABOUTME: Validates defaults, flag parsing and rejection of malformed values
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::env;
use std::time::Duration;

use serial_test::serial;

use pierre_coaching::config::{Environment, ServerConfig, ToolSettings};
use pierre_coaching::errors::ErrorCode;
use pierre_coaching::tools::ToolCollector;

const VARIABLES: [&str; 5] = [
    "DATABASE_URL",
    "ENVIRONMENT",
    "TOOL_AUDIT_LOG",
    "TOOL_AUDIT_ARGUMENTS",
    "TOOL_CALL_TIMEOUT_SECS",
];

fn clear_environment() {
    for key in VARIABLES {
        env::remove_var(key);
    }
}

#[test]
fn test_environment_parsing() {
    assert_eq!(
        Environment::from_str_or_default("PROD"),
        Environment::Production
    );
    assert_eq!(
        Environment::from_str_or_default("test"),
        Environment::Testing
    );
    assert_eq!(
        Environment::from_str_or_default("staging"),
        Environment::Development
    );
    assert_eq!(Environment::Production.to_string(), "production");
}

#[test]
#[serial]
fn test_defaults_when_nothing_is_set() {
    clear_environment();

    let config = ServerConfig::from_env().unwrap();

    assert_eq!(config, ServerConfig::default());
    assert_eq!(config.environment, Environment::Development);
    assert!(config.tools.audit_log);
    assert!(!config.tools.audit_arguments);
    assert_eq!(config.tools.call_timeout, Duration::from_secs(30));
}

#[test]
#[serial]
fn test_overrides_are_applied() {
    clear_environment();
    env::set_var("DATABASE_URL", "sqlite::memory:");
    env::set_var("ENVIRONMENT", "production");
    env::set_var("TOOL_AUDIT_LOG", "off");
    env::set_var("TOOL_AUDIT_ARGUMENTS", "YES");
    env::set_var("TOOL_CALL_TIMEOUT_SECS", " 5 ");

    let config = ServerConfig::from_env().unwrap();
    clear_environment();

    assert_eq!(config.database_url, "sqlite::memory:");
    assert!(config.environment.is_production());
    assert_eq!(
        config.tools,
        ToolSettings {
            audit_log: false,
            audit_arguments: true,
            call_timeout: Duration::from_secs(5),
        }
    );
}

#[test]
#[serial]
fn test_malformed_values_are_rejected() {
    let cases = [
        ("TOOL_AUDIT_LOG", "maybe"),
        ("TOOL_AUDIT_ARGUMENTS", ""),
        ("TOOL_CALL_TIMEOUT_SECS", "0"),
        ("TOOL_CALL_TIMEOUT_SECS", "-3"),
        ("TOOL_CALL_TIMEOUT_SECS", "soon"),
        ("DATABASE_URL", "   "),
    ];

    for (key, value) in cases {
        clear_environment();
        env::set_var(key, value);

        let error = ServerConfig::from_env().unwrap_err();
        assert_eq!(error.code, ErrorCode::ConfigInvalid, "{key}={value:?}");
        assert!(error.message.contains(key), "{}", error.message);
    }
    clear_environment();
}

#[test]
fn test_collector_follows_tool_settings() {
    let quiet = ToolSettings {
        audit_log: false,
        ..ToolSettings::default()
    };
    let verbose = ToolSettings {
        audit_log: true,
        audit_arguments: true,
        ..ToolSettings::default()
    };

    let quiet_debug = format!("{:?}", ToolCollector::from_settings(&quiet));
    let verbose_debug = format!("{:?}", ToolCollector::from_settings(&verbose));

    assert!(quiet_debug.contains("audit: false"), "{quiet_debug}");
    assert!(verbose_debug.contains("audit: true"), "{verbose_debug}");
    assert!(verbose_debug.contains("log_arguments: true"), "{verbose_debug}");
}
