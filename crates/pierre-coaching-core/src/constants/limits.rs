// ABOUTME: Pagination and payload limits shared by tool contracts and the store
// ABOUTME: Tool parameter ranges are built from these so schema and validation agree
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Limits applied by the coaching tools

/// Largest page any listing tool returns
pub const MAX_PAGE_SIZE: i64 = 100;

/// Default page size for `list_clients` and `admin_list_relationships`
pub const DEFAULT_CLIENT_PAGE_SIZE: i64 = 50;

/// Default page size for workout and message history
pub const DEFAULT_HISTORY_PAGE_SIZE: i64 = 20;

/// Longest accepted workout, in minutes
pub const MAX_WORKOUT_MINUTES: i64 = 600;

/// Longest accepted workout title
pub const MAX_WORKOUT_TITLE_LENGTH: usize = 200;

/// Longest accepted free-form workout notes
pub const MAX_WORKOUT_NOTES_LENGTH: usize = 2000;

/// Longest accepted coach message body
pub const MAX_MESSAGE_LENGTH: usize = 4000;

/// Longest accepted idempotency key
pub const MAX_IDEMPOTENCY_KEY_LENGTH: usize = 128;
