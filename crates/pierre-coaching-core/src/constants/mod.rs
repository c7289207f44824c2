// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Tool identifiers, tool categories, and tool payload limits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module

pub mod limits;
pub mod tools;

pub use tools::*;
