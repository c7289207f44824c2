// ABOUTME: Role hierarchy for tier-based tool permission checks
// ABOUTME: UserRole is a closed, totally ordered set of tiers compared by rank
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Role Hierarchy
//!
//! Every caller carries exactly one [`UserRole`]. Roles are ordered by a fixed
//! integer rank assigned at compile time; `Ord` and [`UserRole::satisfies`]
//! compare ranks only.

use std::cmp::Ordering;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Caller privilege tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Athlete receiving coaching (base tier)
    #[default]
    Client,
    /// Coach managing clients (elevated tier)
    Coach,
    /// Tenant administrator (highest tier)
    Admin,
}

impl UserRole {
    /// All roles, lowest rank first
    pub const ALL: [Self; 3] = [Self::Client, Self::Coach, Self::Admin];

    /// Privilege rank; higher means more privileged
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Client => 0,
            Self::Coach => 1,
            Self::Admin => 2,
        }
    }

    /// Whether this role meets or exceeds `required`
    #[must_use]
    pub const fn satisfies(self, required: Self) -> bool {
        self.rank() >= required.rank()
    }

    /// Database string representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Coach => "coach",
            Self::Admin => "admin",
        }
    }
}

impl PartialOrd for UserRole {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UserRole {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl Display for UserRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "client" => Ok(Self::Client),
            "coach" => Ok(Self::Coach),
            "admin" => Ok(Self::Admin),
            _ => Err(AppError::invalid_input(format!("Invalid user role: {s}"))),
        }
    }
}
