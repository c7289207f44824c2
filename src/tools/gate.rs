// ABOUTME: Permission gate comparing the caller's role rank with a tool's minimum role
// ABOUTME: Synchronous and I/O-free so a denied call never reaches the store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use thiserror::Error;

use pierre_coaching_core::permissions::UserRole;

use super::response::{ToolErrorCode, ToolResponse};

/// The caller's tier is below what the tool requires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Permission denied: this tool requires role '{required}' or higher, caller has role '{actual}'")]
pub struct PermissionDenied {
    /// Minimum role declared by the tool
    pub required: UserRole,
    /// Role carried by the caller's context
    pub actual: UserRole,
}

/// Check a caller's role against a tool's minimum role
///
/// A tool without a minimum role admits every caller.
///
/// # Errors
///
/// Returns [`PermissionDenied`] when the caller's rank is lower than the required rank
pub const fn check_permission(
    minimum_role: Option<UserRole>,
    caller_role: UserRole,
) -> Result<(), PermissionDenied> {
    match minimum_role {
        Some(required) if !caller_role.satisfies(required) => Err(PermissionDenied {
            required,
            actual: caller_role,
        }),
        _ => Ok(()),
    }
}

impl<T> From<PermissionDenied> for ToolResponse<T> {
    fn from(denied: PermissionDenied) -> Self {
        Self::error_with_code(ToolErrorCode::PermissionDenied, denied.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_follows_rank_for_every_pair() {
        for caller in UserRole::ALL {
            for required in UserRole::ALL {
                let allowed = check_permission(Some(required), caller).is_ok();
                assert_eq!(allowed, caller.rank() >= required.rank(), "{caller} vs {required}");
            }
        }
    }

    #[test]
    fn test_no_minimum_role_admits_everyone() {
        for caller in UserRole::ALL {
            assert!(check_permission(None, caller).is_ok());
        }
    }

    #[test]
    fn test_denial_names_both_roles() {
        let denied = check_permission(Some(UserRole::Coach), UserRole::Client).unwrap_err();
        let response: ToolResponse<()> = denied.into();
        let failure = response.failure().unwrap();
        assert_eq!(failure.code, ToolErrorCode::PermissionDenied);
        assert!(failure.message.contains("'coach'"));
        assert!(failure.message.contains("'client'"));
    }
}
