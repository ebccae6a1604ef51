// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User roles for authorization.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Closed set of platform roles.
///
/// There is no hierarchy: a route that requires `Employer` is denied to
/// `Admin` as well. Authorization is a single exact match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Student looking for placements
    Student,
    /// Company posting vacancies
    Employer,
    /// University representative
    University,
    /// Platform administrator
    Admin,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Student, Role::Employer, Role::University, Role::Admin];

    /// Parse a role from its wire form.
    ///
    /// Matching is exact and case-sensitive, the same comparison the gateway
    /// applies to stamped role headers.
    pub fn from_str(s: &str) -> Option<Role> {
        match s {
            "student" => Some(Role::Student),
            "employer" => Some(Role::Employer),
            "university" => Some(Role::University),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Employer => "employer",
            Role::University => "university",
            Role::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
