// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Static routing table: path prefix to backend base URL.
//!
//! Built once at startup and read-only afterwards.

use url::Url;

use crate::auth::Role;

/// Who may use a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// No token required
    Public,
    /// Valid access token required, optionally with one exact role
    Authenticated { required_role: Option<Role> },
}

/// One prefix and the service that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRoute {
    /// Path prefix without trailing slash, e.g. `/api/students`
    pub prefix: String,
    /// Backend base URL; only scheme and authority are used
    pub upstream: Url,
    pub access: RouteAccess,
}

impl ServiceRoute {
    pub fn public(prefix: &str, upstream: Url) -> Self {
        Self {
            prefix: prefix.trim_end_matches('/').to_string(),
            upstream,
            access: RouteAccess::Public,
        }
    }

    pub fn authenticated(prefix: &str, upstream: Url, required_role: Option<Role>) -> Self {
        Self {
            prefix: prefix.trim_end_matches('/').to_string(),
            upstream,
            access: RouteAccess::Authenticated { required_role },
        }
    }

    /// Axum route patterns covering the bare prefix and everything below it.
    ///
    /// `/api/studentsx` matches neither, so a prefix only ever owns whole
    /// path segments.
    pub fn patterns(&self) -> [String; 2] {
        [self.prefix.clone(), format!("{}/{{*rest}}", self.prefix)]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<ServiceRoute>,
}

impl RouteTable {
    pub fn new(routes: Vec<ServiceRoute>) -> Self {
        Self { routes }
    }

    /// The platform's table: auth is public, students and employers require
    /// a token and optionally a role.
    pub fn standard(
        auth_service: Url,
        student_service: Url,
        employer_service: Url,
        students_role: Option<Role>,
        employers_role: Option<Role>,
    ) -> Self {
        Self::new(vec![
            ServiceRoute::public("/api/auth", auth_service),
            ServiceRoute::authenticated("/api/students", student_service, students_role),
            ServiceRoute::authenticated("/api/employers", employer_service, employers_role),
        ])
    }

    pub fn routes(&self) -> &[ServiceRoute] {
        &self.routes
    }
}
