// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! API gateway: the only component that sees client tokens.

pub mod proxy;
pub mod router;
pub mod routes;

pub use proxy::{Proxy, ProxyError};
pub use router::router;
pub use routes::{RouteAccess, RouteTable, ServiceRoute};
