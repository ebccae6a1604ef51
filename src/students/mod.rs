// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Student profile service: a downstream consumer of gateway-stamped identity.

pub mod api;
pub mod models;
pub mod service;
pub mod store;

pub use models::{CreateProfileRequest, StudentProfile, UpdateProfileRequest};
pub use service::{ProfileError, StudentService};
pub use store::{InMemoryStudentStore, StudentStore};
