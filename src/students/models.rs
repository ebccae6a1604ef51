// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Student profile models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Length of an IIN (individual identification number).
pub const IIN_LEN: usize = 12;

/// A student's profile, one per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StudentProfile {
    pub id: Uuid,
    /// Owning principal (unique)
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    /// National identification number (unique)
    pub iin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request to create the caller's profile.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateProfileRequest {
    pub first_name: String,
    pub last_name: String,
    #[schema(example = "990101300123")]
    pub iin: String,
    /// Ignored when not a valid UUID
    #[serde(default)]
    pub university_id: Option<String>,
}

impl CreateProfileRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.first_name.trim().is_empty() {
            return Err("first_name is required".to_string());
        }
        if self.last_name.trim().is_empty() {
            return Err("last_name is required".to_string());
        }
        if self.iin.chars().count() != IIN_LEN {
            return Err(format!("iin must be exactly {IIN_LEN} characters"));
        }
        Ok(())
    }
}

/// Partial update; empty or absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub university_id: Option<String>,
}

/// Parse an optional university reference, dropping anything malformed.
pub(crate) fn parse_university_id(raw: Option<&str>) -> Option<Uuid> {
    raw.filter(|s| !s.is_empty())
        .and_then(|s| Uuid::parse_str(s).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create(first: &str, last: &str, iin: &str) -> CreateProfileRequest {
        CreateProfileRequest {
            first_name: first.to_string(),
            last_name: last.to_string(),
            iin: iin.to_string(),
            university_id: None,
        }
    }

    #[test]
    fn create_validation() {
        assert!(create("Aida", "Bekova", "990101300123").validate().is_ok());
        assert!(create("", "Bekova", "990101300123").validate().is_err());
        assert!(create("Aida", " ", "990101300123").validate().is_err());
        assert!(create("Aida", "Bekova", "99010130012").validate().is_err());
        assert!(create("Aida", "Bekova", "9901013001234").validate().is_err());
    }

    #[test]
    fn malformed_university_id_is_dropped() {
        let id = Uuid::new_v4();
        assert_eq!(parse_university_id(Some(&id.to_string())), Some(id));
        assert_eq!(parse_university_id(Some("not-a-uuid")), None);
        assert_eq!(parse_university_id(Some("")), None);
        assert_eq!(parse_university_id(None), None);
    }

    #[test]
    fn absent_university_is_not_serialized() {
        let now = Utc::now();
        let profile = StudentProfile {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            first_name: "Aida".into(),
            last_name: "Bekova".into(),
            iin: "990101300123".into(),
            university_id: None,
            created_at: now,
            updated_at: now,
        };
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("university_id").is_none());
    }
}
