//! User record owned by the remote API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Privilege tier carried in the user record and in the token's role claim.
///
/// Any role string other than `"admin"` is an ordinary user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    #[serde(other)]
    User,
}

impl Role {
    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }
}

/// Read-only copy of the current user, fetched once per page load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Remote identifier (`_id` on the wire for some endpoints)
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
    /// `"free"` or the name of a paid tier
    #[serde(default = "default_plan")]
    pub plan: String,
    /// Remaining usage credits
    #[serde(default)]
    pub tokens: u64,
    #[serde(default)]
    pub email_notifications: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_plan() -> String {
    "free".to_string()
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_free_plan(&self) -> bool {
        self.plan == "free"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_from_verify_payload() {
        let user: User = serde_json::from_value(serde_json::json!({
            "_id": "65f0c0ffee",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "role": "admin",
            "plan": "pro",
            "tokens": 42,
            "createdAt": "2025-01-02T03:04:05Z"
        }))
        .unwrap();

        assert_eq!(user.id, "65f0c0ffee");
        assert!(user.is_admin());
        assert!(!user.is_free_plan());
        assert_eq!(user.tokens, 42);
        assert!(user.created_at.is_some());
        assert!(user.updated_at.is_none());
    }

    #[test]
    fn test_unknown_role_is_ordinary_user() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": "1",
            "email": "b@example.com",
            "role": "moderator"
        }))
        .unwrap();

        assert_eq!(user.role, Role::User);
        assert!(user.is_free_plan());
    }
}
