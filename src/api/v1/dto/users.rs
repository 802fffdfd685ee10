/*
 * Responsibility
 * - request/response DTOs for user registration and profile management
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::repos::user_repo::UserRow;

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    pub full_name: String,
    pub email: String,
    pub contact_no: String,
    pub password: String,
}

impl RegisterUserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.full_name.trim().is_empty() {
            return Err("full_name is required");
        }
        if !looks_like_email(&self.email) {
            return Err("email is not valid");
        }
        if self.contact_no.trim().is_empty() {
            return Err("contact_no is required");
        }
        if self.password.len() < MIN_PASSWORD_LEN {
            return Err("password must be at least 8 characters");
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub full_name: Option<String>,
    pub contact_no: Option<String>,
    /// Present-and-null clears the image, absent leaves it untouched.
    #[serde(default, with = "super::serde_double_option")]
    pub profile_image_url: Option<Option<String>>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(full_name) = &self.full_name
            && full_name.trim().is_empty()
        {
            return Err("full_name cannot be empty");
        }
        if let Some(contact_no) = &self.contact_no
            && contact_no.trim().is_empty()
        {
            return Err("contact_no cannot be empty");
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct AssignRoleRequest {
    pub user_id: Uuid,
    pub role_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct UserListQuery {
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub contact_no: String,
    pub profile_image_url: Option<String>,
    /// 1 = enabled, 0 = disabled by an admin.
    pub status: i32,
    pub email_verified: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for UserResponse {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            contact_no: row.contact_no,
            profile_image_url: row.profile_image_url,
            status: row.status,
            email_verified: row.email_verified,
            last_login: row.last_login,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn looks_like_email(s: &str) -> bool {
    let s = s.trim();
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape_check() {
        assert!(looks_like_email("a@b.co"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("nope"));
        assert!(!looks_like_email("@b.co"));
    }

    #[test]
    fn update_distinguishes_null_from_absent() {
        let absent: UpdateUserRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert!(absent.profile_image_url.is_none());

        let null: UpdateUserRequest =
            serde_json::from_str(r#"{"profile_image_url": null}"#).unwrap();
        assert_eq!(null.profile_image_url, Some(None));

        let set: UpdateUserRequest =
            serde_json::from_str(r#"{"profile_image_url": "https://x/y.png"}"#).unwrap();
        assert_eq!(set.profile_image_url, Some(Some("https://x/y.png".into())));
    }

    #[test]
    fn register_rejects_short_password() {
        let req = RegisterUserRequest {
            full_name: "A".into(),
            email: "a@b.co".into(),
            contact_no: "123".into(),
            password: "short".into(),
        };
        assert!(req.validate().is_err());
    }
}
