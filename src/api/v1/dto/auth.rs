/*
 * Responsibility
 * - request/response DTOs for the login and OTP endpoints
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `app_key` identifies the calling surface: 1 is the admin console,
/// anything else (or absent) is the regular app.
pub const ADMIN_APP_KEY: i32 = 1;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub app_key: Option<i32>,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.email.trim().is_empty() {
            return Err("email is required");
        }
        if self.password.is_empty() {
            return Err("password is required");
        }

        Ok(())
    }

    pub fn is_admin_console(&self) -> bool {
        self.app_key == Some(ADMIN_APP_KEY)
    }
}

#[derive(Debug, Deserialize)]
pub struct OtpGenerateRequest {
    pub email: String,
    pub password: String,
}

impl OtpGenerateRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.email.trim().is_empty() {
            return Err("email is required");
        }
        if self.password.is_empty() {
            return Err("password is required");
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct OtpVerifyRequest {
    pub user_id: Uuid,
    pub otp: String,
}

impl OtpVerifyRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.otp.len() != 6 || !self.otp.bytes().all(|b| b.is_ascii_digit()) {
            return Err("otp must be a 6 digit code");
        }

        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct TokenUser {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
    pub user: TokenUser,
}

/// Returned when a login needs OTP verification before a token is issued.
///
/// `email_status` reports delivery ("sent" or "failed"); a failed send does
/// not fail the request.
#[derive(Debug, Serialize)]
pub struct OtpPendingResponse {
    pub user_id: Uuid,
    pub email: String,
    pub otp_generated: bool,
    pub email_status: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otp_verify_rejects_non_digits() {
        let req = OtpVerifyRequest {
            user_id: Uuid::new_v4(),
            otp: "12a456".into(),
        };
        assert!(req.validate().is_err());

        let req = OtpVerifyRequest {
            user_id: Uuid::new_v4(),
            otp: "123456".into(),
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn admin_console_flag() {
        let req = LoginRequest {
            email: "a@b.c".into(),
            password: "x".into(),
            app_key: Some(1),
        };
        assert!(req.is_admin_console());

        let req = LoginRequest {
            email: "a@b.c".into(),
            password: "x".into(),
            app_key: None,
        };
        assert!(!req.is_admin_console());
    }
}
