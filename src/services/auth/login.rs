/*
 * Responsibility
 * - credential login, OTP generation and OTP verification
 * - decides when a token is issued directly and when email verification
 *   must happen first
 * - handlers only translate LoginOutcome / LoginError into HTTP
 */
use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::repos::error::RepoError;
use crate::repos::{role_repo, user_repo};
use crate::services::auth::jwt::{TokenError, TokenService};
use crate::services::auth::otp::{OtpStore, generate_otp, hash_otp};
use crate::services::auth::password;
use crate::services::mailer::OtpMailer;

/// Role assumed when a user has no active role assignment.
pub const DEFAULT_ROLE: &str = "User";

#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    /// Unknown email, disabled account or wrong password. One error on
    /// purpose: the caller must not learn which part failed.
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Admin access required")]
    AdminRequired,
    #[error("Admin users should use direct login")]
    AdminUsesDirectLogin,
    #[error("Email already verified. Please login directly.")]
    AlreadyVerified,
    #[error("Invalid or expired OTP")]
    InvalidOtp,
    #[error("user not found")]
    UserNotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("token signing failed")]
    Token(#[from] TokenError),
    #[error("otp store failure")]
    OtpStore(#[from] crate::services::auth::otp::OtpError),
}

/// A successfully issued session.
#[derive(Debug)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: u64,
    pub user_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub role: String,
}

/// Login that stopped short of a token: the account still needs email
/// verification via OTP.
#[derive(Debug)]
pub struct OtpPending {
    pub user_id: Uuid,
    pub email: String,
    pub email_sent: bool,
}

#[derive(Debug)]
pub enum LoginOutcome {
    Token(IssuedToken),
    OtpPending(OtpPending),
}

#[derive(Clone)]
pub struct LoginService {
    db: PgPool,
    tokens: TokenService,
    otp_store: Arc<dyn OtpStore>,
    mailer: Arc<dyn OtpMailer>,
    otp_ttl: Duration,
}

impl LoginService {
    pub fn new(
        db: PgPool,
        tokens: TokenService,
        otp_store: Arc<dyn OtpStore>,
        mailer: Arc<dyn OtpMailer>,
        otp_ttl: Duration,
    ) -> Self {
        Self {
            db,
            tokens,
            otp_store,
            mailer,
            otp_ttl,
        }
    }

    /// Credential login.
    ///
    /// - `admin_console`: the admin web console sets this; non-admins are
    ///   rejected outright.
    /// - Admins always get a token. Non-admins get one only after their email
    ///   address has been verified; otherwise an OTP goes out instead.
    pub async fn login(
        &self,
        email: &str,
        plain_password: &str,
        admin_console: bool,
    ) -> Result<LoginOutcome, LoginError> {
        let user = self.check_credentials(email, plain_password).await?;
        let role = self.active_role(user.id).await?;
        let is_admin = role.eq_ignore_ascii_case("admin");

        if admin_console && !is_admin {
            warn!(user_id = %user.id, "admin console login refused for non-admin");
            return Err(LoginError::AdminRequired);
        }

        if is_admin || user.email_verified {
            let token = self.issue(user.id, &user.full_name, &user.email, &role).await?;
            return Ok(LoginOutcome::Token(token));
        }

        let pending = self.send_otp(user.id, &user.full_name, &user.email).await?;
        Ok(LoginOutcome::OtpPending(pending))
    }

    /// Explicit OTP (re-)generation. Same credential check as login, but
    /// callers who would get a token from `login` are redirected there.
    pub async fn otp_generate(
        &self,
        email: &str,
        plain_password: &str,
    ) -> Result<OtpPending, LoginError> {
        let user = self.check_credentials(email, plain_password).await?;
        let role = self.active_role(user.id).await?;

        if role.eq_ignore_ascii_case("admin") {
            return Err(LoginError::AdminUsesDirectLogin);
        }
        if user.email_verified {
            return Err(LoginError::AlreadyVerified);
        }

        self.send_otp(user.id, &user.full_name, &user.email).await
    }

    /// Consume the outstanding OTP. Success marks the email verified and
    /// issues a token.
    pub async fn otp_verify(&self, user_id: Uuid, otp: &str) -> Result<IssuedToken, LoginError> {
        let user = user_repo::find_auth_by_id(&self.db, user_id)
            .await?
            .ok_or(LoginError::UserNotFound)?;

        // take() is destructive; a wrong guess burns the code.
        let stored = self.otp_store.take(user.id).await?;
        match stored {
            Some(hash) if hash == hash_otp(otp) => {}
            _ => return Err(LoginError::InvalidOtp),
        }

        user_repo::mark_email_verified(&self.db, user.id).await?;
        info!(user_id = %user.id, "email verified via otp");

        let role = self.active_role(user.id).await?;
        self.issue(user.id, &user.full_name, &user.email, &role).await
    }

    async fn check_credentials(
        &self,
        email: &str,
        plain_password: &str,
    ) -> Result<user_repo::UserAuthRow, LoginError> {
        let user = user_repo::find_auth_by_email(&self.db, email)
            .await?
            .ok_or(LoginError::InvalidCredentials)?;

        if !password::verify_password(plain_password, &user.password_hash) {
            return Err(LoginError::InvalidCredentials);
        }

        Ok(user)
    }

    async fn active_role(&self, user_id: Uuid) -> Result<String, LoginError> {
        Ok(role_repo::active_role_name_for_user(&self.db, user_id)
            .await?
            .unwrap_or_else(|| DEFAULT_ROLE.to_string()))
    }

    async fn issue(
        &self,
        user_id: Uuid,
        full_name: &str,
        email: &str,
        role: &str,
    ) -> Result<IssuedToken, LoginError> {
        let access_token = self.tokens.issue(user_id, email, role)?;
        user_repo::touch_last_login(&self.db, user_id, chrono::Utc::now()).await?;

        Ok(IssuedToken {
            access_token,
            expires_in: self.tokens.ttl_seconds(),
            user_id,
            full_name: full_name.to_string(),
            email: email.to_string(),
            role: role.to_string(),
        })
    }

    async fn send_otp(
        &self,
        user_id: Uuid,
        full_name: &str,
        email: &str,
    ) -> Result<OtpPending, LoginError> {
        let otp = generate_otp();
        self.otp_store
            .put(user_id, &hash_otp(&otp), self.otp_ttl)
            .await?;

        // Delivery failure is reported, not fatal; the code can be re-sent.
        let email_sent = match self.mailer.send_otp(email, full_name, &otp).await {
            Ok(()) => true,
            Err(err) => {
                warn!(user_id = %user_id, error = %err, "otp email delivery failed");
                false
            }
        };

        info!(user_id = %user_id, email_sent, "otp generated");

        Ok(OtpPending {
            user_id,
            email: email.to_string(),
            email_sent,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::otp::InMemoryOtpStore;
    use crate::services::mailer::NoopMailer;

    // The DB-backed paths need Postgres; what can be covered here is the
    // OTP consume-once contract that otp_verify builds on.
    #[tokio::test]
    async fn otp_store_contract_consume_once() {
        let store = InMemoryOtpStore::default();
        let user_id = Uuid::new_v4();
        let otp = generate_otp();

        store
            .put(user_id, &hash_otp(&otp), Duration::from_secs(60))
            .await
            .unwrap();

        let taken = store.take(user_id).await.unwrap();
        assert_eq!(taken, Some(hash_otp(&otp)));
        assert_eq!(store.take(user_id).await.unwrap(), None);
    }

    #[tokio::test]
    async fn noop_mailer_always_succeeds() {
        let mailer = NoopMailer;
        assert!(mailer.send_otp("a@b.co", "A", "123456").await.is_ok());
    }
}
