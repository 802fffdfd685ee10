/*
 * Responsibility
 * - login / otp / logout handlers
 * - translate LoginService outcomes into the envelope + session cookies
 */
use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::Response,
};

use crate::{
    api::v1::dto::auth::{
        LoginRequest, OtpGenerateRequest, OtpPendingResponse, OtpVerifyRequest, TokenResponse,
        TokenUser,
    },
    api::v1::envelope::ApiEnvelope,
    error::AppError,
    services::auth::cookies,
    services::auth::login::{IssuedToken, LoginError, LoginOutcome, OtpPending},
    state::AppState,
};

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, AppError> {
    req.validate().map_err(AppError::validation)?;

    let outcome = state
        .login
        .login(req.email.trim(), &req.password, req.is_admin_console())
        .await
        .map_err(map_login_error)?;

    match outcome {
        LoginOutcome::Token(token) => Ok(token_response(&state, token)),
        LoginOutcome::OtpPending(pending) => Ok(otp_pending_response(pending)),
    }
}

pub async fn otp_generate(
    State(state): State<AppState>,
    Json(req): Json<OtpGenerateRequest>,
) -> Result<Response, AppError> {
    req.validate().map_err(AppError::validation)?;

    let pending = state
        .login
        .otp_generate(req.email.trim(), &req.password)
        .await
        .map_err(map_login_error)?;

    Ok(otp_pending_response(pending))
}

pub async fn otp_verify(
    State(state): State<AppState>,
    Json(req): Json<OtpVerifyRequest>,
) -> Result<Response, AppError> {
    req.validate().map_err(AppError::validation)?;

    let token = state
        .login
        .otp_verify(req.user_id, &req.otp)
        .await
        .map_err(map_login_error)?;

    Ok(token_response(&state, token))
}

/// Stateless JWTs cannot be revoked server-side; logout only drops the
/// browser session cookies.
pub async fn logout(State(state): State<AppState>) -> Response {
    let mut resp = ApiEnvelope::message_only("Logged out successfully").ok();
    for cookie in [
        state.cookie_policy.clear_access_cookie(),
        state.cookie_policy.clear_csrf_cookie(),
    ] {
        if let Ok(value) = header::HeaderValue::from_str(&cookie) {
            resp.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    resp
}

fn token_response(state: &AppState, token: IssuedToken) -> Response {
    let body = TokenResponse {
        access_token: token.access_token.clone(),
        token_type: "Bearer",
        expires_in: token.expires_in,
        user: TokenUser {
            id: token.user_id,
            full_name: token.full_name,
            email: token.email,
            role: token.role,
        },
    };

    let mut resp = ApiEnvelope::success("Login successful", body).ok();
    let csrf = cookies::generate_csrf_token();
    for cookie in [
        state.cookie_policy.access_cookie(&token.access_token),
        state.cookie_policy.csrf_cookie(&csrf),
    ] {
        if let Ok(value) = header::HeaderValue::from_str(&cookie) {
            resp.headers_mut().append(header::SET_COOKIE, value);
        }
    }

    resp
}

fn otp_pending_response(pending: OtpPending) -> Response {
    let body = OtpPendingResponse {
        user_id: pending.user_id,
        email: pending.email,
        otp_generated: true,
        email_status: if pending.email_sent { "sent" } else { "failed" },
    };

    ApiEnvelope::success("OTP sent to your email", body)
        .into_response_with(StatusCode::OK)
}

fn map_login_error(err: LoginError) -> AppError {
    match err {
        LoginError::InvalidCredentials => AppError::Unauthorized("Invalid email or password"),
        LoginError::AdminRequired => AppError::Forbidden("Admin access required"),
        LoginError::AdminUsesDirectLogin => {
            AppError::Forbidden("Admin users should use direct login")
        }
        LoginError::AlreadyVerified => {
            AppError::validation("Email already verified. Please login directly.")
        }
        LoginError::InvalidOtp => AppError::Unauthorized("Invalid or expired OTP"),
        LoginError::UserNotFound => AppError::not_found("User"),
        LoginError::Repo(e) => e.into(),
        LoginError::Token(e) => {
            tracing::error!(error = %e, "token signing failed");
            AppError::Internal
        }
        LoginError::OtpStore(e) => {
            tracing::error!(error = %e, "otp store failure");
            AppError::Internal
        }
    }
}
