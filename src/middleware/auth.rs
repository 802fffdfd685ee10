//! Access token verification -> AuthCtx into request extensions.
//!
//! Token lookup order:
//! 1. `Authorization: Bearer <jwt>`. A present but malformed header is a
//!    hard 401; we never fall through to the cookie in that case.
//! 2. `access_token` cookie (browser clients).
//!
//! A cookie that fails verification gets cleared in the 401 response so
//! the browser stops replaying a dead token.

use axum::{
    Router,
    body::Body,
    http::{Request, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::cookies::{self, ACCESS_TOKEN_COOKIE};
use crate::state::AppState;

/// Where the verified token came from. Downstream layers use this to decide
/// whether CSRF applies (cookie auth only).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    BearerHeader,
    Cookie,
}

/// Wrap a protected subtree with the access middleware.
///
/// ```ignore
/// let v1 = api::v1::routes::protected();
/// let v1 = middleware::auth::apply(v1, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

async fn access_middleware(
    axum::extract::State(state): axum::extract::State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let (token, source) = match extract_token(&req)? {
        Some(found) => found,
        None => return Err(AppError::unauthorized().into_response()),
    };

    let verified = match state.tokens.verify_verified(&token) {
        Ok(v) => v,
        Err(err) => {
            tracing::warn!(error = ?err, source = ?source, "access token verification failed");
            let mut resp = AppError::unauthorized().into_response();
            if source == TokenSource::Cookie {
                clear_auth_cookies(&mut resp, &state);
            }
            return Err(resp);
        }
    };

    let auth_ctx = AuthCtx::new(verified.user_id, verified.email, verified.role);

    req.extensions_mut().insert(source);
    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}

/// Bearer header first, cookie second. Errors only on a malformed
/// Authorization header.
fn extract_token(req: &Request<Body>) -> Result<Option<(String, TokenSource)>, Response> {
    if let Some(value) = req.headers().get(header::AUTHORIZATION) {
        let value = value
            .to_str()
            .map_err(|_| AppError::unauthorized().into_response())?;
        let token = value
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized().into_response())?;
        if token.is_empty() {
            return Err(AppError::unauthorized().into_response());
        }
        return Ok(Some((token.to_owned(), TokenSource::BearerHeader)));
    }

    if let Some(token) = cookies::read_cookie(req.headers(), ACCESS_TOKEN_COOKIE) {
        return Ok(Some((token, TokenSource::Cookie)));
    }

    Ok(None)
}

fn clear_auth_cookies(resp: &mut Response, state: &AppState) {
    for cookie in [
        state.cookie_policy.clear_access_cookie(),
        state.cookie_policy.clear_csrf_cookie(),
    ] {
        if let Ok(value) = header::HeaderValue::from_str(&cookie) {
            resp.headers_mut().append(header::SET_COOKIE, value);
        }
    }
}
