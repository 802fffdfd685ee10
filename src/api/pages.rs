/*
 * Responsibility
 * - the two server-rendered pages: /login and /app
 * - session guard: /app requires a valid cookie, /login bounces a valid
 *   session to /app
 * - /login never redirects on a bad session (it clears it instead), so the
 *   pair cannot redirect in a loop
 */
use axum::{
    extract::State,
    http::{HeaderMap, header},
    response::{Html, IntoResponse, Redirect, Response},
};

use crate::services::auth::cookies::{self, ACCESS_TOKEN_COOKIE};
use crate::state::AppState;

const LOGIN_PAGE: &str = include_str!("pages/login.html");
const APP_PAGE: &str = include_str!("pages/app.html");

fn has_valid_session(state: &AppState, headers: &HeaderMap) -> SessionState {
    match cookies::read_cookie(headers, ACCESS_TOKEN_COOKIE) {
        None => SessionState::Missing,
        Some(token) => match state.tokens.verify_verified(&token) {
            Ok(_) => SessionState::Valid,
            Err(_) => SessionState::Invalid,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionState {
    Missing,
    Valid,
    Invalid,
}

fn with_cleared_cookies(state: &AppState, mut resp: Response) -> Response {
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

/// GET /login
pub async fn login_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match has_valid_session(&state, &headers) {
        SessionState::Valid => Redirect::to("/app").into_response(),
        SessionState::Missing => Html(LOGIN_PAGE).into_response(),
        SessionState::Invalid => {
            // Serve the page anyway; redirecting here could loop with /app.
            with_cleared_cookies(&state, Html(LOGIN_PAGE).into_response())
        }
    }
}

/// GET /app
pub async fn app_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    match has_valid_session(&state, &headers) {
        SessionState::Valid => Html(APP_PAGE).into_response(),
        SessionState::Missing => Redirect::to("/login").into_response(),
        SessionState::Invalid => with_cleared_cookies(&state, Redirect::to("/login").into_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::cookies::CookiePolicy;
    use crate::services::auth::{LoginService, TokenService};
    use crate::services::mailer::NoopMailer;
    use axum::http::{HeaderValue, StatusCode};
    use std::sync::Arc;
    use std::time::Duration;
    use uuid::Uuid;

    fn test_state() -> AppState {
        let db = sqlx::PgPool::connect_lazy("postgres://localhost/unused").unwrap();
        let tokens = TokenService::new("page-test-secret", 600, 0);
        let login = LoginService::new(
            db.clone(),
            tokens.clone(),
            Arc::new(crate::services::auth::otp::InMemoryOtpStore::default()),
            Arc::new(NoopMailer),
            Duration::from_secs(600),
        );
        AppState::new(
            db,
            tokens,
            login,
            CookiePolicy {
                secure: false,
                max_age_seconds: 600,
            },
        )
    }

    fn cookie_headers(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("access_token={token}")).unwrap(),
        );
        headers
    }

    #[tokio::test]
    async fn login_page_without_session_is_200() {
        let state = test_state();
        let resp = login_page(State(state), HeaderMap::new()).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(resp.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn login_page_with_valid_session_redirects_to_app() {
        let state = test_state();
        let token = state
            .tokens
            .issue(Uuid::new_v4(), "a@b.co", "User")
            .unwrap();

        let resp = login_page(State(state), cookie_headers(&token)).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/app");
    }

    #[tokio::test]
    async fn login_page_with_bad_token_serves_page_and_clears_cookie() {
        let state = test_state();
        let resp = login_page(State(state), cookie_headers("garbage")).await;

        // No redirect: this is what breaks the loop.
        assert_eq!(resp.status(), StatusCode::OK);
        let cleared: Vec<_> = resp.headers().get_all(header::SET_COOKIE).iter().collect();
        assert_eq!(cleared.len(), 2);
        assert!(cleared[0].to_str().unwrap().contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn app_page_without_session_redirects_to_login() {
        let state = test_state();
        let resp = app_page(State(state), HeaderMap::new()).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/login");
    }

    #[tokio::test]
    async fn app_page_with_expired_token_clears_and_redirects() {
        let state = test_state();
        // A token from a different secret behaves like an expired one.
        let bad = TokenService::new("other-secret", 600, 0)
            .issue(Uuid::new_v4(), "a@b.co", "User")
            .unwrap();

        let resp = app_page(State(state), cookie_headers(&bad)).await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/login");
        assert!(resp.headers().get_all(header::SET_COOKIE).iter().count() > 0);
    }

    #[tokio::test]
    async fn app_page_with_valid_session_is_200() {
        let state = test_state();
        let token = state
            .tokens
            .issue(Uuid::new_v4(), "a@b.co", "User")
            .unwrap();

        let resp = app_page(State(state), cookie_headers(&token)).await;

        assert_eq!(resp.status(), StatusCode::OK);
    }
}
