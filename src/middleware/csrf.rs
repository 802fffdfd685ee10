//! CSRF double-submit check for cookie-authenticated mutations.
//!
//! Only cookie sessions are at risk: the browser attaches `access_token`
//! automatically, so a cross-site form could trigger a mutation. Bearer
//! clients set the Authorization header themselves and are exempt, as is
//! every safe method.
//!
//! The check: `X-CSRFToken` header must equal the `csrf_token` cookie.

use axum::{
    Router,
    body::Body,
    http::{Method, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::cookies::{self, ACCESS_TOKEN_COOKIE, CSRF_HEADER, CSRF_TOKEN_COOKIE};
use crate::state::AppState;

pub fn apply(router: Router<AppState>) -> Router<AppState> {
    router.layer(middleware::from_fn(csrf_middleware))
}

async fn csrf_middleware(req: Request<Body>, next: Next) -> Result<Response, AppError> {
    if requires_csrf_check(&req) {
        let cookie = cookies::read_cookie(req.headers(), CSRF_TOKEN_COOKIE);
        let header = req
            .headers()
            .get(CSRF_HEADER)
            .and_then(|v| v.to_str().ok());

        match (cookie.as_deref(), header) {
            (Some(c), Some(h)) if !c.is_empty() && c == h => {}
            _ => {
                tracing::warn!(method = %req.method(), path = %req.uri().path(), "csrf check failed");
                return Err(AppError::Forbidden("CSRF token missing or incorrect"));
            }
        }
    }

    Ok(next.run(req).await)
}

fn requires_csrf_check(req: &Request<Body>) -> bool {
    let unsafe_method = matches!(
        *req.method(),
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    );
    if !unsafe_method {
        return false;
    }

    // Bearer clients are exempt; the check applies only when the session
    // rides on the access_token cookie.
    if req.headers().contains_key(header::AUTHORIZATION) {
        return false;
    }

    cookies::read_cookie(req.headers(), ACCESS_TOKEN_COOKIE).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn request(method: Method, cookie: Option<&str>, bearer: bool) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri("/api/v1/events");
        if let Some(c) = cookie {
            builder = builder.header(header::COOKIE, HeaderValue::from_str(c).unwrap());
        }
        if bearer {
            builder = builder.header(header::AUTHORIZATION, "Bearer tok");
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn get_is_exempt() {
        let req = request(Method::GET, Some("access_token=t"), false);
        assert!(!requires_csrf_check(&req));
    }

    #[test]
    fn bearer_mutation_is_exempt() {
        let req = request(Method::POST, None, true);
        assert!(!requires_csrf_check(&req));
    }

    #[test]
    fn cookie_mutation_requires_check() {
        let req = request(Method::POST, Some("access_token=t"), false);
        assert!(requires_csrf_check(&req));

        let req = request(Method::DELETE, Some("access_token=t; csrf_token=x"), false);
        assert!(requires_csrf_check(&req));
    }

    #[test]
    fn anonymous_mutation_is_exempt() {
        // No session at all; the auth middleware rejects it instead.
        let req = request(Method::POST, None, false);
        assert!(!requires_csrf_check(&req));
    }
}
