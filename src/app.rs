/*
 * Responsibility
 * - load Config -> build dependencies -> assemble the Router
 * - apply middleware (auth/CSRF on the protected subtree, HTTP/CORS/security
 *   headers on everything)
 * - start via axum::serve()
 */
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::{
    api, config::Config, middleware, services::auth::cookies::CookiePolicy,
    services::auth::otp::{InMemoryOtpStore, OtpStore, ValkeyOtpStore},
    services::auth::{LoginService, TokenService},
    services::mailer::{HttpApiMailer, NoopMailer, OtpMailer},
    state::AppState,
};

pub async fn run() -> Result<()> {
    init_tracing();
    init_panic_hook();

    let config = Config::from_env().context("configuration error")?;
    info!(?config, "starting");

    let state = build_state(&config).await?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind {}", config.addr))?;
    info!(addr = %config.addr, "listening");

    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

/// Panics otherwise bypass tracing and end up interleaved on stderr.
fn init_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!(panic = %info, "panic");
        default_hook(info);
    }));
}

async fn build_state(config: &Config) -> Result<AppState> {
    let db = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("failed to connect to Postgres")?;

    let tokens = TokenService::new(
        &config.jwt_secret,
        config.access_token_ttl_seconds,
        config.access_token_leeway_seconds,
    );

    let otp_store: Arc<dyn OtpStore> = match &config.redis_url {
        Some(url) => {
            let store = ValkeyOtpStore::new(url)
                .await
                .context("failed to connect to the OTP store backend")?;
            Arc::new(store)
        }
        // Config::from_env refuses this combination in production.
        None => {
            info!("no REDIS_URL; using the in-memory OTP store");
            Arc::new(InMemoryOtpStore::default())
        }
    };

    let mailer: Arc<dyn OtpMailer> =
        match (&config.mail_api_url, &config.mail_api_key, &config.mail_from) {
            (Some(url), Some(key), Some(from)) => {
                Arc::new(HttpApiMailer::new(url.clone(), key.clone(), from.clone()))
            }
            _ => {
                info!("mail provider not configured; otp emails will be logged only");
                Arc::new(NoopMailer)
            }
        };

    let login = LoginService::new(
        db.clone(),
        tokens.clone(),
        otp_store,
        mailer,
        Duration::from_secs(config.otp_ttl_seconds),
    );

    let cookie_policy = CookiePolicy {
        secure: config.app_env.is_production(),
        max_age_seconds: config.access_token_ttl_seconds,
    };

    Ok(AppState::new(db, tokens, login, cookie_policy))
}

fn build_router(state: AppState, config: &Config) -> Router {
    // Protected subtree: CSRF check inside, token check outside (the token
    // check runs first).
    let protected = api::v1::routes::protected();
    let protected = middleware::csrf::apply(protected);
    let protected = middleware::auth::apply(protected, state.clone());

    let v1 = api::v1::routes::public().merge(protected);

    let app = Router::new()
        .route("/login", get(api::pages::login_page))
        .route("/app", get(api::pages::app_page))
        .nest("/api/v1", v1)
        .with_state(state);

    let app = middleware::security_headers::apply(app);
    let app = middleware::cors::apply(app, config);
    middleware::http::apply(app, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppEnv;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;
    use uuid::Uuid;

    fn test_config() -> Config {
        Config {
            addr: "127.0.0.1:0".parse().unwrap(),
            database_url: "postgres://localhost/unused".into(),
            app_env: AppEnv::Development,
            cors_allowed_origins: vec![],
            body_limit_bytes: 1024 * 1024,
            request_timeout_seconds: 30,
            jwt_secret: "router-test-secret".into(),
            access_token_ttl_seconds: 600,
            access_token_leeway_seconds: 0,
            redis_url: None,
            otp_ttl_seconds: 600,
            mail_api_url: None,
            mail_api_key: None,
            mail_from: None,
        }
    }

    fn test_app() -> (Router, AppState) {
        test_app_with(test_config())
    }

    fn test_app_with(config: Config) -> (Router, AppState) {
        let db = sqlx::PgPool::connect_lazy(&config.database_url).unwrap();
        let tokens = TokenService::new(&config.jwt_secret, 600, 0);
        let login = LoginService::new(
            db.clone(),
            tokens.clone(),
            Arc::new(InMemoryOtpStore::default()),
            Arc::new(NoopMailer),
            Duration::from_secs(600),
        );
        let state = AppState::new(
            db,
            tokens,
            login,
            CookiePolicy {
                secure: false,
                max_age_seconds: 600,
            },
        );

        (build_router(state.clone(), &config), state)
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), 64 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_public() {
        let (app, _) = test_app();
        let resp = app
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_route_without_token_is_401_envelope() {
        let (app, _) = test_app();
        let resp = app
            .oneshot(Request::get("/api/v1/events").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(resp).await;
        assert_eq!(body["IsSuccess"], false);
        assert_eq!(body["Message"], "Authentication required");
    }

    #[tokio::test]
    async fn malformed_bearer_wins_over_valid_cookie() {
        let (app, state) = test_app();
        let token = state.tokens.issue(Uuid::new_v4(), "a@b.co", "User").unwrap();

        let resp = app
            .oneshot(
                Request::get("/api/v1/dashboard/me")
                    .header(header::AUTHORIZATION, "Token abc")
                    .header(header::COOKIE, format!("access_token={token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // A broken Authorization header must not fall back to the cookie,
        // and must not clear it either.
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(resp.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn invalid_cookie_token_is_cleared() {
        let (app, _) = test_app();
        let resp = app
            .oneshot(
                Request::get("/api/v1/dashboard/me")
                    .header(header::COOKIE, "access_token=stale-garbage")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let cleared: Vec<_> = resp
            .headers()
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(cleared.len(), 2);
        assert!(cleared.iter().all(|c| c.contains("Max-Age=0")));
    }

    #[tokio::test]
    async fn cookie_mutation_without_csrf_header_is_403() {
        let (app, state) = test_app();
        let token = state.tokens.issue(Uuid::new_v4(), "a@b.co", "User").unwrap();

        let resp = app
            .oneshot(
                Request::post("/api/v1/users/assign-role")
                    .header(header::COOKIE, format!("access_token={token}; csrf_token=x"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body = body_json(resp).await;
        assert_eq!(body["Message"], "CSRF token missing or incorrect");
    }

    #[tokio::test]
    async fn matching_csrf_header_reaches_the_handler() {
        let (app, state) = test_app();
        // Non-admin, so the handler rejects with its own message. Seeing
        // that message proves both the CSRF and token layers passed.
        let token = state.tokens.issue(Uuid::new_v4(), "a@b.co", "User").unwrap();

        let resp = app
            .oneshot(
                Request::post("/api/v1/users/assign-role")
                    .header(header::COOKIE, format!("access_token={token}; csrf_token=x"))
                    .header("x-csrftoken", "x")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        format!(
                            r#"{{"user_id":"{}","role_id":"{}"}}"#,
                            Uuid::new_v4(),
                            Uuid::new_v4()
                        ),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let body = body_json(resp).await;
        assert_eq!(body["Message"], "Admin access required");
    }

    #[tokio::test]
    async fn admin_gate_rejects_non_admin_bearer() {
        let (app, state) = test_app();
        let token = state.tokens.issue(Uuid::new_v4(), "a@b.co", "User").unwrap();

        let resp = app
            .oneshot(
                Request::get("/api/v1/dashboard/stats")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let mut config = test_config();
        config.body_limit_bytes = 256;
        let (app, _) = test_app_with(config);

        let resp = app
            .oneshot(
                Request::post("/api/v1/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(vec![b'a'; 1024]))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn login_page_is_served_without_auth() {
        let (app, _) = test_app();
        let resp = app
            .oneshot(Request::get("/login").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn security_headers_are_present() {
        let (app, _) = test_app();
        let resp = app
            .oneshot(Request::get("/api/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.headers().get("x-content-type-options").unwrap(), "nosniff");
        assert_eq!(resp.headers().get("x-frame-options").unwrap(), "DENY");
        assert!(resp.headers().get("x-request-id").is_some());
    }
}
