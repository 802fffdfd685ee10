/*
 * Responsibility
 * - shared context handed to the Router (AppState)
 * - Clone is expected to be cheap (PgPool/services are Arc inside)
 */
use crate::services::auth::cookies::CookiePolicy;
use crate::services::auth::{LoginService, TokenService};

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub tokens: TokenService,
    pub login: LoginService,
    pub cookie_policy: CookiePolicy,
}

impl AppState {
    pub fn new(
        db: sqlx::PgPool,
        tokens: TokenService,
        login: LoginService,
        cookie_policy: CookiePolicy,
    ) -> Self {
        Self {
            db,
            tokens,
            login,
            cookie_policy,
        }
    }
}
