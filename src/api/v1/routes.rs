/*
 * Responsibility
 * - the v1 URL structure
 * - which routes are public and which sit behind the auth middleware is
 *   decided here; app.rs only composes the pieces
 */
use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

use crate::api::v1::handlers::{
    auth::{login, logout, otp_generate, otp_verify},
    dashboard::{admin_stats, my_dashboard},
    events::{create_event, delete_event, get_event, list_events, set_event_status, update_event},
    health::health,
    roles::{create_role, delete_role, get_role, list_roles, update_role},
    transactions::{
        create_transaction, delete_transaction, event_summary, get_transaction, list_transactions,
        update_transaction, user_event_history,
    },
    users::{assign_role, delete_user, get_user, list_users, register, update_user},
};

/// Routes reachable without a token.
pub fn public() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(login))
        .route("/auth/otp/generate", post(otp_generate))
        .route("/auth/otp/verify", post(otp_verify))
        .route("/auth/logout", post(logout))
        // registration is the only public write on /users
        .route("/users", post(register))
}

/// Routes behind the access-token middleware (applied in app.rs).
pub fn protected() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route(
            "/users/{user_id}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/users/assign-role", post(assign_role))
        .route("/roles", get(list_roles).post(create_role))
        .route(
            "/roles/{role_id}",
            get(get_role).put(update_role).delete(delete_role),
        )
        .route("/events", get(list_events).post(create_event))
        .route(
            "/events/{event_id}",
            get(get_event)
                .put(update_event)
                .patch(update_event)
                .delete(delete_event),
        )
        .route("/events/{event_id}/status", patch(set_event_status))
        .route("/events/{event_id}/transactions/summary", get(event_summary))
        .route(
            "/events/{event_id}/users/{user_id}/transactions",
            get(user_event_history),
        )
        .route(
            "/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route(
            "/transactions/{transaction_id}",
            get(get_transaction)
                .put(update_transaction)
                .patch(update_transaction)
                .delete(delete_transaction),
        )
        .route("/dashboard/stats", get(admin_stats))
        .route("/dashboard/me", get(my_dashboard))
}
