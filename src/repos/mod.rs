pub mod dashboard_repo;
pub mod error;
pub mod event_repo;
pub mod role_repo;
pub mod transaction_repo;
pub mod user_repo;
