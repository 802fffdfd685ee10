pub mod auth;
pub mod dashboard;
pub mod events;
pub mod health;
pub mod roles;
pub mod transactions;
pub mod users;
