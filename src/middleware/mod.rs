/*
 * Responsibility
 * - middleware public interface (re-export)
 */
pub mod auth;
pub mod cors;
pub mod csrf;
pub mod http;
pub mod security_headers;
