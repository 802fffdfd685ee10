/*
 * Responsibility
 * - v1 public surface (routes() re-export etc.)
 */
pub mod dto;
pub mod envelope;
pub mod extractors;
pub mod handlers;
pub mod routes;
