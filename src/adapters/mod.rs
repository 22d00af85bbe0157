//! Adapters - Implementations of port interfaces.
//!
//! - `auth` - Token validation and session revocation
//! - `http` - axum REST API
//! - `memory` - In-memory store for tests and local runs
//! - `postgres` - sqlx-backed repositories

pub mod auth;
pub mod http;
pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
