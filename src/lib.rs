//! Staylink - vacation-rental marketplace backend.
//!
//! Partners list properties, referral agents bring partners in, guests book
//! stays, and administrators approve accounts and feature listings. Every
//! signed-in request passes the session gate: a principal's role and account
//! status decide where they land, and denied sessions are signed out.
//!
//! Layout follows ports and adapters:
//!
//! - `domain` - Entities, status machines, the session decision table
//! - `ports` - Repository and auth traits
//! - `application` - One handler per workflow
//! - `adapters` - Postgres, in-memory, auth service, HTTP
//! - `config` - Environment-driven settings

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
