//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` and `SessionTerminator` ports:
//!
//! - `jwt` - HS256 validation of tokens issued by the hosted auth service
//! - `logout` - Session revocation through the auth service's logout endpoint
//! - `mock` - Test implementations that don't require external services

mod jwt;
mod logout;
mod mock;

pub use jwt::{JwtConfig, JwtSessionValidator};
pub use logout::HttpSessionTerminator;
pub use mock::{MockSessionTerminator, MockSessionValidator};
