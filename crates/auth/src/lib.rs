//! `stockflow-auth` — session/identity boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: claims
//! validation is pure and deterministic, and token encoding/decoding is the
//! only place the JWT library appears.

pub mod claims;
pub mod token;

pub use claims::{validate_claims, SessionClaims, TokenValidationError};
pub use token::{Hs256TokenService, TokenError, TokenValidator};
