//! Authentication infrastructure module
//!
//! This module provides JWT token management for user authentication.

mod jwt;

pub use jwt::{JwtClaims, JwtConfig, JwtGenerator, JwtService};
