//! # auth-adapters
//!
//! Password hashing (Argon2id, always compiled) and bearer tokens
//! (HS256 JWT, feature `auth-jwt`).

pub mod password;

#[cfg(feature = "auth-jwt")]
pub mod jwt;

pub use password::Argon2PasswordHasher;
#[cfg(feature = "auth-jwt")]
pub use jwt::JwtTokenService;
