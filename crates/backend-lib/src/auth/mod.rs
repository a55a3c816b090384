// ============================
// crates/backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod credentials;
pub mod password;
pub mod profile;
pub mod token;
mod service;
mod service_impl;

pub use credentials::CredentialStore;
pub use password::{generate_salt, hash_password, verify_password, HashParams, HASH_LEN, SALT_LEN};
pub use profile::VirtualProfile;
pub use service::AuthService;
pub use service_impl::DefaultAuth;
pub use token::{derive_token, TokenService};
