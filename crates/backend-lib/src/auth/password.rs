// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use rand::RngCore;
use scrypt::{scrypt, Params};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Salt size in bytes
pub const SALT_LEN: usize = 16;

/// Derived hash size in bytes
pub const HASH_LEN: usize = 32;

/// scrypt cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashParams {
    /// log2 of the CPU/memory cost
    pub log_n: u8,
    /// Block size
    pub r: u32,
    /// Parallelism
    pub p: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            log_n: 15,
            r: 8,
            p: 1,
        }
    }
}

impl HashParams {
    /// Convert into scrypt's own parameter type, rejecting invalid combinations
    pub fn to_scrypt(self) -> Result<Params, AppError> {
        Params::new(self.log_n, self.r, self.p, HASH_LEN)
            .map_err(|e| AppError::Internal(format!("invalid scrypt parameters: {e}")))
    }
}

/// Generate a fresh random salt
pub fn generate_salt() -> Vec<u8> {
    let mut salt = vec![0u8; SALT_LEN];
    rand::rng().fill_bytes(&mut salt);
    salt
}

/// Hash `input` under `salt`. The same input and salt always give the same bytes.
pub fn hash_password(input: &[u8], salt: &[u8], params: HashParams) -> Result<Vec<u8>, AppError> {
    let params = params.to_scrypt()?;
    let mut output = vec![0u8; HASH_LEN];
    scrypt(input, salt, &params, &mut output)
        .map_err(|e| AppError::Internal(format!("scrypt failed: {e}")))?;
    Ok(output)
}

/// Check a plaintext candidate against a stored hash and its salt
pub fn verify_password(stored_hash: &[u8], salt: &[u8], candidate: &str, params: HashParams) -> bool {
    match hash_password(candidate.as_bytes(), salt, params) {
        Ok(hashed) => constant_time_eq(&hashed, stored_hash),
        Err(e) => {
            tracing::error!(error = %e, "password verification could not hash the candidate");
            false
        },
    }
}

/// Byte comparison whose running time does not depend on where the inputs differ
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
