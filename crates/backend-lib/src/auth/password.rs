// ============================
// crates/backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use rand::{rngs::OsRng, RngCore};
use scrypt::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Params, Scrypt,
};
use thiserror::Error;
use zeroize::Zeroize;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Salt size in bytes (128 bits)
const SALT_BYTES: usize = 16;

/// Failure to produce a password hash. Always fatal to the request.
#[derive(Error, Debug)]
pub enum HashingError {
    #[error("entropy source failed: {0}")]
    Entropy(String),

    #[error("invalid scrypt parameters: {0}")]
    Params(String),

    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// Hashes passwords with scrypt and checks them against stored PHC strings.
///
/// Cost parameters only apply to new hashes; verification reads the
/// parameters embedded in the stored hash, so raising the cost does not lock
/// out existing users.
#[derive(Clone, Copy, Debug)]
pub struct CredentialVerifier {
    params: Params,
}

impl Default for CredentialVerifier {
    fn default() -> Self {
        Self::new(Params::recommended())
    }
}

impl CredentialVerifier {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    /// Build a verifier from raw scrypt cost parameters
    pub fn with_cost(log_n: u8, r: u32, p: u32) -> Result<Self, HashingError> {
        let params = Params::new(log_n, r, p, Params::RECOMMENDED_LEN)
            .map_err(|e| HashingError::Params(e.to_string()))?;
        Ok(Self::new(params))
    }

    /// Hash a password with a fresh random salt
    pub fn hash(&self, plain: &str) -> Result<String, HashingError> {
        let mut salt_bytes = [0u8; SALT_BYTES];
        OsRng
            .try_fill_bytes(&mut salt_bytes)
            .map_err(|e| HashingError::Entropy(e.to_string()))?;
        let salt =
            SaltString::encode_b64(&salt_bytes).map_err(|e| HashingError::Hash(e.to_string()))?;

        let hash = Scrypt
            .hash_password_customized(plain.as_bytes(), None, None, self.params, &salt)
            .map_err(|e| HashingError::Hash(e.to_string()))?
            .to_string();
        Ok(hash)
    }

    /// Hash a password and zeroize the plaintext, whatever the outcome
    pub fn hash_secure(&self, plain: &mut String) -> Result<String, HashingError> {
        let hash = self.hash(plain);
        plain.zeroize();
        hash
    }

    /// Verify a password against a stored hash.
    ///
    /// Returns false for a wrong password, a malformed hash or a hash produced
    /// by another algorithm. Callers cannot tell these apart.
    pub fn verify(&self, plain: &str, stored_hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(stored_hash) {
            Ok(h) => h,
            Err(_) => return false,
        };
        Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
    }

    /// Spend the same scrypt work as [`verify`](Self::verify) for an account
    /// that does not exist. Always false.
    pub fn verify_absent(&self, plain: &str) -> bool {
        let _ = self.hash(plain);
        false
    }
}
