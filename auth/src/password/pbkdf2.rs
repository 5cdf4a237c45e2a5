use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::digest::DigestRecord;
use super::digest::ALGORITHM;
use super::errors::PasswordError;

const SALT_LENGTH: usize = 16;
const KEY_LENGTH: usize = 32;

/// Password hashing implementation.
///
/// Derives keys with PBKDF2-HMAC-SHA256. The configured iteration count only
/// applies to new digests; verification always uses the count stored in the
/// record being checked.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    iterations: u32,
}

impl PasswordHasher {
    pub const DEFAULT_ITERATIONS: u32 = 100_000;

    /// Create a new password hasher with the default iteration count.
    pub fn new() -> Self {
        Self {
            iterations: Self::DEFAULT_ITERATIONS,
        }
    }

    /// Create a password hasher producing digests with `iterations` rounds.
    pub fn with_iterations(iterations: u32) -> Self {
        Self { iterations }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// Digest record holding algorithm tag, iteration count, salt and hash
    ///
    /// # Errors
    /// * `InvalidIterations` - Hasher was configured with zero iterations
    /// * `HashingFailed` - Random salt could not be generated
    pub fn hash(&self, password: &str) -> Result<DigestRecord, PasswordError> {
        let mut salt = [0u8; SALT_LENGTH];
        OsRng
            .try_fill_bytes(&mut salt)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?;

        self.hash_with_salt(password, &salt)
    }

    /// Hash a plaintext password with a caller-supplied salt.
    pub fn hash_with_salt(
        &self,
        password: &str,
        salt: &[u8],
    ) -> Result<DigestRecord, PasswordError> {
        if self.iterations == 0 {
            return Err(PasswordError::InvalidIterations);
        }

        let key = derive_key(password, salt, self.iterations);

        Ok(DigestRecord {
            algorithm: ALGORITHM.to_string(),
            iterations: self.iterations,
            salt: STANDARD.encode(salt),
            hash: STANDARD.encode(key),
        })
    }

    /// Verify a password against a stored digest.
    ///
    /// Returns false for an unknown algorithm tag, missing fields or malformed
    /// base64; the derived key is compared in constant time.
    pub fn verify(&self, password: &str, record: &DigestRecord) -> bool {
        if !record.is_complete() {
            tracing::debug!(algorithm = %record.algorithm, "Digest record is not verifiable");
            return false;
        }

        let decoded = (STANDARD.decode(&record.salt), STANDARD.decode(&record.hash));
        let (salt, expected) = match decoded {
            (Ok(salt), Ok(expected)) => (salt, expected),
            _ => {
                tracing::debug!("Digest record has malformed salt or hash encoding");
                return false;
            }
        };

        let key = derive_key(password, &salt, record.iterations);
        key.as_slice().ct_eq(expected.as_slice()).into()
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

fn derive_key(password: &str, salt: &[u8], iterations: u32) -> [u8; KEY_LENGTH] {
    let mut key = [0u8; KEY_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut key);
    key
}
