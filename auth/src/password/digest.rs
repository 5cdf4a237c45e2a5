use serde::Deserialize;
use serde::Serialize;

/// Algorithm tag written into every digest record.
pub const ALGORITHM: &str = "pbkdf2_sha256";

/// Stored password digest.
///
/// Salt and iteration count travel with the record so the work factor can be
/// raised for new records without invalidating old ones. Missing fields
/// deserialize as empty values, which makes the record unverifiable rather than
/// unreadable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DigestRecord {
    pub algorithm: String,
    pub iterations: u32,
    /// Standard base64
    pub salt: String,
    /// Standard base64
    pub hash: String,
}

impl DigestRecord {
    /// Whether every field needed for verification is present.
    pub fn is_complete(&self) -> bool {
        self.algorithm == ALGORITHM
            && self.iterations > 0
            && !self.salt.is_empty()
            && !self.hash.is_empty()
    }
}
