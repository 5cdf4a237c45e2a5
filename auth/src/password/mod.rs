pub mod digest;
pub mod errors;
pub mod pbkdf2;

pub use digest::DigestRecord;
pub use errors::PasswordError;
pub use pbkdf2::PasswordHasher;
