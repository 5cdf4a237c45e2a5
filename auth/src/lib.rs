//! Authentication and authorization library
//!
//! Provides the credential layer shared by the account service and the
//! request authorizer:
//! - Unpadded base64url codec
//! - Password hashing (PBKDF2-HMAC-SHA256, per-record salt and work factor)
//! - HS256 JWT issuing and verification
//! - Allow/Deny authorization decisions for inbound requests
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::with_iterations(1_000);
//! let digest = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &digest));
//! ```
//!
//! ## JWT Tokens
//! ```
//! use auth::{Claims, JwtHandler};
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!", 3600);
//! let token = handler.issue(&Claims::for_identity("alice@example.com")).unwrap();
//! let claims = handler.verify(&token).unwrap();
//! assert_eq!(claims.identity(), Some("alice@example.com"));
//! ```
//!
//! ## Authorizing a Request
//! ```
//! use std::collections::HashMap;
//!
//! use auth::{Authorizer, Claims, JwtHandler, TokenSource};
//!
//! let secret = b"secret_key_at_least_32_bytes_long!";
//! let token = JwtHandler::new(secret, 3600)
//!     .issue(&Claims::for_identity("alice@example.com"))
//!     .unwrap();
//!
//! let headers = HashMap::from([("authorization".to_string(), format!("Bearer {token}"))]);
//! let decision = Authorizer::new(secret)
//!     .authorize_source(Some(&TokenSource::HeaderMap(headers)), "*");
//! assert!(decision.is_allowed());
//! assert_eq!(decision.principal, "alice@example.com");
//! ```

pub mod authenticator;
pub mod authorizer;
pub mod codec;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use authorizer::AuthorizationDecision;
pub use authorizer::Authorizer;
pub use authorizer::AuthorizerRequest;
pub use authorizer::DenyReason;
pub use authorizer::Effect;
pub use authorizer::PolicyResponse;
pub use authorizer::TokenSource;
pub use codec::CodecError;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::DigestRecord;
pub use password::PasswordError;
pub use password::PasswordHasher;
