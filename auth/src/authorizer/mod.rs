pub mod decision;
pub mod engine;
pub mod request;

pub use decision::AuthorizationDecision;
pub use decision::DenyReason;
pub use decision::Effect;
pub use decision::PolicyResponse;
pub use engine::Authorizer;
pub use request::AuthorizerRequest;
pub use request::TokenSource;
