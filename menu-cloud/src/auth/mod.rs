//! Authentication: password hashing, token issuing, request identity

pub mod identity;
pub mod password;
pub mod token;

pub use identity::{AuthUser, Principal, resolve_identity};
pub use token::{Claims, TokenIssuer};
