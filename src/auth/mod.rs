//! Bearer token verification. Accounts and token issuance live in the
//! identity service; this crate only checks the tokens it hands out.

pub(crate) mod claims;
pub mod jwt;

pub use jwt::AuthUser;
