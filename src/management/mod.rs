mod auth;

pub use auth::CredentialRefresher;
pub use auth::EXPIRY_SKEW_SECS;
