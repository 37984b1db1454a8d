mod authenticator;

pub use authenticator::{hash_password, verify_password, Authenticator};
