pub mod controllers;
pub mod models;
pub mod services;

pub use models::AuthenticatedUser;
pub use services::{hash_password, verify_password, Authenticator};
