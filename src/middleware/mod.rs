pub mod auth;
pub mod strict_status;

pub use auth::{auth_gate, is_public_path, PUBLIC_PATHS};
pub use strict_status::strict_status;
