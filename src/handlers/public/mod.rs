// handlers/public/mod.rs - endpoints reachable without a session
pub mod auth;
pub mod health;

pub use health::{health, root};
