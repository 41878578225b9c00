// handlers/mod.rs - HTTP handlers
//
// Public (no session) → Protected (session required, see middleware::auth)
pub mod extract;
pub mod protected;
pub mod public;
