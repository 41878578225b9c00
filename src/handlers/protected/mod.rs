// handlers/protected/mod.rs - endpoints behind the auth gate
pub mod generic;

pub use generic::crud_router;
