pub mod client;
pub mod error;
pub mod store;
pub mod types;

pub use client::PocketBaseClient;
pub use error::StoreError;
pub use store::RecordStore;
pub use types::*;
