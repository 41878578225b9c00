pub mod audience;
pub mod audit;
pub mod auth;
pub mod crud;
pub mod generic;
pub mod resource;

pub use audience::Audience;
pub use audit::{AuditEntry, AuditKind, AuditLog};
pub use auth::{AuthService, LoginInfo, SocialState};
pub use crud::{CrudService, DeleteMode};
pub use generic::{GenericItem, GenericPayload, GenericResource};
pub use resource::{MappingError, Resource, Validate};
