pub mod claims;
pub mod current_user;
pub mod keys;
pub mod token;

pub use claims::{SessionClaims, SessionPayload, UserProfile};
pub use current_user::CurrentUser;
pub use keys::{KeyError, KeyMaterial};
pub use token::{TokenError, TokenService};
