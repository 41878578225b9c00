// handlers/public/auth/mod.rs - token acquisition endpoints
//
// /api/{admin,client}/auth/login          POST
// /api/{admin,client}/auth/refreshToken   POST
// /api/client/auth/loginSocial            GET  (redirects to the provider)
// /api/client/auth/loginSocialSuccess     GET  (provider callback)
pub mod login;
pub mod refresh;
pub mod social;

pub use login::{admin_login, client_login, LoginRequest};
pub use refresh::{admin_refresh, client_refresh, RefreshTokenRequest};
pub use social::{login_social, login_social_success};
