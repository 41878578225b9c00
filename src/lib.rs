pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod pocketbase;
pub mod services;

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::TokenService;
use crate::config::AppConfig;
use crate::pocketbase::RecordStore;
use crate::services::{AuthService, CrudService, GenericResource};

/// Everything a request needs, built once at startup
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenService>,
    pub store: Arc<dyn RecordStore>,
    pub auth: Arc<AuthService>,
    pub admin_generic: Arc<CrudService<GenericResource>>,
    pub client_generic: Arc<CrudService<GenericResource>>,
}

impl AppState {
    pub fn new(config: AppConfig, tokens: TokenService, store: Arc<dyn RecordStore>) -> Self {
        let tokens = Arc::new(tokens);
        let auth = Arc::new(AuthService::new(store.clone(), tokens.clone(), &config));

        let collection = config.generic.collection.clone();
        let admin_generic = Arc::new(CrudService::new(GenericResource::admin(collection.clone()), store.clone()));
        let client_generic = Arc::new(CrudService::new(GenericResource::client(collection), store.clone()));

        Self {
            config: Arc::new(config),
            tokens,
            store,
            auth,
            admin_generic,
            client_generic,
        }
    }
}

pub fn app(state: AppState) -> Router {
    let strict_status = state.config.server.strict_http_status;
    let cors = cors_layer(&state.config.server.cors_origins);

    let router = Router::new()
        // Public
        .route("/", get(handlers::public::root))
        .route("/health", get(handlers::public::health))
        .merge(auth_routes())
        // Protected
        .nest("/api/admin/generic", handlers::protected::crud_router(state.admin_generic.clone()))
        .nest("/api/client/generic", handlers::protected::crud_router(state.client_generic.clone()))
        .layer(from_fn_with_state(state.clone(), middleware::auth_gate))
        .with_state(state);

    let router = if strict_status {
        router.layer(from_fn(middleware::strict_status))
    } else {
        router
    };

    router.layer(cors).layer(TraceLayer::new_for_http())
}

fn auth_routes() -> Router<AppState> {
    use handlers::public::auth;

    Router::new()
        .route("/api/admin/auth/login", post(auth::admin_login))
        .route("/api/admin/auth/refreshToken", post(auth::admin_refresh))
        .route("/api/client/auth/login", post(auth::client_login))
        .route("/api/client/auth/refreshToken", post(auth::client_refresh))
        .route("/api/client/auth/loginSocial", get(auth::login_social))
        .route("/api/client/auth/loginSocialSuccess", get(auth::login_social_success))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}
