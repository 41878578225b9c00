// handlers/protected/generic/mod.rs - CRUD route group for one resource
//
// Mounted once per audience: /api/admin/generic and /api/client/generic
pub mod record;
pub mod search;

use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::services::{CrudService, Resource};

pub use record::{DeleteQuery, IdQuery};
pub use search::SearchRequest;

/// `POST /search`, `GET /getById`, `POST /create`, `PUT /update`, `DELETE /delete`
pub fn crud_router<R, S>(service: Arc<CrudService<R>>) -> Router<S>
where
    R: Resource,
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/search", post(search::search::<R>))
        .route("/getById", get(record::get_by_id::<R>))
        .route("/create", post(record::create::<R>))
        .route("/update", put(record::update::<R>))
        .route("/delete", delete(record::delete::<R>))
        .with_state(service)
}
