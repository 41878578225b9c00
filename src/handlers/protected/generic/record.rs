// handlers/protected/generic/record.rs - single record handlers
//
// GET /getById?id=   POST /create   PUT /update?id=   DELETE /delete?id=&hard=

use std::sync::Arc;

use axum::extract::State;
use serde::Deserialize;

use crate::api::{ApiResult, Envelope};
use crate::auth::CurrentUser;
use crate::handlers::extract::{JsonBody, QueryParams};
use crate::services::{CrudService, DeleteMode, Resource};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct IdQuery {
    pub id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeleteQuery {
    pub id: String,
    /// `true` or `1` physically removes the record
    pub hard: Option<String>,
}

impl DeleteQuery {
    pub fn mode(&self) -> DeleteMode {
        match self.hard.as_deref().map(str::trim) {
            Some(flag) if flag.eq_ignore_ascii_case("true") || flag == "1" => DeleteMode::Hard,
            _ => DeleteMode::Soft,
        }
    }
}

/// GET /getById?id= - fetch one record
pub async fn get_by_id<R: Resource>(
    State(service): State<Arc<CrudService<R>>>,
    user: CurrentUser,
    QueryParams(query): QueryParams<IdQuery>,
) -> ApiResult<R::Item> {
    let item = service.get_by_id(&user, &query.id).await?;
    Ok(Envelope::ok(item))
}

/**
 * POST /create - insert a record
 *
 * Input: the resource's create shape as JSON; `isDeleted` is forced to false.
 */
pub async fn create<R: Resource>(
    State(service): State<Arc<CrudService<R>>>,
    user: CurrentUser,
    JsonBody(request): JsonBody<R::Create>,
) -> ApiResult<R::Item> {
    let item = service.create(&user, request).await?;
    Ok(Envelope::ok(item))
}

/// PUT /update?id= - merge the body onto the stored record
pub async fn update<R: Resource>(
    State(service): State<Arc<CrudService<R>>>,
    user: CurrentUser,
    QueryParams(query): QueryParams<IdQuery>,
    JsonBody(request): JsonBody<R::Update>,
) -> ApiResult<R::Item> {
    let item = service.update(&user, &query.id, request).await?;
    Ok(Envelope::ok(item))
}

/// DELETE /delete?id=&hard= - soft delete unless `hard` is set
pub async fn delete<R: Resource>(
    State(service): State<Arc<CrudService<R>>>,
    user: CurrentUser,
    QueryParams(query): QueryParams<DeleteQuery>,
) -> ApiResult<R::Item> {
    let item = service.delete(&user, &query.id, query.mode()).await?;
    Ok(Envelope::ok(item))
}
