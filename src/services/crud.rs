use std::sync::Arc;

use serde_json::Value;
use tracing::{error, warn};

use super::audit::AuditLog;
use super::resource::{merge_existing, strip_system_fields, Resource, Validate};
use crate::api::SearchResult;
use crate::auth::CurrentUser;
use crate::error::ApiError;
use crate::filter::{Filter, SearchQuery};
use crate::pocketbase::{ListQuery, Record, RecordStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeleteMode {
    #[default]
    Soft,
    Hard,
}

/// search / getById / create / update / delete for one resource
pub struct CrudService<R: Resource> {
    resource: R,
    store: Arc<dyn RecordStore>,
    audit: AuditLog,
}

impl<R: Resource> CrudService<R> {
    pub fn new(resource: R, store: Arc<dyn RecordStore>) -> Self {
        Self {
            resource,
            store,
            audit: AuditLog::new(),
        }
    }

    pub fn resource(&self) -> &R {
        &self.resource
    }

    pub async fn search(&self, user: &CurrentUser, query: &SearchQuery) -> Result<SearchResult<R::Item>, ApiError> {
        self.run_search(user, query)
            .await
            .map_err(|e| self.failed("search", e))
    }

    pub async fn get_by_id(&self, user: &CurrentUser, id: &str) -> Result<R::Item, ApiError> {
        self.run_get_by_id(user, id)
            .await
            .map_err(|e| self.failed("getById", e))
    }

    pub async fn create(&self, user: &CurrentUser, request: R::Create) -> Result<R::Item, ApiError> {
        self.run_create(user, request)
            .await
            .map_err(|e| self.failed("create", e))
    }

    pub async fn update(&self, user: &CurrentUser, id: &str, request: R::Update) -> Result<R::Item, ApiError> {
        self.run_update(user, id, request)
            .await
            .map_err(|e| self.failed("update", e))
    }

    pub async fn delete(&self, user: &CurrentUser, id: &str, mode: DeleteMode) -> Result<R::Item, ApiError> {
        self.run_delete(user, id, mode)
            .await
            .map_err(|e| self.failed("delete", e))
    }

    async fn run_search(&self, user: &CurrentUser, query: &SearchQuery) -> Result<SearchResult<R::Item>, ApiError> {
        let filter = Filter::translate(query)?;
        let list_query = ListQuery {
            page: query.page,
            per_page: query.size,
            sort: filter.sort,
            filter: filter.filter,
            ..Default::default()
        };

        let page = self
            .store
            .list(self.resource.collection(), &list_query, Some(&user.ext_token))
            .await?;

        let elements = page
            .items
            .into_iter()
            .map(|record| self.resource.map_record(record))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SearchResult::new(
            query.page,
            query.size,
            u64::try_from(page.total_items).unwrap_or(0),
            u32::try_from(page.total_pages).unwrap_or(0),
            elements,
        ))
    }

    async fn run_get_by_id(&self, user: &CurrentUser, id: &str) -> Result<R::Item, ApiError> {
        let id = require_id(id)?;
        let record = self.fetch(user, id).await?;
        Ok(self.resource.map_record(record)?)
    }

    async fn run_create(&self, user: &CurrentUser, request: R::Create) -> Result<R::Item, ApiError> {
        request.validate()?;

        let mut body = self.resource.map_create(&request)?;
        if self.resource.soft_delete() {
            body.insert("isDeleted".to_string(), Value::Bool(false));
        }

        let record = self
            .store
            .create(self.resource.collection(), &body, Some(&user.ext_token))
            .await?;
        Ok(self.resource.map_record(record)?)
    }

    /// Read-modify-write; concurrent writers to one id are not serialized.
    async fn run_update(&self, user: &CurrentUser, id: &str, request: R::Update) -> Result<R::Item, ApiError> {
        let id = require_id(id)?;
        request.validate()?;

        let current = self.fetch(user, id).await?;
        let before = current.to_map();

        let mut body = before.clone();
        merge_existing(&mut body, &self.resource.map_update(&request)?);
        strip_system_fields(&mut body);
        if self.resource.soft_delete() {
            body.insert("isDeleted".to_string(), Value::Bool(false));
        }

        let updated = self
            .store
            .update(self.resource.collection(), id, &body, Some(&user.ext_token))
            .await?;

        self.audit
            .log_update(self.resource.collection(), user.id(), &before, &updated);

        Ok(self.resource.map_record(updated)?)
    }

    /// Returns the record as it was fetched, with `isDeleted` set to the outcome.
    async fn run_delete(&self, user: &CurrentUser, id: &str, mode: DeleteMode) -> Result<R::Item, ApiError> {
        let id = require_id(id)?;
        let mut record = self.fetch(user, id).await?;
        let collection = self.resource.collection();

        match mode {
            DeleteMode::Soft if self.resource.soft_delete() => {
                record.is_deleted = Some(true);
                let mut body = record.to_map();
                strip_system_fields(&mut body);
                self.store
                    .update(collection, id, &body, Some(&user.ext_token))
                    .await?;
            }
            _ => {
                self.store.delete(collection, id, Some(&user.ext_token)).await?;
                record.is_deleted = Some(true);
            }
        }

        self.audit.log_delete(collection, user.id(), &record);

        Ok(self.resource.map_record(record)?)
    }

    async fn fetch(&self, user: &CurrentUser, id: &str) -> Result<Record, ApiError> {
        Ok(self
            .store
            .get_one(self.resource.collection(), id, Some(&user.ext_token))
            .await?)
    }

    fn failed(&self, operation: &'static str, err: ApiError) -> ApiError {
        match &err {
            ApiError::Validation { .. } | ApiError::BadRequest(_) | ApiError::NotFound => {
                warn!(service = self.resource.name(), operation, error = %err, "request rejected");
            }
            _ => {
                error!(service = self.resource.name(), operation, error = %err, "operation failed");
            }
        }
        err
    }
}

fn require_id(id: &str) -> Result<&str, ApiError> {
    let id = id.trim();
    if id.is_empty() {
        Err(ApiError::required("Id"))
    } else {
        Ok(id)
    }
}
