use async_trait::async_trait;
use serde_json::{Map, Value};

use super::error::StoreError;
use super::types::{AuthMethods, AuthResponse, HealthStatus, ListQuery, OAuth2Code, Record, RecordPage};

/// The record-store operations the gateway consumes.
///
/// Every call takes its own auth token, so one store can serve concurrent
/// requests for different users.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn list(&self, collection: &str, query: &ListQuery, auth: Option<&str>) -> Result<RecordPage, StoreError>;

    async fn get_one(&self, collection: &str, id: &str, auth: Option<&str>) -> Result<Record, StoreError>;

    async fn create(&self, collection: &str, body: &Map<String, Value>, auth: Option<&str>) -> Result<Record, StoreError>;

    async fn update(
        &self,
        collection: &str,
        id: &str,
        body: &Map<String, Value>,
        auth: Option<&str>,
    ) -> Result<Record, StoreError>;

    async fn delete(&self, collection: &str, id: &str, auth: Option<&str>) -> Result<(), StoreError>;

    async fn auth_with_password(&self, collection: &str, identity: &str, password: &str) -> Result<AuthResponse, StoreError>;

    /// Exchange a still-valid store token for a fresh one
    async fn auth_refresh(&self, collection: &str, token: &str) -> Result<AuthResponse, StoreError>;

    async fn list_auth_methods(&self, collection: &str) -> Result<AuthMethods, StoreError>;

    async fn auth_with_oauth2_code(
        &self,
        collection: &str,
        code: &OAuth2Code,
        auth: Option<&str>,
    ) -> Result<AuthResponse, StoreError>;

    async fn health(&self) -> Result<HealthStatus, StoreError>;
}
