use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::AUTHORIZATION, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Map, Value};
use url::Url;

use super::error::StoreError;
use super::store::RecordStore;
use super::types::{AuthMethods, AuthResponse, HealthStatus, ListQuery, OAuth2Code, Record, RecordPage};
use crate::config::PocketBaseConfig;

/// REST client for a PocketBase server
#[derive(Debug, Clone)]
pub struct PocketBaseClient {
    http: reqwest::Client,
    base_url: Url,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl PocketBaseClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, StoreError> {
        let base_url = Url::parse(base_url).map_err(|e| StoreError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::InvalidUrl(base_url.to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .gzip(true)
            .build()?;

        Ok(Self { http, base_url })
    }

    pub fn from_config(config: &PocketBaseConfig) -> Result<Self, StoreError> {
        Self::new(&config.url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn records_url(&self, collection: &str, id: Option<&str>) -> Result<Url, StoreError> {
        match id {
            Some(id) => self.endpoint(&["api", "collections", collection, "records", id]),
            None => self.endpoint(&["api", "collections", collection, "records"]),
        }
    }

    fn collection_url(&self, collection: &str, action: &str) -> Result<Url, StoreError> {
        self.endpoint(&["api", "collections", collection, action])
    }

    /// Send with an optional raw token, mapping non-2xx bodies to errors.
    async fn execute(&self, request: RequestBuilder, auth: Option<&str>) -> Result<Response, StoreError> {
        let request = match auth {
            Some(token) if !token.is_empty() => request.header(AUTHORIZATION, token),
            _ => request,
        };

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .map(|body| body.message)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Request failed").to_string());

        tracing::debug!(status = status.as_u16(), message = %message, "record store rejected request");

        Err(StoreError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder, auth: Option<&str>) -> Result<T, StoreError> {
        let response = self.execute(request, auth).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RecordStore for PocketBaseClient {
    async fn list(&self, collection: &str, query: &ListQuery, auth: Option<&str>) -> Result<RecordPage, StoreError> {
        let url = self.records_url(collection, None)?;
        self.fetch(self.http.get(url).query(&query.to_pairs()), auth).await
    }

    async fn get_one(&self, collection: &str, id: &str, auth: Option<&str>) -> Result<Record, StoreError> {
        let url = self.records_url(collection, Some(id))?;
        self.fetch(self.http.get(url), auth).await
    }

    async fn create(&self, collection: &str, body: &Map<String, Value>, auth: Option<&str>) -> Result<Record, StoreError> {
        let url = self.records_url(collection, None)?;
        self.fetch(self.http.post(url).json(body), auth).await
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        body: &Map<String, Value>,
        auth: Option<&str>,
    ) -> Result<Record, StoreError> {
        let url = self.records_url(collection, Some(id))?;
        self.fetch(self.http.patch(url).json(body), auth).await
    }

    async fn delete(&self, collection: &str, id: &str, auth: Option<&str>) -> Result<(), StoreError> {
        let url = self.records_url(collection, Some(id))?;
        self.execute(self.http.delete(url), auth).await?;
        Ok(())
    }

    async fn auth_with_password(&self, collection: &str, identity: &str, password: &str) -> Result<AuthResponse, StoreError> {
        let url = self.collection_url(collection, "auth-with-password")?;
        let body = json!({ "identity": identity, "password": password });
        self.fetch(self.http.post(url).json(&body), None).await
    }

    async fn auth_refresh(&self, collection: &str, token: &str) -> Result<AuthResponse, StoreError> {
        let url = self.collection_url(collection, "auth-refresh")?;
        self.fetch(self.http.post(url), Some(token)).await
    }

    async fn list_auth_methods(&self, collection: &str) -> Result<AuthMethods, StoreError> {
        let url = self.collection_url(collection, "auth-methods")?;
        self.fetch(self.http.get(url), None).await
    }

    async fn auth_with_oauth2_code(
        &self,
        collection: &str,
        code: &OAuth2Code,
        auth: Option<&str>,
    ) -> Result<AuthResponse, StoreError> {
        let url = self.collection_url(collection, "auth-with-oauth2")?;
        self.fetch(self.http.post(url).json(code), auth).await
    }

    async fn health(&self) -> Result<HealthStatus, StoreError> {
        let url = self.endpoint(&["api", "health"])?;
        self.fetch(self.http.get(url), None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> PocketBaseClient {
        PocketBaseClient::new(base, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn record_urls() {
        let pb = client("http://127.0.0.1:8090");
        assert_eq!(
            pb.records_url("generic", None).unwrap().as_str(),
            "http://127.0.0.1:8090/api/collections/generic/records"
        );
        assert_eq!(
            pb.records_url("generic", Some("abc123")).unwrap().as_str(),
            "http://127.0.0.1:8090/api/collections/generic/records/abc123"
        );
    }

    #[test]
    fn base_path_is_preserved() {
        let pb = client("https://example.com/pb/");
        assert_eq!(
            pb.collection_url("users", "auth-refresh").unwrap().as_str(),
            "https://example.com/pb/api/collections/users/auth-refresh"
        );
    }

    #[test]
    fn path_segments_are_encoded() {
        let pb = client("http://localhost:8090");
        let url = pb.records_url("generic", Some("a/b c")).unwrap();
        assert_eq!(url.path(), "/api/collections/generic/records/a%2Fb%20c");
    }

    #[test]
    fn rejects_non_base_urls() {
        assert!(matches!(
            PocketBaseClient::new("mailto:admin@example.com", Duration::from_secs(1)),
            Err(StoreError::InvalidUrl(_))
        ));
        assert!(PocketBaseClient::new("not a url", Duration::from_secs(1)).is_err());
    }
}
