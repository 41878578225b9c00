#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use jsonwebtoken::{EncodingKey, Header};
use serde_json::{json, Map, Value};
use tower::ServiceExt;

use pocketbase_gateway::auth::{SessionPayload, UserProfile};
use pocketbase_gateway::config::AppConfig;
use pocketbase_gateway::pocketbase::{
    AuthMethods, AuthProvider, AuthResponse, HealthStatus, ListQuery, OAuth2Code, OAuth2Methods, Record, RecordPage,
    RecordStore, StoreError, SUPERUSERS_COLLECTION, USERS_COLLECTION,
};
use pocketbase_gateway::{app, auth::TokenService, AppState};

pub const PRIVATE_KEY: &str = include_str!("../fixtures/keys/private.key");
pub const PUBLIC_KEY: &str = include_str!("../fixtures/keys/public.key");

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin-secret";
pub const CLIENT_EMAIL: &str = "ann@example.com";
pub const CLIENT_PASSWORD: &str = "hunter2";
pub const STORE_ADMIN_TOKEN: &str = "pb-bootstrap-token";
pub const API_HOSTNAME: &str = "https://api.example.com";
pub const OAUTH_VERIFIER: &str = "verifier123";
pub const STORE_FAILURE_MESSAGE: &str = "Something went wrong while processing your request.";

/// Token shaped like the record store's own: HS256 with an `exp` claim
pub fn external_token(subject: &str, exp_offset_secs: i64) -> String {
    let exp = chrono::Utc::now().timestamp() + exp_offset_secs;
    jsonwebtoken::encode(
        &Header::default(),
        &json!({ "id": subject, "type": "auth", "exp": exp }),
        &EncodingKey::from_secret(b"record-store-secret"),
    )
    .expect("external token")
}

struct Account {
    collection: &'static str,
    password: &'static str,
    token: String,
    record: Record,
}

/// Record store held in memory; understands `=` and `!=` filters joined by `&&`.
#[derive(Default)]
pub struct InMemoryStore {
    seq: AtomicU64,
    fail_next: AtomicBool,
    record_calls: AtomicU64,
    collections: Mutex<BTreeMap<String, Vec<Record>>>,
    accounts: Mutex<Vec<Account>>,
    auth_methods: Mutex<AuthMethods>,
    last_list: Mutex<Option<ListQuery>>,
    last_auth: Mutex<Option<String>>,
    last_oauth: Mutex<Option<(OAuth2Code, Option<String>)>>,
}

impl InMemoryStore {
    pub fn seeded() -> Self {
        let store = Self::default();
        store.add_account(
            SUPERUSERS_COLLECTION,
            "admin1",
            json!({ "email": ADMIN_EMAIL, "roles": "superadmin" }),
            ADMIN_PASSWORD,
        );
        store.add_account(
            USERS_COLLECTION,
            "user1",
            json!({ "email": CLIENT_EMAIL, "name": "Ann", "verified": true, "role": "owner" }),
            CLIENT_PASSWORD,
        );
        *store.auth_methods.lock().unwrap() = AuthMethods {
            oauth2: OAuth2Methods {
                enabled: true,
                providers: vec![AuthProvider {
                    name: "google".to_string(),
                    display_name: "Google".to_string(),
                    state: "pb-state".to_string(),
                    auth_url: "https://accounts.example.com/o/oauth2/auth?client_id=cid&response_type=code&state=pb-state&redirect_uri=".to_string(),
                    code_verifier: OAUTH_VERIFIER.to_string(),
                    code_challenge: "challenge".to_string(),
                    code_challenge_method: "S256".to_string(),
                }],
            },
        };
        store
    }

    fn add_account(&self, collection: &'static str, id: &str, fields: Value, password: &'static str) {
        let mut record: Record = serde_json::from_value(fields).expect("account record");
        record.id = id.to_string();
        record.collection_name = collection.to_string();
        self.accounts.lock().unwrap().push(Account {
            collection,
            password,
            token: external_token(id, 3600),
            record,
        });
    }

    pub fn account_token(&self, email: &str) -> Option<String> {
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.record.fields.get("email").and_then(Value::as_str) == Some(email))
            .map(|a| a.token.clone())
    }

    pub fn insert(&self, collection: &str, fields: Value) -> Record {
        let body = match fields {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        self.insert_map(collection, &body)
    }

    fn insert_map(&self, collection: &str, body: &Map<String, Value>) -> Record {
        let n = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        let stamp = format!("2024-01-01 00:00:00.{:03}Z", n);

        let mut map = body.clone();
        map.insert("id".to_string(), json!(format!("rec{:04}", n)));
        map.insert("collectionName".to_string(), json!(collection));
        map.insert("created".to_string(), json!(stamp));
        map.insert("updated".to_string(), json!(stamp));
        let record: Record = serde_json::from_value(Value::Object(map)).expect("record");

        self.collections
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .push(record.clone());
        record
    }

    pub fn find(&self, collection: &str, id: &str) -> Option<Record> {
        self.collections
            .lock()
            .unwrap()
            .get(collection)
            .and_then(|records| records.iter().find(|r| r.id == id).cloned())
    }

    pub fn last_list(&self) -> Option<ListQuery> {
        self.last_list.lock().unwrap().clone()
    }

    pub fn last_auth(&self) -> Option<String> {
        self.last_auth.lock().unwrap().clone()
    }

    pub fn last_oauth(&self) -> Option<(OAuth2Code, Option<String>)> {
        self.last_oauth.lock().unwrap().clone()
    }

    /// Make the next record operation fail the way PocketBase reports a bad request
    pub fn fail_next_record_call(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    /// list/get/create/update/delete calls received so far
    pub fn record_calls(&self) -> u64 {
        self.record_calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) -> Result<(), StoreError> {
        self.record_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Api {
                status: 400,
                message: STORE_FAILURE_MESSAGE.to_string(),
            });
        }
        Ok(())
    }

    fn remember_auth(&self, auth: Option<&str>) {
        *self.last_auth.lock().unwrap() = auth.map(String::from);
    }

    fn auth_response(account: &Account) -> AuthResponse {
        AuthResponse {
            token: account.token.clone(),
            record: account.record.clone(),
        }
    }
}

/// `(a='x' && b!='y')` → [(field, negated, value)]
fn parse_filter(filter: &str) -> Vec<(String, bool, String)> {
    let inner = filter.trim().trim_start_matches('(').trim_end_matches(')');
    if inner.is_empty() {
        return Vec::new();
    }

    inner
        .split(" && ")
        .filter_map(|clause| {
            let (field, negated, rest) = match clause.split_once("!=") {
                Some((field, rest)) => (field, true, rest),
                None => {
                    let (field, rest) = clause.split_once('=')?;
                    (field, false, rest)
                }
            };
            let value = rest.trim().strip_prefix('\'')?.strip_suffix('\'')?;
            Some((field.trim().to_string(), negated, value.replace("\\'", "'")))
        })
        .collect()
}

fn field_as_string(map: &Map<String, Value>, field: &str) -> String {
    match map.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

#[async_trait]
impl RecordStore for InMemoryStore {
    async fn list(&self, collection: &str, query: &ListQuery, auth: Option<&str>) -> Result<RecordPage, StoreError> {
        self.record_call()?;
        self.remember_auth(auth);
        *self.last_list.lock().unwrap() = Some(query.clone());

        let clauses = parse_filter(&query.filter);
        let mut matched: Vec<Record> = self
            .collections
            .lock()
            .unwrap()
            .get(collection)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .filter(|record| {
                let map = record.to_map();
                clauses
                    .iter()
                    .all(|(field, negated, value)| (field_as_string(&map, field) == *value) != *negated)
            })
            .collect();

        if let Some(field) = query.sort.strip_prefix('-') {
            matched.sort_by(|a, b| field_as_string(&b.to_map(), field).cmp(&field_as_string(&a.to_map(), field)));
        } else if !query.sort.is_empty() {
            matched.sort_by(|a, b| field_as_string(&a.to_map(), &query.sort).cmp(&field_as_string(&b.to_map(), &query.sort)));
        }

        let per_page = query.per_page.max(1) as usize;
        let total = matched.len();
        let items = matched
            .into_iter()
            .skip((query.page.max(1) as usize - 1) * per_page)
            .take(per_page)
            .collect();

        Ok(RecordPage {
            page: query.page,
            per_page: query.per_page,
            total_items: total as i64,
            total_pages: total.div_ceil(per_page) as i64,
            items,
        })
    }

    async fn get_one(&self, collection: &str, id: &str, auth: Option<&str>) -> Result<Record, StoreError> {
        self.record_call()?;
        self.remember_auth(auth);
        self.find(collection, id).ok_or(StoreError::NotFound)
    }

    async fn create(&self, collection: &str, body: &Map<String, Value>, auth: Option<&str>) -> Result<Record, StoreError> {
        self.record_call()?;
        self.remember_auth(auth);
        Ok(self.insert_map(collection, body))
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        body: &Map<String, Value>,
        auth: Option<&str>,
    ) -> Result<Record, StoreError> {
        self.record_call()?;
        self.remember_auth(auth);
        let mut collections = self.collections.lock().unwrap();
        let record = collections
            .get_mut(collection)
            .and_then(|records| records.iter_mut().find(|r| r.id == id))
            .ok_or(StoreError::NotFound)?;

        let mut map = record.to_map();
        for (key, value) in body {
            map.insert(key.clone(), value.clone());
        }
        map.insert("updated".to_string(), json!("2024-06-01 00:00:00.000Z"));
        *record = serde_json::from_value(Value::Object(map)).map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(record.clone())
    }

    async fn delete(&self, collection: &str, id: &str, auth: Option<&str>) -> Result<(), StoreError> {
        self.record_call()?;
        self.remember_auth(auth);
        let mut collections = self.collections.lock().unwrap();
        let records = collections.get_mut(collection).ok_or(StoreError::NotFound)?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn auth_with_password(&self, collection: &str, identity: &str, password: &str) -> Result<AuthResponse, StoreError> {
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| {
                a.collection == collection
                    && a.password == password
                    && a.record.fields.get("email").and_then(Value::as_str) == Some(identity)
            })
            .map(Self::auth_response)
            .ok_or_else(|| StoreError::Api {
                status: 400,
                message: "Failed to authenticate.".to_string(),
            })
    }

    async fn auth_refresh(&self, collection: &str, token: &str) -> Result<AuthResponse, StoreError> {
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.collection == collection && a.token == token)
            .map(Self::auth_response)
            .ok_or_else(|| StoreError::Api {
                status: 401,
                message: "The request requires valid record authorization token.".to_string(),
            })
    }

    async fn list_auth_methods(&self, _collection: &str) -> Result<AuthMethods, StoreError> {
        Ok(self.auth_methods.lock().unwrap().clone())
    }

    async fn auth_with_oauth2_code(
        &self,
        collection: &str,
        code: &OAuth2Code,
        auth: Option<&str>,
    ) -> Result<AuthResponse, StoreError> {
        *self.last_oauth.lock().unwrap() = Some((code.clone(), auth.map(String::from)));

        if code.code != "good-code" {
            return Err(StoreError::Api {
                status: 400,
                message: "Failed to authenticate.".to_string(),
            });
        }

        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.collection == collection)
            .map(Self::auth_response)
            .ok_or(StoreError::NotFound)
    }

    async fn health(&self) -> Result<HealthStatus, StoreError> {
        Ok(HealthStatus {
            code: 200,
            message: "API is healthy.".to_string(),
        })
    }
}

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::development();
    config.server.api_hostname = API_HOSTNAME.to_string();
    config.pocketbase.admin_token = STORE_ADMIN_TOKEN.to_string();
    config.security.private_key = Some(PRIVATE_KEY.to_string());
    config.security.public_key = Some(PUBLIC_KEY.to_string());
    config
}

pub struct TestApp {
    pub state: AppState,
    pub store: Arc<InMemoryStore>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: AppConfig) -> Self {
        let store = Arc::new(InMemoryStore::seeded());
        let tokens = TokenService::from_config(&config.security).expect("fixture keys");
        let state = AppState::new(config, tokens, store.clone());
        Self { state, store }
    }

    pub fn router(&self) -> Router {
        app(self.state.clone())
    }

    /// Session token minted directly, bypassing login
    pub fn session_token(&self, admin: bool, ext_token: String) -> String {
        let payload = SessionPayload {
            profile: UserProfile {
                id: if admin { "admin1" } else { "user1" }.to_string(),
                email: if admin { ADMIN_EMAIL } else { CLIENT_EMAIL }.to_string(),
                is_admin_user: admin,
                ..Default::default()
            },
            ext_token,
        };
        self.state.tokens.issue(&payload, 3600).expect("session token")
    }

    pub fn admin_token(&self) -> String {
        self.session_token(true, external_token("admin1", 3600))
    }

    pub fn client_token(&self) -> String {
        self.session_token(false, external_token("user1", 3600))
    }

    pub async fn send(&self, request: Request<Body>) -> Result<Response> {
        Ok(self.router().oneshot(request).await?)
    }

    /// Send and decode the envelope; empty bodies decode to `null`.
    pub async fn call(&self, request: Request<Body>) -> Result<(StatusCode, Value)> {
        let response = self.send(request).await?;
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).with_context(|| format!("non-json body: {:?}", bytes))?
        };
        Ok((status, body))
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.call(request(Method::GET, uri, token, None)).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.call(request(Method::POST, uri, token, Some(body))).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.call(request(Method::PUT, uri, token, Some(body))).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> Result<(StatusCode, Value)> {
        self.call(request(Method::DELETE, uri, token, None)).await
    }
}

pub fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).expect("request")
}

/// Assert a failed envelope and return its exception
pub fn expect_failure(body: &Value, status: u16) -> (String, String) {
    assert_eq!(body["status"], status, "unexpected envelope: {}", body);
    assert_eq!(body["successful"], false, "unexpected envelope: {}", body);
    assert!(body["data"].is_null(), "failed envelope carries data: {}", body);
    (
        body["exception"]["errorCode"].as_str().unwrap_or_default().to_string(),
        body["exception"]["errorMessage"].as_str().unwrap_or_default().to_string(),
    )
}
