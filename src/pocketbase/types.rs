use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::filter::{DEFAULT_PAGE, DEFAULT_PAGE_SIZE};

/// Collection holding admin accounts
pub const SUPERUSERS_COLLECTION: &str = "_superusers";
/// Collection holding client accounts
pub const USERS_COLLECTION: &str = "users";

/// Keys the record store owns; never copied from client input
pub const SYSTEM_FIELDS: [&str; 5] = ["id", "created", "updated", "collectionId", "collectionName"];

/// A record as returned by the store: system fields plus arbitrary columns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub collection_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub collection_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub updated: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_deleted: Option<bool>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    pub fn is_deleted(&self) -> bool {
        self.is_deleted.unwrap_or(false)
    }

    /// Flatten into one JSON object, system fields included
    pub fn to_map(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

/// One page from the list endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordPage {
    pub page: u32,
    pub per_page: u32,
    // -1 when the total was skipped
    pub total_items: i64,
    pub total_pages: i64,
    pub items: Vec<Record>,
}

/// Query options for the list endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub per_page: u32,
    pub sort: String,
    pub filter: String,
    pub expand: String,
    pub fields: String,
    pub skip_total: bool,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PAGE_SIZE,
            sort: String::new(),
            filter: String::new(),
            expand: String::new(),
            fields: String::new(),
            skip_total: false,
        }
    }
}

impl ListQuery {
    /// Query-string pairs; empty options are left out
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("perPage", self.per_page.to_string()),
        ];
        for (key, value) in [
            ("sort", &self.sort),
            ("filter", &self.filter),
            ("expand", &self.expand),
            ("fields", &self.fields),
        ] {
            if !value.is_empty() {
                pairs.push((key, value.clone()));
            }
        }
        if self.skip_total {
            pairs.push(("skipTotal", "true".to_string()));
        }
        pairs
    }
}

/// Result of any auth endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub record: Record,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthMethods {
    #[serde(default)]
    pub oauth2: OAuth2Methods,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OAuth2Methods {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub providers: Vec<AuthProvider>,
}

impl AuthMethods {
    /// An enabled OAuth2 provider by name
    pub fn provider(&self, name: &str) -> Option<&AuthProvider> {
        if !self.oauth2.enabled {
            return None;
        }
        self.oauth2.providers.iter().find(|p| p.name == name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AuthProvider {
    pub name: String,
    pub display_name: String,
    pub state: String,
    #[serde(rename = "authURL")]
    pub auth_url: String,
    pub code_verifier: String,
    pub code_challenge: String,
    pub code_challenge_method: String,
}

/// Body of the OAuth2 code exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuth2Code {
    pub provider: String,
    pub code: String,
    pub code_verifier: String,
    #[serde(rename = "redirectURL")]
    pub redirect_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub code: u16,
    #[serde(default)]
    pub message: String,
}
