use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::audience::Audience;
use super::resource::{MappingError, Resource, Validate};
use crate::pocketbase::Record;

/// A record of the generic collection as clients see it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericItem {
    pub id: String,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub updated: String,
    // Admin views only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_deleted: Option<bool>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Free-form create/update body
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenericPayload(pub Map<String, Value>);

impl Validate for GenericPayload {}

#[derive(Debug, Clone)]
pub struct GenericResource {
    collection: String,
    audience: Audience,
}

impl GenericResource {
    pub fn new(collection: impl Into<String>, audience: Audience) -> Self {
        Self {
            collection: collection.into(),
            audience,
        }
    }

    pub fn admin(collection: impl Into<String>) -> Self {
        Self::new(collection, Audience::Admin)
    }

    pub fn client(collection: impl Into<String>) -> Self {
        Self::new(collection, Audience::Client)
    }

    pub fn audience(&self) -> Audience {
        self.audience
    }
}

impl Resource for GenericResource {
    type Item = GenericItem;
    type Create = GenericPayload;
    type Update = GenericPayload;

    fn name(&self) -> &'static str {
        match self.audience {
            Audience::Admin => "GenericAdminService",
            Audience::Client => "GenericClientService",
        }
    }

    fn collection(&self) -> &str {
        &self.collection
    }

    fn map_record(&self, record: Record) -> Result<GenericItem, MappingError> {
        let is_deleted = match self.audience {
            Audience::Admin => Some(record.is_deleted()),
            Audience::Client => None,
        };

        let mut fields = record.fields;
        fields.remove("isDeleted");

        Ok(GenericItem {
            id: record.id,
            created: record.created,
            updated: record.updated,
            is_deleted,
            fields,
        })
    }
}
