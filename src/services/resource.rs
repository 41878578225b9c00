use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::error::ApiError;
use crate::pocketbase::{Record, SYSTEM_FIELDS};

#[derive(Error, Debug)]
pub enum MappingError {
    #[error("failed to map {resource} record: {source}")]
    Record {
        resource: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to map {resource} request: {source}")]
    Request {
        resource: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{resource} request must be a JSON object")]
    NotAnObject { resource: &'static str },
}

/// Request bodies check themselves before anything reaches the store
pub trait Validate {
    fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }
}

/// Per-entity configuration for [`CrudService`](super::CrudService).
///
/// The defaults copy fields by name through serde; override a hook when an
/// entity needs a different shape.
pub trait Resource: Send + Sync + 'static {
    /// Client-facing representation of a record
    type Item: Serialize + DeserializeOwned + Send + Sync;
    type Create: Serialize + DeserializeOwned + Validate + Send + Sync;
    type Update: Serialize + DeserializeOwned + Validate + Send + Sync;

    /// Name used in logs
    fn name(&self) -> &'static str;

    fn collection(&self) -> &str;

    /// Whether delete flags records instead of removing them
    fn soft_delete(&self) -> bool {
        true
    }

    fn map_record(&self, record: Record) -> Result<Self::Item, MappingError> {
        serde_json::to_value(record)
            .and_then(serde_json::from_value)
            .map_err(|source| MappingError::Record { resource: self.name(), source })
    }

    fn map_create(&self, request: &Self::Create) -> Result<Map<String, Value>, MappingError> {
        to_body(self.name(), request)
    }

    fn map_update(&self, request: &Self::Update) -> Result<Map<String, Value>, MappingError> {
        to_body(self.name(), request)
    }
}

/// Serialize a request into a store body without store-owned keys
pub fn to_body<T: Serialize>(resource: &'static str, request: &T) -> Result<Map<String, Value>, MappingError> {
    match serde_json::to_value(request) {
        Ok(Value::Object(mut map)) => {
            strip_system_fields(&mut map);
            Ok(map)
        }
        Ok(_) => Err(MappingError::NotAnObject { resource }),
        Err(source) => Err(MappingError::Request { resource, source }),
    }
}

pub fn strip_system_fields(map: &mut Map<String, Value>) {
    for key in SYSTEM_FIELDS {
        map.remove(key);
    }
    map.remove("expand");
}

/// Shallow merge: copy non-null `patch` values onto keys `target` already has.
pub fn merge_existing(target: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for (key, value) in patch {
        if value.is_null() || SYSTEM_FIELDS.contains(&key.as_str()) {
            continue;
        }
        if let Some(slot) = target.get_mut(key) {
            *slot = value.clone();
        }
    }
}
