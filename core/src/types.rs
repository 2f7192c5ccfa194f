//! Domain DTOs for the PocketShelf API.
//!
//! # Design
//! The server owns the schema of items and forms, so both are kept as the
//! opaque JSON object the server sent. Nothing is required of a listed record;
//! `id()` reads the identifier when one is present in a recognised shape.
//!
//! Creation payloads (`NewItem`, `NewForm`) can never hold an identifier:
//! `id` and `_id` are dropped on construction and on deserialization, so a
//! draft cannot smuggle a client-made id into a create request.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JSON keys the server uses for record identity.
const IDENTIFIER_KEYS: [&str; 2] = ["id", "_id"];

/// An inventory entry returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Item {
    pub fields: Map<String, Value>,
}

impl Item {
    /// The server-assigned identifier, when the record carries a readable one.
    pub fn id(&self) -> Option<&str> {
        record_id(&self.fields)
    }

    /// The display name. Older records use `itemName` instead of `name`.
    pub fn name(&self) -> Option<&str> {
        self.fields
            .get("name")
            .or_else(|| self.fields.get("itemName"))
            .and_then(Value::as_str)
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// A donor, client or volunteer intake form returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct Form {
    pub fields: Map<String, Value>,
}

impl Form {
    pub fn id(&self) -> Option<&str> {
        record_id(&self.fields)
    }

    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }

    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

/// Request payload for creating an item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct NewItem {
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl NewItem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field. Identifier keys are ignored.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        insert_field(&mut self.fields, key.into(), value.into());
        self
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl From<Map<String, Value>> for NewItem {
    fn from(fields: Map<String, Value>) -> Self {
        Self {
            fields: strip_identifiers(fields),
        }
    }
}

/// Request payload for submitting a form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct NewForm {
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl NewForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field. Identifier keys are ignored.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        insert_field(&mut self.fields, key.into(), value.into());
        self
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl From<Map<String, Value>> for NewForm {
    fn from(fields: Map<String, Value>) -> Self {
        Self {
            fields: strip_identifiers(fields),
        }
    }
}

/// Optional filter for list requests. Only a non-empty `name` is sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameFilter {
    pub name: Option<String>,
}

impl NameFilter {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    pub(crate) fn query_params(&self) -> Vec<(String, String)> {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => vec![("name".to_string(), name.to_string())],
            _ => Vec::new(),
        }
    }
}

/// Body of a successful create response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreatedId {
    pub id: String,
}

/// `id`, then `_id`, as a string or an extended-JSON `{"$oid": ...}`.
fn record_id(fields: &Map<String, Value>) -> Option<&str> {
    IDENTIFIER_KEYS
        .iter()
        .filter_map(|key| fields.get(*key))
        .find_map(|value| match value {
            Value::String(id) => Some(id.as_str()),
            Value::Object(inner) => inner.get("$oid").and_then(Value::as_str),
            _ => None,
        })
}

fn insert_field(fields: &mut Map<String, Value>, key: String, value: Value) {
    if IDENTIFIER_KEYS.contains(&key.as_str()) {
        log::warn!("ignoring client-supplied identifier key '{key}' on a draft record");
        return;
    }
    fields.insert(key, value);
}

fn strip_identifiers(mut fields: Map<String, Value>) -> Map<String, Value> {
    for key in IDENTIFIER_KEYS {
        if fields.remove(key).is_some() {
            log::warn!("dropping client-supplied identifier key '{key}' from a draft record");
        }
    }
    fields
}
