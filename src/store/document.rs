use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// A stored document: its key within the parent collection plus its fields
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Map<String, Value>,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Get field value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Get a string field, treating an empty string as absent
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(|v| v.as_str())
            .filter(|s| !s.is_empty())
    }

    /// Decode the fields into a typed record
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.fields.clone()))
    }
}

/// Write payload for `set_document` / `update_fields`
///
/// Field names registered through `server_timestamp` are resolved by the
/// store to its own clock at write time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    values: Map<String, Value>,
    server_timestamps: BTreeSet<String>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a serializable record (must serialize to a JSON object)
    pub fn from_record<T: Serialize>(record: &T) -> Result<Self, serde_json::Error> {
        match serde_json::to_value(record)? {
            Value::Object(values) => Ok(Self {
                values,
                server_timestamps: BTreeSet::new(),
            }),
            other => Err(serde::ser::Error::custom(format!(
                "expected a JSON object, got {}",
                other
            ))),
        }
    }

    /// Set field value (chainable)
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        self.server_timestamps.remove(&key);
        self.values.insert(key, value.into());
        self
    }

    /// Set field only when a non-empty value is supplied. A `None` or empty
    /// string leaves the key out of the payload entirely, so partial updates
    /// never clobber what is already stored.
    pub fn set_if_present(self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value.map(Into::into) {
            Some(v) if !v.trim().is_empty() => self.set(key, v),
            _ => self,
        }
    }

    /// Mark a field to receive the store's current time
    pub fn server_timestamp(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.values.remove(&key);
        self.server_timestamps.insert(key);
        self
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn server_timestamps(&self) -> impl Iterator<Item = &str> {
        self.server_timestamps.iter().map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key) || self.server_timestamps.contains(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.server_timestamps.is_empty()
    }

    /// Materialize the payload with timestamps taken from `now`
    pub fn resolve(self, now: DateTime<Utc>) -> Map<String, Value> {
        let mut values = self.values;
        let stamp = Value::String(now.to_rfc3339());
        for key in self.server_timestamps {
            values.insert(key, stamp.clone());
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn set_if_present_skips_empty_values() {
        let fields = Fields::new()
            .set("nom", "Maths")
            .set_if_present("icon", None::<String>)
            .set_if_present("banner", Some(""));
        assert!(fields.contains("nom"));
        assert!(!fields.contains("icon"));
        assert!(!fields.contains("banner"));
    }

    #[test]
    fn resolve_fills_server_timestamps() {
        let now = Utc::now();
        let values = Fields::new()
            .set("nom", "6e")
            .server_timestamp("lastUpdate")
            .resolve(now);
        assert_eq!(values["nom"], json!("6e"));
        assert_eq!(values["lastUpdate"], json!(now.to_rfc3339()));
    }

    #[test]
    fn later_set_overrides_timestamp_marker() {
        let fields = Fields::new()
            .server_timestamp("createdAt")
            .set("createdAt", "2024-01-01T00:00:00Z");
        assert_eq!(fields.server_timestamps().count(), 0);
    }

    #[test]
    fn decodes_typed_record() {
        #[derive(Deserialize)]
        struct Probe {
            nom: String,
        }
        let mut map = Map::new();
        map.insert("nom".into(), json!("Physique"));
        let doc = Document::new("pc", map);
        assert_eq!(doc.decode::<Probe>().unwrap().nom, "Physique");
        assert!(doc.get_str("missing").is_none());
    }
}
