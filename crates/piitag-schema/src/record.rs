//! # Candidate Records
//!
//! A candidate record is the data being checked against the schema,
//! usually a deserialized API response body. The validator only ever looks
//! at which keys a record has, never at the values, so anything that can
//! answer "which field names do you carry" can be checked. [`FieldSet`]
//! is that seam.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;
use serde_json::{Map, Value};

/// A deserialized record: field name to arbitrary value.
pub type CandidateRecord = Map<String, Value>;

/// Key-presence view over a record.
pub trait FieldSet {
    /// Whether the record carries a key named `name`.
    fn contains_field(&self, name: &str) -> bool;

    /// All keys of the record, in the record's own iteration order.
    fn field_names(&self) -> Vec<&str>;

    /// Whether the record carries `name` with a non-null value.
    fn has_value(&self, name: &str) -> bool {
        self.contains_field(name)
    }
}

impl FieldSet for Map<String, Value> {
    fn contains_field(&self, name: &str) -> bool {
        self.contains_key(name)
    }

    fn field_names(&self) -> Vec<&str> {
        self.keys().map(String::as_str).collect()
    }

    fn has_value(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.is_null())
    }
}

/// A non-object value has no fields.
impl FieldSet for Value {
    fn contains_field(&self, name: &str) -> bool {
        self.as_object().is_some_and(|m| m.contains_key(name))
    }

    fn field_names(&self) -> Vec<&str> {
        self.as_object()
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    fn has_value(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.is_null())
    }
}

impl<V> FieldSet for HashMap<String, V> {
    fn contains_field(&self, name: &str) -> bool {
        self.contains_key(name)
    }

    fn field_names(&self) -> Vec<&str> {
        self.keys().map(String::as_str).collect()
    }
}

impl<V> FieldSet for BTreeMap<String, V> {
    fn contains_field(&self, name: &str) -> bool {
        self.contains_key(name)
    }

    fn field_names(&self) -> Vec<&str> {
        self.keys().map(String::as_str).collect()
    }
}

/// Strip a `{"body": {...}}` response envelope.
///
/// Services built on Spring return either the record itself or a
/// `ResponseEntity` wrapper whose record sits under `body`. Returns the
/// inner object when `body` holds an object, the value itself when it is
/// an object, and `None` otherwise.
pub fn unwrap_envelope(value: &Value) -> Option<&CandidateRecord> {
    let outer = value.as_object()?;
    match outer.get("body") {
        Some(Value::Object(inner)) => Some(inner),
        _ => Some(outer),
    }
}

/// Owned variant of [`unwrap_envelope`].
pub fn into_record(value: Value) -> Option<CandidateRecord> {
    match value {
        Value::Object(mut outer) => match outer.remove("body") {
            Some(Value::Object(inner)) => Some(inner),
            Some(other) => {
                outer.insert("body".to_string(), other);
                Some(outer)
            }
            None => Some(outer),
        },
        _ => None,
    }
}

/// Outcome of checking one record against a service's classification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordReport {
    /// Service the record was checked against.
    pub service: String,
    /// Required fields absent from the record, in declaration order.
    pub missing_required: Vec<String>,
    /// Sensitive fields absent from the record, in declaration order.
    pub missing_sensitive: Vec<String>,
    /// Record keys with no classification, in the record's order.
    pub unclassified: Vec<String>,
    /// Fields that must be encrypted but came back with a non-null value,
    /// in declaration order.
    pub exposed_encrypted: Vec<String>,
}

impl RecordReport {
    /// True iff every required field is present.
    pub fn is_complete(&self) -> bool {
        self.missing_required.is_empty()
    }

    /// True iff no encrypted field was returned in the clear.
    pub fn is_redacted(&self) -> bool {
        self.exposed_encrypted.is_empty()
    }
}

impl std::fmt::Display for RecordReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_complete() {
            write!(f, "{}: all required fields present", self.service)?;
        } else {
            write!(
                f,
                "{}: missing required fields: {}",
                self.service,
                self.missing_required.join(", ")
            )?;
        }
        if !self.missing_sensitive.is_empty() {
            write!(f, "\n  missing sensitive: {}", self.missing_sensitive.join(", "))?;
        }
        if !self.unclassified.is_empty() {
            write!(f, "\n  unclassified: {}", self.unclassified.join(", "))?;
        }
        if !self.exposed_encrypted.is_empty() {
            write!(
                f,
                "\n  encrypted fields returned: {}",
                self.exposed_encrypted.join(", ")
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unwraps_response_entity_body() {
        let value = json!({ "body": { "userId": 6, "city": "Boston" }, "statusCode": "OK" });
        let record = unwrap_envelope(&value).unwrap();
        assert!(record.contains_key("userId"));
        assert!(!record.contains_key("statusCode"));
    }

    #[test]
    fn plain_object_passes_through() {
        let value = json!({ "userId": 6 });
        let record = unwrap_envelope(&value).unwrap();
        assert!(record.contains_key("userId"));
    }

    #[test]
    fn scalar_body_is_not_an_envelope() {
        let value = json!({ "body": "text", "id": 1 });
        let record = unwrap_envelope(&value).unwrap();
        assert!(record.contains_key("body"));
        assert!(record.contains_key("id"));

        let owned = into_record(value).unwrap();
        assert!(owned.contains_key("body"));
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(unwrap_envelope(&json!([1, 2])).is_none());
        assert!(into_record(json!("x")).is_none());
    }

    #[test]
    fn into_record_unwraps_body() {
        let owned = into_record(json!({ "body": { "a": 1 } })).unwrap();
        assert_eq!(owned.field_names(), vec!["a"]);
    }

    #[test]
    fn field_set_over_maps() {
        let mut hm: HashMap<String, i32> = HashMap::new();
        hm.insert("city".into(), 1);
        assert!(hm.contains_field("city"));
        assert!(!hm.contains_field("address"));

        let v = json!({ "city": "Boston" });
        assert!(v.contains_field("city"));
        assert!(!json!(3).contains_field("city"));
    }

    #[test]
    fn null_values_do_not_count_as_returned() {
        let v = json!({ "userPassword": null, "address": "123 Main St" });
        assert!(v.contains_field("userPassword"));
        assert!(!v.has_value("userPassword"));
        assert!(v.has_value("address"));
        assert!(!v.as_object().unwrap().has_value("userPassword"));

        let mut hm: HashMap<String, Option<i32>> = HashMap::new();
        hm.insert("city".into(), None);
        assert!(hm.has_value("city"));
    }

    #[test]
    fn report_display() {
        let report = RecordReport {
            service: "userinfo".into(),
            missing_required: vec!["userPassword".into()],
            missing_sensitive: vec![],
            unclassified: vec!["nickname".into()],
            exposed_encrypted: vec!["address".into()],
        };
        let text = report.to_string();
        assert!(text.contains("missing required fields: userPassword"));
        assert!(text.contains("unclassified: nickname"));
        assert!(text.contains("encrypted fields returned: address"));
        assert!(!report.is_complete());
        assert!(!report.is_redacted());
    }
}
