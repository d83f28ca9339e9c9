//! # Classification Document Model
//!
//! Typed, immutable representation of a PII classification schema:
//!
//! ```text
//! ClassificationDocument
//!   services: service name -> ServiceDescriptor
//!     fields: field name -> FieldClassification
//! ```
//!
//! ## Parsing Rules
//!
//! Deserialization is the single validating pass over the source. Every
//! level of the document must be a mapping: the root, `services`, each
//! service descriptor, its `fields`, and each field entry. Sequences and
//! scalars are rejected even where serde would otherwise accept a struct
//! from a positional array. Keys must be unique at every level.
//!
//! Field defaults are applied here, once: `piiLevel` 0, `retention`
//! `RETAIN_INDEFINITE`, `required` false. A `null` attribute counts as
//! absent. Unknown keys are ignored so that schemas may carry extra
//! annotations.
//!
//! Declaration order of services and fields is preserved; every query that
//! returns a sequence of field names returns it in that order.

use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, Deserialize, Deserializer, IgnoredAny, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};

use piitag_core::{PiiLevel, RetentionPolicy};

/// String-keyed map that remembers insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
    index: HashMap<String, usize>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value. An existing key keeps its position and the previous
    /// value is returned.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        if let Some(&pos) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[pos].1, value));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    /// Whether the key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map with unique string keys")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = OrderedMap::new();
                while let Some(key) = access.next_key::<String>()? {
                    if map.contains_key(&key) {
                        return Err(de::Error::custom(format!("duplicate key '{key}'")));
                    }
                    let value = access.next_value::<V>()?;
                    map.insert(key, value);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// Store a parsed attribute, rejecting a second occurrence of the same key.
fn set_once<T, E: de::Error>(slot: &mut Option<T>, key: &'static str, value: T) -> Result<(), E> {
    if slot.is_some() {
        return Err(E::duplicate_field(key));
    }
    *slot = Some(value);
    Ok(())
}

// -- FieldClassification ------------------------------------------------------

/// Classification of one data field of a service.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldClassification {
    /// Ordinal sensitivity.
    pub pii_level: PiiLevel,
    /// Human-readable label for `pii_level`, if the schema provides one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pii_level_name: Option<String>,
    /// Retention policy, `RETAIN_INDEFINITE` when not declared.
    pub retention: RetentionPolicy,
    /// Whether `retention` was present in the source.
    #[serde(skip)]
    pub retention_declared: bool,
    /// Whether every record of the service must carry this field.
    pub required: bool,
    /// Free-text documentation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl FieldClassification {
    /// Create a classification at the given level with all other
    /// attributes defaulted.
    pub fn new(pii_level: PiiLevel) -> Self {
        Self {
            pii_level,
            ..Self::default()
        }
    }

    /// Mark the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Set an explicit retention policy.
    pub fn with_retention(mut self, retention: RetentionPolicy) -> Self {
        self.retention = retention;
        self.retention_declared = true;
        self
    }

    /// Set the level label.
    pub fn with_level_name(mut self, name: impl Into<String>) -> Self {
        self.pii_level_name = Some(name.into());
        self
    }

    /// Whether the field is at or above `min_level`.
    pub fn is_sensitive(&self, min_level: PiiLevel) -> bool {
        self.pii_level >= min_level
    }

    /// Whether the field must be encrypted.
    pub fn requires_encryption(&self) -> bool {
        self.pii_level.requires_encryption()
    }
}

impl<'de> Deserialize<'de> for FieldClassification {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldVisitor;

        impl<'de> Visitor<'de> for FieldVisitor {
            type Value = FieldClassification;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a field classification object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut pii_level: Option<Option<PiiLevel>> = None;
                let mut pii_level_name: Option<Option<String>> = None;
                let mut retention: Option<Option<String>> = None;
                let mut required: Option<Option<bool>> = None;
                let mut description: Option<Option<String>> = None;

                while let Some(key) = access.next_key::<String>()? {
                    match key.as_str() {
                        "piiLevel" => {
                            set_once::<_, A::Error>(&mut pii_level, "piiLevel", access.next_value()?)?
                        }
                        "piiLevelName" => set_once::<_, A::Error>(
                            &mut pii_level_name,
                            "piiLevelName",
                            access.next_value()?,
                        )?,
                        "retention" => {
                            set_once::<_, A::Error>(&mut retention, "retention", access.next_value()?)?
                        }
                        "required" => {
                            set_once::<_, A::Error>(&mut required, "required", access.next_value()?)?
                        }
                        "description" => set_once::<_, A::Error>(
                            &mut description,
                            "description",
                            access.next_value()?,
                        )?,
                        _ => {
                            access.next_value::<IgnoredAny>()?;
                        }
                    }
                }

                let retention = retention.flatten();
                let retention_declared = retention.is_some();
                let retention = match retention {
                    Some(raw) => RetentionPolicy::new(raw).map_err(<A::Error as de::Error>::custom)?,
                    None => RetentionPolicy::default(),
                };

                Ok(FieldClassification {
                    pii_level: pii_level.flatten().unwrap_or_default(),
                    pii_level_name: pii_level_name.flatten(),
                    retention,
                    retention_declared,
                    required: required.flatten().unwrap_or(false),
                    description: description.flatten(),
                })
            }
        }

        deserializer.deserialize_map(FieldVisitor)
    }
}

// -- ServiceDescriptor --------------------------------------------------------

/// Classified fields of one service.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ServiceDescriptor {
    fields: OrderedMap<FieldClassification>,
}

impl ServiceDescriptor {
    /// Create a descriptor with no fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a field classification.
    pub fn with_field(mut self, name: impl Into<String>, field: FieldClassification) -> Self {
        self.fields.insert(name, field);
        self
    }

    /// All field classifications in declaration order.
    pub fn fields(&self) -> &OrderedMap<FieldClassification> {
        &self.fields
    }

    /// Look up one field.
    pub fn field(&self, name: &str) -> Option<&FieldClassification> {
        self.fields.get(name)
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys()
    }

    /// Names of fields marked `required`, in declaration order.
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, f)| f.required)
            .map(|(name, _)| name)
    }

    /// Returns true if the descriptor classifies no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<'de> Deserialize<'de> for ServiceDescriptor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DescriptorVisitor;

        impl<'de> Visitor<'de> for DescriptorVisitor {
            type Value = ServiceDescriptor;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a service descriptor object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut fields: Option<OrderedMap<FieldClassification>> = None;
                while let Some(key) = access.next_key::<String>()? {
                    if key == "fields" {
                        set_once::<_, A::Error>(&mut fields, "fields", access.next_value()?)?;
                    } else {
                        access.next_value::<IgnoredAny>()?;
                    }
                }
                Ok(ServiceDescriptor {
                    fields: fields.unwrap_or_default(),
                })
            }
        }

        deserializer.deserialize_map(DescriptorVisitor)
    }
}

// -- ClassificationDocument ---------------------------------------------------

/// Root of a loaded classification schema.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct ClassificationDocument {
    services: OrderedMap<ServiceDescriptor>,
}

impl ClassificationDocument {
    /// Create a document with no services.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a service descriptor.
    pub fn with_service(mut self, name: impl Into<String>, service: ServiceDescriptor) -> Self {
        self.services.insert(name, service);
        self
    }

    /// All service descriptors in declaration order.
    pub fn services(&self) -> &OrderedMap<ServiceDescriptor> {
        &self.services
    }

    /// Look up one service.
    pub fn service(&self, name: &str) -> Option<&ServiceDescriptor> {
        self.services.get(name)
    }

    /// Total number of classified fields across all services.
    pub fn field_count(&self) -> usize {
        self.services.iter().map(|(_, s)| s.fields.len()).sum()
    }
}

impl<'de> Deserialize<'de> for ClassificationDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DocumentVisitor;

        impl<'de> Visitor<'de> for DocumentVisitor {
            type Value = ClassificationDocument;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a classification document object with a 'services' map")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut services: Option<OrderedMap<ServiceDescriptor>> = None;
                while let Some(key) = access.next_key::<String>()? {
                    if key == "services" {
                        set_once::<_, A::Error>(&mut services, "services", access.next_value()?)?;
                    } else {
                        access.next_value::<IgnoredAny>()?;
                    }
                }
                let services = services
                    .ok_or_else(|| <A::Error as de::Error>::missing_field("services"))?;
                Ok(ClassificationDocument { services })
            }
        }

        deserializer.deserialize_map(DocumentVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> Result<ClassificationDocument, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn applies_field_defaults_once() {
        let doc = parse(json!({
            "services": { "userinfo": { "fields": { "city": {} } } }
        }))
        .unwrap();
        let city = doc.service("userinfo").unwrap().field("city").unwrap();
        assert_eq!(city, &FieldClassification::default());
        assert_eq!(city.retention.as_str(), "RETAIN_INDEFINITE");
        assert!(!city.retention_declared);
        assert!(!city.required);
    }

    #[test]
    fn reads_all_attributes() {
        let doc = parse(json!({
            "services": { "userinfo": { "fields": { "userPassword": {
                "piiLevel": 4,
                "piiLevelName": "CRITICAL",
                "retention": "RETAIN_7_YEARS",
                "required": true,
                "description": "Hashed login secret"
            } } } }
        }))
        .unwrap();
        let f = doc.service("userinfo").unwrap().field("userPassword").unwrap();
        assert_eq!(f.pii_level, PiiLevel::CRITICAL);
        assert_eq!(f.pii_level_name.as_deref(), Some("CRITICAL"));
        assert_eq!(f.retention.as_str(), "RETAIN_7_YEARS");
        assert!(f.retention_declared);
        assert!(f.required);
        assert_eq!(f.description.as_deref(), Some("Hashed login secret"));
    }

    #[test]
    fn null_attributes_count_as_absent() {
        let doc = parse(json!({
            "services": { "s": { "fields": { "f": {
                "piiLevel": null, "retention": null, "required": null
            } } } }
        }))
        .unwrap();
        let f = doc.service("s").unwrap().field("f").unwrap();
        assert_eq!(f, &FieldClassification::default());
    }

    #[test]
    fn preserves_declaration_order() {
        let text = r#"{"services": {"s": {"fields": {
            "zeta": {}, "alpha": {}, "mid": {}
        }}}}"#;
        let doc: ClassificationDocument = serde_json::from_str(text).unwrap();
        let names: Vec<&str> = doc.service("s").unwrap().field_names().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn missing_fields_key_means_no_fields() {
        let doc = parse(json!({ "services": { "order": {} } })).unwrap();
        assert!(doc.service("order").unwrap().is_empty());
    }

    #[test]
    fn ignores_unknown_keys() {
        let doc = parse(json!({
            "version": "1.2",
            "services": { "s": { "owner": "team-a", "fields": { "f": { "piiLevel": 1, "tags": ["x"] } } } }
        }))
        .unwrap();
        assert_eq!(doc.field_count(), 1);
    }

    #[test]
    fn rejects_missing_services() {
        let err = parse(json!({ "fields": {} })).unwrap_err();
        assert!(err.to_string().contains("services"));
    }

    #[test]
    fn rejects_scalar_services() {
        assert!(parse(json!({ "services": "not-an-object" })).is_err());
    }

    #[test]
    fn rejects_array_at_every_level() {
        assert!(parse(json!([])).is_err());
        assert!(parse(json!({ "services": [] })).is_err());
        assert!(parse(json!({ "services": { "s": [] } })).is_err());
        assert!(parse(json!({ "services": { "s": { "fields": [] } } })).is_err());
        assert!(parse(json!({ "services": { "s": { "fields": { "f": [] } } } })).is_err());
        assert!(parse(json!({ "services": { "s": { "fields": { "f": 3 } } } })).is_err());
    }

    #[test]
    fn rejects_null_fields_map() {
        assert!(parse(json!({ "services": { "s": { "fields": null } } })).is_err());
    }

    #[test]
    fn rejects_wrongly_typed_attributes() {
        assert!(parse(json!({ "services": { "s": { "fields": { "f": { "piiLevel": "high" } } } } })).is_err());
        assert!(parse(json!({ "services": { "s": { "fields": { "f": { "piiLevel": -1 } } } } })).is_err());
        assert!(parse(json!({ "services": { "s": { "fields": { "f": { "required": "yes" } } } } })).is_err());
        assert!(parse(json!({ "services": { "s": { "fields": { "f": { "retention": "" } } } } })).is_err());
    }

    #[test]
    fn rejects_duplicate_field_keys_in_text() {
        let text = r#"{"services": {"s": {"fields": {"f": {}, "f": {"piiLevel": 3}}}}}"#;
        let err = serde_json::from_str::<ClassificationDocument>(text).unwrap_err();
        assert!(err.to_string().contains("duplicate key 'f'"));
    }

    #[test]
    fn rejects_duplicate_attribute_keys_in_text() {
        let text = r#"{"services": {"s": {"fields": {"f": {"piiLevel": 1, "piiLevel": 4}}}}}"#;
        assert!(serde_json::from_str::<ClassificationDocument>(text).is_err());
    }

    #[test]
    fn builder_matches_parsed_document() {
        let built = ClassificationDocument::new().with_service(
            "userinfo",
            ServiceDescriptor::new().with_field(
                "userPassword",
                FieldClassification::new(PiiLevel::CRITICAL)
                    .required()
                    .with_retention(RetentionPolicy::new("RETAIN_7_YEARS").unwrap()),
            ),
        );
        let parsed = parse(json!({
            "services": { "userinfo": { "fields": { "userPassword": {
                "piiLevel": 4, "retention": "RETAIN_7_YEARS", "required": true
            } } } }
        }))
        .unwrap();
        assert_eq!(built, parsed);
    }

    #[test]
    fn ordered_map_insert_keeps_position() {
        let mut map = OrderedMap::new();
        map.insert("a", 1);
        map.insert("b", 2);
        assert_eq!(map.insert("a", 3), Some(1));
        let entries: Vec<(&str, &i32)> = map.iter().collect();
        assert_eq!(entries, vec![("a", &3), ("b", &2)]);
    }

    #[test]
    fn serializes_back_in_declaration_order() {
        let text = r#"{"services":{"s":{"fields":{"b":{"piiLevel":1},"a":{"piiLevel":2}}}}}"#;
        let doc: ClassificationDocument = serde_json::from_str(text).unwrap();
        let out = serde_json::to_string(&doc).unwrap();
        assert!(out.find("\"b\"").unwrap() < out.find("\"a\"").unwrap());
    }
}
