//! Configuration schema definitions.
//!
//! A [`ServiceConfig`] is an ordered map from service name to a
//! [`ServiceRecord`]. Records hold plain data plus an optional `depends`
//! declaration; behavior lives in the lifecycle registry, never here.

use std::collections::HashMap;

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::config::validation::{ValidationError, ValidationErrors};

/// Name of the reserved record field declaring dependencies.
pub const DEPENDS_FIELD: &str = "depends";

/// Dependency declaration of a single service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Depends {
    /// `depends = "db"`
    One(String),
    /// `depends = ["db", "cache"]`
    Many(Vec<String>),
}

impl Depends {
    /// The declared names, in declaration order.
    pub fn as_slice(&self) -> &[String] {
        match self {
            Depends::One(name) => std::slice::from_ref(name),
            Depends::Many(names) => names,
        }
    }
}

/// Configuration record of one service.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ServiceRecord {
    /// Services that must be running before this one starts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends: Option<Depends>,

    /// Arbitrary service settings, opaque to the lifecycle engine.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ServiceRecord {
    /// Create an empty record with no dependencies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a data field.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Declare a single dependency, replacing any earlier declaration.
    pub fn depends_on(mut self, name: impl Into<String>) -> Self {
        self.depends = Some(Depends::One(name.into()));
        self
    }

    /// Declare an ordered list of dependencies, replacing any earlier declaration.
    pub fn depends_on_all<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.depends = Some(Depends::Many(names.into_iter().map(Into::into).collect()));
        self
    }

    /// Declared dependencies; empty when `depends` is absent.
    pub fn dependencies(&self) -> &[String] {
        self.depends.as_ref().map(Depends::as_slice).unwrap_or(&[])
    }

    /// Look up a data field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Convert a dynamic record, checking its shape.
    fn from_value(service: &str, value: Value) -> Result<Self, ValidationError> {
        let Value::Object(mut fields) = value else {
            return Err(ValidationError::NotARecord {
                service: service.to_string(),
            });
        };

        let depends = match fields.remove(DEPENDS_FIELD) {
            None | Some(Value::Null) => None,
            Some(Value::String(name)) => Some(Depends::One(name)),
            Some(Value::Array(items)) => {
                let mut names = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(name) => names.push(name),
                        _ => {
                            return Err(ValidationError::InvalidDepends {
                                service: service.to_string(),
                            })
                        }
                    }
                }
                Some(Depends::Many(names))
            }
            Some(_) => {
                return Err(ValidationError::InvalidDepends {
                    service: service.to_string(),
                })
            }
        };

        Ok(Self { depends, fields })
    }
}

/// Ordered mapping from service name to its configuration record.
///
/// Insertion order is significant: it breaks ties between independent
/// services when the start order is computed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServiceConfig {
    entries: Vec<(String, ServiceRecord)>,
    index: HashMap<String, usize>,
}

impl ServiceConfig {
    /// Create an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`ServiceConfig::insert`].
    pub fn service(mut self, name: impl Into<String>, record: ServiceRecord) -> Self {
        self.insert(name, record);
        self
    }

    /// Insert or replace a service. A replaced service keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, record: ServiceRecord) {
        let name = name.into();
        match self.index.get(&name) {
            Some(&i) => self.entries[i].1 = record,
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, record));
            }
        }
    }

    /// Build a configuration from a dynamic JSON value.
    ///
    /// The root must be an object whose values are objects; `depends`, when
    /// present, must be a string or an array of strings. Every offending
    /// entry is reported.
    pub fn from_value(value: Value) -> Result<Self, ValidationErrors> {
        let Value::Object(services) = value else {
            return Err(ValidationErrors::from(vec![ValidationError::NotAnObject]));
        };

        let mut config = Self::new();
        let mut errors = Vec::new();
        for (name, raw) in services {
            match ServiceRecord::from_value(&name, raw) {
                Ok(record) => config.insert(name, record),
                Err(e) => errors.push(e),
            }
        }

        if errors.is_empty() {
            Ok(config)
        } else {
            Err(ValidationErrors::from(errors))
        }
    }

    /// Record of the named service.
    pub fn get(&self, name: &str) -> Option<&ServiceRecord> {
        self.index.get(name).map(|&i| &self.entries[i].1)
    }

    /// True if the service is declared.
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Position of the service in declaration order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Service names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// `(name, record)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ServiceRecord)> {
        self.entries.iter().map(|(name, record)| (name.as_str(), record))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn name_at(&self, index: usize) -> &str {
        &self.entries[index].0
    }

    pub(crate) fn record_at(&self, index: usize) -> &ServiceRecord {
        &self.entries[index].1
    }
}

impl Serialize for ServiceConfig {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, record) in &self.entries {
            map.serialize_entry(name, record)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ServiceConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(D::Error::custom)
    }
}

/// Options applied when a system is constructed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SystemOptions {
    /// Check configuration and behaviors before building the graph.
    pub validate: bool,
}
