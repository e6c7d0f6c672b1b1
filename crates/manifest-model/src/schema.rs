//! Manifest schema definitions.
//!
//! The schema is supplied by an external registry as JSON of the form
//! `{"properties": {"<field>": {"required": .., "show_on_form": ..,
//! "field_name_regex": .., "friendly_name": .., "allowed": [..]}}}`.
//! Declaration order of `properties` is preserved because header matching
//! walks fields in that order.

use std::fmt;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{ModelError, Result};

/// Compiled regular expression used to recognise a field in observed headers.
///
/// Matching is a search, not a full-string match; anchors and case flags
/// (`(?i)`) come from the pattern text itself.
#[derive(Clone)]
pub struct FieldPattern(Regex);

impl FieldPattern {
    pub fn new(pattern: &str) -> std::result::Result<Self, regex::Error> {
        Regex::new(pattern).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn is_match(&self, header: &str) -> bool {
        self.0.is_match(header)
    }
}

impl fmt::Debug for FieldPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FieldPattern").field(&self.as_str()).finish()
    }
}

impl PartialEq for FieldPattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for FieldPattern {}

impl Serialize for FieldPattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FieldPattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(&raw).map_err(serde::de::Error::custom)
    }
}

/// Descriptor of one expected field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub show_on_form: bool,
    #[serde(
        default,
        rename = "field_name_regex",
        skip_serializing_if = "Option::is_none"
    )]
    pub pattern: Option<FieldPattern>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friendly_name: Option<String>,
    /// Closed list of accepted values, compared case-insensitively.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<String>>,
}

impl FieldDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn show_on_form(mut self, shown: bool) -> Self {
        self.show_on_form = shown;
        self
    }

    pub fn with_pattern(mut self, pattern: FieldPattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn with_friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = Some(name.into());
        self
    }

    pub fn with_allowed<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = Some(values.into_iter().map(Into::into).collect());
        self
    }

    /// Required fields always take part in mapping; shown fields only when
    /// they carry a pattern to match headers against.
    pub fn requires_mapping(&self) -> bool {
        self.required || (self.show_on_form && self.pattern.is_some())
    }
}

/// Ordered set of expected fields for one manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestSchema {
    #[serde(default)]
    properties: IndexMap<String, FieldDescriptor>,
}

impl ManifestSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the registry JSON format, compiling every field pattern.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawSchema = serde_json::from_str(json)?;
        let mut schema = Self::new();
        for (name, field) in raw.properties {
            let descriptor = field.into_descriptor(&name)?;
            schema.insert(name, descriptor)?;
        }
        Ok(schema)
    }

    /// Add a field at the end of the declaration order.
    pub fn insert(&mut self, name: impl Into<String>, field: FieldDescriptor) -> Result<()> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ModelError::InvalidFieldName(name));
        }
        self.properties.insert(trimmed.to_string(), field);
        Ok(())
    }

    pub fn with_field(mut self, name: impl Into<String>, field: FieldDescriptor) -> Result<Self> {
        self.insert(name, field)?;
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.properties.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.properties
            .iter()
            .map(|(name, field)| (name.as_str(), field))
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.get(name).is_some_and(|field| field.required)
    }

    pub fn is_shown(&self, name: &str) -> bool {
        self.get(name).is_some_and(|field| field.show_on_form)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.fields()
            .filter(|(_, field)| field.required)
            .map(|(name, _)| name)
    }

    pub fn shown_fields(&self) -> impl Iterator<Item = &str> {
        self.fields()
            .filter(|(_, field)| field.show_on_form)
            .map(|(name, _)| name)
    }

    pub fn fields_requiring_mapping(&self) -> impl Iterator<Item = (&str, &FieldDescriptor)> {
        self.fields().filter(|(_, field)| field.requires_mapping())
    }

    /// Human readable label for a field, falling back to its name.
    pub fn friendly_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.get(name)
            .and_then(|field| field.friendly_name.as_deref())
            .unwrap_or(name)
    }
}

/// Registry payload before pattern compilation, so that a bad pattern can be
/// reported against the field that declared it.
#[derive(Deserialize)]
struct RawSchema {
    #[serde(default)]
    properties: IndexMap<String, RawField>,
}

#[derive(Deserialize)]
struct RawField {
    #[serde(default)]
    required: bool,
    #[serde(default)]
    show_on_form: bool,
    #[serde(default)]
    field_name_regex: Option<String>,
    #[serde(default)]
    friendly_name: Option<String>,
    #[serde(default)]
    allowed: Option<Vec<String>>,
}

impl RawField {
    fn into_descriptor(self, name: &str) -> Result<FieldDescriptor> {
        let pattern = self
            .field_name_regex
            .as_deref()
            .map(FieldPattern::new)
            .transpose()
            .map_err(|source| ModelError::InvalidPattern {
                field: name.to_string(),
                source,
            })?;
        Ok(FieldDescriptor {
            required: self.required,
            show_on_form: self.show_on_form,
            pattern,
            friendly_name: self.friendly_name,
            allowed: self.allowed,
        })
    }
}
