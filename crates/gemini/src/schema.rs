//! Output-schema descriptors.
//!
//! Serializes to the OpenAPI subset accepted by `generationConfig.responseSchema`.

use std::collections::BTreeMap;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enumeration: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Schema>,
    /// Declaration order of `properties`; the map itself is sorted
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub property_ordering: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl Schema {
    fn of(schema_type: SchemaType) -> Self {
        Self {
            schema_type,
            description: None,
            enumeration: Vec::new(),
            items: None,
            properties: BTreeMap::new(),
            property_ordering: Vec::new(),
            required: Vec::new(),
        }
    }

    pub fn object() -> Self {
        Self::of(SchemaType::Object)
    }

    pub fn string() -> Self {
        Self::of(SchemaType::String)
    }

    pub fn number() -> Self {
        Self::of(SchemaType::Number)
    }

    pub fn integer() -> Self {
        Self::of(SchemaType::Integer)
    }

    pub fn boolean() -> Self {
        Self::of(SchemaType::Boolean)
    }

    pub fn array(items: Schema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::of(SchemaType::Array)
        }
    }

    /// Array of plain strings
    pub fn strings() -> Self {
        Self::array(Self::string())
    }

    /// Adds a property the model is asked to always fill
    pub fn property(mut self, name: impl Into<String>, schema: Schema) -> Self {
        let name = name.into();
        self.required.push(name.clone());
        self.optional_property(name, schema)
    }

    pub fn optional_property(mut self, name: impl Into<String>, schema: Schema) -> Self {
        let name = name.into();
        if !self.property_ordering.contains(&name) {
            self.property_ordering.push(name.clone());
        }
        self.properties.insert(name, schema);
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn enumerated<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enumeration = values.into_iter().map(Into::into).collect();
        self
    }
}
