//! Schema tree nodes emitted by the mapper.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// JSON-Schema type keyword carried by a [`SchemaNode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemaKind {
    /// `object`
    Object,
    /// `string`
    String,
    /// `integer`
    Integer,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
    /// `array`
    Array,
}

impl SchemaKind {
    /// Returns the JSON-Schema keyword for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::String => "string",
            Self::Integer => "integer",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
        }
    }
}

/// One node of a generated input schema.
///
/// Every top-level tool schema is an `object` node whose `properties` keep
/// registration/declaration order; `required` lists only names present in
/// `properties`. Serialization is hand-written so property order survives the
/// trip onto the wire.
#[derive(Clone, Debug, PartialEq)]
pub struct SchemaNode {
    kind: SchemaKind,
    description: Option<String>,
    properties: Option<Vec<(String, SchemaNode)>>,
    items: Option<Box<SchemaNode>>,
    required: Vec<String>,
}

impl SchemaNode {
    /// Creates a leaf node of the given kind.
    #[must_use]
    pub const fn leaf(kind: SchemaKind) -> Self {
        Self {
            kind,
            description: None,
            properties: None,
            items: None,
            required: Vec::new(),
        }
    }

    /// Creates an `object` node with an explicit (possibly empty) property map.
    #[must_use]
    pub fn object(properties: Vec<(String, SchemaNode)>) -> Self {
        Self {
            kind: SchemaKind::Object,
            description: None,
            properties: Some(properties),
            items: None,
            required: Vec::new(),
        }
    }

    /// Creates an `array` node with the given element schema.
    #[must_use]
    pub fn array(items: SchemaNode) -> Self {
        Self {
            kind: SchemaKind::Array,
            description: None,
            properties: None,
            items: Some(Box::new(items)),
            required: Vec::new(),
        }
    }

    /// Sets the human-readable description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replaces the `required` name set.
    #[must_use]
    pub fn with_required(mut self, required: Vec<String>) -> Self {
        self.required = required;
        self
    }

    /// Returns the node kind.
    #[must_use]
    pub const fn kind(&self) -> SchemaKind {
        self.kind
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the ordered properties of an object node.
    #[must_use]
    pub fn properties(&self) -> Option<&[(String, SchemaNode)]> {
        self.properties.as_deref()
    }

    /// Looks up a property schema by name.
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&SchemaNode> {
        self.properties
            .as_deref()?
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, node)| node)
    }

    /// Returns the element schema of an array node.
    #[must_use]
    pub fn items(&self) -> Option<&SchemaNode> {
        self.items.as_deref()
    }

    /// Returns the required property names.
    #[must_use]
    pub fn required(&self) -> &[String] {
        &self.required
    }
}

impl Serialize for SchemaNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let len = 1
            + usize::from(self.description.is_some())
            + usize::from(self.properties.is_some())
            + usize::from(self.items.is_some())
            + usize::from(!self.required.is_empty());

        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry("type", self.kind.as_str())?;
        if let Some(description) = &self.description {
            map.serialize_entry("description", description)?;
        }
        if let Some(properties) = &self.properties {
            map.serialize_entry("properties", &OrderedProperties(properties))?;
        }
        if let Some(items) = &self.items {
            map.serialize_entry("items", items.as_ref())?;
        }
        if !self.required.is_empty() {
            map.serialize_entry("required", &self.required)?;
        }
        map.end()
    }
}

struct OrderedProperties<'a>(&'a [(String, SchemaNode)]);

impl Serialize for OrderedProperties<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, node) in self.0 {
            map.serialize_entry(name, node)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_serializes_with_properties_key() {
        let node = SchemaNode::object(Vec::new());
        let rendered = serde_json::to_string(&node).unwrap();
        assert_eq!(rendered, r#"{"type":"object","properties":{}}"#);
    }

    #[test]
    fn property_order_is_preserved() {
        let node = SchemaNode::object(vec![
            (
                "zulu".to_owned(),
                SchemaNode::leaf(SchemaKind::String).with_description("String parameter"),
            ),
            ("alpha".to_owned(), SchemaNode::leaf(SchemaKind::Integer)),
        ])
        .with_required(vec!["zulu".to_owned(), "alpha".to_owned()]);

        let rendered = serde_json::to_string(&node).unwrap();
        let zulu = rendered.find("zulu").unwrap();
        let alpha = rendered.find("alpha").unwrap();
        assert!(zulu < alpha, "declaration order lost: {rendered}");
        assert!(rendered.contains(r#""required":["zulu","alpha"]"#));
    }

    #[test]
    fn required_omitted_when_empty() {
        let node = SchemaNode::object(vec![(
            "param1".to_owned(),
            SchemaNode::leaf(SchemaKind::String),
        )]);
        let rendered = serde_json::to_string(&node).unwrap();
        assert!(!rendered.contains("required"));
    }

    #[test]
    fn array_node_nests_items() {
        let node = SchemaNode::array(SchemaNode::leaf(SchemaKind::Integer))
            .with_description("Array parameter");
        let rendered = serde_json::to_value(&node).unwrap();
        assert_eq!(rendered["type"], "array");
        assert_eq!(rendered["items"]["type"], "integer");
    }
}
