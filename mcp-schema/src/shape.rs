//! Native type shapes describing tool parameters.

use serde_json::{Map, Value};

/// Structural description of a native parameter type.
///
/// Shapes are declared once at registration time and drive both directions of
/// the engine: forward into [`SchemaNode`](crate::SchemaNode) trees for the
/// published descriptor, and backward when raw JSON arguments are coerced
/// into native values.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeShape {
    /// UTF-8 string.
    String,
    /// Signed integer of any width.
    Integer,
    /// Floating-point number.
    Float,
    /// Boolean flag.
    Boolean,
    /// Homogeneous sequence of the element shape.
    Sequence(Box<TypeShape>),
    /// Optional wrapper; `null` and absence are compatible with the inner shape.
    Optional(Box<TypeShape>),
    /// Record with named fields.
    Composite(CompositeShape),
    /// Anything the mapper cannot express; degrades to a generic object.
    Opaque,
}

impl TypeShape {
    /// Returns the value a parameter of this shape assumes when its argument
    /// is absent from the invocation map.
    #[must_use]
    pub fn zero_value(&self) -> Value {
        match self {
            Self::String => Value::String(String::new()),
            Self::Integer => Value::from(0_i64),
            Self::Float => Value::from(0.0_f64),
            Self::Boolean => Value::Bool(false),
            Self::Sequence(_) => Value::Array(Vec::new()),
            Self::Optional(_) | Self::Opaque => Value::Null,
            Self::Composite(composite) => composite.zero_value(),
        }
    }

    /// Returns `true` for the composite variant.
    #[must_use]
    pub const fn is_composite(&self) -> bool {
        matches!(self, Self::Composite(_))
    }
}

/// Shape of a record type: an ordered list of named fields.
#[derive(Clone, Debug, PartialEq)]
pub struct CompositeShape {
    name: String,
    fields: Vec<FieldShape>,
}

impl CompositeShape {
    /// Creates a composite shape with the given type name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    /// Appends a field, preserving declaration order.
    #[must_use]
    pub fn field(mut self, field: FieldShape) -> Self {
        self.fields.push(field);
        self
    }

    /// Returns the composite type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the fields in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[FieldShape] {
        &self.fields
    }

    /// Builds the zero value: every exported field set to its own zero.
    #[must_use]
    pub fn zero_value(&self) -> Value {
        let mut object = Map::new();
        for field in &self.fields {
            if let Some(property) = field.property_name() {
                object.insert(property.to_owned(), field.shape().zero_value());
            }
        }
        Value::Object(object)
    }
}

/// A single field of a [`CompositeShape`].
#[derive(Clone, Debug, PartialEq)]
pub struct FieldShape {
    ident: String,
    alias: Option<String>,
    tag: Option<String>,
    shape: TypeShape,
}

impl FieldShape {
    /// Creates a field from its identifier and shape.
    #[must_use]
    pub fn new(ident: impl Into<String>, shape: TypeShape) -> Self {
        Self {
            ident: ident.into(),
            alias: None,
            tag: None,
            shape,
        }
    }

    /// Sets the serialization alias. An alias of `-` marks the field as not
    /// exported.
    #[must_use]
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Attaches a field-parameter tag (`desc=<text>`, `required`).
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Returns the field identifier.
    #[must_use]
    pub fn ident(&self) -> &str {
        &self.ident
    }

    /// Returns the raw field-parameter tag, if any.
    #[must_use]
    pub fn raw_tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Returns the field shape.
    #[must_use]
    pub const fn shape(&self) -> &TypeShape {
        &self.shape
    }

    /// Resolves the JSON property name: the alias when present, the identifier
    /// otherwise. Returns `None` when the alias is `-` (field not exported).
    #[must_use]
    pub fn property_name(&self) -> Option<&str> {
        match self.alias.as_deref() {
            Some("-") => None,
            Some(alias) => Some(alias),
            None => Some(&self.ident),
        }
    }
}
