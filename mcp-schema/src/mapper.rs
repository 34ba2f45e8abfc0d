//! Shape-to-schema mapping.

use crate::fieldtag::FieldTag;
use crate::node::{SchemaKind, SchemaNode};
use crate::shape::{CompositeShape, TypeShape};
use crate::vocabulary::SchemaVocabulary;

/// Maps native [`TypeShape`]s into [`SchemaNode`] trees.
///
/// Mapping is a total function: there is no error path. Shapes the mapper
/// cannot express become a generic object node carrying the vocabulary's
/// complex-parameter description, so registration never fails on an exotic
/// parameter type.
#[derive(Clone, Debug, Default)]
pub struct TypeMapper {
    vocabulary: SchemaVocabulary,
}

impl TypeMapper {
    /// Creates a mapper using the supplied vocabulary.
    #[must_use]
    pub const fn new(vocabulary: SchemaVocabulary) -> Self {
        Self { vocabulary }
    }

    /// Returns the vocabulary in use.
    #[must_use]
    pub const fn vocabulary(&self) -> &SchemaVocabulary {
        &self.vocabulary
    }

    /// Maps a shape into its schema node.
    #[must_use]
    pub fn map(&self, shape: &TypeShape) -> SchemaNode {
        match shape {
            TypeShape::String => SchemaNode::leaf(SchemaKind::String)
                .with_description(self.vocabulary.string_param()),
            TypeShape::Integer => SchemaNode::leaf(SchemaKind::Integer)
                .with_description(self.vocabulary.integer_param()),
            TypeShape::Float => SchemaNode::leaf(SchemaKind::Number)
                .with_description(self.vocabulary.number_param()),
            TypeShape::Boolean => SchemaNode::leaf(SchemaKind::Boolean)
                .with_description(self.vocabulary.boolean_param()),
            TypeShape::Sequence(element) => SchemaNode::array(self.map(element))
                .with_description(self.vocabulary.array_param()),
            // Unwrap one level; null/absent stays compatible via coercion.
            TypeShape::Optional(inner) => self.map(inner),
            TypeShape::Composite(composite) => self.map_composite(composite),
            TypeShape::Opaque => SchemaNode::object(Vec::new())
                .with_description(self.vocabulary.complex_param()),
        }
    }

    fn map_composite(&self, composite: &CompositeShape) -> SchemaNode {
        let mut properties = Vec::with_capacity(composite.fields().len());
        let mut required = Vec::new();

        for field in composite.fields() {
            let Some(property) = field.property_name() else {
                continue;
            };

            let mut node = self.map(field.shape());
            if let Some(raw) = field.raw_tag() {
                let tag = FieldTag::parse(raw);
                if let Some(description) = tag.description {
                    node = node.with_description(description);
                }
                if tag.required {
                    required.push(property.to_owned());
                }
            }

            properties.push((property.to_owned(), node));
        }

        SchemaNode::object(properties).with_required(required)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shape::FieldShape;

    #[test]
    fn scalars_carry_vocabulary_descriptions() {
        let mapper = TypeMapper::default();

        let node = mapper.map(&TypeShape::String);
        assert_eq!(node.kind(), SchemaKind::String);
        assert_eq!(node.description(), Some("String parameter"));

        let node = mapper.map(&TypeShape::Integer);
        assert_eq!(node.kind(), SchemaKind::Integer);
        assert_eq!(node.description(), Some("Integer parameter"));

        let node = mapper.map(&TypeShape::Float);
        assert_eq!(node.kind(), SchemaKind::Number);

        let node = mapper.map(&TypeShape::Boolean);
        assert_eq!(node.kind(), SchemaKind::Boolean);
    }

    #[test]
    fn vocabulary_overrides_apply() {
        let mapper = TypeMapper::new(SchemaVocabulary::default().with_string("Free-form text"));
        let node = mapper.map(&TypeShape::String);
        assert_eq!(node.description(), Some("Free-form text"));
    }

    #[test]
    fn sequences_map_recursively() {
        let mapper = TypeMapper::default();
        let shape = TypeShape::Sequence(Box::new(TypeShape::Sequence(Box::new(
            TypeShape::Integer,
        ))));

        let node = mapper.map(&shape);
        assert_eq!(node.kind(), SchemaKind::Array);
        let inner = node.items().unwrap();
        assert_eq!(inner.kind(), SchemaKind::Array);
        assert_eq!(inner.items().unwrap().kind(), SchemaKind::Integer);
    }

    #[test]
    fn optional_unwraps_one_level() {
        let mapper = TypeMapper::default();
        let node = mapper.map(&TypeShape::Optional(Box::new(TypeShape::Integer)));
        assert_eq!(node.kind(), SchemaKind::Integer);
    }

    #[test]
    fn opaque_degrades_to_complex_object() {
        let mapper = TypeMapper::default();
        let node = mapper.map(&TypeShape::Opaque);
        assert_eq!(node.kind(), SchemaKind::Object);
        assert_eq!(node.description(), Some("Complex parameter"));
    }

    #[test]
    fn composite_applies_aliases_tags_and_required() {
        let mapper = TypeMapper::default();
        let shape = TypeShape::Composite(
            CompositeShape::new("SearchRequest")
                .field(
                    FieldShape::new("keyword", TypeShape::String)
                        .tag("desc=Search keyword,required"),
                )
                .field(
                    FieldShape::new("max_results", TypeShape::Integer)
                        .alias("maxResults")
                        .tag("desc=Upper bound on hits"),
                )
                .field(FieldShape::new("internal", TypeShape::String).alias("-")),
        );

        let node = mapper.map(&shape);
        assert_eq!(node.kind(), SchemaKind::Object);

        let properties = node.properties().unwrap();
        assert_eq!(properties.len(), 2);
        assert_eq!(properties[0].0, "keyword");
        assert_eq!(properties[1].0, "maxResults");

        assert_eq!(
            node.property("keyword").unwrap().description(),
            Some("Search keyword")
        );
        assert_eq!(
            node.property("maxResults").unwrap().description(),
            Some("Upper bound on hits")
        );
        assert_eq!(node.required(), ["keyword"]);
    }

    #[test]
    fn untagged_composite_field_keeps_vocabulary_description() {
        let mapper = TypeMapper::default();
        let shape = TypeShape::Composite(
            CompositeShape::new("Page").field(FieldShape::new("offset", TypeShape::Integer)),
        );

        let node = mapper.map(&shape);
        assert_eq!(
            node.property("offset").unwrap().description(),
            Some("Integer parameter")
        );
        assert!(node.required().is_empty());
    }
}
