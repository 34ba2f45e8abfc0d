//! Extraction entry points.

use mcp_schema::{SchemaNode, TypeMapper, TypeShape};
use thiserror::Error;
use tracing::warn;

use crate::callable::{Callable, IntoCallable};
use crate::descriptor::ToolDescriptor;
use crate::service::ToolService;
use crate::tag::ToolTag;

/// Errors raised while extracting a descriptor from a registration target.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The tool name resolved to an empty string.
    #[error("tool name resolved empty for callable `{type_name}`")]
    EmptyName {
        /// Compiler-reported type name of the offending callable.
        type_name: String,
    },
}

/// Produces [`ToolDescriptor`]s from callables and tagged services.
///
/// The scanner owns the [`TypeMapper`] used to generate input schemas, so a
/// custom vocabulary configured on the mapper flows into every descriptor it
/// extracts.
#[derive(Clone, Debug, Default)]
pub struct Scanner {
    mapper: TypeMapper,
}

impl Scanner {
    /// Creates a scanner using the supplied mapper.
    #[must_use]
    pub const fn new(mapper: TypeMapper) -> Self {
        Self { mapper }
    }

    /// Returns the mapper in use.
    #[must_use]
    pub const fn mapper(&self) -> &TypeMapper {
        &self.mapper
    }

    /// Extracts a descriptor from a bare callable.
    ///
    /// The tool name defaults to the callable's type-name segment,
    /// lower-cased; parameters are named `param1..paramN` and all marked
    /// required.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::EmptyName`] when no usable name can be derived
    /// from the callable's type.
    pub fn scan_callable<F, Args>(&self, callable: F) -> Result<ToolDescriptor, ExtractError>
    where
        F: IntoCallable<Args>,
    {
        let callable = callable.into_callable();
        let segment = callable.default_name_segment();
        let name = segment.to_lowercase();
        if name.is_empty() {
            return Err(ExtractError::EmptyName {
                type_name: callable.type_name().to_owned(),
            });
        }

        let description = format!("Auto-generated tool for {segment}");
        self.descriptor(name, description, &ToolTag::default(), callable)
    }

    /// Extracts descriptors from a tagged service.
    ///
    /// One descriptor is produced per member whose tag carries the `tool`
    /// token. When no member is tagged, the scan falls back — all or nothing
    /// — to the service's plain method set, named with bare-callable rules.
    /// A member that fails extraction is skipped with a warning; the rest of
    /// the batch proceeds.
    #[must_use]
    pub fn scan_service<S>(&self, service: &S) -> Vec<ToolDescriptor>
    where
        S: ToolService + ?Sized,
    {
        let mut descriptors = Vec::new();

        for member in service.members() {
            let (ident, tag, callable) = member.into_parts();
            let Some(raw) = tag else { continue };
            let Some(tool_tag) = ToolTag::parse(&raw) else { continue };

            let name = match tool_tag.name.clone() {
                Some(name) => name,
                None => ident.to_lowercase(),
            };
            let description = tool_tag.description.clone().unwrap_or_default();

            match self.descriptor(name, description, &tool_tag, callable) {
                Ok(descriptor) => descriptors.push(descriptor),
                Err(err) => warn!(member = %ident, %err, "skipping tagged member"),
            }
        }

        if !descriptors.is_empty() {
            return descriptors;
        }

        // Backward-compatible fallback: expose every declared method.
        for method in service.methods() {
            let (ident, callable) = method.into_parts();
            let name = ident.to_lowercase();
            let description = format!("Auto-generated tool for method {ident}");

            match self.descriptor(name, description, &ToolTag::default(), callable) {
                Ok(descriptor) => descriptors.push(descriptor),
                Err(err) => warn!(method = %ident, %err, "skipping method"),
            }
        }

        descriptors
    }

    fn descriptor(
        &self,
        name: String,
        description: String,
        tag: &ToolTag,
        callable: Callable,
    ) -> Result<ToolDescriptor, ExtractError> {
        if name.trim().is_empty() {
            return Err(ExtractError::EmptyName {
                type_name: callable.type_name().to_owned(),
            });
        }

        let param_names: Vec<String> = (0..callable.params().len())
            .map(|index| tag.param_name(index))
            .collect();
        let input_schema = self.input_schema(callable.params(), &param_names);

        Ok(ToolDescriptor::new(
            name,
            description,
            input_schema,
            param_names,
            callable,
        ))
    }

    fn input_schema(&self, params: &[TypeShape], names: &[String]) -> SchemaNode {
        let properties = params
            .iter()
            .zip(names)
            .map(|(shape, name)| (name.clone(), self.mapper.map(shape)))
            .collect();

        SchemaNode::object(properties).with_required(names.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mcp_schema::SchemaKind;
    use serde_json::json;

    use crate::service::{ServiceMember, ServiceMethod};

    fn echo(message: String) -> String {
        format!("Echo: {message}")
    }

    fn pick(keyword: String, limit: i64, strict: bool) -> String {
        format!("{keyword}/{limit}/{strict}")
    }

    #[test]
    fn bare_callable_uses_positional_names() {
        let scanner = Scanner::default();
        let descriptor = scanner.scan_callable(pick).unwrap();

        assert_eq!(descriptor.name(), "pick");
        assert_eq!(descriptor.description(), "Auto-generated tool for pick");
        assert_eq!(descriptor.param_names(), ["param1", "param2", "param3"]);

        let schema = descriptor.input_schema();
        assert_eq!(schema.kind(), SchemaKind::Object);
        let properties = schema.properties().unwrap();
        assert_eq!(properties.len(), 3);
        assert_eq!(properties[0].0, "param1");
        assert_eq!(properties[1].0, "param2");
        assert_eq!(properties[2].0, "param3");
        assert_eq!(schema.required(), ["param1", "param2", "param3"]);
    }

    #[test]
    fn zero_arg_callable_has_empty_schema() {
        fn get_time() -> String {
            "12:00".to_owned()
        }

        let scanner = Scanner::default();
        let descriptor = scanner.scan_callable(get_time).unwrap();

        assert_eq!(descriptor.name(), "get_time");
        let schema = descriptor.input_schema();
        assert_eq!(schema.properties().unwrap().len(), 0);
        assert!(schema.required().is_empty());

        let rendered = serde_json::to_value(schema).unwrap();
        assert_eq!(rendered["properties"], json!({}));
        assert!(rendered.get("required").is_none());
    }

    struct Directory;

    impl ToolService for Directory {
        fn members(&self) -> Vec<ServiceMember> {
            vec![
                ServiceMember::new("Echo", echo)
                    .tag("tool;name=echo_message;description=Echo a message;paramNames=message"),
                ServiceMember::new("Search", |keyword: String, limit: i64| {
                    format!("{keyword}:{limit}")
                })
                .tag("tool;description=Search things;paramNames=keyword"),
                ServiceMember::new("Hidden", || "no tag".to_owned()),
            ]
        }

        fn methods(&self) -> Vec<ServiceMethod> {
            vec![ServiceMethod::new("Ignored", || "never scanned".to_owned())]
        }
    }

    #[test]
    fn tagged_members_extract_with_overrides() {
        let scanner = Scanner::default();
        let descriptors = scanner.scan_service(&Directory);

        assert_eq!(descriptors.len(), 2);

        let echo = &descriptors[0];
        assert_eq!(echo.name(), "echo_message");
        assert_eq!(echo.description(), "Echo a message");
        assert_eq!(echo.param_names(), ["message"]);

        // Name falls back to the lower-cased identifier; the second
        // parameter falls back to its positional name.
        let search = &descriptors[1];
        assert_eq!(search.name(), "search");
        assert_eq!(search.description(), "Search things");
        assert_eq!(search.param_names(), ["keyword", "param2"]);
        assert_eq!(search.input_schema().required(), ["keyword", "param2"]);
    }

    #[test]
    fn fallback_is_all_or_nothing() {
        // Tagged members exist, so the method set must not be scanned.
        let scanner = Scanner::default();
        let descriptors = scanner.scan_service(&Directory);
        assert!(descriptors.iter().all(|d| d.name() != "ignored"));
    }

    struct Legacy;

    impl ToolService for Legacy {
        fn methods(&self) -> Vec<ServiceMethod> {
            vec![
                ServiceMethod::new("GetCurrentTime", |format: String| format),
                ServiceMethod::new("GetTimestamp", || 0_i64),
            ]
        }
    }

    #[test]
    fn untagged_service_scans_methods() {
        let scanner = Scanner::default();
        let descriptors = scanner.scan_service(&Legacy);

        assert_eq!(descriptors.len(), 2);
        assert_eq!(descriptors[0].name(), "getcurrenttime");
        assert_eq!(
            descriptors[0].description(),
            "Auto-generated tool for method GetCurrentTime"
        );
        assert_eq!(descriptors[0].param_names(), ["param1"]);
        assert_eq!(descriptors[1].name(), "gettimestamp");
    }

    struct Empty;

    impl ToolService for Empty {}

    #[test]
    fn empty_service_yields_nothing() {
        let scanner = Scanner::default();
        assert!(scanner.scan_service(&Empty).is_empty());
    }
}
