//! Field-parameter tag parsing.

/// Parsed form of a field-parameter tag.
///
/// The grammar is a comma-separated token list; the recognized forms are
/// `desc=<text>` and the literal `required`. Unknown tokens are ignored
/// rather than rejected, matching the lenient reference behavior, so parsing
/// is total over arbitrary input.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldTag {
    /// Description applied to the property's schema node.
    pub description: Option<String>,
    /// Whether the property joins the object schema's `required` set.
    pub required: bool,
}

impl FieldTag {
    /// Parses a raw tag string.
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        let mut parsed = Self::default();

        for token in tag.split(',') {
            let token = token.trim();
            if token == "required" {
                parsed.required = true;
            } else if let Some(description) = token.strip_prefix("desc=") {
                parsed.description = Some(description.to_owned());
            }
        }

        parsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_description_and_required() {
        let tag = FieldTag::parse("desc=Search keyword,required");
        assert_eq!(tag.description.as_deref(), Some("Search keyword"));
        assert!(tag.required);
    }

    #[test]
    fn tokens_are_trimmed() {
        let tag = FieldTag::parse(" desc=Max results , required ");
        assert_eq!(tag.description.as_deref(), Some("Max results"));
        assert!(tag.required);
    }

    #[test]
    fn unknown_tokens_are_ignored() {
        let tag = FieldTag::parse("desc=Limit,deprecated,min=1");
        assert_eq!(tag.description.as_deref(), Some("Limit"));
        assert!(!tag.required);
    }

    #[test]
    fn empty_tag_is_default() {
        assert_eq!(FieldTag::parse(""), FieldTag::default());
    }

    #[test]
    fn parsing_is_idempotent_over_rendered_forms() {
        // Parsing the same input twice always yields the same result.
        let input = "required,desc=Query text";
        assert_eq!(FieldTag::parse(input), FieldTag::parse(input));
    }
}
