//! Tool tag grammar.

/// Parsed form of a tool tag.
///
/// The grammar is `tool[;name=<id>][;description=<text>]
/// [;paramNames=<n1>,<n2>,...]` — `;`-separated segments, each trimmed. The
/// literal `tool` token is required and marks the member as an exposed tool.
/// Unknown keys and malformed segments are ignored rather than rejected;
/// parsing is lenient and total, matching the reference behavior.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToolTag {
    /// Override for the tool name; absent (or empty) falls back to the
    /// member identifier.
    pub name: Option<String>,
    /// Human-readable tool description.
    pub description: Option<String>,
    /// Explicit ordered names for the callable's positional parameters.
    /// Parameters beyond the supplied count fall back to `paramN`.
    pub param_names: Vec<String>,
}

impl ToolTag {
    /// Parses a raw tag string. Returns `None` when the `tool` token is
    /// absent, meaning the member is not a tool.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        let mut parsed = Self::default();
        let mut is_tool = false;

        for segment in tag.split(';') {
            let segment = segment.trim();
            if segment == "tool" {
                is_tool = true;
            } else if let Some(name) = segment.strip_prefix("name=") {
                if !name.is_empty() {
                    parsed.name = Some(name.to_owned());
                }
            } else if let Some(description) = segment.strip_prefix("description=") {
                parsed.description = Some(description.to_owned());
            } else if let Some(names) = segment.strip_prefix("paramNames=") {
                if !names.is_empty() {
                    parsed.param_names = names
                        .split(',')
                        .map(|name| name.trim().to_owned())
                        .collect();
                }
            }
        }

        is_tool.then_some(parsed)
    }

    /// Resolves the schema property name for the parameter at `index`:
    /// the explicit name when one was supplied and non-empty, the
    /// 1-indexed `paramN` literal otherwise.
    #[must_use]
    pub fn param_name(&self, index: usize) -> String {
        match self.param_names.get(index) {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("param{}", index + 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_tag_extracts_all_segments() {
        let tag = ToolTag::parse("tool;name=search_users;description=Search users;paramNames=keyword,limit")
            .expect("tool token present");

        assert_eq!(tag.name.as_deref(), Some("search_users"));
        assert_eq!(tag.description.as_deref(), Some("Search users"));
        assert_eq!(tag.param_names, ["keyword", "limit"]);
    }

    #[test]
    fn missing_tool_token_is_not_a_tool() {
        assert_eq!(ToolTag::parse("name=search;description=Nope"), None);
        assert_eq!(ToolTag::parse(""), None);
    }

    #[test]
    fn bare_tool_token_parses_empty() {
        let tag = ToolTag::parse("tool").unwrap();
        assert_eq!(tag, ToolTag::default());
    }

    #[test]
    fn unknown_segments_are_ignored() {
        let tag = ToolTag::parse("tool;name=echo;timeout=5;color=red").unwrap();
        assert_eq!(tag.name.as_deref(), Some("echo"));
        assert!(tag.description.is_none());
    }

    #[test]
    fn param_names_are_trimmed() {
        let tag = ToolTag::parse("tool;paramNames= keyword , limit ").unwrap();
        assert_eq!(tag.param_names, ["keyword", "limit"]);
    }

    #[test]
    fn empty_name_value_falls_back() {
        let tag = ToolTag::parse("tool;name=").unwrap();
        assert_eq!(tag.name, None);
    }

    #[test]
    fn parsing_is_idempotent() {
        let input = "tool;description=Echo a message;paramNames=message";
        assert_eq!(ToolTag::parse(input), ToolTag::parse(input));
    }

    #[test]
    fn param_name_fallback_beyond_supplied_count() {
        let tag = ToolTag::parse("tool;paramNames=keyword").unwrap();
        assert_eq!(tag.param_name(0), "keyword");
        assert_eq!(tag.param_name(1), "param2");
    }
}
