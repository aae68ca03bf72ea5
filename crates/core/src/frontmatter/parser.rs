//! Frontmatter parsing from markdown documents.

use std::collections::BTreeMap;
use thiserror::Error;

use crate::document::AttrValue;

/// Errors that can occur during frontmatter parsing.
#[derive(Debug, Error)]
pub enum FrontmatterParseError {
    #[error("invalid YAML frontmatter: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("frontmatter must be a mapping, found {0}")]
    NotAMapping(&'static str),
}

/// Result of splitting frontmatter from markdown.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    /// Parsed frontmatter fields (if a frontmatter block is present).
    pub fields: Option<BTreeMap<String, AttrValue>>,
    /// The markdown body (everything after frontmatter).
    pub body: String,
}

/// Parse frontmatter from markdown content.
///
/// Frontmatter is delimited by `---` at the start of the document:
/// ```markdown
/// ---
/// key: value
/// ---
/// # Document content
/// ```
/// A document without a closing delimiter has no frontmatter.
pub fn parse(content: &str) -> Result<ParsedDocument, FrontmatterParseError> {
    let Some((yaml, body)) = split(content) else {
        return Ok(ParsedDocument { fields: None, body: content.to_string() });
    };

    if yaml.trim().is_empty() {
        return Ok(ParsedDocument { fields: Some(BTreeMap::new()), body: body.to_string() });
    }

    let value: serde_yaml::Value = serde_yaml::from_str(yaml)?;
    let fields = match AttrValue::from(value) {
        AttrValue::Map(map) => map,
        AttrValue::Null => BTreeMap::new(),
        other => return Err(FrontmatterParseError::NotAMapping(other.kind())),
    };

    Ok(ParsedDocument { fields: Some(fields), body: body.to_string() })
}

/// Split `content` into (yaml, body) when it opens with a `---` block.
fn split(content: &str) -> Option<(&str, &str)> {
    let trimmed = content.trim_start();
    let after_open = trimmed.strip_prefix("---")?;
    let after_open = after_open
        .strip_prefix("\r\n")
        .or_else(|| after_open.strip_prefix('\n'))?;

    // Look for --- at the start of a line
    let mut offset = 0;
    for line in after_open.split_inclusive('\n') {
        if line.trim() == "---" {
            let yaml = &after_open[..offset];
            let body = &after_open[offset + line.len()..];
            return Some((yaml, body));
        }
        offset += line.len();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_no_frontmatter() {
        let content = "# Hello\n\nSome content";
        let result = parse(content).unwrap();
        assert!(result.fields.is_none());
        assert_eq!(result.body, content);
    }

    #[test]
    fn parse_simple_frontmatter() {
        let content = "---\ntitle: Hello\n---\n# Content";
        let result = parse(content).unwrap();
        let fields = result.fields.unwrap();
        assert_eq!(fields["title"], AttrValue::from("Hello"));
        assert_eq!(result.body, "# Content");
    }

    #[test]
    fn parse_frontmatter_with_multiple_fields() {
        let content =
            "---\ntitle: Test\ndate: 2024-01-15\npriority: 2\ntags:\n  - rust\n  - cli\n---\n\nBody";
        let result = parse(content).unwrap();
        let fields = result.fields.unwrap();
        assert_eq!(fields["title"], AttrValue::from("Test"));
        assert_eq!(fields["date"], AttrValue::from("2024-01-15"));
        assert_eq!(fields["priority"], AttrValue::Int(2));
        assert_eq!(fields["tags"], AttrValue::from(vec!["rust", "cli"]));
        assert_eq!(result.body, "\nBody");
    }

    #[test]
    fn parse_empty_frontmatter() {
        let content = "---\n---\n# Content";
        let result = parse(content).unwrap();
        assert!(result.fields.unwrap().is_empty());
        assert_eq!(result.body, "# Content");
    }

    #[test]
    fn parse_crlf_frontmatter() {
        let content = "---\r\nfileClass: meeting\r\n---\r\n# Body\r\n";
        let result = parse(content).unwrap();
        assert_eq!(result.fields.unwrap()["fileClass"], AttrValue::from("meeting"));
        assert_eq!(result.body, "# Body\r\n");
    }

    #[test]
    fn parse_unclosed_frontmatter_is_body() {
        let content = "---\ntitle: x\n# never closed";
        let result = parse(content).unwrap();
        assert!(result.fields.is_none());
        assert_eq!(result.body, content);
    }

    #[test]
    fn parse_horizontal_rule_is_not_frontmatter() {
        let content = "----\ntext\n---\n";
        assert!(parse(content).unwrap().fields.is_none());
    }

    #[test]
    fn parse_invalid_yaml_fails() {
        let content = "---\ntitle: [unclosed\n---\n";
        assert!(matches!(parse(content), Err(FrontmatterParseError::InvalidYaml(_))));
    }

    #[test]
    fn parse_scalar_frontmatter_fails() {
        let content = "---\njust a string\n---\n";
        assert!(matches!(parse(content), Err(FrontmatterParseError::NotAMapping("string"))));
    }
}
