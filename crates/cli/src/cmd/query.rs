//! Query command: load the cache and run one lookup.

use std::process::ExitCode;
use std::sync::Arc;

use vaultdex_core::cache::JsonCache;
use vaultdex_core::cancel::CancelToken;
use vaultdex_core::config::ResolvedConfig;
use vaultdex_core::document::AttrValue;
use vaultdex_core::query::QueryService;

use super::output::{print_document, print_documents};

/// A lookup against the query service.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup {
    Id(String),
    Path(String),
    Basename(String),
    FileClass(String),
    Field { name: String, value: AttrValue },
}

/// Read a command-line value as a YAML scalar, so `1` is an integer and
/// `true` a boolean. Anything that does not parse stays a string.
pub fn parse_value(raw: &str) -> AttrValue {
    if raw.trim().is_empty() {
        return AttrValue::from(raw);
    }
    match serde_yaml::from_str::<serde_yaml::Value>(raw) {
        Ok(value @ (serde_yaml::Value::Mapping(_) | serde_yaml::Value::Tagged(_))) => {
            tracing::debug!(raw, kind = ?value, "structured query value kept as string");
            AttrValue::from(raw)
        }
        Ok(value) => AttrValue::from(value),
        Err(_) => AttrValue::from(raw),
    }
}

pub fn run(rc: &ResolvedConfig, lookup: &Lookup, json: bool) -> ExitCode {
    let cache = Arc::new(JsonCache::new(&rc.cache_dir));
    let service = match QueryService::load(cache, &CancelToken::new()) {
        Ok(service) => service,
        Err(e) => {
            eprintln!("Failed to load cache: {e}");
            return ExitCode::FAILURE;
        }
    };

    if service.is_empty() {
        tracing::warn!(cache_dir = %rc.cache_dir.display(), "cache is empty; run `vdx index` first");
    }

    let single = match lookup {
        Lookup::Id(id) => service.by_id(id),
        Lookup::Path(path) => service.by_path(path),
        Lookup::Basename(name) => {
            print_documents(&service.by_basename(name), json);
            return ExitCode::SUCCESS;
        }
        Lookup::FileClass(class) => {
            print_documents(&service.by_file_class(class), json);
            return ExitCode::SUCCESS;
        }
        Lookup::Field { name, value } => {
            print_documents(&service.by_frontmatter(name, value), json);
            return ExitCode::SUCCESS;
        }
    };

    match single {
        Ok(doc) => {
            print_document(&doc, json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_value_scalars() {
        assert_eq!(parse_value("1"), AttrValue::Int(1));
        assert_eq!(parse_value("1.5"), AttrValue::Float(1.5));
        assert_eq!(parse_value("true"), AttrValue::Bool(true));
        assert_eq!(parse_value("meeting"), AttrValue::from("meeting"));
        assert_eq!(parse_value("2024-01-15"), AttrValue::from("2024-01-15"));
    }

    #[test]
    fn test_parse_value_edge_cases() {
        assert_eq!(parse_value(""), AttrValue::from(""));
        assert_eq!(parse_value("[a, b]"), AttrValue::from(vec!["a", "b"]));
        assert_eq!(parse_value("a: b"), AttrValue::from("a: b"));
        assert_eq!(parse_value("[unclosed"), AttrValue::from("[unclosed"));
    }
}
