// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::DEFAULT_MAX_REWRITE_ROUNDS;
use crate::engine::ResultType;
use crate::errors::ConfigError;
use crate::observability::messages::{config::ConfigLoaded, StructuredLog};
use regex::Regex;
use serde::{Deserialize, Deserializer};
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

/// Configuration for a [`SexpProcessor`](crate::engine::SexpProcessor).
///
/// Every field has a default, so a config file only needs the options it
/// changes. The engine copies this struct at construction; later changes go
/// through `SexpProcessor::config_mut`.
///
/// # Fields
/// * `default_handler` - Tag whose handler runs when no specific handler matches
/// * `warn_on_default` - Log a warning each time the default handler is used
/// * `auto_shift_tag` - Remove the tag before invoking a non-default handler
/// * `excluded_tags` - Tags that must never be processed
/// * `debug_trace` - Tag to regex; matching nodes are logged before and after processing
/// * `strict` - Fail on tags without a handler instead of walking them generically
/// * `expected` - Required type of every handler result
/// * `require_empty` - Handlers must consume every element they receive
/// * `field_accessors` - Tag to field names installed before dispatch
/// * `capture_original` - Snapshot every node before dispatch for error reports
/// * `max_rewrite_rounds` - Cap on rewriter chaining for a single node
///
/// # Example
/// ```yaml
/// default_handler: dummy
/// warn_on_default: false
/// auto_shift_tag: true
/// strict: false
/// expected: sexp
/// excluded_tags: [alloca, cfunc]
/// debug_trace:
///   call: "puts"
/// field_accessors:
///   call: [receiver, name, args]
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProcessorConfig {
    pub default_handler: Option<String>,
    pub warn_on_default: bool,
    pub auto_shift_tag: bool,
    pub excluded_tags: BTreeSet<String>,
    pub debug_trace: HashMap<String, TracePattern>,
    pub strict: bool,
    pub expected: ResultType,
    pub require_empty: bool,
    pub field_accessors: HashMap<String, Vec<String>>,
    pub capture_original: bool,
    pub max_rewrite_rounds: usize,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            default_handler: None,
            warn_on_default: true,
            auto_shift_tag: false,
            excluded_tags: BTreeSet::new(),
            debug_trace: HashMap::new(),
            strict: false,
            expected: ResultType::Sexp,
            require_empty: true,
            field_accessors: HashMap::new(),
            capture_original: false,
            max_rewrite_rounds: DEFAULT_MAX_REWRITE_ROUNDS,
        }
    }
}

impl ProcessorConfig {
    /// Preset for engines that evaluate trees instead of transforming them:
    /// any result type is accepted and handlers may leave input behind.
    pub fn interpreter() -> Self {
        Self {
            expected: ResultType::Any,
            require_empty: false,
            ..Self::default()
        }
    }

    pub fn with_default_handler(mut self, tag: impl Into<String>) -> Self {
        self.default_handler = Some(tag.into());
        self
    }

    pub fn with_excluded(mut self, tag: impl Into<String>) -> Self {
        self.excluded_tags.insert(tag.into());
        self
    }

    pub fn with_fields(mut self, tag: impl Into<String>, fields: &[&str]) -> Self {
        self.field_accessors
            .insert(tag.into(), fields.iter().map(|f| f.to_string()).collect());
        self
    }

    /// Adds a debug trace entry, compiling `pattern` as a regex.
    pub fn with_debug_trace(
        mut self,
        tag: impl Into<String>,
        pattern: &str,
    ) -> Result<Self, ConfigError> {
        let tag = tag.into();
        let regex = Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
            tag: tag.clone(),
            source,
        })?;
        self.debug_trace.insert(tag, TracePattern(regex));
        Ok(self)
    }
}

/// A compiled debug trace pattern.
#[derive(Debug, Clone)]
pub struct TracePattern(Regex);

impl TracePattern {
    pub fn is_match(&self, rendered: &str) -> bool {
        self.0.is_match(rendered)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl<'de> Deserialize<'de> for TracePattern {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let pattern = String::deserialize(deserializer)?;
        Regex::new(&pattern)
            .map(TracePattern)
            .map_err(serde::de::Error::custom)
    }
}

/// On-disk format of a config file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigFormat {
    Yaml,
    Toml,
    Json,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();
        match extension {
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "toml" => Ok(ConfigFormat::Toml),
            "json" => Ok(ConfigFormat::Json),
            other => Err(ConfigError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Parse a config from text in the given format
pub fn parse_config(content: &str, format: ConfigFormat) -> Result<ProcessorConfig, ConfigError> {
    let cfg = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(content)?,
        ConfigFormat::Toml => toml::from_str(content)?,
        ConfigFormat::Json => serde_json::from_str(content)?,
    };
    Ok(cfg)
}

/// Load a config from a YAML, TOML or JSON file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ProcessorConfig, ConfigError> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;
    let content = fs::read_to_string(path)?;
    let cfg = parse_config(&content, format)?;

    ConfigLoaded {
        path: &path.display().to_string(),
        format,
        strict: cfg.strict,
        excluded_count: cfg.excluded_tags.len(),
    }
    .log();

    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_empty_yaml_uses_defaults() {
        let cfg = parse_config("{}", ConfigFormat::Yaml).unwrap();

        assert_eq!(cfg.default_handler, None);
        assert!(cfg.warn_on_default);
        assert!(!cfg.auto_shift_tag);
        assert!(!cfg.strict);
        assert!(cfg.require_empty);
        assert_eq!(cfg.expected, ResultType::Sexp);
        assert_eq!(cfg.max_rewrite_rounds, DEFAULT_MAX_REWRITE_ROUNDS);
    }

    #[test]
    fn parse_full_yaml_config() {
        let yaml = r#"
default_handler: dummy
warn_on_default: false
auto_shift_tag: true
strict: true
expected: any
require_empty: false
excluded_tags: [alloca, cfunc]
debug_trace:
  call: "puts"
field_accessors:
  call: [receiver, name, args]
"#;

        let cfg = parse_config(yaml, ConfigFormat::Yaml).unwrap();
        assert_eq!(cfg.default_handler.as_deref(), Some("dummy"));
        assert!(!cfg.warn_on_default);
        assert!(cfg.auto_shift_tag);
        assert!(cfg.strict);
        assert_eq!(cfg.expected, ResultType::Any);
        assert!(!cfg.require_empty);
        assert!(cfg.excluded_tags.contains("alloca"));
        assert!(cfg.excluded_tags.contains("cfunc"));
        assert!(cfg.debug_trace["call"].is_match("s(:call, nil, :puts)"));
        assert_eq!(cfg.field_accessors["call"], vec!["receiver", "name", "args"]);
    }

    #[test]
    fn parse_toml_and_json_configs() {
        let toml = r#"
strict = true
expected = "integer"
excluded_tags = ["alloca"]

[field_accessors]
call = ["lhs", "name", "rhs"]
"#;
        let cfg = parse_config(toml, ConfigFormat::Toml).unwrap();
        assert!(cfg.strict);
        assert_eq!(cfg.expected, ResultType::Integer);
        assert_eq!(cfg.field_accessors["call"].len(), 3);

        let json = r#"{"default_handler": "dummy", "debug_trace": {"lit": "\\d+"}}"#;
        let cfg = parse_config(json, ConfigFormat::Json).unwrap();
        assert_eq!(cfg.default_handler.as_deref(), Some("dummy"));
        assert_eq!(cfg.debug_trace["lit"].as_str(), "\\d+");
    }

    #[test]
    fn parse_rejects_invalid_trace_pattern() {
        let yaml = r#"
debug_trace:
  call: "(unclosed"
"#;
        assert!(matches!(
            parse_config(yaml, ConfigFormat::Yaml),
            Err(ConfigError::Yaml(_))
        ));

        match ProcessorConfig::default().with_debug_trace("call", "(unclosed") {
            Err(ConfigError::InvalidPattern { tag, .. }) => assert_eq!(tag, "call"),
            other => panic!("expected InvalidPattern, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_config_format_from_path_table_driven() {
        struct TestCase {
            path: &'static str,
            expected: Option<ConfigFormat>,
        }

        let test_cases = vec![
            TestCase { path: "engine.yaml", expected: Some(ConfigFormat::Yaml) },
            TestCase { path: "engine.yml", expected: Some(ConfigFormat::Yaml) },
            TestCase { path: "engine.toml", expected: Some(ConfigFormat::Toml) },
            TestCase { path: "engine.json", expected: Some(ConfigFormat::Json) },
            TestCase { path: "engine.ini", expected: None },
            TestCase { path: "engine", expected: None },
        ];

        for case in test_cases {
            let result = ConfigFormat::from_path(Path::new(case.path)).ok();
            assert_eq!(result, case.expected, "path: {}", case.path);
        }
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "strict: true\nexcluded_tags: [cfunc]").unwrap();

        let cfg = load_config(file.path()).unwrap();
        assert!(cfg.strict);
        assert!(cfg.excluded_tags.contains("cfunc"));
    }

    #[test]
    fn test_load_config_missing_file() {
        assert!(matches!(
            load_config("does/not/exist.yaml"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_builder_helpers() {
        let cfg = ProcessorConfig::interpreter()
            .with_default_handler("dummy")
            .with_excluded("cfunc")
            .with_fields("call", &["lhs", "name", "rhs"])
            .with_debug_trace("lit", "1")
            .unwrap();

        assert_eq!(cfg.expected, ResultType::Any);
        assert!(!cfg.require_empty);
        assert_eq!(cfg.default_handler.as_deref(), Some("dummy"));
        assert!(cfg.excluded_tags.contains("cfunc"));
        assert_eq!(cfg.field_accessors["call"], vec!["lhs", "name", "rhs"]);
        assert!(cfg.debug_trace["lit"].is_match("s(:lit, 1)"));
    }
}
