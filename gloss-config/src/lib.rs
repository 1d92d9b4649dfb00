//! Shared configuration loader for bib2glossary.
//!
//! `defaults/bib2glossary.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`GlossConfig`].
//!
//! The field-mapping overrides can also come from a standalone JSON object
//! (`{"sort": "sortfield"}`), read with [`read_param2field`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use gloss_babel::formats::MarkupOptions;
use gloss_babel::mapping::MacroKind;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/bib2glossary.default.toml");

/// File picked up from the working directory when present.
pub const LOCAL_CONFIG_FILE: &str = "bib2glossary.toml";

/// Top-level configuration consumed by bib2glossary.
#[derive(Debug, Clone, Deserialize)]
pub struct GlossConfig {
    pub convert: ConvertConfig,
    #[serde(default)]
    pub mapping: MappingConfig,
}

/// Conversion knobs that are not part of the field mapping.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub entry_type: String,
    pub header: String,
    pub strict: bool,
}

impl ConvertConfig {
    /// The header line, `None` when configured empty.
    pub fn header(&self) -> Option<&str> {
        Some(self.header.as_str()).filter(|header| !header.trim().is_empty())
    }
}

impl From<&ConvertConfig> for MarkupOptions {
    fn from(config: &ConvertConfig) -> Self {
        MarkupOptions {
            entry_type: config.entry_type.clone(),
            filter: None,
            header: config.header().map(str::to_string),
        }
    }
}

/// Per-kind overrides of the logical name to BibTeX field table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MappingConfig {
    #[serde(default)]
    pub acronym: BTreeMap<String, String>,
    #[serde(default)]
    pub glossary: BTreeMap<String, String>,
}

impl MappingConfig {
    pub fn overrides(&self, kind: MacroKind) -> &BTreeMap<String, String> {
        match kind {
            MacroKind::Acronym => &self.acronym,
            MacroKind::Glossary => &self.glossary,
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<GlossConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<GlossConfig, ConfigError> {
    Loader::new().build()
}

/// Read a JSON object of `logical name -> field name` overrides.
///
/// Anything but an object whose values are all strings is rejected.
pub fn read_param2field(path: impl AsRef<Path>) -> Result<BTreeMap<String, String>, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Message(format!("cannot read {}: {e}", path.display())))?;
    parse_param2field(&text)
        .map_err(|message| ConfigError::Message(format!("{}: {message}", path.display())))
}

fn parse_param2field(text: &str) -> Result<BTreeMap<String, String>, String> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| format!("invalid JSON: {e}"))?;
    let serde_json::Value::Object(object) = value else {
        return Err("param2field must be a JSON object".to_string());
    };
    object
        .into_iter()
        .map(|(logical, field)| match field {
            serde_json::Value::String(field) => Ok((logical, field)),
            other => Err(format!(
                "field for parameter '{logical}' must be a string, found {other}"
            )),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.convert.entry_type, "misc");
        assert_eq!(config.convert.header(), Some("% Created by bib2glossary"));
        assert!(!config.convert.strict);
        assert!(config.mapping.overrides(MacroKind::Acronym).is_empty());
        assert!(config.mapping.overrides(MacroKind::Glossary).is_empty());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("convert.strict", true)
            .expect("override to apply")
            .set_override("mapping.glossary.sort", "sortfield")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert!(config.convert.strict);
        assert_eq!(
            config.mapping.overrides(MacroKind::Glossary).get("sort"),
            Some(&"sortfield".to_string())
        );
    }

    #[test]
    fn layers_file_over_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(
            file,
            "[convert]\nentry_type = \"glossary\"\nheader = \"\"\n\n[mapping.acronym]\nplural = \"note\""
        )
        .expect("write config");

        let config = Loader::new()
            .with_file(file.path())
            .build()
            .expect("config to build");
        assert_eq!(config.convert.entry_type, "glossary");
        assert_eq!(config.convert.header(), None);
        assert!(!config.convert.strict);
        assert_eq!(
            config.mapping.overrides(MacroKind::Acronym).get("plural"),
            Some(&"note".to_string())
        );
    }

    #[test]
    fn missing_required_file_fails() {
        let result = Loader::new()
            .with_file("/definitely/not/here/bib2glossary.toml")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let config = Loader::new()
            .with_optional_file("/definitely/not/here/bib2glossary.toml")
            .build()
            .expect("config to build");
        assert_eq!(config.convert.entry_type, "misc");
    }

    #[test]
    fn markup_options_from_config() {
        let config = load_defaults().expect("defaults to deserialize");
        let options = MarkupOptions::from(&config.convert);
        assert_eq!(options, MarkupOptions::default());
    }

    #[test]
    fn param2field_object() {
        let parsed = parse_param2field(r#"{"sort": "sortfield", "plural": "note"}"#).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed["sort"], "sortfield");
    }

    #[test]
    fn param2field_rejects_non_objects() {
        assert!(parse_param2field(r#"["sort", "sortfield"]"#).is_err());
        assert!(parse_param2field("not json").is_err());
        let err = parse_param2field(r#"{"sort": 3}"#).unwrap_err();
        assert!(err.contains("'sort'"), "{err}");
    }

    #[test]
    fn param2field_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, r#"{{"sort": "sortfield"}}"#).expect("write json");
        let parsed = read_param2field(file.path()).expect("param2field to load");
        assert_eq!(parsed.get("sort").map(String::as_str), Some("sortfield"));

        let missing = read_param2field("/definitely/not/here.json");
        assert!(matches!(missing, Err(ConfigError::Message(_))));
    }
}
