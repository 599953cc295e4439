use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const VARIANT_PLACEHOLDER: &str = "{{variant}}";
pub const VERSION_PLACEHOLDER: &str = "{{version}}";

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([^}]*?)\s*\}\}").expect("static regex"));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unknown placeholder '{{{{{placeholder}}}}}' in file name pattern '{template}'")]
    UnknownPlaceholder { template: String, placeholder: String },
    #[error("file name pattern is empty")]
    Empty,
}

/// A release asset file name with `{{variant}}` and `{{version}}` holes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Template(String);

impl Template {
    pub fn new(pattern: impl Into<String>) -> Result<Self, TemplateError> {
        let pattern = pattern.into();
        if pattern.trim().is_empty() {
            return Err(TemplateError::Empty);
        }
        for caps in PLACEHOLDER_RE.captures_iter(&pattern) {
            let name = &caps[1];
            if name != "variant" && name != "version" {
                return Err(TemplateError::UnknownPlaceholder {
                    template: pattern.clone(),
                    placeholder: name.to_string(),
                });
            }
        }
        Ok(Self(pattern))
    }

    /// Turn a concrete asset name into a pattern.
    ///
    /// The extended name is replaced before the plain one since it contains it.
    /// Only the first occurrence of each literal is substituted.
    pub fn abstract_from(asset_name: &str, variant_names: &[&str], version: &str) -> Option<Self> {
        let mut pattern = asset_name.to_string();
        for name in variant_names {
            if pattern.contains(name) {
                pattern = pattern.replacen(name, VARIANT_PLACEHOLDER, 1);
                break;
            }
        }
        if !version.is_empty() {
            pattern = pattern.replacen(version, VERSION_PLACEHOLDER, 1);
        }
        Self::new(pattern).ok()
    }

    pub fn render(&self, variant: &str, version: &str) -> String {
        self.0
            .replace(VARIANT_PLACEHOLDER, variant)
            .replace(VERSION_PLACEHOLDER, version)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Template {
    type Error = TemplateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Template> for String {
    fn from(value: Template) -> Self {
        value.0
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_both_placeholders() {
        let t = Template::new("{{variant}}_{{version}}_Linux-64bit.tar.gz").unwrap();
        assert_eq!(t.render("hugo", "0.54.0"), "hugo_0.54.0_Linux-64bit.tar.gz");
        assert_eq!(
            t.render("hugo_extended", "0.54.0"),
            "hugo_extended_0.54.0_Linux-64bit.tar.gz"
        );
    }

    #[test]
    fn pattern_without_placeholders_renders_verbatim() {
        let t = Template::new("checksums.txt").unwrap();
        assert_eq!(t.render("hugo", "0.1.0"), "checksums.txt");
    }

    #[test]
    fn rejects_unknown_placeholders_and_empty() {
        assert_eq!(
            Template::new("{{os}}_{{version}}.zip"),
            Err(TemplateError::UnknownPlaceholder {
                template: "{{os}}_{{version}}.zip".into(),
                placeholder: "os".into(),
            })
        );
        assert_eq!(Template::new("  "), Err(TemplateError::Empty));
    }

    #[test]
    fn abstracts_extended_before_plain_name() {
        let names = ["hugo_extended", "hugo"];
        let ext =
            Template::abstract_from("hugo_extended_0.80.0_Linux-64bit.tar.gz", &names, "0.80.0")
                .unwrap();
        let plain =
            Template::abstract_from("hugo_0.80.0_Linux-64bit.tar.gz", &names, "0.80.0").unwrap();
        assert_eq!(ext, plain);
        assert_eq!(ext.as_str(), "{{variant}}_{{version}}_Linux-64bit.tar.gz");
    }

    #[test]
    fn deserializes_through_validation() {
        let ok: Template = serde_json::from_str("\"{{variant}}_{{version}}.zip\"").unwrap();
        assert_eq!(ok.as_str(), "{{variant}}_{{version}}.zip");
        assert!(serde_json::from_str::<Template>("\"{{arch}}.zip\"").is_err());
    }
}
