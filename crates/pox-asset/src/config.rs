use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AssetError, Result};
use crate::vcs::VcsHosts;

/// Asset conversion settings, read from `extra.asset` of the root composer.json
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct AssetConfig {
    /// Version strings replacing the declared ones, by dependency name
    pub resolutions: IndexMap<String, String>,

    /// Additional hosts serving VCS repositories
    pub vcs_hosts: Vec<String>,
}

impl AssetConfig {
    pub fn from_composer_json(composer: &Value) -> Result<Self> {
        let section = match composer.get("extra").and_then(|extra| extra.get("asset")) {
            Some(section) => section,
            None => return Ok(AssetConfig::default()),
        };

        if !section.is_object() {
            return Err(AssetError::Config("extra.asset must be an object".to_string()));
        }

        serde_json::from_value(section.clone())
            .map_err(|e| AssetError::Config(format!("Invalid extra.asset section: {}", e)))
    }

    /// Resolution configured for a dependency
    pub fn resolution(&self, dependency: &str) -> Option<&str> {
        self.resolutions.get(dependency).map(String::as_str)
    }

    /// Built-in VCS matchers plus the configured hosts
    pub fn vcs_host_registry(&self) -> VcsHosts {
        VcsHosts::with_hosts(self.vcs_hosts.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_section() {
        let config = AssetConfig::from_composer_json(&json!({"name": "acme/app"})).unwrap();
        assert_eq!(config, AssetConfig::default());
    }

    #[test]
    fn test_read_section() {
        let composer = json!({
            "extra": {
                "asset": {
                    "resolutions": {"jquery": "2.2.4"},
                    "vcs-hosts": ["code.example.com"]
                }
            }
        });

        let config = AssetConfig::from_composer_json(&composer).unwrap();
        assert_eq!(config.resolution("jquery"), Some("2.2.4"));
        assert_eq!(config.resolution("lodash"), None);
        assert!(config.vcs_host_registry().is_known("https://code.example.com/o/r"));
    }

    #[test]
    fn test_partial_section() {
        let composer = json!({"extra": {"asset": {"vcs-hosts": ["git.example.org"]}}});
        let config = AssetConfig::from_composer_json(&composer).unwrap();
        assert!(config.resolutions.is_empty());
        assert_eq!(config.vcs_hosts, vec!["git.example.org".to_string()]);
    }

    #[test]
    fn test_invalid_section() {
        let err = AssetConfig::from_composer_json(&json!({"extra": {"asset": []}})).unwrap_err();
        assert!(matches!(err, AssetError::Config(_)));

        let err = AssetConfig::from_composer_json(&json!({"extra": {"asset": {"resolutions": ["x"]}}})).unwrap_err();
        assert!(matches!(err, AssetError::Config(_)));
    }
}
