use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::npm;
use crate::asset_type::AssetType;
use crate::config::AssetConfig;
use crate::dependency::{DependencyResolver, SideRepository};
use crate::error::{AssetError, Result};
use crate::validation::validate_constraint;

/// Manifest keys copied as they are
const COPIED_KEYS: [&str; 5] = ["description", "keywords", "homepage", "license", "time"];

/// npm manifest keys moved under `extra`
const NPM_EXTRAS: [(&str, &str); 17] = [
    ("bugs", "npm-asset-bugs"),
    ("files", "npm-asset-files"),
    ("main", "npm-asset-main"),
    ("man", "npm-asset-man"),
    ("directories", "npm-asset-directories"),
    ("repository", "npm-asset-repository"),
    ("scripts", "npm-asset-scripts"),
    ("config", "npm-asset-config"),
    ("bundledDependencies", "npm-asset-bundled-dependencies"),
    ("optionalDependencies", "npm-asset-optional-dependencies"),
    ("engines", "npm-asset-engines"),
    ("engineStrict", "npm-asset-engine-strict"),
    ("os", "npm-asset-os"),
    ("cpu", "npm-asset-cpu"),
    ("preferGlobal", "npm-asset-prefer-global"),
    ("private", "npm-asset-private"),
    ("publishConfig", "npm-asset-publish-config"),
];

/// bower manifest keys moved under `extra`
const BOWER_EXTRAS: [(&str, &str); 3] = [
    ("main", "bower-asset-main"),
    ("ignore", "bower-asset-ignore"),
    ("private", "bower-asset-private"),
];

/// Dependency sections and the Composer link types they become
const DEPENDENCY_SECTIONS: [(&str, &str); 2] = [("dependencies", "require"), ("devDependencies", "require-dev")];

/// Result of a manifest conversion
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedPackage {
    /// The Composer package document
    pub composer: Map<String, Value>,

    /// Repositories the URL dependencies of the package live in
    pub repositories: Vec<SideRepository>,
}

/// Converts `package.json`/`bower.json` manifests into Composer packages
pub struct PackageConverter {
    asset_type: AssetType,
    resolver: DependencyResolver,
    resolutions: IndexMap<String, String>,
}

impl PackageConverter {
    pub fn new(asset_type: AssetType, config: &AssetConfig) -> Self {
        Self {
            asset_type,
            resolver: DependencyResolver::with_vcs_hosts(asset_type, config.vcs_host_registry()),
            resolutions: config.resolutions.clone(),
        }
    }

    pub fn asset_type(&self) -> AssetType {
        self.asset_type
    }

    /// Convert a manifest
    pub fn convert(&self, manifest: &Value) -> Result<ConvertedPackage> {
        let data = manifest.as_object().ok_or_else(|| AssetError::InvalidManifest {
            message: format!("{} must be a JSON object", self.asset_type.filename()),
        })?;

        let mut composer = Map::new();

        if let Some(name) = present(data, "name") {
            let name = name.as_str().ok_or_else(|| invalid("name must be a string"))?;
            let name = match self.asset_type {
                AssetType::Npm => npm::convert_name(name),
                AssetType::Bower => name.to_string(),
            };
            composer.insert("name".to_string(), Value::String(self.asset_type.format_composer_name(&name)));
        }

        composer.insert("type".to_string(), Value::String(self.asset_type.composer_type().to_string()));

        if let Some(version) = present(data, "version") {
            let version = version.as_str().ok_or_else(|| invalid("version must be a string"))?;
            let version = self.asset_type.version_converter().convert_version(Some(version));
            composer.insert("version".to_string(), Value::String(version));
        }

        for key in COPIED_KEYS {
            if let Some(value) = present(data, key) {
                composer.insert(key.to_string(), value.clone());
            }
        }

        if self.asset_type == AssetType::Npm {
            let authors = npm::convert_authors(present(data, "author"), present(data, "contributors"));
            if !authors.is_empty() {
                composer.insert("authors".to_string(), serde_json::to_value(authors)?);
            }
        }

        if let Some(bin) = present(data, "bin") {
            let bin = match bin {
                Value::Array(_) => bin.clone(),
                Value::Object(entries) => Value::Array(entries.values().cloned().collect()),
                other => Value::Array(vec![other.clone()]),
            };
            composer.insert("bin".to_string(), bin);
        }

        if self.asset_type == AssetType::Npm {
            if let Some(dist) = present(data, "dist").and_then(npm::convert_dist) {
                composer.insert("dist".to_string(), dist);
            }
        }

        let composer_name = composer.get("name").and_then(Value::as_str).map(str::to_string);
        let mut repositories = Vec::new();

        for (asset_key, composer_key) in DEPENDENCY_SECTIONS {
            let Some(section) = present(data, asset_key) else {
                continue;
            };
            let dependencies = section
                .as_object()
                .ok_or_else(|| invalid(&format!("{} must be an object", asset_key)))?;

            let (links, section_repositories) = self.convert_dependencies(dependencies, composer_name.as_deref())?;
            repositories.extend(section_repositories);
            composer.insert(composer_key.to_string(), serde_json::to_value(links)?);
        }

        let extras = match self.asset_type {
            AssetType::Npm => &NPM_EXTRAS[..],
            AssetType::Bower => &BOWER_EXTRAS[..],
        };
        let mut extra = Map::new();
        for (asset_key, extra_key) in extras {
            if let Some(value) = present(data, asset_key) {
                extra.insert(extra_key.to_string(), value.clone());
            }
        }
        if !extra.is_empty() {
            composer.insert("extra".to_string(), Value::Object(extra));
        }

        Ok(ConvertedPackage { composer, repositories })
    }

    /// Convert one dependency section into Composer links.
    ///
    /// Every translated constraint must parse in Composer's grammar, otherwise
    /// the conversion fails with [`AssetError::InvalidConstraint`].
    pub fn convert_dependencies(
        &self,
        dependencies: &Map<String, Value>,
        composer_name: Option<&str>,
    ) -> Result<(IndexMap<String, String>, Vec<SideRepository>)> {
        let converter = self.asset_type.version_converter();
        let mut links = IndexMap::new();
        let mut repositories = Vec::new();

        for (dependency, value) in dependencies {
            let raw_version = match self.resolutions.get(dependency) {
                Some(resolution) => {
                    log::debug!("Using resolution {} for dependency {}", resolution, dependency);
                    resolution.as_str()
                }
                None => match value {
                    Value::String(version) => version.as_str(),
                    Value::Null => "",
                    _ => return Err(invalid(&format!("version of dependency {} must be a string", dependency))),
                },
            };

            let name = match self.asset_type {
                AssetType::Npm => npm::convert_name(dependency),
                AssetType::Bower => dependency.clone(),
            };

            let resolved = self.resolver.resolve(&name, raw_version, composer_name);
            let link_name = format!("{}/{}", self.asset_type.composer_vendor_name(), resolved.name);
            let constraint = converter.convert_range(&resolved.version);

            if let Err(atom) = validate_constraint(&constraint) {
                log::debug!("Constraint {} of {} does not parse at \"{}\"", constraint, link_name, atom);
                return Err(AssetError::InvalidConstraint {
                    dependency: link_name,
                    constraint,
                });
            }

            repositories.extend(resolved.repository);
            links.insert(link_name, constraint);
        }

        Ok((links, repositories))
    }
}

/// Value of a key, treating `null` as absent
fn present<'a>(data: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    data.get(key).filter(|value| !value.is_null())
}

fn invalid(message: &str) -> AssetError {
    AssetError::InvalidManifest {
        message: message.to_string(),
    }
}
