//! Classification of a single dependency specifier.
//!
//! A manifest dependency value is one of:
//! - a URL (VCS repository or downloadable archive), optionally suffixed by `#ref`
//! - a GitHub-style alias `name#version`
//! - a commit pin `#sha`
//! - a branch name
//! - a range expression
//!
//! URLs produce a [`SideRepository`] that the caller registers next to the
//! converted package. Everything else only rewrites the dependency name and
//! version string; range translation happens afterwards.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::asset_type::AssetType;
use crate::converter::has_wildcard;
use crate::validation::{validate_branch, validate_tag};
use crate::vcs::VcsHosts;

/// File extensions of archives that are downloaded rather than cloned
pub const ARCHIVE_EXTENSIONS: [&str; 8] = [".zip", ".tar", ".tar.gz", ".tar.bz2", ".tar.Z", ".tar.xz", ".bz2", ".gz"];

lazy_static! {
    static ref URL_RE: Regex = Regex::new(r"://|@").unwrap();
    static ref FULL_SHA_RE: Regex = Regex::new(r"[0-9a-f]{40}$").unwrap();
    static ref COMMIT_RE: Regex = Regex::new(r"^[0-9a-f]{4,40}$").unwrap();
    static ref URL_VERSION_RE: Regex = Regex::new(r"(\d+)(\.\d+)(\.\d+)?(\.\d+)?").unwrap();
    static ref RANGE_CHARS_RE: Regex = Regex::new(r"[<>=^~ ]").unwrap();
}

/// Repository record produced for URL dependencies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideRepository {
    /// `<asset>-vcs` for VCS repositories, `package` for archives
    #[serde(rename = "type")]
    pub repo_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<PackageStub>,
}

impl SideRepository {
    /// VCS repository holding the dependency
    pub fn vcs(asset_type: AssetType, url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            repo_type: asset_type.vcs_repository_type(),
            url: Some(url.into()),
            name: Some(name.into()),
            package: None,
        }
    }

    /// Inline package repository for a single archive
    pub fn package(package: PackageStub) -> Self {
        Self {
            repo_type: "package".to_string(),
            url: None,
            name: None,
            package: Some(package),
        }
    }
}

/// Synthesized package descriptor of an archive dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageStub {
    pub name: String,

    #[serde(rename = "type")]
    pub package_type: String,

    pub version: String,

    pub dist: FileDist,
}

/// Download location of an archive dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDist {
    pub url: String,

    #[serde(rename = "type")]
    pub dist_type: String,
}

impl FileDist {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            dist_type: "file".to_string(),
        }
    }
}

/// Dependency after classification, before range translation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDependency {
    pub name: String,
    pub version: String,
    pub repository: Option<SideRepository>,
}

/// Resolves raw dependency specifiers of one asset type
pub struct DependencyResolver {
    asset_type: AssetType,
    vcs_hosts: VcsHosts,
}

impl DependencyResolver {
    /// Resolver recognizing the built-in VCS hosts
    pub fn new(asset_type: AssetType) -> Self {
        Self::with_vcs_hosts(asset_type, VcsHosts::default())
    }

    pub fn with_vcs_hosts(asset_type: AssetType, vcs_hosts: VcsHosts) -> Self {
        Self { asset_type, vcs_hosts }
    }

    pub fn asset_type(&self) -> AssetType {
        self.asset_type
    }

    /// Classify `raw_version` of dependency `name`.
    ///
    /// `composer_name` is the composer name of the package declaring the
    /// dependency; it prefixes the names of synthesized archive packages.
    pub fn resolve(&self, name: &str, raw_version: &str, composer_name: Option<&str>) -> ResolvedDependency {
        let (name, version, repository) = self.check_url(name, raw_version, composer_name);
        let (name, version) = self.check_alias(name, version);
        let version = self.classify(&name, &version);

        ResolvedDependency { name, version, repository }
    }

    fn check_url(&self, name: &str, version: &str, composer_name: Option<&str>) -> (String, String, Option<SideRepository>) {
        if !URL_RE.is_match(version) {
            return (name.to_string(), version.to_string(), None);
        }

        let (url, tail) = match version.find('#') {
            Some(pos) => version.split_at(pos),
            None => (version, "#"),
        };

        if !is_archive_url(url) {
            if let Some(host) = self.vcs_hosts.find(url) {
                log::debug!("Dependency {} points to a {} repository at {}", name, host, url);
                let repository = SideRepository::vcs(self.asset_type, url, self.asset_type.format_composer_name(name));
                return (name.to_string(), tail.to_string(), Some(repository));
            }
        }

        let file_name = self.file_dependency_name(name, composer_name);
        let package = PackageStub {
            name: self.asset_type.format_composer_name(&file_name),
            package_type: self.asset_type.composer_type().to_string(),
            version: self.file_dependency_version(url, tail),
            dist: FileDist::new(url),
        };
        log::debug!("Dependency {} is downloaded as {} from {}", name, package.name, url);

        (file_name, tail.to_string(), Some(SideRepository::package(package)))
    }

    fn file_dependency_name(&self, name: &str, composer_name: Option<&str>) -> String {
        let vendor = self.asset_type.composer_vendor_name();
        let prefix = match composer_name {
            Some(composer_name) => {
                let own_name = composer_name
                    .strip_prefix(vendor)
                    .and_then(|rest| rest.strip_prefix('/'))
                    .unwrap_or(composer_name);
                format!("{}-", own_name)
            }
            None => String::new(),
        };

        format!("{}{}-file", prefix, name)
    }

    fn file_dependency_version(&self, url: &str, tail: &str) -> String {
        if tail != "#" {
            return tail.trim_start_matches('#').to_string();
        }

        match URL_VERSION_RE.find(url) {
            Some(found) => self.asset_type.version_converter().convert_version(Some(found.as_str())),
            None => "0.0.0.0".to_string(),
        }
    }

    fn check_alias(&self, name: String, version: String) -> (String, String) {
        let pos = match version.find('#') {
            Some(pos) if pos > 0 && !FULL_SHA_RE.is_match(&version) => pos,
            _ => return (name, version),
        };

        let (alias, reference) = version.split_at(pos);
        let tag = &reference[1..];
        let mut dependency = alias.to_string();

        if !has_wildcard(tag) && validate_tag(tag, self.asset_type).is_some() {
            dependency.push('-');
            dependency.push_str(tag);
        }
        log::debug!("Dependency {} is an alias of {} at {}", name, alias, tag);

        (dependency, reference.to_string())
    }

    fn classify(&self, name: &str, version: &str) -> String {
        let contains_hash = version.contains('#');
        let version = version.replace('#', "");
        let version = match version.trim() {
            "" => "*",
            trimmed => trimmed,
        };

        if contains_hash && COMMIT_RE.is_match(version) {
            log::debug!("Dependency {} is pinned at commit {}", name, version);
            return format!("dev-default#{}", version);
        }

        let search_version: String = version.chars().filter(|&c| !matches!(c, ' ' | '<' | '>' | '=' | '^' | '~')).collect();
        if version == "*" || validate_tag(&search_version, self.asset_type).is_some() || RANGE_CHARS_RE.is_match(version) {
            return version.to_string();
        }

        let mut branch = format!("dev-{}", self.asset_type.version_converter().convert_version(Some(version)));
        if validate_branch(version).is_none() {
            branch.push_str(" || ");
            branch.push_str(version);
        }
        log::debug!("Dependency {} requires branch {}", name, branch);

        branch
    }
}

/// Check if the URL ends with a known archive extension
pub fn is_archive_url(url: &str) -> bool {
    ARCHIVE_EXTENSIONS.iter().any(|extension| url.ends_with(extension))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(name: &str, version: &str) -> ResolvedDependency {
        DependencyResolver::new(AssetType::Npm).resolve(name, version, None)
    }

    #[test]
    fn test_commit_pin() {
        let resolved = resolve("lib", "#abc1234");
        assert_eq!(resolved.name, "lib");
        assert_eq!(resolved.version, "dev-default#abc1234");
        assert_eq!(resolved.repository, None);
    }

    #[test]
    fn test_ranges_and_tags_pass_through() {
        assert_eq!(resolve("lib", "^1.2.0").version, "^1.2.0");
        assert_eq!(resolve("lib", ">= 1.0 < 2.0").version, ">= 1.0 < 2.0");
        assert_eq!(resolve("lib", "1.2.3").version, "1.2.3");
        assert_eq!(resolve("lib", "v1.2.3-beta.1").version, "v1.2.3-beta.1");
        assert_eq!(resolve("lib", "").version, "*");
        assert_eq!(resolve("lib", "  ").version, "*");
        assert_eq!(resolve("lib", "*").version, "*");
    }

    #[test]
    fn test_branches() {
        assert_eq!(resolve("lib", "feature").version, "dev-feature");
        assert_eq!(resolve("lib", "1.x").version, "dev-1.x || 1.x");
    }

    #[test]
    fn test_archive_url() {
        let resolved = resolve("lib", "https://example.com/dist/lib-1.2.3.tar.gz");
        assert_eq!(resolved.name, "lib-file");
        assert_eq!(resolved.version, "*");

        let repository = resolved.repository.unwrap();
        assert_eq!(repository.repo_type, "package");
        let package = repository.package.unwrap();
        assert_eq!(package.name, "npm-asset/lib-file");
        assert_eq!(package.package_type, "npm-asset-library");
        assert_eq!(package.version, "1.2.3");
        assert_eq!(package.dist.dist_type, "file");
        assert_eq!(package.dist.url, "https://example.com/dist/lib-1.2.3.tar.gz");
    }

    #[test]
    fn test_archive_url_with_version() {
        let resolver = DependencyResolver::new(AssetType::Bower);
        let resolved = resolver.resolve("lib", "https://example.com/lib.zip#2.0.0", Some("bower-asset/app"));
        assert_eq!(resolved.name, "app-lib-file");
        assert_eq!(resolved.version, "2.0.0");

        let package = resolved.repository.unwrap().package.unwrap();
        assert_eq!(package.name, "bower-asset/app-lib-file");
        assert_eq!(package.version, "2.0.0");
    }

    #[test]
    fn test_unknown_host_becomes_file() {
        let resolved = resolve("lib", "https://example.com/owner/repo");
        assert_eq!(resolved.name, "lib-file");

        let package = resolved.repository.unwrap().package.unwrap();
        assert_eq!(package.version, "0.0.0.0");
    }

    #[test]
    fn test_vcs_url() {
        let resolved = resolve("lib", "git+https://github.com/owner/repo.git#v1.0.0");
        assert_eq!(resolved.name, "lib");
        assert_eq!(resolved.version, "v1.0.0");
        assert_eq!(
            resolved.repository,
            Some(SideRepository::vcs(AssetType::Npm, "git+https://github.com/owner/repo.git", "npm-asset/lib"))
        );

        let resolved = resolve("lib", "git@gitlab.com:owner/repo.git");
        assert_eq!(resolved.version, "*");
        assert_eq!(resolved.repository.unwrap().repo_type, "npm-vcs");
    }

    #[test]
    fn test_configured_vcs_host() {
        let resolver = DependencyResolver::with_vcs_hosts(AssetType::Npm, VcsHosts::with_hosts(["code.example.com"]));
        let resolved = resolver.resolve("lib", "https://code.example.com/owner/repo#develop", None);
        assert_eq!(resolved.name, "lib");
        assert_eq!(resolved.version, "dev-develop");
        assert_eq!(resolved.repository.unwrap().url.as_deref(), Some("https://code.example.com/owner/repo"));
    }

    #[test]
    fn test_alias() {
        let resolved = resolve("jquery-old", "jquery#1.8.3");
        assert_eq!(resolved.name, "jquery-1.8.3");
        assert_eq!(resolved.version, "1.8.3");

        let resolved = resolve("lib", "owner/repo#develop");
        assert_eq!(resolved.name, "owner/repo");
        assert_eq!(resolved.version, "dev-develop");
    }

    #[test]
    fn test_is_archive_url() {
        assert!(is_archive_url("https://example.com/a.tar.xz"));
        assert!(is_archive_url("https://example.com/a.tar.Z"));
        assert!(!is_archive_url("https://example.com/a.tar.z"));
        assert!(!is_archive_url("https://example.com/a.git"));
    }

    #[test]
    fn test_side_repository_json() {
        let repository = SideRepository::vcs(AssetType::Bower, "https://github.com/o/r", "bower-asset/r");
        assert_eq!(
            serde_json::to_value(&repository).unwrap(),
            serde_json::json!({"type": "bower-vcs", "url": "https://github.com/o/r", "name": "bower-asset/r"})
        );
    }
}
