//! Foreign package ecosystems whose manifests can be converted.

use crate::converter::{SemverConverter, VersionConverter};

/// A supported asset ecosystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetType {
    Npm,
    Bower,
}

static SEMVER_CONVERTER: SemverConverter = SemverConverter;

impl AssetType {
    /// Short ecosystem name, also used as the prefix of VCS repository types
    pub fn name(&self) -> &'static str {
        match self {
            AssetType::Npm => "npm",
            AssetType::Bower => "bower",
        }
    }

    /// Vendor namespace the converted packages live under
    pub fn composer_vendor_name(&self) -> &'static str {
        match self {
            AssetType::Npm => "npm-asset",
            AssetType::Bower => "bower-asset",
        }
    }

    /// Composer package type of converted packages
    pub fn composer_type(&self) -> &'static str {
        match self {
            AssetType::Npm => "npm-asset-library",
            AssetType::Bower => "bower-asset-library",
        }
    }

    /// Manifest file name of the ecosystem
    pub fn filename(&self) -> &'static str {
        match self {
            AssetType::Npm => "package.json",
            AssetType::Bower => "bower.json",
        }
    }

    /// Type of the side repositories created for VCS dependencies
    pub fn vcs_repository_type(&self) -> String {
        format!("{}-vcs", self.name())
    }

    pub fn version_converter(&self) -> &'static dyn VersionConverter {
        &SEMVER_CONVERTER
    }

    /// Prefix a dependency name with the vendor namespace unless it already has it
    pub fn format_composer_name(&self, name: &str) -> String {
        let vendor = self.composer_vendor_name();
        match name.strip_prefix(vendor) {
            Some(rest) if rest.starts_with('/') => name.to_string(),
            _ => format!("{}/{}", vendor, name),
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "npm" => Some(AssetType::Npm),
            "bower" => Some(AssetType::Bower),
            _ => None,
        }
    }
}

impl std::fmt::Display for AssetType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
