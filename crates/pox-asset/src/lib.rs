//! npm and bower assets as Composer packages
//!
//! This crate translates npm/bower semver versions and ranges into Composer
//! constraints, classifies dependency specifiers (URLs, aliases, commit pins,
//! branches) and converts whole `package.json`/`bower.json` manifests into
//! Composer package documents.

pub mod asset_type;
pub mod config;
pub mod converter;
pub mod dependency;
pub mod error;
pub mod package;
pub mod validation;
pub mod vcs;

pub use asset_type::AssetType;
pub use config::AssetConfig;
pub use converter::{convert_range, convert_version, expand_caret, SemverConverter, VersionConverter};
pub use dependency::{DependencyResolver, ResolvedDependency, SideRepository};
pub use error::{AssetError, Result};
pub use package::{ConvertedPackage, PackageConverter};
pub use vcs::{is_known_vcs_host, VcsHostMatcher, VcsHosts};
