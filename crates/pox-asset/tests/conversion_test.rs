/// Integration tests for manifest conversion
///
/// These tests convert complete package.json and bower.json documents and
/// check the resulting Composer packages and side repositories.

use pox_asset::{AssetConfig, AssetError, AssetType, PackageConverter};
use serde_json::{json, Value};

fn convert(asset_type: AssetType, manifest: Value) -> (Value, Vec<Value>) {
    let converted = PackageConverter::new(asset_type, &AssetConfig::default())
        .convert(&manifest)
        .unwrap();
    let repositories = converted
        .repositories
        .iter()
        .map(|repository| serde_json::to_value(repository).unwrap())
        .collect();

    (Value::Object(converted.composer), repositories)
}

#[test]
fn test_dependency_map() {
    let (composer, repositories) = convert(AssetType::Npm, json!({"dependencies": {"lib1": "^1.2.0"}}));

    assert_eq!(composer["require"], json!({"npm-asset/lib1": ">=1.2.0,<2.0.0"}));
    assert!(repositories.is_empty());
}

#[test]
fn test_npm_package() {
    let manifest = json!({
        "name": "@acme/widgets",
        "version": "2.1.0-beta.3",
        "description": "Widgets",
        "keywords": ["ui"],
        "homepage": "https://widgets.example.com",
        "license": "MIT",
        "author": "Jane Doe <jane@example.com> (https://jane.example.com)",
        "contributors": [{"name": "Joe", "email": "joe@example.com"}],
        "bin": {"widgets": "bin/widgets.js"},
        "main": "index.js",
        "engines": {"node": ">=14"},
        "optionalDependencies": {"fsevents": "^2.0.0"},
        "dist": {"tarball": "https://registry.example.com/widgets-2.1.0-beta.3.tgz", "shasum": "0123abcd"},
        "dependencies": {
            "react": "^16.8.0 || ^17.0.0",
            "lodash": "4.x",
            "left-pad": "https://example.com/left-pad-1.3.0.tar.gz",
            "icons": "git+https://github.com/acme/icons.git#v3.0.0"
        },
        "devDependencies": {
            "jest": "~26.6.3",
            "eslint": ">= 7.0.0 < 8"
        }
    });

    let (composer, repositories) = convert(AssetType::Npm, manifest);

    assert_eq!(composer["name"], "npm-asset/acme--widgets");
    assert_eq!(composer["type"], "npm-asset-library");
    assert_eq!(composer["version"], "2.1.0-beta.3");
    assert_eq!(composer["license"], "MIT");
    assert_eq!(
        composer["authors"],
        json!([
            {"name": "Jane Doe", "email": "jane@example.com", "homepage": "https://jane.example.com"},
            {"name": "Joe", "email": "joe@example.com"}
        ])
    );
    assert_eq!(composer["bin"], json!(["bin/widgets.js"]));
    assert_eq!(
        composer["dist"],
        json!({"type": "tar", "url": "https://registry.example.com/widgets-2.1.0-beta.3.tgz", "shasum": "0123abcd"})
    );

    assert_eq!(
        composer["require"],
        json!({
            "npm-asset/react": ">=16.8.0,<17.0.0|>=17.0.0,<18.0.0",
            "npm-asset/lodash": "dev-4.x|4.x",
            "npm-asset/acme--widgets-left-pad-file": "*",
            "npm-asset/icons": "3.0.0"
        })
    );
    assert_eq!(composer["require-dev"], json!({"npm-asset/jest": "~26.6.3", "npm-asset/eslint": ">=7.0.0,<8"}));

    assert_eq!(composer["extra"]["npm-asset-main"], "index.js");
    assert_eq!(composer["extra"]["npm-asset-engines"], json!({"node": ">=14"}));
    assert_eq!(composer["extra"]["npm-asset-optional-dependencies"], json!({"fsevents": "^2.0.0"}));

    assert_eq!(
        repositories,
        vec![
            json!({
                "type": "package",
                "package": {
                    "name": "npm-asset/acme--widgets-left-pad-file",
                    "type": "npm-asset-library",
                    "version": "1.3.0",
                    "dist": {"url": "https://example.com/left-pad-1.3.0.tar.gz", "type": "file"}
                }
            }),
            json!({"type": "npm-vcs", "url": "git+https://github.com/acme/icons.git", "name": "npm-asset/icons"}),
        ]
    );
}

#[test]
fn test_bower_package() {
    let manifest = json!({
        "name": "dashboard",
        "version": "v0.3.0",
        "main": "dist/dashboard.js",
        "private": true,
        "dependencies": {
            "jquery": "jquery#~2.1",
            "bootstrap": "twbs/bootstrap#3.3.7",
            "moment": "#f4a2c3d",
            "chart": "https://gitlab.com/acme/chart.git#develop"
        }
    });

    let (composer, repositories) = convert(AssetType::Bower, manifest);

    assert_eq!(composer["name"], "bower-asset/dashboard");
    assert_eq!(composer["version"], "v0.3.0");
    assert_eq!(
        composer["require"],
        json!({
            "bower-asset/jquery": "~2.1",
            "bower-asset/twbs/bootstrap-3.3.7": "3.3.7",
            "bower-asset/moment": "dev-default#f4a2c3d",
            "bower-asset/chart": "dev-develop"
        })
    );
    assert_eq!(composer["extra"], json!({"bower-asset-main": "dist/dashboard.js", "bower-asset-private": true}));
    assert_eq!(
        repositories,
        vec![json!({"type": "bower-vcs", "url": "https://gitlab.com/acme/chart.git", "name": "bower-asset/chart"})]
    );
}

#[test]
fn test_configured_resolutions_and_hosts() {
    let composer_json = json!({
        "name": "acme/app",
        "extra": {
            "asset": {
                "resolutions": {"jquery": "2.2.4"},
                "vcs-hosts": ["code.acme.dev"]
            }
        }
    });
    let config = AssetConfig::from_composer_json(&composer_json).unwrap();
    let converter = PackageConverter::new(AssetType::Npm, &config);

    let converted = converter
        .convert(&json!({
            "name": "app",
            "dependencies": {
                "jquery": "^3.0.0",
                "tools": "https://code.acme.dev/acme/tools#1.0.0"
            }
        }))
        .unwrap();

    let composer = Value::Object(converted.composer);
    assert_eq!(composer["require"], json!({"npm-asset/jquery": "2.2.4", "npm-asset/tools": "1.0.0"}));
    assert_eq!(converted.repositories.len(), 1);
    assert_eq!(converted.repositories[0].repo_type, "npm-vcs");
}

#[test]
fn test_unparsable_constraint_fails_conversion() {
    let err = PackageConverter::new(AssetType::Npm, &AssetConfig::default())
        .convert(&json!({"dependencies": {"lib": ">=1.0 ?!"}}))
        .unwrap_err();

    assert!(matches!(err, AssetError::InvalidConstraint { .. }));
    assert!(err.to_string().contains("npm-asset/lib"));
}
