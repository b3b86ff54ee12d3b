//! npm specific manifest helpers.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

lazy_static! {
    // "Name <email> (url)", each part optional
    static ref AUTHOR_RE: Regex = Regex::new(r"^\s*([^<(]*?)\s*(?:<([^>]*)>)?\s*(?:\(([^)]*)\))?\s*$").unwrap();
}

/// Package author in Composer's format
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
}

/// Convert a scoped npm name (`@scope/pkg`) into a vendor-safe one (`scope--pkg`)
pub fn convert_name(name: &str) -> String {
    match name.strip_prefix('@') {
        Some(scoped) if scoped.contains('/') => scoped.replace('/', "--"),
        _ => name.to_string(),
    }
}

/// Inverse of [`convert_name`]
pub fn revert_name(name: &str) -> String {
    if name.contains("--") {
        format!("@{}", name.replace("--", "/"))
    } else {
        name.to_string()
    }
}

/// Parse an author given as `Name <email> (url)`
pub fn parse_author(value: &str) -> Option<Author> {
    let caps = AUTHOR_RE.captures(value)?;
    let part = |i: usize| {
        caps.get(i)
            .map(|m| m.as_str().trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let name = part(1)?;
    Some(Author {
        name: Some(name),
        email: part(2),
        homepage: part(3),
    })
}

/// Convert an npm person, either a string or an object with `name`, `email`
/// and `url`
pub fn convert_author(value: &Value) -> Option<Author> {
    match value {
        Value::String(s) => parse_author(s),
        Value::Object(person) => {
            let field = |key: &str| person.get(key).and_then(Value::as_str).map(str::to_string);
            let author = Author {
                name: field("name"),
                email: field("email"),
                homepage: field("url").or_else(|| field("homepage")),
            };
            if author.name.is_some() {
                Some(author)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Merge `author` and `contributors` into one author list
pub fn convert_authors(author: Option<&Value>, contributors: Option<&Value>) -> Vec<Author> {
    let mut authors: Vec<Author> = author.and_then(convert_author).into_iter().collect();

    if let Some(Value::Array(contributors)) = contributors {
        authors.extend(contributors.iter().filter_map(convert_author));
    }

    authors
}

/// Convert the registry `dist` object into a Composer dist
pub fn convert_dist(value: &Value) -> Option<Value> {
    let entries = value.as_object()?;
    let mut dist = Map::new();

    for (key, url) in entries {
        let Some(url) = url.as_str() else {
            continue;
        };
        let url = match url.strip_prefix("http://") {
            Some(rest) => format!("https://{}", rest),
            None => url.to_string(),
        };

        match key.as_str() {
            "shasum" => {
                dist.insert("shasum".to_string(), Value::String(url));
            }
            "tarball" => {
                dist.insert("type".to_string(), Value::String("tar".to_string()));
                dist.insert("url".to_string(), Value::String(url));
            }
            _ => {}
        }
    }

    if dist.is_empty() {
        None
    } else {
        Some(Value::Object(dist))
    }
}
