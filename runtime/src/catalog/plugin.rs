//! Catalog fragments loaded from JSON plugin files.
//!
//! A fragment looks like:
//!
//! ```json
//! {
//!   "categories": {
//!     "Gardening": ["https://www.rhs.org.uk"],
//!     "Cars": { "kind": "hobby", "urls": ["https://www.caranddriver.com"] }
//!   },
//!   "personas": {
//!     "gardener": ["Gardening", "Hobbies"]
//!   }
//! }
//! ```
//!
//! Every entry is validated on its own. A bad entry is logged and dropped;
//! it never poisons the rest of the file, and a bad file never aborts
//! startup.

use super::types::{Category, CategoryKind, ContentGroup};
use crate::error::CatalogError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Validated content of one plugin file.
#[derive(Debug, Default, Clone)]
pub struct CatalogFragment {
    /// Where the fragment came from (file path or test label).
    pub source: String,
    pub categories: Vec<Category>,
    pub personas: Vec<PersonaDecl>,
}

/// Persona declared by a fragment. Category names are checked at merge time.
#[derive(Debug, Clone, PartialEq)]
pub struct PersonaDecl {
    pub name: String,
    pub description: String,
    pub categories: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CategoryEntry {
    Urls(Vec<String>),
    Detailed {
        #[serde(default = "default_kind")]
        kind: CategoryKind,
        urls: Vec<String>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PersonaEntry {
    Categories(Vec<String>),
    Detailed {
        #[serde(default)]
        description: String,
        categories: Vec<String>,
    },
}

fn default_kind() -> CategoryKind {
    CategoryKind::News
}

/// Default plugin directory: `~/.chaff/plugins`.
pub fn default_plugin_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join(".chaff")
        .join("plugins")
}

/// Accept only absolute http(s) URLs with a host.
pub fn is_valid_target(raw: &str) -> bool {
    match url::Url::parse(raw) {
        Ok(u) => matches!(u.scheme(), "http" | "https") && u.host_str().is_some(),
        Err(_) => false,
    }
}

/// Parse and validate fragment text.
///
/// Only a JSON syntax error fails the whole fragment; structural problems
/// in individual entries are skipped with a warning.
pub fn parse_fragment(source: &str, text: &str) -> Result<CatalogFragment, CatalogError> {
    let root: serde_json::Value =
        serde_json::from_str(text).map_err(|e| CatalogError::Parse {
            path: source.to_string(),
            source: e,
        })?;

    let mut fragment = CatalogFragment {
        source: source.to_string(),
        ..Default::default()
    };

    let Some(root) = root.as_object() else {
        warn!("plugin {source}: top level is not an object, ignoring");
        return Ok(fragment);
    };

    if let Some(categories) = root.get("categories") {
        match categories.as_object() {
            Some(map) => {
                for (name, value) in map {
                    if let Some(category) = parse_category(source, name, value) {
                        fragment.categories.push(category);
                    }
                }
            }
            None => warn!("plugin {source}: \"categories\" is not an object"),
        }
    }

    if let Some(personas) = root.get("personas") {
        match personas.as_object() {
            Some(map) => {
                for (name, value) in map {
                    match serde_json::from_value::<PersonaEntry>(value.clone()) {
                        Ok(entry) if !name.trim().is_empty() => {
                            let (description, categories) = match entry {
                                PersonaEntry::Categories(c) => (String::new(), c),
                                PersonaEntry::Detailed {
                                    description,
                                    categories,
                                } => (description, categories),
                            };
                            fragment.personas.push(PersonaDecl {
                                name: name.trim().to_string(),
                                description,
                                categories,
                            });
                        }
                        Ok(_) => warn!("plugin {source}: persona with empty name skipped"),
                        Err(e) => warn!("plugin {source}: persona {name} malformed: {e}"),
                    }
                }
            }
            None => warn!("plugin {source}: \"personas\" is not an object"),
        }
    }

    Ok(fragment)
}

fn parse_category(source: &str, name: &str, value: &serde_json::Value) -> Option<Category> {
    let name = name.trim();
    if name.is_empty() {
        warn!("plugin {source}: category with empty name skipped");
        return None;
    }

    let (kind, urls) = match serde_json::from_value::<CategoryEntry>(value.clone()) {
        Ok(CategoryEntry::Urls(urls)) => (default_kind(), urls),
        Ok(CategoryEntry::Detailed { kind, urls }) => (kind, urls),
        Err(e) => {
            warn!("plugin {source}: category {name} malformed: {e}");
            return None;
        }
    };

    let total = urls.len();
    let urls: Vec<String> = urls.into_iter().filter(|u| is_valid_target(u)).collect();
    if urls.len() < total {
        warn!(
            "plugin {source}: category {name} dropped {} invalid url(s)",
            total - urls.len()
        );
    }
    if urls.is_empty() {
        warn!("plugin {source}: category {name} has no usable urls, skipped");
        return None;
    }

    Some(Category {
        name: name.to_string(),
        kind,
        group: ContentGroup::Plugin,
        urls,
    })
}

/// Read and parse a single plugin file.
pub fn load_fragment(path: &Path) -> Result<CatalogFragment, CatalogError> {
    let text = std::fs::read_to_string(path).map_err(|e| CatalogError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    parse_fragment(&path.display().to_string(), &text)
}

/// Load every `*.json` file in `dir`, in file-name order.
///
/// A missing directory yields no fragments. Unreadable or unparsable files
/// are logged and skipped.
pub fn load_dir(dir: &Path) -> Vec<CatalogFragment> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("no plugin directory at {}: {e}", dir.display());
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().map(|ext| ext == "json").unwrap_or(false))
        .collect();
    paths.sort();

    let mut fragments = Vec::with_capacity(paths.len());
    for path in paths {
        match load_fragment(&path) {
            Ok(fragment) => fragments.push(fragment),
            Err(e) => warn!("skipping plugin: {e}"),
        }
    }
    fragments
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_list_and_detailed_categories() {
        let text = r#"{
            "categories": {
                "Gardening": ["https://www.rhs.org.uk", "https://garden.org"],
                "Cars": {"kind": "hobby", "urls": ["https://www.caranddriver.com"]}
            }
        }"#;
        let fragment = parse_fragment("test", text).unwrap();
        assert_eq!(fragment.categories.len(), 2);

        let cars = fragment
            .categories
            .iter()
            .find(|c| c.name == "Cars")
            .unwrap();
        assert_eq!(cars.kind, CategoryKind::Hobby);
        assert_eq!(cars.group, ContentGroup::Plugin);

        let gardening = fragment
            .categories
            .iter()
            .find(|c| c.name == "Gardening")
            .unwrap();
        assert_eq!(gardening.kind, CategoryKind::News);
        assert_eq!(gardening.urls.len(), 2);
    }

    #[test]
    fn test_malformed_entries_skipped() {
        let text = r#"{
            "categories": {
                "Broken": 42,
                "BadUrls": ["not a url", "ftp://example.com/file"],
                "Mixed": ["javascript:alert(1)", "https://ok.example.com"]
            },
            "personas": {
                "bad": {"nope": true},
                "gardener": ["Mixed"]
            }
        }"#;
        let fragment = parse_fragment("test", text).unwrap();
        assert_eq!(fragment.categories.len(), 1);
        assert_eq!(fragment.categories[0].name, "Mixed");
        assert_eq!(fragment.categories[0].urls, vec!["https://ok.example.com"]);
        assert_eq!(fragment.personas.len(), 1);
        assert_eq!(fragment.personas[0].name, "gardener");
    }

    #[test]
    fn test_invalid_json_is_error() {
        assert!(parse_fragment("test", "{ not json").is_err());
    }

    #[test]
    fn test_non_object_root_is_empty() {
        let fragment = parse_fragment("test", "[1, 2, 3]").unwrap();
        assert!(fragment.categories.is_empty());
        assert!(fragment.personas.is_empty());
    }

    #[test]
    fn test_load_dir_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();

        let mut good = std::fs::File::create(dir.path().join("a.json")).unwrap();
        writeln!(good, r#"{{"categories": {{"Birding": ["https://www.audubon.org"]}}}}"#).unwrap();

        let mut bad = std::fs::File::create(dir.path().join("b.json")).unwrap();
        writeln!(bad, "{{{{ definitely broken").unwrap();

        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let fragments = load_dir(dir.path());
        assert_eq!(fragments.len(), 1);
        assert_eq!(fragments[0].categories[0].name, "Birding");
    }

    #[test]
    fn test_load_dir_missing() {
        let fragments = load_dir(Path::new("/definitely/not/a/real/dir"));
        assert!(fragments.is_empty());
    }

    #[test]
    fn test_is_valid_target() {
        assert!(is_valid_target("https://example.com/path?q=1"));
        assert!(is_valid_target("http://example.com"));
        assert!(!is_valid_target("example.com"));
        assert!(!is_valid_target("mailto:someone@example.com"));
    }
}
