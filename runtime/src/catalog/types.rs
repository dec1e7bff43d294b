//! Catalog value types: categories, personas and the content filter.

use serde::{Deserialize, Serialize};

/// Weight class of a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    News,
    Social,
    Privacy,
    Hobby,
    Issue,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::News => "news",
            CategoryKind::Social => "social",
            CategoryKind::Privacy => "privacy",
            CategoryKind::Hobby => "hobby",
            CategoryKind::Issue => "issue",
        }
    }
}

/// Opt-in group a category belongs to.
///
/// `Core` and `Plugin` categories are always active; the others are
/// switched on through [`ContentFilter`] or by a persona that favors them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentGroup {
    Core,
    Political,
    Tabloids,
    Social,
    Privacy,
    Hobbies,
    Issues,
    Plugin,
}

/// A named cluster of target URLs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub name: String,
    pub kind: CategoryKind,
    pub group: ContentGroup,
    pub urls: Vec<String>,
}

/// A named bias profile over categories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Persona {
    pub name: String,
    pub description: String,
    /// Favored category names, most favored first.
    pub favored: Vec<String>,
}

impl Persona {
    pub fn new(name: &str, description: &str, favored: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            favored: favored.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Whether `category` is in this persona's favored set.
    pub fn favors(&self, category: &str) -> bool {
        self.favored.iter().any(|c| c == category)
    }
}

/// Which optional content groups are enabled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentFilter {
    pub political: bool,
    pub tabloids: bool,
    pub social: bool,
    pub privacy: bool,
    pub hobbies: bool,
    pub issues: bool,
}

impl ContentFilter {
    /// Every optional group switched on.
    pub fn all() -> Self {
        Self {
            political: true,
            tabloids: true,
            social: true,
            privacy: true,
            hobbies: true,
            issues: true,
        }
    }

    /// Switch on a group by name; `all` enables everything. Returns
    /// `false` for an unknown name.
    pub fn enable(&mut self, name: &str) -> bool {
        let slot = match name.trim().to_ascii_lowercase().as_str() {
            "all" => {
                *self = Self::all();
                return true;
            }
            "political" | "politics" => &mut self.political,
            "tabloids" | "tabloid" => &mut self.tabloids,
            "social" => &mut self.social,
            "privacy" => &mut self.privacy,
            "hobbies" | "hobby" => &mut self.hobbies,
            "issues" | "issue" => &mut self.issues,
            _ => return false,
        };
        *slot = true;
        true
    }

    pub fn allows(&self, group: ContentGroup) -> bool {
        match group {
            ContentGroup::Core | ContentGroup::Plugin => true,
            ContentGroup::Political => self.political,
            ContentGroup::Tabloids => self.tabloids,
            ContentGroup::Social => self.social,
            ContentGroup::Privacy => self.privacy,
            ContentGroup::Hobbies => self.hobbies,
            ContentGroup::Issues => self.issues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_only_core() {
        let filter = ContentFilter::default();
        assert!(filter.allows(ContentGroup::Core));
        assert!(filter.allows(ContentGroup::Plugin));
        assert!(!filter.allows(ContentGroup::Political));
        assert!(!filter.allows(ContentGroup::Issues));
    }

    #[test]
    fn test_enable_by_name() {
        let mut filter = ContentFilter::default();
        assert!(filter.enable("Tabloids"));
        assert!(filter.enable("hobby"));
        assert!(!filter.enable("gossip"));
        assert!(filter.tabloids && filter.hobbies && !filter.political);
        assert!(filter.enable("all"));
        assert_eq!(filter, ContentFilter::all());
    }

    #[test]
    fn test_persona_favors() {
        let p = Persona::new("x", "", &["Technology", "Privacy"]);
        assert!(p.favors("Privacy"));
        assert!(!p.favors("Health"));
    }

    #[test]
    fn test_kind_serde_snake_case() {
        let kind: CategoryKind = serde_json::from_str("\"hobby\"").unwrap();
        assert_eq!(kind, CategoryKind::Hobby);
        assert_eq!(kind.as_str(), "hobby");
    }
}
