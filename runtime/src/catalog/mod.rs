//! Category and persona catalogs.
//!
//! The catalog is assembled once at startup: built-in data first, then zero
//! or more plugin fragments merged on top (built-ins win on name collision).
//! After that it is immutable and shared by every worker.

pub mod builtin;
pub mod plugin;
pub mod types;

pub use plugin::{CatalogFragment, PersonaDecl};
pub use types::{Category, CategoryKind, ContentFilter, ContentGroup, Persona};

use rand::seq::SliceRandom;
use rand::Rng;
use std::path::Path;
use tracing::{info, warn};

/// What a merge changed.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MergeReport {
    pub categories_added: usize,
    pub personas_added: usize,
    pub skipped: Vec<String>,
}

/// Immutable category + persona catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<Category>,
    personas: Vec<Persona>,
}

impl Catalog {
    /// The built-in catalog with no plugins.
    pub fn builtin() -> Self {
        let categories = builtin::CATEGORIES
            .iter()
            .map(|seed| Category {
                name: seed.name.to_string(),
                kind: seed.kind,
                group: seed.group,
                urls: seed.urls.iter().map(|u| u.to_string()).collect(),
            })
            .collect();
        let personas = builtin::PERSONAS
            .iter()
            .map(|seed| Persona::new(seed.name, seed.description, seed.favored))
            .collect();
        Self {
            categories,
            personas,
        }
    }

    /// Built-ins merged with every fragment found in `plugin_dir`.
    pub fn load(plugin_dir: Option<&Path>) -> Self {
        let mut catalog = Self::builtin();
        if let Some(dir) = plugin_dir {
            let fragments = plugin::load_dir(dir);
            if !fragments.is_empty() {
                let report = catalog.merge(fragments);
                info!(
                    "plugins merged: {} categories, {} personas, {} skipped",
                    report.categories_added,
                    report.personas_added,
                    report.skipped.len()
                );
            }
        }
        catalog
    }

    /// Merge fragments into this catalog.
    ///
    /// Categories from all fragments are merged before any persona, so a
    /// persona may reference a category declared in another file.
    pub fn merge(&mut self, fragments: Vec<CatalogFragment>) -> MergeReport {
        let mut report = MergeReport::default();
        let mut persona_decls = Vec::new();

        for fragment in fragments {
            for category in fragment.categories {
                if self.category(&category.name).is_some() {
                    warn!(
                        "plugin {}: category {} already defined, keeping existing",
                        fragment.source, category.name
                    );
                    report.skipped.push(category.name);
                    continue;
                }
                self.categories.push(category);
                report.categories_added += 1;
            }
            persona_decls.extend(
                fragment
                    .personas
                    .into_iter()
                    .map(|p| (fragment.source.clone(), p)),
            );
        }

        for (source, decl) in persona_decls {
            if self.persona(&decl.name).is_some() {
                warn!("plugin {source}: persona {} already defined", decl.name);
                report.skipped.push(decl.name);
                continue;
            }
            let (known, unknown): (Vec<String>, Vec<String>) = decl
                .categories
                .into_iter()
                .partition(|c| self.category(c).is_some());
            if !unknown.is_empty() {
                warn!(
                    "plugin {source}: persona {} references unknown categories {:?}",
                    decl.name, unknown
                );
            }
            if known.is_empty() {
                report.skipped.push(decl.name);
                continue;
            }
            self.personas.push(Persona {
                name: decl.name,
                description: decl.description,
                favored: known,
            });
            report.personas_added += 1;
        }

        report
    }

    /// Narrow the catalog to the categories a run should visit.
    ///
    /// Keeps groups enabled by `filter` plus anything `persona` favors, so a
    /// persona is never left without its own categories.
    pub fn restrict(&self, filter: &ContentFilter, persona: Option<&Persona>) -> Self {
        let categories = self
            .categories
            .iter()
            .filter(|c| {
                filter.allows(c.group) || persona.map(|p| p.favors(&c.name)).unwrap_or(false)
            })
            .cloned()
            .collect();
        Self {
            categories,
            personas: self.personas.clone(),
        }
    }

    pub fn category(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn persona(&self, name: &str) -> Option<&Persona> {
        self.personas.iter().find(|p| p.name == name)
    }

    pub fn personas(&self) -> &[Persona] {
        &self.personas
    }

    /// Pick one target URL from `category`.
    pub fn pick_url<R: Rng + ?Sized>(&self, category: &str, rng: &mut R) -> Option<&str> {
        self.category(category)?
            .urls
            .choose(rng)
            .map(|u| u.as_str())
    }

    /// Pick a category uniformly.
    pub fn random_category<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Category> {
        self.categories.choose(rng)
    }
}
