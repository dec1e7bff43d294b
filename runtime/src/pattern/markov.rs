//! Markov transition model over content categories.
//!
//! The model is a weighted directed graph. It holds no per-worker state:
//! the current category lives in the caller's [`MarkovState`].

use crate::catalog::{Catalog, Persona};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Base transition weights between built-in categories.
///
/// Rows need not sum to 1: they are normalised after filtering to the
/// categories present in the active catalog.
const BASE_TRANSITIONS: &[(&str, &[(&str, f64)])] = &[
    (
        "Lifestyle",
        &[
            ("Lifestyle", 0.30),
            ("World", 0.12),
            ("Technology", 0.10),
            ("Health", 0.15),
            ("Trending", 0.12),
            ("SocialMedia", 0.08),
            ("Hobbies", 0.05),
            ("Tabloids", 0.04),
            ("SocialNetworkAds", 0.04),
        ],
    ),
    (
        "World",
        &[
            ("Lifestyle", 0.08),
            ("World", 0.35),
            ("Technology", 0.12),
            ("Health", 0.08),
            ("Trending", 0.17),
            ("SocialMedia", 0.06),
            ("LeftLeaning", 0.05),
            ("RightLeaning", 0.05),
            ("SocialNetworkAds", 0.04),
        ],
    ),
    (
        "Technology",
        &[
            ("Lifestyle", 0.08),
            ("World", 0.12),
            ("Technology", 0.35),
            ("Health", 0.06),
            ("Trending", 0.12),
            ("SocialMedia", 0.10),
            ("Privacy", 0.10),
            ("Hobbies", 0.04),
            ("NetworkingIssues", 0.01),
            ("SoftwareIssues", 0.01),
            ("HardwareIssues", 0.01),
        ],
    ),
    (
        "Health",
        &[
            ("Lifestyle", 0.20),
            ("World", 0.12),
            ("Technology", 0.08),
            ("Health", 0.35),
            ("Trending", 0.10),
            ("SocialMedia", 0.08),
            ("Hobbies", 0.07),
        ],
    ),
    (
        "Trending",
        &[
            ("Lifestyle", 0.12),
            ("World", 0.18),
            ("Technology", 0.12),
            ("Health", 0.08),
            ("Trending", 0.25),
            ("SocialMedia", 0.12),
            ("Tabloids", 0.05),
            ("SocialNetworkAds", 0.08),
        ],
    ),
    (
        "SocialMedia",
        &[
            ("Lifestyle", 0.15),
            ("World", 0.10),
            ("Technology", 0.15),
            ("Health", 0.08),
            ("Trending", 0.15),
            ("SocialMedia", 0.25),
            ("Tabloids", 0.07),
            ("Hobbies", 0.05),
        ],
    ),
    (
        "SocialNetworkAds",
        &[
            ("Lifestyle", 0.15),
            ("World", 0.15),
            ("Technology", 0.10),
            ("Trending", 0.20),
            ("SocialNetworkAds", 0.25),
            ("Tabloids", 0.15),
        ],
    ),
    (
        "Privacy",
        &[
            ("Privacy", 0.35),
            ("Technology", 0.30),
            ("World", 0.10),
            ("Trending", 0.10),
            ("SocialMedia", 0.05),
            ("MalwareIssues", 0.05),
            ("NetworkingIssues", 0.05),
        ],
    ),
    (
        "Hobbies",
        &[
            ("Hobbies", 0.40),
            ("Lifestyle", 0.20),
            ("Technology", 0.15),
            ("Health", 0.10),
            ("SocialMedia", 0.10),
            ("Trending", 0.05),
        ],
    ),
    (
        "Tabloids",
        &[
            ("Tabloids", 0.35),
            ("SocialMedia", 0.20),
            ("Lifestyle", 0.20),
            ("Trending", 0.15),
            ("SocialNetworkAds", 0.10),
        ],
    ),
    (
        "LeftLeaning",
        &[
            ("LeftLeaning", 0.35),
            ("RightLeaning", 0.15),
            ("World", 0.25),
            ("Trending", 0.15),
            ("SocialMedia", 0.10),
        ],
    ),
    (
        "RightLeaning",
        &[
            ("RightLeaning", 0.35),
            ("LeftLeaning", 0.15),
            ("World", 0.25),
            ("Trending", 0.15),
            ("SocialMedia", 0.10),
        ],
    ),
    (
        "NetworkingIssues",
        &[
            ("NetworkingIssues", 0.40),
            ("HardwareIssues", 0.10),
            ("SoftwareIssues", 0.10),
            ("MisconfiguredSettings", 0.15),
            ("Technology", 0.25),
        ],
    ),
    (
        "HardwareIssues",
        &[
            ("HardwareIssues", 0.40),
            ("NetworkingIssues", 0.10),
            ("SoftwareIssues", 0.15),
            ("Technology", 0.35),
        ],
    ),
    (
        "SoftwareIssues",
        &[
            ("SoftwareIssues", 0.40),
            ("MalwareIssues", 0.15),
            ("MisconfiguredSettings", 0.10),
            ("HardwareIssues", 0.10),
            ("Technology", 0.25),
        ],
    ),
    (
        "MalwareIssues",
        &[
            ("MalwareIssues", 0.40),
            ("SoftwareIssues", 0.15),
            ("Privacy", 0.15),
            ("Technology", 0.30),
        ],
    ),
    (
        "MisconfiguredSettings",
        &[
            ("MisconfiguredSettings", 0.35),
            ("NetworkingIssues", 0.20),
            ("SoftwareIssues", 0.15),
            ("Technology", 0.30),
        ],
    ),
];

/// Default multiplicative boost for persona-favored destinations.
pub const DEFAULT_PERSONA_BOOST: f64 = 3.0;

/// Weight of the edge from every built-in row into a category the table
/// does not know (plugin categories), before normalisation.
pub const EXTENSION_WEIGHT: f64 = 0.03;

/// Per-worker position in the chain.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkovState {
    pub current: String,
    pub clicks: u64,
}

impl MarkovState {
    pub fn new(start: &str) -> Self {
        Self {
            current: start.to_string(),
            clicks: 0,
        }
    }

    /// Advance one click using `model`. Returns the new category.
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        model: &MarkovModel,
        persona: Option<&Persona>,
        rng: &mut R,
    ) -> &str {
        if let Some(next) = model.next(&self.current, persona, rng) {
            self.current = next.to_string();
        }
        self.clicks += 1;
        &self.current
    }
}

/// Weighted directed graph of category transitions.
#[derive(Debug, Clone)]
pub struct MarkovModel {
    graph: DiGraph<String, f64>,
    nodes: HashMap<String, NodeIndex>,
    persona_boost: f64,
}

impl MarkovModel {
    /// Build from explicit edges. Rows are normalised; non-positive or
    /// non-finite weights and edges touching unknown categories are dropped.
    pub fn from_edges(
        categories: &[&str],
        edges: &[(&str, &str, f64)],
        persona_boost: f64,
    ) -> Self {
        let mut graph = DiGraph::new();
        let mut nodes = HashMap::new();
        for name in categories {
            if !nodes.contains_key(*name) {
                let idx = graph.add_node(name.to_string());
                nodes.insert(name.to_string(), idx);
            }
        }

        let mut rows: BTreeMap<NodeIndex, Vec<(NodeIndex, f64)>> = BTreeMap::new();
        for (from, to, weight) in edges {
            if !weight.is_finite() || *weight <= 0.0 {
                continue;
            }
            if let (Some(&a), Some(&b)) = (nodes.get(*from), nodes.get(*to)) {
                rows.entry(a).or_default().push((b, *weight));
            }
        }

        for (from, row) in rows {
            let total: f64 = row.iter().map(|(_, w)| w).sum();
            for (to, weight) in row {
                graph.add_edge(from, to, weight / total);
            }
        }

        Self {
            graph,
            nodes,
            persona_boost,
        }
    }

    /// Build the built-in transition table restricted to `catalog`.
    ///
    /// Categories the table does not know (plugins) get an
    /// [`EXTENSION_WEIGHT`] edge from every built-in row, so they are
    /// reachable and persona boosts apply to them. Their own outgoing row
    /// stays empty and falls back to uniform.
    pub fn from_catalog(catalog: &Catalog, persona_boost: f64) -> Self {
        let names = catalog.category_names();
        let known: HashSet<&str> = BASE_TRANSITIONS.iter().map(|(from, _)| *from).collect();
        let (listed, extra): (Vec<&str>, Vec<&str>) =
            names.iter().copied().partition(|n| known.contains(n));

        let mut edges: Vec<(&str, &str, f64)> = BASE_TRANSITIONS
            .iter()
            .flat_map(|(from, row)| row.iter().map(move |(to, w)| (*from, *to, *w)))
            .collect();
        for from in &listed {
            edges.extend(extra.iter().map(|to| (*from, *to, EXTENSION_WEIGHT)));
        }
        Self::from_edges(&names, &edges, persona_boost)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.graph.node_weights().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Outgoing distribution from `current` after persona reweighting.
    ///
    /// Unknown categories and categories without outgoing edges get a
    /// uniform distribution over every known category.
    pub fn distribution(&self, current: &str, persona: Option<&Persona>) -> Vec<(&str, f64)> {
        let row: Vec<(NodeIndex, f64)> = match self.nodes.get(current) {
            Some(&idx) => self
                .graph
                .edges(idx)
                .map(|e| (e.target(), *e.weight()))
                .collect(),
            None => Vec::new(),
        };

        if row.is_empty() {
            let n = self.graph.node_count();
            if n == 0 {
                return Vec::new();
            }
            let p = 1.0 / n as f64;
            return self
                .graph
                .node_indices()
                .map(|i| (self.graph[i].as_str(), p))
                .collect();
        }

        let boosted: Vec<(&str, f64)> = row
            .into_iter()
            .map(|(to, w)| {
                let name = self.graph[to].as_str();
                let favored = persona.map(|p| p.favors(name)).unwrap_or(false);
                (name, if favored { w * self.persona_boost } else { w })
            })
            .collect();
        let total: f64 = boosted.iter().map(|(_, w)| w).sum();
        boosted.into_iter().map(|(n, w)| (n, w / total)).collect()
    }

    /// Draw the next category. `None` only when the model has no categories.
    pub fn next<R: Rng + ?Sized>(
        &self,
        current: &str,
        persona: Option<&Persona>,
        rng: &mut R,
    ) -> Option<&str> {
        let dist = self.distribution(current, persona);
        match WeightedIndex::new(dist.iter().map(|(_, w)| *w)) {
            Ok(index) => Some(dist[index.sample(rng)].0),
            Err(_) => dist.choose(rng).map(|(name, _)| *name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ContentFilter;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn assert_row_sums(model: &MarkovModel, persona: Option<&Persona>) {
        let names: Vec<String> = model.categories().map(String::from).collect();
        for name in names {
            let dist = model.distribution(&name, persona);
            let sum: f64 = dist.iter().map(|(_, p)| p).sum();
            assert!((sum - 1.0).abs() < 1e-9, "{name} sums to {sum}");
            assert!(dist.iter().all(|(_, p)| *p > 0.0));
        }
    }

    #[test]
    fn test_rows_sum_to_one_all_categories() {
        let catalog = Catalog::builtin().restrict(&ContentFilter::all(), None);
        let model = MarkovModel::from_catalog(&catalog, DEFAULT_PERSONA_BOOST);
        assert_row_sums(&model, None);
        for persona in catalog.personas() {
            assert_row_sums(&model, Some(persona));
        }
    }

    #[test]
    fn test_rows_sum_to_one_restricted() {
        let catalog = Catalog::builtin().restrict(&ContentFilter::default(), None);
        let model = MarkovModel::from_catalog(&catalog, DEFAULT_PERSONA_BOOST);
        assert_eq!(model.len(), catalog.categories().len());
        assert_row_sums(&model, None);
    }

    #[test]
    fn test_unknown_category_uniform() {
        let model = MarkovModel::from_edges(&["A", "B", "C", "D"], &[("A", "B", 1.0)], 3.0);
        let dist = model.distribution("Nope", None);
        assert_eq!(dist.len(), 4);
        assert!(dist.iter().all(|(_, p)| (*p - 0.25).abs() < 1e-12));

        // "B" has no outgoing edges either.
        let dist = model.distribution("B", None);
        assert_eq!(dist.len(), 4);
    }

    #[test]
    fn test_next_never_leaves_known_set() {
        let model = MarkovModel::from_edges(&["A", "B"], &[], 3.0);
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            let next = model.next("Z", None, &mut rng).unwrap();
            assert!(next == "A" || next == "B");
        }
    }

    #[test]
    fn test_only_positive_edges_followed() {
        let model = MarkovModel::from_edges(
            &["A", "B", "C"],
            &[("A", "A", 0.5), ("A", "B", 0.5), ("A", "C", 0.0), ("A", "C", -1.0)],
            3.0,
        );
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            assert_ne!(model.next("A", None, &mut rng), Some("C"));
        }
    }

    #[test]
    fn test_empty_model() {
        let model = MarkovModel::from_edges(&[], &[], 3.0);
        let mut rng = StdRng::seed_from_u64(0);
        assert!(model.is_empty());
        assert!(model.next("A", None, &mut rng).is_none());
    }

    #[test]
    fn test_persona_bias_frequency() {
        let catalog = Catalog::builtin();
        let persona = Persona::new("p", "", &["Technology", "Privacy"]);
        let active = catalog.restrict(&ContentFilter::default(), Some(&persona));
        let model = MarkovModel::from_catalog(&active, DEFAULT_PERSONA_BOOST);

        let mut rng = StdRng::seed_from_u64(2024);
        let mut state = MarkovState::new("Technology");
        let mut counts: HashMap<String, usize> = HashMap::new();
        for _ in 0..1000 {
            let next = state.step(&model, Some(&persona), &mut rng).to_string();
            *counts.entry(next).or_default() += 1;
        }

        let tech = counts.get("Technology").copied().unwrap_or(0);
        let privacy = counts.get("Privacy").copied().unwrap_or(0);
        for (name, count) in &counts {
            if name != "Technology" && name != "Privacy" {
                assert!(tech > *count, "Technology {tech} <= {name} {count}");
                assert!(privacy > *count, "Privacy {privacy} <= {name} {count}");
            }
        }
        assert_eq!(state.clicks, 1000);
    }

    fn with_gardening() -> Catalog {
        let mut catalog = Catalog::builtin();
        let fragment = crate::catalog::plugin::parse_fragment(
            "test",
            r#"{"categories": {"Gardening": ["https://www.rhs.org.uk"]}}"#,
        )
        .unwrap();
        catalog.merge(vec![fragment]);
        catalog
    }

    #[test]
    fn test_plugin_category_reachable() {
        let catalog = with_gardening().restrict(&ContentFilter::all(), None);
        let model = MarkovModel::from_catalog(&catalog, DEFAULT_PERSONA_BOOST);
        assert_row_sums(&model, None);

        let dist = model.distribution("Technology", None);
        let p = dist.iter().find(|(n, _)| *n == "Gardening").map(|(_, p)| *p);
        assert!(p.is_some_and(|p| p > 0.0));
        // No row of its own: uniform out of the plugin category.
        assert_eq!(model.distribution("Gardening", None).len(), model.len());
    }

    #[test]
    fn test_favored_plugin_category_visited() {
        let catalog = with_gardening();
        let gardener = Persona::new("gardener", "", &["Gardening"]);
        let active = catalog.restrict(&ContentFilter::all(), Some(&gardener));
        let model = MarkovModel::from_catalog(&active, DEFAULT_PERSONA_BOOST);

        let count = |persona: Option<&Persona>| {
            let mut rng = StdRng::seed_from_u64(11);
            let mut state = MarkovState::new("Technology");
            (0..20_000)
                .filter(|_| state.step(&model, persona, &mut rng) == "Gardening")
                .count()
        };
        let plain = count(None);
        let favored = count(Some(&gardener));
        assert!(plain > 0);
        assert!(favored > plain, "favored {favored}, plain {plain}");
    }
}
