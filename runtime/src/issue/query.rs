//! Query escalation and search URL construction.

use super::types::FrustrationTier;
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

const FIRM_SUFFIXES: &[&str] = &[" fix", " solution", " how to fix", " not working"];
const DESPERATE_PREFIXES: &[&str] = &["please help ", "why ", "still "];
const DESPERATE_SUFFIXES: &[&str] = &[" still not working", " driving me crazy", " nothing works"];
const FRANTIC_SUFFIXES: &[&str] = &[" NOTHING WORKS", " STILL BROKEN", " URGENT"];

/// Rewrite a calm base query for `tier`.
///
/// Calm returns the base unchanged. Each higher tier has a recognisable
/// shape: firm adds a suffix, desperate wraps it in a plea, frantic is
/// upper-cased and starts with `HELP`.
pub fn escalate<R: Rng + ?Sized>(base: &str, tier: FrustrationTier, rng: &mut R) -> String {
    let base = base.trim();
    match tier {
        FrustrationTier::Calm => base.to_string(),
        FrustrationTier::Firm => format!("{base}{}", pick(FIRM_SUFFIXES, rng)),
        FrustrationTier::Desperate => format!(
            "{}{base}{}",
            pick(DESPERATE_PREFIXES, rng),
            pick(DESPERATE_SUFFIXES, rng)
        ),
        FrustrationTier::Frantic => format!(
            "HELP {}{}",
            base.to_uppercase(),
            pick(FRANTIC_SUFFIXES, rng)
        ),
    }
}

/// Recover the tier a query was escalated to.
pub fn classify(query: &str) -> FrustrationTier {
    if query.starts_with("HELP ") && FRANTIC_SUFFIXES.iter().any(|s| query.ends_with(s)) {
        FrustrationTier::Frantic
    } else if DESPERATE_PREFIXES.iter().any(|p| query.starts_with(p))
        && DESPERATE_SUFFIXES.iter().any(|s| query.ends_with(s))
    {
        FrustrationTier::Desperate
    } else if FIRM_SUFFIXES.iter().any(|s| query.ends_with(s)) {
        FrustrationTier::Firm
    } else {
        FrustrationTier::Calm
    }
}

fn pick<'a, R: Rng + ?Sized>(options: &[&'a str], rng: &mut R) -> &'a str {
    options.choose(rng).copied().unwrap_or("")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchEngine {
    Google,
    Bing,
    DuckDuckGo,
    YouTube,
}

impl SearchEngine {
    const WEB: [(SearchEngine, f64); 3] = [
        (SearchEngine::Google, 0.7),
        (SearchEngine::Bing, 0.2),
        (SearchEngine::DuckDuckGo, 0.1),
    ];

    /// Weighted pick among the general web engines.
    pub fn random_web<R: Rng + ?Sized>(rng: &mut R) -> Self {
        match WeightedIndex::new(Self::WEB.iter().map(|(_, w)| *w)) {
            Ok(dist) => Self::WEB[dist.sample(rng)].0,
            Err(_) => SearchEngine::Google,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchEngine::Google => "google",
            SearchEngine::Bing => "bing",
            SearchEngine::DuckDuckGo => "duckduckgo",
            SearchEngine::YouTube => "youtube",
        }
    }

    fn endpoint(&self) -> (&'static str, &'static str) {
        match self {
            SearchEngine::Google => ("https://www.google.com/search", "q"),
            SearchEngine::Bing => ("https://www.bing.com/search", "q"),
            SearchEngine::DuckDuckGo => ("https://duckduckgo.com/", "q"),
            SearchEngine::YouTube => ("https://www.youtube.com/results", "search_query"),
        }
    }

    /// Full search URL with the query form-encoded.
    pub fn search_url(&self, query: &str) -> String {
        let (base, param) = self.endpoint();
        let encoded: String = url::form_urlencoded::Serializer::new(String::new())
            .append_pair(param, query)
            .finish();
        format!("{base}?{encoded}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_calm_is_base() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            escalate("wifi not connecting", FrustrationTier::Calm, &mut rng),
            "wifi not connecting"
        );
    }

    #[test]
    fn test_escalation_shapes_classify_back() {
        let mut rng = StdRng::seed_from_u64(2);
        for tier in FrustrationTier::ALL {
            for _ in 0..50 {
                let q = escalate("dns server not responding", tier, &mut rng);
                assert_eq!(classify(&q), tier, "{q}");
            }
        }
    }

    #[test]
    fn test_frantic_is_shouted() {
        let mut rng = StdRng::seed_from_u64(3);
        let q = escalate("wifi not connecting", FrustrationTier::Frantic, &mut rng);
        assert!(q.starts_with("HELP WIFI NOT CONNECTING"));
        assert_eq!(q, q.to_uppercase());
    }

    #[test]
    fn test_search_url_encoding() {
        let url = SearchEngine::Google.search_url("why wifi won't work");
        assert_eq!(url, "https://www.google.com/search?q=why+wifi+won%27t+work");
        let yt = SearchEngine::YouTube.search_url("fix bsod");
        assert_eq!(yt, "https://www.youtube.com/results?search_query=fix+bsod");
    }

    #[test]
    fn test_engine_weights() {
        let mut rng = StdRng::seed_from_u64(4);
        let google = (0..10_000)
            .filter(|_| SearchEngine::random_web(&mut rng) == SearchEngine::Google)
            .count();
        assert!((6500..7500).contains(&google), "{google}");
    }
}
