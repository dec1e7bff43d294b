//! Decoy attributes attached to outbound requests.
//!
//! Each worker session carries one [`DecoyBundle`]: a claimed interest,
//! coarse location and demographic bucket drawn independently of what the
//! worker actually browses. The bundle travels as cookie pairs so trackers
//! that read them see claims that do not match the visit pattern.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

const INTERESTS: &[&str] = &[
    "luxury_travel",
    "golf",
    "crypto_trading",
    "gardening",
    "fly_fishing",
    "opera",
    "anime",
    "woodworking",
    "vegan_cooking",
    "motorsport",
    "knitting",
    "astronomy",
    "bodybuilding",
    "genealogy",
    "wine",
    "home_schooling",
];

const LOCATIONS: &[&str] = &[
    "US-CA", "US-TX", "US-NY", "US-FL", "GB-LND", "DE-BE", "FR-IDF", "BR-SP", "JP-13", "AU-NSW",
    "CA-ON", "IN-MH", "MX-CMX", "ES-MD", "NL-NH",
];

const AGE_BUCKETS: &[&str] = &["18-24", "25-34", "35-44", "45-54", "55-64", "65+"];
const HOUSEHOLDS: &[&str] = &["single", "couple", "family", "shared", "retired"];

const THEMES: &[&str] = &["light", "dark", "system"];
const CURRENCIES: &[&str] = &["USD", "EUR", "GBP", "JPY", "BRL", "CAD"];

/// Cookie names a bundle produces.
pub const COOKIE_NAMES: [&str; 6] = ["_ga", "sid", "_dcy_int", "_dcy_geo", "_dcy_demo", "_pref"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DecoyBundle {
    pub interest: &'static str,
    pub location: &'static str,
    pub demographic: String,
    pub ga_id: String,
    pub session_id: String,
    /// Base64 (URL-safe, unpadded) JSON preferences blob.
    pub preferences: String,
}

impl DecoyBundle {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let interest = pick(INTERESTS, rng);
        let location = pick(LOCATIONS, rng);
        let demographic = format!("{}:{}", pick(AGE_BUCKETS, rng), pick(HOUSEHOLDS, rng));
        let ga_id = format!(
            "GA1.2.{}.{}",
            rng.gen_range(1_000_000u32..10_000_000),
            ts.saturating_sub(rng.gen_range(0..30 * 24 * 3600))
        );
        let session_id: String = (0..32)
            .map(|_| char::from_digit(rng.gen_range(0..16), 16).unwrap_or('0'))
            .collect();

        let pref = serde_json::json!({
            "theme": pick(THEMES, rng),
            "currency": pick(CURRENCIES, rng),
            "topics": [interest, pick(INTERESTS, rng)],
            "geo": location,
        });
        let preferences = URL_SAFE_NO_PAD.encode(pref.to_string());

        Self {
            interest,
            location,
            demographic,
            ga_id,
            session_id,
            preferences,
        }
    }

    /// Cookie pairs in a fixed order.
    pub fn cookies(&self) -> Vec<(String, String)> {
        let values = [
            self.ga_id.as_str(),
            self.session_id.as_str(),
            self.interest,
            self.location,
            self.demographic.as_str(),
            self.preferences.as_str(),
        ];
        COOKIE_NAMES
            .iter()
            .zip(values)
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    /// Decode the preferences blob.
    pub fn decoded_preferences(&self) -> Option<serde_json::Value> {
        let bytes = URL_SAFE_NO_PAD.decode(&self.preferences).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

/// Decides per request whether the session's bundle is attached.
#[derive(Debug, Clone, Copy)]
pub struct DecoyInjector {
    rate: f64,
}

impl DecoyInjector {
    pub fn new(rate: f64) -> Self {
        Self {
            rate: rate.clamp(0.0, 1.0),
        }
    }

    pub fn disabled() -> Self {
        Self { rate: 0.0 }
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn inject<R: Rng + ?Sized>(
        &self,
        bundle: &DecoyBundle,
        rng: &mut R,
    ) -> Option<Vec<(String, String)>> {
        if self.rate > 0.0 && rng.gen_bool(self.rate) {
            Some(bundle.cookies())
        } else {
            None
        }
    }
}

fn pick<R: Rng + ?Sized>(options: &[&'static str], rng: &mut R) -> &'static str {
    options.choose(rng).copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_bundle_cookies() {
        let mut rng = StdRng::seed_from_u64(1);
        let bundle = DecoyBundle::generate(&mut rng);
        let cookies = bundle.cookies();
        let names: Vec<&str> = cookies.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(names, COOKIE_NAMES.to_vec());
        assert!(bundle.ga_id.starts_with("GA1.2."));
        assert_eq!(bundle.session_id.len(), 32);
        assert!(cookies.iter().all(|(_, v)| !v.contains(';') && !v.contains(' ')));
    }

    #[test]
    fn test_preferences_round_trip() {
        let mut rng = StdRng::seed_from_u64(2);
        let bundle = DecoyBundle::generate(&mut rng);
        let prefs = bundle.decoded_preferences().unwrap();
        assert_eq!(prefs["geo"], bundle.location);
        assert_eq!(prefs["topics"][0], bundle.interest);
    }

    #[test]
    fn test_injection_rate() {
        let mut rng = StdRng::seed_from_u64(3);
        let bundle = DecoyBundle::generate(&mut rng);
        let injector = DecoyInjector::new(0.7);
        let hits = (0..10_000)
            .filter(|_| injector.inject(&bundle, &mut rng).is_some())
            .count();
        assert!((6500..7500).contains(&hits), "{hits}");

        let off = DecoyInjector::disabled();
        assert!((0..100).all(|_| off.inject(&bundle, &mut rng).is_none()));
    }

    #[test]
    fn test_bundles_differ() {
        let mut rng = StdRng::seed_from_u64(4);
        let a = DecoyBundle::generate(&mut rng);
        let b = DecoyBundle::generate(&mut rng);
        assert_ne!(a.session_id, b.session_id);
    }
}
