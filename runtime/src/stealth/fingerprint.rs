//! Per-session client identity.
//!
//! A [`Fingerprint`] is drawn once when a worker session starts and never
//! changes afterwards. Every field is derived from one user-agent profile so
//! the identity stays internally consistent: client hints only for Chromium,
//! `?1` and a mobile platform only for phones, viewports sized for the
//! device class.

use super::agents::{
    self, DeviceClass, Engine, Platform, UserAgentProfile, ACCEPT, ACCEPT_ENCODING,
    ACCEPT_LANGUAGE, CACHE_CONTROL, CIPHER_SUITES,
};
use crate::error::FingerprintError;
use fnv::FnvHasher;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::hash::{Hash, Hasher};

pub const SEC_CH_UA: &str = "Sec-CH-UA";
pub const SEC_CH_UA_MOBILE: &str = "Sec-CH-UA-Mobile";
pub const SEC_CH_UA_PLATFORM: &str = "Sec-CH-UA-Platform";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TlsHints {
    pub alpn: Vec<&'static str>,
    pub cipher_suites: Vec<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fingerprint {
    /// FNV-1a over every other field.
    pub id: u64,
    pub user_agent: &'static str,
    pub device: DeviceClass,
    pub platform: Platform,
    pub engine: Engine,
    pub accept: &'static str,
    pub accept_language: &'static str,
    pub accept_encoding: &'static str,
    pub connection: &'static str,
    pub dnt: Option<&'static str>,
    pub cache_control: Option<&'static str>,
    /// `Sec-CH-UA*` headers, empty for non-Chromium agents.
    pub client_hints: Vec<(&'static str, String)>,
    /// Order headers are emitted in.
    pub header_order: Vec<&'static str>,
    pub tls: TlsHints,
    pub viewport: Viewport,
    pub hardware_concurrency: u8,
    /// `navigator.deviceMemory`; Chromium only.
    pub device_memory: Option<u8>,
}

impl Fingerprint {
    /// Draw a random, consistent fingerprint.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let profile = agents::PROFILES
            .choose(rng)
            .copied()
            .unwrap_or(agents::PROFILES[0]);
        Self::from_profile(&profile, rng)
    }

    /// Random fingerprint for a specific profile.
    pub fn from_profile<R: Rng + ?Sized>(profile: &UserAgentProfile, rng: &mut R) -> Self {
        let device = profile.device;
        let (width, height) = device
            .viewports()
            .choose(rng)
            .copied()
            .unwrap_or((1366, 768));

        let mut cipher_suites = CIPHER_SUITES.to_vec();
        cipher_suites.shuffle(rng);
        let alpn = if profile.engine == Engine::Legacy || rng.gen_bool(0.1) {
            vec!["http/1.1"]
        } else {
            vec!["h2", "http/1.1"]
        };

        let mut fp = Self {
            id: 0,
            user_agent: profile.ua,
            device,
            platform: profile.platform,
            engine: profile.engine,
            accept: pick(ACCEPT, rng),
            accept_language: pick(ACCEPT_LANGUAGE, rng),
            accept_encoding: pick(ACCEPT_ENCODING, rng),
            connection: if rng.gen_bool(0.8) { "keep-alive" } else { "close" },
            dnt: if rng.gen_bool(0.7) {
                Some(if rng.gen_bool(0.5) { "1" } else { "0" })
            } else {
                None
            },
            cache_control: if rng.gen_bool(0.5) {
                Some(pick(CACHE_CONTROL, rng))
            } else {
                None
            },
            client_hints: client_hints(profile),
            header_order: Vec::new(),
            tls: TlsHints {
                alpn,
                cipher_suites,
            },
            viewport: Viewport { width, height },
            hardware_concurrency: device.core_counts().choose(rng).copied().unwrap_or(4),
            device_memory: if profile.engine == Engine::Chromium {
                device.memory_sizes().choose(rng).copied()
            } else {
                None
            },
        };

        let mut order = fp.present_headers();
        order.shuffle(rng);
        fp.header_order = order;
        fp.id = fp.compute_id();
        fp
    }

    /// Fixed identity used when stealth is off.
    pub fn baseline() -> Self {
        let profile = agents::PROFILES[0];
        let mut fp = Self {
            id: 0,
            user_agent: profile.ua,
            device: profile.device,
            platform: profile.platform,
            engine: profile.engine,
            accept: ACCEPT[0],
            accept_language: ACCEPT_LANGUAGE[0],
            accept_encoding: ACCEPT_ENCODING[0],
            connection: "keep-alive",
            dnt: None,
            cache_control: None,
            client_hints: client_hints(&profile),
            header_order: Vec::new(),
            tls: TlsHints {
                alpn: vec!["h2", "http/1.1"],
                cipher_suites: CIPHER_SUITES.to_vec(),
            },
            viewport: Viewport {
                width: 1920,
                height: 1080,
            },
            hardware_concurrency: 8,
            device_memory: Some(8),
        };
        fp.header_order = fp.present_headers();
        fp.id = fp.compute_id();
        fp
    }

    /// Header names this fingerprint emits, in canonical order.
    fn present_headers(&self) -> Vec<&'static str> {
        let mut names = vec![
            "User-Agent",
            "Accept",
            "Accept-Language",
            "Accept-Encoding",
            "Connection",
            "Upgrade-Insecure-Requests",
        ];
        if self.dnt.is_some() {
            names.push("DNT");
        }
        if self.cache_control.is_some() {
            names.push("Cache-Control");
        }
        names.extend(self.client_hints.iter().map(|(name, _)| *name));
        names
    }

    fn header_value(&self, name: &str) -> Option<String> {
        let value = match name {
            "User-Agent" => self.user_agent.to_string(),
            "Accept" => self.accept.to_string(),
            "Accept-Language" => self.accept_language.to_string(),
            "Accept-Encoding" => self.accept_encoding.to_string(),
            "Connection" => self.connection.to_string(),
            "Upgrade-Insecure-Requests" => "1".to_string(),
            "DNT" => self.dnt?.to_string(),
            "Cache-Control" => self.cache_control?.to_string(),
            _ => self
                .client_hints
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| v.clone())?,
        };
        Some(value)
    }

    /// Identity headers in emission order.
    pub fn headers(&self) -> Vec<(String, String)> {
        self.header_order
            .iter()
            .filter_map(|name| self.header_value(name).map(|v| (name.to_string(), v)))
            .collect()
    }

    fn hint(&self, name: &str) -> Option<&str> {
        self.client_hints
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    fn compute_id(&self) -> u64 {
        let mut h = FnvHasher::default();
        self.user_agent.hash(&mut h);
        self.device.hash(&mut h);
        self.platform.hash(&mut h);
        self.engine.hash(&mut h);
        self.accept.hash(&mut h);
        self.accept_language.hash(&mut h);
        self.accept_encoding.hash(&mut h);
        self.connection.hash(&mut h);
        self.dnt.hash(&mut h);
        self.cache_control.hash(&mut h);
        self.client_hints.hash(&mut h);
        self.header_order.hash(&mut h);
        self.tls.hash(&mut h);
        self.viewport.hash(&mut h);
        self.hardware_concurrency.hash(&mut h);
        self.device_memory.hash(&mut h);
        h.finish()
    }

    /// Check that every field agrees with the user agent.
    pub fn validate(&self) -> Result<(), FingerprintError> {
        let mobile = self.device == DeviceClass::Mobile;

        if self.engine != Engine::Chromium {
            if let Some((name, _)) = self.client_hints.first() {
                return Err(FingerprintError::UnexpectedClientHint(name.to_string()));
            }
            if self.device_memory.is_some() {
                return Err(FingerprintError::UnexpectedClientHint(
                    "Device-Memory".to_string(),
                ));
            }
        } else {
            if let Some(value) = self.hint(SEC_CH_UA_MOBILE) {
                match (mobile, value) {
                    (true, "?1") | (false, "?0") => {}
                    (true, other) => {
                        return Err(FingerprintError::DesktopHintOnMobile {
                            header: SEC_CH_UA_MOBILE.to_string(),
                            value: other.to_string(),
                        })
                    }
                    (false, other) => {
                        return Err(FingerprintError::MobileHintOnDesktop {
                            header: SEC_CH_UA_MOBILE.to_string(),
                            value: other.to_string(),
                        })
                    }
                }
            }
            if let Some(value) = self.hint(SEC_CH_UA_PLATFORM) {
                let expected = format!("\"{}\"", self.platform.hint_value());
                if value != expected {
                    let err_value = value.to_string();
                    let header = SEC_CH_UA_PLATFORM.to_string();
                    return Err(if self.platform.is_mobile_os() {
                        FingerprintError::DesktopHintOnMobile {
                            header,
                            value: err_value,
                        }
                    } else {
                        FingerprintError::MobileHintOnDesktop {
                            header,
                            value: err_value,
                        }
                    });
                }
            }
        }

        if !self
            .device
            .fits_viewport(self.viewport.width, self.viewport.height)
        {
            return Err(FingerprintError::Viewport {
                width: self.viewport.width,
                height: self.viewport.height,
                device: self.device.as_str().to_string(),
            });
        }

        let mut expected = self.present_headers();
        let mut actual = self.header_order.clone();
        expected.sort_unstable();
        actual.sort_unstable();
        if expected != actual {
            return Err(FingerprintError::HeaderOrder);
        }

        Ok(())
    }
}

fn client_hints(profile: &UserAgentProfile) -> Vec<(&'static str, String)> {
    let Some(brand) = profile.brand_hint() else {
        return Vec::new();
    };
    let mobile = if profile.device == DeviceClass::Mobile {
        "?1"
    } else {
        "?0"
    };
    vec![
        (SEC_CH_UA, brand),
        (SEC_CH_UA_MOBILE, mobile.to_string()),
        (
            SEC_CH_UA_PLATFORM,
            format!("\"{}\"", profile.platform.hint_value()),
        ),
    ]
}

fn pick<R: Rng + ?Sized>(options: &[&'static str], rng: &mut R) -> &'static str {
    options.choose(rng).copied().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn profile_where(f: impl Fn(&UserAgentProfile) -> bool) -> UserAgentProfile {
        *agents::PROFILES.iter().find(|p| f(p)).unwrap()
    }

    #[test]
    fn test_generated_fingerprints_validate() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..1000 {
            let fp = Fingerprint::generate(&mut rng);
            assert_eq!(fp.validate(), Ok(()), "{fp:?}");
        }
    }

    #[test]
    fn test_fingerprints_vary() {
        let mut rng = StdRng::seed_from_u64(43);
        let ids: HashSet<u64> = (0..50).map(|_| Fingerprint::generate(&mut rng).id).collect();
        assert!(ids.len() > 40, "only {} distinct", ids.len());
    }

    #[test]
    fn test_mobile_chromium_hints() {
        let mut rng = StdRng::seed_from_u64(44);
        let android =
            profile_where(|p| p.device == DeviceClass::Mobile && p.engine == Engine::Chromium);
        let fp = Fingerprint::from_profile(&android, &mut rng);
        assert_eq!(fp.hint(SEC_CH_UA_MOBILE), Some("?1"));
        assert_eq!(fp.hint(SEC_CH_UA_PLATFORM), Some("\"Android\""));
        assert!(fp.viewport.width <= 480);
    }

    #[test]
    fn test_non_chromium_has_no_hints() {
        let mut rng = StdRng::seed_from_u64(45);
        let safari =
            profile_where(|p| p.platform == Platform::Ios && p.device == DeviceClass::Mobile);
        let fp = Fingerprint::from_profile(&safari, &mut rng);
        assert!(fp.client_hints.is_empty());
        assert!(fp.device_memory.is_none());
        assert!(!fp.headers().iter().any(|(n, _)| n.starts_with("Sec-CH")));
    }

    #[test]
    fn test_validate_catches_desktop_hint_on_mobile() {
        let mut rng = StdRng::seed_from_u64(46);
        let android =
            profile_where(|p| p.device == DeviceClass::Mobile && p.engine == Engine::Chromium);
        let mut fp = Fingerprint::from_profile(&android, &mut rng);
        for (name, value) in fp.client_hints.iter_mut() {
            if *name == SEC_CH_UA_MOBILE {
                *value = "?0".to_string();
            }
        }
        assert!(matches!(
            fp.validate(),
            Err(FingerprintError::DesktopHintOnMobile { .. })
        ));

        let mut fp = Fingerprint::from_profile(&android, &mut rng);
        for (name, value) in fp.client_hints.iter_mut() {
            if *name == SEC_CH_UA_PLATFORM {
                *value = "\"Windows\"".to_string();
            }
        }
        assert!(matches!(
            fp.validate(),
            Err(FingerprintError::DesktopHintOnMobile { .. })
        ));
    }

    #[test]
    fn test_validate_catches_other_inconsistencies() {
        let mut rng = StdRng::seed_from_u64(47);
        let firefox =
            profile_where(|p| p.engine == Engine::Gecko && p.device == DeviceClass::Desktop);
        let mut fp = Fingerprint::from_profile(&firefox, &mut rng);
        fp.client_hints.push((SEC_CH_UA_MOBILE, "?0".into()));
        assert_eq!(
            fp.validate(),
            Err(FingerprintError::UnexpectedClientHint(SEC_CH_UA_MOBILE.into()))
        );

        let mut fp = Fingerprint::from_profile(&firefox, &mut rng);
        fp.viewport = Viewport {
            width: 390,
            height: 844,
        };
        assert!(matches!(fp.validate(), Err(FingerprintError::Viewport { .. })));

        let mut fp = Fingerprint::from_profile(&firefox, &mut rng);
        fp.header_order.pop();
        assert_eq!(fp.validate(), Err(FingerprintError::HeaderOrder));
    }

    #[test]
    fn test_headers_follow_order() {
        let mut rng = StdRng::seed_from_u64(48);
        let fp = Fingerprint::generate(&mut rng);
        let names: Vec<String> = fp.headers().into_iter().map(|(n, _)| n).collect();
        let order: Vec<String> = fp.header_order.iter().map(|s| s.to_string()).collect();
        assert_eq!(names, order);
    }

    #[test]
    fn test_baseline_stable() {
        let a = Fingerprint::baseline();
        let b = Fingerprint::baseline();
        assert_eq!(a, b);
        assert_eq!(a.validate(), Ok(()));
        assert_eq!(a.header_order[0], "User-Agent");
    }
}
