//! User-agent profiles and the header values that go with them.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Desktop,
    Mobile,
    Tablet,
    /// TVs, consoles, cars and other odd clients.
    Embedded,
}

impl DeviceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Desktop => "desktop",
            DeviceClass::Mobile => "mobile",
            DeviceClass::Tablet => "tablet",
            DeviceClass::Embedded => "embedded",
        }
    }

    /// Plausible `(width, height)` CSS viewports.
    pub fn viewports(&self) -> &'static [(u32, u32)] {
        match self {
            DeviceClass::Desktop => &[
                (1280, 720),
                (1366, 768),
                (1440, 900),
                (1536, 864),
                (1920, 1080),
                (2560, 1440),
            ],
            DeviceClass::Mobile => &[(360, 780), (375, 812), (390, 844), (412, 915), (414, 896)],
            DeviceClass::Tablet => &[(768, 1024), (810, 1080), (820, 1180), (1024, 1366)],
            DeviceClass::Embedded => &[(1280, 720), (1920, 1080)],
        }
    }

    /// Whether a viewport is believable for this class.
    pub fn fits_viewport(&self, width: u32, height: u32) -> bool {
        match self {
            DeviceClass::Desktop => width >= 1024 && height >= 600,
            DeviceClass::Mobile => width <= 480 && height > width,
            DeviceClass::Tablet => (600..=1366).contains(&width) && height >= 768,
            DeviceClass::Embedded => width >= 960,
        }
    }

    pub fn core_counts(&self) -> &'static [u8] {
        match self {
            DeviceClass::Desktop => &[4, 6, 8, 12, 16],
            DeviceClass::Mobile => &[4, 6, 8],
            DeviceClass::Tablet => &[4, 6, 8],
            DeviceClass::Embedded => &[2, 4],
        }
    }

    pub fn memory_sizes(&self) -> &'static [u8] {
        match self {
            DeviceClass::Desktop => &[4, 8],
            DeviceClass::Mobile => &[2, 4, 8],
            DeviceClass::Tablet => &[4, 8],
            DeviceClass::Embedded => &[1, 2],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    Windows,
    MacOs,
    Linux,
    ChromeOs,
    Android,
    Ios,
    Other,
}

impl Platform {
    /// Value of `Sec-CH-UA-Platform`, unquoted.
    pub fn hint_value(&self) -> &'static str {
        match self {
            Platform::Windows => "Windows",
            Platform::MacOs => "macOS",
            Platform::Linux => "Linux",
            Platform::ChromeOs => "Chrome OS",
            Platform::Android => "Android",
            Platform::Ios => "iOS",
            Platform::Other => "Unknown",
        }
    }

    pub fn is_mobile_os(&self) -> bool {
        matches!(self, Platform::Android | Platform::Ios)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Engine {
    Chromium,
    Gecko,
    WebKit,
    Legacy,
}

/// One user agent and the identity facts that must agree with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserAgentProfile {
    pub ua: &'static str,
    pub platform: Platform,
    pub device: DeviceClass,
    pub engine: Engine,
    /// Brand name and major version for `Sec-CH-UA`; Chromium only.
    pub brand: Option<(&'static str, u32)>,
}

impl UserAgentProfile {
    /// `Sec-CH-UA` value, or `None` for non-Chromium agents.
    pub fn brand_hint(&self) -> Option<String> {
        if self.engine != Engine::Chromium {
            return None;
        }
        let (brand, major) = self.brand?;
        Some(format!(
            "\"Not_A Brand\";v=\"8\", \"Chromium\";v=\"{major}\", \"{brand}\";v=\"{major}\""
        ))
    }
}

const fn profile(
    ua: &'static str,
    platform: Platform,
    device: DeviceClass,
    engine: Engine,
    brand: Option<(&'static str, u32)>,
) -> UserAgentProfile {
    UserAgentProfile {
        ua,
        platform,
        device,
        engine,
        brand,
    }
}

use DeviceClass::*;
use Engine::*;

pub const PROFILES: &[UserAgentProfile] = &[
    profile(
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        Platform::Windows, Desktop, Chromium, Some(("Google Chrome", 120)),
    ),
    profile(
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36",
        Platform::Windows, Desktop, Chromium, Some(("Google Chrome", 119)),
    ),
    profile(
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36 Edg/120.0.0.0",
        Platform::Windows, Desktop, Chromium, Some(("Microsoft Edge", 120)),
    ),
    profile(
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
        Platform::Windows, Desktop, Gecko, None,
    ),
    profile(
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:120.0) Gecko/20100101 Firefox/120.0",
        Platform::Windows, Desktop, Gecko, None,
    ),
    profile(
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_2) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
        Platform::MacOs, Desktop, WebKit, None,
    ),
    profile(
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        Platform::MacOs, Desktop, Chromium, Some(("Google Chrome", 120)),
    ),
    profile(
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        Platform::Linux, Desktop, Chromium, Some(("Google Chrome", 120)),
    ),
    profile(
        "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0",
        Platform::Linux, Desktop, Gecko, None,
    ),
    profile(
        "Mozilla/5.0 (X11; CrOS x86_64 14541.0.0) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        Platform::ChromeOs, Desktop, Chromium, Some(("Google Chrome", 120)),
    ),
    profile(
        "Mozilla/5.0 (iPhone; CPU iPhone OS 17_2 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Mobile/15E148 Safari/604.1",
        Platform::Ios, Mobile, WebKit, None,
    ),
    profile(
        "Mozilla/5.0 (iPad; CPU OS 17_2 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Mobile/15E148 Safari/604.1",
        Platform::Ios, Tablet, WebKit, None,
    ),
    profile(
        "Mozilla/5.0 (Linux; Android 14; SM-S918B) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.6099.144 Mobile Safari/537.36",
        Platform::Android, Mobile, Chromium, Some(("Google Chrome", 120)),
    ),
    profile(
        "Mozilla/5.0 (Linux; Android 13; Pixel 7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.6099.144 Mobile Safari/537.36",
        Platform::Android, Mobile, Chromium, Some(("Google Chrome", 120)),
    ),
    profile(
        "Mozilla/5.0 (Linux; Android 13; SM-X710) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.6099.144 Safari/537.36",
        Platform::Android, Tablet, Chromium, Some(("Google Chrome", 120)),
    ),
    profile(
        "Mozilla/5.0 (Android 14; Mobile; rv:121.0) Gecko/121.0 Firefox/121.0",
        Platform::Android, Mobile, Gecko, None,
    ),
    profile(
        "Mozilla/5.0 (SMART-TV; Linux; Tizen 6.5) AppleWebKit/537.36 (KHTML, like Gecko) SamsungBrowser/5.0 Chrome/85.0.4183.93 TV Safari/537.36",
        Platform::Linux, Embedded, Chromium, Some(("Samsung Internet", 85)),
    ),
    profile(
        "Mozilla/5.0 (PlayStation; PlayStation 5/1.0) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/15.0 Safari/605.1.15",
        Platform::Other, Embedded, WebKit, None,
    ),
    profile(
        "Mozilla/5.0 (Nintendo Switch; WifiWebAuthApplet) AppleWebKit/609.4 (KHTML, like Gecko) NF/6.0.2.21.3 NintendoBrowser/5.1.0.22474",
        Platform::Other, Embedded, WebKit, None,
    ),
    profile(
        "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Tesla/2021.44.25.2",
        Platform::Linux, Embedded, WebKit, None,
    ),
    profile(
        "Mozilla/5.0 (Windows NT 6.1; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/109.0.0.0 Safari/537.36",
        Platform::Windows, Desktop, Chromium, Some(("Google Chrome", 109)),
    ),
    profile(
        "Mozilla/4.0 (compatible; MSIE 8.0; Windows NT 6.1; Trident/4.0)",
        Platform::Windows, Desktop, Legacy, None,
    ),
    profile(
        "Mozilla/5.0 (Windows NT 5.1; rv:52.0) Gecko/20100101 Firefox/52.0",
        Platform::Windows, Desktop, Gecko, None,
    ),
];

pub const ACCEPT: &[&str] = &[
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8",
    "*/*",
];

pub const ACCEPT_LANGUAGE: &[&str] = &[
    "en-US,en;q=0.9",
    "en-GB,en;q=0.9",
    "en-US,en;q=0.9,es;q=0.8",
    "es-ES,es;q=0.9,en;q=0.8",
    "fr-FR,fr;q=0.9,en;q=0.8",
    "de-DE,de;q=0.9,en;q=0.8",
    "pt-BR,pt;q=0.9,en;q=0.8",
    "ja-JP,ja;q=0.9,en;q=0.8",
    "zh-CN,zh;q=0.9,en;q=0.8",
];

pub const ACCEPT_ENCODING: &[&str] = &["gzip, deflate, br", "gzip, deflate", "gzip"];

pub const CACHE_CONTROL: &[&str] = &["max-age=0", "no-cache", "no-store"];

/// Referer values picked per request. Empty entries mean no `Referer`
/// header, the way a typed-in or bookmarked visit looks.
pub const REFERERS: &[&str] = &[
    "",
    "",
    "",
    "https://www.google.com/",
    "https://www.bing.com/",
    "https://duckduckgo.com/",
    "https://search.yahoo.com/",
    "https://www.reddit.com/",
    "https://news.ycombinator.com/",
    "https://t.co/",
    "https://www.facebook.com/",
];

pub const CIPHER_SUITES: &[&str] = &[
    "TLS_AES_128_GCM_SHA256",
    "TLS_AES_256_GCM_SHA384",
    "TLS_CHACHA20_POLY1305_SHA256",
    "TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256",
    "TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256",
    "TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384",
    "TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384",
    "TLS_ECDHE_ECDSA_WITH_CHACHA20_POLY1305_SHA256",
    "TLS_ECDHE_RSA_WITH_CHACHA20_POLY1305_SHA256",
];
