//! Closed issue enums: types, families, urgency and frustration tiers.

use crate::error::ConfigError;
use crate::pattern::DelayRange;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A technical-problem scenario the engine can act out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    // network
    Dns,
    Timeout,
    Ssl,
    PacketLoss,
    Throttling,
    Proxy,
    Vpn,
    Wifi,
    // system
    SlowComputer,
    HighCpu,
    MemoryLeak,
    DiskFull,
    Driver,
    Bsod,
    BootFailure,
    // malware
    Adware,
    BrowserHijack,
    PopupAds,
    Cryptominer,
    Ransomware,
    Trojan,
    Spyware,
    // software
    AppCrash,
    UpdateFailure,
    PermissionDenied,
    DllMissing,
    Compatibility,
}

impl IssueType {
    pub const ALL: [IssueType; 27] = [
        IssueType::Dns,
        IssueType::Timeout,
        IssueType::Ssl,
        IssueType::PacketLoss,
        IssueType::Throttling,
        IssueType::Proxy,
        IssueType::Vpn,
        IssueType::Wifi,
        IssueType::SlowComputer,
        IssueType::HighCpu,
        IssueType::MemoryLeak,
        IssueType::DiskFull,
        IssueType::Driver,
        IssueType::Bsod,
        IssueType::BootFailure,
        IssueType::Adware,
        IssueType::BrowserHijack,
        IssueType::PopupAds,
        IssueType::Cryptominer,
        IssueType::Ransomware,
        IssueType::Trojan,
        IssueType::Spyware,
        IssueType::AppCrash,
        IssueType::UpdateFailure,
        IssueType::PermissionDenied,
        IssueType::DllMissing,
        IssueType::Compatibility,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Dns => "dns",
            IssueType::Timeout => "timeout",
            IssueType::Ssl => "ssl",
            IssueType::PacketLoss => "packet_loss",
            IssueType::Throttling => "throttling",
            IssueType::Proxy => "proxy",
            IssueType::Vpn => "vpn",
            IssueType::Wifi => "wifi",
            IssueType::SlowComputer => "slow_computer",
            IssueType::HighCpu => "high_cpu",
            IssueType::MemoryLeak => "memory_leak",
            IssueType::DiskFull => "disk_full",
            IssueType::Driver => "driver",
            IssueType::Bsod => "bsod",
            IssueType::BootFailure => "boot_failure",
            IssueType::Adware => "adware",
            IssueType::BrowserHijack => "browser_hijack",
            IssueType::PopupAds => "popup_ads",
            IssueType::Cryptominer => "cryptominer",
            IssueType::Ransomware => "ransomware",
            IssueType::Trojan => "trojan",
            IssueType::Spyware => "spyware",
            IssueType::AppCrash => "app_crash",
            IssueType::UpdateFailure => "update_failure",
            IssueType::PermissionDenied => "permission_denied",
            IssueType::DllMissing => "dll_missing",
            IssueType::Compatibility => "compatibility",
        }
    }

    /// Longer names accepted on input.
    fn alias(&self) -> &'static str {
        match self {
            IssueType::Dns => "dns_failure",
            IssueType::Timeout => "connection_timeout",
            IssueType::Ssl => "ssl_error",
            IssueType::PacketLoss => "packet_loss",
            IssueType::Throttling => "bandwidth_throttling",
            IssueType::Proxy => "proxy_error",
            IssueType::Vpn => "vpn_issues",
            IssueType::Wifi => "wifi_problems",
            IssueType::SlowComputer => "slow",
            IssueType::HighCpu => "cpu",
            IssueType::MemoryLeak => "memory",
            IssueType::DiskFull => "disk",
            IssueType::Driver => "driver_issues",
            IssueType::Bsod => "blue_screen",
            IssueType::BootFailure => "boot",
            IssueType::Adware => "adware_infection",
            IssueType::BrowserHijack => "hijack",
            IssueType::PopupAds => "popups",
            IssueType::Cryptominer => "miner",
            IssueType::Ransomware => "ransom",
            IssueType::Trojan => "trojan_horse",
            IssueType::Spyware => "keylogger",
            IssueType::AppCrash => "crash",
            IssueType::UpdateFailure => "update",
            IssueType::PermissionDenied => "permissions",
            IssueType::DllMissing => "dll",
            IssueType::Compatibility => "incompatible",
        }
    }

    pub fn family(&self) -> IssueFamily {
        match self {
            IssueType::Dns
            | IssueType::Timeout
            | IssueType::Ssl
            | IssueType::PacketLoss
            | IssueType::Throttling
            | IssueType::Proxy
            | IssueType::Vpn
            | IssueType::Wifi => IssueFamily::Network,
            IssueType::SlowComputer
            | IssueType::HighCpu
            | IssueType::MemoryLeak
            | IssueType::DiskFull
            | IssueType::Driver
            | IssueType::Bsod
            | IssueType::BootFailure => IssueFamily::System,
            IssueType::Adware
            | IssueType::BrowserHijack
            | IssueType::PopupAds
            | IssueType::Cryptominer
            | IssueType::Ransomware
            | IssueType::Trojan
            | IssueType::Spyware => IssueFamily::Malware,
            IssueType::AppCrash
            | IssueType::UpdateFailure
            | IssueType::PermissionDenied
            | IssueType::DllMissing
            | IssueType::Compatibility => IssueFamily::Software,
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase().replace('-', "_");
        IssueType::ALL
            .iter()
            .find(|t| t.as_str() == needle || t.alias() == needle)
            .copied()
            .ok_or_else(|| ConfigError::UnknownIssue(s.to_string()))
    }
}

/// Broad grouping of issue types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueFamily {
    Network,
    System,
    Malware,
    Software,
}

impl IssueFamily {
    pub const ALL: [IssueFamily; 4] = [
        IssueFamily::Network,
        IssueFamily::System,
        IssueFamily::Malware,
        IssueFamily::Software,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueFamily::Network => "network",
            IssueFamily::System => "system",
            IssueFamily::Malware => "malware",
            IssueFamily::Software => "software",
        }
    }

    pub fn members(&self) -> impl Iterator<Item = IssueType> + '_ {
        IssueType::ALL.into_iter().filter(move |t| t.family() == *self)
    }

    /// Purchase-intent searches that close out a resolved session.
    pub fn resolution_queries(&self) -> &'static [&'static str] {
        match self {
            IssueFamily::Network => &[
                "best wifi router 2024",
                "buy mesh wifi system",
                "usb wifi adapter for pc",
                "best vpn subscription deal",
                "switch internet provider near me",
            ],
            IssueFamily::System => &[
                "buy new laptop",
                "best ssd upgrade for old pc",
                "ram upgrade kit 16gb",
                "refurbished desktop computer deals",
                "replacement power supply 650w",
            ],
            IssueFamily::Malware => &[
                "best antivirus software 2024",
                "malwarebytes premium price",
                "norton 360 deluxe deal",
                "password manager subscription",
                "buy external backup drive",
            ],
            IssueFamily::Software => &[
                "buy windows 11 license key",
                "microsoft 365 subscription price",
                "office suite alternative download",
                "best pc cleaner software",
                "upgrade to latest version price",
            ],
        }
    }
}

impl fmt::Display for IssueFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueFamily {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        IssueFamily::ALL
            .iter()
            .find(|f| f.as_str() == needle)
            .copied()
            .ok_or_else(|| ConfigError::UnknownIssue(s.to_string()))
    }
}

/// How hurried the simulated user is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    High,
    Medium,
    Low,
}

impl Urgency {
    /// Base wait between issue actions.
    pub fn delay_range(&self) -> DelayRange {
        match self {
            Urgency::High => DelayRange::new(1.0, 6.0),
            Urgency::Medium => DelayRange::new(3.0, 15.0),
            Urgency::Low => DelayRange::new(8.0, 30.0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Urgency::High => "high",
            Urgency::Medium => "medium",
            Urgency::Low => "low",
        }
    }
}

/// Desperation level of generated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrustrationTier {
    Calm,
    Firm,
    Desperate,
    Frantic,
}

impl FrustrationTier {
    pub const ALL: [FrustrationTier; 4] = [
        FrustrationTier::Calm,
        FrustrationTier::Firm,
        FrustrationTier::Desperate,
        FrustrationTier::Frantic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FrustrationTier::Calm => "calm",
            FrustrationTier::Firm => "firm",
            FrustrationTier::Desperate => "desperate",
            FrustrationTier::Frantic => "frantic",
        }
    }
}

impl fmt::Display for FrustrationTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lower bounds of each tier, strictly increasing.
///
/// A count maps to the tier of the largest threshold not above it; counts
/// below the first threshold are calm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "[u32; 4]", into = "[u32; 4]")]
pub struct FrustrationTiers([u32; 4]);

impl FrustrationTiers {
    pub const DEFAULT: FrustrationTiers = FrustrationTiers([1, 3, 7, 12]);

    pub fn new(thresholds: [u32; 4]) -> Result<Self, ConfigError> {
        if thresholds[0] >= 1 && thresholds.windows(2).all(|w| w[0] < w[1]) {
            Ok(Self(thresholds))
        } else {
            Err(ConfigError::Thresholds(thresholds))
        }
    }

    pub fn thresholds(&self) -> [u32; 4] {
        self.0
    }

    pub fn tier(&self, count: u32) -> FrustrationTier {
        self.0
            .iter()
            .rposition(|t| count >= *t)
            .map(|i| FrustrationTier::ALL[i])
            .unwrap_or(FrustrationTier::Calm)
    }
}

impl Default for FrustrationTiers {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<[u32; 4]> for FrustrationTiers {
    type Error = ConfigError;

    fn try_from(value: [u32; 4]) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FrustrationTiers> for [u32; 4] {
    fn from(value: FrustrationTiers) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_table() {
        let tiers = FrustrationTiers::default();
        assert_eq!(tiers.tier(0), FrustrationTier::Calm);
        assert_eq!(tiers.tier(1), FrustrationTier::Calm);
        assert_eq!(tiers.tier(2), FrustrationTier::Calm);
        assert_eq!(tiers.tier(3), FrustrationTier::Firm);
        assert_eq!(tiers.tier(6), FrustrationTier::Firm);
        assert_eq!(tiers.tier(7), FrustrationTier::Desperate);
        assert_eq!(tiers.tier(8), FrustrationTier::Desperate);
        assert_eq!(tiers.tier(11), FrustrationTier::Desperate);
        assert_eq!(tiers.tier(12), FrustrationTier::Frantic);
        assert_eq!(tiers.tier(500), FrustrationTier::Frantic);
    }

    #[test]
    fn test_custom_thresholds() {
        let tiers = FrustrationTiers::new([2, 4, 6, 8]).unwrap();
        assert_eq!(tiers.tier(1), FrustrationTier::Calm);
        assert_eq!(tiers.tier(5), FrustrationTier::Firm);
        assert_eq!(tiers.tier(8), FrustrationTier::Frantic);
        assert!(FrustrationTiers::new([1, 3, 3, 12]).is_err());
        assert!(FrustrationTiers::new([5, 3, 7, 12]).is_err());
        assert!(FrustrationTiers::new([0, 3, 7, 12]).is_err());
    }

    #[test]
    fn test_thresholds_serde() {
        let tiers: FrustrationTiers = serde_json::from_str("[1, 2, 5, 9]").unwrap();
        assert_eq!(tiers.thresholds(), [1, 2, 5, 9]);
        assert!(serde_json::from_str::<FrustrationTiers>("[9, 2, 5, 1]").is_err());
    }

    #[test]
    fn test_issue_names_round_trip() {
        for issue in IssueType::ALL {
            assert_eq!(issue.as_str().parse::<IssueType>().unwrap(), issue);
        }
        assert_eq!("wifi_problems".parse::<IssueType>().unwrap(), IssueType::Wifi);
        assert_eq!("DNS".parse::<IssueType>().unwrap(), IssueType::Dns);
        assert!("printer".parse::<IssueType>().is_err());
    }

    #[test]
    fn test_families_partition_types() {
        let total: usize = IssueFamily::ALL.iter().map(|f| f.members().count()).sum();
        assert_eq!(total, IssueType::ALL.len());
        assert_eq!(IssueFamily::Network.members().count(), 8);
        assert!(IssueFamily::Malware.members().any(|t| t == IssueType::Ransomware));
    }
}
