//! Static descriptor for every issue type.
//!
//! [`pattern`] is an exhaustive match, so adding an [`IssueType`] without a
//! descriptor fails to compile.

use super::types::{IssueType, Urgency};

/// Everything the session needs to act out one issue type.
#[derive(Debug)]
pub struct IssuePattern {
    pub title: &'static str,
    pub description: &'static str,
    pub urgency: Urgency,
    /// Relative likelihood when an issue is drawn at random.
    pub prevalence: f64,
    /// Calm-tier search queries; higher tiers are derived from these.
    pub queries: &'static [&'static str],
    pub support_sites: &'static [&'static str],
    pub forums: &'static [&'static str],
    pub tools: &'static [&'static str],
    /// Causally related issues this one may turn into, with weights.
    pub chains: &'static [(IssueType, f64)],
}

pub fn pattern(issue: IssueType) -> &'static IssuePattern {
    match issue {
        IssueType::Dns => &DNS,
        IssueType::Timeout => &TIMEOUT,
        IssueType::Ssl => &SSL,
        IssueType::PacketLoss => &PACKET_LOSS,
        IssueType::Throttling => &THROTTLING,
        IssueType::Proxy => &PROXY,
        IssueType::Vpn => &VPN,
        IssueType::Wifi => &WIFI,
        IssueType::SlowComputer => &SLOW_COMPUTER,
        IssueType::HighCpu => &HIGH_CPU,
        IssueType::MemoryLeak => &MEMORY_LEAK,
        IssueType::DiskFull => &DISK_FULL,
        IssueType::Driver => &DRIVER,
        IssueType::Bsod => &BSOD,
        IssueType::BootFailure => &BOOT_FAILURE,
        IssueType::Adware => &ADWARE,
        IssueType::BrowserHijack => &BROWSER_HIJACK,
        IssueType::PopupAds => &POPUP_ADS,
        IssueType::Cryptominer => &CRYPTOMINER,
        IssueType::Ransomware => &RANSOMWARE,
        IssueType::Trojan => &TROJAN,
        IssueType::Spyware => &SPYWARE,
        IssueType::AppCrash => &APP_CRASH,
        IssueType::UpdateFailure => &UPDATE_FAILURE,
        IssueType::PermissionDenied => &PERMISSION_DENIED,
        IssueType::DllMissing => &DLL_MISSING,
        IssueType::Compatibility => &COMPATIBILITY,
    }
}

static DNS: IssuePattern = IssuePattern {
    title: "DNS Resolution Failure",
    description: "Domain names stop resolving",
    urgency: Urgency::High,
    prevalence: 1.0,
    queries: &[
        "dns server not responding",
        "dns_probe_finished_nxdomain",
        "server dns address could not be found",
        "flush dns cache windows",
        "err_name_not_resolved chrome",
        "change dns server",
    ],
    support_sites: &[
        "https://support.google.com/chrome/answer/95669",
        "https://www.cloudflare.com/learning/dns/what-is-dns/",
        "https://www.howtogeek.com/167533/the-ultimate-guide-to-changing-your-dns-server/",
    ],
    forums: &[
        "https://www.reddit.com/r/techsupport/search?q=dns+not+working",
        "https://superuser.com/questions/tagged/dns",
    ],
    tools: &["https://www.nirsoft.net/utils/dns_query_sniffer.html"],
    chains: &[(IssueType::Wifi, 0.6), (IssueType::Timeout, 0.4)],
};

static TIMEOUT: IssuePattern = IssuePattern {
    title: "Connection Timeout",
    description: "Pages hang and time out",
    urgency: Urgency::Medium,
    prevalence: 1.0,
    queries: &[
        "connection timed out",
        "err_connection_timed_out",
        "internet connected but pages won't load",
        "website not loading timeout",
        "why do websites keep timing out",
    ],
    support_sites: &[
        "https://www.lifewire.com/fix-err-connection-timed-out-5179936",
        "https://www.hostinger.com/tutorials/err-connection-timed-out",
    ],
    forums: &["https://www.reddit.com/r/techsupport/search?q=connection+timeout"],
    tools: &["https://www.speedtest.net", "https://fast.com"],
    chains: &[
        (IssueType::Dns, 0.4),
        (IssueType::PacketLoss, 0.35),
        (IssueType::Proxy, 0.25),
    ],
};

static SSL: IssuePattern = IssuePattern {
    title: "TLS Certificate Error",
    description: "Browser refuses certificates",
    urgency: Urgency::Medium,
    prevalence: 0.6,
    queries: &[
        "your connection is not private",
        "err_cert_authority_invalid",
        "ssl handshake failed",
        "net::err_cert_date_invalid",
        "ssl certificate verify failed",
    ],
    support_sites: &[
        "https://support.google.com/chrome/answer/6098869",
        "https://letsencrypt.org/docs/",
    ],
    forums: &["https://superuser.com/questions/tagged/ssl"],
    tools: &["https://www.ssllabs.com/ssltest/"],
    chains: &[(IssueType::Proxy, 0.5), (IssueType::Timeout, 0.5)],
};

static PACKET_LOSS: IssuePattern = IssuePattern {
    title: "Packet Loss",
    description: "Lag spikes and dropped packets",
    urgency: Urgency::Medium,
    prevalence: 0.7,
    queries: &[
        "packet loss on ethernet",
        "high ping and packet loss",
        "how to test packet loss",
        "packet loss on wifi only",
        "game lag packet loss",
    ],
    support_sites: &["https://www.pingplotter.com/wp/learn/packet-loss/"],
    forums: &["https://www.reddit.com/r/HomeNetworking/search?q=packet+loss"],
    tools: &["https://www.pingplotter.com", "https://packetlosstest.com"],
    chains: &[(IssueType::Wifi, 0.6), (IssueType::Throttling, 0.4)],
};

static THROTTLING: IssuePattern = IssuePattern {
    title: "Bandwidth Throttling",
    description: "Speeds collapse at certain times",
    urgency: Urgency::Low,
    prevalence: 0.6,
    queries: &[
        "is my isp throttling me",
        "internet slow at night",
        "streaming buffering isp throttle",
        "how to detect bandwidth throttling",
        "speed test lower than plan",
    ],
    support_sites: &["https://www.fcc.gov/consumers/guides/broadband-speed"],
    forums: &["https://www.reddit.com/r/HomeNetworking/search?q=throttling"],
    tools: &["https://www.speedtest.net", "https://wehe.meddle.mobi"],
    chains: &[(IssueType::Vpn, 0.6), (IssueType::PacketLoss, 0.4)],
};

static PROXY: IssuePattern = IssuePattern {
    title: "Proxy Error",
    description: "Traffic stuck behind a proxy setting",
    urgency: Urgency::Low,
    prevalence: 0.5,
    queries: &[
        "err_proxy_connection_failed",
        "unable to connect to proxy server",
        "turn off proxy windows",
        "proxy settings keep changing",
    ],
    support_sites: &[
        "https://support.microsoft.com/en-us/windows/use-a-proxy-server-in-windows",
    ],
    forums: &["https://superuser.com/questions/tagged/proxy"],
    tools: &[],
    chains: &[(IssueType::Timeout, 0.5), (IssueType::Ssl, 0.5)],
};

static VPN: IssuePattern = IssuePattern {
    title: "VPN Problems",
    description: "VPN will not connect or leaks",
    urgency: Urgency::Medium,
    prevalence: 0.8,
    queries: &[
        "vpn connected but no internet",
        "vpn keeps disconnecting",
        "vpn slow speed",
        "dns leak test vpn",
        "vpn not connecting on wifi",
    ],
    support_sites: &["https://www.privacyguides.org/en/vpn/"],
    forums: &["https://www.reddit.com/r/VPN/search?q=not+connecting"],
    tools: &["https://www.dnsleaktest.com", "https://ipleak.net"],
    chains: &[
        (IssueType::Proxy, 0.3),
        (IssueType::Dns, 0.4),
        (IssueType::Ssl, 0.3),
    ],
};

static WIFI: IssuePattern = IssuePattern {
    title: "WiFi Connectivity",
    description: "The WiFi is doing that thing again",
    urgency: Urgency::High,
    prevalence: 1.5,
    queries: &[
        "wifi not connecting",
        "wifi keeps disconnecting",
        "wifi connected but no internet",
        "wifi adapter not showing",
        "wifi signal weak",
        "5ghz wifi not showing",
    ],
    support_sites: &[
        "https://support.microsoft.com/en-us/windows/fix-wi-fi-connection-issues-in-windows",
        "https://support.apple.com/en-us/HT210060",
        "https://www.lifewire.com/troubleshooting-no-wireless-connection-2378241",
    ],
    forums: &[
        "https://www.reddit.com/r/techsupport/search?q=wifi+not+working",
        "https://www.reddit.com/r/HomeNetworking/search?q=wifi+issues",
    ],
    tools: &[
        "https://www.nirsoft.net/utils/wireless_network_watcher.html",
        "https://www.netspotapp.com",
    ],
    chains: &[
        (IssueType::Dns, 0.4),
        (IssueType::Timeout, 0.3),
        (IssueType::Driver, 0.3),
    ],
};

static SLOW_COMPUTER: IssuePattern = IssuePattern {
    title: "Slow Computer",
    description: "Everything takes forever",
    urgency: Urgency::Medium,
    prevalence: 1.5,
    queries: &[
        "computer running slow",
        "why is my laptop so slow",
        "speed up windows 11",
        "disable startup programs",
        "computer slow after update",
    ],
    support_sites: &[
        "https://support.microsoft.com/en-us/windows/tips-to-improve-pc-performance-in-windows",
        "https://www.howtogeek.com/tag/performance/",
    ],
    forums: &["https://www.reddit.com/r/techsupport/search?q=computer+slow"],
    tools: &[
        "https://www.ccleaner.com",
        "https://learn.microsoft.com/en-us/sysinternals/downloads/autoruns",
    ],
    chains: &[
        (IssueType::HighCpu, 0.3),
        (IssueType::MemoryLeak, 0.25),
        (IssueType::DiskFull, 0.25),
        (IssueType::Adware, 0.2),
    ],
};

static HIGH_CPU: IssuePattern = IssuePattern {
    title: "High CPU Usage",
    description: "Fans at full speed doing nothing",
    urgency: Urgency::Medium,
    prevalence: 1.0,
    queries: &[
        "cpu at 100 percent",
        "high cpu usage idle",
        "system process high cpu",
        "laptop fan always on",
        "what is using my cpu",
    ],
    support_sites: &["https://www.howtogeek.com/tag/cpu/"],
    forums: &["https://www.reddit.com/r/techsupport/search?q=100+cpu"],
    tools: &["https://learn.microsoft.com/en-us/sysinternals/downloads/process-explorer"],
    chains: &[
        (IssueType::SlowComputer, 0.4),
        (IssueType::Cryptominer, 0.35),
        (IssueType::MemoryLeak, 0.25),
    ],
};

static MEMORY_LEAK: IssuePattern = IssuePattern {
    title: "Memory Leak",
    description: "RAM fills up over time",
    urgency: Urgency::Medium,
    prevalence: 0.7,
    queries: &[
        "memory usage keeps increasing",
        "chrome using too much ram",
        "out of memory error",
        "how to find memory leak windows",
    ],
    support_sites: &["https://support.google.com/chrome/answer/12929150"],
    forums: &["https://superuser.com/questions/tagged/memory-leaks"],
    tools: &["https://learn.microsoft.com/en-us/sysinternals/downloads/rammap"],
    chains: &[(IssueType::HighCpu, 0.5), (IssueType::SlowComputer, 0.5)],
};

static DISK_FULL: IssuePattern = IssuePattern {
    title: "Disk Full",
    description: "No space left on the main drive",
    urgency: Urgency::Medium,
    prevalence: 0.9,
    queries: &[
        "c drive full for no reason",
        "how to free up disk space",
        "what is taking up storage",
        "delete windows old folder",
        "low disk space warning",
    ],
    support_sites: &[
        "https://support.microsoft.com/en-us/windows/free-up-drive-space-in-windows",
    ],
    forums: &["https://www.reddit.com/r/techsupport/search?q=disk+full"],
    tools: &["https://windirstat.net", "https://www.jam-software.com/treesize_free"],
    chains: &[(IssueType::SlowComputer, 0.5), (IssueType::UpdateFailure, 0.5)],
};

static DRIVER: IssuePattern = IssuePattern {
    title: "Driver Problems",
    description: "Devices vanish after an update",
    urgency: Urgency::Medium,
    prevalence: 0.8,
    queries: &[
        "driver not working after update",
        "roll back driver windows",
        "device manager yellow exclamation",
        "graphics driver crash",
        "audio driver missing",
    ],
    support_sites: &[
        "https://support.microsoft.com/en-us/windows/update-drivers-manually-in-windows",
        "https://www.nvidia.com/Download/index.aspx",
    ],
    forums: &["https://www.reddit.com/r/techsupport/search?q=driver+issue"],
    tools: &["https://www.guru3d.com/download/display-driver-uninstaller-download/"],
    chains: &[
        (IssueType::Bsod, 0.4),
        (IssueType::Wifi, 0.3),
        (IssueType::SlowComputer, 0.3),
    ],
};

static BSOD: IssuePattern = IssuePattern {
    title: "Blue Screen",
    description: "Random crashes with a stop code",
    urgency: Urgency::High,
    prevalence: 0.8,
    queries: &[
        "blue screen of death",
        "critical_process_died",
        "irql_not_less_or_equal",
        "bsod on startup",
        "how to read minidump",
    ],
    support_sites: &[
        "https://support.microsoft.com/en-us/windows/resolving-blue-screen-errors-in-windows",
    ],
    forums: &["https://www.tenforums.com/bsod-crashes-debugging/"],
    tools: &["https://www.nirsoft.net/utils/blue_screen_view.html"],
    chains: &[
        (IssueType::Driver, 0.5),
        (IssueType::MemoryLeak, 0.25),
        (IssueType::HighCpu, 0.25),
    ],
};

static BOOT_FAILURE: IssuePattern = IssuePattern {
    title: "Boot Failure",
    description: "The machine will not start",
    urgency: Urgency::High,
    prevalence: 0.5,
    queries: &[
        "computer won't boot",
        "stuck on boot screen",
        "no bootable device found",
        "automatic repair loop",
    ],
    support_sites: &[
        "https://support.microsoft.com/en-us/windows/windows-startup-settings",
    ],
    forums: &["https://www.reddit.com/r/techsupport/search?q=won%27t+boot"],
    tools: &[],
    chains: &[],
};

static ADWARE: IssuePattern = IssuePattern {
    title: "Adware Infection",
    description: "Ads everywhere, even where they should not be",
    urgency: Urgency::High,
    prevalence: 1.0,
    queries: &[
        "how to remove adware",
        "ads popping up on desktop",
        "adware removal tool free",
        "strange ads on every website",
    ],
    support_sites: &["https://www.malwarebytes.com/adware"],
    forums: &[
        "https://www.bleepingcomputer.com/forums/f/22/virus-trojan-spyware-and-malware-removal-help/",
    ],
    tools: &["https://www.malwarebytes.com/adwcleaner"],
    chains: &[
        (IssueType::BrowserHijack, 0.4),
        (IssueType::PopupAds, 0.4),
        (IssueType::SlowComputer, 0.2),
    ],
};

static BROWSER_HIJACK: IssuePattern = IssuePattern {
    title: "Browser Hijack",
    description: "Homepage and search engine keep changing",
    urgency: Urgency::High,
    prevalence: 0.8,
    queries: &[
        "browser homepage changed by itself",
        "search engine keeps changing to yahoo",
        "remove browser hijacker",
        "chrome managed by your organization",
    ],
    support_sites: &["https://support.google.com/chrome/answer/2765944"],
    forums: &["https://www.reddit.com/r/techsupport/search?q=browser+hijacker"],
    tools: &["https://www.malwarebytes.com/adwcleaner"],
    chains: &[
        (IssueType::Adware, 0.4),
        (IssueType::PopupAds, 0.3),
        (IssueType::Spyware, 0.3),
    ],
};

static POPUP_ADS: IssuePattern = IssuePattern {
    title: "Popup Ads",
    description: "Notification spam and popups",
    urgency: Urgency::Medium,
    prevalence: 0.9,
    queries: &[
        "stop popup ads chrome",
        "remove notification spam",
        "pop ups in bottom right corner",
        "block popups windows",
    ],
    support_sites: &["https://support.google.com/chrome/answer/95472"],
    forums: &["https://www.reddit.com/r/techsupport/search?q=popup+ads"],
    tools: &["https://ublockorigin.com"],
    chains: &[(IssueType::Adware, 0.6), (IssueType::BrowserHijack, 0.4)],
};

static CRYPTOMINER: IssuePattern = IssuePattern {
    title: "Cryptominer",
    description: "Something is mining on this machine",
    urgency: Urgency::High,
    prevalence: 0.5,
    queries: &[
        "crypto miner virus removal",
        "gpu usage 100 when idle",
        "hidden miner detection",
        "xmrig found on computer",
    ],
    support_sites: &["https://www.malwarebytes.com/cryptojacking"],
    forums: &["https://www.bleepingcomputer.com/forums/t/miner/"],
    tools: &["https://www.malwarebytes.com/mwb-download"],
    chains: &[
        (IssueType::HighCpu, 0.4),
        (IssueType::SlowComputer, 0.3),
        (IssueType::Trojan, 0.3),
    ],
};

static RANSOMWARE: IssuePattern = IssuePattern {
    title: "Ransomware",
    description: "Files encrypted, note on the desktop",
    urgency: Urgency::High,
    prevalence: 0.3,
    queries: &[
        "files encrypted ransom note",
        "ransomware decryptor",
        "how to recover encrypted files",
        "should i pay ransomware",
    ],
    support_sites: &["https://www.nomoreransom.org", "https://www.cisa.gov/stopransomware"],
    forums: &["https://www.bleepingcomputer.com/forums/f/239/ransomware-help-tech-support/"],
    tools: &["https://id-ransomware.malwarehunterteam.com"],
    chains: &[(IssueType::Trojan, 0.5), (IssueType::Spyware, 0.5)],
};

static TROJAN: IssuePattern = IssuePattern {
    title: "Trojan",
    description: "Antivirus flagged something nasty",
    urgency: Urgency::High,
    prevalence: 0.6,
    queries: &[
        "trojan detected what to do",
        "trojan:win32 removal",
        "is my computer hacked",
        "remove trojan without antivirus",
    ],
    support_sites: &["https://www.microsoft.com/en-us/wdsi/threats"],
    forums: &[
        "https://www.bleepingcomputer.com/forums/f/22/virus-trojan-spyware-and-malware-removal-help/",
    ],
    tools: &["https://www.eset.com/int/home/online-scanner/"],
    chains: &[
        (IssueType::Spyware, 0.4),
        (IssueType::Cryptominer, 0.3),
        (IssueType::Ransomware, 0.3),
    ],
};

static SPYWARE: IssuePattern = IssuePattern {
    title: "Spyware",
    description: "Worried someone is watching",
    urgency: Urgency::High,
    prevalence: 0.6,
    queries: &[
        "how to tell if spyware is installed",
        "keylogger detection",
        "webcam light turns on by itself",
        "remove stalkerware",
    ],
    support_sites: &["https://stopstalkerware.org"],
    forums: &["https://www.reddit.com/r/privacy/search?q=spyware"],
    tools: &["https://www.malwarebytes.com/mwb-download"],
    chains: &[
        (IssueType::Trojan, 0.4),
        (IssueType::BrowserHijack, 0.3),
        (IssueType::Adware, 0.3),
    ],
};

static APP_CRASH: IssuePattern = IssuePattern {
    title: "Application Crash",
    description: "A program closes on launch",
    urgency: Urgency::Medium,
    prevalence: 1.0,
    queries: &[
        "program crashes on startup",
        "application has stopped working",
        "app closes immediately after opening",
        "event viewer application error",
    ],
    support_sites: &["https://support.microsoft.com/en-us/windows/troubleshoot-apps"],
    forums: &["https://www.reddit.com/r/techsupport/search?q=app+crashing"],
    tools: &["https://learn.microsoft.com/en-us/sysinternals/downloads/procmon"],
    chains: &[
        (IssueType::DllMissing, 0.4),
        (IssueType::Compatibility, 0.3),
        (IssueType::Driver, 0.3),
    ],
};

static UPDATE_FAILURE: IssuePattern = IssuePattern {
    title: "Update Failure",
    description: "Updates fail and roll back",
    urgency: Urgency::Medium,
    prevalence: 0.9,
    queries: &[
        "windows update stuck",
        "update failed error 0x80070002",
        "undoing changes made to your computer",
        "reset windows update components",
    ],
    support_sites: &[
        "https://support.microsoft.com/en-us/windows/troubleshoot-problems-updating-windows",
    ],
    forums: &["https://answers.microsoft.com/en-us/search?query=update+failed"],
    tools: &[],
    chains: &[(IssueType::DiskFull, 0.5), (IssueType::SlowComputer, 0.5)],
};

static PERMISSION_DENIED: IssuePattern = IssuePattern {
    title: "Permission Denied",
    description: "Access denied on your own files",
    urgency: Urgency::Low,
    prevalence: 0.5,
    queries: &[
        "access denied folder windows",
        "you need permission to perform this action",
        "take ownership of folder",
        "permission denied even as admin",
    ],
    support_sites: &["https://support.microsoft.com/en-us/windows/fix-access-denied-errors"],
    forums: &["https://superuser.com/questions/tagged/permissions"],
    tools: &[],
    chains: &[],
};

static DLL_MISSING: IssuePattern = IssuePattern {
    title: "Missing DLL",
    description: "A program cannot find a library",
    urgency: Urgency::Low,
    prevalence: 0.6,
    queries: &[
        "dll is missing from your computer",
        "vcruntime140.dll not found",
        "msvcp140.dll missing",
        "reinstall visual c++ redistributable",
    ],
    support_sites: &[
        "https://learn.microsoft.com/en-us/cpp/windows/latest-supported-vc-redist",
    ],
    forums: &["https://www.reddit.com/r/techsupport/search?q=dll+missing"],
    tools: &[],
    chains: &[(IssueType::AppCrash, 0.5), (IssueType::UpdateFailure, 0.5)],
};

static COMPATIBILITY: IssuePattern = IssuePattern {
    title: "Compatibility",
    description: "Old software on a new system",
    urgency: Urgency::Low,
    prevalence: 0.4,
    queries: &[
        "run old program on windows 11",
        "compatibility mode ignored",
        "this app can't run on your pc",
        "32 bit program on 64 bit windows",
    ],
    support_sites: &[
        "https://support.microsoft.com/en-us/windows/make-older-apps-or-programs-compatible-with-windows",
    ],
    forums: &["https://www.vogons.org"],
    tools: &[],
    chains: &[(IssueType::AppCrash, 0.6), (IssueType::Driver, 0.4)],
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::plugin::is_valid_target;

    #[test]
    fn test_every_pattern_well_formed() {
        for issue in IssueType::ALL {
            let p = pattern(issue);
            assert!(!p.queries.is_empty(), "{issue} has no queries");
            assert!(!p.support_sites.is_empty(), "{issue} has no support sites");
            assert!(p.prevalence > 0.0);
            for url in p.support_sites.iter().chain(p.forums).chain(p.tools) {
                assert!(is_valid_target(url), "{issue}: bad url {url}");
            }
            for (target, weight) in p.chains {
                assert_ne!(*target, issue, "{issue} chains to itself");
                assert!(*weight > 0.0);
            }
        }
    }

    #[test]
    fn test_wifi_calm_query_present() {
        assert!(pattern(IssueType::Wifi).queries.contains(&"wifi not connecting"));
    }

    #[test]
    fn test_some_types_terminal() {
        assert!(pattern(IssueType::BootFailure).chains.is_empty());
        assert!(!pattern(IssueType::Wifi).chains.is_empty());
    }
}
