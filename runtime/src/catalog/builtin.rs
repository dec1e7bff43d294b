//! Built-in category and persona data.

use super::types::{CategoryKind, ContentGroup};

pub(crate) struct CategorySeed {
    pub name: &'static str,
    pub kind: CategoryKind,
    pub group: ContentGroup,
    pub urls: &'static [&'static str],
}

pub(crate) struct PersonaSeed {
    pub name: &'static str,
    pub description: &'static str,
    pub favored: &'static [&'static str],
}

pub(crate) const CATEGORIES: &[CategorySeed] = &[
    CategorySeed {
        name: "Lifestyle",
        kind: CategoryKind::News,
        group: ContentGroup::Core,
        urls: &[
            "https://www.buzzfeed.com",
            "https://www.huffpost.com/life",
            "https://www.refinery29.com",
            "https://www.goodhousekeeping.com",
            "https://www.allrecipes.com",
            "https://www.foodnetwork.com",
        ],
    },
    CategorySeed {
        name: "World",
        kind: CategoryKind::News,
        group: ContentGroup::Core,
        urls: &[
            "https://www.bbc.com/news/world",
            "https://www.reuters.com/world",
            "https://www.aljazeera.com",
            "https://www.theguardian.com/world",
            "https://apnews.com/world-news",
            "https://www.france24.com/en",
            "https://www.dw.com/en",
            "https://www.npr.org/sections/world",
        ],
    },
    CategorySeed {
        name: "Technology",
        kind: CategoryKind::News,
        group: ContentGroup::Core,
        urls: &[
            "https://www.theverge.com",
            "https://techcrunch.com",
            "https://arstechnica.com",
            "https://www.wired.com",
            "https://www.cnet.com",
            "https://www.engadget.com",
            "https://www.zdnet.com",
        ],
    },
    CategorySeed {
        name: "Health",
        kind: CategoryKind::News,
        group: ContentGroup::Core,
        urls: &[
            "https://www.webmd.com",
            "https://www.healthline.com",
            "https://www.medicalnewstoday.com",
            "https://www.health.com",
            "https://www.prevention.com",
        ],
    },
    CategorySeed {
        name: "Trending",
        kind: CategoryKind::News,
        group: ContentGroup::Core,
        urls: &[
            "https://news.google.com",
            "https://www.reddit.com/r/news",
            "https://news.ycombinator.com",
            "https://www.usatoday.com",
            "https://www.nbcnews.com",
            "https://www.cnn.com",
        ],
    },
    CategorySeed {
        name: "SocialNetworkAds",
        kind: CategoryKind::News,
        group: ContentGroup::Core,
        urls: &[
            "https://www.dailymail.co.uk",
            "https://www.unilad.com",
            "https://www.ladbible.com",
            "https://www.independent.co.uk",
            "https://www.businessinsider.com",
            "https://www.msn.com",
            "https://www.techradar.com",
            "https://www.marketwatch.com",
            "https://www.bleacherreport.com",
        ],
    },
    CategorySeed {
        name: "LeftLeaning",
        kind: CategoryKind::News,
        group: ContentGroup::Political,
        urls: &[
            "https://www.msnbc.com",
            "https://www.vox.com",
            "https://www.slate.com",
            "https://www.motherjones.com",
            "https://www.thenation.com",
            "https://www.theatlantic.com",
            "https://www.newyorker.com",
            "https://www.salon.com",
            "https://www.democracynow.org",
            "https://www.propublica.org",
        ],
    },
    CategorySeed {
        name: "RightLeaning",
        kind: CategoryKind::News,
        group: ContentGroup::Political,
        urls: &[
            "https://www.foxnews.com",
            "https://www.dailywire.com",
            "https://www.newsmax.com",
            "https://www.washingtonexaminer.com",
            "https://www.nationalreview.com",
            "https://www.townhall.com",
            "https://www.thefederalist.com",
            "https://www.reason.com",
            "https://www.realclearpolitics.com",
            "https://www.dailycaller.com",
        ],
    },
    CategorySeed {
        name: "Tabloids",
        kind: CategoryKind::News,
        group: ContentGroup::Tabloids,
        urls: &[
            "https://www.tmz.com",
            "https://www.pagesix.com",
            "https://www.eonline.com",
            "https://www.usmagazine.com",
            "https://www.people.com",
            "https://www.etonline.com",
            "https://www.thesun.co.uk",
            "https://www.mirror.co.uk",
        ],
    },
    CategorySeed {
        name: "Hobbies",
        kind: CategoryKind::Hobby,
        group: ContentGroup::Hobbies,
        urls: &[
            "https://www.instructables.com",
            "https://www.ravelry.com",
            "https://www.seriouseats.com",
            "https://www.gardeningknowhow.com",
            "https://www.thespruce.com",
            "https://www.hackaday.com",
            "https://www.adafruit.com",
            "https://www.arduino.cc",
            "https://www.petapixel.com",
            "https://www.dpreview.com",
        ],
    },
    CategorySeed {
        name: "SocialMedia",
        kind: CategoryKind::Social,
        group: ContentGroup::Social,
        urls: &[
            "https://www.facebook.com",
            "https://www.instagram.com",
            "https://www.tiktok.com",
            "https://www.pinterest.com",
            "https://www.linkedin.com",
            "https://www.reddit.com",
            "https://www.tumblr.com",
            "https://www.twitch.tv",
            "https://www.youtube.com",
            "https://www.medium.com",
            "https://mastodon.social",
            "https://bsky.app",
        ],
    },
    CategorySeed {
        name: "Privacy",
        kind: CategoryKind::Privacy,
        group: ContentGroup::Privacy,
        urls: &[
            "https://www.eff.org",
            "https://www.torproject.org",
            "https://www.privacyguides.org",
            "https://www.epic.org",
            "https://www.accessnow.org",
            "https://noyb.eu",
            "https://www.openrightsgroup.org",
            "https://www.schneier.com",
            "https://krebsonsecurity.com",
            "https://www.bleepingcomputer.com",
        ],
    },
    CategorySeed {
        name: "NetworkingIssues",
        kind: CategoryKind::Issue,
        group: ContentGroup::Issues,
        urls: &[
            "https://www.google.com/search?q=wifi+not+connecting",
            "https://www.google.com/search?q=dns+server+not+responding",
            "https://www.google.com/search?q=ethernet+no+internet",
            "https://www.google.com/search?q=router+keeps+disconnecting",
            "https://www.reddit.com/r/HomeNetworking",
            "https://superuser.com/questions/tagged/networking",
            "https://www.speedtest.net",
        ],
    },
    CategorySeed {
        name: "HardwareIssues",
        kind: CategoryKind::Issue,
        group: ContentGroup::Issues,
        urls: &[
            "https://www.google.com/search?q=computer+won%27t+turn+on",
            "https://www.google.com/search?q=cpu+overheating+solutions",
            "https://www.google.com/search?q=monitor+no+signal",
            "https://www.google.com/search?q=usb+device+not+recognized",
            "https://www.reddit.com/r/buildapc",
            "https://www.tomshardware.com/forums",
            "https://pcpartpicker.com",
        ],
    },
    CategorySeed {
        name: "SoftwareIssues",
        kind: CategoryKind::Issue,
        group: ContentGroup::Issues,
        urls: &[
            "https://www.google.com/search?q=windows+update+stuck",
            "https://www.google.com/search?q=program+keeps+crashing",
            "https://www.google.com/search?q=mac+spinning+wheel",
            "https://www.google.com/search?q=linux+kernel+panic",
            "https://answers.microsoft.com",
            "https://askubuntu.com",
            "https://superuser.com",
        ],
    },
    CategorySeed {
        name: "MalwareIssues",
        kind: CategoryKind::Issue,
        group: ContentGroup::Issues,
        urls: &[
            "https://www.google.com/search?q=remove+malware+from+computer",
            "https://www.google.com/search?q=browser+hijacked+fix",
            "https://www.google.com/search?q=adware+removal+tool",
            "https://www.malwarebytes.com",
            "https://www.avast.com",
            "https://www.bleepingcomputer.com/virus-removal",
        ],
    },
    CategorySeed {
        name: "MisconfiguredSettings",
        kind: CategoryKind::Issue,
        group: ContentGroup::Issues,
        urls: &[
            "https://www.google.com/search?q=windows+proxy+settings+wrong",
            "https://www.google.com/search?q=firewall+settings+blocking",
            "https://www.google.com/search?q=sound+output+wrong+device",
            "https://www.google.com/search?q=bios+settings+wrong",
            "https://www.howtogeek.com",
            "https://lifehacker.com",
        ],
    },
];

pub(crate) const PERSONAS: &[PersonaSeed] = &[
    PersonaSeed {
        name: "tech_enthusiast",
        description: "Browses technology, privacy, and hobby sites",
        favored: &["Technology", "Privacy", "Hobbies"],
    },
    PersonaSeed {
        name: "news_junkie",
        description: "Follows world news and trending topics across the political spectrum",
        favored: &["World", "Trending", "LeftLeaning", "RightLeaning"],
    },
    PersonaSeed {
        name: "privacy_advocate",
        description: "Focuses on privacy tools and security resources",
        favored: &["Privacy", "Technology"],
    },
    PersonaSeed {
        name: "social_butterfly",
        description: "Active on social media, lifestyle, and trending content",
        favored: &["SocialMedia", "Lifestyle", "Trending"],
    },
    PersonaSeed {
        name: "entertainment_seeker",
        description: "Tabloids, social media, and entertainment sites",
        favored: &["Tabloids", "SocialMedia", "Lifestyle"],
    },
    PersonaSeed {
        name: "health_conscious",
        description: "Health, wellness, lifestyle, and hobby content",
        favored: &["Health", "Lifestyle", "Hobbies"],
    },
    PersonaSeed {
        name: "political_observer",
        description: "Political news from multiple perspectives",
        favored: &["LeftLeaning", "RightLeaning", "World", "Trending"],
    },
    PersonaSeed {
        name: "hobbyist",
        description: "DIY, crafts, cooking, and technology projects",
        favored: &["Hobbies", "Technology", "Lifestyle"],
    },
    PersonaSeed {
        name: "troubleshooter",
        description: "Technical support searches and problem-solving",
        favored: &[
            "NetworkingIssues",
            "HardwareIssues",
            "SoftwareIssues",
            "MalwareIssues",
            "Technology",
        ],
    },
];
