//! Persona and time-of-day profile selection.

use crate::catalog::{Catalog, Persona};
use chrono::Timelike;
use serde::Serialize;

/// Coarse time-of-day bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPart {
    Morning,
    Work,
    Evening,
    Night,
}

impl DayPart {
    /// Bucket for a local hour (0 to 23). Out-of-range hours wrap.
    pub fn from_hour(hour: u32) -> Self {
        match hour % 24 {
            6..=8 => DayPart::Morning,
            9..=16 => DayPart::Work,
            17..=21 => DayPart::Evening,
            _ => DayPart::Night,
        }
    }

    pub fn now() -> Self {
        Self::from_hour(chrono::Local::now().hour())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DayPart::Morning => "morning",
            DayPart::Work => "work",
            DayPart::Evening => "evening",
            DayPart::Night => "night",
        }
    }

    /// Categories this part of the day leans towards.
    pub fn favored(&self) -> &'static [&'static str] {
        match self {
            DayPart::Morning => &["World", "Trending", "Health"],
            DayPart::Work => &["Technology", "World", "Privacy"],
            DayPart::Evening => &["Lifestyle", "Hobbies", "SocialMedia"],
            DayPart::Night => &["SocialMedia", "Tabloids", "Trending"],
        }
    }
}

/// Resolve the persona a worker should browse as.
///
/// Without scheduling this is just `configured`. With scheduling the
/// configured persona's favorites come first, followed by the day-part
/// favorites that exist in `catalog`.
pub fn resolve_persona(
    catalog: &Catalog,
    configured: Option<&Persona>,
    scheduled: bool,
    part: DayPart,
) -> Option<Persona> {
    if !scheduled {
        return configured.cloned();
    }

    let mut favored: Vec<String> = configured
        .map(|p| p.favored.clone())
        .unwrap_or_default();
    for name in part.favored() {
        if catalog.category(name).is_some() && !favored.iter().any(|f| f == name) {
            favored.push(name.to_string());
        }
    }
    if favored.is_empty() {
        return configured.cloned();
    }

    let name = match configured {
        Some(p) => format!("{}@{}", p.name, part.as_str()),
        None => format!("schedule@{}", part.as_str()),
    };
    Some(Persona {
        name,
        description: format!("{} profile", part.as_str()),
        favored,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ContentFilter;

    #[test]
    fn test_day_part_boundaries() {
        assert_eq!(DayPart::from_hour(5), DayPart::Night);
        assert_eq!(DayPart::from_hour(6), DayPart::Morning);
        assert_eq!(DayPart::from_hour(9), DayPart::Work);
        assert_eq!(DayPart::from_hour(16), DayPart::Work);
        assert_eq!(DayPart::from_hour(17), DayPart::Evening);
        assert_eq!(DayPart::from_hour(22), DayPart::Night);
        assert_eq!(DayPart::from_hour(0), DayPart::Night);
        assert_eq!(DayPart::from_hour(30), DayPart::Morning);
    }

    #[test]
    fn test_unscheduled_passthrough() {
        let catalog = Catalog::builtin();
        let persona = catalog.persona("hobbyist").cloned();
        let resolved = resolve_persona(&catalog, persona.as_ref(), false, DayPart::Night);
        assert_eq!(resolved, persona);
        assert!(resolve_persona(&catalog, None, false, DayPart::Night).is_none());
    }

    #[test]
    fn test_schedule_blends_persona_first() {
        let catalog = Catalog::builtin();
        let persona = catalog.persona("privacy_advocate").unwrap();
        let resolved = resolve_persona(&catalog, Some(persona), true, DayPart::Evening).unwrap();
        assert_eq!(resolved.name, "privacy_advocate@evening");
        assert_eq!(
            resolved.favored,
            vec!["Privacy", "Technology", "Lifestyle", "Hobbies", "SocialMedia"]
        );
    }

    #[test]
    fn test_schedule_skips_unknown_categories() {
        let catalog = Catalog::builtin().restrict(&ContentFilter::default(), None);
        let resolved = resolve_persona(&catalog, None, true, DayPart::Night).unwrap();
        assert_eq!(resolved.favored, vec!["Trending"]);
    }

    #[test]
    fn test_work_hours_dedup() {
        let catalog = Catalog::builtin();
        let persona = catalog.persona("tech_enthusiast").unwrap();
        let resolved = resolve_persona(&catalog, Some(persona), true, DayPart::Work).unwrap();
        assert_eq!(
            resolved.favored,
            vec!["Technology", "Privacy", "Hobbies", "World"]
        );
    }
}
