//! `chaff personas`, `chaff issues` and `chaff catalog`.

use crate::catalog::Catalog;
use crate::cli::output::{self, Styled};
use crate::issue::{pattern, IssueFamily, IssueType};
use anyhow::Result;
use serde_json::json;

pub fn personas(catalog: &Catalog) -> Result<()> {
    if output::is_json() {
        output::print_json(&serde_json::to_value(catalog.personas())?);
        return Ok(());
    }
    let s = Styled::new();
    output::print_section(&s, &format!("Personas ({})", catalog.personas().len()));
    for persona in catalog.personas() {
        eprintln!("    {:<16} {}", s.bold(&persona.name), persona.description);
        eprintln!("    {:<16} {}", "", s.dim(&persona.favored.join(", ")));
    }
    Ok(())
}

pub fn issues(family: Option<&str>) -> Result<()> {
    let families: Vec<IssueFamily> = match family {
        Some(name) => vec![name.parse()?],
        None => IssueFamily::ALL.to_vec(),
    };

    if output::is_json() {
        let value: Vec<_> = families
            .iter()
            .flat_map(|f| f.members())
            .map(issue_json)
            .collect();
        output::print_json(&serde_json::Value::Array(value));
        return Ok(());
    }

    let s = Styled::new();
    for family in families {
        output::print_section(&s, family.as_str());
        for issue in family.members() {
            let p = pattern(issue);
            eprintln!(
                "    {:<18} {:<32} {}",
                issue.as_str(),
                p.title,
                s.dim(&format!("urgency {}", p.urgency.as_str()))
            );
        }
        eprintln!();
    }
    Ok(())
}

fn issue_json(issue: IssueType) -> serde_json::Value {
    let p = pattern(issue);
    json!({
        "name": issue.as_str(),
        "family": issue.family().as_str(),
        "title": p.title,
        "description": p.description,
        "urgency": p.urgency.as_str(),
        "chains": p.chains.iter().map(|(t, _)| t.as_str()).collect::<Vec<_>>(),
    })
}

pub fn catalog(catalog: &Catalog) -> Result<()> {
    if output::is_json() {
        output::print_json(&serde_json::to_value(catalog.categories())?);
        return Ok(());
    }
    let s = Styled::new();
    output::print_section(&s, &format!("Categories ({})", catalog.categories().len()));
    for category in catalog.categories() {
        eprintln!(
            "    {:<20} {:<8} {:<10} {} urls",
            category.name,
            category.kind.as_str(),
            s.dim(&format!("{:?}", category.group).to_lowercase()),
            category.urls.len()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_json() {
        let value = issue_json(IssueType::Dns);
        assert_eq!(value["name"], "dns");
        assert_eq!(value["family"], "network");
        assert_eq!(value["chains"][0], "wifi");
    }

    #[test]
    fn test_unknown_family() {
        assert!(issues(Some("plumbing")).is_err());
    }
}
