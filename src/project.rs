//! The project record assembled by the pipeline.
//!
//! Stages fill a [`ProjectDraft`] field by field; [`ProjectRecord::from_draft`]
//! applies fallbacks and enforces the record's invariants once everything
//! known has been collected.

use crate::error::{PortfolioError, Result};
use crate::render::project_filename;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Maximum number of tech-stack badges on a project
pub const MAX_TECH_STACK: usize = 4;

/// Card image used when nothing better is known
pub const PLACEHOLDER_IMAGE: &str = "images/project-placeholder.png";

/// One technology in a project's tech stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    /// Short label drawn inside the badge, e.g. `TS`
    pub abbreviation: String,
    /// Display name, e.g. `TypeScript`
    pub name: String,
    /// One-line description shown under the name
    pub description: String,
    /// CSS gradient used as the badge background
    pub gradient: String,
}

impl Badge {
    pub fn new(abbreviation: &str, name: &str, description: &str, gradient: &str) -> Self {
        Self {
            abbreviation: abbreviation.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            gradient: gradient.to_string(),
        }
    }
}

/// A feature bullet lifted from the README
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub title: String,
    pub description: String,
}

/// One installation step with its literal command text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallStep {
    pub title: String,
    pub description: String,
    pub command: String,
}

/// Partially known project data, filled in stage by stage
#[derive(Debug, Clone, Default)]
pub struct ProjectDraft {
    pub number_label: Option<String>,
    pub title: Option<String>,
    pub tagline: Option<String>,
    pub description: Option<String>,
    pub repo_url: String,
    pub demo_url: Option<String>,
    pub social_url: Option<String>,
    pub image_url: Option<String>,
    pub tech_stack: Vec<Badge>,
    pub features: Vec<Feature>,
    pub install_steps: Vec<InstallStep>,
    pub stars: u64,
    pub forks: u64,
}

/// A complete portfolio entry, ready for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub number_label: String,
    pub created: NaiveDate,
    pub title: String,
    pub tagline: String,
    pub description: String,
    pub repo_url: String,
    pub demo_url: Option<String>,
    pub social_url: Option<String>,
    pub image_url: String,
    pub tech_stack: Vec<Badge>,
    pub features: Vec<Feature>,
    pub install_steps: Vec<InstallStep>,
    pub cta_title: String,
    pub cta_description: String,
    pub stars: u64,
    pub forks: u64,
}

impl ProjectRecord {
    /// Finalizes a draft created on `created`
    ///
    /// Fails when the title is missing or blank. The tech stack is truncated
    /// to [`MAX_TECH_STACK`] entries.
    pub fn from_draft(draft: ProjectDraft, created: NaiveDate) -> Result<Self> {
        let title = non_blank(draft.title)
            .ok_or_else(|| PortfolioError::Validation("Project title must not be empty".into()))?;
        let number_label = non_blank(draft.number_label)
            .ok_or_else(|| PortfolioError::Validation("Project number must not be empty".into()))?;

        let description = non_blank(draft.description);
        let tagline = non_blank(draft.tagline)
            .or_else(|| description.as_deref().map(first_sentence))
            .unwrap_or_else(|| format!("{} is a new project in the portfolio.", title));
        let description = description.unwrap_or_else(|| tagline.clone());

        let mut tech_stack = draft.tech_stack;
        tech_stack.truncate(MAX_TECH_STACK);

        let cta_description = format!(
            "Dive into the source of {} on GitHub, star the repository, or open an issue with ideas.",
            title
        );

        Ok(Self {
            number_label,
            created,
            tagline,
            description,
            repo_url: draft.repo_url,
            demo_url: non_blank(draft.demo_url),
            social_url: non_blank(draft.social_url),
            image_url: non_blank(draft.image_url).unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            tech_stack,
            features: draft.features,
            install_steps: draft.install_steps,
            cta_title: "Explore the Code".to_string(),
            cta_description,
            stars: draft.stars,
            forks: draft.forks,
            title,
        })
    }

    /// Name of the generated page, `day-<n>-<slug>.html`
    pub fn filename(&self) -> String {
        project_filename(&self.number_label, &self.title)
    }

    /// Creation date as shown on the page
    pub fn display_date(&self) -> String {
        self.created.format("%B %-d, %Y").to_string()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// First sentence of `text`, or the whole text when it has no sentence break
fn first_sentence(text: &str) -> String {
    match text.find(". ") {
        Some(idx) => text[..=idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 9).unwrap()
    }

    fn draft() -> ProjectDraft {
        ProjectDraft {
            number_label: Some("Project 7".into()),
            title: Some("My App".into()),
            repo_url: "https://github.com/octo/my-app".into(),
            ..ProjectDraft::default()
        }
    }

    #[test]
    fn test_blank_title_is_rejected() {
        let mut blank = draft();
        blank.title = Some("   ".into());
        assert!(matches!(
            ProjectRecord::from_draft(blank, date()),
            Err(PortfolioError::Validation(_))
        ));

        let mut missing = draft();
        missing.title = None;
        assert!(ProjectRecord::from_draft(missing, date()).is_err());
    }

    #[test]
    fn test_tech_stack_is_capped() {
        let mut d = draft();
        d.tech_stack = (0..6)
            .map(|i| Badge::new("X", &format!("Tech {}", i), "", ""))
            .collect();
        let record = ProjectRecord::from_draft(d, date()).unwrap();
        assert_eq!(record.tech_stack.len(), MAX_TECH_STACK);
        assert_eq!(record.tech_stack[3].name, "Tech 3");
    }

    #[test]
    fn test_fallbacks() {
        let mut d = draft();
        d.description = Some("Tracks job applications. Built over a weekend.".into());
        d.demo_url = Some("".into());
        let record = ProjectRecord::from_draft(d, date()).unwrap();

        assert_eq!(record.tagline, "Tracks job applications.");
        assert_eq!(record.demo_url, None);
        assert_eq!(record.image_url, PLACEHOLDER_IMAGE);
        assert_eq!(record.display_date(), "March 9, 2024");
        assert_eq!(record.filename(), "day-7-my-app.html");
    }

    #[test]
    fn test_tagline_without_description() {
        let record = ProjectRecord::from_draft(draft(), date()).unwrap();
        assert_eq!(record.tagline, "My App is a new project in the portfolio.");
        assert_eq!(record.description, record.tagline);
    }
}
