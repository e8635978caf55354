//! HTML generation for a project page and its gallery card.
//!
//! Both outputs come from fixed templates under `templates/` with
//! `{{name}}` placeholders. Every value taken from the record is HTML-escaped
//! before substitution; the repeated blocks (badges, features, steps, links)
//! are assembled here.

use crate::config::Config;
use crate::processors::tech_stack::placeholder_badges;
use crate::project::{Badge, InstallStep, ProjectRecord};
use chrono::Utc;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fmt::Write;
use std::path::Path;

const PROJECT_TEMPLATE: &str = include_str!("../templates/project.html");
const CARD_TEMPLATE: &str = include_str!("../templates/card.html");

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(r"\{\{(\w+)\}\}").unwrap();
    static ref NON_ALPHANUMERIC: Regex = Regex::new(r"[^a-z0-9]+").unwrap();
    static ref FIRST_INTEGER: Regex = Regex::new(r"\d+").unwrap();
}

/// Relative links between the gallery page and project pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteLinks {
    /// Directory of project pages as seen from the gallery page
    pub pages_dir: String,
    /// Gallery page as seen from a project page
    pub gallery_href: String,
}

impl SiteLinks {
    /// Links for the configured layout; both config paths are relative to the site root
    pub fn from_config(config: &Config) -> Self {
        let site = &config.site;
        let gallery_dir = site.gallery_page.parent().unwrap_or_else(|| Path::new(""));
        Self {
            pages_dir: relative_url(&site.projects_dir, gallery_dir),
            gallery_href: relative_url(&site.gallery_page, &site.projects_dir),
        }
    }

    fn page_href(&self, filename: &str) -> String {
        if self.pages_dir.is_empty() {
            filename.to_string()
        } else {
            format!("{}/{}", self.pages_dir.trim_end_matches('/'), filename)
        }
    }
}

impl Default for SiteLinks {
    fn default() -> Self {
        Self {
            pages_dir: "projects".to_string(),
            gallery_href: "../projects.html".to_string(),
        }
    }
}

/// `target` as seen from the directory `base`, with `/` separators
fn relative_url(target: &Path, base: &Path) -> String {
    let relative = pathdiff::diff_paths(target, base).unwrap_or_else(|| target.to_path_buf());
    url_path(&relative)
}

fn url_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Lowercase, with every run of non-alphanumeric characters collapsed to one hyphen
///
/// `"My Cool--App!"` becomes `"my-cool-app"`.
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    NON_ALPHANUMERIC
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// File name for a project page: `day-<n>-<slug>.html`
///
/// `<n>` is the first integer in `number_label`, or the current Unix
/// timestamp when the label has none.
pub fn project_filename(number_label: &str, title: &str) -> String {
    let number = FIRST_INTEGER
        .find(number_label)
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .unwrap_or_else(|| Utc::now().timestamp().unsigned_abs());

    let slug = slugify(title);
    let slug = if slug.is_empty() { "project".to_string() } else { slug };
    format!("day-{}-{}.html", number, slug)
}

/// Escapes text for use in HTML content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders the standalone project page
pub fn render_project_page(record: &ProjectRecord, links: &SiteLinks) -> String {
    let mut values = common_values(record);
    values.insert("gallery_href", escape_html(&links.gallery_href));
    values.insert("date", escape_html(&record.display_date()));
    values.insert("description", escape_html(&record.description));
    values.insert("stars", record.stars.to_string());
    values.insert("forks", record.forks.to_string());
    values.insert("cta_title", escape_html(&record.cta_title));
    values.insert("cta_description", escape_html(&record.cta_description));
    values.insert("links", page_links(record));
    values.insert("tech_stack", tech_cards(&badges_or_placeholder(record)));
    values.insert("features", features_section(record));
    values.insert("install_steps", install_items(&install_steps_or_default(record)));

    fill(PROJECT_TEMPLATE, &values)
}

/// Renders the gallery card for the project
pub fn render_card(record: &ProjectRecord, links: &SiteLinks) -> String {
    let filename = record.filename();
    let mut values = common_values(record);
    values.insert("slug", escape_html(&slugify(&record.title)));
    values.insert("filename", escape_html(&filename));
    values.insert("page_href", escape_html(&links.page_href(&filename)));
    values.insert("links", card_links(record));

    let mut tags = String::new();
    for badge in badges_or_placeholder(record) {
        let _ = writeln!(tags, "                        <span class=\"tag\">{}</span>", escape_html(&badge.name));
    }
    values.insert("tags", tags);

    fill(CARD_TEMPLATE, &values)
}

fn common_values(record: &ProjectRecord) -> HashMap<&'static str, String> {
    HashMap::from([
        ("title", escape_html(&record.title)),
        ("tagline", escape_html(&record.tagline)),
        ("number_label", escape_html(&record.number_label)),
        ("image_url", escape_html(&record.image_url)),
        ("repo_url", escape_html(&record.repo_url)),
    ])
}

/// Replaces every `{{name}}` in one pass; unknown names render as nothing
fn fill(template: &str, values: &HashMap<&'static str, String>) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            values.get(&caps[1]).cloned().unwrap_or_else(|| {
                log::warn!("Template placeholder '{}' has no value", &caps[1]);
                String::new()
            })
        })
        .into_owned()
}

fn badges_or_placeholder(record: &ProjectRecord) -> Vec<Badge> {
    if record.tech_stack.is_empty() {
        placeholder_badges()
    } else {
        record.tech_stack.clone()
    }
}

fn install_steps_or_default(record: &ProjectRecord) -> Vec<InstallStep> {
    if !record.install_steps.is_empty() {
        return record.install_steps.clone();
    }
    let dir = record.repo_url.trim_end_matches('/').rsplit('/').next().unwrap_or("");
    vec![InstallStep {
        title: "Step 1".to_string(),
        description: "Clone the repository".to_string(),
        command: format!("git clone {}.git\ncd {}", record.repo_url.trim_end_matches('/'), dir),
    }]
}

fn page_links(record: &ProjectRecord) -> String {
    let mut out = String::new();
    if let Some(demo) = &record.demo_url {
        let _ = writeln!(
            out,
            "            <a href=\"{}\" class=\"btn btn-secondary\" target=\"_blank\" rel=\"noopener\">Watch Demo</a>",
            escape_html(demo)
        );
    }
    if let Some(social) = &record.social_url {
        let _ = writeln!(
            out,
            "            <a href=\"{}\" class=\"btn btn-secondary\" target=\"_blank\" rel=\"noopener\">Read the Post</a>",
            escape_html(social)
        );
    }
    out
}

fn card_links(record: &ProjectRecord) -> String {
    let mut out = String::new();
    if let Some(demo) = &record.demo_url {
        let _ = writeln!(
            out,
            "                        <a href=\"{}\" target=\"_blank\" rel=\"noopener\">Demo</a>",
            escape_html(demo)
        );
    }
    if let Some(social) = &record.social_url {
        let _ = writeln!(
            out,
            "                        <a href=\"{}\" target=\"_blank\" rel=\"noopener\">Post</a>",
            escape_html(social)
        );
    }
    out
}

fn tech_cards(badges: &[Badge]) -> String {
    let mut out = String::new();
    for badge in badges {
        let _ = write!(
            out,
            "                <div class=\"tech-card\">\n\
             \x20                   <div class=\"tech-icon\" style=\"background: {}\">{}</div>\n\
             \x20                   <h3>{}</h3>\n\
             \x20                   <p>{}</p>\n\
             \x20               </div>\n",
            escape_html(&badge.gradient),
            escape_html(&badge.abbreviation),
            escape_html(&badge.name),
            escape_html(&badge.description),
        );
    }
    out
}

fn features_section(record: &ProjectRecord) -> String {
    if record.features.is_empty() {
        return String::new();
    }

    let mut out = String::from(
        "\n        <section class=\"project-section\">\n            <h2>Key Features</h2>\n            <ul class=\"feature-list\">\n",
    );
    for feature in &record.features {
        if feature.description.is_empty() {
            let _ = writeln!(out, "                <li><strong>{}</strong></li>", escape_html(&feature.title));
        } else {
            let _ = writeln!(
                out,
                "                <li><strong>{}</strong>: {}</li>",
                escape_html(&feature.title),
                escape_html(&feature.description)
            );
        }
    }
    out.push_str("            </ul>\n        </section>");
    out
}

fn install_items(steps: &[InstallStep]) -> String {
    let mut out = String::new();
    for step in steps {
        out.push_str("                <li class=\"install-step\">\n");
        let _ = writeln!(out, "                    <h3>{}</h3>", escape_html(&step.title));
        if !step.description.is_empty() {
            let _ = writeln!(out, "                    <p>{}</p>", escape_html(&step.description));
        }
        let _ = writeln!(out, "                    <pre><code>{}</code></pre>", escape_html(&step.command));
        out.push_str("                </li>\n");
    }
    out
}
