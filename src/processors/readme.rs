//! Heuristic README scraping.
//!
//! Not a markdown parser: paragraphs are split on blank
//! lines and sections are found by heading text. What comes out is a
//! description, up to [`MAX_FEATURES`] feature bullets and the fenced
//! commands of the installation section. Anything not found is empty.

use crate::project::{Feature, InstallStep};
use lazy_static::lazy_static;
use regex::Regex;

/// Feature bullets kept from a README
pub const MAX_FEATURES: usize = 6;
/// Paragraphs this short are not considered a description
const MIN_DESCRIPTION_CHARS: usize = 50;
/// Descriptions are cut to this many characters
const MAX_DESCRIPTION_CHARS: usize = 500;

lazy_static! {
    static ref PARAGRAPH_BREAK: Regex = Regex::new(r"\n[ \t]*\n").unwrap();
    static ref HEADING: Regex = Regex::new(r"^\s{0,3}#{1,6}\s").unwrap();
    static ref FEATURES_HEADING: Regex =
        Regex::new(r"(?i)^\s{0,3}#{1,6}\s+.*\b(?:key features|features|what it does)\b").unwrap();
    static ref INSTALL_HEADING: Regex =
        Regex::new(r"(?i)^\s{0,3}#{1,6}\s+.*\b(?:installation|getting started|quick start|setup)\b").unwrap();
    static ref BULLET: Regex = Regex::new(r"^\s*(?:[-*+]|\d+[.)])\s+(.+)$").unwrap();
    static ref FENCE: Regex = Regex::new(r"^\s*(```|~~~)").unwrap();
    static ref BOLD_LEAD: Regex = Regex::new(r"^\*\*(.+?)\*\*\s*[:\-\u{2013}\u{2014}]?\s*(.*)$").unwrap();
    static ref LINK: Regex = Regex::new(r"!?\[([^\]]*)\]\([^)]*\)").unwrap();
    static ref EMPHASIS: Regex = Regex::new(r"(\*\*|__|\*|`)").unwrap();
    static ref ORDINAL: Regex = Regex::new(r"^(?:\d+[.)]|[-*+])\s+").unwrap();
}

/// What was learned from a README
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadmeSummary {
    pub description: Option<String>,
    pub features: Vec<Feature>,
    pub install_steps: Vec<InstallStep>,
}

/// Runs every extractor over `readme`
pub fn analyze(readme: &str) -> ReadmeSummary {
    let readme = readme.replace("\r\n", "\n");
    ReadmeSummary {
        description: extract_description(&readme),
        features: extract_features(&readme),
        install_steps: extract_install_steps(&readme),
    }
}

/// First paragraph that is long enough and is neither a heading nor code
pub fn extract_description(readme: &str) -> Option<String> {
    PARAGRAPH_BREAK
        .split(readme)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .filter(|p| !p.starts_with('#') && !p.starts_with("```") && !p.starts_with("~~~"))
        .find(|p| p.chars().count() > MIN_DESCRIPTION_CHARS)
        .map(|p| {
            let flat = p.lines().map(str::trim).collect::<Vec<_>>().join(" ");
            truncate_chars(&flat, MAX_DESCRIPTION_CHARS)
        })
}

/// Bullets under the first features heading, at most [`MAX_FEATURES`]
pub fn extract_features(readme: &str) -> Vec<Feature> {
    section_lines(readme, &FEATURES_HEADING)
        .into_iter()
        .filter_map(|line| BULLET.captures(line).map(|caps| caps[1].trim().to_string()))
        .take(MAX_FEATURES)
        .map(|bullet| split_feature(&bullet))
        .collect()
}

/// Fenced code blocks under the first installation heading, in order
pub fn extract_install_steps(readme: &str) -> Vec<InstallStep> {
    let mut steps = Vec::new();
    let mut last_prose: Option<String> = None;
    let mut block: Option<Vec<&str>> = None;

    for line in section_lines(readme, &INSTALL_HEADING) {
        if FENCE.is_match(line) {
            match block.take() {
                Some(lines) => {
                    let command = lines.join("\n").trim().to_string();
                    if !command.is_empty() {
                        steps.push(InstallStep {
                            title: format!("Step {}", steps.len() + 1),
                            description: last_prose.take().unwrap_or_default(),
                            command,
                        });
                    }
                }
                None => block = Some(Vec::new()),
            }
            continue;
        }

        match block.as_mut() {
            Some(lines) => lines.push(line),
            None => {
                let prose = line.trim();
                if !prose.is_empty() {
                    last_prose = Some(clean_prose(prose));
                }
            }
        }
    }

    steps
}

/// Lines after the first heading matching `heading`, up to the next heading
///
/// Lines inside code fences never end the section.
fn section_lines<'a>(readme: &'a str, heading: &Regex) -> Vec<&'a str> {
    let mut section = Vec::new();
    let mut in_section = false;
    let mut in_fence = false;

    for line in readme.lines() {
        if FENCE.is_match(line) {
            in_fence = !in_fence;
        } else if !in_fence {
            if in_section && HEADING.is_match(line) {
                break;
            }
            if !in_section && heading.is_match(line) {
                in_section = true;
                continue;
            }
        }
        if in_section {
            section.push(line);
        }
    }
    section
}

fn split_feature(bullet: &str) -> Feature {
    if let Some(caps) = BOLD_LEAD.captures(bullet) {
        return Feature {
            title: strip_markdown(&caps[1]),
            description: strip_markdown(&caps[2]),
        };
    }

    let text = strip_markdown(bullet);
    for separator in [": ", " - ", " \u{2013} ", " \u{2014} "] {
        if let Some((title, description)) = text.split_once(separator) {
            if !title.trim().is_empty() && title.chars().count() <= 60 {
                return Feature {
                    title: title.trim().to_string(),
                    description: description.trim().to_string(),
                };
            }
        }
    }

    Feature {
        title: text,
        description: String::new(),
    }
}

fn clean_prose(line: &str) -> String {
    let line = ORDINAL.replace(line, "");
    strip_markdown(&line).trim_end_matches(':').trim().to_string()
}

fn strip_markdown(text: &str) -> String {
    let text = LINK.replace_all(text, "$1");
    EMPHASIS.replace_all(&text, "").trim().to_string()
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}
