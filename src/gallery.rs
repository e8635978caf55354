//! Gallery page updates.
//!
//! The gallery page must mark where new cards go. Two forms are recognized,
//! tried in this order:
//!
//! 1. the closing `</div>` of the projects grid immediately followed (only
//!    whitespace between) by the comment `<!-- End Projects Grid -->`;
//! 2. the explicit marker `<!-- portfolio-gen:insert-card -->`.
//!
//! The card is inserted at the start of the anchor's line, so the anchor and
//! everything around it are kept byte-for-byte. New cards therefore appear
//! last in the grid.

use crate::error::{PortfolioError, Result};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use walkdir::WalkDir;

/// Explicit insertion marker accepted when the grid anchor is missing
pub const INSERT_MARKER: &str = "<!-- portfolio-gen:insert-card -->";

lazy_static! {
    static ref ANCHORS: Vec<Regex> = vec![
        Regex::new(r"(?i)</div>\s*<!--\s*End Projects Grid\s*-->").unwrap(),
        Regex::new(&regex::escape(INSERT_MARKER)).unwrap(),
    ];
    static ref PROJECT_FILE: Regex = Regex::new(r"^day-(\d+)-.*\.html$").unwrap();
}

/// Returns `page` with `card` spliced in before the first recognized anchor
///
/// `path` is only used to name the page in the error.
pub fn splice_card(page: &str, card: &str, path: &Path) -> Result<String> {
    let anchor_start = ANCHORS
        .iter()
        .find_map(|anchor| anchor.find(page))
        .map(|m| m.start())
        .ok_or_else(|| PortfolioError::AnchorNotFound(path.to_path_buf()))?;

    let insert_at = line_start(page, anchor_start);
    let mut card = card.trim_end_matches(&['\r', '\n'][..]).to_string();
    card.push('\n');

    let mut updated = String::with_capacity(page.len() + card.len());
    updated.push_str(&page[..insert_at]);
    updated.push_str(&card);
    updated.push_str(&page[insert_at..]);
    Ok(updated)
}

/// Start of the line holding `idx` when only whitespace precedes it there,
/// otherwise `idx` itself
fn line_start(page: &str, idx: usize) -> usize {
    let start = page[..idx].rfind('\n').map_or(0, |nl| nl + 1);
    if page[start..idx].chars().all(|c| c == ' ' || c == '\t') {
        start
    } else {
        idx
    }
}

/// Replaces the file at `path` with `content` via a temp file in the same directory
pub fn write_atomically(path: &Path, content: &str) -> Result<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    // temp files are created owner-only
    if let Ok(metadata) = std::fs::metadata(path) {
        tmp.as_file().set_permissions(metadata.permissions())?;
    }
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| PortfolioError::IO(e.error))?;
    Ok(())
}

/// One more than the highest `day-<n>-*.html` number in `dir`, or 1
pub fn next_project_number(dir: &Path) -> u64 {
    if !dir.is_dir() {
        debug!("{} does not exist, numbering starts at 1", dir.display());
        return 1;
    }

    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            PROJECT_FILE
                .captures(&name)
                .and_then(|caps| caps[1].parse::<u64>().ok())
        })
        .max()
        .map_or(1, |max| max + 1)
}
