use crate::cli;
use crate::config::Config;
use crate::error::{PortfolioError, Result};
use crate::gallery;
use crate::processors::github::{GitHubClient, RepositorySnapshot};
use crate::processors::url::{parse_repo_reference, RepoRef};
use crate::processors::{readme, tech_stack};
use crate::project::{ProjectDraft, ProjectRecord};
use crate::publish::{commit_message, GitCli, Publisher, VersionControl};
use crate::render::{self, SiteLinks};
use chrono::Local;
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Everything the `add` command was asked to do
#[derive(Debug, Clone, Default)]
pub struct AddOptions {
    pub repo_url: String,
    pub number: Option<String>,
    pub title: Option<String>,
    pub tagline: Option<String>,
    pub demo_url: Option<String>,
    pub social_url: Option<String>,
    pub image_url: Option<String>,
    pub no_push: bool,
    pub dry_run: bool,
    pub interactive: bool,
}

/// What an `add` run produced
#[derive(Debug, Clone)]
pub struct AddOutcome {
    pub record: ProjectRecord,
    pub filename: String,
    pub page_path: PathBuf,
    pub gallery_path: PathBuf,
    pub page_html: String,
    pub card_html: String,
    /// False for dry runs
    pub written: bool,
    /// Branch that accepted the push, when publishing ran
    pub pushed_branch: Option<String>,
}

/// The add-project pipeline: fetch, analyze, render, splice, publish
pub struct Pipeline<V: VersionControl> {
    config: Config,
    github: GitHubClient,
    publisher: Publisher<V>,
}

impl Pipeline<GitCli> {
    /// Pipeline that publishes with the `git` executable in the site root
    pub fn new(config: Config) -> Result<Self> {
        let vcs = GitCli::new(config.site.root.clone());
        Self::with_version_control(config, vcs)
    }
}

impl<V: VersionControl> Pipeline<V> {
    pub fn with_version_control(config: Config, vcs: V) -> Result<Self> {
        let github = GitHubClient::new(&config)?;
        let publisher = Publisher::new(vcs, config.git.clone());
        Ok(Self {
            config,
            github,
            publisher,
        })
    }

    /// Runs the whole pipeline for one repository
    ///
    /// The reference is validated before any network call. In dry-run mode
    /// nothing is written and nothing is published. Otherwise the gallery is
    /// spliced in memory before either file is written, so a missing anchor
    /// aborts with no writes at all.
    pub async fn add(&self, options: AddOptions) -> Result<AddOutcome> {
        let repo = parse_repo_reference(&options.repo_url)?;
        if !options.dry_run {
            self.config.validate()?;
        }

        info!("Fetching {}", repo);
        let snapshot = self.github.fetch_snapshot(&repo).await?;

        let mut draft = self.build_draft(&repo, &snapshot, &options);
        if options.interactive {
            cli::collect_missing(&mut draft)?;
        }
        let record = ProjectRecord::from_draft(draft, Local::now().date_naive())?;

        let links = SiteLinks::from_config(&self.config);
        let filename = record.filename();
        let page_html = render::render_project_page(&record, &links);
        let card_html = render::render_card(&record, &links);

        let mut outcome = AddOutcome {
            page_path: self.config.projects_dir().join(&filename),
            gallery_path: self.config.gallery_path(),
            filename,
            record,
            page_html,
            card_html,
            written: false,
            pushed_branch: None,
        };

        if options.dry_run {
            info!("Dry run: skipping writes for {}", outcome.filename);
            return Ok(outcome);
        }

        self.write_files(&outcome)?;
        outcome.written = true;

        if !options.no_push {
            let page_rel = self.config.site.projects_dir.join(&outcome.filename);
            let gallery_rel = self.config.site.gallery_page.clone();
            let message = commit_message(&outcome.record.title, &page_rel, &gallery_rel);
            let branch = self
                .publisher
                .publish(&[page_rel.as_path(), gallery_rel.as_path()], &message)
                .await?;
            outcome.pushed_branch = Some(branch);
        }

        Ok(outcome)
    }

    /// Next free project number in the configured projects directory
    pub fn next_number(&self) -> u64 {
        gallery::next_project_number(&self.config.projects_dir())
    }

    fn build_draft(&self, repo: &RepoRef, snapshot: &RepositorySnapshot, options: &AddOptions) -> ProjectDraft {
        let metadata = &snapshot.metadata;
        let summary = snapshot
            .readme
            .as_deref()
            .map(readme::analyze)
            .unwrap_or_default();

        let repo_url = if metadata.html_url.is_empty() {
            repo.html_url()
        } else {
            metadata.html_url.clone()
        };
        let name = if metadata.name.is_empty() { &repo.repo } else { &metadata.name };

        ProjectDraft {
            number_label: Some(
                options
                    .number
                    .clone()
                    .unwrap_or_else(|| format!("Project {}", self.next_number())),
            ),
            title: options.title.clone().or_else(|| Some(title_case(name))),
            tagline: options.tagline.clone().or_else(|| metadata.description.clone()),
            description: summary.description.or_else(|| metadata.description.clone()),
            repo_url,
            demo_url: options.demo_url.clone(),
            social_url: options.social_url.clone(),
            image_url: options
                .image_url
                .clone()
                .or_else(|| Some(format!("https://opengraph.githubassets.com/1/{}/{}", repo.owner, repo.repo))),
            tech_stack: tech_stack::detect(snapshot),
            features: summary.features,
            install_steps: summary.install_steps,
            stars: metadata.stargazers_count,
            forks: metadata.forks_count,
        }
    }

    /// Writes the gallery, then the page
    ///
    /// If the page cannot be written the original gallery is put back, so a
    /// failed run leaves neither a spliced card nor an orphan page behind.
    fn write_files(&self, outcome: &AddOutcome) -> Result<()> {
        if outcome.page_path.exists() {
            return Err(PortfolioError::Validation(format!(
                "{} already exists; pass a different --number",
                outcome.page_path.display()
            )));
        }

        let original = std::fs::read_to_string(&outcome.gallery_path)?;
        let updated = gallery::splice_card(&original, &outcome.card_html, &outcome.gallery_path)?;

        gallery::write_atomically(&outcome.gallery_path, &updated)?;
        info!("Updated {}", outcome.gallery_path.display());

        if let Err(e) = write_page(&outcome.page_path, &outcome.page_html) {
            warn!(
                "Could not write {}, restoring {}",
                outcome.page_path.display(),
                outcome.gallery_path.display()
            );
            gallery::write_atomically(&outcome.gallery_path, &original)?;
            return Err(e);
        }
        info!("Wrote {}", outcome.page_path.display());
        Ok(())
    }
}

fn write_page(path: &Path, html: &str) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

/// `job-tracker_app` becomes `Job Tracker App`
fn title_case(name: &str) -> String {
    name.split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
