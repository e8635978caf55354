#![warn(clippy::all)]

//! portfolio-gen - add a project to a static portfolio site from its GitHub repository
//!
//! The `add` pipeline parses a repository reference, fetches metadata, the
//! README and dependency manifests from the GitHub REST API, scrapes a
//! description, features and install steps from the README, detects a tech
//! stack, renders a project page and a gallery card, splices the card into
//! the gallery page and commits/pushes both files.
//!
//! ## Usage
//! ```rust,ignore
//! use portfolio_gen::{AddOptions, Config, Pipeline};
//!
//! async fn example() -> portfolio_gen::Result<()> {
//!     let config = Config::load()?.with_site_root("site".into());
//!     let pipeline = Pipeline::new(config)?;
//!     let outcome = pipeline
//!         .add(AddOptions {
//!             repo_url: "https://github.com/octo/job-tracker".into(),
//!             dry_run: true,
//!             ..AddOptions::default()
//!         })
//!         .await?;
//!     println!("{}", outcome.card_html);
//!     Ok(())
//! }
//! ```

/// Terminal output helpers and the interactive collector
pub mod cli;
/// Configuration file and environment handling
pub mod config;
/// Error handling types and utilities
pub mod error;
/// Gallery page splicing and project numbering
pub mod gallery;
/// Logging configuration and utilities
pub mod logging;
/// The add-project pipeline
pub mod orchestrator;
/// Repository reference parsing, fetching, README analysis, tech-stack detection
pub mod processors;
/// The project record and its parts
pub mod project;
/// Stage, commit and push
pub mod publish;
/// HTML rendering of project pages and cards
pub mod render;

// Re-export common types
pub use config::Config;
pub use error::{PortfolioError, Result};
pub use orchestrator::{AddOptions, AddOutcome, Pipeline};
pub use processors::{parse_repo_reference, GitHubClient, RepoRef};
pub use project::{Badge, Feature, InstallStep, ProjectRecord};
