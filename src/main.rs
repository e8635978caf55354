use clap::{Args, Parser, Subcommand};
use colored::*;
use portfolio_gen::{
    cli::{self, print_error, print_info, print_success, print_warning},
    error::{PortfolioError, Result},
    gallery, logging, AddOptions, AddOutcome, Config, Pipeline,
};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Root of the portfolio site checkout
    #[arg(long, global = true)]
    site_root: Option<PathBuf>,

    /// Log level: error, warn, info, debug or trace
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a project page and gallery card for a GitHub repository
    Add(AddArgs),
    /// Print the next free project number
    NextNumber,
}

#[derive(Args)]
struct AddArgs {
    /// Repository URL, e.g. https://github.com/owner/repo
    repo_url: String,

    /// Project number label, e.g. "Project 12" (default: next free number)
    #[arg(short, long)]
    number: Option<String>,

    /// Tagline override
    #[arg(short, long)]
    tagline: Option<String>,

    /// Title override (default: repository name in title case)
    #[arg(long)]
    title: Option<String>,

    /// Demo video URL
    #[arg(long)]
    demo: Option<String>,

    /// Social post URL
    #[arg(long)]
    social: Option<String>,

    /// Card image URL (default: the repository's social preview)
    #[arg(long)]
    image: Option<String>,

    /// Write the files but do not commit or push
    #[arg(long)]
    no_push: bool,

    /// Print a preview and write nothing
    #[arg(long)]
    dry_run: bool,

    /// Never prompt for missing fields
    #[arg(short = 'y', long)]
    yes: bool,
}

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    if let Err(e) = logging::init(&args.log_level) {
        eprintln!("[WARNING] {}", e);
    }

    if let Err(e) = run(args).await {
        print_error(&e.to_string());
        if matches!(e, PortfolioError::Publish(_)) {
            print_warning("The generated files were kept. Review them and push manually with `git push`.");
        }
        process::exit(1);
    }
}

async fn run(args: Cli) -> Result<()> {
    let mut config = Config::load()?;
    if let Some(root) = args.site_root {
        config = config.with_site_root(root);
    }

    match args.command {
        Command::Add(add) => run_add(config, add).await,
        Command::NextNumber => {
            println!("{}", gallery::next_project_number(&config.projects_dir()));
            Ok(())
        }
    }
}

async fn run_add(config: Config, add: AddArgs) -> Result<()> {
    cli::print_banner();
    let interactive = cli::should_prompt(add.yes);
    let dry_run = add.dry_run;

    let options = AddOptions {
        repo_url: add.repo_url,
        number: add.number,
        title: add.title,
        tagline: add.tagline,
        demo_url: add.demo,
        social_url: add.social,
        image_url: add.image,
        no_push: add.no_push,
        dry_run,
        interactive,
    };

    let pipeline = Pipeline::new(config)?;
    let spinner = (!interactive).then(|| cli::create_progress_bar(&format!("Processing {}", options.repo_url)));
    let result = pipeline.add(options).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let outcome = result?;

    if dry_run {
        print_preview(&outcome);
        return Ok(());
    }

    print_success(&format!("Created {}", outcome.page_path.display()));
    print_success(&format!("Updated {}", outcome.gallery_path.display()));
    match &outcome.pushed_branch {
        Some(branch) => print_success(&format!("Pushed to {}", branch)),
        None => print_info("Skipped publishing (--no-push)"),
    }
    Ok(())
}

fn print_preview(outcome: &AddOutcome) {
    let record = &outcome.record;
    println!("\n{}", "Dry run - nothing was written".bright_yellow().bold());
    println!("  {:<12} {}", "File:".bright_white(), outcome.page_path.display());
    println!("  {:<12} {}", "Number:".bright_white(), record.number_label);
    println!("  {:<12} {}", "Title:".bright_white(), record.title);
    println!("  {:<12} {}", "Tagline:".bright_white(), record.tagline);
    let stack: Vec<&str> = record.tech_stack.iter().map(|b| b.name.as_str()).collect();
    println!("  {:<12} {}", "Tech stack:".bright_white(), if stack.is_empty() { "(placeholder)".to_string() } else { stack.join(", ") });
    println!("  {:<12} {}", "Features:".bright_white(), record.features.len());
    println!("  {:<12} {}", "Steps:".bright_white(), record.install_steps.len());
    println!("\n{}", "Gallery card:".bright_cyan());
    println!("{}", outcome.card_html);
}
