use crate::error::Result;
use chrono::Local;
use env_logger::{Builder, Env};
use log::{self, LevelFilter};
use std::io::Write;
use yansi::Paint;

const CRATE_TARGET: &str = "portfolio_gen";

/// Installs the stderr logger at `log_level`
///
/// `RUST_LOG` wins over the level passed here when it is set, so a single
/// module can be turned up with e.g. `RUST_LOG=portfolio_gen::gallery=debug`.
pub fn init(log_level: &str) -> Result<()> {
    let level = parse_log_level(log_level).to_string().to_lowercase();
    let env = Env::default()
        .filter_or("RUST_LOG", level)
        .write_style_or("RUST_LOG_STYLE", "auto");

    Builder::from_env(env)
        .format(|buf, record| writeln!(buf, "{}", format_log(record)))
        .try_init()
        .map_err(|e| crate::error::PortfolioError::Config(format!("Logger already initialized: {}", e)))?;

    Ok(())
}

/// One log line: `[time] LEVEL [stage] message`
///
/// Records from this crate are tagged with their module path below the crate
/// root (`processors::github`, `gallery`); records from dependencies keep their
/// full target so reqwest or hyper noise stays recognizable.
pub fn format_log(record: &log::Record) -> String {
    let level = match record.level() {
        log::Level::Error => Paint::red("ERROR").bold(),
        log::Level::Warn => Paint::yellow("WARN ").bold(),
        log::Level::Info => Paint::cyan("INFO ").bold(),
        log::Level::Debug => Paint::blue("DEBUG").bold(),
        log::Level::Trace => Paint::new("TRACE"),
    };

    let timestamp = Local::now().format("%H:%M:%S%.3f");
    format!("[{}] {} [{}] {}", timestamp, level, stage_name(record.target()), record.args())
}

fn stage_name(target: &str) -> &str {
    match target.strip_prefix(CRATE_TARGET) {
        Some("") => "main",
        Some(rest) => rest.strip_prefix("::").unwrap_or(target),
        None => target,
    }
}

/// `--log-level` value to a filter; anything unrecognized keeps the quiet default
pub fn parse_log_level(level: &str) -> LevelFilter {
    match level.trim().to_lowercase().as_str() {
        "off" | "quiet" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" | "warning" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Warn,
    }
}
