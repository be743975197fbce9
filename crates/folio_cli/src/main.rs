//! Folio CLI
//!
//! Runs headless page scenarios, reads and writes the persisted theme
//! preference, and prints the effective configuration.

mod logging;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use folio_app::{
    plan_page, run_loaded_scenario, FolioConfig, HeadlessScenario, RunEnvironment,
};
use folio_theme::{FileStorage, PreferenceStorage, ThemePreference, STORAGE_KEY};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Theme, interaction, and scroll-reveal runtime for the Folio portfolio page
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "Run headless page scenarios and manage Folio preferences")]
#[command(version)]
struct Args {
    /// Directory containing folio.toml, or the file itself
    #[arg(short, long, global = true, default_value = ".")]
    config: PathBuf,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a JSON scenario against a headless page
    Run {
        /// Scenario file
        scenario: PathBuf,

        /// Write the JSON report here (relative path) instead of stdout
        #[arg(short, long)]
        report: Option<PathBuf>,
    },

    /// Show or change the persisted theme preference
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },

    /// Print the effective configuration as TOML
    Config,

    /// List page regions with their document offsets
    Regions,
}

#[derive(Subcommand, Debug)]
enum ThemeAction {
    /// Print the stored preference
    Get,
    /// Store `light` or `dark`
    Set { value: ThemePreference },
    /// Flip the stored preference
    Toggle,
}

fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(err) = logging::init(args.verbose) {
        eprintln!("warning: {err:#}");
    }

    match run(args) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("{err:#}");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<ExitCode> {
    let config = FolioConfig::load_from_dir(&args.config)
        .with_context(|| format!("failed to load config from {}", args.config.display()))?;

    match args.command {
        Command::Run { scenario, report } => run_scenario(config, &scenario, report.as_deref()),
        Command::Theme { action } => {
            theme(&config, action.unwrap_or(ThemeAction::Get))?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Config => {
            print!("{}", config.to_toml().context("failed to serialize config")?);
            Ok(ExitCode::SUCCESS)
        }
        Command::Regions => {
            regions(&config)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_scenario(config: FolioConfig, path: &Path, report_path: Option<&Path>) -> Result<ExitCode> {
    let scenario = HeadlessScenario::from_path(path)?;
    let env = RunEnvironment::from_config(config)?;
    let outcome = run_loaded_scenario(&scenario, env)
        .with_context(|| format!("scenario {} did not complete", path.display()))?;

    let report = outcome.report();
    match report_path {
        Some(out) => {
            report.write_to_path(out)?;
            tracing::info!(path = %out.display(), "report written");
        }
        None => report.write_to_writer(&mut std::io::stdout().lock())?,
    }

    Ok(if outcome.is_failed() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn theme(config: &FolioConfig, action: ThemeAction) -> Result<()> {
    let path = config
        .storage
        .resolve_path()
        .context("no preferences file: storage is in-memory or no config directory exists")?;
    let storage = FileStorage::new(&path);
    let stored = read_preference(&storage)?;

    let next = match action {
        ThemeAction::Get => {
            println!("{stored}");
            return Ok(());
        }
        ThemeAction::Set { value } => value,
        ThemeAction::Toggle => stored.toggle(),
    };

    storage
        .write(STORAGE_KEY, next.as_str())
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(from = %stored, to = %next, path = %path.display(), "theme preference stored");
    println!("{next}");
    Ok(())
}

/// Stored preference, `light` when absent or unrecognized
fn read_preference(storage: &dyn PreferenceStorage) -> Result<ThemePreference> {
    let Some(raw) = storage.read(STORAGE_KEY).context("failed to read preferences")? else {
        return Ok(ThemePreference::default());
    };
    Ok(raw.parse().unwrap_or_else(|err| {
        tracing::warn!(%err, value = %raw, "ignoring stored theme preference");
        ThemePreference::default()
    }))
}

fn regions(config: &FolioConfig) -> Result<()> {
    let content = match &config.content.path {
        Some(path) => folio_app::Content::load(path).context("failed to load page content")?,
        None => folio_app::Content::sample(),
    };
    let plans = plan_page(&content, &config.motion).context("failed to plan page")?;

    let mut top = 0.0;
    for plan in plans {
        println!("{} @ {top:.0} ({:.0}px)", plan.kind, plan.height);
        for region in &plan.regions {
            println!("  {:<28} {:>7.0} {:>6.0}", region.name, top + region.offset_y, region.height);
        }
        top += plan.height;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn parses_theme_set() {
        let args = Args::try_parse_from(["folio", "theme", "set", "dark"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Theme {
                action: Some(ThemeAction::Set {
                    value: ThemePreference::Dark
                })
            }
        ));
        assert!(Args::try_parse_from(["folio", "theme", "set", "sepia"]).is_err());
    }

    #[test]
    fn theme_commands_round_trip_through_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = FolioConfig::default();
        config.storage.path = Some(dir.path().join("preferences.toml"));

        theme(&config, ThemeAction::Toggle).unwrap();
        let storage = FileStorage::new(dir.path().join("preferences.toml"));
        assert_eq!(read_preference(&storage).unwrap(), ThemePreference::Dark);

        theme(&config, ThemeAction::Set { value: ThemePreference::Light }).unwrap();
        assert_eq!(read_preference(&storage).unwrap(), ThemePreference::Light);
    }

    #[test]
    fn unrecognized_stored_value_reads_as_light_and_toggles_to_dark() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("preferences.toml");
        let storage = FileStorage::new(&path);
        storage.write(STORAGE_KEY, "sepia").unwrap();
        assert_eq!(read_preference(&storage).unwrap(), ThemePreference::Light);

        let mut config = FolioConfig::default();
        config.storage.path = Some(path);
        theme(&config, ThemeAction::Toggle).unwrap();
        assert_eq!(read_preference(&storage).unwrap(), ThemePreference::Dark);
    }

    #[test]
    fn in_memory_storage_has_no_file_to_edit() {
        let mut config = FolioConfig::default();
        config.storage.in_memory = true;
        assert!(theme(&config, ThemeAction::Get).is_err());
    }
}
