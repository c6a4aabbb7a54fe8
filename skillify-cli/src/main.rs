//! Skillify CLI - Keep a profile README's skills section up to date
//!
//! Fetches an account's repositories, ranks the languages and frameworks
//! used, and rewrites the marked skills section of the README.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use skillify_core::{init_logging, SkillifyConfig, SkillifyResult};
use skillify_profile::{update_profile, PipelineReport};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "skillify")]
#[command(about = "Generate skill badges for a GitHub profile README")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Regenerate the skills section of the profile README
    Update {
        /// Account whose repositories are scanned
        #[arg(short, long)]
        account: Option<String>,

        /// Path to the README to patch
        #[arg(short, long)]
        readme: Option<PathBuf>,

        /// Number of languages in the top section
        #[arg(long)]
        top_k: Option<usize>,

        /// Access token for the GitHub API
        #[arg(short, long, env = "GITHUB_TOKEN", hide_env_values = true)]
        token: Option<String>,

        /// Print the patched README instead of writing it
        #[arg(long)]
        dry_run: bool,
    },

    /// Manage configuration
    Config {
        /// Write a default configuration file
        #[arg(long)]
        init: bool,

        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Validate current configuration
        #[arg(long)]
        validate: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let (mut config, source) = load_config(cli.config.as_ref())?;

    let logging_config = if cli.verbose {
        config.logging.clone().verbose()
    } else {
        config.logging.clone()
    };
    init_logging(&logging_config)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    match &source {
        Some(path) => info!("Loaded configuration from {:?}", path),
        None => info!("No configuration file found, using defaults"),
    }

    match cli.command {
        Commands::Update {
            account,
            readme,
            top_k,
            token,
            dry_run,
        } => {
            if let Some(account) = account {
                config.github.account = account;
            }
            if let Some(readme) = readme {
                config.profile.readme_path = readme;
            }
            if let Some(top_k) = top_k {
                config.ranking.top_k = top_k;
            }
            if token.is_some() {
                config.github.access_token = token;
            }
            handle_update(&config, dry_run).await
        }
        Commands::Config {
            init,
            show,
            validate,
        } => handle_config(&config, init, show, validate),
    }
}

fn load_config(
    config_path: Option<&PathBuf>,
) -> SkillifyResult<(SkillifyConfig, Option<PathBuf>)> {
    if let Some(path) = config_path {
        return Ok((SkillifyConfig::from_file(path)?, Some(path.clone())));
    }

    let default_paths = [
        dirs::config_dir().map(|d| d.join("skillify").join("config.toml")),
        dirs::home_dir().map(|d| d.join(".skillify").join("config.toml")),
        Some(PathBuf::from("skillify.toml")),
    ];

    for path in default_paths.into_iter().flatten() {
        if path.exists() {
            return Ok((SkillifyConfig::from_file(&path)?, Some(path)));
        }
    }

    Ok((SkillifyConfig::default(), None))
}

async fn handle_update(config: &SkillifyConfig, dry_run: bool) -> anyhow::Result<()> {
    let report = update_profile(config, dry_run)
        .await
        .with_context(|| format!("Failed to update {}", config.profile.readme_path.display()))?;

    debug!(
        top_languages = ?report.top_languages,
        frameworks = ?report.frameworks,
        "Rendered skills"
    );

    if dry_run {
        print!("{}", report.document);
    } else {
        println!("{}", summary(&report));
    }
    Ok(())
}

fn summary(report: &PipelineReport) -> String {
    let path = report.document_path.display();
    let counts = if report.skipped.is_empty() {
        format!("{} repositories", report.repositories)
    } else {
        format!(
            "{} repositories, {} skipped",
            report.repositories,
            report.skipped.len()
        )
    };

    if report.written {
        format!("✅ Updated skills section in {} ({})", path, counts)
    } else {
        format!("✅ Skills section in {} already up to date ({})", path, counts)
    }
}

fn handle_config(
    config: &SkillifyConfig,
    init: bool,
    show: bool,
    validate: bool,
) -> anyhow::Result<()> {
    if init {
        let config_path = default_config_path()?;
        if config_path.exists() {
            bail!("Configuration already exists at {:?}", config_path);
        }
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        SkillifyConfig::default().save_to_file(&config_path)?;
        println!("✅ Configuration initialized at: {:?}", config_path);
        println!("📝 Set github.account before running `skillify update`.");
    }

    if show {
        println!("{}", toml::to_string_pretty(config)?);
    }

    if validate {
        config.validate().context("Configuration validation failed")?;
        println!("✅ Configuration is valid");
    }

    if !(init || show || validate) {
        println!("Configuration file: {:?}", default_config_path()?);
    }

    Ok(())
}

/// Where `config --init` writes
fn default_config_path() -> anyhow::Result<PathBuf> {
    let dir = dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|d| d.join(".config")))
        .context("Could not determine a configuration directory")?;
    Ok(dir.join("skillify").join("config.toml"))
}
