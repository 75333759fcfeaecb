// CLI module - command-line argument parsing and handlers
//
// With no subcommand the binary opens the browser. Subcommands:
// - build: minify the static site into a dist folder
// - search / show: headless queries against the dataset
// - config: inspect or reset the configuration file

use crate::assets::{self, BuildOptions};
use crate::catalog::details::DetailsView;
use crate::catalog::filter::{filter_drugs, Letter};
use crate::catalog::{Catalog, PLACEHOLDER};
use crate::config::{Config, VERSION};
use crate::loader::{DataLoader, DataSource};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

/// drugstore - browse a drug catalogue from the terminal
#[derive(Parser)]
#[command(name = "drugstore")]
#[command(version = VERSION)]
#[command(about = "Browse a drug catalogue from the terminal", long_about = None)]
pub struct Cli {
    /// Dataset URL, site-relative path or local JSON file
    #[arg(long, global = true)]
    pub data: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Minify index.html and style.css and copy the dataset into dist/
    Build {
        /// Project root holding index.html, style.css and data/
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Output directory (default: <root>/dist)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print the names of matching drugs
    Search {
        /// Only drugs filed under this letter
        #[arg(long, short)]
        letter: Option<Letter>,

        /// Case-insensitive substring of the drug name
        #[arg(default_value = "")]
        query: String,
    },

    /// Print the details table of one variant of a drug
    Show {
        /// Drug name (case-insensitive)
        drug: String,

        /// Which variant, counting from 1
        #[arg(long, short, default_value_t = 1)]
        variant: usize,
    },

    /// Manage configuration
    Config {
        /// Show effective configuration
        #[arg(long)]
        show: bool,

        /// Show config file path
        #[arg(long)]
        path: bool,

        /// Reset config file to defaults
        #[arg(long)]
        reset: bool,

        /// Open config file in $EDITOR
        #[arg(long)]
        edit: bool,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// build
// ─────────────────────────────────────────────────────────────────────────────

pub fn handle_build(root: PathBuf, out: Option<PathBuf>) -> Result<()> {
    let options = BuildOptions::new(root, out);
    let report = assets::build(&options).context("Asset build failed")?;
    tracing::info!(
        "Built {} ({} -> {} bytes html, {} -> {} bytes css)",
        report.dist_dir.display(),
        report.html.before,
        report.html.after,
        report.css.before,
        report.css.after
    );
    println!("{}", report);
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// search / show
// ─────────────────────────────────────────────────────────────────────────────

/// Fetch the dataset once, retries included
async fn load_catalog(config: &Config) -> Result<Catalog> {
    let source = DataSource::resolve(&config.data_source, &config.base_url)
        .with_context(|| format!("Invalid data source '{}'", config.data_source))?;
    let loader = DataLoader::new(source, config.loader.options())
        .context("Failed to create data loader")?;
    loader
        .fetch()
        .await
        .with_context(|| format!("Failed to load {}", loader.source()))
}

pub async fn handle_search(config: &Config, letter: Option<Letter>, query: &str) -> Result<()> {
    let catalog = load_catalog(config).await?;
    let keys = filter_drugs(&catalog, letter, query);

    let mut stdout = std::io::stdout().lock();
    for key in &keys {
        if let Some(drug) = catalog.drug(*key) {
            let name = if drug.name.trim().is_empty() {
                PLACEHOLDER
            } else {
                drug.name.as_str()
            };
            writeln!(stdout, "{}", name).context("Failed to write output")?;
        }
    }
    tracing::debug!("{} of {} drugs matched", keys.len(), catalog.len());
    Ok(())
}

pub async fn handle_show(config: &Config, drug: &str, variant: usize) -> Result<()> {
    let catalog = load_catalog(config).await?;

    let Some(key) = catalog.find_by_name(drug) else {
        bail!("No drug named '{}'", drug);
    };
    let Some(found) = catalog.drug(key) else {
        bail!("No drug named '{}'", drug);
    };
    if found.subdrugs.is_empty() {
        bail!("'{}' has no variants", found.name);
    }
    let Some(subdrug) = variant.checked_sub(1).and_then(|i| found.subdrugs.get(i)) else {
        bail!(
            "'{}' has {} variant(s); --variant must be between 1 and {}",
            found.name,
            found.subdrugs.len(),
            found.subdrugs.len()
        );
    };

    println!("{}", DetailsView::for_subdrug(subdrug).to_text());
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// config
// ─────────────────────────────────────────────────────────────────────────────

pub fn handle_config(config: &Config, show: bool, path: bool, reset: bool, edit: bool) -> Result<()> {
    if path {
        handle_config_path()
    } else if show {
        handle_config_show(config);
        Ok(())
    } else if reset {
        handle_config_reset()
    } else if edit {
        handle_config_edit()
    } else {
        println!("Usage: drugstore config [--show|--path|--reset|--edit]");
        println!();
        println!("Options:");
        println!("  --show    Display effective configuration");
        println!("  --path    Show config file path");
        println!("  --reset   Reset config file to defaults");
        println!("  --edit    Open config file in $EDITOR");
        Ok(())
    }
}

fn config_path() -> Result<PathBuf> {
    Config::config_path().context("Could not determine config path")
}

fn handle_config_path() -> Result<()> {
    println!("{}", config_path()?.display());
    Ok(())
}

fn handle_config_show(config: &Config) {
    println!("# Effective configuration (env > file > defaults)");
    println!();
    print!("{}", config.to_toml());

    println!();
    if let Some(path) = Config::config_path() {
        if path.exists() {
            println!("# Source: {}", path.display());
        } else {
            println!("# Source: defaults (no config file)");
        }
    }
}

fn handle_config_reset() -> Result<()> {
    let path = config_path()?;

    if path.exists() {
        eprint!(
            "Config file exists at {}. Overwrite? [y/N] ",
            path.display()
        );
        std::io::stderr().flush().context("Failed to flush stderr")?;

        let mut input = String::new();
        std::io::stdin()
            .read_line(&mut input)
            .context("Failed to read answer")?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Aborted.");
            return Ok(());
        }
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(&path, Config::default().to_toml())
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Config reset to defaults: {}", path.display());
    Ok(())
}

fn handle_config_edit() -> Result<()> {
    let path = config_path()?;

    if !path.exists() {
        Config::ensure_config_exists();
        println!("Created new config file: {}", path.display());
    }

    let editor = std::env::var("EDITOR")
        .or_else(|_| std::env::var("VISUAL"))
        .unwrap_or_else(|_| {
            if cfg!(windows) {
                "notepad".to_string()
            } else {
                "nano".to_string()
            }
        });

    println!("Opening {} with {}", path.display(), editor);

    let status = Command::new(&editor)
        .arg(&path)
        .status()
        .with_context(|| {
            format!(
                "Failed to launch editor '{}' (set $EDITOR to your preferred editor)",
                editor
            )
        })?;
    if !status.success() {
        bail!("Editor exited with status: {}", status);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_subcommands() {
        let cli = Cli::parse_from(["drugstore", "search", "--letter", "a", "amox"]);
        match cli.command {
            Some(Commands::Search { letter, query }) => {
                assert_eq!(letter, Letter::new('A'));
                assert_eq!(query, "amox");
            }
            _ => panic!("expected search"),
        }

        let cli = Cli::parse_from(["drugstore", "show", "Amoxicillin", "--data", "d.json"]);
        assert_eq!(cli.data.as_deref(), Some("d.json"));
        assert!(matches!(
            cli.command,
            Some(Commands::Show { variant: 1, .. })
        ));
    }

    #[test]
    fn test_no_subcommand_means_browser() {
        let cli = Cli::parse_from(["drugstore"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_rejects_non_letter() {
        assert!(Cli::try_parse_from(["drugstore", "search", "--letter", "7"]).is_err());
    }

    #[tokio::test]
    async fn test_show_reads_local_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let data = dir.path().join("data.json");
        std::fs::write(
            &data,
            r#"[{"name":"Amoxicillin","subdrugs":[{"name":"Amoxicillin 500mg","sediaan":"tablet"}]}]"#,
        )
        .unwrap();

        let config = Config {
            data_source: data.display().to_string(),
            ..Config::default()
        };
        assert!(handle_show(&config, "amoxicillin", 1).await.is_ok());
        assert!(handle_show(&config, "amoxicillin", 2).await.is_err());
        assert!(handle_show(&config, "ibuprofen", 1).await.is_err());
        assert!(handle_search(&config, None, "AMO").await.is_ok());
    }
}
