use clap::{Parser, Subcommand};
use plastic_lab::catalog::Catalog;
use plastic_lab::config::{self, LabConfig, LabPaths};
use plastic_lab::registry::Options;
use plastic_lab::tickets::{self, ConfigSubmission, PrintConfigStore};
use plastic_lab::{output, render, tree};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "plastic-lab")]
#[command(about = "Print-lab tickets and material wiki")]
#[command(long_about = "\
Print-lab tickets and material wiki

Options are documented in Markdown, one file per option and language:

  static/wiki/
  ├── production-methods/
  │   ├── fdm.md            # English (first # header = display name,
  │   └── fdm_de.md         #   first paragraph = description)
  ├── material-types/
  │   └── pla.md
  └── colors/
      └── red.md

The catalog snapshot (catalog.toml) lists what the lab actually stocks.
Missing translations fall back to English; undocumented catalog entries
are shown as \"not available\".

Run 'plastic-lab gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Configuration file; relative paths inside it resolve against its directory
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Language for descriptions (defaults to i18n.default_language)
    #[arg(long, global = true)]
    lang: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the option tree (production method → material type → color)
    Tree {
        /// Print the JSON embedded in the new-ticket page instead
        #[arg(long)]
        json: bool,
    },
    /// Render the wiki pages
    Wiki,
    /// Render the wiki and the new-ticket page for a user
    Ticket {
        #[arg(long)]
        user: String,
        /// File to configure (defaults to the first uploaded file)
        #[arg(long)]
        file: Option<String>,
    },
    /// Cache a print configuration for one of a user's files
    Configure {
        #[arg(long)]
        user: String,
        #[arg(long)]
        file: String,
        #[arg(long, default_value = "1")]
        count: String,
        #[arg(long = "method")]
        production_method: String,
        #[arg(long = "type")]
        material_type: String,
        #[arg(long)]
        color: String,
    },
    /// Delete a user's uploads and cached configurations
    Clear {
        #[arg(long)]
        user: String,
    },
    /// Validate documentation and catalog without rendering
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plastic_lab=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let lab_config = config::load_config(&cli.config)?;
    let paths = lab_config.paths(config_base(&cli.config));
    let lang = cli
        .lang
        .clone()
        .unwrap_or_else(|| lab_config.i18n.default_language.clone());
    info!(config = %cli.config.display(), lang = %lang, "starting");

    match cli.command {
        Command::Tree { json } => {
            let (catalog, options) = load_state(&lab_config, &paths)?;
            let tree = tree::build_option_tree(&catalog, &options, &lang)?;
            if json {
                println!("{}", tree::option_tree_json(&tree)?);
            } else {
                output::print_option_tree(&tree, &options);
            }
        }
        Command::Wiki => {
            let options = Options::load(&paths.wiki_root, &lab_config.i18n.not_available)?;
            let written = render::write_site(&options, &lang, &paths.output_dir, None)?;
            output::print_written(&written, &paths.output_dir);
        }
        Command::Ticket { user, file } => {
            let (catalog, options) = load_state(&lab_config, &paths)?;
            let files = tickets::pending_files(&paths.cache_dir, &user)?;
            let active = tickets::active_file(&files, file.as_deref());
            let tree = tree::build_option_tree(&catalog, &options, &lang)?;
            let tree_json = tree::option_tree_json(&tree)?;
            let page = render::render_new_ticket(&files, active.as_deref(), &tree_json, &lang);
            let written = render::write_site(&options, &lang, &paths.output_dir, Some(page))?;
            output::print_written(&written, &paths.output_dir);
        }
        Command::Configure {
            user,
            file,
            count,
            production_method,
            material_type,
            color,
        } => {
            let catalog = Catalog::load(&paths.catalog)?;
            let mut store = PrintConfigStore::load(&paths.cache_dir);
            let active_file = tickets::user_dir(&paths.cache_dir, &user)?.join(&file);
            let submission = ConfigSubmission {
                file_count: count,
                production_method,
                material_type,
                material_color: color,
            };
            if !tickets::cache_config(&mut store, &catalog, &active_file, &user, &submission)? {
                return Err(format!(
                    "invalid selection: {} / {} / {}",
                    submission.production_method,
                    submission.material_type,
                    submission.material_color
                )
                .into());
            }
            store.save(&paths.cache_dir)?;
            println!("Cached configuration for {}", active_file.display());
        }
        Command::Clear { user } => {
            let mut store = PrintConfigStore::load(&paths.cache_dir);
            tickets::clear_user(&mut store, &paths.cache_dir, &user)?;
            store.save(&paths.cache_dir)?;
            println!("Cleared uploads and configurations of {}", user);
        }
        Command::Check => {
            let (catalog, options) = load_state(&lab_config, &paths)?;
            output::print_check_output(&catalog, &options, &lang);
            println!("==> Documentation and catalog are valid");
        }
        // Printed before the config is loaded
        Command::GenConfig => {}
    }

    Ok(())
}

/// Load the catalog snapshot and the documentation registry.
fn load_state(
    lab_config: &LabConfig,
    paths: &LabPaths,
) -> Result<(Catalog, Options), Box<dyn std::error::Error>> {
    let catalog = Catalog::load(&paths.catalog)?;
    let options = Options::load(&paths.wiki_root, &lab_config.i18n.not_available)?;
    Ok((catalog, options))
}

/// Directory that relative config paths are resolved against.
fn config_base(config_path: &Path) -> &Path {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
