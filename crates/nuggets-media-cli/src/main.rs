use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::{info, warn, LevelFilter};
use nuggets_media_core::dto::{PostMedia, PostMediaDto};
use nuggets_media_core::logging::{self, LOG_ENV};
use nuggets_media_core::migration::{audit, write_tags, MigrationPhase};
use nuggets_media_core::persistence::{JsonFileStore, KeyValueStore, SessionRepository};
use nuggets_media_core::request::{read_value, CreateRequest, DetectRequest, ReconcileRequest};
use nuggets_media_core::{normalize, Config, EditSession};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "nuggets-media")]
#[command(about = "Deduplicate and reconcile image references in Nuggets posts")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbosity level
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Write logs to a rotating file in this directory instead of stderr
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the normalized form of each URL
    Normalize {
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Report duplicate pairs in a `{"urls": [...]}` request
    Detect {
        /// JSON request file, stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Deduplicate a `{"images": [...]}` request for a new post
    Dedupe {
        /// JSON request file, stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Reconcile an edited post's images
    Reconcile {
        /// JSON request file, stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Merge in and update the saved edit session of this post
        #[arg(long)]
        post: Option<String>,
    },

    /// Manage saved edit sessions
    Session {
        /// Post the session belongs to
        post: String,

        #[command(subcommand)]
        action: SessionAction,
    },

    /// Export a stored post media document through the versioned DTO
    Export {
        /// JSON document file, stdin when omitted
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Replace the post's tags before exporting
        #[arg(long = "set-tag")]
        set_tags: Vec<String>,

        /// Override the configured migration phase
        #[arg(long)]
        phase: Option<MigrationPhase>,
    },

    /// Generate default configuration file
    GenerateConfig {
        /// Path to save configuration file
        #[arg(default_value = "nuggets-media.json")]
        path: PathBuf,
    },
}

#[derive(Subcommand)]
enum SessionAction {
    /// Record a promotion into supporting media
    Promote { url: String },

    /// Record a demotion back to the plain list
    Demote { url: String },

    /// Record an explicit delete
    Delete { url: String },

    /// Print the saved session
    Show,

    /// Forget the saved session
    Discard,
}

fn main() -> Result<(), anyhow::Error> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Set up configuration
    let config = match &cli.config {
        Some(config_path) => Config::from_file(config_path)
            .with_context(|| format!("Failed to load {}", config_path.display()))?,
        None => Config::default(),
    };
    config.validate()?;

    // Initialize logger
    let level: LevelFilter = config.log_level.raised_by(cli.verbose).into();
    match &cli.log_dir {
        Some(dir) => {
            logging::init_logger(dir, level)?;
        }
        None => env_logger::Builder::new()
            .filter_level(level)
            .parse_env(LOG_ENV)
            .init(),
    }

    let pretty = cli.pretty || config.pretty_output;

    match cli.command {
        Commands::Normalize { urls } => {
            for url in urls {
                println!("{}", normalize(&url));
            }
            Ok(())
        }

        Commands::Detect { input } => {
            let request = DetectRequest::from_value(&read_input(input.as_deref())?)?;
            print_json(&request.run(), pretty)
        }

        Commands::Dedupe { input } => {
            let request = CreateRequest::from_value(&read_input(input.as_deref())?)?;
            let outcome = request.run();
            info!(
                "Kept {} images, removed {} duplicates",
                outcome.deduplicated.len(),
                outcome.removed.len()
            );
            print_json(&outcome, pretty)
        }

        Commands::Reconcile { input, post } => {
            let mut request = ReconcileRequest::from_value(&read_input(input.as_deref())?)?;

            let Some(post) = post else {
                return print_json(&request.run(), pretty);
            };

            let repository = open_sessions(&config)?;
            let mut session = repository.load(&post)?;

            // The saved session adds to whatever the request already carries
            request
                .images_backup
                .get_or_insert_with(Default::default)
                .extend(session.images_backup.iter().cloned());
            request
                .explicitly_deleted
                .get_or_insert_with(Default::default)
                .extend(session.explicitly_deleted.iter().cloned());

            let result = request.run();
            logging::log_reconciliation(&post, &result);

            session.absorb(&result);
            repository.save(&post, &session)?;
            repository.store().close()?;

            print_json(&result, pretty)
        }

        Commands::Session { post, action } => {
            let repository = open_sessions(&config)?;
            let mut session = repository.load(&post)?;

            if let SessionAction::Discard = action {
                let existed = repository.discard(&post)?;
                repository.store().close()?;
                return print_json(&json!({ "post": post, "discarded": existed }), pretty);
            }

            record_action(&mut session, &action);
            repository.save(&post, &session)?;
            repository.store().close()?;
            print_json(&session, pretty)
        }

        Commands::Export {
            input,
            set_tags,
            phase,
        } => {
            let phase = phase.unwrap_or(config.migration_phase);
            let mut media: PostMedia = serde_json::from_value(read_input(input.as_deref())?)
                .context("Input is not a post media document")?;

            media.upgrade();
            if !set_tags.is_empty() {
                write_tags(phase, &mut media.tag_fields, &set_tags);
            }

            let output = json!({
                "media": PostMediaDto::from_media(&media, phase),
                "drift": audit(&media.tag_fields),
            });
            print_json(&output, pretty)
        }

        Commands::GenerateConfig { path } => {
            let config = Config::default();
            config.save_to_file(&path)?;
            println!("Configuration file generated at: {}", path.display());
            Ok(())
        }
    }
}

/// Apply a session action; stdout stays reserved for the JSON result
fn record_action(session: &mut EditSession, action: &SessionAction) {
    match action {
        SessionAction::Promote { url } => session.promote(url),
        SessionAction::Demote { url } => {
            if !session.demote(url) {
                warn!("{} is explicitly deleted and will not be restored", url);
            }
        }
        SessionAction::Delete { url } => session.delete(url),
        SessionAction::Show | SessionAction::Discard => {}
    }
}

/// Read a JSON document from a file or stdin
fn read_input(path: Option<&Path>) -> Result<Value, anyhow::Error> {
    let value = match path {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
            read_value(file)?
        }
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            read_value(buffer.as_bytes())?
        }
    };
    Ok(value)
}

fn open_sessions(config: &Config) -> Result<SessionRepository<JsonFileStore>, anyhow::Error> {
    let store = JsonFileStore::new(&config.session_store);
    store
        .open()
        .with_context(|| format!("Failed to open {}", config.session_store.display()))?;
    Ok(SessionRepository::new(store))
}

fn print_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<(), anyhow::Error> {
    let output = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", output);
    Ok(())
}
