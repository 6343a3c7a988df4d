mod auth_cmds;
mod config;
mod lesson_cmds;
mod resolve;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use planbook_core::Session;
use planbook_store::models::LessonStatus;
use planbook_store::{SlotStore, StoreConfig};

use config::PlanbookConfig;

#[derive(Parser)]
#[command(name = "planbook", about = "Write and organize lesson plans")]
struct Cli {
    /// Data directory (overrides PLANBOOK_DATA_DIR env var)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a planbook config file
    Init {
        /// Path to the claude binary used for content generation
        #[arg(long)]
        claude_binary: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Sign in (no credentials are checked)
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        school: Option<String>,
    },
    /// Sign out
    Logout,
    /// Show the signed-in profile
    Settings,
    /// List lesson plans, most recently saved first
    List,
    /// Show one lesson plan
    Show {
        /// Lesson ID or unique prefix
        lesson_id: String,
        /// Print the stored JSON document
        #[arg(long)]
        json: bool,
    },
    /// Create a lesson plan
    New {
        #[command(flatten)]
        edits: EditArgs,
    },
    /// Edit a lesson plan and save it
    Edit {
        /// Lesson ID or unique prefix
        lesson_id: String,
        #[command(flatten)]
        edits: EditArgs,
    },
    /// Delete a lesson plan
    Delete {
        /// Lesson ID or unique prefix
        lesson_id: String,
    },
}

/// Changes applied to the editor buffer before it is saved.
#[derive(Debug, Default, Args)]
pub struct EditArgs {
    /// Set a text field, e.g. `title=Fractions` or `procedure.closure=Exit ticket`
    #[arg(long = "set", value_name = "PATH=VALUE")]
    pub set: Vec<String>,
    /// Publication status: draft or published
    #[arg(long)]
    pub status: Option<LessonStatus>,
    /// Append a material
    #[arg(long = "material", value_name = "TEXT")]
    pub materials: Vec<String>,
    /// Remove a material by its 1-based position in `show` output
    #[arg(long = "remove-material", value_name = "INDEX")]
    pub remove_materials: Vec<usize>,
    /// Add a class schedule row with the given class name
    #[arg(long = "add-class", value_name = "NAME")]
    pub add_classes: Vec<String>,
    /// Update a class schedule row, e.g. `3f2a:room=104`
    #[arg(long = "set-class", value_name = "ID:FIELD=VALUE")]
    pub set_classes: Vec<String>,
    /// Remove a class schedule row
    #[arg(long = "remove-class", value_name = "ID")]
    pub remove_classes: Vec<String>,
    /// Prefill the lesson with generated content (needs title, subject and grade level)
    #[arg(long)]
    pub generate: bool,
}

/// Execute the `planbook init` command: write config file.
fn cmd_init(
    data_dir: Option<&Path>,
    claude_binary: Option<String>,
    force: bool,
) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let data_dir = data_dir
        .map(Path::to_path_buf)
        .unwrap_or_else(StoreConfig::default_data_dir);

    let cfg = config::ConfigFile {
        store: config::StoreSection {
            data_dir: Some(data_dir.clone()),
        },
        generation: config::GenerationSection {
            claude_binary: claude_binary.clone(),
            timeout_secs: Some(config::DEFAULT_GENERATION_TIMEOUT_SECS),
            model: None,
        },
    };

    let path = config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  store.data_dir = {}", data_dir.display());
    println!(
        "  generation.claude_binary = {}",
        claude_binary.as_deref().unwrap_or(config::DEFAULT_CLAUDE_BINARY)
    );
    println!();
    println!("Next: run `planbook login --email <email> --name <name>` to sign in.");

    Ok(())
}

/// Resolve configuration, open the store, and load the session.
async fn open_session(cli_data_dir: Option<&Path>) -> anyhow::Result<(PlanbookConfig, Session)> {
    let resolved = PlanbookConfig::resolve(cli_data_dir)?;
    let store = SlotStore::open(resolved.store.clone())
        .await
        .context("failed to open lesson store")?;
    debug!(data_dir = %resolved.store.data_dir().display(), "store opened");
    let session = Session::load(store).await?;
    Ok((resolved, session))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let data_dir = cli.data_dir.as_deref();

    match cli.command {
        Commands::Init {
            claude_binary,
            force,
        } => {
            cmd_init(data_dir, claude_binary, force)?;
        }
        Commands::Login {
            email,
            name,
            school,
        } => {
            let (_, mut session) = open_session(data_dir).await?;
            auth_cmds::cmd_login(&mut session, &email, &name, school.as_deref()).await?;
        }
        Commands::Logout => {
            let (_, mut session) = open_session(data_dir).await?;
            auth_cmds::cmd_logout(&mut session).await?;
        }
        Commands::Settings => {
            let (_, mut session) = open_session(data_dir).await?;
            auth_cmds::cmd_settings(&mut session)?;
        }
        Commands::List => {
            let (_, session) = open_session(data_dir).await?;
            lesson_cmds::cmd_list(&session)?;
        }
        Commands::Show { lesson_id, json } => {
            let (_, session) = open_session(data_dir).await?;
            lesson_cmds::cmd_show(&session, &lesson_id, json)?;
        }
        Commands::New { edits } => {
            let (resolved, mut session) = open_session(data_dir).await?;
            lesson_cmds::cmd_new(&mut session, &edits, &resolved.generation).await?;
        }
        Commands::Edit { lesson_id, edits } => {
            let (resolved, mut session) = open_session(data_dir).await?;
            lesson_cmds::cmd_edit(&mut session, &lesson_id, &edits, &resolved.generation).await?;
        }
        Commands::Delete { lesson_id } => {
            let (_, mut session) = open_session(data_dir).await?;
            lesson_cmds::cmd_delete(&mut session, &lesson_id).await?;
        }
    }

    Ok(())
}
