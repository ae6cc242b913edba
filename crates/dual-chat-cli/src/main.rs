mod app;
mod commands;
mod logging;
mod render;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use chat_core::Branch;

use crate::app::App;
use crate::logging::init_logging;

#[derive(Parser)]
#[command(name = "dual-chat")]
#[command(about = "Ask two models the same question and compare the answers side by side")]
#[command(version)]
struct Cli {
    /// Backend-for-frontend base URL
    #[arg(long, env = "BACKEND_URL", global = true)]
    backend_url: Option<String>,

    /// Bearer token sent with every request
    #[arg(long, env = "AUTH_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// Session to talk in
    #[arg(long, short, global = true)]
    session: Option<String>,

    /// Model for the left branch (this run only)
    #[arg(long, global = true)]
    left_model: Option<String>,

    /// Model for the right branch (this run only)
    #[arg(long, global = true)]
    right_model: Option<String>,

    /// Enable debug mode
    #[arg(long, short, default_value = "false", global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum BranchArg {
    Left,
    Right,
}

impl From<BranchArg> for Branch {
    fn from(arg: BranchArg) -> Self {
        match arg {
            BranchArg::Left => Branch::Left,
            BranchArg::Right => Branch::Right,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List known models
    Models,
    /// Pick the model for one branch and remember it
    SetModel {
        #[arg(value_enum)]
        branch: BranchArg,
        model: String,
    },
    /// List sessions grouped by age
    Sessions,
    /// Create a session
    NewSession {
        /// Initial title; replaced by the first message
        #[arg(long, default_value = "New Chat")]
        title: String,
    },
    /// Delete a session
    DeleteSession { session_id: String },
    /// Show both timelines of a session
    History,
    /// Send a single message to both models
    Send {
        /// Message content
        message: String,
    },
    /// Start interactive chat
    Chat,
    /// Show today's token quota
    Quota,
    /// List the prompt library and the current selection
    Prompts,
    /// Toggle a library prompt in or out of the context
    SelectPrompt { prompt_id: String },
    /// Save a prompt to your library
    AddPrompt { text: String },
    /// Remove a prompt from your library
    DeletePrompt { prompt_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let mut config = chat_core::Config::load()?;
    if let Some(url) = cli.backend_url {
        config.backend_url = url;
    }
    if let Some(token) = cli.token {
        config.auth_token = Some(token);
    }
    tracing::debug!(backend_url = %config.backend_url, "configuration loaded");

    let mut app = App::new(config, cli.left_model.as_deref(), cli.right_model.as_deref())?;
    let session = cli.session.as_deref();

    let result = match cli.command {
        Commands::Models => commands::list_models(&app),
        Commands::SetModel { branch, model } => commands::set_model(&mut app, branch.into(), &model),
        Commands::Sessions => commands::list_sessions(&app).await,
        Commands::NewSession { title } => commands::new_session(&app, &title).await,
        Commands::DeleteSession { session_id } => commands::delete_session(&app, &session_id).await,
        Commands::History => commands::history(&app, session).await,
        Commands::Send { message } => commands::send(&mut app, session, &message).await,
        Commands::Chat => commands::chat(&mut app, session).await,
        Commands::Quota => commands::quota(&app).await,
        Commands::Prompts => commands::prompts(&app).await,
        Commands::SelectPrompt { prompt_id } => commands::select_prompt(&mut app, &prompt_id).await,
        Commands::AddPrompt { text } => commands::add_prompt(&app, &text).await,
        Commands::DeletePrompt { prompt_id } => commands::delete_prompt(&mut app, &prompt_id).await,
    };

    app.shutdown();
    if let Err(e) = &result {
        if cli.debug {
            eprintln!("{}", format!("[DEBUG] Error: {:?}", e).dimmed());
        }
    }
    result
}
