//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use scolar_client::config::Config;
use scolar_client::{ApiClient, SessionStore, logging};

mod commands;

#[derive(Parser)]
#[command(name = "scolar")]
#[command(version)]
#[command(about = "Terminal admin console for the Scolar school-management API")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override the API base URL from config
    #[arg(long, value_name = "URL")]
    api_url: Option<String>,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Verify credentials against the API (sessions are not persisted)
    Login {
        #[arg(long, env = "SCOLAR_USERNAME")]
        username: String,

        #[arg(long, env = "SCOLAR_PASSWORD", hide_env_values = true)]
        password: String,

        /// Complete a first login by setting a new password
        #[arg(long)]
        new_password: Option<String>,
    },

    /// Export a student's check-in QR badge as a PNG file
    Qr {
        /// Id of the student whose badge to export
        #[arg(value_name = "STUDENT_ID")]
        student_id: u64,

        /// Output file (default: student-<id>-qr.png)
        #[arg(short, long, value_name = "FILE")]
        out: Option<std::path::PathBuf>,

        #[arg(long, env = "SCOLAR_USERNAME")]
        username: String,

        #[arg(long, env = "SCOLAR_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Print the effective configuration
    Show,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;
    rt.block_on(dispatch(cli))
}

async fn dispatch(cli: Cli) -> Result<()> {
    let mut config = Config::load().context("load config")?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }

    // Config commands run without logging or a client.
    if let Some(Commands::Config { command }) = &cli.command {
        return match command {
            ConfigCommands::Path => commands::config::path(),
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::Show => commands::config::show(&config),
        };
    }

    // Keep the guard alive for the process lifetime.
    let _log_guard = logging::init_file_logging(config.log_filter.as_deref())
        .context("init file logging")?;
    tracing::info!(api_url = %config.api_url, "scolar starting");

    let session = SessionStore::new();
    let client = ApiClient::new(&config, session).context("create API client")?;

    match cli.command {
        None => scolar_tui::run_console(client),
        Some(Commands::Login {
            username,
            password,
            new_password,
        }) => commands::auth::login(&client, &username, &password, new_password.as_deref()).await,
        Some(Commands::Qr {
            student_id,
            out,
            username,
            password,
        }) => commands::qr::export(&client, student_id, out, &username, &password).await,
        Some(Commands::Config { .. }) => unreachable!("handled above"),
    }
}
