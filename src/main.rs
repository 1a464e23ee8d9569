//! CineHub - command-line client for the CineHub movie catalog
//!
//! # Usage
//!
//! ```bash
//! cinehub movies --search "blade runner"
//! cinehub movie 42
//! cinehub login --email ann@example.com --password hunter2
//! cinehub favorite 42 --json
//! ```

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use cinehub::app::App;
use cinehub::config::Config;

use crate::cli::{ClientCommand, Cli, Command, ExitCode, Output};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let exit_code = run_cli(cli).await;
    std::process::exit(exit_code.into());
}

/// Logs go to stderr so JSON on stdout stays parseable
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cinehub=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Run CLI command and return exit code
async fn run_cli(cli: Cli) -> ExitCode {
    let output = Output::new(&cli);

    let config_path = cli.config.clone().or_else(Config::path);
    let mut config = config_path
        .as_deref()
        .map(Config::load_from)
        .unwrap_or_default();

    // Config edits must work even when the session file is unreadable
    match cli.command {
        Command::Config(cmd) => {
            commands::config_cmd(cmd, &mut config, config_path.as_deref(), &output)
        }
        Command::Client(command) => {
            let mut app = match App::start(&config, cli.api_url.as_deref()) {
                Ok(app) => app,
                Err(e) => return output.error(format!("{:#}", e), ExitCode::Error),
            };
            tracing::debug!(api = %app.api.public.base_url(), signed_in = app.signed_in(), "client ready");
            dispatch(command, &mut app, &output).await
        }
    }
}

/// Run a server-facing command against the app
async fn dispatch(command: ClientCommand, app: &mut App, output: &Output) -> ExitCode {
    match command {
        ClientCommand::Genres => commands::genres_cmd(app, output).await,
        ClientCommand::Movies(cmd) => commands::movies_cmd(cmd, app, output).await,
        ClientCommand::Movie(cmd) => commands::movie_cmd(cmd, app, output).await,
        ClientCommand::Review(cmd) => commands::review_cmd(cmd, app, output).await,
        ClientCommand::Favorite(cmd) => commands::favorite_cmd(cmd, app, output).await,
        ClientCommand::Profile => commands::profile_cmd(app, output).await,
        ClientCommand::Login(cmd) => commands::login_cmd(cmd, app, output).await,
        ClientCommand::Register(cmd) => commands::register_cmd(cmd, app, output).await,
        ClientCommand::Logout => commands::logout_cmd(app, output),
        ClientCommand::Whoami(cmd) => commands::whoami_cmd(cmd, app, output).await,
        ClientCommand::Seed => commands::seed_cmd(app, output).await,
    }
}
