//! CLI - Command Line Interface for CineHub
//!
//! Every view action is a subcommand. Output is human-readable on a
//! terminal and JSON otherwise (or with `--json`).
//!
//! # Examples
//!
//! ```bash
//! # Browse the catalog
//! cinehub movies --search matrix --genre Sci-Fi
//!
//! # Sign in, then rate a movie
//! cinehub login --email ann@example.com --password hunter2
//! cinehub review 42 --rating 4 --comment "Great pacing"
//!
//! # Favorites and history
//! cinehub favorite 42
//! cinehub profile --json
//! ```

use clap::{Args, Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::path::PathBuf;

use cinehub::models::{MAX_RATING, MIN_RATING};

// =============================================================================
// Exit Codes
// =============================================================================

/// Exit codes for CLI operations (semantic for scripting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// General error
    Error = 1,
    /// Invalid arguments
    InvalidArgs = 2,
    /// Network error or rejected request
    NetworkError = 3,
    /// Command needs a signed-in user
    AuthRequired = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> std::process::ExitCode {
        std::process::ExitCode::from(code as u8)
    }
}

// =============================================================================
// Main CLI Structure
// =============================================================================

/// CineHub - browse, rate and collect movies
#[derive(Parser, Debug)]
#[command(
    name = "cinehub",
    version,
    about = "Client for the CineHub movie catalog",
    after_help = "EXAMPLES:\n\
                  cinehub movies --search matrix       Search the catalog\n\
                  cinehub movie 42                     Show a movie with reviews\n\
                  cinehub login -e a@b.c -p secret     Sign in\n\
                  cinehub profile --json               Favorites and history"
)]
pub struct Cli {
    /// Output format as JSON (default for non-TTY)
    #[arg(long, short = 'j', global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Base URL of the CineHub API
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Path to config file
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Check if JSON output should be used
    pub fn should_json(&self) -> bool {
        self.json || !std::io::stdout().is_terminal()
    }
}

// =============================================================================
// Subcommands
// =============================================================================

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(flatten)]
    Client(ClientCommand),

    /// Show or update the config file
    Config(ConfigCmd),
}

/// Commands that run against the API with the stored session
#[derive(Subcommand, Debug)]
pub enum ClientCommand {
    /// List genre labels
    #[command(visible_alias = "g")]
    Genres,

    /// Browse or search the catalog
    #[command(visible_alias = "ls")]
    Movies(MoviesCmd),

    /// Show a movie with its reviews
    #[command(visible_alias = "m")]
    Movie(MovieCmd),

    /// Rate and review a movie
    #[command(visible_alias = "r")]
    Review(ReviewCmd),

    /// Add a movie to favorites, or remove it if already there
    #[command(visible_alias = "fav")]
    Favorite(FavoriteCmd),

    /// Show favorites and watch history
    #[command(visible_alias = "p")]
    Profile,

    /// Sign in
    Login(LoginCmd),

    /// Create an account and sign in
    Register(RegisterCmd),

    /// Sign out and forget the stored session
    Logout,

    /// Show who is signed in
    Whoami(WhoamiCmd),

    /// Load the sample catalog into an empty server
    Seed,
}

// =============================================================================
// Catalog Commands
// =============================================================================

/// Browse movies with optional filters
#[derive(Args, Debug, Default)]
pub struct MoviesCmd {
    /// Free-text search over title and description
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Genre label ("all" for any)
    #[arg(long, short = 'g')]
    pub genre: Option<String>,

    /// Only print the featured (top-rated) movie
    #[arg(long, short = 'f')]
    pub featured: bool,
}

/// Show one movie
#[derive(Args, Debug)]
pub struct MovieCmd {
    /// Movie id
    pub id: String,
}

// =============================================================================
// Review & Favorite Commands
// =============================================================================

/// Post a review
#[derive(Args, Debug)]
pub struct ReviewCmd {
    /// Movie id
    pub id: String,

    /// Stars, 1-5
    #[arg(long, short = 'r', default_value = "5", value_parser = parse_rating)]
    pub rating: u8,

    /// Review text
    #[arg(long, short = 'm')]
    pub comment: String,
}

/// Toggle a favorite
#[derive(Args, Debug)]
pub struct FavoriteCmd {
    /// Movie id
    pub id: String,
}

fn parse_rating(s: &str) -> Result<u8, String> {
    let rating: u8 = s
        .parse()
        .map_err(|_| format!("'{}' is not a number", s))?;
    if (MIN_RATING..=MAX_RATING).contains(&rating) {
        Ok(rating)
    } else {
        Err(format!("rating must be between {} and {}", MIN_RATING, MAX_RATING))
    }
}

// =============================================================================
// Account Commands
// =============================================================================

#[derive(Args, Debug)]
pub struct LoginCmd {
    #[arg(long, short = 'e')]
    pub email: String,

    #[arg(long, short = 'p')]
    pub password: String,
}

#[derive(Args, Debug)]
pub struct RegisterCmd {
    /// Display name
    #[arg(long, short = 'n')]
    pub name: String,

    #[arg(long, short = 'e')]
    pub email: String,

    #[arg(long, short = 'p')]
    pub password: String,
}

#[derive(Args, Debug, Default)]
pub struct WhoamiCmd {
    /// Ask the server instead of reading the stored session
    #[arg(long)]
    pub remote: bool,
}

#[derive(Args, Debug, Default)]
pub struct ConfigCmd {
    /// Store this API URL in the config file
    #[arg(long)]
    pub set_api_url: Option<String>,
}

// =============================================================================
// JSON Output Types
// =============================================================================

/// Generic JSON output wrapper with status
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonOutput<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "is_zero")]
    pub exit_code: i32,
}

fn is_zero(n: &i32) -> bool {
    *n == 0
}

impl<T: Serialize> JsonOutput<T> {
    /// Create success output with data
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            exit_code: 0,
        }
    }

    /// Create error output (no data)
    pub fn error_msg(msg: impl Into<String>, code: ExitCode) -> JsonOutput<()> {
        JsonOutput::<()> {
            data: None,
            error: Some(msg.into()),
            exit_code: code.into(),
        }
    }
}

// =============================================================================
// Output Helpers
// =============================================================================

/// Output handler for consistent formatting
pub struct Output {
    pub json: bool,
    pub quiet: bool,
}

impl Output {
    pub fn new(cli: &Cli) -> Self {
        Self {
            json: cli.should_json(),
            quiet: cli.quiet,
        }
    }

    /// Print success data: JSON envelope, or the given text
    pub fn print<T: Serialize>(&self, data: T, text: impl FnOnce() -> String) -> anyhow::Result<()> {
        if self.json {
            let output = JsonOutput::success(data);
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", text());
        }
        Ok(())
    }

    /// Print error and return exit code
    pub fn error(&self, msg: impl Into<String>, code: ExitCode) -> ExitCode {
        let msg = msg.into();
        if self.json {
            let output = JsonOutput::<()>::error_msg(&msg, code);
            if let Ok(json) = serde_json::to_string_pretty(&output) {
                eprintln!("{}", json);
            }
        } else if !self.quiet {
            eprintln!("Error: {}", msg);
        }
        code
    }

    /// Print info message (suppressed in quiet mode)
    pub fn info(&self, msg: impl std::fmt::Display) {
        if !self.quiet && !self.json {
            eprintln!("{}", msg);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
