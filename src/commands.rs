//! CLI Command Handlers
//!
//! Each handler drives the same view controllers the interactive client
//! uses, then prints the resulting view state. Handlers take the App and
//! Output and return an ExitCode.

use serde::Serialize;
use std::path::Path;

use cinehub::app::{App, Route};
use cinehub::config::Config;
use cinehub::models::{Movie, Review, User, ALL_GENRES};
use cinehub::ui::{ActionOutcome, AuthMode, Level, LoadingState};

use crate::cli::{
    ConfigCmd, ExitCode, FavoriteCmd, LoginCmd, MovieCmd, MoviesCmd, Output, RegisterCmd,
    ReviewCmd, WhoamiCmd,
};

const SIGN_IN_FIRST: &str = "Not signed in. Run `cinehub login` first.";

/// Print pending success notices; return the most recent error notice
fn drain_notices(app: &mut App, output: &Output) -> Option<String> {
    let mut last_error = None;
    for notice in app.notices.drain() {
        match notice.level {
            Level::Success => output.info(notice.message),
            Level::Error => last_error = Some(notice.message),
        }
    }
    last_error
}

fn print_or_fail<T: Serialize>(output: &Output, data: T, text: impl FnOnce() -> String) -> ExitCode {
    match output.print(data, text) {
        Ok(()) => ExitCode::Success,
        Err(e) => output.error(format!("Failed to serialize: {}", e), ExitCode::Error),
    }
}

fn movie_lines(movies: &[Movie]) -> String {
    movies
        .iter()
        .map(|m| format!("[{}] {}", m.id, m))
        .collect::<Vec<_>>()
        .join("\n")
}

// =============================================================================
// Catalog Commands
// =============================================================================

pub async fn genres_cmd(app: &mut App, output: &Output) -> ExitCode {
    match app.api.public.genres().await {
        Ok(genres) => print_or_fail(output, &genres, || genres.join("\n")),
        Err(e) => output.error(format!("Could not load genres: {}", e), ExitCode::NetworkError),
    }
}

pub async fn movies_cmd(cmd: MoviesCmd, app: &mut App, output: &Output) -> ExitCode {
    app.catalog.genre = cmd.genre.unwrap_or_else(|| ALL_GENRES.to_string());
    app.search(cmd.search.as_deref().unwrap_or_default()).await;

    if let LoadingState::Error(msg) = &app.catalog.loading {
        let msg = msg.clone();
        drain_notices(app, output);
        return output.error(msg, ExitCode::NetworkError);
    }

    if cmd.featured {
        return match app.catalog.featured() {
            Some(movie) => print_or_fail(output, movie, || movie.to_string()),
            None => output.error("No movies found", ExitCode::Error),
        };
    }

    let movies = &app.catalog.movies;
    if app.catalog.is_empty_state() {
        output.info("No movies found");
    }
    print_or_fail(output, movies, || movie_lines(movies))
}

// =============================================================================
// Detail Commands
// =============================================================================

#[derive(Serialize)]
struct MovieReport<'a> {
    movie: &'a Movie,
    reviews: &'a [Review],
    #[serde(skip_serializing_if = "Option::is_none")]
    is_favorite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    trailer_embed_url: Option<String>,
}

fn movie_report_text(report: &MovieReport<'_>) -> String {
    let movie = report.movie;
    let mut lines = vec![
        format!("{} ({})", movie.title, movie.year),
        format!(
            "{} | {} | ★ {:.1} ({} ratings)",
            movie.genre.join(", "),
            movie.runtime(),
            movie.rating_avg,
            movie.rating_count
        ),
    ];
    if report.is_favorite == Some(true) {
        lines.push("♥ In your favorites".to_string());
    }
    lines.push(String::new());
    lines.push(movie.description.clone());
    if let Some(url) = &report.trailer_embed_url {
        lines.push(format!("Trailer: {}", url));
    }
    lines.push(String::new());
    if report.reviews.is_empty() {
        lines.push("No reviews yet".to_string());
    } else {
        lines.push(format!("Reviews ({})", report.reviews.len()));
        lines.extend(report.reviews.iter().map(|r| r.to_string()));
    }
    lines.join("\n")
}

pub async fn movie_cmd(cmd: MovieCmd, app: &mut App, output: &Output) -> ExitCode {
    app.go_detail(&cmd.id).await;

    let error = drain_notices(app, output);
    let Some(movie) = app.detail.movie.as_ref() else {
        return output.error(
            error.unwrap_or_else(|| "Movie not found".to_string()),
            ExitCode::NetworkError,
        );
    };

    let report = MovieReport {
        movie,
        reviews: &app.detail.reviews,
        is_favorite: app.signed_in().then_some(app.detail.is_favorite),
        trailer_embed_url: movie.trailer_embed_url(),
    };
    print_or_fail(output, &report, || movie_report_text(&report))
}

pub async fn review_cmd(cmd: ReviewCmd, app: &mut App, output: &Output) -> ExitCode {
    if !app.signed_in() {
        return output.error(SIGN_IN_FIRST, ExitCode::AuthRequired);
    }

    app.go_detail(&cmd.id).await;
    if app.detail.movie.is_none() {
        let msg = drain_notices(app, output).unwrap_or_else(|| "Movie not found".to_string());
        return output.error(msg, ExitCode::NetworkError);
    }

    let outcome = app.submit_review(cmd.rating, &cmd.comment).await;
    let error = drain_notices(app, output);

    match outcome {
        ActionOutcome::Done => {
            let reviews = &app.detail.reviews;
            print_or_fail(output, reviews, || {
                reviews
                    .iter()
                    .map(|r| r.to_string())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
        }
        ActionOutcome::AuthRequired => output.error(SIGN_IN_FIRST, ExitCode::AuthRequired),
        ActionOutcome::Skipped => output.error(error.unwrap_or_default(), ExitCode::InvalidArgs),
        ActionOutcome::Failed => output.error(error.unwrap_or_default(), ExitCode::NetworkError),
    }
}

#[derive(Serialize)]
struct FavoriteState<'a> {
    movie_id: &'a str,
    is_favorite: bool,
}

pub async fn favorite_cmd(cmd: FavoriteCmd, app: &mut App, output: &Output) -> ExitCode {
    if !app.signed_in() {
        return output.error(SIGN_IN_FIRST, ExitCode::AuthRequired);
    }

    app.go_detail(&cmd.id).await;
    if app.detail.movie.is_none() {
        let msg = drain_notices(app, output).unwrap_or_else(|| "Movie not found".to_string());
        return output.error(msg, ExitCode::NetworkError);
    }

    let outcome = app.toggle_favorite().await;
    let error = drain_notices(app, output);

    match outcome {
        ActionOutcome::Done => {
            let state = FavoriteState {
                movie_id: &cmd.id,
                is_favorite: app.detail.is_favorite,
            };
            print_or_fail(output, &state, || {
                if state.is_favorite {
                    format!("♥ {} is in your favorites", cmd.id)
                } else {
                    format!("{} removed from favorites", cmd.id)
                }
            })
        }
        ActionOutcome::AuthRequired => output.error(SIGN_IN_FIRST, ExitCode::AuthRequired),
        ActionOutcome::Skipped | ActionOutcome::Failed => {
            output.error(error.unwrap_or_default(), ExitCode::NetworkError)
        }
    }
}

// =============================================================================
// Profile Command
// =============================================================================

#[derive(Serialize)]
struct ProfileReport<'a> {
    user: Option<&'a User>,
    favorites: &'a [Movie],
    watch_history: &'a [Movie],
}

pub async fn profile_cmd(app: &mut App, output: &Output) -> ExitCode {
    if *app.go_profile().await != Route::Profile {
        return output.error(SIGN_IN_FIRST, ExitCode::AuthRequired);
    }

    if let Some(error) = drain_notices(app, output) {
        output.info(format!("Warning: {}", error));
    }

    let profile = &app.profile;
    let report = ProfileReport {
        user: app.session.user(),
        favorites: &profile.favorites,
        watch_history: &profile.watch_history,
    };
    print_or_fail(output, &report, || {
        let section = |title: &str, movies: &[Movie], empty: bool| {
            if empty {
                format!("{}\n  (nothing here yet)", title)
            } else {
                format!("{}\n{}", title, movie_lines(movies))
            }
        };
        format!(
            "{}\n\n{}",
            section("Favorites", report.favorites, profile.favorites_empty()),
            section("Watch history", report.watch_history, profile.history_empty())
        )
    })
}

// =============================================================================
// Account Commands
// =============================================================================

async fn authenticate(mode: AuthMode, app: &mut App, output: &Output) -> ExitCode {
    if !app.submit_auth().await {
        let msg = drain_notices(app, output)
            .or_else(|| app.auth.error.clone())
            .unwrap_or_default();
        return output.error(msg, ExitCode::NetworkError);
    }
    drain_notices(app, output);

    match app.session.user() {
        Some(user) => print_or_fail(output, user, || match mode {
            AuthMode::Login => format!("Signed in as {}", user),
            AuthMode::Register => format!("Registered and signed in as {}", user),
        }),
        None => output.error("Session was not stored", ExitCode::Error),
    }
}

pub async fn login_cmd(cmd: LoginCmd, app: &mut App, output: &Output) -> ExitCode {
    app.open_auth(AuthMode::Login);
    app.auth.form.email = cmd.email;
    app.auth.form.password = cmd.password;
    authenticate(AuthMode::Login, app, output).await
}

pub async fn register_cmd(cmd: RegisterCmd, app: &mut App, output: &Output) -> ExitCode {
    app.open_auth(AuthMode::Register);
    app.auth.form.name = cmd.name;
    app.auth.form.email = cmd.email;
    app.auth.form.password = cmd.password;
    authenticate(AuthMode::Register, app, output).await
}

#[derive(Serialize)]
struct StatusOk {
    status: &'static str,
}

pub fn logout_cmd(app: &mut App, output: &Output) -> ExitCode {
    app.logout();
    print_or_fail(output, StatusOk { status: "ok" }, || "Signed out".to_string())
}

pub async fn whoami_cmd(cmd: WhoamiCmd, app: &mut App, output: &Output) -> ExitCode {
    if cmd.remote {
        return match app.api.authed.me().await {
            Ok(user) => print_or_fail(output, &user, || user.to_string()),
            Err(e) if e.is_unauthorized() => output.error(
                format!("Server rejected the stored token: {}", e),
                ExitCode::AuthRequired,
            ),
            Err(e) => output.error(format!("Request failed: {}", e), ExitCode::NetworkError),
        };
    }

    match app.session.user() {
        Some(user) => print_or_fail(output, user, || app.nav_bar().to_string()),
        None => output.error(SIGN_IN_FIRST, ExitCode::AuthRequired),
    }
}

pub async fn seed_cmd(app: &mut App, output: &Output) -> ExitCode {
    output.info("Loading sample catalog...");
    match app.api.public.seed().await {
        Ok(ack) => print_or_fail(output, &ack, || ack.message.clone()),
        Err(e) => output.error(format!("Seeding failed: {}", e), ExitCode::NetworkError),
    }
}

// =============================================================================
// Config Command
// =============================================================================

pub fn config_cmd(cmd: ConfigCmd, config: &mut Config, path: Option<&Path>, output: &Output) -> ExitCode {
    if let Some(url) = cmd.set_api_url {
        let Some(path) = path else {
            return output.error("Could not determine config path", ExitCode::Error);
        };
        config.api_url = Some(url);
        if let Err(e) = config.save(path) {
            return output.error(format!("Failed to save config: {}", e), ExitCode::Error);
        }
        output.info(format!("Saved {}", path.display()));
    }

    let text = toml::to_string_pretty(&*config).unwrap_or_default();
    print_or_fail(output, &*config, || text)
}
