mod api;
mod app;
mod config;
mod error;
mod format;
mod input;
mod logging;
mod messages;
mod model;
mod pagination;
mod poster;
mod ui;

#[cfg(test)]
mod testing;

use api::{CatalogApi, HttpCatalog, MovieFilter, MovieQuery};
use app::App;
use clap::{Parser, Subcommand};
use config::Config;
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures_util::StreamExt;
use model::CatalogId;
use poster::PosterState;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Terminal browser for the movie catalog API
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Catalog API base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Path to a JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive browser (default)
    Run,
    /// Print one page of movies
    Movies {
        /// Free-text search
        #[arg(short, long)]
        search: Option<String>,
        /// Genre title to filter by
        #[arg(short, long)]
        genre: Option<String>,
        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Print the details of one movie
    Show {
        /// Movie identifier
        id: String,
    },
    /// Print the genre list
    Genres,
    /// Probe the API health endpoint
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?.with_overrides(cli.base_url, cli.timeout);
    config.validate()?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            let _log_guard = logging::init_file(&config.log_path())?;
            info!("Using catalog at {}", config.base_url);

            let api: Arc<dyn CatalogApi> = Arc::new(HttpCatalog::new(&config)?);
            let mut app = App::new(api);
            app.start_session();

            // Init terminal
            let mut terminal = ratatui::init();

            // Main loop
            let result = run_app(&mut terminal, &mut app).await;

            // Restore terminal
            ratatui::restore();

            if let Err(e) = result {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
        Commands::Movies { search, genre, page } => {
            logging::init_stderr();
            let api = HttpCatalog::new(&config)?;
            let token = api.acquire_token().await?;

            let filter = MovieFilter::new(
                search.as_deref().unwrap_or_default(),
                genre.as_deref().unwrap_or_default(),
            );
            let query = MovieQuery::new(page, filter);
            let result = api.movies(&token, &query).await?;

            for movie in &result.data {
                let mut line = format!("{:<12} {}", movie.id, movie.title.as_deref().unwrap_or("-"));
                for (label, value) in [
                    ("Year", &movie.year),
                    ("Genre", &movie.genre),
                    ("Rating", &movie.rating),
                ] {
                    if let Some(v) = format::summary_value(value.as_ref()) {
                        line.push_str(&format!("  {}: {}", label, v));
                    }
                }
                println!("{}", line);
            }

            let total = result.page_count();
            let current = query.page.min(total);
            let window: Vec<String> = pagination::page_window(current, total, pagination::WINDOW_SIZE)
                .into_iter()
                .map(|p| if p == current { format!("[{}]", p) } else { p.to_string() })
                .collect();
            println!();
            println!("Page {} of {}   {}", current, total, window.join(" "));
        }
        Commands::Show { id } => {
            logging::init_stderr();
            let api = HttpCatalog::new(&config)?;
            let token = api.acquire_token().await?;
            let id = CatalogId::new(id);
            let detail = api.movie_detail(&token, &id).await?;

            println!(
                "{} ({})",
                detail.title().unwrap_or("(untitled)"),
                detail.id().unwrap_or_else(|| id.to_string())
            );
            let mut poster = PosterState::from_url(detail.poster_url());
            if let Some(url) = poster.url().cloned() {
                let loaded = api.probe_poster(&url).await.is_ok();
                poster.settle(&url, loaded);
            }
            match poster.url() {
                Some(url) if !poster.shows_fallback() => println!("Poster: {}", url),
                _ => println!("{}", poster::FALLBACK_POSTER),
            }
            for field in format::detail_fields(&detail) {
                println!("{}: {}", field.label, field.value);
            }
        }
        Commands::Genres => {
            logging::init_stderr();
            let api = HttpCatalog::new(&config)?;
            let token = api.acquire_token().await?;
            for genre in api.genres(&token).await? {
                println!("{:<8} {}", genre.id, genre.title);
            }
        }
        Commands::Health => {
            logging::init_stderr();
            let api = HttpCatalog::new(&config)?;
            match api.health_check().await {
                Ok(()) => println!("Catalog API is healthy"),
                Err(e) => {
                    eprintln!("Catalog API is unhealthy: {e}");
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}

async fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut keys = EventStream::new();

    loop {
        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // Wake on whichever comes first: a finished request or terminal input
        tokio::select! {
            Some(event) = app.next_event() => {
                app.handle_event(event);
            }
            maybe = keys.next() => match maybe {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
                None => return Ok(()),
            },
        }

        app.drain_events();
    }
}
