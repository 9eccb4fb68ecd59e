use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::api::{CatalogApi, MovieFilter, MovieQuery};
use crate::messages::{AppEvent, EventChannel};
use crate::model::{CatalogId, Genre, MovieDetail, MoviePage, MovieSummary, Token};
use crate::pagination::{WINDOW_SIZE, page_window};
use crate::poster::PosterState;

/// Which screen has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Browse,
    GenrePicker,
}

/// Input mode for the search bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// State of one kind of request. Each operation owns its own, so a failing
/// genre list never hides a successful movie page.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetch<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> Fetch<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Fetch::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            Fetch::Loaded(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Fetch::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Search/filter/paging parameters of the movie list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub search_term: String,
    pub selected_genre: String,
    pub current_page: u32,
    pub total_pages: u32,
    pub search_performed: bool,
}

impl Default for QueryState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            selected_genre: String::new(),
            current_page: 1,
            total_pages: 1,
            search_performed: false,
        }
    }
}

impl QueryState {
    pub fn filter(&self) -> MovieFilter {
        MovieFilter::new(&self.search_term, &self.selected_genre)
    }
}

/// The movie detail overlay. Dropped as a whole when the overlay closes.
#[derive(Debug, Clone)]
pub struct DetailOverlay {
    pub seq: u64,
    pub id: CatalogId,
    pub detail: Fetch<MovieDetail>,
    pub poster: PosterState,
    pub scroll: u16,
}

/// Main application state.
pub struct App {
    api: Arc<dyn CatalogApi>,
    events: EventChannel,

    pub should_quit: bool,
    pub view: View,
    pub show_help: bool,

    // Session
    pub session: u64,
    pub token: Fetch<Token>,
    pub genres: Fetch<Vec<Genre>>,

    // Movie list
    pub query: QueryState,
    pub movies: Fetch<MoviePage>,
    pub movie_seq: u64,
    pub list_selected: usize,

    pub search_input: String,
    pub input_mode: InputMode,
    pub genre_selected: usize,

    // Detail overlay
    pub detail: Option<DetailOverlay>,
    pub detail_seq: u64,

    /// Last health probe outcome; diagnostic only.
    pub health: Option<Result<(), String>>,

    pub status_msg: String,
}

impl App {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self {
            api,
            events: EventChannel::new(),

            should_quit: false,
            view: View::Browse,
            show_help: false,

            session: 0,
            token: Fetch::Idle,
            genres: Fetch::Idle,

            query: QueryState::default(),
            movies: Fetch::Idle,
            movie_seq: 0,
            list_selected: 0,

            search_input: String::new(),
            input_mode: InputMode::Normal,
            genre_selected: 0,

            detail: None,
            detail_seq: 0,

            health: None,

            status_msg: "Connecting to catalog...".to_string(),
        }
    }

    /// Run `fut` on the runtime and deliver its event to the UI loop.
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = AppEvent> + Send + 'static,
    {
        let tx = self.events.tx.clone();
        tokio::spawn(async move {
            // The receiver only goes away when the app is shutting down.
            let _ = tx.send(fut.await);
        });
    }

    /// Handle every event that has already arrived. Returns how many were handled.
    pub fn drain_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events.rx.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Wait for the next event without handling it.
    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.events.rx.recv().await
    }

    pub fn current_token(&self) -> Option<Token> {
        self.token.loaded().cloned()
    }

    /// Acquire a new token. On success the genre list and the first page of
    /// movies are requested with it.
    pub fn start_session(&mut self) {
        self.session += 1;
        let session = self.session;
        info!("Starting catalog session {}", session);

        // List and detail results from the previous session are now stale.
        self.movie_seq += 1;
        self.detail = None;

        self.token = Fetch::Loading;
        self.movies = Fetch::Loading;
        self.status_msg = "Requesting access token...".to_string();

        let api = Arc::clone(&self.api);
        self.spawn(async move {
            AppEvent::TokenIssued {
                session,
                result: api.acquire_token().await,
            }
        });
    }

    pub fn load_genres(&mut self) {
        let Some(token) = self.current_token() else {
            return;
        };
        let session = self.session;
        self.genres = Fetch::Loading;

        let api = Arc::clone(&self.api);
        self.spawn(async move {
            AppEvent::GenresLoaded {
                session,
                result: api.genres(&token).await,
            }
        });
    }

    /// Request `page` of the list with the current search and genre.
    pub fn query_movies(&mut self, page: u32) {
        let Some(token) = self.current_token() else {
            self.status_msg = "No session yet. Press c to reconnect".to_string();
            return;
        };

        self.movie_seq += 1;
        let seq = self.movie_seq;
        let query = MovieQuery::new(page, self.query.filter());
        debug!("Movie query #{}: {:?}", seq, query);

        self.movies = Fetch::Loading;
        let api = Arc::clone(&self.api);
        self.spawn(async move {
            let result = api.movies(&token, &query).await;
            AppEvent::MoviesLoaded { seq, query, result }
        });
    }

    fn probe_health(&self) {
        let api = Arc::clone(&self.api);
        self.spawn(async move {
            AppEvent::HealthChecked {
                result: api.health_check().await,
            }
        });
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::TokenIssued { session, result } => {
                if session != self.session {
                    debug!("Dropping token from superseded session {}", session);
                    return;
                }
                match result {
                    Ok(token) => {
                        self.token = Fetch::Loaded(token);
                        self.status_msg = "Session ready".to_string();
                        self.load_genres();
                        self.query_movies(1);
                    }
                    Err(e) => {
                        warn!("Token request failed: {}", e);
                        self.token = Fetch::Failed(e.to_string());
                        self.movies = Fetch::Failed(e.to_string());
                        self.status_msg = e.recovery_hint().unwrap_or_default().to_string();
                        self.probe_health();
                    }
                }
            }
            AppEvent::GenresLoaded { session, result } => {
                if session != self.session {
                    debug!("Dropping genres from superseded session {}", session);
                    return;
                }
                match result {
                    Ok(genres) => {
                        debug!("Loaded {} genres", genres.len());
                        self.genre_selected = self.genre_selected.min(genres.len());
                        self.genres = Fetch::Loaded(genres);
                    }
                    Err(e) => {
                        warn!("Genre list request failed: {}", e);
                        self.genres = Fetch::Failed(e.to_string());
                    }
                }
            }
            AppEvent::MoviesLoaded { seq, query, result } => {
                if seq != self.movie_seq {
                    debug!("Dropping stale movie response #{} (latest #{})", seq, self.movie_seq);
                    return;
                }
                match result {
                    Ok(page) => {
                        let total = page.page_count();
                        self.query.total_pages = total;
                        self.query.current_page = query.page.min(total);
                        self.list_selected = 0;
                        self.status_msg = format!(
                            "Page {} of {} ({} movies)",
                            self.query.current_page,
                            total,
                            page.data.len()
                        );
                        self.movies = Fetch::Loaded(page);
                    }
                    Err(e) => {
                        warn!("Movie query #{} failed: {}", seq, e);
                        self.movies = Fetch::Failed(e.to_string());
                        self.status_msg = e.recovery_hint().unwrap_or_default().to_string();
                        self.probe_health();
                    }
                }
            }
            AppEvent::DetailLoaded { seq, result } => {
                let Some(overlay) = self.detail.as_mut().filter(|o| o.seq == seq) else {
                    debug!("Dropping stale detail response #{}", seq);
                    return;
                };
                match result {
                    Ok(detail) => {
                        overlay.poster = PosterState::from_url(detail.poster_url());
                        overlay.detail = Fetch::Loaded(detail);
                        if let PosterState::Checking(url) = overlay.poster.clone() {
                            let api = Arc::clone(&self.api);
                            self.spawn(async move {
                                let result = api.probe_poster(&url).await;
                                AppEvent::PosterChecked { seq, url, result }
                            });
                        }
                    }
                    Err(e) => {
                        warn!("Detail request for {} failed: {}", overlay.id, e);
                        overlay.detail = Fetch::Failed(e.to_string());
                    }
                }
            }
            AppEvent::PosterChecked { seq, url, result } => {
                if let Some(overlay) = self.detail.as_mut().filter(|o| o.seq == seq) {
                    if let Err(ref e) = result {
                        debug!("Poster {} unavailable: {}", url, e);
                    }
                    overlay.poster.settle(&url, result.is_ok());
                }
            }
            AppEvent::HealthChecked { result } => match result {
                Ok(()) => {
                    info!("Health check passed");
                    self.health = Some(Ok(()));
                }
                Err(e) => {
                    warn!("Health check failed: {}", e);
                    self.health = Some(Err(e.to_string()));
                }
            },
        }
    }

    /// Commit the search bar and fetch the first page.
    pub fn search(&mut self) {
        self.query.search_term = self.search_input.trim().to_string();
        self.query.search_performed = true;
        self.query_movies(1);
    }

    /// Filter by genre title; `None` clears the genre filter.
    pub fn select_genre(&mut self, genre: Option<&str>) {
        self.query.selected_genre = genre.unwrap_or_default().to_string();
        self.query_movies(1);
    }

    /// Reset every filter and start over with a new token.
    pub fn clear_search(&mut self) {
        self.search_input.clear();
        self.query = QueryState::default();
        self.genre_selected = 0;
        self.list_selected = 0;
        self.start_session();
    }

    pub fn go_to_page(&mut self, page: u32) {
        let page = page.clamp(1, self.query.total_pages.max(1));
        if page == self.query.current_page && self.movies.loaded().is_some() {
            return;
        }
        self.query_movies(page);
    }

    pub fn next_page(&mut self) {
        self.go_to_page(self.query.current_page.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.go_to_page(self.query.current_page.saturating_sub(1));
    }

    pub fn first_page(&mut self) {
        self.go_to_page(1);
    }

    pub fn last_page(&mut self) {
        self.go_to_page(self.query.total_pages);
    }

    pub fn has_prev_page(&self) -> bool {
        self.query.current_page > 1
    }

    pub fn has_next_page(&self) -> bool {
        self.query.current_page < self.query.total_pages
    }

    pub fn page_buttons(&self) -> Vec<u32> {
        page_window(self.query.current_page, self.query.total_pages, WINDOW_SIZE)
    }

    pub fn visible_movies(&self) -> &[MovieSummary] {
        self.movies.loaded().map(|p| p.data.as_slice()).unwrap_or_default()
    }

    pub fn list_next(&mut self) {
        if self.list_selected + 1 < self.visible_movies().len() {
            self.list_selected += 1;
        }
    }

    pub fn list_prev(&mut self) {
        self.list_selected = self.list_selected.saturating_sub(1);
    }

    /// Open the detail overlay for the selected movie.
    pub fn open_selected(&mut self) {
        if let Some(id) = self.visible_movies().get(self.list_selected).map(|m| m.id.clone()) {
            self.open_detail(id);
        }
    }

    pub fn open_detail(&mut self, id: CatalogId) {
        let Some(token) = self.current_token() else {
            return;
        };
        self.detail_seq += 1;
        let seq = self.detail_seq;
        self.detail = Some(DetailOverlay {
            seq,
            id: id.clone(),
            detail: Fetch::Loading,
            poster: PosterState::Missing,
            scroll: 0,
        });

        let api = Arc::clone(&self.api);
        self.spawn(async move {
            AppEvent::DetailLoaded {
                seq,
                result: api.movie_detail(&token, &id).await,
            }
        });
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    pub fn open_genre_picker(&mut self) {
        let current = self.query.selected_genre.as_str();
        self.genre_selected = self
            .genres
            .loaded()
            .and_then(|gs| gs.iter().position(|g| g.title == current))
            .map(|i| i + 1)
            .unwrap_or(0);
        self.view = View::GenrePicker;
    }

    /// Entries of the genre picker: the "no genre" entry first, then each title.
    pub fn genre_options(&self) -> Vec<Option<&str>> {
        let mut options = vec![None];
        if let Some(genres) = self.genres.loaded() {
            options.extend(genres.iter().map(|g| Some(g.title.as_str())));
        }
        options
    }

    pub fn genre_next(&mut self) {
        if self.genre_selected + 1 < self.genre_options().len() {
            self.genre_selected += 1;
        }
    }

    pub fn genre_prev(&mut self) {
        self.genre_selected = self.genre_selected.saturating_sub(1);
    }

    pub fn apply_genre_picker(&mut self) {
        let choice = self
            .genre_options()
            .get(self.genre_selected)
            .copied()
            .flatten()
            .map(str::to_string);
        self.view = View::Browse;
        self.select_genre(choice.as_deref());
    }

    pub fn scroll_down(&mut self) {
        if let Some(overlay) = self.detail.as_mut() {
            overlay.scroll = overlay.scroll.saturating_add(1);
        }
    }

    pub fn scroll_up(&mut self) {
        if let Some(overlay) = self.detail.as_mut() {
            overlay.scroll = overlay.scroll.saturating_sub(1);
        }
    }
}
