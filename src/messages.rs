use reqwest::Url;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::api::MovieQuery;
use crate::error::CatalogError;
use crate::model::{Genre, MovieDetail, MoviePage, Token};

/// Completion of a background request, sent from the spawned task to the UI loop.
///
/// `session` ties token and genre responses to the session that asked for
/// them. `seq` ties list and detail responses to the request that produced
/// them, so the UI can drop responses that a newer request has superseded.
#[derive(Debug)]
pub enum AppEvent {
    TokenIssued {
        session: u64,
        result: Result<Token, CatalogError>,
    },
    GenresLoaded {
        session: u64,
        result: Result<Vec<Genre>, CatalogError>,
    },
    MoviesLoaded {
        seq: u64,
        query: MovieQuery,
        result: Result<MoviePage, CatalogError>,
    },
    DetailLoaded {
        seq: u64,
        result: Result<MovieDetail, CatalogError>,
    },
    PosterChecked {
        seq: u64,
        url: Url,
        result: Result<(), CatalogError>,
    },
    /// Outcome of the diagnostic probe fired after a token or list failure.
    HealthChecked { result: Result<(), CatalogError> },
}

/// Both ends of the event channel. The UI keeps the receiver and hands clones
/// of the sender to every spawned request.
pub struct EventChannel {
    pub tx: UnboundedSender<AppEvent>,
    pub rx: UnboundedReceiver<AppEvent>,
}

impl EventChannel {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl Default for EventChannel {
    fn default() -> Self {
        Self::new()
    }
}
