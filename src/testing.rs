//! In-memory `CatalogApi` used by the state machine and UI tests.

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde_json::json;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::api::{CatalogApi, MovieQuery};
use crate::error::CatalogError;
use crate::model::{CatalogId, Genre, MovieDetail, MoviePage, MovieSummary, Token};

#[derive(Default)]
pub struct FakeCatalog {
    pub token_status: Option<StatusCode>,
    pub genres_status: Option<StatusCode>,
    pub movies_status: Mutex<Option<StatusCode>>,
    pub detail_status: Option<StatusCode>,
    pub poster_status: Option<StatusCode>,
    pub total_pages: Option<u32>,
    pub tokens_issued: AtomicUsize,
    pub health_checks: AtomicUsize,
    pub queries: Mutex<Vec<MovieQuery>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self {
            total_pages: Some(20),
            ..Default::default()
        }
    }

    pub fn fail_movies(&self, status: Option<StatusCode>) {
        *self.movies_status.lock().unwrap() = status;
    }

    pub fn last_query(&self) -> Option<MovieQuery> {
        self.queries.lock().unwrap().last().cloned()
    }
}

pub fn summary(id: &str, title: &str) -> MovieSummary {
    MovieSummary {
        id: CatalogId::new(id),
        title: Some(title.to_string()),
        year: Some(json!(1999)),
        genre: None,
        rating: Some(json!("R")),
        poster_url: None,
    }
}

fn check(status: Option<StatusCode>) -> Result<(), CatalogError> {
    match status {
        Some(s) => Err(CatalogError::Status(s)),
        None => Ok(()),
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn acquire_token(&self) -> Result<Token, CatalogError> {
        check(self.token_status)?;
        let n = self.tokens_issued.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Token::new(format!("token-{}", n)))
    }

    async fn health_check(&self) -> Result<(), CatalogError> {
        self.health_checks.fetch_add(1, Ordering::SeqCst);
        Err(CatalogError::Status(StatusCode::SERVICE_UNAVAILABLE))
    }

    async fn genres(&self, _token: &Token) -> Result<Vec<Genre>, CatalogError> {
        check(self.genres_status)?;
        Ok(vec![
            Genre {
                id: CatalogId::new("1"),
                title: "Action".to_string(),
            },
            Genre {
                id: CatalogId::new("2"),
                title: "Drama".to_string(),
            },
        ])
    }

    async fn movies(&self, _token: &Token, query: &MovieQuery) -> Result<MoviePage, CatalogError> {
        self.queries.lock().unwrap().push(query.clone());
        let status = *self.movies_status.lock().unwrap();
        check(status)?;
        Ok(MoviePage {
            data: vec![
                summary(&format!("p{}-a", query.page), "The Matrix"),
                summary(&format!("p{}-b", query.page), "Heat"),
            ],
            total_pages: self.total_pages,
        })
    }

    async fn movie_detail(&self, _token: &Token, id: &CatalogId) -> Result<MovieDetail, CatalogError> {
        check(self.detail_status)?;
        MovieDetail::from_response(json!({
            "data": {
                "id": id.as_str(),
                "title": "The Matrix",
                "posterUrl": "https://img.example.com/matrix.jpg",
                "duration": "PT2H16M",
                "genres": [{"id": "1", "title": "Action"}, {"id": "3", "title": "Sci-Fi"}],
                "ratingValue": 8.7
            }
        }))
    }

    async fn probe_poster(&self, _url: &Url) -> Result<(), CatalogError> {
        check(self.poster_status)
    }
}
