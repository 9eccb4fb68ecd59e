use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::error::CatalogError;
use crate::model::{CatalogId, Genre, GenreList, MovieDetail, MoviePage, Token, TokenResponse};

pub const AUTH_TOKEN_PATH: &str = "auth/token";
pub const HEALTH_CHECK_PATH: &str = "healthcheck";
pub const GENRES_PATH: &str = "genres/movies";
pub const MOVIES_PATH: &str = "movies";

/// Rows requested per page. Fixed for the process lifetime.
pub const PAGE_SIZE: u32 = 20;

/// Optional filters for the movie listing. Blank strings are treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieFilter {
    pub search: Option<String>,
    pub genre: Option<String>,
}

impl MovieFilter {
    pub fn new(search: &str, genre: &str) -> Self {
        Self {
            search: non_blank(search),
            genre: non_blank(genre),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.genre.is_none()
    }
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// One page request against the movie listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovieQuery {
    pub page: u32,
    pub filter: MovieFilter,
}

impl MovieQuery {
    pub fn new(page: u32, filter: MovieFilter) -> Self {
        Self {
            page: page.max(1),
            filter,
        }
    }

    /// Build the request URL. A search term selects the text-search form and
    /// carries the genre as a secondary filter; a genre alone selects the
    /// genre form; otherwise the plain listing is used.
    pub fn url(&self, base: &Url) -> Result<Url, CatalogError> {
        let mut url = join(base, MOVIES_PATH)?;
        let paging = format!("page={}&limit={}", self.page, PAGE_SIZE);

        let query = match (&self.filter.search, &self.filter.genre) {
            (Some(search), genre) => {
                let mut q = format!("search={}&{}", urlencoding::encode(search), paging);
                if let Some(genre) = genre {
                    q.push_str("&genre=");
                    q.push_str(&urlencoding::encode(genre));
                }
                q
            }
            (None, Some(genre)) => format!("genre={}&{}", urlencoding::encode(genre), paging),
            (None, None) => paging,
        };

        url.set_query(Some(&query));
        Ok(url)
    }
}

fn join(base: &Url, path: &str) -> Result<Url, CatalogError> {
    base.join(path)
        .map_err(|e| CatalogError::Config(format!("cannot join {} onto {}: {}", path, base, e)))
}

/// Operations offered by the remote Catalog API.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Request a fresh session token. Unauthenticated.
    async fn acquire_token(&self) -> Result<Token, CatalogError>;

    /// Diagnostic probe of the service. Unauthenticated.
    async fn health_check(&self) -> Result<(), CatalogError>;

    async fn genres(&self, token: &Token) -> Result<Vec<Genre>, CatalogError>;

    async fn movies(&self, token: &Token, query: &MovieQuery) -> Result<MoviePage, CatalogError>;

    async fn movie_detail(&self, token: &Token, id: &CatalogId) -> Result<MovieDetail, CatalogError>;

    /// Check that a poster image can be fetched.
    async fn probe_poster(&self, url: &Url) -> Result<(), CatalogError>;
}

/// reqwest-backed client for the Catalog API.
pub struct HttpCatalog {
    http: Client,
    base: Url,
    timeout: Duration,
}

impl HttpCatalog {
    pub fn new(config: &Config) -> Result<Self, CatalogError> {
        let timeout = config.timeout();
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(CatalogError::Transport)?;

        Ok(Self {
            http,
            base: config.base_url()?,
            timeout,
        })
    }

    fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, CatalogError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            Err(CatalogError::Status(resp.status()))
        }
    }

    async fn send(&self, url: Url, token: Option<&Token>) -> Result<reqwest::Response, CatalogError> {
        debug!("GET {}", url);
        let mut req = self.http.get(url);
        if let Some(token) = token {
            req = req
                .bearer_auth(token.as_str())
                .header(CONTENT_TYPE, "application/json");
        }
        let resp = req
            .send()
            .await
            .map_err(|e| CatalogError::from_reqwest(e, self.timeout))?;
        Self::check_response(resp)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        token: Option<&Token>,
    ) -> Result<T, CatalogError> {
        let resp = self.send(url, token).await?;
        resp.json::<T>()
            .await
            .map_err(|e| CatalogError::from_reqwest(e, self.timeout))
    }
}

#[async_trait]
impl CatalogApi for HttpCatalog {
    async fn acquire_token(&self) -> Result<Token, CatalogError> {
        let url = join(&self.base, AUTH_TOKEN_PATH)?;
        let body: TokenResponse = self.get_json(url, None).await?;
        Ok(Token::new(body.token))
    }

    async fn health_check(&self) -> Result<(), CatalogError> {
        let url = join(&self.base, HEALTH_CHECK_PATH)?;
        self.send(url, None).await?;
        Ok(())
    }

    async fn genres(&self, token: &Token) -> Result<Vec<Genre>, CatalogError> {
        let url = join(&self.base, GENRES_PATH)?;
        let body: GenreList = self.get_json(url, Some(token)).await?;
        Ok(body.data)
    }

    async fn movies(&self, token: &Token, query: &MovieQuery) -> Result<MoviePage, CatalogError> {
        let url = query.url(&self.base)?;
        self.get_json(url, Some(token)).await
    }

    async fn movie_detail(&self, token: &Token, id: &CatalogId) -> Result<MovieDetail, CatalogError> {
        let path = format!("{}/{}", MOVIES_PATH, urlencoding::encode(id.as_str()));
        let url = join(&self.base, &path)?;
        let body: serde_json::Value = self.get_json(url, Some(token)).await?;
        MovieDetail::from_response(body)
    }

    async fn probe_poster(&self, url: &Url) -> Result<(), CatalogError> {
        self.send(url.clone(), None).await?;
        Ok(())
    }
}
