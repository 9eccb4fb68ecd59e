use reqwest::Url;

/// Placeholder drawn when a movie has no usable poster.
pub const FALLBACK_POSTER: &str = include_str!("../assets/fallback_poster.txt");

/// Poster of the movie shown in the detail overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PosterState {
    /// No `posterUrl`, or one that is not a valid URL.
    Missing,
    /// URL known, probe in flight.
    Checking(Url),
    Available(Url),
    /// The probe failed; the image could not be loaded.
    Failed(Url),
}

impl PosterState {
    pub fn from_url(raw: Option<&str>) -> Self {
        match raw.map(str::trim).filter(|s| !s.is_empty()) {
            Some(s) => match Url::parse(s) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => PosterState::Checking(url),
                _ => PosterState::Missing,
            },
            None => PosterState::Missing,
        }
    }

    pub fn shows_fallback(&self) -> bool {
        matches!(self, PosterState::Missing | PosterState::Failed(_))
    }

    pub fn url(&self) -> Option<&Url> {
        match self {
            PosterState::Missing => None,
            PosterState::Checking(u) | PosterState::Available(u) | PosterState::Failed(u) => Some(u),
        }
    }

    /// Record the outcome of a probe for `url`. Outcomes for another URL are ignored.
    pub fn settle(&mut self, url: &Url, loaded: bool) {
        if let PosterState::Checking(current) = self {
            if current == url {
                let url = current.clone();
                *self = if loaded {
                    PosterState::Available(url)
                } else {
                    PosterState::Failed(url)
                };
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_url_uses_fallback() {
        assert_eq!(PosterState::from_url(None), PosterState::Missing);
        assert_eq!(PosterState::from_url(Some("  ")), PosterState::Missing);
        assert_eq!(PosterState::from_url(Some("not a url")), PosterState::Missing);
        assert_eq!(PosterState::from_url(Some("ftp://x/y.png")), PosterState::Missing);
        assert!(PosterState::Missing.shows_fallback());
    }

    #[test]
    fn test_failed_probe_falls_back() {
        let mut state = PosterState::from_url(Some("https://img.example.com/a.jpg"));
        assert!(!state.shows_fallback());
        let url = state.url().cloned().unwrap();
        state.settle(&url, false);
        assert!(state.shows_fallback());
        assert!(matches!(state, PosterState::Failed(_)));
    }

    #[test]
    fn test_successful_probe() {
        let mut state = PosterState::from_url(Some("https://img.example.com/a.jpg"));
        let url = state.url().cloned().unwrap();
        state.settle(&url, true);
        assert!(matches!(state, PosterState::Available(_)));
    }

    #[test]
    fn test_probe_for_other_url_ignored() {
        let mut state = PosterState::from_url(Some("https://img.example.com/a.jpg"));
        let other = Url::parse("https://img.example.com/b.jpg").unwrap();
        state.settle(&other, false);
        assert!(matches!(state, PosterState::Checking(_)));
    }

    #[test]
    fn test_fallback_asset_is_embedded() {
        assert!(FALLBACK_POSTER.contains("POSTER"));
    }
}
