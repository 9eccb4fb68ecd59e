use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::CatalogError;

/// Opaque bearer credential issued by `/auth/token`. Held in memory only.
#[derive(Clone, PartialEq, Eq)]
pub struct Token(String);

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Token(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// Identifier of a catalog record. The API may send it as a string or a number.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CatalogId(String);

impl CatalogId {
    pub fn new(value: impl Into<String>) -> Self {
        CatalogId(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CatalogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl<'de> Deserialize<'de> for CatalogId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(serde_json::Number),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => CatalogId(s),
            Raw::Number(n) => CatalogId(n.to_string()),
        })
    }
}

/// Response of `/auth/token`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// An entry of the genre reference list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Genre {
    pub id: CatalogId,
    pub title: String,
}

/// Response of `/genres/movies`. A missing `data` field is an empty list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenreList {
    #[serde(default)]
    pub data: Vec<Genre>,
}

/// One row of the paginated movie list. Every field except `id` may be absent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieSummary {
    pub id: CatalogId,
    pub title: Option<String>,
    pub year: Option<Value>,
    pub genre: Option<Value>,
    pub rating: Option<Value>,
    pub poster_url: Option<String>,
}

/// Response of the `/movies` listing and search endpoints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoviePage {
    #[serde(default)]
    pub data: Vec<MovieSummary>,
    #[serde(default, deserialize_with = "lenient_page_count")]
    pub total_pages: Option<u32>,
}

/// Accept `totalPages` as an integer, a float or a numeric string. Anything
/// else, including negative values, reads as absent instead of failing the
/// whole page.
fn lenient_page_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let count = match &value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.ceil() as u64)),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| *f >= 0.0).map(|f| f.ceil() as u64),
        _ => None,
    };
    Ok(count.and_then(|n| u32::try_from(n).ok()))
}

impl MoviePage {
    /// Number of pages reported by the server; 1 when absent or zero.
    pub fn page_count(&self) -> u32 {
        self.total_pages.filter(|&n| n > 0).unwrap_or(1)
    }
}

/// Full record of a single movie, kept as an ordered JSON object so that any
/// field the server adds is still rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieDetail {
    fields: Map<String, Value>,
}

impl MovieDetail {
    /// Unwrap a `/movies/<id>` response, which is either `{data: {...}}` or the
    /// bare record.
    pub fn from_response(body: Value) -> Result<Self, CatalogError> {
        match body {
            Value::Object(mut obj) => {
                if matches!(obj.get("data"), Some(Value::Object(_))) {
                    if let Some(Value::Object(inner)) = obj.remove("data") {
                        return Ok(MovieDetail { fields: inner });
                    }
                }
                Ok(MovieDetail { fields: obj })
            }
            other => Err(CatalogError::Decode(format!(
                "expected a movie record, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn id(&self) -> Option<String> {
        match self.fields.get("id")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.fields.get("title").and_then(Value::as_str)
    }

    pub fn poster_url(&self) -> Option<&str> {
        self.fields
            .get("posterUrl")
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_movie_page_partial_fields() {
        let page: MoviePage = serde_json::from_value(json!({
            "data": [
                {"id": "m1", "title": "Heat", "rating": "R", "posterUrl": "https://img/heat.jpg"},
                {"id": 42}
            ],
            "totalPages": 7
        }))
        .unwrap();

        assert_eq!(page.data.len(), 2);
        assert_eq!(page.data[0].title.as_deref(), Some("Heat"));
        assert_eq!(page.data[1].id.as_str(), "42");
        assert!(page.data[1].title.is_none());
        assert!(page.data[1].poster_url.is_none());
        assert_eq!(page.page_count(), 7);
    }

    #[test]
    fn test_page_count_defaults_to_one() {
        let page: MoviePage = serde_json::from_value(json!({"data": []})).unwrap();
        assert_eq!(page.page_count(), 1);

        let page: MoviePage =
            serde_json::from_value(json!({"data": [], "totalPages": 0})).unwrap();
        assert_eq!(page.page_count(), 1);
    }

    #[test]
    fn test_page_count_tolerates_odd_total_pages() {
        let count = |total: Value| {
            serde_json::from_value::<MoviePage>(json!({"data": [], "totalPages": total}))
                .unwrap()
                .page_count()
        };
        assert_eq!(count(json!(3.0)), 3);
        assert_eq!(count(json!(2.5)), 3);
        assert_eq!(count(json!("4")), 4);
        assert_eq!(count(json!(-2)), 1);
        assert_eq!(count(json!("many")), 1);
        assert_eq!(count(json!(null)), 1);
        assert_eq!(count(json!(u64::MAX)), 1);
    }

    #[test]
    fn test_genre_list_without_data() {
        let list: GenreList = serde_json::from_value(json!({})).unwrap();
        assert!(list.data.is_empty());
    }

    #[test]
    fn test_detail_unwraps_data_envelope() {
        let detail = MovieDetail::from_response(json!({
            "data": {"id": "m1", "title": "Heat", "duration": "PT2H50M"}
        }))
        .unwrap();
        assert_eq!(detail.id().as_deref(), Some("m1"));
        assert_eq!(detail.title(), Some("Heat"));
        assert!(detail.fields().contains_key("duration"));
    }

    #[test]
    fn test_detail_accepts_bare_record() {
        let detail = MovieDetail::from_response(json!({"id": 7, "title": "Alien"})).unwrap();
        assert_eq!(detail.id().as_deref(), Some("7"));
        assert!(detail.poster_url().is_none());
    }

    #[test]
    fn test_detail_rejects_non_object() {
        let err = MovieDetail::from_response(json!([1, 2])).unwrap_err();
        assert!(err.to_string().contains("an array"));
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = Token::new("secret-value");
        assert_eq!(format!("{:?}", token), "Token(***)");
        assert_eq!(token.as_str(), "secret-value");
    }
}
