use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

use crate::model::MovieDetail;

/// Fields rendered separately by the detail overlay.
const EXCLUDED_FIELDS: [&str; 3] = ["id", "title", "posterUrl"];

static HOURS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*H").expect("hours pattern"));
static MINUTES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*M").expect("minutes pattern"));

/// A labelled line of the detail overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailField {
    pub label: String,
    pub value: String,
}

/// Turn a camelCase field name into a label: `releaseYear` -> `Release Year`.
pub fn humanize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len() + 4);
    for (i, c) in key.chars().enumerate() {
        if i == 0 {
            out.extend(c.to_uppercase());
            continue;
        }
        if c.is_uppercase() {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

/// Render an hour/minute token string such as `PT2H15M` or `2H 15M`.
/// A part that is missing or zero is left out.
pub fn format_duration(raw: &str) -> String {
    let capture = |re: &Regex| -> Option<u64> {
        re.captures(raw)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse().ok())
            .filter(|&n| n > 0)
    };

    let mut out = String::new();
    if let Some(hours) = capture(&*HOURS_RE) {
        out.push_str(&format!("{} Hours ", hours));
    }
    if let Some(minutes) = capture(&*MINUTES_RE) {
        out.push_str(&format!("{} Minutes", minutes));
    }
    out
}

/// Comma-joined titles of a list of genre objects.
pub fn format_genres(value: &Value) -> String {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(|g| g.get("title").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join(", "),
        other => display_value(other).unwrap_or_default(),
    }
}

/// Plain-text rendering of a JSON value. `None` for null.
pub fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| match item {
                    Value::Object(obj) => obj
                        .get("title")
                        .or_else(|| obj.get("name"))
                        .and_then(display_value)
                        .or_else(|| Some(item.to_string())),
                    other => display_value(other),
                })
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Value::Object(obj) => Some(
            obj.get("title")
                .or_else(|| obj.get("name"))
                .and_then(display_value)
                .unwrap_or_else(|| value.to_string()),
        ),
    }
}

/// Like [`display_value`], but blank strings count as absent. Used for the
/// optional columns of the result list.
pub fn summary_value(value: Option<&Value>) -> Option<String> {
    value
        .and_then(display_value)
        .filter(|s| !s.trim().is_empty())
}

/// The generic field list of the detail overlay, in server order.
pub fn detail_fields(detail: &MovieDetail) -> Vec<DetailField> {
    detail
        .fields()
        .iter()
        .filter(|(key, _)| !EXCLUDED_FIELDS.contains(&key.as_str()))
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| {
            let value = match key.as_str() {
                "genres" => format_genres(value),
                "duration" => match value {
                    Value::String(s) => format_duration(s),
                    other => display_value(other).unwrap_or_default(),
                },
                _ => display_value(value).unwrap_or_default(),
            };
            DetailField {
                label: humanize_key(key),
                value,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_humanize_key() {
        assert_eq!(humanize_key("releaseYear"), "Release Year");
        assert_eq!(humanize_key("summary"), "Summary");
        assert_eq!(humanize_key("mainActors"), "Main Actors");
        assert_eq!(humanize_key("datePublished"), "Date Published");
        assert_eq!(humanize_key(""), "");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration("2H 15M"), "2 Hours 15 Minutes");
        assert_eq!(format_duration("45M"), "45 Minutes");
        assert_eq!(format_duration("3H"), "3 Hours ");
        assert_eq!(format_duration("PT1H58M"), "1 Hours 58 Minutes");
        assert_eq!(format_duration("2h 5m"), "2 Hours 5 Minutes");
        assert_eq!(format_duration("0H 30M"), "30 Minutes");
        assert_eq!(format_duration("unknown"), "");
    }

    #[test]
    fn test_format_genres() {
        let genres = json!([{"id": "1", "title": "Action"}, {"id": "2", "title": "Drama"}]);
        assert_eq!(format_genres(&genres), "Action, Drama");
        assert_eq!(format_genres(&json!([])), "");
    }

    #[test]
    fn test_detail_fields_exclusions_and_nulls() {
        let detail = MovieDetail::from_response(json!({
            "id": "m1",
            "title": "Heat",
            "posterUrl": "https://img/heat.jpg",
            "summary": "Cops and robbers.",
            "duration": "PT2H50M",
            "releaseYear": 1995,
            "writers": null,
            "genres": [{"id": "1", "title": "Crime"}, {"id": "2", "title": "Thriller"}],
            "directors": ["Michael Mann"]
        }))
        .unwrap();

        let fields = detail_fields(&detail);
        let labels: Vec<&str> = fields.iter().map(|f| f.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Summary", "Duration", "Release Year", "Genres", "Directors"]
        );
        assert_eq!(fields[1].value, "2 Hours 50 Minutes");
        assert_eq!(fields[2].value, "1995");
        assert_eq!(fields[3].value, "Crime, Thriller");
        assert_eq!(fields[4].value, "Michael Mann");
    }

    #[test]
    fn test_summary_value_skips_blank() {
        assert_eq!(summary_value(Some(&json!("  "))), None);
        assert_eq!(summary_value(Some(&json!(null))), None);
        assert_eq!(summary_value(None), None);
        assert_eq!(summary_value(Some(&json!(2001))).as_deref(), Some("2001"));
    }
}
