//! Extraction of matches from the keyword search API payload.

use serde::Deserialize;
use serde_json::Value;

use super::urls::SiteProfile;
use super::{deduplicate_by_url, MatchKind, MatchRecord, SourceError, UNKNOWN_TITLE};

/// Type tags the API uses for anything episodic.
const SERIES_TYPES: &[&str] = &["tv_series", "mini_series", "tv_show"];

#[derive(Debug, Deserialize)]
struct KeywordSearchResponse {
    #[serde(default)]
    films: Option<Vec<FilmResult>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FilmResult {
    #[serde(default)]
    film_id: Option<Value>,
    #[serde(default)]
    name_ru: Option<String>,
    #[serde(default)]
    name_en: Option<String>,
    #[serde(default)]
    year: Option<Value>,
    #[serde(default, rename = "type")]
    film_type: Option<String>,
}

/// Extract matches from a `{ "films": [...] }` payload.
///
/// Films without a numeric id are skipped. A body that is not a JSON object
/// is an error; an object without `films` is just an empty result.
pub fn extract_json(profile: &SiteProfile, payload: &str) -> Result<Vec<MatchRecord>, SourceError> {
    let response: KeywordSearchResponse = serde_json::from_str(payload).map_err(|e| {
        SourceError::InvalidPayload(format!("Failed to parse keyword search response: {}", e))
    })?;

    let records = response
        .films
        .unwrap_or_default()
        .into_iter()
        .filter_map(|film| film.into_record(profile))
        .collect();

    Ok(deduplicate_by_url(records))
}

impl FilmResult {
    fn into_record(self, profile: &SiteProfile) -> Option<MatchRecord> {
        let id = self.film_id.as_ref().and_then(numeric_id)?;
        let kind = self
            .film_type
            .as_deref()
            .map(kind_from_type)
            .unwrap_or(MatchKind::Movie);
        let year = self.year.as_ref().and_then(year_string);

        let name = [self.name_ru, self.name_en]
            .into_iter()
            .flatten()
            .map(|n| n.trim().to_string())
            .find(|n| !n.is_empty())
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string());

        let title = match &year {
            Some(y) => format!("{} ({})", name, y),
            None => name,
        };

        let url = profile.rewrite_host(&profile.detail_url(kind, &id));

        Some(MatchRecord {
            title,
            url,
            id: Some(id),
            year,
            kind: Some(kind),
            is_direct_search: false,
        })
    }
}

fn kind_from_type(film_type: &str) -> MatchKind {
    let lowered = film_type.to_lowercase();
    if SERIES_TYPES.contains(&lowered.as_str()) {
        MatchKind::Series
    } else {
        MatchKind::Movie
    }
}

fn numeric_id(value: &Value) -> Option<String> {
    let id = match value {
        Value::Number(n) => n.as_u64()?.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
        Some(id)
    } else {
        None
    }
}

fn year_string(value: &Value) -> Option<String> {
    let year = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return None,
    };
    if year.is_empty() || year.eq_ignore_ascii_case("null") {
        None
    } else {
        Some(year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::urls::example_profile;

    #[test]
    fn test_single_film() {
        let payload = r#"{"films":[{"filmId":42,"nameRu":"Матриця","year":1999,"type":"FILM"}]}"#;
        let records = extract_json(&example_profile(), payload).unwrap();

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.id.as_deref(), Some("42"));
        assert_eq!(r.kind, Some(MatchKind::Movie));
        assert!(r.title.contains("Матриця"));
        assert!(r.title.contains("1999"));
        assert_eq!(r.title, "Матриця (1999)");
        assert_eq!(r.year.as_deref(), Some("1999"));
        assert_eq!(r.url, "https://target.example/movie-detail/42/");
    }

    #[test]
    fn test_title_preference_and_sentinel() {
        let payload = r#"{"films":[
            {"filmId":1,"nameRu":"","nameEn":"Alien"},
            {"filmId":2,"nameEn":null},
            {"filmId":3,"nameRu":"Сталкер","nameEn":"Stalker","year":"null"}
        ]}"#;
        let records = extract_json(&example_profile(), payload).unwrap();

        assert_eq!(records[0].title, "Alien");
        assert_eq!(records[1].title, UNKNOWN_TITLE);
        assert_eq!(records[2].title, "Сталкер");
        assert!(records[2].year.is_none());
    }

    #[test]
    fn test_series_types() {
        let payload = r#"{"films":[
            {"filmId":10,"nameEn":"A","type":"TV_SERIES"},
            {"filmId":11,"nameEn":"B","type":"MINI_SERIES"},
            {"filmId":12,"nameEn":"C","type":"tv_show"},
            {"filmId":13,"nameEn":"D","type":"VIDEO"},
            {"filmId":14,"nameEn":"E"}
        ]}"#;
        let kinds: Vec<_> = extract_json(&example_profile(), payload)
            .unwrap()
            .into_iter()
            .map(|r| r.kind.unwrap())
            .collect();

        assert_eq!(
            kinds,
            vec![
                MatchKind::Series,
                MatchKind::Series,
                MatchKind::Series,
                MatchKind::Movie,
                MatchKind::Movie,
            ]
        );
    }

    #[test]
    fn test_series_url_uses_series_segment() {
        let payload = r#"{"films":[{"filmId":"77","nameEn":"Twin Peaks","year":"1990","type":"TV_SERIES"}]}"#;
        let records = extract_json(&example_profile(), payload).unwrap();
        assert_eq!(records[0].url, "https://target.example/series-detail/77/");
        assert_eq!(records[0].id.as_deref(), Some("77"));
    }

    #[test]
    fn test_skips_films_without_numeric_id() {
        let payload = r#"{"films":[
            {"nameEn":"No id"},
            {"filmId":"tt0133093","nameEn":"Imdb id"},
            {"filmId":-5,"nameEn":"Negative"},
            {"filmId":301,"nameEn":"Kept"}
        ]}"#;
        let records = extract_json(&example_profile(), payload).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "Kept");
    }

    #[test]
    fn test_duplicate_ids_are_merged() {
        let payload = r#"{"films":[
            {"filmId":5,"nameEn":"First"},
            {"filmId":5,"nameEn":"Second"}
        ]}"#;
        let records = extract_json(&example_profile(), payload).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "First");
    }

    #[test]
    fn test_missing_films_is_empty() {
        let records = extract_json(&example_profile(), r#"{"keyword":"x","pagesCount":0}"#).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_invalid_payload_is_error() {
        let err = extract_json(&example_profile(), "<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, SourceError::InvalidPayload(_)));
    }
}
