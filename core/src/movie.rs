//! Movie records as returned by the search API.
//!
//! The shapes follow TMDB's `/search/movie` response. Unknown fields are
//! ignored, and optional metadata defaults to empty so partial records from
//! the API still decode.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single movie search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Catalog identifier
    pub id: u64,
    /// Display title
    pub title: String,
    /// Title in the original language, when it differs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    /// Plot summary
    #[serde(default)]
    pub overview: String,
    /// Release date; blank strings from the API decode to `None`
    #[serde(
        default,
        deserialize_with = "deserialize_optional_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub release_date: Option<NaiveDate>,
    /// Poster image path, relative to the image CDN
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    /// Average user rating (0-10)
    #[serde(default)]
    pub vote_average: f32,
    /// Number of user ratings
    #[serde(default)]
    pub vote_count: u32,
    /// ISO 639-1 code of the original language
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_language: Option<String>,
}

impl Movie {
    /// Create a movie with only an id and title
    #[must_use]
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            original_title: None,
            overview: String::new(),
            release_date: None,
            poster_path: None,
            vote_average: 0.0,
            vote_count: 0,
            original_language: None,
        }
    }

    /// Release year, if the release date is known
    #[must_use]
    pub fn release_year(&self) -> Option<i32> {
        use chrono::Datelike;
        self.release_date.map(|date| date.year())
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoviePage {
    /// Movies on this page, in API order
    pub results: Vec<Movie>,
    /// 1-based page number the API answered with
    pub page: u32,
    /// Total number of pages for the query (0 when nothing matched)
    pub total_pages: u32,
    /// Total number of matching movies
    #[serde(default)]
    pub total_results: u32,
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}

fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_date))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_search_page() {
        let json = r#"{
            "page": 1,
            "results": [
                {
                    "adult": false,
                    "id": 438631,
                    "title": "Dune",
                    "original_title": "Dune",
                    "overview": "Paul Atreides...",
                    "release_date": "2021-09-15",
                    "poster_path": "/d5NXSklXo0qyIYkgV94XAgMIckC.jpg",
                    "vote_average": 7.8,
                    "vote_count": 11000,
                    "original_language": "en",
                    "genre_ids": [878, 12]
                },
                {
                    "id": 1,
                    "title": "Untitled",
                    "release_date": ""
                }
            ],
            "total_pages": 3,
            "total_results": 52
        }"#;

        let page: MoviePage = serde_json::from_str(json).unwrap_or_else(|e| unreachable!("{e}"));

        assert_eq!(page.page, 1);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_results, 52);
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.results[0].release_year(), Some(2021));
        assert_eq!(page.results[0].vote_count, 11000);
        assert_eq!(page.results[1].release_date, None);
        assert_eq!(page.results[1].overview, "");
    }

    #[test]
    fn test_decode_empty_page() {
        let json = r#"{"page": 1, "results": [], "total_pages": 0, "total_results": 0}"#;
        let page: MoviePage = serde_json::from_str(json).unwrap_or_else(|e| unreachable!("{e}"));

        assert!(page.results.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_serialized_movie_skips_missing_metadata() {
        let json = serde_json::to_value(Movie::new(5, "Heat")).unwrap_or_else(|e| unreachable!("{e}"));

        assert_eq!(json["title"], "Heat");
        assert!(json.get("release_date").is_none());
        assert!(json.get("poster_path").is_none());
    }
}
