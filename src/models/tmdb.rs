use serde::Deserialize;

/// Response of `GET /find/{external_id}`.
///
/// Only the id of each hit is read; TMDb returns one list per media type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FindResponse {
    #[serde(default)]
    pub movie_results: Vec<FindHit>,
    #[serde(default)]
    pub tv_results: Vec<FindHit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FindHit {
    pub id: i64,
}

/// Subset of `GET /movie/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MovieDetails {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// Subset of `GET /tv/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TvDetails {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

impl MovieDetails {
    pub fn display_title(&self) -> String {
        first_present(&[&self.title, &self.original_title])
    }

    pub fn year(&self) -> i32 {
        year_of(self.release_date.as_deref())
    }
}

impl TvDetails {
    pub fn display_title(&self) -> String {
        first_present(&[&self.name, &self.original_name])
    }

    pub fn year(&self) -> i32 {
        year_of(self.first_air_date.as_deref())
    }
}

fn first_present(candidates: &[&Option<String>]) -> String {
    candidates
        .iter()
        .filter_map(|c| c.as_deref())
        .find(|s| !s.is_empty())
        .unwrap_or("Unknown")
        .to_string()
}

/// Year component of a `YYYY-MM-DD` date; 0 when missing or unparsable.
fn year_of(date: Option<&str>) -> i32 {
    date.and_then(|d| d.split('-').next())
        .and_then(|y| y.trim().parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movie_title_falls_back_to_original_then_unknown() {
        let m: MovieDetails =
            serde_json::from_str(r#"{"title":"","original_title":"Le Film","release_date":"1999-03-31"}"#)
                .unwrap();
        assert_eq!(m.display_title(), "Le Film");
        assert_eq!(m.year(), 1999);

        let empty = MovieDetails::default();
        assert_eq!(empty.display_title(), "Unknown");
        assert_eq!(empty.year(), 0);
    }

    #[test]
    fn tv_year_from_first_air_date() {
        let t: TvDetails =
            serde_json::from_str(r#"{"name":"Breaking Bad","first_air_date":"2008-01-20","poster_path":null}"#)
                .unwrap();
        assert_eq!(t.display_title(), "Breaking Bad");
        assert_eq!(t.year(), 2008);
        assert!(t.poster_path.is_none());
    }

    #[test]
    fn find_response_tolerates_missing_lists() {
        let f: FindResponse = serde_json::from_str(r#"{"tv_results":[{"id":1396,"name":"x"}]}"#).unwrap();
        assert!(f.movie_results.is_empty());
        assert_eq!(f.tv_results[0].id, 1396);
    }
}
