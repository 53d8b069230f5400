//! Recommendations sourced from external metadata providers

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScrobbleProvider {
    Shelfspot,
    AniList,
    Mal,
    GoogleBooks,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalRecommendation {
    pub id: i32,
    pub name: String,
    pub cover_url: Option<String>,
    pub url: String,
    pub summary: Option<String>,
    pub ani_list_id: Option<i64>,
    pub mal_id: Option<i64>,
    pub provider: ScrobbleProvider,
    /// Local series the recommendation was matched to, if any
    pub series_id: Option<i32>,
    /// Series the recommendation was made for
    pub source_series_id: i32,
}

impl ExternalRecommendation {
    pub fn is_matched(&self) -> bool {
        self.series_id.is_some()
    }

    /// Link to a series already in the library
    pub fn match_series(&mut self, series_id: i32) {
        self.series_id = Some(series_id);
    }

    /// Whether two recommendations point at the same external work
    pub fn same_work(&self, other: &Self) -> bool {
        match (self.ani_list_id, other.ani_list_id, self.mal_id, other.mal_id) {
            (Some(a), Some(b), _, _) => a == b,
            (_, _, Some(a), Some(b)) => a == b,
            _ => self.url == other.url,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recommendation(ani_list_id: Option<i64>, mal_id: Option<i64>, url: &str) -> ExternalRecommendation {
        ExternalRecommendation {
            id: 0,
            name: "Frieren".into(),
            cover_url: None,
            url: url.into(),
            summary: None,
            ani_list_id,
            mal_id,
            provider: ScrobbleProvider::AniList,
            series_id: None,
            source_series_id: 7,
        }
    }

    #[test]
    fn test_same_work_prefers_provider_ids() {
        let a = recommendation(Some(1), Some(10), "https://a");
        let b = recommendation(Some(1), Some(99), "https://b");
        let c = recommendation(None, Some(10), "https://c");
        let d = recommendation(None, None, "https://a");

        assert!(a.same_work(&b));
        assert!(a.same_work(&c));
        assert!(a.same_work(&d));
        assert!(!b.same_work(&c));
    }
}
