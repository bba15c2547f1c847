use serde::{Deserialize, Serialize};

use crate::pipeline::NameRecord;

/// One matching record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: String,
    pub score: f32,
    pub record: NameRecord,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub hits: Vec<SearchHit>,
    pub query: String,
    /// OR-terms actually sent to the backend
    pub terms: String,
    pub elapsed_ms: f64,
}

impl SearchResponse {
    pub fn empty(query: &str, elapsed_ms: f64) -> Self {
        Self {
            hits: Vec::new(),
            query: query.to_string(),
            terms: String::new(),
            elapsed_ms,
        }
    }

    /// Sort best first; ties keep id order so output is stable
    pub fn sort(&mut self) {
        self.hits.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(id: &str, score: f32) -> SearchHit {
        SearchHit {
            id: id.to_string(),
            score,
            record: NameRecord::new(id, "A", "B"),
        }
    }

    #[test]
    fn test_sort_best_first_then_id() {
        let mut response = SearchResponse::empty("a", 0.0);
        response.hits = vec![hit("c", 1.0), hit("b", 2.0), hit("a", 1.0)];
        response.sort();

        let ids: Vec<_> = response.hits.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_empty_response_json() {
        let json = serde_json::to_value(SearchResponse::empty("liz", 0.5)).unwrap();
        assert_eq!(json["elapsedMs"], 0.5);
        assert_eq!(json["hits"].as_array().unwrap().len(), 0);
    }
}
