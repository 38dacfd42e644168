//! Per-question classification tags.
//!
//! Loaded from a `question_metadata.json` file keyed by question id:
//! `{ "_progress": {...}, "categories": { "P1": { "regions": [...], ... } } }`.
//! Only used to narrow the practice pool; judging never looks at it.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestionMetadata {
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub time_periods: Vec<String>,
    #[serde(default)]
    pub answer_type: String,
    #[serde(default)]
    pub subject_themes: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct MetadataFile {
    #[serde(default)]
    categories: HashMap<String, QuestionMetadata>,
}

/// Region / time period constraints on the practice pool.
///
/// Matching is case-insensitive and by substring, so `ancient` selects
/// `Ancient World (pre-500 CE)`.
#[derive(Debug, Clone, Default)]
pub struct QuestionFilter {
    pub region: Option<String>,
    pub time_period: Option<String>,
}

impl QuestionFilter {
    pub fn is_empty(&self) -> bool {
        self.region.is_none() && self.time_period.is_none()
    }
}

#[derive(Debug, Clone, Default)]
pub struct MetadataIndex {
    categories: HashMap<String, QuestionMetadata>,
}

impl MetadataIndex {
    pub fn from_json(content: &str) -> Result<Self> {
        let file: MetadataFile = serde_json::from_str(content)?;
        Ok(Self {
            categories: file.categories,
        })
    }

    pub fn get(&self, question_id: &str) -> Option<&QuestionMetadata> {
        self.categories.get(question_id)
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Whether a question passes the filter. Unclassified questions only pass
    /// an empty filter.
    pub fn matches(&self, question_id: &str, filter: &QuestionFilter) -> bool {
        if filter.is_empty() {
            return true;
        }
        let Some(meta) = self.get(question_id) else {
            return false;
        };

        let region_ok = filter
            .region
            .as_deref()
            .map_or(true, |wanted| any_contains(&meta.regions, wanted));
        let period_ok = filter
            .time_period
            .as_deref()
            .map_or(true, |wanted| any_contains(&meta.time_periods, wanted));
        region_ok && period_ok
    }

    /// Distinct regions across all questions, sorted.
    pub fn regions(&self) -> Vec<&str> {
        self.categories
            .values()
            .flat_map(|m| m.regions.iter().map(String::as_str))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct time periods across all questions, sorted.
    pub fn time_periods(&self) -> Vec<&str> {
        self.categories
            .values()
            .flat_map(|m| m.time_periods.iter().map(String::as_str))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

fn any_contains(values: &[String], wanted: &str) -> bool {
    let wanted = wanted.to_lowercase();
    values.iter().any(|v| v.to_lowercase().contains(&wanted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"{
        "_progress": { "last_updated": null, "total_questions": 2, "categorized": 2 },
        "categories": {
            "P1": {
                "regions": ["Europe"],
                "time_periods": ["Age of Revolutions (1750-1850)"],
                "answer_type": "People & Biography",
                "subject_themes": ["Military & Conflict"]
            },
            "P2": {
                "regions": ["Asia", "Global/Multi-Regional"],
                "time_periods": ["Ancient World (pre-500 CE)"],
                "answer_type": "Places, Cities & Civilizations"
            }
        }
    }"#;

    fn filter(region: Option<&str>, period: Option<&str>) -> QuestionFilter {
        QuestionFilter {
            region: region.map(str::to_string),
            time_period: period.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_and_lookup() {
        let index = MetadataIndex::from_json(SAMPLE).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.get("P2").unwrap().subject_themes, Vec::<String>::new());
        assert_eq!(index.regions(), vec!["Asia", "Europe", "Global/Multi-Regional"]);
    }

    #[test]
    fn test_filter_matching() {
        let index = MetadataIndex::from_json(SAMPLE).unwrap();
        assert!(index.matches("P1", &filter(Some("europe"), None)));
        assert!(index.matches("P2", &filter(None, Some("ancient"))));
        assert!(!index.matches("P1", &filter(Some("europe"), Some("ancient"))));
        assert!(!index.matches("P9", &filter(Some("asia"), None)));
        assert!(index.matches("P9", &QuestionFilter::default()));
    }
}
