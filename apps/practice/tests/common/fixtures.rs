//! Test fixtures for question sets and metadata.

use bee_core::{MetadataIndex, QuestionSet};

pub const HASTINGS: &str = "The <b>battle</b> of Hastings";

/// Small question set covering two rounds.
pub const QUESTION_SET_JSON: &str = r#"{
    "preliminary": [
        {
            "number": 1,
            "id": "P1",
            "question": "This commander defeated <em>Napoleon</em> at Waterloo.",
            "answer": "<strong>Duke of Wellington</strong> (accept Arthur Wellesley)"
        },
        {
            "number": 2,
            "id": "P2",
            "question": "This Norman duke won the battle of Hastings.",
            "answer": "<strong>William the Conqueror</strong> (accept William I) Bee Round 2"
        }
    ],
    "finals": [
        {
            "number": 1,
            "id": "F1",
            "question": "This admiral commanded the Holy League at Lepanto.",
            "answer": "<strong>John of Austria</strong> (accept Don Juan)"
        }
    ]
}"#;

pub const METADATA_JSON: &str = r#"{
    "_progress": { "total_questions": 3, "categorized": 2 },
    "categories": {
        "P1": { "regions": ["Europe"], "time_periods": ["Age of Revolutions (1750-1850)"] },
        "P2": { "regions": ["Europe"], "time_periods": ["Medieval (500-1500)"] }
    }
}"#;

pub fn question_set() -> QuestionSet {
    QuestionSet::from_json(QUESTION_SET_JSON).expect("fixture question set parses")
}

pub fn metadata() -> MetadataIndex {
    MetadataIndex::from_json(METADATA_JSON).expect("fixture metadata parses")
}
