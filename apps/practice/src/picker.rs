//! Random question selection for a practice run.

use bee_core::{Difficulty, MetadataIndex, Question, QuestionFilter, QuestionSet};
use rand::seq::SliceRandom;
use rand::Rng;

/// Draws questions in random order without repeats.
#[derive(Debug, Clone)]
pub struct QuestionPicker {
    remaining: Vec<Question>,
}

impl QuestionPicker {
    /// Pool of one round, narrowed by the metadata filter.
    pub fn new(
        set: &QuestionSet,
        difficulty: Difficulty,
        metadata: Option<&MetadataIndex>,
        filter: &QuestionFilter,
    ) -> Self {
        Self::with_rng(set, difficulty, metadata, filter, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(
        set: &QuestionSet,
        difficulty: Difficulty,
        metadata: Option<&MetadataIndex>,
        filter: &QuestionFilter,
        rng: &mut R,
    ) -> Self {
        let mut remaining: Vec<Question> = set
            .questions(difficulty)
            .iter()
            .filter(|q| match metadata {
                Some(index) => index.matches(&q.id, filter),
                None => filter.is_empty(),
            })
            .cloned()
            .collect();
        remaining.shuffle(rng);
        tracing::debug!(difficulty = difficulty.key(), pool = remaining.len(), "question pool ready");
        Self { remaining }
    }

    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remaining.is_empty()
    }
}

impl Iterator for QuestionPicker {
    type Item = Question;

    fn next(&mut self) -> Option<Question> {
        self.remaining.pop()
    }
}
