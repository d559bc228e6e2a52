use std::{ops::Range, sync::Arc};

use crate::letter_mask::LetterMask;

/// The most words any solution can have: five words of at least three
/// letters each, overlapping only at their four joins, already account for
/// more than twelve distinct letters at six words.
pub const MAX_SOLUTION_WORDS: usize = 5;

/// Messages accepted by a solver worker. Receivers dispatch exhaustively.
#[derive(Clone, Debug)]
pub enum WorkerMessage {
  /// Starts a solve over one slice of the candidate list, superseding
  /// whatever request the worker was processing before.
  Solve {
    request_id: u64,
    full_mask: LetterMask,
    encoded_words: Arc<[u8]>,
    range: Range<usize>,
  },
}

/// One streamed batch of solutions from a worker. Each worker sends exactly
/// one chunk with `is_final` set per request it completes.
#[derive(Clone, Debug)]
pub struct SolutionChunk {
  pub request_id: u64,
  pub is_final: bool,
  pub buckets: SolutionBuckets,
}

/// Solution strings grouped by how many words are in the solution (1..=5).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SolutionBuckets {
  buckets: [Vec<String>; MAX_SOLUTION_WORDS],
}

impl SolutionBuckets {
  pub fn push(&mut self, word_count: usize, solution: String) {
    debug_assert!((1..=MAX_SOLUTION_WORDS).contains(&word_count));
    self.buckets[word_count - 1].push(solution);
  }

  /// Drains `other` into `self`, bucket by bucket.
  pub fn append(&mut self, other: SolutionBuckets) {
    for (bucket, mut incoming) in self.buckets.iter_mut().zip(other.buckets) {
      bucket.append(&mut incoming);
    }
  }

  pub fn bucket(&self, word_count: usize) -> &[String] {
    debug_assert!((1..=MAX_SOLUTION_WORDS).contains(&word_count));
    &self.buckets[word_count - 1]
  }

  /// Iterates `(word_count, solutions)` pairs in ascending word count.
  pub fn iter(&self) -> impl Iterator<Item = (usize, &[String])> {
    self
      .buckets
      .iter()
      .enumerate()
      .map(|(index, bucket)| (index + 1, bucket.as_slice()))
  }

  pub fn total(&self) -> usize {
    self.buckets.iter().map(Vec::len).sum()
  }

  pub fn is_empty(&self) -> bool {
    self.buckets.iter().all(Vec::is_empty)
  }
}
