use std::ops::Range;

use common::{
  letter_mask::LetterMask,
  letter_sequence::LetterSequence,
  msg::{SolutionBuckets, MAX_SOLUTION_WORDS},
};
use itertools::Itertools;

/// Per-request search state over a candidate list: the word masks, the last
/// letter of each word, and the candidates bucketed by first letter. Built
/// once per request and shared by every sub-range the holder solves.
pub struct Search<'a> {
  words: &'a [LetterSequence],
  full_mask: LetterMask,
  masks: Vec<LetterMask>,
  lasts: Vec<u8>,
  by_first: [Vec<u32>; 26],
}

impl<'a> Search<'a> {
  pub fn new(words: &'a [LetterSequence], full_mask: LetterMask) -> Self {
    let masks = words.iter().map(|word| word.to_mask()).collect();
    let lasts = words.iter().map(|word| word.last()).collect();

    let mut by_first: [Vec<u32>; 26] = std::array::from_fn(|_| Vec::new());
    for (index, word) in words.iter().enumerate() {
      debug_assert!(!word.is_empty());
      by_first[word.first() as usize].push(index as u32);
    }

    Self { words, full_mask, masks, lasts, by_first }
  }

  /// Enumerates every solution whose first word's index lies in `range`,
  /// pushing each into `buckets` keyed by word count. Disjoint ranges
  /// enumerate disjoint solution sets, so splitting `[0, n)` across workers
  /// partitions the search space exactly.
  pub fn solve_range(&self, range: Range<usize>, buckets: &mut SolutionBuckets) {
    let mut path = Vec::with_capacity(MAX_SOLUTION_WORDS);
    for index in range {
      path.push(index as u32);
      self.extend(self.masks[index], self.lasts[index], &mut path, buckets);
      path.pop();
    }
  }

  fn extend(
    &self,
    acc_mask: LetterMask,
    need: u8,
    path: &mut Vec<u32>,
    buckets: &mut SolutionBuckets,
  ) {
    if acc_mask == self.full_mask {
      // All twelve letters are covered. Any extension would have to repeat a
      // letter beyond the join, so this path cannot grow further.
      buckets.push(path.len(), self.render(path));
      return;
    }
    if path.len() == MAX_SOLUTION_WORDS {
      return;
    }

    let join = LetterMask::of(need);
    for &next in &self.by_first[need as usize] {
      let mask = self.masks[next as usize];
      if mask.intersection(acc_mask) != join {
        continue;
      }

      path.push(next);
      self.extend(acc_mask.union(mask), self.lasts[next as usize], path, buckets);
      path.pop();
    }
  }

  fn render(&self, path: &[u32]) -> String {
    path
      .iter()
      .map(|&index| self.words[index as usize].to_ascii())
      .join(" ")
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

  use common::{board::Board, letter_sequence::LetterSequence, msg::SolutionBuckets};
  use googletest::prelude::*;
  use word_dict::WordDict;

  use super::Search;

  // Sides: ABC / DEF / GHI / JKL.
  const BOARD: &str = "ABCDEFGHIJKL";

  fn candidates(words: &[&str]) -> Vec<LetterSequence> {
    WordDict::parse_word_list(words.iter().copied()).candidate_words(&board())
  }

  fn board() -> Board {
    Board::parse(BOARD).unwrap()
  }

  fn solve(words: &[&str]) -> Vec<String> {
    let candidates = candidates(words);
    let mut buckets = SolutionBuckets::default();
    Search::new(&candidates, board().full_mask()).solve_range(0..candidates.len(), &mut buckets);
    all_solutions(&buckets)
  }

  fn all_solutions(buckets: &SolutionBuckets) -> Vec<String> {
    buckets
      .iter()
      .flat_map(|(_, solutions)| solutions.iter().cloned())
      .collect()
  }

  /// Checks the chain, coverage, and no-repeat rules directly against an
  /// emitted solution string.
  fn verify_solution(solution: &str) {
    let board = board();
    let words: Vec<_> = solution
      .split(' ')
      .map(|word| LetterSequence::from_ascii(word).unwrap())
      .collect();
    assert_that!(words, not(empty()));

    let mut acc = words[0].to_mask();
    let mut distinct = words[0].len();
    for pair in words.windows(2) {
      expect_that!(pair[1].first(), eq(pair[0].last()));
      // The join letter is the only overlap with everything seen so far.
      expect_that!(pair[1].to_mask().intersection(acc).count(), eq(1));
      acc = acc.union(pair[1].to_mask());
      distinct += pair[1].len() - 1;
    }

    expect_that!(acc, eq(board.full_mask()));
    expect_that!(distinct, eq(12));
  }

  #[gtest]
  fn test_single_word_solution() {
    let solutions = solve(&["ADGJBEHKCFIL", "ADG"]);
    expect_that!(solutions, container_eq(["ADGJBEHKCFIL".to_owned()]));
  }

  #[gtest]
  fn test_two_word_solution() {
    let solutions = solve(&["ADGJBE", "EHKCFIL"]);
    expect_that!(solutions, container_eq(["ADGJBE EHKCFIL".to_owned()]));
    verify_solution(&solutions[0]);
  }

  #[gtest]
  fn test_four_word_solution() {
    let solutions = solve(&["ADGJ", "JBEH", "HKC", "CFIL"]);
    expect_that!(solutions, container_eq(["ADGJ JBEH HKC CFIL".to_owned()]));
    verify_solution(&solutions[0]);
  }

  #[gtest]
  fn test_solutions_fill_the_matching_bucket() {
    let candidates = candidates(&["ADGJ", "JBEH", "HKC", "CFIL"]);
    let mut buckets = SolutionBuckets::default();
    Search::new(&candidates, board().full_mask()).solve_range(0..candidates.len(), &mut buckets);

    expect_that!(buckets.bucket(4).len(), eq(1));
    expect_that!(buckets.total(), eq(1));
  }

  #[gtest]
  fn test_rejects_paths_that_repeat_letters() {
    // The chain letter matches, but A is shared beyond the join.
    expect_that!(solve(&["ADG", "GEA"]), empty());
  }

  #[gtest]
  fn test_incomplete_coverage_is_not_a_solution() {
    expect_that!(solve(&["ADGJBE"]), empty());
  }

  #[gtest]
  fn test_empty_candidate_list() {
    let mut buckets = SolutionBuckets::default();
    Search::new(&[], board().full_mask()).solve_range(0..0, &mut buckets);
    expect_true!(buckets.is_empty());
  }

  #[gtest]
  fn test_empty_range() {
    let candidates = candidates(&["ADGJBE", "EHKCFIL"]);
    let mut buckets = SolutionBuckets::default();
    Search::new(&candidates, board().full_mask()).solve_range(1..1, &mut buckets);
    expect_true!(buckets.is_empty());
  }

  #[gtest]
  fn test_complete_word_is_never_a_proper_prefix() {
    // LAD chains off the full-coverage word, but no emitted solution may
    // extend a path that already covers the board.
    let solutions = solve(&["ADGJBEHKCFIL", "LAD"]);
    expect_that!(solutions, container_eq(["ADGJBEHKCFIL".to_owned()]));
  }

  #[gtest]
  fn test_all_emitted_solutions_are_valid() {
    let words = [
      "ADGJBEHKCFIL",
      "ADGJBE",
      "EHKCFIL",
      "ADGJ",
      "JBEH",
      "HKC",
      "CFIL",
      "ADG",
      "GEA",
      "LAD",
      "DAK",
    ];
    let solutions = solve(&words);
    expect_that!(solutions, not(empty()));
    for solution in &solutions {
      verify_solution(solution);
    }
  }

  #[gtest]
  fn test_range_partitioning_is_exhaustive() {
    let words = ["ADGJBEHKCFIL", "ADGJBE", "EHKCFIL", "ADGJ", "JBEH", "HKC", "CFIL"];
    let candidates = candidates(&words);
    let search = Search::new(&candidates, board().full_mask());

    let mut whole = SolutionBuckets::default();
    search.solve_range(0..candidates.len(), &mut whole);
    let mut expected = all_solutions(&whole);
    expected.sort();

    for split in 0..=candidates.len() {
      let mut buckets = SolutionBuckets::default();
      search.solve_range(0..split, &mut buckets);
      search.solve_range(split..candidates.len(), &mut buckets);
      let mut actual = all_solutions(&buckets);
      actual.sort();
      expect_that!(actual, container_eq(expected.clone()));
    }

    let mut singletons = SolutionBuckets::default();
    for index in 0..candidates.len() {
      search.solve_range(index..index + 1, &mut singletons);
    }
    let mut actual = all_solutions(&singletons);
    actual.sort();
    expect_that!(actual, container_eq(expected));
  }
}
