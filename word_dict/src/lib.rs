use std::borrow::Borrow;

use bitcode::{Decode, Encode};
use common::{board::Board, letter_sequence::LetterSequence};
use itertools::Itertools;

/// The minimum length of a playable word.
pub const MIN_WORD_LENGTH: usize = 3;

/// A raw word list, independent of any particular board. Holds every word as
/// parsed; filtering down to the candidates for a board happens per request
/// with [`candidate_words`](WordDict::candidate_words).
#[derive(Clone, Debug, Default, Encode, Decode)]
pub struct WordDict {
  words: Vec<String>,
}

impl WordDict {
  /// Builds a dictionary from lines of text, skipping blank lines and `//`
  /// comment lines. Words are kept verbatim; validation is deferred to the
  /// per-board filter, where unusable lines are silently dropped.
  pub fn parse_word_list<S>(lines: impl IntoIterator<Item = S>) -> Self
  where
    S: Borrow<str>,
  {
    Self {
      words: lines
        .into_iter()
        .filter_map(|line| {
          let word = line.borrow().trim();
          (!word.is_empty() && !word.starts_with("//")).then(|| word.to_owned())
        })
        .collect(),
    }
  }

  pub fn word_count(&self) -> usize {
    self.words.len()
  }

  pub fn words(&self) -> impl Iterator<Item = &str> {
    self.words.iter().map(|word| word.as_str())
  }

  /// Filters the dictionary down to the candidate words for `board`: at
  /// least three letters, every letter on the board, no two consecutive
  /// letters on the same side, and no letter used twice. The result is
  /// deduplicated and sorted by the 64-bit sequence value so that every run
  /// partitions identically across workers.
  pub fn candidate_words(&self, board: &Board) -> Vec<LetterSequence> {
    self
      .words
      .iter()
      .filter_map(|word| Self::to_candidate(word, board))
      .sorted()
      .dedup()
      .collect()
  }

  fn to_candidate(word: &str, board: &Board) -> Option<LetterSequence> {
    if word.len() < MIN_WORD_LENGTH {
      return None;
    }

    let mut sequence = LetterSequence::empty();
    let mut previous = None;
    for byte in word.bytes() {
      let byte = byte.to_ascii_uppercase();
      if !byte.is_ascii_uppercase() {
        return None;
      }

      let letter = byte - b'A';
      board.side_of(letter)?;
      if previous.is_some_and(|previous| board.same_side(previous, letter)) {
        return None;
      }
      if sequence.contains(letter) {
        return None;
      }

      // Every letter is distinct and on the board, so the sequence can never
      // outgrow its 12-letter capacity here.
      sequence = sequence.push(letter);
      previous = Some(letter);
    }

    Some(sequence)
  }
}

#[cfg(test)]
mod tests {
  #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

  use common::{board::Board, letter_sequence::LetterSequence};
  use googletest::prelude::*;

  use super::WordDict;

  fn board() -> Board {
    // Sides: ABC / DEF / GHI / JKL.
    Board::parse("ABCDEFGHIJKL").unwrap()
  }

  fn candidates(words: &[&str]) -> Vec<String> {
    WordDict::parse_word_list(words.iter().copied())
      .candidate_words(&board())
      .into_iter()
      .map(|sequence| sequence.to_ascii())
      .collect()
  }

  #[gtest]
  fn test_parse_word_list_skips_blank_and_comment_lines() {
    let dict = WordDict::parse_word_list(["ADG", "", "  ", "// comment", "DAK"]);
    expect_that!(dict.word_count(), eq(2));
  }

  #[gtest]
  fn test_accepts_valid_words() {
    expect_that!(candidates(&["ADG", "ADGJBE"]), container_eq(["ADG".to_owned(), "ADGJBE".to_owned()]));
  }

  #[gtest]
  fn test_folds_lowercase() {
    expect_that!(candidates(&["adg"]), container_eq(["ADG".to_owned()]));
  }

  #[gtest]
  fn test_rejects_short_words() {
    expect_that!(candidates(&["AD", "A", ""]), empty());
  }

  #[gtest]
  fn test_rejects_words_off_the_board() {
    expect_that!(candidates(&["ADZ"]), empty());
  }

  #[gtest]
  fn test_rejects_same_side_neighbors() {
    // A and B share the top side.
    expect_that!(candidates(&["ABD"]), empty());
  }

  #[gtest]
  fn test_rejects_repeated_letters() {
    // The repeat need not be adjacent.
    expect_that!(candidates(&["ADA", "ADGJAE"]), empty());
  }

  #[gtest]
  fn test_rejects_non_ascii_letters() {
    expect_that!(candidates(&["AD-G", "AD G"]), empty());
  }

  #[gtest]
  fn test_dedupes_after_folding() {
    expect_that!(candidates(&["ADG", "adg", "Adg"]), container_eq(["ADG".to_owned()]));
  }

  #[gtest]
  fn test_sorted_by_sequence_value() {
    let sequences = WordDict::parse_word_list(["DAK", "ADGJBE", "ADG"]).candidate_words(&board());
    let mut sorted = sequences.clone();
    sorted.sort();
    expect_that!(sequences, container_eq(sorted));

    // Order is by bit value, so shorter words always precede longer ones.
    expect_that!(
      sequences.iter().map(|sequence| sequence.to_ascii()).collect::<Vec<_>>(),
      container_eq(["ADG".to_owned(), "DAK".to_owned(), "ADGJBE".to_owned()])
    );
  }

  #[gtest]
  fn test_candidate_masks_match_lengths() {
    for sequence in WordDict::parse_word_list(["ADG", "ADGJBE", "DAK"]).candidate_words(&board()) {
      expect_that!(sequence.to_mask().count(), eq(sequence.len()));
    }
  }

  #[gtest]
  fn test_twelve_letter_word_is_a_candidate() {
    let word = "ADGJBEHKCFIL";
    let sequences = WordDict::parse_word_list([word]).candidate_words(&board());
    expect_that!(sequences, container_eq([LetterSequence::from_ascii(word).unwrap()]));
  }
}
