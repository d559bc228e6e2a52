use std::fmt::{self, Display, Formatter};

use itertools::Itertools;
use util::error::{PuzzleError, PuzzleResult};

use crate::letter_mask::LetterMask;

pub const SIDE_COUNT: usize = 4;
pub const LETTERS_PER_SIDE: usize = 3;
pub const BOARD_LETTERS: usize = SIDE_COUNT * LETTERS_PER_SIDE;

/// The twelve letters of a puzzle, arranged three to a side in
/// top/right/bottom/left order. Immutable once parsed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Board {
  sides: [[u8; LETTERS_PER_SIDE]; SIDE_COUNT],
  side_of: [Option<u8>; 26],
  full_mask: LetterMask,
}

impl Board {
  /// Parses a 12-character string of distinct letters, folding lowercase to
  /// uppercase. Positions 0-2 are the top side, 3-5 the right, 6-8 the
  /// bottom, and 9-11 the left.
  pub fn parse(letters: &str) -> PuzzleResult<Self> {
    let bytes = letters.as_bytes();
    if bytes.len() != BOARD_LETTERS {
      return Err(
        PuzzleError::Parse(format!(
          "expected {BOARD_LETTERS} board letters, found {} in \"{letters}\"",
          bytes.len()
        ))
        .into(),
      );
    }

    let mut sides = [[0; LETTERS_PER_SIDE]; SIDE_COUNT];
    let mut side_of = [None; 26];
    let mut full_mask = LetterMask::empty();

    for (position, byte) in bytes.iter().enumerate() {
      let byte = byte.to_ascii_uppercase();
      if !byte.is_ascii_uppercase() {
        return Err(
          PuzzleError::Parse(format!("board character {:?} is not a letter", byte as char)).into(),
        );
      }

      let letter = byte - b'A';
      if full_mask.contains(letter) {
        return Err(
          PuzzleError::Parse(format!("board letter {} appears more than once", byte as char))
            .into(),
        );
      }

      let side = position / LETTERS_PER_SIDE;
      sides[side][position % LETTERS_PER_SIDE] = letter;
      side_of[letter as usize] = Some(side as u8);
      full_mask = full_mask.insert(letter);
    }

    Ok(Self { sides, side_of, full_mask })
  }

  /// The side index (0..4) holding `letter`, or `None` for letters not on
  /// the board.
  pub fn side_of(&self, letter: u8) -> Option<u8> {
    self.side_of.get(letter as usize).copied().flatten()
  }

  pub fn contains(&self, letter: u8) -> bool {
    self.side_of(letter).is_some()
  }

  /// True iff both letters are on the board and share a side. Consecutive
  /// letters of a word may never satisfy this.
  pub fn same_side(&self, lhs: u8, rhs: u8) -> bool {
    match (self.side_of(lhs), self.side_of(rhs)) {
      (Some(lhs_side), Some(rhs_side)) => lhs_side == rhs_side,
      _ => false,
    }
  }

  pub fn side(&self, side: usize) -> [u8; LETTERS_PER_SIDE] {
    self.sides[side]
  }

  /// The mask of all twelve board letters. A solution is complete exactly
  /// when the union of its words' masks equals this.
  pub const fn full_mask(&self) -> LetterMask {
    self.full_mask
  }
}

impl Display for Board {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(
      f,
      "{}",
      self
        .sides
        .iter()
        .map(|side| side.iter().map(|&letter| (letter + b'A') as char).collect::<String>())
        .join(" ")
    )
  }
}
