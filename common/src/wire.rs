use util::error::{PuzzleError, PuzzleResult};

use crate::letter_sequence::LetterSequence;

/// Byte width of the count prefix.
const COUNT_BYTES: usize = 4;
/// Byte width of one encoded sequence.
const SEQUENCE_BYTES: usize = 8;

/// Encodes a candidate list as a 4-byte little-endian count followed by one
/// 8-byte little-endian value per sequence.
pub fn encode_sequences(sequences: &[LetterSequence]) -> Vec<u8> {
  let mut bytes = Vec::with_capacity(COUNT_BYTES + SEQUENCE_BYTES * sequences.len());
  bytes.extend_from_slice(&(sequences.len() as u32).to_le_bytes());
  for &sequence in sequences {
    bytes.extend_from_slice(&sequence.to_bits().to_le_bytes());
  }
  bytes
}

/// The exact inverse of [`encode_sequences`]. Fails on truncated input, a
/// count that disagrees with the buffer length, and any value that is not a
/// well-formed [`LetterSequence`].
pub fn decode_sequences(bytes: &[u8]) -> PuzzleResult<Vec<LetterSequence>> {
  if bytes.len() < COUNT_BYTES {
    return Err(
      PuzzleError::Malformed(format!("candidate list of {} bytes has no count", bytes.len()))
        .into(),
    );
  }

  let (count_bytes, rest) = bytes.split_at(COUNT_BYTES);
  let mut count = [0; COUNT_BYTES];
  count.copy_from_slice(count_bytes);
  let count = u32::from_le_bytes(count) as usize;

  if rest.len() != count * SEQUENCE_BYTES {
    return Err(
      PuzzleError::Malformed(format!(
        "candidate list claims {count} sequences but holds {} bytes",
        rest.len()
      ))
      .into(),
    );
  }

  rest
    .chunks_exact(SEQUENCE_BYTES)
    .map(|chunk| {
      let mut bits = [0; SEQUENCE_BYTES];
      bits.copy_from_slice(chunk);
      let bits = u64::from_le_bytes(bits);
      LetterSequence::from_bits(bits).ok_or_else(|| {
        PuzzleError::Malformed(format!("invalid letter sequence bit pattern {bits:#018x}")).into()
      })
    })
    .collect()
}
