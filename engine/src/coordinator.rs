use std::{num::NonZeroUsize, ops::Range, sync::Arc, thread};

use common::{
  board::Board,
  letter_sequence::LetterSequence,
  msg::{SolutionChunk, WorkerMessage},
  wire,
};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use util::error::{PuzzleError, PuzzleResult};

use crate::{
  aggregator::{Aggregator, Snapshot},
  worker,
};

/// The most workers a request is ever split across.
pub const MAX_WORKERS: usize = 16;

/// How many emission chunks a worker splits its range into.
const MAX_CHUNKS_PER_WORKER: usize = 4;

/// Splits `[0, n)` into `count` contiguous half-open ranges covering the
/// whole interval; the first `n % count` ranges receive one extra element.
pub fn worker_ranges(n: usize, count: usize) -> Vec<Range<usize>> {
  debug_assert!(count > 0);
  let base = n / count;
  let extra = n % count;

  let mut start = 0;
  (0..count)
    .map(|index| {
      let end = start + base + usize::from(index < extra);
      let range = start..end;
      start = end;
      range
    })
    .collect()
}

/// Splits one worker's assigned range into at most four near-equal
/// sub-ranges, each completed sub-range triggering one streamed emission.
/// An empty range has no sub-ranges.
pub fn sub_ranges(range: Range<usize>) -> Vec<Range<usize>> {
  let chunks = range.len().min(MAX_CHUNKS_PER_WORKER);
  if chunks == 0 {
    return Vec::new();
  }

  worker_ranges(range.len(), chunks)
    .into_iter()
    .map(|sub_range| range.start + sub_range.start..range.start + sub_range.end)
    .collect()
}

pub fn default_worker_count() -> usize {
  thread::available_parallelism().map_or(1, NonZeroUsize::get).min(MAX_WORKERS)
}

struct ActiveRequest {
  request_id: u64,
  worker_count: usize,
  snapshots: UnboundedSender<Snapshot>,
}

/// Owns the worker pool and the request lifecycle: assigns each worker its
/// index range, hands the aggregator the new active request, and streams the
/// aggregator's snapshots back to the caller. Issuing a new solve supersedes
/// the previous one.
pub struct Coordinator {
  workers: Vec<UnboundedSender<WorkerMessage>>,
  requests: UnboundedSender<ActiveRequest>,
  next_request_id: u64,
}

impl Coordinator {
  /// Spawns `worker_count` solver workers plus the aggregator task.
  pub fn new(worker_count: usize) -> Self {
    let worker_count = worker_count.max(1);
    let (chunk_tx, chunk_rx) = mpsc::unbounded_channel();

    let workers = (0..worker_count)
      .map(|_| {
        let (request_tx, request_rx) = mpsc::unbounded_channel();
        tokio::spawn(worker::run_worker(request_rx, chunk_tx.clone()));
        request_tx
      })
      .collect();

    let (request_tx, request_rx) = mpsc::unbounded_channel();
    tokio::spawn(run_aggregator(request_rx, chunk_rx));

    Self { workers, requests: request_tx, next_request_id: 1 }
  }

  pub fn worker_count(&self) -> usize {
    self.workers.len()
  }

  /// Dispatches a solve of `candidates` over `board` across the worker pool.
  /// Returns the stream of cumulative snapshots for this request; the last
  /// one has `is_final` set. Any in-flight request is superseded and its
  /// remaining emissions are discarded.
  pub fn solve(
    &mut self,
    board: &Board,
    candidates: &[LetterSequence],
  ) -> PuzzleResult<UnboundedReceiver<Snapshot>> {
    let request_id = self.next_request_id;
    self.next_request_id += 1;

    // Serialized once; every worker decodes into private memory.
    let encoded_words: Arc<[u8]> = wire::encode_sequences(candidates).into();
    let (snapshot_tx, snapshot_rx) = mpsc::unbounded_channel();

    self
      .requests
      .send(ActiveRequest {
        request_id,
        worker_count: self.workers.len(),
        snapshots: snapshot_tx,
      })
      .map_err(|_| PuzzleError::Internal("aggregator task is gone".to_owned()))?;

    let ranges = worker_ranges(candidates.len(), self.workers.len());
    for (worker, range) in self.workers.iter().zip(ranges) {
      worker
        .send(WorkerMessage::Solve {
          request_id,
          full_mask: board.full_mask(),
          encoded_words: encoded_words.clone(),
          range,
        })
        .map_err(|_| {
          PuzzleError::Internal(format!("a worker for request {request_id} is gone"))
        })?;
    }

    Ok(snapshot_rx)
  }
}

async fn run_aggregator(
  mut requests: UnboundedReceiver<ActiveRequest>,
  mut chunks: UnboundedReceiver<SolutionChunk>,
) {
  let mut aggregator = Aggregator::new();
  let mut active: Option<ActiveRequest> = None;

  loop {
    tokio::select! {
      // Take pending requests first so supersession applies before any more
      // chunks are folded in.
      biased;

      request = requests.recv() => {
        let Some(request) = request else { break };
        aggregator.start_request(request.request_id, request.worker_count);
        active = Some(request);
      }
      chunk = chunks.recv() => {
        let Some(chunk) = chunk else { break };
        if let (Some(request), Some(snapshot)) = (&active, aggregator.accept(chunk)) {
          // A dropped receiver means the caller stopped listening to this
          // request; solving continues until it is superseded.
          let _ = request.snapshots.send(snapshot);
        }
      }
    }
  }
}
