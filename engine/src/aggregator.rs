use common::msg::{SolutionBuckets, SolutionChunk};

/// The cumulative state published downstream after each accepted chunk.
/// `is_final` is set once every worker has reported its final chunk for the
/// active request.
#[derive(Clone, Debug)]
pub struct Snapshot {
  pub request_id: u64,
  pub buckets: SolutionBuckets,
  pub is_final: bool,
}

/// Collects per-worker chunk emissions into the five word-count buckets for
/// the active request. Chunks carrying a stale request id are discarded.
#[derive(Debug, Default)]
pub struct Aggregator {
  active_id: u64,
  pending_workers: usize,
  buckets: SolutionBuckets,
}

impl Aggregator {
  pub fn new() -> Self {
    Self::default()
  }

  /// Makes `request_id` the active request, clearing all state accumulated
  /// for its predecessor.
  pub fn start_request(&mut self, request_id: u64, worker_count: usize) {
    self.active_id = request_id;
    self.pending_workers = worker_count;
    self.buckets = SolutionBuckets::default();
  }

  /// Folds one worker emission into the buckets, returning the snapshot to
  /// publish, or `None` for a superseded emission.
  pub fn accept(&mut self, chunk: SolutionChunk) -> Option<Snapshot> {
    if chunk.request_id != self.active_id {
      return None;
    }

    self.buckets.append(chunk.buckets);
    if chunk.is_final {
      debug_assert!(self.pending_workers > 0);
      self.pending_workers = self.pending_workers.saturating_sub(1);
    }

    Some(Snapshot {
      request_id: self.active_id,
      buckets: self.buckets.clone(),
      is_final: self.pending_workers == 0,
    })
  }
}
