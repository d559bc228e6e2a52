use common::{
  msg::{SolutionBuckets, SolutionChunk, WorkerMessage},
  wire,
};
use solver::search::Search;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};

use crate::coordinator::sub_ranges;

/// Runs one solver worker until its request channel closes. Each request's
/// range is solved in sub-range chunks, streaming a [`SolutionChunk`] after
/// every sub-range; between chunks the worker polls its queue so that a
/// superseding request cancels the remainder of the range.
pub async fn run_worker(
  mut requests: UnboundedReceiver<WorkerMessage>,
  chunks: UnboundedSender<SolutionChunk>,
) {
  let mut next = requests.recv().await;
  while let Some(message) = next {
    next = match solve_request(message, &mut requests, &chunks).await {
      superseding @ Some(_) => superseding,
      None => requests.recv().await,
    };
  }
}

/// Processes one solve request to completion, returning early with the
/// superseding message if one arrives at a yield point.
async fn solve_request(
  mut message: WorkerMessage,
  requests: &mut UnboundedReceiver<WorkerMessage>,
  chunks: &UnboundedSender<SolutionChunk>,
) -> Option<WorkerMessage> {
  // Only the newest queued request matters; anything older is already
  // superseded.
  while let Ok(newer) = requests.try_recv() {
    message = newer;
  }

  let WorkerMessage::Solve { request_id, full_mask, encoded_words, range } = message;

  // Decode once per request; every sub-range below reuses the decoded list.
  let words = match wire::decode_sequences(&encoded_words) {
    Ok(words) => words,
    Err(err) => {
      eprintln!("Worker discarding request {request_id}: {err}");
      send_chunk(chunks, request_id, true, SolutionBuckets::default());
      return None;
    }
  };

  let search = Search::new(&words, full_mask);
  let sub_ranges = sub_ranges(range);
  let Some(last) = sub_ranges.len().checked_sub(1) else {
    // An empty range still acknowledges the request so the aggregator can
    // count this worker as finished.
    send_chunk(chunks, request_id, true, SolutionBuckets::default());
    return None;
  };

  for (index, sub_range) in sub_ranges.into_iter().enumerate() {
    let mut buckets = SolutionBuckets::default();
    search.solve_range(sub_range, &mut buckets);
    send_chunk(chunks, request_id, index == last, buckets);

    if index < last {
      tokio::task::yield_now().await;
      if let Ok(superseding) = requests.try_recv() {
        return Some(superseding);
      }
    }
  }

  None
}

fn send_chunk(
  chunks: &UnboundedSender<SolutionChunk>,
  request_id: u64,
  is_final: bool,
  buckets: SolutionBuckets,
) {
  // A dropped receiver means the engine is shutting down; there is nowhere
  // left to report to.
  let _ = chunks.send(SolutionChunk { request_id, is_final, buckets });
}
