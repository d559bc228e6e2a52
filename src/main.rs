#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod args;

use std::{path::Path, process::ExitCode};

use args::{Args, RunMode};
use clap::Parser;
use common::board::Board;
use engine::{
  aggregator::Snapshot,
  coordinator::{default_worker_count, Coordinator},
};
use itertools::Itertools;
use tokio::fs;
use util::{
  bitcode,
  error::{PuzzleError, PuzzleResult},
};
use word_dict::WordDict;

async fn load_dict(path: &Path) -> PuzzleResult<WordDict> {
  let bytes = fs::read(path).await?;
  if path.extension().is_some_and(|extension| extension == "bin") {
    Ok(bitcode::decode(&bytes)?)
  } else {
    Ok(WordDict::parse_word_list(String::from_utf8(bytes)?.lines()))
  }
}

async fn save_dict(dict: &WordDict, path: &Path) -> PuzzleResult {
  fs::write(path, bitcode::encode(dict)).await?;
  println!("Wrote {} words to {}", dict.word_count(), path.display());
  Ok(())
}

fn print_solutions(snapshot: &Snapshot) {
  for (word_count, solutions) in snapshot.buckets.iter() {
    if solutions.is_empty() {
      continue;
    }
    println!("\n{word_count}-word solutions:");
    for solution in solutions.iter().sorted() {
      println!("  {solution}");
    }
  }
  println!("\n{} solutions", snapshot.buckets.total());
}

fn print_counts(snapshot: &Snapshot) {
  for (word_count, solutions) in snapshot.buckets.iter() {
    println!("{word_count}-word solutions: {}", solutions.len());
  }
  println!("{} solutions", snapshot.buckets.total());
}

async fn solve(board: &Board, dict: &WordDict, workers: usize, mode: &RunMode) -> PuzzleResult {
  let candidates = dict.candidate_words(board);
  println!("{board}: {} candidate words", candidates.len());

  let mut coordinator = Coordinator::new(workers);
  let mut snapshots = coordinator.solve(board, &candidates)?;

  let snapshot = loop {
    let Some(snapshot) = snapshots.recv().await else {
      return Err(PuzzleError::Internal("solver stopped before finishing".to_owned()).into());
    };
    if snapshot.is_final {
      break snapshot;
    }
  };

  match mode {
    RunMode::Solve => print_solutions(&snapshot),
    RunMode::Count => print_counts(&snapshot),
  }
  Ok(())
}

async fn run(args: Args) -> PuzzleResult {
  let dict = load_dict(&args.dict).await?;

  if let Some(path) = &args.save_dict {
    return save_dict(&dict, path).await;
  }

  let Some(board) = &args.board else {
    return Err(PuzzleError::Parse("expected a 12-letter board".to_owned()).into());
  };
  let board = Board::parse(board)?;
  let workers = args.workers.unwrap_or_else(default_worker_count);

  solve(&board, &dict, workers, &args.mode).await
}

#[tokio::main]
async fn main() -> ExitCode {
  let args = Args::parse();
  if let Err(err) = run(args).await {
    println!("Error: {err}");
    ExitCode::FAILURE
  } else {
    ExitCode::SUCCESS
  }
}
