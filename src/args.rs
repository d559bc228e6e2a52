use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Serialize;

#[derive(ValueEnum, Clone, Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
  /// Print every solution, grouped by word count.
  Solve,
  /// Print only the per-bucket solution counts.
  Count,
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
  /// The twelve board letters in top/right/bottom/left order, e.g.
  /// "AIODGTESUNPR" for the sides AIO, DGT, ESU, and NPR.
  pub board: Option<String>,

  #[arg(long, default_value = "solve")]
  pub mode: RunMode,

  /// Word list to solve against. A `.bin` file is read as a preprocessed
  /// binary dictionary; anything else is parsed as one word per line.
  #[arg(long, default_value = "words.txt")]
  pub dict: PathBuf,

  /// Worker count; defaults to the available parallelism, capped at 16.
  #[arg(long)]
  pub workers: Option<usize>,

  /// Write the parsed dictionary back out in binary form and exit.
  #[arg(long)]
  pub save_dict: Option<PathBuf>,
}
