//! Entropia CLI
//!
//! Replay bloom event streams into snapshots and query them.
//!
//! # Usage
//!
//! ```bash
//! # Validate config
//! entropia validate entropia.yaml
//!
//! # Build a snapshot from a JSON-lines event stream
//! entropia ingest events.jsonl --output engine.json --config entropia.yaml
//!
//! # Stability report for one bloom
//! entropia report engine.json bloom-42 --format json
//!
//! # Blooms running hot, and blooms needing stabilization
//! entropia hot engine.json --threshold 0.8
//! entropia stabilize engine.json
//!
//! # Genealogy of one bloom
//! entropia lineage engine.json bloom-42
//! ```

use clap::Parser;
use entropia::cli::{run_command, Cli};
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
