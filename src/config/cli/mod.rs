//! CLI argument definitions

mod core;
mod types;


pub use core::{
    parse_args, Cli, Command, HotArgs, IngestArgs, LineageArgs, ReportArgs, StabilizeArgs,
    ValidateArgs,
};
pub use types::OutputFormat;
