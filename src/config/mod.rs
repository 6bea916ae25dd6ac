//! Engine configuration
//!
//! YAML schema, loading, validation, and command-line argument types.

mod cli;
mod loader;
mod schema;
mod validate;

pub use cli::{
    parse_args, Cli, Command, HotArgs, IngestArgs, LineageArgs, OutputFormat, ReportArgs,
    StabilizeArgs, ValidateArgs,
};
pub use loader::{load_config, parse_config};
pub use schema::{AnalyzerConfig, EngineConfig, LineageConfig};
pub use validate::{validate_config, ValidationError};
