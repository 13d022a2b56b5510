//! Shared types, error model, and configuration for srsgen.
//!
//! This crate is the foundation depended on by all other srsgen crates.
//! It provides:
//! - [`SrsError`]: the unified error type
//! - Domain types ([`InputSources`], [`NormalizedText`], [`Prompt`], [`SpreadsheetRow`])
//! - Configuration ([`AppConfig`] and the runtime configs built from it)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, GenerationConfig, GenerationSection, MarkupSection, OutputSection, PipelineConfig,
    RenderConfig, RenderSection, config_dir, config_file_path, endpoint_url, init_config,
    load_config, load_config_from, validate_api_key,
};
pub use error::{Result, SrsError};
pub use types::{
    ERROR_MARKER, EXTRACTION_ERROR_TOKEN, InputSource, InputSources, NormalizedText, OutputPaths,
    Prompt, RunId, SpreadsheetRow, Upload,
};
