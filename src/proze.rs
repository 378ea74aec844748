//! Main module for proze library functionality

pub mod config;
pub mod error;
pub mod formats;
pub mod lexing;
pub mod markup;
pub mod names;
pub mod pipeline;
pub mod rules;
pub mod state;

pub use config::CompileOptions;
pub use error::{CompileError, ConfigError};
pub use lexing::Scrubber;
pub use markup::MarkupToken;
pub use formats::StrategyRegistry;
pub use pipeline::{compile_project, compile_str, CompileRequest, Pipeline};
pub use state::DocumentState;
