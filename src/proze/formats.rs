//! Output strategies for compiled manuscripts
//!
//! This module contains the strategy registry and the strategies themselves:
//! - Plain text (`txt`), the only strategy implemented so far
//! - PDF (`pdf`), recognised but not implemented

pub mod registry;
pub mod text;

pub use registry::{DocumentWriter, OutputStrategy, StrategyRegistry};
pub use text::{TextFormatter, TextStrategy, TextWriter};
