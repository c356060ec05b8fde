pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod log;

pub use config::AnalysisConfig;
pub use error::{Error, Result};
