use crate::filter::TimeWindow;
use crate::log::LogFormat;
use serde::{Deserialize, Serialize};

/// Everything one analysis run needs, passed explicitly into the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub format: LogFormat,
    pub window: TimeWindow,
}

impl AnalysisConfig {
    pub fn new(format: LogFormat, window: TimeWindow) -> Self {
        Self { format, window }
    }

    /// Parse window bounds and build a config in one step
    pub fn from_bounds(format: LogFormat, start: &str, end: &str) -> crate::Result<Self> {
        Ok(Self::new(format, TimeWindow::parse(start, end)?))
    }
}
