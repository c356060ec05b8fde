pub mod analyze;
pub mod completion;
pub mod convert;
pub mod report;
pub mod serve;
