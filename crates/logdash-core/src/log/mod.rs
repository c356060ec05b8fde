mod grammar;
mod reader;
mod types;

pub use grammar::{LineError, LineParser, MAX_TARGET_LEN, RawFields, TIMESTAMP_FORMAT, truncate_target};
pub use reader::LogReader;
pub use types::*;
