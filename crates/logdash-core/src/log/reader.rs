use crate::Result;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Forward-only source of log lines over any buffered reader
///
/// Lines are decoded lossily so a stray non-UTF-8 byte only affects the line
/// it appears in. Read errors end the iteration with an `Err`.
pub struct LogReader<R> {
    inner: R,
    buf: Vec<u8>,
}

impl LogReader<BufReader<File>> {
    /// Open an access log on disk
    pub fn from_file(path: &Path) -> Result<Self> {
        tracing::debug!("Opening access log: {}", path.display());

        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> LogReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            buf: Vec::new(),
        }
    }
}

impl<R: BufRead> Iterator for LogReader<R> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();

        match self.inner.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                Some(Ok(String::from_utf8_lossy(&self.buf).into_owned()))
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reads_lines_without_terminators() {
        let reader = LogReader::new(Cursor::new("first\r\nsecond\nthird"));
        let lines: Vec<String> = reader.map(|l| l.unwrap()).collect();
        assert_eq!(lines, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let reader = LogReader::new(Cursor::new(b"ok\n\xff\xfe bad\n".to_vec()));
        let lines: Vec<String> = reader.map(|l| l.unwrap()).collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].ends_with(" bad"));
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = LogReader::from_file(Path::new("/nonexistent/access.log"));
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }
}
