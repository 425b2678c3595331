// gsim-core/src/runner/logs.rs
// Line framing and severity tagging for supervised process output.
use gsim_common::model::{LogLevel, LogRecord};

/// Tag one logical line with a severity. Priority order, first match wins;
/// case-sensitive substring scan anywhere in the line. Lines without a
/// marker default to INFO. This never fails: malformed input degrades to
/// best-effort tagging.
pub fn classify_line(line: &str) -> LogLevel {
    if line.contains("ERROR") {
        LogLevel::Error
    } else if line.contains("WARNING") {
        LogLevel::Warning
    } else if line.contains("INFO") {
        LogLevel::Info
    } else if line.contains("DEBUG") {
        LogLevel::Debug
    } else {
        LogLevel::Info
    }
}

/// Streaming line framer over raw byte chunks. Chunks may carry embedded
/// newlines and partial lines; every completed line is emitted immediately
/// and the trailing fragment is buffered for the next chunk.
///
/// One instance per supervised process; the partial buffer is never shared
/// between producers.
#[derive(Default)]
pub struct LineClassifier {
    partial: Vec<u8>,
}

impl LineClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest a chunk, returning one record per line it completes.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<LogRecord> {
        let mut records = Vec::new();
        for &byte in chunk {
            if byte == b'\n' {
                records.push(self.take_line());
            } else {
                self.partial.push(byte);
            }
        }
        records
    }

    /// Flush the trailing unterminated line, if any. Called once the
    /// process has closed its output streams.
    pub fn finish(&mut self) -> Option<LogRecord> {
        if self.partial.is_empty() {
            None
        } else {
            Some(self.take_line())
        }
    }

    fn take_line(&mut self) -> LogRecord {
        if self.partial.last() == Some(&b'\r') {
            self.partial.pop();
        }
        let text = String::from_utf8_lossy(&self.partial).into_owned();
        self.partial.clear();
        LogRecord {
            level: classify_line(&text),
            text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(classifier: &mut LineClassifier, chunks: &[&[u8]]) -> Vec<LogRecord> {
        let mut records = Vec::new();
        for chunk in chunks {
            records.extend(classifier.push(chunk));
        }
        records.extend(classifier.finish());
        records
    }

    #[test]
    fn classification_priority_first_match_wins() {
        assert_eq!(classify_line("ERROR: with INFO inside"), LogLevel::Error);
        assert_eq!(classify_line("WARNING then DEBUG"), LogLevel::Warning);
        assert_eq!(classify_line("INFO: starting"), LogLevel::Info);
        assert_eq!(classify_line("some DEBUG detail"), LogLevel::Debug);
    }

    #[test]
    fn unmarked_line_defaults_to_info() {
        assert_eq!(classify_line("heartbeat"), LogLevel::Info);
        assert_eq!(classify_line(""), LogLevel::Info);
    }

    #[test]
    fn markers_are_case_sensitive() {
        assert_eq!(classify_line("error: lowercase"), LogLevel::Info);
    }

    #[test]
    fn split_point_does_not_change_the_records() {
        let input = b"INFO: starting\nERROR: failed\n";
        let whole = drain(&mut LineClassifier::new(), &[input]);

        // Feeding the same bytes split at every possible offset must yield
        // the same records in the same order.
        for split in 0..input.len() {
            let (a, b) = input.split_at(split);
            let parts = drain(&mut LineClassifier::new(), &[a, b]);
            assert_eq!(parts, whole, "mismatch at split offset {split}");
        }

        assert_eq!(whole.len(), 2);
        assert_eq!(whole[0].level, LogLevel::Info);
        assert_eq!(whole[0].text, "INFO: starting");
        assert_eq!(whole[1].level, LogLevel::Error);
        assert_eq!(whole[1].text, "ERROR: failed");
    }

    #[test]
    fn partial_line_is_held_until_completed() {
        let mut classifier = LineClassifier::new();
        assert!(classifier.push(b"half a li").is_empty());
        let records = classifier.push(b"ne\nWARNING: next");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].text, "half a line");
        assert_eq!(records[0].level, LogLevel::Info);

        let tail = classifier.finish().unwrap();
        assert_eq!(tail.text, "WARNING: next");
        assert_eq!(tail.level, LogLevel::Warning);
        assert_eq!(classifier.finish(), None);
    }

    #[test]
    fn crlf_terminators_are_trimmed() {
        let mut classifier = LineClassifier::new();
        let records = classifier.push(b"INFO: windows build\r\n");
        assert_eq!(records[0].text, "INFO: windows build");
    }

    #[test]
    fn multiple_lines_in_one_chunk_emit_in_order() {
        let mut classifier = LineClassifier::new();
        let records = classifier.push(b"one\ntwo\nthree\n");
        let texts: Vec<_> = records.iter().map(|r| r.text.as_str()).collect();
        assert_eq!(texts, ["one", "two", "three"]);
    }
}
