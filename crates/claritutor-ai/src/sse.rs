//! Incremental line decoding for streamed provider responses.
//!
//! Both SSE bodies (`data: {...}` frames) and NDJSON bodies arrive as byte
//! chunks with no alignment to line boundaries. `LineDecoder` buffers
//! partial lines across chunks and yields complete lines.

/// Splits an incoming byte stream into complete text lines
#[derive(Debug, Default)]
pub struct LineDecoder {
    buffer: String,
}

impl LineDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a chunk of bytes, returning the complete lines it finished.
    /// Invalid UTF-8 sequences are replaced rather than failing the stream.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.push_str(&String::from_utf8_lossy(chunk));

        let mut lines = Vec::new();
        while let Some(newline) = self.buffer.find('\n') {
            let mut line: String = self.buffer.drain(..=newline).collect();
            line.truncate(line.trim_end_matches(['\n', '\r']).len());
            lines.push(line);
        }
        lines
    }
}

/// Extract the payload of an SSE data line. Returns `None` for comments,
/// event names, and blank separators.
#[must_use]
pub fn sse_data(line: &str) -> Option<&str> {
    line.strip_prefix("data:").map(str::trim_start)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_split_across_chunks() {
        let mut decoder = LineDecoder::new();
        assert!(decoder.push(b"data: {\"a\"").is_empty());
        let lines = decoder.push(b": 1}\n\ndata: [DONE]\n");
        assert_eq!(lines, vec!["data: {\"a\": 1}", "", "data: [DONE]"]);
    }

    #[test]
    fn test_crlf_lines() {
        let mut decoder = LineDecoder::new();
        let lines = decoder.push(b"data: x\r\n");
        assert_eq!(lines, vec!["data: x"]);
    }

    #[test]
    fn test_sse_data_extraction() {
        assert_eq!(sse_data("data: {\"x\":1}"), Some("{\"x\":1}"));
        assert_eq!(sse_data("data:[DONE]"), Some("[DONE]"));
        assert_eq!(sse_data("event: done"), None);
        assert_eq!(sse_data(""), None);
    }
}
