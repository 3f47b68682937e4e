use std::collections::VecDeque;

/// Splits an arbitrarily chunked byte stream into `\n`-terminated lines.
///
/// Bytes are buffered until a newline arrives, so neither line boundaries nor
/// multi-byte UTF-8 characters need to line up with chunk boundaries.
pub struct LineSplitter {
    buffer: VecDeque<u8>,
    /// Prefix of `buffer` already searched for a newline
    scanned: usize,
    #[cfg(test)]
    examined: usize,
}

impl LineSplitter {
    /// Create a new splitter with specified capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: VecDeque::with_capacity(capacity),
            scanned: 0,
            #[cfg(test)]
            examined: 0,
        }
    }

    /// Add bytes to the buffer
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buffer.extend(bytes);
    }

    /// Extract next complete line, without its terminator.
    /// Returns None if no complete line is available
    pub fn next_line(&mut self) -> Option<String> {
        let found = self.buffer.range(self.scanned..).position(|&b| b == b'\n');

        #[cfg(test)]
        {
            self.examined += found.map_or(self.buffer.len() - self.scanned, |offset| offset + 1);
        }

        let Some(offset) = found else {
            self.scanned = self.buffer.len();
            return None;
        };
        let newline_pos = self.scanned + offset;
        self.scanned = 0;

        let mut line_bytes: Vec<u8> = self.buffer.drain(..=newline_pos).collect();
        line_bytes.pop();

        Some(decode_line(line_bytes))
    }

    /// Take the unterminated trailing fragment at end of input, if non-empty
    pub fn finish(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }

        self.scanned = 0;
        let rest: Vec<u8> = self.buffer.drain(..).collect();
        Some(decode_line(rest))
    }

    /// Bytes waiting for a newline
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for LineSplitter {
    fn default() -> Self {
        Self::with_capacity(4096)
    }
}

fn decode_line(mut bytes: Vec<u8>) -> String {
    if bytes.last() == Some(&b'\r') {
        bytes.pop();
    }

    match String::from_utf8(bytes) {
        Ok(line) => line,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    }
}
